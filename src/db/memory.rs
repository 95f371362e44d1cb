use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::db::models::{
    Application, ApplicationChanges, ApplicationFilter, ApplicationStats, ProfileUpdate, User,
};
use crate::db::store::{ApplicationStore, UserStore};
use crate::error::{AppError, DatabaseError};

/// In-process store backing the `memory` database driver and the test suite.
/// Applications are held as whole aggregates, children included.
#[derive(Default)]
pub struct MemoryStore {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
    applications: Arc<RwLock<HashMap<Uuid, Application>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, user: &User) -> Result<User, AppError> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == user.email) {
            return Err(AppError::Database(DatabaseError::Duplicate));
        }
        users.insert(user.id, user.clone());
        Ok(user.clone())
    }

    async fn get_user_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn update_user(
        &self,
        id: Uuid,
        update: &ProfileUpdate,
    ) -> Result<Option<User>, AppError> {
        let mut users = self.users.write().await;
        let Some(user) = users.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(first_name) = &update.first_name {
            user.first_name = Some(first_name.clone());
        }
        if let Some(last_name) = &update.last_name {
            user.last_name = Some(last_name.clone());
        }
        if let Some(email) = &update.email {
            user.email = email.clone();
        }
        user.updated_at = Utc::now();
        Ok(Some(user.clone()))
    }
}

#[async_trait]
impl ApplicationStore for MemoryStore {
    async fn create_application(&self, application: &Application) -> Result<Application, AppError> {
        self.applications
            .write()
            .await
            .insert(application.id, application.clone());
        Ok(application.clone())
    }

    async fn list_applications(
        &self,
        user_id: Uuid,
        filter: &ApplicationFilter,
    ) -> Result<Vec<Application>, AppError> {
        let applications = self.applications.read().await;
        let mut matches: Vec<Application> = applications
            .values()
            .filter(|a| a.user_id == user_id)
            .filter(|a| filter.status.map_or(true, |s| a.status == s))
            .filter(|a| {
                filter.company.as_ref().map_or(true, |c| {
                    a.company.to_lowercase().contains(&c.to_lowercase())
                })
            })
            .filter(|a| {
                filter.position.as_ref().map_or(true, |p| {
                    a.position.to_lowercase().contains(&p.to_lowercase())
                })
            })
            .cloned()
            .collect();
        matches.sort_by(|a, b| b.application_date.cmp(&a.application_date));
        Ok(matches)
    }

    async fn get_application(
        &self,
        user_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Application>, AppError> {
        Ok(self
            .applications
            .read()
            .await
            .get(&id)
            .filter(|a| a.user_id == user_id)
            .cloned())
    }

    async fn update_application(
        &self,
        user_id: Uuid,
        id: Uuid,
        changes: &ApplicationChanges,
    ) -> Result<Option<Application>, AppError> {
        let mut applications = self.applications.write().await;
        let Some(app) = applications.get_mut(&id).filter(|a| a.user_id == user_id) else {
            return Ok(None);
        };
        if let Some(company) = &changes.company {
            app.company = company.clone();
        }
        if let Some(position) = &changes.position {
            app.position = position.clone();
        }
        if let Some(location) = &changes.location {
            app.location = Some(location.clone());
        }
        if let Some(job_description) = &changes.job_description {
            app.job_description = Some(job_description.clone());
        }
        if let Some(status) = changes.status {
            app.status = status;
        }
        if let Some(application_date) = changes.application_date {
            app.application_date = application_date;
        }
        if let Some(salary) = &changes.salary {
            app.salary = Some(salary.clone());
        }
        if let Some(job_url) = &changes.job_url {
            app.job_url = Some(job_url.clone());
        }
        if let Some(notes) = &changes.notes {
            app.notes = Some(notes.clone());
        }
        if let Some(source) = &changes.source {
            app.source = Some(source.clone());
        }
        app.updated_at = Utc::now();
        Ok(Some(app.clone()))
    }

    async fn delete_application(&self, user_id: Uuid, id: Uuid) -> Result<bool, AppError> {
        let mut applications = self.applications.write().await;
        match applications.get(&id) {
            Some(a) if a.user_id == user_id => {
                applications.remove(&id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn application_stats(&self, user_id: Uuid) -> Result<ApplicationStats, AppError> {
        let applications = self.applications.read().await;
        let mut stats = ApplicationStats {
            total: 0,
            by_status: HashMap::new(),
        };
        for app in applications.values().filter(|a| a.user_id == user_id) {
            stats.total += 1;
            *stats.by_status.entry(app.status).or_insert(0) += 1;
        }
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::ApplicationStatus;
    use chrono::Duration;

    fn user(email: &str) -> User {
        User::new(email.to_string(), "hash".to_string(), None, None)
    }

    fn application(user_id: Uuid, company: &str, days_ago: i64) -> Application {
        let now = Utc::now();
        Application {
            id: Uuid::new_v4(),
            user_id,
            company: company.to_string(),
            position: "Engineer".to_string(),
            location: None,
            job_description: None,
            status: ApplicationStatus::default(),
            application_date: now - Duration::days(days_ago),
            salary: None,
            job_url: None,
            notes: None,
            source: None,
            created_at: now,
            updated_at: now,
            contacts: vec![],
            interviews: vec![],
            documents: vec![],
        }
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let store = MemoryStore::new();
        store.create_user(&user("a@x.com")).await.unwrap();
        let err = store.create_user(&user("a@x.com")).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::Database(DatabaseError::Duplicate)
        ));
    }

    #[tokio::test]
    async fn test_list_orders_by_application_date_desc() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        store
            .create_application(&application(owner, "Oldest", 10))
            .await
            .unwrap();
        store
            .create_application(&application(owner, "Newest", 1))
            .await
            .unwrap();
        store
            .create_application(&application(owner, "Middle", 5))
            .await
            .unwrap();

        let listed = store
            .list_applications(owner, &ApplicationFilter::default())
            .await
            .unwrap();
        let companies: Vec<_> = listed.iter().map(|a| a.company.as_str()).collect();
        assert_eq!(companies, vec!["Newest", "Middle", "Oldest"]);
    }

    #[tokio::test]
    async fn test_ownership_scoping() {
        let store = MemoryStore::new();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        let app = application(bob, "Acme", 0);
        store.create_application(&app).await.unwrap();

        assert!(store.get_application(alice, app.id).await.unwrap().is_none());
        assert!(!store.delete_application(alice, app.id).await.unwrap());
        // Bob's record is untouched by Alice's attempts.
        assert!(store.get_application(bob, app.id).await.unwrap().is_some());
    }
}
