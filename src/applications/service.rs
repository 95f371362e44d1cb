use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::db::models::{
    Application, ApplicationChanges, ApplicationFilter, ApplicationStats, ApplicationStatus,
    ApplicationUpdate, NewApplication,
};
use crate::db::store::ApplicationStore;
use crate::error::AppError;

/// Owner-scoped CRUD over application records. Every operation takes the
/// authenticated caller's id; the store never returns a foreign record, so
/// "not yours" and "does not exist" are the same `NotFound` here.
pub struct ApplicationService {
    store: Arc<dyn ApplicationStore>,
}

impl ApplicationService {
    pub fn new(store: Arc<dyn ApplicationStore>) -> Self {
        Self { store }
    }

    pub async fn create(
        &self,
        user_id: Uuid,
        payload: NewApplication,
    ) -> Result<Application, AppError> {
        let company = required_field(&payload.company, "Company name is required")?;
        let position = required_field(&payload.position, "Position is required")?;
        let status = parse_status(payload.status.as_deref())?.unwrap_or_default();

        let now = Utc::now();
        let application = Application {
            id: Uuid::new_v4(),
            user_id,
            company,
            position,
            location: payload.location,
            job_description: payload.job_description,
            status,
            application_date: payload.application_date.unwrap_or(now),
            salary: payload.salary,
            job_url: payload.job_url,
            notes: payload.notes,
            source: payload.source,
            created_at: now,
            updated_at: now,
            contacts: vec![],
            interviews: vec![],
            documents: vec![],
        };

        let created = self.store.create_application(&application).await?;
        info!("User {} created application {}", user_id, created.id);
        Ok(created)
    }

    pub async fn list(
        &self,
        user_id: Uuid,
        status: Option<&str>,
        company: Option<String>,
        position: Option<String>,
    ) -> Result<Vec<Application>, AppError> {
        let filter = ApplicationFilter {
            status: parse_status(status)?,
            company,
            position,
        };
        self.store.list_applications(user_id, &filter).await
    }

    pub async fn get(&self, user_id: Uuid, id: Uuid) -> Result<Application, AppError> {
        self.store
            .get_application(user_id, id)
            .await?
            .ok_or(AppError::NotFound("Application"))
    }

    pub async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        payload: ApplicationUpdate,
    ) -> Result<Application, AppError> {
        let changes = ApplicationChanges {
            company: nonempty_update(payload.company, "Company name is required")?,
            position: nonempty_update(payload.position, "Position is required")?,
            location: payload.location,
            job_description: payload.job_description,
            status: parse_status(payload.status.as_deref())?,
            application_date: payload.application_date,
            salary: payload.salary,
            job_url: payload.job_url,
            notes: payload.notes,
            source: payload.source,
        };

        let updated = self
            .store
            .update_application(user_id, id, &changes)
            .await?
            .ok_or(AppError::NotFound("Application"))?;
        info!("User {} updated application {}", user_id, id);
        Ok(updated)
    }

    pub async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<(), AppError> {
        if !self.store.delete_application(user_id, id).await? {
            return Err(AppError::NotFound("Application"));
        }
        info!("User {} deleted application {}", user_id, id);
        Ok(())
    }

    pub async fn stats(&self, user_id: Uuid) -> Result<ApplicationStats, AppError> {
        self.store.application_stats(user_id).await
    }
}

fn required_field(value: &str, message: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(message.to_string()));
    }
    Ok(trimmed.to_string())
}

fn nonempty_update(value: Option<String>, message: &str) -> Result<Option<String>, AppError> {
    value
        .map(|v| required_field(&v, message))
        .transpose()
}

fn parse_status(status: Option<&str>) -> Result<Option<ApplicationStatus>, AppError> {
    status
        .map(|s| s.parse().map_err(AppError::Validation))
        .transpose()
}
