use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::models::{
    Application, ApplicationChanges, ApplicationFilter, ApplicationStats, ApplicationStatus,
    Contact, Document, Interview, ProfileUpdate, User,
};
use crate::db::store::{ApplicationStore, UserStore};
use crate::error::{AppError, DatabaseError};

const USER_COLUMNS: &str = "id, email, password_hash, first_name, last_name, created_at, updated_at";
const APPLICATION_COLUMNS: &str = "id, user_id, company, position, location, job_description, \
     status, application_date, salary, job_url, notes, source, created_at, updated_at";

/// PostgreSQL-backed store. Queries are owner-scoped in SQL so a foreign
/// record never leaves the database.
pub struct PgStore {
    pool: Arc<PgPool>,
}

impl PgStore {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, AppError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(5))
            .connect(url)
            .await
            .map_err(|e| AppError::Database(DatabaseError::Connection(e.to_string())))?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| AppError::Database(DatabaseError::Query(e.to_string())))?;

        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    async fn fetch_children(
        &self,
        row: ApplicationRow,
    ) -> Result<Application, AppError> {
        let contacts = sqlx::query_as::<_, Contact>(
            "SELECT id, application_id, name, role, email FROM contacts WHERE application_id = $1",
        )
        .bind(row.id)
        .fetch_all(self.pool.as_ref())
        .await?;

        let interviews = sqlx::query_as::<_, Interview>(
            "SELECT id, application_id, interview_type, scheduled_at FROM interviews \
             WHERE application_id = $1",
        )
        .bind(row.id)
        .fetch_all(self.pool.as_ref())
        .await?;

        let documents = sqlx::query_as::<_, Document>(
            "SELECT id, application_id, name, document_type FROM documents \
             WHERE application_id = $1",
        )
        .bind(row.id)
        .fetch_all(self.pool.as_ref())
        .await?;

        row.into_application(contacts, interviews, documents)
    }
}

#[derive(sqlx::FromRow)]
struct ApplicationRow {
    id: Uuid,
    user_id: Uuid,
    company: String,
    position: String,
    location: Option<String>,
    job_description: Option<String>,
    status: String,
    application_date: DateTime<Utc>,
    salary: Option<String>,
    job_url: Option<String>,
    notes: Option<String>,
    source: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ApplicationRow {
    fn into_application(
        self,
        contacts: Vec<Contact>,
        interviews: Vec<Interview>,
        documents: Vec<Document>,
    ) -> Result<Application, AppError> {
        let status: ApplicationStatus = self
            .status
            .parse()
            .map_err(|e: String| AppError::Database(DatabaseError::Query(e)))?;
        Ok(Application {
            id: self.id,
            user_id: self.user_id,
            company: self.company,
            position: self.position,
            location: self.location,
            job_description: self.job_description,
            status,
            application_date: self.application_date,
            salary: self.salary,
            job_url: self.job_url,
            notes: self.notes,
            source: self.source,
            created_at: self.created_at,
            updated_at: self.updated_at,
            contacts,
            interviews,
            documents,
        })
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn create_user(&self, user: &User) -> Result<User, AppError> {
        let created = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (id, email, password_hash, first_name, last_name, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {USER_COLUMNS}"
        ))
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.created_at)
        .bind(user.updated_at)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(created)
    }

    async fn get_user_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(user)
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(user)
    }

    async fn update_user(
        &self,
        id: Uuid,
        update: &ProfileUpdate,
    ) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET \
                first_name = COALESCE($2, first_name), \
                last_name = COALESCE($3, last_name), \
                email = COALESCE($4, email), \
                updated_at = NOW() \
             WHERE id = $1 RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .bind(&update.first_name)
        .bind(&update.last_name)
        .bind(&update.email)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(user)
    }
}

#[async_trait]
impl ApplicationStore for PgStore {
    async fn create_application(&self, application: &Application) -> Result<Application, AppError> {
        let row = sqlx::query_as::<_, ApplicationRow>(&format!(
            "INSERT INTO applications \
                (id, user_id, company, position, location, job_description, status, \
                 application_date, salary, job_url, notes, source, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14) \
             RETURNING {APPLICATION_COLUMNS}"
        ))
        .bind(application.id)
        .bind(application.user_id)
        .bind(&application.company)
        .bind(&application.position)
        .bind(&application.location)
        .bind(&application.job_description)
        .bind(application.status.as_str())
        .bind(application.application_date)
        .bind(&application.salary)
        .bind(&application.job_url)
        .bind(&application.notes)
        .bind(&application.source)
        .bind(application.created_at)
        .bind(application.updated_at)
        .fetch_one(self.pool.as_ref())
        .await?;

        self.fetch_children(row).await
    }

    async fn list_applications(
        &self,
        user_id: Uuid,
        filter: &ApplicationFilter,
    ) -> Result<Vec<Application>, AppError> {
        let rows = sqlx::query_as::<_, ApplicationRow>(&format!(
            "SELECT {APPLICATION_COLUMNS} FROM applications \
             WHERE user_id = $1 \
               AND ($2::text IS NULL OR status = $2) \
               AND ($3::text IS NULL OR company ILIKE '%' || $3 || '%') \
               AND ($4::text IS NULL OR position ILIKE '%' || $4 || '%') \
             ORDER BY application_date DESC"
        ))
        .bind(user_id)
        .bind(filter.status.map(|s| s.as_str()))
        .bind(&filter.company)
        .bind(&filter.position)
        .fetch_all(self.pool.as_ref())
        .await?;

        let mut applications = Vec::with_capacity(rows.len());
        for row in rows {
            applications.push(self.fetch_children(row).await?);
        }
        Ok(applications)
    }

    async fn get_application(
        &self,
        user_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Application>, AppError> {
        let row = sqlx::query_as::<_, ApplicationRow>(&format!(
            "SELECT {APPLICATION_COLUMNS} FROM applications WHERE id = $1 AND user_id = $2"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        match row {
            Some(row) => Ok(Some(self.fetch_children(row).await?)),
            None => Ok(None),
        }
    }

    async fn update_application(
        &self,
        user_id: Uuid,
        id: Uuid,
        changes: &ApplicationChanges,
    ) -> Result<Option<Application>, AppError> {
        let row = sqlx::query_as::<_, ApplicationRow>(&format!(
            "UPDATE applications SET \
                company = COALESCE($3, company), \
                position = COALESCE($4, position), \
                location = COALESCE($5, location), \
                job_description = COALESCE($6, job_description), \
                status = COALESCE($7, status), \
                application_date = COALESCE($8, application_date), \
                salary = COALESCE($9, salary), \
                job_url = COALESCE($10, job_url), \
                notes = COALESCE($11, notes), \
                source = COALESCE($12, source), \
                updated_at = NOW() \
             WHERE id = $1 AND user_id = $2 RETURNING {APPLICATION_COLUMNS}"
        ))
        .bind(id)
        .bind(user_id)
        .bind(&changes.company)
        .bind(&changes.position)
        .bind(&changes.location)
        .bind(&changes.job_description)
        .bind(changes.status.map(|s| s.as_str()))
        .bind(changes.application_date)
        .bind(&changes.salary)
        .bind(&changes.job_url)
        .bind(&changes.notes)
        .bind(&changes.source)
        .fetch_optional(self.pool.as_ref())
        .await?;

        match row {
            Some(row) => Ok(Some(self.fetch_children(row).await?)),
            None => Ok(None),
        }
    }

    async fn delete_application(&self, user_id: Uuid, id: Uuid) -> Result<bool, AppError> {
        // Child rows cascade via the schema.
        let result = sqlx::query("DELETE FROM applications WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn application_stats(&self, user_id: Uuid) -> Result<ApplicationStats, AppError> {
        let rows = sqlx::query_as::<_, (String, i64)>(
            "SELECT status, COUNT(*) FROM applications WHERE user_id = $1 GROUP BY status",
        )
        .bind(user_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        let mut stats = ApplicationStats {
            total: 0,
            by_status: std::collections::HashMap::new(),
        };
        for (status, count) in rows {
            let status: ApplicationStatus = status
                .parse()
                .map_err(|e: String| AppError::Database(DatabaseError::Query(e)))?;
            stats.total += count as u64;
            stats.by_status.insert(status, count as u64);
        }
        Ok(stats)
    }
}
