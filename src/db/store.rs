use async_trait::async_trait;
use uuid::Uuid;

use crate::db::models::{
    Application, ApplicationChanges, ApplicationFilter, ApplicationStats, ProfileUpdate, User,
};
use crate::error::AppError;

/// Persistence seam for user records. Lookups return `None` rather than an
/// error; callers decide what absence means.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn create_user(&self, user: &User) -> Result<User, AppError>;

    async fn get_user_by_id(&self, id: Uuid) -> Result<Option<User>, AppError>;

    /// Expects an already-lowercased email.
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    async fn update_user(
        &self,
        id: Uuid,
        update: &ProfileUpdate,
    ) -> Result<Option<User>, AppError>;
}

/// Persistence seam for application records. Every operation is scoped by the
/// owning user id; a record belonging to someone else is indistinguishable
/// from one that does not exist.
#[async_trait]
pub trait ApplicationStore: Send + Sync {
    async fn create_application(&self, application: &Application) -> Result<Application, AppError>;

    /// Filtered, ordered by application date descending.
    async fn list_applications(
        &self,
        user_id: Uuid,
        filter: &ApplicationFilter,
    ) -> Result<Vec<Application>, AppError>;

    async fn get_application(
        &self,
        user_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Application>, AppError>;

    async fn update_application(
        &self,
        user_id: Uuid,
        id: Uuid,
        changes: &ApplicationChanges,
    ) -> Result<Option<Application>, AppError>;

    /// Returns whether a record was deleted. Child records go with it.
    async fn delete_application(&self, user_id: Uuid, id: Uuid) -> Result<bool, AppError>;

    async fn application_stats(&self, user_id: Uuid) -> Result<ApplicationStats, AppError>;
}
