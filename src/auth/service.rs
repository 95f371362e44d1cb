use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::auth::password::{hash_password, verify_password};
use crate::auth::token::TokenManager;
use crate::db::models::{ProfileUpdate, User, UserView};
use crate::db::store::UserStore;
use crate::error::AppError;

/// Orchestrates registration, login and profile access. Emails are lowercased
/// before every lookup and write so uniqueness is case-insensitive.
pub struct AuthService {
    store: Arc<dyn UserStore>,
    tokens: Arc<TokenManager>,
    hash_cost: u32,
}

impl AuthService {
    pub fn new(store: Arc<dyn UserStore>, tokens: Arc<TokenManager>, hash_cost: u32) -> Self {
        Self {
            store,
            tokens,
            hash_cost,
        }
    }

    pub async fn register(
        &self,
        email: &str,
        password: &str,
        first_name: Option<&str>,
        last_name: Option<&str>,
    ) -> Result<(UserView, String), AppError> {
        let email = normalize_email(email)?;
        if password.len() < 6 {
            return Err(AppError::Validation(
                "Password must be at least 6 characters long".to_string(),
            ));
        }

        if self.store.get_user_by_email(&email).await?.is_some() {
            return Err(AppError::DuplicateEmail);
        }

        let password_hash = hash_password(password, self.hash_cost)?;
        let user = User::new(
            email,
            password_hash,
            first_name.map(str::to_string),
            last_name.map(str::to_string),
        );
        let user = self.store.create_user(&user).await.map_err(|e| match e {
            // Lost the race against a concurrent registration.
            AppError::Database(crate::error::DatabaseError::Duplicate) => AppError::DuplicateEmail,
            other => other,
        })?;

        info!("Registered user {}", user.id);
        let token = self.tokens.issue(&user)?;
        Ok((user.into(), token))
    }

    /// Unknown email and wrong password produce the same error, so a caller
    /// cannot probe which addresses are registered.
    pub async fn login(&self, email: &str, password: &str) -> Result<(UserView, String), AppError> {
        let email = normalize_email(email)?;

        let user = self
            .store
            .get_user_by_email(&email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if !verify_password(password, &user.password_hash)? {
            return Err(AppError::InvalidCredentials);
        }

        info!("User {} logged in", user.id);
        let token = self.tokens.issue(&user)?;
        Ok((user.into(), token))
    }

    pub async fn profile(&self, user_id: Uuid) -> Result<UserView, AppError> {
        let user = self
            .store
            .get_user_by_id(user_id)
            .await?
            .ok_or(AppError::NotFound("User"))?;
        Ok(user.into())
    }

    pub async fn update_profile(
        &self,
        user_id: Uuid,
        mut update: ProfileUpdate,
    ) -> Result<UserView, AppError> {
        if let Some(email) = update.email.take() {
            let email = normalize_email(&email)?;
            if let Some(existing) = self.store.get_user_by_email(&email).await? {
                if existing.id != user_id {
                    return Err(AppError::DuplicateEmail);
                }
            }
            update.email = Some(email);
        }

        let user = self
            .store
            .update_user(user_id, &update)
            .await?
            .ok_or(AppError::NotFound("User"))?;
        Ok(user.into())
    }
}

fn normalize_email(email: &str) -> Result<String, AppError> {
    let email = email.trim().to_lowercase();
    let valid = email.contains('@')
        && !email.starts_with('@')
        && !email.ends_with('@')
        && !email.contains(char::is_whitespace);
    if !valid {
        return Err(AppError::Validation(
            "Please provide a valid email".to_string(),
        ));
    }
    Ok(email)
}
