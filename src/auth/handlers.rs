use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::auth::extractor::AuthenticatedUser;
use crate::db::models::{ProfileUpdate, UserView};
use crate::error::AppError;
use crate::response::ApiResponse;
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthPayload {
    pub user: UserView,
    pub token: String,
}

pub async fn register(
    req: web::Json<RegisterRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    info!("Received registration request for email: {}", req.email);

    match state
        .auth
        .register(
            &req.email,
            &req.password,
            req.first_name.as_deref(),
            req.last_name.as_deref(),
        )
        .await
    {
        Ok((user, token)) => {
            info!("Registration successful for email: {}", user.email);
            Ok(HttpResponse::Created().json(ApiResponse::ok(AuthPayload { user, token })))
        }
        Err(e) => {
            error!("Registration failed for email: {}: {}", req.email, e);
            Err(e)
        }
    }
}

pub async fn login(
    req: web::Json<LoginRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    info!("Received login request for email: {}", req.email);

    match state.auth.login(&req.email, &req.password).await {
        Ok((user, token)) => {
            info!("Login successful for email: {}", user.email);
            Ok(HttpResponse::Ok().json(ApiResponse::ok(AuthPayload { user, token })))
        }
        Err(e) => {
            error!("Login failed for email: {}: {}", req.email, e);
            Err(e)
        }
    }
}

pub async fn get_profile(
    identity: AuthenticatedUser,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user = state.auth.profile(identity.id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(user)))
}

pub async fn update_profile(
    identity: AuthenticatedUser,
    req: web::Json<ProfileUpdate>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user = state
        .auth
        .update_profile(identity.id, req.into_inner())
        .await?;
    info!("Profile updated for user {}", identity.id);
    Ok(HttpResponse::Ok().json(ApiResponse::ok(user)))
}
