use std::future::{ready, Ready};

use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use uuid::Uuid;

use crate::error::AppError;
use crate::AppState;

/// Identity attached to a request that presented a valid bearer token.
/// Extracting it is the authentication gate: handlers that take an
/// `AuthenticatedUser` argument never run for unauthenticated requests.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub id: Uuid,
    pub email: String,
}

impl FromRequest for AuthenticatedUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

/// Pure gate: verifies `Authorization: Bearer <token>` against the process
/// token manager and resolves the claims to an identity. A missing header,
/// a malformed value and a failed verification all yield the same 401.
fn authenticate(req: &HttpRequest) -> Result<AuthenticatedUser, AppError> {
    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or_else(|| AppError::Internal("Application state not configured".to_string()))?;

    let token = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or(AppError::Unauthorized)?;

    let claims = state.tokens.verify(token)?;

    Ok(AuthenticatedUser {
        id: claims.user_id()?,
        email: claims.email,
    })
}
