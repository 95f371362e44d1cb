use actix_web::{web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::extractor::AuthenticatedUser;
use crate::db::models::{ApplicationUpdate, NewApplication};
use crate::error::AppError;
use crate::response::ApiResponse;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
    pub company: Option<String>,
    pub position: Option<String>,
}

pub async fn create(
    identity: AuthenticatedUser,
    req: web::Json<NewApplication>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let application = state
        .applications
        .create(identity.id, req.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::ok(application)))
}

pub async fn list(
    identity: AuthenticatedUser,
    query: web::Query<ListQuery>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let query = query.into_inner();
    let applications = state
        .applications
        .list(
            identity.id,
            query.status.as_deref(),
            query.company,
            query.position,
        )
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(applications)))
}

pub async fn stats(
    identity: AuthenticatedUser,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let stats = state.applications.stats(identity.id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(stats)))
}

pub async fn get(
    identity: AuthenticatedUser,
    path: web::Path<Uuid>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let application = state
        .applications
        .get(identity.id, path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(application)))
}

pub async fn update(
    identity: AuthenticatedUser,
    path: web::Path<Uuid>,
    req: web::Json<ApplicationUpdate>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let application = state
        .applications
        .update(identity.id, path.into_inner(), req.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(application)))
}

pub async fn delete(
    identity: AuthenticatedUser,
    path: web::Path<Uuid>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    state
        .applications
        .delete(identity.id, path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::message("Application deleted successfully")))
}
