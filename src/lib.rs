pub mod applications;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod response;

use std::sync::Arc;

use actix_web::{web, HttpResponse};

pub use crate::config::Settings;
pub use error::AppError;
pub type Result<T> = std::result::Result<T, AppError>;

pub use applications::ApplicationService;
pub use auth::{AuthService, AuthenticatedUser, TokenManager};
pub use db::{MemoryStore, PgStore};

use db::store::{ApplicationStore, UserStore};

/// Health check endpoint handler
/// Returns a JSON response with API status and timestamp
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "message": "Job Tracker API is running",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Application state shared across all components
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Settings>,
    pub tokens: Arc<TokenManager>,
    pub auth: Arc<AuthService>,
    pub applications: Arc<ApplicationService>,
}

impl AppState {
    /// Builds state for the configured database driver, connecting to
    /// PostgreSQL unless the `memory` driver is selected.
    pub async fn new(config: Settings) -> Result<Self> {
        match config.database.driver.as_str() {
            "postgres" => {
                let store =
                    PgStore::connect(&config.database.url, config.database.max_connections)
                        .await?;
                Ok(Self::with_store(config, Arc::new(store)))
            }
            "memory" => Ok(Self::with_store(config, Arc::new(MemoryStore::new()))),
            other => Err(AppError::Config(format!(
                "Unknown database driver: {}",
                other
            ))),
        }
    }

    pub fn with_store<S>(config: Settings, store: Arc<S>) -> Self
    where
        S: UserStore + ApplicationStore + 'static,
    {
        let tokens = Arc::new(TokenManager::new(
            &config.auth.jwt_secret,
            config.auth.token_expiry_days,
        ));
        let users: Arc<dyn UserStore> = store.clone();
        let records: Arc<dyn ApplicationStore> = store;
        let auth = Arc::new(AuthService::new(
            users,
            tokens.clone(),
            config.auth.hash_cost,
        ));
        let applications = Arc::new(ApplicationService::new(records));

        Self {
            config: Arc::new(config),
            tokens,
            auth,
            applications,
        }
    }
}

/// The full route table. Registered by the binary and by the integration
/// tests so both exercise the same paths.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/health", web::get().to(health_check))
        .service(
            web::scope("/api/auth")
                .route("/register", web::post().to(auth::handlers::register))
                .route("/login", web::post().to(auth::handlers::login))
                .route("/profile", web::get().to(auth::handlers::get_profile))
                .route("/profile", web::put().to(auth::handlers::update_profile)),
        )
        .service(
            web::scope("/api/applications")
                .route("", web::post().to(applications::handlers::create))
                .route("", web::get().to(applications::handlers::list))
                // Registered ahead of the id route so "stats" is not parsed
                // as an application id.
                .route("/stats", web::get().to(applications::handlers::stats))
                .route("/{id}", web::get().to(applications::handlers::get))
                .route("/{id}", web::put().to(applications::handlers::update))
                .route("/{id}", web::delete().to(applications::handlers::delete)),
        );
}
