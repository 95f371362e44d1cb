use actix_web::{test, web, App};
use chrono::DateTime;
use jobtrack_server::{routes, AppState, MemoryStore, Settings};
use std::sync::Arc;

#[actix_web::test]
async fn test_health_check() {
    let mut config = Settings::new().expect("Failed to load settings");
    config.database.driver = "memory".to_string();
    let state = web::Data::new(AppState::with_store(config, Arc::new(MemoryStore::new())));

    let app = test::init_service(App::new().app_data(state).configure(routes)).await;

    let req = test::TestRequest::get().uri("/api/health").to_request();
    let resp = test::call_service(&app, req).await;

    assert!(resp.status().is_success());

    let body = test::read_body(resp).await;
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(json["success"], true);
    assert_eq!(json["message"], "Job Tracker API is running");
    assert!(DateTime::parse_from_rfc3339(json["timestamp"].as_str().unwrap()).is_ok());
}
