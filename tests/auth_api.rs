use actix_web::{test, web, App};
use jobtrack_server::{routes, AppState, MemoryStore, Settings};
use serde_json::json;
use std::sync::Arc;

fn test_state() -> web::Data<AppState> {
    let mut config = Settings::new().expect("Failed to load settings");
    config.database.driver = "memory".to_string();
    config.auth.hash_cost = 4; // bcrypt minimum cost, fast enough for tests
    web::Data::new(AppState::with_store(config, Arc::new(MemoryStore::new())))
}

#[actix_web::test]
async fn test_register_and_login() {
    let app = test::init_service(
        App::new().app_data(test_state()).configure(routes),
    )
    .await;

    // Test registration
    let register_response = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({
            "email": "test@example.com",
            "password": "password123",
            "firstName": "Test",
            "lastName": "User"
        }))
        .send_request(&app)
        .await;

    assert_eq!(register_response.status(), 201);
    let register_body: serde_json::Value = test::read_body_json(register_response).await;
    assert_eq!(register_body["success"], true);
    assert!(register_body["data"]["token"].is_string());
    assert_eq!(register_body["data"]["user"]["email"], "test@example.com");
    assert_eq!(register_body["data"]["user"]["firstName"], "Test");

    // The user object never carries the password hash
    let user_keys: Vec<_> = register_body["data"]["user"]
        .as_object()
        .unwrap()
        .keys()
        .cloned()
        .collect();
    assert!(user_keys.iter().all(|k| !k.to_lowercase().contains("password")));

    // Test login with a case variant of the registered email
    let login_response = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({
            "email": "TEST@Example.com",
            "password": "password123"
        }))
        .send_request(&app)
        .await;

    assert_eq!(login_response.status(), 200);
    let login_body: serde_json::Value = test::read_body_json(login_response).await;
    assert_eq!(login_body["success"], true);
    assert!(login_body["data"]["token"].is_string());
    assert_eq!(login_body["data"]["user"]["email"], "test@example.com");
}

#[actix_web::test]
async fn test_duplicate_registration() {
    let app = test::init_service(
        App::new().app_data(test_state()).configure(routes),
    )
    .await;

    let payload = json!({
        "email": "test@example.com",
        "password": "password123"
    });

    let first = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(&payload)
        .send_request(&app)
        .await;
    assert_eq!(first.status(), 201);

    // Same address in a different case is still a duplicate
    let second = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({
            "email": "Test@Example.COM",
            "password": "password456"
        }))
        .send_request(&app)
        .await;
    assert_eq!(second.status(), 400);
    let body: serde_json::Value = test::read_body_json(second).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "User with this email already exists");
}

#[actix_web::test]
async fn test_invalid_login() {
    let app = test::init_service(
        App::new().app_data(test_state()).configure(routes),
    )
    .await;

    test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({
            "email": "test@example.com",
            "password": "password123"
        }))
        .send_request(&app)
        .await;

    // Unknown email and wrong password produce the same response
    for payload in [
        json!({"email": "nobody@example.com", "password": "password123"}),
        json!({"email": "test@example.com", "password": "wrongpassword"}),
    ] {
        let response = test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(payload)
            .send_request(&app)
            .await;
        assert_eq!(response.status(), 401);
        let body: serde_json::Value = test::read_body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Invalid credentials");
    }
}

#[actix_web::test]
async fn test_invalid_registration() {
    let app = test::init_service(
        App::new().app_data(test_state()).configure(routes),
    )
    .await;

    // Short password
    let response = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({
            "email": "test@example.com",
            "password": "short"
        }))
        .send_request(&app)
        .await;
    assert_eq!(response.status(), 400);

    // Malformed email
    let response = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({
            "email": "not-an-email",
            "password": "password123"
        }))
        .send_request(&app)
        .await;
    assert_eq!(response.status(), 400);
}

#[actix_web::test]
async fn test_profile_requires_token() {
    let app = test::init_service(
        App::new().app_data(test_state()).configure(routes),
    )
    .await;

    let response = test::TestRequest::get()
        .uri("/api/auth/profile")
        .send_request(&app)
        .await;
    assert_eq!(response.status(), 401);

    let response = test::TestRequest::get()
        .uri("/api/auth/profile")
        .insert_header(("Authorization", "Bearer garbage"))
        .send_request(&app)
        .await;
    assert_eq!(response.status(), 401);
    let body: serde_json::Value = test::read_body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Unauthorized access");
}

#[actix_web::test]
async fn test_profile_round_trip() {
    let app = test::init_service(
        App::new().app_data(test_state()).configure(routes),
    )
    .await;

    let register_response = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({
            "email": "test@example.com",
            "password": "password123",
            "firstName": "Test"
        }))
        .send_request(&app)
        .await;
    let register_body: serde_json::Value = test::read_body_json(register_response).await;
    let token = register_body["data"]["token"].as_str().unwrap().to_string();

    let response = test::TestRequest::get()
        .uri("/api/auth/profile")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .send_request(&app)
        .await;
    assert_eq!(response.status(), 200);
    let body: serde_json::Value = test::read_body_json(response).await;
    assert_eq!(body["data"]["email"], "test@example.com");
    assert_eq!(body["data"]["firstName"], "Test");

    let response = test::TestRequest::put()
        .uri("/api/auth/profile")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .set_json(json!({
            "firstName": "Updated",
            "email": "Renamed@Example.com"
        }))
        .send_request(&app)
        .await;
    assert_eq!(response.status(), 200);
    let body: serde_json::Value = test::read_body_json(response).await;
    assert_eq!(body["data"]["firstName"], "Updated");
    assert_eq!(body["data"]["email"], "renamed@example.com");
}
