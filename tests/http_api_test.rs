// ABOUTME: End-to-end tests over the assembled axum router
// ABOUTME: Verifies status codes and response shapes for the main API scenario
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use folio_server::{
    auth::AuthManager,
    config::{AuthConfig, CorsConfig, DatabaseUrl, Environment, LogLevel, ServerConfig},
    database::Database,
    server::{Server, ServerResources},
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn test_config() -> ServerConfig {
    ServerConfig {
        http_port: 0,
        log_level: LogLevel::Warn,
        environment: Environment::Testing,
        database_url: DatabaseUrl::Memory,
        auth: AuthConfig {
            jwt_secret: "integration-test-signing-secret".into(),
        },
        smtp: None,
        cors: CorsConfig {
            allowed_origins: "*".into(),
        },
    }
}

async fn test_router() -> Router {
    common::init_test_logging();
    let config = test_config();
    let database = Database::new("sqlite::memory:").await.unwrap();
    let auth_manager = AuthManager::new(config.auth.jwt_secret.as_bytes());
    let resources = Arc::new(ServerResources::new(
        database,
        auth_manager,
        None,
        Arc::new(config),
    ));
    Server::new(resources).router()
}

async fn send_json(
    router: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }

    let request = match body {
        Some(value) => builder
            .header("content-type", "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

#[tokio::test]
async fn test_health_endpoint_reports_database() {
    let router = test_router().await;

    let (status, body) = send_json(&router, "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "OK");
    assert_eq!(body["database"], "Connected");
}

#[tokio::test]
async fn test_admin_registration_scenario() {
    let router = test_router().await;

    // Register alice: 201, token present, email echoed back
    let (status, body) = send_json(
        &router,
        "POST",
        "/api/v1/admin/register",
        None,
        Some(json!({
            "username": "alice",
            "email": "a@x.com",
            "password": "secret1",
            "firstName": "Alice",
            "lastName": "Smith",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["admin"]["email"], "a@x.com");
    let token = body["data"]["token"].as_str().unwrap().to_owned();
    assert!(!token.is_empty());

    // Login with wrong password: 401, generic message
    let (status, body) = send_json(
        &router,
        "POST",
        "/api/v1/admin/login",
        None,
        Some(json!({ "email": "a@x.com", "password": "wrong" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Invalid credentials");

    // Profile with the registration token works
    let (status, body) = send_json(
        &router,
        "GET",
        "/api/v1/admin/profile",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["admin"]["username"], "alice");
    // The hash never appears in any serialized representation
    assert!(body["data"]["admin"].get("passwordHash").is_none());
    assert!(body["data"]["admin"].get("password_hash").is_none());

    // Duplicate registration: 400 by this API's convention
    let (status, body) = send_json(
        &router,
        "POST",
        "/api/v1/admin/register",
        None,
        Some(json!({
            "username": "alice",
            "email": "a@x.com",
            "password": "secret1",
            "firstName": "Alice",
            "lastName": "Smith",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_missing_token_and_super_admin_guard() {
    let router = test_router().await;

    // No token: 401
    let (status, _) = send_json(&router, "GET", "/api/v1/admin/profile", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Plain admin registering and hitting the super-admin listing: 403
    let (_, body) = send_json(
        &router,
        "POST",
        "/api/v1/admin/register",
        None,
        Some(json!({
            "username": "plain",
            "email": "plain@x.com",
            "password": "secret1",
            "firstName": "Plain",
            "lastName": "Admin",
        })),
    )
    .await;
    let token = body["data"]["token"].as_str().unwrap().to_owned();

    let (status, _) = send_json(&router, "GET", "/api/v1/admin/all", Some(&token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // A super admin passes the same guard
    let (_, body) = send_json(
        &router,
        "POST",
        "/api/v1/admin/register",
        None,
        Some(json!({
            "username": "root",
            "email": "root@x.com",
            "password": "secret1",
            "firstName": "Root",
            "lastName": "Admin",
            "role": "super_admin",
        })),
    )
    .await;
    let root_token = body["data"]["token"].as_str().unwrap().to_owned();

    let (status, body) = send_json(
        &router,
        "GET",
        "/api/v1/admin/all",
        Some(&root_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["admins"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_user_token_rejected_on_admin_route() {
    let router = test_router().await;

    let (_, body) = send_json(
        &router,
        "POST",
        "/api/v1/user/register",
        None,
        Some(json!({
            "firstName": "Bob",
            "lastName": "Jones",
            "username": "bob",
            "email": "b@x.com",
            "password": "secret1",
        })),
    )
    .await;
    let user_token = body["data"]["token"].as_str().unwrap().to_owned();

    // A user-kind token on the admin-only profile route: 401 wrong type
    let (status, body) = send_json(
        &router,
        "GET",
        "/api/v1/admin/profile",
        Some(&user_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("Invalid token type"));

    // The generic profile route accepts it
    let (status, body) = send_json(
        &router,
        "GET",
        "/api/v1/user/profile",
        Some(&user_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["user"]["username"], "bob");
}

#[tokio::test]
async fn test_project_write_requires_token_and_read_is_public() {
    let router = test_router().await;

    // Unauthenticated create: 401
    let (status, _) = send_json(
        &router,
        "POST",
        "/api/v1/portfolio/admin/projects",
        None,
        Some(json!({ "title": "P", "description": "d", "category": "Web App" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Admin creates a project
    let (_, body) = send_json(
        &router,
        "POST",
        "/api/v1/admin/register",
        None,
        Some(json!({
            "username": "alice",
            "email": "a@x.com",
            "password": "secret1",
            "firstName": "Alice",
            "lastName": "Smith",
        })),
    )
    .await;
    let token = body["data"]["token"].as_str().unwrap().to_owned();

    let (status, body) = send_json(
        &router,
        "POST",
        "/api/v1/portfolio/admin/projects",
        Some(&token),
        Some(json!({
            "title": "Shop platform",
            "description": "An online shop",
            "category": "E-commerce",
            "technologies": ["Rust"],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let project_id = body["data"]["id"].as_str().unwrap().to_owned();

    // Public listing sees the published project without any token
    let (status, body) =
        send_json(&router, "GET", "/api/v1/portfolio/projects", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["projects"].as_array().unwrap().len(), 1);

    // Public single view increments the counter
    let uri = format!("/api/v1/portfolio/projects/{project_id}");
    let (status, body) = send_json(&router, "GET", &uri, None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["viewCount"], 1);
}

#[tokio::test]
async fn test_contact_submission_and_admin_management() {
    let router = test_router().await;

    // Public submission persists and reports the new status
    let (status, body) = send_json(
        &router,
        "POST",
        "/api/v1/portfolio/contact",
        None,
        Some(json!({
            "name": "Jane",
            "email": "jane@x.com",
            "subject": "Hello",
            "message": "I need a site",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["status"], "new");
    // No SMTP configured in tests: mail is reported unsent
    assert_eq!(body["data"]["emailSent"], false);
    let message_id = body["data"]["contactId"].as_str().unwrap().to_owned();

    // Missing fields: 400
    let (status, _) = send_json(
        &router,
        "POST",
        "/api/v1/portfolio/contact",
        None,
        Some(json!({ "name": "Jane", "email": "jane@x.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    // Admin marks it read
    let (_, body) = send_json(
        &router,
        "POST",
        "/api/v1/admin/register",
        None,
        Some(json!({
            "username": "alice",
            "email": "a@x.com",
            "password": "secret1",
            "firstName": "Alice",
            "lastName": "Smith",
        })),
    )
    .await;
    let token = body["data"]["token"].as_str().unwrap().to_owned();

    let uri = format!("/api/v1/portfolio/admin/messages/{message_id}/read");
    let (status, body) = send_json(&router, "PATCH", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "read");
    assert!(body["data"]["readAt"].is_string());
    // Tracking fields stay hidden from serialized output
    assert!(body["data"].get("ipAddress").is_none());
}
