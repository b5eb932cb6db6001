// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides in-memory database, auth manager, and principal creation helpers
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate
)]

//! Shared test utilities for `folio_server` integration tests

use anyhow::Result;
use folio_server::{
    auth::{self, AuthManager},
    database::Database,
    models::{Admin, AdminRole, Permission, User, UserRole},
};
use std::sync::{Arc, Once};

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_test_writer()
            .init();
    });
}

/// Standard in-memory test database
pub async fn create_test_database() -> Result<Arc<Database>> {
    init_test_logging();
    let database = Arc::new(Database::new("sqlite::memory:").await?);
    Ok(database)
}

/// Test authentication manager over a fixed secret
pub fn create_test_auth_manager() -> Arc<AuthManager> {
    Arc::new(AuthManager::new(b"integration-test-signing-secret"))
}

/// Create and persist an admin with the given role; password is "secret1"
pub async fn seed_admin(database: &Database, email: &str, role: AdminRole) -> Result<Admin> {
    let username = email.split('@').next().unwrap_or("admin").to_owned();
    let admin = Admin::new(
        username,
        email.to_owned(),
        auth::hash_password("secret1").map_err(|e| anyhow::anyhow!(e.to_string()))?,
        "Test".into(),
        "Admin".into(),
        role,
    );
    database.create_admin(&admin).await?;
    Ok(admin)
}

/// Create and persist an admin with a restricted permission set
pub async fn seed_admin_with_permissions(
    database: &Database,
    email: &str,
    permissions: Vec<Permission>,
) -> Result<Admin> {
    let username = email.split('@').next().unwrap_or("admin").to_owned();
    let mut admin = Admin::new(
        username,
        email.to_owned(),
        auth::hash_password("secret1").map_err(|e| anyhow::anyhow!(e.to_string()))?,
        "Test".into(),
        "Admin".into(),
        AdminRole::Admin,
    );
    admin.permissions = permissions;
    database.create_admin(&admin).await?;
    Ok(admin)
}

/// Create and persist a user; password is "secret1"
pub async fn seed_user(database: &Database, email: &str) -> Result<User> {
    let username = email.split('@').next().unwrap_or("user").to_owned();
    let user = User::new(
        "Test".into(),
        "User".into(),
        username,
        email.to_owned(),
        auth::hash_password("secret1").map_err(|e| anyhow::anyhow!(e.to_string()))?,
        UserRole::User,
    );
    database.create_user(&user).await?;
    Ok(user)
}

/// Bearer headers carrying the given token
pub fn bearer_headers(token: &str) -> axum::http::HeaderMap {
    let mut headers = axum::http::HeaderMap::new();
    headers.insert(
        "authorization",
        format!("Bearer {token}").parse().expect("valid header"),
    );
    headers
}
