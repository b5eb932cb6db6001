// ABOUTME: Integration tests for the auth gate pipeline and authorization guards
// ABOUTME: Covers kind mismatch, deactivation, optional variant and guard purity
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use axum::http::HeaderMap;
use folio_server::{
    errors::ErrorCode,
    middleware::auth::{AuthGate, KindRequirement},
    middleware::guards::{require_any_permission, require_permission, require_role},
    models::{AdminRole, Permission, PrincipalKind},
};
use std::sync::Arc;

#[tokio::test]
async fn test_gate_rejects_missing_token() {
    let database = common::create_test_database().await.unwrap();
    let auth_manager = common::create_test_auth_manager();
    let gate = AuthGate::new(auth_manager, database, KindRequirement::Any);

    let err = gate.authenticate(&HeaderMap::new()).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::AuthRequired);
}

#[tokio::test]
async fn test_gate_rejects_garbage_token() {
    let database = common::create_test_database().await.unwrap();
    let auth_manager = common::create_test_auth_manager();
    let gate = AuthGate::new(auth_manager, database, KindRequirement::Any);

    let err = gate
        .authenticate(&common::bearer_headers("not.a.token"))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::AuthInvalid);
}

#[tokio::test]
async fn test_gate_accepts_x_auth_token_fallback() {
    let database = common::create_test_database().await.unwrap();
    let auth_manager = common::create_test_auth_manager();
    let admin = common::seed_admin(&database, "gate@x.com", AdminRole::Admin)
        .await
        .unwrap();
    let token = auth_manager
        .issue(admin.id, admin.role.as_str(), PrincipalKind::Admin)
        .unwrap();

    let gate = AuthGate::new(auth_manager, database, KindRequirement::Admin);

    let mut headers = HeaderMap::new();
    headers.insert("x-auth-token", token.parse().unwrap());

    let context = gate.authenticate(&headers).await.unwrap();
    assert_eq!(context.id, admin.id);
    assert_eq!(context.email, "gate@x.com");
    assert_eq!(context.kind, PrincipalKind::Admin);
}

#[tokio::test]
async fn test_kind_mismatch_rejected_both_directions() {
    let database = common::create_test_database().await.unwrap();
    let auth_manager = common::create_test_auth_manager();

    let admin = common::seed_admin(&database, "a@x.com", AdminRole::Admin)
        .await
        .unwrap();
    let user = common::seed_user(&database, "u@x.com").await.unwrap();

    let admin_token = auth_manager
        .issue(admin.id, admin.role.as_str(), PrincipalKind::Admin)
        .unwrap();
    let user_token = auth_manager
        .issue(user.id, user.role.as_str(), PrincipalKind::User)
        .unwrap();

    let user_gate = AuthGate::new(
        Arc::clone(&auth_manager),
        Arc::clone(&database),
        KindRequirement::User,
    );
    let admin_gate = AuthGate::new(auth_manager, database, KindRequirement::Admin);

    // Admin token on a user-only gate
    let err = user_gate
        .authenticate(&common::bearer_headers(&admin_token))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::WrongTokenType);

    // User token on an admin-only gate
    let err = admin_gate
        .authenticate(&common::bearer_headers(&user_token))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::WrongTokenType);

    // Matching paths succeed
    assert!(admin_gate
        .authenticate(&common::bearer_headers(&admin_token))
        .await
        .is_ok());
    assert!(user_gate
        .authenticate(&common::bearer_headers(&user_token))
        .await
        .is_ok());
}

#[tokio::test]
async fn test_any_gate_accepts_both_kinds() {
    let database = common::create_test_database().await.unwrap();
    let auth_manager = common::create_test_auth_manager();

    let admin = common::seed_admin(&database, "a@x.com", AdminRole::Admin)
        .await
        .unwrap();
    let user = common::seed_user(&database, "u@x.com").await.unwrap();

    let gate = AuthGate::new(auth_manager.clone(), database, KindRequirement::Any);

    let admin_token = auth_manager
        .issue(admin.id, "admin", PrincipalKind::Admin)
        .unwrap();
    let user_token = auth_manager
        .issue(user.id, "user", PrincipalKind::User)
        .unwrap();

    let admin_ctx = gate
        .authenticate(&common::bearer_headers(&admin_token))
        .await
        .unwrap();
    assert_eq!(admin_ctx.kind, PrincipalKind::Admin);
    assert!(!admin_ctx.permissions.is_empty());

    let user_ctx = gate
        .authenticate(&common::bearer_headers(&user_token))
        .await
        .unwrap();
    assert_eq!(user_ctx.kind, PrincipalKind::User);
    assert!(user_ctx.permissions.is_empty());
}

#[tokio::test]
async fn test_deactivation_invalidates_outstanding_tokens() {
    let database = common::create_test_database().await.unwrap();
    let auth_manager = common::create_test_auth_manager();

    let admin = common::seed_admin(&database, "a@x.com", AdminRole::Admin)
        .await
        .unwrap();
    let token = auth_manager
        .issue(admin.id, admin.role.as_str(), PrincipalKind::Admin)
        .unwrap();

    let gate = AuthGate::new(auth_manager, Arc::clone(&database), KindRequirement::Admin);

    // Token works while the account is active
    assert!(gate
        .authenticate(&common::bearer_headers(&token))
        .await
        .is_ok());

    // Deactivate: the unexpired token must now fail with the inactive error
    database.set_admin_active(admin.id, false).await.unwrap();
    let err = gate
        .authenticate(&common::bearer_headers(&token))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::PrincipalInactive);
}

#[tokio::test]
async fn test_token_for_deleted_principal_fails_with_not_found() {
    let database = common::create_test_database().await.unwrap();
    let auth_manager = common::create_test_auth_manager();

    // Issue a token for a principal that was never stored
    let token = auth_manager
        .issue(uuid::Uuid::new_v4(), "admin", PrincipalKind::Admin)
        .unwrap();

    let gate = AuthGate::new(auth_manager, database, KindRequirement::Admin);
    let err = gate
        .authenticate(&common::bearer_headers(&token))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::PrincipalNotFound);
}

#[tokio::test]
async fn test_optional_gate_swallows_every_failure() {
    let database = common::create_test_database().await.unwrap();
    let auth_manager = common::create_test_auth_manager();

    let user = common::seed_user(&database, "u@x.com").await.unwrap();
    let user_token = auth_manager
        .issue(user.id, "user", PrincipalKind::User)
        .unwrap();

    let gate = AuthGate::new(auth_manager, Arc::clone(&database), KindRequirement::User);

    // No token: no context, no error
    assert!(gate.authenticate_optional(&HeaderMap::new()).await.is_none());

    // Garbage token: swallowed
    assert!(gate
        .authenticate_optional(&common::bearer_headers("junk"))
        .await
        .is_none());

    // Valid token: context attached
    let context = gate
        .authenticate_optional(&common::bearer_headers(&user_token))
        .await
        .unwrap();
    assert_eq!(context.id, user.id);

    // Deactivated principal: swallowed again
    database.set_user_active(user.id, false).await.unwrap();
    assert!(gate
        .authenticate_optional(&common::bearer_headers(&user_token))
        .await
        .is_none());
}

#[tokio::test]
async fn test_guard_scenario_delete_against_read_write_context() {
    let database = common::create_test_database().await.unwrap();
    let auth_manager = common::create_test_auth_manager();

    let admin = common::seed_admin_with_permissions(
        &database,
        "limited@x.com",
        vec![Permission::Read, Permission::Write],
    )
    .await
    .unwrap();
    let token = auth_manager
        .issue(admin.id, "admin", PrincipalKind::Admin)
        .unwrap();

    let gate = AuthGate::new(auth_manager, database, KindRequirement::Admin);
    let context = gate
        .authenticate(&common::bearer_headers(&token))
        .await
        .unwrap();

    // permissions = [read, write]: delete is forbidden with 403
    let err = require_permission(&context, Permission::Delete).unwrap_err();
    assert_eq!(err.code, ErrorCode::PermissionDenied);
    assert_eq!(err.http_status(), axum::http::StatusCode::FORBIDDEN);

    assert!(require_permission(&context, Permission::Write).is_ok());
    assert!(require_any_permission(&context, &[Permission::Read, Permission::Delete]).is_ok());
    assert!(require_role(&context, "admin").is_ok());
    assert!(require_role(&context, "super_admin").is_err());
}
