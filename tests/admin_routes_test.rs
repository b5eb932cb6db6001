// ABOUTME: Integration tests for admin registration, login and password flows
// ABOUTME: Exercises the service layer against an in-memory database
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use folio_server::{
    auth,
    database::AdminFilter,
    errors::ErrorCode,
    models::{AdminRole, PrincipalKind},
    pagination::PageQuery,
    routes::admin::{AdminAuthService, RegisterAdminRequest},
    routes::{ChangePasswordRequest, LoginRequest},
};

fn register_request(email: &str, username: &str) -> RegisterAdminRequest {
    RegisterAdminRequest {
        username: username.into(),
        email: email.into(),
        password: "secret1".into(),
        first_name: "Alice".into(),
        last_name: "Smith".into(),
        role: None,
    }
}

async fn service() -> (
    AdminAuthService,
    std::sync::Arc<folio_server::database::Database>,
    std::sync::Arc<folio_server::auth::AuthManager>,
) {
    let database = common::create_test_database().await.unwrap();
    let auth_manager = common::create_test_auth_manager();
    (
        AdminAuthService::new(database.clone(), auth_manager.clone()),
        database,
        auth_manager,
    )
}

#[tokio::test]
async fn test_register_issues_token_and_hashes_password() {
    let (service, database, auth_manager) = service().await;

    let data = service
        .register(register_request("a@x.com", "alice"))
        .await
        .unwrap();

    assert_eq!(data.admin.email, "a@x.com");
    assert_eq!(data.admin.username, "alice");
    assert!(!data.token.is_empty());

    // Registration implies login: the token validates as an admin token
    let claims = auth_manager.validate(&data.token).unwrap();
    assert_eq!(claims.kind, PrincipalKind::Admin);
    assert_eq!(claims.role, "admin");

    // The stored secret is never the plaintext, and verifies against it
    let stored = database
        .get_admin_by_email("a@x.com")
        .await
        .unwrap()
        .unwrap();
    assert_ne!(stored.password_hash, "secret1");
    assert!(auth::verify_password("secret1", &stored.password_hash)
        .await
        .unwrap());
}

#[tokio::test]
async fn test_register_rejects_blank_fields_and_bad_email() {
    let (service, _database, _auth) = service().await;

    let mut request = register_request("a@x.com", "alice");
    request.first_name = "  ".into();
    let err = service.register(request).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::MissingRequiredField);

    let request = register_request("not-an-email", "alice");
    let err = service.register(request).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);

    let mut request = register_request("a@x.com", "alice");
    request.password = "short".into();
    let err = service.register(request).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);
}

#[tokio::test]
async fn test_duplicate_registration_conflicts_once() {
    let (service, database, _auth) = service().await;

    service
        .register(register_request("a@x.com", "alice"))
        .await
        .unwrap();

    // Same email, different username
    let err = service
        .register(register_request("a@x.com", "alice2"))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::Conflict);

    // Same username, different email
    let err = service
        .register(register_request("a2@x.com", "alice"))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::Conflict);

    // Exactly one stored principal survives
    assert_eq!(database.count_admins().await.unwrap(), 1);
}

#[tokio::test]
async fn test_login_generic_message_and_last_login_update() {
    let (service, database, _auth) = service().await;

    service
        .register(register_request("a@x.com", "alice"))
        .await
        .unwrap();

    // Wrong password and unknown email produce the same message
    let wrong_password = service
        .login(LoginRequest {
            email: "a@x.com".into(),
            password: "wrong-password".into(),
        })
        .await
        .unwrap_err();
    let unknown_email = service
        .login(LoginRequest {
            email: "nobody@x.com".into(),
            password: "secret1".into(),
        })
        .await
        .unwrap_err();
    assert_eq!(wrong_password.code, ErrorCode::AuthInvalid);
    assert_eq!(unknown_email.code, ErrorCode::AuthInvalid);
    assert_eq!(wrong_password.message, unknown_email.message);

    // Successful login updates last_login and returns a token
    let before = database
        .get_admin_by_email("a@x.com")
        .await
        .unwrap()
        .unwrap();
    assert!(before.last_login.is_none());

    let data = service
        .login(LoginRequest {
            email: "a@x.com".into(),
            password: "secret1".into(),
        })
        .await
        .unwrap();
    assert!(!data.token.is_empty());

    let after = database
        .get_admin_by_email("a@x.com")
        .await
        .unwrap()
        .unwrap();
    assert!(after.last_login.is_some());
}

#[tokio::test]
async fn test_login_blocked_for_deactivated_account() {
    let (service, database, _auth) = service().await;

    let data = service
        .register(register_request("a@x.com", "alice"))
        .await
        .unwrap();

    database
        .set_admin_active(data.admin.id, false)
        .await
        .unwrap();

    // Correct password, deactivated account: distinct 401 message
    let err = service
        .login(LoginRequest {
            email: "a@x.com".into(),
            password: "secret1".into(),
        })
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::PrincipalInactive);
    assert!(err.message.contains("deactivated"));
}

#[tokio::test]
async fn test_change_password_requires_current_secret() {
    let (service, database, _auth) = service().await;

    let data = service
        .register(register_request("a@x.com", "alice"))
        .await
        .unwrap();
    let admin_id = data.admin.id;

    // Wrong current password
    let err = service
        .change_password(
            admin_id,
            ChangePasswordRequest {
                current_password: "wrong".into(),
                new_password: "newsecret".into(),
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);

    // Too-short new password
    let err = service
        .change_password(
            admin_id,
            ChangePasswordRequest {
                current_password: "secret1".into(),
                new_password: "short".into(),
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);

    // Valid change: old password stops working, new one logs in
    service
        .change_password(
            admin_id,
            ChangePasswordRequest {
                current_password: "secret1".into(),
                new_password: "newsecret".into(),
            },
        )
        .await
        .unwrap();

    let stored = database.get_admin(admin_id).await.unwrap().unwrap();
    assert!(auth::verify_password("newsecret", &stored.password_hash)
        .await
        .unwrap());
    assert!(!auth::verify_password("secret1", &stored.password_hash)
        .await
        .unwrap());
}

#[tokio::test]
async fn test_super_admin_role_is_respected_on_registration() {
    let (service, _database, auth_manager) = service().await;

    let mut request = register_request("root@x.com", "root");
    request.role = Some("super_admin".into());

    let data = service.register(request).await.unwrap();
    assert_eq!(data.admin.role, AdminRole::SuperAdmin);

    let claims = auth_manager.validate(&data.token).unwrap();
    assert_eq!(claims.role, "super_admin");
}

#[tokio::test]
async fn test_list_admins_filters_and_pagination() {
    let (service, database, _auth) = service().await;

    for i in 0..5 {
        service
            .register(register_request(&format!("admin{i}@x.com"), &format!("admin{i}")))
            .await
            .unwrap();
    }
    common::seed_admin(&database, "root@x.com", AdminRole::SuperAdmin)
        .await
        .unwrap();

    // Role filter
    let (supers, total) = database
        .list_admins(
            &AdminFilter {
                role: Some(AdminRole::SuperAdmin),
                ..AdminFilter::default()
            },
            PageQuery::default(),
        )
        .await
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(supers[0].email, "root@x.com");

    // Search filter
    let (matches, total) = database
        .list_admins(
            &AdminFilter {
                search: Some("admin3".into()),
                ..AdminFilter::default()
            },
            PageQuery::default(),
        )
        .await
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(matches[0].username, "admin3");

    // Pagination
    let page = PageQuery {
        page: Some(2),
        limit: Some(2),
    };
    let (second_page, total) = database
        .list_admins(&AdminFilter::default(), page)
        .await
        .unwrap();
    assert_eq!(total, 6);
    assert_eq!(second_page.len(), 2);
}
