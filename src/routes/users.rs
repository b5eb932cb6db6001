// ABOUTME: User account route handlers: registration, login, profile
// ABOUTME: The profile route accepts either token kind through the generic gate
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

//! User routes

use crate::{
    auth::{self, AuthManager, MIN_PASSWORD_LENGTH},
    database::Database,
    errors::{AppError, AppResult, ErrorCode},
    models::{PrincipalKind, User, UserInfo, UserRole},
    routes::{is_valid_email, map_insert_error, LoginRequest},
    server::ServerResources,
};
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};

/// Minimum accepted username length
const MIN_USERNAME_LENGTH: usize = 3;

/// User registration request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUserRequest {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    pub password: String,
    /// Defaults to `user`
    pub role: Option<String>,
}

/// Registration/login response payload
#[derive(Debug, Serialize)]
pub struct UserAuthData {
    pub user: UserInfo,
    pub token: String,
}

/// Authentication service for the user collection
#[derive(Clone)]
pub struct UserAuthService {
    database: Arc<Database>,
    auth_manager: Arc<AuthManager>,
}

impl UserAuthService {
    /// Create the service over shared database and auth manager
    #[must_use]
    pub fn new(database: Arc<Database>, auth_manager: Arc<AuthManager>) -> Self {
        Self {
            database,
            auth_manager,
        }
    }

    /// Handle user registration; a token is issued immediately on success.
    ///
    /// # Errors
    ///
    /// Fails on blank required fields, malformed email, short username or
    /// password, duplicate email/username, or database failure.
    pub async fn register(&self, request: RegisterUserRequest) -> AppResult<UserAuthData> {
        info!("User registration attempt for email: {}", request.email);

        let required = [
            &request.first_name,
            &request.last_name,
            &request.username,
            &request.email,
            &request.password,
        ];
        if required.iter().any(|f| f.trim().is_empty()) {
            return Err(AppError::missing_field(
                "All fields (firstName, lastName, username, email, password) are required",
            ));
        }

        if request.password.len() < MIN_PASSWORD_LENGTH {
            return Err(AppError::invalid_input(format!(
                "Password must be at least {MIN_PASSWORD_LENGTH} characters long"
            )));
        }
        if request.username.trim().len() < MIN_USERNAME_LENGTH {
            return Err(AppError::invalid_input(format!(
                "Username must be at least {MIN_USERNAME_LENGTH} characters long"
            )));
        }
        if !is_valid_email(&request.email) {
            return Err(AppError::invalid_input("Please enter a valid email"));
        }

        let role = match request.role.as_deref() {
            None | Some("") => UserRole::User,
            Some(raw) => raw
                .parse()
                .map_err(|_| AppError::invalid_input(format!("Invalid user role: {raw}")))?,
        };

        // Name the colliding field when we can see it before the insert
        if let Some(existing) = self
            .database
            .find_user_by_email_or_username(&request.email, &request.username)
            .await?
        {
            let field = if existing.email == request.email.trim().to_lowercase() {
                "email"
            } else {
                "username"
            };
            return Err(AppError::conflict(format!(
                "User with this {field} already exists"
            )));
        }

        let password_hash = auth::hash_password(&request.password)?;
        let user = User::new(
            request.first_name,
            request.last_name,
            request.username,
            request.email,
            password_hash,
            role,
        );

        self.database
            .create_user(&user)
            .await
            .map_err(|e| map_insert_error(e, "User with this email or username already exists"))?;

        let token = self
            .auth_manager
            .issue(user.id, user.role.as_str(), PrincipalKind::User)?;

        info!("User registered successfully: {} ({})", user.email, user.id);

        Ok(UserAuthData {
            user: user.info(),
            token,
        })
    }

    /// Handle user login with the generic-credentials failure policy.
    ///
    /// # Errors
    ///
    /// Fails with a generic credentials error, a deactivated-account error,
    /// or a database failure.
    pub async fn login(&self, request: LoginRequest) -> AppResult<UserAuthData> {
        info!("User login attempt for email: {}", request.email);

        if request.email.trim().is_empty() || request.password.is_empty() {
            return Err(AppError::missing_field("Email and password are required"));
        }

        let user = self
            .database
            .get_user_by_email(&request.email)
            .await?
            .ok_or_else(|| AppError::auth_invalid("Invalid email or password"))?;

        if !user.is_active {
            warn!("Login blocked for deactivated user: {}", request.email);
            return Err(AppError::new(
                ErrorCode::PrincipalInactive,
                "Account is deactivated. Please contact support.",
            ));
        }

        let is_valid = auth::verify_password(&request.password, &user.password_hash).await?;
        if !is_valid {
            warn!("Invalid password for user: {}", request.email);
            return Err(AppError::auth_invalid("Invalid email or password"));
        }

        let now = Utc::now();
        self.database.update_user_last_login(user.id, now).await?;

        let token = self
            .auth_manager
            .issue(user.id, user.role.as_str(), PrincipalKind::User)?;

        info!("User logged in successfully: {} ({})", user.email, user.id);

        let mut info = user.info();
        info.last_login = Some(now);

        Ok(UserAuthData { user: info, token })
    }
}

/// User routes handler
pub struct UserRoutes;

impl UserRoutes {
    /// Create all user routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/v1/user/register", post(Self::handle_register))
            .route("/api/v1/user/login", post(Self::handle_login))
            .route("/api/v1/user/profile", get(Self::handle_get_profile))
            .with_state(resources)
    }

    fn service(resources: &Arc<ServerResources>) -> UserAuthService {
        UserAuthService::new(
            Arc::clone(&resources.database),
            Arc::clone(&resources.auth_manager),
        )
    }

    /// Handle POST /api/v1/user/register
    async fn handle_register(
        State(resources): State<Arc<ServerResources>>,
        Json(request): Json<RegisterUserRequest>,
    ) -> Result<Response, AppError> {
        let data = Self::service(&resources).register(request).await?;

        Ok((
            StatusCode::CREATED,
            Json(json!({
                "success": true,
                "message": "User registered successfully",
                "data": data,
            })),
        )
            .into_response())
    }

    /// Handle POST /api/v1/user/login
    async fn handle_login(
        State(resources): State<Arc<ServerResources>>,
        Json(request): Json<LoginRequest>,
    ) -> Result<Response, AppError> {
        let data = Self::service(&resources).login(request).await?;

        Ok((
            StatusCode::OK,
            Json(json!({
                "success": true,
                "message": "Login successful",
                "data": data,
            })),
        )
            .into_response())
    }

    /// Handle GET /api/v1/user/profile.
    ///
    /// Accepts either token kind; the profile returned matches the
    /// authenticated principal's own collection.
    async fn handle_get_profile(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let context = resources.any_gate.authenticate(&headers).await?;

        let profile = match context.kind {
            PrincipalKind::User => {
                let user = resources
                    .database
                    .get_user(context.id)
                    .await
                    .map_err(|e| AppError::database(e.to_string()))?
                    .ok_or_else(|| AppError::not_found("User"))?;
                json!({ "user": user.info() })
            }
            PrincipalKind::Admin => {
                let admin = resources
                    .database
                    .get_admin(context.id)
                    .await
                    .map_err(|e| AppError::database(e.to_string()))?
                    .ok_or_else(|| AppError::not_found("Admin"))?;
                json!({ "admin": admin.info() })
            }
        };

        Ok((
            StatusCode::OK,
            Json(json!({ "success": true, "data": profile })),
        )
            .into_response())
    }
}
