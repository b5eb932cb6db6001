// ABOUTME: Admin account route handlers: registration, login, profile, account listing
// ABOUTME: Registration implies login; account listing is super-admin only
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

//! Admin routes
//!
//! Registration and login are public; everything else runs behind the
//! admin-kind gate. `GET /all` additionally requires the `super_admin` role
//! and `GET /dashboard-stats` any of the read/write permissions.

use crate::{
    auth::{self, AuthManager, MIN_PASSWORD_LENGTH},
    database::{AdminFilter, AdminProfileUpdate, Database},
    errors::{AppError, AppResult},
    middleware::guards::{require_any_permission, require_super_admin},
    models::{Admin, AdminInfo, AdminRole, Permission, PrincipalKind},
    pagination::{PageQuery, Pagination},
    routes::{is_valid_email, map_insert_error, ChangePasswordRequest, LoginRequest},
    server::ServerResources,
};
use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};

/// Admin registration request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterAdminRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    /// Defaults to `admin`
    pub role: Option<String>,
}

/// Profile update request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAdminProfileRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub username: Option<String>,
    pub profile_image: Option<String>,
}

/// Listing query for `GET /all`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListAdminsQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub search: Option<String>,
    pub role: Option<String>,
    pub is_active: Option<bool>,
}

/// Registration/login response payload
#[derive(Debug, Serialize)]
pub struct AdminAuthData {
    pub admin: AdminInfo,
    pub token: String,
}

/// Authentication service for the admin collection
#[derive(Clone)]
pub struct AdminAuthService {
    database: Arc<Database>,
    auth_manager: Arc<AuthManager>,
}

impl AdminAuthService {
    /// Create the service over shared database and auth manager
    #[must_use]
    pub fn new(database: Arc<Database>, auth_manager: Arc<AuthManager>) -> Self {
        Self {
            database,
            auth_manager,
        }
    }

    /// Handle admin registration. Registration implies login: a token is
    /// issued immediately on success.
    ///
    /// # Errors
    ///
    /// Fails on blank required fields, malformed email, short password,
    /// duplicate email/username, or database failure.
    pub async fn register(&self, request: RegisterAdminRequest) -> AppResult<AdminAuthData> {
        info!("Admin registration attempt for email: {}", request.email);

        let required = [
            &request.username,
            &request.email,
            &request.password,
            &request.first_name,
            &request.last_name,
        ];
        if required.iter().any(|f| f.trim().is_empty()) {
            return Err(AppError::missing_field(
                "All required fields must be provided",
            ));
        }

        if !is_valid_email(&request.email) {
            return Err(AppError::invalid_input("Please enter a valid email"));
        }
        if request.password.len() < MIN_PASSWORD_LENGTH {
            return Err(AppError::invalid_input(format!(
                "Password must be at least {MIN_PASSWORD_LENGTH} characters long"
            )));
        }

        let role = match request.role.as_deref() {
            None | Some("") => AdminRole::Admin,
            Some(raw) => raw
                .parse()
                .map_err(|_| AppError::invalid_input(format!("Invalid admin role: {raw}")))?,
        };

        // Fast duplicate check; the unique indexes still arbitrate races
        if self
            .database
            .find_admin_by_email_or_username(&request.email, &request.username)
            .await?
            .is_some()
        {
            return Err(AppError::conflict(
                "Admin with this email or username already exists",
            ));
        }

        let password_hash = auth::hash_password(&request.password)?;
        let admin = Admin::new(
            request.username,
            request.email,
            password_hash,
            request.first_name,
            request.last_name,
            role,
        );

        self.database.create_admin(&admin).await.map_err(|e| {
            map_insert_error(e, "Admin with this email or username already exists")
        })?;

        let token = self
            .auth_manager
            .issue(admin.id, admin.role.as_str(), PrincipalKind::Admin)?;

        info!("Admin registered successfully: {} ({})", admin.email, admin.id);

        Ok(AdminAuthData {
            admin: admin.info(),
            token,
        })
    }

    /// Handle admin login.
    ///
    /// The failure message never distinguishes an unknown email from a wrong
    /// password; a deactivated account gets its own message.
    ///
    /// # Errors
    ///
    /// Fails with a generic credentials error, a deactivated-account error,
    /// or a database failure.
    pub async fn login(&self, request: LoginRequest) -> AppResult<AdminAuthData> {
        info!("Admin login attempt for email: {}", request.email);

        if request.email.trim().is_empty() || request.password.is_empty() {
            return Err(AppError::missing_field("Email and password are required"));
        }

        let admin = self
            .database
            .get_admin_by_email(&request.email)
            .await?
            .ok_or_else(|| AppError::auth_invalid("Invalid credentials"))?;

        if !admin.is_active {
            warn!("Login blocked for deactivated admin: {}", request.email);
            return Err(AppError::new(
                crate::errors::ErrorCode::PrincipalInactive,
                "Account is deactivated. Please contact super admin.",
            ));
        }

        let is_valid = auth::verify_password(&request.password, &admin.password_hash).await?;
        if !is_valid {
            warn!("Invalid password for admin: {}", request.email);
            return Err(AppError::auth_invalid("Invalid credentials"));
        }

        let now = Utc::now();
        self.database.update_admin_last_login(admin.id, now).await?;

        let token = self
            .auth_manager
            .issue(admin.id, admin.role.as_str(), PrincipalKind::Admin)?;

        info!("Admin logged in successfully: {} ({})", admin.email, admin.id);

        let mut info = admin.info();
        info.last_login = Some(now);

        Ok(AdminAuthData { admin: info, token })
    }

    /// Change an admin's password after re-proving the current one.
    ///
    /// # Errors
    ///
    /// Fails on a wrong current password, a too-short new password, or a
    /// database failure.
    pub async fn change_password(
        &self,
        admin_id: uuid::Uuid,
        request: ChangePasswordRequest,
    ) -> AppResult<()> {
        if request.current_password.is_empty() || request.new_password.is_empty() {
            return Err(AppError::missing_field(
                "Current password and new password are required",
            ));
        }
        if request.new_password.len() < MIN_PASSWORD_LENGTH {
            return Err(AppError::invalid_input(format!(
                "New password must be at least {MIN_PASSWORD_LENGTH} characters long"
            )));
        }

        let admin = self
            .database
            .get_admin(admin_id)
            .await?
            .ok_or_else(|| AppError::not_found("Admin"))?;

        let is_valid =
            auth::verify_password(&request.current_password, &admin.password_hash).await?;
        if !is_valid {
            return Err(AppError::invalid_input("Current password is incorrect"));
        }

        let new_hash = auth::hash_password(&request.new_password)?;
        self.database
            .update_admin_password(admin_id, &new_hash)
            .await?;

        info!("Password changed for admin {}", admin_id);
        Ok(())
    }
}

/// Admin routes handler
pub struct AdminRoutes;

impl AdminRoutes {
    /// Create all admin routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/v1/admin/register", post(Self::handle_register))
            .route("/api/v1/admin/login", post(Self::handle_login))
            .route("/api/v1/admin/profile", get(Self::handle_get_profile))
            .route("/api/v1/admin/profile", put(Self::handle_update_profile))
            .route(
                "/api/v1/admin/change-password",
                put(Self::handle_change_password),
            )
            .route("/api/v1/admin/all", get(Self::handle_list_admins))
            .route(
                "/api/v1/admin/dashboard-stats",
                get(Self::handle_dashboard_stats),
            )
            .with_state(resources)
    }

    fn service(resources: &Arc<ServerResources>) -> AdminAuthService {
        AdminAuthService::new(
            Arc::clone(&resources.database),
            Arc::clone(&resources.auth_manager),
        )
    }

    /// Handle POST /api/v1/admin/register
    async fn handle_register(
        State(resources): State<Arc<ServerResources>>,
        Json(request): Json<RegisterAdminRequest>,
    ) -> Result<Response, AppError> {
        let data = Self::service(&resources).register(request).await?;

        Ok((
            StatusCode::CREATED,
            Json(json!({
                "success": true,
                "message": "Admin created successfully",
                "data": data,
            })),
        )
            .into_response())
    }

    /// Handle POST /api/v1/admin/login
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

    /// Handle GET /api/v1/admin/profile
    async fn handle_get_profile(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let context = resources.admin_gate.authenticate(&headers).await?;

        let admin = resources
            .database
            .get_admin(context.id)
            .await
            .map_err(|e| AppError::database(e.to_string()))?
            .ok_or_else(|| AppError::not_found("Admin"))?;

        Ok((
            StatusCode::OK,
            Json(json!({ "success": true, "data": { "admin": admin.info() } })),
        )
            .into_response())
    }

    /// Handle PUT /api/v1/admin/profile
    async fn handle_update_profile(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(request): Json<UpdateAdminProfileRequest>,
    ) -> Result<Response, AppError> {
        let context = resources.admin_gate.authenticate(&headers).await?;

        if let Some(username) = &request.username {
            let taken = resources
                .database
                .admin_username_taken(username, context.id)
                .await
                .map_err(|e| AppError::database(e.to_string()))?;
            if taken {
                return Err(AppError::conflict("Username is already taken"));
            }
        }

        let update = AdminProfileUpdate {
            first_name: request.first_name,
            last_name: request.last_name,
            username: request.username,
            profile_image: request.profile_image,
        };

        let admin = resources
            .database
            .update_admin_profile(context.id, &update)
            .await
            .map_err(|e| AppError::database(e.to_string()))?
            .ok_or_else(|| AppError::not_found("Admin"))?;

        Ok((
            StatusCode::OK,
            Json(json!({
                "success": true,
                "message": "Profile updated successfully",
                "data": { "admin": admin.info() },
            })),
        )
            .into_response())
    }

    /// Handle PUT /api/v1/admin/change-password
    async fn handle_change_password(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(request): Json<ChangePasswordRequest>,
    ) -> Result<Response, AppError> {
        let context = resources.admin_gate.authenticate(&headers).await?;

        Self::service(&resources)
            .change_password(context.id, request)
            .await?;

        Ok((
            StatusCode::OK,
            Json(json!({
                "success": true,
                "message": "Password changed successfully",
            })),
        )
            .into_response())
    }

    /// Handle GET /api/v1/admin/all (super admin only)
    async fn handle_list_admins(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(query): Query<ListAdminsQuery>,
    ) -> Result<Response, AppError> {
        let context = resources.admin_gate.authenticate(&headers).await?;
        require_super_admin(&context)?;

        let role = match query.role.as_deref() {
            None | Some("") => None,
            Some(raw) => Some(
                raw.parse::<AdminRole>()
                    .map_err(|_| AppError::invalid_input(format!("Invalid admin role: {raw}")))?,
            ),
        };

        let filter = AdminFilter {
            search: query.search.filter(|s| !s.trim().is_empty()),
            role,
            is_active: query.is_active,
        };
        let page = PageQuery {
            page: query.page,
            limit: query.limit,
        };

        let (admins, total) = resources
            .database
            .list_admins(&filter, page)
            .await
            .map_err(|e| AppError::database(e.to_string()))?;

        let infos: Vec<AdminInfo> = admins.iter().map(Admin::info).collect();

        Ok((
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "admins": infos,
                    "pagination": Pagination::new(page, total),
                },
            })),
        )
            .into_response())
    }

    /// Handle GET /api/v1/admin/dashboard-stats
    async fn handle_dashboard_stats(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let context = resources.admin_gate.authenticate(&headers).await?;
        require_any_permission(&context, &[Permission::Read, Permission::Write])?;

        let database = &resources.database;
        let total_admins = database.count_admins().await?;
        let total_users = database.count_users().await?;
        let project_stats = database.project_stats().await?;
        let contact_stats = database.contact_stats().await?;
        let new_messages = database.count_new_contacts().await?;

        Ok((
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "totalAdmins": total_admins,
                    "totalUsers": total_users,
                    "projects": project_stats,
                    "messages": {
                        "total": contact_stats.total,
                        "new": new_messages,
                    },
                },
            })),
        )
            .into_response())
    }
}
