// ABOUTME: Auth gate middleware: token extraction, verification, principal resolution
// ABOUTME: Parameterized by required principal kind with an optional (non-failing) variant
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

//! # Auth Gate
//!
//! The single authentication pipeline step for all protected routes. A gate is
//! parameterized by the principal kind it accepts (admin-only, user-only, or
//! either), replacing the three near-identical middleware variants the API
//! grew out of.
//!
//! A successful pass produces a [`PrincipalContext`]: the per-request
//! normalized view of the authenticated principal. The context is created
//! fresh for every request and discarded at request end; it is never cached
//! and never contains the stored hash. Verification does not touch
//! `last_login` (only explicit login does).

use crate::auth::AuthManager;
use crate::database::Database;
use crate::errors::{AppError, AppResult};
use crate::models::{Permission, PrincipalKind};
use axum::http::HeaderMap;
use std::sync::Arc;
use uuid::Uuid;

/// Which principal kinds a gate accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KindRequirement {
    /// Admin-kind tokens only
    Admin,
    /// User-kind tokens only
    User,
    /// Either kind
    Any,
}

impl KindRequirement {
    /// Check whether a claimed kind satisfies this requirement
    #[must_use]
    pub const fn accepts(self, kind: PrincipalKind) -> bool {
        match self {
            Self::Admin => matches!(kind, PrincipalKind::Admin),
            Self::User => matches!(kind, PrincipalKind::User),
            Self::Any => true,
        }
    }
}

/// Per-request normalized view of the authenticated principal
#[derive(Debug, Clone)]
pub struct PrincipalContext {
    /// Principal id
    pub id: Uuid,
    /// Username
    pub username: String,
    /// Email
    pub email: String,
    /// Role string within the principal's collection
    pub role: String,
    /// Which collection the principal belongs to
    pub kind: PrincipalKind,
    /// Granted permissions (admins; empty for users)
    pub permissions: Vec<Permission>,
}

/// Authentication gate for protected routes
#[derive(Clone)]
pub struct AuthGate {
    auth_manager: Arc<AuthManager>,
    database: Arc<Database>,
    required_kind: KindRequirement,
}

impl AuthGate {
    /// Create a gate accepting the given principal kinds
    #[must_use]
    pub fn new(
        auth_manager: Arc<AuthManager>,
        database: Arc<Database>,
        required_kind: KindRequirement,
    ) -> Self {
        Self {
            auth_manager,
            database,
            required_kind,
        }
    }

    /// Extract the raw token from `Authorization: Bearer` or the
    /// `x-auth-token` fallback header
    fn extract_token(headers: &HeaderMap) -> Option<String> {
        if let Some(value) = headers.get("authorization").and_then(|h| h.to_str().ok()) {
            if let Some(token) = value.strip_prefix("Bearer ") {
                return Some(token.to_owned());
            }
        }
        headers
            .get("x-auth-token")
            .and_then(|h| h.to_str().ok())
            .map(ToOwned::to_owned)
    }

    /// Authenticate a request and build the principal context
    ///
    /// Pipeline: extract token, verify signature and expiry, check the
    /// claimed kind against this gate, resolve the principal in its
    /// collection, check the active flag.
    ///
    /// # Errors
    ///
    /// Fails with the specific authentication error for each pipeline step:
    /// missing token, invalid/expired token, wrong token type, principal not
    /// found, principal inactive.
    pub async fn authenticate(&self, headers: &HeaderMap) -> AppResult<PrincipalContext> {
        let token = Self::extract_token(headers).ok_or_else(AppError::auth_required)?;

        let claims = self.auth_manager.validate(&token).map_err(|e| {
            tracing::debug!("token validation failed: {e}");
            AppError::from(e)
        })?;

        if !self.required_kind.accepts(claims.kind) {
            tracing::warn!(
                "token kind {} rejected by {:?} gate",
                claims.kind,
                self.required_kind
            );
            return Err(AppError::wrong_token_type());
        }

        let principal_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| AppError::auth_invalid("Invalid principal id in token"))?;

        self.resolve_principal(principal_id, claims.kind).await
    }

    /// Optional authentication: failures are swallowed and yield `None`.
    ///
    /// Callers relying on optional auth must check for an attached context
    /// before trusting principal-specific data.
    pub async fn authenticate_optional(&self, headers: &HeaderMap) -> Option<PrincipalContext> {
        match self.authenticate(headers).await {
            Ok(context) => Some(context),
            Err(e) => {
                tracing::debug!("optional authentication skipped: {e}");
                None
            }
        }
    }

    /// Load the current principal record and build the context
    async fn resolve_principal(
        &self,
        id: Uuid,
        kind: PrincipalKind,
    ) -> AppResult<PrincipalContext> {
        match kind {
            PrincipalKind::Admin => {
                let admin = self
                    .database
                    .get_admin(id)
                    .await
                    .map_err(|e| AppError::database(e.to_string()))?
                    .ok_or_else(AppError::principal_not_found)?;

                if !admin.is_active {
                    return Err(AppError::principal_inactive());
                }

                Ok(PrincipalContext {
                    id: admin.id,
                    username: admin.username,
                    email: admin.email,
                    role: admin.role.as_str().to_owned(),
                    kind: PrincipalKind::Admin,
                    permissions: admin.permissions,
                })
            }
            PrincipalKind::User => {
                let user = self
                    .database
                    .get_user(id)
                    .await
                    .map_err(|e| AppError::database(e.to_string()))?
                    .ok_or_else(AppError::principal_not_found)?;

                if !user.is_active {
                    return Err(AppError::principal_inactive());
                }

                Ok(PrincipalContext {
                    id: user.id,
                    username: user.username,
                    email: user.email,
                    role: user.role.as_str().to_owned(),
                    kind: PrincipalKind::User,
                    permissions: Vec::new(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_requirement_matrix() {
        assert!(KindRequirement::Admin.accepts(PrincipalKind::Admin));
        assert!(!KindRequirement::Admin.accepts(PrincipalKind::User));
        assert!(KindRequirement::User.accepts(PrincipalKind::User));
        assert!(!KindRequirement::User.accepts(PrincipalKind::Admin));
        assert!(KindRequirement::Any.accepts(PrincipalKind::Admin));
        assert!(KindRequirement::Any.accepts(PrincipalKind::User));
    }

    #[test]
    fn test_extract_token_prefers_bearer() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", "Bearer abc".parse().unwrap());
        headers.insert("x-auth-token", "fallback".parse().unwrap());
        assert_eq!(AuthGate::extract_token(&headers).as_deref(), Some("abc"));
    }

    #[test]
    fn test_extract_token_fallback_header() {
        let mut headers = HeaderMap::new();
        headers.insert("x-auth-token", "fallback".parse().unwrap());
        assert_eq!(
            AuthGate::extract_token(&headers).as_deref(),
            Some("fallback")
        );

        let empty = HeaderMap::new();
        assert!(AuthGate::extract_token(&empty).is_none());
    }
}
