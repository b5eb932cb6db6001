// ABOUTME: Route module organization for the portfolio backend HTTP endpoints
// ABOUTME: Per-domain route definitions with thin handlers delegating to the database layer
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

//! Route modules
//!
//! Routes are organized by domain. Each module exposes a `routes()` function
//! returning an axum [`axum::Router`] over the shared server resources; every
//! handler is a thin wrapper that authenticates, applies guards, performs one
//! or two database calls and shapes a JSON response.

/// Admin account routes: registration, login, profile, account listing
pub mod admin;
/// Contact-form routes: public submission and admin message management
pub mod contact;
/// Experience entry routes
pub mod experience;
/// Health check and service banner routes
pub mod health;
/// Project routes: public listings and admin CRUD
pub mod projects;
/// Skill routes
pub mod skills;
/// User account routes: registration, login, profile
pub mod users;

pub use admin::AdminRoutes;
pub use contact::ContactRoutes;
pub use experience::ExperienceRoutes;
pub use health::HealthRoutes;
pub use projects::ProjectRoutes;
pub use skills::SkillRoutes;
pub use users::UserRoutes;

use crate::errors::{self, AppError};
use serde::Deserialize;

/// Login request payload shared by both principal kinds
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    /// Login looks up by email only, never by username
    pub email: String,
    pub password: String,
}

/// Password change request payload shared by both principal kinds
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// Lightweight email shape check used by the registration paths
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    if email.len() <= 5 {
        return false;
    }
    let Some(at_pos) = email.find('@') else {
        return false;
    };
    if at_pos == 0 || at_pos == email.len() - 1 {
        return false;
    }
    email[at_pos + 1..].contains('.')
}

/// Map a database insert failure, classifying unique-index violations as
/// conflicts. Racing duplicate registrations land here.
pub(crate) fn map_insert_error(e: anyhow::Error, conflict_message: &str) -> AppError {
    match e.downcast_ref::<sqlx::Error>() {
        Some(sqlx_err) if errors::is_unique_violation(sqlx_err) => {
            AppError::conflict(conflict_message)
        }
        _ => AppError::database(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_shape_check() {
        assert!(is_valid_email("a@x.com"));
        assert!(is_valid_email("first.last@sub.domain.org"));
        assert!(!is_valid_email("@x.com"));
        assert!(!is_valid_email("a@x"));
        assert!(!is_valid_email("ax.com"));
        assert!(!is_valid_email("a@"));
    }
}
