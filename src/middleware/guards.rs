// ABOUTME: Authorization guards over an already-authenticated principal context
// ABOUTME: Pure predicates; no data-store lookups
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

//! # Authorization Guards
//!
//! Guards run after the auth gate and operate only on the attached
//! [`PrincipalContext`]; running one without prior authentication is a
//! programming error, not a recoverable condition. They never perform
//! additional data-store lookups.

use crate::errors::{AppError, AppResult};
use crate::middleware::auth::PrincipalContext;
use crate::models::Permission;

/// Require an exact role match
///
/// # Errors
///
/// Fails with a 403 permission error when the context's role differs.
pub fn require_role(context: &PrincipalContext, role: &str) -> AppResult<()> {
    if context.role == role {
        Ok(())
    } else {
        Err(AppError::forbidden(format!(
            "Access denied. '{role}' role required."
        )))
    }
}

/// Require the super-admin role
///
/// # Errors
///
/// Fails with a 403 permission error for any other role.
pub fn require_super_admin(context: &PrincipalContext) -> AppResult<()> {
    if context.role == "super_admin" {
        Ok(())
    } else {
        Err(AppError::forbidden(
            "Access denied. Super admin privileges required.",
        ))
    }
}

/// Require a single permission to be present in the context's set
///
/// # Errors
///
/// Fails with a 403 permission error when the permission is absent.
pub fn require_permission(context: &PrincipalContext, permission: Permission) -> AppResult<()> {
    if context.permissions.contains(&permission) {
        Ok(())
    } else {
        Err(AppError::forbidden(format!(
            "Access denied. '{}' permission required.",
            permission.as_str()
        )))
    }
}

/// Require at least one of the given permissions
///
/// # Errors
///
/// Fails with a 403 permission error when the intersection is empty.
pub fn require_any_permission(
    context: &PrincipalContext,
    permissions: &[Permission],
) -> AppResult<()> {
    if permissions.iter().any(|p| context.permissions.contains(p)) {
        Ok(())
    } else {
        let names: Vec<&str> = permissions.iter().map(|p| p.as_str()).collect();
        Err(AppError::forbidden(format!(
            "Access denied. One of these permissions required: {}",
            names.join(", ")
        )))
    }
}
