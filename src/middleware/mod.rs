// ABOUTME: Request middleware: authentication gate, authorization guards, CORS
// ABOUTME: One polymorphic gate replaces per-kind middleware duplication
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

//! Request middleware

/// Token verification and principal-context construction
pub mod auth;
/// Role and permission guards over the principal context
pub mod guards;
/// CORS layer configuration
pub mod cors;

pub use auth::{AuthGate, KindRequirement, PrincipalContext};
pub use guards::{
    require_any_permission, require_permission, require_role, require_super_admin,
};
