// ABOUTME: Library crate for the portfolio backend REST API
// ABOUTME: Auth contract (issuer, gate, guards) plus CRUD for portfolio content
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

//! # Folio Server
//!
//! REST backend for a personal portfolio site: admin/user registration and
//! login, JWT authentication with a single polymorphic auth gate, role and
//! permission guards, CRUD for projects, skills and experience entries, and a
//! contact form with optional email notifications.
//!
//! Two independent principal collections (admins and users) issue tokens of
//! distinct kinds; a token's kind must match the verification path that
//! receives it. The signing secret is process-wide configuration loaded once
//! at startup — the server refuses to start without it.

/// JWT issuance/validation and password hashing
pub mod auth;

/// Environment-driven configuration
pub mod config;

/// SQLite-backed storage for principals and content collections
pub mod database;

/// Unified error handling with standard error codes and HTTP responses
pub mod errors;

/// Structured logging setup
pub mod logging;

/// Request middleware: auth gate, guards, CORS
pub mod middleware;

/// Entity types for principals and portfolio content
pub mod models;

/// Outbound email notifications
pub mod notifications;

/// Pagination helpers for listing endpoints
pub mod pagination;

/// Route definitions and handlers organized by domain
pub mod routes;

/// Shared resources and HTTP server assembly
pub mod server;
