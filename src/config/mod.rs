// ABOUTME: Configuration module for deployment-specific settings
// ABOUTME: Environment-variable driven, loaded once at startup and injected everywhere
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

//! Configuration management

/// Environment-based server configuration
pub mod environment;

pub use environment::{
    AuthConfig, CorsConfig, DatabaseUrl, Environment, LogLevel, ServerConfig, SmtpConfig,
};
