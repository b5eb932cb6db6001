// ABOUTME: Health check and service banner routes
// ABOUTME: Reports database reachability alongside overall status
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

//! Health routes

use crate::server::ServerResources;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use serde_json::json;
use std::sync::Arc;

/// Health routes handler
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create health and banner routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/", get(Self::handle_banner))
            .route("/health", get(Self::handle_health))
            .with_state(resources)
    }

    /// Handle GET / - service banner with an endpoint index
    async fn handle_banner(State(resources): State<Arc<ServerResources>>) -> Response {
        (
            StatusCode::OK,
            Json(json!({
                "message": "Welcome to Portfolio Backend API",
                "status": "Server is running",
                "environment": resources.config.environment.to_string(),
                "timestamp": Utc::now().to_rfc3339(),
                "endpoints": {
                    "health": "/health",
                    "adminLogin": "/api/v1/admin/login",
                    "adminRegister": "/api/v1/admin/register",
                    "userRegister": "/api/v1/user/register",
                    "projects": "/api/v1/portfolio/projects",
                    "contact": "/api/v1/portfolio/contact",
                },
            })),
        )
            .into_response()
    }

    /// Handle GET /health
    async fn handle_health(State(resources): State<Arc<ServerResources>>) -> Response {
        let database_up = resources.database.ping().await;

        let status = if database_up {
            StatusCode::OK
        } else {
            StatusCode::SERVICE_UNAVAILABLE
        };

        (
            status,
            Json(json!({
                "status": if database_up { "OK" } else { "Degraded" },
                "message": "Server is healthy",
                "database": if database_up { "Connected" } else { "Disconnected" },
                "timestamp": Utc::now().to_rfc3339(),
            })),
        )
            .into_response()
    }
}
