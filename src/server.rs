// ABOUTME: Shared server resources and HTTP server assembly
// ABOUTME: Centralizes Arc-shared state and merges all domain routers
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

//! # Server
//!
//! [`ServerResources`] bundles the shared state every route handler needs —
//! database, auth manager, the three gate variants, the mailer and the
//! configuration — behind a single `Arc`. [`Server`] assembles the merged
//! router with CORS and request tracing and runs it.

use crate::auth::AuthManager;
use crate::config::ServerConfig;
use crate::database::Database;
use crate::middleware::auth::{AuthGate, KindRequirement};
use crate::middleware::cors::setup_cors;
use crate::notifications::Mailer;
use crate::routes::{
    AdminRoutes, ContactRoutes, ExperienceRoutes, HealthRoutes, ProjectRoutes, SkillRoutes,
    UserRoutes,
};
use anyhow::Result;
use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Shared resources for all route handlers
pub struct ServerResources {
    /// Database connection pool
    pub database: Arc<Database>,
    /// Token issuance and validation
    pub auth_manager: Arc<AuthManager>,
    /// Gate accepting admin-kind tokens only
    pub admin_gate: AuthGate,
    /// Gate accepting user-kind tokens only
    pub user_gate: AuthGate,
    /// Gate accepting either kind
    pub any_gate: AuthGate,
    /// Contact-form mail sender (None when SMTP is not configured)
    pub mailer: Option<Mailer>,
    /// Process-wide configuration
    pub config: Arc<ServerConfig>,
}

impl ServerResources {
    /// Bundle resources, constructing the three gate variants over the same
    /// auth manager and database
    #[must_use]
    pub fn new(
        database: Database,
        auth_manager: AuthManager,
        mailer: Option<Mailer>,
        config: Arc<ServerConfig>,
    ) -> Self {
        let database = Arc::new(database);
        let auth_manager = Arc::new(auth_manager);

        Self {
            admin_gate: AuthGate::new(
                Arc::clone(&auth_manager),
                Arc::clone(&database),
                KindRequirement::Admin,
            ),
            user_gate: AuthGate::new(
                Arc::clone(&auth_manager),
                Arc::clone(&database),
                KindRequirement::User,
            ),
            any_gate: AuthGate::new(
                Arc::clone(&auth_manager),
                Arc::clone(&database),
                KindRequirement::Any,
            ),
            database,
            auth_manager,
            mailer,
            config,
        }
    }
}

/// HTTP server for the portfolio backend
pub struct Server {
    resources: Arc<ServerResources>,
}

impl Server {
    /// Create a new server over shared resources
    #[must_use]
    pub fn new(resources: Arc<ServerResources>) -> Self {
        Self { resources }
    }

    /// Build the merged application router
    #[must_use]
    pub fn router(&self) -> Router {
        let cors = setup_cors(&self.resources.config);

        Router::new()
            .merge(HealthRoutes::routes(Arc::clone(&self.resources)))
            .merge(AdminRoutes::routes(Arc::clone(&self.resources)))
            .merge(UserRoutes::routes(Arc::clone(&self.resources)))
            .merge(ProjectRoutes::routes(Arc::clone(&self.resources)))
            .merge(SkillRoutes::routes(Arc::clone(&self.resources)))
            .merge(ExperienceRoutes::routes(Arc::clone(&self.resources)))
            .merge(ContactRoutes::routes(Arc::clone(&self.resources)))
            .layer(cors)
            .layer(TraceLayer::new_for_http())
    }

    /// Bind and serve until shutdown
    ///
    /// # Errors
    ///
    /// Returns an error if the listener fails to bind or the server fails.
    pub async fn run(self, port: u16) -> Result<()> {
        let router = self.router();

        let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
        info!("HTTP server listening on http://0.0.0.0:{port}");

        axum::serve(listener, router).await?;
        Ok(())
    }
}
