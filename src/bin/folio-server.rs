// ABOUTME: Server binary: config + logging init, database migration, resource wiring
// ABOUTME: Refuses to start when the JWT signing secret is unset
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

//! # Portfolio Backend Server Binary
//!
//! Starts the REST API with authentication, content storage and contact-form
//! notifications.

use anyhow::Result;
use clap::Parser;
use folio_server::{
    auth::AuthManager,
    config::ServerConfig,
    database::Database,
    logging,
    notifications::Mailer,
    server::{Server, ServerResources},
};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "folio-server")]
#[command(about = "Folio - REST backend for a personal portfolio site")]
pub struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Configuration load fails hard on a missing JWT secret: the server must
    // refuse to start rather than issue unsigned tokens.
    let mut config = ServerConfig::from_env().map_err(|e| anyhow::anyhow!(e.to_string()))?;
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }

    logging::init_from_env()?;

    info!("Starting Folio portfolio backend");
    info!("{}", config.summary());

    let database = Database::new(&config.database_url.to_connection_string()).await?;
    info!("Database initialized: {}", config.database_url);

    let auth_manager = AuthManager::new(config.auth.jwt_secret.as_bytes());
    info!("Authentication manager initialized");

    let mailer = match &config.smtp {
        Some(smtp) => match Mailer::new(smtp.clone()) {
            Ok(mailer) => {
                info!("Contact-form notifications enabled via {}", smtp.host);
                Some(mailer)
            }
            Err(e) => {
                warn!("SMTP configuration rejected, mail disabled: {e}");
                None
            }
        },
        None => {
            info!("SMTP not configured, contact-form notifications disabled");
            None
        }
    };

    let port = config.http_port;
    let resources = Arc::new(ServerResources::new(
        database,
        auth_manager,
        mailer,
        Arc::new(config),
    ));

    display_available_endpoints(port);

    let server = Server::new(resources);
    server.run(port).await
}

/// Display the API surface at startup
fn display_available_endpoints(port: u16) {
    info!("Available endpoints on port {port}:");
    info!("  GET    /health");
    info!("  POST   /api/v1/admin/register");
    info!("  POST   /api/v1/admin/login");
    info!("  GET    /api/v1/admin/profile");
    info!("  PUT    /api/v1/admin/profile");
    info!("  PUT    /api/v1/admin/change-password");
    info!("  GET    /api/v1/admin/all");
    info!("  GET    /api/v1/admin/dashboard-stats");
    info!("  POST   /api/v1/user/register");
    info!("  POST   /api/v1/user/login");
    info!("  GET    /api/v1/user/profile");
    info!("  GET    /api/v1/portfolio/projects");
    info!("  GET    /api/v1/portfolio/projects/:id");
    info!("  POST   /api/v1/portfolio/contact");
    info!("  GET    /api/v1/portfolio/skills");
    info!("  GET    /api/v1/portfolio/experience");
    info!("  *      /api/v1/portfolio/admin/... (token required)");
}
