// ABOUTME: Metadata service binary: loads configuration, connects storage and serves HTTP
// ABOUTME: Shuts down gracefully on Ctrl-C or SIGTERM
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cookbook Metadata Service

//! # Metadata Service Binary
//!
//! Serves the recipe metadata API (categories, tags, cuisine types, difficulty levels,
//! preparation times and search) behind OIDC bearer authentication.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use cookbook_metadata::{
    auth::OidcAuthenticator, config::ServiceConfig, context::ServerResources, database::Database,
    logging::LoggingConfig, routes,
};
use tokio::net::TcpListener;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "metadata-service")]
#[command(about = "Recipe metadata service: categories, tags, cuisine types, levels and search")]
struct Args {
    /// Configuration file path; defaults to METADATA_CONFIG, ./config.yaml, /config/config.yaml
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = ServiceConfig::load(args.config.as_deref())?;
    LoggingConfig::from_service_config(&config).init()?;

    let database_url = config
        .database
        .database_url()
        .context("invalid database configuration")?;
    let database = Database::new(&database_url, config.database.max_connections)
        .await
        .context("failed to initialise the database")?;

    let authenticator =
        OidcAuthenticator::from_config(&config.oauth).context("invalid oauth configuration")?;
    info!(issuer = authenticator.issuer(), "token validation configured");

    let bind_address = config.server.bind_address.clone();
    let resources = ServerResources::new(database, Arc::new(authenticator), config);
    let app = routes::build_router(&resources);

    let listener = TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("failed to bind {bind_address}"))?;
    info!(address = %bind_address, "metadata service listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("metadata service stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    info!("shutdown signal received");
}
