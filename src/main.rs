// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! unrustle-auth API Server
//!
//! Logs users in with Twitch or Destiny.gg and hands out a session cookie
//! per provider.

use std::sync::Arc;
use unrustle_auth::{
    config::{Config, DEFAULT_CONFIG_PATH},
    db::UserStore,
    logging::init_logging,
    services::{http_client, SWEEP_INTERVAL},
    AppState,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let config = Config::from_file(&config_path)?;
    tracing::info!(
        path = %config_path,
        address = %config.server.address,
        "Starting unrustle-auth"
    );

    let db = UserStore::connect(&config.database).await?;
    let http = http_client(config.server.http_timeout())?;

    let address = config.server.address.clone();
    let state = Arc::new(AppState::new(config, db, http));

    // One sweeper for the whole registry
    let sweeper = state.registry.spawn_sweeper(SWEEP_INTERVAL);

    let app = unrustle_auth::routes::create_router(state);

    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!(address = %address, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    sweeper.abort();
    tracing::info!("Server stopped");
    Ok(())
}

/// Resolve on Ctrl-C; in-flight requests finish before `serve` returns.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, draining connections");
}
