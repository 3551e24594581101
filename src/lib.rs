// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! unrustle-auth: OAuth login gateway for Twitch and Destiny.gg
//!
//! Maps each external identity to an internal user record and hands out a
//! signed session cookie per provider.

pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use config::Config;
use db::UserStore;
use services::{PendingAuthRegistry, Providers, SessionIssuer};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: UserStore,
    pub registry: PendingAuthRegistry,
    pub sessions: SessionIssuer,
    pub providers: Providers,
}

impl AppState {
    /// Wire up state from config, building both provider adapters on `http`.
    pub fn new(config: Config, db: UserStore, http: reqwest::Client) -> Self {
        let providers = Providers::from_config(&config, http);
        Self::with_providers(config, db, providers)
    }

    pub fn with_providers(config: Config, db: UserStore, providers: Providers) -> Self {
        let sessions = SessionIssuer::new(config.server.jwt_secret.as_bytes());
        Self {
            config,
            db,
            registry: PendingAuthRegistry::default(),
            sessions,
            providers,
        }
    }
}
