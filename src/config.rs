// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from a TOML file.
//!
//! The file is read once at startup. Any error here is fatal: the server
//! never starts with a partial configuration.

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use validator::Validate;

/// Config file used when no path is given on the command line.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct Config {
    #[validate(nested)]
    pub twitch: TwitchConfig,
    #[validate(nested)]
    pub destinygg: DestinyggConfig,
    #[validate(nested)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
}

/// Twitch OAuth application settings.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct TwitchConfig {
    #[validate(length(min = 1))]
    pub client_id: String,
    #[validate(length(min = 1))]
    pub client_secret: String,
    #[validate(url)]
    pub redirect_url: String,
    /// OAuth scopes requested at login (e.g. `user:read:email`).
    #[serde(default)]
    pub scopes: Vec<String>,
    /// Name of the session cookie for Twitch logins.
    #[validate(length(min = 1))]
    pub cookie: String,
    #[serde(default = "default_twitch_auth_url")]
    #[validate(url)]
    pub auth_url: String,
    #[serde(default = "default_twitch_token_url")]
    #[validate(url)]
    pub token_url: String,
    #[serde(default = "default_twitch_users_url")]
    #[validate(url)]
    pub users_url: String,
}

/// Destiny.gg OAuth application settings.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct DestinyggConfig {
    #[validate(length(min = 1))]
    pub client_id: String,
    /// Never sent over the wire; only mixed into the PKCE challenge.
    #[validate(length(min = 1))]
    pub client_secret: String,
    #[validate(url)]
    pub redirect_url: String,
    #[validate(length(min = 1))]
    pub cookie: String,
    #[serde(default = "default_dgg_auth_url")]
    #[validate(url)]
    pub auth_url: String,
    #[serde(default = "default_dgg_token_url")]
    #[validate(url)]
    pub token_url: String,
    #[serde(default = "default_dgg_userinfo_url")]
    #[validate(url)]
    pub userinfo_url: String,
}

/// HTTP server settings.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ServerConfig {
    /// Bind address, e.g. `0.0.0.0:8080`.
    #[serde(default = "default_address")]
    #[validate(length(min = 1))]
    pub address: String,
    /// HS256 signing secret for session tokens.
    #[validate(length(min = 16))]
    pub jwt_secret: String,
    /// Directory served under `/assets`.
    #[serde(default = "default_assets_dir")]
    pub assets_dir: String,
    /// Timeout applied to every outbound provider request.
    #[serde(default = "default_http_timeout_secs")]
    #[validate(range(min = 1, max = 120))]
    pub http_timeout_secs: u64,
}

impl ServerConfig {
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

/// User store backend.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum DatabaseConfig {
    /// Cloud Firestore. Honors `FIRESTORE_EMULATOR_HOST` for local runs.
    Firestore { project_id: String },
    /// Process-local maps; records are lost on restart.
    #[default]
    Memory,
}

fn default_twitch_auth_url() -> String {
    "https://id.twitch.tv/oauth2/authorize".to_string()
}

fn default_twitch_token_url() -> String {
    "https://id.twitch.tv/oauth2/token".to_string()
}

fn default_twitch_users_url() -> String {
    "https://api.twitch.tv/helix/users".to_string()
}

fn default_dgg_auth_url() -> String {
    "https://www.destiny.gg/oauth/authorize".to_string()
}

fn default_dgg_token_url() -> String {
    "https://www.destiny.gg/oauth/token".to_string()
}

fn default_dgg_userinfo_url() -> String {
    "https://www.destiny.gg/api/userinfo".to_string()
}

fn default_address() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_assets_dir() -> String {
    "./assets".to_string()
}

fn default_http_timeout_secs() -> u64 {
    10
}

impl Config {
    /// Load and validate configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    /// Parse and validate configuration from TOML text.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(raw)?;
        config.validate()?;

        if config.twitch.cookie == config.destinygg.cookie {
            return Err(ConfigError::DuplicateCookie(config.twitch.cookie));
        }
        if let DatabaseConfig::Firestore { project_id } = &config.database {
            if project_id.trim().is_empty() {
                return Err(ConfigError::Missing("database.project_id"));
            }
        }

        Ok(config)
    }

    /// Config for tests only: real provider endpoints, in-memory store.
    pub fn test_default() -> Self {
        Self {
            twitch: TwitchConfig {
                client_id: "test_twitch_client".to_string(),
                client_secret: "test_twitch_secret".to_string(),
                redirect_url: "http://localhost:8080/twitch/callback".to_string(),
                scopes: vec!["user:read:email".to_string()],
                cookie: "twitch_session".to_string(),
                auth_url: default_twitch_auth_url(),
                token_url: default_twitch_token_url(),
                users_url: default_twitch_users_url(),
            },
            destinygg: DestinyggConfig {
                client_id: "test_dgg_client".to_string(),
                client_secret: "test_dgg_secret".to_string(),
                redirect_url: "http://localhost:8080/dgg/callback".to_string(),
                cookie: "dgg_session".to_string(),
                auth_url: default_dgg_auth_url(),
                token_url: default_dgg_token_url(),
                userinfo_url: default_dgg_userinfo_url(),
            },
            server: ServerConfig {
                address: "127.0.0.1:0".to_string(),
                jwt_secret: "test_jwt_key_32_bytes_minimum!!".to_string(),
                assets_dir: default_assets_dir(),
                http_timeout_secs: 5,
            },
            database: DatabaseConfig::Memory,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    Invalid(#[from] validator::ValidationErrors),

    #[error("Missing required setting: {0}")]
    Missing(&'static str),

    #[error("Both providers use the same cookie name: {0}")]
    DuplicateCookie(String),
}
