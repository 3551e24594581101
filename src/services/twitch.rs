// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Twitch OAuth adapter (authorization code flow, no PKCE).

use crate::config::TwitchConfig;
use crate::models::{ExternalProfile, Service};
use crate::services::oauth::{send_json, OAuthProvider, ProviderError};
use async_trait::async_trait;
use serde::Deserialize;

/// Twitch identity provider.
#[derive(Clone)]
pub struct TwitchProvider {
    http: reqwest::Client,
    config: TwitchConfig,
}

impl TwitchProvider {
    pub fn new(config: TwitchConfig, http: reqwest::Client) -> Self {
        Self { http, config }
    }
}

#[async_trait]
impl OAuthProvider for TwitchProvider {
    fn service(&self) -> Service {
        Service::Twitch
    }

    fn cookie_name(&self) -> &str {
        &self.config.cookie
    }

    fn authorization_url(
        &self,
        state: &str,
        _verifier: Option<&str>,
    ) -> Result<String, ProviderError> {
        Ok(format!(
            "{}?\
             client_id={}&\
             redirect_uri={}&\
             response_type=code&\
             scope={}&\
             force_verify=true&\
             state={}",
            self.config.auth_url,
            urlencoding::encode(&self.config.client_id),
            urlencoding::encode(&self.config.redirect_url),
            urlencoding::encode(&self.config.scopes.join(" ")),
            urlencoding::encode(state),
        ))
    }

    async fn exchange_code(
        &self,
        code: &str,
        _verifier: Option<&str>,
    ) -> Result<String, ProviderError> {
        let request = self.http.post(&self.config.token_url).form(&[
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("code", code),
            ("grant_type", "authorization_code"),
            ("redirect_uri", self.config.redirect_url.as_str()),
        ]);

        let token: TwitchTokenResponse = send_json("twitch token endpoint", request).await?;
        tracing::debug!(scopes = ?token.scope, "Twitch token exchange succeeded");
        Ok(token.access_token)
    }

    async fn fetch_profile(&self, access_token: &str) -> Result<ExternalProfile, ProviderError> {
        let request = self
            .http
            .get(&self.config.users_url)
            .bearer_auth(access_token)
            .header("Client-Id", &self.config.client_id);

        let users: HelixUsers = send_json("twitch users endpoint", request).await?;
        let user = users
            .data
            .into_iter()
            .next()
            .filter(|u| !u.login.is_empty())
            .ok_or(ProviderError::MissingProfile)?;

        Ok(ExternalProfile {
            external_id: Some(user.id),
            name: user.login,
            display_name: user.display_name.filter(|n| !n.is_empty()),
            email: user.email.filter(|e| !e.is_empty()),
        })
    }
}

/// Token response from `id.twitch.tv/oauth2/token`.
#[derive(Debug, Deserialize)]
struct TwitchTokenResponse {
    access_token: String,
    #[serde(default)]
    scope: Vec<String>,
}

/// Response envelope from the Helix users endpoint.
#[derive(Debug, Deserialize)]
struct HelixUsers {
    data: Vec<HelixUser>,
}

#[derive(Debug, Deserialize)]
struct HelixUser {
    id: String,
    login: String,
    #[serde(default)]
    display_name: Option<String>,
    /// Only present with the `user:read:email` scope.
    #[serde(default)]
    email: Option<String>,
}
