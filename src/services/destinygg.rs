// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Destiny.gg OAuth adapter.
//!
//! Destiny.gg uses a PKCE variant where the challenge also binds the client
//! secret: `base64(hex(sha256(verifier + hex(sha256(client_secret)))))`.
//! The secret itself is never sent.

use crate::config::DestinyggConfig;
use crate::models::{ExternalProfile, Service};
use crate::services::oauth::{random_urlsafe, send_json, OAuthProvider, ProviderError};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Deserialize;
use sha2::{Digest, Sha256};

/// Random bytes behind each verifier (44 base64url characters).
const VERIFIER_BYTES: usize = 33;

/// Destiny.gg identity provider.
#[derive(Clone)]
pub struct DestinyggProvider {
    http: reqwest::Client,
    config: DestinyggConfig,
}

impl DestinyggProvider {
    pub fn new(config: DestinyggConfig, http: reqwest::Client) -> Self {
        Self { http, config }
    }

    /// Challenge sent on the authorize request for a given verifier.
    pub fn code_challenge(&self, verifier: &str) -> String {
        let secret = hex::encode(Sha256::digest(self.config.client_secret.as_bytes()));
        let sum = hex::encode(Sha256::digest(format!("{}{}", verifier, secret).as_bytes()));
        STANDARD.encode(sum)
    }
}

#[async_trait]
impl OAuthProvider for DestinyggProvider {
    fn service(&self) -> Service {
        Service::Destinygg
    }

    fn cookie_name(&self) -> &str {
        &self.config.cookie
    }

    fn new_verifier(&self) -> Result<Option<String>, ProviderError> {
        random_urlsafe(VERIFIER_BYTES).map(Some)
    }

    fn authorization_url(
        &self,
        state: &str,
        verifier: Option<&str>,
    ) -> Result<String, ProviderError> {
        let verifier = verifier.ok_or(ProviderError::MissingVerifier)?;

        Ok(format!(
            "{}?\
             client_id={}&\
             redirect_uri={}&\
             response_type=code&\
             state={}&\
             code_challenge={}",
            self.config.auth_url,
            urlencoding::encode(&self.config.client_id),
            urlencoding::encode(&self.config.redirect_url),
            urlencoding::encode(state),
            urlencoding::encode(&self.code_challenge(verifier)),
        ))
    }

    async fn exchange_code(
        &self,
        code: &str,
        verifier: Option<&str>,
    ) -> Result<String, ProviderError> {
        let verifier = verifier.ok_or(ProviderError::MissingVerifier)?;

        let request = self.http.get(&self.config.token_url).query(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("client_id", self.config.client_id.as_str()),
            ("redirect_uri", self.config.redirect_url.as_str()),
            ("code_verifier", verifier),
        ]);

        let token: DggTokenResponse = send_json("destiny.gg token endpoint", request).await?;
        tracing::debug!(
            expires_in = ?token.expires_in,
            "Destiny.gg token exchange succeeded"
        );
        Ok(token.access_token)
    }

    async fn fetch_profile(&self, access_token: &str) -> Result<ExternalProfile, ProviderError> {
        let request = self
            .http
            .get(&self.config.userinfo_url)
            .query(&[("token", access_token)]);

        let user: DggUser = send_json("destiny.gg userinfo endpoint", request).await?;
        if user.username.is_empty() {
            return Err(ProviderError::MissingProfile);
        }

        Ok(ExternalProfile {
            external_id: user.user_id.filter(|id| !id.is_empty()),
            name: user.username,
            display_name: user.nick.filter(|n| !n.is_empty()),
            email: None,
        })
    }
}

#[derive(Debug, Deserialize)]
struct DggTokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct DggUser {
    #[serde(rename = "userId", default)]
    user_id: Option<String>,
    #[serde(default)]
    username: String,
    #[serde(default)]
    nick: Option<String>,
}
