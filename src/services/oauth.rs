// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! OAuth provider abstraction shared by the Twitch and Destiny.gg adapters.
//!
//! Every adapter runs the same three steps of the authorization code flow:
//! build the authorize URL, exchange the code, fetch the profile. Each step
//! is attempted once; failures come back as [`ProviderError`].

use crate::config::Config;
use crate::models::{ExternalProfile, Service};
use crate::services::{DestinyggProvider, TwitchProvider};
use async_trait::async_trait;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use ring::rand::{SecureRandom, SystemRandom};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;

/// Longest upstream body kept in error messages.
const MAX_ERROR_BODY: usize = 512;

/// Errors from a provider endpoint.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("Request to {endpoint} failed: {source}")]
    Network {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{endpoint} returned HTTP {status}: {body}")]
    Status {
        endpoint: &'static str,
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Failed to decode {endpoint} response: {source}")]
    Decode {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("Provider returned no user profile")]
    MissingProfile,

    #[error("PKCE verifier missing for pending authorization")]
    MissingVerifier,

    #[error("System random number generator failed")]
    Random,
}

impl ProviderError {
    /// True when the provider rejected our request (4xx), as opposed to
    /// being unreachable or returning garbage.
    pub fn is_client_error(&self) -> bool {
        matches!(self, ProviderError::Status { status, .. } if status.is_client_error())
    }
}

/// One external identity provider.
#[async_trait]
pub trait OAuthProvider: Send + Sync {
    fn service(&self) -> Service;

    /// Name of the session cookie issued after this provider's login.
    fn cookie_name(&self) -> &str;

    /// Fresh per-login verifier material, if the provider uses one.
    fn new_verifier(&self) -> Result<Option<String>, ProviderError> {
        Ok(None)
    }

    /// Authorization redirect URL for a registered state token.
    fn authorization_url(&self, state: &str, verifier: Option<&str>)
        -> Result<String, ProviderError>;

    /// Exchange an authorization code for an access token.
    async fn exchange_code(&self, code: &str, verifier: Option<&str>)
        -> Result<String, ProviderError>;

    /// Fetch the profile of the user owning `access_token`.
    async fn fetch_profile(&self, access_token: &str) -> Result<ExternalProfile, ProviderError>;
}

/// The two configured providers.
#[derive(Clone)]
pub struct Providers {
    twitch: Arc<dyn OAuthProvider>,
    destinygg: Arc<dyn OAuthProvider>,
}

impl Providers {
    pub fn new(twitch: Arc<dyn OAuthProvider>, destinygg: Arc<dyn OAuthProvider>) -> Self {
        Self { twitch, destinygg }
    }

    /// Build both adapters sharing one HTTP client.
    pub fn from_config(config: &Config, http: reqwest::Client) -> Self {
        Self::new(
            Arc::new(TwitchProvider::new(config.twitch.clone(), http.clone())),
            Arc::new(DestinyggProvider::new(config.destinygg.clone(), http)),
        )
    }

    pub fn get(&self, service: Service) -> &dyn OAuthProvider {
        match service {
            Service::Twitch => self.twitch.as_ref(),
            Service::Destinygg => self.destinygg.as_ref(),
        }
    }
}

/// Outbound HTTP client used for all provider calls.
pub fn http_client(timeout: Duration) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
}

/// `len` random bytes from the system CSPRNG, base64url without padding.
pub fn random_urlsafe(len: usize) -> Result<String, ProviderError> {
    let mut bytes = vec![0u8; len];
    SystemRandom::new()
        .fill(&mut bytes)
        .map_err(|_| ProviderError::Random)?;
    Ok(URL_SAFE_NO_PAD.encode(bytes))
}

/// Send a request and parse a JSON body from a 2xx response.
pub(crate) async fn send_json<T: DeserializeOwned>(
    endpoint: &'static str,
    request: reqwest::RequestBuilder,
) -> Result<T, ProviderError> {
    let response = request
        .send()
        .await
        .map_err(|source| ProviderError::Network { endpoint, source })?;

    let status = response.status();
    if !status.is_success() {
        let mut body = response.text().await.unwrap_or_default();
        if body.len() > MAX_ERROR_BODY {
            let mut cut = MAX_ERROR_BODY;
            while !body.is_char_boundary(cut) {
                cut -= 1;
            }
            body.truncate(cut);
        }
        return Err(ProviderError::Status {
            endpoint,
            status,
            body,
        });
    }

    response
        .json()
        .await
        .map_err(|source| ProviderError::Decode { endpoint, source })
}
