// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Login orchestration: authorize redirect and callback handling.
//!
//! Callback steps, in order:
//! 1. Consume the pending authorization for `state` (soft fail: go home).
//! 2. Reject provider-reported errors and missing codes.
//! 3. Exchange the code, fetch the profile, upsert the user.
//! 4. Sign a session token.
//!
//! The registry entry is gone after step 1 whatever happens next, so any
//! later failure needs a fresh login.

use crate::error::{AppError, Result};
use crate::models::{Service, User};
use crate::AppState;
use serde::Deserialize;

/// Query parameters on a provider callback.
#[derive(Debug, Default, Deserialize)]
pub struct CallbackParams {
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Result of a callback that did not hard-fail.
#[derive(Debug)]
pub enum CallbackOutcome {
    /// Login complete; `token` goes into the session cookie.
    Authenticated { user: User, token: String },
    /// Unknown, reused, expired, or foreign state. Redirect home, no cookie.
    Rejected,
}

/// Register a pending authorization and return the provider redirect URL.
pub fn begin_login(state: &AppState, service: Service) -> Result<String> {
    let provider = state.providers.get(service);

    let verifier = provider.new_verifier().map_err(|e| {
        tracing::error!(service = %service, step = "verifier", error = %e, "Failed to create verifier");
        AppError::Internal(e.into())
    })?;

    let oauth_state = state
        .registry
        .register(service, verifier.clone())
        .map_err(|e| AppError::Internal(e.into()))?;

    let url = provider
        .authorization_url(&oauth_state, verifier.as_deref())
        .map_err(|e| AppError::Internal(e.into()))?;

    tracing::info!(service = %service, "Starting OAuth flow, redirecting to provider");
    Ok(url)
}

/// Finish a login from the provider's callback parameters.
pub async fn complete_login(
    state: &AppState,
    service: Service,
    params: CallbackParams,
) -> Result<CallbackOutcome> {
    let Some(oauth_state) = params.state.as_deref().filter(|s| !s.is_empty()) else {
        tracing::warn!(service = %service, "Callback without state parameter");
        return Ok(CallbackOutcome::Rejected);
    };

    let pending = match state.registry.consume(oauth_state) {
        Ok(pending) if pending.service == service => pending,
        Ok(pending) => {
            tracing::warn!(
                service = %service,
                issued_for = %pending.service,
                "State was issued for a different provider"
            );
            return Ok(CallbackOutcome::Rejected);
        }
        Err(e) => {
            tracing::warn!(service = %service, error = %e, "Unknown or expired OAuth state");
            return Ok(CallbackOutcome::Rejected);
        }
    };

    if let Some(error) = params.error.filter(|e| !e.is_empty()) {
        tracing::warn!(service = %service, error = %error, "OAuth error from provider");
        return Err(AppError::OAuthDenied(forwardable_error_code(&error)));
    }

    let code = params
        .code
        .filter(|c| !c.is_empty())
        .ok_or(AppError::MissingCode)?;

    let provider = state.providers.get(service);

    let access_token = provider
        .exchange_code(&code, pending.verifier.as_deref())
        .await
        .map_err(|e| {
            tracing::error!(service = %service, step = "token_exchange", error = %e, "OAuth code exchange failed");
            if e.is_client_error() {
                AppError::CodeRejected(service)
            } else {
                AppError::TokenExchange(service)
            }
        })?;

    let profile = provider.fetch_profile(&access_token).await.map_err(|e| {
        tracing::error!(service = %service, step = "profile", error = %e, "Failed to fetch user profile");
        AppError::ProfileFetch(service)
    })?;

    let user = state.db.upsert_user(service, &profile).await?;

    let token = state.sessions.issue(user.id).map_err(|e| {
        tracing::error!(service = %service, step = "sign", error = %e, "Failed to sign session token");
        AppError::Signing
    })?;

    tracing::info!(
        service = %service,
        user_id = %user.id,
        name = %user.name,
        "OAuth successful, session issued"
    );

    Ok(CallbackOutcome::Authenticated { user, token })
}

/// OAuth error codes (RFC 6749 §4.1.2.1) are shown to the user; anything
/// else the provider put in `error` is not.
fn forwardable_error_code(error: &str) -> Option<String> {
    let plain = error.len() <= 64
        && error
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b == b'_');
    plain.then(|| error.to_string())
}
