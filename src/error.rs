// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error type and its HTTP responses.
//!
//! Bodies are short plain-text messages. Upstream and storage details are
//! logged, never echoed to the client.

use crate::models::Service;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The provider redirected back with an `error` parameter.
    #[error("Provider denied authorization: {0:?}")]
    OAuthDenied(Option<String>),

    #[error("Callback is missing the authorization code")]
    MissingCode,

    #[error("{0} rejected the authorization code")]
    CodeRejected(Service),

    #[error("{0} token exchange failed")]
    TokenExchange(Service),

    #[error("{0} profile lookup failed")]
    ProfileFetch(Service),

    #[error("Failed to sign session token")]
    Signing,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::OAuthDenied(_) | AppError::MissingCode | AppError::CodeRejected(_) => {
                StatusCode::UNAUTHORIZED
            }
            AppError::TokenExchange(_) | AppError::ProfileFetch(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            AppError::Signing | AppError::Database(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message shown to the client.
    fn public_message(&self) -> String {
        match self {
            AppError::OAuthDenied(Some(code)) => format!("Authentication failed: {}", code),
            AppError::OAuthDenied(None) => {
                "Authentication could not be completed because the server is misconfigured"
                    .to_string()
            }
            AppError::MissingCode => "Authentication failed without error".to_string(),
            AppError::CodeRejected(_) => "Failed to get token from OAuth exchange code".to_string(),
            AppError::TokenExchange(_) => "Something went wrong, try again".to_string(),
            AppError::ProfileFetch(service) => format!(
                "{} API failure while retrieving user",
                service.display_name()
            ),
            AppError::Signing => "Failed signing session token".to_string(),
            AppError::Database(_) | AppError::Internal(_) => "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Database(msg) => tracing::error!(error = %msg, "Database error"),
            AppError::Internal(err) => tracing::error!(error = %err, "Internal server error"),
            _ => {}
        }

        (self.status_code(), self.public_message()).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
