// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Index, verify, and robots pages.
//!
//! Page payloads are JSON; rendering them is left to whatever sits in
//! front of the gateway.

use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode, Uri},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::Result;
use crate::middleware::auth::{is_secure_request, session_user};
use crate::models::{Service, User};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(index))
        .route("/verify", get(verify))
        .route("/robots.txt", get(robots))
}

/// Login state for one provider.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct SessionStatus {
    pub logged_in: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl From<Option<User>> for SessionStatus {
    fn from(user: Option<User>) -> Self {
        match user {
            Some(user) => Self {
                logged_in: true,
                id: Some(user.id),
                name: Some(user.shown_name().to_string()),
                email: user.email,
            },
            None => Self::default(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct IndexPayload {
    pub twitch: SessionStatus,
    pub destinygg: SessionStatus,
}

/// Index page: which providers the browser is logged in with.
async fn index(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    uri: Uri,
    jar: CookieJar,
) -> Result<(CookieJar, Json<IndexPayload>)> {
    let secure = is_secure_request(&headers, &uri);

    let (jar, twitch) = session_user(&state, jar, Service::Twitch, secure).await?;
    let (jar, destinygg) = session_user(&state, jar, Service::Destinygg, secure).await?;

    Ok((
        jar,
        Json(IndexPayload {
            twitch: twitch.into(),
            destinygg: destinygg.into(),
        }),
    ))
}

#[derive(Debug, Deserialize)]
pub struct VerifyParams {
    #[serde(default)]
    pub id: Option<String>,
}

/// Public profile view of an internal user ID.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct VerifyPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    /// The provider's own user ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<Service>,
    pub valid: bool,
}

impl From<User> for VerifyPayload {
    fn from(user: User) -> Self {
        Self {
            id: Some(user.id),
            user_id: user.external_id,
            name: Some(user.name),
            email: user.email,
            service: Some(user.service),
            valid: true,
        }
    }
}

/// Verify page. Malformed and unknown IDs both answer 400 with an empty
/// payload; a request without an ID gets an empty 200.
async fn verify(
    State(state): State<Arc<AppState>>,
    Query(params): Query<VerifyParams>,
) -> Result<(StatusCode, Json<VerifyPayload>)> {
    let Some(raw) = params.id.filter(|id| !id.is_empty()) else {
        return Ok((StatusCode::OK, Json(VerifyPayload::default())));
    };

    let Ok(id) = Uuid::parse_str(raw.trim()) else {
        tracing::debug!(id = %raw, "Verify with malformed user ID");
        return Ok((StatusCode::BAD_REQUEST, Json(VerifyPayload::default())));
    };

    match state.db.get_user(id).await? {
        Some(user) => Ok((StatusCode::OK, Json(user.into()))),
        None => {
            tracing::debug!(user_id = %id, "Verify for unknown user");
            Ok((StatusCode::BAD_REQUEST, Json(VerifyPayload::default())))
        }
    }
}

async fn robots() -> impl IntoResponse {
    "User-agent: *\nDisallow: /"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_payload_hides_empty_fields() {
        let json = serde_json::to_string(&VerifyPayload::default()).unwrap();
        assert_eq!(json, r#"{"valid":false}"#);
    }

    #[test]
    fn test_session_status_prefers_display_name() {
        let user = User {
            id: Uuid::new_v4(),
            service: Service::Twitch,
            name: "shroud".to_string(),
            display_name: Some("Shroud".to_string()),
            email: None,
            external_id: Some("37402112".to_string()),
            created_at: "2026-01-01T00:00:00Z".to_string(),
        };

        let status = SessionStatus::from(Some(user));
        assert!(status.logged_in);
        assert_eq!(status.name.as_deref(), Some("Shroud"));
    }
}
