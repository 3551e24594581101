// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Login, callback, and logout routes for each provider.
//!
//! Every provider gets the same three routes under its own prefix
//! (`/twitch`, `/dgg`). The provider is attached as an extension so the
//! handlers are shared.

use axum::{
    extract::{Query, State},
    http::{HeaderMap, Uri},
    response::Response,
    routing::get,
    Extension, Router,
};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;

use crate::error::Result;
use crate::middleware::auth::{clear_session_cookie, is_secure_request, session_cookie};
use crate::models::Service;
use crate::routes::found;
use crate::services::login::{begin_login, complete_login, CallbackOutcome, CallbackParams};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Service::ALL
        .into_iter()
        .fold(Router::new(), |router, service| {
            let provider_routes = Router::new()
                .route("/login", get(login))
                .route("/callback", get(callback))
                .route("/logout", get(logout))
                .layer(Extension(service));
            router.nest(service.route_prefix(), provider_routes)
        })
}

/// Start OAuth flow - redirect to the provider's authorize page.
async fn login(
    State(state): State<Arc<AppState>>,
    Extension(service): Extension<Service>,
) -> Result<Response> {
    let url = begin_login(&state, service)?;
    Ok(found(&url))
}

/// OAuth callback - finish the login and set the session cookie.
async fn callback(
    State(state): State<Arc<AppState>>,
    Extension(service): Extension<Service>,
    headers: HeaderMap,
    uri: Uri,
    jar: CookieJar,
    Query(params): Query<CallbackParams>,
) -> Result<(CookieJar, Response)> {
    match complete_login(&state, service, params).await? {
        CallbackOutcome::Authenticated { token, .. } => {
            let secure = is_secure_request(&headers, &uri);
            let cookie_name = state.providers.get(service).cookie_name();
            Ok((jar.add(session_cookie(cookie_name, token, secure)), found("/")))
        }
        CallbackOutcome::Rejected => Ok((jar, found("/"))),
    }
}

/// Logout - clear this provider's session cookie.
async fn logout(
    State(state): State<Arc<AppState>>,
    Extension(service): Extension<Service>,
    headers: HeaderMap,
    uri: Uri,
    jar: CookieJar,
) -> (CookieJar, Response) {
    let secure = is_secure_request(&headers, &uri);
    let cookie_name = state.providers.get(service).cookie_name();
    tracing::info!(service = %service, "User logged out");
    (jar.add(clear_session_cookie(cookie_name, secure)), found("/"))
}
