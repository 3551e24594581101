// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session cookie handling.

use crate::error::Result;
use crate::models::{Service, User};
use crate::services::session::SESSION_TTL_DAYS;
use crate::AppState;
use axum::http::{HeaderMap, Uri};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

/// Whether the inbound request arrived over HTTPS, directly or via a proxy.
pub fn is_secure_request(headers: &HeaderMap, uri: &Uri) -> bool {
    if uri.scheme_str() == Some("https") {
        return true;
    }
    headers
        .get("x-forwarded-proto")
        .and_then(|h| h.to_str().ok())
        .is_some_and(|proto| proto.eq_ignore_ascii_case("https"))
}

/// Create session cookie.
pub fn session_cookie(name: &str, token: String, secure: bool) -> Cookie<'static> {
    Cookie::build((name.to_string(), token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(Duration::days(SESSION_TTL_DAYS))
        .build()
}

/// Create removal cookie for session.
pub fn clear_session_cookie(name: &str, secure: bool) -> Cookie<'static> {
    Cookie::build((name.to_string(), ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(Duration::ZERO)
        .build()
}

/// Resolve the user behind `service`'s session cookie.
///
/// A cookie that fails verification is cleared in the returned jar so the
/// browser stops sending it.
pub async fn session_user(
    state: &AppState,
    jar: CookieJar,
    service: Service,
    secure: bool,
) -> Result<(CookieJar, Option<User>)> {
    let name = state.providers.get(service).cookie_name();
    let Some(token) = jar.get(name).map(|c| c.value().to_string()) else {
        return Ok((jar, None));
    };

    match state.sessions.verify(&token) {
        Ok(claims) => {
            let user = state
                .db
                .get_user(claims.sub)
                .await?
                .filter(|user| user.service == service);
            Ok((jar, user))
        }
        Err(e) => {
            tracing::debug!(service = %service, error = %e, "Rejected session cookie");
            Ok((jar.add(clear_session_cookie(name, secure)), None))
        }
    }
}
