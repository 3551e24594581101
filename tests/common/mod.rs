// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::http::header;
use axum::response::Response;
use std::sync::Arc;
use std::time::Duration;
use unrustle_auth::config::Config;
use unrustle_auth::db::{FirestoreDb, UserStore};
use unrustle_auth::routes::create_router;
use unrustle_auth::services::http_client;
use unrustle_auth::AppState;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Test config with every provider endpoint pointed at `base_url`.
#[allow(dead_code)]
pub fn test_config(base_url: &str) -> Config {
    let mut config = Config::test_default();
    config.twitch.auth_url = format!("{base_url}/oauth2/authorize");
    config.twitch.token_url = format!("{base_url}/oauth2/token");
    config.twitch.users_url = format!("{base_url}/helix/users");
    config.destinygg.auth_url = format!("{base_url}/oauth/authorize");
    config.destinygg.token_url = format!("{base_url}/oauth/token");
    config.destinygg.userinfo_url = format!("{base_url}/api/userinfo");
    config
}

/// Create a test app with an in-memory store whose providers talk to
/// `base_url`. Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app(base_url: &str) -> (axum::Router, Arc<AppState>) {
    create_test_app_with_timeout(base_url, Duration::from_secs(5))
}

/// Like [`create_test_app`], with a custom outbound request timeout.
#[allow(dead_code)]
pub fn create_test_app_with_timeout(
    base_url: &str,
    timeout: Duration,
) -> (axum::Router, Arc<AppState>) {
    let config = test_config(base_url);
    let http = http_client(timeout).expect("Failed to build HTTP client");
    let state = Arc::new(AppState::new(config, UserStore::in_memory(), http));

    (create_router(state.clone()), state)
}

/// Number of records in the in-memory store behind `state`.
#[allow(dead_code)]
pub fn user_count(state: &AppState) -> usize {
    match &state.db {
        UserStore::Memory(db) => db.len(),
        UserStore::Firestore(_) => panic!("user_count needs the in-memory store"),
    }
}

/// Create a test app for routes that never reach a provider.
#[allow(dead_code)]
pub fn create_offline_app() -> (axum::Router, Arc<AppState>) {
    create_test_app("http://127.0.0.1:9")
}

#[allow(dead_code)]
pub fn set_cookie_headers(response: &Response) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|value| value.to_str().unwrap().to_string())
        .collect()
}

#[allow(dead_code)]
pub fn find_cookie(headers: &[String], name: &str) -> Option<String> {
    headers
        .iter()
        .find(|value| value.starts_with(&format!("{name}=")))
        .cloned()
}

#[allow(dead_code)]
pub fn location(response: &Response) -> String {
    response
        .headers()
        .get(header::LOCATION)
        .expect("missing Location header")
        .to_str()
        .unwrap()
        .to_string()
}

/// Pull a query parameter out of an absolute URL.
#[allow(dead_code)]
pub fn query_param(url: &str, name: &str) -> Option<String> {
    reqwest::Url::parse(url)
        .ok()?
        .query_pairs()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}
