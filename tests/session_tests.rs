// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session token tests.
//!
//! These tests verify that tokens issued by the login flow decode back to
//! the same user and that altered or expired tokens are rejected.

use chrono::Duration;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use unrustle_auth::services::{SessionClaims, SessionError, SessionIssuer};
use uuid::Uuid;

const KEY: &[u8] = b"test_jwt_key_32_bytes_minimum!!";

#[test]
fn test_session_roundtrip() {
    let issuer = SessionIssuer::new(KEY);
    let user_id = Uuid::new_v4();

    let token = issuer.issue(user_id).unwrap();
    let claims = issuer.verify(&token).unwrap();

    assert_eq!(claims.sub, user_id);
    assert_eq!(claims.exp - claims.iat, issuer.ttl().num_seconds());
}

#[test]
fn test_expired_token_rejected() {
    let issuer = SessionIssuer::with_ttl(KEY, Duration::seconds(-10));
    let token = issuer.issue(Uuid::new_v4()).unwrap();

    assert_eq!(
        SessionIssuer::new(KEY).verify(&token),
        Err(SessionError::Expired)
    );
}

#[test]
fn test_tampered_payload_rejected() {
    let issuer = SessionIssuer::new(KEY);
    let token = issuer.issue(Uuid::new_v4()).unwrap();

    let mut parts: Vec<String> = token.split('.').map(str::to_string).collect();
    let payload = &mut parts[1];
    let mid = payload.len() / 2;
    let flipped = if &payload[mid..mid + 1] == "A" { "B" } else { "A" };
    payload.replace_range(mid..mid + 1, flipped);
    let tampered = parts.join(".");

    assert!(matches!(
        issuer.verify(&tampered),
        Err(SessionError::Signature) | Err(SessionError::Malformed)
    ));
}

#[test]
fn test_wrong_secret_rejected() {
    let token = SessionIssuer::new(b"another_secret_that_is_long_enough")
        .issue(Uuid::new_v4())
        .unwrap();

    assert_eq!(
        SessionIssuer::new(KEY).verify(&token),
        Err(SessionError::Signature)
    );
}

#[test]
fn test_other_algorithm_rejected() {
    let now = chrono::Utc::now().timestamp();
    let claims = SessionClaims {
        sub: Uuid::new_v4(),
        iat: now,
        exp: now + 3600,
    };
    let token = encode(
        &Header::new(Algorithm::HS512),
        &claims,
        &EncodingKey::from_secret(KEY),
    )
    .unwrap();

    assert!(SessionIssuer::new(KEY).verify(&token).is_err());
}

#[test]
fn test_garbage_rejected() {
    let issuer = SessionIssuer::new(KEY);
    assert!(issuer.verify("").is_err());
    assert!(issuer.verify("a.b.c").is_err());
}
