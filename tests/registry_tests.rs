// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Pending-authorization registry tests.
//!
//! Time-dependent tests run on a paused tokio clock.

use std::sync::Arc;
use std::time::Duration;
use unrustle_auth::models::Service;
use unrustle_auth::services::{PendingAuthRegistry, RegistryError, PENDING_AUTH_TTL};

#[tokio::test]
async fn test_consume_succeeds_once() {
    let registry = PendingAuthRegistry::default();
    let state = registry.register(Service::Twitch, None).unwrap();

    let pending = registry.consume(&state).unwrap();
    assert_eq!(pending.service, Service::Twitch);
    assert!(pending.verifier.is_none());

    assert!(matches!(
        registry.consume(&state),
        Err(RegistryError::NotFound)
    ));
}

#[tokio::test]
async fn test_unknown_state_not_found() {
    let registry = PendingAuthRegistry::default();
    registry.register(Service::Twitch, None).unwrap();

    assert!(matches!(
        registry.consume("never-issued"),
        Err(RegistryError::NotFound)
    ));
    assert_eq!(registry.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_entry_expires_after_ttl() {
    let registry = PendingAuthRegistry::default();
    let fresh = registry.register(Service::Destinygg, Some("v".to_string())).unwrap();
    let stale = registry.register(Service::Destinygg, Some("v".to_string())).unwrap();

    tokio::time::advance(PENDING_AUTH_TTL - Duration::from_secs(1)).await;
    assert!(registry.consume(&fresh).is_ok());

    tokio::time::advance(Duration::from_secs(1)).await;
    assert!(!registry.contains(&stale));
    assert!(matches!(
        registry.consume(&stale),
        Err(RegistryError::NotFound)
    ));
}

#[tokio::test(start_paused = true)]
async fn test_purge_only_removes_expired() {
    let registry = PendingAuthRegistry::new(Duration::from_secs(60));
    registry.register(Service::Twitch, None).unwrap();
    registry.register(Service::Twitch, None).unwrap();

    tokio::time::advance(Duration::from_secs(45)).await;
    let young = registry.register(Service::Twitch, None).unwrap();

    tokio::time::advance(Duration::from_secs(20)).await;
    assert_eq!(registry.purge_expired(), 2);
    assert_eq!(registry.len(), 1);
    assert!(registry.contains(&young));
}

#[tokio::test(start_paused = true)]
async fn test_sweeper_purges_abandoned_logins() {
    let registry = PendingAuthRegistry::new(Duration::from_secs(60));
    for _ in 0..10 {
        registry.register(Service::Twitch, None).unwrap();
    }

    let sweeper = registry.spawn_sweeper(Duration::from_secs(30));

    // Interval ticks at t=0, 30, 60, 90; the entries are gone by t=90.
    tokio::time::sleep(Duration::from_secs(91)).await;
    assert!(registry.is_empty());

    sweeper.abort();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_consume_exactly_once() {
    let registry = Arc::new(PendingAuthRegistry::default());
    let state = registry.register(Service::Twitch, None).unwrap();

    let mut handles = Vec::new();
    for _ in 0..16 {
        let registry = registry.clone();
        let state = state.clone();
        handles.push(tokio::spawn(async move { registry.consume(&state).is_ok() }));
    }

    let mut wins = 0;
    for handle in handles {
        if handle.await.unwrap() {
            wins += 1;
        }
    }
    assert_eq!(wins, 1);
}
