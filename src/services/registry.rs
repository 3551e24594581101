// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Pending-authorization registry.
//!
//! Maps the random `state` sent on an authorize redirect to whatever the
//! callback needs to finish the login. Entries are single-use and live for
//! at most [`PENDING_AUTH_TTL`]:
//! - `consume` removes the entry atomically and rejects it if it is older
//!   than the TTL, so expiry holds even if the sweeper has not run yet.
//! - One background sweeper purges stale entries so abandoned logins do
//!   not accumulate.
//!
//! Removal is idempotent, so a consume and a sweep racing on the same
//! entry are harmless.

use crate::models::Service;
use crate::services::oauth::random_urlsafe;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

/// How long a login attempt may take between redirect and callback.
pub const PENDING_AUTH_TTL: Duration = Duration::from_secs(5 * 60);

/// How often the sweeper purges expired entries.
pub const SWEEP_INTERVAL: Duration = Duration::from_secs(30);

/// Random bytes per state token (256 bits, 43 characters).
const STATE_TOKEN_BYTES: usize = 32;

/// One in-flight login attempt.
#[derive(Debug, Clone)]
pub struct PendingAuthorization {
    pub service: Service,
    /// PKCE verifier, for providers that use one.
    pub verifier: Option<String>,
    pub created_at: Instant,
}

impl PendingAuthorization {
    fn is_expired(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.created_at) >= ttl
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Never registered, already consumed, or expired.
    #[error("Pending authorization not found")]
    NotFound,

    #[error("Failed to generate state token")]
    Random,
}

/// Shared registry of pending authorizations.
#[derive(Clone)]
pub struct PendingAuthRegistry {
    entries: Arc<DashMap<String, PendingAuthorization>>,
    ttl: Duration,
}

impl Default for PendingAuthRegistry {
    fn default() -> Self {
        Self::new(PENDING_AUTH_TTL)
    }
}

impl PendingAuthRegistry {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            ttl,
        }
    }

    /// Store a new pending authorization and return its state token.
    pub fn register(
        &self,
        service: Service,
        verifier: Option<String>,
    ) -> Result<String, RegistryError> {
        let state = random_urlsafe(STATE_TOKEN_BYTES).map_err(|_| RegistryError::Random)?;

        self.entries.insert(
            state.clone(),
            PendingAuthorization {
                service,
                verifier,
                created_at: Instant::now(),
            },
        );

        tracing::debug!(
            service = %service,
            pending = self.entries.len(),
            "Registered pending authorization"
        );
        Ok(state)
    }

    /// Take the entry for `state`. Succeeds at most once per token.
    pub fn consume(&self, state: &str) -> Result<PendingAuthorization, RegistryError> {
        let (_, pending) = self.entries.remove(state).ok_or(RegistryError::NotFound)?;

        if pending.is_expired(Instant::now(), self.ttl) {
            tracing::debug!(service = %pending.service, "Pending authorization expired before callback");
            return Err(RegistryError::NotFound);
        }

        Ok(pending)
    }

    /// Whether `state` is registered and not yet expired.
    pub fn contains(&self, state: &str) -> bool {
        self.entries
            .get(state)
            .is_some_and(|entry| !entry.is_expired(Instant::now(), self.ttl))
    }

    /// Drop every expired entry. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut purged = 0;
        self.entries.retain(|_, pending| {
            let keep = !pending.is_expired(now, self.ttl);
            if !keep {
                purged += 1;
            }
            keep
        });
        purged
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Spawn the background task that purges expired entries every `interval`.
    pub fn spawn_sweeper(&self, interval: Duration) -> JoinHandle<()> {
        let registry = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let purged = registry.purge_expired();
                if purged > 0 {
                    tracing::debug!(purged, remaining = registry.len(), "Purged expired pending authorizations");
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_tokens_are_long_and_distinct() {
        let registry = PendingAuthRegistry::default();
        let a = registry.register(Service::Twitch, None).unwrap();
        let b = registry.register(Service::Twitch, None).unwrap();

        assert_eq!(a.len(), 43);
        assert_ne!(a, b);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_consume_returns_stored_material() {
        let registry = PendingAuthRegistry::default();
        let state = registry
            .register(Service::Destinygg, Some("verifier".to_string()))
            .unwrap();

        let pending = registry.consume(&state).unwrap();
        assert_eq!(pending.service, Service::Destinygg);
        assert_eq!(pending.verifier.as_deref(), Some("verifier"));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_zero_ttl_entries_never_consumable() {
        let registry = PendingAuthRegistry::new(Duration::ZERO);
        let state = registry.register(Service::Twitch, None).unwrap();

        assert!(!registry.contains(&state));
        assert!(matches!(
            registry.consume(&state),
            Err(RegistryError::NotFound)
        ));
    }
}
