// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Process-local user store for tests and single-instance local runs.

use crate::db::identity_key;
use crate::models::{ExternalProfile, Service, User};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;
use uuid::Uuid;

/// In-memory user store.
///
/// Lock order is always `by_identity` then `by_id`; readers clone the key out
/// of `by_id` and release it before touching `by_identity`.
#[derive(Clone, Default)]
pub struct MemoryDb {
    by_identity: Arc<DashMap<String, User>>,
    by_id: Arc<DashMap<Uuid, String>>,
}

impl MemoryDb {
    pub fn get_user(&self, id: Uuid) -> Option<User> {
        let key = self.by_id.get(&id).map(|entry| entry.value().clone())?;
        self.by_identity.get(&key).map(|entry| entry.value().clone())
    }

    pub fn find_user(&self, name: &str, service: Service) -> Option<User> {
        self.by_identity
            .get(&identity_key(service, name))
            .map(|entry| entry.value().clone())
    }

    pub fn upsert_user(&self, service: Service, profile: &ExternalProfile) -> User {
        let key = identity_key(service, &profile.name);
        match self.by_identity.entry(key.clone()) {
            Entry::Occupied(existing) => existing.get().clone(),
            Entry::Vacant(slot) => {
                let user = User::from_profile(service, profile);
                self.by_id.insert(user.id, key);
                tracing::info!(user_id = %user.id, service = %service, name = %user.name, "Created user");
                slot.insert(user.clone());
                user
            }
        }
    }

    pub fn delete_user(&self, name: &str, service: Service) -> bool {
        match self.by_identity.remove(&identity_key(service, name)) {
            Some((_, user)) => {
                self.by_id.remove(&user.id);
                true
            }
            None => false,
        }
    }

    /// Number of stored users.
    pub fn len(&self) -> usize {
        self.by_identity.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_identity.is_empty()
    }
}
