//! Database layer (Firestore, with an in-memory fallback).

pub mod firestore;
pub mod memory;

pub use firestore::FirestoreDb;
pub use memory::MemoryDb;

use crate::config::DatabaseConfig;
use crate::error::AppError;
use crate::models::{ExternalProfile, Service, User};
use uuid::Uuid;

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
}

/// Natural key of a user record: `{service}_{urlencoded name}`.
///
/// Used as the Firestore document ID so the store itself rejects a second
/// record for the same (name, service) pair.
pub fn identity_key(service: Service, name: &str) -> String {
    format!("{}_{}", service.as_str(), urlencoding::encode(name))
}

/// User record storage.
#[derive(Clone)]
pub enum UserStore {
    Firestore(FirestoreDb),
    Memory(MemoryDb),
}

impl UserStore {
    /// Connect to the backend named in the config.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, AppError> {
        match config {
            DatabaseConfig::Firestore { project_id } => {
                Ok(Self::Firestore(FirestoreDb::new(project_id).await?))
            }
            DatabaseConfig::Memory => {
                tracing::warn!("Using in-memory user store, records will not persist");
                Ok(Self::in_memory())
            }
        }
    }

    pub fn in_memory() -> Self {
        Self::Memory(MemoryDb::default())
    }

    /// Get a user by internal ID.
    pub async fn get_user(&self, id: Uuid) -> Result<Option<User>, AppError> {
        match self {
            Self::Firestore(db) => db.get_user(id).await,
            Self::Memory(db) => Ok(db.get_user(id)),
        }
    }

    /// Look up a user by natural key.
    pub async fn find_user(&self, name: &str, service: Service) -> Result<Option<User>, AppError> {
        match self {
            Self::Firestore(db) => db.find_user(name, service).await,
            Self::Memory(db) => Ok(db.find_user(name, service)),
        }
    }

    /// Return the existing record for (name, service), or create one.
    ///
    /// Existing records are returned untouched.
    pub async fn upsert_user(
        &self,
        service: Service,
        profile: &ExternalProfile,
    ) -> Result<User, AppError> {
        match self {
            Self::Firestore(db) => db.upsert_user(service, profile).await,
            Self::Memory(db) => Ok(db.upsert_user(service, profile)),
        }
    }

    /// Delete the record for (name, service). Returns whether one existed.
    pub async fn delete_user(&self, name: &str, service: Service) -> Result<bool, AppError> {
        match self {
            Self::Firestore(db) => db.delete_user(name, service).await,
            Self::Memory(db) => Ok(db.delete_user(name, service)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_key_escapes_separators() {
        assert_eq!(identity_key(Service::Twitch, "bob"), "twitch_bob");
        assert_eq!(
            identity_key(Service::Destinygg, "a/b c"),
            "destinygg_a%2Fb%20c"
        );
    }
}
