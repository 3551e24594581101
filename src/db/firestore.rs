// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed user operations.
//!
//! Documents in `users` are keyed by [`identity_key`], so a create-only
//! insert gives us the (name, service) uniqueness constraint for free. The
//! internal UUID lives in the `id` field and is looked up by query.

use crate::db::{collections, identity_key};
use crate::error::AppError;
use crate::models::{ExternalProfile, Service, User};
use firestore::errors::FirestoreError;
use uuid::Uuid;

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: firestore::FirestoreDb,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self { client })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self { client })
    }

    /// Get a user by internal ID.
    pub async fn get_user(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let id = id.to_string();
        let users: Vec<User> = self
            .client
            .fluent()
            .select()
            .from(collections::USERS)
            .filter(move |q| q.for_all([q.field("id").eq(id.clone())]))
            .limit(1)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(users.into_iter().next())
    }

    /// Get a user by (name, service).
    pub async fn find_user(&self, name: &str, service: Service) -> Result<Option<User>, AppError> {
        self.client
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(&identity_key(service, name))
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Return the existing user for (name, service) or insert a new one.
    ///
    /// Two first-time logins racing on the same identity both reach the
    /// insert; the loser gets a conflict and re-reads the winner's record.
    pub async fn upsert_user(
        &self,
        service: Service,
        profile: &ExternalProfile,
    ) -> Result<User, AppError> {
        if let Some(existing) = self.find_user(&profile.name, service).await? {
            return Ok(existing);
        }

        let user = User::from_profile(service, profile);
        let doc_id = identity_key(service, &profile.name);

        let inserted: Result<User, FirestoreError> = self
            .client
            .fluent()
            .insert()
            .into(collections::USERS)
            .document_id(&doc_id)
            .object(&user)
            .execute()
            .await;

        match inserted {
            Ok(user) => {
                tracing::info!(user_id = %user.id, service = %service, name = %user.name, "Created user");
                Ok(user)
            }
            Err(FirestoreError::DataConflictError(_)) => {
                tracing::debug!(service = %service, name = %profile.name, "Concurrent user insert, re-reading");
                self.find_user(&profile.name, service).await?.ok_or_else(|| {
                    AppError::Database(format!("User {} vanished after insert conflict", doc_id))
                })
            }
            Err(e) => Err(AppError::Database(e.to_string())),
        }
    }

    /// Delete a user by (name, service).
    pub async fn delete_user(&self, name: &str, service: Service) -> Result<bool, AppError> {
        if self.find_user(name, service).await?.is_none() {
            return Ok(false);
        }

        self.client
            .fluent()
            .delete()
            .from(collections::USERS)
            .document_id(identity_key(service, name))
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        tracing::info!(service = %service, name, "Deleted user");
        Ok(true)
    }
}
