//! User model for storage and API.

use crate::models::Service;
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Internal user record, unique per (name, service).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Internal ID handed out in session tokens and on the verify page
    pub id: Uuid,
    pub service: Service,
    /// Provider handle, unique within the service
    pub name: String,
    pub display_name: Option<String>,
    /// Email address (may be None if not shared)
    pub email: Option<String>,
    /// The provider's own user ID
    pub external_id: Option<String>,
    /// When the user first logged in (RFC3339, UTC)
    pub created_at: String,
}

impl User {
    /// Build a fresh record with a new internal ID.
    pub fn from_profile(service: Service, profile: &ExternalProfile) -> Self {
        Self {
            id: Uuid::new_v4(),
            service,
            name: profile.name.clone(),
            display_name: profile.display_name.clone(),
            email: profile.email.clone(),
            external_id: profile.external_id.clone(),
            created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        }
    }

    /// Name to show on pages, falling back to the handle.
    pub fn shown_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }
}

/// Profile returned by a provider's userinfo endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalProfile {
    pub external_id: Option<String>,
    pub name: String,
    pub display_name: Option<String>,
    pub email: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_profile_generates_distinct_ids() {
        let profile = ExternalProfile {
            external_id: Some("42".to_string()),
            name: "someone".to_string(),
            display_name: None,
            email: None,
        };
        let a = User::from_profile(Service::Twitch, &profile);
        let b = User::from_profile(Service::Twitch, &profile);

        assert_ne!(a.id, b.id);
        assert_eq!(a.shown_name(), "someone");
        assert!(a.created_at.ends_with('Z'));
    }
}
