// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Identity providers supported by the gateway.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Origin provider of a user identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Service {
    Twitch,
    Destinygg,
}

impl Service {
    pub const ALL: [Service; 2] = [Service::Twitch, Service::Destinygg];

    /// Stored value of the `service` field.
    pub fn as_str(&self) -> &'static str {
        match self {
            Service::Twitch => "twitch",
            Service::Destinygg => "destinygg",
        }
    }

    /// Path prefix for the login/callback/logout routes.
    pub fn route_prefix(&self) -> &'static str {
        match self {
            Service::Twitch => "/twitch",
            Service::Destinygg => "/dgg",
        }
    }

    /// Human-readable provider name for messages.
    pub fn display_name(&self) -> &'static str {
        match self {
            Service::Twitch => "Twitch",
            Service::Destinygg => "Destiny.gg",
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown service: {0}")]
pub struct UnknownService(pub String);

impl FromStr for Service {
    type Err = UnknownService;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "twitch" => Ok(Service::Twitch),
            "destinygg" | "dgg" => Ok(Service::Destinygg),
            other => Err(UnknownService(other.to_string())),
        }
    }
}
