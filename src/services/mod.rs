// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod destinygg;
pub mod login;
pub mod oauth;
pub mod registry;
pub mod session;
pub mod twitch;

pub use destinygg::DestinyggProvider;
pub use login::{CallbackOutcome, CallbackParams};
pub use oauth::{http_client, OAuthProvider, ProviderError, Providers};
pub use registry::{
    PendingAuthRegistry, PendingAuthorization, RegistryError, PENDING_AUTH_TTL, SWEEP_INTERVAL,
};
pub use session::{SessionClaims, SessionError, SessionIssuer};
pub use twitch::TwitchProvider;
