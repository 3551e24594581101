// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod service;
pub mod user;

pub use service::{Service, UnknownService};
pub use user::{ExternalProfile, User};
