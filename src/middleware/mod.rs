// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Middleware modules (session cookies, security headers).

pub mod auth;
pub mod security;

pub use auth::{clear_session_cookie, is_secure_request, session_cookie, session_user};
