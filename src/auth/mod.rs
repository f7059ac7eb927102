// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 WalrusPass

//! # Authentication Module
//!
//! Bearer-token session authentication for the profile mutation endpoints.
//!
//! ## Auth Flow
//!
//! 1. The frontend signs the user in with the auth provider (wallet
//!    signature based) and receives a session token.
//! 2. Requests carry `Authorization: Bearer <session token>`.
//! 3. This server:
//!    - Verifies the HS256 signature against the shared session secret
//!    - Checks expiry (60 s clock-skew leeway), issuer, and audience
//!    - Extracts `sub` → canonical `user_id`
//!
//! ## Modes
//!
//! - **Production mode** (`SESSION_JWT_SECRET` set): full signature
//!   verification
//! - **Development mode** (no secret): structure validation only

pub mod claims;
pub mod error;
pub mod extractor;

pub use claims::AuthenticatedUser;
pub use error::AuthError;
pub use extractor::Auth;

/// Verification settings for session tokens.
#[derive(Debug, Clone, Default)]
pub struct AuthConfig {
    /// HS256 shared secret; `None` enables development mode.
    pub secret: Option<String>,
    /// Expected `iss` claim, when configured.
    pub issuer: Option<String>,
    /// Expected `aud` claim, when configured.
    pub audience: Option<String>,
}
