// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 WalrusPass

//! Session-token claims and authenticated user representation.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Claims carried by a session token.
///
/// The auth provider issues standard OIDC-ish claims; only `sub` is
/// required here. Fields must exist for serde JWT deserialization even
/// though not all are read directly.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionClaims {
    /// Subject — the canonical account identifier.
    pub sub: String,

    /// Issued at timestamp.
    #[serde(default)]
    #[allow(dead_code)]
    pub iat: i64,

    /// Expiration timestamp.
    #[serde(default)]
    pub exp: i64,

    /// Issuer.
    #[serde(default)]
    pub iss: String,

    /// Audience (validated by the jsonwebtoken crate, not read directly).
    #[serde(default)]
    #[allow(dead_code)]
    pub aud: Option<serde_json::Value>,

    /// Session identifier, when the provider includes one.
    #[serde(default)]
    pub session_id: Option<String>,

    /// Account email, when the provider includes one.
    #[serde(default)]
    pub email: Option<String>,
}

/// Authenticated user information extracted from a session token.
///
/// This is the primary type used throughout the application to represent
/// the authenticated account making a request.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedUser {
    /// Canonical account id (`sub` claim).
    pub user_id: String,
    /// Session identifier, if present.
    pub session_id: Option<String>,
    /// Account email, if present.
    pub email: Option<String>,
    /// Token issuer.
    pub issuer: String,
    /// Token expiry (Unix seconds).
    pub expires_at: i64,
}

impl From<SessionClaims> for AuthenticatedUser {
    fn from(claims: SessionClaims) -> Self {
        Self {
            user_id: claims.sub,
            session_id: claims.session_id,
            email: claims.email,
            issuer: claims.iss,
            expires_at: claims.exp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authenticated_user_from_claims() {
        let claims: SessionClaims = serde_json::from_str(
            r#"{"sub":"user-1","exp":9999999999,"iss":"walruspass","session_id":"sess-1"}"#,
        )
        .unwrap();

        let user: AuthenticatedUser = claims.into();
        assert_eq!(user.user_id, "user-1");
        assert_eq!(user.session_id.as_deref(), Some("sess-1"));
        assert_eq!(user.issuer, "walruspass");
        assert!(user.email.is_none());
    }
}
