// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 WalrusPass

//! Gateway error taxonomy.
//!
//! Gateway operations never panic and never bubble raw storage errors to
//! callers; every failure is classified into one of the kinds below so the
//! caller can branch without exception-style control flow. HTTP entry
//! points map each kind to a status code.

use axum::http::StatusCode;

use crate::storage::StorageError;

/// Classified failure kinds for gateway operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayErrorKind {
    /// Malformed or missing input
    Validation,
    /// Missing or invalid bearer token
    Unauthorized,
    /// Authenticated but not entitled
    Forbidden,
    /// Referenced Vault/File/Profile absent
    NotFound,
    /// Persistence failure
    Database,
    /// Upstream network failure
    Network,
    /// Anything else
    Unknown,
}

impl GatewayErrorKind {
    /// Stable machine-readable name for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            GatewayErrorKind::Validation => "validation",
            GatewayErrorKind::Unauthorized => "unauthorized",
            GatewayErrorKind::Forbidden => "forbidden",
            GatewayErrorKind::NotFound => "not_found",
            GatewayErrorKind::Database => "database",
            GatewayErrorKind::Network => "network",
            GatewayErrorKind::Unknown => "unknown",
        }
    }
}

/// A classified gateway failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayError {
    /// Failure classification.
    pub kind: GatewayErrorKind,
    /// Human-readable message.
    pub message: String,
}

impl GatewayError {
    pub fn new(kind: GatewayErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(GatewayErrorKind::Validation, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(GatewayErrorKind::Unauthorized, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(GatewayErrorKind::Forbidden, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(GatewayErrorKind::NotFound, message)
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::new(GatewayErrorKind::Database, message)
    }

    /// HTTP status code for this error kind.
    pub fn status_code(&self) -> StatusCode {
        match self.kind {
            GatewayErrorKind::Validation => StatusCode::UNPROCESSABLE_ENTITY,
            GatewayErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
            GatewayErrorKind::Forbidden => StatusCode::FORBIDDEN,
            GatewayErrorKind::NotFound => StatusCode::NOT_FOUND,
            GatewayErrorKind::Database
            | GatewayErrorKind::Network
            | GatewayErrorKind::Unknown => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl std::fmt::Display for GatewayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind.as_str(), self.message)
    }
}

impl std::error::Error for GatewayError {}

impl From<StorageError> for GatewayError {
    fn from(error: StorageError) -> Self {
        match error {
            StorageError::NotFound(entity) => GatewayError::not_found(entity),
            other => GatewayError::database(other.to_string()),
        }
    }
}

/// Result type for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_map_to_expected_status_codes() {
        let cases = [
            (GatewayError::validation("v"), StatusCode::UNPROCESSABLE_ENTITY),
            (GatewayError::unauthorized("u"), StatusCode::UNAUTHORIZED),
            (GatewayError::forbidden("f"), StatusCode::FORBIDDEN),
            (GatewayError::not_found("n"), StatusCode::NOT_FOUND),
            (GatewayError::database("d"), StatusCode::INTERNAL_SERVER_ERROR),
            (
                GatewayError::new(GatewayErrorKind::Network, "n"),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                GatewayError::new(GatewayErrorKind::Unknown, "u"),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, status) in cases {
            assert_eq!(error.status_code(), status, "kind {:?}", error.kind);
        }
    }

    #[test]
    fn storage_not_found_converts_to_not_found_kind() {
        let error: GatewayError = StorageError::NotFound("Vault v-1".to_string()).into();
        assert_eq!(error.kind, GatewayErrorKind::NotFound);

        let error: GatewayError =
            StorageError::AlreadyExists("Vault v-1".to_string()).into();
        assert_eq!(error.kind, GatewayErrorKind::Database);
    }

    #[test]
    fn display_includes_kind_and_message() {
        let error = GatewayError::validation("limit out of range");
        assert_eq!(error.to_string(), "validation: limit out of range");
    }
}
