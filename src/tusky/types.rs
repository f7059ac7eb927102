// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 WalrusPass

//! Wire types for the encrypted-storage service.

use serde::{Deserialize, Serialize};

/// Marker the service uses when an account has no key material yet.
const NO_KEYS_MARKER: &str = "No keys found";

/// Errors from the encrypted-storage service.
///
/// These are deliberately unclassified: the orchestrator logs them with
/// context and surfaces them as-is, per the adapter contract.
#[derive(Debug, thiserror::Error)]
pub enum TuskyError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Storage service error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Unexpected response shape: {0}")]
    Decode(String),
}

impl TuskyError {
    /// Whether this error means the account has no encryption keys yet.
    pub fn is_missing_keys(&self) -> bool {
        matches!(self, TuskyError::Api { message, .. } if message.contains(NO_KEYS_MARKER))
    }
}

/// Result of creating a vault.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VaultHandle {
    /// Vault identifier minted by the service.
    pub id: String,
    /// Vault name as stored by the service.
    pub name: String,
}

/// Vault details as reported by the service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VaultDetails {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub encrypted: bool,
    #[serde(default)]
    pub size: Option<u64>,
}

/// File details as reported by the service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FileDetails {
    pub id: String,
    #[serde(default)]
    pub vault_id: Option<String>,
    #[serde(default)]
    pub upload_id: Option<String>,
    #[serde(default)]
    pub blob_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub encrypted: bool,
    #[serde(default)]
    pub status: Option<String>,
}

/// A file to upload into a vault.
#[derive(Debug, Clone)]
pub struct FileUpload {
    /// Original file name.
    pub name: String,
    /// MIME type of the content.
    pub mime_type: String,
    /// Raw file bytes.
    pub bytes: Vec<u8>,
}

/// Filters for file listings.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FileListFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vault_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upload_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

/// One normalized page of file listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePage {
    pub items: Vec<FileDetails>,
    pub next_token: Option<String>,
}

/// The service has returned file listings in three shapes across API
/// revisions; deserialize whichever arrives and normalize to [`FilePage`].
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawFileListing {
    Paged {
        items: Vec<FileDetails>,
        #[serde(default)]
        next_token: Option<String>,
    },
    Wrapped {
        data: Vec<FileDetails>,
        #[serde(default)]
        next_token: Option<String>,
    },
    Bare(Vec<FileDetails>),
}

impl From<RawFileListing> for FilePage {
    fn from(raw: RawFileListing) -> Self {
        match raw {
            RawFileListing::Paged { items, next_token } => FilePage { items, next_token },
            RawFileListing::Wrapped { data, next_token } => FilePage {
                items: data,
                next_token,
            },
            RawFileListing::Bare(items) => FilePage {
                items,
                next_token: None,
            },
        }
    }
}
