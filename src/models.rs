// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 WalrusPass

//! # API Data Models
//!
//! This module defines the request and response data structures used by
//! the REST API. All types derive `Serialize`, `Deserialize`, and `ToSchema`
//! for automatic JSON handling and OpenAPI documentation.
//!
//! ## Wallet Address Type
//!
//! The [`WalletAddress`] newtype wraps Sui-style addresses (0x-prefixed,
//! 64 hex characters). It provides type safety and clear semantics.
//!
//! ## Model Categories
//!
//! - **Vaults**: encrypted-container records persisted after vault creation
//! - **Files**: upload records pointing at vault contents
//! - **NFTs**: on-chain object records gating file access
//! - **Profiles**: display name and avatar for a signed-in account

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::storage::{FileRecord, NftRecord, ProfileRecord, VaultRecord};

// =============================================================================
// Wallet Address Type
// =============================================================================

/// Sui-compatible wallet address wrapper.
///
/// Provides type safety for wallet addresses throughout the API.
/// Format: `0x` followed by 64 hexadecimal characters (32 bytes).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WalletAddress(pub String);

impl std::fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for WalletAddress {
    fn from(value: String) -> Self {
        WalletAddress(value)
    }
}

impl From<&str> for WalletAddress {
    fn from(value: &str) -> Self {
        WalletAddress(value.to_string())
    }
}

impl From<WalletAddress> for String {
    fn from(value: WalletAddress) -> Self {
        value.0
    }
}

// =============================================================================
// Vault Models
// =============================================================================

/// Request to persist a vault record after the storage subsystem created it.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateVaultRequest {
    /// Human-readable vault name.
    pub name: String,
    /// Vault identifier assigned by the storage subsystem.
    pub vault_id: String,
    /// Wallet address of the vault creator.
    pub wallet_address: WalletAddress,
    /// Whether the vault contents are end-to-end encrypted.
    #[serde(default)]
    pub encrypted: Option<bool>,
}

/// Response after persisting a vault record.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateVaultResponse {
    /// Always `true` on the success path.
    pub success: bool,
    /// The persisted (or pre-existing) vault record.
    pub vault: VaultRecord,
}

// =============================================================================
// File Models
// =============================================================================

/// Request to persist a file record after a successful upload.
///
/// The upload identifier doubles as the persisted file id.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SaveFileRequest {
    /// Client-side file identifier (informational).
    pub file_id: String,
    /// Upload identifier returned by the storage subsystem.
    pub upload_id: String,
    /// Content-addressable blob pointer into the storage backend.
    pub blob_id: String,
    /// Original file name.
    pub name: String,
    /// Owning vault identifier.
    pub vault_id: String,
    /// Wallet address that owns the vault.
    pub wallet_address: WalletAddress,
    /// MIME type of the uploaded content.
    #[serde(default)]
    pub mime_type: Option<String>,
    /// Size of the uploaded content in bytes.
    #[serde(default)]
    pub size: Option<u64>,
}

/// Response after persisting a file record.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SaveFileResponse {
    /// Always `true` on the success path.
    pub success: bool,
    /// The persisted file record.
    pub file: FileRecord,
}

/// Query parameters for the file listing endpoint.
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct ListFilesQuery {
    /// Restrict the listing to one vault.
    #[serde(rename = "vaultId")]
    pub vault_id: Option<String>,
    /// Restrict the listing to vaults owned by this wallet.
    pub wallet_address: Option<String>,
    /// Maximum number of records to return (1..=1000).
    pub limit: Option<i64>,
    /// Number of records to skip.
    pub offset: Option<i64>,
}

// =============================================================================
// NFT Models
// =============================================================================

/// Request to persist an NFT record after a successful mint.
///
/// Name, description, and price arrived in a later contract revision and
/// stay optional for older clients.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateNftRequest {
    /// On-chain object id of the minted NFT.
    pub nft_id: String,
    /// The file this NFT gates access to.
    pub file_id: String,
    /// Display name of the NFT.
    #[serde(default)]
    pub name: Option<String>,
    /// Description of the NFT.
    #[serde(default)]
    pub description: Option<String>,
    /// Listing price as a decimal SUI string (converted to MIST on persist).
    #[serde(default)]
    pub price: Option<String>,
}

/// Response after persisting an NFT record.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateNftResponse {
    /// Always `true` on the success path.
    pub success: bool,
    /// The persisted NFT record.
    pub nft: NftRecord,
}

// =============================================================================
// Profile Models
// =============================================================================

/// Query parameters for the profile lookup endpoint.
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct ProfileQuery {
    /// Profile owner's account id.
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
}

/// Response after updating a profile.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateProfileResponse {
    /// Always `true` on the success path.
    pub success: bool,
    /// The updated profile record.
    pub profile: ProfileRecord,
}
