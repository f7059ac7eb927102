// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 WalrusPass

//! # Listing Workflow
//!
//! The linear state machine that walks a signed-in user from encryption
//! setup through vault creation and file upload to minting and listing an
//! NFT. One parameterized engine replaces the near-identical page variants
//! of earlier frontends; the differing affordances (privacy toggle, NFT
//! detail fields, price floor) are [`WorkflowConfig`] options.
//!
//! The engine holds no ambient context: the session and every collaborator
//! arrive as constructor arguments, so tests substitute fakes freely.
//! State lives only in memory — dropping the engine resets the flow, an
//! accepted limitation.

pub mod engine;

pub use engine::{
    purchase_nft, CreatedVault, ListingWorkflow, MetadataPersistence, MintOutcome,
    PurchaseReceipt, UploadedFile,
};

use crate::gateway::GatewayError;
use crate::sui::client::ChainError;
use crate::tusky::TuskyError;

/// Fixed minimum listing price (0.1 SUI in MIST).
pub const DEFAULT_MIN_PRICE_MIST: u64 = 100_000_000;

/// Steps of the listing workflow, in order. Strictly forward, no cycles,
/// never more than one step active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowStep {
    /// Initial; a signed-in session is required before proceeding.
    AwaitingAuthentication,
    /// Collect a password and configure encryption.
    EncryptionSetup,
    /// Collect a vault name and create the vault.
    VaultCreation,
    /// Collect one file and upload it.
    FileUpload,
    /// Collect NFT details and mint.
    NftMinting,
    /// Terminal; offers starting over.
    Success,
}

impl std::fmt::Display for WorkflowStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            WorkflowStep::AwaitingAuthentication => "awaiting_authentication",
            WorkflowStep::EncryptionSetup => "encryption_setup",
            WorkflowStep::VaultCreation => "vault_creation",
            WorkflowStep::FileUpload => "file_upload",
            WorkflowStep::NftMinting => "nft_minting",
            WorkflowStep::Success => "success",
        };
        write!(f, "{name}")
    }
}

/// Versioned UI affordances of the workflow.
#[derive(Debug, Clone)]
pub struct WorkflowConfig {
    /// When set, the privacy toggle must be "private" for vault creation
    /// to proceed.
    pub require_private_vault: bool,
    /// When set, name/description/price are collected and persisted with
    /// the NFT record (later page revisions); otherwise only the ids are
    /// recorded.
    pub collect_nft_details: bool,
    /// Minimum listing price in MIST.
    pub min_price_mist: u64,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            require_private_vault: true,
            collect_nft_details: true,
            min_price_mist: DEFAULT_MIN_PRICE_MIST,
        }
    }
}

/// The signed-in session driving one workflow instance.
#[derive(Debug, Clone)]
pub struct Session {
    /// Wallet address of the signed-in account.
    pub wallet_address: String,
    /// Whether the account already has encryption configured; when set the
    /// encryption-setup step is bypassed entirely.
    pub encryption_configured: bool,
}

/// Failures surfaced by workflow steps.
///
/// Adapter errors pass through unclassified; gateway errors keep their
/// taxonomy kind. Every failure halts the current step without advancing —
/// the user retries the same action manually.
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error("A signed-in session with a wallet address is required")]
    NotSignedIn,

    #[error("Step out of order: expected {expected}, currently at {actual}")]
    OutOfOrder {
        expected: WorkflowStep,
        actual: WorkflowStep,
    },

    #[error("Another action is still in flight")]
    Busy,

    #[error("{0} must not be empty")]
    EmptyInput(&'static str),

    #[error("Only private encrypted vaults can hold listed files")]
    PublicVaultRejected,

    #[error("Price {price} MIST is below the minimum of {minimum} MIST")]
    PriceBelowMinimum { price: u64, minimum: u64 },

    #[error("Transaction failed on-chain: {0}")]
    TransactionFailed(String),

    #[error(transparent)]
    Storage(#[from] TuskyError),

    #[error(transparent)]
    Chain(#[from] ChainError),

    #[error("{0}")]
    Gateway(#[from] GatewayError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_latest_revision() {
        let config = WorkflowConfig::default();
        assert!(config.require_private_vault);
        assert!(config.collect_nft_details);
        assert_eq!(config.min_price_mist, 100_000_000);
    }

    #[test]
    fn steps_display_as_snake_case() {
        assert_eq!(WorkflowStep::EncryptionSetup.to_string(), "encryption_setup");
        assert_eq!(WorkflowStep::Success.to_string(), "success");
    }
}
