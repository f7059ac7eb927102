// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 WalrusPass

//! Pending NFT-save repository.
//!
//! A mint that succeeds on-chain but fails to persist its metadata leaves a
//! pending record here, keyed by the transaction digest. The background
//! reconciler replays these until the metadata save goes through.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::super::{MetadataStore, StorageError, StorageResult};

/// A deferred NFT metadata save awaiting retry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PendingNftSave {
    /// Transaction digest of the successful mint.
    pub digest: String,
    /// Minted object id, if it could be resolved at enqueue time.
    pub nft_id: Option<String>,
    /// The file the NFT gates access to.
    pub file_id: String,
    /// Display name captured at mint time.
    pub name: Option<String>,
    /// Description captured at mint time.
    pub description: Option<String>,
    /// Price in MIST captured at mint time.
    pub price: Option<String>,
    /// How many replay attempts have been made.
    pub attempts: u32,
    /// When the save was deferred.
    pub created_at: DateTime<Utc>,
}

/// Repository for pending NFT-save records.
pub struct PendingNftRepository<'a> {
    storage: &'a MetadataStore,
}

impl<'a> PendingNftRepository<'a> {
    /// Create a new PendingNftRepository.
    pub fn new(storage: &'a MetadataStore) -> Self {
        Self { storage }
    }

    /// Check if a pending record exists for a digest.
    pub fn exists(&self, digest: &str) -> bool {
        self.storage
            .exists(self.storage.paths().pending_nft(digest))
    }

    /// Get a pending record by digest.
    pub fn get(&self, digest: &str) -> StorageResult<PendingNftSave> {
        let path = self.storage.paths().pending_nft(digest);
        if !self.storage.exists(&path) {
            return Err(StorageError::NotFound(format!("Pending save {digest}")));
        }
        self.storage.read_json(path)
    }

    /// Enqueue or overwrite a pending record.
    ///
    /// Writes are keyed by digest so re-enqueueing the same mint is
    /// idempotent.
    pub fn put(&self, pending: &PendingNftSave) -> StorageResult<()> {
        self.storage
            .write_json(self.storage.paths().pending_nft(&pending.digest), pending)
    }

    /// Remove a pending record once the save succeeded (or is abandoned).
    pub fn remove(&self, digest: &str) -> StorageResult<()> {
        if !self.exists(digest) {
            return Err(StorageError::NotFound(format!("Pending save {digest}")));
        }
        self.storage.delete(self.storage.paths().pending_nft(digest))
    }

    /// List digests of all pending records.
    pub fn list_digests(&self) -> StorageResult<Vec<String>> {
        self.storage
            .list_files(self.storage.paths().pending_nfts_dir(), "json")
    }
}
