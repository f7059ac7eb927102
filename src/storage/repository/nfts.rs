// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 WalrusPass

//! NFT repository.
//!
//! An NFT record is keyed by the on-chain object id obtained after a
//! successful mint. Name, description, and price arrived in a later contract
//! revision and remain optional. Each NFT is stored as a separate JSON file
//! under `nfts/`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::super::{MetadataStore, StorageError, StorageResult};

/// Persisted NFT record.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct NftRecord {
    /// On-chain object id of the minted NFT.
    pub id: String,
    /// The file this NFT gates access to.
    pub file_id: String,
    /// Display name of the NFT.
    pub name: Option<String>,
    /// Description of the NFT.
    pub description: Option<String>,
    /// Listing price in MIST (integer smallest-unit string).
    pub price: Option<String>,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
    /// When the record was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Repository for NFT operations.
pub struct NftRepository<'a> {
    storage: &'a MetadataStore,
}

impl<'a> NftRepository<'a> {
    /// Create a new NftRepository.
    pub fn new(storage: &'a MetadataStore) -> Self {
        Self { storage }
    }

    /// Check if an NFT record exists.
    pub fn exists(&self, nft_id: &str) -> bool {
        self.storage.exists(self.storage.paths().nft(nft_id))
    }

    /// Get an NFT record by id.
    pub fn get(&self, nft_id: &str) -> StorageResult<NftRecord> {
        let path = self.storage.paths().nft(nft_id);
        if !self.storage.exists(&path) {
            return Err(StorageError::NotFound(format!("NFT {nft_id}")));
        }
        self.storage.read_json(path)
    }

    /// Create a new NFT record.
    pub fn create(&self, nft: &NftRecord) -> StorageResult<()> {
        let nft_id = &nft.id;

        if self.exists(nft_id) {
            return Err(StorageError::AlreadyExists(format!("NFT {nft_id}")));
        }

        self.storage
            .write_json(self.storage.paths().nft(nft_id), nft)
    }

    /// List all NFT records.
    pub fn list_all(&self) -> StorageResult<Vec<NftRecord>> {
        let nft_ids = self
            .storage
            .list_files(self.storage.paths().nfts_dir(), "json")?;

        let mut nfts = Vec::new();
        for id in nft_ids {
            if let Ok(nft) = self.get(&id) {
                nfts.push(nft);
            }
        }

        Ok(nfts)
    }

    /// Find the NFT referencing a file, if any.
    pub fn find_by_file(&self, file_id: &str) -> StorageResult<Option<NftRecord>> {
        Ok(self
            .list_all()?
            .into_iter()
            .find(|nft| nft.file_id == file_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::StoragePaths;
    use tempfile::TempDir;

    fn test_store() -> (MetadataStore, TempDir) {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let mut store = MetadataStore::new(StoragePaths::new(dir.path()));
        store.initialize().expect("Failed to initialize");
        (store, dir)
    }

    fn test_nft(id: &str, file_id: &str) -> NftRecord {
        NftRecord {
            id: id.to_string(),
            file_id: file_id.to_string(),
            name: Some("Walrus Pass #1".to_string()),
            description: Some("Exclusive access".to_string()),
            price: Some("100000000".to_string()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn create_and_get_nft() {
        let (store, _dir) = test_store();
        let repo = NftRepository::new(&store);

        let nft = test_nft("0xnft1", "upload-1");
        repo.create(&nft).unwrap();

        let loaded = repo.get("0xnft1").unwrap();
        assert_eq!(loaded.file_id, "upload-1");
        assert_eq!(loaded.price.as_deref(), Some("100000000"));
    }

    #[test]
    fn create_duplicate_fails() {
        let (store, _dir) = test_store();
        let repo = NftRepository::new(&store);

        let nft = test_nft("0xnft1", "upload-1");
        repo.create(&nft).unwrap();

        let result = repo.create(&nft);
        assert!(matches!(result, Err(StorageError::AlreadyExists(_))));
    }

    #[test]
    fn find_by_file_returns_matching_record() {
        let (store, _dir) = test_store();
        let repo = NftRepository::new(&store);

        repo.create(&test_nft("0xnft1", "upload-1")).unwrap();
        repo.create(&test_nft("0xnft2", "upload-2")).unwrap();

        let found = repo.find_by_file("upload-2").unwrap();
        assert_eq!(found.map(|n| n.id), Some("0xnft2".to_string()));

        let missing = repo.find_by_file("upload-9").unwrap();
        assert!(missing.is_none());
    }
}
