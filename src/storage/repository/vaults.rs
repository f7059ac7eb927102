// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 WalrusPass

//! Vault repository.
//!
//! A vault record mirrors a container created in the external storage
//! subsystem; the id is minted there, not here. Records are create-only in
//! this service. Each vault is stored as a separate JSON file under
//! `vaults/`.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::super::{MetadataStore, StorageError, StorageResult};

/// Persisted vault record.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct VaultRecord {
    /// Vault identifier assigned by the storage subsystem.
    pub id: String,
    /// Human-readable vault name.
    pub name: String,
    /// Wallet address of the vault creator.
    pub wallet_address: String,
    /// Whether the vault was created with end-to-end encryption.
    ///
    /// Records intent at creation time only; never re-verified against the
    /// storage subsystem.
    pub encrypted: bool,
}

/// Repository for vault operations.
pub struct VaultRepository<'a> {
    storage: &'a MetadataStore,
}

impl<'a> VaultRepository<'a> {
    /// Create a new VaultRepository.
    pub fn new(storage: &'a MetadataStore) -> Self {
        Self { storage }
    }

    /// Check if a vault record exists.
    pub fn exists(&self, vault_id: &str) -> bool {
        self.storage.exists(self.storage.paths().vault(vault_id))
    }

    /// Get a vault record by id.
    pub fn get(&self, vault_id: &str) -> StorageResult<VaultRecord> {
        let path = self.storage.paths().vault(vault_id);
        if !self.storage.exists(&path) {
            return Err(StorageError::NotFound(format!("Vault {vault_id}")));
        }
        self.storage.read_json(path)
    }

    /// Create a new vault record.
    pub fn create(&self, vault: &VaultRecord) -> StorageResult<()> {
        let vault_id = &vault.id;

        if self.exists(vault_id) {
            return Err(StorageError::AlreadyExists(format!("Vault {vault_id}")));
        }

        self.storage
            .write_json(self.storage.paths().vault(vault_id), vault)
    }

    /// List all vault records.
    pub fn list_all(&self) -> StorageResult<Vec<VaultRecord>> {
        let vault_ids = self
            .storage
            .list_files(self.storage.paths().vaults_dir(), "json")?;

        let mut vaults = Vec::new();
        for id in vault_ids {
            if let Ok(vault) = self.get(&id) {
                vaults.push(vault);
            }
        }

        Ok(vaults)
    }

    /// List vault records owned by a wallet.
    pub fn list_by_wallet(&self, wallet_address: &str) -> StorageResult<Vec<VaultRecord>> {
        Ok(self
            .list_all()?
            .into_iter()
            .filter(|vault| vault.wallet_address == wallet_address)
            .collect())
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

    fn test_vault(id: &str, wallet: &str) -> VaultRecord {
        VaultRecord {
            id: id.to_string(),
            name: "My Vault".to_string(),
            wallet_address: wallet.to_string(),
            encrypted: true,
        }
    }

    #[test]
    fn create_and_get_vault() {
        let (store, _dir) = test_store();
        let repo = VaultRepository::new(&store);

        let vault = test_vault("vault-1", "0xabc");
        repo.create(&vault).unwrap();

        let loaded = repo.get("vault-1").unwrap();
        assert_eq!(loaded, vault);
    }

    #[test]
    fn create_duplicate_fails() {
        let (store, _dir) = test_store();
        let repo = VaultRepository::new(&store);

        let vault = test_vault("vault-1", "0xabc");
        repo.create(&vault).unwrap();

        let result = repo.create(&vault);
        assert!(matches!(result, Err(StorageError::AlreadyExists(_))));
    }

    #[test]
    fn list_by_wallet_filters_correctly() {
        let (store, _dir) = test_store();
        let repo = VaultRepository::new(&store);

        repo.create(&test_vault("vault-a1", "0xaaa")).unwrap();
        repo.create(&test_vault("vault-a2", "0xaaa")).unwrap();
        repo.create(&test_vault("vault-b1", "0xbbb")).unwrap();

        assert_eq!(repo.list_by_wallet("0xaaa").unwrap().len(), 2);
        assert_eq!(repo.list_by_wallet("0xbbb").unwrap().len(), 1);
        assert!(repo.list_by_wallet("0xccc").unwrap().is_empty());
    }
}
