// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 WalrusPass

//! File repository.
//!
//! A file record is keyed by the upload identifier the storage subsystem
//! returned; the two are the same value in this service. Records are
//! create-only. Each file is stored as a separate JSON file under `files/`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::super::{MetadataStore, StorageError, StorageResult};

/// Persisted file record.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct FileRecord {
    /// File identifier (equals the storage subsystem's upload id).
    pub id: String,
    /// Owning vault identifier.
    pub vault_id: String,
    /// Content-addressable blob pointer into the storage backend.
    pub blob_id: String,
    /// Original file name.
    pub name: String,
    /// MIME type of the uploaded content.
    pub mime_type: Option<String>,
    /// Size of the uploaded content in bytes.
    pub size: Option<u64>,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
    /// When the record was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Repository for file operations.
pub struct FileRepository<'a> {
    storage: &'a MetadataStore,
}

impl<'a> FileRepository<'a> {
    /// Create a new FileRepository.
    pub fn new(storage: &'a MetadataStore) -> Self {
        Self { storage }
    }

    /// Check if a file record exists.
    pub fn exists(&self, file_id: &str) -> bool {
        self.storage.exists(self.storage.paths().file(file_id))
    }

    /// Get a file record by id.
    pub fn get(&self, file_id: &str) -> StorageResult<FileRecord> {
        let path = self.storage.paths().file(file_id);
        if !self.storage.exists(&path) {
            return Err(StorageError::NotFound(format!("File {file_id}")));
        }
        self.storage.read_json(path)
    }

    /// Create a new file record.
    pub fn create(&self, file: &FileRecord) -> StorageResult<()> {
        let file_id = &file.id;

        if self.exists(file_id) {
            return Err(StorageError::AlreadyExists(format!("File {file_id}")));
        }

        self.storage
            .write_json(self.storage.paths().file(file_id), file)
    }

    /// List all file records.
    pub fn list_all(&self) -> StorageResult<Vec<FileRecord>> {
        let file_ids = self
            .storage
            .list_files(self.storage.paths().files_dir(), "json")?;

        let mut files = Vec::new();
        for id in file_ids {
            if let Ok(file) = self.get(&id) {
                files.push(file);
            }
        }

        Ok(files)
    }

    /// List file records belonging to any of the given vaults.
    ///
    /// Results are ordered newest first with the id as a tie-breaker so
    /// pagination is stable.
    pub fn list_by_vaults(&self, vault_ids: &[String]) -> StorageResult<Vec<FileRecord>> {
        let mut files: Vec<FileRecord> = self
            .list_all()?
            .into_iter()
            .filter(|file| vault_ids.contains(&file.vault_id))
            .collect();

        files.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });

        Ok(files)
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

    fn test_file(id: &str, vault_id: &str) -> FileRecord {
        FileRecord {
            id: id.to_string(),
            vault_id: vault_id.to_string(),
            blob_id: format!("blob-{id}"),
            name: "artwork.png".to_string(),
            mime_type: Some("image/png".to_string()),
            size: Some(2048),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn create_and_get_file() {
        let (store, _dir) = test_store();
        let repo = FileRepository::new(&store);

        let file = test_file("upload-1", "vault-1");
        repo.create(&file).unwrap();

        let loaded = repo.get("upload-1").unwrap();
        assert_eq!(loaded.vault_id, "vault-1");
        assert_eq!(loaded.blob_id, "blob-upload-1");
        assert_eq!(loaded.mime_type.as_deref(), Some("image/png"));
    }

    #[test]
    fn create_duplicate_fails() {
        let (store, _dir) = test_store();
        let repo = FileRepository::new(&store);

        let file = test_file("upload-1", "vault-1");
        repo.create(&file).unwrap();

        let result = repo.create(&file);
        assert!(matches!(result, Err(StorageError::AlreadyExists(_))));
    }

    #[test]
    fn list_by_vaults_filters_and_orders() {
        let (store, _dir) = test_store();
        let repo = FileRepository::new(&store);

        repo.create(&test_file("upload-a", "vault-1")).unwrap();
        repo.create(&test_file("upload-b", "vault-1")).unwrap();
        repo.create(&test_file("upload-c", "vault-2")).unwrap();

        let files = repo
            .list_by_vaults(&["vault-1".to_string()])
            .unwrap();
        assert_eq!(files.len(), 2);
        assert!(files.iter().all(|f| f.vault_id == "vault-1"));

        let none = repo.list_by_vaults(&["vault-9".to_string()]).unwrap();
        assert!(none.is_empty());
    }
}
