// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 WalrusPass

//! # Metadata Gateway
//!
//! Translates the marketplace's five logical persistence operations into
//! repository calls and normalizes every failure into the
//! [`GatewayError`] taxonomy. Operations return tagged results — callers
//! branch on the kind, nothing here throws.
//!
//! Ownership checks happen before any mutation: a file can only be recorded
//! against a vault owned by the same wallet address, and an NFT can only be
//! recorded against an existing file.

pub mod error;

pub use error::{GatewayError, GatewayErrorKind, GatewayResult};

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use utoipa::ToSchema;

use crate::models::{CreateNftRequest, CreateVaultRequest, SaveFileRequest};
use crate::storage::{
    AvatarStore, AvatarUpload, FileRecord, FileRepository, MetadataStore, NftRecord,
    NftRepository, PendingNftRepository, PendingNftSave, ProfileRecord, ProfileRepository,
    VaultRecord, VaultRepository,
};

/// Default page size for file listings.
pub const DEFAULT_LIST_LIMIT: i64 = 100;

/// Maximum page size for file listings.
pub const MAX_LIST_LIMIT: i64 = 1000;

/// A file record joined with its optional NFT reference.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct FileWithNft {
    /// The persisted file record.
    #[serde(flatten)]
    pub file: FileRecord,
    /// The NFT gating this file, if one has been minted.
    pub nft: Option<NftRecord>,
}

/// One page of file records plus the total match count.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct FileListPage {
    /// Records in this page.
    pub items: Vec<FileWithNft>,
    /// Total number of records matching the filters, across all pages.
    pub count: usize,
}

/// Filters and pagination for file listings.
#[derive(Debug, Clone, Default)]
pub struct ListFilesParams {
    /// Restrict to one vault.
    pub vault_id: Option<String>,
    /// Restrict to vaults owned by this wallet.
    pub wallet_address: Option<String>,
    /// Page size (1..=1000); defaults to [`DEFAULT_LIST_LIMIT`].
    pub limit: Option<i64>,
    /// Records to skip; defaults to 0.
    pub offset: Option<i64>,
}

/// Gateway over the metadata persistence layer.
#[derive(Clone)]
pub struct MetadataGateway {
    storage: Arc<MetadataStore>,
    avatars: AvatarStore,
}

impl MetadataGateway {
    /// Create a gateway over the given store.
    pub fn new(storage: Arc<MetadataStore>, avatars: AvatarStore) -> Self {
        Self { storage, avatars }
    }

    // ========== Vaults ==========

    /// Persist a vault record.
    ///
    /// Idempotent on `(vault_id, wallet_address)`: replaying a create with
    /// the same pair returns the existing record instead of duplicating it.
    pub fn create_vault(&self, request: &CreateVaultRequest) -> GatewayResult<VaultRecord> {
        if request.name.trim().is_empty()
            || request.vault_id.trim().is_empty()
            || request.wallet_address.0.trim().is_empty()
        {
            return Err(GatewayError::validation(
                "name, vault_id, and wallet_address are required",
            ));
        }

        info!(
            name = %request.name,
            vault_id = %request.vault_id,
            wallet_address = %request.wallet_address,
            "Creating vault record"
        );

        let repo = VaultRepository::new(&self.storage);

        if let Ok(existing) = repo.get(&request.vault_id) {
            if existing.wallet_address == request.wallet_address.0 {
                info!(vault_id = %existing.id, "Vault already exists");
                return Ok(existing);
            }
            return Err(GatewayError::database(
                "Vault id already registered to another wallet",
            ));
        }

        let vault = VaultRecord {
            id: request.vault_id.clone(),
            name: request.name.clone(),
            wallet_address: request.wallet_address.0.clone(),
            encrypted: request.encrypted.unwrap_or(true),
        };

        repo.create(&vault)
            .map_err(|e| GatewayError::database(format!("Failed to save vault metadata: {e}")))?;

        info!(vault_id = %vault.id, "Vault metadata saved");
        Ok(vault)
    }

    // ========== Files ==========

    /// Persist a file record after a successful upload.
    ///
    /// The upload id becomes the persisted file id. Fails with `not_found`
    /// when the referenced vault does not exist or belongs to a different
    /// wallet.
    pub fn save_file(&self, request: &SaveFileRequest) -> GatewayResult<FileRecord> {
        if request.upload_id.trim().is_empty()
            || request.blob_id.trim().is_empty()
            || request.name.trim().is_empty()
            || request.vault_id.trim().is_empty()
            || request.wallet_address.0.trim().is_empty()
        {
            return Err(GatewayError::validation(
                "upload_id, blob_id, name, vault_id, and wallet_address are required",
            ));
        }

        info!(
            upload_id = %request.upload_id,
            blob_id = %request.blob_id,
            vault_id = %request.vault_id,
            wallet_address = %request.wallet_address,
            "Creating file record"
        );

        let vaults = VaultRepository::new(&self.storage);
        let vault = match vaults.get(&request.vault_id) {
            Ok(vault) if vault.wallet_address == request.wallet_address.0 => vault,
            _ => {
                warn!(
                    vault_id = %request.vault_id,
                    wallet_address = %request.wallet_address,
                    "Vault not found or not owned by wallet"
                );
                return Err(GatewayError::not_found(
                    "Vault not found or not owned by wallet",
                ));
            }
        };

        let now = chrono::Utc::now();
        let file = FileRecord {
            id: request.upload_id.clone(),
            vault_id: vault.id.clone(),
            blob_id: request.blob_id.clone(),
            name: request.name.clone(),
            mime_type: request.mime_type.clone(),
            size: request.size,
            created_at: now,
            updated_at: now,
        };

        FileRepository::new(&self.storage)
            .create(&file)
            .map_err(|e| GatewayError::database(format!("Failed to save file metadata: {e}")))?;

        info!(file_id = %file.id, vault_id = %file.vault_id, "File metadata saved");
        Ok(file)
    }

    /// List file records joined with optional NFT references.
    pub fn list_files(&self, params: &ListFilesParams) -> GatewayResult<FileListPage> {
        let limit = params.limit.unwrap_or(DEFAULT_LIST_LIMIT);
        let offset = params.offset.unwrap_or(0);

        if !(1..=MAX_LIST_LIMIT).contains(&limit) {
            return Err(GatewayError::validation(format!(
                "Limit must be a number between 1 and {MAX_LIST_LIMIT}"
            )));
        }
        if offset < 0 {
            return Err(GatewayError::validation(
                "Offset must be a non-negative number",
            ));
        }

        info!(
            vault_id = ?params.vault_id,
            wallet_address = ?params.wallet_address,
            limit,
            offset,
            "Fetching file records"
        );

        let vaults = VaultRepository::new(&self.storage);
        let matching: Vec<VaultRecord> = vaults
            .list_all()?
            .into_iter()
            .filter(|vault| {
                params
                    .wallet_address
                    .as_ref()
                    .is_none_or(|addr| &vault.wallet_address == addr)
            })
            .filter(|vault| {
                params
                    .vault_id
                    .as_ref()
                    .is_none_or(|id| &vault.id == id)
            })
            .collect();

        if matching.is_empty() {
            return Ok(FileListPage {
                items: Vec::new(),
                count: 0,
            });
        }

        let vault_ids: Vec<String> = matching.iter().map(|v| v.id.clone()).collect();
        let files = FileRepository::new(&self.storage).list_by_vaults(&vault_ids)?;
        let count = files.len();

        let nfts = NftRepository::new(&self.storage);
        let items: Vec<FileWithNft> = files
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .map(|file| {
                let nft = nfts.find_by_file(&file.id).unwrap_or_default();
                FileWithNft { file, nft }
            })
            .collect();

        info!(count = items.len(), total = count, "Files fetched");
        Ok(FileListPage { items, count })
    }

    // ========== NFTs ==========

    /// Persist an NFT record after a successful mint.
    ///
    /// Fails with `not_found` when the referenced file does not exist. The
    /// price, when present, must already be an integer MIST string; unit
    /// conversion happens at the API and workflow boundaries.
    pub fn create_nft(&self, request: &CreateNftRequest) -> GatewayResult<NftRecord> {
        if request.nft_id.trim().is_empty() || request.file_id.trim().is_empty() {
            return Err(GatewayError::validation("nft_id and file_id are required"));
        }

        if let Some(price) = &request.price {
            if price.parse::<u64>().is_err() {
                return Err(GatewayError::validation(
                    "price must be an integer MIST amount",
                ));
            }
        }

        info!(
            nft_id = %request.nft_id,
            file_id = %request.file_id,
            "Creating NFT record"
        );

        let files = FileRepository::new(&self.storage);
        if !files.exists(&request.file_id) {
            warn!(file_id = %request.file_id, "File not found");
            return Err(GatewayError::not_found("File not found"));
        }

        let now = chrono::Utc::now();
        let nft = NftRecord {
            id: request.nft_id.clone(),
            file_id: request.file_id.clone(),
            name: request.name.clone(),
            description: request.description.clone(),
            price: request.price.clone(),
            created_at: now,
            updated_at: now,
        };

        NftRepository::new(&self.storage)
            .create(&nft)
            .map_err(|e| GatewayError::database(format!("Failed to save NFT metadata: {e}")))?;

        info!(nft_id = %nft.id, file_id = %nft.file_id, "NFT metadata saved");
        Ok(nft)
    }

    /// Queue a mint whose metadata save failed for the background
    /// reconciler. Keyed by digest, so re-queueing the same mint is
    /// idempotent.
    pub fn defer_nft_save(&self, pending: &PendingNftSave) -> GatewayResult<()> {
        PendingNftRepository::new(&self.storage)
            .put(pending)
            .map_err(|e| GatewayError::database(format!("Failed to queue NFT save: {e}")))
    }

    // ========== Profiles ==========

    /// Fetch a profile by account id.
    pub fn get_profile(&self, user_id: &str) -> GatewayResult<ProfileRecord> {
        info!(user_id = %user_id, "Fetching profile");

        ProfileRepository::new(&self.storage)
            .get(user_id)
            .map_err(|_| GatewayError::not_found(format!("Profile with id {user_id} not found")))
    }

    /// Ensure a profile exists for an account, creating an empty one on
    /// first authentication. Idempotent.
    pub fn ensure_profile(&self, user_id: &str) -> GatewayResult<ProfileRecord> {
        let repo = ProfileRepository::new(&self.storage);

        if let Ok(existing) = repo.get(user_id) {
            return Ok(existing);
        }

        let profile = ProfileRecord::empty(user_id);
        repo.create(&profile)
            .map_err(|e| GatewayError::database(format!("Failed to create profile: {e}")))?;

        info!(user_id = %user_id, "Profile created on first authentication");
        Ok(profile)
    }

    /// Update the authenticated account's profile.
    ///
    /// `display_name` always overwrites the stored value (absent clears it);
    /// an avatar upload is written to the binary store and its public URL
    /// recorded on the profile.
    pub fn update_profile(
        &self,
        user_id: &str,
        display_name: Option<String>,
        avatar: Option<AvatarUpload>,
    ) -> GatewayResult<ProfileRecord> {
        info!(user_id = %user_id, "Updating profile");

        let repo = ProfileRepository::new(&self.storage);
        let mut profile = repo
            .get(user_id)
            .map_err(|_| GatewayError::not_found(format!("Profile with id {user_id} not found")))?;

        profile.display_name = display_name;

        if let Some(upload) = &avatar {
            let url = self
                .avatars
                .store(&self.storage, user_id, upload)
                .map_err(|e| GatewayError::database(format!("Failed to upload avatar: {e}")))?;
            profile.avatar_url = Some(url);
        }

        profile.updated_at = chrono::Utc::now();

        repo.update(&profile)
            .map_err(|e| GatewayError::database(format!("Failed to update profile: {e}")))?;

        info!(user_id = %user_id, "Profile updated");
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WalletAddress;
    use crate::storage::StoragePaths;
    use tempfile::TempDir;

    fn test_gateway() -> (MetadataGateway, TempDir) {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let mut store = MetadataStore::new(StoragePaths::new(dir.path()));
        store.initialize().expect("Failed to initialize");
        let gateway = MetadataGateway::new(Arc::new(store), AvatarStore::new("/avatars"));
        (gateway, dir)
    }

    fn vault_request(vault_id: &str, wallet: &str) -> CreateVaultRequest {
        CreateVaultRequest {
            name: "MyVault".to_string(),
            vault_id: vault_id.to_string(),
            wallet_address: WalletAddress::from(wallet),
            encrypted: None,
        }
    }

    fn file_request(upload_id: &str, vault_id: &str, wallet: &str) -> SaveFileRequest {
        SaveFileRequest {
            file_id: "artwork.png".to_string(),
            upload_id: upload_id.to_string(),
            blob_id: format!("blob-{upload_id}"),
            name: "artwork.png".to_string(),
            vault_id: vault_id.to_string(),
            wallet_address: WalletAddress::from(wallet),
            mime_type: Some("image/png".to_string()),
            size: Some(2048),
        }
    }

    #[test]
    fn create_vault_defaults_to_encrypted() {
        let (gateway, _dir) = test_gateway();

        let vault = gateway.create_vault(&vault_request("v-1", "0xaaa")).unwrap();
        assert_eq!(vault.id, "v-1");
        assert!(vault.encrypted);
    }

    #[test]
    fn create_vault_is_idempotent_per_vault_and_wallet() {
        let (gateway, _dir) = test_gateway();

        let first = gateway.create_vault(&vault_request("v-1", "0xaaa")).unwrap();
        let replay = gateway.create_vault(&vault_request("v-1", "0xaaa")).unwrap();
        assert_eq!(first, replay);
    }

    #[test]
    fn create_vault_rejects_missing_fields() {
        let (gateway, _dir) = test_gateway();

        let mut request = vault_request("v-1", "0xaaa");
        request.name = "  ".to_string();

        let error = gateway.create_vault(&request).unwrap_err();
        assert_eq!(error.kind, GatewayErrorKind::Validation);
    }

    #[test]
    fn create_vault_same_id_other_wallet_is_database_error() {
        let (gateway, _dir) = test_gateway();

        gateway.create_vault(&vault_request("v-1", "0xaaa")).unwrap();
        let error = gateway
            .create_vault(&vault_request("v-1", "0xbbb"))
            .unwrap_err();
        assert_eq!(error.kind, GatewayErrorKind::Database);
    }

    #[test]
    fn save_file_requires_owning_vault() {
        let (gateway, _dir) = test_gateway();

        gateway.create_vault(&vault_request("v-1", "0xaaa")).unwrap();

        // Vault exists but under a different wallet address.
        let error = gateway
            .save_file(&file_request("upload-1", "v-1", "0xbbb"))
            .unwrap_err();
        assert_eq!(error.kind, GatewayErrorKind::NotFound);

        // Vault does not exist at all.
        let error = gateway
            .save_file(&file_request("upload-1", "v-9", "0xaaa"))
            .unwrap_err();
        assert_eq!(error.kind, GatewayErrorKind::NotFound);
    }

    #[test]
    fn save_file_uses_upload_id_as_file_id() {
        let (gateway, _dir) = test_gateway();

        gateway.create_vault(&vault_request("v-1", "0xaaa")).unwrap();
        let file = gateway
            .save_file(&file_request("upload-1", "v-1", "0xaaa"))
            .unwrap();

        assert_eq!(file.id, "upload-1");
        assert_eq!(file.vault_id, "v-1");
        assert_eq!(file.size, Some(2048));
    }

    #[test]
    fn create_nft_requires_existing_file() {
        let (gateway, _dir) = test_gateway();

        let request = CreateNftRequest {
            nft_id: "0xnft1".to_string(),
            file_id: "upload-missing".to_string(),
            name: None,
            description: None,
            price: None,
        };

        let error = gateway.create_nft(&request).unwrap_err();
        assert_eq!(error.kind, GatewayErrorKind::NotFound);
    }

    #[test]
    fn create_nft_persists_optional_details() {
        let (gateway, _dir) = test_gateway();

        gateway.create_vault(&vault_request("v-1", "0xaaa")).unwrap();
        gateway
            .save_file(&file_request("upload-1", "v-1", "0xaaa"))
            .unwrap();

        let request = CreateNftRequest {
            nft_id: "0xnft1".to_string(),
            file_id: "upload-1".to_string(),
            name: Some("Walrus Pass #1".to_string()),
            description: Some("Exclusive access".to_string()),
            price: Some("100000000".to_string()),
        };

        let nft = gateway.create_nft(&request).unwrap();
        assert_eq!(nft.id, "0xnft1");
        assert_eq!(nft.price.as_deref(), Some("100000000"));
    }

    #[test]
    fn create_nft_rejects_non_integer_price() {
        let (gateway, _dir) = test_gateway();

        let request = CreateNftRequest {
            nft_id: "0xnft1".to_string(),
            file_id: "upload-1".to_string(),
            name: None,
            description: None,
            price: Some("0.1".to_string()),
        };

        let error = gateway.create_nft(&request).unwrap_err();
        assert_eq!(error.kind, GatewayErrorKind::Validation);
    }

    #[test]
    fn list_files_rejects_out_of_range_pagination() {
        let (gateway, _dir) = test_gateway();

        for limit in [0_i64, 1001, -1] {
            let error = gateway
                .list_files(&ListFilesParams {
                    limit: Some(limit),
                    ..Default::default()
                })
                .unwrap_err();
            assert_eq!(error.kind, GatewayErrorKind::Validation, "limit {limit}");
        }

        let error = gateway
            .list_files(&ListFilesParams {
                offset: Some(-1),
                ..Default::default()
            })
            .unwrap_err();
        assert_eq!(error.kind, GatewayErrorKind::Validation);

        // Boundary values are accepted.
        for limit in [1_i64, 1000] {
            gateway
                .list_files(&ListFilesParams {
                    limit: Some(limit),
                    ..Default::default()
                })
                .unwrap();
        }
    }

    #[test]
    fn list_files_joins_nft_references_and_paginates() {
        let (gateway, _dir) = test_gateway();

        gateway.create_vault(&vault_request("v-1", "0xaaa")).unwrap();
        for i in 1..=3 {
            gateway
                .save_file(&file_request(&format!("upload-{i}"), "v-1", "0xaaa"))
                .unwrap();
        }
        gateway
            .create_nft(&CreateNftRequest {
                nft_id: "0xnft1".to_string(),
                file_id: "upload-2".to_string(),
                name: None,
                description: None,
                price: None,
            })
            .unwrap();

        let page = gateway
            .list_files(&ListFilesParams {
                wallet_address: Some("0xaaa".to_string()),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(page.count, 3);
        assert_eq!(page.items.len(), 3);
        let with_nft = page
            .items
            .iter()
            .find(|item| item.file.id == "upload-2")
            .unwrap();
        assert_eq!(with_nft.nft.as_ref().map(|n| n.id.as_str()), Some("0xnft1"));

        let second_page = gateway
            .list_files(&ListFilesParams {
                limit: Some(2),
                offset: Some(2),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(second_page.count, 3);
        assert_eq!(second_page.items.len(), 1);
    }

    #[test]
    fn list_files_for_unknown_wallet_is_empty() {
        let (gateway, _dir) = test_gateway();

        let page = gateway
            .list_files(&ListFilesParams {
                wallet_address: Some("0xnobody".to_string()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(page.count, 0);
        assert!(page.items.is_empty());
    }

    #[test]
    fn profile_lifecycle() {
        let (gateway, _dir) = test_gateway();

        let error = gateway.get_profile("user-1").unwrap_err();
        assert_eq!(error.kind, GatewayErrorKind::NotFound);

        let created = gateway.ensure_profile("user-1").unwrap();
        let again = gateway.ensure_profile("user-1").unwrap();
        assert_eq!(created.id, again.id);

        let updated = gateway
            .update_profile(
                "user-1",
                Some("Walrus Fan".to_string()),
                Some(AvatarUpload {
                    file_name: "me.png".to_string(),
                    content_type: Some("image/png".to_string()),
                    bytes: vec![1, 2, 3],
                }),
            )
            .unwrap();
        assert_eq!(updated.display_name.as_deref(), Some("Walrus Fan"));
        assert!(updated.avatar_url.as_deref().unwrap().contains("user-1"));

        // Absent display name clears the stored value.
        let cleared = gateway.update_profile("user-1", None, None).unwrap();
        assert!(cleared.display_name.is_none());
        assert!(cleared.avatar_url.is_some());
    }

    #[test]
    fn update_missing_profile_is_not_found() {
        let (gateway, _dir) = test_gateway();

        let error = gateway.update_profile("ghost", None, None).unwrap_err();
        assert_eq!(error.kind, GatewayErrorKind::NotFound);
    }
}
