// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 WalrusPass

//! # Metadata Storage Module
//!
//! This module provides persistent storage for marketplace metadata under a
//! configurable data directory (`DATA_DIR`, default `/data`).
//!
//! ## Storage Layout
//!
//! ```text
//! /data/
//!   profiles/{user_id}.json       # Display name + avatar URL per account
//!   vaults/{vault_id}.json        # Vault records (ids minted by the storage subsystem)
//!   files/{upload_id}.json        # File records (upload id doubles as file id)
//!   nfts/{object_id}.json         # NFT records (ids minted on-chain)
//!   avatars/{user_id}/...         # Avatar binaries
//!   pending_nfts/{digest}.json    # Deferred NFT metadata saves
//! ```
//!
//! The store is authoritative for Profile/Vault/File/NFT records; the
//! storage subsystem and the chain stay authoritative for the content and
//! the on-chain objects those records point at.

pub mod avatars;
pub mod paths;
pub mod repository;
pub mod store;

pub use avatars::{AvatarStore, AvatarUpload};
pub use paths::StoragePaths;
pub use repository::{
    FileRecord, FileRepository, NftRecord, NftRepository, PendingNftRepository, PendingNftSave,
    ProfileRecord, ProfileRepository, VaultRecord, VaultRepository,
};
pub use store::{MetadataStore, StorageError, StorageResult};
