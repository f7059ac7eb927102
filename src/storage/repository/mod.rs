// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 WalrusPass

//! Repository layer providing typed access to the metadata store.
//!
//! Each repository provides CRUD operations for a specific entity type,
//! using the MetadataStore for all file operations.

pub mod files;
pub mod nfts;
pub mod pending;
pub mod profiles;
pub mod vaults;

pub use files::{FileRecord, FileRepository};
pub use nfts::{NftRecord, NftRepository};
pub use pending::{PendingNftRepository, PendingNftSave};
pub use profiles::{ProfileRecord, ProfileRepository};
pub use vaults::{VaultRecord, VaultRepository};
