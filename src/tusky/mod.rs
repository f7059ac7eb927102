// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 WalrusPass

//! # Encrypted-Storage Adapter
//!
//! A narrow, retry-free façade over the external Tusky encrypted-storage
//! service. Every operation logs start/success/failure with contextual ids;
//! failures propagate unchanged to the caller — no retries, no backoff.
//!
//! The [`VaultStore`] trait is what the workflow engine depends on, so unit
//! tests can substitute fakes without any network access. [`TuskyClient`]
//! is the production implementation over the service's REST API.

pub mod client;
pub mod types;

pub use client::TuskyClient;
pub use types::{
    FileDetails, FileListFilter, FilePage, FileUpload, TuskyError, VaultDetails, VaultHandle,
};

/// Download a file using the fixed public-demo password.
///
/// Returns `Ok(None)` when `DEMO_DOWNLOAD_PASSWORD` is not configured —
/// the caller then falls back to prompting for a password.
pub async fn demo_download<V: VaultStore>(
    store: &V,
    file_id: &str,
) -> Result<Option<Vec<u8>>, TuskyError> {
    let Ok(password) = std::env::var(crate::config::DEMO_DOWNLOAD_PASSWORD_ENV) else {
        return Ok(None);
    };

    store.setup_encryption(&password).await?;
    store.download_file(file_id).await.map(Some)
}

/// Operations the encrypted-storage subsystem exposes to this service.
pub trait VaultStore {
    /// Configure encryption for the signed-in account.
    ///
    /// Falls back to first-time password setup (deriving a keypair) when no
    /// key material exists yet for the account.
    fn setup_encryption(
        &self,
        password: &str,
    ) -> impl std::future::Future<Output = Result<(), TuskyError>> + Send;

    /// Create a private encrypted vault. When a password is supplied,
    /// encryption setup runs first.
    fn create_vault(
        &self,
        name: &str,
        password: Option<&str>,
    ) -> impl std::future::Future<Output = Result<VaultHandle, TuskyError>> + Send;

    /// List all vaults for the signed-in account.
    fn list_vaults(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<VaultDetails>, TuskyError>> + Send;

    /// Get details of a specific vault.
    fn get_vault(
        &self,
        vault_id: &str,
    ) -> impl std::future::Future<Output = Result<VaultDetails, TuskyError>> + Send;

    /// Upload a file into a vault, returning the upload identifier.
    fn upload_file(
        &self,
        vault_id: &str,
        upload: &FileUpload,
    ) -> impl std::future::Future<Output = Result<String, TuskyError>> + Send;

    /// List files, normalized to `{items, next_token}` regardless of which
    /// response shape the service returns.
    fn list_files(
        &self,
        filter: &FileListFilter,
    ) -> impl std::future::Future<Output = Result<FilePage, TuskyError>> + Send;

    /// Get details of a specific file.
    fn get_file(
        &self,
        file_id: &str,
    ) -> impl std::future::Future<Output = Result<FileDetails, TuskyError>> + Send;

    /// Download a file's bytes.
    fn download_file(
        &self,
        file_id: &str,
    ) -> impl std::future::Future<Output = Result<Vec<u8>, TuskyError>> + Send;

    /// Delete a file.
    fn delete_file(
        &self,
        file_id: &str,
    ) -> impl std::future::Future<Output = Result<(), TuskyError>> + Send;
}
