// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 WalrusPass

//! REST client for the Tusky encrypted-storage service.

use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};

use super::types::{
    FileDetails, FileListFilter, FilePage, FileUpload, RawFileListing, TuskyError, VaultDetails,
    VaultHandle,
};
use super::VaultStore;

/// Header carrying the service API key.
const API_KEY_HEADER: &str = "Api-Key";

/// HTTP client for the encrypted-storage service.
#[derive(Debug, Clone)]
pub struct TuskyClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    #[serde(default)]
    upload_id: Option<String>,
    #[serde(default)]
    id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct KeypairResponse {
    keypair: serde_json::Value,
}

impl TuskyClient {
    /// Create a client against `base_url` authenticating with `api_key`.
    pub fn new(http: reqwest::Client, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    /// Build a client from `TUSKY_API_URL`/`TUSKY_API_KEY`.
    ///
    /// Returns `None` when no API key is configured.
    pub fn from_env(http: reqwest::Client) -> Option<Self> {
        let api_key = std::env::var(crate::config::TUSKY_API_KEY_ENV).ok()?;
        let base_url = std::env::var(crate::config::TUSKY_API_URL_ENV)
            .unwrap_or_else(|_| crate::config::DEFAULT_TUSKY_API_URL.to_string());
        Some(Self::new(http, base_url, api_key))
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Turn a non-success response into a [`TuskyError::Api`].
    async fn check(response: reqwest::Response) -> Result<reqwest::Response, TuskyError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response.text().await.unwrap_or_default();
        Err(TuskyError::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, TuskyError> {
        let response = self
            .http
            .get(self.url(path))
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn post_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<T, TuskyError> {
        let response = self
            .http
            .post(self.url(path))
            .header(API_KEY_HEADER, &self.api_key)
            .json(body)
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    /// Register a password-based encrypter for the account.
    async fn add_encrypter_password(&self, password: &str) -> Result<(), TuskyError> {
        let response = self
            .http
            .post(self.url("/encrypter"))
            .header(API_KEY_HEADER, &self.api_key)
            .json(&json!({ "password": password }))
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    /// First-time setup: derive a keypair from the password, then register
    /// the keypair as the encrypter.
    async fn setup_password(&self, password: &str) -> Result<(), TuskyError> {
        let keys: KeypairResponse = self
            .post_json("/me/setup-password", &json!({ "password": password }))
            .await?;

        let response = self
            .http
            .post(self.url("/encrypter"))
            .header(API_KEY_HEADER, &self.api_key)
            .json(&json!({ "keypair": keys.keypair }))
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }
}

impl VaultStore for TuskyClient {
    async fn setup_encryption(&self, password: &str) -> Result<(), TuskyError> {
        info!("Setting up encryption with password");

        match self.add_encrypter_password(password).await {
            Ok(()) => {
                info!("Encryption setup successful");
                Ok(())
            }
            // First sign-in: the account has no key material yet
            Err(e) if e.is_missing_keys() => {
                info!("No keys found, setting up password");
                self.setup_password(password).await?;
                info!("Encryption setup successful");
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Failed to setup encryption");
                Err(e)
            }
        }
    }

    async fn create_vault(
        &self,
        name: &str,
        password: Option<&str>,
    ) -> Result<VaultHandle, TuskyError> {
        info!(name = %name, "Creating private vault");

        if let Some(password) = password {
            self.setup_encryption(password).await?;
        }

        let vault: VaultHandle = match self
            .post_json("/vaults", &json!({ "name": name, "encrypted": true }))
            .await
        {
            Ok(vault) => vault,
            Err(e) => {
                error!(error = %e, "Failed to create private vault");
                return Err(e);
            }
        };

        info!(id = %vault.id, name = %vault.name, "Private vault created");
        Ok(vault)
    }

    async fn list_vaults(&self) -> Result<Vec<VaultDetails>, TuskyError> {
        info!("Listing all vaults");

        let vaults: Vec<VaultDetails> = match self.get_json("/vaults").await {
            Ok(vaults) => vaults,
            Err(e) => {
                error!(error = %e, "Failed to list vaults");
                return Err(e);
            }
        };

        info!(count = vaults.len(), "Vaults retrieved");
        Ok(vaults)
    }

    async fn get_vault(&self, vault_id: &str) -> Result<VaultDetails, TuskyError> {
        info!(vault_id = %vault_id, "Getting vault details");

        let vault = match self.get_json(&format!("/vaults/{vault_id}")).await {
            Ok(vault) => vault,
            Err(e) => {
                error!(error = %e, vault_id = %vault_id, "Failed to get vault details");
                return Err(e);
            }
        };

        info!(vault_id = %vault_id, "Vault details retrieved");
        Ok(vault)
    }

    async fn upload_file(
        &self,
        vault_id: &str,
        upload: &FileUpload,
    ) -> Result<String, TuskyError> {
        info!(vault_id = %vault_id, file_name = %upload.name, "Uploading file to vault");

        let response = self
            .http
            .post(self.url("/uploads"))
            .header(API_KEY_HEADER, &self.api_key)
            .query(&[("vaultId", vault_id), ("filename", upload.name.as_str())])
            .header(reqwest::header::CONTENT_TYPE, &upload.mime_type)
            .body(upload.bytes.clone())
            .send()
            .await;

        let parsed: Result<UploadResponse, TuskyError> = match response {
            Ok(response) => match Self::check(response).await {
                Ok(ok) => ok.json().await.map_err(TuskyError::from),
                Err(e) => Err(e),
            },
            Err(e) => Err(e.into()),
        };

        let body = match parsed {
            Ok(body) => body,
            Err(e) => {
                error!(error = %e, vault_id = %vault_id, "Failed to upload file");
                return Err(e);
            }
        };

        let upload_id = body
            .upload_id
            .or(body.id)
            .ok_or_else(|| TuskyError::Decode("upload response carried no id".to_string()))?;

        info!(upload_id = %upload_id, vault_id = %vault_id, "File uploaded");
        Ok(upload_id)
    }

    async fn list_files(&self, filter: &FileListFilter) -> Result<FilePage, TuskyError> {
        info!(filter = ?filter, "Listing files");

        let response = self
            .http
            .get(self.url("/files"))
            .header(API_KEY_HEADER, &self.api_key)
            .query(filter)
            .send()
            .await;

        let raw: RawFileListing = match response {
            Ok(response) => match Self::check(response).await {
                Ok(ok) => match ok.json().await {
                    Ok(raw) => raw,
                    Err(e) => {
                        error!(error = %e, "Failed to list files");
                        return Err(e.into());
                    }
                },
                Err(e) => {
                    error!(error = %e, "Failed to list files");
                    return Err(e);
                }
            },
            Err(e) => {
                error!(error = %e, "Failed to list files");
                return Err(e.into());
            }
        };

        let page: FilePage = raw.into();
        info!(
            count = page.items.len(),
            has_more = page.next_token.is_some(),
            "Files retrieved"
        );
        Ok(page)
    }

    async fn get_file(&self, file_id: &str) -> Result<FileDetails, TuskyError> {
        info!(file_id = %file_id, "Getting file details");

        let file = match self.get_json(&format!("/files/{file_id}")).await {
            Ok(file) => file,
            Err(e) => {
                error!(error = %e, file_id = %file_id, "Failed to get file details");
                return Err(e);
            }
        };

        info!(file_id = %file_id, "File details retrieved");
        Ok(file)
    }

    async fn download_file(&self, file_id: &str) -> Result<Vec<u8>, TuskyError> {
        info!(file_id = %file_id, "Downloading file");

        let response = self
            .http
            .get(self.url(&format!("/files/{file_id}/data")))
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await;

        let bytes = match response {
            Ok(response) => match Self::check(response).await {
                Ok(ok) => match ok.bytes().await {
                    Ok(bytes) => bytes.to_vec(),
                    Err(e) => {
                        error!(error = %e, file_id = %file_id, "Failed to download file");
                        return Err(e.into());
                    }
                },
                Err(e) => {
                    error!(error = %e, file_id = %file_id, "Failed to download file");
                    return Err(e);
                }
            },
            Err(e) => {
                error!(error = %e, file_id = %file_id, "Failed to download file");
                return Err(e.into());
            }
        };

        info!(file_id = %file_id, size = bytes.len(), "File downloaded");
        Ok(bytes)
    }

    async fn delete_file(&self, file_id: &str) -> Result<(), TuskyError> {
        info!(file_id = %file_id, "Deleting file");

        let response = self
            .http
            .delete(self.url(&format!("/files/{file_id}")))
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await;

        match response {
            Ok(response) => {
                if let Err(e) = Self::check(response).await {
                    error!(error = %e, file_id = %file_id, "Failed to delete file");
                    return Err(e);
                }
            }
            Err(e) => {
                error!(error = %e, file_id = %file_id, "Failed to delete file");
                return Err(e.into());
            }
        }

        info!(file_id = %file_id, "File deleted");
        Ok(())
    }
}
