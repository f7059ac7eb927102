// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 WalrusPass

//! Avatar binary store.
//!
//! Avatar uploads are written under `avatars/{user_id}/` and addressed by a
//! public URL built from the configured prefix. The profile record stores
//! only that URL, never the bytes.

use tracing::info;
use uuid::Uuid;

use super::{MetadataStore, StorageResult};

/// An avatar file received from a multipart upload.
#[derive(Debug, Clone)]
pub struct AvatarUpload {
    /// Original file name (used for the extension only).
    pub file_name: String,
    /// MIME type reported by the client.
    pub content_type: Option<String>,
    /// Raw file bytes.
    pub bytes: Vec<u8>,
}

/// Store for avatar binaries with public-URL addressing.
#[derive(Debug, Clone)]
pub struct AvatarStore {
    public_base_url: String,
}

impl AvatarStore {
    /// Create a store that addresses avatars under `public_base_url`.
    pub fn new(public_base_url: impl Into<String>) -> Self {
        Self {
            public_base_url: public_base_url.into(),
        }
    }

    /// Store an avatar for a user and return its public URL.
    ///
    /// File names are `{user_id}_{uuid}.{ext}` so repeat uploads never
    /// collide.
    pub fn store(
        &self,
        storage: &MetadataStore,
        user_id: &str,
        upload: &AvatarUpload,
    ) -> StorageResult<String> {
        let extension = upload
            .file_name
            .rsplit('.')
            .next()
            .filter(|ext| !ext.is_empty() && *ext != upload.file_name)
            .unwrap_or("bin");

        let file_name = format!("{user_id}_{}.{extension}", Uuid::new_v4());
        let path = storage.paths().avatar(user_id, &file_name);

        storage.write_raw(&path, &upload.bytes)?;

        info!(
            user_id = %user_id,
            file_name = %file_name,
            content_type = ?upload.content_type,
            size = upload.bytes.len(),
            "Avatar stored"
        );

        Ok(format!(
            "{}/{user_id}/{file_name}",
            self.public_base_url.trim_end_matches('/')
        ))
    }
}
