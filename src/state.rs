// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 WalrusPass

use std::sync::Arc;

use crate::auth::AuthConfig;
use crate::config::DEFAULT_AVATAR_PUBLIC_BASE_URL;
use crate::gateway::MetadataGateway;
use crate::storage::{AvatarStore, MetadataStore};

/// Shared application state handed to every request handler.
#[derive(Clone)]
pub struct AppState {
    storage: Arc<MetadataStore>,
    avatars: AvatarStore,
    /// Session-token verification settings.
    pub auth_config: Arc<AuthConfig>,
    /// Auth provider base URL for the code-for-session exchange, when
    /// configured.
    pub auth_base_url: Option<String>,
    /// Shared outbound HTTP client.
    pub http: reqwest::Client,
}

impl AppState {
    /// Create state over an initialized metadata store.
    pub fn new(storage: MetadataStore) -> Self {
        Self {
            storage: Arc::new(storage),
            avatars: AvatarStore::new(DEFAULT_AVATAR_PUBLIC_BASE_URL),
            auth_config: Arc::new(AuthConfig::default()),
            auth_base_url: None,
            http: reqwest::Client::new(),
        }
    }

    /// Replace the auth configuration.
    pub fn with_auth_config(mut self, auth_config: AuthConfig) -> Self {
        self.auth_config = Arc::new(auth_config);
        self
    }

    /// Replace the avatar store.
    pub fn with_avatars(mut self, avatars: AvatarStore) -> Self {
        self.avatars = avatars;
        self
    }

    /// Set the auth provider base URL for `/auth/callback`.
    pub fn with_auth_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.auth_base_url = Some(base_url.into());
        self
    }

    /// Access the metadata store.
    pub fn storage(&self) -> Arc<MetadataStore> {
        self.storage.clone()
    }

    /// Build a gateway over this state's store.
    pub fn gateway(&self) -> MetadataGateway {
        MetadataGateway::new(self.storage.clone(), self.avatars.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::StoragePaths;
    use tempfile::TempDir;

    #[test]
    fn state_builds_gateway_over_shared_store() {
        let dir = TempDir::new().unwrap();
        let mut storage = MetadataStore::new(StoragePaths::new(dir.path()));
        storage.initialize().unwrap();

        let state = AppState::new(storage).with_auth_base_url("https://auth.example.com");
        assert_eq!(
            state.auth_base_url.as_deref(),
            Some("https://auth.example.com")
        );

        let gateway = state.gateway();
        let profile = gateway.ensure_profile("user-1").unwrap();
        assert_eq!(profile.id, "user-1");
    }
}
