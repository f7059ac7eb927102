// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 WalrusPass

//! Path constants and utilities for the metadata storage layout.

use std::path::{Path, PathBuf};

/// Base directory for all persisted marketplace metadata.
pub const DATA_ROOT: &str = "/data";

/// Storage path utilities for the metadata filesystem.
#[derive(Debug, Clone)]
pub struct StoragePaths {
    root: PathBuf,
}

impl Default for StoragePaths {
    fn default() -> Self {
        Self::new(DATA_ROOT)
    }
}

impl StoragePaths {
    /// Create a new StoragePaths with a custom root (useful for testing).
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Root directory for all persisted data.
    pub fn root(&self) -> &Path {
        &self.root
    }

    // ========== Profile Paths ==========

    /// Directory containing all profiles.
    pub fn profiles_dir(&self) -> PathBuf {
        self.root.join("profiles")
    }

    /// Path to a specific profile record.
    pub fn profile(&self, user_id: &str) -> PathBuf {
        self.profiles_dir().join(format!("{user_id}.json"))
    }

    // ========== Vault Paths ==========

    /// Directory containing all vault records.
    pub fn vaults_dir(&self) -> PathBuf {
        self.root.join("vaults")
    }

    /// Path to a specific vault record.
    pub fn vault(&self, vault_id: &str) -> PathBuf {
        self.vaults_dir().join(format!("{vault_id}.json"))
    }

    // ========== File Paths ==========

    /// Directory containing all file records.
    pub fn files_dir(&self) -> PathBuf {
        self.root.join("files")
    }

    /// Path to a specific file record.
    pub fn file(&self, file_id: &str) -> PathBuf {
        self.files_dir().join(format!("{file_id}.json"))
    }

    // ========== NFT Paths ==========

    /// Directory containing all NFT records.
    pub fn nfts_dir(&self) -> PathBuf {
        self.root.join("nfts")
    }

    /// Path to a specific NFT record.
    pub fn nft(&self, nft_id: &str) -> PathBuf {
        self.nfts_dir().join(format!("{nft_id}.json"))
    }

    // ========== Avatar Paths ==========

    /// Directory containing stored avatar binaries.
    pub fn avatars_dir(&self) -> PathBuf {
        self.root.join("avatars")
    }

    /// Directory for a specific user's avatars.
    pub fn avatar_dir(&self, user_id: &str) -> PathBuf {
        self.avatars_dir().join(user_id)
    }

    /// Path to a specific stored avatar.
    pub fn avatar(&self, user_id: &str, file_name: &str) -> PathBuf {
        self.avatar_dir(user_id).join(file_name)
    }

    // ========== Pending NFT-Save Paths ==========

    /// Directory containing pending NFT metadata saves awaiting retry.
    pub fn pending_nfts_dir(&self) -> PathBuf {
        self.root.join("pending_nfts")
    }

    /// Path to a pending NFT-save record, keyed by transaction digest.
    pub fn pending_nft(&self, digest: &str) -> PathBuf {
        self.pending_nfts_dir().join(format!("{digest}.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_are_rooted_under_the_configured_directory() {
        let paths = StoragePaths::new("/tmp/walruspass-test");

        assert_eq!(
            paths.profile("user-1"),
            PathBuf::from("/tmp/walruspass-test/profiles/user-1.json")
        );
        assert_eq!(
            paths.vault("v-1"),
            PathBuf::from("/tmp/walruspass-test/vaults/v-1.json")
        );
        assert_eq!(
            paths.file("f-1"),
            PathBuf::from("/tmp/walruspass-test/files/f-1.json")
        );
        assert_eq!(
            paths.nft("0xabc"),
            PathBuf::from("/tmp/walruspass-test/nfts/0xabc.json")
        );
        assert_eq!(
            paths.pending_nft("digest-1"),
            PathBuf::from("/tmp/walruspass-test/pending_nfts/digest-1.json")
        );
        assert_eq!(
            paths.avatar("user-1", "user-1_1.png"),
            PathBuf::from("/tmp/walruspass-test/avatars/user-1/user-1_1.png")
        );
    }

    #[test]
    fn default_root_is_data() {
        let paths = StoragePaths::default();
        assert_eq!(paths.root(), Path::new(DATA_ROOT));
    }
}
