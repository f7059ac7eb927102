// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 WalrusPass

//! # NFT-Save Reconciler
//!
//! Background task that replays NFT metadata saves which failed after a
//! successful on-chain mint. The workflow queues a pending record keyed by
//! transaction digest; every sweep this task:
//!
//! 1. Lists all pending records.
//! 2. Resolves the minted object id from the transaction effects when it
//!    was unknown at enqueue time.
//! 3. Replays the gateway `create_nft` call.
//! 4. Drops the record on success — or permanently when the referenced
//!    file does not exist, since that save can never succeed.
//!
//! Anything else stays queued for the next sweep. Uses
//! `tokio_util::sync::CancellationToken` for graceful shutdown.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::gateway::{GatewayErrorKind, MetadataGateway};
use crate::models::CreateNftRequest;
use crate::storage::{MetadataStore, PendingNftRepository, PendingNftSave};
use crate::sui::transactions::resolve_created_object_id;
use crate::sui::ChainReader;

/// Default interval between reconciliation sweeps.
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Background reconciler replaying deferred NFT metadata saves.
pub struct NftSaveReconciler<C> {
    storage: Arc<MetadataStore>,
    gateway: MetadataGateway,
    chain: C,
    poll_interval: Duration,
}

impl<C: ChainReader> NftSaveReconciler<C> {
    /// Create a reconciler over the given store, gateway, and chain reader.
    pub fn new(storage: Arc<MetadataStore>, gateway: MetadataGateway, chain: C) -> Self {
        Self {
            storage,
            gateway,
            chain,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Override the sweep interval (used by tests).
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Run the reconciler loop until the cancellation token is triggered.
    ///
    /// Should be spawned as a background task:
    /// ```rust,ignore
    /// tokio::spawn(reconciler.run(shutdown.clone()));
    /// ```
    pub async fn run(self, shutdown: CancellationToken) {
        info!(
            interval_secs = self.poll_interval.as_secs(),
            "NFT-save reconciler starting"
        );

        loop {
            if shutdown.is_cancelled() {
                info!("NFT-save reconciler shutting down");
                return;
            }

            self.sweep().await;

            tokio::select! {
                _ = tokio::time::sleep(self.poll_interval) => {},
                _ = shutdown.cancelled() => {
                    info!("NFT-save reconciler shutting down");
                    return;
                }
            }
        }
    }

    /// Execute one sweep over all pending records.
    pub async fn sweep(&self) {
        let repo = PendingNftRepository::new(&self.storage);
        let digests = match repo.list_digests() {
            Ok(digests) => digests,
            Err(e) => {
                warn!(error = %e, "Reconciler: failed to list pending saves");
                return;
            }
        };

        if digests.is_empty() {
            return;
        }

        info!(count = digests.len(), "Reconciler: replaying pending NFT saves");

        for digest in &digests {
            let pending = match repo.get(digest) {
                Ok(pending) => pending,
                Err(e) => {
                    warn!(digest = %digest, error = %e, "Reconciler: failed to read pending save");
                    continue;
                }
            };

            self.replay(&repo, pending).await;
        }
    }

    /// Replay one pending save.
    async fn replay(&self, repo: &PendingNftRepository<'_>, mut pending: PendingNftSave) {
        let digest = pending.digest.clone();

        // The minted object id may have been unresolvable at enqueue time.
        let nft_id = match &pending.nft_id {
            Some(nft_id) => nft_id.clone(),
            None => match self.chain.get_transaction_effects(&digest).await {
                Ok(effects) => match resolve_created_object_id(&effects) {
                    Some(nft_id) => {
                        pending.nft_id = Some(nft_id.clone());
                        nft_id
                    }
                    None => {
                        // A mint with no created object will never resolve.
                        warn!(
                            digest = %digest,
                            "Reconciler: transaction created no object, dropping pending save"
                        );
                        let _ = repo.remove(&digest);
                        return;
                    }
                },
                Err(e) => {
                    warn!(
                        digest = %digest,
                        error = %e,
                        "Reconciler: could not fetch effects, will retry"
                    );
                    pending.attempts += 1;
                    let _ = repo.put(&pending);
                    return;
                }
            },
        };

        let request = CreateNftRequest {
            nft_id,
            file_id: pending.file_id.clone(),
            name: pending.name.clone(),
            description: pending.description.clone(),
            price: pending.price.clone(),
        };

        match self.gateway.create_nft(&request) {
            Ok(record) => {
                info!(
                    digest = %digest,
                    nft_id = %record.id,
                    attempts = pending.attempts,
                    "Reconciler: deferred NFT save completed"
                );
                let _ = repo.remove(&digest);
            }
            Err(e) if e.kind == GatewayErrorKind::NotFound => {
                // The referenced file is gone; this save can never succeed.
                warn!(
                    digest = %digest,
                    error = %e,
                    "Reconciler: referenced file missing, dropping pending save"
                );
                let _ = repo.remove(&digest);
            }
            Err(e) => {
                warn!(
                    digest = %digest,
                    error = %e,
                    "Reconciler: save failed, will retry"
                );
                pending.attempts += 1;
                let _ = repo.put(&pending);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tempfile::TempDir;

    use crate::gateway::MetadataGateway;
    use crate::models::{CreateVaultRequest, SaveFileRequest, WalletAddress};
    use crate::storage::{AvatarStore, NftRepository, StoragePaths};
    use crate::sui::client::ChainError;
    use crate::sui::types::{Coin, TransactionEffects};

    /// Chain reader fake returning fixed effects.
    struct FixedEffects {
        created: Option<&'static str>,
    }

    impl ChainReader for FixedEffects {
        async fn get_coins(&self, _owner: &str) -> Result<Vec<Coin>, ChainError> {
            Ok(vec![])
        }

        async fn get_transaction_effects(
            &self,
            _digest: &str,
        ) -> Result<TransactionEffects, ChainError> {
            let created = match self.created {
                Some(id) => format!(r#"[{{"reference":{{"objectId":"{id}"}}}}]"#),
                None => "[]".to_string(),
            };
            Ok(serde_json::from_str(&format!(
                r#"{{"status":{{"status":"success"}},"created":{created}}}"#
            ))
            .unwrap())
        }
    }

    struct Fixture {
        storage: Arc<MetadataStore>,
        gateway: MetadataGateway,
        _dir: TempDir,
    }

    fn fixture() -> Fixture {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let mut store = MetadataStore::new(StoragePaths::new(dir.path()));
        store.initialize().expect("Failed to initialize");
        let storage = Arc::new(store);
        let gateway = MetadataGateway::new(storage.clone(), AvatarStore::new("/avatars"));
        Fixture {
            storage,
            gateway,
            _dir: dir,
        }
    }

    fn seed_file(fixture: &Fixture, upload_id: &str) {
        fixture
            .gateway
            .create_vault(&CreateVaultRequest {
                name: "MyVault".to_string(),
                vault_id: "v-1".to_string(),
                wallet_address: WalletAddress::from("0xwallet"),
                encrypted: None,
            })
            .unwrap();
        fixture
            .gateway
            .save_file(&SaveFileRequest {
                file_id: "artwork.png".to_string(),
                upload_id: upload_id.to_string(),
                blob_id: "blob-1".to_string(),
                name: "artwork.png".to_string(),
                vault_id: "v-1".to_string(),
                wallet_address: WalletAddress::from("0xwallet"),
                mime_type: Some("image/png".to_string()),
                size: Some(2048),
            })
            .unwrap();
    }

    fn pending(digest: &str, nft_id: Option<&str>, file_id: &str) -> PendingNftSave {
        PendingNftSave {
            digest: digest.to_string(),
            nft_id: nft_id.map(str::to_string),
            file_id: file_id.to_string(),
            name: Some("Pass".to_string()),
            description: None,
            price: Some("100000000".to_string()),
            attempts: 0,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn sweep_replays_pending_save_and_clears_queue() {
        let f = fixture();
        seed_file(&f, "upload-1");

        let repo = PendingNftRepository::new(&f.storage);
        repo.put(&pending("digest-1", Some("0xnft1"), "upload-1"))
            .unwrap();

        let reconciler = NftSaveReconciler::new(
            f.storage.clone(),
            f.gateway.clone(),
            FixedEffects { created: None },
        );
        reconciler.sweep().await;

        assert!(repo.list_digests().unwrap().is_empty());
        let nft = NftRepository::new(&f.storage).get("0xnft1").unwrap();
        assert_eq!(nft.file_id, "upload-1");
        assert_eq!(nft.price.as_deref(), Some("100000000"));
    }

    #[tokio::test]
    async fn sweep_resolves_missing_object_id_from_effects() {
        let f = fixture();
        seed_file(&f, "upload-1");

        let repo = PendingNftRepository::new(&f.storage);
        repo.put(&pending("digest-1", None, "upload-1")).unwrap();

        let reconciler = NftSaveReconciler::new(
            f.storage.clone(),
            f.gateway.clone(),
            FixedEffects {
                created: Some("0xresolved"),
            },
        );
        reconciler.sweep().await;

        assert!(repo.list_digests().unwrap().is_empty());
        assert!(NftRepository::new(&f.storage).exists("0xresolved"));
    }

    #[tokio::test]
    async fn sweep_drops_saves_for_missing_files() {
        let f = fixture();
        // No file seeded: create_nft will keep answering not_found.

        let repo = PendingNftRepository::new(&f.storage);
        repo.put(&pending("digest-1", Some("0xnft1"), "upload-ghost"))
            .unwrap();

        let reconciler = NftSaveReconciler::new(
            f.storage.clone(),
            f.gateway.clone(),
            FixedEffects { created: None },
        );
        reconciler.sweep().await;

        assert!(repo.list_digests().unwrap().is_empty());
        assert!(!NftRepository::new(&f.storage).exists("0xnft1"));
    }

    #[tokio::test]
    async fn sweep_drops_saves_whose_mint_created_nothing() {
        let f = fixture();
        seed_file(&f, "upload-1");

        let repo = PendingNftRepository::new(&f.storage);
        repo.put(&pending("digest-1", None, "upload-1")).unwrap();

        let reconciler = NftSaveReconciler::new(
            f.storage.clone(),
            f.gateway.clone(),
            FixedEffects { created: None },
        );
        reconciler.sweep().await;

        assert!(repo.list_digests().unwrap().is_empty());
    }

    #[tokio::test]
    async fn run_stops_on_cancellation() {
        let f = fixture();
        let reconciler = NftSaveReconciler::new(
            f.storage.clone(),
            f.gateway.clone(),
            FixedEffects { created: None },
        )
        .with_poll_interval(Duration::from_millis(10));

        let shutdown = CancellationToken::new();
        let handle = tokio::spawn(reconciler.run(shutdown.clone()));

        tokio::time::sleep(Duration::from_millis(30)).await;
        shutdown.cancel();

        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("reconciler should stop after cancellation")
            .expect("reconciler task should not panic");
    }
}
