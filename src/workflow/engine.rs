// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 WalrusPass

//! The listing workflow engine.
//!
//! Each step handler awaits its collaborator calls sequentially, advances
//! only when the immediately preceding call succeeded, and records the
//! first error otherwise. A busy flag mirrors the disabled-submit
//! affordance of the UI and is cleared on every exit path.

use chrono::Utc;
use tracing::{error, info, warn};

use crate::gateway::MetadataGateway;
use crate::models::{CreateNftRequest, CreateVaultRequest, SaveFileRequest, WalletAddress};
use crate::storage::PendingNftSave;
use crate::sui::transactions::{
    build_buy_transaction, build_mint_transaction, resolve_created_object_id,
    select_payment_coins, ContractConfig,
};
use crate::sui::{ChainReader, TransactionExecutor};
use crate::tusky::{FileUpload, VaultStore};

use super::{Session, WorkflowConfig, WorkflowError, WorkflowStep};

/// Vault created during the workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedVault {
    pub id: String,
    pub name: String,
}

/// File uploaded and persisted during the workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    /// Upload identifier; doubles as the persisted file id.
    pub id: String,
    /// Content-addressable blob pointer.
    pub blob_id: String,
    /// Original file name.
    pub name: String,
}

/// Whether the NFT metadata made it to the persistence layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetadataPersistence {
    /// The record was written.
    Saved,
    /// The mint succeeded but the record did not persist; a pending entry
    /// was queued for the reconciler and the user sees a warning.
    Deferred { warning: String },
}

/// Terminal result of the minting step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintOutcome {
    /// Digest of the successful mint transaction.
    pub digest: String,
    /// Minted object id, when the effects could be resolved.
    pub nft_id: Option<String>,
    /// Fate of the metadata save.
    pub metadata: MetadataPersistence,
}

/// Result of a completed purchase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseReceipt {
    /// Digest of the purchase transaction.
    pub digest: String,
}

/// The listing workflow state machine.
///
/// Generic over the storage adapter and the chain executor so tests run
/// against fakes; the gateway is in-process and backed by a temp directory
/// in tests.
pub struct ListingWorkflow<V, C> {
    config: WorkflowConfig,
    contract: ContractConfig,
    session: Session,
    vault_store: V,
    chain: C,
    gateway: MetadataGateway,
    step: WorkflowStep,
    busy: bool,
    last_error: Option<String>,
    vault: Option<CreatedVault>,
    file: Option<UploadedFile>,
    outcome: Option<MintOutcome>,
}

impl<V, C> ListingWorkflow<V, C>
where
    V: VaultStore,
    C: TransactionExecutor + ChainReader,
{
    /// Create a workflow for one session.
    pub fn new(
        config: WorkflowConfig,
        contract: ContractConfig,
        session: Session,
        vault_store: V,
        chain: C,
        gateway: MetadataGateway,
    ) -> Self {
        Self {
            config,
            contract,
            session,
            vault_store,
            chain,
            gateway,
            step: WorkflowStep::AwaitingAuthentication,
            busy: false,
            last_error: None,
            vault: None,
            file: None,
            outcome: None,
        }
    }

    /// Current step.
    pub fn step(&self) -> WorkflowStep {
        self.step
    }

    /// Message of the most recent failure, cleared by the next success.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Vault created in this run, once the creation step completed.
    pub fn vault(&self) -> Option<&CreatedVault> {
        self.vault.as_ref()
    }

    /// File uploaded in this run, once the upload step completed.
    pub fn file(&self) -> Option<&UploadedFile> {
        self.file.as_ref()
    }

    /// Mint outcome, once the workflow reached the terminal step.
    pub fn outcome(&self) -> Option<&MintOutcome> {
        self.outcome.as_ref()
    }

    fn expect_step(&self, expected: WorkflowStep) -> Result<(), WorkflowError> {
        if self.step != expected {
            return Err(WorkflowError::OutOfOrder {
                expected,
                actual: self.step,
            });
        }
        if self.busy {
            return Err(WorkflowError::Busy);
        }
        Ok(())
    }

    /// Clear the busy flag and either advance or record the failure.
    fn settle<T>(
        &mut self,
        operation: &'static str,
        next: WorkflowStep,
        result: Result<T, WorkflowError>,
    ) -> Result<T, WorkflowError> {
        self.busy = false;
        match result {
            Ok(value) => {
                self.last_error = None;
                self.step = next;
                info!(operation, step = %next, "Workflow advanced");
                Ok(value)
            }
            Err(e) => {
                error!(operation, step = %self.step, error = %e, "Workflow step failed");
                self.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Enter the workflow from the initial state.
    ///
    /// Requires a signed-in session; the encryption-setup step is bypassed
    /// entirely when the session already has encryption configured.
    pub fn begin(&mut self) -> Result<WorkflowStep, WorkflowError> {
        self.expect_step(WorkflowStep::AwaitingAuthentication)?;

        if self.session.wallet_address.trim().is_empty() {
            let e = WorkflowError::NotSignedIn;
            self.last_error = Some(e.to_string());
            return Err(e);
        }

        self.last_error = None;
        self.step = if self.session.encryption_configured {
            WorkflowStep::VaultCreation
        } else {
            WorkflowStep::EncryptionSetup
        };

        info!(
            wallet_address = %self.session.wallet_address,
            step = %self.step,
            "Workflow started"
        );
        Ok(self.step)
    }

    /// Configure encryption for the account with a password.
    pub async fn setup_encryption(&mut self, password: &str) -> Result<(), WorkflowError> {
        self.expect_step(WorkflowStep::EncryptionSetup)?;
        self.busy = true;

        let result = self.run_setup_encryption(password).await;
        self.settle("setup_encryption", WorkflowStep::VaultCreation, result)
    }

    async fn run_setup_encryption(&mut self, password: &str) -> Result<(), WorkflowError> {
        if password.trim().is_empty() {
            return Err(WorkflowError::EmptyInput("password"));
        }

        self.vault_store.setup_encryption(password).await?;
        self.session.encryption_configured = true;
        Ok(())
    }

    /// Create the vault and persist its record.
    pub async fn create_vault(
        &mut self,
        name: &str,
        private: bool,
    ) -> Result<CreatedVault, WorkflowError> {
        self.expect_step(WorkflowStep::VaultCreation)?;
        self.busy = true;

        let result = self.run_create_vault(name, private).await;
        self.settle("create_vault", WorkflowStep::FileUpload, result)
    }

    async fn run_create_vault(
        &mut self,
        name: &str,
        private: bool,
    ) -> Result<CreatedVault, WorkflowError> {
        if name.trim().is_empty() {
            return Err(WorkflowError::EmptyInput("vault name"));
        }
        if self.config.require_private_vault && !private {
            return Err(WorkflowError::PublicVaultRejected);
        }

        let handle = self.vault_store.create_vault(name, None).await?;

        self.gateway.create_vault(&CreateVaultRequest {
            name: handle.name.clone(),
            vault_id: handle.id.clone(),
            wallet_address: WalletAddress::from(self.session.wallet_address.as_str()),
            encrypted: Some(true),
        })?;

        let vault = CreatedVault {
            id: handle.id,
            name: handle.name,
        };
        self.vault = Some(vault.clone());
        Ok(vault)
    }

    /// Upload one file into the created vault and persist its record.
    pub async fn upload_file(&mut self, upload: FileUpload) -> Result<UploadedFile, WorkflowError> {
        self.expect_step(WorkflowStep::FileUpload)?;
        self.busy = true;

        let result = self.run_upload_file(upload).await;
        self.settle("upload_file", WorkflowStep::NftMinting, result)
    }

    async fn run_upload_file(&mut self, upload: FileUpload) -> Result<UploadedFile, WorkflowError> {
        if upload.name.trim().is_empty() {
            return Err(WorkflowError::EmptyInput("file name"));
        }

        let vault = self
            .vault
            .clone()
            .ok_or(WorkflowError::EmptyInput("vault"))?;

        let upload_id = self.vault_store.upload_file(&vault.id, &upload).await?;

        // The blob pointer only exists once the storage subsystem has the
        // file; earlier revisions used the upload id for both.
        let details = self.vault_store.get_file(&upload_id).await?;
        let blob_id = details.blob_id.unwrap_or_else(|| upload_id.clone());

        self.gateway.save_file(&SaveFileRequest {
            file_id: upload.name.clone(),
            upload_id: upload_id.clone(),
            blob_id: blob_id.clone(),
            name: upload.name.clone(),
            vault_id: vault.id.clone(),
            wallet_address: WalletAddress::from(self.session.wallet_address.as_str()),
            mime_type: Some(upload.mime_type.clone()),
            size: Some(upload.bytes.len() as u64),
        })?;

        let file = UploadedFile {
            id: upload_id,
            blob_id,
            name: upload.name,
        };
        self.file = Some(file.clone());
        Ok(file)
    }

    /// Mint the NFT for the uploaded file and persist its record.
    ///
    /// The price floor is enforced before any transaction is built. A
    /// metadata-save failure after a successful mint is non-fatal: the
    /// on-chain effect is kept, a pending entry is queued for the
    /// reconciler, and the outcome carries a warning alongside the digest.
    pub async fn mint_nft(
        &mut self,
        name: &str,
        description: &str,
        price_mist: u64,
    ) -> Result<MintOutcome, WorkflowError> {
        self.expect_step(WorkflowStep::NftMinting)?;
        self.busy = true;

        let result = self.run_mint_nft(name, description, price_mist).await;
        self.settle("mint_nft", WorkflowStep::Success, result)
    }

    async fn run_mint_nft(
        &mut self,
        name: &str,
        description: &str,
        price_mist: u64,
    ) -> Result<MintOutcome, WorkflowError> {
        if self.config.collect_nft_details && name.trim().is_empty() {
            return Err(WorkflowError::EmptyInput("NFT name"));
        }
        if price_mist < self.config.min_price_mist {
            return Err(WorkflowError::PriceBelowMinimum {
                price: price_mist,
                minimum: self.config.min_price_mist,
            });
        }

        let file = self
            .file
            .clone()
            .ok_or(WorkflowError::EmptyInput("uploaded file"))?;

        let tx = build_mint_transaction(
            &self.contract,
            price_mist,
            &file.blob_id,
            name,
            description,
        );

        let response = self.chain.execute(&tx).await?;
        let digest = response.digest.clone();

        let effects = match response.effects {
            Some(effects) => effects,
            None => self.chain.get_transaction_effects(&digest).await?,
        };

        if !effects.status.is_success() {
            return Err(WorkflowError::TransactionFailed(
                effects
                    .status
                    .error
                    .unwrap_or_else(|| "execution failed".to_string()),
            ));
        }

        info!(digest = %digest, file_id = %file.id, "Mint transaction succeeded");

        let nft_id = resolve_created_object_id(&effects);
        let (persisted_name, persisted_description, persisted_price) =
            if self.config.collect_nft_details {
                (
                    Some(name.to_string()),
                    Some(description.to_string()),
                    Some(price_mist.to_string()),
                )
            } else {
                (None, None, None)
            };

        let metadata = match &nft_id {
            Some(nft_id) => {
                let save = self.gateway.create_nft(&CreateNftRequest {
                    nft_id: nft_id.clone(),
                    file_id: file.id.clone(),
                    name: persisted_name.clone(),
                    description: persisted_description.clone(),
                    price: persisted_price.clone(),
                });

                match save {
                    Ok(_) => MetadataPersistence::Saved,
                    Err(e) => {
                        warn!(
                            digest = %digest,
                            nft_id = %nft_id,
                            error = %e,
                            "Mint succeeded but metadata save failed; queued for retry"
                        );
                        self.defer_save(&digest, Some(nft_id.clone()), &file, &persisted_name, &persisted_description, &persisted_price);
                        MetadataPersistence::Deferred {
                            warning: format!(
                                "NFT minted (digest {digest}) but saving its metadata failed; it will be retried"
                            ),
                        }
                    }
                }
            }
            None => {
                warn!(
                    digest = %digest,
                    "Mint succeeded but no created object was found; queued for retry"
                );
                self.defer_save(&digest, None, &file, &persisted_name, &persisted_description, &persisted_price);
                MetadataPersistence::Deferred {
                    warning: format!(
                        "NFT minted (digest {digest}) but the created object could not be resolved; it will be retried"
                    ),
                }
            }
        };

        let outcome = MintOutcome {
            digest,
            nft_id,
            metadata,
        };
        self.outcome = Some(outcome.clone());
        Ok(outcome)
    }

    fn defer_save(
        &self,
        digest: &str,
        nft_id: Option<String>,
        file: &UploadedFile,
        name: &Option<String>,
        description: &Option<String>,
        price: &Option<String>,
    ) {
        let pending = PendingNftSave {
            digest: digest.to_string(),
            nft_id,
            file_id: file.id.clone(),
            name: name.clone(),
            description: description.clone(),
            price: price.clone(),
            attempts: 0,
            created_at: Utc::now(),
        };

        if let Err(e) = self.gateway.defer_nft_save(&pending) {
            error!(digest = %digest, error = %e, "Failed to queue deferred NFT save");
        }
    }

    /// Start over from the terminal step, discarding all per-run state.
    pub fn reset(&mut self) {
        self.vault = None;
        self.file = None;
        self.outcome = None;
        self.last_error = None;
        self.busy = false;
        self.step = if self.session.encryption_configured {
            WorkflowStep::VaultCreation
        } else {
            WorkflowStep::EncryptionSetup
        };

        info!(step = %self.step, "Workflow reset");
    }
}

/// Buy a listed NFT.
///
/// Fetches the buyer's coins, picks the two largest to cover price plus
/// gas, and submits the purchase. Aborts before submission when the
/// balance cannot cover the total.
pub async fn purchase_nft<C>(
    chain: &C,
    contract: &ContractConfig,
    buyer_address: &str,
    nft_id: &str,
    price_mist: u64,
) -> Result<PurchaseReceipt, WorkflowError>
where
    C: TransactionExecutor + ChainReader,
{
    info!(buyer = %buyer_address, nft_id = %nft_id, price_mist, "Buying NFT");

    let coins = chain.get_coins(buyer_address).await?;
    let selection = select_payment_coins(&coins, price_mist)?;

    let tx = build_buy_transaction(
        contract,
        nft_id,
        &selection.payment_coin.coin_object_id,
        &selection.gas_coin.coin_object_id,
    );

    let response = chain.execute(&tx).await?;

    if let Some(effects) = &response.effects {
        if !effects.status.is_success() {
            return Err(WorkflowError::TransactionFailed(
                effects
                    .status
                    .error
                    .clone()
                    .unwrap_or_else(|| "execution failed".to_string()),
            ));
        }
    }

    info!(digest = %response.digest, nft_id = %nft_id, "NFT purchased");
    Ok(PurchaseReceipt {
        digest: response.digest,
    })
}
