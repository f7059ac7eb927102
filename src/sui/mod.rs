// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 WalrusPass

//! # Sui Chain Adapter
//!
//! Builds wallet-signable transactions for the gatekeeper contract and
//! resolves their on-chain effects. Wallet signing itself stays external:
//! the adapter hands back unsigned transactions and accepts pre-signed
//! payloads for submission.
//!
//! - `types` — JSON-RPC wire types (coins, effects, unsigned transactions)
//! - `transactions` — mint/buy builders, coin selection, unit conversion
//! - `client` — JSON-RPC client against a fullnode

pub mod client;
pub mod transactions;
pub mod types;

pub use client::{ChainError, SuiClient};
pub use transactions::{ContractConfig, MINT_GAS_BUDGET};
pub use types::{
    Coin, CoinSelection, MoveCall, TransactionEffects, TransactionResponse, UnsignedTransaction,
};

/// Read-only chain queries the service depends on.
pub trait ChainReader {
    /// Fetch SUI coin objects owned by an address (first page).
    fn get_coins(
        &self,
        owner: &str,
    ) -> impl std::future::Future<Output = Result<Vec<Coin>, ChainError>> + Send;

    /// Fetch the effects of an executed transaction by digest.
    fn get_transaction_effects(
        &self,
        digest: &str,
    ) -> impl std::future::Future<Output = Result<TransactionEffects, ChainError>> + Send;
}

/// Signs and submits an unsigned transaction.
///
/// Implemented by the wallet bridge in front of the user's key material;
/// this service never holds keys itself.
pub trait TransactionExecutor {
    fn execute(
        &self,
        tx: &UnsignedTransaction,
    ) -> impl std::future::Future<Output = Result<TransactionResponse, ChainError>> + Send;
}
