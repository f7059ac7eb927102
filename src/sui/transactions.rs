// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 WalrusPass

//! Transaction building for the gatekeeper contract.
//!
//! Mint and purchase both invoke fixed entry points on a fixed package with
//! a fixed gas budget. Price amounts are carried as integer MIST
//! everywhere; decimal SUI strings are converted exactly once, at the API
//! or workflow boundary.

use serde_json::json;
use tracing::error;

use super::client::ChainError;
use super::types::{
    Coin, CoinSelection, MoveCall, TransactionEffects, UnsignedTransaction, MIST_PER_SUI,
};

/// Fixed gas budget for mint and purchase transactions (0.1 SUI).
pub const MINT_GAS_BUDGET: u64 = 100_000_000;

/// Module of the gatekeeper contract.
const GATEKEEPER_MODULE: &str = "gatekeeper";

/// Mint entry point.
const MINT_FUNCTION: &str = "mint_nft";

/// Purchase entry point.
const BUY_FUNCTION: &str = "buy_nft";

/// On-chain addresses of the deployed gatekeeper contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractConfig {
    /// Package id of the gatekeeper contract.
    pub package_id: String,
    /// Shared listing object holding the NFTs for sale.
    pub listing_id: String,
}

impl ContractConfig {
    /// Load the deployed contract addresses from the environment.
    ///
    /// Returns `None` unless both `NFT_PACKAGE_ID` and `NFT_LISTING_ID`
    /// are set.
    pub fn from_env() -> Option<Self> {
        let package_id = std::env::var(crate::config::NFT_PACKAGE_ID_ENV).ok()?;
        let listing_id = std::env::var(crate::config::NFT_LISTING_ID_ENV).ok()?;
        Some(Self {
            package_id,
            listing_id,
        })
    }
}

/// Build an unsigned mint transaction.
///
/// Lists the minted NFT on the shared listing object with the given price.
pub fn build_mint_transaction(
    config: &ContractConfig,
    price_mist: u64,
    blob_id: &str,
    name: &str,
    description: &str,
) -> UnsignedTransaction {
    UnsignedTransaction {
        call: MoveCall {
            package: config.package_id.clone(),
            module: GATEKEEPER_MODULE.to_string(),
            function: MINT_FUNCTION.to_string(),
            type_arguments: vec![],
            arguments: vec![
                json!({ "object": config.listing_id }),
                json!(name),
                json!(description),
                json!(blob_id),
                json!(price_mist.to_string()),
            ],
        },
        gas_budget: MINT_GAS_BUDGET,
        gas_payment: None,
    }
}

/// Build an unsigned purchase transaction.
///
/// Spends `payment_coin_id` against the listed NFT and pays gas from
/// `gas_coin_id`.
pub fn build_buy_transaction(
    config: &ContractConfig,
    nft_id: &str,
    payment_coin_id: &str,
    gas_coin_id: &str,
) -> UnsignedTransaction {
    UnsignedTransaction {
        call: MoveCall {
            package: config.package_id.clone(),
            module: GATEKEEPER_MODULE.to_string(),
            function: BUY_FUNCTION.to_string(),
            type_arguments: vec![],
            arguments: vec![
                json!({ "object": config.listing_id }),
                json!(nft_id),
                json!({ "object": payment_coin_id }),
            ],
        },
        gas_budget: MINT_GAS_BUDGET,
        gas_payment: Some(gas_coin_id.to_string()),
    }
}

/// Choose coins to fund a purchase of `price_mist`.
///
/// Picks the two largest-balance coins (payment first, gas second; the same
/// coin when only one exists). Fails before any submission when the total
/// balance across the fetched coins cannot cover price plus the fixed gas
/// budget.
pub fn select_payment_coins(
    coins: &[Coin],
    price_mist: u64,
) -> Result<CoinSelection, ChainError> {
    if coins.is_empty() {
        return Err(ChainError::NoCoins);
    }

    let available: u64 = coins.iter().map(|coin| coin.balance).sum();
    let required = price_mist.saturating_add(MINT_GAS_BUDGET);

    if available < required {
        return Err(ChainError::InsufficientBalance {
            required,
            available,
        });
    }

    let mut sorted: Vec<&Coin> = coins.iter().collect();
    sorted.sort_by(|a, b| b.balance.cmp(&a.balance));

    let payment_coin = sorted[0].clone();
    let gas_coin = sorted.get(1).copied().unwrap_or(sorted[0]).clone();

    Ok(CoinSelection {
        payment_coin,
        gas_coin,
    })
}

/// Resolve the object id created by a transaction.
///
/// Returns the first created object's id, or `None` when the effects show
/// no creation (logged as an error — a successful mint always creates the
/// NFT object).
pub fn resolve_created_object_id(effects: &TransactionEffects) -> Option<String> {
    match effects.created.first() {
        Some(created) => Some(created.reference.object_id.clone()),
        None => {
            error!("Transaction effects contain no created object");
            None
        }
    }
}

/// Parse a decimal SUI amount (e.g. `"0.1"`) into MIST.
///
/// Accepts at most 9 fractional digits; anything else is rejected rather
/// than silently truncated.
pub fn parse_sui_amount(amount: &str) -> Result<u64, ChainError> {
    let amount = amount.trim();
    if amount.is_empty() {
        return Err(ChainError::InvalidAmount("empty amount".to_string()));
    }

    let (whole, fraction) = match amount.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (amount, ""),
    };

    if fraction.len() > 9 {
        return Err(ChainError::InvalidAmount(format!(
            "more than 9 decimal places: {amount}"
        )));
    }

    let whole: u64 = if whole.is_empty() {
        0
    } else {
        whole
            .parse()
            .map_err(|_| ChainError::InvalidAmount(amount.to_string()))?
    };

    let fraction_mist: u64 = if fraction.is_empty() {
        0
    } else {
        let padded = format!("{fraction:0<9}");
        padded
            .parse()
            .map_err(|_| ChainError::InvalidAmount(amount.to_string()))?
    };

    whole
        .checked_mul(MIST_PER_SUI)
        .and_then(|mist| mist.checked_add(fraction_mist))
        .ok_or_else(|| ChainError::InvalidAmount(format!("amount overflows: {amount}")))
}

/// Format a MIST amount as a decimal SUI string.
pub fn format_mist(mist: u64) -> String {
    let whole = mist / MIST_PER_SUI;
    let fraction = mist % MIST_PER_SUI;

    if fraction == 0 {
        return whole.to_string();
    }

    let fraction = format!("{fraction:09}");
    format!("{whole}.{}", fraction.trim_end_matches('0'))
}
