// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 WalrusPass

//! Wire types for the Sui JSON-RPC interface.

use serde::{Deserialize, Deserializer, Serialize};

/// SUI coin type tag.
pub const SUI_COIN_TYPE: &str = "0x2::sui::SUI";

/// MIST per SUI (9 decimals).
pub const MIST_PER_SUI: u64 = 1_000_000_000;

/// Deserialize a u64 the RPC encodes as a decimal string.
fn u64_from_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    let value = String::deserialize(deserializer)?;
    value.parse().map_err(serde::de::Error::custom)
}

/// A coin object owned by an address.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Coin {
    /// Object id of the coin.
    pub coin_object_id: String,
    /// Coin type tag.
    #[serde(default = "default_coin_type")]
    pub coin_type: String,
    /// Balance in MIST.
    #[serde(deserialize_with = "u64_from_string", serialize_with = "balance_to_string")]
    pub balance: u64,
}

fn default_coin_type() -> String {
    SUI_COIN_TYPE.to_string()
}

fn balance_to_string<S: serde::Serializer>(value: &u64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&value.to_string())
}

/// Reference to an object touched by a transaction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ObjectRef {
    /// Object id.
    pub object_id: String,
}

/// An object created by a transaction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreatedObject {
    /// Reference to the created object.
    pub reference: ObjectRef,
}

/// Execution status of a transaction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExecutionStatus {
    /// `"success"` or `"failure"`.
    pub status: String,
    /// Abort/runtime error detail on failure.
    #[serde(default)]
    pub error: Option<String>,
}

impl ExecutionStatus {
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}

/// Effects of an executed transaction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TransactionEffects {
    /// Execution status.
    pub status: ExecutionStatus,
    /// Objects created by the transaction.
    #[serde(default)]
    pub created: Vec<CreatedObject>,
}

/// Response to a transaction submission or lookup.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TransactionResponse {
    /// Transaction digest.
    pub digest: String,
    /// Effects, when requested.
    #[serde(default)]
    pub effects: Option<TransactionEffects>,
}

/// A Move entry-point invocation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MoveCall {
    /// Package id of the contract.
    pub package: String,
    /// Module name inside the package.
    pub module: String,
    /// Entry-point function name.
    pub function: String,
    /// Type arguments, if any.
    pub type_arguments: Vec<String>,
    /// Call arguments (object ids and pure values).
    pub arguments: Vec<serde_json::Value>,
}

/// A wallet-signable transaction built by this adapter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UnsignedTransaction {
    /// The entry-point invocation.
    pub call: MoveCall,
    /// Fixed gas budget in MIST.
    pub gas_budget: u64,
    /// Explicit gas coin, when the caller selected one.
    pub gas_payment: Option<String>,
}

/// Coins chosen to fund a purchase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoinSelection {
    /// Coin spent on the price.
    pub payment_coin: Coin,
    /// Coin covering gas (may equal the payment coin).
    pub gas_coin: Coin,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coin_balance_parses_from_rpc_string() {
        let coin: Coin = serde_json::from_str(
            r#"{"coinObjectId":"0xc1","coinType":"0x2::sui::SUI","balance":"250000000"}"#,
        )
        .unwrap();
        assert_eq!(coin.balance, 250_000_000);
        assert_eq!(coin.coin_object_id, "0xc1");
    }

    #[test]
    fn effects_deserialize_with_created_objects() {
        let effects: TransactionEffects = serde_json::from_str(
            r#"{
                "status": {"status": "success"},
                "created": [{"reference": {"objectId": "0xnft1"}}]
            }"#,
        )
        .unwrap();
        assert!(effects.status.is_success());
        assert_eq!(effects.created[0].reference.object_id, "0xnft1");
    }

    #[test]
    fn effects_without_created_default_to_empty() {
        let effects: TransactionEffects =
            serde_json::from_str(r#"{"status":{"status":"failure","error":"abort"}}"#).unwrap();
        assert!(!effects.status.is_success());
        assert!(effects.created.is_empty());
    }
}
