// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 WalrusPass

//! JSON-RPC client for a Sui fullnode.

use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{error, info};

use super::types::{Coin, TransactionEffects, TransactionResponse, SUI_COIN_TYPE};
use super::ChainReader;

/// Page size when fetching owned coins.
const COIN_PAGE_LIMIT: u32 = 10;

/// Errors that can occur during chain operations.
#[derive(Debug, thiserror::Error)]
pub enum ChainError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("Unexpected response shape: {0}")]
    Decode(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("No SUI coins available")]
    NoCoins,

    #[error("Insufficient balance: required {required} MIST, available {available} MIST")]
    InsufficientBalance { required: u64, available: u64 },
}

#[derive(Debug, Deserialize)]
struct RpcEnvelope {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorBody>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorBody {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
struct CoinPage {
    data: Vec<Coin>,
}

/// JSON-RPC client against a Sui fullnode.
#[derive(Debug, Clone)]
pub struct SuiClient {
    http: reqwest::Client,
    rpc_url: String,
}

impl SuiClient {
    /// Create a client for the given fullnode endpoint.
    pub fn new(http: reqwest::Client, rpc_url: impl Into<String>) -> Self {
        Self {
            http,
            rpc_url: rpc_url.into(),
        }
    }

    /// Issue one JSON-RPC call and unwrap the result value.
    async fn rpc(&self, method: &str, params: Value) -> Result<Value, ChainError> {
        let envelope: RpcEnvelope = self
            .http
            .post(&self.rpc_url)
            .json(&json!({
                "jsonrpc": "2.0",
                "id": 1,
                "method": method,
                "params": params,
            }))
            .send()
            .await?
            .json()
            .await?;

        if let Some(err) = envelope.error {
            error!(method = %method, code = err.code, message = %err.message, "RPC call failed");
            return Err(ChainError::Rpc {
                code: err.code,
                message: err.message,
            });
        }

        envelope
            .result
            .ok_or_else(|| ChainError::Decode(format!("{method} returned neither result nor error")))
    }

    /// Submit a pre-signed transaction and wait for its effects.
    ///
    /// `tx_bytes` and `signatures` are base64 payloads produced by the
    /// external wallet.
    pub async fn execute_transaction_block(
        &self,
        tx_bytes: &str,
        signatures: &[String],
    ) -> Result<TransactionResponse, ChainError> {
        info!("Submitting signed transaction");

        let result = self
            .rpc(
                "sui_executeTransactionBlock",
                json!([
                    tx_bytes,
                    signatures,
                    { "showEffects": true },
                    "WaitForLocalExecution",
                ]),
            )
            .await?;

        let response: TransactionResponse =
            serde_json::from_value(result).map_err(|e| ChainError::Decode(e.to_string()))?;

        info!(digest = %response.digest, "Transaction submitted");
        Ok(response)
    }
}

impl ChainReader for SuiClient {
    async fn get_coins(&self, owner: &str) -> Result<Vec<Coin>, ChainError> {
        info!(owner = %owner, "Fetching owned SUI coins");

        let result = self
            .rpc(
                "suix_getCoins",
                json!([owner, SUI_COIN_TYPE, null, COIN_PAGE_LIMIT]),
            )
            .await?;

        let page: CoinPage =
            serde_json::from_value(result).map_err(|e| ChainError::Decode(e.to_string()))?;

        info!(owner = %owner, count = page.data.len(), "Coins fetched");
        Ok(page.data)
    }

    async fn get_transaction_effects(
        &self,
        digest: &str,
    ) -> Result<TransactionEffects, ChainError> {
        info!(digest = %digest, "Fetching transaction effects");

        let result = self
            .rpc(
                "sui_getTransactionBlock",
                json!([digest, { "showEffects": true }]),
            )
            .await?;

        let response: TransactionResponse =
            serde_json::from_value(result).map_err(|e| ChainError::Decode(e.to_string()))?;

        response.effects.ok_or_else(|| {
            ChainError::Decode(format!("transaction {digest} carried no effects"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rpc_envelope_splits_result_and_error() {
        let ok: RpcEnvelope = serde_json::from_str(r#"{"jsonrpc":"2.0","result":{"x":1}}"#).unwrap();
        assert!(ok.result.is_some());
        assert!(ok.error.is_none());

        let err: RpcEnvelope = serde_json::from_str(
            r#"{"jsonrpc":"2.0","error":{"code":-32602,"message":"bad params"}}"#,
        )
        .unwrap();
        assert!(err.result.is_none());
        assert_eq!(err.error.unwrap().code, -32602);
    }

    #[test]
    fn coin_page_deserializes_rpc_shape() {
        let page: CoinPage = serde_json::from_str(
            r#"{
                "data": [
                    {"coinObjectId": "0xc1", "coinType": "0x2::sui::SUI", "balance": "1000"},
                    {"coinObjectId": "0xc2", "coinType": "0x2::sui::SUI", "balance": "2000"}
                ],
                "nextCursor": "0xc2",
                "hasNextPage": false
            }"#,
        )
        .unwrap();
        assert_eq!(page.data.len(), 2);
        assert_eq!(page.data[1].balance, 2000);
    }
}
