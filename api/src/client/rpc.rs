use std::future::Future;
use std::time::Duration;

use alloy_primitives::{Address, Bytes, B256, U256};
use alloy_sol_types::{SolCall, SolEvent};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::contracts::{INftCollection, TxRequest};
use crate::error::MarketError;

#[derive(Serialize)]
pub struct RpcRequest<'a> {
    pub jsonrpc: &'static str,
    pub id: u64,
    pub method: &'a str,
    pub params: Vec<serde_json::Value>,
}

#[derive(Deserialize, Debug)]
pub struct RpcResponse<T> {
    pub result: Option<T>,
    pub error: Option<RpcError>,
}

#[derive(Deserialize, Debug)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub address: Address,
    pub topics: Vec<B256>,
    pub data: Bytes,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TxReceipt {
    pub transaction_hash: B256,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub block_number: Option<String>,
    #[serde(default)]
    pub logs: Vec<LogEntry>,
}

impl TxReceipt {
    /// Pre-Byzantium receipts carry no status; treat them as successful.
    pub fn succeeded(&self) -> bool {
        match &self.status {
            Some(status) => parse_quantity(status).map(|s| s == 1).unwrap_or(false),
            None => true,
        }
    }

    /// Token id of the first `Transfer` from the zero address emitted by `collection`.
    pub fn minted_token_id(&self, collection: Address) -> Option<U256> {
        self.logs
            .iter()
            .filter(|log| log.address == collection && log.topics.len() == 4)
            .filter(|log| log.topics[0] == INftCollection::Transfer::SIGNATURE_HASH)
            .find(|log| log.topics[1] == B256::ZERO)
            .map(|log| U256::from_be_slice(log.topics[3].as_slice()))
    }
}

/// Parses a JSON-RPC hex quantity such as `"0x1"`.
pub fn parse_quantity(raw: &str) -> Result<u64, MarketError> {
    let digits = raw.trim().trim_start_matches("0x");
    u64::from_str_radix(if digits.is_empty() { "0" } else { digits }, 16)
        .map_err(|_| MarketError::OutOfRange(raw.to_string()))
}

/// Minimal Ethereum JSON-RPC client over HTTP.
#[derive(Clone, Debug)]
pub struct EvmRpc {
    http: reqwest::Client,
    url: String,
}

impl EvmRpc {
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), url)
    }

    pub fn with_client(http: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub async fn request<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Vec<serde_json::Value>,
    ) -> Result<Option<T>, MarketError> {
        let request = RpcRequest {
            jsonrpc: "2.0",
            id: 1,
            method,
            params,
        };

        let response = self.http.post(&self.url).json(&request).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(MarketError::Status {
                service: "rpc",
                status: status.as_u16(),
            });
        }

        let rpc_response: RpcResponse<T> = response.json().await?;
        if let Some(error) = rpc_response.error {
            return Err(MarketError::Rpc {
                code: error.code,
                message: error.message,
            });
        }
        Ok(rpc_response.result)
    }

    pub async fn chain_id(&self) -> Result<u64, MarketError> {
        let raw: Option<String> = self.request("eth_chainId", vec![]).await?;
        parse_quantity(&raw.unwrap_or_default())
    }

    pub async fn block_number(&self) -> Result<u64, MarketError> {
        let raw: Option<String> = self.request("eth_blockNumber", vec![]).await?;
        parse_quantity(&raw.unwrap_or_default())
    }

    /// `eth_call` against the latest block, decoded with the call's return type.
    pub async fn call<C: SolCall>(&self, to: Address, call: &C) -> Result<C::Return, MarketError> {
        let data = Bytes::from(call.abi_encode());
        let params = vec![
            serde_json::json!({ "to": to, "data": data }),
            serde_json::json!("latest"),
        ];
        let output: Bytes = self
            .request("eth_call", params)
            .await?
            .ok_or_else(|| MarketError::Rpc {
                code: 0,
                message: "eth_call returned no data".to_string(),
            })?;
        Ok(C::abi_decode_returns(&output, true)?)
    }

    /// Sends through the node's own account management (dev nodes, unlocked accounts).
    pub async fn send_transaction(&self, tx: &TxRequest) -> Result<B256, MarketError> {
        let params = vec![tx_json(tx)];
        self.request("eth_sendTransaction", params)
            .await?
            .ok_or_else(|| MarketError::Rpc {
                code: 0,
                message: "eth_sendTransaction returned no hash".to_string(),
            })
    }

    pub async fn transaction_receipt(&self, hash: B256) -> Result<Option<TxReceipt>, MarketError> {
        self.request("eth_getTransactionReceipt", vec![serde_json::json!(hash)])
            .await
    }

    /// Polls for the receipt, sleeping with the caller's timer between attempts.
    pub async fn wait_for_receipt<S, F>(
        &self,
        hash: B256,
        attempts: u32,
        interval: Duration,
        sleep: S,
    ) -> Result<TxReceipt, MarketError>
    where
        S: Fn(Duration) -> F,
        F: Future<Output = ()>,
    {
        for _ in 0..attempts {
            if let Some(receipt) = self.transaction_receipt(hash).await? {
                if !receipt.succeeded() {
                    return Err(MarketError::Reverted(hash.to_string()));
                }
                return Ok(receipt);
            }
            sleep(interval).await;
        }
        Err(MarketError::ReceiptTimeout(hash.to_string()))
    }
}

/// Transaction object as both `eth_sendTransaction` and injected wallets accept it.
pub fn tx_json(tx: &TxRequest) -> serde_json::Value {
    serde_json::json!({
        "from": tx.from,
        "to": tx.to,
        "data": tx.data,
        "value": format!("0x{:x}", tx.value),
    })
}
