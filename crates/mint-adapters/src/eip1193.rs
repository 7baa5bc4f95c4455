use std::sync::atomic::{AtomicU64, Ordering};

use alloy::primitives::{Address, Bytes, B256};
use serde_json::Value;
use tracing::{debug, warn};

use cryptodevs_mint_core::{PortError, TxReceipt, TxRequest, WalletPort};

use crate::AdapterConfig;

/// Wallet reached over EIP-1193 JSON-RPC (Frame, a local dev node, or any
/// signer proxy that accepts `eth_requestAccounts` / `eth_sendTransaction`).
#[derive(Debug, Clone)]
pub struct Eip1193Adapter {
    mode: ProviderMode,
}

#[derive(Debug, Clone)]
enum ProviderMode {
    Disabled(String),
    Proxy(ProxyRuntime),
}

#[derive(Debug, Clone)]
struct ProxyRuntime {
    base_url: String,
    client: reqwest::blocking::Client,
}

static REQUEST_ID: AtomicU64 = AtomicU64::new(1);

impl Default for Eip1193Adapter {
    fn default() -> Self {
        Self::with_config(AdapterConfig::from_env())
    }
}

impl Eip1193Adapter {
    pub fn with_config(config: AdapterConfig) -> Self {
        let mode = match config.eip1193_url {
            Some(ref base_url) => {
                let timeout = std::time::Duration::from_millis(config.rpc_timeout_ms);
                match reqwest::blocking::Client::builder().timeout(timeout).build() {
                    Ok(client) => ProviderMode::Proxy(ProxyRuntime {
                        base_url: base_url.clone(),
                        client,
                    }),
                    Err(e) => ProviderMode::Disabled(format!(
                        "failed to initialize EIP-1193 client: {e}"
                    )),
                }
            }
            None => ProviderMode::Disabled("EIP-1193 endpoint not configured".to_owned()),
        };
        if let ProviderMode::Disabled(reason) = &mode {
            warn!(%reason, "wallet provider disabled");
        }
        Self { mode }
    }

    pub fn endpoint(&self) -> Option<&str> {
        match &self.mode {
            ProviderMode::Proxy(proxy) => Some(&proxy.base_url),
            ProviderMode::Disabled(_) => None,
        }
    }

    fn proxy_call(&self, method: &str, params: Value) -> Result<Value, PortError> {
        let proxy = match &self.mode {
            ProviderMode::Proxy(proxy) => proxy,
            ProviderMode::Disabled(reason) => return Err(PortError::Policy(reason.clone())),
        };

        let payload = serde_json::json!({
            "jsonrpc": "2.0",
            "id": REQUEST_ID.fetch_add(1, Ordering::Relaxed),
            "method": method,
            "params": params,
        });
        debug!(method, "eip1193 request");
        let response = proxy
            .client
            .post(&proxy.base_url)
            .json(&payload)
            .send()
            .map_err(|e| PortError::Transport(format!("eip1193 request failed: {e}")))?;
        let status = response.status();
        let body: Value = response
            .json()
            .map_err(|e| PortError::Transport(format!("eip1193 json decode failed: {e}")))?;
        if !status.is_success() {
            return Err(PortError::Transport(format!(
                "eip1193 status {}: {}",
                status, body
            )));
        }
        if let Some(err) = body.get("error") {
            return Err(PortError::Transport(format!(
                "eip1193 {method} returned error: {err}"
            )));
        }
        body.get("result")
            .cloned()
            .ok_or_else(|| PortError::Transport(format!("eip1193 {method} missing result")))
    }
}

impl WalletPort for Eip1193Adapter {
    fn request_accounts(&self) -> Result<Vec<Address>, PortError> {
        let result = self.proxy_call("eth_requestAccounts", serde_json::json!([]))?;
        let arr = result.as_array().ok_or_else(|| {
            PortError::Transport("eth_requestAccounts: array expected".to_owned())
        })?;
        let mut accounts = Vec::with_capacity(arr.len());
        for item in arr {
            let raw = item.as_str().ok_or_else(|| {
                PortError::Transport("eth_requestAccounts: string expected".to_owned())
            })?;
            let parsed: Address = raw
                .parse()
                .map_err(|e| PortError::Validation(format!("invalid account address: {e}")))?;
            accounts.push(parsed);
        }
        Ok(accounts)
    }

    fn chain_id(&self) -> Result<u64, PortError> {
        let result = self.proxy_call("eth_chainId", serde_json::json!([]))?;
        json_chain_id_to_u64(&result)
    }

    fn call(&self, to: Address, data: &Bytes) -> Result<Bytes, PortError> {
        let result = self.proxy_call(
            "eth_call",
            serde_json::json!([{ "to": to, "data": data }, "latest"]),
        )?;
        let raw = result
            .as_str()
            .ok_or_else(|| PortError::Transport("eth_call must return hex string".to_owned()))?;
        raw.parse()
            .map_err(|e| PortError::Validation(format!("invalid eth_call result: {e}")))
    }

    fn send_transaction(&self, tx: &TxRequest) -> Result<B256, PortError> {
        let result = self.proxy_call("eth_sendTransaction", serde_json::json!([tx]))?;
        let hash = result.as_str().ok_or_else(|| {
            PortError::Transport("eth_sendTransaction must return hash".to_owned())
        })?;
        hash.parse()
            .map_err(|e| PortError::Validation(format!("invalid tx hash: {e}")))
    }

    fn transaction_receipt(&self, tx_hash: B256) -> Result<Option<TxReceipt>, PortError> {
        let result = self.proxy_call("eth_getTransactionReceipt", serde_json::json!([tx_hash]))?;
        if result.is_null() {
            return Ok(None);
        }
        parse_receipt(&result, tx_hash).map(Some)
    }
}

fn parse_receipt(value: &Value, tx_hash: B256) -> Result<TxReceipt, PortError> {
    let transaction_hash = match value.get("transactionHash").and_then(Value::as_str) {
        Some(raw) => raw
            .parse()
            .map_err(|e| PortError::Validation(format!("invalid receipt hash: {e}")))?,
        None => tx_hash,
    };
    let block_number = value
        .get("blockNumber")
        .filter(|v| !v.is_null())
        .map(json_quantity_to_u64)
        .transpose()?;
    // Pre-Byzantium receipts carry no status field.
    let success = match value.get("status").filter(|v| !v.is_null()) {
        Some(status) => json_quantity_to_u64(status)? == 1,
        None => true,
    };
    Ok(TxReceipt {
        transaction_hash,
        block_number,
        success,
    })
}

fn json_chain_id_to_u64(value: &Value) -> Result<u64, PortError> {
    json_quantity_to_u64(value)
        .map_err(|e| PortError::Validation(format!("invalid chain id: {e}")))
}

fn json_quantity_to_u64(value: &Value) -> Result<u64, PortError> {
    if let Some(n) = value.as_u64() {
        return Ok(n);
    }
    let s = value
        .as_str()
        .ok_or_else(|| PortError::Validation("quantity must be string or number".to_owned()))?;
    parse_quantity_str(s)
}

pub(crate) fn parse_quantity_str(raw: &str) -> Result<u64, PortError> {
    if raw.starts_with("0x") || raw.starts_with("0X") {
        u64::from_str_radix(&raw[2..], 16)
            .map_err(|e| PortError::Validation(format!("invalid hex quantity '{raw}': {e}")))
    } else {
        raw.parse()
            .map_err(|e| PortError::Validation(format!("invalid quantity '{raw}': {e}")))
    }
}
