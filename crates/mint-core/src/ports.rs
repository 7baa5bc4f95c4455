use std::time::Duration;

use alloy::primitives::{Address, Bytes, B256, U256};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PortError {
    #[error("port not implemented: {0}")]
    NotImplemented(&'static str),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("validation error: {0}")]
    Validation(String),
    #[error("policy error: {0}")]
    Policy(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("transaction reverted: {0}")]
    Reverted(B256),
}

/// Payload of `eth_sendTransaction`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxRequest {
    pub from: Address,
    pub to: Address,
    pub data: Bytes,
    pub value: U256,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxReceipt {
    pub transaction_hash: B256,
    pub block_number: Option<u64>,
    pub success: bool,
}

/// EIP-1193 style wallet provider.
pub trait WalletPort {
    fn request_accounts(&self) -> Result<Vec<Address>, PortError>;
    fn chain_id(&self) -> Result<u64, PortError>;
    fn call(&self, to: Address, data: &Bytes) -> Result<Bytes, PortError>;
    fn send_transaction(&self, tx: &TxRequest) -> Result<B256, PortError>;
    fn transaction_receipt(&self, tx_hash: B256) -> Result<Option<TxReceipt>, PortError>;
}

pub trait ClockPort {
    fn now_ms(&self) -> Result<u64, PortError>;
    fn sleep(&self, duration: Duration);
}

/// Blocking, user-facing alert.
pub trait NotifierPort {
    fn alert(&self, message: &str);
}

/// Failures surfaced by the page controller.
#[derive(Debug, Error)]
pub enum MintError {
    #[error("wrong network: expected chain {expected}, wallet is on chain {actual}")]
    WrongNetwork { expected: u64, actual: u64 },
    #[error("connection has no signing authority")]
    ReadOnlyConnection,
    #[error("a transaction is already in flight")]
    TransactionInFlight,
    #[error("wallet session was disconnected")]
    Disconnected,
    #[error(transparent)]
    Port(#[from] PortError),
}
