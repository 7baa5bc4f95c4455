use std::time::Duration;

use alloy::primitives::Address;
use cryptodevs_mint_core::MintConfig;
use tracing::warn;

pub const DEFAULT_EIP1193_URL: &str = "http://127.0.0.1:1248";

#[derive(Debug, Clone)]
pub struct AdapterConfig {
    pub eip1193_url: Option<String>,
    pub rpc_timeout_ms: u64,
    pub contract_address: Address,
    pub required_chain_id: u64,
    pub network_name: String,
    pub poll_interval_ms: u64,
    pub receipt_poll_interval_ms: u64,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        let mint = MintConfig::default();
        Self {
            eip1193_url: Some(DEFAULT_EIP1193_URL.to_owned()),
            rpc_timeout_ms: 15_000,
            contract_address: mint.contract_address,
            required_chain_id: mint.required_chain_id,
            network_name: mint.network_name,
            poll_interval_ms: mint.poll_interval.as_millis() as u64,
            receipt_poll_interval_ms: mint.receipt_poll_interval.as_millis() as u64,
        }
    }
}

impl AdapterConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Unparseable values keep the default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut cfg = Self::default();

        if let Some(url) = lookup("CRYPTODEVS_EIP1193_URL") {
            let url = url.trim();
            cfg.eip1193_url = if url.is_empty() {
                None
            } else {
                Some(url.to_owned())
            };
        }
        if let Some(raw) = lookup("CRYPTODEVS_NFT_CONTRACT") {
            match raw.trim().parse::<Address>() {
                Ok(address) => cfg.contract_address = address,
                Err(e) => warn!(value = %raw, error = %e, "ignoring invalid CRYPTODEVS_NFT_CONTRACT"),
            }
        }
        if let Some(name) = lookup("CRYPTODEVS_NETWORK") {
            if !name.trim().is_empty() {
                cfg.network_name = name.trim().to_owned();
            }
        }
        parse_u64(&lookup, "CRYPTODEVS_CHAIN_ID", &mut cfg.required_chain_id);
        parse_u64(&lookup, "CRYPTODEVS_POLL_INTERVAL_MS", &mut cfg.poll_interval_ms);
        parse_u64(&lookup, "CRYPTODEVS_RECEIPT_POLL_MS", &mut cfg.receipt_poll_interval_ms);
        parse_u64(&lookup, "CRYPTODEVS_RPC_TIMEOUT_MS", &mut cfg.rpc_timeout_ms);

        let defaults = Self::default();
        for (key, value, default) in [
            ("CRYPTODEVS_POLL_INTERVAL_MS", &mut cfg.poll_interval_ms, defaults.poll_interval_ms),
            (
                "CRYPTODEVS_RECEIPT_POLL_MS",
                &mut cfg.receipt_poll_interval_ms,
                defaults.receipt_poll_interval_ms,
            ),
            ("CRYPTODEVS_RPC_TIMEOUT_MS", &mut cfg.rpc_timeout_ms, defaults.rpc_timeout_ms),
        ] {
            if *value == 0 {
                warn!(key, "setting must be positive, using default");
                *value = default;
            }
        }
        if cfg.contract_address == Address::ZERO {
            warn!("CRYPTODEVS_NFT_CONTRACT not set; contract reads will target the zero address");
        }
        cfg
    }

    pub fn mint_config(&self) -> MintConfig {
        MintConfig {
            contract_address: self.contract_address,
            required_chain_id: self.required_chain_id,
            network_name: self.network_name.clone(),
            poll_interval: Duration::from_millis(self.poll_interval_ms),
            receipt_poll_interval: Duration::from_millis(self.receipt_poll_interval_ms),
            ..MintConfig::default()
        }
    }
}

fn parse_u64(lookup: &impl Fn(&str) -> Option<String>, key: &str, target: &mut u64) {
    if let Some(raw) = lookup(key) {
        match raw.trim().parse::<u64>() {
            Ok(value) => *target = value,
            Err(e) => warn!(key, value = %raw, error = %e, "ignoring invalid setting"),
        }
    }
}
