use std::time::Duration;

use alloy::primitives::{Address, U256};

/// Total supply cap shown in the supply line.
pub const MAX_SUPPLY: u64 = 20;

/// 0.02 ether in wei.
pub const PRESALE_PRICE_WEI: u64 = 20_000_000_000_000_000;

/// 0.01 ether in wei.
pub const PUBLIC_PRICE_WEI: u64 = 10_000_000_000_000_000;

/// Rinkeby.
pub const DEFAULT_CHAIN_ID: u64 = 4;
pub const DEFAULT_NETWORK_NAME: &str = "Rinkeby";

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);
pub const DEFAULT_RECEIPT_POLL_INTERVAL: Duration = Duration::from_secs(1);

pub const MINT_SUCCESS_ALERT: &str = "You have successfully minted a Crypto Dev NFT!!";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintConfig {
    pub contract_address: Address,
    pub required_chain_id: u64,
    pub network_name: String,
    pub presale_price: U256,
    pub public_price: U256,
    pub max_supply: u64,
    pub poll_interval: Duration,
    pub receipt_poll_interval: Duration,
}

impl Default for MintConfig {
    fn default() -> Self {
        Self {
            contract_address: Address::ZERO,
            required_chain_id: DEFAULT_CHAIN_ID,
            network_name: DEFAULT_NETWORK_NAME.to_owned(),
            presale_price: U256::from(PRESALE_PRICE_WEI),
            public_price: U256::from(PUBLIC_PRICE_WEI),
            max_supply: MAX_SUPPLY,
            poll_interval: DEFAULT_POLL_INTERVAL,
            receipt_poll_interval: DEFAULT_RECEIPT_POLL_INTERVAL,
        }
    }
}

impl MintConfig {
    pub fn wrong_network_alert(&self) -> String {
        format!("Change the network to {}", self.network_name)
    }
}

/// Presale lifecycle as reported by the contract.
///
/// Folds the `presaleStarted` / `presaleEnded` pair into one value so that
/// "ended but never started" cannot be represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PresalePhase {
    #[default]
    NotStarted,
    Active,
    Ended,
}

impl PresalePhase {
    pub fn from_flags(started: bool, ended: bool) -> Self {
        match (started, ended) {
            (false, _) => PresalePhase::NotStarted,
            (true, false) => PresalePhase::Active,
            (true, true) => PresalePhase::Ended,
        }
    }

    pub fn is_started(self) -> bool {
        self != PresalePhase::NotStarted
    }

    pub fn is_ended(self) -> bool {
        self == PresalePhase::Ended
    }
}

/// UI-visible state owned by the controller.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PageFlags {
    pub wallet_connected: bool,
    pub loading: bool,
    pub is_owner: bool,
    pub presale: PresalePhase,
    pub tokens_minted: U256,
}

impl PageFlags {
    pub fn from_flags(
        wallet_connected: bool,
        loading: bool,
        is_owner: bool,
        presale_started: bool,
        presale_ended: bool,
    ) -> Self {
        Self {
            wallet_connected,
            loading,
            is_owner,
            presale: PresalePhase::from_flags(presale_started, presale_ended),
            tokens_minted: U256::ZERO,
        }
    }

    pub fn presale_started(&self) -> bool {
        self.presale.is_started()
    }

    pub fn presale_ended(&self) -> bool {
        self.presale.is_ended()
    }

    /// Record a fresh `presaleStarted()` reading. A presale already known to
    /// have ended stays ended while the contract still reports it started.
    pub fn set_presale_started(&mut self, started: bool) {
        self.presale = match (started, self.presale) {
            (false, _) => PresalePhase::NotStarted,
            (true, PresalePhase::NotStarted) => PresalePhase::Active,
            (true, phase) => phase,
        };
    }

    /// Record a fresh end-time comparison. Ignored until the presale is known
    /// to have started.
    pub fn set_presale_ended(&mut self, ended: bool) {
        if self.presale.is_started() {
            self.presale = if ended {
                PresalePhase::Ended
            } else {
                PresalePhase::Active
            };
        }
    }
}

/// Which capability a caller needs from a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Authority {
    ReadOnly,
    Signing,
}

/// The wallet session created on connect and disposed on disconnect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletSession {
    pub accounts: Vec<Address>,
    pub connected_at_ms: u64,
}

impl WalletSession {
    pub fn primary_account(&self) -> Option<Address> {
        self.accounts.first().copied()
    }
}
