#![allow(dead_code)]

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::time::Duration;

use alloy::primitives::{keccak256, Address, Bytes, B256, U256};
use alloy::sol_types::{SolCall, SolValue};

use cryptodevs_mint_core::{
    ClockPort, CryptoDevs, MintConfig, MintController, NotifierPort, PortError, TxReceipt,
    TxRequest, WalletPort,
};

pub const NOW_SECS: u64 = 1_739_750_400;

#[derive(Debug, Clone)]
pub struct ChainState {
    pub chain_id: u64,
    pub accounts: Vec<Address>,
    pub owner: Address,
    pub presale_started: bool,
    pub presale_end: U256,
    pub token_ids: U256,
    pub fail_reads: bool,
    pub reject_sends: bool,
    pub revert_sends: bool,
    pub hold_receipts: bool,
}

impl Default for ChainState {
    fn default() -> Self {
        Self {
            chain_id: 4,
            accounts: vec![buyer_address()],
            owner: owner_address(),
            presale_started: false,
            presale_end: U256::from(NOW_SECS + 300),
            token_ids: U256::ZERO,
            fail_reads: false,
            reject_sends: false,
            revert_sends: false,
            hold_receipts: false,
        }
    }
}

/// Holds `eth_call` requests while closed, so a test can act while a read is
/// in flight.
#[derive(Debug, Default)]
pub struct CallGate {
    closed: Mutex<bool>,
    opened: Condvar,
    waiting: AtomicUsize,
}

impl CallGate {
    pub fn close(&self) {
        *self.closed.lock().expect("gate lock") = true;
    }

    pub fn open(&self) {
        *self.closed.lock().expect("gate lock") = false;
        self.opened.notify_all();
    }

    pub fn waiting(&self) -> usize {
        self.waiting.load(Ordering::SeqCst)
    }

    fn pass(&self) {
        let mut closed = self.closed.lock().expect("gate lock");
        if !*closed {
            return;
        }
        self.waiting.fetch_add(1, Ordering::SeqCst);
        while *closed {
            closed = self.opened.wait(closed).expect("gate wait");
        }
        self.waiting.fetch_sub(1, Ordering::SeqCst);
    }
}

/// In-memory wallet answering calls the way the deployed contract would.
#[derive(Debug, Default)]
pub struct FakeWallet {
    pub state: Mutex<ChainState>,
    pub sent: Mutex<Vec<TxRequest>>,
    pub account_requests: AtomicUsize,
    pub presale_end_reads: AtomicUsize,
    pub call_gate: CallGate,
}

impl FakeWallet {
    pub fn update(&self, f: impl FnOnce(&mut ChainState)) {
        let mut g = self.state.lock().expect("chain state lock");
        f(&mut g);
    }

    pub fn sent(&self) -> Vec<TxRequest> {
        self.sent.lock().expect("sent lock").clone()
    }
}

impl WalletPort for FakeWallet {
    fn request_accounts(&self) -> Result<Vec<Address>, PortError> {
        self.account_requests.fetch_add(1, Ordering::SeqCst);
        Ok(self.state.lock().expect("chain state lock").accounts.clone())
    }

    fn chain_id(&self) -> Result<u64, PortError> {
        Ok(self.state.lock().expect("chain state lock").chain_id)
    }

    fn call(&self, _to: Address, data: &Bytes) -> Result<Bytes, PortError> {
        self.call_gate.pass();
        let g = self.state.lock().expect("chain state lock");
        if g.fail_reads {
            return Err(PortError::Transport("execution reverted".to_owned()));
        }
        let selector: [u8; 4] = data[..4].try_into().expect("selector");
        let encoded = match selector {
            CryptoDevs::ownerCall::SELECTOR => g.owner.abi_encode(),
            CryptoDevs::presaleStartedCall::SELECTOR => g.presale_started.abi_encode(),
            CryptoDevs::presaleEndCall::SELECTOR => {
                self.presale_end_reads.fetch_add(1, Ordering::SeqCst);
                g.presale_end.abi_encode()
            }
            CryptoDevs::tokenIdsCall::SELECTOR => g.token_ids.abi_encode(),
            _ => return Err(PortError::Validation("unknown selector".to_owned())),
        };
        Ok(Bytes::from(encoded))
    }

    fn send_transaction(&self, tx: &TxRequest) -> Result<B256, PortError> {
        let mut g = self.state.lock().expect("chain state lock");
        if g.reject_sends {
            return Err(PortError::Transport("user rejected the request".to_owned()));
        }
        let selector: [u8; 4] = tx.data[..4].try_into().expect("selector");
        match selector {
            CryptoDevs::startPresaleCall::SELECTOR if tx.from == g.owner => {
                g.presale_started = true;
            }
            CryptoDevs::presaleMintCall::SELECTOR | CryptoDevs::mintCall::SELECTOR => {
                g.token_ids += U256::from(1);
            }
            _ => {}
        }
        let mut sent = self.sent.lock().expect("sent lock");
        sent.push(tx.clone());
        Ok(keccak256((sent.len() as u64).to_be_bytes()))
    }

    fn transaction_receipt(&self, tx_hash: B256) -> Result<Option<TxReceipt>, PortError> {
        let g = self.state.lock().expect("chain state lock");
        if g.hold_receipts {
            return Ok(None);
        }
        Ok(Some(TxReceipt {
            transaction_hash: tx_hash,
            block_number: Some(100),
            success: !g.revert_sends,
        }))
    }
}

#[derive(Debug)]
pub struct TestClock {
    now_ms: AtomicU64,
}

impl Default for TestClock {
    fn default() -> Self {
        Self {
            now_ms: AtomicU64::new(NOW_SECS * 1000),
        }
    }
}

impl TestClock {
    pub fn set_secs(&self, secs: u64) {
        self.set_ms(secs * 1000);
    }

    pub fn set_ms(&self, ms: u64) {
        self.now_ms.store(ms, Ordering::SeqCst);
    }
}

impl ClockPort for TestClock {
    fn now_ms(&self) -> Result<u64, PortError> {
        Ok(self.now_ms.load(Ordering::SeqCst))
    }

    fn sleep(&self, _duration: Duration) {
        std::thread::sleep(Duration::from_millis(1));
    }
}

#[derive(Debug, Default)]
pub struct RecordingNotifier {
    alerts: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn alerts(&self) -> Vec<String> {
        self.alerts.lock().expect("alerts lock").clone()
    }
}

impl NotifierPort for RecordingNotifier {
    fn alert(&self, message: &str) {
        self.alerts
            .lock()
            .expect("alerts lock")
            .push(message.to_owned());
    }
}

pub type TestController = MintController<FakeWallet, TestClock, RecordingNotifier>;

pub fn new_controller() -> TestController {
    MintController::new(
        FakeWallet::default(),
        TestClock::default(),
        RecordingNotifier::default(),
        test_config(),
    )
}

pub fn shared_controller() -> Arc<TestController> {
    Arc::new(new_controller())
}

pub fn test_config() -> MintConfig {
    MintConfig {
        contract_address: contract_address(),
        receipt_poll_interval: Duration::ZERO,
        ..MintConfig::default()
    }
}

pub fn contract_address() -> Address {
    "0x00000000000000000000000000000000000c0de5"
        .parse()
        .expect("valid contract address")
}

pub fn owner_address() -> Address {
    "0x1000000000000000000000000000000000000001"
        .parse()
        .expect("valid owner address")
}

pub fn buyer_address() -> Address {
    "0x2000000000000000000000000000000000000002"
        .parse()
        .expect("valid buyer address")
}
