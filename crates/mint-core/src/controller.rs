use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use alloy::primitives::U256;
use tracing::{debug, error, info, warn};

use crate::contract::{Connection, NftContract, PendingTx};
use crate::domain::{Authority, MintConfig, PageFlags, WalletSession, MINT_SUCCESS_ALERT};
use crate::ports::{ClockPort, MintError, NotifierPort, PortError, TxReceipt, WalletPort};
use crate::state_machine::{select_view, supply_line, PageView};

/// Owns the page flags and the wallet session, and runs every read and write
/// the page needs against the minting contract.
pub struct MintController<W, C, N>
where
    W: WalletPort,
    C: ClockPort,
    N: NotifierPort,
{
    pub wallet: W,
    pub clock: C,
    pub notifier: N,
    config: MintConfig,
    flags: Mutex<PageFlags>,
    session: Mutex<SessionSlot>,
    /// Bumped by `disconnect`; flag writes from operations started under an
    /// older epoch are dropped.
    epoch: AtomicU64,
}

#[derive(Debug, Default)]
struct SessionSlot {
    current: Option<WalletSession>,
    /// Set by `disconnect`, cleared by `connect_wallet`. No session can be
    /// created while it is set.
    disposed: bool,
}

impl<W, C, N> MintController<W, C, N>
where
    W: WalletPort,
    C: ClockPort,
    N: NotifierPort,
{
    pub fn new(wallet: W, clock: C, notifier: N, config: MintConfig) -> Self {
        Self {
            wallet,
            clock,
            notifier,
            config,
            flags: Mutex::new(PageFlags::default()),
            session: Mutex::new(SessionSlot::default()),
            epoch: AtomicU64::new(0),
        }
    }

    pub fn config(&self) -> &MintConfig {
        &self.config
    }

    pub fn snapshot(&self) -> PageFlags {
        self.flags().clone()
    }

    pub fn view(&self) -> PageView {
        select_view(&self.flags())
    }

    pub fn supply_line(&self) -> String {
        supply_line(&self.flags(), self.config.max_supply)
    }

    pub fn session(&self) -> Option<WalletSession> {
        self.session_slot().current.clone()
    }

    /// Connect (prompting the wallet on first use), check the chain, and hand
    /// back a read-only or signing connection.
    pub fn get_provider_or_signer(&self, authority: Authority) -> Result<Connection, MintError> {
        let session = self.ensure_session()?;
        let chain_id = self.wallet.chain_id()?;
        if chain_id != self.config.required_chain_id {
            warn!(
                expected = self.config.required_chain_id,
                actual = chain_id,
                "wallet is on the wrong network"
            );
            self.notifier.alert(&self.config.wrong_network_alert());
            return Err(MintError::WrongNetwork {
                expected: self.config.required_chain_id,
                actual: chain_id,
            });
        }

        match authority {
            Authority::ReadOnly => Ok(Connection::read_only(chain_id)),
            Authority::Signing => {
                let account = session.primary_account().ok_or_else(|| {
                    PortError::Policy("wallet session has no account".to_owned())
                })?;
                Ok(Connection::signing(chain_id, account))
            }
        }
    }

    pub fn connect_wallet(&self) -> Result<(), MintError> {
        self.session_slot().disposed = false;
        let epoch = self.epoch();
        let result = self.get_provider_or_signer(Authority::ReadOnly);
        logged("connect_wallet", result)?;
        self.write_flags(epoch, |flags| flags.wallet_connected = true)?;
        info!("wallet connected");
        Ok(())
    }

    /// Drop the session and forget everything learned through it. Work that
    /// is still running from before cannot recreate the session or touch the
    /// flags until `connect_wallet` is called again.
    pub fn disconnect(&self) {
        let had_session = {
            let mut slot = self.session_slot();
            slot.disposed = true;
            slot.current.take().is_some()
        };
        {
            let mut flags = self.flags();
            self.epoch.fetch_add(1, Ordering::SeqCst);
            *flags = PageFlags::default();
        }
        if had_session {
            info!("wallet session disposed");
        }
    }

    /// Sets `is_owner` when the connected account owns the contract. Never
    /// clears it.
    pub fn check_owner(&self) -> Result<bool, MintError> {
        self.check_owner_at(self.epoch())
    }

    pub fn check_presale_started(&self) -> Result<bool, MintError> {
        self.check_presale_started_at(self.epoch())
    }

    /// Ended iff the contract's end timestamp is strictly before now.
    pub fn check_presale_ended(&self) -> Result<bool, MintError> {
        let epoch = self.epoch();
        let result = (|| -> Result<bool, MintError> {
            let reader = self.get_provider_or_signer(Authority::ReadOnly)?;
            let presale_end = self.contract(reader).presale_end()?;
            let now_secs = self.clock.now_ms()? / 1000;
            Ok(presale_end < U256::from(now_secs))
        })();
        let ended = logged("check_presale_ended", result)?;
        self.write_flags(epoch, |flags| flags.set_presale_ended(ended))?;
        Ok(ended)
    }

    pub fn refresh_tokens_minted(&self) -> Result<U256, MintError> {
        let epoch = self.epoch();
        let result = (|| -> Result<U256, MintError> {
            let reader = self.get_provider_or_signer(Authority::ReadOnly)?;
            Ok(self.contract(reader).token_ids()?)
        })();
        let minted = logged("refresh_tokens_minted", result)?;
        self.write_flags(epoch, |flags| flags.tokens_minted = minted)?;
        Ok(minted)
    }

    pub fn start_presale(&self) -> Result<TxReceipt, MintError> {
        let epoch = self.epoch();
        let receipt =
            self.run_write(epoch, "start_presale", |contract| contract.start_presale())?;
        let _ = self.check_presale_started_at(epoch);
        Ok(receipt)
    }

    pub fn presale_mint(&self) -> Result<TxReceipt, MintError> {
        let price = self.config.presale_price;
        let receipt = self.run_write(self.epoch(), "presale_mint", |contract| {
            contract.presale_mint(price)
        })?;
        self.notifier.alert(MINT_SUCCESS_ALERT);
        Ok(receipt)
    }

    pub fn public_mint(&self) -> Result<TxReceipt, MintError> {
        let price = self.config.public_price;
        let receipt =
            self.run_write(self.epoch(), "public_mint", |contract| contract.mint(price))?;
        self.notifier.alert(MINT_SUCCESS_ALERT);
        Ok(receipt)
    }

    /// First-load sequence. Does nothing once the wallet is connected.
    pub fn mount(&self) {
        if self.flags().wallet_connected {
            debug!("mount skipped, wallet already connected");
            return;
        }
        let _ = self.connect_wallet();
        if let Ok(true) = self.check_presale_started() {
            let _ = self.check_presale_ended();
        }
        let _ = self.refresh_tokens_minted();
    }

    fn check_owner_at(&self, epoch: u64) -> Result<bool, MintError> {
        let result = (|| -> Result<bool, MintError> {
            let reader = self.get_provider_or_signer(Authority::ReadOnly)?;
            let owner = self.contract(reader).owner()?;
            let signer = self.get_provider_or_signer(Authority::Signing)?;
            Ok(owner == signer.require_signer()?)
        })();
        let is_owner = logged("check_owner", result)?;
        if is_owner {
            self.write_flags(epoch, |flags| flags.is_owner = true)?;
        }
        Ok(is_owner)
    }

    fn check_presale_started_at(&self, epoch: u64) -> Result<bool, MintError> {
        let result = (|| -> Result<bool, MintError> {
            let reader = self.get_provider_or_signer(Authority::ReadOnly)?;
            Ok(self.contract(reader).presale_started()?)
        })();
        let started = logged("check_presale_started", result)?;
        if !started {
            // Only the owner gets the start control, so ownership matters
            // while the presale is pending.
            let _ = self.check_owner_at(epoch);
        }
        self.write_flags(epoch, |flags| flags.set_presale_started(started))?;
        Ok(started)
    }

    fn run_write<F>(
        &self,
        epoch: u64,
        action: &'static str,
        send: F,
    ) -> Result<TxReceipt, MintError>
    where
        F: FnOnce(&NftContract<'_, W>) -> Result<PendingTx, MintError>,
    {
        if self.flags().loading {
            warn!(action, "rejected, another transaction is in flight");
            return Err(MintError::TransactionInFlight);
        }

        let result = (|| -> Result<TxReceipt, MintError> {
            let signer = self.get_provider_or_signer(Authority::Signing)?;
            let pending = send(&self.contract(signer))?;
            self.write_flags(epoch, |flags| flags.loading = true)?;
            info!(action, tx_hash = %pending.tx_hash, "transaction submitted");
            let receipt =
                pending.wait(&self.wallet, &self.clock, self.config.receipt_poll_interval);
            self.write_flags(epoch, |flags| flags.loading = false)?;
            Ok(receipt?)
        })();

        match result {
            Ok(receipt) => {
                info!(action, tx_hash = %receipt.transaction_hash, "transaction confirmed");
                Ok(receipt)
            }
            Err(e) => {
                error!(action, error = %e, "transaction failed");
                Err(e)
            }
        }
    }

    fn ensure_session(&self) -> Result<WalletSession, MintError> {
        let mut slot = self.session_slot();
        if let Some(session) = slot.current.as_ref() {
            return Ok(session.clone());
        }
        if slot.disposed {
            return Err(MintError::Disconnected);
        }

        let accounts = self.wallet.request_accounts()?;
        if accounts.is_empty() {
            return Err(PortError::Policy(
                "no wallet accounts available; unlock or connect the wallet".to_owned(),
            )
            .into());
        }
        let session = WalletSession {
            accounts,
            connected_at_ms: self.clock.now_ms()?,
        };
        info!(account = ?session.primary_account(), "wallet session created");
        slot.current = Some(session.clone());
        Ok(session)
    }

    fn contract(&self, connection: Connection) -> NftContract<'_, W> {
        NftContract::new(self.config.contract_address, &self.wallet, connection)
    }

    fn epoch(&self) -> u64 {
        self.epoch.load(Ordering::SeqCst)
    }

    /// Applies `update` unless the page was disconnected after `epoch` was
    /// taken.
    fn write_flags(
        &self,
        epoch: u64,
        update: impl FnOnce(&mut PageFlags),
    ) -> Result<(), MintError> {
        let mut flags = self.flags();
        if self.epoch() != epoch {
            debug!("dropping flag update from a disposed session");
            return Err(MintError::Disconnected);
        }
        update(&mut flags);
        Ok(())
    }

    fn flags(&self) -> MutexGuard<'_, PageFlags> {
        self.flags.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn session_slot(&self) -> MutexGuard<'_, SessionSlot> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn logged<T>(operation: &'static str, result: Result<T, MintError>) -> Result<T, MintError> {
    if let Err(e) = &result {
        warn!(operation, error = %e, "contract query failed");
    }
    result
}
