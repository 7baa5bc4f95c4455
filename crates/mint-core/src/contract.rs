//! Typed binding for the Crypto Devs minting contract.

use std::time::Duration;

use alloy::primitives::{Address, Bytes, B256, U256};
use alloy::sol;
use alloy::sol_types::SolCall;

use crate::ports::{ClockPort, MintError, PortError, TxReceipt, TxRequest, WalletPort};

sol! {
    interface CryptoDevs {
        function owner() external view returns (address);
        function presaleStarted() external view returns (bool);
        function presaleEnd() external view returns (uint256);
        function tokenIds() external view returns (uint256);
        function startPresale() external;
        function presaleMint() external payable;
        function mint() external payable;
    }
}

/// A chain-checked handle obtained from the wallet session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Connection {
    pub chain_id: u64,
    signer: Option<Address>,
}

impl Connection {
    pub fn read_only(chain_id: u64) -> Self {
        Self {
            chain_id,
            signer: None,
        }
    }

    pub fn signing(chain_id: u64, account: Address) -> Self {
        Self {
            chain_id,
            signer: Some(account),
        }
    }

    pub fn signer(&self) -> Option<Address> {
        self.signer
    }

    pub fn require_signer(&self) -> Result<Address, MintError> {
        self.signer.ok_or(MintError::ReadOnlyConnection)
    }
}

/// A transaction accepted by the wallet but not yet mined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingTx {
    pub tx_hash: B256,
}

impl PendingTx {
    /// Poll for the receipt until one shows up. There is no timeout.
    pub fn wait<W, C>(&self, wallet: &W, clock: &C, poll: Duration) -> Result<TxReceipt, PortError>
    where
        W: WalletPort,
        C: ClockPort,
    {
        loop {
            if let Some(receipt) = wallet.transaction_receipt(self.tx_hash)? {
                if !receipt.success {
                    return Err(PortError::Reverted(self.tx_hash));
                }
                return Ok(receipt);
            }
            clock.sleep(poll);
        }
    }
}

pub struct NftContract<'a, W: WalletPort> {
    address: Address,
    wallet: &'a W,
    connection: Connection,
}

impl<'a, W: WalletPort> NftContract<'a, W> {
    pub fn new(address: Address, wallet: &'a W, connection: Connection) -> Self {
        Self {
            address,
            wallet,
            connection,
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn owner(&self) -> Result<Address, PortError> {
        let raw = self.read(CryptoDevs::ownerCall {}.abi_encode())?;
        Ok(decode::<CryptoDevs::ownerCall>(&raw)?._0)
    }

    pub fn presale_started(&self) -> Result<bool, PortError> {
        let raw = self.read(CryptoDevs::presaleStartedCall {}.abi_encode())?;
        Ok(decode::<CryptoDevs::presaleStartedCall>(&raw)?._0)
    }

    pub fn presale_end(&self) -> Result<U256, PortError> {
        let raw = self.read(CryptoDevs::presaleEndCall {}.abi_encode())?;
        Ok(decode::<CryptoDevs::presaleEndCall>(&raw)?._0)
    }

    pub fn token_ids(&self) -> Result<U256, PortError> {
        let raw = self.read(CryptoDevs::tokenIdsCall {}.abi_encode())?;
        Ok(decode::<CryptoDevs::tokenIdsCall>(&raw)?._0)
    }

    pub fn start_presale(&self) -> Result<PendingTx, MintError> {
        self.write(CryptoDevs::startPresaleCall {}.abi_encode(), U256::ZERO)
    }

    pub fn presale_mint(&self, value: U256) -> Result<PendingTx, MintError> {
        self.write(CryptoDevs::presaleMintCall {}.abi_encode(), value)
    }

    pub fn mint(&self, value: U256) -> Result<PendingTx, MintError> {
        self.write(CryptoDevs::mintCall {}.abi_encode(), value)
    }

    fn read(&self, calldata: Vec<u8>) -> Result<Bytes, PortError> {
        self.wallet.call(self.address, &Bytes::from(calldata))
    }

    fn write(&self, calldata: Vec<u8>, value: U256) -> Result<PendingTx, MintError> {
        let from = self.connection.require_signer()?;
        let tx = TxRequest {
            from,
            to: self.address,
            data: Bytes::from(calldata),
            value,
        };
        let tx_hash = self.wallet.send_transaction(&tx)?;
        Ok(PendingTx { tx_hash })
    }
}

fn decode<C: SolCall>(raw: &[u8]) -> Result<C::Return, PortError> {
    C::abi_decode_returns(raw, true)
        .map_err(|e| PortError::Validation(format!("abi decode failed: {e}")))
}
