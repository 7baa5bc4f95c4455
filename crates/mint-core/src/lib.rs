pub mod contract;
pub mod controller;
pub mod domain;
pub mod poller;
pub mod ports;
pub mod state_machine;

pub use contract::{Connection, CryptoDevs, NftContract, PendingTx};
pub use controller::MintController;
pub use domain::{
    Authority, MintConfig, PageFlags, PresalePhase, WalletSession, MAX_SUPPLY,
    MINT_SUCCESS_ALERT, PRESALE_PRICE_WEI, PUBLIC_PRICE_WEI,
};
pub use poller::{spawn_polling, PollHandle};
pub use ports::{
    ClockPort, MintError, NotifierPort, PortError, TxReceipt, TxRequest, WalletPort,
};
pub use state_machine::{select_view, supply_line, PageView};
