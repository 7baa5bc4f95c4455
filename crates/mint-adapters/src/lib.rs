pub mod clock;
pub mod config;
pub mod eip1193;

pub use clock::SystemClockAdapter;
pub use config::{AdapterConfig, DEFAULT_EIP1193_URL};
pub use eip1193::Eip1193Adapter;
