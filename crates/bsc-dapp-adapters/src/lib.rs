pub mod abi;
pub mod config;
pub mod eip1193;
pub mod explorer;
pub mod rpc;

pub use abi::{AbiAdapter, COIN_ABI};
pub use config::{DappAdapterConfig, RuntimeProfile};
pub use eip1193::Eip1193Adapter;
pub use explorer::{BscScanAdapter, InMemoryExplorer};
pub use rpc::{InMemoryRpc, JsonRpcAdapter};
