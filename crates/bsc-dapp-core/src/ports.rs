use alloy::primitives::{Address, Bytes, B256, U256};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{Account, ContractRef, HistoryEntry, NetworkInfo, TxParams, TxRequest, TypedField};

#[derive(Debug, Error)]
pub enum PortError {
    #[error("port not implemented: {0}")]
    NotImplemented(&'static str),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("validation error: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("policy error: {0}")]
    Policy(String),
    #[error("user rejected request: {0}")]
    UserRejected(String),
}

/// EIP-1193 `code` for a request the user declined.
pub const USER_REJECTED_CODE: i64 = 4001;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WalletEventKind {
    Enabled,
    NetworkChanged,
    AccountChanged,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WalletEventPayload {
    Enabled(Account),
    NetworkChanged(NetworkInfo),
    AccountChanged(Account),
}

impl WalletEventPayload {
    pub fn kind(&self) -> WalletEventKind {
        match self {
            Self::Enabled(_) => WalletEventKind::Enabled,
            Self::NetworkChanged(_) => WalletEventKind::NetworkChanged,
            Self::AccountChanged(_) => WalletEventKind::AccountChanged,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletEvent {
    pub sequence: u64,
    pub payload: WalletEventPayload,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubscriptionId(pub u64);

/// The wallet/chain client the page drives.
///
/// Notifications are queued by the client and handed out through
/// [`WalletPort::drain_events`]; only kinds with a live subscription are
/// delivered.
pub trait WalletPort {
    fn is_extension_installed(&self) -> bool;
    fn is_extension_enabled(&self) -> bool;
    fn extension_name(&self) -> Option<String>;
    fn current_account(&self) -> Result<Option<Account>, PortError>;
    fn network(&self) -> Result<NetworkInfo, PortError>;

    fn subscribe(&self, kind: WalletEventKind) -> Result<SubscriptionId, PortError>;
    fn unsubscribe(&self, id: SubscriptionId) -> Result<(), PortError>;
    fn drain_events(&self) -> Result<Vec<WalletEvent>, PortError>;

    fn enable_extension(&self) -> Result<Account, PortError>;
    fn sign_message(&self, message: &str, signer: Address) -> Result<Bytes, PortError>;
    fn sign_typed_data(&self, fields: &[TypedField], signer: Address) -> Result<Bytes, PortError>;
    fn send_transaction(&self, tx: &TxRequest) -> Result<B256, PortError>;
    fn execute_contract(
        &self,
        contract: &ContractRef<'_>,
        method: &str,
        args: &[String],
    ) -> Result<TxParams, PortError>;
    fn parse_ether(&self, amount: &str) -> Result<U256, PortError>;
}

pub trait RpcPort {
    fn get_balance(&self, address: Address) -> Result<U256, PortError>;
}

pub trait ExplorerPort {
    fn get_history(&self, address: Address) -> Result<Vec<HistoryEntry>, PortError>;
}
