use thiserror::Error;

use crate::ports::PortError;

/// Failures surfaced next to the form that triggered them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DappError {
    #[error("no browser extension detected")]
    ExtensionNotInstalled,
    #[error("browser extension is not enabled")]
    ExtensionNotEnabled,
    #[error("not connected to a BSC network")]
    NetworkNotConnected,
    #[error("no account selected in the extension")]
    NoAccount,
    #[error("invalid address '{input}': {reason}")]
    InvalidAddress { input: String, reason: String },
    #[error("invalid amount '{input}': {reason}")]
    InvalidAmount { input: String, reason: String },
    #[error("signature request rejected")]
    UserRejectedSignature,
    #[error("signing failed: {0}")]
    SigningFailed(String),
    #[error("transaction submission failed: {0}")]
    TransactionSubmissionFailed(String),
    #[error("contract call build failed: {0}")]
    ContractCallBuildFailed(String),
    #[error("enable request failed: {0}")]
    EnableFailed(String),
    #[error("balance/history query failed: {0}")]
    Query(String),
    #[error("a request is already in flight")]
    ActionPending,
}

impl DappError {
    pub fn invalid_address(input: &str, reason: impl ToString) -> Self {
        Self::InvalidAddress {
            input: input.to_owned(),
            reason: reason.to_string(),
        }
    }

    pub fn invalid_amount(input: &str, reason: impl ToString) -> Self {
        Self::InvalidAmount {
            input: input.to_owned(),
            reason: reason.to_string(),
        }
    }

    pub fn from_sign(err: PortError) -> Self {
        match err {
            PortError::UserRejected(_) => Self::UserRejectedSignature,
            other => Self::SigningFailed(other.to_string()),
        }
    }

    pub fn from_submit(err: PortError) -> Self {
        match err {
            PortError::UserRejected(msg) => {
                Self::TransactionSubmissionFailed(format!("rejected in wallet: {msg}"))
            }
            other => Self::TransactionSubmissionFailed(other.to_string()),
        }
    }

    pub fn from_enable(err: PortError) -> Self {
        match err {
            PortError::UserRejected(msg) => Self::EnableFailed(format!("rejected: {msg}")),
            other => Self::EnableFailed(other.to_string()),
        }
    }
}
