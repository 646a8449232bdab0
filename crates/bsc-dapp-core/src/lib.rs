pub mod action;
pub mod controller;
pub mod domain;
pub mod error;
pub mod ports;
pub mod session;
pub mod state_machine;
pub mod validation;

pub use action::{ActionSlot, Completion, Ticket};
pub use controller::{CommandOutcome, DappCommand, DappController, SignRequest};
pub use domain::{
    Account, BalanceAndHistory, ContractCallForm, ContractRef, ExtensionKind, HistoryEntry,
    NetworkInfo, NetworkLabel, SignatureMethod, SignatureResult, TransferForm, TxParams,
    TxRequest, TypedField, BSC_MAINNET_CHAIN_ID, BSC_NETWORK_HELP_URL, BSC_TESTNET_CHAIN_ID,
    MINT_METHOD, SIGN_MESSAGE,
};
pub use error::DappError;
pub use ports::{
    ExplorerPort, PortError, RpcPort, SubscriptionId, WalletEvent, WalletEventKind,
    WalletEventPayload, WalletPort, USER_REJECTED_CODE,
};
pub use session::{NetworkDisplay, SessionView, SessionWatcher, NO_EXTENSION_TEXT, UNCONNECTED_TEXT};
pub use state_machine::{
    action_transition, session_transition, ActionStatus, ActionTrigger, SessionState,
    SessionTrigger, StateTransition, TransitionError,
};
pub use validation::{parse_address, parse_token_amount, validate_address, AddressValidation};
