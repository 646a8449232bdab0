use alloy::primitives::{Address, Bytes, B256, U256};
use serde::{Deserialize, Serialize};

/// Message signed by the sign action.
pub const SIGN_MESSAGE: &str = "Sign";

pub const BSC_MAINNET_CHAIN_ID: u64 = 56;
pub const BSC_TESTNET_CHAIN_ID: u64 = 97;

/// Shown when the wallet is on neither BSC network.
pub const BSC_NETWORK_HELP_URL: &str = "https://docs.binance.org/smart-chain/wallet/metamask.html";

pub const DEFAULT_TRANSFER_AMOUNT: &str = "0.01";
pub const DEFAULT_MINT_AMOUNT: &str = "1000";
pub const MINT_METHOD: &str = "mint";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExtensionKind {
    MetaMask,
    BinanceChainWallet,
    Other(String),
}

impl ExtensionKind {
    pub fn from_name(name: &str) -> Self {
        match name {
            "MetaMask" => Self::MetaMask,
            "BinanceChainWallet" | "Binance Chain Wallet" => Self::BinanceChainWallet,
            other => Self::Other(other.to_owned()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::MetaMask => "MetaMask",
            Self::BinanceChainWallet => "BinanceChainWallet",
            Self::Other(name) => name,
        }
    }

    /// Binance Chain Wallet has no `eth_signTypedData`.
    pub fn supports_typed_data(&self) -> bool {
        matches!(self, Self::MetaMask)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub address: Address,
}

impl Account {
    pub fn new(address: Address) -> Self {
        Self { address }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NetworkInfo {
    pub chain_id: Option<u64>,
    pub is_mainnet: bool,
    pub is_testnet: bool,
}

impl NetworkInfo {
    pub fn from_chain_id(chain_id: u64) -> Self {
        Self {
            chain_id: Some(chain_id),
            is_mainnet: chain_id == BSC_MAINNET_CHAIN_ID,
            is_testnet: chain_id == BSC_TESTNET_CHAIN_ID,
        }
    }

    pub fn label(&self) -> NetworkLabel {
        if self.is_mainnet {
            NetworkLabel::Mainnet
        } else if self.is_testnet {
            NetworkLabel::Testnet
        } else {
            NetworkLabel::Unconnected
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NetworkLabel {
    Mainnet,
    Testnet,
    #[default]
    Unconnected,
}

impl NetworkLabel {
    pub fn as_str(&self) -> Option<&'static str> {
        match self {
            Self::Mainnet => Some("Mainnet"),
            Self::Testnet => Some("Testnet"),
            Self::Unconnected => None,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unconnected)
    }
}

/// One field of a legacy (v1) typed-data payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypedField {
    #[serde(rename = "type")]
    pub ty: String,
    pub name: String,
    pub value: String,
}

impl TypedField {
    pub fn string(name: &str, value: &str) -> Self {
        Self {
            ty: "string".to_owned(),
            name: name.to_owned(),
            value: value.to_owned(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignatureMethod {
    PersonalSign,
    EthSignTypedData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureResult {
    pub message: String,
    pub method: SignatureMethod,
    pub signature: Bytes,
}

/// Transaction handed to `eth_sendTransaction`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxRequest {
    pub from: Address,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<Address>,
    pub value: U256,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Bytes>,
}

impl TxRequest {
    /// Overlays contract call parameters on a base transaction.
    pub fn merged_with(mut self, params: TxParams) -> Self {
        self.to = Some(params.to);
        self.data = Some(params.data);
        if let Some(value) = params.value {
            self.value = value;
        }
        self
    }
}

/// Call parameters produced by `execute_contract`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxParams {
    pub to: Address,
    pub data: Bytes,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<U256>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractRef<'a> {
    pub address: Address,
    pub abi_json: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferForm {
    pub to: String,
    pub amount: String,
    pub tx_hash: Option<B256>,
}

impl Default for TransferForm {
    fn default() -> Self {
        Self {
            to: String::new(),
            amount: DEFAULT_TRANSFER_AMOUNT.to_owned(),
            tx_hash: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractCallForm {
    pub contract: String,
    pub receiver: String,
    pub amount: String,
    pub tx_hash: Option<B256>,
}

impl Default for ContractCallForm {
    fn default() -> Self {
        Self {
            contract: String::new(),
            receiver: String::new(),
            amount: DEFAULT_MINT_AMOUNT.to_owned(),
            tx_hash: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub hash: B256,
    pub from: Address,
    pub to: Option<Address>,
    pub value: U256,
    pub block_number: u64,
    pub timestamp: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceAndHistory {
    pub address: Address,
    pub balance: U256,
    pub history: Vec<HistoryEntry>,
}
