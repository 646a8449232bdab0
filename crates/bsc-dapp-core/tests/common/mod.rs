#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use alloy::primitives::{utils::parse_ether, Address, Bytes, B256, U256};

use bsc_dapp_core::{
    Account, ContractRef, DappController, ExplorerPort, HistoryEntry, NetworkInfo, PortError,
    RpcPort, SubscriptionId, TxParams, TxRequest, TypedField, WalletEvent, WalletEventPayload,
    WalletPort,
};

#[derive(Debug, Default)]
pub struct FakeState {
    pub installed: bool,
    pub enabled: bool,
    pub name: Option<String>,
    pub account: Option<Account>,
    pub network: NetworkInfo,
    pub subscriptions: HashMap<u64, bsc_dapp_core::WalletEventKind>,
    pub next_subscription: u64,
    pub events: Vec<WalletEvent>,
    pub sequence: u64,
    pub enable_calls: usize,
    pub calls: Vec<String>,
    pub last_typed: Option<Vec<TypedField>>,
    pub last_message: Option<String>,
    pub last_tx: Option<TxRequest>,
    pub last_contract_call: Option<(Address, String, String, Vec<String>)>,
    pub reject_signing: bool,
    pub fail_send: bool,
}

#[derive(Debug, Default)]
pub struct FakeWallet {
    pub state: Mutex<FakeState>,
}

impl FakeWallet {
    pub fn not_installed() -> Self {
        Self::default()
    }

    pub fn installed(name: &str) -> Self {
        let wallet = Self::default();
        {
            let mut g = wallet.state.lock().expect("fake lock");
            g.installed = true;
            g.name = Some(name.to_owned());
        }
        wallet
    }

    pub fn with<F: FnOnce(&mut FakeState)>(&self, f: F) {
        let mut g = self.state.lock().expect("fake lock");
        f(&mut g);
    }

    pub fn snapshot<T, F: FnOnce(&FakeState) -> T>(&self, f: F) -> T {
        let g = self.state.lock().expect("fake lock");
        f(&g)
    }

    /// Queue a notification the way the client would, honouring subscriptions.
    pub fn emit(&self, payload: WalletEventPayload) {
        let mut g = self.state.lock().expect("fake lock");
        match &payload {
            WalletEventPayload::Enabled(account) => {
                g.enabled = true;
                g.account = Some(*account);
            }
            WalletEventPayload::NetworkChanged(info) => g.network = *info,
            WalletEventPayload::AccountChanged(account) => g.account = Some(*account),
        }
        if g.subscriptions.values().any(|k| *k == payload.kind()) {
            g.sequence += 1;
            let sequence = g.sequence;
            g.events.push(WalletEvent { sequence, payload });
        }
    }
}

impl WalletPort for FakeWallet {
    fn is_extension_installed(&self) -> bool {
        self.snapshot(|s| s.installed)
    }

    fn is_extension_enabled(&self) -> bool {
        self.snapshot(|s| s.enabled)
    }

    fn extension_name(&self) -> Option<String> {
        self.snapshot(|s| s.name.clone())
    }

    fn current_account(&self) -> Result<Option<Account>, PortError> {
        Ok(self.snapshot(|s| s.account))
    }

    fn network(&self) -> Result<NetworkInfo, PortError> {
        Ok(self.snapshot(|s| s.network))
    }

    fn subscribe(
        &self,
        kind: bsc_dapp_core::WalletEventKind,
    ) -> Result<SubscriptionId, PortError> {
        let mut g = self.state.lock().expect("fake lock");
        g.next_subscription += 1;
        let id = g.next_subscription;
        g.subscriptions.insert(id, kind);
        Ok(SubscriptionId(id))
    }

    fn unsubscribe(&self, id: SubscriptionId) -> Result<(), PortError> {
        let mut g = self.state.lock().expect("fake lock");
        g.subscriptions
            .remove(&id.0)
            .map(|_| ())
            .ok_or_else(|| PortError::NotFound(format!("subscription {}", id.0)))
    }

    fn drain_events(&self) -> Result<Vec<WalletEvent>, PortError> {
        let mut g = self.state.lock().expect("fake lock");
        Ok(std::mem::take(&mut g.events))
    }

    fn enable_extension(&self) -> Result<Account, PortError> {
        let account = {
            let mut g = self.state.lock().expect("fake lock");
            g.enable_calls += 1;
            g.calls.push("enable".to_owned());
            g.account.unwrap_or_else(|| Account::new(account_a()))
        };
        self.emit(WalletEventPayload::Enabled(account));
        Ok(account)
    }

    fn sign_message(&self, message: &str, _signer: Address) -> Result<Bytes, PortError> {
        let mut g = self.state.lock().expect("fake lock");
        g.calls.push("personal_sign".to_owned());
        g.last_message = Some(message.to_owned());
        if g.reject_signing {
            return Err(PortError::UserRejected("User denied message signature".to_owned()));
        }
        Ok(Bytes::from(vec![0x11; 65]))
    }

    fn sign_typed_data(&self, fields: &[TypedField], _signer: Address) -> Result<Bytes, PortError> {
        let mut g = self.state.lock().expect("fake lock");
        g.calls.push("eth_signTypedData".to_owned());
        g.last_typed = Some(fields.to_vec());
        if g.reject_signing {
            return Err(PortError::UserRejected("User denied message signature".to_owned()));
        }
        Ok(Bytes::from(vec![0x22; 65]))
    }

    fn send_transaction(&self, tx: &TxRequest) -> Result<B256, PortError> {
        let mut g = self.state.lock().expect("fake lock");
        g.calls.push("eth_sendTransaction".to_owned());
        g.last_tx = Some(tx.clone());
        if g.fail_send {
            return Err(PortError::Transport("insufficient funds for gas".to_owned()));
        }
        Ok(B256::repeat_byte(0xab))
    }

    fn execute_contract(
        &self,
        contract: &ContractRef<'_>,
        method: &str,
        args: &[String],
    ) -> Result<TxParams, PortError> {
        let mut g = self.state.lock().expect("fake lock");
        g.calls.push("execute_contract".to_owned());
        g.last_contract_call = Some((
            contract.address,
            contract.abi_json.to_owned(),
            method.to_owned(),
            args.to_vec(),
        ));
        if !contract.abi_json.contains(&format!("\"{method}\"")) {
            return Err(PortError::Validation(format!("method not found: {method}")));
        }
        Ok(TxParams {
            to: contract.address,
            data: Bytes::from(vec![0x40, 0xc1, 0x0f, 0x19]),
            value: None,
        })
    }

    fn parse_ether(&self, amount: &str) -> Result<U256, PortError> {
        parse_ether(amount).map_err(|e| PortError::Validation(e.to_string()))
    }
}

#[derive(Debug, Default)]
pub struct FakeRpc {
    pub balance: U256,
}

impl RpcPort for FakeRpc {
    fn get_balance(&self, _address: Address) -> Result<U256, PortError> {
        Ok(self.balance)
    }
}

#[derive(Debug, Default)]
pub struct FakeExplorer {
    pub history: Vec<HistoryEntry>,
    pub fail: bool,
}

impl ExplorerPort for FakeExplorer {
    fn get_history(&self, _address: Address) -> Result<Vec<HistoryEntry>, PortError> {
        if self.fail {
            return Err(PortError::Transport("explorer unavailable".to_owned()));
        }
        Ok(self.history.clone())
    }
}

pub type TestController = DappController<FakeWallet, FakeRpc, FakeExplorer>;

pub const TEST_ABI: &str = r#"[{"type":"function","name":"mint","stateMutability":"nonpayable","inputs":[{"name":"to","type":"address"},{"name":"amount","type":"uint256"}],"outputs":[]}]"#;

pub fn controller(wallet: FakeWallet) -> TestController {
    DappController::new(wallet, FakeRpc::default(), FakeExplorer::default(), TEST_ABI)
}

pub fn account_a() -> Address {
    "0x1000000000000000000000000000000000000001"
        .parse()
        .expect("valid account a")
}

pub fn account_b() -> Address {
    "0x2000000000000000000000000000000000000002"
        .parse()
        .expect("valid account b")
}

pub fn mainnet() -> NetworkInfo {
    NetworkInfo::from_chain_id(bsc_dapp_core::BSC_MAINNET_CHAIN_ID)
}

pub fn testnet() -> NetworkInfo {
    NetworkInfo::from_chain_id(bsc_dapp_core::BSC_TESTNET_CHAIN_ID)
}
