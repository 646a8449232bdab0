use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use alloy::primitives::{keccak256, utils::parse_ether, Address, Bytes, B256, U256};
use serde_json::Value;

use bsc_dapp_core::{
    Account, ContractRef, ExtensionKind, NetworkInfo, PortError, SubscriptionId, TxParams,
    TxRequest, TypedField, WalletEvent, WalletEventKind, WalletEventPayload, WalletPort,
    USER_REJECTED_CODE,
};

use crate::abi::AbiAdapter;
use crate::DappAdapterConfig;

/// EIP-1193 wallet client.
///
/// On wasm32 it drives the injected browser provider. Natively it forwards
/// to a JSON-RPC proxy when one is configured, and otherwise falls back to a
/// deterministic in-memory wallet so the page can be exercised without an
/// extension.
#[derive(Debug, Clone)]
pub struct Eip1193Adapter {
    mode: ProviderMode,
    state: Arc<Mutex<ProviderState>>,
    abi: AbiAdapter,
    #[cfg(target_arch = "wasm32")]
    hooks: Arc<Mutex<BrowserHooks>>,
}

#[derive(Debug, Clone)]
enum ProviderMode {
    Disabled(String),
    Deterministic,
    #[cfg(not(target_arch = "wasm32"))]
    Proxy(ProxyRuntime),
    #[cfg(target_arch = "wasm32")]
    Browser(ExtensionKind),
}

#[derive(Debug, Clone)]
#[cfg(not(target_arch = "wasm32"))]
struct ProxyRuntime {
    base_url: String,
    client: reqwest::blocking::Client,
}

#[derive(Debug, Default)]
struct ProviderState {
    extension: Option<ExtensionKind>,
    enabled: bool,
    accounts: Vec<Address>,
    chain_id: Option<u64>,
    subscriptions: HashMap<u64, WalletEventKind>,
    next_subscription: u64,
    event_seq: u64,
    events: Vec<WalletEvent>,
    reject_requests: bool,
}

impl ProviderState {
    fn deterministic(extension: ExtensionKind, chain_id: u64) -> Self {
        Self {
            extension: Some(extension),
            accounts: vec![deterministic_account()],
            chain_id: Some(chain_id),
            ..Self::default()
        }
    }

    /// Queue `payload` if someone listens for its kind.
    fn record(&mut self, payload: WalletEventPayload) {
        let kind = payload.kind();
        if !self.subscriptions.values().any(|k| *k == kind) {
            return;
        }
        self.event_seq = self.event_seq.saturating_add(1);
        self.events.push(WalletEvent {
            sequence: self.event_seq,
            payload,
        });
    }

    fn account(&self) -> Option<Account> {
        self.accounts.first().copied().map(Account::new)
    }

    fn network(&self) -> NetworkInfo {
        self.chain_id
            .map(NetworkInfo::from_chain_id)
            .unwrap_or_default()
    }

    fn set_accounts(&mut self, accounts: Vec<Address>) {
        if self.accounts == accounts {
            return;
        }
        self.accounts = accounts;
        if let Some(account) = self.account() {
            if self.enabled {
                self.record(WalletEventPayload::AccountChanged(account));
            }
        }
    }

    fn set_chain_id(&mut self, chain_id: u64) {
        if self.chain_id == Some(chain_id) {
            return;
        }
        self.chain_id = Some(chain_id);
        let network = self.network();
        self.record(WalletEventPayload::NetworkChanged(network));
    }

    fn mark_enabled(&mut self) -> Result<Account, PortError> {
        let account = self.account().ok_or_else(|| {
            PortError::Policy("no provider accounts available; unlock the wallet".to_owned())
        })?;
        self.enabled = true;
        self.record(WalletEventPayload::Enabled(account));
        Ok(account)
    }
}

#[cfg(target_arch = "wasm32")]
#[derive(Default)]
struct BrowserHooks {
    accounts_changed: Option<wasm_bindgen::closure::Closure<dyn FnMut(wasm_bindgen::JsValue)>>,
    chain_changed: Option<wasm_bindgen::closure::Closure<dyn FnMut(wasm_bindgen::JsValue)>>,
}

#[cfg(target_arch = "wasm32")]
impl std::fmt::Debug for BrowserHooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BrowserHooks")
            .field("accounts_changed", &self.accounts_changed.is_some())
            .field("chain_changed", &self.chain_changed.is_some())
            .finish()
    }
}

impl Default for Eip1193Adapter {
    fn default() -> Self {
        Self::with_config(DappAdapterConfig::from_env())
    }
}

impl Eip1193Adapter {
    pub fn with_config(config: DappAdapterConfig) -> Self {
        let deterministic_extension = config
            .preferred_extension
            .clone()
            .unwrap_or_else(|| ExtensionKind::from_name(&config.deterministic_extension_name));
        let mut state = ProviderState::default();

        #[cfg(target_arch = "wasm32")]
        let mode = match detect_browser_extension(config.preferred_extension.as_ref()) {
            Some(kind) => {
                state.extension = Some(kind.clone());
                ProviderMode::Browser(kind)
            }
            None if config.strict_runtime_required() => {
                ProviderMode::Disabled("no EIP-1193 browser provider injected".to_owned())
            }
            None => {
                state = ProviderState::deterministic(
                    deterministic_extension,
                    config.deterministic_chain_id,
                );
                ProviderMode::Deterministic
            }
        };

        #[cfg(not(target_arch = "wasm32"))]
        let mode = if let Some(ref base_url) = config.eip1193_proxy_url {
            match reqwest::blocking::Client::builder()
                .timeout(config.request_timeout())
                .build()
            {
                Ok(client) => {
                    state.extension = Some(
                        config
                            .preferred_extension
                            .clone()
                            .unwrap_or_else(|| ExtensionKind::Other("EIP-1193 Proxy".to_owned())),
                    );
                    ProviderMode::Proxy(ProxyRuntime {
                        base_url: base_url.clone(),
                        client,
                    })
                }
                Err(e) => ProviderMode::Disabled(format!(
                    "failed to initialize EIP-1193 proxy client: {e}"
                )),
            }
        } else if config.strict_runtime_required() {
            ProviderMode::Disabled(
                "EIP-1193 proxy URL not configured in production runtime profile".to_owned(),
            )
        } else {
            state = ProviderState::deterministic(deterministic_extension, config.deterministic_chain_id);
            ProviderMode::Deterministic
        };

        if let ProviderMode::Disabled(reason) = &mode {
            tracing::warn!(%reason, "wallet provider disabled");
        }

        let adapter = Self {
            mode,
            state: Arc::new(Mutex::new(state)),
            abi: AbiAdapter,
            #[cfg(target_arch = "wasm32")]
            hooks: Arc::new(Mutex::new(BrowserHooks::default())),
        };

        #[cfg(target_arch = "wasm32")]
        if matches!(adapter.mode, ProviderMode::Browser(_)) {
            let _ = adapter.refresh_browser_snapshot();
        }

        adapter
    }

    /// Deterministic wallet with the given extension name, independent of the
    /// environment.
    pub fn deterministic(extension_name: &str) -> Self {
        Self::with_config(DappAdapterConfig {
            deterministic_extension_name: extension_name.to_owned(),
            eip1193_proxy_url: None,
            ..DappAdapterConfig::default()
        })
    }

    pub fn is_deterministic(&self) -> bool {
        matches!(self.mode, ProviderMode::Deterministic)
    }

    fn check_mode(&self) -> Result<(), PortError> {
        if let ProviderMode::Disabled(reason) = &self.mode {
            return Err(PortError::Policy(reason.clone()));
        }
        Ok(())
    }

    fn lock_state(&self) -> Result<MutexGuard<'_, ProviderState>, PortError> {
        self.state
            .lock()
            .map_err(|e| PortError::Transport(format!("provider lock poisoned: {e}")))
    }

    fn deterministic_signature(&self, domain: &str, payload: &[u8], signer: Address) -> Bytes {
        let mut seed = Vec::with_capacity(domain.len() + 20 + payload.len());
        seed.extend_from_slice(domain.as_bytes());
        seed.extend_from_slice(signer.as_slice());
        seed.extend_from_slice(payload);
        let hash = keccak256(seed);
        let mut sig = Vec::with_capacity(65);
        sig.extend_from_slice(hash.as_slice());
        sig.extend_from_slice(hash.as_slice());
        sig.push(27);
        Bytes::from(sig)
    }

    fn deterministic_guard(&self) -> Result<(), PortError> {
        if self.lock_state()?.reject_requests {
            return Err(PortError::UserRejected(
                "User denied the request (deterministic wallet)".to_owned(),
            ));
        }
        Ok(())
    }

    pub fn debug_inject_accounts_changed(&self, accounts: Vec<Address>) -> Result<(), PortError> {
        self.lock_state()?.set_accounts(accounts);
        Ok(())
    }

    pub fn debug_inject_chain_changed(&self, chain_id: u64) -> Result<(), PortError> {
        self.lock_state()?.set_chain_id(chain_id);
        Ok(())
    }

    /// Makes the deterministic wallet decline every signing and send request.
    pub fn debug_reject_requests(&self, reject: bool) -> Result<(), PortError> {
        self.lock_state()?.reject_requests = reject;
        Ok(())
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn proxy_call(&self, method: &str, params: Value) -> Result<Value, PortError> {
        let proxy = match &self.mode {
            ProviderMode::Proxy(proxy) => proxy,
            ProviderMode::Disabled(reason) => return Err(PortError::Policy(reason.clone())),
            _ => {
                return Err(PortError::NotImplemented(
                    "eip1193 proxy runtime not enabled",
                ))
            }
        };

        let payload = serde_json::json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });
        tracing::debug!(method, "eip1193 proxy request");
        let response = proxy
            .client
            .post(&proxy.base_url)
            .json(&payload)
            .send()
            .map_err(|e| PortError::Transport(format!("eip1193 proxy request failed: {e}")))?;
        let status = response.status();
        let body: Value = response
            .json()
            .map_err(|e| PortError::Transport(format!("eip1193 proxy json decode failed: {e}")))?;
        if !status.is_success() {
            return Err(PortError::Transport(format!(
                "eip1193 proxy status {}: {}",
                status, body
            )));
        }
        if let Some(err) = body.get("error") {
            return Err(rpc_error(err));
        }
        body.get("result")
            .cloned()
            .ok_or_else(|| PortError::Transport("eip1193 proxy missing result".to_owned()))
    }

    /// Whether accounts and chain must be polled; HTTP proxies push no events.
    pub fn polls_snapshot(&self) -> bool {
        #[cfg(not(target_arch = "wasm32"))]
        if matches!(self.mode, ProviderMode::Proxy(_)) {
            return true;
        }
        false
    }

    /// Re-reads accounts and chain from an enabled proxy wallet and queues
    /// the resulting notifications. Returns `false` when nothing was fetched.
    /// Blocks on HTTP, so call it off the UI thread.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn refresh_snapshot(&self) -> Result<bool, PortError> {
        if !self.polls_snapshot() || !self.is_extension_enabled() {
            return Ok(false);
        }
        self.refresh_proxy_snapshot()?;
        Ok(true)
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn refresh_proxy_snapshot(&self) -> Result<(), PortError> {
        let accounts = parse_accounts(&self.proxy_call("eth_accounts", serde_json::json!([]))?)?;
        let chain_id = json_chain_id_to_u64(&self.proxy_call("eth_chainId", serde_json::json!([]))?)?;
        let mut g = self.lock_state()?;
        g.set_accounts(accounts);
        g.set_chain_id(chain_id);
        Ok(())
    }

    #[cfg(target_arch = "wasm32")]
    pub async fn wasm_enable_async(&self) -> Result<Account, PortError> {
        self.check_mode()?;
        if !matches!(self.mode, ProviderMode::Browser(_)) {
            return self.enable_extension();
        }
        let result = self
            .wasm_request("eth_requestAccounts", serde_json::json!([]))
            .await?;
        let accounts = parse_accounts(&result)?;
        let chain_id = json_chain_id_to_u64(
            &self
                .wasm_request("eth_chainId", serde_json::json!([]))
                .await?,
        )?;
        let mut g = self.lock_state()?;
        g.accounts = accounts;
        g.chain_id = Some(chain_id);
        g.mark_enabled()
    }

    #[cfg(target_arch = "wasm32")]
    pub async fn wasm_sign_message_async(
        &self,
        message: &str,
        signer: Address,
    ) -> Result<Bytes, PortError> {
        self.check_mode()?;
        if !matches!(self.mode, ProviderMode::Browser(_)) {
            return self.sign_message(message, signer);
        }
        let params = personal_sign_params(message, signer);
        let result = self.wasm_request("personal_sign", params).await?;
        parse_signature(&result)
    }

    #[cfg(target_arch = "wasm32")]
    pub async fn wasm_sign_typed_data_async(
        &self,
        fields: &[TypedField],
        signer: Address,
    ) -> Result<Bytes, PortError> {
        self.check_mode()?;
        if !matches!(self.mode, ProviderMode::Browser(_)) {
            return self.sign_typed_data(fields, signer);
        }
        let params = typed_data_params(fields, signer)?;
        let result = self.wasm_request("eth_signTypedData", params).await?;
        parse_signature(&result)
    }

    #[cfg(target_arch = "wasm32")]
    pub async fn wasm_send_transaction_async(&self, tx: &TxRequest) -> Result<B256, PortError> {
        self.check_mode()?;
        if !matches!(self.mode, ProviderMode::Browser(_)) {
            return self.send_transaction(tx);
        }
        let params = send_transaction_params(tx)?;
        let result = self.wasm_request("eth_sendTransaction", params).await?;
        parse_tx_hash(&result)
    }

    #[cfg(target_arch = "wasm32")]
    async fn wasm_request(&self, method: &str, params: Value) -> Result<Value, PortError> {
        use wasm_bindgen::JsCast;

        let ProviderMode::Browser(kind) = &self.mode else {
            return Err(PortError::NotImplemented("browser provider not active"));
        };
        let provider = browser_provider(kind)?;
        let request_fn = get_prop(&provider, "request")
            .ok()
            .and_then(|v| v.dyn_into::<js_sys::Function>().ok())
            .ok_or(PortError::NotImplemented("provider.request is unavailable"))?;

        let request = serde_json::json!({
            "method": method,
            "params": params,
        });
        let request_js = serde_wasm_bindgen::to_value(&request)
            .map_err(|e| PortError::Transport(format!("failed to encode wasm request: {e}")))?;
        let promise_js = request_fn.call1(&provider, &request_js).map_err(|e| {
            PortError::Transport(format!("provider request dispatch failed: {e:?}"))
        })?;
        let promise = promise_js.dyn_into::<js_sys::Promise>().map_err(|_| {
            PortError::Transport("provider request did not return Promise".to_owned())
        })?;
        let result_js = wasm_bindgen_futures::JsFuture::from(promise)
            .await
            .map_err(js_request_error)?;
        serde_wasm_bindgen::from_value(result_js)
            .map_err(|e| PortError::Transport(format!("failed to decode wasm response: {e}")))
    }

    #[cfg(target_arch = "wasm32")]
    fn refresh_browser_snapshot(&self) -> Result<(), PortError> {
        use wasm_bindgen::JsValue;

        let ProviderMode::Browser(kind) = &self.mode else {
            return Ok(());
        };
        let provider = browser_provider(kind)?;
        let selected = get_prop(&provider, "selectedAddress").unwrap_or(JsValue::NULL);
        let chain = get_prop(&provider, "chainId").unwrap_or(JsValue::NULL);

        let mut g = self.lock_state()?;
        if let Some(s) = selected.as_string() {
            let parsed: Address = s
                .parse()
                .map_err(|e| PortError::Validation(format!("invalid selectedAddress: {e}")))?;
            g.set_accounts(vec![parsed]);
            g.enabled = true;
        }
        if !chain.is_null() && !chain.is_undefined() {
            let parsed = js_chain_id_to_u64(chain)?;
            g.set_chain_id(parsed);
        }
        Ok(())
    }

    #[cfg(target_arch = "wasm32")]
    fn register_browser_hooks(&self) -> Result<(), PortError> {
        use wasm_bindgen::{closure::Closure, JsCast, JsValue};

        let ProviderMode::Browser(kind) = &self.mode else {
            return Ok(());
        };
        let provider = browser_provider(kind)?;
        let on_fn = get_prop(&provider, "on")
            .ok()
            .and_then(|v| v.dyn_into::<js_sys::Function>().ok())
            .ok_or(PortError::NotImplemented("provider does not expose on"))?;

        let mut hooks = self
            .hooks
            .lock()
            .map_err(|e| PortError::Transport(format!("provider hooks lock poisoned: {e}")))?;
        if hooks.accounts_changed.is_some() && hooks.chain_changed.is_some() {
            return Ok(());
        }

        let state_for_accounts = Arc::clone(&self.state);
        let accounts_cb = Closure::<dyn FnMut(JsValue)>::new(move |value: JsValue| {
            let mut accounts = Vec::new();
            if js_sys::Array::is_array(&value) {
                for item in js_sys::Array::from(&value).iter() {
                    if let Some(addr) = item.as_string().and_then(|raw| raw.parse::<Address>().ok()) {
                        accounts.push(addr);
                    }
                }
            }
            if let Ok(mut g) = state_for_accounts.lock() {
                g.set_accounts(accounts);
            }
        });

        let state_for_chain = Arc::clone(&self.state);
        let chain_cb = Closure::<dyn FnMut(JsValue)>::new(move |value: JsValue| {
            if let Ok(chain_id) = js_chain_id_to_u64(value) {
                if let Ok(mut g) = state_for_chain.lock() {
                    g.set_chain_id(chain_id);
                }
            }
        });

        on_fn
            .call2(
                &provider,
                &JsValue::from_str("accountsChanged"),
                accounts_cb.as_ref().unchecked_ref(),
            )
            .map_err(|e| PortError::Transport(format!("register accountsChanged failed: {e:?}")))?;
        on_fn
            .call2(
                &provider,
                &JsValue::from_str("chainChanged"),
                chain_cb.as_ref().unchecked_ref(),
            )
            .map_err(|e| PortError::Transport(format!("register chainChanged failed: {e:?}")))?;

        hooks.accounts_changed = Some(accounts_cb);
        hooks.chain_changed = Some(chain_cb);
        Ok(())
    }

    #[cfg(target_arch = "wasm32")]
    fn release_browser_hooks(&self) -> Result<(), PortError> {
        use wasm_bindgen::{JsCast, JsValue};

        let ProviderMode::Browser(kind) = &self.mode else {
            return Ok(());
        };
        let provider = browser_provider(kind)?;
        let remove_fn = get_prop(&provider, "removeListener")
            .ok()
            .and_then(|v| v.dyn_into::<js_sys::Function>().ok())
            .ok_or(PortError::NotImplemented("provider does not expose removeListener"))?;

        let mut hooks = self
            .hooks
            .lock()
            .map_err(|e| PortError::Transport(format!("provider hooks lock poisoned: {e}")))?;
        if let Some(cb) = hooks.accounts_changed.take() {
            remove_fn
                .call2(&provider, &JsValue::from_str("accountsChanged"), cb.as_ref().unchecked_ref())
                .map_err(|e| PortError::Transport(format!("remove accountsChanged failed: {e:?}")))?;
        }
        if let Some(cb) = hooks.chain_changed.take() {
            remove_fn
                .call2(&provider, &JsValue::from_str("chainChanged"), cb.as_ref().unchecked_ref())
                .map_err(|e| PortError::Transport(format!("remove chainChanged failed: {e:?}")))?;
        }
        Ok(())
    }
}

impl WalletPort for Eip1193Adapter {
    fn is_extension_installed(&self) -> bool {
        !matches!(self.mode, ProviderMode::Disabled(_))
    }

    fn is_extension_enabled(&self) -> bool {
        self.lock_state().map(|g| g.enabled).unwrap_or(false)
    }

    fn extension_name(&self) -> Option<String> {
        if !self.is_extension_installed() {
            return None;
        }
        self.lock_state()
            .ok()
            .and_then(|g| g.extension.as_ref().map(|k| k.name().to_owned()))
    }

    fn current_account(&self) -> Result<Option<Account>, PortError> {
        self.check_mode()?;
        let g = self.lock_state()?;
        Ok(g.enabled.then(|| g.account()).flatten())
    }

    fn network(&self) -> Result<NetworkInfo, PortError> {
        self.check_mode()?;
        Ok(self.lock_state()?.network())
    }

    fn subscribe(&self, kind: WalletEventKind) -> Result<SubscriptionId, PortError> {
        #[cfg(target_arch = "wasm32")]
        if matches!(self.mode, ProviderMode::Browser(_)) {
            self.register_browser_hooks()?;
        }

        let mut g = self.lock_state()?;
        g.next_subscription = g.next_subscription.saturating_add(1);
        let id = g.next_subscription;
        g.subscriptions.insert(id, kind);
        Ok(SubscriptionId(id))
    }

    fn unsubscribe(&self, id: SubscriptionId) -> Result<(), PortError> {
        let remaining = {
            let mut g = self.lock_state()?;
            if g.subscriptions.remove(&id.0).is_none() {
                return Err(PortError::NotFound(format!("subscription {}", id.0)));
            }
            g.subscriptions.len()
        };

        #[cfg(target_arch = "wasm32")]
        if remaining == 0 && matches!(self.mode, ProviderMode::Browser(_)) {
            self.release_browser_hooks()?;
        }

        if remaining == 0 {
            self.lock_state()?.events.clear();
        }
        Ok(())
    }

    fn drain_events(&self) -> Result<Vec<WalletEvent>, PortError> {
        Ok(std::mem::take(&mut self.lock_state()?.events))
    }

    fn enable_extension(&self) -> Result<Account, PortError> {
        self.check_mode()?;

        #[cfg(not(target_arch = "wasm32"))]
        if matches!(self.mode, ProviderMode::Proxy(_)) {
            let accounts =
                parse_accounts(&self.proxy_call("eth_requestAccounts", serde_json::json!([]))?)?;
            let chain_id =
                json_chain_id_to_u64(&self.proxy_call("eth_chainId", serde_json::json!([]))?)?;
            let mut g = self.lock_state()?;
            g.accounts = accounts;
            g.chain_id = Some(chain_id);
            return g.mark_enabled();
        }

        #[cfg(target_arch = "wasm32")]
        if matches!(self.mode, ProviderMode::Browser(_)) {
            return Err(PortError::NotImplemented(
                "wasm sync enable_extension is unavailable; use wasm_enable_async",
            ));
        }

        self.deterministic_guard()?;
        self.lock_state()?.mark_enabled()
    }

    fn sign_message(&self, message: &str, signer: Address) -> Result<Bytes, PortError> {
        self.check_mode()?;

        #[cfg(not(target_arch = "wasm32"))]
        if matches!(self.mode, ProviderMode::Proxy(_)) {
            let result = self.proxy_call("personal_sign", personal_sign_params(message, signer))?;
            return parse_signature(&result);
        }

        #[cfg(target_arch = "wasm32")]
        if matches!(self.mode, ProviderMode::Browser(_)) {
            return Err(PortError::NotImplemented(
                "wasm sync sign_message is unavailable; use wasm_sign_message_async",
            ));
        }

        self.deterministic_guard()?;
        Ok(self.deterministic_signature("personal_sign", message.as_bytes(), signer))
    }

    fn sign_typed_data(&self, fields: &[TypedField], signer: Address) -> Result<Bytes, PortError> {
        self.check_mode()?;
        let params = typed_data_params(fields, signer)?;

        #[cfg(not(target_arch = "wasm32"))]
        if matches!(self.mode, ProviderMode::Proxy(_)) {
            let result = self.proxy_call("eth_signTypedData", params)?;
            return parse_signature(&result);
        }

        #[cfg(target_arch = "wasm32")]
        if matches!(self.mode, ProviderMode::Browser(_)) {
            return Err(PortError::NotImplemented(
                "wasm sync sign_typed_data is unavailable; use wasm_sign_typed_data_async",
            ));
        }

        self.deterministic_guard()?;
        Ok(self.deterministic_signature("eth_signTypedData", params[0].to_string().as_bytes(), signer))
    }

    fn send_transaction(&self, tx: &TxRequest) -> Result<B256, PortError> {
        self.check_mode()?;
        let params = send_transaction_params(tx)?;

        #[cfg(not(target_arch = "wasm32"))]
        if matches!(self.mode, ProviderMode::Proxy(_)) {
            let result = self.proxy_call("eth_sendTransaction", params)?;
            return parse_tx_hash(&result);
        }

        #[cfg(target_arch = "wasm32")]
        if matches!(self.mode, ProviderMode::Browser(_)) {
            return Err(PortError::NotImplemented(
                "wasm sync send_transaction is unavailable; use wasm_send_transaction_async",
            ));
        }

        self.deterministic_guard()?;
        let canonical = serde_json::to_vec(&params)
            .map_err(|e| PortError::Validation(format!("tx payload serialization failed: {e}")))?;
        Ok(keccak256(canonical))
    }

    fn execute_contract(
        &self,
        contract: &ContractRef<'_>,
        method: &str,
        args: &[String],
    ) -> Result<TxParams, PortError> {
        self.check_mode()?;
        let (data, _selector) = self.abi.encode_call(contract.abi_json, method, args)?;
        Ok(TxParams {
            to: contract.address,
            data,
            value: None,
        })
    }

    fn parse_ether(&self, amount: &str) -> Result<U256, PortError> {
        parse_ether(amount).map_err(|e| PortError::Validation(format!("invalid ether amount: {e}")))
    }
}

pub fn deterministic_account() -> Address {
    Address::from([
        0x10, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0x01,
    ])
}

fn personal_sign_params(message: &str, signer: Address) -> Value {
    let payload_hex = format!("0x{}", alloy::hex::encode(message.as_bytes()));
    serde_json::json!([payload_hex, signer.to_string()])
}

/// Legacy v1 typed data: `[[{type, name, value}, ...], signer]`.
fn typed_data_params(fields: &[TypedField], signer: Address) -> Result<Value, PortError> {
    let fields = serde_json::to_value(fields)
        .map_err(|e| PortError::Validation(format!("typed data serialization failed: {e}")))?;
    Ok(serde_json::json!([fields, signer.to_string()]))
}

fn send_transaction_params(tx: &TxRequest) -> Result<Value, PortError> {
    let tx = serde_json::to_value(tx)
        .map_err(|e| PortError::Validation(format!("tx payload serialization failed: {e}")))?;
    Ok(serde_json::json!([tx]))
}

fn parse_accounts(result: &Value) -> Result<Vec<Address>, PortError> {
    let arr = result
        .as_array()
        .ok_or_else(|| PortError::Transport("accounts result must be array".to_owned()))?;
    arr.iter()
        .map(|item| {
            item.as_str()
                .ok_or_else(|| PortError::Transport("account item must be string".to_owned()))?
                .parse()
                .map_err(|e| PortError::Validation(format!("invalid account address: {e}")))
        })
        .collect()
}

fn parse_signature(result: &Value) -> Result<Bytes, PortError> {
    let raw = result
        .as_str()
        .ok_or_else(|| PortError::Transport("signature response must be hex string".to_owned()))?;
    raw.parse()
        .map_err(|e| PortError::Validation(format!("invalid signature hex: {e}")))
}

fn parse_tx_hash(result: &Value) -> Result<B256, PortError> {
    let raw = result
        .as_str()
        .ok_or_else(|| PortError::Transport("eth_sendTransaction must return hash".to_owned()))?;
    raw.parse()
        .map_err(|e| PortError::Validation(format!("invalid tx hash: {e}")))
}

fn rpc_error(err: &Value) -> PortError {
    let code = err.get("code").and_then(Value::as_i64);
    let message = err
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or("unknown provider error")
        .to_owned();
    if code == Some(USER_REJECTED_CODE) {
        PortError::UserRejected(message)
    } else {
        PortError::Transport(format!("provider returned error: {err}"))
    }
}

fn json_chain_id_to_u64(value: &Value) -> Result<u64, PortError> {
    if let Some(n) = value.as_u64() {
        return Ok(n);
    }
    let s = value
        .as_str()
        .ok_or_else(|| PortError::Validation("chain id must be string or number".to_owned()))?;
    parse_chain_id_str(s)
}

fn parse_chain_id_str(raw: &str) -> Result<u64, PortError> {
    if let Some(hex) = raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
        u64::from_str_radix(hex, 16)
            .map_err(|e| PortError::Validation(format!("invalid hex chain id: {e}")))
    } else {
        raw.parse()
            .map_err(|e| PortError::Validation(format!("invalid chain id: {e}")))
    }
}

/// Binance Chain Wallet injects `window.BinanceChain`; MetaMask flags
/// `window.ethereum.isMetaMask`.
#[cfg(target_arch = "wasm32")]
fn detect_browser_extension(preferred: Option<&ExtensionKind>) -> Option<ExtensionKind> {
    let binance = browser_provider(&ExtensionKind::BinanceChainWallet).is_ok();
    let ethereum = browser_provider(&ExtensionKind::MetaMask).ok();
    let ethereum_kind = ethereum.map(|provider| {
        let is_metamask = get_prop(&provider, "isMetaMask")
            .ok()
            .and_then(|v| v.as_bool())
            .unwrap_or(false);
        if is_metamask {
            ExtensionKind::MetaMask
        } else {
            ExtensionKind::Other("Ethereum Provider".to_owned())
        }
    });

    match preferred {
        Some(ExtensionKind::BinanceChainWallet) if binance => Some(ExtensionKind::BinanceChainWallet),
        Some(ExtensionKind::MetaMask) if ethereum_kind.is_some() => ethereum_kind,
        _ => ethereum_kind.or_else(|| binance.then_some(ExtensionKind::BinanceChainWallet)),
    }
}

#[cfg(target_arch = "wasm32")]
fn browser_provider(kind: &ExtensionKind) -> Result<wasm_bindgen::JsValue, PortError> {
    let window =
        web_sys::window().ok_or_else(|| PortError::Transport("missing window".to_owned()))?;
    let key = match kind {
        ExtensionKind::BinanceChainWallet => "BinanceChain",
        _ => "ethereum",
    };
    let provider = get_prop(&window.into(), key)?;
    if provider.is_null() || provider.is_undefined() {
        return Err(PortError::NotFound(format!("window.{key} missing")));
    }
    Ok(provider)
}

#[cfg(target_arch = "wasm32")]
fn get_prop(target: &wasm_bindgen::JsValue, key: &str) -> Result<wasm_bindgen::JsValue, PortError> {
    js_sys::Reflect::get(target, &wasm_bindgen::JsValue::from_str(key))
        .map_err(|e| PortError::Transport(format!("read provider property {key} failed: {e:?}")))
}

#[cfg(target_arch = "wasm32")]
fn js_request_error(err: wasm_bindgen::JsValue) -> PortError {
    let code = get_prop(&err, "code").ok().and_then(|v| v.as_f64());
    let message = get_prop(&err, "message")
        .ok()
        .and_then(|v| v.as_string())
        .unwrap_or_else(|| format!("{err:?}"));
    if code == Some(USER_REJECTED_CODE as f64) {
        PortError::UserRejected(message)
    } else {
        PortError::Transport(format!("provider request rejected: {message}"))
    }
}

#[cfg(target_arch = "wasm32")]
fn js_chain_id_to_u64(value: wasm_bindgen::JsValue) -> Result<u64, PortError> {
    if let Some(s) = value.as_string() {
        return parse_chain_id_str(&s);
    }
    if let Some(num) = value.as_f64() {
        return Ok(num as u64);
    }
    Err(PortError::Validation("invalid JS chain id".to_owned()))
}
