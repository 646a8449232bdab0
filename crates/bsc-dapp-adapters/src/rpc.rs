use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use alloy::primitives::{Address, U256};
use serde_json::Value;

use bsc_dapp_core::{PortError, RpcPort};

use crate::DappAdapterConfig;

/// `eth_getBalance` against a BSC JSON-RPC endpoint.
#[derive(Debug, Clone)]
pub struct JsonRpcAdapter {
    url: String,
    client: reqwest::Client,
    #[cfg(not(target_arch = "wasm32"))]
    blocking: Option<reqwest::blocking::Client>,
}

impl JsonRpcAdapter {
    pub fn new(config: &DappAdapterConfig) -> Self {
        #[cfg(not(target_arch = "wasm32"))]
        let blocking = reqwest::blocking::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| tracing::warn!(error = %e, "failed to build rpc client"))
            .ok();

        Self {
            url: config.rpc_url.clone(),
            client: reqwest::Client::new(),
            #[cfg(not(target_arch = "wasm32"))]
            blocking,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub async fn get_balance_async(&self, address: Address) -> Result<U256, PortError> {
        let body: Value = self
            .client
            .post(&self.url)
            .json(&balance_request(address))
            .send()
            .await
            .map_err(|e| PortError::Transport(format!("rpc request failed: {e}")))?
            .json()
            .await
            .map_err(|e| PortError::Transport(format!("rpc json decode failed: {e}")))?;
        parse_balance_response(&body)
    }
}

impl RpcPort for JsonRpcAdapter {
    #[cfg(not(target_arch = "wasm32"))]
    fn get_balance(&self, address: Address) -> Result<U256, PortError> {
        let client = self
            .blocking
            .as_ref()
            .ok_or_else(|| PortError::Policy("rpc client unavailable".to_owned()))?;
        tracing::debug!(url = %self.url, %address, "eth_getBalance");
        let response = client
            .post(&self.url)
            .json(&balance_request(address))
            .send()
            .map_err(|e| PortError::Transport(format!("rpc request failed: {e}")))?;
        let status = response.status();
        let body: Value = response
            .json()
            .map_err(|e| PortError::Transport(format!("rpc json decode failed: {e}")))?;
        if !status.is_success() {
            return Err(PortError::Transport(format!("rpc status {status}: {body}")));
        }
        parse_balance_response(&body)
    }

    #[cfg(target_arch = "wasm32")]
    fn get_balance(&self, _address: Address) -> Result<U256, PortError> {
        Err(PortError::NotImplemented(
            "wasm sync get_balance is unavailable; use get_balance_async",
        ))
    }
}

fn balance_request(address: Address) -> Value {
    serde_json::json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": "eth_getBalance",
        "params": [address.to_string(), "latest"],
    })
}

fn parse_balance_response(body: &Value) -> Result<U256, PortError> {
    if let Some(err) = body.get("error") {
        return Err(PortError::Transport(format!("rpc returned error: {err}")));
    }
    let raw = body
        .get("result")
        .and_then(Value::as_str)
        .ok_or_else(|| PortError::Transport("rpc response missing result".to_owned()))?;
    let hex = raw
        .strip_prefix("0x")
        .ok_or_else(|| PortError::Validation(format!("balance is not hex: {raw}")))?;
    U256::from_str_radix(hex, 16)
        .map_err(|e| PortError::Validation(format!("invalid balance quantity: {e}")))
}

/// Fixed balances for offline runs.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRpc {
    balances: Arc<Mutex<HashMap<Address, U256>>>,
}

impl InMemoryRpc {
    pub fn set_balance(&self, address: Address, balance: U256) {
        if let Ok(mut g) = self.balances.lock() {
            g.insert(address, balance);
        }
    }
}

impl RpcPort for InMemoryRpc {
    fn get_balance(&self, address: Address) -> Result<U256, PortError> {
        let g = self
            .balances
            .lock()
            .map_err(|e| PortError::Transport(format!("balance lock poisoned: {e}")))?;
        Ok(g.get(&address).copied().unwrap_or_default())
    }
}
