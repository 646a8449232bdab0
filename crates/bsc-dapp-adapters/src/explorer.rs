use std::sync::{Arc, Mutex};

use alloy::primitives::{Address, B256, U256};
use serde::Deserialize;

use bsc_dapp_core::{ExplorerPort, HistoryEntry, PortError};

use crate::DappAdapterConfig;

/// Transaction history from a BscScan-compatible `txlist` endpoint.
#[derive(Debug, Clone)]
pub struct BscScanAdapter {
    api_url: String,
    api_key: Option<String>,
    client: reqwest::Client,
    #[cfg(not(target_arch = "wasm32"))]
    blocking: Option<reqwest::blocking::Client>,
}

#[derive(Debug, Deserialize)]
struct TxListResponse {
    status: String,
    message: String,
    result: serde_json::Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TxListItem {
    hash: String,
    from: String,
    #[serde(default)]
    to: String,
    value: String,
    block_number: String,
    time_stamp: String,
}

impl BscScanAdapter {
    pub fn new(config: &DappAdapterConfig) -> Self {
        #[cfg(not(target_arch = "wasm32"))]
        let blocking = reqwest::blocking::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| tracing::warn!(error = %e, "failed to build explorer client"))
            .ok();

        Self {
            api_url: config.explorer_api_url.clone(),
            api_key: config.explorer_api_key.clone(),
            client: reqwest::Client::new(),
            #[cfg(not(target_arch = "wasm32"))]
            blocking,
        }
    }

    fn query(&self, address: Address) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("module", "account".to_owned()),
            ("action", "txlist".to_owned()),
            ("address", address.to_string()),
            ("startblock", "0".to_owned()),
            ("endblock", "99999999".to_owned()),
            ("sort", "desc".to_owned()),
        ];
        if let Some(key) = &self.api_key {
            query.push(("apikey", key.clone()));
        }
        query
    }

    pub async fn get_history_async(&self, address: Address) -> Result<Vec<HistoryEntry>, PortError> {
        let body: TxListResponse = self
            .client
            .get(&self.api_url)
            .query(&self.query(address))
            .send()
            .await
            .map_err(|e| PortError::Transport(format!("explorer request failed: {e}")))?
            .error_for_status()
            .map_err(|e| PortError::Transport(format!("explorer status {e}")))?
            .json()
            .await
            .map_err(|e| PortError::Transport(format!("explorer json decode failed: {e}")))?;
        parse_tx_list(body)
    }
}

impl ExplorerPort for BscScanAdapter {
    #[cfg(not(target_arch = "wasm32"))]
    fn get_history(&self, address: Address) -> Result<Vec<HistoryEntry>, PortError> {
        let client = self
            .blocking
            .as_ref()
            .ok_or_else(|| PortError::Policy("explorer client unavailable".to_owned()))?;
        tracing::debug!(url = %self.api_url, %address, "txlist");
        let response = client
            .get(&self.api_url)
            .query(&self.query(address))
            .send()
            .map_err(|e| PortError::Transport(format!("explorer request failed: {e}")))?;
        let status = response.status();
        if !status.is_success() {
            return Err(PortError::Transport(format!("explorer status {status}")));
        }
        let body: TxListResponse = response
            .json()
            .map_err(|e| PortError::Transport(format!("explorer json decode failed: {e}")))?;
        parse_tx_list(body)
    }

    #[cfg(target_arch = "wasm32")]
    fn get_history(&self, _address: Address) -> Result<Vec<HistoryEntry>, PortError> {
        Err(PortError::NotImplemented(
            "wasm sync get_history is unavailable; use get_history_async",
        ))
    }
}

fn parse_tx_list(body: TxListResponse) -> Result<Vec<HistoryEntry>, PortError> {
    if body.status != "1" {
        if body.message.starts_with("No transactions found") {
            return Ok(Vec::new());
        }
        return Err(PortError::Transport(format!(
            "explorer error: {} ({})",
            body.message, body.result
        )));
    }
    let items: Vec<TxListItem> = serde_json::from_value(body.result)
        .map_err(|e| PortError::Validation(format!("unexpected txlist shape: {e}")))?;
    items.into_iter().map(TxListItem::into_entry).collect()
}

impl TxListItem {
    fn into_entry(self) -> Result<HistoryEntry, PortError> {
        let invalid = |field: &str, e: String| PortError::Validation(format!("txlist {field}: {e}"));
        Ok(HistoryEntry {
            hash: self
                .hash
                .parse::<B256>()
                .map_err(|e| invalid("hash", e.to_string()))?,
            from: self
                .from
                .parse::<Address>()
                .map_err(|e| invalid("from", e.to_string()))?,
            // Contract creations carry an empty `to`.
            to: if self.to.is_empty() {
                None
            } else {
                Some(
                    self.to
                        .parse::<Address>()
                        .map_err(|e| invalid("to", e.to_string()))?,
                )
            },
            value: U256::from_str_radix(&self.value, 10)
                .map_err(|e| invalid("value", e.to_string()))?,
            block_number: self
                .block_number
                .parse()
                .map_err(|e: std::num::ParseIntError| invalid("blockNumber", e.to_string()))?,
            timestamp: self
                .time_stamp
                .parse()
                .map_err(|e: std::num::ParseIntError| invalid("timeStamp", e.to_string()))?,
        })
    }
}

/// Canned history for offline runs.
#[derive(Debug, Clone, Default)]
pub struct InMemoryExplorer {
    history: Arc<Mutex<Vec<HistoryEntry>>>,
}

impl InMemoryExplorer {
    pub fn push(&self, entry: HistoryEntry) {
        if let Ok(mut g) = self.history.lock() {
            g.push(entry);
        }
    }
}

impl ExplorerPort for InMemoryExplorer {
    fn get_history(&self, address: Address) -> Result<Vec<HistoryEntry>, PortError> {
        let g = self
            .history
            .lock()
            .map_err(|e| PortError::Transport(format!("history lock poisoned: {e}")))?;
        Ok(g.iter()
            .filter(|entry| entry.from == address || entry.to == Some(address))
            .cloned()
            .collect())
    }
}
