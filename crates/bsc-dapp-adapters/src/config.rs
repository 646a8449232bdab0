use bsc_dapp_core::ExtensionKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RuntimeProfile {
    #[default]
    Development,
    Production,
}

impl RuntimeProfile {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Some(Self::Development),
            "production" | "prod" => Some(Self::Production),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DappAdapterConfig {
    pub runtime_profile: RuntimeProfile,
    /// Extension to bind to when several inject a provider.
    pub preferred_extension: Option<ExtensionKind>,
    pub eip1193_proxy_url: Option<String>,
    pub rpc_url: String,
    pub explorer_api_url: String,
    pub explorer_api_key: Option<String>,
    pub request_timeout_ms: u64,
    /// Name reported by the deterministic wallet.
    pub deterministic_extension_name: String,
    pub deterministic_chain_id: u64,
}

impl Default for DappAdapterConfig {
    fn default() -> Self {
        Self {
            runtime_profile: RuntimeProfile::Development,
            preferred_extension: None,
            eip1193_proxy_url: None,
            rpc_url: "https://bsc-dataseed.binance.org".to_owned(),
            explorer_api_url: "https://api.bscscan.com/api".to_owned(),
            explorer_api_key: None,
            request_timeout_ms: 15_000,
            deterministic_extension_name: "MetaMask".to_owned(),
            deterministic_chain_id: bsc_dapp_core::BSC_TESTNET_CHAIN_ID,
        }
    }
}

impl DappAdapterConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(raw) = get("BSC_DAPP_RUNTIME_PROFILE") {
            match RuntimeProfile::parse(&raw) {
                Some(profile) => cfg.runtime_profile = profile,
                None => tracing::warn!(value = %raw, "unknown BSC_DAPP_RUNTIME_PROFILE; using development"),
            }
        }
        if let Some(raw) = get("BSC_DAPP_EXTENSION") {
            cfg.preferred_extension = Some(ExtensionKind::from_name(raw.trim()));
        }
        cfg.eip1193_proxy_url = get("BSC_DAPP_EIP1193_PROXY_URL");
        if let Some(url) = get("BSC_DAPP_RPC_URL") {
            cfg.rpc_url = url;
        }
        if let Some(url) = get("BSC_DAPP_EXPLORER_URL") {
            cfg.explorer_api_url = url;
        }
        cfg.explorer_api_key = get("BSC_DAPP_EXPLORER_API_KEY");
        if let Some(raw) = get("BSC_DAPP_TIMEOUT_MS") {
            match raw.trim().parse() {
                Ok(ms) => cfg.request_timeout_ms = ms,
                Err(e) => tracing::warn!(value = %raw, error = %e, "invalid BSC_DAPP_TIMEOUT_MS"),
            }
        }
        cfg
    }

    /// Production refuses the deterministic fallback wallet.
    pub fn strict_runtime_required(&self) -> bool {
        self.runtime_profile == RuntimeProfile::Production
    }

    pub fn request_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.request_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_overrides_defaults() {
        let cfg = DappAdapterConfig::from_lookup(|key| match key {
            "BSC_DAPP_RUNTIME_PROFILE" => Some("prod".to_owned()),
            "BSC_DAPP_EXTENSION" => Some("Binance Chain Wallet".to_owned()),
            "BSC_DAPP_RPC_URL" => Some("http://localhost:8545".to_owned()),
            "BSC_DAPP_TIMEOUT_MS" => Some("250".to_owned()),
            "BSC_DAPP_EXPLORER_API_KEY" => Some("   ".to_owned()),
            _ => None,
        });
        assert!(cfg.strict_runtime_required());
        assert_eq!(cfg.preferred_extension, Some(ExtensionKind::BinanceChainWallet));
        assert_eq!(cfg.rpc_url, "http://localhost:8545");
        assert_eq!(cfg.request_timeout_ms, 250);
        assert_eq!(cfg.explorer_api_key, None);
    }

    #[test]
    fn invalid_values_keep_defaults() {
        let cfg = DappAdapterConfig::from_lookup(|key| match key {
            "BSC_DAPP_RUNTIME_PROFILE" => Some("staging".to_owned()),
            "BSC_DAPP_TIMEOUT_MS" => Some("soon".to_owned()),
            _ => None,
        });
        assert_eq!(cfg.runtime_profile, RuntimeProfile::Development);
        assert_eq!(cfg.request_timeout_ms, 15_000);
    }
}
