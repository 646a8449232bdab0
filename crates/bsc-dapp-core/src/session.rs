//! Mirror of the wallet session kept by the view.
//!
//! The wallet client owns the real session; [`SessionView`] only follows its
//! notifications and derives the texts and gates the page renders.

use crate::domain::{Account, ExtensionKind, NetworkInfo, NetworkLabel, BSC_NETWORK_HELP_URL};
use crate::ports::{PortError, SubscriptionId, WalletEvent, WalletEventKind, WalletEventPayload, WalletPort};
use crate::state_machine::{
    session_transition, SessionState, SessionTrigger, StateTransition, TransitionError,
};

pub const NO_EXTENSION_TEXT: &str = "No Browser Extension detected";
pub const UNCONNECTED_TEXT: &str = "Not connected to BSC Mainnet";
pub const HELP_LINK_TEXT: &str = "Use BSC with Metamask";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkDisplay {
    Known(String),
    Unconnected {
        message: &'static str,
        help_text: &'static str,
        help_url: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionView {
    pub state: SessionState,
    pub installed: bool,
    pub extension: Option<ExtensionKind>,
    pub account: Option<Account>,
    pub network: NetworkLabel,
    /// Bumped on every account or network change.
    pub epoch: u64,
}

impl SessionView {
    /// Initial view from the client's capability probes.
    pub fn probe<W: WalletPort>(wallet: &W) -> Self {
        let mut view = Self::default();
        let installed = wallet.is_extension_installed();
        view.installed = installed;
        view.extension = wallet
            .extension_name()
            .filter(|_| installed)
            .map(|name| ExtensionKind::from_name(&name));
        view.step(SessionTrigger::ExtensionProbed { installed });

        if installed && wallet.is_extension_enabled() {
            view.account = wallet.current_account().unwrap_or_else(|e| {
                tracing::warn!(error = %e, "failed to read current account during probe");
                None
            });
            view.network = read_network(wallet).label();
            view.step(SessionTrigger::Enabled {
                network_known: view.network.is_known(),
            });
        }
        view
    }

    pub fn apply<W: WalletPort>(
        &mut self,
        wallet: &W,
        event: &WalletEvent,
    ) -> Result<StateTransition<SessionState>, TransitionError> {
        let (trigger, account, network) = match &event.payload {
            WalletEventPayload::Enabled(account) => {
                let network = read_network(wallet).label();
                (
                    SessionTrigger::Enabled {
                        network_known: network.is_known(),
                    },
                    Some(*account),
                    Some(network),
                )
            }
            WalletEventPayload::NetworkChanged(info) => {
                let label = info.label();
                (
                    SessionTrigger::NetworkChanged {
                        known: label.is_known(),
                    },
                    None,
                    Some(label),
                )
            }
            WalletEventPayload::AccountChanged(account) => {
                (SessionTrigger::AccountChanged, Some(*account), None)
            }
        };

        let (next, transition) = session_transition(self.state, trigger)?;
        if let Some(account) = account {
            if self.account != Some(account) {
                self.epoch = self.epoch.saturating_add(1);
            }
            self.account = Some(account);
        }
        if let Some(network) = network {
            if self.network != network {
                self.epoch = self.epoch.saturating_add(1);
            }
            self.network = network;
        }
        self.state = next;
        tracing::debug!(
            sequence = event.sequence,
            from = ?transition.from,
            to = ?transition.to,
            reason = transition.reason,
            "session transition"
        );
        Ok(transition)
    }

    fn step(&mut self, trigger: SessionTrigger) {
        match session_transition(self.state, trigger) {
            Ok((next, _)) => self.state = next,
            Err(e) => tracing::warn!(error = %e, "probe transition rejected"),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.state.is_enabled()
    }

    pub fn actions_unlocked(&self) -> bool {
        self.state.actions_unlocked()
    }

    pub fn extension_name(&self) -> Option<&str> {
        self.extension.as_ref().map(ExtensionKind::name)
    }

    pub fn status_text(&self) -> String {
        match self.extension_name() {
            Some(name) if self.installed => {
                let enabled = if self.is_enabled() {
                    "Enabled."
                } else {
                    "Not enabled"
                };
                format!("{name} Detected. {enabled}")
            }
            _ => NO_EXTENSION_TEXT.to_owned(),
        }
    }

    /// Label of the enable control, if one should be shown.
    pub fn enable_label(&self) -> Option<String> {
        if !self.installed || self.is_enabled() {
            return None;
        }
        self.extension_name().map(|name| format!("Enable {name}"))
    }

    /// Account line, shown once enabled with an account selected.
    pub fn account_text(&self) -> Option<String> {
        if !self.is_enabled() {
            return None;
        }
        self.account.map(|a| a.address.to_checksum(None))
    }

    pub fn network_display(&self) -> Option<NetworkDisplay> {
        if !self.is_enabled() {
            return None;
        }
        Some(match self.network.as_str() {
            Some(label) => NetworkDisplay::Known(format!("Network: BSC {label}")),
            None => NetworkDisplay::Unconnected {
                message: UNCONNECTED_TEXT,
                help_text: HELP_LINK_TEXT,
                help_url: BSC_NETWORK_HELP_URL,
            },
        })
    }
}

fn read_network<W: WalletPort>(wallet: &W) -> NetworkInfo {
    wallet.network().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "failed to read network descriptor");
        NetworkInfo::default()
    })
}

/// Subscriptions the page holds while it is mounted.
#[derive(Debug, Default)]
pub struct SessionWatcher {
    subscriptions: Vec<SubscriptionId>,
}

impl SessionWatcher {
    pub const KINDS: [WalletEventKind; 3] = [
        WalletEventKind::Enabled,
        WalletEventKind::NetworkChanged,
        WalletEventKind::AccountChanged,
    ];

    pub fn mount<W: WalletPort>(wallet: &W) -> Result<Self, PortError> {
        let mut watcher = Self::default();
        for kind in Self::KINDS {
            match wallet.subscribe(kind) {
                Ok(id) => watcher.subscriptions.push(id),
                Err(e) => {
                    watcher.unmount(wallet)?;
                    return Err(e);
                }
            }
        }
        Ok(watcher)
    }

    pub fn is_mounted(&self) -> bool {
        !self.subscriptions.is_empty()
    }

    /// Drain queued notifications into `view`; returns how many applied.
    pub fn poll<W: WalletPort>(
        &self,
        wallet: &W,
        view: &mut SessionView,
    ) -> Result<usize, PortError> {
        if !self.is_mounted() {
            return Ok(0);
        }
        let mut applied = 0;
        for event in wallet.drain_events()? {
            match view.apply(wallet, &event) {
                Ok(_) => applied += 1,
                Err(e) => tracing::warn!(sequence = event.sequence, error = %e, "notification ignored"),
            }
        }
        Ok(applied)
    }

    pub fn unmount<W: WalletPort>(&mut self, wallet: &W) -> Result<(), PortError> {
        let mut first_err = None;
        for id in self.subscriptions.drain(..) {
            if let Err(e) = wallet.unsubscribe(id) {
                first_err.get_or_insert(e);
            }
        }
        match first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
