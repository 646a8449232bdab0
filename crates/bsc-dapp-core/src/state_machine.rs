use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Disconnected,
    ExtensionDetected,
    Enabled,
    NetworkKnown,
}

impl SessionState {
    /// Sign, transfer and execute are only offered here.
    pub fn actions_unlocked(&self) -> bool {
        matches!(self, Self::NetworkKnown)
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, Self::Enabled | Self::NetworkKnown)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionTrigger {
    ExtensionProbed { installed: bool },
    Enabled { network_known: bool },
    NetworkChanged { known: bool },
    AccountChanged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionStatus {
    Idle,
    Pending,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionTrigger {
    Begin,
    Succeed,
    Fail,
    /// Stale completion or a dismissed notice.
    Reset,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateTransition<S> {
    pub from: S,
    pub to: S,
    pub reason: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("illegal session transition: {from:?} on {trigger:?}")]
    Session {
        from: SessionState,
        trigger: SessionTrigger,
    },
    #[error("illegal action transition: {from:?} on {trigger:?}")]
    Action {
        from: ActionStatus,
        trigger: ActionTrigger,
    },
}

pub fn session_transition(
    state: SessionState,
    trigger: SessionTrigger,
) -> Result<(SessionState, StateTransition<SessionState>), TransitionError> {
    use SessionState::*;
    use SessionTrigger as T;

    let (to, reason) = match (state, trigger) {
        (Disconnected, T::ExtensionProbed { installed: true }) => (ExtensionDetected, "extension_detected"),
        (Disconnected, T::ExtensionProbed { installed: false }) => (Disconnected, "no_extension"),
        (s, T::ExtensionProbed { .. }) => (s, "reprobe_ignored"),

        (ExtensionDetected | Enabled | NetworkKnown, T::Enabled { network_known: true }) => {
            (NetworkKnown, "enabled_on_known_network")
        }
        (ExtensionDetected | Enabled | NetworkKnown, T::Enabled { network_known: false }) => {
            (Enabled, "enabled")
        }

        (Enabled | NetworkKnown, T::NetworkChanged { known: true }) => (NetworkKnown, "network_known"),
        (Enabled | NetworkKnown, T::NetworkChanged { known: false }) => (Enabled, "network_unknown"),
        (s @ (Disconnected | ExtensionDetected), T::NetworkChanged { .. }) => {
            (s, "network_before_enable")
        }

        (s @ (Enabled | NetworkKnown), T::AccountChanged) => (s, "account_changed"),
        (s @ ExtensionDetected, T::AccountChanged) => (s, "account_before_enable"),

        (from, trigger) => return Err(TransitionError::Session { from, trigger }),
    };

    Ok((
        to,
        StateTransition {
            from: state,
            to,
            reason,
        },
    ))
}

pub fn action_transition(
    status: ActionStatus,
    trigger: ActionTrigger,
) -> Result<(ActionStatus, StateTransition<ActionStatus>), TransitionError> {
    use ActionStatus::*;
    use ActionTrigger::*;

    let (to, reason) = match (status, trigger) {
        (Idle | Succeeded | Failed, Begin) => (Pending, "begin"),
        (Pending, Succeed) => (Succeeded, "succeeded"),
        (Pending, Fail) => (Failed, "failed"),
        (Pending, Reset) => (Idle, "stale_response"),
        (Failed, Reset) => (Idle, "dismissed"),
        (from, trigger) => return Err(TransitionError::Action { from, trigger }),
    };

    Ok((
        to,
        StateTransition {
            from: status,
            to,
            reason,
        },
    ))
}
