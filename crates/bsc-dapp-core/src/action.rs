use crate::error::DappError;
use crate::state_machine::{action_transition, ActionStatus, ActionTrigger};

/// Identifies one in-flight request and the session epoch it started in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    pub id: u64,
    pub epoch: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    /// The account or network changed while the request was in flight.
    Stale,
    /// Ticket does not match the in-flight request.
    Unknown,
}

/// `idle -> pending -> success | error` for one page action.
#[derive(Debug, Clone)]
pub struct ActionSlot<T> {
    status: ActionStatus,
    next_id: u64,
    in_flight: Option<Ticket>,
    output: Option<T>,
    error: Option<DappError>,
}

impl<T> Default for ActionSlot<T> {
    fn default() -> Self {
        Self {
            status: ActionStatus::Idle,
            next_id: 0,
            in_flight: None,
            output: None,
            error: None,
        }
    }
}

impl<T> ActionSlot<T> {
    pub fn status(&self) -> ActionStatus {
        self.status
    }

    pub fn is_pending(&self) -> bool {
        self.status == ActionStatus::Pending
    }

    /// Last successful result. Survives later failures.
    pub fn output(&self) -> Option<&T> {
        self.output.as_ref()
    }

    pub fn error(&self) -> Option<&DappError> {
        self.error.as_ref()
    }

    pub fn begin(&mut self, epoch: u64) -> Result<Ticket, DappError> {
        let (next, _) =
            action_transition(self.status, ActionTrigger::Begin).map_err(|_| DappError::ActionPending)?;
        self.next_id = self.next_id.wrapping_add(1);
        let ticket = Ticket {
            id: self.next_id,
            epoch,
        };
        self.status = next;
        self.in_flight = Some(ticket);
        self.error = None;
        Ok(ticket)
    }

    /// Completes without the epoch check, for actions whose own success is
    /// what moves the session epoch (enabling the extension).
    pub fn complete_unscoped(&mut self, ticket: Ticket, result: Result<T, DappError>) -> Completion {
        self.complete(ticket, ticket.epoch, result)
    }

    pub fn complete(
        &mut self,
        ticket: Ticket,
        current_epoch: u64,
        result: Result<T, DappError>,
    ) -> Completion {
        if self.in_flight != Some(ticket) {
            return Completion::Unknown;
        }
        self.in_flight = None;

        if ticket.epoch != current_epoch {
            self.transition(ActionTrigger::Reset);
            return Completion::Stale;
        }

        match result {
            Ok(value) => {
                self.transition(ActionTrigger::Succeed);
                self.output = Some(value);
            }
            Err(e) => {
                self.transition(ActionTrigger::Fail);
                self.error = Some(e);
            }
        }
        Completion::Applied
    }

    /// Close the inline error notice.
    pub fn dismiss_error(&mut self) {
        if self.status == ActionStatus::Failed {
            self.transition(ActionTrigger::Reset);
        }
        self.error = None;
    }

    fn transition(&mut self, trigger: ActionTrigger) {
        match action_transition(self.status, trigger) {
            Ok((next, _)) => self.status = next,
            Err(e) => tracing::warn!(error = %e, "action transition rejected"),
        }
    }
}
