//! View state owned by the update loop

use alloy::primitives::B256;
use bsc_dapp_core::{
    Account, ActionSlot, BalanceAndHistory, Completion, ContractCallForm, DappError,
    SignatureResult, Ticket, TransferForm,
};

use crate::view::ThemeKind;

/// One slot per page action.
#[derive(Debug, Default)]
pub struct ActionSlots {
    pub enable: ActionSlot<Account>,
    pub sign: ActionSlot<SignatureResult>,
    pub transfer: ActionSlot<B256>,
    pub mint: ActionSlot<B256>,
    pub query: ActionSlot<BalanceAndHistory>,
}

#[derive(Debug, Default)]
pub struct PageState {
    pub transfer_form: TransferForm,
    pub contract_form: ContractCallForm,
    pub actions: ActionSlots,
    pub theme: ThemeKind,
    pub last_error: Option<String>,
    pub last_info: Option<String>,
}

impl PageState {
    pub fn set_error(&mut self, message: impl Into<String>) {
        self.last_info = None;
        self.last_error = Some(message.into());
    }

    pub fn set_info(&mut self, message: impl Into<String>) {
        self.last_error = None;
        self.last_info = Some(message.into());
    }

    pub fn clear_notice(&mut self) {
        self.last_error = None;
        self.last_info = None;
    }

    /// The enable response arrives after its own `Enabled` notification has
    /// bumped the epoch, so it is never stale.
    pub fn complete_enable(
        &mut self,
        ticket: Ticket,
        result: Result<Account, DappError>,
    ) -> Completion {
        self.actions.enable.complete_unscoped(ticket, result)
    }

    /// Applies a transfer completion and mirrors the hash into the form.
    pub fn complete_transfer(
        &mut self,
        ticket: Ticket,
        epoch: u64,
        result: Result<B256, DappError>,
    ) -> Completion {
        let completion = self.actions.transfer.complete(ticket, epoch, result);
        if completion == Completion::Applied {
            self.transfer_form.tx_hash = self.actions.transfer.output().copied();
        }
        completion
    }

    pub fn complete_mint(
        &mut self,
        ticket: Ticket,
        epoch: u64,
        result: Result<B256, DappError>,
    ) -> Completion {
        let completion = self.actions.mint.complete(ticket, epoch, result);
        if completion == Completion::Applied {
            self.contract_form.tx_hash = self.actions.mint.output().copied();
        }
        completion
    }
}
