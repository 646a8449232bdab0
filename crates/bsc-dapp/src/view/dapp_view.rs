//! The demo page, rendered through a [`Theme`]

use bsc_dapp_core::{ActionSlot, NetworkDisplay, SessionView, MINT_METHOD, SIGN_MESSAGE};
use eframe::egui;

use super::Theme;
use crate::state::PageState;
use crate::ui;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Enable,
    Sign,
    Transfer,
    Mint,
    Query,
}

/// What the user asked for during one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Run(ActionKind),
    Dismiss(ActionKind),
}

/// Which parts of the page a session shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Visibility {
    pub enable_button: bool,
    pub account: bool,
    pub network: bool,
    pub actions: bool,
    /// Signing is one-shot: gone once a signature exists.
    pub sign_button: bool,
}

impl Visibility {
    pub fn for_page(session: &SessionView, page: &PageState) -> Self {
        let actions = session.actions_unlocked();
        Self {
            enable_button: session.enable_label().is_some(),
            account: session.account_text().is_some(),
            network: session.network_display().is_some(),
            actions,
            sign_button: actions && page.actions.sign.output().is_none(),
        }
    }
}

pub struct DappView<'a> {
    theme: &'a dyn Theme,
    session: &'a SessionView,
}

impl<'a> DappView<'a> {
    pub fn new(theme: &'a dyn Theme, session: &'a SessionView) -> Self {
        Self { theme, session }
    }

    pub fn show(&self, ui: &mut egui::Ui, page: &mut PageState) -> Vec<Intent> {
        let mut intents = Vec::new();
        let visible = Visibility::for_page(self.session, page);

        self.theme.status(ui, &self.session.status_text());
        if let Some(label) = self.session.enable_label() {
            ui.horizontal(|ui| {
                let pending = page.actions.enable.is_pending();
                if self.theme.button(ui, &label, !pending).clicked() {
                    intents.push(Intent::Run(ActionKind::Enable));
                }
                if pending {
                    ui.spinner();
                }
            });
            error_notice(ui, &page.actions.enable, ActionKind::Enable, &mut intents);
        }

        if visible.account {
            self.account_panel(ui, page, &mut intents);
        }
        if visible.network {
            self.network_line(ui);
        }
        if visible.actions {
            self.sign_panel(ui, page, visible.sign_button, &mut intents);
            self.transfer_panel(ui, page, &mut intents);
            self.contract_panel(ui, page, &mut intents);
        }
        intents
    }

    fn account_panel(&self, ui: &mut egui::Ui, page: &mut PageState, intents: &mut Vec<Intent>) {
        let account = self.session.account_text().unwrap_or_default();
        self.theme.panel(ui, "Account", &mut |ui| {
            self.theme.value(ui, "Current account", &account);
            ui.horizontal(|ui| {
                let pending = page.actions.query.is_pending();
                if self
                    .theme
                    .button(ui, "Get Balance and History", !pending)
                    .clicked()
                {
                    intents.push(Intent::Run(ActionKind::Query));
                }
                if pending {
                    ui.spinner();
                }
            });
            if let Some(report) = page.actions.query.output() {
                ui.label(format!(
                    "Balance: {}, {} transactions (details in the log)",
                    ui::format_bnb(report.balance),
                    report.history.len()
                ));
            }
            error_notice(ui, &page.actions.query, ActionKind::Query, intents);
        });
    }

    fn network_line(&self, ui: &mut egui::Ui) {
        match self.session.network_display() {
            Some(NetworkDisplay::Known(text)) => {
                ui.label(text);
            }
            Some(NetworkDisplay::Unconnected {
                message,
                help_text,
                help_url,
            }) => {
                ui.horizontal(|ui| {
                    ui.label(message);
                    ui.label("(");
                    if ui.link(help_text).clicked() {
                        ui::open_url_new_tab(help_url);
                    }
                    ui.label(")");
                });
            }
            None => {}
        }
    }

    fn sign_panel(
        &self,
        ui: &mut egui::Ui,
        page: &mut PageState,
        show_button: bool,
        intents: &mut Vec<Intent>,
    ) {
        self.theme.panel(ui, "Sign", &mut |ui| {
            self.theme.value(ui, "message", SIGN_MESSAGE);
            let signature = page
                .actions
                .sign
                .output()
                .map(|result| result.signature.to_string());
            self.theme
                .value(ui, "signature", signature.as_deref().unwrap_or_default());

            if show_button {
                ui.horizontal(|ui| {
                    let pending = page.actions.sign.is_pending();
                    if self.theme.button(ui, "Sign Message", !pending).clicked() {
                        intents.push(Intent::Run(ActionKind::Sign));
                    }
                    if pending {
                        ui.spinner();
                    }
                });
            }
            error_notice(ui, &page.actions.sign, ActionKind::Sign, intents);
        });
    }

    fn transfer_panel(&self, ui: &mut egui::Ui, page: &mut PageState, intents: &mut Vec<Intent>) {
        let network = self.session.network;
        self.theme.panel(ui, "Transfer", &mut |ui| {
            egui::Grid::new("transfer_form")
                .num_columns(2)
                .spacing([8.0, 6.0])
                .show(ui, |ui| {
                    ui.label("to:");
                    ui::address_input(ui, &mut page.transfer_form.to);
                    ui.end_row();
                    ui.label("amount:");
                    ui::number_input(ui, &mut page.transfer_form.amount, "Transfer amount");
                    ui.end_row();
                });

            ui.horizontal(|ui| {
                let pending = page.actions.transfer.is_pending();
                if self.theme.button(ui, "Transfer", !pending).clicked() {
                    intents.push(Intent::Run(ActionKind::Transfer));
                }
                if pending {
                    ui.spinner();
                }
            });
            if let Some(hash) = page.transfer_form.tx_hash {
                self.theme.value(ui, "tx", &hash.to_string());
                if ui.link("View on BscScan").clicked() {
                    ui::open_url_new_tab(&ui::explorer_tx_url(network, &hash));
                }
            }
            error_notice(ui, &page.actions.transfer, ActionKind::Transfer, intents);
        });
    }

    fn contract_panel(&self, ui: &mut egui::Ui, page: &mut PageState, intents: &mut Vec<Intent>) {
        let network = self.session.network;
        self.theme.panel(ui, "Contract", &mut |ui| {
            egui::Grid::new("contract_form")
                .num_columns(2)
                .spacing([8.0, 6.0])
                .show(ui, |ui| {
                    ui.label("contract:");
                    ui::address_input(ui, &mut page.contract_form.contract);
                    ui.end_row();
                    ui.label("method:");
                    ui.label(egui::RichText::new(MINT_METHOD).monospace());
                    ui.end_row();
                    ui.label("param1 (receiver):");
                    ui::address_input(ui, &mut page.contract_form.receiver);
                    ui.end_row();
                    ui.label("param2 (amount):");
                    ui::number_input(ui, &mut page.contract_form.amount, "Amount");
                    ui.end_row();
                });

            ui.horizontal(|ui| {
                let pending = page.actions.mint.is_pending();
                if self.theme.button(ui, "Execute", !pending).clicked() {
                    intents.push(Intent::Run(ActionKind::Mint));
                }
                if pending {
                    ui.spinner();
                }
            });
            if let Some(hash) = page.contract_form.tx_hash {
                self.theme.value(ui, "tx", &hash.to_string());
                if ui.link("View on BscScan").clicked() {
                    ui::open_url_new_tab(&ui::explorer_tx_url(network, &hash));
                }
            }
            error_notice(ui, &page.actions.mint, ActionKind::Mint, intents);
        });
    }
}

fn error_notice<T>(
    ui: &mut egui::Ui,
    slot: &ActionSlot<T>,
    kind: ActionKind,
    intents: &mut Vec<Intent>,
) {
    if let Some(error) = slot.error() {
        if ui::dismissible_error(ui, &error.to_string()) {
            intents.push(Intent::Dismiss(kind));
        }
    }
}
