//! Main application state and update loop

use std::time::Duration;

use bsc_dapp_core::{ActionSlot, Completion, DappError, SessionView, SessionWatcher, Ticket};
use eframe::egui;

use crate::dapp_bridge::{take, DappBridge, Mailboxes};
use crate::state::PageState;
use crate::ui;
use crate::view::{ActionKind, DappView, Intent, ThemeKind};

/// Wallet notifications are polled, so keep frames coming while idle.
const EVENT_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// The main application state
pub struct App {
    bridge: DappBridge,
    watcher: SessionWatcher,
    session: SessionView,
    page: PageState,
    mailboxes: Mailboxes,
}

impl App {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let bridge = DappBridge::default();
        let mut page = PageState::default();

        let (watcher, session) = match bridge.mount() {
            Ok(mounted) => mounted,
            Err(e) => {
                tracing::warn!(error = %e, "failed to subscribe to wallet notifications");
                page.set_error(format!("Wallet notifications unavailable: {e}"));
                (SessionWatcher::default(), SessionView::default())
            }
        };

        Self {
            bridge,
            watcher,
            session,
            page,
            mailboxes: Mailboxes::default(),
        }
    }

    fn poll_session(&mut self) {
        match self.bridge.poll(&self.watcher, &mut self.session) {
            Ok(0) => {}
            Ok(applied) => {
                tracing::debug!(applied, state = ?self.session.state, "wallet notifications applied")
            }
            Err(e) => tracing::warn!(error = %e, "failed to drain wallet notifications"),
        }
    }

    fn drain_mailboxes(&mut self) {
        let epoch = self.session.epoch;

        if let Some((ticket, result)) = take(&self.mailboxes.enable) {
            log_completion(ActionKind::Enable, self.page.complete_enable(ticket, result));
        }

        let actions = &mut self.page.actions;
        if let Some((ticket, result)) = take(&self.mailboxes.sign) {
            log_completion(ActionKind::Sign, actions.sign.complete(ticket, epoch, result));
        }
        if let Some((ticket, result)) = take(&self.mailboxes.query) {
            log_completion(ActionKind::Query, actions.query.complete(ticket, epoch, result));
        }
        if let Some((ticket, result)) = take(&self.mailboxes.transfer) {
            let completion = self.page.complete_transfer(ticket, epoch, result);
            if let (Completion::Applied, Some(hash)) = (completion, self.page.transfer_form.tx_hash) {
                self.page.set_info(format!("Transfer submitted: {hash}"));
            }
            log_completion(ActionKind::Transfer, completion);
        }
        if let Some((ticket, result)) = take(&self.mailboxes.mint) {
            let completion = self.page.complete_mint(ticket, epoch, result);
            if let (Completion::Applied, Some(hash)) = (completion, self.page.contract_form.tx_hash) {
                self.page.set_info(format!("Mint submitted: {hash}"));
            }
            log_completion(ActionKind::Mint, completion);
        }
    }

    fn apply(&mut self, ctx: &egui::Context, intent: Intent) {
        match intent {
            Intent::Run(kind) => self.run(ctx, kind),
            Intent::Dismiss(kind) => {
                let actions = &mut self.page.actions;
                match kind {
                    ActionKind::Enable => actions.enable.dismiss_error(),
                    ActionKind::Sign => actions.sign.dismiss_error(),
                    ActionKind::Transfer => actions.transfer.dismiss_error(),
                    ActionKind::Mint => actions.mint.dismiss_error(),
                    ActionKind::Query => actions.query.dismiss_error(),
                }
            }
        }
    }

    fn run(&mut self, ctx: &egui::Context, kind: ActionKind) {
        let epoch = self.session.epoch;
        let session = self.session.clone();
        let actions = &mut self.page.actions;
        let mailboxes = &self.mailboxes;

        match kind {
            ActionKind::Enable => {
                if let Some(ticket) = begin(&mut actions.enable, epoch, kind) {
                    self.bridge.enable(ctx, session, ticket, &mailboxes.enable);
                }
            }
            ActionKind::Sign => {
                if let Some(ticket) = begin(&mut actions.sign, epoch, kind) {
                    self.bridge.sign(ctx, session, ticket, &mailboxes.sign);
                }
            }
            ActionKind::Transfer => {
                if let Some(ticket) = begin(&mut actions.transfer, epoch, kind) {
                    let form = &self.page.transfer_form;
                    self.bridge.transfer(
                        ctx,
                        session,
                        form.to.clone(),
                        form.amount.clone(),
                        ticket,
                        &mailboxes.transfer,
                    );
                }
            }
            ActionKind::Mint => {
                if let Some(ticket) = begin(&mut actions.mint, epoch, kind) {
                    let form = &self.page.contract_form;
                    self.bridge.mint(
                        ctx,
                        session,
                        form.contract.clone(),
                        form.receiver.clone(),
                        form.amount.clone(),
                        ticket,
                        &mailboxes.mint,
                    );
                }
            }
            ActionKind::Query => {
                if let Some(ticket) = begin(&mut actions.query, epoch, kind) {
                    self.bridge
                        .balance_and_history(ctx, session, ticket, &mailboxes.query);
                }
            }
        }
    }

    fn render_notice(&mut self, ui: &mut egui::Ui) {
        if let Some(error) = self.page.last_error.clone() {
            if ui::dismissible_error(ui, &error) {
                self.page.clear_notice();
            }
        } else if let Some(info) = &self.page.last_info {
            ui::success_message(ui, info);
        }
    }
}

fn begin<T>(slot: &mut ActionSlot<T>, epoch: u64, kind: ActionKind) -> Option<Ticket> {
    match slot.begin(epoch) {
        Ok(ticket) => {
            tracing::info!(action = ?kind, ticket = ticket.id, epoch, "action started");
            Some(ticket)
        }
        Err(DappError::ActionPending) => {
            tracing::debug!(action = ?kind, "action already in flight");
            None
        }
        Err(e) => {
            tracing::warn!(action = ?kind, error = %e, "action refused");
            None
        }
    }
}

fn log_completion(kind: ActionKind, completion: Completion) {
    match completion {
        Completion::Applied => tracing::info!(action = ?kind, "action completed"),
        Completion::Stale => {
            tracing::warn!(action = ?kind, "session changed while in flight; response dropped")
        }
        Completion::Unknown => tracing::warn!(action = ?kind, "unexpected completion ignored"),
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.set_visuals(egui::Visuals::dark());

        self.poll_session();
        self.drain_mailboxes();

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.add_space(8.0);
            ui.horizontal(|ui| {
                ui.heading(
                    egui::RichText::new("BSC dApp")
                        .size(22.0)
                        .color(ui::ACCENT),
                );
                ui.add_space(30.0);
                ui.separator();
                ui.label("Theme:");
                for kind in ThemeKind::ALL {
                    ui.selectable_value(&mut self.page.theme, kind, kind.theme().name());
                }
            });
            ui.add_space(4.0);
        });

        egui::TopBottomPanel::bottom("footer").show(ctx, |ui| {
            ui.label(
                egui::RichText::new(format!(
                    "build {} ({})",
                    env!("GIT_HASH"),
                    env!("BUILD_TIME")
                ))
                .weak()
                .small(),
            );
        });

        let mut intents = Vec::new();
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.add_space(10.0);
                self.render_notice(ui);
                let theme = self.page.theme.theme();
                intents = DappView::new(theme, &self.session).show(ui, &mut self.page);
                ui.add_space(20.0);
            });
        });

        for intent in intents {
            self.apply(ctx, intent);
        }

        ctx.request_repaint_after(EVENT_POLL_INTERVAL);
    }
}

impl Drop for App {
    fn drop(&mut self) {
        if !self.watcher.is_mounted() {
            return;
        }
        if let Err(e) = self.bridge.unmount(&mut self.watcher) {
            tracing::warn!(error = %e, "failed to release wallet subscriptions");
        }
    }
}
