//! Bridge between the egui shell and the dapp workspace crates.
//! This must remain the only shell-facing boundary for wallet operations.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;

use alloy::primitives::B256;
use eframe::egui;

use bsc_dapp_adapters::{BscScanAdapter, DappAdapterConfig, Eip1193Adapter, JsonRpcAdapter, COIN_ABI};
use bsc_dapp_core::{
    Account, BalanceAndHistory, DappController, DappError, PortError, SessionView, SessionWatcher,
    SignatureResult, Ticket,
};

pub type Controller = DappController<Eip1193Adapter, JsonRpcAdapter, BscScanAdapter>;

/// How often a proxy wallet is asked for its accounts and chain.
#[cfg(not(target_arch = "wasm32"))]
const SNAPSHOT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Completion posted by a background action, drained by the update loop.
pub type Mailbox<T> = Arc<Mutex<Option<(Ticket, Result<T, DappError>)>>>;

#[derive(Debug, Default)]
pub struct Mailboxes {
    pub enable: Mailbox<Account>,
    pub sign: Mailbox<SignatureResult>,
    pub transfer: Mailbox<B256>,
    pub mint: Mailbox<B256>,
    pub query: Mailbox<BalanceAndHistory>,
}

/// Takes a posted completion, if any.
pub fn take<T>(mailbox: &Mailbox<T>) -> Option<(Ticket, Result<T, DappError>)> {
    match mailbox.lock() {
        Ok(mut guard) => guard.take(),
        Err(e) => {
            tracing::warn!(error = %e, "mailbox lock poisoned");
            None
        }
    }
}

fn deliver<T>(mailbox: &Mailbox<T>, ticket: Ticket, result: Result<T, DappError>) {
    match mailbox.lock() {
        Ok(mut guard) => *guard = Some((ticket, result)),
        Err(e) => tracing::warn!(error = %e, "mailbox lock poisoned; dropping completion"),
    }
}

#[derive(Clone)]
pub struct DappBridge {
    controller: Arc<Controller>,
    #[cfg(not(target_arch = "wasm32"))]
    runtime: Option<Arc<tokio::runtime::Runtime>>,
    poller_stop: Arc<AtomicBool>,
}

impl Default for DappBridge {
    fn default() -> Self {
        Self::with_config(DappAdapterConfig::from_env())
    }
}

impl DappBridge {
    pub fn with_config(config: DappAdapterConfig) -> Self {
        let controller = DappController::new(
            Eip1193Adapter::with_config(config.clone()),
            JsonRpcAdapter::new(&config),
            BscScanAdapter::new(&config),
            COIN_ABI,
        );

        #[cfg(not(target_arch = "wasm32"))]
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("bsc-dapp-actions")
            .enable_all()
            .build()
            .map_err(|e| tracing::warn!(error = %e, "failed to start action runtime; using plain threads"))
            .ok()
            .map(Arc::new);

        Self {
            controller: Arc::new(controller),
            #[cfg(not(target_arch = "wasm32"))]
            runtime,
            poller_stop: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn mount(&self) -> Result<(SessionWatcher, SessionView), PortError> {
        let mounted = self.controller.mount()?;
        #[cfg(not(target_arch = "wasm32"))]
        self.start_snapshot_poller();
        Ok(mounted)
    }

    pub fn poll(&self, watcher: &SessionWatcher, view: &mut SessionView) -> Result<usize, PortError> {
        self.controller.poll(watcher, view)
    }

    pub fn unmount(&self, watcher: &mut SessionWatcher) -> Result<(), PortError> {
        self.poller_stop.store(true, Ordering::Relaxed);
        self.controller.unmount(watcher)
    }

    /// Refreshes the proxy wallet snapshot off the UI thread until unmount.
    /// The update loop then only drains queued notifications.
    #[cfg(not(target_arch = "wasm32"))]
    fn start_snapshot_poller(&self) {
        if !self.controller.wallet.polls_snapshot() {
            return;
        }
        let controller = Arc::clone(&self.controller);
        let stop = Arc::clone(&self.poller_stop);
        let task = move || {
            tracing::debug!("wallet snapshot poller started");
            while !stop.load(Ordering::Relaxed) {
                if let Err(e) = controller.wallet.refresh_snapshot() {
                    tracing::warn!(error = %e, "eip1193 proxy snapshot refresh failed");
                }
                std::thread::sleep(SNAPSHOT_POLL_INTERVAL);
            }
            tracing::debug!("wallet snapshot poller stopped");
        };
        match &self.runtime {
            Some(runtime) => {
                runtime.spawn_blocking(task);
            }
            None => {
                std::thread::spawn(task);
            }
        }
    }

    pub fn enable(&self, ctx: &egui::Context, session: SessionView, ticket: Ticket, mailbox: &Mailbox<Account>) {
        #[cfg(not(target_arch = "wasm32"))]
        self.spawn(ctx, ticket, mailbox, move |c| c.enable(&session));

        #[cfg(target_arch = "wasm32")]
        self.spawn(ctx, ticket, mailbox, move |c| async move {
            if !session.installed {
                return Err(DappError::ExtensionNotInstalled);
            }
            c.wallet
                .wasm_enable_async()
                .await
                .map_err(DappError::from_enable)
        });
    }

    pub fn sign(
        &self,
        ctx: &egui::Context,
        session: SessionView,
        ticket: Ticket,
        mailbox: &Mailbox<SignatureResult>,
    ) {
        #[cfg(not(target_arch = "wasm32"))]
        self.spawn(ctx, ticket, mailbox, move |c| c.sign(&session));

        #[cfg(target_arch = "wasm32")]
        self.spawn(ctx, ticket, mailbox, move |c| async move {
            use bsc_dapp_core::SignRequest;

            let request = c.prepare_sign(&session)?;
            let signature = match &request {
                SignRequest::TypedData { fields, signer } => {
                    c.wallet
                        .wasm_sign_typed_data_async(fields, signer.address)
                        .await
                }
                SignRequest::Message { message, signer } => {
                    c.wallet
                        .wasm_sign_message_async(message, signer.address)
                        .await
                }
            }
            .map_err(DappError::from_sign)?;
            Ok::<_, DappError>(request.into_result(signature))
        });
    }

    pub fn transfer(
        &self,
        ctx: &egui::Context,
        session: SessionView,
        to: String,
        amount: String,
        ticket: Ticket,
        mailbox: &Mailbox<B256>,
    ) {
        #[cfg(not(target_arch = "wasm32"))]
        self.spawn(ctx, ticket, mailbox, move |c| c.transfer(&session, &to, &amount));

        #[cfg(target_arch = "wasm32")]
        self.spawn(ctx, ticket, mailbox, move |c| async move {
            let tx = c.prepare_transfer(&session, &to, &amount)?;
            tracing::info!(from = %tx.from, to = ?tx.to, value = %tx.value, "submitting transaction");
            c.wallet
                .wasm_send_transaction_async(&tx)
                .await
                .map_err(DappError::from_submit)
        });
    }

    #[allow(clippy::too_many_arguments)]
    pub fn mint(
        &self,
        ctx: &egui::Context,
        session: SessionView,
        contract: String,
        receiver: String,
        amount: String,
        ticket: Ticket,
        mailbox: &Mailbox<B256>,
    ) {
        #[cfg(not(target_arch = "wasm32"))]
        self.spawn(ctx, ticket, mailbox, move |c| {
            c.mint(&session, &contract, &receiver, &amount)
        });

        #[cfg(target_arch = "wasm32")]
        self.spawn(ctx, ticket, mailbox, move |c| async move {
            let tx = c.prepare_mint(&session, &contract, &receiver, &amount)?;
            tracing::info!(from = %tx.from, to = ?tx.to, "submitting contract call");
            c.wallet
                .wasm_send_transaction_async(&tx)
                .await
                .map_err(DappError::from_submit)
        });
    }

    pub fn balance_and_history(
        &self,
        ctx: &egui::Context,
        session: SessionView,
        ticket: Ticket,
        mailbox: &Mailbox<BalanceAndHistory>,
    ) {
        #[cfg(not(target_arch = "wasm32"))]
        self.spawn(ctx, ticket, mailbox, move |c| c.balance_and_history(&session));

        #[cfg(target_arch = "wasm32")]
        self.spawn(ctx, ticket, mailbox, move |c| async move {
            let account = c.query_account(&session)?;
            let balance = c
                .rpc
                .get_balance_async(account.address)
                .await
                .map_err(|e| DappError::Query(e.to_string()))?;
            tracing::debug!(address = %account.address, %balance, "Balance");
            let history = c
                .explorer
                .get_history_async(account.address)
                .await
                .map_err(|e| DappError::Query(e.to_string()))?;
            tracing::debug!(address = %account.address, txs = ?history, "TX History");
            Ok::<_, DappError>(BalanceAndHistory {
                address: account.address,
                balance,
                history,
            })
        });
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn spawn<T, F>(&self, ctx: &egui::Context, ticket: Ticket, mailbox: &Mailbox<T>, job: F)
    where
        T: Send + 'static,
        F: FnOnce(&Controller) -> Result<T, DappError> + Send + 'static,
    {
        let controller = Arc::clone(&self.controller);
        let mailbox = Arc::clone(mailbox);
        let ctx = ctx.clone();
        let task = move || {
            let result = job(&controller);
            deliver(&mailbox, ticket, result);
            ctx.request_repaint();
        };
        match &self.runtime {
            Some(runtime) => {
                runtime.spawn_blocking(task);
            }
            None => {
                std::thread::spawn(task);
            }
        }
    }

    #[cfg(target_arch = "wasm32")]
    fn spawn<T, F, Fut>(&self, ctx: &egui::Context, ticket: Ticket, mailbox: &Mailbox<T>, job: F)
    where
        T: 'static,
        F: FnOnce(Arc<Controller>) -> Fut + 'static,
        Fut: std::future::Future<Output = Result<T, DappError>> + 'static,
    {
        let controller = Arc::clone(&self.controller);
        let mailbox = Arc::clone(mailbox);
        let ctx = ctx.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let result = job(controller).await;
            deliver(&mailbox, ticket, result);
            ctx.request_repaint();
        });
    }
}
