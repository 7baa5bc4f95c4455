//! Bridge between the egui shell and the mint workspace crates.
//! All controller calls from the UI go through here so the render loop never
//! blocks on the wallet.

use std::sync::Arc;
use std::time::Duration;

use cryptodevs_mint_adapters::{AdapterConfig, Eip1193Adapter, SystemClockAdapter};
use cryptodevs_mint_core::{spawn_polling, MintController, PollHandle};
use eframe::egui;
use eyre::WrapErr;
use tokio::runtime::Runtime;

use crate::alerts::AlertQueue;

pub type ShellController = MintController<Eip1193Adapter, SystemClockAdapter, AlertQueue>;

/// User-triggered controller operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MintAction {
    Connect,
    StartPresale,
    PresaleMint,
    PublicMint,
}

pub struct MintBridge {
    controller: Arc<ShellController>,
    runtime: Option<Runtime>,
    polling: Option<PollHandle>,
    poll_interval: Duration,
}

impl MintBridge {
    pub fn new(config: &AdapterConfig, alerts: AlertQueue) -> eyre::Result<Self> {
        let mint_config = config.mint_config();
        let poll_interval = mint_config.poll_interval;
        let controller = MintController::new(
            Eip1193Adapter::with_config(config.clone()),
            SystemClockAdapter,
            alerts,
            mint_config,
        );
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("mint-poll")
            .enable_time()
            .build()
            .wrap_err("failed to start polling runtime")?;

        Ok(Self {
            controller: Arc::new(controller),
            runtime: Some(runtime),
            polling: None,
            poll_interval,
        })
    }

    pub fn controller(&self) -> &ShellController {
        &self.controller
    }

    /// Run the first-load sequence off the UI thread and start both watchers.
    pub fn mount(&mut self, ctx: &egui::Context) {
        let controller = Arc::clone(&self.controller);
        let ctx_for_task = ctx.clone();
        std::thread::spawn(move || {
            controller.mount();
            ctx_for_task.request_repaint();
        });

        if let Some(runtime) = &self.runtime {
            self.polling = Some(spawn_polling(
                Arc::clone(&self.controller),
                self.poll_interval,
                runtime.handle(),
            ));
            tracing::info!(interval_ms = self.poll_interval.as_millis() as u64, "polling started");
        }
    }

    pub fn dispatch(&mut self, action: MintAction, ctx: &egui::Context) {
        // After a disconnect the watchers are gone; connecting again is a fresh mount.
        if action == MintAction::Connect && self.polling.is_none() {
            self.mount(ctx);
            return;
        }

        tracing::debug!(?action, "dispatching");
        let controller = Arc::clone(&self.controller);
        let ctx = ctx.clone();
        std::thread::spawn(move || {
            // Failures are logged by the controller; the page keeps its state.
            let _ = match action {
                MintAction::Connect => controller.connect_wallet().map(|_| ()),
                MintAction::StartPresale => controller.start_presale().map(|_| ()),
                MintAction::PresaleMint => controller.presale_mint().map(|_| ()),
                MintAction::PublicMint => controller.public_mint().map(|_| ()),
            };
            ctx.request_repaint();
        });
    }

    /// Stop both watchers and dispose the wallet session.
    pub fn disconnect(&mut self) {
        if let Some(polling) = self.polling.take() {
            polling.cancel();
        }
        self.controller.disconnect();
    }
}

impl Drop for MintBridge {
    fn drop(&mut self) {
        self.polling.take();
        if let Some(runtime) = self.runtime.take() {
            // A poll tick may be blocked on the wallet; don't hold up exit for it.
            runtime.shutdown_timeout(Duration::from_millis(500));
        }
    }
}
