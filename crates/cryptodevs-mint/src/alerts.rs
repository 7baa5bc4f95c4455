//! Alert queue shown as a modal dialog

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

use cryptodevs_mint_core::NotifierPort;
use eframe::egui;

/// Pending alerts, oldest first. Cloned into the controller as its notifier
/// and kept by the app to render them.
#[derive(Debug, Clone, Default)]
pub struct AlertQueue {
    inner: Arc<Mutex<AlertState>>,
}

#[derive(Debug, Default)]
struct AlertState {
    pending: VecDeque<String>,
    repaint: Option<egui::Context>,
}

impl AlertQueue {
    /// Lets background threads wake the UI when they push an alert.
    pub fn attach(&self, ctx: &egui::Context) {
        self.lock().repaint = Some(ctx.clone());
    }

    pub fn current(&self) -> Option<String> {
        self.lock().pending.front().cloned()
    }

    pub fn dismiss(&self) {
        self.lock().pending.pop_front();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, AlertState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl NotifierPort for AlertQueue {
    fn alert(&self, message: &str) {
        let mut g = self.lock();
        // The pollers hit the same wrong-network alert every tick.
        if g.pending.iter().any(|m| m == message) {
            return;
        }
        tracing::info!(message, "alert raised");
        g.pending.push_back(message.to_owned());
        if let Some(ctx) = &g.repaint {
            ctx.request_repaint();
        }
    }
}
