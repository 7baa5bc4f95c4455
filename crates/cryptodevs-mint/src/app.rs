//! Main application state and update loop

use std::time::Duration;

use cryptodevs_mint_adapters::AdapterConfig;
use cryptodevs_mint_core::PageView;
use eframe::egui;

use crate::alerts::AlertQueue;
use crate::mint_bridge::{MintAction, MintBridge};
use crate::ui;

/// Flags change on background threads; keep the page fresh without input.
const IDLE_REPAINT: Duration = Duration::from_millis(500);

/// The main application state
pub struct App {
    bridge: MintBridge,
    alerts: AlertQueue,
}

impl App {
    pub fn new(cc: &eframe::CreationContext<'_>, config: &AdapterConfig) -> eyre::Result<Self> {
        egui_extras::install_image_loaders(&cc.egui_ctx);

        let alerts = AlertQueue::default();
        alerts.attach(&cc.egui_ctx);
        let mut bridge = MintBridge::new(config, alerts.clone())?;
        bridge.mount(&cc.egui_ctx);

        Ok(Self { bridge, alerts })
    }

    fn render_action(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        let view = self.bridge.controller().view();
        let action = match view {
            PageView::ConnectWallet => {
                ui::primary_button(ui, view.label()).clicked().then_some(MintAction::Connect)
            }
            PageView::Loading => {
                ui::loading_spinner(ui, view.label());
                None
            }
            PageView::StartPresale => ui::primary_button(ui, view.label())
                .clicked()
                .then_some(MintAction::StartPresale),
            PageView::PresaleNotStarted => {
                ui::status_badge(ui, view.label());
                None
            }
            PageView::PresaleMint => {
                ui.label(
                    "Presale has Started!!!.. If your wallet address is whitelisted, Mint a Crypto Dev NFT",
                );
                ui.add_space(8.0);
                ui::primary_button(ui, view.label())
                    .clicked()
                    .then_some(MintAction::PresaleMint)
            }
            PageView::PublicMint => {
                ui::primary_button(ui, view.label()).clicked().then_some(MintAction::PublicMint)
            }
        };

        if let Some(action) = action {
            self.bridge.dispatch(action, ctx);
        }
    }

    fn render_footer(&mut self, ui: &mut egui::Ui) {
        let config = self.bridge.controller().config();
        let chain_id = config.required_chain_id;
        let contract = config.contract_address;
        let session = self.bridge.controller().session();

        ui.horizontal(|ui| {
            ui.label("Made with ❤ by Crypto Devs");
            ui.separator();
            ui.label("Contract:");
            ui::address_link(ui, chain_id, &contract);

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(
                    egui::RichText::new(format!("build {}", env!("GIT_HASH")))
                        .weak()
                        .small(),
                )
                .on_hover_text(env!("BUILD_TIME"));

                if let Some(account) = session.as_ref().and_then(|s| s.primary_account()) {
                    if ui.small_button("Disconnect").clicked() {
                        self.bridge.disconnect();
                    }
                    ui::address_link(ui, chain_id, &account);
                }
            });
        });
    }

    fn render_alert(&mut self, ctx: &egui::Context) {
        let Some(message) = self.alerts.current() else {
            return;
        };
        egui::Window::new("Alert")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .show(ctx, |ui| {
                ui.label(message);
                ui.add_space(8.0);
                ui.vertical_centered(|ui| {
                    if ui.button("OK").clicked() {
                        self.alerts.dismiss();
                    }
                });
            });
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.set_visuals(egui::Visuals::dark());
        ctx.request_repaint_after(IDLE_REPAINT);

        let alert_open = self.alerts.current().is_some();

        egui::TopBottomPanel::bottom("footer").show(ctx, |ui| {
            ui.add_space(4.0);
            ui.add_enabled_ui(!alert_open, |ui| self.render_footer(ui));
            ui.add_space(4.0);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_enabled_ui(!alert_open, |ui| {
                ui.columns(2, |cols| {
                    let (left, right) = cols.split_at_mut(1);
                    let left = &mut left[0];
                    left.add_space(40.0);
                    ui::styled_heading(left, "Welcome to Crypto Devs!");
                    left.add_space(8.0);
                    left.label(
                        egui::RichText::new("Its an NFT collection for developers in Crypto.")
                            .size(16.0),
                    );
                    left.add_space(8.0);
                    ui::card(left, |ui| {
                        ui.label(egui::RichText::new(self.bridge.controller().supply_line()).size(16.0));
                    });
                    left.add_space(16.0);
                    self.render_action(left, ctx);

                    right[0].add(
                        egui::Image::new(egui::include_image!("../assets/0.svg"))
                            .max_width(320.0),
                    );
                });
            });
        });

        self.render_alert(ctx);
    }
}
