//! UI helper components

use alloy::primitives::Address;
use eframe::egui;

const ACCENT: egui::Color32 = egui::Color32::from_rgb(0, 180, 150);

/// Block explorer base URL for the chains the collection has been deployed to.
pub fn explorer_base_url(chain_id: u64) -> &'static str {
    match chain_id {
        1 => "https://etherscan.io",
        4 => "https://rinkeby.etherscan.io",
        5 => "https://goerli.etherscan.io",
        11_155_111 => "https://sepolia.etherscan.io",
        // Fallback
        _ => "https://etherscan.io",
    }
}

pub fn get_explorer_address_url(chain_id: u64, address: &Address) -> String {
    format!("{}/address/{}", explorer_base_url(chain_id), address)
}

pub fn open_url_new_tab(url: &str) {
    if let Err(e) = open::that(url) {
        tracing::warn!(url, error = %e, "failed to open browser");
    }
}

/// Styled heading with accent color
pub fn styled_heading(ui: &mut egui::Ui, text: &str) {
    ui.heading(
        egui::RichText::new(text)
            .size(28.0)
            .color(egui::Color32::from_rgb(0, 212, 170)),
    );
}

/// Primary action button - teal/accent colored, prominent
pub fn primary_button(ui: &mut egui::Ui, text: &str) -> egui::Response {
    let btn = egui::Button::new(egui::RichText::new(text).size(15.0).color(egui::Color32::WHITE))
        .min_size(egui::vec2(200.0, 40.0))
        .fill(ACCENT);
    ui.add(btn)
}

/// Non-clickable status shown in place of a button
pub fn status_badge(ui: &mut egui::Ui, text: &str) {
    egui::Frame::none()
        .fill(ui.visuals().faint_bg_color)
        .stroke(egui::Stroke::new(1.0, ACCENT))
        .rounding(4.0)
        .inner_margin(egui::Margin::symmetric(16.0, 10.0))
        .show(ui, |ui| {
            ui.label(egui::RichText::new(text).size(15.0));
        });
}

/// Loading indicator with the page's loading text
pub fn loading_spinner(ui: &mut egui::Ui, text: &str) {
    ui.horizontal(|ui| {
        ui.spinner();
        ui.label(egui::RichText::new(text).size(15.0));
    });
}

/// Render content in a subtle card/frame
pub fn card(ui: &mut egui::Ui, add_contents: impl FnOnce(&mut egui::Ui)) {
    egui::Frame::none()
        .fill(ui.visuals().faint_bg_color)
        .rounding(6.0)
        .inner_margin(12.0)
        .show(ui, add_contents);
}

/// Render an address as a clickable hyperlink that opens in block explorer
pub fn address_link(ui: &mut egui::Ui, chain_id: u64, address: &Address) -> egui::Response {
    let response = ui
        .link(egui::RichText::new(address.to_string()).monospace().small())
        .on_hover_text("Open in block explorer");
    if response.clicked() {
        open_url_new_tab(&get_explorer_address_url(chain_id, address));
    }
    response
}
