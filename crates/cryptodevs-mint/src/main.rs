//! Crypto Devs: presale and public mint page for the Crypto Devs NFT collection

use cryptodevs_mint_adapters::AdapterConfig;
use eframe::egui;

mod alerts;
mod app;
mod mint_bridge;
mod ui;

fn main() -> eyre::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let config = AdapterConfig::from_env();
    tracing::info!(
        git_hash = env!("GIT_HASH"),
        endpoint = config.eip1193_url.as_deref().unwrap_or("disabled"),
        contract = %config.contract_address,
        chain_id = config.required_chain_id,
        "Starting Crypto Devs"
    );

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Crypto Devs")
            .with_inner_size([960.0, 620.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Crypto Devs",
        native_options,
        Box::new(move |cc| Ok(Box::new(app::App::new(cc, &config)?))),
    )
    .map_err(|e| eyre::eyre!("ui exited with error: {e}"))
}
