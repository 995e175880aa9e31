mod alarm;
mod card;
mod client;
mod config;
mod controller;
mod error;
mod loading;
mod logging;
mod models;
mod notice;
mod results;
mod ui;

use anyhow::{Context, Result};
use clap::Parser;
use eframe::egui;
use std::sync::Arc;
use tracing::info;

fn main() -> Result<()> {
    let args = config::Args::parse();
    let cfg = config::ConsoleConfig::load(&args)?;
    logging::init(&cfg.logging);

    info!(
        "Starting OLT console against {} with {} OLT(s)",
        cfg.server.base_url,
        cfg.olts.len()
    );

    // Requests run on tokio while egui owns the main thread
    let runtime = tokio::runtime::Runtime::new().context("Failed to start tokio runtime")?;
    let _enter = runtime.enter();

    let api = Arc::new(
        client::HttpOltClient::new(&cfg.server.base_url, cfg.server.timeout())
            .context("Failed to build HTTP client")?,
    );
    let olts = cfg.olts.clone();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([720.0, 560.0])
            .with_title("OLT Console"),
        ..Default::default()
    };

    eframe::run_native(
        "OLT Console",
        options,
        Box::new(move |cc| {
            // Force light mode
            cc.egui_ctx.set_visuals(egui::Visuals::light());
            Box::new(ui::OnuConsoleApp::new(cc, api, olts))
        }),
    )
    .map_err(|e| anyhow::anyhow!("Failed to run application: {}", e))
}
