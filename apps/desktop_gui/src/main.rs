mod backend_bridge;
mod controller;
mod ui;

use clap::Parser;
use client_core::{resolve_server_url, SERVER_URL_ENV};
use crossbeam_channel::bounded;
use eframe::egui;
use tracing_subscriber::EnvFilter;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;
use crate::ui::RosterDeskApp;

#[derive(Parser, Debug)]
#[command(about = "Desktop client for the activity signup service")]
struct Cli {
    /// Base url of the signup server; falls back to ROSTER_SERVER_URL, then
    /// the default local bind.
    #[arg(long)]
    server_url: Option<String>,
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let env_url = std::env::var(SERVER_URL_ENV).ok();
    let server_url = resolve_server_url(cli.server_url.as_deref(), env_url.as_deref());
    tracing::info!(%server_url, "starting roster desk");

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(256);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(2048);
    backend_bridge::runtime::launch(server_url, cmd_rx, ui_tx);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Activity Roster Desk")
            .with_inner_size([900.0, 720.0])
            .with_min_inner_size([640.0, 480.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Activity Roster Desk",
        options,
        Box::new(|_cc| Ok(Box::new(RosterDeskApp::new(cmd_tx, ui_rx)))),
    )
}
