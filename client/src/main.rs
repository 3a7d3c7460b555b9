mod config;
mod constants;
mod game_dir;
mod join;
mod lobby;
mod maps;
mod notifications;
mod offline;
mod server;
mod state;
mod ui;

use clap::Parser;
use common::id_generator::generate_player_name;
use common::{GameFilter, log};
use eframe::egui;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

use lobby::lobby_task;
use notifications::NotificationService;
use offline::SimulatedServer;
use state::{CommandSender, SharedState};
use ui::LobbyApp;

const DISCONNECT_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Parser)]
#[command(name = "armada_client", about = "Armada multiplayer lobby client")]
struct Args {
    /// Callsign to use instead of the configured one.
    #[arg(long)]
    player_name: Option<String>,

    /// Path to the client config file.
    #[arg(long)]
    config: Option<String>,
}

fn resolve_player_name(
    args_name: Option<String>,
    config_manager: &config::ClientConfigManager,
) -> String {
    if let Some(name) = args_name {
        return name;
    }

    let config = config_manager.get_config().unwrap_or_default();
    if let Some(name) = config.player.name.clone() {
        return name;
    }

    let generated = generate_player_name();
    let mut updated = config;
    updated.player.name = Some(generated.clone());
    if let Err(e) = config_manager.set_config(&updated) {
        log!("Failed to persist generated player name: {}", e);
    }
    generated
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    common::logger::init_logger(Some("client".to_string()));

    let config_manager = Arc::new(config::get_config_manager(args.config.as_deref()));
    let config = match config_manager.get_config() {
        Ok(config) => config,
        Err(e) => {
            log!("Starting with default config: {}", e);
            Default::default()
        }
    };

    let player_name = resolve_player_name(args.player_name, &config_manager);
    log!("Starting as {}", player_name);

    let initial_filter = if config.games.show_private_games {
        GameFilter::open_games()
    } else {
        GameFilter::open_games().and(&GameFilter::without_password())
    };
    let shared_state = SharedState::new(initial_filter);
    let notifications = NotificationService::new();
    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let command_sender = CommandSender::new(command_tx);

    let server = SimulatedServer::new(player_name.clone());
    let shared_state_clone = shared_state.clone();
    let notifications_clone = notifications.clone();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async {
            lobby_task(server, shared_state_clone, notifications_clone, command_rx).await;
        });
    });

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1000.0, 720.0])
            .with_title(format!("Armada Lobby - {}", player_name)),
        ..Default::default()
    };

    eframe::run_native(
        "Armada Lobby",
        options,
        Box::new(move |_cc| {
            Ok(Box::new(LobbyApp::new(
                shared_state,
                command_sender,
                notifications,
                config_manager,
                DISCONNECT_TIMEOUT,
            )))
        }),
    )?;

    Ok(())
}
