mod chat;
mod common;
mod config;
mod error;
mod network;
mod ui;

use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use tokio::signal;
use tokio::sync::mpsc;

use chat::ChatRoom;
use config::AppConfig;
use network::{ChannelTransport, RelayClient, RelayNode};
use ui::{AppState, ChatApp};

#[derive(Parser)]
#[command(name = "room_chat", version, about = "Room chat client and relay node")]
struct Cli {
    /// Path to JSON config file
    #[arg(long, default_value = config::DEFAULT_CONFIG_PATH, value_name = "FILE")]
    config: String,
    /// Prefill the room name of the join form
    #[arg(long)]
    room: Option<String>,
    /// Prefill the display name of the join form
    #[arg(long)]
    name: Option<String>,
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Subcommand, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Run a headless relay node (no UI)
    Relay,
}

#[tokio::main]
async fn main() -> Result<(), eframe::Error> {
    dotenv().ok();
    env_logger::init();

    let cli = Cli::parse();
    let app_config = config::load_config(&cli.config);

    if cli.mode == Some(Mode::Relay) {
        run_relay_node(app_config, cli.config.clone()).await;
        return Ok(());
    }

    run_client(app_config, AppState::new(cli.room, cli.name)).await
}

async fn run_relay_node(app_config: AppConfig, config_path: String) {
    let mut node = RelayNode::new(app_config, config_path);

    tokio::select! {
        result = node.run() => {
            if let Err(err) = result {
                log::error!("Relay node terminated unexpectedly: {err}");
            }
        }
        _ = signal::ctrl_c() => {
            log::info!("Received shutdown signal, stopping relay node...");
        }
    }

    log::info!("Final statistics: {} connected clients", node.connected_count());
}

async fn run_client(app_config: AppConfig, state: AppState) -> Result<(), eframe::Error> {
    let relay_peers = network::parse_relay_peers(&app_config.relay_nodes);
    if relay_peers.is_empty() {
        log::warn!("No relay nodes configured; run `room_chat relay` and update the config");
    }

    // UI -> network
    let (cmd_tx, cmd_rx) = mpsc::channel(app_config.channel_capacity);
    // Network -> UI
    let (event_tx, event_rx) = mpsc::channel(app_config.channel_capacity);

    let client = RelayClient::new(
        event_tx,
        cmd_rx,
        relay_peers,
        app_config.topic.clone(),
        app_config.idle_timeout(),
    );
    tokio::spawn(async move {
        if let Err(err) = client.run().await {
            log::error!("Network client terminated: {err}");
        }
    });

    let options = eframe::NativeOptions::default();
    let avatar = app_config.avatar.clone();

    eframe::run_native(
        "Room Chat",
        options,
        Box::new(move |cc| {
            let room = ChatRoom::new(ChannelTransport::new(cmd_tx)).with_avatar(avatar);
            Ok(Box::new(ChatApp::new(cc, state, room, event_rx)))
        }),
    )
}
