use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Result;

pub const DEFAULT_CONFIG_PATH: &str = "config/room_chat.json";
pub const DEFAULT_TOPIC: &str = "room-chat-relay";
pub const DEFAULT_LISTEN_PORT: u16 = 4001;
pub const DEFAULT_CHANNEL_CAPACITY: usize = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Relay multiaddrs ending in `/p2p/<PeerId>`.
    pub relay_nodes: Vec<String>,
    /// Gossipsub topic every room is multiplexed on.
    pub topic: String,
    /// TCP port of `relay` mode.
    pub listen_port: u16,
    /// Capacity of the UI <-> network channels.
    pub channel_capacity: usize,
    /// Seconds an idle relay connection is kept open.
    pub idle_timeout_secs: u64,
    /// Avatar reference attached to messages sent from this client.
    pub avatar: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            relay_nodes: Vec::new(),
            topic: DEFAULT_TOPIC.to_string(),
            listen_port: DEFAULT_LISTEN_PORT,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            idle_timeout_secs: 300,
            avatar: None,
        }
    }
}

impl AppConfig {
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }

    /// Replaces values the runtime cannot use with their defaults.
    fn sanitized(mut self) -> Self {
        if self.channel_capacity == 0 {
            log::warn!(
                "channel_capacity must be at least 1; using {DEFAULT_CHANNEL_CAPACITY}"
            );
            self.channel_capacity = DEFAULT_CHANNEL_CAPACITY;
        }
        self
    }
}

pub fn load_config(path: impl AsRef<Path>) -> AppConfig {
    let path = path.as_ref();
    match fs::read_to_string(path) {
        Ok(content) => match serde_json::from_str::<AppConfig>(&content) {
            Ok(config) => config.sanitized(),
            Err(err) => {
                log::warn!("Failed to parse config file {}: {err}", path.display());
                AppConfig::default()
            }
        },
        Err(err) => {
            log::info!(
                "Config file {} not found ({err}); using defaults",
                path.display()
            );
            AppConfig::default()
        }
    }
}

pub fn save_config(path: impl AsRef<Path>, config: &AppConfig) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(config)?;
    fs::write(path, json)?;
    Ok(())
}

/// Moves `entry` to the front of the relay list, adding it if missing.
pub fn persist_relay_node(path: impl AsRef<Path>, entry: &str) {
    let path = path.as_ref();
    let mut config = load_config(path);
    config.relay_nodes.retain(|node| node != entry);
    config.relay_nodes.insert(0, entry.to_string());

    if let Err(err) = save_config(path, &config) {
        log::error!("Failed to write relay config {}: {err}", path.display());
    } else {
        log::info!("Persisted relay node {} to {}", entry, path.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(dir.path().join("absent.json"));

        assert_eq!(config, AppConfig::default());
        assert_eq!(config.topic, DEFAULT_TOPIC);
    }

    #[test]
    fn broken_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();

        assert_eq!(load_config(&path), AppConfig::default());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partial.json");
        fs::write(&path, r#"{"relay_nodes": ["/ip4/127.0.0.1/tcp/4001"]}"#).unwrap();

        let config = load_config(&path);
        assert_eq!(config.relay_nodes, ["/ip4/127.0.0.1/tcp/4001"]);
        assert_eq!(config.listen_port, DEFAULT_LISTEN_PORT);
        assert_eq!(config.idle_timeout(), Duration::from_secs(300));
    }

    #[test]
    fn zero_channel_capacity_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("zero.json");
        fs::write(&path, r#"{"channel_capacity": 0}"#).unwrap();

        let config = load_config(&path);
        assert_eq!(config.channel_capacity, DEFAULT_CHANNEL_CAPACITY);

        let (tx, mut rx) = tokio::sync::mpsc::channel::<u8>(config.channel_capacity);
        tx.try_send(1).unwrap();
        assert_eq!(rx.try_recv().unwrap(), 1);
    }

    #[test]
    fn persist_moves_entry_to_front() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("room_chat.json");

        persist_relay_node(&path, "/ip4/10.0.0.1/tcp/4001/p2p/a");
        persist_relay_node(&path, "/ip4/10.0.0.2/tcp/4001/p2p/b");
        persist_relay_node(&path, "/ip4/10.0.0.1/tcp/4001/p2p/a");

        assert_eq!(
            load_config(&path).relay_nodes,
            [
                "/ip4/10.0.0.1/tcp/4001/p2p/a",
                "/ip4/10.0.0.2/tcp/4001/p2p/b"
            ]
        );
    }
}
