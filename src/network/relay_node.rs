use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

use futures::StreamExt;
use libp2p::gossipsub;
use libp2p::multiaddr::Protocol;
use libp2p::swarm::{Config as SwarmConfig, SwarmEvent};
use libp2p::{Multiaddr, PeerId, Swarm, identify};
use tokio::time::{Duration, interval};

use crate::common::OutboundEvent;
use crate::config::{self, AppConfig};
use crate::error::{ChatError, Result};

use super::behavior::{RelayBehaviorEvent, build_behavior};
use super::identity::load_or_generate_key;
use super::transport::build_transport;

const RELAY_KEY_PATH: &str = "data/relay_key.pk";
const STATS_INTERVAL: Duration = Duration::from_secs(30);

/// Headless node every client dials. Subscribed to the relay topic, so
/// gossipsub forwards room events between its connected clients.
pub struct RelayNode {
    config: AppConfig,
    config_path: PathBuf,
    connected: HashSet<PeerId>,
    /// Join announcements seen per room.
    joins: HashMap<String, usize>,
}

impl RelayNode {
    pub fn new(config: AppConfig, config_path: impl Into<PathBuf>) -> Self {
        Self {
            config,
            config_path: config_path.into(),
            connected: HashSet::new(),
            joins: HashMap::new(),
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        let local_key = load_or_generate_key(RELAY_KEY_PATH)?;
        let local_peer_id = PeerId::from(local_key.public());
        log::info!("Relay node PeerID: {local_peer_id}");

        let transport = build_transport(&local_key)?;
        let (behavior, _topic) = build_behavior(&local_key, &self.config.topic)?;

        let mut swarm = Swarm::new(
            transport,
            behavior,
            local_peer_id,
            SwarmConfig::with_tokio_executor()
                .with_idle_connection_timeout(self.config.idle_timeout()),
        );

        let listen_addr: Multiaddr = format!("/ip4/0.0.0.0/tcp/{}", self.config.listen_port)
            .parse()
            .map_err(ChatError::network)?;
        swarm
            .listen_on(listen_addr)
            .map_err(ChatError::network)?;
        log::info!(
            "Relay node started on tcp/{}, topic `{}`",
            self.config.listen_port,
            self.config.topic
        );

        let mut stats_interval = interval(STATS_INTERVAL);

        loop {
            tokio::select! {
                event = swarm.select_next_some() => {
                    self.handle_swarm_event(event, local_peer_id);
                }
                _ = stats_interval.tick() => {
                    log::info!(
                        "Statistics: {} connected clients, {} rooms announced",
                        self.connected_count(),
                        self.joins.len()
                    );
                }
            }
        }
    }

    fn handle_swarm_event(&mut self, event: SwarmEvent<RelayBehaviorEvent>, local_peer_id: PeerId) {
        match event {
            SwarmEvent::NewListenAddr { address, .. } => {
                log::info!("Listening on {address}");
                let entry = address.with(Protocol::P2p(local_peer_id));
                config::persist_relay_node(&self.config_path, &entry.to_string());
            }
            SwarmEvent::ConnectionEstablished { peer_id, .. } => {
                if self.connected.insert(peer_id) {
                    log::info!("Client connected: {peer_id}");
                }
            }
            SwarmEvent::ConnectionClosed {
                peer_id,
                num_established,
                ..
            } => {
                if num_established == 0 && self.connected.remove(&peer_id) {
                    log::info!("Client disconnected: {peer_id}");
                }
            }
            SwarmEvent::Behaviour(RelayBehaviorEvent::Gossipsub(gossipsub::Event::Message {
                message,
                ..
            })) => self.record_relayed(&message.data),
            SwarmEvent::Behaviour(RelayBehaviorEvent::Identify(identify::Event::Received {
                peer_id,
                info,
                ..
            })) => {
                log::debug!("Identify info from {peer_id}: agent={}", info.agent_version);
            }
            _ => {}
        }
    }

    fn record_relayed(&mut self, payload: &[u8]) {
        match OutboundEvent::from_bytes(payload) {
            Ok(OutboundEvent::JoinRoom { room, username }) => {
                log::info!("{username} joined room {room}");
                *self.joins.entry(room).or_insert(0) += 1;
            }
            Ok(OutboundEvent::Message { room, sender, .. }) => {
                log::debug!("Relayed message from {sender} in room {room}");
            }
            Err(err) => log::debug!("Relayed undecodable payload: {err}"),
        }
    }

    pub fn connected_count(&self) -> usize {
        self.connected.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node() -> RelayNode {
        RelayNode::new(AppConfig::default(), "unused.json")
    }

    #[test]
    fn join_announcements_are_counted_per_room() {
        let mut node = node();
        let join = |room: &str, user: &str| {
            OutboundEvent::JoinRoom {
                room: room.into(),
                username: user.into(),
            }
            .to_bytes()
            .unwrap()
        };

        node.record_relayed(&join("room-1", "alice"));
        node.record_relayed(&join("room-1", "bob"));
        node.record_relayed(&join("room-2", "carol"));
        node.record_relayed(b"not json");

        assert_eq!(node.joins.get("room-1"), Some(&2));
        assert_eq!(node.joins.get("room-2"), Some(&1));
    }

    #[test]
    fn messages_do_not_count_as_joins() {
        let mut node = node();
        let message = OutboundEvent::Message {
            room: "room-1".into(),
            message: "hi".into(),
            sender: "alice".into(),
        };

        node.record_relayed(&message.to_bytes().unwrap());
        assert!(node.joins.is_empty());
        assert_eq!(node.connected_count(), 0);
    }
}
