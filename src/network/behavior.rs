use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::time::Duration;

use libp2p::gossipsub::{self, IdentTopic};
use libp2p::swarm::NetworkBehaviour;
use libp2p::{identify, identity, ping};

use crate::error::{ChatError, Result};

pub const PROTOCOL_VERSION: &str = "room-chat/1.0.0";

/// Behaviour shared by clients and relay nodes.
#[derive(NetworkBehaviour)]
pub struct RelayBehavior {
    pub gossipsub: gossipsub::Behaviour,
    pub identify: identify::Behaviour,
    pub ping: ping::Behaviour,
}

/// Builds the behaviour and subscribes it to the relay topic.
pub fn build_behavior(
    local_key: &identity::Keypair,
    topic_name: &str,
) -> Result<(RelayBehavior, IdentTopic)> {
    // Identical payloads from the same author must stay distinct messages,
    // so the sequence number is part of the id.
    let message_id_fn = |message: &gossipsub::Message| {
        let mut hasher = DefaultHasher::new();
        message.source.hash(&mut hasher);
        message.sequence_number.hash(&mut hasher);
        message.data.hash(&mut hasher);
        gossipsub::MessageId::from(hasher.finish().to_string())
    };

    let gossipsub_config = gossipsub::ConfigBuilder::default()
        .heartbeat_interval(Duration::from_secs(5))
        .validation_mode(gossipsub::ValidationMode::Strict)
        .message_id_fn(message_id_fn)
        .build()
        .map_err(ChatError::network)?;

    let mut gossipsub = gossipsub::Behaviour::new(
        gossipsub::MessageAuthenticity::Signed(local_key.clone()),
        gossipsub_config,
    )
    .map_err(ChatError::network)?;

    let topic = IdentTopic::new(topic_name);
    gossipsub.subscribe(&topic).map_err(ChatError::network)?;

    let identify_config = identify::Config::new(PROTOCOL_VERSION.to_string(), local_key.public());
    let identify = identify::Behaviour::new(identify_config);
    let ping = ping::Behaviour::new(ping::Config::default());

    Ok((
        RelayBehavior {
            gossipsub,
            identify,
            ping,
        },
        topic,
    ))
}
