use serde::{Deserialize, Serialize};

use super::types::ConnectionState;

/// Event published to the relay. Serialized as
/// `{"event": "join_room", "data": {...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum OutboundEvent {
    JoinRoom {
        room: String,
        username: String,
    },
    Message {
        room: String,
        message: String,
        sender: String,
    },
}

impl OutboundEvent {
    pub fn room(&self) -> &str {
        match self {
            OutboundEvent::JoinRoom { room, .. } | OutboundEvent::Message { room, .. } => room,
        }
    }

    pub fn to_bytes(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }

    pub fn from_bytes(bytes: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(bytes)
    }

    /// Turns an event another peer published into what a member of
    /// `joined_room` gets to see. Events for other rooms yield `None`.
    pub fn into_inbound(self, joined_room: &str) -> Option<InboundEvent> {
        if self.room() != joined_room {
            return None;
        }
        match self {
            OutboundEvent::JoinRoom { username, .. } => Some(InboundEvent::UserJoined(
                format!("{username} has joined the room"),
            )),
            OutboundEvent::Message {
                message, sender, ..
            } => Some(InboundEvent::Message { sender, message }),
        }
    }
}

/// Event delivered by the relay to a joined client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    Message { sender: String, message: String },
    UserJoined(String),
}

/// Events from the network task up to the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkEvent {
    Inbound(InboundEvent),
    ConnectionChanged(ConnectionState),
}
