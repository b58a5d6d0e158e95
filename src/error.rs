//! Error types for the chat client and relay node.

use thiserror::Error;

/// Main error type of the crate.
#[derive(Error, Debug)]
pub enum ChatError {
    /// Join attempted without a room name
    #[error("room name must not be empty")]
    EmptyRoomName,

    /// Join attempted without a display name
    #[error("display name must not be empty")]
    EmptyDisplayName,

    /// Join attempted while a room is already joined
    #[error("already joined room `{0}`")]
    AlreadyJoined(String),

    /// Operation requires a joined room
    #[error("not joined to any room")]
    NotJoined,

    /// Multiaddr could not be parsed or lacks a peer id
    #[error("invalid relay address `{address}`: {reason}")]
    InvalidAddress { address: String, reason: String },

    /// libp2p setup or publish error
    #[error("network error: {0}")]
    Network(String),

    /// Identity key could not be encoded or decoded
    #[error("identity error: {0}")]
    Identity(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ChatError {
    pub fn network(err: impl std::fmt::Display) -> Self {
        Self::Network(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ChatError>;
