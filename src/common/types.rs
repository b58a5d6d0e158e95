use std::fmt;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Author shown on notices generated by the relay (e.g. "user joined").
pub const SYSTEM_AUTHOR: &str = "System";

/// A single entry of the message list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub author: String,
    pub avatar: Option<String>,
    pub body: String,
    /// Stored only; nothing increments it.
    pub likes: u32,
    /// Unix timestamp in milliseconds.
    pub created_at: i64,
}

impl ChatMessage {
    pub fn new(author: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            author: author.into(),
            avatar: None,
            body: body.into(),
            likes: 0,
            created_at: Utc::now().timestamp_millis(),
        }
    }

    pub fn system(notice: impl Into<String>) -> Self {
        Self::new(SYSTEM_AUTHOR, notice)
    }

    pub fn with_avatar(mut self, avatar: Option<String>) -> Self {
        self.avatar = avatar;
        self
    }

    pub fn is_system(&self) -> bool {
        self.author == SYSTEM_AUTHOR
    }
}

/// State of the relay connection as reported by the network task.
///
/// There is no retry policy attached: `Failed` stays until the user leaves
/// and joins again.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
    Failed(String),
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionState::Disconnected => write!(f, "disconnected"),
            ConnectionState::Connecting => write!(f, "connecting"),
            ConnectionState::Connected => write!(f, "connected"),
            ConnectionState::Failed(reason) => write!(f, "failed: {reason}"),
        }
    }
}
