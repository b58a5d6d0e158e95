pub mod commands;
pub mod events;
pub mod types;

pub use commands::NetworkCommand;
pub use events::{InboundEvent, NetworkEvent, OutboundEvent};
pub use types::{ChatMessage, ConnectionState};
