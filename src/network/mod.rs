pub mod address;
pub mod behavior;
pub mod client;
pub mod handle;
pub mod identity;
pub mod relay_node;
pub mod transport;

pub use address::parse_relay_peers;
pub use client::RelayClient;
pub use handle::{ChannelTransport, Transport};
pub use relay_node::RelayNode;
