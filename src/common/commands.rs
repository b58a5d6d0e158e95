use super::events::OutboundEvent;

/// Commands the UI sends down to the network task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkCommand {
    /// Publish an event. The first `JoinRoom` opens the relay connection.
    Emit(OutboundEvent),
    /// Close the relay connection and forget the joined room.
    Disconnect,
}
