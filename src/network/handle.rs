use tokio::sync::mpsc;

use crate::common::{NetworkCommand, OutboundEvent};

/// Outbound side of the relay connection as seen by the chat room.
///
/// Fire-and-forget: implementations log failures instead of returning them.
pub trait Transport {
    fn emit(&mut self, event: OutboundEvent);
    fn disconnect(&mut self);
}

/// Transport handle that forwards to the network task over a channel.
pub struct ChannelTransport {
    command_sender: mpsc::Sender<NetworkCommand>,
}

impl ChannelTransport {
    pub fn new(command_sender: mpsc::Sender<NetworkCommand>) -> Self {
        Self { command_sender }
    }

    fn send_command(&self, command: NetworkCommand) {
        if let Err(err) = self.command_sender.try_send(command) {
            log::warn!("Failed to send command to network: {err}");
        }
    }
}

impl Transport for ChannelTransport {
    fn emit(&mut self, event: OutboundEvent) {
        self.send_command(NetworkCommand::Emit(event));
    }

    fn disconnect(&mut self) {
        self.send_command(NetworkCommand::Disconnect);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emit_forwards_to_network_task() {
        let (tx, mut rx) = mpsc::channel(4);
        let mut transport = ChannelTransport::new(tx);
        let event = OutboundEvent::JoinRoom {
            room: "room-1".into(),
            username: "alice".into(),
        };

        transport.emit(event.clone());
        transport.disconnect();

        assert_eq!(rx.try_recv().unwrap(), NetworkCommand::Emit(event));
        assert_eq!(rx.try_recv().unwrap(), NetworkCommand::Disconnect);
    }

    #[test]
    fn full_channel_drops_silently() {
        let (tx, mut rx) = mpsc::channel(1);
        let mut transport = ChannelTransport::new(tx);
        let first = OutboundEvent::Message {
            room: "room-1".into(),
            message: "one".into(),
            sender: "alice".into(),
        };
        let second = OutboundEvent::Message {
            room: "room-1".into(),
            message: "two".into(),
            sender: "alice".into(),
        };

        transport.emit(first.clone());
        transport.emit(second);

        assert_eq!(rx.try_recv().unwrap(), NetworkCommand::Emit(first));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn closed_channel_does_not_panic() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let mut transport = ChannelTransport::new(tx);
        transport.disconnect();
    }
}
