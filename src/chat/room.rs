use crate::common::{ChatMessage, ConnectionState, InboundEvent, NetworkEvent, OutboundEvent};
use crate::error::{ChatError, Result};
use crate::network::Transport;

use super::session::RoomSession;
use super::store::MessageStore;

/// Ties the session, the message store and the transport handle together.
///
/// Sends are echoed into the store before anything is published and are
/// never reconciled with what the relay sends back: a transport that echoes
/// the sender's own messages produces duplicates.
pub struct ChatRoom<T: Transport> {
    session: RoomSession,
    store: MessageStore,
    connection: ConnectionState,
    avatar: Option<String>,
    transport: T,
}

impl<T: Transport> ChatRoom<T> {
    pub fn new(transport: T) -> Self {
        Self {
            session: RoomSession::new(),
            store: MessageStore::new(),
            connection: ConnectionState::Disconnected,
            avatar: None,
            transport,
        }
    }

    /// Avatar attached to locally composed messages.
    pub fn with_avatar(mut self, avatar: Option<String>) -> Self {
        self.avatar = avatar;
        self
    }

    pub fn join(&mut self, room: &str, display_name: &str) -> Result<()> {
        self.session.join(room, display_name)?;
        log::info!(
            "Joined room {} as {}",
            self.session.room(),
            self.session.display_name()
        );
        self.transport.emit(OutboundEvent::JoinRoom {
            room: self.session.room().to_string(),
            username: self.session.display_name().to_string(),
        });
        Ok(())
    }

    /// Appends the message locally and publishes it. Blank text is ignored.
    pub fn send(&mut self, text: &str) -> Result<Option<&ChatMessage>> {
        if !self.session.is_joined() {
            return Err(ChatError::NotJoined);
        }
        if text.trim().is_empty() {
            return Ok(None);
        }

        let sender = self.session.display_name().to_string();
        self.transport.emit(OutboundEvent::Message {
            room: self.session.room().to_string(),
            message: text.to_string(),
            sender: sender.clone(),
        });
        let message = ChatMessage::new(sender, text).with_avatar(self.avatar.clone());
        Ok(Some(self.store.append(message)))
    }

    pub fn handle_inbound(&mut self, event: InboundEvent) {
        if !self.session.is_joined() {
            log::debug!("Dropping inbound event while not joined: {event:?}");
            return;
        }
        let message = match event {
            InboundEvent::Message { sender, message } => ChatMessage::new(sender, message),
            InboundEvent::UserJoined(notice) => ChatMessage::system(notice),
        };
        self.store.append(message);
    }

    pub fn handle_network_event(&mut self, event: NetworkEvent) {
        match event {
            NetworkEvent::Inbound(inbound) => self.handle_inbound(inbound),
            NetworkEvent::ConnectionChanged(state) => {
                log::debug!("Connection state: {state}");
                self.connection = state;
            }
        }
    }

    /// Ends the session: resets it, drops the messages and closes the
    /// connection. No-op when not joined.
    pub fn leave(&mut self) {
        if !self.session.is_joined() {
            return;
        }
        log::info!("Leaving room {}", self.session.room());
        if !self.store.is_empty() {
            log::debug!("Discarding {} messages", self.store.len());
        }
        self.session.reset();
        self.store.clear();
        self.transport.disconnect();
    }

    pub fn session(&self) -> &RoomSession {
        &self.session
    }

    pub fn is_joined(&self) -> bool {
        self.session.is_joined()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        self.store.messages()
    }

    pub fn connection(&self) -> &ConnectionState {
        &self.connection
    }

    #[cfg(test)]
    pub fn transport(&self) -> &T {
        &self.transport
    }
}
