use crate::error::{ChatError, Result};

/// Local state of the chat room the user is in.
///
/// Goes from unjoined to joined once; only `reset` (leave / teardown) brings
/// it back.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoomSession {
    room: String,
    display_name: String,
    joined: bool,
}

impl RoomSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the join control should be enabled for these inputs.
    pub fn can_join(room: &str, display_name: &str) -> bool {
        !room.trim().is_empty() && !display_name.trim().is_empty()
    }

    pub fn join(&mut self, room: &str, display_name: &str) -> Result<()> {
        if self.joined {
            return Err(ChatError::AlreadyJoined(self.room.clone()));
        }
        let room = room.trim();
        let display_name = display_name.trim();
        if room.is_empty() {
            return Err(ChatError::EmptyRoomName);
        }
        if display_name.is_empty() {
            return Err(ChatError::EmptyDisplayName);
        }

        self.room = room.to_string();
        self.display_name = display_name.to_string();
        self.joined = true;
        Ok(())
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_joined(&self) -> bool {
        self.joined
    }

    pub fn room(&self) -> &str {
        &self.room
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_with_both_fields() {
        let mut session = RoomSession::new();
        session.join("room-1", "alice").unwrap();

        assert!(session.is_joined());
        assert_eq!(session.room(), "room-1");
        assert_eq!(session.display_name(), "alice");
    }

    #[test]
    fn empty_room_stays_unjoined() {
        let mut session = RoomSession::new();

        assert!(matches!(
            session.join("", "alice"),
            Err(ChatError::EmptyRoomName)
        ));
        assert!(!session.is_joined());
        assert_eq!(session, RoomSession::default());
    }

    #[test]
    fn blank_display_name_stays_unjoined() {
        let mut session = RoomSession::new();

        assert!(matches!(
            session.join("room-1", "   "),
            Err(ChatError::EmptyDisplayName)
        ));
        assert!(!session.is_joined());
    }

    #[test]
    fn can_join_requires_both_fields() {
        assert!(RoomSession::can_join("room-1", "alice"));
        assert!(!RoomSession::can_join("", "alice"));
        assert!(!RoomSession::can_join("room-1", ""));
        assert!(!RoomSession::can_join(" ", " "));
    }

    #[test]
    fn second_join_is_rejected() {
        let mut session = RoomSession::new();
        session.join("room-1", "alice").unwrap();

        assert!(matches!(
            session.join("room-2", "alice"),
            Err(ChatError::AlreadyJoined(room)) if room == "room-1"
        ));
        assert_eq!(session.room(), "room-1");
    }

    #[test]
    fn reset_returns_to_unjoined() {
        let mut session = RoomSession::new();
        session.join("room-1", "alice").unwrap();
        session.reset();

        assert!(!session.is_joined());
        assert_eq!(session.room(), "");
        session.join("room-2", "bob").unwrap();
        assert_eq!(session.room(), "room-2");
    }
}
