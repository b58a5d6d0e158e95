use crate::chat::{Composer, RoomSession};

/// Local state of the UI that is not part of the chat session.
#[derive(Default)]
pub struct AppState {
    pub room_input: String,
    pub name_input: String,
    pub composer: Composer,
}

impl AppState {
    /// Prefills the join form (from CLI flags).
    pub fn new(room: Option<String>, name: Option<String>) -> Self {
        Self {
            room_input: room.unwrap_or_default(),
            name_input: name.unwrap_or_default(),
            composer: Composer::new(),
        }
    }

    pub fn can_join(&self) -> bool {
        RoomSession::can_join(&self.room_input, &self.name_input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_enabled_only_with_both_fields() {
        let mut state = AppState::new(Some("room-1".into()), None);
        assert!(!state.can_join());

        state.name_input.push_str("alice");
        assert!(state.can_join());

        state.room_input.clear();
        assert!(!state.can_join());
    }
}
