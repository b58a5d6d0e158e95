use crate::common::ChatMessage;

/// Append-only message list of the active session, in local receipt order.
/// Unbounded; cleared only when the session ends.
#[derive(Debug, Default)]
pub struct MessageStore {
    messages: Vec<ChatMessage>,
}

impl MessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, message: ChatMessage) -> &ChatMessage {
        self.messages.push(message);
        &self.messages[self.messages.len() - 1]
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_receipt_order() {
        let mut store = MessageStore::new();
        store.append(ChatMessage::new("alice", "first"));
        store.append(ChatMessage::new("bob", "second"));
        store.append(ChatMessage::new("alice", "third"));

        let bodies: Vec<&str> = store.messages().iter().map(|m| m.body.as_str()).collect();
        assert_eq!(bodies, ["first", "second", "third"]);
    }

    #[test]
    fn identical_messages_are_not_deduplicated() {
        let mut store = MessageStore::new();
        store.append(ChatMessage::new("alice", "hi"));
        store.append(ChatMessage::new("alice", "hi"));

        assert_eq!(store.len(), 2);
    }

    #[test]
    fn clear_empties_the_store() {
        let mut store = MessageStore::new();
        store.append(ChatMessage::new("alice", "hi"));
        store.clear();

        assert!(store.is_empty());
    }
}
