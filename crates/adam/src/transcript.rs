//! In-memory conversation history.
//!
//! The transcript is append-only between resets. The whole of it is replayed
//! to the completion service on every turn.

use crate::Message;

/// Ordered list of user and assistant messages for one chat.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Remove every message.
    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// All messages, oldest first.
    pub fn all(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MessageRole;

    #[test]
    fn append_preserves_order() {
        let mut t = Transcript::new();
        t.append(Message::user("first"));
        t.append(Message::assistant("second"));
        t.append(Message::user("third"));
        let contents: Vec<&str> = t.all().iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["first", "second", "third"]);
        assert_eq!(t.last(), Some(&Message::user("third")));
        assert_eq!(t.all()[1].role, MessageRole::Assistant);
    }

    #[test]
    fn clear_empties() {
        let mut t = Transcript::new();
        t.append(Message::user("x"));
        t.clear();
        assert!(t.is_empty());
        assert_eq!(t.len(), 0);
        assert!(t.last().is_none());
        t.clear();
        assert!(t.is_empty());
    }
}
