//! Conversation log — the ordered message history behind the chat screen.

use serde::{Deserialize, Serialize};

/// One chat bubble: either the user's text or the coach's.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub text: String,
    pub is_user: bool,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_user: true,
        }
    }

    pub fn coach(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_user: false,
        }
    }
}

/// Insertion-ordered message history for one chat screen instance.
///
/// Append-only, except that the most recent coach entry is replaced in place
/// while its streamed exchange is still open. Not shared across screens and
/// not persisted; dropping the log discards the conversation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversationLog {
    messages: Vec<Message>,
}

impl ConversationLog {
    /// An empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// A log seeded with an opening coach greeting.
    pub fn with_greeting(greeting: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::coach(greeting)],
        }
    }

    /// Append a message at the end.
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Replace the last entry in place.
    ///
    /// Used while a streamed coach reply grows; the log must be non-empty.
    pub fn replace_last(&mut self, message: Message) {
        if let Some(last) = self.messages.last_mut() {
            *last = message;
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_preserves_insertion_order() {
        let mut log = ConversationLog::new();
        log.push(Message::user("hello"));
        log.push(Message::coach("hi"));

        assert_eq!(log.len(), 2);
        assert_eq!(log.messages()[0], Message::user("hello"));
        assert_eq!(log.messages()[1], Message::coach("hi"));
    }

    #[test]
    fn replace_last_swaps_only_the_tail() {
        let mut log = ConversationLog::new();
        log.push(Message::user("question"));
        log.push(Message::coach("partial"));
        log.replace_last(Message::coach("partial answer"));

        assert_eq!(log.len(), 2);
        assert_eq!(log.messages()[0].text, "question");
        assert_eq!(log.last().unwrap().text, "partial answer");
    }

    #[test]
    fn replace_last_on_empty_log_is_a_noop() {
        let mut log = ConversationLog::new();
        log.replace_last(Message::coach("orphan"));
        assert!(log.is_empty());
    }

    #[test]
    fn greeting_seeds_a_coach_message() {
        let log = ConversationLog::with_greeting("welcome");
        assert_eq!(log.len(), 1);
        let first = log.last().unwrap();
        assert_eq!(first.text, "welcome");
        assert!(!first.is_user);
    }
}
