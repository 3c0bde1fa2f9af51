//! Received message log.
//!
//! Append-only record of the messages delivered by the join connection, in
//! arrival order. The session clears it when a new create/join cycle starts.

use shhh_core::{env::Environment, protocol::IncomingFrame};
use uuid::Uuid;

/// A received message. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Identifier assigned at receipt, for display keying.
    pub local_id: Uuid,
    /// Position in arrival order, starting at 0 after each clear.
    pub arrival_order: u64,
    /// Message text.
    pub content: String,
    /// Sender, when the backend includes it.
    pub username: Option<String>,
}

/// Display-ordered message log.
#[derive(Debug, Clone, Default)]
pub struct MessageLog {
    messages: Vec<Message>,
    next_order: u64,
}

impl MessageLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a decoded frame with the next arrival order and a fresh id.
    pub fn append<E: Environment>(&mut self, env: &E, frame: IncomingFrame) -> &Message {
        let message = Message {
            local_id: Uuid::from_u128(env.random_u128()),
            arrival_order: self.next_order,
            content: frame.content,
            username: frame.username,
        };
        self.next_order += 1;
        self.messages.push(message);
        &self.messages[self.messages.len() - 1]
    }

    /// Remove all messages and reset arrival order.
    pub fn clear(&mut self) {
        self.messages.clear();
        self.next_order = 0;
    }

    /// No messages yet. The shell renders a placeholder.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Number of messages.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Messages in arrival order.
    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.messages.iter()
    }

    /// Messages in arrival order.
    pub fn as_slice(&self) -> &[Message] {
        &self.messages
    }

    /// Most recent message.
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }
}

impl<'a> IntoIterator for &'a MessageLog {
    type Item = &'a Message;
    type IntoIter = std::slice::Iter<'a, Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
