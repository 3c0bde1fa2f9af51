//! Observable application state.
//!
//! [`View`] is the "View Model" for the shell: the subset of session and
//! input state a renderer needs, copied out so rendering never borrows the
//! runtime.

use shhh_client::{Message, Session, SessionPhase};
use shhh_core::env::Environment;

use crate::InputState;

/// Snapshot of everything the user can see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    /// Create or join in flight.
    pub is_loading: bool,
    /// Most recent failure, if any.
    pub error_message: Option<String>,
    /// Room ID field.
    pub room_id: String,
    /// Username field.
    pub username: String,
    /// Typed messages will be sent.
    pub can_send: bool,
    /// Session phase.
    pub phase: SessionPhase,
    /// Received messages in arrival order.
    pub messages: Vec<Message>,
    /// Input line text.
    pub input: String,
    /// Input cursor, in characters.
    pub cursor: usize,
    /// Input feedback such as an unknown command.
    pub notice: Option<String>,
}

impl View {
    /// Capture the current state of `session` and the input line.
    pub fn new<E: Environment>(session: &Session<E>, input: &InputState) -> Self {
        Self {
            is_loading: session.is_busy(),
            error_message: session.error_message(),
            room_id: session.room_id().to_string(),
            username: session.username().to_string(),
            can_send: session.can_send(),
            phase: session.phase(),
            messages: session.messages().as_slice().to_vec(),
            input: input.buffer().to_string(),
            cursor: input.cursor(),
            notice: input.notice().map(str::to_string),
        }
    }

    /// Status line text.
    pub fn status(&self) -> &'static str {
        match self.phase {
            SessionPhase::Idle => "Idle",
            SessionPhase::Creating => "Creating room...",
            SessionPhase::Connecting => "Joining...",
            SessionPhase::Connected => "Connected",
            SessionPhase::Closed => "Disconnected",
            SessionPhase::Error => "Connection error",
        }
    }
}
