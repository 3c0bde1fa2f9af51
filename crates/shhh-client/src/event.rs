//! Session events and actions.

use shhh_core::connection::{ConnectionAction, ConnectionId};

use crate::error::RequestError;

/// Events the caller feeds into the session.
///
/// The caller is responsible for:
/// - Forwarding user intents (create, join, type, ...)
/// - Reporting completions of the actions it executed
/// - Driving time forward via ticks so debounced sends go out
///
/// Generic over `I` (Instant type) to support both production
/// (`std::time::Instant`) and simulation (virtual time) environments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent<I = std::time::Instant> {
    /// User wants a new room.
    CreateRoom,

    /// User wants to join the room currently entered.
    JoinRoom,

    /// User wants to leave the joined room.
    Leave,

    /// User edited the room ID field.
    SetRoomId(String),

    /// User edited the username field.
    SetUsername(String),

    /// User typed into the message field. Sent after the debounce delay.
    TypeMessage(String),

    /// Time tick for debounce processing.
    Tick {
        /// Current time from the environment.
        now: I,
    },

    /// Room-creation call succeeded.
    RoomCreated {
        /// Server-issued room identifier.
        room_id: String,
    },

    /// Room-creation call failed.
    RoomCreateFailed {
        /// What went wrong.
        error: RequestError,
    },

    /// Join connection reported something.
    Transport(TransportEvent),
}

impl<I> From<TransportEvent> for SessionEvent<I> {
    fn from(event: TransportEvent) -> Self {
        Self::Transport(event)
    }
}

/// Notifications from the join connection, in transport order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// Connection is usable for sending.
    Established {
        /// Reporting connection.
        connection: ConnectionId,
    },

    /// Text frame received.
    Frame {
        /// Reporting connection.
        connection: ConnectionId,
        /// Raw frame text.
        payload: String,
    },

    /// Transport ended, locally or remotely.
    Closed {
        /// Reporting connection.
        connection: ConnectionId,
    },

    /// Transport failed before or during use.
    Failed {
        /// Reporting connection.
        connection: ConnectionId,
        /// Error description.
        detail: String,
    },
}

impl TransportEvent {
    /// Connection the event belongs to.
    pub fn connection(&self) -> ConnectionId {
        match self {
            Self::Established { connection }
            | Self::Frame { connection, .. }
            | Self::Closed { connection }
            | Self::Failed { connection, .. } => *connection,
        }
    }
}

/// Actions the session produces for the caller to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionAction {
    /// Issue the room-creation call and report back with
    /// [`SessionEvent::RoomCreated`] or [`SessionEvent::RoomCreateFailed`].
    CreateRoom {
        /// Room-creation endpoint.
        url: String,
    },

    /// Open, write to or close the join connection.
    Connection(ConnectionAction),

    /// Observable state changed; re-render.
    StateChanged,
}
