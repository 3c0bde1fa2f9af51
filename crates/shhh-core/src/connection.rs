//! Room connection state machine.
//!
//! Manages the lifecycle of the one persistent connection a session holds to
//! a room. Uses the action pattern: methods validate the transition, update
//! state and return [`ConnectionAction`]s for the driver to execute. The
//! transport reports back through `handle_*` methods.
//!
//! # State Machine
//!
//! ```text
//! ┌─────────┐ established ┌─────────────┐  close()  ┌─────────┐
//! │ Opening │────────────>│ Established │──────────>│ Closing │
//! └─────────┘             └─────────────┘           └─────────┘
//!   │    │                    │      │                   │
//!   │    │ closed             │      │ closed            │ closed
//!   │    └────────────────────│──────┴──────────> ┌────────┐ <──┘
//!   │ error                   │ error             │ Closed │
//!   ↓                         ↓                   └────────┘
//! ┌────────┐<─────────────────┘
//! │ Failed │
//! └────────┘
//! ```
//!
//! A failed connection is already torn down: no close action follows an error.

use std::fmt;

use crate::{
    endpoint::BackendConfig,
    error::{ConnectError, ConnectionError, ProtocolError, SendError},
    protocol::{IncomingFrame, OutgoingFrame},
};

/// Identifies one connection within a session.
///
/// Transport events carry the id so events from a connection the session has
/// already replaced can be recognised and dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Wrap a raw id.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw id.
    pub const fn get(self) -> u64 {
        self.0
    }

    /// The id following this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn#{}", self.0)
    }
}

/// Actions returned by the connection state machine.
///
/// The driver executes these:
/// - `Open`: start connecting to `url`, report the outcome as events
/// - `Transmit`: send `payload` as one text frame
/// - `Close`: shut the transport down
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionAction {
    /// Start connecting.
    Open {
        /// Connection being opened.
        connection: ConnectionId,
        /// Join URL.
        url: String,
    },

    /// Send one text frame.
    Transmit {
        /// Connection to send on.
        connection: ConnectionId,
        /// Encoded frame.
        payload: String,
    },

    /// Shut the transport down.
    Close {
        /// Connection to close.
        connection: ConnectionId,
    },
}

/// Connection state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Open requested, transport not yet usable
    Opening,
    /// Transport usable for sending
    Established,
    /// Close requested, waiting for the transport to confirm
    Closing,
    /// Transport ended (locally or remotely)
    Closed,
    /// Transport failed before or during use
    Failed,
}

/// Connection state machine
///
/// Bound to one room and username for its whole life. This is a pure state
/// machine; the socket itself belongs to the driver.
#[derive(Debug, Clone)]
pub struct Connection {
    id: ConnectionId,
    room_id: String,
    username: String,
    state: ConnectionState,
}

impl Connection {
    /// Create a connection in [`ConnectionState::Opening`] and the action that
    /// starts it.
    ///
    /// Returns immediately; establishment is reported later through
    /// [`Connection::handle_established`] or [`Connection::handle_error`].
    ///
    /// # Errors
    ///
    /// - `ConnectError` if the join URL cannot be built
    pub fn open(
        backend: &BackendConfig,
        id: ConnectionId,
        room_id: &str,
        username: &str,
    ) -> Result<(Self, ConnectionAction), ConnectError> {
        let url = backend.join_url(room_id, username)?;
        let connection = Self {
            id,
            room_id: room_id.to_string(),
            username: username.to_string(),
            state: ConnectionState::Opening,
        };

        tracing::debug!(connection = %id, %url, "opening room connection");
        Ok((connection, ConnectionAction::Open { connection: id, url }))
    }

    /// Connection id.
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Current connection state
    #[must_use]
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Room this connection is bound to.
    pub fn room_id(&self) -> &str {
        &self.room_id
    }

    /// Username this connection joined as.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Whether messages can be sent.
    pub fn is_established(&self) -> bool {
        self.state == ConnectionState::Established
    }

    /// Whether the transport may still deliver events.
    pub fn is_live(&self) -> bool {
        matches!(
            self.state,
            ConnectionState::Opening | ConnectionState::Established | ConnectionState::Closing
        )
    }

    /// Transport became usable.
    ///
    /// # Errors
    ///
    /// - `ConnectionError::InvalidState` if not in Opening state
    pub fn handle_established(&mut self) -> Result<(), ConnectionError> {
        if self.state != ConnectionState::Opening {
            return Err(ConnectionError::InvalidState {
                state: self.state,
                operation: "establish".to_string(),
            });
        }

        self.state = ConnectionState::Established;
        Ok(())
    }

    /// Decode an inbound text frame.
    ///
    /// A decode failure concerns that frame only; the state is unchanged.
    pub fn handle_frame(&self, raw: &str) -> Result<IncomingFrame, ProtocolError> {
        IncomingFrame::decode(raw)
    }

    /// Transport ended.
    pub fn handle_closed(&mut self) {
        if self.state != ConnectionState::Failed {
            self.state = ConnectionState::Closed;
        }
    }

    /// Transport failed. Implies closed.
    pub fn handle_error(&mut self) {
        self.state = ConnectionState::Failed;
    }

    /// Encode `text` for transmission.
    ///
    /// Returns `Ok(None)` without sending when the connection is not
    /// established.
    ///
    /// # Errors
    ///
    /// - `SendError::EmptyMessage` if `text` is empty
    /// - `SendError::Protocol` if the frame cannot be encoded
    pub fn send(&self, text: &str) -> Result<Option<ConnectionAction>, SendError> {
        if !self.is_established() {
            return Ok(None);
        }
        if text.is_empty() {
            return Err(SendError::EmptyMessage);
        }

        let payload = OutgoingFrame::new(text).encode()?;
        Ok(Some(ConnectionAction::Transmit { connection: self.id, payload }))
    }

    /// Request shutdown.
    ///
    /// Idempotent: only the first call on an opening or established connection
    /// produces an action.
    pub fn close(&mut self) -> Option<ConnectionAction> {
        match self.state {
            ConnectionState::Opening | ConnectionState::Established => {
                self.state = ConnectionState::Closing;
                Some(ConnectionAction::Close { connection: self.id })
            },
            ConnectionState::Closing | ConnectionState::Closed | ConnectionState::Failed => None,
        }
    }
}
