//! Error types for the Shhh core.
//!
//! Strongly-typed errors for each layer: wire decoding, connection setup,
//! connection state transitions and outbound sends. All of them are
//! recoverable; the session turns them into user-facing state.

use thiserror::Error;

use crate::connection::ConnectionState;

/// Errors encoding or decoding JSON frames.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Inbound payload is not a valid frame.
    #[error("malformed frame: {0}")]
    Decode(String),

    /// Outbound frame could not be serialized.
    #[error("failed to encode frame: {0}")]
    Encode(String),
}

/// Errors building a connection target.
///
/// Raised synchronously by [`crate::Connection::open`]; no network action has
/// been taken when one of these is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConnectError {
    /// Backend address is not an `http://` or `https://` URL.
    #[error("unsupported backend address {0:?}: expected http:// or https://")]
    UnsupportedScheme(String),

    /// Room ID is empty.
    #[error("room ID is empty")]
    EmptyRoomId,

    /// Username is empty.
    #[error("username is empty")]
    EmptyUsername,
}

/// Errors from connection state machine operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConnectionError {
    /// Transport event arrived in a state that cannot accept it.
    #[error("invalid state transition: cannot {operation} from {state:?}")]
    InvalidState {
        /// Current state when error occurred
        state: ConnectionState,
        /// Operation that was attempted
        operation: String,
    },
}

/// Errors sending a chat message.
///
/// Sending on a connection that is not established is not an error; it is a
/// no-op reported as `Ok(None)` by [`crate::Connection::send`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SendError {
    /// Message text is empty.
    #[error("cannot send an empty message")]
    EmptyMessage,

    /// Frame could not be encoded.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}
