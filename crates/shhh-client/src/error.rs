//! Session error types.
//!
//! Every failure a session can meet is recoverable and ends up as the single
//! error line shown to the user. The typed value is kept so callers can tell
//! the causes apart.

use shhh_core::error::ConnectError;
use thiserror::Error;

/// Room-creation call failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    /// Backend answered with a non-success status.
    #[error("Failed to create chat: {status} {status_text}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Canonical reason phrase, empty if unknown.
        status_text: String,
    },

    /// Request never completed (connection refused, timeout, ...).
    #[error("{0}")]
    Transport(String),

    /// Success status with a body that is not a room-creation response.
    #[error("invalid room response: {0}")]
    InvalidResponse(String),
}

/// Failure recorded by the session.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Join attempted without a room ID.
    #[error("Room ID is required")]
    MissingRoomId,

    /// Join attempted without a username.
    #[error("Username is required")]
    MissingUsername,

    /// Room creation failed.
    #[error(transparent)]
    Request(#[from] RequestError),

    /// Join target could not be built.
    #[error(transparent)]
    Connect(#[from] ConnectError),

    /// Join connection failed to establish or failed mid-session.
    #[error("Connection to the chat room failed")]
    Transport {
        /// Transport-level description, for logs.
        detail: String,
    },
}

impl SessionError {
    /// Local precondition failure; nothing reached the network.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::MissingRoomId | Self::MissingUsername)
    }
}
