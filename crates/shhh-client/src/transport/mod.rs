//! Production transport for the session.
//!
//! Thin I/O layer under the Sans-IO [`Session`](crate::Session): an HTTP
//! client for room creation and health checks, a WebSocket task per join
//! connection, and the system [`Environment`](shhh_core::env::Environment).
//! Everything here reports back as [`TransportEvent`](crate::TransportEvent)s
//! or plain results; no session logic lives in this module.

mod http;
mod socket;
mod system_env;

use thiserror::Error;

pub use http::RoomApi;
pub use socket::{HANDSHAKE_TIMEOUT, SocketHandle, open_socket, open_socket_with_timeout};
pub use system_env::SystemEnv;

/// Transport errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connection could not be established.
    #[error("connection failed: {0}")]
    Connection(String),

    /// Established connection broke.
    #[error("socket error: {0}")]
    Socket(String),

    /// HTTP client could not be built.
    #[error("http client error: {0}")]
    Client(String),
}
