//! Client
//!
//! Action-based chat session state machine for the Shhh client. Manages room
//! creation, the join connection, outbound pacing and the received message
//! log.
//!
//! # Architecture
//!
//! The client follows the same Sans-IO and Action-Based patterns as
//! [`shhh_core`]. It receives events ([`SessionEvent`]), processes them
//! through pure state machine logic, and returns actions ([`SessionAction`])
//! for the caller to execute.
//!
//! # Components
//!
//! - [`Session`]: top-level state machine for one chat session
//! - [`MessageLog`]: display-ordered record of received messages
//! - [`SessionEvent`]: events fed into the session
//! - [`SessionAction`]: actions produced by the session
//!
//! # Transport (optional)
//!
//! With the `transport` feature enabled, this crate also provides:
//! - [`transport::RoomApi`]: HTTP room creation and health checks
//! - [`transport::open_socket`]: WebSocket join connection
//! - [`transport::SystemEnv`]: production environment

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod error;
mod event;
mod message_log;
mod session;

#[cfg(feature = "transport")]
pub mod transport;

pub use error::{RequestError, SessionError};
pub use event::{SessionAction, SessionEvent, TransportEvent};
pub use message_log::{Message, MessageLog};
pub use session::{Session, SessionConfig, SessionPhase};
pub use shhh_core::{
    connection::{ConnectionAction, ConnectionId},
    env::Environment,
};
