//! Shhh core
//!
//! Sans-IO building blocks for the Shhh chat client. Nothing in this crate
//! performs I/O or reads an ambient clock: time and randomness come from an
//! [`env::Environment`], and every state machine returns actions for a driver
//! to execute.
//!
//! # Components
//!
//! - [`connection::Connection`]: lifecycle of one room connection
//! - [`debounce::Debouncer`]: trailing-edge gate for rapid repeated calls
//! - [`endpoint::BackendConfig`]: backend addresses (create, join, health)
//! - [`protocol`]: JSON frames exchanged with the backend

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod connection;
pub mod debounce;
pub mod endpoint;
pub mod env;
pub mod error;
pub mod protocol;

pub use connection::{Connection, ConnectionAction, ConnectionId, ConnectionState};
pub use debounce::{DEFAULT_DEBOUNCE_DELAY, Debouncer};
pub use endpoint::{BackendConfig, DEFAULT_BACKEND_URL};
pub use env::Environment;
pub use error::{ConnectError, ConnectionError, ProtocolError, SendError};
pub use protocol::{CreateRoomResponse, IncomingFrame, OutgoingFrame};
