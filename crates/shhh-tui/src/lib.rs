//! Terminal UI for Shhh
//!
//! A thin shell over [`shhh_app::Driver`] that provides terminal-specific
//! I/O. All orchestration logic lives in the generic [`shhh_app::Runtime`].
//!
//! This crate only handles terminal input, rendering and wiring the
//! production transport.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod health;
pub mod terminal;
pub mod ui;

pub use shhh_app::{AppEvent, Driver, KeyInput, Runtime, View};
pub use health::spawn_health_check;
pub use terminal::{TerminalDriver, TerminalError};
