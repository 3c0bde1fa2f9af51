//! Application layer for Shhh
//!
//! Generic runtime and view model around the [`shhh_client::Session`] state
//! machine, so the same orchestration code runs in the terminal shell and in
//! deterministic simulation.
//!
//! # Components
//!
//! - [`UserIntent`]: what the user asked for
//! - [`InputState`]: input line editing, turning keys into intents
//! - [`AppEvent`]: everything the runtime reacts to
//! - [`View`]: observable snapshot handed to the renderer
//! - [`Driver`]: Trait for platform-specific I/O abstraction
//! - [`Runtime`]: Generic orchestration loop using Driver

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod driver;
mod event;
mod input;
mod intent;
mod runtime;
mod state;

pub use driver::Driver;
pub use event::AppEvent;
pub use input::{InputState, KeyInput};
pub use intent::{InputError, UserIntent};
pub use runtime::Runtime;
pub use state::View;
