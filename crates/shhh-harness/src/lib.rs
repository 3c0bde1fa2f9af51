//! Deterministic simulation harness for Shhh client testing.
//!
//! Virtual-time implementations of the Environment and Driver traits for
//! deterministic, reproducible tests of the session and runtime.
//!
//! - [`SimEnv`]: manual clock plus seeded RNG
//! - [`SimDriver`]: scripted [`shhh_app::Driver`] that records what the
//!   runtime asks it to do and can stand in for the backend

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod sim_driver;
pub mod sim_env;

pub use sim_driver::{SimDriver, SimDriverError};
pub use sim_env::SimEnv;
