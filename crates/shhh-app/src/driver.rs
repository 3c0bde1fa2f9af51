//! I/O seam between the runtime and a frontend.
//!
//! A frontend supplies keys, network completions, the clock and a screen
//! through [`Driver`]; [`crate::Runtime`] never touches any of them directly.

use std::{future::Future, ops::Sub, time::Duration};

use shhh_client::SessionAction;

use crate::{AppEvent, View};

/// Everything the [`Runtime`](crate::Runtime) needs from the outside world.
///
/// The terminal shell and the simulation harness both implement it, so the
/// same loop runs against real sockets and against scripted events.
///
/// # Implementations
///
/// - **Terminal**: crossterm keys for input, reqwest and tokio-tungstenite for I/O
/// - **Simulation**: scripted events and virtual time
pub trait Driver: Send {
    /// Failure of the frontend itself (terminal I/O, stopped simulation).
    type Error: std::error::Error + Send + 'static;

    /// Clock reading. Must match the session environment's instant.
    type Instant: Copy + Ord + Send + Sync + Sub<Output = Duration>;

    /// Wait for the next event.
    ///
    /// Waits at most `timeout` when given, indefinitely otherwise. Returns
    /// `None` if the timeout passed without an event.
    fn next_event(
        &mut self,
        timeout: Option<Duration>,
    ) -> impl Future<Output = Result<Option<AppEvent<Self::Instant>>, Self::Error>> + Send;

    /// Perform a session action (HTTP call, socket open/write/close).
    ///
    /// Completions come back later through [`Driver::next_event`].
    ///
    /// # Errors
    ///
    /// Returns an error only for driver failures; a failed request or socket
    /// is reported as an event.
    fn execute(
        &mut self,
        action: SessionAction,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Current time instant.
    fn now(&self) -> Self::Instant;

    /// Draw `view`.
    ///
    /// # Errors
    ///
    /// Returns an error if the frame cannot be written.
    fn render(&mut self, view: &View) -> Result<(), Self::Error>;

    /// Stop background tasks and clean up resources.
    ///
    /// Resolves once open connections have finished closing, or the
    /// frontend's own grace period has run out.
    fn stop(&mut self) -> impl Future<Output = ()> + Send;
}
