//! Simulation driver implementing the Driver trait.
//!
//! `SimDriver` provides the same interface as the terminal driver but for
//! deterministic testing. It implements [`Driver`] so the same
//! [`shhh_app::Runtime`] orchestration code runs in both production and
//! simulation.
//!
//! Waiting is virtual: when no event is queued and the runtime asks to wait
//! for a pending send, the driver advances the [`SimEnv`] clock by exactly
//! the requested timeout.

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use shhh_app::{AppEvent, Driver, UserIntent, View};
use shhh_client::{ConnectionAction, SessionAction, SessionEvent, TransportEvent};
use shhh_core::env::Environment;

use crate::SimEnv;

/// Error type for simulation driver.
#[derive(Debug, Clone)]
pub struct SimDriverError(pub String);

impl std::fmt::Display for SimDriverError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SimDriverError: {}", self.0)
    }
}

impl std::error::Error for SimDriverError {}

/// Shared state for event injection.
#[derive(Default)]
struct SharedState {
    pending_events: VecDeque<AppEvent<Duration>>,
    executed: Vec<SessionAction>,
    views: Vec<View>,
    rooms_created: u64,
    stopped: bool,
}

/// Simulation driver for deterministic testing.
///
/// Clones share state, so a test keeps one handle for injecting events and
/// inspecting results while the runtime owns another.
#[derive(Clone)]
pub struct SimDriver {
    env: SimEnv,
    state: Arc<Mutex<SharedState>>,
    backend: bool,
}

impl SimDriver {
    /// Create a driver over `env` that only records actions.
    pub fn new(env: SimEnv) -> Self {
        Self { env, state: Arc::default(), backend: false }
    }

    /// Answer actions like a healthy backend would.
    ///
    /// Room creation yields `room-1`, `room-2`, ...; opening a connection
    /// establishes it; closing it reports it closed.
    #[must_use]
    pub fn with_backend(mut self) -> Self {
        self.backend = true;
        self
    }

    /// Environment driving the virtual clock.
    pub fn env(&self) -> &SimEnv {
        &self.env
    }

    fn state(&self) -> MutexGuard<'_, SharedState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Queue an event for the runtime.
    pub fn inject(&self, event: impl Into<AppEvent<Duration>>) {
        self.state().pending_events.push_back(event.into());
    }

    /// Queue a user intent.
    pub fn inject_intent(&self, intent: UserIntent) {
        self.inject(intent);
    }

    /// Queue a join-connection event.
    pub fn inject_transport(&self, event: TransportEvent) {
        self.inject(event);
    }

    /// Check if there are pending events to process.
    pub fn has_pending(&self) -> bool {
        !self.state().pending_events.is_empty()
    }

    /// Take all actions executed so far.
    pub fn take_executed(&self) -> Vec<SessionAction> {
        std::mem::take(&mut self.state().executed)
    }

    /// Payloads of all transmit actions executed so far.
    pub fn transmitted(&self) -> Vec<String> {
        self.state()
            .executed
            .iter()
            .filter_map(|action| match action {
                SessionAction::Connection(ConnectionAction::Transmit { payload, .. }) => {
                    Some(payload.clone())
                },
                _ => None,
            })
            .collect()
    }

    /// Most recently rendered view.
    pub fn last_view(&self) -> Option<View> {
        self.state().views.last().cloned()
    }

    /// Number of renders so far.
    pub fn render_count(&self) -> usize {
        self.state().views.len()
    }

    /// Whether the runtime stopped the driver.
    pub fn is_stopped(&self) -> bool {
        self.state().stopped
    }

    fn respond(state: &mut SharedState, action: &SessionAction) {
        let event: AppEvent<Duration> = match action {
            SessionAction::CreateRoom { .. } => {
                state.rooms_created += 1;
                SessionEvent::RoomCreated { room_id: format!("room-{}", state.rooms_created) }
                    .into()
            },
            SessionAction::Connection(ConnectionAction::Open { connection, .. }) => {
                TransportEvent::Established { connection: *connection }.into()
            },
            SessionAction::Connection(ConnectionAction::Close { connection }) => {
                TransportEvent::Closed { connection: *connection }.into()
            },
            SessionAction::Connection(ConnectionAction::Transmit { .. })
            | SessionAction::StateChanged => return,
        };
        state.pending_events.push_back(event);
    }
}

impl Driver for SimDriver {
    type Error = SimDriverError;
    type Instant = Duration;

    async fn next_event(
        &mut self,
        timeout: Option<Duration>,
    ) -> Result<Option<AppEvent<Duration>>, Self::Error> {
        let event = self.state().pending_events.pop_front();
        if event.is_none()
            && let Some(timeout) = timeout
        {
            self.env.advance(timeout);
        }
        Ok(event)
    }

    async fn execute(&mut self, action: SessionAction) -> Result<(), Self::Error> {
        let backend = self.backend;
        let mut state = self.state();
        if state.stopped {
            return Err(SimDriverError(format!("execute after stop: {action:?}")));
        }
        if backend {
            Self::respond(&mut state, &action);
        }
        state.executed.push(action);
        Ok(())
    }

    fn now(&self) -> Duration {
        self.env.now()
    }

    fn render(&mut self, view: &View) -> Result<(), Self::Error> {
        self.state().views.push(view.clone());
        Ok(())
    }

    async fn stop(&mut self) {
        self.state().stopped = true;
    }
}

#[cfg(test)]
mod tests {
    use shhh_client::ConnectionId;

    use super::*;

    #[test]
    fn inject_queues_event() {
        let driver = SimDriver::new(SimEnv::default());
        driver.inject_intent(UserIntent::CreateRoom);

        assert!(driver.has_pending());
    }

    #[tokio::test]
    async fn idle_wait_advances_virtual_clock() {
        let mut driver = SimDriver::new(SimEnv::default());

        assert_eq!(driver.next_event(Some(Duration::from_millis(250))).await.unwrap(), None);
        assert_eq!(driver.now(), Duration::from_millis(250));

        assert_eq!(driver.next_event(None).await.unwrap(), None);
        assert_eq!(driver.now(), Duration::from_millis(250));
    }

    #[tokio::test]
    async fn backend_answers_open_with_established() {
        let mut driver = SimDriver::new(SimEnv::default()).with_backend();
        let connection = ConnectionId::new(3);

        driver
            .execute(SessionAction::Connection(ConnectionAction::Open {
                connection,
                url: "ws://localhost:8000/room/R1/join?username=a".into(),
            }))
            .await
            .unwrap();

        assert_eq!(
            driver.next_event(None).await.unwrap(),
            Some(TransportEvent::Established { connection }.into())
        );
    }
}
