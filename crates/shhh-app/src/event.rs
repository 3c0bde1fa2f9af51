//! Runtime input events.

use shhh_client::{SessionEvent, TransportEvent};

use crate::{KeyInput, UserIntent};

/// Events the runtime reacts to.
///
/// Generic over `I` (Instant type) like [`SessionEvent`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent<I = std::time::Instant> {
    /// Key press on the input line.
    Key(KeyInput),
    /// User intent that bypasses the input line.
    Intent(UserIntent),
    /// Completion reported by the driver (room creation, join connection).
    Session(SessionEvent<I>),
}

impl<I> From<KeyInput> for AppEvent<I> {
    fn from(key: KeyInput) -> Self {
        Self::Key(key)
    }
}

impl<I> From<UserIntent> for AppEvent<I> {
    fn from(intent: UserIntent) -> Self {
        Self::Intent(intent)
    }
}

impl<I> From<SessionEvent<I>> for AppEvent<I> {
    fn from(event: SessionEvent<I>) -> Self {
        Self::Session(event)
    }
}

impl<I> From<TransportEvent> for AppEvent<I> {
    fn from(event: TransportEvent) -> Self {
        Self::Session(SessionEvent::Transport(event))
    }
}
