//! Trailing-edge debounce gate.
//!
//! A [`Debouncer`] collapses a burst of [`Debouncer::trigger`] calls into one
//! trailing value. Each trigger supersedes the pending one and restarts the
//! delay; once `delay` passes without another trigger, [`Debouncer::poll`]
//! yields the arguments of the last trigger exactly once.
//!
//! Time is passed in by the caller. The owner decides what "running the
//! action" means for the yielded value, and tears the gate down with
//! [`Debouncer::cancel`] (or by dropping it), after which nothing fires.
//!
//! ```text
//! trigger(a)  trigger(b)   trigger(c)            poll → Some(c)
//!     │───────────│────────────│───── delay ─────────│
//! ```

use std::{ops::Sub, time::Duration};

/// Delay applied to keystroke-driven sends.
pub const DEFAULT_DEBOUNCE_DELAY: Duration = Duration::from_millis(300);

/// Pending invocation.
#[derive(Debug, Clone)]
struct Pending<T, I> {
    args: T,
    armed_at: I,
}

/// Debounce gate holding at most one pending invocation.
///
/// Generic over `I` to support both real time and virtual time for
/// deterministic testing.
#[derive(Debug, Clone)]
pub struct Debouncer<T, I>
where
    I: Copy + Ord + Sub<Output = Duration>,
{
    delay: Duration,
    pending: Option<Pending<T, I>>,
}

impl<T, I> Debouncer<T, I>
where
    I: Copy + Ord + Sub<Output = Duration>,
{
    /// Create an idle gate with the given quiet period.
    pub fn new(delay: Duration) -> Self {
        Self { delay, pending: None }
    }

    /// Arm the gate with `args`, replacing any pending value.
    ///
    /// Returns `true` if a pending value was superseded.
    pub fn trigger(&mut self, args: T, now: I) -> bool {
        self.pending.replace(Pending { args, armed_at: now }).is_some()
    }

    /// Take the pending value if the quiet period has elapsed at `now`.
    ///
    /// Yields each armed value at most once.
    pub fn poll(&mut self, now: I) -> Option<T> {
        let due = self
            .pending
            .as_ref()
            .is_some_and(|p| now >= p.armed_at && now - p.armed_at >= self.delay);
        if due { self.pending.take().map(|p| p.args) } else { None }
    }

    /// Time left until the pending value is due. `None` if nothing is pending.
    pub fn remaining(&self, now: I) -> Option<Duration> {
        self.pending.as_ref().map(|p| {
            if now < p.armed_at { self.delay } else { self.delay.saturating_sub(now - p.armed_at) }
        })
    }

    /// Whether a value is waiting to fire.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Discard the pending value. It will never fire.
    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|p| p.args)
    }
}
