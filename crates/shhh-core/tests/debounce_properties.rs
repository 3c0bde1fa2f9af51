//! Property-based tests for the debounce gate.
//!
//! Bursts of triggers spaced closer than the delay must collapse into exactly
//! one firing carrying the last arguments, regardless of how the caller polls
//! in between.

use std::time::Duration;

use proptest::prelude::*;
use shhh_core::Debouncer;

const DELAY_MS: u64 = 300;

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

proptest! {
    #[test]
    fn prop_burst_fires_once_with_last_args(
        gaps in prop::collection::vec(0u64..DELAY_MS, 1..40),
    ) {
        let mut gate: Debouncer<usize, Duration> = Debouncer::new(ms(DELAY_MS));
        let mut now = 0u64;
        let mut fired = Vec::new();

        for (i, gap) in gaps.iter().enumerate() {
            now += gap;
            // Polling between triggers never fires inside the window
            if let Some(v) = gate.poll(ms(now)) {
                fired.push(v);
            }
            gate.trigger(i, ms(now));
        }

        // Drive time well past the deadline, polling every millisecond
        for t in now..=now + 2 * DELAY_MS {
            if let Some(v) = gate.poll(ms(t)) {
                fired.push(v);
            }
        }

        prop_assert_eq!(fired, vec![gaps.len() - 1]);
    }

    #[test]
    fn prop_spaced_triggers_each_fire(count in 1usize..20) {
        let mut gate: Debouncer<usize, Duration> = Debouncer::new(ms(DELAY_MS));
        let mut fired = Vec::new();

        for i in 0..count {
            let t = i as u64 * (DELAY_MS + 1);
            gate.trigger(i, ms(t));
            if let Some(v) = gate.poll(ms(t + DELAY_MS)) {
                fired.push(v);
            }
        }

        prop_assert_eq!(fired, (0..count).collect::<Vec<_>>());
    }

    #[test]
    fn prop_cancel_suppresses_firing(gaps in prop::collection::vec(0u64..DELAY_MS, 1..20)) {
        let mut gate: Debouncer<usize, Duration> = Debouncer::new(ms(DELAY_MS));
        let mut now = 0u64;

        for (i, gap) in gaps.iter().enumerate() {
            now += gap;
            gate.trigger(i, ms(now));
        }
        gate.cancel();

        prop_assert_eq!(gate.poll(ms(now + 10 * DELAY_MS)), None);
    }
}
