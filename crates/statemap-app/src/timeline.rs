//! Deferred effects on a simulated clock.
//!
//! Nothing here sleeps. The owner calls [`Timeline::advance`] and then drains
//! [`Timeline::pop_due`]; effects fire in due order, ties in scheduling order.
//! An effect that schedules another while being applied sees the clock at its
//! own due time, so a single large advance still runs chained effects.

use statemap_core::{LocationIndex, StatementId};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Second half of a jump: emphasize, show the panel, highlight.
    CompleteJump {
        location: LocationIndex,
        statement: StatementId,
    },
    ClearEmphasis { location: LocationIndex },
    HideSearchResults,
}

#[derive(Debug, Clone)]
struct Scheduled {
    due: Duration,
    seq: u64,
    effect: Effect,
}

#[derive(Debug, Default)]
pub struct Timeline {
    now: Duration,
    horizon: Duration,
    next_seq: u64,
    pending: Vec<Scheduled>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn schedule(&mut self, delay: Duration, effect: Effect) {
        let due = self.now + delay;
        tracing::debug!(?effect, ?due, "Scheduled effect");
        self.pending.push(Scheduled {
            due,
            seq: self.next_seq,
            effect,
        });
        self.next_seq += 1;
    }

    /// Drop pending effects matching `predicate`. Returns how many were dropped.
    pub fn cancel_where(&mut self, predicate: impl Fn(&Effect) -> bool) -> usize {
        let before = self.pending.len();
        self.pending.retain(|s| !predicate(&s.effect));
        before - self.pending.len()
    }

    /// Move the horizon forward; due effects become available from `pop_due`.
    pub fn advance(&mut self, elapsed: Duration) {
        self.horizon = self.horizon.max(self.now) + elapsed;
    }

    /// Next effect due at or before the horizon. When none is left the clock
    /// settles on the horizon.
    pub fn pop_due(&mut self) -> Option<Effect> {
        let position = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, s)| s.due <= self.horizon)
            .min_by_key(|(_, s)| (s.due, s.seq))
            .map(|(i, _)| i);

        match position {
            Some(i) => {
                let scheduled = self.pending.swap_remove(i);
                self.now = self.now.max(scheduled.due);
                Some(scheduled.effect)
            }
            None => {
                self.now = self.now.max(self.horizon);
                None
            }
        }
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn is_idle(&self) -> bool {
        self.pending.is_empty()
    }
}
