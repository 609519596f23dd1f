//! Time-driven scroll offset.
//!
//! The offset is a fractional row count: its floor is the tile at the bottom of
//! the screen. It moves toward a target over a duration along an easing curve
//! and is sampled against an explicit `now` so the caller decides which clock
//! reading a frame or a tap uses.
//!
//! Completion is reported as data instead of a callback: `set` stores an
//! optional token, and once the motion finishes `take_completed` hands it out
//! exactly once together with the scheduled end instant.

use crate::extensions::easing::{ease, Easing};

#[derive(Debug, Clone)]
struct Motion<T> {
    from: f64,
    to: f64,
    started_at: f64,
    duration_ms: f64,
    easing: Easing,
    on_complete: Option<T>,
}

impl<T> Motion<T> {
    fn end_ms(&self) -> f64 {
        self.started_at + self.duration_ms
    }

    fn finished_at(&self, now: f64) -> bool {
        self.duration_ms <= 0.0 || now >= self.end_ms()
    }

    fn sample(&self, now: f64) -> f64 {
        if self.finished_at(now) {
            return self.to;
        }
        let t = (now - self.started_at).max(0.0) / self.duration_ms;
        ease(self.from, self.to, t, self.easing)
    }
}

/// A finished motion's token and the instant it was scheduled to end.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Completed<T> {
    pub token: T,
    pub at_ms: f64,
}

/// Animated scalar with halt/reset cancellation.
#[derive(Debug, Clone)]
pub struct TimeOffset<T> {
    value: f64,
    motion: Option<Motion<T>>,
    completed: Option<Completed<T>>,
}

impl<T> TimeOffset<T> {
    pub fn new(value: f64) -> Self {
        Self {
            value,
            motion: None,
            completed: None,
        }
    }

    /// Current value at `now`. Finishing a motion holds the value at its
    /// target and queues the completion token, if any.
    pub fn get(&mut self, now: f64) -> f64 {
        let Some(motion) = &mut self.motion else {
            return self.value;
        };
        self.value = motion.sample(now);
        if motion.finished_at(now) {
            if let Some(token) = motion.on_complete.take() {
                self.completed = Some(Completed {
                    token,
                    at_ms: motion.end_ms(),
                });
            }
            self.motion = None;
        }
        self.value
    }

    /// Value computed by the most recent `get`, `set`, `halt` or `reset`.
    pub fn last(&self) -> f64 {
        self.value
    }

    /// Start moving from the value at `now` to `target` over `duration_ms`.
    /// Replaces any motion in flight; its pending completion is dropped.
    pub fn set(
        &mut self,
        now: f64,
        target: f64,
        duration_ms: f64,
        easing: Easing,
        on_complete: Option<T>,
    ) {
        let from = match &self.motion {
            Some(motion) => motion.sample(now),
            None => self.value,
        };
        self.value = from;
        self.motion = Some(Motion {
            from,
            to: target,
            started_at: now,
            duration_ms,
            easing,
            on_complete,
        });
    }

    /// Freeze at the value for `now` and cancel any pending completion.
    pub fn halt(&mut self, now: f64) {
        if let Some(motion) = self.motion.take() {
            self.value = motion.sample(now);
        }
        self.completed = None;
    }

    /// Jump to `value` with no interpolation and cancel any pending completion.
    pub fn reset(&mut self, value: f64) {
        self.value = value;
        self.motion = None;
        self.completed = None;
    }

    /// Hand out a finished motion's token. Returns `Some` once per completion.
    pub fn take_completed(&mut self) -> Option<Completed<T>> {
        self.completed.take()
    }
}

impl<T> Default for TimeOffset<T> {
    fn default() -> Self {
        Self::new(0.0)
    }
}
