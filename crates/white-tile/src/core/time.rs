use std::cell::Cell;
use std::rc::Rc;

/// Source of wall-clock time in milliseconds.
///
/// The core never reads a system clock directly: the browser bridge samples
/// `performance.now()`, tests drive a [`ManualClock`].
pub trait Clock {
    /// Current time in milliseconds. Must be non-decreasing.
    fn now_ms(&self) -> f64;
}

/// Clock advanced by hand. Clones share the same time value, so a test can
/// keep one handle while the game owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<f64>>,
}

impl ManualClock {
    pub fn new(start_ms: f64) -> Self {
        Self {
            now: Rc::new(Cell::new(start_ms)),
        }
    }

    /// Move time forward by `ms`.
    pub fn advance(&self, ms: f64) {
        debug_assert!(ms >= 0.0, "clock cannot run backwards");
        self.now.set(self.now.get() + ms);
    }

    /// Jump to an absolute time.
    pub fn set(&self, now_ms: f64) {
        debug_assert!(now_ms >= self.now.get(), "clock cannot run backwards");
        self.now.set(now_ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }
}
