use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

/// Wall-clock provider for [`crate::Clock`].
pub trait TimeSource {
    /// Milliseconds since an arbitrary fixed origin; must never decrease.
    fn now_ms(&self) -> f64;
}

#[derive(Clone, Copy, Debug)]
/// Real time backed by [`Instant`].
pub struct MonotonicSource {
    origin: Instant,
}

impl MonotonicSource {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for MonotonicSource {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// Hand-driven time for tests and offline rendering. Clones share the same time.
#[derive(Clone, Debug, Default)]
pub struct ManualSource {
    now: Rc<Cell<f64>>,
}

impl ManualSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move time forward by `ms`; negative or non-finite steps are ignored.
    pub fn advance(&self, ms: f64) {
        if ms.is_finite() && ms > 0.0 {
            self.now.set(self.now.get() + ms);
        }
    }

    /// Jump to `ms` if it is not earlier than the current time.
    pub fn set(&self, ms: f64) {
        if ms.is_finite() && ms >= self.now.get() {
            self.now.set(ms);
        }
    }
}

impl TimeSource for ManualSource {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }
}
