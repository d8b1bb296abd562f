//! Monotonic millisecond clocks for the session.

#[cfg(test)]
use std::cell::Cell;
use std::time::Instant;

pub trait Clock {
    /// Milliseconds since the clock started. Never goes backwards.
    fn now_ms(&self) -> f64;
}

/// Wall clock shared by the input and logic threads. Copies share the
/// same start instant.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

/// Hand-driven clock for tests.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<f64>,
}

#[cfg(test)]
impl ManualClock {
    pub fn new(start_ms: f64) -> Self {
        Self {
            now: Cell::new(start_ms),
        }
    }

    pub fn advance(&self, ms: f64) {
        self.now.set(self.now.get() + ms.max(0.0));
    }
}

#[cfg(test)]
impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }
}
