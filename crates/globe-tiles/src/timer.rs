//! Clock used by the split budget.

use std::time::Instant;

/// Measures the time since the last tile split.
pub trait SplitTimer {
    /// Restart the measurement.
    fn start(&mut self);

    /// Milliseconds since the last [`start`](SplitTimer::start) (or creation).
    fn elapsed_ms(&self) -> f64;
}

/// Wall-clock [`SplitTimer`].
#[derive(Clone, Debug)]
pub struct Stopwatch {
    started: Instant,
}

impl Stopwatch {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
        }
    }
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::new()
    }
}

impl SplitTimer for Stopwatch {
    fn start(&mut self) {
        self.started = Instant::now();
    }

    fn elapsed_ms(&self) -> f64 {
        self.started.elapsed().as_secs_f64() * 1000.0
    }
}
