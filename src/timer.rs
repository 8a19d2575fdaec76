//! Stage timing.

use std::{
    fmt,
    time::{Duration, Instant},
};

/// A timer that measures how long an operation takes.
///
/// Displaying the timer using `{}` ([`std::fmt::Display`]) prints the number of recorded runs and
/// their average duration, e.g. `encode: 1x12.3ms`.
pub struct Timer {
    name: &'static str,
    durations: Vec<Duration>,
}

impl Timer {
    /// Creates a new timer.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            durations: Vec::new(),
        }
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Invokes a closure, measuring and recording the time it takes.
    pub fn time<T>(&mut self, timee: impl FnOnce() -> T) -> T {
        let _guard = self.start();
        timee()
    }

    /// Starts timing an operation using a drop guard.
    ///
    /// When the returned [`TimerGuard`] is dropped, the time between the call to `start` and the
    /// drop is measured and recorded.
    pub fn start(&mut self) -> TimerGuard<'_> {
        TimerGuard {
            start: Instant::now(),
            timer: self,
        }
    }

    /// Returns how many runs have been recorded.
    pub fn runs(&self) -> usize {
        self.durations.len()
    }

    /// Returns the total time of all recorded runs.
    pub fn total(&self) -> Duration {
        self.durations.iter().sum()
    }
}

impl fmt::Display for Timer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let len = self.durations.len();
        let avg_ms = match len {
            0 => 0.0,
            _ => self.total().as_secs_f32() * 1000.0 / len as f32,
        };
        write!(f, "{}: {len}x{avg_ms:.01}ms", self.name)
    }
}

/// Guard returned by [`Timer::start`]. Stops timing the operation when dropped.
pub struct TimerGuard<'a> {
    start: Instant,
    timer: &'a mut Timer,
}

impl Drop for TimerGuard<'_> {
    fn drop(&mut self) {
        self.timer.durations.push(self.start.elapsed());
    }
}
