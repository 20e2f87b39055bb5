use std::fmt;
use std::time::{Duration, Instant};

/// Wall-clock timer around a single operation.
#[derive(Debug, Default)]
pub struct Timer {
    started: Option<Instant>,
    elapsed: Duration,
}

impl Timer {

    pub fn new() -> Self {
        Timer::default()
    }

    pub fn start(&mut self) {
        self.started = Some(Instant::now());
    }

    /// Stops a running timer, stopping a timer that never started is a no-op.
    pub fn stop(&mut self) {
        if let Some(started) = self.started.take() {
            self.elapsed = started.elapsed();
        }
    }

    /// Elapsed seconds of the last timed interval.
    pub fn interval(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Times `operation`. The interval is recorded whatever the operation returns, so failures
    /// are timed as well and can be propagated by the caller afterwards.
    pub fn time<T, F>(&mut self, operation: F) -> T
        where F: FnOnce() -> T {

        self.start();
        let result = operation();
        self.stop();

        result
    }
}

impl fmt::Display for Timer {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:.4}", self.interval())
    }
}
