//! Pacing controller
//!
//! The listener waits, before each message, as long as elapsed since it
//! started on the previous one, capped by a ceiling. A fast sender is
//! mirrored; a stalled sender costs at most the ceiling.

use std::time::{Duration, Instant};

use parking_lot::Mutex;

/// Default maximum inter-message delay
pub const DEFAULT_PACING_CEILING: Duration = Duration::from_millis(5000);

/// `min(now - last_received, ceiling)`, zero if the clock moved backward
pub fn next_delay(now: Instant, last_received: Instant, ceiling: Duration) -> Duration {
    now.checked_duration_since(last_received)
        .unwrap_or(Duration::ZERO)
        .min(ceiling)
}

/// Pacing state owned by a single listener
#[derive(Debug)]
pub struct PacingController {
    last_received: Mutex<Instant>,
    ceiling: Duration,
}

impl PacingController {
    pub fn new(start: Instant, ceiling: Duration) -> Self {
        PacingController {
            last_received: Mutex::new(start),
            ceiling,
        }
    }

    /// Compute the delay for `now` and record `now` as the last receive time.
    /// Both happen under one lock so elapsed time is never counted twice.
    pub fn advance(&self, now: Instant) -> Duration {
        let mut last = self.last_received.lock();
        let delay = next_delay(now, *last, self.ceiling);
        *last = now;
        delay
    }

    pub fn last_received(&self) -> Instant {
        *self.last_received.lock()
    }

    pub fn ceiling(&self) -> Duration {
        self.ceiling
    }
}
