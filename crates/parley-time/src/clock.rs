//! Clock implementations

use std::time::{Duration, Instant};

use parking_lot::Mutex;

/// Source of monotonic instants
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// OS monotonic clock
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to
#[derive(Debug)]
pub struct ManualClock {
    current: Mutex<Instant>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    pub fn starting_at(start: Instant) -> Self {
        ManualClock {
            current: Mutex::new(start),
        }
    }

    /// Move the clock forward
    pub fn advance(&self, dt: Duration) {
        let mut current = self.current.lock();
        *current += dt;
    }

    /// Move the clock backward. Saturates at the earliest representable instant.
    pub fn rewind(&self, dt: Duration) {
        let mut current = self.current.lock();
        if let Some(earlier) = current.checked_sub(dt) {
            *current = earlier;
        }
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.current.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_advance() {
        let start = Instant::now();
        let clock = ManualClock::starting_at(start);

        assert_eq!(clock.now(), start);
        clock.advance(Duration::from_millis(250));
        assert_eq!(clock.now(), start + Duration::from_millis(250));
    }

    #[test]
    fn test_manual_clock_rewind() {
        let start = Instant::now() + Duration::from_secs(10);
        let clock = ManualClock::starting_at(start);

        clock.rewind(Duration::from_secs(1));
        assert_eq!(clock.now(), start - Duration::from_secs(1));
    }

    #[test]
    fn test_system_clock_monotonic() {
        let clock = SystemClock;
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }
}
