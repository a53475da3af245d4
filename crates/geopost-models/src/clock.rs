//! Time source injected into [`MessageFactory`](crate::MessageFactory).

use std::cell::Cell;

use chrono::TimeDelta;

use crate::timestamp::Timestamp;

/// Supplies the posting time of new messages.
pub trait Clock {
    /// The current time.
    fn now(&self) -> Timestamp;
}

/// The machine's local wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalClock;

impl Clock for LocalClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Cell<Timestamp>,
}

impl ManualClock {
    /// Start the clock at `start`.
    pub fn new(start: Timestamp) -> Self {
        Self {
            now: Cell::new(start),
        }
    }

    /// Jump to `at`.
    pub fn set(&self, at: Timestamp) {
        self.now.set(at);
    }

    /// Move forward by `delta`.
    pub fn advance(&self, delta: TimeDelta) {
        let next = self.now.get().as_naive() + delta;
        self.now.set(Timestamp::new(next));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        self.now.get()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Timestamp {
        (**self).now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_advances() {
        let clock = ManualClock::new("2024-01-01 10:00:00".parse().unwrap());
        assert_eq!(clock.now().to_string(), "2024-01-01 10:00:00");
        clock.advance(TimeDelta::minutes(1));
        assert_eq!(clock.now().to_string(), "2024-01-01 10:01:00");
    }

    #[test]
    fn manual_clock_set() {
        let clock = ManualClock::new("2024-01-01 10:00:00".parse().unwrap());
        clock.set("2025-06-30 23:59:59".parse().unwrap());
        assert_eq!(clock.now().to_string(), "2025-06-30 23:59:59");
    }

    #[test]
    fn local_clock_has_whole_seconds() {
        use chrono::Timelike;
        assert_eq!(LocalClock.now().as_naive().nanosecond(), 0);
    }
}
