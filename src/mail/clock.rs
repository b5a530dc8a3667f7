use chrono::{DateTime, Duration, Utc};
use std::cell::Cell;
use std::rc::Rc;

/// Source of wall-clock time
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Hand-driven clock. Clones share the same instant.
#[derive(Debug, Clone)]
pub struct ManualClock(Rc<Cell<DateTime<Utc>>>);

impl ManualClock {
    pub fn new(at: DateTime<Utc>) -> Self {
        Self(Rc::new(Cell::new(at)))
    }

    pub fn set(&self, at: DateTime<Utc>) {
        self.0.set(at);
    }

    pub fn advance(&self, by: Duration) {
        self.0.set(self.0.get() + by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.0.get()
    }
}

/// Logical "now" used for snooze evaluation.
///
/// It only moves when a full period of wall time has passed since the last
/// tick, so every view computed between two ticks sees the same instant.
#[derive(Debug, Clone)]
pub struct Ticker {
    period: Duration,
    now: DateTime<Utc>,
}

impl Ticker {
    pub fn new(start: DateTime<Utc>, period: Duration) -> Self {
        Self { period, now: start }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Advance to `wall` if a period has elapsed. Returns true if now moved.
    pub fn poll(&mut self, wall: DateTime<Utc>) -> bool {
        if wall - self.now >= self.period {
            self.now = wall;
            true
        } else {
            false
        }
    }

    /// Jump straight to `wall`, e.g. after a user action that needs fresh time
    pub fn sync(&mut self, wall: DateTime<Utc>) {
        self.now = wall;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_manual_clock_clones_share_time() {
        let start = Utc.with_ymd_and_hms(2026, 5, 4, 9, 0, 0).unwrap();
        let clock = ManualClock::new(start);
        let handle = clock.clone();
        handle.advance(Duration::minutes(5));
        assert_eq!(clock.now(), start + Duration::minutes(5));
    }

    #[test]
    fn test_ticker_moves_only_on_full_period() {
        let start = Utc.with_ymd_and_hms(2026, 5, 4, 9, 0, 0).unwrap();
        let mut ticker = Ticker::new(start, Duration::seconds(30));

        assert!(!ticker.poll(start + Duration::seconds(29)));
        assert_eq!(ticker.now(), start);

        assert!(ticker.poll(start + Duration::seconds(31)));
        assert_eq!(ticker.now(), start + Duration::seconds(31));

        assert!(!ticker.poll(start + Duration::seconds(45)));
        assert_eq!(ticker.now(), start + Duration::seconds(31));
    }
}
