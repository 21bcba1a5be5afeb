use std::time::{SystemTime, UNIX_EPOCH};

/// Source of "now" in seconds. Sample timestamps and timer deadlines share
/// this time base.
pub trait Clock {
    fn now(&self) -> f64;
}

/// Wall-clock seconds since the unix epoch. gpsd reports wall-clock times, so
/// the session clock uses the same base.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> f64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs_f64())
            .unwrap_or(0.0)
    }
}

const MAX_CATCH_UP_TICKS: u32 = 4;

/// Fixed-period timer polled from the UI loop.
///
/// A cancelled ticker never reports due ticks, so owners can stop a timer
/// synchronously and be sure no tick fires afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Ticker {
    period: f64,
    next_due: Option<f64>,
}

impl Ticker {
    pub fn with_rate(hz: f64) -> Self {
        Self {
            period: 1.0 / hz,
            next_due: None,
        }
    }

    pub fn period(&self) -> f64 {
        self.period
    }

    pub fn arm(&mut self, now: f64) {
        self.next_due = Some(now + self.period);
    }

    pub fn cancel(&mut self) {
        self.next_due = None;
    }

    pub fn is_armed(&self) -> bool {
        self.next_due.is_some()
    }

    /// Number of ticks that became due up to `now`, advancing the deadline.
    ///
    /// After a long stall (suspend, clock jump) at most
    /// `MAX_CATCH_UP_TICKS` are reported and the schedule restarts from `now`.
    pub fn due(&mut self, now: f64) -> u32 {
        let Some(next) = self.next_due else {
            return 0;
        };

        if next - now > self.period * 2.0 {
            // wall clock went backwards
            self.next_due = Some(now + self.period);
            return 0;
        }
        if now < next {
            return 0;
        }

        let behind = ((now - next) / self.period).floor() + 1.0;
        if behind > MAX_CATCH_UP_TICKS as f64 {
            self.next_due = Some(now + self.period);
            return MAX_CATCH_UP_TICKS;
        }
        let ticks = behind as u32;
        self.next_due = Some(next + ticks as f64 * self.period);
        ticks
    }
}
