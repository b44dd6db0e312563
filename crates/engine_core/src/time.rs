//! Time sources for the poll loop.

use std::cell::Cell;
use std::time::{Duration, Instant};

/// A monotonically non-decreasing time source.
///
/// `now()` reports the time elapsed since the clock's origin, the way a
/// microcontroller's millisecond counter does.
pub trait Clock {
    fn now(&self) -> Duration;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Duration {
        (**self).now()
    }
}

/// Wall-clock backed by [`Instant`], starting at zero when created.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self { origin: Instant::now() }
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Hand-driven clock for simulations and tests.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start the clock at `start` instead of zero.
    pub fn starting_at(start: Duration) -> Self {
        Self { now: Cell::new(start) }
    }

    /// Move the clock forward by `delta`.
    pub fn advance(&self, delta: Duration) {
        self.now.set(self.now.get().saturating_add(delta));
    }

    /// Jump to `at`. Earlier values are ignored so the clock never runs backwards.
    pub fn set(&self, at: Duration) {
        if at > self.now.get() {
            self.now.set(at);
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

/// Fixed-period pacing for a polling loop.
#[derive(Debug)]
pub struct TickTimer {
    /// Target time between two ticks.
    period: Duration,
    /// Time of the last tick, `None` before the first one.
    last_tick: Option<Duration>,
    /// Ticks marked since creation.
    tick_count: u64,
}

impl TickTimer {
    /// Create a timer ticking every `period`.
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            last_tick: None,
            tick_count: 0,
        }
    }

    /// Create a timer from a period in milliseconds.
    pub fn from_millis(period_ms: u64) -> Self {
        Self::new(Duration::from_millis(period_ms))
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// How long to wait at `now` before the next tick is due. Zero if it is due already.
    pub fn until_next_tick(&self, now: Duration) -> Duration {
        match self.last_tick {
            Some(last) => (last + self.period).saturating_sub(now),
            None => Duration::ZERO,
        }
    }

    /// Record that a tick ran at `now`.
    pub fn mark_tick(&mut self, now: Duration) {
        self.last_tick = Some(now);
        self.tick_count += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_advances() {
        let clock = ManualClock::new();
        assert_eq!(clock.now(), Duration::ZERO);
        clock.advance(Duration::from_millis(100));
        clock.advance(Duration::from_millis(50));
        assert_eq!(clock.now(), Duration::from_millis(150));
    }

    #[test]
    fn manual_clock_never_runs_backwards() {
        let clock = ManualClock::starting_at(Duration::from_secs(5));
        clock.set(Duration::from_secs(2));
        assert_eq!(clock.now(), Duration::from_secs(5));
        clock.set(Duration::from_secs(7));
        assert_eq!(clock.now(), Duration::from_secs(7));
    }

    #[test]
    fn monotonic_clock_is_non_decreasing() {
        let clock = MonotonicClock::new();
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }

    #[test]
    fn tick_timer_first_tick_is_due_immediately() {
        let timer = TickTimer::from_millis(100);
        assert_eq!(timer.until_next_tick(Duration::from_millis(3)), Duration::ZERO);
    }

    #[test]
    fn tick_timer_waits_out_the_period() {
        let mut timer = TickTimer::from_millis(100);
        timer.mark_tick(Duration::from_millis(1000));
        assert_eq!(timer.until_next_tick(Duration::from_millis(1030)), Duration::from_millis(70));
        assert_eq!(timer.until_next_tick(Duration::from_millis(1200)), Duration::ZERO);
        assert_eq!(timer.tick_count(), 1);
    }
}
