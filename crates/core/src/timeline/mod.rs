use std::time::Duration;

/// Accumulated playback time, fed either by a wall clock or by a simulation.
#[derive(Debug, Default, Clone)]
pub struct PlaybackClock {
    elapsed: Duration,
}

impl PlaybackClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.elapsed = Duration::ZERO;
    }

    pub fn advance(&mut self, delta: Duration) {
        self.elapsed += delta;
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }
}

/// Fixed-step tick source.
///
/// Callers report elapsed time at whatever cadence they run at; the
/// scheduler answers with the number of whole redraw periods that became
/// due and carries the remainder forward.
#[derive(Debug, Clone)]
pub struct TickScheduler {
    interval: Duration,
    pending: Duration,
    ticks: u64,
}

impl TickScheduler {
    /// A zero interval is bumped to one millisecond.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval: interval.max(Duration::from_millis(1)),
            pending: Duration::ZERO,
            ticks: 0,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Number of ticks issued so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Time left until the next tick is due.
    pub fn until_next(&self) -> Duration {
        self.interval - self.pending
    }

    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        self.pending += elapsed;
        let mut due = 0;
        while self.pending >= self.interval {
            self.pending -= self.interval;
            due += 1;
        }
        self.ticks += u64::from(due);
        due
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_accumulates_and_resets() {
        let mut clock = PlaybackClock::new();
        clock.advance(Duration::from_millis(15));
        clock.advance(Duration::from_millis(30));
        assert_eq!(clock.elapsed(), Duration::from_millis(45));

        clock.reset();
        assert_eq!(clock.elapsed(), Duration::ZERO);
    }

    #[test]
    fn carries_remainder_between_polls() {
        let mut scheduler = TickScheduler::new(Duration::from_millis(40));

        assert_eq!(scheduler.advance(Duration::from_millis(25)), 0);
        assert_eq!(scheduler.until_next(), Duration::from_millis(15));
        assert_eq!(scheduler.advance(Duration::from_millis(25)), 1);
        assert_eq!(scheduler.advance(Duration::from_millis(95)), 2);
        assert_eq!(scheduler.ticks(), 3);
        assert_eq!(scheduler.until_next(), Duration::from_millis(15));
    }

    #[test]
    fn frequent_small_polls_do_not_speed_up_ticks() {
        let mut scheduler = TickScheduler::new(Duration::from_millis(40));
        let due: u32 = (0..400)
            .map(|_| scheduler.advance(Duration::from_millis(1)))
            .sum();
        assert_eq!(due, 10);
    }

    #[test]
    fn zero_interval_is_clamped() {
        let scheduler = TickScheduler::new(Duration::ZERO);
        assert_eq!(scheduler.interval(), Duration::from_millis(1));
    }
}
