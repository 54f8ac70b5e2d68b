use std::time::Duration;

/// One display frame at 60 Hz. Continuous games step once per frame.
pub const FRAME_INTERVAL: Duration = Duration::from_micros(16_667);

/// Upper bound on steps run for a single frame. Anything beyond is dropped
/// so a stalled terminal does not replay a burst of ticks.
pub const MAX_CATCH_UP_STEPS: u32 = 4;

/// Converts elapsed wall-clock time into whole simulation steps at a fixed
/// interval.
#[derive(Debug, Clone)]
pub struct Ticker {
    interval: Duration,
    pending: Duration,
}

impl Ticker {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval: interval.max(Duration::from_millis(1)),
            pending: Duration::ZERO,
        }
    }

    /// Accumulate `elapsed` and return how many steps are now due.
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        self.pending += elapsed;
        let mut steps = 0;
        while self.pending >= self.interval && steps < MAX_CATCH_UP_STEPS {
            self.pending -= self.interval;
            steps += 1;
        }
        if self.pending >= self.interval {
            self.pending = Duration::ZERO;
        }
        steps
    }

    pub fn reset(&mut self) {
        self.pending = Duration::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulates_partial_frames() {
        let mut t = Ticker::new(Duration::from_millis(200));
        assert_eq!(t.advance(Duration::from_millis(120)), 0);
        assert_eq!(t.advance(Duration::from_millis(120)), 1);
        // 40ms carried over
        assert_eq!(t.advance(Duration::from_millis(160)), 1);
    }

    #[test]
    fn test_catch_up_is_capped() {
        let mut t = Ticker::new(Duration::from_millis(10));
        assert_eq!(t.advance(Duration::from_secs(5)), MAX_CATCH_UP_STEPS);
        // the backlog was dropped
        assert_eq!(t.advance(Duration::from_millis(5)), 0);
    }

    #[test]
    fn test_reset_discards_pending() {
        let mut t = Ticker::new(Duration::from_millis(100));
        t.advance(Duration::from_millis(90));
        t.reset();
        assert_eq!(t.advance(Duration::from_millis(20)), 0);
    }
}
