use std::time::Duration;

/// Upper bound on generations computed for a single rendered frame.
///
/// A stalled frame drops whatever backlog remains beyond this.
pub(crate) const MAX_CATCH_UP_TICKS: u32 = 4;

/// Converts frame time into a number of generations to compute.
#[derive(Clone, Copy, Debug)]
pub(crate) struct TickClock {
    interval: Duration,
    accumulated: Duration,
    paused: bool,
}

impl TickClock {
    /// Creates a running clock producing `generations_per_second` ticks.
    pub(crate) fn new(generations_per_second: u32) -> Self {
        Self {
            interval: Duration::from_secs(1) / generations_per_second.max(1),
            accumulated: Duration::ZERO,
            paused: false,
        }
    }

    pub(crate) fn is_paused(&self) -> bool {
        self.paused
    }

    pub(crate) fn toggle_pause(&mut self) {
        self.paused = !self.paused;
        self.accumulated = Duration::ZERO;
    }

    /// Advances the clock by one frame and returns how many generations are due.
    ///
    /// A step request only has an effect while paused, where it yields exactly one.
    pub(crate) fn advance(&mut self, frame: Duration, step_requested: bool) -> u32 {
        if self.paused {
            return u32::from(step_requested);
        }

        self.accumulated += frame;
        let mut due = 0;
        while self.accumulated >= self.interval && due < MAX_CATCH_UP_TICKS {
            self.accumulated -= self.interval;
            due += 1;
        }
        if self.accumulated >= self.interval {
            self.accumulated = Duration::ZERO;
        }
        due
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_generation_per_interval() {
        let mut clock = TickClock::new(60);
        let frame = Duration::from_nanos(16_666_667);

        for _ in 0..10 {
            assert_eq!(clock.advance(frame, false), 1);
        }
    }

    #[test]
    fn short_frames_accumulate() {
        let mut clock = TickClock::new(20);
        let frame = Duration::from_millis(25);

        assert_eq!(clock.advance(frame, false), 0);
        assert_eq!(clock.advance(frame, false), 1);
        assert_eq!(clock.advance(frame, false), 0);
        assert_eq!(clock.advance(frame, false), 1);
    }

    #[test]
    fn stalled_frames_catch_up_a_bounded_amount() {
        let mut clock = TickClock::new(60);

        assert_eq!(clock.advance(Duration::from_secs(2), false), MAX_CATCH_UP_TICKS);
        assert_eq!(clock.advance(Duration::ZERO, false), 0);
    }

    #[test]
    fn paused_clock_only_steps_on_request() {
        let mut clock = TickClock::new(60);
        clock.toggle_pause();

        assert!(clock.is_paused());
        assert_eq!(clock.advance(Duration::from_secs(1), false), 0);
        assert_eq!(clock.advance(Duration::from_secs(1), true), 1);

        clock.toggle_pause();
        assert!(!clock.is_paused());
        assert_eq!(clock.advance(Duration::ZERO, true), 0);
    }
}
