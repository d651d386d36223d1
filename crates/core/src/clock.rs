//! Fixed-rate logic clock fed by variable display frames.

/// Accumulates frame time and hands out whole logic ticks. A long stall is capped at
/// `max_ticks_per_frame` and the backlog is dropped rather than replayed.
#[derive(Clone, Debug, PartialEq)]
pub struct TickClock {
    tick_seconds: f64,
    max_ticks_per_frame: u32,
    accumulator: f64,
}

impl TickClock {
    pub fn new(tick_rate_hz: u32, max_ticks_per_frame: u32) -> Self {
        Self {
            tick_seconds: 1.0 / f64::from(tick_rate_hz.max(1)),
            max_ticks_per_frame: max_ticks_per_frame.max(1),
            accumulator: 0.0,
        }
    }

    pub fn advance(&mut self, frame_seconds: f64) -> u32 {
        if frame_seconds.is_finite() && frame_seconds > 0.0 {
            self.accumulator += frame_seconds;
        }
        let due = (self.accumulator / self.tick_seconds).floor();
        if due >= f64::from(self.max_ticks_per_frame) {
            self.accumulator = 0.0;
            return self.max_ticks_per_frame;
        }
        let ticks = due as u32;
        self.accumulator -= f64::from(ticks) * self.tick_seconds;
        ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sixty_hz_frames_yield_thirty_hz_ticks() {
        let mut clock = TickClock::new(30, 8);
        let ticks: u32 = (0..60).map(|_| clock.advance(1.0 / 60.0)).sum();
        assert!((29..=30).contains(&ticks), "got {ticks}");
    }

    #[test]
    fn long_stall_is_capped() {
        let mut clock = TickClock::new(30, 8);
        assert_eq!(clock.advance(5.0), 8);
        assert_eq!(clock.advance(0.0), 0);
        assert_eq!(clock.advance(0.02), 0, "backlog was dropped");
    }

    #[test]
    fn bad_frame_times_are_ignored() {
        let mut clock = TickClock::new(30, 8);
        assert_eq!(clock.advance(f64::NAN), 0);
        assert_eq!(clock.advance(-1.0), 0);
        assert_eq!(clock.advance(0.05), 1);
        assert_eq!(clock.advance(0.02), 1, "remainder carries into the next frame");
    }
}
