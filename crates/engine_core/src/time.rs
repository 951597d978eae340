//! Frame timing and the fixed animation tick.

use std::time::{Duration, Instant};

/// Default tick interval (~60 Hz).
pub const DEFAULT_TICK: Duration = Duration::from_millis(16);
/// Ticks replayed at most per frame after a stall.
const MAX_CATCH_UP_TICKS: u32 = 8;

/// Converts wall-clock frame time into a whole number of fixed animation ticks.
#[derive(Debug)]
pub struct AnimationClock {
    last_frame: Option<Instant>,
    tick: Duration,
    accumulator: Duration,
    frame_count: u64,
}

impl Default for AnimationClock {
    fn default() -> Self {
        Self::new(DEFAULT_TICK)
    }
}

impl AnimationClock {
    pub fn new(tick: Duration) -> Self {
        Self {
            last_frame: None,
            tick: tick.max(Duration::from_millis(1)),
            accumulator: Duration::ZERO,
            frame_count: 0,
        }
    }

    /// Tick interval in seconds.
    pub fn tick_seconds(&self) -> f32 {
        self.tick.as_secs_f32()
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Sample the wall clock and return how many ticks are due this frame.
    pub fn update(&mut self) -> u32 {
        let now = Instant::now();
        let delta = match self.last_frame.replace(now) {
            Some(last) => now - last,
            None => Duration::ZERO,
        };
        self.advance(delta)
    }

    /// Add `delta` to the accumulator and consume whole ticks. After a long
    /// stall the backlog beyond `MAX_CATCH_UP_TICKS` is dropped.
    pub fn advance(&mut self, delta: Duration) -> u32 {
        self.frame_count += 1;
        self.accumulator += delta;

        let mut ticks = 0;
        while self.accumulator >= self.tick {
            self.accumulator -= self.tick;
            ticks += 1;
            if ticks == MAX_CATCH_UP_TICKS {
                log::debug!("Animation clock fell behind, dropping {:?}", self.accumulator);
                self.accumulator = Duration::ZERO;
                break;
            }
        }
        ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_ticks_are_consumed() {
        let mut clock = AnimationClock::new(Duration::from_millis(16));
        assert_eq!(clock.advance(Duration::from_millis(10)), 0);
        assert_eq!(clock.advance(Duration::from_millis(10)), 1);
        assert_eq!(clock.advance(Duration::from_millis(40)), 2);
        assert_eq!(clock.frame_count(), 3);
    }

    #[test]
    fn stall_is_capped() {
        let mut clock = AnimationClock::default();
        assert_eq!(clock.advance(Duration::from_secs(5)), MAX_CATCH_UP_TICKS);
        assert_eq!(clock.advance(Duration::from_millis(1)), 0);
    }

    #[test]
    fn first_update_has_no_ticks() {
        let mut clock = AnimationClock::default();
        assert_eq!(clock.update(), 0);
    }
}
