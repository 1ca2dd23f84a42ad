//! Frame pacing.
//!
//! The runtime ticks one [`FrameClock`] per presented frame. The carousel only
//! ever sees the resulting deltas, never the wall clock, so its timers run the
//! same under test as on screen.

use std::time::{Duration, Instant};

/// Longest step a single frame may report. A window that stalls (dragged,
/// debugger paused) resumes where it left off instead of skipping ahead.
pub const MAX_FRAME_STEP: Duration = Duration::from_millis(250);

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FrameTime {
    /// Time since the previous frame, at most [`MAX_FRAME_STEP`].
    pub delta: Duration,
    /// Frames since the clock was created.
    pub index: u64,
}

impl FrameTime {
    #[inline]
    pub fn delta(&self) -> Duration {
        self.delta
    }
}

#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last: Option<Instant>,
    frames: u64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forgets the previous frame; the next tick reports a zero delta.
    /// Used when the window comes back from being hidden.
    pub fn reset(&mut self) {
        self.last = None;
    }

    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    pub fn tick_at(&mut self, now: Instant) -> FrameTime {
        let delta = self
            .last
            .map_or(Duration::ZERO, |last| now.saturating_duration_since(last).min(MAX_FRAME_STEP));
        self.last = Some(now);

        let index = self.frames;
        self.frames += 1;
        FrameTime { delta, index }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_tick_and_post_reset_tick_are_zero() {
        let mut clock = FrameClock::new();
        let t0 = Instant::now();
        assert_eq!(clock.tick_at(t0).delta, Duration::ZERO);
        assert_eq!(clock.tick_at(t0 + Duration::from_millis(16)).delta, Duration::from_millis(16));

        clock.reset();
        assert_eq!(clock.tick_at(t0 + Duration::from_secs(5)).delta, Duration::ZERO);
    }

    #[test]
    fn long_stalls_are_capped() {
        let mut clock = FrameClock::new();
        let t0 = Instant::now();
        clock.tick_at(t0);
        assert_eq!(clock.tick_at(t0 + Duration::from_secs(10)).delta, MAX_FRAME_STEP);
    }

    #[test]
    fn frames_are_counted_across_resets() {
        let mut clock = FrameClock::new();
        let t0 = Instant::now();
        assert_eq!(clock.tick_at(t0).index, 0);
        clock.reset();
        assert_eq!(clock.tick_at(t0).index, 1);
    }
}
