use std::time::{Duration, Instant};

/// Baseline tick rate the simulation is normalized against.
const BASELINE_TICKS_PER_SECOND: f32 = 60.0;

/// Wall-clock frame timer that normalizes elapsed time against a 60 Hz
/// baseline, so per-tick motion is independent of the host's actual frame
/// rate.
pub struct FrameClock {
    last: Instant,
    pub delta: Duration,
}

impl FrameClock {
    pub fn new() -> Self {
        Self { last: Instant::now(), delta: Duration::ZERO }
    }

    /// Advances the clock and returns the frame multiplier: 1.0 at exactly
    /// 60 ticks/second, 2.0 when a tick took two baseline frames, and so on.
    ///
    /// Callers that skip work while paused must still tick the clock every
    /// frame; the timestamp always advances, so resuming after an
    /// arbitrarily long gap never yields a catch-up delta.
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        self.delta = now - self.last;
        self.last = now;
        self.delta.as_secs_f32() * BASELINE_TICKS_PER_SECOND
    }

    /// Re-arms the timestamp without producing a delta.
    pub fn reset(&mut self) {
        self.last = Instant::now();
        self.delta = Duration::ZERO;
    }

    pub fn delta_seconds(&self) -> f32 {
        self.delta.as_secs_f32()
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
