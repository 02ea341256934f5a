#![forbid(unsafe_code)]

//! Frame clock for the animation context.
//!
//! Hosts call [`FrameClock::tick`] with the timestamp of each frame they
//! render. The clock returns the elapsed delta, capped so that a stalled
//! frame (app backgrounded, debugger pause) never hands a spring a huge step.

use std::time::Duration;

use web_time::Instant;

/// Default cap on a single frame delta (~30fps).
pub const DEFAULT_MAX_DELTA: Duration = Duration::from_millis(33);

/// Converts frame timestamps into bounded deltas.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Option<Instant>,
    max_delta: Duration,
    frames: u64,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DELTA)
    }
}

impl FrameClock {
    #[must_use]
    pub fn new(max_delta: Duration) -> Self {
        Self {
            last: None,
            max_delta,
            frames: 0,
        }
    }

    /// Record a frame at `now` and return the delta since the previous one.
    ///
    /// The first frame returns `Duration::ZERO`. Timestamps that go
    /// backwards also return zero.
    pub fn tick(&mut self, now: Instant) -> Duration {
        let dt = match self.last {
            Some(prev) if now > prev => now.duration_since(prev).min(self.max_delta),
            _ => Duration::ZERO,
        };
        if self.last.is_none_or(|prev| now > prev) {
            self.last = Some(now);
        }
        self.frames += 1;
        dt
    }

    /// Forget the previous timestamp; the next tick returns zero.
    pub fn reset(&mut self) {
        self.last = None;
    }

    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    #[must_use]
    pub fn max_delta(&self) -> Duration {
        self.max_delta
    }
}
