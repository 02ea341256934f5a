#![forbid(unsafe_code)]

//! Damped harmonic oscillator (spring) animation in pixel space.
//!
//! Based on the classical damped spring equation:
//!
//!   F = -stiffness × (position - target) - damping × velocity
//!
//! with unit mass. Positions are pixels; velocities are pixels per second.
//!
//! # Parameters
//!
//! - **stiffness** (k): restoring force. Higher = faster response.
//! - **damping** (c): velocity drag. `c ≈ 2√k` is critical damping, the
//!   fastest convergence without overshoot.
//! - **rest_threshold**: distance (px) under which the spring may rest.
//! - **velocity_threshold**: speed (px/s) under which the spring may rest.
//!
//! # Integration
//!
//! Semi-implicit Euler, subdivided into steps of at most 4ms so stiff springs
//! stay stable when a frame arrives late.
//!
//! # Invariants
//!
//! 1. A spring at rest stays at rest until [`Spring::retarget`] moves the
//!    target or [`Spring::impulse`] adds velocity.
//! 2. When a spring comes to rest its position snaps exactly to the target,
//!    so resting offsets compare equal to the prefix sums they came from.
//! 3. Stiffness is at least 0.1 and damping is non-negative.

use std::time::Duration;

use super::Animation;

/// Maximum dt per integration step.
const MAX_STEP_SECS: f64 = 0.004;

/// Default rest distance (px).
const DEFAULT_REST_THRESHOLD: f64 = 0.1;

/// Default rest speed (px/s).
const DEFAULT_VELOCITY_THRESHOLD: f64 = 1.0;

const MIN_STIFFNESS: f64 = 0.1;

/// Stiffness/damping pair, the portable part of a spring's configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringParams {
    pub stiffness: f64,
    pub damping: f64,
}

impl SpringParams {
    #[must_use]
    pub const fn new(stiffness: f64, damping: f64) -> Self {
        Self { stiffness, damping }
    }

    /// Settle of a released row: snappy with a hint of overshoot.
    #[must_use]
    pub const fn settle() -> Self {
        Self::new(300.0, 30.0)
    }

    /// Rows sliding out of the way of a dragged row: near-critical.
    #[must_use]
    pub const fn rows() -> Self {
        Self::new(400.0, 38.0)
    }

    /// Edit-mode header growing and collapsing.
    #[must_use]
    pub const fn header() -> Self {
        Self::new(170.0, 26.0)
    }

    /// Critical damping coefficient for this stiffness.
    #[must_use]
    pub fn critical_damping(&self) -> f64 {
        2.0 * self.stiffness.max(MIN_STIFFNESS).sqrt()
    }
}

impl Default for SpringParams {
    fn default() -> Self {
        Self::settle()
    }
}

/// A damped spring moving a pixel value toward a target.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use relist_core::animation::{Spring, SpringParams};
///
/// let mut spring = Spring::new(0.0, 120.0).with_params(SpringParams::settle());
/// for _ in 0..120 {
///     spring.advance(Duration::from_millis(16));
/// }
/// assert!(spring.is_at_rest());
/// assert_eq!(spring.position(), 120.0);
/// ```
#[derive(Debug, Clone)]
pub struct Spring {
    position: f64,
    velocity: f64,
    target: f64,
    initial: f64,
    stiffness: f64,
    damping: f64,
    rest_threshold: f64,
    velocity_threshold: f64,
    at_rest: bool,
}

impl Spring {
    /// Create a spring at `initial` heading for `target`.
    ///
    /// Uses [`SpringParams::settle`] until told otherwise.
    #[must_use]
    pub fn new(initial: f64, target: f64) -> Self {
        let params = SpringParams::settle();
        Self {
            position: initial,
            velocity: 0.0,
            target,
            initial,
            stiffness: params.stiffness,
            damping: params.damping,
            rest_threshold: DEFAULT_REST_THRESHOLD,
            velocity_threshold: DEFAULT_VELOCITY_THRESHOLD,
            at_rest: (initial - target).abs() <= f64::EPSILON,
        }
    }

    /// A spring resting at `position`.
    #[must_use]
    pub fn at(position: f64) -> Self {
        Self::new(position, position)
    }

    #[must_use]
    pub fn with_params(mut self, params: SpringParams) -> Self {
        self.stiffness = params.stiffness.max(MIN_STIFFNESS);
        self.damping = params.damping.max(0.0);
        self
    }

    #[must_use]
    pub fn with_rest_threshold(mut self, threshold: f64) -> Self {
        self.rest_threshold = threshold.abs();
        self
    }

    #[must_use]
    pub fn with_velocity_threshold(mut self, threshold: f64) -> Self {
        self.velocity_threshold = threshold.abs();
        self
    }

    #[inline]
    #[must_use]
    pub fn position(&self) -> f64 {
        self.position
    }

    #[inline]
    #[must_use]
    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    #[inline]
    #[must_use]
    pub fn target(&self) -> f64 {
        self.target
    }

    #[inline]
    #[must_use]
    pub fn params(&self) -> SpringParams {
        SpringParams::new(self.stiffness, self.damping)
    }

    #[inline]
    #[must_use]
    pub fn is_at_rest(&self) -> bool {
        self.at_rest
    }

    /// Move the target, keeping current position and velocity. Wakes the
    /// spring if the target actually changed.
    pub fn retarget(&mut self, target: f64) {
        if (self.target - target).abs() > f64::EPSILON {
            self.target = target;
            self.at_rest = false;
        }
    }

    /// Jump to `position` and rest there. No animation.
    pub fn snap_to(&mut self, position: f64) {
        self.position = position;
        self.target = position;
        self.initial = position;
        self.velocity = 0.0;
        self.at_rest = true;
    }

    /// Add velocity. Wakes the spring.
    pub fn impulse(&mut self, velocity_delta: f64) {
        self.velocity += velocity_delta;
        self.at_rest = false;
    }

    fn step(&mut self, dt: f64) {
        let displacement = self.position - self.target;
        let acceleration = -self.stiffness * displacement - self.damping * self.velocity;
        self.velocity += acceleration * dt;
        self.position += self.velocity * dt;
    }

    /// Advance by `dt`, subdividing for stability.
    pub fn advance(&mut self, dt: Duration) {
        if self.at_rest {
            return;
        }
        let total_secs = dt.as_secs_f64();
        if total_secs <= 0.0 {
            return;
        }

        let mut remaining = total_secs;
        while remaining > 0.0 {
            let step_dt = remaining.min(MAX_STEP_SECS);
            self.step(step_dt);
            remaining -= step_dt;
        }

        if (self.position - self.target).abs() < self.rest_threshold
            && self.velocity.abs() < self.velocity_threshold
        {
            self.position = self.target;
            self.velocity = 0.0;
            self.at_rest = true;
        }
    }
}

impl Animation for Spring {
    fn tick(&mut self, dt: Duration) {
        self.advance(dt);
    }

    fn is_complete(&self) -> bool {
        self.at_rest
    }

    /// Current position in pixels.
    fn value(&self) -> f32 {
        self.position as f32
    }

    fn reset(&mut self) {
        self.position = self.initial;
        self.velocity = 0.0;
        self.at_rest = (self.initial - self.target).abs() <= f64::EPSILON;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
