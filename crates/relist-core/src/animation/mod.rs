#![forbid(unsafe_code)]

//! Time-driven animation primitives.
//!
//! Everything the list animates (row offsets, the settle of a dropped row, the
//! edit-mode header) is a [`Spring`]. The [`Animation`] trait is the seam the
//! frame loop ticks through, so hosts can drive any animation uniformly.

pub mod spring;

use std::time::Duration;

pub use spring::{Spring, SpringParams};

/// A value that evolves with frame time.
pub trait Animation {
    /// Advance by `dt`.
    fn tick(&mut self, dt: Duration);

    /// Whether the animation has come to rest.
    fn is_complete(&self) -> bool;

    /// Current output value.
    fn value(&self) -> f32;

    /// Return to the starting state.
    fn reset(&mut self);
}
