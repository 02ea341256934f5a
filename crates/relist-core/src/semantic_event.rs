#![forbid(unsafe_code)]

//! Semantic gestures derived from raw pointer input.
//!
//! [`Gesture`] represents what the user *meant* on a single list row: a touch
//! that should flash the row, a long press, or a pan that drags the row. The
//! [`GestureRecognizer`](crate::gesture::GestureRecognizer) produces them.
//!
//! # Invariants
//!
//! 1. Every pan is well-formed: `PanStart` → zero or more `PanMove` →
//!    exactly one `PanEnd` or `PanCancel`.
//! 2. `LongPress` fires at most once per touch.
//! 3. A touch that never produced `PanStart` terminates with `Release`.
//!
//! # Failure Modes
//!
//! - Movement past the touch slop before activation fails the touch: the
//!   recognizer emits `Release` and ignores the rest of the touch so the
//!   enclosing scroll view can own it.

use std::time::Duration;

// ---------------------------------------------------------------------------
// Point
// ---------------------------------------------------------------------------

/// A 2D position in list content space (pixels).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance(self, other: Self) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Component-wise difference `self - origin`.
    #[must_use]
    pub fn offset_from(self, origin: Self) -> Self {
        Self::new(self.x - origin.x, self.y - origin.y)
    }
}

impl From<(f32, f32)> for Point {
    fn from((x, y): (f32, f32)) -> Self {
        Self { x, y }
    }
}

// ---------------------------------------------------------------------------
// Gesture
// ---------------------------------------------------------------------------

/// High-level gesture on one list row.
#[derive(Debug, Clone, PartialEq)]
pub enum Gesture {
    /// Touch-down feedback began (the row "flashes").
    Press { pos: Point },

    /// The touch ended, failed, or was cancelled without an active pan.
    Release,

    /// Pointer held stationary past the long-press threshold.
    LongPress { pos: Point, duration: Duration },

    /// Pan activated. `origin` is the touch-down position.
    PanStart { origin: Point },

    /// Pan moved. `translation` is measured from the touch-down origin.
    PanMove {
        origin: Point,
        current: Point,
        translation: Point,
    },

    /// Pan released normally.
    PanEnd {
        origin: Point,
        end: Point,
        translation: Point,
    },

    /// Pan interrupted (scroll capture, reset by the host).
    PanCancel,
}

impl Gesture {
    /// Returns true for the events that belong to a pan lifecycle.
    #[must_use]
    pub const fn is_pan(&self) -> bool {
        matches!(
            self,
            Self::PanStart { .. } | Self::PanMove { .. } | Self::PanEnd { .. } | Self::PanCancel
        )
    }

    /// Returns true if this event terminates the touch it belongs to.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Release | Self::PanEnd { .. } | Self::PanCancel)
    }
}
