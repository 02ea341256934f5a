#![forbid(unsafe_code)]

//! Canonical pointer event types.
//!
//! Hosts translate whatever their platform delivers (touch, mouse, pen) into
//! [`PointerEvent`] values. Coordinates are pixels in the list's content
//! space, `y` growing downward.
//!
//! # Design Notes
//!
//! - Only one pointer is tracked per item; multi-touch is the host's concern.
//! - `Cancel` means the touch was taken away from the item by something else
//!   (typically the enclosing scroll view capturing it). It is distinct from
//!   `Up`, which is a normal release.

use crate::semantic_event::Point;

/// The phase of a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerEventKind {
    /// Finger or button went down.
    Down,
    /// Pointer moved while down.
    Move,
    /// Finger or button released.
    Up,
    /// Touch interrupted externally (scroll capture, system gesture).
    Cancel,
}

/// A single pointer sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerEventKind,
    pub x: f32,
    pub y: f32,
}

impl PointerEvent {
    #[must_use]
    pub const fn new(kind: PointerEventKind, x: f32, y: f32) -> Self {
        Self { kind, x, y }
    }

    #[must_use]
    pub const fn down(x: f32, y: f32) -> Self {
        Self::new(PointerEventKind::Down, x, y)
    }

    #[must_use]
    pub const fn moved(x: f32, y: f32) -> Self {
        Self::new(PointerEventKind::Move, x, y)
    }

    #[must_use]
    pub const fn up(x: f32, y: f32) -> Self {
        Self::new(PointerEventKind::Up, x, y)
    }

    /// A cancel sample. Position is irrelevant and set to the origin.
    #[must_use]
    pub const fn cancel() -> Self {
        Self::new(PointerEventKind::Cancel, 0.0, 0.0)
    }

    /// Sample position as a [`Point`].
    #[inline]
    #[must_use]
    pub const fn pos(&self) -> Point {
        Point::new(self.x, self.y)
    }
}
