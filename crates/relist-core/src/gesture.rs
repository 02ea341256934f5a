#![forbid(unsafe_code)]

//! Gesture recognition for a single list row.
//!
//! [`GestureRecognizer`] composes two detectors that observe the same touch:
//!
//! - **Pan detector**: activates once the pointer has been held for the
//!   activation delay, then reports `PanStart` / `PanMove` / `PanEnd` /
//!   `PanCancel`. Drives dragging.
//! - **Long-press detector**: fires `LongPress` once the pointer has been held
//!   stationary past the long-press threshold. Promotes a static list into an
//!   editing session.
//!
//! Both detectors share the activation delay and both emit `Press` on
//! touch-down so the row can flash immediately.
//!
//! # State Machine
//!
//! ```text
//!            Down                 delay elapsed (pan enabled)
//!   Idle ───────────▶ Pending ─────────────────────────────▶ Panning
//!    ▲                  │  │                                   │
//!    │   Up / Cancel    │  │ moved past slop                   │ Up → PanEnd
//!    ├──────────────────┘  ▼                                   │ Cancel → PanCancel
//!    │  (Release)       Failed ── Up / Cancel ──┐              │
//!    └──────────────────────────────────────────┴──────────────┘
//! ```
//!
//! # Invariants
//!
//! 1. Detector enablement is latched at touch-down. Changing it mid-touch
//!    affects only the next touch, so a long press that opens an editing
//!    session never turns into a drag on the same touch.
//! 2. `LongPress` fires at most once per touch and never after `PanStart`.
//! 3. After `reset()`, the recognizer is idle and emits nothing further for
//!    the interrupted touch.
//!
//! # Failure Modes
//!
//! - Hosts that never call [`check_timers`](GestureRecognizer::check_timers)
//!   still get activation: timers are also polled on every `Move` and `Up`.
//! - A `Down` while a touch is already tracked replaces the old touch without
//!   emitting anything for it.

use std::time::Duration;

use web_time::Instant;

use crate::event::{PointerEvent, PointerEventKind};
use crate::semantic_event::{Gesture, Point};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Thresholds and timeouts for row gestures.
#[derive(Debug, Clone, PartialEq)]
pub struct GestureConfig {
    /// Hold time before the pan detector activates (default: 150ms).
    pub activation_delay: Duration,
    /// Hold time before a long press fires (default: 500ms).
    pub long_press_threshold: Duration,
    /// Movement (px) tolerated before activation (default: 8.0).
    pub touch_slop: f32,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            activation_delay: Duration::from_millis(150),
            long_press_threshold: Duration::from_millis(500),
            touch_slop: 8.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Internal state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
struct TouchTracker {
    origin: Point,
    last: Point,
    down_at: Instant,
    pan_enabled: bool,
    long_press_enabled: bool,
    long_press_fired: bool,
    panning: bool,
}

// ---------------------------------------------------------------------------
// GestureRecognizer
// ---------------------------------------------------------------------------

/// Stateful per-row recognizer turning pointer samples into [`Gesture`]s.
///
/// Call [`process`](GestureRecognizer::process) for every pointer sample on
/// the row and [`check_timers`](GestureRecognizer::check_timers) once per
/// frame while a touch is held.
pub struct GestureRecognizer {
    config: GestureConfig,
    pan_enabled: bool,
    long_press_enabled: bool,
    touch: Option<TouchTracker>,
    failed: bool,
}

impl std::fmt::Debug for GestureRecognizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GestureRecognizer")
            .field("pressed", &self.is_pressed())
            .field("panning", &self.is_panning())
            .field("failed", &self.failed)
            .finish()
    }
}

impl GestureRecognizer {
    /// Create a recognizer with both detectors disabled.
    #[must_use]
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            pan_enabled: false,
            long_press_enabled: false,
            touch: None,
            failed: false,
        }
    }

    /// Configure which detectors participate in the *next* touch.
    pub fn set_detectors(&mut self, pan_enabled: bool, long_press_enabled: bool) {
        self.pan_enabled = pan_enabled;
        self.long_press_enabled = long_press_enabled;
    }

    /// Process a pointer sample, returning any gestures produced.
    pub fn process(&mut self, event: &PointerEvent, now: Instant) -> Vec<Gesture> {
        let mut out = Vec::with_capacity(2);
        let pos = event.pos();
        match event.kind {
            PointerEventKind::Down => self.on_down(pos, now, &mut out),
            PointerEventKind::Move => {
                self.poll(now, &mut out);
                self.on_move(pos, &mut out);
            }
            PointerEventKind::Up => {
                self.poll(now, &mut out);
                self.on_up(pos, &mut out);
            }
            PointerEventKind::Cancel => self.on_cancel(&mut out),
        }
        out
    }

    /// Fire time-based activations (pan start, long press). Call per frame.
    pub fn check_timers(&mut self, now: Instant) -> Vec<Gesture> {
        let mut out = Vec::new();
        self.poll(now, &mut out);
        out
    }

    /// Whether a touch is currently held on this row.
    #[inline]
    #[must_use]
    pub fn is_pressed(&self) -> bool {
        self.touch.is_some()
    }

    /// Whether the pan detector is active.
    #[inline]
    #[must_use]
    pub fn is_panning(&self) -> bool {
        self.touch.as_ref().is_some_and(|t| t.panning)
    }

    /// Drop all touch state without emitting anything.
    pub fn reset(&mut self) {
        self.touch = None;
        self.failed = false;
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: GestureConfig) {
        self.config = config;
    }
}

// ---------------------------------------------------------------------------
// Internal event handlers
// ---------------------------------------------------------------------------

impl GestureRecognizer {
    fn on_down(&mut self, pos: Point, now: Instant, out: &mut Vec<Gesture>) {
        self.failed = false;
        self.touch = Some(TouchTracker {
            origin: pos,
            last: pos,
            down_at: now,
            pan_enabled: self.pan_enabled,
            long_press_enabled: self.long_press_enabled,
            long_press_fired: false,
            panning: false,
        });
        out.push(Gesture::Press { pos });
    }

    fn on_move(&mut self, pos: Point, out: &mut Vec<Gesture>) {
        if self.failed {
            return;
        }
        let Some(ref mut touch) = self.touch else {
            return;
        };

        if touch.panning {
            touch.last = pos;
            out.push(Gesture::PanMove {
                origin: touch.origin,
                current: pos,
                translation: pos.offset_from(touch.origin),
            });
            return;
        }

        if touch.origin.distance(pos) > self.config.touch_slop {
            tracing::trace!(
                target: "relist.gesture",
                distance = touch.origin.distance(pos),
                "touch moved past slop before activation"
            );
            self.touch = None;
            self.failed = true;
            out.push(Gesture::Release);
            return;
        }
        touch.last = pos;
    }

    fn on_up(&mut self, pos: Point, out: &mut Vec<Gesture>) {
        self.failed = false;
        let Some(touch) = self.touch.take() else {
            return;
        };
        if touch.panning {
            out.push(Gesture::PanEnd {
                origin: touch.origin,
                end: pos,
                translation: pos.offset_from(touch.origin),
            });
        } else {
            out.push(Gesture::Release);
        }
    }

    fn on_cancel(&mut self, out: &mut Vec<Gesture>) {
        self.failed = false;
        let Some(touch) = self.touch.take() else {
            return;
        };
        if touch.panning {
            tracing::debug!(target: "relist.gesture", "pan cancelled externally");
            out.push(Gesture::PanCancel);
        } else {
            out.push(Gesture::Release);
        }
    }

    fn poll(&mut self, now: Instant, out: &mut Vec<Gesture>) {
        let Some(ref mut touch) = self.touch else {
            return;
        };
        if touch.panning {
            return;
        }
        let held = now.duration_since(touch.down_at);

        if touch.pan_enabled && held >= self.config.activation_delay {
            touch.panning = true;
            tracing::trace!(
                target: "relist.gesture",
                held_ms = held.as_millis() as u64,
                "pan activated"
            );
            out.push(Gesture::PanStart {
                origin: touch.origin,
            });
            return;
        }

        if touch.long_press_enabled
            && !touch.long_press_fired
            && held >= self.config.long_press_threshold
        {
            touch.long_press_fired = true;
            tracing::debug!(
                target: "relist.gesture",
                held_ms = held.as_millis() as u64,
                "long press recognized"
            );
            out.push(Gesture::LongPress {
                pos: touch.origin,
                duration: held,
            });
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
