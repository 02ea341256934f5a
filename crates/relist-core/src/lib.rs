#![forbid(unsafe_code)]

//! Core: pointer events, gesture recognition, and motion primitives.
//!
//! # Role in relist
//! `relist-core` is the input layer. It owns the raw pointer event types a
//! host feeds in, the semantic gesture vocabulary derived from them, and the
//! spring integrator the list engine animates with.
//!
//! # Primary responsibilities
//! - **PointerEvent**: canonical touch/pointer input (down, move, up, cancel).
//! - **Gesture**: semantic events (press, long press, pan lifecycle).
//! - **GestureRecognizer**: per-item long-press + pan composition.
//! - **Spring**: damped harmonic oscillator used for every settle.
//!
//! # How it fits in the system
//! `relist-widgets` consumes `Gesture` values and drives the reorder engine.
//! Nothing in this crate knows about items, keys, or sections.

pub mod animation;
pub mod event;
pub mod gesture;
pub mod semantic_event;

pub use animation::{Animation, Spring};
pub use event::{PointerEvent, PointerEventKind};
pub use gesture::{GestureConfig, GestureRecognizer};
pub use semantic_event::{Gesture, Point};
