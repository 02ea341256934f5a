#![forbid(unsafe_code)]

//! relist runtime
//!
//! Execution plumbing shared by every list instance.
//!
//! # Key Components
//!
//! - [`Observable`] - instance-scoped reactive container with versioning
//! - [`BatchScope`] - coalesces notifications across a multi-step mutation
//! - [`FrameClock`] - turns host frame timestamps into capped deltas
//! - [`EffectQueue`] - fire-and-forget hand-off to the application context
//! - [`Haptics`] - haptic feedback port
//!
//! # Execution contexts
//! The animation context (pointer sampling, per-frame ticks) mutates list
//! state and posts side effects to an [`EffectQueue`]. The application
//! context drains the queue at a boundary of its choosing. Posting never runs
//! the effect and never blocks, and a failing effect is logged and dropped.

pub mod effects;
pub mod frame_clock;
pub mod haptics;
pub mod reactive;

pub use effects::{EffectError, EffectQueue, FlushReport};
pub use frame_clock::FrameClock;
pub use haptics::{HapticStrength, Haptics, HapticsError, NoHaptics, RecordingHaptics};
pub use reactive::{BatchScope, Observable, Subscription};
