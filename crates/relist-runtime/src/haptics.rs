#![forbid(unsafe_code)]

//! Haptic feedback port.
//!
//! The list asks for a pulse on drag start (medium) and on save (heavy).
//! Pulses are always executed from the application context through the
//! [`EffectQueue`](crate::EffectQueue); an implementation may block or fail
//! without affecting gesture handling.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Strength of an impact pulse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HapticStrength {
    Light,
    Medium,
    Heavy,
}

/// Why a pulse could not be delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HapticsError {
    /// The device or platform has no haptic engine.
    Unsupported,
    /// The platform call failed.
    Failed(String),
}

impl fmt::Display for HapticsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unsupported => write!(f, "haptics unsupported on this platform"),
            Self::Failed(msg) => write!(f, "haptic pulse failed: {msg}"),
        }
    }
}

impl std::error::Error for HapticsError {}

/// A haptic engine.
pub trait Haptics {
    fn impact(&self, strength: HapticStrength) -> Result<(), HapticsError>;
}

/// Haptics that silently do nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHaptics;

impl Haptics for NoHaptics {
    fn impact(&self, _strength: HapticStrength) -> Result<(), HapticsError> {
        Ok(())
    }
}

/// Records every pulse. Optionally fails each one after recording it.
#[derive(Debug, Clone, Default)]
pub struct RecordingHaptics {
    pulses: Rc<RefCell<Vec<HapticStrength>>>,
    fail_with: Option<HapticsError>,
}

impl RecordingHaptics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A recorder whose every pulse returns `error`.
    #[must_use]
    pub fn failing(error: HapticsError) -> Self {
        Self {
            pulses: Rc::default(),
            fail_with: Some(error),
        }
    }

    #[must_use]
    pub fn pulses(&self) -> Vec<HapticStrength> {
        self.pulses.borrow().clone()
    }
}

impl Haptics for RecordingHaptics {
    fn impact(&self, strength: HapticStrength) -> Result<(), HapticsError> {
        self.pulses.borrow_mut().push(strength);
        match &self.fail_with {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}
