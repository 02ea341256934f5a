#![forbid(unsafe_code)]

//! Tunable timing, physics and geometry for a list, as data.
//!
//! Every field defaults to the value the list uses when no config is given,
//! so `ReorderConfig::default()` changes nothing. With the `config` feature
//! the whole struct loads from TOML or JSON:
//!
//! ```toml
//! [gesture]
//! activation_delay_ms = 120
//!
//! [header]
//! height = 64.0
//! ```
//!
//! ```rust,ignore
//! let config = ReorderConfig::from_toml_file("relist.toml")?.into_validated()?;
//! ```

#[cfg(feature = "config")]
use std::path::Path;
use std::time::Duration;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

use relist_core::GestureConfig;
use relist_core::animation::SpringParams;

/// All list tunables.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct ReorderConfig {
    pub gesture: GestureSettings,
    /// Released row springing into its slot.
    pub settle: SpringSettings,
    /// Other rows making room.
    pub rows: SpringSettings,
    pub header: HeaderSettings,
    pub frame: FrameSettings,
}

impl Default for ReorderConfig {
    fn default() -> Self {
        Self {
            gesture: GestureSettings::default(),
            settle: SpringParams::settle().into(),
            rows: SpringParams::rows().into(),
            header: HeaderSettings::default(),
            frame: FrameSettings::default(),
        }
    }
}

/// Touch timing.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct GestureSettings {
    /// Hold before a drag activates. Default: 150.
    pub activation_delay_ms: u64,
    /// Hold before a long press enters edit mode. Default: 500.
    pub long_press_ms: u64,
    /// Movement (px) tolerated before activation. Default: 8.0.
    pub touch_slop: f32,
}

impl Default for GestureSettings {
    fn default() -> Self {
        Self {
            activation_delay_ms: 150,
            long_press_ms: 500,
            touch_slop: 8.0,
        }
    }
}

/// Stiffness/damping pair. A spring table must give both.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
pub struct SpringSettings {
    pub stiffness: f64,
    pub damping: f64,
}

impl Default for SpringSettings {
    fn default() -> Self {
        SpringParams::settle().into()
    }
}

impl From<SpringParams> for SpringSettings {
    fn from(p: SpringParams) -> Self {
        Self {
            stiffness: p.stiffness,
            damping: p.damping,
        }
    }
}

impl From<&SpringSettings> for SpringParams {
    fn from(s: &SpringSettings) -> Self {
        SpringParams::new(s.stiffness, s.damping)
    }
}

/// Edit-mode header.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct HeaderSettings {
    /// Full height in px. Default: 56.0.
    pub height: f32,
    pub stiffness: f64,
    pub damping: f64,
}

impl Default for HeaderSettings {
    fn default() -> Self {
        let p = SpringParams::header();
        Self {
            height: crate::edit_session::DEFAULT_HEADER_HEIGHT,
            stiffness: p.stiffness,
            damping: p.damping,
        }
    }
}

/// Frame pacing.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct FrameSettings {
    /// Cap on one frame's delta. Default: 33.
    pub max_delta_ms: u64,
}

impl Default for FrameSettings {
    fn default() -> Self {
        Self {
            max_delta_ms: relist_runtime::frame_clock::DEFAULT_MAX_DELTA.as_millis() as u64,
        }
    }
}

impl ReorderConfig {
    /// Load from a TOML string.
    #[cfg(feature = "config")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(ConfigError::Toml)
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "config")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(s).map_err(ConfigError::Json)
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "config")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_json_str(&content)
    }

    /// Out-of-range values, one message each. Empty means valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if !(self.gesture.touch_slop.is_finite() && self.gesture.touch_slop >= 0.0) {
            errors.push(format!(
                "gesture.touch_slop must be >= 0, got {}",
                self.gesture.touch_slop
            ));
        }
        if self.gesture.long_press_ms == 0 {
            errors.push("gesture.long_press_ms must be > 0".into());
        }

        for (name, s) in [("settle", &self.settle), ("rows", &self.rows)] {
            check_spring(&mut errors, name, s.stiffness, s.damping);
        }
        check_spring(&mut errors, "header", self.header.stiffness, self.header.damping);

        if !(self.header.height.is_finite() && self.header.height >= 0.0) {
            errors.push(format!(
                "header.height must be >= 0, got {}",
                self.header.height
            ));
        }
        if self.frame.max_delta_ms == 0 {
            errors.push("frame.max_delta_ms must be > 0".into());
        }
        errors
    }

    /// `self` if valid, else every problem found.
    pub fn into_validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Invalid(errors))
        }
    }

    #[must_use]
    pub fn gesture_config(&self) -> GestureConfig {
        GestureConfig {
            activation_delay: Duration::from_millis(self.gesture.activation_delay_ms),
            long_press_threshold: Duration::from_millis(self.gesture.long_press_ms),
            touch_slop: self.gesture.touch_slop,
        }
    }

    #[must_use]
    pub fn settle_params(&self) -> SpringParams {
        (&self.settle).into()
    }

    #[must_use]
    pub fn row_params(&self) -> SpringParams {
        (&self.rows).into()
    }

    #[must_use]
    pub fn header_params(&self) -> SpringParams {
        SpringParams::new(self.header.stiffness, self.header.damping)
    }

    #[must_use]
    pub fn max_frame_delta(&self) -> Duration {
        Duration::from_millis(self.frame.max_delta_ms)
    }
}

fn check_spring(errors: &mut Vec<String>, name: &str, stiffness: f64, damping: f64) {
    if !(stiffness.is_finite() && stiffness > 0.0) {
        errors.push(format!("{name}.stiffness must be > 0, got {stiffness}"));
    }
    if !(damping.is_finite() && damping > 0.0) {
        errors.push(format!("{name}.damping must be > 0, got {damping}"));
    }
}

/// Why a config could not be loaded.
#[derive(Debug)]
pub enum ConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    #[cfg(feature = "config")]
    Toml(toml::de::Error),
    /// JSON parse error.
    #[cfg(feature = "config")]
    Json(serde_json::Error),
    /// Parsed, but out of range.
    Invalid(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(feature = "config")]
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            #[cfg(feature = "config")]
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Invalid(errors) => write!(f, "invalid config: {}", errors.join("; ")),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            #[cfg(feature = "config")]
            Self::Toml(e) => Some(e),
            #[cfg(feature = "config")]
            Self::Json(e) => Some(e),
            Self::Invalid(_) => None,
        }
    }
}
