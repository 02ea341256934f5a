#![forbid(unsafe_code)]

//! relist public facade crate.
//!
//! Re-exports the types a host needs to drive a reorderable list and offers
//! a small prelude.
//!
//! ```
//! use relist::prelude::*;
//!
//! #[derive(Clone)]
//! struct Song { id: u32 }
//! impl ListItem for Song {}
//!
//! let mut list = ReorderableList::new(|s: &Song| Key::new(s.id.to_string()));
//! list.set_data(vec![Song { id: 1 }, Song { id: 2 }]);
//! assert!(!list.is_layout_complete());
//! ```

pub mod error;

#[cfg(feature = "config")]
use std::path::Path;

// --- Core re-exports -------------------------------------------------------

pub use relist_core::animation::SpringParams;
pub use relist_core::{Gesture, GestureConfig, GestureRecognizer, Point, PointerEvent, PointerEventKind, Spring};

// --- Runtime re-exports ----------------------------------------------------

pub use relist_runtime::{
    BatchScope, EffectError, EffectQueue, FlushReport, HapticStrength, Haptics, HapticsError,
    NoHaptics, Observable, RecordingHaptics, Subscription,
};

// --- Widget re-exports -----------------------------------------------------

pub use relist_widgets::{
    ConfigError, Key, ListDelegate, ListItem, ReorderConfig, ReorderableList, RowFlags, RowPhase,
    RowState, ScrollHandle, ScrollOffset, Section,
};

pub use error::{Error, Recovery, Result};

/// Load a config file, picking the format by extension (`.json` or TOML),
/// and validate it.
#[cfg(feature = "config")]
pub fn load_config(path: impl AsRef<Path>) -> Result<ReorderConfig> {
    let path = path.as_ref();
    let config = match path.extension().and_then(|e| e.to_str()) {
        Some("json") => ReorderConfig::from_json_file(path)?,
        _ => ReorderConfig::from_toml_file(path)?,
    };
    let config = config.into_validated()?;
    tracing::debug!(target: "relist.config", path = %path.display(), "config loaded");
    Ok(config)
}

/// Prelude for day-to-day usage.
pub mod prelude {
    pub use crate::{
        Error, HapticStrength, Haptics, Key, ListDelegate, ListItem, PointerEvent, ReorderConfig,
        ReorderableList, Result, RowState, ScrollHandle, Section,
    };

    pub use crate::{core, runtime, widgets};
}

pub use relist_core as core;
pub use relist_runtime as runtime;
pub use relist_widgets as widgets;
