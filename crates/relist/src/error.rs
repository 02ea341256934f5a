#![forbid(unsafe_code)]

//! Unified error type for hosts.
//!
//! The list itself never fails: side-effect failures are caught and logged
//! inside the effect queue. The errors a host can actually hold are config
//! loading failures and the [`EffectError`]s listed in a [`FlushReport`].
//! [`Error`] wraps them so a host can route everything through one type and
//! ask [`Error::recovery`] what to do next.
//!
//! [`FlushReport`]: relist_runtime::FlushReport

use std::fmt;

use relist_runtime::{EffectError, HapticsError};
use relist_widgets::ConfigError;

/// Top-level error.
#[derive(Debug)]
pub enum Error {
    /// Loading or validating a config failed.
    Config(ConfigError),
    /// A queued side effect failed.
    Effect(EffectError),
    /// Raw I/O error (convenience variant for `?` on io::Result).
    Io(std::io::Error),
}

/// Standard result type for relist APIs.
pub type Result<T> = std::result::Result<T, Error>;

/// What a host should do about an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recovery {
    /// Keep running on `ReorderConfig::default()`.
    UseDefaults,
    /// Nothing to do; the list already carried on.
    Ignore,
    /// Report upward; the host cannot continue as configured.
    Abort,
}

impl Error {
    pub fn recovery(&self) -> Recovery {
        match self {
            Self::Config(_) => Recovery::UseDefaults,
            Self::Effect(_) => Recovery::Ignore,
            Self::Io(_) => Recovery::Abort,
        }
    }

    /// Error type label for tracing.
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::Effect(EffectError::Haptics(_)) => "haptics",
            Self::Effect(EffectError::Panicked { .. }) => "callback",
            Self::Io(_) => "io",
        }
    }

    pub fn is_recoverable(&self) -> bool {
        !matches!(self.recovery(), Recovery::Abort)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Effect(e) => write!(f, "effect: {e}"),
            Self::Io(e) => write!(f, "I/O: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Effect(e) => Some(e),
            Self::Io(e) => Some(e),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

impl From<EffectError> for Error {
    fn from(err: EffectError) -> Self {
        Self::Effect(err)
    }
}

impl From<HapticsError> for Error {
    fn from(err: HapticsError) -> Self {
        Self::Effect(EffectError::Haptics(err))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}
