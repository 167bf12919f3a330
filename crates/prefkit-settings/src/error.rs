//! Error types for the settings store.

use std::path::PathBuf;

use prefkit_core::BoxError;
use thiserror::Error;

/// Error type for settings file and value operations.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing settings at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The current values could not be serialized to JSON.
    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Converting a stored value failed for a reason other than invalid data.
    #[error("failed to convert setting \"{name}\"")]
    Convert {
        name: String,
        #[source]
        source: BoxError,
    },

    /// No value exists under the requested name.
    #[error("unknown setting \"{0}\"")]
    UnknownSetting(String),

    /// A value could not be converted to or from the requested Rust type.
    #[error("setting \"{name}\" has an incompatible value: {source}")]
    Value {
        name: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Failure of [`SettingsSchema::convert`](crate::store::SettingsSchema::convert).
///
/// Only [`ConvertError::InvalidData`] is recovered by
/// [`Settings::load`](crate::store::Settings::load): the key keeps its
/// default.  Any other failure aborts the load.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The stored value does not have the shape the setting expects.
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// Any other failure, propagated to the caller.
    #[error(transparent)]
    Other(BoxError),
}

impl ConvertError {
    pub fn invalid_data(message: impl Into<String>) -> Self {
        ConvertError::InvalidData(message.into())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
