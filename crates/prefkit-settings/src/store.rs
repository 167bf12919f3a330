//! JSON settings file persistence.
//!
//! A [`Settings`] value holds a flat map of named JSON values together with
//! the path of the file it is persisted to.  The names, their defaults and
//! the validation of each stored value are supplied by a [`SettingsSchema`].
//!
//! ```json
//! {
//!   "theme": "Dark",
//!   "volume": 80,
//!   "recent_files": ["a.txt", "b.txt"]
//! }
//! ```
//!
//! # Best-effort loading
//!
//! Settings files are edited by hand, copied between machines and written by
//! older versions of the program.  [`Settings::load`] therefore never fails
//! because of their *content*:
//!
//! - a missing file leaves every setting at its default,
//! - a file that is not a JSON object leaves every setting at its default,
//! - a single value the schema rejects as invalid data keeps its default while
//!   the remaining values are applied.
//!
//! The returned [`LoadOutcome`] tells the caller which of these happened.
//! Only real I/O failures and non-data conversion failures are errors.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::error::{ConvertError, SettingsError};
use crate::platform::resolve_config_path;

/// Named setting values, in insertion order.
pub type SettingsMap = Map<String, Value>;

/// Describes the settings of one application.
#[cfg_attr(test, mockall::automock)]
pub trait SettingsSchema {
    /// Value of every setting before anything is loaded.
    fn defaults(&self) -> SettingsMap;

    /// Validates a value read from the settings file.
    ///
    /// Returns the value to store.  Return [`ConvertError::InvalidData`] to
    /// skip the value and keep the default.
    fn convert(&self, name: &str, value: &Value) -> Result<Value, ConvertError>;
}

/// What [`Settings::load`] found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// No settings file exists yet.
    Missing,
    /// The file is not a JSON object; every setting kept its default.
    Corrupt,
    /// The file was read.  `skipped` lists the names rejected as invalid data.
    Loaded { applied: usize, skipped: Vec<String> },
}

/// Settings of one application, backed by a JSON file.
#[derive(Debug)]
pub struct Settings<S> {
    schema: S,
    path: PathBuf,
    values: SettingsMap,
}

impl<S: SettingsSchema> Settings<S> {
    /// Creates settings stored in the platform config directory of
    /// `vendor` / `product`.  Nothing is read until [`load`](Self::load).
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::NoPlatformConfigDir`] if the platform base
    /// directory cannot be determined.
    pub fn open(schema: S, vendor: &str, product: &str) -> Result<Self, SettingsError> {
        let path = resolve_config_path(vendor, product)?;
        Ok(Self::with_path(schema, path))
    }

    /// Creates settings stored at an explicit `path`.
    pub fn with_path(schema: S, path: impl Into<PathBuf>) -> Self {
        let values = schema.defaults();
        Self {
            schema,
            path: path.into(),
            values,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn schema(&self) -> &S {
        &self.schema
    }

    /// All current values.
    pub fn values(&self) -> &SettingsMap {
        &self.values
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Converts the value of `name` into `T`.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::UnknownSetting`] if no value exists under
    /// `name`, or [`SettingsError::Value`] if it does not fit `T`.
    pub fn get_as<T: DeserializeOwned>(&self, name: &str) -> Result<T, SettingsError> {
        let value = self
            .values
            .get(name)
            .ok_or_else(|| SettingsError::UnknownSetting(name.to_string()))?;
        T::deserialize(value).map_err(|source| SettingsError::Value {
            name: name.to_string(),
            source,
        })
    }

    /// Stores `value` under `name`, replacing the current value.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Value`] if `value` cannot be represented as
    /// JSON.
    pub fn set<T: Serialize + ?Sized>(&mut self, name: &str, value: &T) -> Result<(), SettingsError> {
        let value = serde_json::to_value(value).map_err(|source| SettingsError::Value {
            name: name.to_string(),
            source,
        })?;
        self.values.insert(name.to_string(), value);
        Ok(())
    }

    /// Removes the current value of `name` and returns it.
    ///
    /// A setting with a default goes back to that default; any other setting
    /// disappears.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        let previous = self.values.remove(name);
        if let Some(default) = self.schema.defaults().remove(name) {
            self.values.insert(name.to_string(), default);
        }
        previous
    }

    /// Restores every setting to its default.
    pub fn reset(&mut self) {
        self.values = self.schema.defaults();
    }

    /// Writes the current values to the settings file as indented JSON.
    ///
    /// Creates the parent directories if needed and overwrites an existing
    /// file.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Io`] for file-system failures or
    /// [`SettingsError::Serialize`] if serialization fails.
    pub fn save(&self) -> Result<(), SettingsError> {
        // Ensure directory exists before writing.
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir).map_err(|source| SettingsError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
        }

        let content = serde_json::to_string_pretty(&self.values)?;
        std::fs::write(&self.path, content).map_err(|source| SettingsError::Io {
            path: self.path.clone(),
            source,
        })?;
        info!(path = %self.path.display(), count = self.values.len(), "settings saved");
        Ok(())
    }

    /// Resets to the defaults, then applies the values stored in the settings
    /// file.
    ///
    /// Stored names without a default are kept as long as the schema accepts
    /// their value.  A directory at the settings path counts as a missing
    /// file.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Io`] if the file exists but cannot be read,
    /// and [`SettingsError::Convert`] if the schema fails with
    /// [`ConvertError::Other`].  In the latter case the values applied before
    /// the failing one stay in place.
    pub fn load(&mut self) -> Result<LoadOutcome, SettingsError> {
        self.reset();

        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound || self.path.is_dir() => {
                debug!(path = %self.path.display(), "no settings file; using defaults");
                return Ok(LoadOutcome::Missing);
            }
            Err(source) => {
                return Err(SettingsError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let stored: SettingsMap = match serde_json::from_slice(&bytes) {
            Ok(stored) => stored,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "settings file is not a JSON object; using defaults");
                return Ok(LoadOutcome::Corrupt);
            }
        };

        let mut applied = 0;
        let mut skipped = Vec::new();
        for (name, raw) in stored {
            match self.schema.convert(&name, &raw) {
                Ok(value) => {
                    self.values.insert(name, value);
                    applied += 1;
                }
                Err(ConvertError::InvalidData(reason)) => {
                    debug!(setting = %name, %reason, "skipping invalid setting; keeping default");
                    skipped.push(name);
                }
                Err(ConvertError::Other(source)) => {
                    return Err(SettingsError::Convert { name, source });
                }
            }
        }

        debug!(path = %self.path.display(), applied, skipped = skipped.len(), "settings loaded");
        Ok(LoadOutcome::Loaded { applied, skipped })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
