//! # prefkit-settings
//!
//! Application settings persisted as an indented JSON object in the
//! platform-appropriate configuration directory.
//!
//! # Architecture overview (for beginners)
//!
//! - **`platform`** – Where the file lives.  Windows, macOS and Linux each
//!   have a conventional per-user configuration directory; the file is placed
//!   under `<vendor>/<product>/settings.json` inside it.
//!
//! - **`store`** – [`Settings`], the in-memory map of values plus `load` and
//!   `save`.  The application describes its settings through the
//!   [`SettingsSchema`] trait: the default of every setting and how to
//!   validate a value read back from disk.
//!
//! - **`convert`** – Ready-made validation helpers for `SettingsSchema`
//!   implementations: through a serde type, through a `prefkit-core` object
//!   codec, or by token shape alone.
//!
//! - **`error`** – [`SettingsError`] and [`ConvertError`].
//!
//! # Example
//!
//! ```rust,no_run
//! use prefkit_settings::convert::{convert_kinds, convert_serde};
//! use prefkit_settings::{ConvertError, Settings, SettingsMap, SettingsSchema};
//! use prefkit_core::TokenKinds;
//! use serde_json::{json, Value};
//!
//! struct AppSettings;
//!
//! impl SettingsSchema for AppSettings {
//!     fn defaults(&self) -> SettingsMap {
//!         let mut map = SettingsMap::new();
//!         map.insert("volume".into(), json!(50));
//!         map
//!     }
//!
//!     fn convert(&self, name: &str, value: &Value) -> Result<Value, ConvertError> {
//!         match name {
//!             "volume" => convert_serde::<u8>(value),
//!             _ => convert_kinds(TokenKinds::ANY, value),
//!         }
//!     }
//! }
//!
//! let mut settings = Settings::open(AppSettings, "Acme", "Rocket")?;
//! settings.load()?;
//! settings.set("volume", &80)?;
//! settings.save()?;
//! # Ok::<(), prefkit_settings::SettingsError>(())
//! ```

pub mod convert;
pub mod error;
pub mod platform;
pub mod store;

pub use error::{ConvertError, SettingsError};
pub use platform::{resolve_config_path, resolve_config_path_with, PlatformFamily, SETTINGS_FILE_NAME};
pub use store::{LoadOutcome, Settings, SettingsMap, SettingsSchema};
