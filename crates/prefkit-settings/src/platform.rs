//! Platform-appropriate location of the settings file.
//!
//! | Platform | Path                                                                  |
//! |----------|-----------------------------------------------------------------------|
//! | Windows  | `%LOCALAPPDATA%\<vendor>\<product>\settings.json`                     |
//! | macOS    | `$HOME/Library/Application Support/<vendor>/<product>/settings.json` |
//! | Linux    | `$HOME/.config/<vendor>/<product>/settings.json`                      |
//! | other    | `./settings.json` (relative to the working directory)                 |
//!
//! # Why pass the environment in? (for beginners)
//!
//! [`resolve_config_path`] reads real environment variables, which makes it
//! awkward to test: a test that changes `HOME` affects every other test
//! running in the same process.  [`resolve_config_path_with`] takes the
//! platform and an environment lookup function as arguments instead, so tests
//! can describe any machine they like without touching global state.

use std::ffi::OsString;
use std::path::PathBuf;

use crate::error::SettingsError;

/// File name of the settings document inside the product directory.
pub const SETTINGS_FILE_NAME: &str = "settings.json";

/// Operating system family, as far as settings placement is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformFamily {
    Windows,
    MacOs,
    Linux,
    Other,
}

impl PlatformFamily {
    /// The family this binary was compiled for.
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            PlatformFamily::Windows
        } else if cfg!(target_os = "macos") {
            PlatformFamily::MacOs
        } else if cfg!(target_os = "linux") {
            PlatformFamily::Linux
        } else {
            PlatformFamily::Other
        }
    }
}

/// Resolves the settings file path for `vendor` / `product` on this machine.
///
/// # Errors
///
/// Returns [`SettingsError::NoPlatformConfigDir`] when the environment
/// variable holding the platform base directory is not set.
pub fn resolve_config_path(vendor: &str, product: &str) -> Result<PathBuf, SettingsError> {
    resolve_config_path_with(PlatformFamily::current(), vendor, product, |key| {
        std::env::var_os(key)
    })
}

/// Resolves the settings file path for an explicit platform and environment.
///
/// `env` is called with an environment variable name and returns its value.
///
/// # Errors
///
/// Returns [`SettingsError::NoPlatformConfigDir`] when `env` yields nothing
/// (or an empty value) for the platform's base directory variable.
pub fn resolve_config_path_with<F>(
    platform: PlatformFamily,
    vendor: &str,
    product: &str,
    env: F,
) -> Result<PathBuf, SettingsError>
where
    F: Fn(&str) -> Option<OsString>,
{
    let var = |key: &str| {
        env(key)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
            .ok_or(SettingsError::NoPlatformConfigDir)
    };

    let base = match platform {
        // %LOCALAPPDATA% e.g. C:\Users\<user>\AppData\Local
        PlatformFamily::Windows => var("LOCALAPPDATA")?,
        PlatformFamily::MacOs => var("HOME")?.join("Library").join("Application Support"),
        PlatformFamily::Linux => var("HOME")?.join(".config"),
        PlatformFamily::Other => return Ok(PathBuf::from(".").join(SETTINGS_FILE_NAME)),
    };

    Ok(base.join(vendor).join(product).join(SETTINGS_FILE_NAME))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
