//! prefkit: inspect and edit prefkit settings files.
//!
//! # Usage
//!
//! ```text
//! prefkit [OPTIONS] <COMMAND>
//!
//! Commands:
//!   path               Print the settings file path
//!   show               Print every setting as indented JSON
//!   get   <KEY>        Print one setting
//!   set   <KEY> <JSON> Store a setting
//!   unset <KEY>        Remove a setting
//!   reset              Remove every setting
//!
//! Options:
//!   --vendor  <VENDOR>   Vendor directory name
//!   --product <PRODUCT>  Product directory name
//!   --file    <PATH>     Settings file to use instead of the platform location
//! ```
//!
//! # Environment variable overrides
//!
//! | Variable          | Description                               |
//! |-------------------|-------------------------------------------|
//! | `PREFKIT_VENDOR`  | Vendor directory name (`--vendor`)        |
//! | `PREFKIT_PRODUCT` | Product directory name (`--product`)      |
//! | `RUST_LOG`        | Log filter, written to stderr [default: info] |
//!
//! The tool knows nothing about the application that owns the file, so every
//! stored value is accepted as-is and no setting has a default.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use prefkit_settings::{
    resolve_config_path, ConvertError, LoadOutcome, Settings, SettingsMap, SettingsSchema,
};
use serde_json::Value;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Inspect and edit JSON settings files in the platform config directory.
#[derive(Debug, Parser)]
#[command(name = "prefkit", version)]
struct Cli {
    /// Vendor directory name, e.g. `Acme`.
    #[arg(long, env = "PREFKIT_VENDOR")]
    vendor: Option<String>,

    /// Product directory name, e.g. `Rocket`.
    #[arg(long, env = "PREFKIT_PRODUCT")]
    product: Option<String>,

    /// Settings file to use instead of the platform location.
    ///
    /// Takes precedence over `--vendor` / `--product`.
    #[arg(long)]
    file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the settings file path.
    Path,
    /// Print every setting as indented JSON.
    Show,
    /// Print one setting.
    Get { key: String },
    /// Store a setting.
    ///
    /// VALUE is parsed as JSON; text that is not valid JSON is stored as a
    /// string, so `prefkit set theme Dark` works without extra quoting.
    Set { key: String, value: String },
    /// Remove a setting.
    Unset { key: String },
    /// Remove every setting.
    Reset,
}

impl Cli {
    /// Resolves the settings file the command operates on.
    ///
    /// # Errors
    ///
    /// Returns an error if neither `--file` nor both `--vendor` and
    /// `--product` are given, or if the platform config directory is unknown.
    fn settings_path(&self) -> anyhow::Result<PathBuf> {
        if let Some(file) = &self.file {
            return Ok(file.clone());
        }
        let (Some(vendor), Some(product)) = (&self.vendor, &self.product) else {
            bail!("either --file or both --vendor and --product are required");
        };
        resolve_config_path(vendor, product)
            .with_context(|| format!("cannot locate settings for {vendor}/{product}"))
    }
}

// ── Open schema ───────────────────────────────────────────────────────────────

/// Accepts every stored value and declares no defaults.
#[derive(Debug)]
struct OpenSchema;

impl SettingsSchema for OpenSchema {
    fn defaults(&self) -> SettingsMap {
        SettingsMap::new()
    }

    fn convert(&self, _name: &str, value: &Value) -> Result<Value, ConvertError> {
        Ok(value.clone())
    }
}

/// Parses a command-line value as JSON, falling back to a plain string.
fn parse_value(text: &str) -> Value {
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

// ── Commands ──────────────────────────────────────────────────────────────────

fn load(settings: &mut Settings<OpenSchema>) -> anyhow::Result<()> {
    let outcome = settings
        .load()
        .with_context(|| format!("failed to load {}", settings.path().display()))?;
    match outcome {
        LoadOutcome::Missing => debug!("settings file does not exist yet"),
        LoadOutcome::Corrupt => warn!(
            "{} is not a JSON object; treating it as empty",
            settings.path().display()
        ),
        LoadOutcome::Loaded { applied, .. } => debug!(applied, "settings loaded"),
    }
    Ok(())
}

fn save(settings: &Settings<OpenSchema>) -> anyhow::Result<()> {
    settings
        .save()
        .with_context(|| format!("failed to save {}", settings.path().display()))
}

/// Executes `cli`, writing command output to `out`.
fn run(cli: Cli, out: &mut impl Write) -> anyhow::Result<()> {
    let path = cli.settings_path()?;
    let mut settings = Settings::with_path(OpenSchema, path);

    match cli.command {
        Command::Path => writeln!(out, "{}", settings.path().display())?,
        Command::Show => {
            load(&mut settings)?;
            writeln!(out, "{}", serde_json::to_string_pretty(settings.values())?)?;
        }
        Command::Get { key } => {
            load(&mut settings)?;
            let value = settings
                .get(&key)
                .with_context(|| format!("setting \"{key}\" is not set"))?;
            writeln!(out, "{}", serde_json::to_string_pretty(value)?)?;
        }
        Command::Set { key, value } => {
            load(&mut settings)?;
            settings.set(&key, &parse_value(&value))?;
            save(&settings)?;
        }
        Command::Unset { key } => {
            load(&mut settings)?;
            if settings.remove(&key).is_none() {
                warn!(setting = %key, "setting was not set");
            }
            save(&settings)?;
        }
        Command::Reset => {
            settings.reset();
            save(&settings)?;
        }
    }
    Ok(())
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    // ── Logging setup ─────────────────────────────────────────────────────────
    //
    // `RUST_LOG` selects the filter; fall back to `info`.  Logs go to stderr
    // so command output on stdout stays machine-readable.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let stdout = std::io::stdout();
    run(cli, &mut stdout.lock())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use uuid::Uuid;

    struct TempSettings {
        dir: PathBuf,
        file: PathBuf,
    }

    impl TempSettings {
        fn new() -> Self {
            let dir = std::env::temp_dir().join(format!("prefkit_cli_{}", Uuid::new_v4()));
            let file = dir.join("settings.json");
            Self { dir, file }
        }

        /// Runs `prefkit --file <file> <args…>` and returns its stdout.
        fn run(&self, args: &[&str]) -> anyhow::Result<String> {
            let file = self.file.to_string_lossy().into_owned();
            let mut argv = vec!["prefkit", "--file", file.as_str()];
            argv.extend_from_slice(args);
            let mut out = Vec::new();
            run(Cli::parse_from(argv), &mut out)?;
            Ok(String::from_utf8(out).expect("output is UTF-8"))
        }

        fn document(&self) -> Value {
            let content = std::fs::read_to_string(&self.file).expect("settings file exists");
            serde_json::from_str(&content).expect("settings file is JSON")
        }
    }

    impl Drop for TempSettings {
        fn drop(&mut self) {
            std::fs::remove_dir_all(&self.dir).ok();
        }
    }

    #[test]
    fn test_parse_value_accepts_json_and_falls_back_to_string() {
        assert_eq!(parse_value("42"), json!(42));
        assert_eq!(parse_value("[true]"), json!([true]));
        assert_eq!(parse_value("\"quoted\""), json!("quoted"));
        assert_eq!(parse_value("Dark"), json!("Dark"));
    }

    #[test]
    fn test_cli_parses_set_command() {
        // Arrange / Act
        let cli = Cli::parse_from([
            "prefkit", "--vendor", "Acme", "--product", "Rocket", "set", "volume", "80",
        ]);

        // Assert
        assert_eq!(cli.vendor.as_deref(), Some("Acme"));
        assert!(matches!(
            cli.command,
            Command::Set { ref key, ref value } if key == "volume" && value == "80"
        ));
    }

    #[test]
    fn test_file_takes_precedence_over_vendor_and_product() {
        let cli = Cli::parse_from([
            "prefkit", "--vendor", "Acme", "--product", "Rocket", "--file", "/tmp/x.json", "path",
        ]);
        assert_eq!(cli.settings_path().unwrap(), PathBuf::from("/tmp/x.json"));
    }

    #[test]
    fn test_missing_location_is_an_error() {
        let cli = Cli {
            vendor: Some("Acme".to_string()),
            product: None,
            file: None,
            command: Command::Path,
        };
        assert!(cli.settings_path().is_err());
    }

    #[test]
    fn test_path_prints_file_location() {
        let tmp = TempSettings::new();
        let out = tmp.run(&["path"]).unwrap();
        assert_eq!(out.trim_end(), tmp.file.display().to_string());
    }

    #[test]
    fn test_set_then_get_round_trips_through_file() {
        // Arrange
        let tmp = TempSettings::new();

        // Act
        tmp.run(&["set", "theme", "Dark"]).unwrap();
        tmp.run(&["set", "volume", "80"]).unwrap();
        let out = tmp.run(&["get", "volume"]).unwrap();

        // Assert
        assert_eq!(out.trim_end(), "80");
        assert_eq!(tmp.document(), json!({"theme": "Dark", "volume": 80}));
    }

    #[test]
    fn test_get_unknown_key_fails() {
        let tmp = TempSettings::new();
        let err = tmp.run(&["get", "nothing"]).unwrap_err();
        assert!(err.to_string().contains("\"nothing\""));
    }

    #[test]
    fn test_show_prints_all_settings() {
        let tmp = TempSettings::new();
        tmp.run(&["set", "a", "1"]).unwrap();
        tmp.run(&["set", "b", "{\"c\": null}"]).unwrap();

        let out = tmp.run(&["show"]).unwrap();

        let shown: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(shown, json!({"a": 1, "b": {"c": null}}));
    }

    #[test]
    fn test_unset_and_reset_remove_values() {
        let tmp = TempSettings::new();
        tmp.run(&["set", "a", "1"]).unwrap();
        tmp.run(&["set", "b", "2"]).unwrap();

        tmp.run(&["unset", "a"]).unwrap();
        assert_eq!(tmp.document(), json!({"b": 2}));

        tmp.run(&["reset"]).unwrap();
        assert_eq!(tmp.document(), json!({}));
    }

    #[test]
    fn test_corrupt_file_is_replaced_on_set() {
        let tmp = TempSettings::new();
        std::fs::create_dir_all(&tmp.dir).unwrap();
        std::fs::write(&tmp.file, "not json").unwrap();

        tmp.run(&["set", "fresh", "true"]).unwrap();

        assert_eq!(tmp.document(), json!({"fresh": true}));
    }
}
