//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate only receives the thresholds.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. Environment variables: `RELOCATOR__SECTION__KEY`, e.g.
//!    `RELOCATOR__THRESHOLDS__CRITICAL_SPACE_ACTION_BLOCKER_GB=10`
//! 3. `--config FILE`, or else the platform config file followed by a local
//!    `.relocator.toml`
//! 4. Built-in defaults (always present)

use std::path::{Path, PathBuf};

use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use relocator_core::application::StorageThresholds;

/// Local override file, looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = ".relocator.toml";

const ENV_PREFIX: &str = "RELOCATOR";

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Free-space limits handed to the storage checks.
    pub thresholds: StorageThresholds,
    /// Output settings.
    pub output: OutputConfig,
    /// Where the inventory lives.
    pub inventory: InventoryConfig,
    /// Log file settings.
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
    /// auto | human | plain | json
    pub format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            no_color: false,
            format: "auto".into(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryConfig {
    /// TOML file or directory of TOML files.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// When set, logs are also appended to this file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl AppConfig {
    /// Load configuration, starting from defaults.
    ///
    /// `config_file` is the path the user passed via `--config`; it must
    /// exist. Without it, the default locations are read if present.
    pub fn load(config_file: Option<&Path>) -> anyhow::Result<Self> {
        let mut builder = Config::builder().add_source(Config::try_from(&Self::default())?);

        match config_file {
            Some(path) => {
                builder = builder.add_source(File::from(path).format(FileFormat::Toml));
            }
            None => {
                builder = builder
                    .add_source(
                        File::from(Self::config_path().as_path())
                            .format(FileFormat::Toml)
                            .required(false),
                    )
                    .add_source(
                        File::from(Path::new(LOCAL_CONFIG_FILE))
                            .format(FileFormat::Toml)
                            .required(false),
                    );
            }
        }

        let settings = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.relocator.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("com", "relocator", "relocator")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(LOCAL_CONFIG_FILE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn default_thresholds_match_engine_defaults() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.thresholds.critical_space_action_blocker_gb, 5);
        assert_eq!(cfg.thresholds.warning_low_space_percent, 10);
    }

    #[test]
    fn default_no_color_is_false() {
        assert!(!AppConfig::default().output.no_color);
    }

    #[test]
    fn explicit_file_overrides_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("relocator.toml");
        fs::write(
            &path,
            "[thresholds]\ncritical_space_action_blocker_gb = 20\n\n[inventory]\npath = \"/srv/inventory\"\n",
        )
        .unwrap();

        let cfg = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(cfg.thresholds.critical_space_action_blocker_gb, 20);
        assert_eq!(cfg.thresholds.warning_low_space_percent, 10);
        assert_eq!(cfg.inventory.path, Some(PathBuf::from("/srv/inventory")));
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        assert!(AppConfig::load(Some(&temp.path().join("absent.toml"))).is_err());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bad.toml");
        fs::write(&path, "[thresholds\n").unwrap();
        assert!(AppConfig::load(Some(&path)).is_err());
    }

    #[test]
    fn defaults_round_trip_through_toml() {
        let raw = toml::to_string_pretty(&AppConfig::default()).unwrap();
        let back: AppConfig = toml::from_str(&raw).unwrap();
        assert_eq!(back.thresholds, StorageThresholds::default());
        assert!(back.inventory.path.is_none());
    }

    #[test]
    fn config_path_is_not_empty() {
        let p = AppConfig::config_path();
        assert!(!p.as_os_str().is_empty());
    }
}
