// src/config.rs

//! Manages loader configuration: loading, resolving paths, and validation.

use crate::core::seed::LoadOptions;
use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::filter::EnvFilter;

/// Options that change how strictly the fixture is validated.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoaderConfig {
    /// Fail the load when a saved query's owner is not a seeded user.
    #[serde(default)]
    pub strict_query_owners: bool,
    /// Log each `appSettings` key this version does not recognize.
    #[serde(default = "default_warn_unrecognized_settings")]
    pub warn_unrecognized_settings: bool,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            strict_query_owners: false,
            warn_unrecognized_settings: default_warn_unrecognized_settings(),
        }
    }
}

fn default_warn_unrecognized_settings() -> bool {
    true
}

impl From<LoaderConfig> for LoadOptions {
    fn from(cfg: LoaderConfig) -> Self {
        LoadOptions {
            strict_query_owners: cfg.strict_query_owners,
            warn_unrecognized_settings: cfg.warn_unrecognized_settings,
        }
    }
}

/// The file as written on disk, before relative paths are resolved.
#[derive(Deserialize, Debug)]
struct RawConfig {
    #[serde(default = "default_fixture_path")]
    fixture_path: String,
    #[serde(default = "default_log_level")]
    log_level: String,
    #[serde(default)]
    loader: LoaderConfig,
}

fn default_fixture_path() -> String {
    "users.js".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Location of the seed fixture. Relative paths in a config file are
    /// resolved against that file's directory.
    pub fixture_path: PathBuf,
    pub log_level: String,
    pub loader: LoaderConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fixture_path: PathBuf::from(default_fixture_path()),
            log_level: default_log_level(),
            loader: LoaderConfig::default(),
        }
    }
}

impl Config {
    /// Creates a new `Config` instance by reading and parsing a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file at '{}'", path.display()))?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new(""));
        Self::from_toml_str(&contents, base_dir)
            .with_context(|| format!("Invalid config file '{}'", path.display()))
    }

    /// Parses TOML text, resolving a relative `fixture_path` against `base_dir`.
    pub fn from_toml_str(contents: &str, base_dir: &Path) -> Result<Self> {
        let raw_config: RawConfig =
            toml::from_str(contents).context("Failed to parse TOML configuration")?;

        let fixture_path = PathBuf::from(&raw_config.fixture_path);
        let fixture_path = if fixture_path.is_relative() && !raw_config.fixture_path.is_empty() {
            base_dir.join(fixture_path)
        } else {
            fixture_path
        };

        let config = Config {
            fixture_path,
            log_level: raw_config.log_level,
            loader: raw_config.loader,
        };

        config.validate()?;
        Ok(config)
    }

    /// Validates the resolved configuration to ensure logical consistency.
    fn validate(&self) -> Result<()> {
        if self.fixture_path.as_os_str().is_empty() {
            return Err(anyhow!("fixture_path cannot be empty"));
        }
        if self.log_level.trim().is_empty() {
            return Err(anyhow!("log_level cannot be empty"));
        }
        EnvFilter::try_new(&self.log_level)
            .map_err(|e| anyhow!("invalid log_level '{}': {}", self.log_level, e))?;
        Ok(())
    }

    pub fn load_options(&self) -> LoadOptions {
        self.loader.into()
    }
}
