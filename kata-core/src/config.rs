//! # Configuration Module
//!
//! Handles loading kata configuration from `kata.toml` and the environment.
//!
//! ## Config File Location
//!
//! The configuration file is loaded in the following order:
//!
//! 1. If `KATA_CONFIG` environment variable is set, load from that path
//! 2. Otherwise, load from `kata.toml` in the current directory
//!
//! A missing `kata.toml` in the current directory is not an error; defaults
//! apply.
//!
//! ## Configuration Structure
//!
//! ```toml
//! fail_fast = true
//! color = "never"
//! ```
//!
//! ## Environment
//!
//! `KATA_FAIL_FAST=true|false` overrides `fail_fast`. Command-line flags of
//! the `kata` CLI override both.

use once_cell::sync::Lazy;
use serde::Deserialize;
use std::{io::Read, path::Path};
use tracing::*;

use crate::{Error, Result};

/// Environment variable name for specifying the config file path.
const KATA_CONFIG_ENV: &str = "KATA_CONFIG";
const KATA_FAIL_FAST_ENV: &str = "KATA_FAIL_FAST";

static CONFIG: Lazy<Config> = Lazy::new(|| {
    let _ = dotenv::dotenv();
    Config::load().unwrap_or_else(|e| {
        error!("{e}");
        Config::default()
    })
});

#[doc(hidden)]
pub fn get_kata_config() -> &'static Config {
    &CONFIG
}

/// kata's configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Config {
    /// Stop the run at the first failed or errored example.
    #[serde(default)]
    pub fail_fast: bool,
    /// Color output of the built-in reporters.
    #[serde(default)]
    pub color: Color,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, strum::EnumString, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Color {
    #[default]
    Auto,
    Always,
    Never,
}

impl Config {
    /// Load kata configuration from path.
    fn load_from(path: &Path) -> Result<Config> {
        let Ok(mut file) = std::fs::File::open(path) else {
            return Ok(Config::default());
        };

        let mut buf = String::new();
        file.read_to_string(&mut buf)
            .map_err(|e| Error::LoadError(e.to_string()))?;

        let mut cfg: Config = toml::from_str(&buf).map_err(|e| {
            Error::LoadError(format!(
                "failed to deserialize kata.toml into kata::Config: {e}"
            ))
        })?;

        debug!("kata.toml was successfully loaded: {cfg:#?}");

        cfg.load_env()?;

        Ok(cfg)
    }

    /// Load kata configuration.
    ///
    /// Loading order:
    /// 1. If `KATA_CONFIG` env var is set, load from that path
    /// 2. Otherwise, load from `kata.toml` in the current directory
    fn load() -> Result<Config> {
        match std::env::var(KATA_CONFIG_ENV) {
            Ok(path) => {
                let path = Path::new(&path);

                // Detect misuse: if it doesn't look like a file path, error out
                if path.extension().is_none_or(|ext| ext != "toml")
                    && !path.to_string_lossy().contains(std::path::MAIN_SEPARATOR)
                    && !path.to_string_lossy().contains('/')
                {
                    return Err(Error::LoadError(format!(
                        "{KATA_CONFIG_ENV} should be a path to a config file, not a config value. \
                         Got: {:?}. Use {KATA_FAIL_FAST_ENV}=true to enable fail-fast instead.",
                        path
                    )));
                }

                if !path.exists() {
                    return Err(Error::LoadError(format!(
                        "Config file specified by {KATA_CONFIG_ENV} not found: {:?}",
                        path
                    )));
                }

                debug!("Loading config from {KATA_CONFIG_ENV}={:?}", path);
                Config::load_from(path)
            }
            Err(_) => Config::load_from(Path::new("kata.toml")),
        }
    }

    /// Apply `KATA_FAIL_FAST` on top of the file configuration.
    fn load_env(&mut self) -> Result<()> {
        let Ok(value) = std::env::var(KATA_FAIL_FAST_ENV) else {
            return Ok(());
        };

        self.fail_fast = match value.trim().to_lowercase().as_str() {
            "1" | "true" | "yes" => true,
            "0" | "false" | "no" | "" => false,
            _ => {
                return Err(Error::ValueError {
                    key: KATA_FAIL_FAST_ENV.to_string(),
                    value,
                })
            }
        };
        debug!("fail_fast={} from {KATA_FAIL_FAST_ENV}", self.fail_fast);
        Ok(())
    }
}
