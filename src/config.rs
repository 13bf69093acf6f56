//! Layered configuration loading using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`ISSUE_CLIP_*` prefix, `__` as separator)
//! 2. An explicit file (`--config`)
//! 3. Project-level `.issue-clip.toml`
//! 4. User-level `<config dir>/issue-clip/config.toml`
//! 5. Built-in defaults
//!
//! `ISSUE_CLIP_NORMALIZE__MAX_LENGTH=300` maps to `normalize.max_length`.
//!
//! Environment values are trimmed before parsing. Values whose surrounding
//! whitespace matters go in double quotes, which figment reads as a string
//! literal: `ISSUE_CLIP_NORMALIZE__INDENT='"> "'`.

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::clipboard::ClipboardConfig;
use crate::convert::ConversionRules;
use crate::extractors::PageSelectors;
use crate::normalize::NormalizeOptions;

pub const ENV_PREFIX: &str = "ISSUE_CLIP_";
pub const LOCAL_CONFIG_FILE: &str = ".issue-clip.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration error: {0}")]
    Figment(#[from] figment::Error),

    #[error("Invalid configuration value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub normalize: NormalizeOptions,
    #[serde(default)]
    pub conversion: ConversionRules,
    #[serde(default)]
    pub selectors: PageSelectors,
    #[serde(default)]
    pub clipboard: ClipboardConfig,
}

impl Config {
    /// Load from defaults, config files and environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with(None)
    }

    /// Like [`Config::load`], with `path` layered above the discovered files.
    pub fn load_with(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config: Self = Self::figment(path).extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Build the provider chain. Public so tests can extend it.
    pub fn figment(explicit: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        let local_path = PathBuf::from(LOCAL_CONFIG_FILE);
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // An explicit file that is missing is an error, not a skipped layer
        if let Some(path) = explicit {
            figment = figment.merge(Toml::file_exact(path));
        }

        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.normalize.indent.contains('\n') {
            return Err(ConfigError::InvalidValue {
                field: "normalize.indent".to_string(),
                reason: "must not contain a newline".to_string(),
            });
        }
        Ok(())
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("issue-clip").join("config.toml"))
    }
}
