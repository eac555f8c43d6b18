//! Configuration loader.
//!
//! Resolves the configuration from its three tiers: the YAML file, the
//! environment snapshot and the built-in defaults, then validates it.

use super::env::{Environ, bind_env};
use super::merge::{decode, finalize};
use super::types::Config;
use super::validate::{ValidateOptions, validate};
use crate::error::{ConfigError, ConfigResult};
use serde_json::{Map, Value};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Configuration tier priority (lowest to highest).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ConfigTier {
    /// Built-in defaults (lowest priority)
    Defaults = 0,
    /// YAML configuration file
    File = 1,
    /// Environment variables (highest priority)
    Environment = 2,
}

impl std::fmt::Display for ConfigTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigTier::Defaults => write!(f, "defaults"),
            ConfigTier::File => write!(f, "file"),
            ConfigTier::Environment => write!(f, "environment"),
        }
    }
}

/// Inputs coming from the command line.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// YAML file to read. `None` or an empty path skips the file tier.
    pub config_file: Option<PathBuf>,
    /// Resolve for a notification test run instead of a watch run.
    pub test_notif: bool,
}

impl LoadOptions {
    pub fn with_file(path: impl Into<PathBuf>) -> Self {
        Self {
            config_file: Some(path.into()),
            test_notif: false,
        }
    }

    fn file(&self) -> Option<&Path> {
        self.config_file
            .as_deref()
            .filter(|path| !path.as_os_str().is_empty())
    }
}

/// Read and decode the configuration file into a raw document.
///
/// Without a path this returns an empty document. The file must exist, be
/// valid YAML and only use known keys with values of the right type.
pub fn load_file(path: Option<&Path>) -> ConfigResult<Value> {
    let Some(path) = path.filter(|p| !p.as_os_str().is_empty()) else {
        return Ok(Value::Object(Map::new()));
    };

    let content = std::fs::read_to_string(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => ConfigError::NotFound {
            path: path.to_path_buf(),
        },
        _ => ConfigError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;

    let blank = content
        .lines()
        .map(str::trim)
        .all(|line| line.is_empty() || line.starts_with('#'));
    let document: Value = if blank {
        Value::Null
    } else {
        serde_yaml::from_str(&content).map_err(|e| ConfigError::format(path, e))?
    };
    if document.is_null() {
        debug!(path = %path.display(), "Config file is empty");
        return Ok(Value::Object(Map::new()));
    }

    // Strict typed pass: unknown keys and wrong value types are reported
    // here, with the YAML location, rather than after merging.
    serde_yaml::from_str::<Config>(&content).map_err(|e| ConfigError::format(path, e))?;

    Ok(document)
}

/// Resolve a configuration from a file and an environment snapshot.
pub fn resolve(options: &LoadOptions, environ: &Environ) -> ConfigResult<Config> {
    let file = options.file();
    if let Some(path) = file {
        info!(path = %path.display(), tier = %ConfigTier::File, "Loading configuration file");
    }
    let document = load_file(file)?;

    debug!(tier = %ConfigTier::Environment, "Applying environment overrides");
    let document = bind_env(document, environ)?;

    let origin = file.unwrap_or(Path::new("<environment>"));
    let config = decode(document, origin)?;

    debug!(tier = %ConfigTier::Defaults, "Filling defaults");
    let config = finalize(config);

    validate(
        &config,
        ValidateOptions {
            test_notif: options.test_notif,
        },
    )?;
    Ok(config)
}

/// Configuration loader holding the resolved configuration.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Loaded configuration
    config: Config,
    /// Path to the config file that was used (if any)
    config_path: Option<PathBuf>,
}

impl ConfigLoader {
    /// Resolve against a snapshot of the current process environment.
    pub fn load(options: &LoadOptions) -> ConfigResult<Self> {
        Self::load_with_env(options, &Environ::from_process())
    }

    /// Resolve against an explicit environment snapshot.
    pub fn load_with_env(options: &LoadOptions, environ: &Environ) -> ConfigResult<Self> {
        let config = resolve(options, environ)?;
        Ok(Self {
            config,
            config_path: options.file().map(Path::to_path_buf),
        })
    }

    /// Get the loaded configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Consume the loader and return the configuration.
    pub fn into_config(self) -> Config {
        self.config
    }

    /// Get the config file path that was used.
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }
}
