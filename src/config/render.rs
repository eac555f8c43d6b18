//! Human readable renderings of a resolved configuration.

use super::env::encode;
use super::types::Config;
use crate::error::{ConfigError, ConfigResult};

/// Output format for `render`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderFormat {
    #[default]
    Yaml,
    Json,
    /// One `NAME=value` line per set leaf.
    Env,
}

/// Render a configuration for display. Secrets are not masked.
pub fn render(config: &Config, format: RenderFormat) -> ConfigResult<String> {
    match format {
        RenderFormat::Yaml => {
            serde_yaml::to_string(config).map_err(|e| ConfigError::Render(e.to_string()))
        }
        RenderFormat::Json => {
            serde_json::to_string_pretty(config).map_err(|e| ConfigError::Render(e.to_string()))
        }
        RenderFormat::Env => Ok(encode(config)?
            .into_iter()
            .map(|(name, value)| format!("{}={}\n", name, value))
            .collect()),
    }
}
