//! Structured error types for configuration resolution.

use serde::Serialize;
use std::path::PathBuf;

/// Error codes for programmatic error handling.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // File errors
    FileNotFound,
    InvalidFormat,
    ReadFailed,

    // Environment errors
    InvalidEnvValue,

    // Validation errors
    ValidationFailed,

    // Internal errors
    RenderFailed,
}

/// A violated structural rule on the merged configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    /// Short identifier of the rule that failed (e.g. `provider_required`).
    pub rule: &'static str,
    /// Dotted location of the offending value, when there is one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub message: String,
}

impl ValidationError {
    pub fn new(rule: &'static str, message: impl Into<String>) -> Self {
        Self {
            rule,
            field: None,
            message: message.into(),
        }
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    // Convenience constructors

    pub fn missing_field(field: &str) -> Self {
        Self::new("required_field", format!("{} is required", field)).with_field(field)
    }

    pub fn mutually_exclusive(field: &str, a: &str, b: &str) -> Self {
        Self::new(
            "mutually_exclusive",
            format!("{}: {} and {} cannot be set together", field, a, b),
        )
        .with_field(field)
    }

    pub fn invalid_value(field: &str, reason: impl Into<String>) -> Self {
        Self::new("invalid_value", reason).with_field(field)
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.rule)
    }
}

/// Every way resolving a configuration can fail.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("invalid config file {}: {message}", path.display())]
    Format { path: PathBuf, message: String },

    #[error("failed to read config file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid value {value:?} for {var}: expected {expected}")]
    Coercion {
        var: String,
        expected: &'static str,
        value: String,
    },

    #[error("invalid configuration: {0}")]
    Validation(ValidationError),

    #[error("failed to render configuration: {0}")]
    Render(String),
}

impl ConfigError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ConfigError::NotFound { .. } => ErrorCode::FileNotFound,
            ConfigError::Format { .. } => ErrorCode::InvalidFormat,
            ConfigError::Io { .. } => ErrorCode::ReadFailed,
            ConfigError::Coercion { .. } => ErrorCode::InvalidEnvValue,
            ConfigError::Validation(_) => ErrorCode::ValidationFailed,
            ConfigError::Render(_) => ErrorCode::RenderFailed,
        }
    }

    pub fn format(path: impl Into<PathBuf>, err: impl std::fmt::Display) -> Self {
        ConfigError::Format {
            path: path.into(),
            message: err.to_string(),
        }
    }

    pub fn coercion(var: &str, expected: &'static str, value: &str) -> Self {
        ConfigError::Coercion {
            var: var.to_string(),
            expected,
            value: value.to_string(),
        }
    }
}

impl From<ValidationError> for ConfigError {
    fn from(err: ValidationError) -> Self {
        ConfigError::Validation(err)
    }
}

/// Result type for configuration operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
