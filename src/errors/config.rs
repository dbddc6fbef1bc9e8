//! Configuration error types

use thiserror::Error;

/// Configuration loading and validation errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file could not be read
    #[error("Failed to read configuration '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration is not valid YAML for the expected schema
    #[error("Invalid configuration format: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// Palette cannot style any layer
    #[error("Invalid palette: {0}")]
    InvalidPalette(String),

    /// Feature property holding POI URIs is blank
    #[error("Invalid feature URI key: '{0}'")]
    InvalidFeatureUriKey(String),
}

impl ConfigError {
    /// Check if this is a client error (bad user input rather than I/O)
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ConfigError::Parse(_)
                | ConfigError::InvalidPalette(_)
                | ConfigError::InvalidFeatureUriKey(_)
        )
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ConfigError::Io { .. } => "NOT_FOUND",
            ConfigError::Parse(_)
            | ConfigError::InvalidPalette(_)
            | ConfigError::InvalidFeatureUriKey(_) => "VALIDATION_FAILED",
        }
    }
}
