//! Error types for gateway-config.

use std::path::PathBuf;

/// Result type alias for gateway-config operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors that can occur when loading or watching configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read (missing, permission denied, ...).
    #[error("Failed to read configuration file {}: {source}", .path.display())]
    IoError {
        /// Path that was being read
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// The file is not well-formed in its serialization format.
    #[error("Malformed {format} configuration: {message}")]
    FormatError {
        /// Name of the format the input was parsed as
        format: &'static str,
        /// Parser error message
        message: String,
    },

    /// The parsed document does not fit the configuration schema.
    #[error("Configuration does not match schema: {0}")]
    SchemaError(String),

    /// Attempted to use a file format whose cargo feature is not enabled.
    #[error("Feature not enabled: {0}")]
    FeatureNotEnabled(&'static str),

    /// A loader option was rejected at build time.
    #[error("Invalid loader option: {0}")]
    InvalidOption(String),

    /// The loader was built outside of a Tokio runtime, so the poller cannot be spawned.
    #[error("No Tokio runtime available to run the change poller")]
    RuntimeUnavailable,
}

impl ConfigError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::IoError {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn format(format: &'static str, err: impl std::fmt::Display) -> Self {
        Self::FormatError {
            format,
            message: err.to_string(),
        }
    }

    /// Returns true if this error came from reading the file.
    pub fn is_io(&self) -> bool {
        matches!(self, Self::IoError { .. })
    }
}
