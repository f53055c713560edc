//! File-based configuration source.

use super::format::{Format, translate};
use crate::digest::content_digest;
use crate::error::{ConfigError, Result};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

/// A configuration file bound to its serialization format.
///
/// # Examples
///
/// ```rust,no_run
/// use gateway_config::schema::GatewayConfig;
/// use gateway_config::sources::FileSource;
///
/// let source = FileSource::new("config/gateway.yaml");
/// let config: GatewayConfig = source.load().unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    format: Format,
}

impl FileSource {
    /// Create a new file source with automatic format detection.
    ///
    /// See [`Format::from_path`] for the extension rules.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let format = Format::from_path(&path);
        Self { path, format }
    }

    /// Override the detected format.
    pub fn with_format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    /// Path of the configuration file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Format used to parse the file.
    pub fn format(&self) -> Format {
        self.format
    }

    /// Human-readable name for logging.
    pub fn name(&self) -> String {
        format!("file:{}", self.path.display())
    }

    /// Read the whole file, blocking the current thread.
    pub fn read(&self) -> Result<Vec<u8>> {
        std::fs::read(&self.path).map_err(|e| ConfigError::io(&self.path, e))
    }

    /// Read the whole file without blocking the async runtime.
    pub async fn read_async(&self) -> Result<Vec<u8>> {
        tokio::fs::read(&self.path)
            .await
            .map_err(|e| ConfigError::io(&self.path, e))
    }

    /// Digest of the current file content.
    pub fn digest(&self) -> Result<String> {
        self.read().map(|content| content_digest(&content))
    }

    /// Digest of the current file content, read asynchronously.
    pub async fn digest_async(&self) -> Result<String> {
        self.read_async().await.map(|content| content_digest(&content))
    }

    /// Read and translate the file into a configuration document.
    ///
    /// # Errors
    ///
    /// Returns an IO, format or schema error.
    pub fn load<T>(&self) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let content = self.read()?;
        translate(self.format, &content)
    }
}
