//! Builder for constructing FileLoader instances.

use crate::core::FileLoader;
use crate::error::{ConfigError, Result};
use crate::logging::{Level, Logger, TracingLogger};
use crate::sources::{FileSource, Format};
use serde::de::DeserializeOwned;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;

/// Interval between two digest checks unless configured otherwise.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Builder for constructing a [`FileLoader`].
///
/// # Examples
///
/// ```rust,no_run
/// use gateway_config::prelude::*;
/// use std::time::Duration;
///
/// # async fn example() -> Result<()> {
/// let loader: FileLoader = FileLoader::builder("config/gateway.yaml")
///     .with_poll_interval(Duration::from_secs(1))
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct FileLoaderBuilder {
    path: PathBuf,
    format: Option<Format>,
    poll_interval: Duration,
    logger: Option<Arc<dyn Logger>>,
}

impl FileLoaderBuilder {
    /// Create a builder for the file at `path` with default settings.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            format: None,
            poll_interval: DEFAULT_POLL_INTERVAL,
            logger: None,
        }
    }

    /// Set how often the file is re-hashed. Must be non-zero.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Parse the file as `format` instead of detecting it from the extension.
    pub fn with_format(mut self, format: Format) -> Self {
        self.format = Some(format);
        self
    }

    /// Send loader and poller messages to `logger` instead of `tracing`.
    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Build the loader.
    ///
    /// Reads and hashes the file, then starts the background poller on the
    /// current Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The poll interval is zero
    /// - The file cannot be read
    /// - No Tokio runtime is running
    pub fn build<T>(self) -> Result<FileLoader<T>>
    where
        T: DeserializeOwned,
    {
        if self.poll_interval.is_zero() {
            return Err(ConfigError::InvalidOption(
                "poll interval must be greater than zero".to_string(),
            ));
        }

        let mut source = FileSource::new(self.path);
        if let Some(format) = self.format {
            source = source.with_format(format);
        }

        let logger: Arc<dyn Logger> = match self.logger {
            Some(logger) => logger,
            None => Arc::new(TracingLogger),
        };

        let digest = source.digest()?;
        let runtime = Handle::try_current().map_err(|_| ConfigError::RuntimeUnavailable)?;

        logger.log(
            Level::Info,
            &format!("initial config file sha256: {}", digest),
        );

        Ok(FileLoader::start(
            source,
            digest,
            self.poll_interval,
            logger,
            &runtime,
        ))
    }
}

impl FileLoader {
    /// Create a new builder for a loader of the file at `path`.
    pub fn builder(path: impl Into<PathBuf>) -> FileLoaderBuilder {
        FileLoaderBuilder::new(path)
    }
}
