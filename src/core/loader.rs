//! The file-backed configuration loader.

use crate::error::Result;
use crate::logging::{Level, Logger};
use crate::notify::poller::HashPoller;
use crate::notify::{OnChange, SubscriberRegistry};
use crate::schema::GatewayConfig;
use crate::sources::{FileSource, Format};
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use std::fmt;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Loads configuration documents and reports when they should be reloaded.
///
/// Gateway components depend on this trait rather than on [`FileLoader`]
/// so they can be driven by a test double.
pub trait ConfigLoader<T>: Send + Sync {
    /// Read and parse the current configuration.
    fn load(&self) -> Result<T>;

    /// Register a callback for future configuration changes.
    fn watch(&self, callback: OnChange);

    /// Stop change detection. Calling it more than once is harmless.
    fn close(&self);
}

/// Configuration loader backed by a single file.
///
/// On construction the file is hashed and a background task starts polling
/// it. When the digest changes, every registered subscriber is invoked in
/// registration order. [`load`](Self::load) is independent of the poller: it
/// always reads and parses the file from disk.
///
/// Dropping the loader closes it.
///
/// # Examples
///
/// ```rust,no_run
/// use gateway_config::prelude::*;
///
/// # async fn example() -> Result<()> {
/// let loader: FileLoader = FileLoader::new("config/gateway.yaml")?;
///
/// loader.watch(|| println!("gateway config changed, reloading"));
///
/// let config = loader.load()?;
/// println!("{} endpoints", config.endpoints.len());
///
/// loader.shutdown().await;
/// # Ok(())
/// # }
/// ```
pub struct FileLoader<T = GatewayConfig> {
    source: FileSource,
    poll_interval: Duration,
    subscribers: SubscriberRegistry,
    logger: Arc<dyn Logger>,
    cancel: watch::Sender<bool>,
    poller: Mutex<Option<JoinHandle<()>>>,
    _document: PhantomData<fn() -> T>,
}

impl<T> FileLoader<T>
where
    T: DeserializeOwned,
{
    /// Create a loader with default settings.
    ///
    /// Must be called from within a Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::IoError`](crate::error::ConfigError::IoError)
    /// if the file cannot be read, or
    /// [`ConfigError::RuntimeUnavailable`](crate::error::ConfigError::RuntimeUnavailable)
    /// outside a runtime.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        crate::core::FileLoaderBuilder::new(path).build()
    }

    /// Read the file and translate it into a fresh configuration document.
    ///
    /// Blocks the calling thread on file IO. Does not affect change detection
    /// and keeps working after [`close`](Self::close).
    ///
    /// # Errors
    ///
    /// Returns an IO, format or schema error.
    pub fn load(&self) -> Result<T> {
        self.logger.log(
            Level::Info,
            &format!("loading config file {}", self.source.path().display()),
        );
        self.source.load()
    }
}

impl<T> FileLoader<T> {
    pub(crate) fn start(
        source: FileSource,
        initial_digest: String,
        poll_interval: Duration,
        logger: Arc<dyn Logger>,
        runtime: &Handle,
    ) -> Self {
        let subscribers = SubscriberRegistry::with_logger(Arc::clone(&logger));
        let (cancel, cancel_rx) = watch::channel(false);

        let poller = HashPoller::new(
            source.clone(),
            initial_digest,
            poll_interval,
            subscribers.clone(),
            Arc::clone(&logger),
        )
        .spawn(runtime, cancel_rx);

        Self {
            source,
            poll_interval,
            subscribers,
            logger,
            cancel,
            poller: Mutex::new(Some(poller)),
            _document: PhantomData,
        }
    }

    /// Register a callback for future configuration changes.
    ///
    /// The callback is not invoked for the current content, only for changes
    /// detected from now on. It runs on a blocking thread; a panic inside it is
    /// logged and does not affect other subscribers.
    pub fn watch<F>(&self, callback: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.register(Box::new(callback));
    }

    fn register(&self, callback: OnChange) {
        self.logger
            .log(Level::Info, "config change subscriber registered");
        self.subscribers.register_boxed(callback);
    }

    /// Signal the poller to stop.
    ///
    /// Returns immediately. A poll already in progress may still complete and
    /// notify; use [`shutdown`](Self::shutdown) to wait for the poller to exit.
    pub fn close(&self) {
        let already_closed = self.cancel.send_replace(true);
        if !already_closed {
            self.logger.log(
                Level::Info,
                &format!("closing config loader for {}", self.source.path().display()),
            );
        }
    }

    /// Close the loader and wait until the poller has exited.
    ///
    /// After this returns no further notifications are delivered.
    pub async fn shutdown(&self) {
        self.close();

        let poller = self.poller.lock().take();
        if let Some(poller) = poller {
            if let Err(e) = poller.await {
                self.logger
                    .log(Level::Error, &format!("config poller task failed: {}", e));
            }
        }
    }

    /// Whether [`close`](Self::close) has been called.
    pub fn is_closed(&self) -> bool {
        *self.cancel.borrow()
    }

    /// Path of the configuration file.
    pub fn path(&self) -> &Path {
        self.source.path()
    }

    /// Format used to parse the file.
    pub fn format(&self) -> Format {
        self.source.format()
    }

    /// Interval between digest checks.
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Number of registered subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl<T> ConfigLoader<T> for FileLoader<T>
where
    T: DeserializeOwned,
{
    fn load(&self) -> Result<T> {
        FileLoader::load(self)
    }

    fn watch(&self, callback: OnChange) {
        self.register(callback);
    }

    fn close(&self) {
        FileLoader::close(self);
    }
}

impl<T> Drop for FileLoader<T> {
    fn drop(&mut self) {
        self.close();
    }
}

impl<T> fmt::Debug for FileLoader<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileLoader")
            .field("path", &self.source.path())
            .field("format", &self.source.format())
            .field("poll_interval", &self.poll_interval)
            .field("subscribers", &self.subscribers.len())
            .field("closed", &self.is_closed())
            .finish()
    }
}
