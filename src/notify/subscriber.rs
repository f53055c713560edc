//! Subscriber-based notifications for configuration changes.

use crate::logging::{Level, Logger, TracingLogger};
use parking_lot::RwLock;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

/// Callback invoked when the configuration file changes.
pub type OnChange = Box<dyn Fn() + Send + Sync>;

/// Outcome of one [`SubscriberRegistry::notify_all`] pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Delivery {
    /// Number of callbacks that were invoked.
    pub invoked: usize,
    /// Number of those callbacks that panicked.
    pub panicked: usize,
}

/// Registry for configuration change subscribers.
///
/// Subscribers are append-only and are invoked in the order they were
/// registered. Notification takes the shared side of the lock, so several
/// notifications may run at once; registration takes the exclusive side.
///
/// A panicking subscriber is logged and skipped; the remaining subscribers
/// are still notified.
///
/// # Examples
///
/// ```rust
/// use gateway_config::notify::SubscriberRegistry;
///
/// let registry = SubscriberRegistry::new();
///
/// registry.register(|| {
///     println!("Config changed!");
/// });
///
/// let delivery = registry.notify_all();
/// assert_eq!(delivery.invoked, 1);
/// ```
#[derive(Clone)]
pub struct SubscriberRegistry {
    subscribers: Arc<RwLock<Vec<OnChange>>>,
    logger: Arc<dyn Logger>,
}

impl SubscriberRegistry {
    /// Create an empty registry that logs through `tracing`.
    pub fn new() -> Self {
        Self::with_logger(Arc::new(TracingLogger))
    }

    /// Create an empty registry that logs subscriber failures to `logger`.
    pub fn with_logger(logger: Arc<dyn Logger>) -> Self {
        Self {
            subscribers: Arc::new(RwLock::new(Vec::new())),
            logger,
        }
    }

    /// Append a subscriber.
    pub fn register<F>(&self, callback: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.register_boxed(Box::new(callback));
    }

    /// Append an already boxed subscriber.
    pub fn register_boxed(&self, callback: OnChange) {
        self.subscribers.write().push(callback);
    }

    /// Invoke every subscriber in registration order on the calling thread.
    ///
    /// Notifying an empty registry is a no-op. A subscriber must not call
    /// [`register`](Self::register) on the same registry, the read lock is held
    /// for the whole pass. [`len`](Self::len) and [`is_empty`](Self::is_empty)
    /// are safe to call from a subscriber.
    pub fn notify_all(&self) -> Delivery {
        let subscribers = self.subscribers.read();
        let mut delivery = Delivery::default();

        for (index, callback) in subscribers.iter().enumerate() {
            delivery.invoked += 1;
            if let Err(panic) = catch_unwind(AssertUnwindSafe(|| callback())) {
                delivery.panicked += 1;
                self.logger.log(
                    Level::Error,
                    &format!(
                        "config change subscriber #{} panicked: {}",
                        index,
                        panic_message(panic.as_ref())
                    ),
                );
            }
        }

        delivery
    }

    /// Number of registered subscribers.
    // Recursive read: may run inside a subscriber while a writer is queued.
    pub fn len(&self) -> usize {
        self.subscribers.read_recursive().len()
    }

    /// Whether no subscriber has been registered.
    pub fn is_empty(&self) -> bool {
        self.subscribers.read_recursive().is_empty()
    }
}

impl Default for SubscriberRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        msg
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.as_str()
    } else {
        "non-string panic payload"
    }
}
