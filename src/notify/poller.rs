//! Background task that polls the configuration file's content digest.

use super::subscriber::{Delivery, SubscriberRegistry};
use crate::logging::{Level, Logger};
use crate::sources::FileSource;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Result of a single poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Tick {
    /// Digest matched the last observed one.
    Unchanged,
    /// Digest changed and subscribers were notified.
    Changed(Delivery),
    /// The file could not be read; the last digest is kept.
    ReadFailed,
}

/// Polls a file and notifies subscribers when its digest changes.
///
/// The poller is the only owner of the last observed digest. It is moved into
/// its task on [`spawn`](Self::spawn) and never shared.
pub(crate) struct HashPoller {
    source: FileSource,
    last_digest: String,
    interval: Duration,
    subscribers: SubscriberRegistry,
    logger: Arc<dyn Logger>,
}

impl HashPoller {
    pub(crate) fn new(
        source: FileSource,
        initial_digest: String,
        interval: Duration,
        subscribers: SubscriberRegistry,
        logger: Arc<dyn Logger>,
    ) -> Self {
        Self {
            source,
            last_digest: initial_digest,
            interval,
            subscribers,
            logger,
        }
    }

    /// Start polling on `runtime` until `cancel` flips to true or its sender is dropped.
    pub(crate) fn spawn(self, runtime: &Handle, cancel: watch::Receiver<bool>) -> JoinHandle<()> {
        runtime.spawn(self.run(cancel))
    }

    async fn run(mut self, mut cancel: watch::Receiver<bool>) {
        self.logger.log(
            Level::Info,
            &format!("start watching config file {}", self.source.path().display()),
        );

        loop {
            let cancelled = *cancel.borrow();
            if cancelled {
                break;
            }

            tokio::select! {
                _ = cancel.changed() => break,
                _ = tokio::time::sleep(self.interval) => {}
            }

            if let Tick::Changed(delivery) = self.tick().await {
                if delivery.panicked > 0 {
                    self.logger.log(
                        Level::Warn,
                        &format!(
                            "{} of {} config change subscribers panicked",
                            delivery.panicked, delivery.invoked
                        ),
                    );
                }
            }
        }

        self.logger.log(
            Level::Info,
            &format!("stop watching config file {}", self.source.path().display()),
        );
    }

    /// Re-read the file once and notify subscribers if its digest changed.
    pub(crate) async fn tick(&mut self) -> Tick {
        let digest = match self.source.digest_async().await {
            Ok(digest) => digest,
            Err(e) => {
                self.logger
                    .log(Level::Error, &format!("config file poll failed: {}", e));
                return Tick::ReadFailed;
            }
        };

        if digest == self.last_digest {
            self.logger.log(
                Level::Debug,
                &format!("config file unchanged, sha256: {}", digest),
            );
            return Tick::Unchanged;
        }

        self.logger.log(
            Level::Info,
            &format!(
                "config file changed, notifying subscribers (previous sha256: {}, current sha256: {})",
                self.last_digest, digest
            ),
        );
        self.last_digest = digest;

        // Subscribers are arbitrary blocking code; keep them off the runtime workers.
        let subscribers = self.subscribers.clone();
        match tokio::task::spawn_blocking(move || subscribers.notify_all()).await {
            Ok(delivery) => Tick::Changed(delivery),
            Err(e) => {
                self.logger.log(
                    Level::Error,
                    &format!("config change notification task failed: {}", e),
                );
                Tick::Changed(Delivery::default())
            }
        }
    }
}
