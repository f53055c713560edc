//! Configuration change notification.
//!
//! A background poller re-hashes the configuration file on a fixed interval
//! and notifies registered subscribers when the digest changes.

pub(crate) mod poller;
pub mod subscriber;

pub use subscriber::{Delivery, OnChange, SubscriberRegistry};
