//! # gateway-config
//!
//! Configuration loading for a network gateway, with change detection by
//! content hashing.
//!
//! ## Overview
//!
//! `gateway-config` reads the gateway's configuration file, translates it into
//! a typed document, and polls the file's SHA-256 digest in the background.
//! When the digest changes, every registered subscriber is called so the
//! gateway can reload.
//!
//! - YAML by default, JSON always, TOML behind the `toml` feature
//! - Unknown fields are ignored, so newer files load on older gateways
//! - Subscribers run in registration order; a panicking subscriber is logged
//!   and does not affect the others
//! - Logging goes through an injected [`Logger`](logging::Logger), `tracing` by default
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gateway_config::prelude::*;
//!
//! # async fn example() -> gateway_config::error::Result<()> {
//! let loader: FileLoader = FileLoader::new("config/gateway.yaml")?;
//!
//! loader.watch(|| {
//!     println!("gateway configuration changed");
//! });
//!
//! let config = loader.load()?;
//! println!("gateway {} has {} endpoints", config.name, config.endpoints.len());
//!
//! loader.shutdown().await;
//! # Ok(())
//! # }
//! ```
//!
//! ## Feature Flags
//!
//! - `yaml` (default): YAML configuration files
//! - `toml`: TOML configuration files
//! - `all-formats`: both of the above

#![warn(missing_docs, rust_2024_compatibility)]
#![deny(unsafe_code)]

pub mod core;
pub mod digest;
pub mod error;
pub mod logging;
pub mod notify;
pub mod schema;
pub mod sources;

/// Convenient re-exports for common usage patterns.
pub mod prelude {
    pub use crate::core::{ConfigLoader, DEFAULT_POLL_INTERVAL, FileLoader, FileLoaderBuilder};
    pub use crate::error::{ConfigError, Result};
    pub use crate::logging::{Level, Logger, TracingLogger};
    pub use crate::schema::GatewayConfig;
    pub use crate::sources::Format;
}
