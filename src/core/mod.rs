//! The loader façade.

mod builder;
mod loader;

pub use builder::{DEFAULT_POLL_INTERVAL, FileLoaderBuilder};
pub use loader::{ConfigLoader, FileLoader};
