//! Configuration file sources and format translation.

mod file;
mod format;

pub use file::FileSource;
pub use format::{Format, from_canonical, translate};
