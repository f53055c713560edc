//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::Path;
use std::time::Duration;

/// Replace the file at `path` atomically so the poller never sees a partial write.
pub fn replace_file(path: &Path, content: &str) {
    let staging = path.with_extension("staging");
    fs::write(&staging, content).unwrap();
    fs::rename(&staging, path).unwrap();
}

/// Poll `condition` until it holds or `limit` elapses. Returns whether it held.
pub async fn wait_until(limit: Duration, mut condition: impl FnMut() -> bool) -> bool {
    let deadline = tokio::time::Instant::now() + limit;
    while tokio::time::Instant::now() < deadline {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    condition()
}
