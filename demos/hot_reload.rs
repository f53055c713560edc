//! Watch a gateway configuration file and print it whenever it changes.
//!
//! Run with: cargo run --example hot_reload -- path/to/gateway.yaml

use gateway_config::prelude::*;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;

#[tokio::main]
async fn main() -> Result<()> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config/gateway.yaml".to_string());

    let loader: Arc<FileLoader> = Arc::new(
        FileLoader::builder(&path)
            .with_poll_interval(Duration::from_secs(1))
            .build()?,
    );

    let config = loader.load()?;
    println!("Loaded gateway {:?} with {} endpoints", config.name, config.endpoints.len());

    // Subscribers carry no payload; hand the signal to an async task that reloads.
    let changed = Arc::new(Notify::new());
    let signal = Arc::clone(&changed);
    loader.watch(move || signal.notify_one());

    let reloader = Arc::clone(&loader);
    tokio::spawn(async move {
        loop {
            changed.notified().await;
            match reloader.load() {
                Ok(config) => println!(
                    "Reloaded gateway {:?}: {} endpoints, {} middlewares",
                    config.name,
                    config.endpoints.len(),
                    config.middlewares.len()
                ),
                Err(e) => eprintln!("Reload failed, keeping previous configuration: {}", e),
            }
        }
    });

    println!("Watching {} (Ctrl+C to exit)", path);
    let _ = tokio::signal::ctrl_c().await;

    loader.shutdown().await;
    Ok(())
}
