//! Example demonstrating change notifications and re-retrieval.
//!
//! This example shows how to:
//! - Retrieve a configuration snapshot with a change callback
//! - Receive change events through a channel
//! - Re-retrieve on each event and release the previous snapshot
//!
//! Run with: cargo run --example hot_reload
//!
//! While running, try editing demos/config/hot_reload.yaml to see reloads.

use confmap_provider::prelude::*;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct AppConfig {
    server: ServerConfig,
}

#[derive(Debug, Deserialize)]
struct ServerConfig {
    port: u16,
    host: String,
}

fn print_snapshot(retrieved: &dyn Retrieved) {
    match retrieved.config_map().try_deserialize::<AppConfig>() {
        Ok(cfg) => println!("  Server: {}:{}", cfg.server.host, cfg.server.port),
        Err(e) => println!("  Snapshot does not match AppConfig: {}", e),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    println!("=== Hot Reload Example ===\n");

    let config_path = "demos/config/hot_reload.yaml";
    if !std::path::Path::new(config_path).exists() {
        std::fs::create_dir_all("demos/config")
            .map_err(|e| ProviderError::unavailable(config_path, e))?;
        std::fs::write(config_path, "server:\n  port: 8080\n  host: localhost\n")
            .map_err(|e| ProviderError::unavailable(config_path, e))?;
        println!("Created {}", config_path);
    }

    let provider = WatchedFileProvider::new(config_path);
    let (callback, mut changes) = change_channel();
    let ctx = Context::background().with_timeout(Duration::from_secs(5));

    let mut current = provider.retrieve(&ctx, Some(callback.clone()))?;
    println!("Initial configuration:");
    print_snapshot(current.as_ref());

    println!("\n===> Try editing {} to see reloads! <===", config_path);
    println!("Press Ctrl+C to exit\n");

    let mut reloads = 0usize;
    loop {
        tokio::select! {
            event = changes.recv() => {
                let Some(event) = event else { break };
                if let Some(err) = event.error() {
                    println!("[Event] Watch error: {}", err);
                }

                // A save often arrives as several events; let it settle.
                tokio::time::sleep(Duration::from_millis(100)).await;
                while changes.try_recv().is_ok() {}

                let ctx = Context::background().with_timeout(Duration::from_secs(5));
                match provider.retrieve(&ctx, Some(callback.clone())) {
                    Ok(next) => {
                        reloads += 1;
                        current.release()?;
                        current = next;
                        println!("[Event] Configuration reloaded (reload #{})", reloads);
                        print_snapshot(current.as_ref());
                    }
                    Err(e) => println!("[Event] Reload failed, keeping previous snapshot: {}", e),
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    current.release()?;
    provider.shutdown(&Context::background())?;
    println!("\nShut down after {} reloads", reloads);
    Ok(())
}
