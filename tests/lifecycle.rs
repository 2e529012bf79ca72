//! Lifecycle and concurrency tests shared by every provider.

use confmap_provider::prelude::*;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tempfile::TempDir;

fn all_providers(dir: &Path) -> Vec<Box<dyn Provider>> {
    let config_path = dir.join("config.yaml");
    fs::write(&config_path, "a: 1\n").unwrap();

    #[allow(unused_mut)]
    let mut providers: Vec<Box<dyn Provider>> = vec![
        Box::new(FileProvider::new(&config_path)),
        Box::new(InMemoryProvider::new("a: 1\n")),
        Box::new(EnvProvider::new("CMP_LIFECYCLE_TEST")),
        Box::new(PropertiesProvider::new(["a=1"])),
    ];
    #[cfg(feature = "file-watch")]
    providers.push(Box::new(WatchedFileProvider::new(&config_path)));
    providers
}

#[test]
fn test_shutdown_without_retrieve() {
    let temp_dir = TempDir::new().unwrap();
    let ctx = Context::background();

    for provider in all_providers(temp_dir.path()) {
        assert!(provider.shutdown(&ctx).is_ok(), "{}", provider.name());
        assert!(provider.shutdown(&ctx).is_ok(), "{}", provider.name());
    }
}

#[test]
fn test_retrieve_then_shutdown_then_reject() {
    let temp_dir = TempDir::new().unwrap();
    let ctx = Context::background();

    for provider in all_providers(temp_dir.path()) {
        let retrieved = provider.retrieve(&ctx, None).unwrap();
        retrieved.release().unwrap();

        provider.shutdown(&ctx).unwrap();

        let err = provider.retrieve(&ctx, None).unwrap_err();
        assert!(
            matches!(err, ProviderError::Configuration { .. }),
            "{} returned {:?}",
            provider.name(),
            err
        );
    }
}

#[test]
fn test_cancelled_context_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let ctx = Context::background();
    ctx.cancel();

    for provider in all_providers(temp_dir.path()) {
        let err = provider.retrieve(&ctx, None).unwrap_err();
        assert!(err.is_context_error(), "{} returned {:?}", provider.name(), err);
    }
}

#[test]
fn test_repeated_retrieves_are_independent_snapshots() {
    let temp_dir = TempDir::new().unwrap();
    let ctx = Context::background();

    for provider in all_providers(temp_dir.path()) {
        let first = provider.retrieve(&ctx, None).unwrap();
        let second = provider.retrieve(&ctx, None).unwrap();
        assert_eq!(first.config_map(), second.config_map(), "{}", provider.name());
        first.release().unwrap();
        second.release().unwrap();
    }
}

#[cfg(feature = "file-watch")]
#[test]
fn test_concurrent_retrieve_and_shutdown() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, "a: 1\n").unwrap();

    for _ in 0..10 {
        let provider = Arc::new(WatchedFileProvider::new(&config_path));
        let (callback, _rx) = change_channel();

        let retrievers: Vec<_> = (0..4)
            .map(|_| {
                let provider = Arc::clone(&provider);
                let callback = callback.clone();
                thread::spawn(move || {
                    let ctx = Context::background();
                    for _ in 0..20 {
                        match provider.retrieve(&ctx, Some(callback.clone())) {
                            Ok(retrieved) => retrieved.release().unwrap(),
                            Err(ProviderError::Configuration { .. }) => break,
                            Err(err) => panic!("unexpected error: {}", err),
                        }
                    }
                })
            })
            .collect();

        thread::sleep(Duration::from_millis(1));
        provider.shutdown(&Context::background()).unwrap();

        for retriever in retrievers {
            retriever.join().unwrap();
        }

        assert!(!provider.is_watching());
    }
}

#[cfg(feature = "file-watch")]
#[tokio::test]
async fn test_no_events_after_shutdown() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, "a: 1\n").unwrap();

    let provider = WatchedFileProvider::new(&config_path);
    let (callback, mut rx) = change_channel();
    provider
        .retrieve(&Context::background(), Some(callback))
        .unwrap();
    provider.shutdown(&Context::background()).unwrap();

    fs::write(&config_path, "a: 2\n").unwrap();

    // The callback (and with it the only sender) was dropped at shutdown.
    let event = tokio::time::timeout(Duration::from_millis(500), rx.recv()).await;
    assert!(matches!(event, Ok(None)));
}
