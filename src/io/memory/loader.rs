use std::sync::atomic::{AtomicUsize, Ordering};

use dashmap::{DashMap, DashSet};
use futures::FutureExt;
use futures::future::BoxFuture;
use log::trace;

use crate::io::common::loader::{ByteFetcher, FetchError};

/// An archive that lives entirely in memory. Besides embedding, this is what the tests are built on,
/// as it counts how often every path has been fetched and can simulate a broken transport.
#[derive(Default)]
pub struct MemoryLoader {
    files: DashMap<String, Vec<u8>>,
    fetch_counts: DashMap<String, usize>,
    broken_paths: DashSet<String>,
    total_fetches: AtomicUsize,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, path: impl Into<String>, data: impl Into<Vec<u8>>) {
        self.files.insert(path.into(), data.into());
    }

    /// Every fetch of `path` fails with a transport error from now on.
    pub fn break_transport_for(&self, path: impl Into<String>) {
        self.broken_paths.insert(path.into());
    }

    pub fn fetch_count(&self, path: &str) -> usize {
        self.fetch_counts.get(path).map(|count| *count).unwrap_or(0)
    }

    pub fn total_fetches(&self) -> usize {
        self.total_fetches.load(Ordering::SeqCst)
    }
}

impl ByteFetcher for MemoryLoader {
    fn fetch<'a>(&'a self, path: &'a str) -> BoxFuture<'a, Result<Vec<u8>, FetchError>> {
        async move {
            self.total_fetches.fetch_add(1, Ordering::SeqCst);
            *self.fetch_counts.entry(path.to_owned()).or_insert(0) += 1;

            // Give other loads the chance to run, so that tests actually exercise interleaving.
            tokio::task::yield_now().await;

            if self.broken_paths.contains(path) {
                return Err(FetchError::Transport {
                    path: path.to_owned(),
                    source: anyhow::anyhow!("simulated transport failure"),
                });
            }

            trace!("Serving {} from memory", path);
            self.files
                .get(path)
                .map(|data| data.value().clone())
                .ok_or_else(|| FetchError::NotFound { path: path.to_owned() })
        }
        .boxed()
    }
}
