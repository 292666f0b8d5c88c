use futures::future::BoxFuture;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("{path} does not exist")]
    NotFound { path: String },

    /// The transport itself failed (I/O error, unreachable host, ...). This is not a statement about the
    /// asset, so it must never be turned into a missing dependency.
    #[error("Fetching {path} failed: {source}")]
    Transport {
        path: String,
        #[source]
        source: anyhow::Error,
    },
}

/// The transport agnostic source of raw file contents. Implementations deal with timeouts, the asset
/// store deals with deduplication, so this may be called concurrently for distinct paths only.
pub trait ByteFetcher: Send + Sync {
    fn fetch<'a>(&'a self, path: &'a str) -> BoxFuture<'a, Result<Vec<u8>, FetchError>>;
}
