use std::path::{Path, PathBuf};

use futures::FutureExt;
use futures::future::BoxFuture;
use log::{trace, warn};

use crate::io::common::loader::{ByteFetcher, FetchError};

/// Serves assets from an extracted archive on disk: `{data_folder}/{path_base}/{path}`.
pub struct DirectoryLoader {
    data_folder: PathBuf,
    path_base: Option<String>,
}

impl DirectoryLoader {
    pub fn new(data_folder: &str, path_base: Option<String>) -> Self {
        if !Path::new(data_folder).is_dir() {
            warn!("Data folder {} does not exist (yet)", data_folder);
        }

        DirectoryLoader {
            data_folder: data_folder.into(),
            path_base: path_base.filter(|base| !base.is_empty()),
        }
    }

    pub fn resolve_path(&self, path: &str) -> PathBuf {
        let root = match &self.path_base {
            Some(base) => self.data_folder.join(base),
            None => self.data_folder.clone(),
        };

        // archive paths always use forward slashes, regardless of the platform.
        path.split('/')
            .filter(|segment| !segment.is_empty())
            .fold(root, |acc, segment| acc.join(segment))
    }
}

impl ByteFetcher for DirectoryLoader {
    fn fetch<'a>(&'a self, path: &'a str) -> BoxFuture<'a, Result<Vec<u8>, FetchError>> {
        async move {
            let file = self.resolve_path(path);
            trace!("Loading {} from {}", path, file.display());

            tokio::fs::read(&file).await.map_err(|err| match err.kind() {
                std::io::ErrorKind::NotFound => FetchError::NotFound { path: path.to_owned() },
                _ => FetchError::Transport {
                    path: path.to_owned(),
                    source: err.into(),
                },
            })
        }
        .boxed()
    }
}
