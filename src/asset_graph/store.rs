use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use itertools::Itertools;
use log::{debug, error, trace, warn};
use thiserror::Error;

use crate::common::layout::LayerContainer;
use crate::common::types::{AssetPath, Material, Model, Terrain, Texture};
use crate::io::common::loader::{ByteFetcher, FetchError};
use crate::loader::decoder::AssetDecoder;
use crate::scene::terrain;

/// Needs to be [`Clone`], as every waiter of a deduplicated load gets its own copy of the result.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssetError {
    #[error("{path} does not exist")]
    NotFound { path: AssetPath },

    #[error("Fetching {path} failed: {reason}")]
    Transport { path: AssetPath, reason: String },
}

/// `Ok(None)` is an absent asset: allowed to be missing, or found but unparsable.
pub type LoadResult<T> = Result<Option<Arc<T>>, AssetError>;

type InFlight<T> = Shared<BoxFuture<'static, LoadResult<T>>>;

/// One kind of asset, by path. An entry is either still loading or done, in both cases awaiting it
/// yields the one result for that path.
pub struct AssetCache<T> {
    entries: DashMap<AssetPath, InFlight<T>>,
}

impl<T: Send + Sync + 'static> AssetCache<T> {
    fn new() -> Self {
        Self {
            entries: DashMap::with_capacity(100),
        }
    }

    /// Returns the load for `path`, registering the one created by `start` if there is none yet.
    /// `start` must not poll anything: the entry is inserted before the returned future ever runs,
    /// which is what makes concurrent requests for the same path converge.
    fn get_or_start<F>(&self, path: &str, start: F) -> InFlight<T>
    where
        F: FnOnce() -> BoxFuture<'static, LoadResult<T>>,
    {
        // Easy path: someone else already started (or finished) it, no need to allocate the key.
        if let Some(in_flight) = self.entries.get(path) {
            return in_flight.clone();
        }

        // The entry API locks the shard, so we can't be raced between the check and the insert.
        match self.entries.entry(path.to_owned()) {
            Entry::Occupied(entry) => entry.get().clone(),
            Entry::Vacant(entry) => entry.insert(start().shared()).clone(),
        }
    }

    /// The parsed asset, if its load has completed successfully. Never waits, never fetches.
    pub fn get(&self, path: &str) -> Option<Arc<T>> {
        self.entries
            .get(path)
            .and_then(|in_flight| in_flight.peek().cloned())
            .and_then(|result| result.ok().flatten())
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    /// Every successfully loaded asset, sorted by path.
    pub fn completed(&self) -> Vec<(AssetPath, Arc<T>)> {
        self.entries
            .iter()
            .filter_map(|entry| {
                let asset = entry.value().peek()?.clone().ok()??;
                Some((entry.key().clone(), asset))
            })
            .sorted_by(|a, b| a.0.cmp(&b.0))
            .collect_vec()
    }

    /// Number of requested paths, including the ones that turned out missing.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The per scene cache of all parsed assets. See the [module documentation](crate::asset_graph).
pub struct AssetStore {
    fetcher: Arc<dyn ByteFetcher>,
    decoder: Arc<dyn AssetDecoder>,
    containers: AssetCache<LayerContainer>,
    models: AssetCache<Model>,
    materials: AssetCache<Material>,
    textures: AssetCache<Texture>,
    terrains: AssetCache<Terrain>,
}

impl AssetStore {
    pub fn new(fetcher: Arc<dyn ByteFetcher>, decoder: Arc<dyn AssetDecoder>) -> Self {
        Self {
            fetcher,
            decoder,
            containers: AssetCache::new(),
            models: AssetCache::new(),
            materials: AssetCache::new(),
            textures: AssetCache::new(),
            terrains: AssetCache::new(),
        }
    }

    /// Fetches and parses `path` at most once, no matter how many callers ask for it concurrently.
    ///
    /// A failing `parse` is logged and turns into an absent asset for this path only. A fetch that
    /// does not find the file is an absent asset if `allow_missing`, an error otherwise. Transport
    /// errors are always errors.
    pub async fn load<T, P>(&self, cache: &AssetCache<T>, path: &str, allow_missing: bool, parse: P) -> LoadResult<T>
    where
        T: Send + Sync + 'static,
        P: FnOnce(&[u8]) -> anyhow::Result<Option<T>> + Send + 'static,
    {
        let fetcher = self.fetcher.clone();
        let in_flight = cache.get_or_start(path, || {
            let path = path.to_owned();
            async move {
                let data = fetcher.fetch(&path).await.map_err(|err| match err {
                    FetchError::NotFound { path } => AssetError::NotFound { path },
                    FetchError::Transport { path, source } => AssetError::Transport {
                        path,
                        reason: format!("{:#}", source),
                    },
                })?;
                trace!("Fetched {} ({} bytes)", path, data.len());

                match parse(&data) {
                    Ok(Some(asset)) => Ok(Some(Arc::new(asset))),
                    Ok(None) => {
                        debug!("{} did not contain anything usable", path);
                        Ok(None)
                    }
                    Err(err) => {
                        error!("Parsing of {} failed: {:#}", path, err);
                        Ok(None)
                    }
                }
            }
            .boxed()
        });

        // The flag is applied per caller, the shared result only knows that the file was not there.
        match in_flight.await {
            Err(AssetError::NotFound { path }) if allow_missing => {
                warn!("Could not locate {}", path);
                Ok(None)
            }
            result => result,
        }
    }

    pub async fn load_container(&self, path: &str, allow_missing: bool) -> LoadResult<LayerContainer> {
        let decoder = self.decoder.clone();
        self.load(&self.containers, path, allow_missing, move |data| {
            decoder.parse_layer_container(data).map(Some)
        })
        .await
    }

    pub async fn load_model(&self, path: &str, allow_missing: bool) -> LoadResult<Model> {
        let decoder = self.decoder.clone();
        self.load(&self.models, path, allow_missing, move |data| {
            decoder.parse_model(data)
        })
        .await
    }

    pub async fn load_material(&self, path: &str, allow_missing: bool) -> LoadResult<Material> {
        let decoder = self.decoder.clone();
        self.load(&self.materials, path, allow_missing, move |data| {
            decoder.parse_material(data).map(Some)
        })
        .await
    }

    pub async fn load_texture(&self, path: &str, allow_missing: bool) -> LoadResult<Texture> {
        let decoder = self.decoder.clone();
        self.load(&self.textures, path, allow_missing, move |data| {
            decoder.parse_texture(data).map(Some)
        })
        .await
    }

    /// Loads `{level}/bgplate/terrain.tera` and maps its plates to models and world positions.
    pub async fn load_terrain(&self, level: &str, allow_missing: bool) -> LoadResult<Terrain> {
        let decoder = self.decoder.clone();
        let owned_level = level.to_owned();
        self.load(
            &self.terrains,
            &terrain::terrain_path(level),
            allow_missing,
            move |data| {
                let asset = decoder.parse_terrain(data)?;
                Ok(Some(terrain::assemble_terrain(&owned_level, &asset)))
            },
        )
        .await
    }

    pub fn containers(&self) -> &AssetCache<LayerContainer> {
        &self.containers
    }

    pub fn models(&self) -> &AssetCache<Model> {
        &self.models
    }

    pub fn materials(&self) -> &AssetCache<Material> {
        &self.materials
    }

    pub fn textures(&self) -> &AssetCache<Texture> {
        &self.textures
    }

    pub fn terrains(&self) -> &AssetCache<Terrain> {
        &self.terrains
    }
}
