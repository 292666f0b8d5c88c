use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Instant;

use futures::future::join_all;
use itertools::Itertools;
use log::{debug, info, trace, warn};

use crate::asset_graph::store::{AssetError, AssetStore, LoadResult};
use crate::common::layout::{FestivalFilter, LayerContainer};
use crate::common::types::{AssetPath, Terrain};

/// The containers every level has, relative to `{level}/level/`.
pub const ROOT_CONTAINERS: [&str; 2] = ["bg.lgb", "planmap.lgb"];

pub fn root_container_paths(level: &str) -> Vec<AssetPath> {
    ROOT_CONTAINERS
        .iter()
        .map(|name| format!("{}/level/{}", level, name))
        .collect_vec()
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ResolveStats {
    /// Nested container passes until the fixed point has been reached.
    pub passes: usize,
    pub containers: usize,
    pub models: usize,
    pub materials: usize,
    pub textures: usize,
    /// Referenced assets that are missing or could not be parsed.
    pub missing: usize,
}

/// Everything discovered while resolving, the parsed assets themselves live in the [`AssetStore`].
#[derive(Debug)]
pub struct Resolution {
    pub terrain: Option<Arc<Terrain>>,
    /// In the order of the root paths, `None` if a root is absent.
    pub roots: Vec<(AssetPath, Option<Arc<LayerContainer>>)>,
    /// Every nested container path that has been attempted, whether it was present or not.
    pub loaded_nested: BTreeSet<AssetPath>,
    pub models: BTreeSet<AssetPath>,
    pub materials: BTreeSet<AssetPath>,
    pub textures: BTreeSet<AssetPath>,
    pub stats: ResolveStats,
}

/// Discovers and loads the full transitive closure of a level (or a single container).
/// See the [module documentation](crate::asset_graph) for the big picture.
pub struct DependencyResolver {
    store: Arc<AssetStore>,
    filter: FestivalFilter,
}

impl DependencyResolver {
    pub fn new(store: Arc<AssetStore>, filter: FestivalFilter) -> Self {
        Self { store, filter }
    }

    pub async fn resolve_level(&self, level: &str) -> Result<Resolution, AssetError> {
        let now = Instant::now();
        let root_paths = root_container_paths(level);

        // Not every level has terrain, and planmaps are sometimes missing too.
        let (terrain, roots) = futures::join!(
            self.store.load_terrain(level, true),
            join_all(root_paths.iter().map(|path| self.store.load_container(path, true)))
        );
        let terrain = terrain?;
        let roots: Vec<_> = root_paths
            .into_iter()
            .zip(roots)
            .map(|(path, root)| root.map(|root| (path, root)))
            .collect::<Result<_, _>>()?;

        if terrain.is_none() && roots.iter().all(|(_, root)| root.is_none()) {
            return Err(AssetError::NotFound {
                path: level.to_string(),
            });
        }

        let resolution = self.resolve_from(terrain, roots).await?;
        info!(
            "Resolving {} took {}ms: {:?}",
            level,
            now.elapsed().as_millis(),
            resolution.stats
        );
        Ok(resolution)
    }

    /// Like [`Self::resolve_level`], but the only root is `path`, which has to exist.
    pub async fn resolve_container(&self, path: &str) -> Result<Resolution, AssetError> {
        let now = Instant::now();
        let root = self.store.load_container(path, false).await?;
        let resolution = self.resolve_from(None, vec![(path.to_string(), root)]).await?;
        info!(
            "Resolving {} took {}ms: {:?}",
            path,
            now.elapsed().as_millis(),
            resolution.stats
        );
        Ok(resolution)
    }

    async fn resolve_from(
        &self,
        terrain: Option<Arc<Terrain>>,
        roots: Vec<(AssetPath, Option<Arc<LayerContainer>>)>,
    ) -> Result<Resolution, AssetError> {
        let mut stats = ResolveStats::default();
        let mut nested = BTreeSet::new();
        let mut loaded_nested = BTreeSet::new();
        let mut models = BTreeSet::new();
        let mut textures = BTreeSet::new();

        if let Some(terrain) = &terrain {
            models.extend(terrain.model_paths().map(str::to_string));
        }

        let root_paths: BTreeSet<&str> = roots.iter().map(|(path, _)| path.as_str()).collect();
        for (path, root) in &roots {
            match root {
                Some(container) => {
                    stats.containers += 1;
                    self.collect_references(container, &mut nested, &mut models, &mut textures);
                }
                None => {
                    warn!("Root container {} is absent", path);
                    stats.missing += 1;
                }
            }
        }

        // Nested containers can only be discovered by loading their parents, so go pass by pass.
        loop {
            // A root nested by one of its own descendants is already in the store, it only needs to be
            // recorded.
            let (reentered, pending): (Vec<_>, Vec<_>) = nested
                .iter()
                .filter(|path| !loaded_nested.contains(*path))
                .cloned()
                .partition(|path| root_paths.contains(path.as_str()));
            loaded_nested.extend(reentered);

            if pending.is_empty() {
                break;
            }

            stats.passes += 1;
            debug!("Pass {}: loading {} nested containers", stats.passes, pending.len());

            // join_all and not try_join_all: a failing sibling must not cancel the others.
            let results = join_all(pending.iter().map(|path| self.store.load_container(path, true))).await;
            loaded_nested.extend(pending);

            for result in results {
                match result? {
                    Some(container) => {
                        stats.containers += 1;
                        self.collect_references(&container, &mut nested, &mut models, &mut textures);
                    }
                    None => stats.missing += 1,
                }
            }
        }

        let mut materials = BTreeSet::new();
        for model in self.load_all(&models, |path| self.store.load_model(path, true), &mut stats.missing).await? {
            materials.extend(model.referenced_materials().map(str::to_string));
        }
        stats.models = self.store.models().completed().len();

        for material in self.load_all(&materials, |path| self.store.load_material(path, true), &mut stats.missing).await? {
            textures.extend(material.texture_names.iter().cloned());
        }
        stats.materials = self.store.materials().completed().len();

        self.load_all(&textures, |path| self.store.load_texture(path, true), &mut stats.missing)
            .await?;
        stats.textures = self.store.textures().completed().len();

        Ok(Resolution {
            terrain,
            roots,
            loaded_nested,
            models,
            materials,
            textures,
            stats,
        })
    }

    fn collect_references(
        &self,
        container: &LayerContainer,
        nested: &mut BTreeSet<AssetPath>,
        models: &mut BTreeSet<AssetPath>,
        textures: &mut BTreeSet<AssetPath>,
    ) {
        nested.extend(container.nested_containers(self.filter).map(str::to_string));
        models.extend(container.models(self.filter).map(str::to_string));
        textures.extend(container.textures(self.filter).map(str::to_string));
    }

    /// Loads all `paths` concurrently (missing is allowed) and returns the present ones.
    async fn load_all<'a, T, F, Fut>(
        &self,
        paths: &'a BTreeSet<AssetPath>,
        load: F,
        missing: &mut usize,
    ) -> Result<Vec<Arc<T>>, AssetError>
    where
        F: Fn(&'a str) -> Fut,
        Fut: Future<Output = LoadResult<T>>,
    {
        trace!("Loading {} assets", paths.len());
        let results = join_all(paths.iter().map(|path| load(path))).await;

        let mut present = Vec::with_capacity(results.len());
        for result in results {
            match result? {
                Some(asset) => present.push(asset),
                None => *missing += 1,
            }
        }
        Ok(present)
    }
}
