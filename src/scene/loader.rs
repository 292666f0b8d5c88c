use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use std::time::Instant;

use glam::Mat4;
use log::{info, warn};

use crate::asset_graph::resolver::{DependencyResolver, Resolution, ResolveStats};
use crate::asset_graph::store::{AssetError, AssetStore};
use crate::common::layout::FestivalFilter;
use crate::common::types::{AssetPath, Model};
use crate::io::common::loader::ByteFetcher;
use crate::loader::decoder::AssetDecoder;
use crate::scene::builder::SceneGraphBuilder;
use crate::scene::debug::DebugPalette;
use crate::scene::graph::{NodeData, SceneGraph, SceneNode};

const DEBUG_PALETTE_SEED: u64 = 0x1e7e1;

/// Everything a host needs to draw a loaded scene.
pub struct SceneBundle {
    pub graph: SceneGraph,
    /// Every model that is referenced by a node of the graph.
    pub renderables: HashMap<AssetPath, Arc<Model>>,
    pub palette: DebugPalette,
    /// Festivals that have layers somewhere in the loaded containers, whether they are active or not.
    pub festivals: BTreeSet<u16>,
    pub stats: ResolveStats,
    /// Keeps the parsed assets (e.g. materials and textures) alive for as long as the scene is shown.
    pub store: Arc<AssetStore>,
}

pub struct SceneLoader {
    fetcher: Arc<dyn ByteFetcher>,
    decoder: Arc<dyn AssetDecoder>,
}

impl SceneLoader {
    pub fn new(fetcher: Arc<dyn ByteFetcher>, decoder: Arc<dyn AssetDecoder>) -> Self {
        Self { fetcher, decoder }
    }

    /// Loads a level: its terrain, root layer files and everything they reference.
    pub async fn load_level(&self, level: &str, filter: FestivalFilter) -> Result<SceneBundle, AssetError> {
        let now = Instant::now();
        let store = self.fresh_store();
        let resolution = DependencyResolver::new(store.clone(), filter)
            .resolve_level(level)
            .await?;

        let graph = SceneGraphBuilder::new(&store, filter).build_level(level, &resolution);
        let bundle = Self::bundle(store, graph, resolution);
        info!("Loading {} took {}ms", level, now.elapsed().as_millis());
        Ok(bundle)
    }

    /// Loads a single layer file (e.g. a shared group) on its own.
    pub async fn load_container(&self, path: &str, filter: FestivalFilter) -> Result<SceneBundle, AssetError> {
        let now = Instant::now();
        let store = self.fresh_store();
        let resolution = DependencyResolver::new(store.clone(), filter)
            .resolve_container(path)
            .await?;

        let graph = match resolution.roots.first().and_then(|(_, root)| root.clone()) {
            Some(root) => SceneGraphBuilder::new(&store, filter).build_container(path, root),
            None => {
                warn!("{} did not contain anything usable", path);
                SceneGraph::new(SceneNode::new(path, Mat4::IDENTITY, NodeData::Group))
            }
        };

        let bundle = Self::bundle(store, graph, resolution);
        info!("Loading {} took {}ms", path, now.elapsed().as_millis());
        Ok(bundle)
    }

    /// Scenes never share their store, so nothing of a previous scene stays alive.
    fn fresh_store(&self) -> Arc<AssetStore> {
        Arc::new(AssetStore::new(self.fetcher.clone(), self.decoder.clone()))
    }

    fn bundle(store: Arc<AssetStore>, graph: SceneGraph, resolution: Resolution) -> SceneBundle {
        let renderables = graph
            .walk()
            .filter_map(|(id, _)| graph.node(id).renderable.clone())
            .filter_map(|path| store.models().get(&path).map(|model| (path, model)))
            .collect();

        let festivals = store
            .containers()
            .completed()
            .iter()
            .flat_map(|(_, container)| container.festivals())
            .collect();

        SceneBundle {
            palette: DebugPalette::from_store(&store, DEBUG_PALETTE_SEED),
            graph,
            renderables,
            festivals,
            stats: resolution.stats,
            store,
        }
    }
}
