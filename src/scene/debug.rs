use std::collections::HashMap;

use glam::Vec4;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::asset_graph::store::AssetStore;
use crate::common::types::AssetPath;
use crate::scene::graph::{NodeData, SceneGraph};

/// One line per node in pre-order, indented by depth. Container nodes only wrap the objects of a
/// layer file and are left out, their children keep the depth they'd have with them.
pub fn describe(graph: &SceneGraph) -> Vec<String> {
    graph
        .walk()
        .filter(|(id, _)| !matches!(graph.node(*id).data, NodeData::LayerContainer { .. }))
        .map(|(id, depth)| {
            let node = graph.node(id);
            let name = if node.name.is_empty() {
                "Unknown node"
            } else {
                node.name.as_str()
            };

            match node.instance_id() {
                Some(instance_id) => format!("{}{}: {}", "  ".repeat(depth), instance_id, name),
                None => format!("{}{}", "  ".repeat(depth), name),
            }
        })
        .collect()
}

/// Flat shading colors per material, for drawing without real materials. Materials whose first
/// texture is missing are drawn mostly opaque, so that they stand out.
#[derive(Debug, Clone, Default)]
pub struct DebugPalette {
    colors: HashMap<AssetPath, Vec4>,
}

impl DebugPalette {
    pub const MISSING_TEXTURE_ALPHA: f32 = 0.9;

    /// The same seed and store contents always yield the same colors.
    pub fn from_store(store: &AssetStore, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let colors = store
            .materials()
            .completed()
            .into_iter()
            .map(|(path, material)| {
                let texture_missing = material
                    .texture_names
                    .first()
                    .is_none_or(|texture| store.textures().get(texture).is_none());
                let alpha = if texture_missing {
                    Self::MISSING_TEXTURE_ALPHA
                } else {
                    0.0
                };

                let color = Vec4::new(rng.random::<f32>(), rng.random::<f32>(), rng.random::<f32>(), alpha);
                (path, color)
            })
            .collect();

        Self { colors }
    }

    pub fn color(&self, material: &str) -> Option<Vec4> {
        self.colors.get(material).copied()
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}
