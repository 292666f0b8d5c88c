use std::iter::successors;
use std::sync::Arc;

use glam::Mat4;
use log::{debug, trace, warn};

use crate::asset_graph::resolver::Resolution;
use crate::asset_graph::store::AssetStore;
use crate::common::layout::{FestivalFilter, LayerContainer, LayoutObject, ObjectKind};
use crate::common::types::{AssetPath, Terrain};
use crate::scene::graph::{AnimationBinding, NodeData, NodeId, SceneGraph, SceneNode};

/// The chain of containers from the outermost one down to the one being expanded. Expanding a
/// container that is already part of its own chain would never end.
struct Ancestry {
    path: AssetPath,
    parent: Option<Arc<Ancestry>>,
}

impl Ancestry {
    fn contains(&self, path: &str) -> bool {
        successors(Some(self), |ancestry| ancestry.parent.as_deref()).any(|ancestry| ancestry.path == path)
    }
}

struct PendingContainer {
    node: NodeId,
    container: Arc<LayerContainer>,
    ancestry: Arc<Ancestry>,
}

/// Turns resolved assets into a [`SceneGraph`]. Only ever looks up completed entries of the
/// [`AssetStore`], anything that has not been resolved is simply not drawn.
pub struct SceneGraphBuilder<'a> {
    store: &'a AssetStore,
    filter: FestivalFilter,
}

impl<'a> SceneGraphBuilder<'a> {
    pub fn new(store: &'a AssetStore, filter: FestivalFilter) -> Self {
        Self { store, filter }
    }

    /// The root groups the terrain and all present root containers.
    pub fn build_level(&self, level: &str, resolution: &Resolution) -> SceneGraph {
        let mut graph = SceneGraph::new(SceneNode::new(level, Mat4::IDENTITY, NodeData::Group));
        let root = graph.root();

        if let Some(terrain) = &resolution.terrain {
            self.build_terrain_node(&mut graph, root, terrain);
        }

        for (path, container) in &resolution.roots {
            if let Some(container) = container {
                self.build_container_node(&mut graph, root, path, container.clone());
            }
        }

        debug!("Built {} nodes for {}", graph.len(), level);
        graph
    }

    pub fn build_container(&self, path: &str, container: Arc<LayerContainer>) -> SceneGraph {
        let mut graph = SceneGraph::new(SceneNode::new(path, Mat4::IDENTITY, NodeData::Group));
        let root = graph.root();
        self.build_container_node(&mut graph, root, path, container);

        debug!("Built {} nodes for {}", graph.len(), path);
        graph
    }

    pub fn build_terrain_node(&self, graph: &mut SceneGraph, parent: NodeId, terrain: &Arc<Terrain>) -> NodeId {
        let terrain_node = graph.add_child(
            parent,
            SceneNode::new("Terrain", Mat4::IDENTITY, NodeData::Terrain(terrain.clone())),
        );

        for plate in &terrain.plates {
            let model = self.store.models().get(&plate.model_path);
            let renderable = model.as_ref().map(|_| plate.model_path.clone());
            let data = model.map(NodeData::Model).unwrap_or(NodeData::Group);

            graph.add_child(
                terrain_node,
                SceneNode::new(
                    format!("Plate {:04}", plate.index),
                    Mat4::from_translation(plate.world_offset),
                    data,
                )
                .with_renderable(renderable),
            );
        }

        terrain_node
    }

    /// Builds the container and everything it nests, using a worklist instead of recursion.
    pub fn build_container_node(
        &self,
        graph: &mut SceneGraph,
        parent: NodeId,
        path: &str,
        container: Arc<LayerContainer>,
    ) -> NodeId {
        let top = Self::add_container(graph, parent, path, container.clone());
        let mut pending = vec![PendingContainer {
            node: top,
            container,
            ancestry: Arc::new(Ancestry {
                path: path.to_string(),
                parent: None,
            }),
        }];

        while let Some(task) = pending.pop() {
            for obj in task.container.objects(self.filter) {
                let object_node = self.build_layout_object_node(graph, task.node, obj, &task.container);

                let Some(nested_path) = obj.reference_of(ObjectKind::NestedContainer) else {
                    continue;
                };

                if task.ancestry.contains(nested_path) {
                    warn!("{} (indirectly) contains itself, not expanding it again", nested_path);
                    continue;
                }

                let Some(nested) = self.store.containers().get(nested_path) else {
                    trace!("{} has not been resolved, leaving it empty", nested_path);
                    continue;
                };

                pending.push(PendingContainer {
                    node: Self::add_container(graph, object_node, nested_path, nested.clone()),
                    container: nested,
                    ancestry: Arc::new(Ancestry {
                        path: nested_path.to_string(),
                        parent: Some(task.ancestry.clone()),
                    }),
                });
            }
        }

        top
    }

    /// `model_matrix = T · R · S`. Nested containers are attached below this node by the caller,
    /// so that their contents are placed relative to it.
    pub fn build_layout_object_node(
        &self,
        graph: &mut SceneGraph,
        parent: NodeId,
        obj: &LayoutObject,
        container: &Arc<LayerContainer>,
    ) -> NodeId {
        let name = obj
            .asset_name
            .clone()
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| format!("{:?}", obj.kind));

        let renderable = obj
            .reference_of(ObjectKind::Model)
            .filter(|path| self.store.models().get(path).is_some())
            .map(str::to_string);

        let animation = container
            .animation_controller
            .as_ref()
            .zip(obj.instance_id())
            .map(|(controller, instance_id)| AnimationBinding {
                controller: controller.clone(),
                container: container.clone(),
                instance_id,
            });

        graph.add_child(
            parent,
            SceneNode::new(name, obj.local_transform(), NodeData::LayoutObject(obj.clone()))
                .with_renderable(renderable)
                .with_animation(animation),
        )
    }

    fn add_container(graph: &mut SceneGraph, parent: NodeId, path: &str, container: Arc<LayerContainer>) -> NodeId {
        graph.add_child(
            parent,
            SceneNode::new(
                path,
                Mat4::IDENTITY,
                NodeData::LayerContainer {
                    path: path.to_string(),
                    container,
                },
            ),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset_graph::resolver::DependencyResolver;
    use crate::io::memory::loader::MemoryLoader;
    use crate::loader::json_decoder::JsonDecoder;
    use glam::Vec3;
    use serde_json::{Value, json};

    async fn build(files: Vec<(&str, Value)>, filter: FestivalFilter) -> SceneGraph {
        let loader = Arc::new(MemoryLoader::new());
        for (path, value) in files {
            loader.insert(path, value.to_string());
        }
        let store = Arc::new(AssetStore::new(loader, Arc::new(JsonDecoder::new())));
        let resolution = DependencyResolver::new(store.clone(), filter)
            .resolve_container("root.lgb")
            .await
            .unwrap();

        let root = resolution.roots[0].1.clone().expect("root container");
        SceneGraphBuilder::new(&store, filter).build_container("root.lgb", root)
    }

    fn renderable_of<'g>(graph: &'g SceneGraph, name: &str) -> Option<&'g str> {
        let id = graph.find_by_name(name).expect("node exists");
        graph.node(id).renderable.as_deref()
    }

    #[tokio::test]
    async fn missing_models_have_no_renderable() {
        let graph = build(
            vec![
                ("root.lgb", json!({ "objects": [
                    { "asset_name": "here.mdl", "kind": "model" },
                    { "asset_name": "gone.mdl", "kind": "model" },
                ]})),
                ("here.mdl", json!({ "meshes": [], "materials": [] })),
            ],
            FestivalFilter::base(),
        )
        .await;

        assert_eq!(renderable_of(&graph, "here.mdl"), Some("here.mdl"));
        assert_eq!(renderable_of(&graph, "gone.mdl"), None);
        assert_eq!(graph.draw_list().len(), 1);
    }

    #[tokio::test]
    async fn nested_containers_are_placed_relative_to_their_object() {
        let graph = build(
            vec![
                ("root.lgb", json!({ "objects": [
                    { "asset_name": "house.sgb", "kind": "nested_container", "translation": [100.0, 0.0, 0.0] },
                ]})),
                ("house.sgb", json!({ "objects": [
                    { "asset_name": "door.mdl", "kind": "model", "translation": [0.0, 0.0, 2.0] },
                ]})),
                ("door.mdl", json!({ "meshes": [], "materials": [] })),
            ],
            FestivalFilter::base(),
        )
        .await;

        let draw_list = graph.draw_list();
        assert_eq!(draw_list.len(), 1);
        let (_, path, world) = draw_list[0];
        assert_eq!(path, "door.mdl");
        assert_eq!(world.w_axis.truncate(), Vec3::new(100.0, 0.0, 2.0));

        // object node -> container node -> door
        let object = graph.find_by_name("house.sgb").expect("object node");
        let container = graph.children(object)[0];
        assert!(matches!(graph.node(container).data, NodeData::LayerContainer { .. }));
        assert_eq!(graph.node(container).parent(), Some(object));
        assert_eq!(graph.node(container).model_matrix, Mat4::IDENTITY);
    }

    #[tokio::test]
    async fn self_nesting_containers_are_built_once() {
        let graph = build(
            vec![
                ("root.lgb", json!({ "objects": [{ "asset_name": "loop.sgb", "kind": "nested_container" }] })),
                ("loop.sgb", json!({ "objects": [{ "asset_name": "loop.sgb", "kind": "nested_container" }] })),
            ],
            FestivalFilter::base(),
        )
        .await;

        // root group, root.lgb, object, loop.sgb, object (not expanded)
        assert_eq!(graph.len(), 5);
    }

    #[tokio::test]
    async fn festival_objects_need_their_festival() {
        let files = || {
            vec![(
                "root.lgb",
                json!({ "layers": [
                    { "name": "Base", "objects": [{ "asset_name": "rock.mdl", "kind": "model" }] },
                    { "name": "Lanterns", "festival_id": 4, "objects": [{ "asset_name": "lantern.mdl", "kind": "model" }] },
                ]}),
            )]
        };

        let base = build(files(), FestivalFilter::base()).await;
        assert!(base.find_by_name("lantern.mdl").is_none());
        assert!(base.find_by_name("rock.mdl").is_some());

        let festive = build(files(), FestivalFilter::with_festival(4)).await;
        assert!(festive.find_by_name("lantern.mdl").is_some());
    }

    #[tokio::test]
    async fn only_objects_with_instance_ids_are_animated() {
        let graph = build(
            vec![(
                "root.lgb",
                json!({
                    "objects": [
                        { "asset_name": "fan.mdl", "kind": "model", "instance_id": 3 },
                        { "asset_name": "wall.mdl", "kind": "model" },
                    ],
                    "timelines": [{ "instance_id": 3, "duration": 10.0, "curves": [
                        { "attribute": "rotation_y", "keys": [{ "time": 0.0, "value": 0.0 }, { "time": 10.0, "value": 90.0 }] }
                    ]}]
                }),
            )],
            FestivalFilter::base(),
        )
        .await;

        let fan = graph.find_by_name("fan.mdl").expect("fan");
        let wall = graph.find_by_name("wall.mdl").expect("wall");
        assert_eq!(graph.node(fan).animation.as_ref().map(|binding| binding.instance_id), Some(3));
        assert!(graph.node(wall).animation.is_none());
    }
}
