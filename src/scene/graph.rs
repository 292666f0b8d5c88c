use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use glam::Mat4;

use crate::animation::controller::AnimationController;
use crate::common::layout::{LayerContainer, LayoutObject};
use crate::common::types::{AssetPath, Model, Terrain};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// What a node has been built from.
#[derive(Debug, Clone)]
pub enum NodeData {
    /// Pure grouping, e.g. the level root.
    Group,
    Terrain(Arc<Terrain>),
    /// A terrain plate whose model has been resolved.
    Model(Arc<Model>),
    LayerContainer {
        path: AssetPath,
        container: Arc<LayerContainer>,
    },
    LayoutObject(LayoutObject),
}

/// Ties a node to the controller of the container it has been placed by.
#[derive(Debug, Clone)]
pub struct AnimationBinding {
    pub controller: Arc<dyn AnimationController>,
    pub container: Arc<LayerContainer>,
    pub instance_id: u32,
}

pub struct SceneNode {
    pub name: String,
    /// Local transform, relative to the parent. Composition happens when traversing.
    pub model_matrix: Mat4,
    /// The model to draw at this node, only set when the model actually resolved.
    pub renderable: Option<AssetPath>,
    pub animation: Option<AnimationBinding>,
    pub data: NodeData,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl SceneNode {
    pub fn new(name: impl Into<String>, model_matrix: Mat4, data: NodeData) -> Self {
        Self {
            name: name.into(),
            model_matrix,
            renderable: None,
            animation: None,
            data,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn with_renderable(mut self, renderable: Option<AssetPath>) -> Self {
        self.renderable = renderable;
        self
    }

    pub fn with_animation(mut self, animation: Option<AnimationBinding>) -> Self {
        self.animation = animation;
        self
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn instance_id(&self) -> Option<u32> {
        match &self.data {
            NodeData::LayoutObject(obj) => obj.instance_id(),
            _ => None,
        }
    }
}

impl Debug for SceneNode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneNode")
            .field("name", &self.name)
            .field("renderable", &self.renderable)
            .field("animated", &self.animation.is_some())
            .field("children", &self.children.len())
            .finish()
    }
}

/// The scene tree, stored as an arena. Nodes are only ever appended (children after their parents) and
/// never removed, a fresh graph is built for every load.
#[derive(Debug)]
pub struct SceneGraph {
    nodes: Vec<SceneNode>,
}

impl SceneGraph {
    pub fn new(root: SceneNode) -> Self {
        Self { nodes: vec![root] }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn add_child(&mut self, parent: NodeId, mut node: SceneNode) -> NodeId {
        let id = NodeId(self.nodes.len());
        node.parent = Some(parent);
        self.nodes.push(node);
        self.nodes[parent.0].children.push(id);
        id
    }

    pub fn node(&self, id: NodeId) -> &SceneNode {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut SceneNode {
        &mut self.nodes[id.0]
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Depth first, pre-order traversal of the whole graph, yielding the node and its depth.
    pub fn walk(&self) -> DepthFirst<'_> {
        self.walk_from(self.root())
    }

    pub fn walk_from(&self, start: NodeId) -> DepthFirst<'_> {
        DepthFirst {
            graph: self,
            stack: vec![(start, 0)],
        }
    }

    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        self.walk()
            .map(|(id, _)| id)
            .find(|&id| self.node(id).name == name)
    }

    /// `World = Parent · Local` for every node, indexed by [`NodeId::index`].
    pub fn world_matrices(&self) -> Vec<Mat4> {
        let mut world = vec![Mat4::IDENTITY; self.nodes.len()];
        for (id, _) in self.walk() {
            let node = self.node(id);
            world[id.0] = match node.parent {
                Some(parent) => world[parent.0] * node.model_matrix,
                None => node.model_matrix,
            };
        }
        world
    }

    /// All nodes that have something to draw, together with their world matrix.
    pub fn draw_list(&self) -> Vec<(NodeId, &str, Mat4)> {
        let world = self.world_matrices();
        self.walk()
            .filter_map(|(id, _)| {
                self.node(id)
                    .renderable
                    .as_deref()
                    .map(|path| (id, path, world[id.0]))
            })
            .collect()
    }
}

/// Explicit stack traversal, so that deeply nested containers can't overflow the call stack.
pub struct DepthFirst<'a> {
    graph: &'a SceneGraph,
    stack: Vec<(NodeId, usize)>,
}

impl Iterator for DepthFirst<'_> {
    type Item = (NodeId, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let (id, depth) = self.stack.pop()?;
        let children = self.graph.children(id);
        self.stack
            .extend(children.iter().rev().map(|&child| (child, depth + 1)));
        Some((id, depth))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use itertools::Itertools;

    fn group(name: &str, translation: Vec3) -> SceneNode {
        SceneNode::new(name, Mat4::from_translation(translation), NodeData::Group)
    }

    #[test]
    fn walk_is_pre_order() {
        let mut graph = SceneGraph::new(group("root", Vec3::ZERO));
        let a = graph.add_child(graph.root(), group("a", Vec3::ZERO));
        let b = graph.add_child(graph.root(), group("b", Vec3::ZERO));
        graph.add_child(a, group("a1", Vec3::ZERO));
        graph.add_child(b, group("b1", Vec3::ZERO));
        graph.add_child(a, group("a2", Vec3::ZERO));

        let order = graph
            .walk()
            .map(|(id, depth)| (graph.node(id).name.as_str(), depth))
            .collect_vec();
        assert_eq!(
            order,
            vec![("root", 0), ("a", 1), ("a1", 2), ("a2", 2), ("b", 1), ("b1", 2)]
        );
    }

    #[test]
    fn world_is_parent_times_local() {
        let mut graph = SceneGraph::new(group("root", Vec3::new(1.0, 0.0, 0.0)));
        let mut rotated = group("rotated", Vec3::ZERO);
        rotated.model_matrix = Mat4::from_rotation_z(std::f32::consts::FRAC_PI_2);
        let rotated = graph.add_child(graph.root(), rotated);
        let leaf = graph.add_child(rotated, group("leaf", Vec3::new(2.0, 0.0, 0.0)));

        let world = graph.world_matrices();
        let origin = world[leaf.index()].transform_point3(Vec3::ZERO);
        // the leaf offset is rotated onto +y by its parent, then moved by the root.
        assert!(origin.abs_diff_eq(Vec3::new(1.0, 2.0, 0.0), 1e-5));
    }

    #[test]
    fn deep_graphs_do_not_overflow() {
        let mut graph = SceneGraph::new(group("root", Vec3::ZERO));
        let mut parent = graph.root();
        for i in 0..100_000 {
            parent = graph.add_child(parent, group(&format!("n{}", i), Vec3::X));
        }

        assert_eq!(graph.walk().count(), 100_001);
        let world = graph.world_matrices();
        assert_eq!(world[parent.index()].w_axis.x, 100_000.0);
    }

    #[test]
    fn draw_list_only_contains_renderables() {
        let mut graph = SceneGraph::new(group("root", Vec3::ZERO));
        graph.add_child(
            graph.root(),
            group("drawn", Vec3::Y).with_renderable(Some("a.mdl".to_string())),
        );
        graph.add_child(graph.root(), group("missing", Vec3::Y));

        let draw_list = graph.draw_list();
        assert_eq!(draw_list.len(), 1);
        assert_eq!(draw_list[0].1, "a.mdl");
        assert_eq!(draw_list[0].2.w_axis.truncate(), Vec3::Y);
    }
}
