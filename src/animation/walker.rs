use itertools::Itertools;
use log::trace;

use crate::scene::graph::SceneGraph;

/// Wall clock milliseconds per controller time unit.
pub const TIME_SCALE: f32 = 100.0;

#[derive(Default)]
pub struct AnimationWalker {}

impl AnimationWalker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-derives the local matrix of every animated node for the wall clock time `time_ms`. The matrices
    /// are overwritten in place, nodes without a binding (or whose controller declines) keep theirs.
    /// Returns the number of nodes that have been updated.
    pub fn update(&self, graph: &mut SceneGraph, time_ms: f32) -> usize {
        let time = time_ms / TIME_SCALE;
        let order = graph.walk().map(|(id, _)| id).collect_vec();

        let mut animated = 0;
        for id in order {
            let node = graph.node_mut(id);
            let Some(binding) = &node.animation else {
                continue;
            };

            if binding.controller.animate(
                &binding.container,
                binding.instance_id,
                time,
                &mut node.model_matrix,
            ) {
                animated += 1;
            }
        }

        trace!("Animated {} nodes at {}ms", animated, time_ms);
        animated
    }
}
