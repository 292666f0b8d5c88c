use std::fmt::Debug;

use glam::Mat4;

use crate::common::layout::LayerContainer;

pub trait AnimationController: Debug + Send + Sync {
    /// Writes the local transform of the object `instance_id` of `container` at `time` (in controller
    /// time units) into `model_matrix`. Returns `false` and leaves the matrix untouched, if the
    /// controller has nothing to say about that instance.
    fn animate(&self, container: &LayerContainer, instance_id: u32, time: f32, model_matrix: &mut Mat4) -> bool;
}
