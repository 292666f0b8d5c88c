use std::collections::HashMap;

use glam::Mat4;

use crate::animation::controller::AnimationController;
use crate::common::layout::LayerContainer;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CurveAttribute {
    /// Rotations are keyed in degrees.
    RotationX,
    RotationY,
    RotationZ,
    /// Positions, scales, colors, ... are parsed but not applied.
    Unsupported,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CurveKey {
    pub time: f32,
    pub value: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Curve {
    pub attribute: CurveAttribute,
    /// Sorted by time.
    pub keys: Vec<CurveKey>,
}

impl Curve {
    pub fn new(attribute: CurveAttribute, mut keys: Vec<CurveKey>) -> Self {
        keys.sort_by(|a, b| a.time.total_cmp(&b.time));
        Self { attribute, keys }
    }

    /// Linear interpolation between the surrounding keys, clamped to the first and last key.
    /// Curves with less than two keys don't animate anything.
    pub fn sample(&self, time: f32) -> Option<f32> {
        if self.keys.len() < 2 {
            return None;
        }

        let end_index = self
            .keys
            .iter()
            .position(|key| key.time >= time)
            .unwrap_or(self.keys.len() - 1);
        let start_index = end_index.saturating_sub(1);
        let (start, end) = (self.keys[start_index], self.keys[end_index]);

        if time <= start.time || end.time <= start.time {
            return Some(start.value);
        }
        if time >= end.time {
            return Some(end.value);
        }

        let alpha = (time - start.time) / (end.time - start.time);
        Some(start.value + (end.value - start.value) * alpha)
    }

    pub fn transform_at(&self, time: f32) -> Mat4 {
        let Some(value) = self.sample(time) else {
            return Mat4::IDENTITY;
        };

        match self.attribute {
            CurveAttribute::RotationX => Mat4::from_rotation_x(value.to_radians()),
            CurveAttribute::RotationY => Mat4::from_rotation_y(value.to_radians()),
            CurveAttribute::RotationZ => Mat4::from_rotation_z(value.to_radians()),
            CurveAttribute::Unsupported => Mat4::IDENTITY,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModelAnimation {
    /// Loop duration, in controller time units. Non-positive durations don't loop. Negative times wrap
    /// into `[0, duration)` as well.
    pub duration: f32,
    pub curves: Vec<Curve>,
}

impl ModelAnimation {
    fn looped_time(&self, time: f32) -> f32 {
        if self.duration > 0.0 {
            time.rem_euclid(self.duration)
        } else {
            time
        }
    }
}

/// Keyframed model animations per instance id, as stored in the timelines of shared groups.
#[derive(Debug, Default)]
pub struct TimelineController {
    animations: HashMap<u32, Vec<ModelAnimation>>,
}

impl TimelineController {
    /// `None` when there is nothing to animate, so that containers without timelines don't carry a
    /// controller around.
    pub fn new(animations: HashMap<u32, Vec<ModelAnimation>>) -> Option<Self> {
        let animations: HashMap<_, _> = animations
            .into_iter()
            .filter(|(_, list)| !list.is_empty())
            .collect();

        if animations.is_empty() {
            None
        } else {
            Some(Self { animations })
        }
    }
}

impl AnimationController for TimelineController {
    fn animate(&self, container: &LayerContainer, instance_id: u32, time: f32, model_matrix: &mut Mat4) -> bool {
        let Some(animations) = self.animations.get(&instance_id) else {
            return false;
        };
        let Some(object) = container.find_object(instance_id) else {
            return false;
        };

        // Every curve is applied on top of the previous ones, the placement of the object comes last.
        let mut animated = Mat4::IDENTITY;
        for animation in animations {
            let time = animation.looped_time(time);
            for curve in &animation.curves {
                animated = curve.transform_at(time) * animated;
            }
        }

        *model_matrix = object.local_transform() * animated;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::layout::{Layer, LayoutObject, ObjectKind};
    use glam::Vec3;

    fn keys(pairs: &[(f32, f32)]) -> Vec<CurveKey> {
        pairs
            .iter()
            .map(|&(time, value)| CurveKey { time, value })
            .collect()
    }

    #[test]
    fn sampling_interpolates_and_clamps() {
        let curve = Curve::new(CurveAttribute::RotationY, keys(&[(10.0, 90.0), (0.0, 0.0)]));
        assert_eq!(curve.sample(-1.0), Some(0.0));
        assert_eq!(curve.sample(0.0), Some(0.0));
        assert_eq!(curve.sample(5.0), Some(45.0));
        assert_eq!(curve.sample(10.0), Some(90.0));
        assert_eq!(curve.sample(20.0), Some(90.0));
    }

    #[test]
    fn single_key_curves_are_static() {
        let curve = Curve::new(CurveAttribute::RotationX, keys(&[(0.0, 45.0)]));
        assert_eq!(curve.sample(3.0), None);
        assert_eq!(curve.transform_at(3.0), Mat4::IDENTITY);
    }

    fn container_with_object(instance_id: u32) -> LayerContainer {
        LayerContainer::new(vec![Layer {
            name: "doors".to_string(),
            festival_id: 0,
            festival_phase_id: 0,
            objects: vec![LayoutObject {
                asset_name: Some("door.mdl".to_string()),
                kind: ObjectKind::Model,
                instance_id,
                translation: Vec3::new(0.0, 0.0, 5.0),
                rotation: Vec3::ZERO,
                scale: Vec3::ONE,
            }],
        }])
    }

    #[test]
    fn animation_is_placed_at_the_object() {
        let controller = TimelineController::new(HashMap::from([(
            7,
            vec![ModelAnimation {
                duration: 20.0,
                curves: vec![Curve::new(
                    CurveAttribute::RotationY,
                    keys(&[(0.0, 0.0), (10.0, 90.0)]),
                )],
            }],
        )]))
        .expect("one animation");
        let container = container_with_object(7);

        let mut matrix = Mat4::IDENTITY;
        // 30 loops back to 10, which is a quarter turn around y.
        assert!(controller.animate(&container, 7, 30.0, &mut matrix));
        let point = matrix.transform_point3(Vec3::X);
        assert!(point.abs_diff_eq(Vec3::new(0.0, 0.0, 4.0), 1e-5));
    }

    #[test]
    fn negative_times_loop_into_the_animation() {
        let controller = TimelineController::new(HashMap::from([(
            7,
            vec![ModelAnimation {
                duration: 20.0,
                curves: vec![Curve::new(
                    CurveAttribute::RotationY,
                    keys(&[(0.0, 0.0), (10.0, 90.0)]),
                )],
            }],
        )]))
        .expect("one animation");
        let container = container_with_object(7);

        // -15 wraps to 5, an eighth turn, and not to the clamped start of the curve.
        let mut matrix = Mat4::IDENTITY;
        assert!(controller.animate(&container, 7, -15.0, &mut matrix));
        let half = std::f32::consts::FRAC_1_SQRT_2;
        let point = matrix.transform_point3(Vec3::X);
        assert!(point.abs_diff_eq(Vec3::new(half, 0.0, 5.0 - half), 1e-5));
    }

    #[test]
    fn unknown_instances_are_left_alone() {
        let controller = TimelineController::new(HashMap::from([(
            7,
            vec![ModelAnimation {
                duration: 0.0,
                curves: vec![],
            }],
        )]))
        .expect("one animation");
        let container = container_with_object(7);

        let mut matrix = Mat4::from_translation(Vec3::ONE);
        assert!(!controller.animate(&container, 8, 1.0, &mut matrix));
        assert_eq!(matrix, Mat4::from_translation(Vec3::ONE));
    }

    #[test]
    fn empty_timelines_yield_no_controller() {
        assert!(TimelineController::new(HashMap::new()).is_none());
        assert!(TimelineController::new(HashMap::from([(1, vec![])])).is_none());
    }
}
