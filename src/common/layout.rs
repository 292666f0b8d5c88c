use std::collections::BTreeSet;
use std::sync::Arc;

use glam::{EulerRot, Mat4, Quat, Vec3};

use crate::animation::controller::AnimationController;
use crate::common::types::AssetPath;

/// What a placed object refers to. The raw values are the asset types used in layer files.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    /// A background model (`.mdl`).
    Model,
    /// Another layer container (shared group), that is placed like a prefab.
    NestedContainer,
    /// A texture that is referenced directly, e.g. the environment map of an env location.
    Texture,
    /// Everything else (lights, sounds, event ranges, ...). Those are kept for their transform only.
    Other(i32),
}

impl ObjectKind {
    pub const RAW_MODEL: i32 = 0x01;
    pub const RAW_NESTED_CONTAINER: i32 = 0x06;
    pub const RAW_TEXTURE: i32 = 0x2f;

    pub fn from_raw(raw: i32) -> Self {
        match raw {
            Self::RAW_MODEL => ObjectKind::Model,
            Self::RAW_NESTED_CONTAINER => ObjectKind::NestedContainer,
            Self::RAW_TEXTURE => ObjectKind::Texture,
            other => ObjectKind::Other(other),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutObject {
    pub asset_name: Option<AssetPath>,
    pub kind: ObjectKind,
    /// Zero means "no instance id", such objects cannot be animated.
    pub instance_id: u32,
    pub translation: Vec3,
    /// Euler angles in radians, applied in XYZ order.
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl LayoutObject {
    /// `T · R · S`: scale in local space first, then rotate, then translate.
    pub fn local_transform(&self) -> Mat4 {
        let rotation = Quat::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, self.rotation.z);
        Mat4::from_scale_rotation_translation(self.scale, rotation, self.translation)
    }

    pub fn instance_id(&self) -> Option<u32> {
        (self.instance_id != 0).then_some(self.instance_id)
    }

    /// The referenced asset, if the object refers to an asset of the given kind.
    pub fn reference_of(&self, kind: ObjectKind) -> Option<&str> {
        if self.kind == kind {
            self.asset_name.as_deref().filter(|name| !name.is_empty())
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub name: String,
    /// 0: always active, anything else: only active while that festival is selected.
    pub festival_id: u16,
    pub festival_phase_id: u16,
    pub objects: Vec<LayoutObject>,
}

/// Selects the active layers. The base layers (festival 0) are always active, a festival layer only
/// when its festival has been selected explicitly.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct FestivalFilter {
    pub selected: Option<u16>,
}

impl FestivalFilter {
    pub fn base() -> Self {
        Self::default()
    }

    pub fn with_festival(festival_id: u16) -> Self {
        Self {
            selected: Some(festival_id).filter(|&id| id != 0),
        }
    }

    pub fn is_active(&self, festival_id: u16) -> bool {
        festival_id == 0 || self.selected == Some(festival_id)
    }
}

/// A parsed layer file (level layer group or shared group).
#[derive(Debug, Default)]
pub struct LayerContainer {
    pub layers: Vec<Layer>,
    pub animation_controller: Option<Arc<dyn AnimationController>>,
}

impl LayerContainer {
    pub fn new(layers: Vec<Layer>) -> Self {
        Self {
            layers,
            animation_controller: None,
        }
    }

    pub fn active_layers(&self, filter: FestivalFilter) -> impl Iterator<Item = &Layer> {
        self.layers
            .iter()
            .filter(move |layer| filter.is_active(layer.festival_id))
    }

    pub fn objects(&self, filter: FestivalFilter) -> impl Iterator<Item = &LayoutObject> {
        self.active_layers(filter)
            .flat_map(|layer| layer.objects.iter())
    }

    pub fn references(&self, filter: FestivalFilter, kind: ObjectKind) -> impl Iterator<Item = &str> {
        self.objects(filter)
            .filter_map(move |obj| obj.reference_of(kind))
    }

    pub fn nested_containers(&self, filter: FestivalFilter) -> impl Iterator<Item = &str> {
        self.references(filter, ObjectKind::NestedContainer)
    }

    pub fn models(&self, filter: FestivalFilter) -> impl Iterator<Item = &str> {
        self.references(filter, ObjectKind::Model)
    }

    pub fn textures(&self, filter: FestivalFilter) -> impl Iterator<Item = &str> {
        self.references(filter, ObjectKind::Texture)
    }

    /// Looks up an object by instance id, regardless of its layer's festival.
    pub fn find_object(&self, instance_id: u32) -> Option<&LayoutObject> {
        self.layers
            .iter()
            .flat_map(|layer| layer.objects.iter())
            .find(|obj| obj.instance_id == instance_id)
    }

    /// All festivals that have layers in this container.
    pub fn festivals(&self) -> BTreeSet<u16> {
        self.layers
            .iter()
            .map(|layer| layer.festival_id)
            .filter(|&id| id != 0)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;

    fn object(kind: ObjectKind, name: &str) -> LayoutObject {
        LayoutObject {
            asset_name: Some(name.to_string()),
            kind,
            instance_id: 0,
            translation: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }

    fn layer(festival_id: u16, objects: Vec<LayoutObject>) -> Layer {
        Layer {
            name: format!("layer {}", festival_id),
            festival_id,
            festival_phase_id: 0,
            objects,
        }
    }

    #[test]
    fn translation_only_transform() {
        let mut obj = object(ObjectKind::Model, "a.mdl");
        obj.translation = Vec3::new(10.0, 0.0, 5.0);
        let matrix = obj.local_transform();

        assert_eq!(matrix.w_axis.truncate(), Vec3::new(10.0, 0.0, 5.0));
        assert!(matrix.x_axis.truncate().abs_diff_eq(Vec3::X, 1e-6));
        assert!(matrix.y_axis.truncate().abs_diff_eq(Vec3::Y, 1e-6));
        assert!(matrix.z_axis.truncate().abs_diff_eq(Vec3::Z, 1e-6));
    }

    #[test]
    fn scale_is_applied_before_rotation_and_translation() {
        let mut obj = object(ObjectKind::Model, "a.mdl");
        obj.scale = Vec3::new(2.0, 1.0, 1.0);
        obj.rotation = Vec3::new(0.0, 0.0, std::f32::consts::FRAC_PI_2);
        obj.translation = Vec3::new(0.0, 0.0, 3.0);

        // x is doubled, then rotated onto y, then moved up along z.
        let point = obj.local_transform().transform_point3(Vec3::X);
        assert!(point.abs_diff_eq(Vec3::new(0.0, 2.0, 3.0), 1e-5));
    }

    #[test]
    fn festival_layers_are_only_active_when_selected() {
        let container = LayerContainer::new(vec![
            layer(0, vec![object(ObjectKind::Model, "base.mdl")]),
            layer(58, vec![object(ObjectKind::Model, "halloween.mdl")]),
            layer(77, vec![object(ObjectKind::Model, "christmas.mdl")]),
        ]);

        let base = container.models(FestivalFilter::base()).collect_vec();
        assert_eq!(base, vec!["base.mdl"]);

        let halloween = container
            .models(FestivalFilter::with_festival(58))
            .collect_vec();
        assert_eq!(halloween, vec!["base.mdl", "halloween.mdl"]);

        assert_eq!(FestivalFilter::with_festival(0), FestivalFilter::base());
        assert_eq!(container.festivals().into_iter().collect_vec(), vec![58, 77]);
    }

    #[test]
    fn references_are_split_by_kind() {
        let mut unnamed = object(ObjectKind::Model, "");
        unnamed.asset_name = None;
        let container = LayerContainer::new(vec![layer(
            0,
            vec![
                object(ObjectKind::Model, "a.mdl"),
                object(ObjectKind::NestedContainer, "b.sgb"),
                object(ObjectKind::Texture, "c.tex"),
                object(ObjectKind::Other(0x03), "light"),
                unnamed,
            ],
        )]);

        let filter = FestivalFilter::base();
        assert_eq!(container.models(filter).collect_vec(), vec!["a.mdl"]);
        assert_eq!(container.nested_containers(filter).collect_vec(), vec!["b.sgb"]);
        assert_eq!(container.textures(filter).collect_vec(), vec!["c.tex"]);
    }

    #[test]
    fn raw_kinds() {
        assert_eq!(ObjectKind::from_raw(0x01), ObjectKind::Model);
        assert_eq!(ObjectKind::from_raw(0x06), ObjectKind::NestedContainer);
        assert_eq!(ObjectKind::from_raw(0x2f), ObjectKind::Texture);
        assert_eq!(ObjectKind::from_raw(0x03), ObjectKind::Other(0x03));
    }
}
