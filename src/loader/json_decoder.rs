use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use anyhow::Context;
use glam::Vec3;
use serde::Deserialize;

use crate::animation::controller::AnimationController;
use crate::animation::timeline::{Curve, CurveAttribute, CurveKey, ModelAnimation, TimelineController};
use crate::common::layout::{Layer, LayerContainer, LayoutObject, ObjectKind};
use crate::common::types::{Material, Mesh, Model};
use crate::loader::decoder::AssetDecoder;

/// Decodes layer containers, models and materials that have been extracted to JSON beforehand.
/// Terrain and textures are still read from their binary formats.
#[derive(Debug, Default)]
pub struct JsonDecoder {}

impl JsonDecoder {
    pub fn new() -> Self {
        Self {}
    }
}

impl AssetDecoder for JsonDecoder {
    fn parse_layer_container(&self, data: &[u8]) -> anyhow::Result<LayerContainer> {
        let file: ContainerFile = serde_json::from_slice(data).context("Malformed layer container")?;

        let layers = match file.layers {
            Some(layers) => layers.into_iter().map(Layer::from).collect(),
            None => group_flat_objects(file.objects),
        };

        let mut container = LayerContainer::new(layers);
        container.animation_controller = build_controller(file.timelines);
        Ok(container)
    }

    fn parse_model(&self, data: &[u8]) -> anyhow::Result<Option<Model>> {
        let file: Option<ModelFile> = serde_json::from_slice(data).context("Malformed model")?;
        Ok(file.map(|model| Model {
            meshes: model
                .meshes
                .into_iter()
                .map(|mesh| Mesh {
                    material_index: mesh.material_index,
                    vertex_count: mesh.vertex_count,
                    index_count: mesh.index_count,
                })
                .collect(),
            materials: model.materials,
        }))
    }

    fn parse_material(&self, data: &[u8]) -> anyhow::Result<Material> {
        let file: MaterialFile = serde_json::from_slice(data).context("Malformed material")?;
        Ok(Material {
            texture_names: file.texture_names,
            shader_name: file.shader_name,
        })
    }
}

/// Flat object lists carry the festival per object, turn them into one layer per festival phase.
fn group_flat_objects(objects: Vec<FlatObject>) -> Vec<Layer> {
    let mut grouped: BTreeMap<(u16, u16), Vec<LayoutObject>> = BTreeMap::new();
    for flat in objects {
        grouped
            .entry((flat.festival_id, flat.festival_phase_id))
            .or_default()
            .push(flat.object.into());
    }

    grouped
        .into_iter()
        .map(|((festival_id, festival_phase_id), objects)| Layer {
            name: match festival_id {
                0 => "Base".to_string(),
                _ => format!("Festival {} phase {}", festival_id, festival_phase_id),
            },
            festival_id,
            festival_phase_id,
            objects,
        })
        .collect()
}

fn build_controller(timelines: Vec<TimelineEntry>) -> Option<Arc<dyn AnimationController>> {
    let mut animations: HashMap<u32, Vec<ModelAnimation>> = HashMap::new();
    for timeline in timelines {
        let curves = timeline
            .curves
            .into_iter()
            .map(|curve| {
                let keys = curve
                    .keys
                    .into_iter()
                    .map(|key| CurveKey {
                        time: key.time,
                        value: key.value,
                    })
                    .collect();
                Curve::new(curve.attribute.into(), keys)
            })
            .collect();

        animations
            .entry(timeline.instance_id)
            .or_default()
            .push(ModelAnimation {
                duration: timeline.duration,
                curves,
            });
    }

    TimelineController::new(animations).map(|controller| Arc::new(controller) as Arc<dyn AnimationController>)
}

#[derive(Deserialize)]
struct ContainerFile {
    #[serde(default)]
    layers: Option<Vec<LayerEntry>>,
    #[serde(default)]
    objects: Vec<FlatObject>,
    #[serde(default)]
    timelines: Vec<TimelineEntry>,
}

#[derive(Deserialize)]
struct LayerEntry {
    #[serde(default)]
    name: String,
    #[serde(default)]
    festival_id: u16,
    #[serde(default)]
    festival_phase_id: u16,
    #[serde(default)]
    objects: Vec<ObjectEntry>,
}

impl From<LayerEntry> for Layer {
    fn from(value: LayerEntry) -> Self {
        Layer {
            name: value.name,
            festival_id: value.festival_id,
            festival_phase_id: value.festival_phase_id,
            objects: value.objects.into_iter().map(LayoutObject::from).collect(),
        }
    }
}

#[derive(Deserialize)]
struct FlatObject {
    #[serde(default)]
    festival_id: u16,
    #[serde(default)]
    festival_phase_id: u16,
    #[serde(flatten)]
    object: ObjectEntry,
}

#[derive(Deserialize)]
struct ObjectEntry {
    #[serde(default)]
    asset_name: Option<String>,
    kind: KindEntry,
    #[serde(default)]
    instance_id: u32,
    #[serde(default)]
    translation: [f32; 3],
    /// Radians
    #[serde(default)]
    rotation: [f32; 3],
    #[serde(default = "unit_scale")]
    scale: [f32; 3],
}

fn unit_scale() -> [f32; 3] {
    [1.0; 3]
}

impl From<ObjectEntry> for LayoutObject {
    fn from(value: ObjectEntry) -> Self {
        LayoutObject {
            asset_name: value.asset_name,
            kind: value.kind.into(),
            instance_id: value.instance_id,
            translation: Vec3::from_array(value.translation),
            rotation: Vec3::from_array(value.rotation),
            scale: Vec3::from_array(value.scale),
        }
    }
}

/// Either a readable name or the raw asset type of the layer file.
#[derive(Deserialize)]
#[serde(untagged)]
enum KindEntry {
    Named(NamedKind),
    Raw(i32),
}

#[derive(Deserialize)]
#[serde(rename_all = "snake_case")]
enum NamedKind {
    Model,
    NestedContainer,
    Texture,
}

impl From<KindEntry> for ObjectKind {
    fn from(value: KindEntry) -> Self {
        match value {
            KindEntry::Named(NamedKind::Model) => ObjectKind::Model,
            KindEntry::Named(NamedKind::NestedContainer) => ObjectKind::NestedContainer,
            KindEntry::Named(NamedKind::Texture) => ObjectKind::Texture,
            KindEntry::Raw(raw) => ObjectKind::from_raw(raw),
        }
    }
}

#[derive(Deserialize)]
struct TimelineEntry {
    instance_id: u32,
    #[serde(default)]
    duration: f32,
    #[serde(default)]
    curves: Vec<CurveEntry>,
}

#[derive(Deserialize)]
struct CurveEntry {
    attribute: AttributeEntry,
    keys: Vec<KeyEntry>,
}

#[derive(Deserialize)]
#[serde(rename_all = "snake_case")]
enum AttributeEntry {
    RotationX,
    RotationY,
    RotationZ,
    #[serde(other)]
    Unsupported,
}

impl From<AttributeEntry> for CurveAttribute {
    fn from(value: AttributeEntry) -> Self {
        match value {
            AttributeEntry::RotationX => CurveAttribute::RotationX,
            AttributeEntry::RotationY => CurveAttribute::RotationY,
            AttributeEntry::RotationZ => CurveAttribute::RotationZ,
            AttributeEntry::Unsupported => CurveAttribute::Unsupported,
        }
    }
}

#[derive(Deserialize)]
struct KeyEntry {
    time: f32,
    value: f32,
}

#[derive(Deserialize)]
struct ModelFile {
    #[serde(default)]
    meshes: Vec<MeshEntry>,
    #[serde(default)]
    materials: Vec<String>,
}

#[derive(Deserialize)]
struct MeshEntry {
    material_index: u16,
    #[serde(default)]
    vertex_count: u32,
    #[serde(default)]
    index_count: u32,
}

#[derive(Deserialize)]
struct MaterialFile {
    #[serde(default)]
    texture_names: Vec<String>,
    #[serde(default)]
    shader_name: String,
}
