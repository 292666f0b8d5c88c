use std::fmt::{Debug, Formatter};

use glam::Vec3;
use levelgraph_files::texture::types::{TargetFormat, TextureFormat};
use log::warn;

/// Identifies exactly one file inside the archive, e.g. `bg/ffxiv/sea_s1/fld/s1f1/bgplate/0000.mdl`.
/// This is the deduplication key everywhere.
pub type AssetPath = String;

#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    /// Index into [`Model::materials`].
    pub material_index: u16,
    pub vertex_count: u32,
    pub index_count: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    pub meshes: Vec<Mesh>,
    /// Material paths, referenced by the meshes.
    pub materials: Vec<AssetPath>,
}

impl Model {
    /// The material paths that are actually used by a mesh, in mesh order (may contain duplicates).
    pub fn referenced_materials(&self) -> impl Iterator<Item = &str> {
        self.meshes.iter().filter_map(|mesh| {
            let material = self.materials.get(mesh.material_index as usize);
            if material.is_none() {
                warn!(
                    "Mesh references material {} but the model only has {}",
                    mesh.material_index,
                    self.materials.len()
                );
            }
            material.map(String::as_str)
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub texture_names: Vec<AssetPath>,
    pub shader_name: String,
}

#[derive(Clone)]
pub struct Texture {
    pub width: u16,
    pub height: u16,
    pub depth: u16,
    pub mip_levels: u16,
    pub array_size: u16,
    /// `None` if the format tag is not known.
    pub format: Option<TextureFormat>,
    pub payload: Vec<u8>,
}

impl Texture {
    /// The GPU format this texture can be uploaded as, without decoding it first.
    pub fn target_format(&self) -> Option<TargetFormat> {
        self.format.and_then(TextureFormat::target_format)
    }
}

impl Debug for Texture {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{{ {}x{}x{}, mips: {}, layers: {}, format: {:?}, ",
            self.width, self.height, self.depth, self.mip_levels, self.array_size, self.format
        )?;
        write!(f, "payload: [{}] }}", self.payload.len())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TerrainPlate {
    pub index: usize,
    /// Stored grid coordinates (x, z) in plate units.
    pub grid_x: i16,
    pub grid_z: i16,
    pub model_path: AssetPath,
    /// Center of the plate in world space.
    pub world_offset: Vec3,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Terrain {
    pub level: String,
    pub plate_size: f32,
    pub plates: Vec<TerrainPlate>,
}

impl Terrain {
    pub fn plate_count(&self) -> usize {
        self.plates.len()
    }

    pub fn model_paths(&self) -> impl Iterator<Item = &str> {
        self.plates.iter().map(|plate| plate.model_path.as_str())
    }
}
