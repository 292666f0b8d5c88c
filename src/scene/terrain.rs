use glam::Vec3;
use itertools::Itertools;
use levelgraph_files::terrain::types::TerrainAsset;
use log::debug;

use crate::common::types::{AssetPath, Terrain, TerrainPlate};

pub fn terrain_path(level: &str) -> AssetPath {
    format!("{}/bgplate/terrain.tera", level)
}

pub fn plate_model_path(level: &str, index: usize) -> AssetPath {
    format!("{}/bgplate/{:04}.mdl", level, index)
}

/// The plate's center: grid coordinates are in plate units and address the plate's corner.
pub fn plate_world_offset(grid_x: i16, grid_z: i16, plate_size: f32) -> Vec3 {
    Vec3::new(
        (grid_x as f32 + 0.5) * plate_size,
        0.0,
        (grid_z as f32 + 0.5) * plate_size,
    )
}

pub fn assemble_terrain(level: &str, asset: &TerrainAsset) -> Terrain {
    let plate_size = asset.header.plate_size as f32;
    let plates = asset
        .plate_positions
        .iter()
        .enumerate()
        .map(|(index, position)| TerrainPlate {
            index,
            grid_x: position.x,
            grid_z: position.z,
            model_path: plate_model_path(level, index),
            world_offset: plate_world_offset(position.x, position.z, plate_size),
        })
        .collect_vec();

    debug!("Terrain of {} has {} plates of size {}", level, plates.len(), plate_size);
    Terrain {
        level: level.to_string(),
        plate_size,
        plates,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use levelgraph_files::terrain::types::{PlatePosition, TerrainHeader};

    #[test]
    fn four_plates() {
        let asset = TerrainAsset {
            header: TerrainHeader {
                version: 0,
                plate_count: 4,
                plate_size: 100,
            },
            plate_positions: vec![
                PlatePosition { x: 0, z: 0 },
                PlatePosition { x: 1, z: 0 },
                PlatePosition { x: 0, z: 1 },
                PlatePosition { x: 1, z: 1 },
            ],
        };

        let terrain = assemble_terrain("bg/ffxiv/fst_f1/fld/f1f1", &asset);
        assert_eq!(terrain.plate_count(), 4);
        assert_eq!(
            terrain.plates.iter().map(|plate| plate.world_offset).collect_vec(),
            vec![
                Vec3::new(50.0, 0.0, 50.0),
                Vec3::new(150.0, 0.0, 50.0),
                Vec3::new(50.0, 0.0, 150.0),
                Vec3::new(150.0, 0.0, 150.0),
            ]
        );
        assert_eq!(terrain.plates[3].model_path, "bg/ffxiv/fst_f1/fld/f1f1/bgplate/0003.mdl");
    }

    #[test]
    fn negative_grid_coordinates() {
        assert_eq!(plate_world_offset(-1, -2, 64.0), Vec3::new(-32.0, 0.0, -96.0));
    }

    #[test]
    fn paths() {
        assert_eq!(terrain_path("bg/a"), "bg/a/bgplate/terrain.tera");
        assert_eq!(plate_model_path("bg/a", 12), "bg/a/bgplate/0012.mdl");
        assert_eq!(plate_model_path("bg/a", 12345), "bg/a/bgplate/12345.mdl");
    }
}
