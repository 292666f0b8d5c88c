use std::io::Cursor;

use levelgraph_files::terrain::reader::TerrainReader;
use levelgraph_files::terrain::types::TerrainAsset;
use levelgraph_files::texture::reader::TextureReader;
use levelgraph_files::texture::types::TextureAsset;
use log::warn;

use crate::common::layout::LayerContainer;
use crate::common::types::{Material, Model, Texture};

/// Parses the bytes of a single file. Implementations are shared between all concurrent loads and
/// may fail with anything; the store logs the failure and treats the asset as absent.
pub trait AssetDecoder: Send + Sync {
    fn parse_layer_container(&self, data: &[u8]) -> anyhow::Result<LayerContainer>;

    /// `Ok(None)` is a valid file without anything to draw.
    fn parse_model(&self, data: &[u8]) -> anyhow::Result<Option<Model>>;

    fn parse_material(&self, data: &[u8]) -> anyhow::Result<Material>;

    fn parse_texture(&self, data: &[u8]) -> anyhow::Result<Texture> {
        let asset = TextureReader::parse_asset(&mut Cursor::new(data))?;
        Ok(texture_from_asset(asset))
    }

    fn parse_terrain(&self, data: &[u8]) -> anyhow::Result<TerrainAsset> {
        Ok(TerrainReader::parse_asset(&mut Cursor::new(data))?)
    }
}

pub fn texture_from_asset(asset: TextureAsset) -> Texture {
    let header = asset.header;
    let format = match header.format() {
        Ok(format) => Some(format),
        Err(err) => {
            warn!("{}, the texture can't be uploaded", err);
            None
        }
    };

    Texture {
        width: header.width,
        height: header.height,
        depth: header.depth,
        mip_levels: header.mip_levels,
        array_size: header.array_size,
        format,
        payload: asset.payload,
    }
}
