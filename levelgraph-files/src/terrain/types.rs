use std::io::Read;

use crate::common::reader::Parseable;
use crate::ParserError;

/// The terrain ("tera") file of a level: a list of square plates, each one backed by a model file
/// next to the terrain file.
#[derive(Debug, Clone)]
pub struct TerrainAsset {
    pub header: TerrainHeader,
    pub plate_positions: Vec<PlatePosition>,
}

#[derive(Debug, Copy, Clone)]
pub struct TerrainHeader {
    /// Unknown, presumably a version tag. Not validated.
    pub version: u32,
    pub plate_count: u32,
    pub plate_size: u32,
}

/// Grid coordinates of a plate, in plate units.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PlatePosition {
    pub x: i16,
    pub z: i16,
}

impl Parseable<TerrainHeader> for TerrainHeader {
    fn parse<R: Read>(rdr: &mut R) -> Result<TerrainHeader, ParserError> {
        Ok(TerrainHeader {
            version: u32::parse(rdr)?,
            plate_count: u32::parse(rdr)?,
            plate_size: u32::parse(rdr)?,
        })
    }
}

impl Parseable<PlatePosition> for PlatePosition {
    fn parse<R: Read>(rdr: &mut R) -> Result<PlatePosition, ParserError> {
        Ok(PlatePosition {
            x: i16::parse(rdr)?,
            z: i16::parse(rdr)?,
        })
    }
}
