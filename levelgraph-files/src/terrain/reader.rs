use std::io::Read;

use crate::common::reader::{read_array, skip_bytes, Parseable};
use crate::terrain::types::{PlatePosition, TerrainAsset, TerrainHeader};
use crate::ParserError;

/// Byte offset of the plate position table: the 12 byte header, two more (unknown) words and 32 bytes
/// of bounding information precede it.
pub const PLATE_POSITIONS_OFFSET: u64 = 4 + 4 + 4 + 4 + 4 + 32;
const HEADER_SIZE: u64 = 4 + 4 + 4;

// Real levels have a few hundred plates at most, anything above this is not a terrain file and would
// only make us allocate for garbage.
pub const MAX_PLATE_COUNT: u32 = 0x4000;

pub struct TerrainReader {}

impl TerrainReader {
    pub fn parse_asset<R: Read>(rdr: &mut R) -> Result<TerrainAsset, ParserError> {
        let header = TerrainHeader::parse(rdr).map_err(|err| match err {
            ParserError::IOError(io) if io.kind() == std::io::ErrorKind::UnexpectedEof => ParserError::EmptySource,
            err => err,
        })?;

        if header.plate_count > MAX_PLATE_COUNT {
            return Err(ParserError::FormatError {
                reason: "Implausible plate count",
            });
        }

        skip_bytes(rdr, PLATE_POSITIONS_OFFSET - HEADER_SIZE)?;
        let plate_positions = read_array::<PlatePosition, R>(rdr, header.plate_count as usize)?;

        Ok(TerrainAsset {
            header,
            plate_positions,
        })
    }
}
