use std::io::Read;

use crate::common::reader::{skip_bytes, Parseable};
use crate::texture::types::{TextureAsset, TextureHeader};
use crate::ParserError;

/// The surface data starts right after the (fixed size) header.
pub const PAYLOAD_OFFSET: u64 = 80;
const PARSED_HEADER_SIZE: u64 = 4 + 4 + 2 * 6 + 4 * 3;

pub struct TextureReader {}

impl TextureReader {
    pub fn parse_header<R: Read>(rdr: &mut R) -> Result<TextureHeader, ParserError> {
        TextureHeader::parse(rdr).map_err(|err| match err {
            ParserError::IOError(io) if io.kind() == std::io::ErrorKind::UnexpectedEof => ParserError::EmptySource,
            err => err,
        })
    }

    pub fn parse_asset<R: Read>(rdr: &mut R) -> Result<TextureAsset, ParserError> {
        let header = Self::parse_header(rdr)?;
        skip_bytes(rdr, PAYLOAD_OFFSET - PARSED_HEADER_SIZE)?;

        let mut payload = Vec::new();
        rdr.read_to_end(&mut payload)?;

        Ok(TextureAsset { header, payload })
    }
}
