use std::io::Read;

use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::common::reader::{read_array, Parseable};
use crate::ParserError;

#[derive(Debug, Clone)]
pub struct TextureAsset {
    pub header: TextureHeader,
    /// The encoded surface data, all mips and array layers. This is uploaded as-is, decoding is up to the
    /// GPU (or the consumer).
    pub payload: Vec<u8>,
}

#[derive(Debug, Copy, Clone)]
pub struct TextureHeader {
    pub attributes: u32,
    pub format_raw: u32,
    pub width: u16,
    pub height: u16,
    pub depth: u16,
    pub mip_levels: u16,
    pub array_size: u16,
    pub lod_offsets: [u32; 3],
}

impl TextureHeader {
    pub fn format(&self) -> Result<TextureFormat, ParserError> {
        TextureFormat::try_from(self.format_raw).map_err(|_| ParserError::UnknownTextureFormat {
            format: self.format_raw,
        })
    }
}

impl Parseable<TextureHeader> for TextureHeader {
    fn parse<R: Read>(rdr: &mut R) -> Result<TextureHeader, ParserError> {
        let attributes = u32::parse(rdr)?;
        let format_raw = u32::parse(rdr)?;
        let width = u16::parse(rdr)?;
        let height = u16::parse(rdr)?;
        let depth = u16::parse(rdr)?;
        let mip_levels = u16::parse(rdr)?;
        let array_size = u16::parse(rdr)?;
        // two bytes of padding after the array size.
        let _padding = u16::parse(rdr)?;
        let lods = read_array::<u32, R>(rdr, 3)?;

        Ok(TextureHeader {
            attributes,
            format_raw,
            width,
            height,
            depth,
            mip_levels,
            array_size,
            lod_offsets: [lods[0], lods[1], lods[2]],
        })
    }
}

/// https://github.com/NotAdam/Lumina/blob/12d0e8d418d8dc49f04e6bee1d06bae2905232c6/src/Lumina/Data/Files/TexFile.cs#L74
/// The DX9 aliases (DXT1, R4G4B4A4, ...) share their values with the entries below.
#[derive(Debug, Copy, Clone, PartialEq, Eq, TryFromPrimitive, IntoPrimitive)]
#[repr(u32)]
pub enum TextureFormat {
    Unknown = 0x0,

    // Integer types
    L8 = 0x1130,
    A8 = 0x1131,
    B4G4R4A4 = 0x1440,
    B5G5R5A1 = 0x1441,
    B8G8R8A8 = 0x1450,
    B8G8R8X8 = 0x1451,

    // Floating point types
    R32F = 0x2150,
    R16G16F = 0x2250,
    R32G32F = 0x2260,
    R16G16B16A16F = 0x2460,
    R32G32B32A32F = 0x2470,

    // Block compression types
    BC1 = 0x3420,
    BC2 = 0x3430,
    BC3 = 0x3431,
    BC4 = 0x6120,
    BC5 = 0x6230,
    BC6H = 0x6330,
    BC7 = 0x6432,

    // Depth stencil types
    D16 = 0x4140,
    D24S8 = 0x4250,

    // Special types
    Null = 0x5100,
    Shadow16 = 0x5140,
    Shadow24 = 0x5150,
}

/// The formats that can be uploaded to the GPU without decoding them first.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TargetFormat {
    Bc1,
    Bc3,
    Bc7,
}

impl TextureFormat {
    pub fn target_format(self) -> Option<TargetFormat> {
        match self {
            TextureFormat::BC1 => Some(TargetFormat::Bc1),
            TextureFormat::BC3 => Some(TargetFormat::Bc3),
            TextureFormat::BC7 => Some(TargetFormat::Bc7),
            _ => None,
        }
    }
}
