use std::io::Cursor;

use crate::texture::reader::{TextureReader, PAYLOAD_OFFSET};
use crate::texture::types::{TargetFormat, TextureFormat};
use crate::ParserError;

fn build_texture(format: u32, width: u16, height: u16, payload: &[u8]) -> Vec<u8> {
    let mut buf = Vec::new();
    buf.extend_from_slice(&0x0080_0000u32.to_le_bytes());
    buf.extend_from_slice(&format.to_le_bytes());
    buf.extend_from_slice(&width.to_le_bytes());
    buf.extend_from_slice(&height.to_le_bytes());
    buf.extend_from_slice(&1u16.to_le_bytes()); // depth
    buf.extend_from_slice(&3u16.to_le_bytes()); // mips
    buf.extend_from_slice(&1u16.to_le_bytes()); // array size
    buf.resize(PAYLOAD_OFFSET as usize, 0);
    buf.extend_from_slice(payload);
    buf
}

#[test]
fn parse_bc7_texture() -> Result<(), anyhow::Error> {
    let data = build_texture(0x6432, 256, 128, &[1, 2, 3, 4]);
    let asset = TextureReader::parse_asset(&mut Cursor::new(data))?;

    assert_eq!(asset.header.width, 256);
    assert_eq!(asset.header.height, 128);
    assert_eq!(asset.header.mip_levels, 3);
    assert_eq!(asset.header.format()?, TextureFormat::BC7);
    assert_eq!(asset.header.format()?.target_format(), Some(TargetFormat::Bc7));
    assert_eq!(asset.payload, vec![1, 2, 3, 4]);
    Ok(())
}

#[test]
fn uncompressed_formats_have_no_upload_target() -> Result<(), anyhow::Error> {
    let data = build_texture(0x1450, 4, 4, &[]);
    let asset = TextureReader::parse_asset(&mut Cursor::new(data))?;
    assert_eq!(asset.header.format()?, TextureFormat::B8G8R8A8);
    assert_eq!(asset.header.format()?.target_format(), None);
    Ok(())
}

#[test]
fn unknown_format_is_an_error_on_access() -> Result<(), anyhow::Error> {
    let data = build_texture(0xBEEF, 4, 4, &[]);
    let asset = TextureReader::parse_asset(&mut Cursor::new(data))?;
    assert!(matches!(
        asset.header.format(),
        Err(ParserError::UnknownTextureFormat { format: 0xBEEF })
    ));
    Ok(())
}

#[test]
fn header_only_file_fails() {
    let data = build_texture(0x3420, 4, 4, &[]);
    let result = TextureReader::parse_asset(&mut Cursor::new(&data[..40]));
    assert!(result.is_err());
}
