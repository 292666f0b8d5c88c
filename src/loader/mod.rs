//! Decoders turn the raw bytes of the archive into the types of [`crate::common`]. They are the only
//! part that knows about file formats, everything above only sees layer containers, models,
//! materials, textures and terrain.
pub mod decoder;
pub mod json_decoder;
