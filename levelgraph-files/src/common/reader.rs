use std::io::Read;

use byteorder::{LittleEndian, ReadBytesExt};

use crate::ParserError;

pub(crate) trait Parseable<T> {
    fn parse<R: Read>(rdr: &mut R) -> Result<T, ParserError>;
}

impl Parseable<u16> for u16 {
    fn parse<R: Read>(rdr: &mut R) -> Result<u16, ParserError> {
        Ok(rdr.read_u16::<LittleEndian>()?)
    }
}

impl Parseable<i16> for i16 {
    fn parse<R: Read>(rdr: &mut R) -> Result<i16, ParserError> {
        Ok(rdr.read_i16::<LittleEndian>()?)
    }
}

impl Parseable<u32> for u32 {
    fn parse<R: Read>(rdr: &mut R) -> Result<u32, ParserError> {
        Ok(rdr.read_u32::<LittleEndian>()?)
    }
}

/// Reads and discards `count` bytes. The readers are only `Read`, not `Seek`, so that they work on
/// plain byte slices handed out by the fetchers as well as on files.
pub(crate) fn skip_bytes<R: Read>(rdr: &mut R, count: u64) -> Result<(), ParserError> {
    let skipped = std::io::copy(&mut rdr.by_ref().take(count), &mut std::io::sink())?;
    if skipped != count {
        return Err(ParserError::IOError(std::io::Error::from(
            std::io::ErrorKind::UnexpectedEof,
        )));
    }
    Ok(())
}

pub(crate) fn read_array<T: Parseable<T>, R: Read>(rdr: &mut R, count: usize) -> Result<Vec<T>, ParserError> {
    let mut list = Vec::with_capacity(count);
    for _ in 0..count {
        list.push(T::parse(rdr)?);
    }
    Ok(list)
}
