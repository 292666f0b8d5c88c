use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParserError {
    #[error("The file is violating the expected format, because: {reason}")]
    FormatError { reason: &'static str },

    /// Represents an empty source, e.g. a zero byte file that has been served instead of a 404.
    #[error("Source contains no data")]
    EmptySource,

    #[error("Unknown texture format {format:#06x}")]
    UnknownTextureFormat { format: u32 },

    /// Represents all other cases of `std::io::Error`, most notably unexpected EOFs on truncated files.
    #[error(transparent)]
    IOError(#[from] std::io::Error),
}

pub mod common;
pub mod terrain;
pub mod texture;
