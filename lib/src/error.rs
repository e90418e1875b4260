use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// A font file could not be read from disk
    #[error("Font {path} could not be read")]
    FontRead { path: PathBuf, source: io::Error },
    /// The font file was read but is not a usable outline font
    #[error("Font {path} could not be parsed")]
    FontParse { path: PathBuf },
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    /// Error encoding an output image
    #[error("Image {path} could not be written")]
    ImageWrite {
        path: PathBuf,
        source: image::error::ImageError,
    },
    /// Error decoding an input image
    #[error("Image {path} could not be decoded")]
    ImageRead {
        path: PathBuf,
        source: image::error::ImageError,
    },
    #[error(transparent)]
    Io(#[from] io::Error),
}
