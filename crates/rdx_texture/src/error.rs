//! Error types that can be emitted from this library

use miette::Diagnostic;
use rdx_io::OutOfBounds;
use thiserror::Error;

/// Error type for library
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// Transparent wrapper for [`std::io::Error`]
    #[error(transparent)]
    IOError(std::io::Error),

    /// Transparent wrapper for [`binrw::Error`]
    #[error(transparent)]
    BinRWError(binrw::Error),

    /// A chunk runs past the end of its window
    #[error(transparent)]
    OutOfBounds(#[from] OutOfBounds),

    /// Transparent wrapper for [`rdx_io::error::Error`]
    #[error(transparent)]
    #[diagnostic(transparent)]
    SideFileError(#[from] rdx_io::error::Error),

    /// Transparent wrapper for [`base64::DecodeError`]
    #[error(transparent)]
    Base64Error(#[from] base64::DecodeError),

    /// A PVR/GVR chunk tag that is not part of the format
    #[error("invalid chunk tag {tag:?} at {offset:#x}")]
    InvalidChunkTag {
        /// The tag, escaped
        tag: String,
        /// Offset of the tag in the texture container
        offset: u64,
    },

    /// A TM2 item tag that is not part of the format, or a chunk with unexpected contents
    #[error("invalid data {tag:?} at {offset:#x}")]
    InvalidData {
        /// The tag, escaped
        tag: String,
        /// Offset of the tag in the texture container
        offset: u64,
    },

    /// A rebuilt item does not have the size recorded during extraction
    #[error("{context}: expected {expected:#x} bytes, got {actual:#x}")]
    #[diagnostic(help("edited textures must keep the size of the original"))]
    SizeMismatch {
        /// Recorded size
        expected: u64,
        /// Size of the rebuilt item
        actual: u64,
        /// What was rebuilt
        context: String,
    },
}

impl Error {
    pub(crate) fn size_mismatch(expected: u64, actual: u64, context: impl ToString) -> Error {
        Error::SizeMismatch {
            expected,
            actual,
            context: context.to_string(),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        match OutOfBounds::from_io(&value) {
            Some(oob) => Error::OutOfBounds(oob),
            None => Error::IOError(value),
        }
    }
}

impl From<binrw::Error> for Error {
    fn from(value: binrw::Error) -> Self {
        match value {
            binrw::Error::Io(error) => Error::from(error),
            other => Error::BinRWError(other),
        }
    }
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;
