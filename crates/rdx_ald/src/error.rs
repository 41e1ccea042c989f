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

    /// A block size points past the end of the container
    #[error(transparent)]
    OutOfBounds(#[from] OutOfBounds),

    /// Transparent wrapper for [`rdx_io::error::Error`]
    #[error(transparent)]
    #[diagnostic(transparent)]
    SideFileError(#[from] rdx_io::error::Error),

    /// Transparent wrapper for [`rdx_text::error::Error`]
    #[error(transparent)]
    #[diagnostic(transparent)]
    TextError(#[from] rdx_text::error::Error),

    /// The size of a block does not fit the 31 bit size field
    #[error("block {index} is {size:#x} bytes, the size field holds at most 0x7FFFFFFF")]
    BlockTooLarge {
        /// Index of the block
        index: usize,
        /// Size of the payload
        size: usize,
    },

    /// A text side file was found but no code table was given
    #[error("{name} is a text file, a code table is required to insert it")]
    #[diagnostic(help("pass the table file used during extraction"))]
    TableRequired {
        /// Name of the text side file
        name: String,
    },

    /// A text side file is not valid UTF-8
    #[error("{name} is not valid UTF-8")]
    InvalidUtf8 {
        /// Name of the text side file
        name: String,
        /// Position of the invalid bytes
        source: std::string::FromUtf8Error,
    },
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
