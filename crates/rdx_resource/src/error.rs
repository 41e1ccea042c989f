//! Error types that can be emitted from this library

use miette::Diagnostic;
use rdx_io::OutOfBounds;
use thiserror::Error;

use crate::variant::{Language, Platform};

/// Error type for library
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// Transparent wrapper for [`std::io::Error`]
    #[error(transparent)]
    IOError(std::io::Error),

    /// Transparent wrapper for [`binrw::Error`]
    #[error(transparent)]
    BinRWError(binrw::Error),

    /// A pointer leaves the resource file
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

    /// Transparent wrapper for [`rdx_texture::error::Error`]
    #[error(transparent)]
    #[diagnostic(transparent)]
    TextureError(#[from] rdx_texture::error::Error),

    /// The magic number does not belong to the selected platform
    #[error("not a {platform} resource file, magic is {magic:#010x}")]
    NotAValidContainer {
        /// Platform the file was opened as
        platform: Platform,
        /// The magic found at offset 0
        magic: u32,
    },

    /// The platform has no text for the language
    #[error("{platform} resource files have no {language} text")]
    UnsupportedLanguage {
        /// Platform of the file
        platform: Platform,
        /// Requested language
        language: Language,
    },

    /// A rebuilt texture does not have the size recorded during extraction
    #[error("texture {index}: expected {expected:#x} bytes, got {actual:#x}")]
    #[diagnostic(help("edited textures must keep the size of the original"))]
    SizeMismatch {
        /// Texture index
        index: usize,
        /// Recorded size
        expected: u64,
        /// Size of the rebuilt texture
        actual: u64,
    },

    /// The texture index does not list one slot per texture pointer
    #[error("the texture index lists {expected} textures, the file has {actual}")]
    #[diagnostic(help("extract the textures of this file again"))]
    TextureCountMismatch {
        /// Slots in `textures/textures.json`
        expected: usize,
        /// Pointers in the texture block
        actual: usize,
    },

    /// Relocated blocks would end past the reach of a 32-bit pointer
    #[error("the resource file would grow to {size:#x} bytes")]
    FileTooLarge {
        /// Size the file would have
        size: u64,
    },

    /// A text side file was requested but no code table was given
    #[error("a code table is required for text")]
    #[diagnostic(help("pass the table file used for this game"))]
    TableRequired,

    /// A text side file is not valid UTF-8
    #[error("{name} is not valid UTF-8")]
    InvalidUtf8 {
        /// Name of the text side file
        name: String,
        /// Position of the invalid bytes
        source: std::string::FromUtf8Error,
    },
}

impl Error {
    /// Whether the error should stop a batch run
    ///
    /// Files that are not resource files of the selected platform are expected when walking
    /// a disc image and can be skipped.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Error::NotAValidContainer { .. })
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
