//! Error types that can be emitted from this library

use std::io;

use miette::Diagnostic;
use thiserror::Error;

/// Access outside of a [`crate::SubStream`] window
///
/// Travels inside an [`std::io::Error`] through the `Read`/`Write`/`Seek` traits, use
/// [`OutOfBounds::from_io`] to get it back.
#[derive(Error, Diagnostic, Debug, Clone, Copy, PartialEq, Eq)]
#[error("offset {offset:#x} is outside of the {len:#x} byte window starting at {start:#x}")]
pub struct OutOfBounds {
    /// Absolute start of the window in the parent stream
    pub start: u64,
    /// Length of the window
    pub len: u64,
    /// Requested offset, relative to the window start
    pub offset: u64,
}

impl OutOfBounds {
    /// Recover the window violation carried by an I/O error, if there is one
    pub fn from_io(error: &io::Error) -> Option<OutOfBounds> {
        error
            .get_ref()
            .and_then(|inner| inner.downcast_ref::<OutOfBounds>())
            .copied()
    }
}

impl From<OutOfBounds> for io::Error {
    fn from(value: OutOfBounds) -> Self {
        io::Error::new(io::ErrorKind::InvalidInput, value)
    }
}

/// Error type for library
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// Transparent wrapper for [`std::io::Error`]
    #[error(transparent)]
    IOError(io::Error),

    /// Transparent wrapper for [`OutOfBounds`]
    #[error(transparent)]
    OutOfBounds(#[from] OutOfBounds),

    /// Transparent wrapper for [`serde_json::Error`]
    #[error(transparent)]
    JsonError(#[from] serde_json::Error),

    /// a side file referenced by metadata does not exist
    #[error("missing side file {name}")]
    #[diagnostic(help("re-extract the container or restore the file"))]
    MissingSideFile {
        /// Name relative to the side-file root
        name: String,
    },

    /// a write went through a read-only view
    #[error("cannot write {name}, the side files are opened read-only")]
    ReadOnly {
        /// Name relative to the side-file root
        name: String,
    },
}

impl From<io::Error> for Error {
    fn from(value: io::Error) -> Self {
        match OutOfBounds::from_io(&value) {
            Some(oob) => Error::OutOfBounds(oob),
            None => Error::IOError(value),
        }
    }
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;
