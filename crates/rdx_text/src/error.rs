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

    /// A pointer or run leaves the block window
    #[error(transparent)]
    OutOfBounds(#[from] OutOfBounds),

    /// A bracketed token is neither in the code table nor a built-in control token
    #[error("unknown token {token}")]
    #[diagnostic(help("add the token to the table file or fix the typo in the text file"))]
    UnknownToken {
        /// The offending token, brackets included
        token: String,
    },

    /// A run reaches the end of its block without an END code
    #[error("run {run} is not terminated")]
    UnterminatedRun {
        /// Index of the run in its block
        run: usize,
    },

    /// The extracted text does not follow the run/block delimiter layout
    #[error("malformed text document in block {block}: {reason}")]
    MalformedDocument {
        /// Index of the block being parsed
        block: usize,
        /// What is wrong with it
        reason: &'static str,
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
