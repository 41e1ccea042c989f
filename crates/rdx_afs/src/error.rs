//! Error types that can be emitted from this library

use miette::Diagnostic;
use thiserror::Error;

/// Error type for library
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// Transparent wrapper for [`std::io::Error`]
    #[error(transparent)]
    IOError(#[from] std::io::Error),

    /// Transparent wrapper for [`serde_json::Error`]
    #[error(transparent)]
    JsonError(#[from] serde_json::Error),

    /// The metadata was written by a newer tool
    #[error("metadata version {version} is not supported, the newest known version is {}", crate::METADATA_VERSION)]
    #[diagnostic(help("update the tools or extract the archive again"))]
    UnsupportedVersion {
        /// Version found in the file
        version: u64,
    },

    /// The file is JSON but not metadata
    #[error("invalid metadata: {reason}")]
    InvalidMetadata {
        /// What is wrong with it
        reason: &'static str,
    },

    /// No entry has the requested name
    #[error("no entry named {name}")]
    EntryNotFound {
        /// The requested name
        name: String,
    },
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;
