//! Shared plumbing for the rdx container codecs.
//!
//! - [`SubStream`]: a bounded read/write/seek view over part of a parent stream, used by
//!   every codec whenever a format is embedded inside another one.
//! - [`Diagnostics`]: the sink for recoverable [`Warning`]s, owned by the caller.
//! - [`SideFiles`]: named storage for the files produced by an extraction.

pub mod diagnostics;
pub mod error;
pub mod side_files;
pub mod stream;

pub use diagnostics::{CollectedDiagnostics, Diagnostics, TracingDiagnostics, Warning};
pub use error::OutOfBounds;
pub use side_files::{
    read_json, side_file_name, write_json, DirectorySideFiles, MemorySideFiles, ScopedSideFiles,
    SideFiles,
};
pub use stream::SubStream;

/// Round `value` up to the next multiple of `alignment`
pub const fn align_up(value: u64, alignment: u64) -> u64 {
    value.div_ceil(alignment) * alignment
}

/// Read exactly `len` bytes into a new buffer
pub fn read_vec(reader: &mut impl std::io::Read, len: usize) -> std::io::Result<Vec<u8>> {
    let mut buffer = vec![0u8; len];
    reader.read_exact(&mut buffer)?;
    Ok(buffer)
}
