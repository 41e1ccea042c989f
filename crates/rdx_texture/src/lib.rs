//! # Texture Container Documentation
//!
//! This crate splits the texture containers embedded in **RDX** resource files into
//! standalone texture files plus a JSON description, and rebuilds them byte for byte.
//!
//! ## PVR / GVR Chunk Containers
//!
//! A sequence of tagged chunks. Lengths are little-endian on both platforms.
//!
//! | PVR tag | GVR tag | Size                                             | Extracted to      |
//! |---------|---------|--------------------------------------------------|-------------------|
//! | `GBIX`  | `GCIX`  | 0x10 + index length + texture length, 0x20 aligned | `NNNN.pvr/.gvr` |
//! | `PVPL`  | `GVPL`  | 8 + length + 16 zero bytes                       | `NNNN.pvp/.gvp`   |
//! | `PPHD`  | `GPHD`  | 0x20                                             | metadata          |
//! | `PADD`  | `PADD`  | 0x10                                             | metadata          |
//! | `PVPA`  | `GVPA`  | 0x20                                             | metadata          |
//! | `PVRA`  | `GVRA`  | 0x20                                             | metadata          |
//!
//! The image chunk holds the global index (`GBIX`/`GCIX` plus its length) directly followed
//! by the texture chunk (`PVRT`/`GVRT` plus its length). Every image closes an entry, the
//! chunks in front of it belong to the same texture.
//!
//! ## TM2 Bundles
//!
//! | Tag      | Size                                     | Extracted to |
//! |----------|------------------------------------------|--------------|
//! | `PLI\0`  | 8 + length (u32 at +0x04)                | `NNNN.PLI`   |
//! | `NULL`   | 0x20                                     | metadata     |
//! | `TIM2`   | 0x10 + picture size (u32 at +0x10)       | `NNNN.TM2`   |
//!
//! ## Additional Information
//!
//! - **Sentinel**: `FF FF FF FF` ends both formats, it and anything after it is kept verbatim
//! - **Metadata**: written to `metadata.json` next to the extracted files
//!

use std::io::{Read, Seek, Write};

use derive_more::Display;
use rdx_io::{read_json, write_json, Diagnostics, SideFiles};

pub mod chunked;
pub mod error;
pub mod tm2;

pub use chunked::{ChunkFlavor, ChunkKind, ChunkMetadata};
pub use tm2::{Tm2Metadata, Tm2Tag};

use crate::error::Result;

/// Name of the metadata side file
pub const METADATA_FILE: &str = "metadata.json";

pub(crate) fn is_sentinel(tag: &[u8]) -> bool {
    !tag.is_empty() && tag.iter().all(|byte| *byte == 0xFF)
}

/// Texture container formats
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureFormat {
    /// Dreamcast chunk container
    #[display("PVR")]
    Pvr,
    /// GameCube chunk container
    #[display("GVR")]
    Gvr,
    /// PlayStation 2 bundle
    #[display("TM2")]
    Tm2,
}

impl TextureFormat {
    fn flavor(self) -> Option<ChunkFlavor> {
        match self {
            TextureFormat::Pvr => Some(ChunkFlavor::Pvr),
            TextureFormat::Gvr => Some(ChunkFlavor::Gvr),
            TextureFormat::Tm2 => None,
        }
    }
}

/// Extract the container filling `reader` and write its metadata to `metadata.json`.
pub fn extract_to_side_files<R: Read + Seek>(
    reader: &mut R,
    format: TextureFormat,
    files: &mut dyn SideFiles,
    sink: &mut dyn Diagnostics,
) -> Result<()> {
    match format.flavor() {
        Some(flavor) => {
            let metadata = chunked::extract(reader, flavor, files, sink)?;
            write_json(files, METADATA_FILE, &metadata)?;
        }
        None => {
            let metadata = tm2::extract(reader, files, sink)?;
            write_json(files, METADATA_FILE, &metadata)?;
        }
    }

    Ok(())
}

/// Rebuild a container from `metadata.json` and its side files, returns the bytes written.
pub fn insert_from_side_files<W: Write + Seek>(
    writer: &mut W,
    format: TextureFormat,
    files: &dyn SideFiles,
) -> Result<u64> {
    match format.flavor() {
        Some(flavor) => {
            let metadata: ChunkMetadata = read_json(files, METADATA_FILE)?;
            chunked::insert(writer, flavor, &metadata, files)
        }
        None => {
            let metadata: Tm2Metadata = read_json(files, METADATA_FILE)?;
            tm2::insert(writer, &metadata, files)
        }
    }
}
