//! PVR and GVR chunk-texture containers
//!
//! Both formats are the same sequence of tagged chunks with different tags, see the crate
//! documentation for the layout of each chunk.

use std::io::{Read, Seek, SeekFrom, Write};

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use binrw::BinRead;
use derive_more::Display;
use rdx_io::{align_up, read_vec, Diagnostics, OutOfBounds, SideFiles, Warning};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, trace};

use crate::{
    error::{Error, Result},
    is_sentinel,
};

/// Trailing zero bytes after an external palette
const PALETTE_PADDING: usize = 16;

/// Which tag set a container uses
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChunkFlavor {
    /// Dreamcast PowerVR textures
    #[display("PVR")]
    Pvr,
    /// GameCube textures
    #[display("GVR")]
    Gvr,
}

impl ChunkFlavor {
    /// Extension of image side files
    pub fn image_extension(self) -> &'static str {
        match self {
            ChunkFlavor::Pvr => "pvr",
            ChunkFlavor::Gvr => "gvr",
        }
    }

    /// Extension of external palette side files
    pub fn palette_extension(self) -> &'static str {
        match self {
            ChunkFlavor::Pvr => "pvp",
            ChunkFlavor::Gvr => "gvp",
        }
    }
}

/// The chunk kinds of a texture container
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChunkKind {
    /// Global index followed by the texture, closes an entry
    Image,
    /// Palette stored outside of the texture
    ExternalPalette,
    /// Palette header without data
    PalettePlaceholder,
    /// Alignment filler
    Padding,
    /// Alternate palette header
    AlternatePalette,
    /// Alternate texture header
    AlternateTexture,
}

impl ChunkKind {
    const ALL: [ChunkKind; 6] = [
        ChunkKind::Image,
        ChunkKind::ExternalPalette,
        ChunkKind::PalettePlaceholder,
        ChunkKind::Padding,
        ChunkKind::AlternatePalette,
        ChunkKind::AlternateTexture,
    ];

    /// The four byte tag of this kind
    pub fn tag(self, flavor: ChunkFlavor) -> [u8; 4] {
        use ChunkFlavor::*;
        use ChunkKind::*;

        match (self, flavor) {
            (Image, Pvr) => *b"GBIX",
            (Image, Gvr) => *b"GCIX",
            (ExternalPalette, Pvr) => *b"PVPL",
            (ExternalPalette, Gvr) => *b"GVPL",
            (PalettePlaceholder, Pvr) => *b"PPHD",
            (PalettePlaceholder, Gvr) => *b"GPHD",
            (Padding, _) => *b"PADD",
            (AlternatePalette, Pvr) => *b"PVPA",
            (AlternatePalette, Gvr) => *b"GVPA",
            (AlternateTexture, Pvr) => *b"PVRA",
            (AlternateTexture, Gvr) => *b"GVRA",
        }
    }

    /// Look up a tag, `None` for tags outside of the format
    pub fn from_tag(flavor: ChunkFlavor, tag: &[u8]) -> Option<ChunkKind> {
        Self::ALL.into_iter().find(|kind| kind.tag(flavor) == tag)
    }

    /// Size of chunks that do not store their length
    pub fn fixed_len(self) -> Option<u64> {
        match self {
            ChunkKind::Image | ChunkKind::ExternalPalette => None,
            ChunkKind::Padding => Some(0x10),
            ChunkKind::PalettePlaceholder
            | ChunkKind::AlternatePalette
            | ChunkKind::AlternateTexture => Some(0x20),
        }
    }
}

/// Tag and length in front of a chunk, the length is always little-endian
#[derive(BinRead, Debug, Clone, Copy, PartialEq, Eq)]
#[br(little)]
pub struct ChunkHeader {
    /// ASCII tag
    pub tag: [u8; 4],
    /// Length of the data following the header
    pub len: u32,
}

/// One chunk in the metadata file
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct ChunkRecord {
    /// ASCII tag of the chunk
    pub chunk_type: String,
    /// Side file name for images and palettes, base64 of the chunk otherwise
    pub chunk_data: String,
}

/// Chunks up to and including an image, or the chunks left in front of the sentinel
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct ChunkEntry {
    /// Total size of the chunks
    pub entry_size: u32,
    /// `false` when the entry has no image chunk
    #[serde(default = "default_true", skip_serializing_if = "is_true")]
    pub has_entry_data: bool,
    /// Chunks in container order
    pub chunks: Vec<ChunkRecord>,
}

fn default_true() -> bool {
    true
}

fn is_true(value: &bool) -> bool {
    *value
}

/// Everything needed to rebuild a PVR/GVR container
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct ChunkMetadata {
    /// Entries in container order
    pub entries: Vec<ChunkEntry>,
    /// The sentinel chunk and anything after it, base64
    pub final_chunk: String,
}

fn escape_tag(tag: &[u8]) -> String {
    tag.escape_ascii().to_string()
}

/// Length of the chunk at `offset` of the `[start, end)` window, the reader is left anywhere
fn chunk_len<R: Read + Seek>(
    reader: &mut R,
    kind: ChunkKind,
    start: u64,
    end: u64,
    offset: u64,
) -> Result<u64> {
    if let Some(len) = kind.fixed_len() {
        return Ok(len);
    }

    let header_at = |reader: &mut R, at: u64| -> Result<ChunkHeader> {
        if start + at + 8 > end {
            return Err(OutOfBounds {
                start,
                len: end - start,
                offset: at + 8,
            }
            .into());
        }
        reader.seek(SeekFrom::Start(start + at))?;
        Ok(ChunkHeader::read(reader)?)
    };

    let len = u64::from(header_at(reader, offset)?.len);

    Ok(match kind {
        ChunkKind::Image => {
            let texture = header_at(reader, offset + 8 + len)?;
            align_up(0x10 + len + u64::from(texture.len), 0x20)
        }
        _ => 8 + len + PALETTE_PADDING as u64,
    })
}

#[derive(Default)]
struct Counters {
    images: usize,
    palettes: usize,
}

/// Split the chunk container filling `reader` into side files.
///
/// Images go to `NNNN.pvr`/`NNNN.gvr`, external palettes to `NNNN.pvp`/`NNNN.gvp`, every
/// other chunk is kept inline in the returned metadata.
#[instrument(skip(reader, files, sink), err)]
pub fn extract<R: Read + Seek>(
    reader: &mut R,
    flavor: ChunkFlavor,
    files: &mut dyn SideFiles,
    sink: &mut dyn Diagnostics,
) -> Result<ChunkMetadata> {
    let start = reader.stream_position()?;
    let end = reader.seek(SeekFrom::End(0))?;
    let window = end - start;

    let mut metadata = ChunkMetadata::default();
    let mut pending = Vec::new();
    let mut pending_size = 0u64;
    let mut counters = Counters::default();
    let mut offset = 0u64;

    loop {
        let remaining = window - offset;
        if remaining == 0 {
            sink.warning(Warning::MissingSentinel { offset });
            break;
        }

        reader.seek(SeekFrom::Start(start + offset))?;
        let tag = read_vec(reader, remaining.min(4) as usize)?;
        if is_sentinel(&tag) {
            reader.seek(SeekFrom::Start(start + offset))?;
            let rest = read_vec(reader, remaining as usize)?;
            trace!("sentinel at {offset:#x}, {} bytes", rest.len());
            metadata.final_chunk = BASE64.encode(rest);
            break;
        }
        if tag.len() < 4 {
            return Err(OutOfBounds {
                start,
                len: window,
                offset: offset + 4,
            }
            .into());
        }

        let kind = ChunkKind::from_tag(flavor, &tag).ok_or_else(|| Error::InvalidChunkTag {
            tag: escape_tag(&tag),
            offset,
        })?;
        let len = chunk_len(reader, kind, start, end, offset)?;
        if offset + len > window {
            return Err(OutOfBounds {
                start,
                len: window,
                offset: offset + len,
            }
            .into());
        }

        reader.seek(SeekFrom::Start(start + offset))?;
        let mut data = read_vec(reader, len as usize)?;
        debug!(%kind, len, "chunk at {offset:#x}");

        let chunk_data = match kind {
            ChunkKind::Image => {
                let name = rdx_io::side_file_name(counters.images, flavor.image_extension());
                counters.images += 1;
                files.write(&name, &data)?;
                name
            }
            ChunkKind::ExternalPalette => {
                let padding = data.split_off(data.len() - PALETTE_PADDING);
                if padding.iter().any(|byte| *byte != 0) {
                    return Err(Error::InvalidData {
                        tag: escape_tag(&tag),
                        offset,
                    });
                }

                let name = rdx_io::side_file_name(counters.palettes, flavor.palette_extension());
                counters.palettes += 1;
                files.write(&name, &data)?;
                name
            }
            _ => BASE64.encode(&data),
        };

        pending.push(ChunkRecord {
            chunk_type: escape_tag(&tag),
            chunk_data,
        });
        pending_size += len;
        offset += len;

        if kind == ChunkKind::Image {
            metadata.entries.push(ChunkEntry {
                entry_size: pending_size as u32,
                has_entry_data: true,
                chunks: std::mem::take(&mut pending),
            });
            pending_size = 0;
        }
    }

    if !pending.is_empty() {
        metadata.entries.push(ChunkEntry {
            entry_size: pending_size as u32,
            has_entry_data: false,
            chunks: pending,
        });
    }

    Ok(metadata)
}

/// Rebuild a chunk container from its metadata and side files, returns the bytes written.
#[instrument(skip_all, fields(%flavor, entries = metadata.entries.len()), err)]
pub fn insert<W: Write + Seek>(
    writer: &mut W,
    flavor: ChunkFlavor,
    metadata: &ChunkMetadata,
    files: &dyn SideFiles,
) -> Result<u64> {
    let mut written = 0u64;

    for (index, entry) in metadata.entries.iter().enumerate() {
        let mut buffer = Vec::with_capacity(entry.entry_size as usize);

        for chunk in &entry.chunks {
            let kind = ChunkKind::from_tag(flavor, chunk.chunk_type.as_bytes()).ok_or_else(|| {
                Error::InvalidChunkTag {
                    tag: chunk.chunk_type.clone(),
                    offset: written + buffer.len() as u64,
                }
            })?;

            match kind {
                ChunkKind::Image => buffer.extend(files.read(&chunk.chunk_data)?),
                ChunkKind::ExternalPalette => {
                    buffer.extend(files.read(&chunk.chunk_data)?);
                    buffer.extend([0u8; PALETTE_PADDING]);
                }
                _ => buffer.extend(BASE64.decode(&chunk.chunk_data)?),
            }
        }

        if buffer.len() as u64 != u64::from(entry.entry_size) {
            return Err(Error::size_mismatch(
                entry.entry_size.into(),
                buffer.len() as u64,
                format!("{flavor} entry {index}"),
            ));
        }

        writer.write_all(&buffer)?;
        written += buffer.len() as u64;
    }

    let final_chunk = BASE64.decode(&metadata.final_chunk)?;
    writer.write_all(&final_chunk)?;
    written += final_chunk.len() as u64;

    Ok(written)
}
