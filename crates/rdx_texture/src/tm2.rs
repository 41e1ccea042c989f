//! TM2 multi-texture bundles
//!
//! A bundle is a list of palettes, null textures and standalone TIM2 files packed back to
//! back, closed by a `0xFFFFFFFF` sentinel.

use std::io::{Read, Seek, SeekFrom, Write};

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use byteorder::{LittleEndian, ReadBytesExt};
use derive_more::Display;
use rdx_io::{read_vec, side_file_name, Diagnostics, OutOfBounds, SideFiles, Warning};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, trace};

use crate::{
    error::{Error, Result},
    is_sentinel,
};

/// Size of a null texture stub
const NULL_LEN: u64 = 0x20;

/// Size of the TIM2 file header
const TIM2_HEADER_LEN: u64 = 0x10;

/// Item tags of a TM2 bundle
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tm2Tag {
    /// `PLI\0`, a palette
    #[display("PLI")]
    Palette,
    /// `NULL`, an empty texture slot
    #[display("NULL")]
    Null,
    /// `TIM2`, a complete TIM2 file
    #[display("TIM2")]
    Texture,
}

impl Tm2Tag {
    /// The four byte tag
    pub fn tag(self) -> [u8; 4] {
        match self {
            Tm2Tag::Palette => *b"PLI\0",
            Tm2Tag::Null => *b"NULL",
            Tm2Tag::Texture => *b"TIM2",
        }
    }

    /// Look up a tag, `None` for tags outside of the format
    pub fn from_tag(tag: &[u8]) -> Option<Tm2Tag> {
        [Tm2Tag::Palette, Tm2Tag::Null, Tm2Tag::Texture]
            .into_iter()
            .find(|kind| kind.tag() == tag)
    }
}

/// One item in the metadata file
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "Kind", rename_all_fields = "PascalCase")]
pub enum Tm2Item {
    /// Palette stored in `NNNN.PLI`
    Palette {
        /// Side file name
        file_name: String,
        /// Size of the palette chunk
        size: u64,
    },
    /// Null texture kept inline
    Null {
        /// The stub, base64
        data: String,
    },
    /// TIM2 file stored in `NNNN.TM2`
    Texture {
        /// Side file name
        file_name: String,
        /// Size of the TIM2 file
        size: u64,
    },
}

/// Everything needed to rebuild a TM2 bundle
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct Tm2Metadata {
    /// Items in bundle order
    pub items: Vec<Tm2Item>,
    /// The sentinel and anything after it, base64
    pub final_chunk: String,
}

/// Little-endian u32 at `at` of the `[start, end)` window
fn u32_at<R: Read + Seek>(reader: &mut R, start: u64, end: u64, at: u64) -> Result<u32> {
    if start + at + 4 > end {
        return Err(OutOfBounds {
            start,
            len: end - start,
            offset: at + 4,
        }
        .into());
    }
    reader.seek(SeekFrom::Start(start + at))?;
    Ok(reader.read_u32::<LittleEndian>()?)
}

/// Length of the item at `offset` of the `[start, end)` window.
///
/// A TIM2 file is its 0x10 byte header followed by as many pictures as the u16 at +0x06
/// says, each picture starting with its own total size.
fn item_len<R: Read + Seek>(
    reader: &mut R,
    kind: Tm2Tag,
    start: u64,
    end: u64,
    offset: u64,
) -> Result<u64> {
    Ok(match kind {
        Tm2Tag::Palette => 8 + u64::from(u32_at(reader, start, end, offset + 4)?),
        Tm2Tag::Null => NULL_LEN,
        Tm2Tag::Texture => {
            let count = u32_at(reader, start, end, offset + 4)? >> 16;
            let mut len = TIM2_HEADER_LEN;
            for _ in 0..count {
                len += u64::from(u32_at(reader, start, end, offset + len)?);
            }
            len
        }
    })
}

/// Split the TM2 bundle filling `reader` into `NNNN.PLI` and `NNNN.TM2` side files.
#[instrument(skip_all, err)]
pub fn extract<R: Read + Seek>(
    reader: &mut R,
    files: &mut dyn SideFiles,
    sink: &mut dyn Diagnostics,
) -> Result<Tm2Metadata> {
    let start = reader.stream_position()?;
    let window = reader.seek(SeekFrom::End(0))? - start;

    let mut metadata = Tm2Metadata::default();
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

        let kind = Tm2Tag::from_tag(&tag).ok_or_else(|| Error::InvalidData {
            tag: tag.escape_ascii().to_string(),
            offset,
        })?;
        let len = item_len(reader, kind, start, start + window, offset)?;
        if offset + len > window {
            return Err(OutOfBounds {
                start,
                len: window,
                offset: offset + len,
            }
            .into());
        }

        reader.seek(SeekFrom::Start(start + offset))?;
        let data = read_vec(reader, len as usize)?;
        debug!(%kind, len, "item at {offset:#x}");

        let index = metadata.items.len();
        let item = match kind {
            Tm2Tag::Palette | Tm2Tag::Texture => {
                let extension = if kind == Tm2Tag::Palette { "PLI" } else { "TM2" };
                let file_name = side_file_name(index, extension);
                files.write(&file_name, &data)?;

                if kind == Tm2Tag::Palette {
                    Tm2Item::Palette {
                        file_name,
                        size: len,
                    }
                } else {
                    Tm2Item::Texture {
                        file_name,
                        size: len,
                    }
                }
            }
            Tm2Tag::Null => Tm2Item::Null {
                data: BASE64.encode(&data),
            },
        };

        metadata.items.push(item);
        offset += len;
    }

    Ok(metadata)
}

/// Rebuild a TM2 bundle from its metadata and side files, returns the bytes written.
#[instrument(skip_all, fields(items = metadata.items.len()), err)]
pub fn insert<W: Write + Seek>(
    writer: &mut W,
    metadata: &Tm2Metadata,
    files: &dyn SideFiles,
) -> Result<u64> {
    let mut written = 0u64;

    for item in &metadata.items {
        let data = match item {
            Tm2Item::Palette { file_name, size } | Tm2Item::Texture { file_name, size } => {
                let data = files.read(file_name)?;
                if data.len() as u64 != *size {
                    return Err(Error::size_mismatch(*size, data.len() as u64, file_name));
                }
                data
            }
            Tm2Item::Null { data } => BASE64.decode(data)?,
        };

        writer.write_all(&data)?;
        written += data.len() as u64;
    }

    let final_chunk = BASE64.decode(&metadata.final_chunk)?;
    writer.write_all(&final_chunk)?;
    written += final_chunk.len() as u64;

    Ok(written)
}
