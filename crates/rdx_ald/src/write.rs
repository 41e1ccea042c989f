//! Types for writing ALD containers
//!

use std::io::{Seek, Write};

use binrw::{BinWrite, Endian};
use rdx_io::{read_json, CollectedDiagnostics, Diagnostics, SideFiles};
use rdx_text::{decode_block, document::parse_document, encode_block, CodeTable};
use tracing::{debug, instrument, trace};

use crate::{
    error::{Error, Result},
    types::{AldBlockMetadata, AldEntry, AldMetadata, BlockHeader, METADATA_FILE, SENTINEL, WIDE_FLAG},
};

/// ALD container generator
///
/// ```
/// use std::io::Cursor;
/// use binrw::Endian;
/// use rdx_ald::{types::AldEntry, AldWriter};
///
/// let mut out = Cursor::new(Vec::new());
/// AldWriter::insert(&mut out, Endian::Little, 1, |_| {
///     Ok(AldEntry {
///         data: vec![0xAA, 0xBB],
///         ..Default::default()
///     })
/// })?;
///
/// assert_eq!(out.into_inner(), vec![0x02, 0x00, 0x00, 0x00, 0xAA, 0xBB, 0xFF, 0xFF]);
/// # Ok::<(), rdx_ald::error::Error>(())
/// ```
pub struct AldWriter;

impl AldWriter {
    /// Write `count` blocks produced by `entry`, followed by the sentinel.
    #[instrument(skip(writer, entry), err)]
    pub fn insert<W, F>(writer: &mut W, endian: Endian, count: usize, mut entry: F) -> Result<()>
    where
        W: Write + Seek,
        F: FnMut(usize) -> Result<AldEntry>,
    {
        for index in 0..count {
            let AldEntry {
                data,
                wide,
                reserved,
            } = entry(index)?;

            let size = u32::try_from(data.len())
                .ok()
                .filter(|size| size & WIDE_FLAG == 0)
                .ok_or(Error::BlockTooLarge {
                    index,
                    size: data.len(),
                })?;

            debug!(index, size, wide, "writing block");
            BlockHeader::new(size, wide.then_some(reserved)).write_options(writer, endian, ())?;
            writer.write_all(&data)?;
        }

        writer.write_all(&SENTINEL.to_le_bytes())?;
        Ok(())
    }
}

/// Rebuild a container from the side files listed in `ald.json`.
///
/// `NNNN.txt` files are encoded as text blocks and need the table used for extraction. Text
/// that still reads the same as its recorded source block keeps the source bytes.
#[instrument(skip_all, err)]
pub fn insert_from_side_files<W: Write + Seek>(
    writer: &mut W,
    endian: Endian,
    files: &dyn SideFiles,
    table: Option<&CodeTable>,
    sink: &mut dyn Diagnostics,
) -> Result<AldMetadata> {
    let metadata: AldMetadata = read_json(files, METADATA_FILE)?;

    AldWriter::insert(writer, endian, metadata.blocks.len(), |index| {
        let block = &metadata.blocks[index];
        let raw = files.read(&block.file_name)?;

        let data = if block.file_name.ends_with(".txt") {
            let table = table.ok_or_else(|| Error::TableRequired {
                name: block.file_name.clone(),
            })?;
            let text = String::from_utf8(raw).map_err(|source| Error::InvalidUtf8 {
                name: block.file_name.clone(),
                source,
            })?;

            match unedited_source(files, block, &text, endian, table)? {
                Some(source) => source,
                None => encode_block(&text, endian, table, sink)?,
            }
        } else {
            raw
        };

        Ok(AldEntry {
            data,
            wide: block.is_wide,
            reserved: block.reserved.unwrap_or_default(),
        })
    })?;

    Ok(metadata)
}

/// The recorded source bytes of a text block, when they still decode to `text`
fn unedited_source(
    files: &dyn SideFiles,
    block: &AldBlockMetadata,
    text: &str,
    endian: Endian,
    table: &CodeTable,
) -> Result<Option<Vec<u8>>> {
    let Some(name) = block.source_file.as_deref() else {
        return Ok(None);
    };
    if !files.contains(name) {
        return Ok(None);
    }

    let source = files.read(name)?;
    let mut quiet = CollectedDiagnostics::new();
    let Ok(decoded) = decode_block(&source, endian, table, &mut quiet) else {
        return Ok(None);
    };

    if parse_document(&decoded)? == parse_document(text)? {
        trace!("{} is unchanged", block.file_name);
        Ok(Some(source))
    } else {
        Ok(None)
    }
}

#[cfg(test)]
mod test {
    use std::io::Cursor;

    use pretty_assertions::assert_str_eq;

    use super::*;

    #[test]
    fn wide_blocks_keep_reserved_bytes() -> Result<()> {
        let entries = [
            AldEntry {
                data: vec![0x11],
                ..Default::default()
            },
            AldEntry {
                data: vec![0x22, 0x33],
                wide: true,
                reserved: [1, 2, 3, 4],
            },
        ];

        let mut out = Cursor::new(Vec::new());
        AldWriter::insert(&mut out, Endian::Big, entries.len(), |index| {
            Ok(entries[index].clone())
        })?;

        #[rustfmt::skip]
        let expected = vec![
            0x00, 0x00, 0x00, 0x01, 0x11,
            0x80, 0x00, 0x00, 0x02, 0x01, 0x02, 0x03, 0x04, 0x22, 0x33,
            0xFF, 0xFF,
        ];
        assert_str_eq!(
            format!("{:02X?}", out.into_inner()),
            format!("{:02X?}", expected)
        );

        Ok(())
    }

    #[test]
    fn empty_container_is_just_the_sentinel() -> Result<()> {
        let mut out = Cursor::new(Vec::new());
        AldWriter::insert(&mut out, Endian::Little, 0, |_| unreachable!())?;

        assert_eq!(out.into_inner(), vec![0xFF, 0xFF]);

        Ok(())
    }
}
