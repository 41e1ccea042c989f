//! Types for reading ALD containers
//!

use std::io::{Read, Seek, SeekFrom};

use binrw::{BinRead, Endian};
use rdx_io::{
    read_vec, side_file_name, write_json, Diagnostics, OutOfBounds, SideFiles, SubStream, Warning,
};
use rdx_text::{decode_block, CodeTable};
use tracing::{debug, instrument, trace};

use crate::{
    error::Result,
    types::{AldBlockMetadata, AldMetadata, BlockHeader, BlockInfo, METADATA_FILE, SENTINEL},
};

/// ALD container reader
///
/// Walks the blocks one at a time, every block is handed out as a window over its payload.
///
/// ```
/// use std::io::{Cursor, Read};
/// use binrw::Endian;
/// use rdx_ald::AldReader;
/// use rdx_io::CollectedDiagnostics;
///
/// # fn doit() -> rdx_ald::error::Result<()> {
/// #[rustfmt::skip]
/// let mut data = Cursor::new(vec![
///     0x02, 0x00, 0x00, 0x00, 0xAA, 0xBB,
///     0xFF, 0xFF,
/// ]);
///
/// let mut ald = AldReader::new(&mut data, Endian::Little)?;
/// let mut sink = CollectedDiagnostics::new();
/// while let Some((info, mut block)) = ald.next_block(&mut sink)? {
///     let mut payload = Vec::new();
///     block.read_to_end(&mut payload)?;
///     assert_eq!(info.index, 0);
///     assert_eq!(payload, vec![0xAA, 0xBB]);
/// }
/// assert_eq!(ald.len(), 1);
/// # Ok(())
/// # }
/// # doit().unwrap();
/// ```
pub struct AldReader<'a, R: Read + Seek> {
    reader: &'a mut R,
    endian: Endian,
    start: u64,
    end: u64,
    next: u64,
    index: usize,
    done: bool,
}

impl<'a, R: Read + Seek> AldReader<'a, R> {
    /// Start reading blocks at the current position, up to the end of `reader`.
    pub fn new(reader: &'a mut R, endian: Endian) -> Result<Self> {
        let start = reader.stream_position()?;
        let end = reader.seek(SeekFrom::End(0))?;
        reader.seek(SeekFrom::Start(start))?;

        Ok(AldReader {
            reader,
            endian,
            start,
            end,
            next: start,
            index: 0,
            done: false,
        })
    }

    /// Number of blocks handed out so far
    pub fn len(&self) -> usize {
        self.index
    }

    /// Whether no block was handed out yet
    pub fn is_empty(&self) -> bool {
        self.index == 0
    }

    /// Read the next block header and open a window over its payload.
    ///
    /// Returns `None` at the `0xFFFF` sentinel or when less than 2 bytes are left.
    pub fn next_block(
        &mut self,
        sink: &mut dyn Diagnostics,
    ) -> Result<Option<(BlockInfo, SubStream<'_, R>)>> {
        if self.done {
            return Ok(None);
        }

        let position = self.next;
        let remaining = self.end - position;
        let offset = position - self.start;
        self.reader.seek(SeekFrom::Start(position))?;

        if remaining < 2 {
            self.done = true;
            match remaining {
                0 => sink.warning(Warning::MissingSentinel { offset }),
                len => sink.warning(Warning::TrailingBytes { offset, len }),
            }
            return Ok(None);
        }

        let mut marker = [0u8; 2];
        self.reader.read_exact(&mut marker)?;
        if u16::from_le_bytes(marker) == SENTINEL {
            trace!("sentinel at {offset:#x}");
            self.done = true;
            return Ok(None);
        }

        if remaining < 4 {
            self.done = true;
            sink.warning(Warning::TrailingBytes {
                offset,
                len: remaining,
            });
            return Ok(None);
        }

        self.reader.seek(SeekFrom::Start(position))?;
        let header = BlockHeader::read_options(self.reader, self.endian, ())?;
        let payload = position + header.encoded_len();
        let size = u64::from(header.size());
        if payload + size > self.end {
            return Err(OutOfBounds {
                start: self.start,
                len: self.end - self.start,
                offset: payload + size - self.start,
            }
            .into());
        }

        let info = BlockInfo {
            index: self.index,
            size: header.size(),
            wide: header.is_wide(),
            reserved: header.reserved.unwrap_or_default(),
        };
        debug!(index = info.index, size, wide = info.wide, "block at {offset:#x}");

        self.index += 1;
        self.next = payload + size;
        let window = SubStream::new(&mut *self.reader, payload, size)?;
        Ok(Some((info, window)))
    }

    /// Hand every block to `handler` and return the number of blocks.
    #[instrument(skip_all, err)]
    pub fn extract<F>(
        reader: &'a mut R,
        endian: Endian,
        sink: &mut dyn Diagnostics,
        mut handler: F,
    ) -> Result<usize>
    where
        F: FnMut(&mut SubStream<'_, R>, BlockInfo) -> Result<()>,
    {
        let mut ald = AldReader::new(reader, endian)?;
        while let Some((info, mut block)) = ald.next_block(sink)? {
            handler(&mut block, info)?;
        }

        Ok(ald.len())
    }
}

/// Extract every block as `NNNN.bin` and record the layout in `ald.json`.
///
/// With a code table every block is also decoded as a text block into `NNNN.txt`, which is
/// the file inserted back. The `NNNN.bin` copy is then only used for unedited text.
#[instrument(skip_all, err)]
pub fn extract_to_side_files<R: Read + Seek>(
    reader: &mut R,
    endian: Endian,
    files: &mut dyn SideFiles,
    table: Option<&CodeTable>,
    sink: &mut dyn Diagnostics,
) -> Result<AldMetadata> {
    let mut ald = AldReader::new(reader, endian)?;
    let mut metadata = AldMetadata::default();

    while let Some((info, mut block)) = ald.next_block(sink)? {
        let data = read_vec(&mut block, info.size as usize)?;
        drop(block);

        let source = side_file_name(info.index, "bin");
        files.write(&source, &data)?;

        let (file_name, source_file) = match table {
            Some(table) => {
                let name = side_file_name(info.index, "txt");
                let text = decode_block(&data, endian, table, sink)?;
                files.write(&name, text.as_bytes())?;
                (name, Some(source))
            }
            None => (source, None),
        };

        metadata.blocks.push(AldBlockMetadata {
            file_name,
            is_wide: info.wide,
            reserved: info.wide.then_some(info.reserved),
            source_file,
        });
    }

    write_json(files, METADATA_FILE, &metadata)?;
    Ok(metadata)
}
