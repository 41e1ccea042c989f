//! Decoding text blocks

use std::io::{self, Cursor, Read, Seek, SeekFrom};

use binrw::{BinRead, Endian};
use byteorder::{LittleEndian, ReadBytesExt};
use rdx_io::{Diagnostics, OutOfBounds, Warning};
use tracing::{instrument, trace};

use crate::{
    document,
    error::{Error, Result},
    table::CodeTable,
    types::{Token, TextBlock, BLOCK_END, ITEM_CODE, TEXT_END, TIME_CODE},
};

impl TextBlock {
    /// Read and render the text block starting at the current position of `reader`.
    ///
    /// The block extends to the end of `reader`, so pass a [`rdx_io::SubStream`] when the
    /// block is embedded in a bigger file.
    ///
    /// ```
    /// use std::io::Cursor;
    /// use binrw::Endian;
    /// use rdx_io::CollectedDiagnostics;
    /// use rdx_text::{CodeTable, TextBlock};
    ///
    /// let table = CodeTable::parse("4100=A\n4200=B");
    /// #[rustfmt::skip]
    /// let data = [
    ///     0x01, 0x00, 0x00, 0x00,
    ///     0x08, 0x00, 0x00, 0x00,
    ///     0x41, 0x00, 0x42, 0x00, 0xFF, 0xFF,
    ///     0xFE, 0xFF,
    /// ];
    ///
    /// let mut sink = CollectedDiagnostics::new();
    /// let block = TextBlock::read(&mut Cursor::new(data), Endian::Little, &table, &mut sink)?;
    /// assert_eq!(block.into_inner(), vec!["AB".to_owned()]);
    /// # Ok::<(), rdx_text::error::Error>(())
    /// ```
    #[instrument(skip_all, err)]
    pub fn read<R: Read + Seek>(
        reader: &mut R,
        endian: Endian,
        table: &CodeTable,
        sink: &mut dyn Diagnostics,
    ) -> Result<TextBlock> {
        let runs = read_runs(reader, endian, sink)?;
        Ok(runs
            .iter()
            .map(|run| {
                let mut text = String::with_capacity(run.len());
                for token in run {
                    table.render(*token, &mut text, sink);
                }
                text
            })
            .collect())
    }
}

/// Read the pointer table and every run of a block as tokens
pub fn read_runs<R: Read + Seek>(
    reader: &mut R,
    endian: Endian,
    sink: &mut dyn Diagnostics,
) -> Result<Vec<Vec<Token>>> {
    let start = reader.stream_position()?;
    let len = reader.seek(SeekFrom::End(0))? - start;
    reader.seek(SeekFrom::Start(start))?;

    let count = u32::read_options(reader, endian, ())?;
    let header_len = 4 + 4 * u64::from(count);
    if header_len > len {
        return Err(OutOfBounds {
            start,
            len,
            offset: header_len,
        }
        .into());
    }

    let mut pointers = Vec::with_capacity(count as usize);
    for _ in 0..count {
        pointers.push(u32::read_options(reader, endian, ())?);
    }
    trace!("{count} runs, pointers {pointers:X?}");

    let mut runs = Vec::with_capacity(pointers.len());
    let mut last_end = header_len;
    for (index, pointer) in pointers.into_iter().enumerate() {
        let pointer = u64::from(pointer);
        if pointer >= len {
            return Err(OutOfBounds {
                start,
                len,
                offset: pointer,
            }
            .into());
        }

        reader.seek(SeekFrom::Start(start + pointer))?;
        runs.push(read_run(reader, index, start, sink)?);
        last_end = last_end.max(reader.stream_position()? - start);
    }

    reader.seek(SeekFrom::Start(start + last_end))?;
    match read_code(reader)? {
        Some(BLOCK_END) | Some(0) => {}
        found => sink.warning(Warning::BlockTerminator {
            found,
            offset: last_end,
        }),
    }

    Ok(runs)
}

fn read_run<R: Read + Seek>(
    reader: &mut R,
    index: usize,
    start: u64,
    sink: &mut dyn Diagnostics,
) -> Result<Vec<Token>> {
    let mut run = Vec::new();
    let next = |reader: &mut R| -> Result<u16> {
        read_code(reader)?.ok_or(Error::UnterminatedRun { run: index })
    };

    loop {
        let token = match next(reader)? {
            TEXT_END => return Ok(run),
            control @ (TIME_CODE | ITEM_CODE) => {
                let offset = reader.stream_position()? - start;
                let value = next(reader)?;
                if value == TEXT_END {
                    sink.warning(Warning::TerminatorInParameter { run: index, offset });
                }

                match (control, value) {
                    (TIME_CODE, 0) => Token::Page,
                    (TIME_CODE, value) => Token::Time(value),
                    (_, value) => Token::Item(value),
                }
            }
            code => Token::Code(code),
        };
        run.push(token);
    }
}

/// Next little-endian code unit, `None` at the end of the stream or window
fn read_code<R: Read>(reader: &mut R) -> io::Result<Option<u16>> {
    match reader.read_u16::<LittleEndian>() {
        Ok(code) => Ok(Some(code)),
        Err(error)
            if error.kind() == io::ErrorKind::UnexpectedEof
                || OutOfBounds::from_io(&error).is_some() =>
        {
            Ok(None)
        }
        Err(error) => Err(error),
    }
}

/// Decode a whole block held in memory into its document form
pub fn decode_block(
    bytes: &[u8],
    endian: Endian,
    table: &CodeTable,
    sink: &mut dyn Diagnostics,
) -> Result<String> {
    let block = TextBlock::read(&mut Cursor::new(bytes), endian, table, sink)?;
    let mut text = String::new();
    document::render_block(&block, &mut text);
    Ok(text)
}
