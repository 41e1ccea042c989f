//! Encoding text blocks

use std::io::{Cursor, Seek, Write};

use binrw::{BinWrite, Endian};
use byteorder::{LittleEndian, WriteBytesExt};
use rdx_io::Diagnostics;
use tracing::{instrument, trace};

use crate::{
    document,
    error::{Error, Result},
    table::CodeTable,
    types::{run_codes, TextBlock, Token, BLOCK_END},
};

impl TextBlock {
    /// Encode every run through `table` and write the block at the current position.
    ///
    /// Runs are laid out back to back in declared order, followed by the block terminator.
    #[instrument(skip_all, fields(runs = self.len()), err)]
    pub fn write<W: Write + Seek>(
        &self,
        writer: &mut W,
        endian: Endian,
        table: &CodeTable,
        sink: &mut dyn Diagnostics,
    ) -> Result<()> {
        let runs = self
            .iter()
            .map(|run| table.tokenize(run, sink))
            .collect::<Result<Vec<_>>>()?;
        write_runs(writer, endian, &runs)
    }

    /// Encode the block into a new buffer
    pub fn to_bytes(
        &self,
        endian: Endian,
        table: &CodeTable,
        sink: &mut dyn Diagnostics,
    ) -> Result<Vec<u8>> {
        let mut writer = Cursor::new(Vec::new());
        self.write(&mut writer, endian, table, sink)?;
        Ok(writer.into_inner())
    }
}

/// Write the pointer table, the runs and the block terminator
pub fn write_runs<W: Write + Seek>(writer: &mut W, endian: Endian, runs: &[Vec<Token>]) -> Result<()> {
    let codes: Vec<Vec<u16>> = runs.iter().map(|run| run_codes(run)).collect();

    let count = codes.len() as u32;
    count.write_options(writer, endian, ())?;

    let mut pointer = 4 + 4 * count;
    for run in &codes {
        pointer.write_options(writer, endian, ())?;
        pointer += 2 * run.len() as u32;
    }
    trace!("{count} runs, {pointer:#x} bytes before the terminator");

    for code in codes.iter().flatten() {
        writer.write_u16::<LittleEndian>(*code)?;
    }
    writer.write_u16::<LittleEndian>(BLOCK_END)?;

    Ok(())
}

/// Encode the document form of a single block
pub fn encode_block(
    text: &str,
    endian: Endian,
    table: &CodeTable,
    sink: &mut dyn Diagnostics,
) -> Result<Vec<u8>> {
    let mut blocks = document::parse_document(text)?;
    if blocks.len() != 1 {
        return Err(Error::MalformedDocument {
            block: blocks.len().min(1),
            reason: "expected exactly one block",
        });
    }

    let block = blocks.remove(0);
    block.to_bytes(endian, table, sink)
}
