//! Types for patching RDX resource files
//!

use std::io::{self, Cursor, Read, Seek, SeekFrom, Write};

use binrw::{BinWrite, Endian};
use rdx_io::{
    align_up, read_json, read_vec, CollectedDiagnostics, Diagnostics, OutOfBounds,
    ScopedSideFiles, SideFiles,
};
use rdx_text::{document, CodeTable, TextBlock};
use tracing::{debug, info, instrument, trace};

use crate::{
    error::{Error, Result},
    read::RdxArchive,
    types::{TextureIndex, TEXTURE_INDEX_FILE, TEXT_ALIGNMENT},
    variant::Language,
};

/// Where [`RdxArchive::insert_text`] put the new text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// The text did not change, nothing was written
    Unchanged,
    /// The text fit the old sub-block and was written over it
    InPlace,
    /// The text took the place of the texture block, which moved behind it
    Relocated {
        /// New offset of the text
        text: u64,
        /// New offset of the texture block
        textures: u64,
    },
    /// The text was written to the end of the file
    Appended {
        /// New offset of the text
        text: u64,
    },
}

fn write_zeros<W: Write>(writer: &mut W, len: u64) -> io::Result<()> {
    io::copy(&mut io::repeat(0).take(len), writer)?;
    Ok(())
}

fn pointer(value: u64) -> Result<u32> {
    u32::try_from(value).map_err(|_| Error::FileTooLarge { size: value })
}

impl<R: Read + Write + Seek> RdxArchive<R> {
    /// Replace the text of `language`.
    ///
    /// Text that fits the old sub-block is written over it and zero padded. Longer text is
    /// moved to where the texture block starts and the texture block is moved behind it,
    /// aligned to 0x20 bytes, with every pointer into it adjusted. Without a texture block
    /// behind the sub-block the text is appended to the file instead.
    #[instrument(skip(self, block, table, sink), err)]
    pub fn insert_text(
        &mut self,
        language: Language,
        block: &TextBlock,
        table: &CodeTable,
        sink: &mut dyn Diagnostics,
    ) -> Result<Placement> {
        let index = self.sub_block_index(language)?;

        let mut quiet = CollectedDiagnostics::new();
        if self.text(language, table, &mut quiet)?.as_ref() == Some(block) {
            trace!("{language} text is unchanged");
            return Ok(Placement::Unchanged);
        }

        let endian = self.endian();
        let data = block.to_bytes(endian, table, sink)?;
        let len = data.len() as u64;

        let start = u64::from(self.sub_blocks[index]);
        let span = if start == 0 { 0 } else { self.span(start) };
        debug!(index, start, span, len, "inserting {language} text");

        if len <= span {
            self.reader.seek(SeekFrom::Start(start))?;
            self.reader.write_all(&data)?;
            write_zeros(&mut self.reader, span - len)?;
            return Ok(Placement::InPlace);
        }

        if start != 0 {
            self.reader.seek(SeekFrom::Start(start))?;
            write_zeros(&mut self.reader, span)?;
        }

        let textures = u64::from(self.header.texture_block);
        let placement = if textures != 0 && textures > start {
            self.relocate(index, &data, endian)?
        } else {
            let text = align_up(self.len, TEXT_ALIGNMENT);
            let end = text + len;
            self.sub_blocks[index] = pointer(text)?;
            pointer(end)?;

            self.reader.seek(SeekFrom::Start(self.len))?;
            write_zeros(&mut self.reader, text - self.len)?;
            self.reader.write_all(&data)?;
            self.len = end;

            Placement::Appended { text }
        };

        self.write_tables(endian)?;
        info!(?placement, "{language} text did not fit its sub-block");
        Ok(placement)
    }

    /// Write the text at the start of the texture block and move the texture block behind it
    fn relocate(&mut self, index: usize, data: &[u8], endian: Endian) -> Result<Placement> {
        let pointers = self.texture_pointers()?;
        let old = u64::from(self.header.texture_block);
        let new = align_up(old + data.len() as u64, TEXT_ALIGNMENT);
        let delta = new - old;

        self.reader.seek(SeekFrom::Start(old))?;
        let mut moved = Cursor::new(read_vec(&mut self.reader, (self.len - old) as usize)?);
        pointer(new + moved.get_ref().len() as u64)?;

        moved.seek(SeekFrom::Start(4))?;
        for value in &pointers {
            let value = match *value {
                0 => 0,
                value => pointer(u64::from(value) + delta)?,
            };
            value.write_options(&mut moved, endian, ())?;
        }
        trace!(count = pointers.len(), delta, "patched texture pointers");

        self.reader.seek(SeekFrom::Start(old))?;
        self.reader.write_all(data)?;
        write_zeros(&mut self.reader, new - old - data.len() as u64)?;
        self.reader.write_all(moved.get_ref())?;
        self.len = new + moved.get_ref().len() as u64;

        let shift = |value: &mut u32| -> Result<()> {
            if u64::from(*value) >= old {
                *value = pointer(u64::from(*value) + delta)?;
            }
            Ok(())
        };
        for value in self.header.unknown_blocks.iter_mut() {
            shift(value)?;
        }
        for (other, value) in self.sub_blocks.iter_mut().enumerate() {
            if other != index {
                shift(value)?;
            }
        }

        self.sub_blocks[index] = pointer(old)?;
        self.header.texture_block = pointer(new)?;

        Ok(Placement::Relocated {
            text: old,
            textures: new,
        })
    }

    fn write_tables(&mut self, endian: Endian) -> Result<()> {
        self.reader.seek(SeekFrom::Start(0))?;
        self.header.write_options(&mut self.reader, endian, ())?;

        self.reader
            .seek(SeekFrom::Start(u64::from(self.header.text_block)))?;
        for value in &self.sub_blocks {
            value.write_options(&mut self.reader, endian, ())?;
        }

        Ok(())
    }

    /// Rebuild every texture listed in `textures/textures.json` and write it over the current
    /// one, returns the number of textures written.
    ///
    /// Rebuilt textures must have the exact size recorded during extraction.
    #[instrument(skip_all, err)]
    pub fn insert_textures(&mut self, files: &dyn SideFiles) -> Result<usize> {
        let index: TextureIndex = read_json(files, TEXTURE_INDEX_FILE)?;
        let pointers = self.texture_pointers()?;
        if index.textures.len() != pointers.len() {
            return Err(Error::TextureCountMismatch {
                expected: index.textures.len(),
                actual: pointers.len(),
            });
        }

        let format = self.variant.textures;
        let mut written = 0;

        for (position, (entry, start)) in index.textures.iter().zip(pointers).enumerate() {
            let Some(entry) = entry else {
                continue;
            };

            let scoped = ScopedSideFiles::shared(files, format!("textures/{}", entry.directory));
            let mut rebuilt = Cursor::new(Vec::new());
            rdx_texture::insert_from_side_files(&mut rebuilt, format, &scoped)?;
            let data = rebuilt.into_inner();

            let start = u64::from(start);
            if start == 0 || data.len() as u64 != entry.size {
                return Err(Error::SizeMismatch {
                    index: position,
                    expected: entry.size,
                    actual: if start == 0 { 0 } else { data.len() as u64 },
                });
            }
            if start + entry.size > self.len {
                return Err(OutOfBounds {
                    start: 0,
                    len: self.len,
                    offset: start + entry.size,
                }
                .into());
            }

            debug!(%format, "texture {position} at {start:#x}, {:#x} bytes", data.len());
            self.reader.seek(SeekFrom::Start(start))?;
            self.reader.write_all(&data)?;
            written += 1;
        }

        Ok(written)
    }

    /// Insert every `text/<language>.txt` and the textures found in `files`.
    ///
    /// Returns where the text of each language went, textures are inserted after the text
    /// so they land at their final offsets.
    #[instrument(skip_all, err)]
    pub fn insert_from_side_files(
        &mut self,
        files: &dyn SideFiles,
        table: Option<&CodeTable>,
        sink: &mut dyn Diagnostics,
    ) -> Result<Vec<(Language, Placement)>> {
        let mut placements = Vec::new();

        let languages: Vec<Language> = self.variant.languages().collect();
        for language in languages {
            let name = language.file_name();
            if !files.contains(&name) {
                continue;
            }

            let table = table.ok_or(Error::TableRequired)?;
            let text = files.read(&name)?;
            let text = String::from_utf8(text).map_err(|source| Error::InvalidUtf8 {
                name: name.clone(),
                source,
            })?;
            let mut blocks = document::parse_document(&text)?;
            if blocks.len() != 1 {
                return Err(rdx_text::error::Error::MalformedDocument {
                    block: blocks.len().min(1),
                    reason: "expected exactly one block",
                }
                .into());
            }

            let block = blocks.remove(0);
            let placement = self.insert_text(language, &block, table, sink)?;
            placements.push((language, placement));
        }

        if files.contains(TEXTURE_INDEX_FILE) {
            self.insert_textures(files)?;
        }

        Ok(placements)
    }
}
