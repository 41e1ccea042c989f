//! Types for reading RDX resource files
//!

use std::{
    borrow::Cow,
    fmt::{self, Debug},
    io::{Read, Seek, SeekFrom},
};

use binrw::{BinRead, Endian};
use bon::Builder;
use rdx_io::{write_json, Diagnostics, OutOfBounds, ScopedSideFiles, SideFiles, SubStream};
use rdx_text::{document, CodeTable, TextBlock};
use tracing::{debug, instrument, trace};

use crate::{
    error::{Error, Result},
    types::{RdxHeader, TextureEntry, TextureIndex, HEADER_LEN, TEXTURE_INDEX_FILE},
    variant::{Language, Platform, Variant},
};

/// Options for what [`RdxArchive::extract_to_side_files`] writes
#[derive(Debug, Clone, Builder)]
pub struct RdxExtractOptions {
    /// Write `text/<language>.txt` for the selected languages
    #[builder(default = true)]
    pub text: bool,

    /// Write every texture container below `textures/`
    #[builder(default = true)]
    pub textures: bool,

    /// Languages to extract, every language of the platform when unset
    pub languages: Option<Vec<Language>>,
}

impl Default for RdxExtractOptions {
    fn default() -> Self {
        RdxExtractOptions::builder().build()
    }
}

/// RDX resource file
///
/// ```
/// use std::io::Cursor;
/// use rdx_resource::{Platform, RdxArchive};
///
/// let mut data = vec![0u8; 0x38 + 14 * 4];
/// data[0] = 0x04;
/// data[4] = 0x38;
///
/// let rdx = RdxArchive::new(Cursor::new(data), Platform::Dreamcast)?;
/// assert_eq!(rdx.header().text_block, 0x38);
/// assert_eq!(rdx.languages().count(), 0);
/// # Ok::<(), rdx_resource::error::Error>(())
/// ```
pub struct RdxArchive<R> {
    pub(crate) reader: R,
    pub(crate) variant: &'static Variant,
    pub(crate) header: RdxHeader,
    pub(crate) sub_blocks: Vec<u32>,
    pub(crate) len: u64,
}

impl<R> Debug for RdxArchive<R> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("RdxArchive")
            .field("platform", &self.variant.platform)
            .field("header", &self.header)
            .field("sub_blocks", &self.sub_blocks)
            .field("len", &self.len)
            .finish()
    }
}

impl<R> RdxArchive<R> {
    /// The parsed header
    pub fn header(&self) -> &RdxHeader {
        &self.header
    }

    /// Layout of the platform the file was opened as
    pub fn variant(&self) -> &'static Variant {
        self.variant
    }

    /// Size of the whole file
    pub fn len(&self) -> u64 {
        self.len
    }

    /// Whether the file has no bytes at all, never true for an opened file
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The author field up to the first zero byte
    pub fn author_name(&self) -> Cow<'_, str> {
        let end = self
            .header
            .author
            .iter()
            .position(|byte| *byte == 0)
            .unwrap_or(self.header.author.len());
        String::from_utf8_lossy(&self.header.author[..end])
    }

    /// Languages that have text in this file
    pub fn languages(&self) -> impl Iterator<Item = Language> + '_ {
        self.variant
            .languages
            .iter()
            .filter(|(_, index)| self.sub_blocks.get(*index).is_some_and(|pointer| *pointer != 0))
            .map(|(language, _)| *language)
    }

    /// Raw values of the language sub-block pointer table
    pub fn sub_block_pointers(&self) -> &[u32] {
        &self.sub_blocks
    }

    /// Unwrap the underlying stream
    pub fn into_inner(self) -> R {
        self.reader
    }

    pub(crate) fn endian(&self) -> Endian {
        self.variant.endian
    }

    pub(crate) fn sub_block_index(&self, language: Language) -> Result<usize> {
        self.variant
            .sub_block(language)
            .ok_or(Error::UnsupportedLanguage {
                platform: self.variant.platform,
                language,
            })
    }

    /// Bytes available to the block starting at `start`
    ///
    /// A block runs up to the closest sub-block or top-level pointer behind it, the last one
    /// runs to the end of the file.
    pub(crate) fn span(&self, start: u64) -> u64 {
        let end = self
            .sub_blocks
            .iter()
            .chain(self.header.block_pointers().iter())
            .map(|pointer| u64::from(*pointer))
            .filter(|pointer| *pointer > start)
            .min()
            .unwrap_or(self.len);
        end.max(start) - start
    }
}

impl<R: Read + Seek> RdxArchive<R> {
    /// Open a resource file of the given platform.
    ///
    /// A file with a magic number of another platform fails with
    /// [`Error::NotAValidContainer`], see [`Error::is_fatal`].
    #[instrument(skip(reader), err)]
    pub fn new(mut reader: R, platform: Platform) -> Result<RdxArchive<R>> {
        let variant = platform.variant();
        let len = reader.seek(SeekFrom::End(0))?;
        reader.seek(SeekFrom::Start(0))?;

        let magic = u32::read_options(&mut reader, variant.endian, ())?;
        if !variant.accepts(magic) {
            return Err(Error::NotAValidContainer { platform, magic });
        }

        reader.seek(SeekFrom::Start(0))?;
        let header = RdxHeader::read_options(&mut reader, variant.endian, ())?;
        trace!(?header);

        let table_start = u64::from(header.text_block);
        let table_end = table_start + 4 * variant.sub_blocks as u64;
        if table_start < HEADER_LEN || table_end > len {
            return Err(OutOfBounds {
                start: 0,
                len,
                offset: table_end,
            }
            .into());
        }

        reader.seek(SeekFrom::Start(table_start))?;
        let sub_blocks = read_pointers(&mut reader, variant.endian, variant.sub_blocks)?;
        debug!(?sub_blocks, "{platform} resource file, {len:#x} bytes");

        Ok(RdxArchive {
            reader,
            variant,
            header,
            sub_blocks,
            len,
        })
    }

    /// Decode the text of a language, `None` when the file has no text for it.
    #[instrument(skip(self, table, sink), err)]
    pub fn text(
        &mut self,
        language: Language,
        table: &CodeTable,
        sink: &mut dyn Diagnostics,
    ) -> Result<Option<TextBlock>> {
        let index = self.sub_block_index(language)?;
        let start = u64::from(self.sub_blocks[index]);
        if start == 0 {
            return Ok(None);
        }
        if start >= self.len {
            return Err(OutOfBounds {
                start: 0,
                len: self.len,
                offset: start,
            }
            .into());
        }

        let span = self.span(start);
        debug!("sub-block {index} at {start:#x}, {span:#x} bytes");

        let endian = self.endian();
        let mut window = SubStream::new(&mut self.reader, start, span)?;
        Ok(Some(TextBlock::read(&mut window, endian, table, sink)?))
    }

    /// Read the texture pointer array, empty when the file has no texture block
    pub fn texture_pointers(&mut self) -> Result<Vec<u32>> {
        let start = u64::from(self.header.texture_block);
        if start == 0 {
            return Ok(Vec::new());
        }
        if start + 4 > self.len {
            return Err(OutOfBounds {
                start: 0,
                len: self.len,
                offset: start + 4,
            }
            .into());
        }

        let endian = self.endian();
        let mut window = SubStream::new(&mut self.reader, start, self.len - start)?;
        let count = u32::read_options(&mut window, endian, ())?;
        if 4 + 4 * u64::from(count) > window.len() {
            return Err(OutOfBounds {
                start,
                len: window.len(),
                offset: 4 + 4 * u64::from(count),
            }
            .into());
        }

        Ok(read_pointers(&mut window, endian, count as usize)?)
    }

    /// Start and length of every texture container, `None` for absent ones
    ///
    /// A container runs up to the next greater texture pointer or the end of the file.
    pub fn texture_spans(&mut self) -> Result<Vec<Option<(u64, u64)>>> {
        let pointers = self.texture_pointers()?;
        let spans = pointers
            .iter()
            .map(|pointer| {
                let start = u64::from(*pointer);
                if start == 0 {
                    return Ok(None);
                }

                let end = pointers
                    .iter()
                    .map(|other| u64::from(*other))
                    .filter(|other| *other > start)
                    .min()
                    .unwrap_or(self.len);
                if start >= self.len {
                    return Err(OutOfBounds {
                        start: 0,
                        len: self.len,
                        offset: start,
                    });
                }

                Ok(Some((start, end - start)))
            })
            .collect::<core::result::Result<Vec<_>, _>>()?;

        Ok(spans)
    }

    /// Extract every texture container to `textures/NNNN/` and write `textures/textures.json`.
    #[instrument(skip_all, err)]
    pub fn extract_textures(
        &mut self,
        files: &mut dyn SideFiles,
        sink: &mut dyn Diagnostics,
    ) -> Result<TextureIndex> {
        let format = self.variant.textures;
        let mut index = TextureIndex::default();

        for (position, span) in self.texture_spans()?.into_iter().enumerate() {
            let Some((start, len)) = span else {
                index.textures.push(None);
                continue;
            };

            let directory = format!("{position:04}");
            debug!(%format, "texture {position} at {start:#x}, {len:#x} bytes");

            let mut window = SubStream::new(&mut self.reader, start, len)?;
            let mut scoped = ScopedSideFiles::new(files, format!("textures/{directory}"));
            rdx_texture::extract_to_side_files(&mut window, format, &mut scoped, sink)?;

            index.textures.push(Some(TextureEntry {
                directory,
                size: len,
            }));
        }

        write_json(files, TEXTURE_INDEX_FILE, &index)?;
        Ok(index)
    }

    /// Extract text and textures as selected by `options`.
    ///
    /// Text goes to `text/<language>.txt` in the document form of [`rdx_text::document`],
    /// languages without text are skipped.
    #[instrument(skip_all, err)]
    pub fn extract_to_side_files(
        &mut self,
        files: &mut dyn SideFiles,
        table: Option<&CodeTable>,
        options: &RdxExtractOptions,
        sink: &mut dyn Diagnostics,
    ) -> Result<()> {
        if options.text {
            let table = table.ok_or(Error::TableRequired)?;
            let languages = match &options.languages {
                Some(languages) => languages.clone(),
                None => self.variant.languages().collect(),
            };

            for language in languages {
                let Some(block) = self.text(language, table, sink)? else {
                    trace!("no {language} text");
                    continue;
                };

                let text = document::render_document(&[block]);
                files.write(&language.file_name(), text.as_bytes())?;
            }
        }

        if options.textures && self.header.texture_block != 0 {
            self.extract_textures(files, sink)?;
        }

        Ok(())
    }
}

pub(crate) fn read_pointers<R: Read + Seek>(
    reader: &mut R,
    endian: Endian,
    count: usize,
) -> binrw::BinResult<Vec<u32>> {
    (0..count)
        .map(|_| u32::read_options(reader, endian, ()))
        .collect()
}
