//! Base types for the structure of RDX files

use binrw::{BinRead, BinWrite};
use serde::{Deserialize, Serialize};

/// Size of the fixed header
pub const HEADER_LEN: u64 = 0x38;

/// Boundary the texture block is moved to when text overflows
pub const TEXT_ALIGNMENT: u64 = 0x20;

/// Side file listing the extracted textures
pub const TEXTURE_INDEX_FILE: &str = "textures/textures.json";

/// RDX file header
///
/// Every pointer is an absolute offset from the start of the file, stored in the byte order
/// of the platform.
#[derive(BinRead, BinWrite, Debug, Clone, Copy, PartialEq, Eq)]
pub struct RdxHeader {
    /// Platform dependent file version
    pub magic: u32,

    /// Start of the language sub-block pointer table
    pub text_block: u32,

    /// Blocks that are kept as they are
    pub unknown_blocks: [u32; 3],

    /// Start of the texture pointer array, 0 when the file has no textures
    pub texture_block: u32,

    /// Name of the tool or person that built the file, zero padded
    pub author: [u8; 32],
}

impl RdxHeader {
    /// Every top-level block pointer, texture block last
    pub fn block_pointers(&self) -> [u32; 5] {
        let [first, second, third] = self.unknown_blocks;
        [self.text_block, first, second, third, self.texture_block]
    }
}

/// One extracted texture container
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct TextureEntry {
    /// Directory below `textures/` holding the side files
    pub directory: String,
    /// Exact length of the container in the resource file
    pub size: u64,
}

/// Contents of `textures/textures.json`
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct TextureIndex {
    /// One slot per texture pointer, `None` for absent textures
    pub textures: Vec<Option<TextureEntry>>,
}
