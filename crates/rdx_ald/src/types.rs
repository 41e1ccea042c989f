//! Base types for the structure of ALD containers

use binrw::{BinRead, BinWrite};
use serde::{Deserialize, Serialize};

/// Marks the end of the block sequence where a size field is expected
pub const SENTINEL: u16 = 0xFFFF;

/// Bit 31 of the size field, set when 4 reserved bytes follow it
pub const WIDE_FLAG: u32 = 0x8000_0000;

/// Name of the metadata side file
pub const METADATA_FILE: &str = "ald.json";

/// Header in front of every block payload
///
/// Stored in the byte order of the container, read it with
/// [`BinRead::read_options`] and the container's [`binrw::Endian`].
#[derive(BinRead, BinWrite, Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockHeader {
    /// Payload size, bit 31 is the wide flag
    pub size_field: u32,

    /// Opaque bytes present on wide blocks only
    #[br(if(size_field & WIDE_FLAG != 0))]
    pub reserved: Option<[u8; 4]>,
}

impl BlockHeader {
    /// Header for a payload of `size` bytes
    pub fn new(size: u32, reserved: Option<[u8; 4]>) -> Self {
        let flag = if reserved.is_some() { WIDE_FLAG } else { 0 };
        BlockHeader {
            size_field: size | flag,
            reserved,
        }
    }

    /// Payload size without the wide flag
    pub fn size(&self) -> u32 {
        self.size_field & !WIDE_FLAG
    }

    /// Whether reserved bytes follow the size field
    pub fn is_wide(&self) -> bool {
        self.size_field & WIDE_FLAG != 0
    }

    /// Bytes taken by the header itself
    pub fn encoded_len(&self) -> u64 {
        if self.is_wide() {
            8
        } else {
            4
        }
    }
}

/// What the extraction handler learns about a block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockInfo {
    /// Position in the container
    pub index: usize,
    /// Payload size
    pub size: u32,
    /// Whether the block carries reserved bytes
    pub wide: bool,
    /// The reserved bytes, zero for narrow blocks
    pub reserved: [u8; 4],
}

/// A block to be written by [`crate::AldWriter`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AldEntry {
    /// Payload
    pub data: Vec<u8>,
    /// Write the wide flag and reserved bytes
    pub wide: bool,
    /// Reserved bytes for wide blocks
    pub reserved: [u8; 4],
}

/// Contents of `ald.json`
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct AldMetadata {
    /// One entry per block, in container order
    pub blocks: Vec<AldBlockMetadata>,
}

/// Side file and layout of one block
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct AldBlockMetadata {
    /// `NNNN.bin`, or `NNNN.txt` for blocks extracted as text
    pub file_name: String,
    /// Whether the block carries reserved bytes
    pub is_wide: bool,
    /// Reserved bytes of wide blocks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reserved: Option<[u8; 4]>,
    /// Undecoded bytes of a text block, reused when the text was not edited
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_file: Option<String>,
}
