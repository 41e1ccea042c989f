//! The metadata model, as written by the current version

use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Magic at the start of the archive
#[derive(Serialize, Deserialize, Debug, Display, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum HeaderMagicType {
    /// `AFS\0`
    #[default]
    #[serde(rename = "AFS_00")]
    #[display("AFS_00")]
    Afs00,
    /// `AFS ` (0x20)
    #[serde(rename = "AFS_20")]
    #[display("AFS_20")]
    Afs20,
}

/// Where the attribute table pointer lives
#[derive(Serialize, Deserialize, Debug, Display, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum AttributesInfoType {
    /// The archive has no attribute table
    #[default]
    NoAttributes,
    /// Pointer right behind the entry table
    InfoAtBeginning,
    /// Pointer in front of the first entry's data
    InfoAtEnd,
}

/// One file of the archive
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct AfsEntry {
    /// The slot holds no file
    pub is_null: bool,
    /// Name stored in the attribute table
    pub name: String,
    /// Name of the extracted file, differs from `name` for duplicates
    pub file_name: String,
    /// Whether `unknown_attribute` is meaningful
    pub has_unknown_attribute: bool,
    /// Opaque per-entry value of the attribute table
    pub unknown_attribute: u32,
}

/// Contents of the metadata file
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct AfsMetadata {
    /// Always [`crate::METADATA_VERSION`] once loaded
    pub metadata_version: u64,
    /// Archive magic
    pub header_magic_type: HeaderMagicType,
    /// Attribute table placement
    pub attributes_info_type: AttributesInfoType,
    /// Alignment of the entry data
    pub entry_block_alignment: u32,
    /// Entries in archive order
    pub entries: Vec<AfsEntry>,
}

impl Default for AfsMetadata {
    fn default() -> Self {
        Self {
            metadata_version: crate::METADATA_VERSION,
            header_magic_type: HeaderMagicType::default(),
            attributes_info_type: AttributesInfoType::default(),
            entry_block_alignment: crate::DEFAULT_ALIGNMENT,
            entries: Vec::new(),
        }
    }
}

impl AfsMetadata {
    /// Entry extracted to `file_name`
    pub fn entry(&self, file_name: &str) -> Option<&AfsEntry> {
        self.entries
            .iter()
            .find(|entry| !entry.is_null && entry.file_name == file_name)
    }

    /// The unknown attribute of the entry extracted to `file_name`, `None` when it has none
    pub fn unknown_attribute(&self, file_name: &str) -> Option<u32> {
        self.entry(file_name)
            .filter(|entry| entry.has_unknown_attribute)
            .map(|entry| entry.unknown_attribute)
    }

    /// Remember the unknown attribute of the entry extracted to `file_name`
    pub fn set_unknown_attribute(
        &mut self,
        file_name: &str,
        value: u32,
    ) -> crate::error::Result<()> {
        let entry = self
            .entries
            .iter_mut()
            .find(|entry| !entry.is_null && entry.file_name == file_name)
            .ok_or_else(|| crate::error::Error::EntryNotFound {
                name: file_name.to_owned(),
            })?;

        entry.has_unknown_attribute = true;
        entry.unknown_attribute = value;
        Ok(())
    }
}
