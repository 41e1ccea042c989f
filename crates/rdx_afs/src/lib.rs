//! # AFS Metadata Documentation
//!
//! The AFS archives themselves are packed by an external library. Extraction leaves a
//! `metadata.json` next to the extracted files so the next repack produces the same archive
//! layout, including the per-entry values of the attribute table that nothing else knows.
//!
//! ## Version 2
//!
//! | Field                 | Description                                                     |
//! |-----------------------|-----------------------------------------------------------------|
//! | `MetadataVersion`     | Always `2`                                                      |
//! | `HeaderMagicType`     | `AFS_00` or `AFS_20`                                            |
//! | `AttributesInfoType`  | `NoAttributes`, `InfoAtBeginning` or `InfoAtEnd`                |
//! | `EntryBlockAlignment` | Alignment of the entry data, `0x800` for upgraded files         |
//! | `Entries`             | `IsNull`, `Name`, `FileName`, `HasUnknownAttribute`, `UnknownAttribute` |
//!
//! ## Version 1
//!
//! Entries had `Name` for the extracted file and `RawName` for the stored name, empty slots
//! and the alignment did not exist. Version 1 files are upgraded when loaded and always
//! saved as version 2.
//!

pub mod error;
pub mod migrate;
pub mod read;
pub mod types;
pub mod write;

pub use types::{AfsEntry, AfsMetadata, AttributesInfoType, HeaderMagicType};

/// Version written by this crate
pub const METADATA_VERSION: u64 = 2;

/// Entry alignment assumed for files that predate the field
pub const DEFAULT_ALIGNMENT: u32 = 0x800;
