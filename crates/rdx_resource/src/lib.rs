//! # RDX Resource File Documentation
//!
//! RDX files hold the text and textures of one area of the game. The same layout is used on
//! every platform, only the byte order, the magic numbers, the number of language sub-blocks
//! and the texture format change (see [`variant`]).
//!
//! ## Header
//!
//! | Offset (bytes) | Field          | Description                                          |
//! |----------------|----------------|------------------------------------------------------|
//! | 0x0000         | Magic          | 4 bytes: Platform dependent version                  |
//! | 0x0004         | Text block     | 4 bytes: Pointer to the sub-block pointer table      |
//! | 0x0008         | Unknown blocks | 12 bytes: Three pointers, never parsed               |
//! | 0x0014         | Texture block  | 4 bytes: Pointer to the texture pointer array, or 0  |
//! | 0x0018         | Author         | 32 bytes: Zero padded name                           |
//!
//! Every pointer is an absolute offset in the byte order of the platform.
//!
//! ## Text Block
//!
//! One pointer per sub-block, 0 when the language is absent. Every sub-block is a text block
//! as read by [`rdx_text::TextBlock`] and runs up to the next pointer of the file.
//!
//! ## Texture Block
//!
//! | Offset (bytes) | Field    | Description                                            |
//! |----------------|----------|--------------------------------------------------------|
//! | 0x0000         | Count    | 4 bytes: Number of texture pointers                    |
//! | 0x0004         | Pointers | (Count * 4) bytes: Absolute pointers, 0 when absent    |
//! | ...            | Textures | PVR, GVR or TM2 containers, see [`rdx_texture`]        |
//!
//! ## Additional Information
//!
//! - **Overflow**: text that outgrows its sub-block takes the place of the texture block,
//!   which moves behind it on a 0x20 byte boundary. The game streams textures out of a
//!   scratch region, so text is never placed after it.
//! - **Side files**: `text/<language>.txt` and `textures/NNNN/` with `textures/textures.json`
//!

pub mod error;
pub mod read;
pub mod types;
pub mod variant;
pub mod write;

pub use read::{RdxArchive, RdxExtractOptions};
pub use types::RdxHeader;
pub use variant::{Language, Platform, Variant};
pub use write::Placement;
