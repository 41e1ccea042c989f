//! # Text Block Documentation
//!
//! This crate decodes and encodes the text blocks stored in **RDX** resource files and
//! **ALD** text archives. Characters are stored as 16-bit codes that only make sense through
//! a translation table (`.tbl`) shipped with the tools.
//!
//! ## Table File
//!
//! One mapping per line, `HHHH=token`, where `HHHH` is the code as it appears in a hex
//! editor (big-endian hex of the little-endian unit). Special forms:
//!
//! | Line      | Meaning                        |
//! |-----------|--------------------------------|
//! | `0A00=\n` | The code stands for a newline  |
//! | `3D00==`  | The code stands for `=`        |
//!
//! Lines that do not match are ignored. When a token is listed twice the first code is used
//! for encoding.
//!
//! ## Block Structure
//!
//! | Offset (bytes)  | Field    | Description                                                 |
//! |-----------------|----------|-------------------------------------------------------------|
//! | 0x0000          | Count    | 4 bytes: Number of runs, container byte order               |
//! | 0x0004          | Pointers | (Count * 4) bytes: Run offsets from the block start         |
//! | ...             | Runs     | Little-endian u16 codes, each run ends with `0xFFFF`        |
//! | ...             | End      | 2 bytes: `0xFFFE` after the last run                        |
//!
//! ### Control Codes
//!
//! | Code     | Parameter | Text form                            |
//! |----------|-----------|--------------------------------------|
//! | `0xFF01` | `0x0000`  | `[PAGE]`                             |
//! | `0xFF01` | time      | `[TIME:xxxx]`                        |
//! | `0xFF02` | item id   | `[ITEM:xxxx]`                        |
//!
//! The parameter is always data, even when it is `0xFFFF`. Codes missing from the table are
//! written as `[HEX:xxxx]` and read back unchanged.
//!
//! ## Additional Information
//!
//! - **Runs**: pointers do not have to be sorted and may point to the same run
//! - **Text files**: see [`document`] for the extracted layout
//!

pub mod document;
pub mod error;
pub mod read;
pub mod table;
pub mod types;
pub mod write;

pub use read::decode_block;
pub use table::CodeTable;
pub use types::{TextBlock, Token};
pub use write::encode_block;
