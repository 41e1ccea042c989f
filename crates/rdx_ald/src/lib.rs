//! # ALD Container Documentation
//!
//! This crate reads and writes **ALD** block containers, a flat sequence of size-prefixed
//! blocks. Standalone `.ald` archives hold text blocks or raw data, the byte order is the one
//! of the platform the archive comes from.
//!
//! ## File Structure
//!
//! Every block starts with a size field:
//!
//! | Offset (bytes) | Field    | Description                                                    |
//! |----------------|----------|----------------------------------------------------------------|
//! | 0x0000         | Size     | 4 bytes: Payload size, bit 31 set for wide blocks              |
//! | 0x0004         | Reserved | 4 bytes: Opaque, present on wide blocks only                   |
//! | 0x0004/0x0008  | Payload  | (Size & 0x7FFFFFFF) bytes                                      |
//!
//! The sequence ends with a 2 byte `0xFFFF` sentinel in place of a size field, or at the end
//! of the file. A single byte left after the last block is ignored.
//!
//! ## Extracted Layout
//!
//! [`read::extract_to_side_files`] writes one `NNNN.bin` per block (or `NNNN.txt` when a code
//! table is used) and an `ald.json` index:
//!
//! ```json
//! {
//!   "Blocks": [
//!     { "FileName": "0000.bin", "IsWide": false },
//!     { "FileName": "0001.bin", "IsWide": true, "Reserved": [0, 0, 0, 1] }
//!   ]
//! }
//! ```
//!

pub mod error;
pub mod read;
pub mod types;
pub mod write;

pub use read::{extract_to_side_files, AldReader};
pub use write::{insert_from_side_files, AldWriter};
