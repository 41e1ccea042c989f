//! The editable text file written by extraction
//!
//! ```text
//! first run
//! [TEXT END]------------------------------
//! second run, may span
//! several lines
//! [TEXT END]------------------------------
//! [BLOCK END]------------------------------
//! ```

use crate::{
    error::{Error, Result},
    types::TextBlock,
};

/// Follows every run
pub const RUN_DELIMITER: &str = "\n[TEXT END]------------------------------\n";

/// Closes every block, followed by a newline
pub const BLOCK_DELIMITER: &str = "[BLOCK END]------------------------------";

/// Append the document form of one block
pub fn render_block(block: &TextBlock, out: &mut String) {
    for run in block.iter() {
        out.push_str(run);
        out.push_str(RUN_DELIMITER);
    }
    out.push_str(BLOCK_DELIMITER);
    out.push('\n');
}

/// Render several blocks into one document
pub fn render_document(blocks: &[TextBlock]) -> String {
    let mut out = String::new();
    for block in blocks {
        render_block(block, &mut out);
    }
    out
}

/// Split a document back into blocks of runs, `\r\n` line endings are accepted
pub fn parse_document(text: &str) -> Result<Vec<TextBlock>> {
    let text = text.replace("\r\n", "\n");
    let mut rest = text.as_str();
    let mut blocks = Vec::new();

    while !rest.trim().is_empty() {
        let block = blocks.len();
        let mut runs = Vec::new();

        while !rest.starts_with(BLOCK_DELIMITER) {
            let Some(end) = rest.find(RUN_DELIMITER) else {
                return Err(Error::MalformedDocument {
                    block,
                    reason: "missing block delimiter",
                });
            };
            runs.push(rest[..end].to_owned());
            rest = &rest[end + RUN_DELIMITER.len()..];
        }

        rest = &rest[BLOCK_DELIMITER.len()..];
        rest = match rest.strip_prefix('\n') {
            Some(next) => next,
            None if rest.is_empty() => rest,
            None => {
                return Err(Error::MalformedDocument {
                    block,
                    reason: "text after block delimiter",
                })
            }
        };

        blocks.push(TextBlock::new(runs));
    }

    Ok(blocks)
}
