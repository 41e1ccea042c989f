//! Base types for text runs and blocks

use derive_more::derive::{Constructor, Deref, IntoIterator};

/// Terminates a run
pub const TEXT_END: u16 = 0xFFFF;

/// Follows the last run of a block
pub const BLOCK_END: u16 = 0xFFFE;

/// Control code for a time value, a zero parameter is a page break
pub const TIME_CODE: u16 = 0xFF01;

/// Control code for an item id
pub const ITEM_CODE: u16 = 0xFF02;

/// One unit of a decoded run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Token {
    /// A character code, rendered through the code table
    Code(u16),
    /// `[PAGE]`, a time control with a zero parameter
    Page,
    /// `[TIME:xxxx]`
    Time(u16),
    /// `[ITEM:xxxx]`
    Item(u16),
}

impl Token {
    /// Append the codes making up this token
    pub fn push_codes(self, codes: &mut Vec<u16>) {
        match self {
            Token::Code(code) => codes.push(code),
            Token::Page => codes.extend([TIME_CODE, 0]),
            Token::Time(value) => codes.extend([TIME_CODE, value]),
            Token::Item(value) => codes.extend([ITEM_CODE, value]),
        }
    }
}

/// Codes of a whole run, END included
pub fn run_codes(run: &[Token]) -> Vec<u16> {
    let mut codes = Vec::with_capacity(run.len() + 1);
    for token in run {
        token.push_codes(&mut codes);
    }
    codes.push(TEXT_END);
    codes
}

/// The decoded runs of one text block, in pointer order
#[derive(Constructor, Clone, Debug, Default, PartialEq, Eq, Deref, IntoIterator)]
pub struct TextBlock(Vec<String>);

impl TextBlock {
    /// Take the decoded runs
    pub fn into_inner(self) -> Vec<String> {
        self.0
    }
}

impl FromIterator<String> for TextBlock {
    fn from_iter<T: IntoIterator<Item = String>>(iter: T) -> Self {
        TextBlock(iter.into_iter().collect())
    }
}
