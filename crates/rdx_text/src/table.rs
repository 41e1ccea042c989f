//! Translation table between character codes and text tokens

use std::{borrow::Cow, convert::Infallible, fs, path::Path, str::FromStr};

use indexmap::IndexMap;
use rdx_io::{Diagnostics, Warning};
use tracing::{debug, instrument, trace};
use winnow::{
    combinator::{alt, delimited, preceded, rest},
    prelude::*,
    token::{take_till, take_while},
    PResult,
};

use crate::{
    error::{Error, Result},
    types::Token,
};

/// Bidirectional `code <-> token` mapping loaded from a `.tbl` file
///
/// Every line of the file has the form `HHHH=token`. The key is the big-endian hex form of
/// the code as it appears in a hex editor, so it is byte-swapped on load to match codes read
/// as little-endian units.
///
/// ```
/// use rdx_io::CollectedDiagnostics;
/// use rdx_text::CodeTable;
///
/// let table: CodeTable = "4100=A\r\n4200=B\r\n0A00=\\n".parse()?;
/// let mut sink = CollectedDiagnostics::new();
///
/// assert_eq!(table.decode(0x0041, &mut sink), "A");
/// assert_eq!(table.decode(0x1234, &mut sink), "[HEX:1234]");
/// assert_eq!(table.encode("\n", &mut sink).unwrap(), 0x000A);
/// assert_eq!(sink.len(), 1);
/// # Ok::<(), std::convert::Infallible>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeTable {
    tokens: IndexMap<u16, String>,
    codes: IndexMap<String, u16>,
    longest: usize,
}

impl CodeTable {
    /// Read and parse a table file
    #[instrument(skip_all, fields(path = %path.as_ref().display()), err)]
    pub fn load(path: impl AsRef<Path>) -> Result<CodeTable> {
        let text = fs::read_to_string(path)?;
        let table = Self::parse(&text);
        debug!("loaded {} codes", table.len());
        Ok(table)
    }

    /// Parse the contents of a table file, skipping lines that are not `HHHH=token`
    pub fn parse(text: &str) -> CodeTable {
        let mut table = CodeTable::default();

        for (number, line) in text.lines().enumerate() {
            let line = line.trim_end_matches('\r');
            if line.is_empty() {
                continue;
            }

            match table_line.parse(line) {
                Ok((key, token)) => table.insert(key.swap_bytes(), token),
                Err(_) => trace!("skipping table line {}: {line:?}", number + 1),
            }
        }

        table
    }

    fn insert(&mut self, code: u16, token: &str) {
        let token = match token {
            "\\n" => "\n",
            token => token,
        };

        if self.tokens.contains_key(&code) {
            trace!("duplicate code {code:#06X}, keeping the first token");
            return;
        }

        self.longest = self.longest.max(token.chars().count());
        self.tokens.insert(code, token.to_owned());
        self.codes.entry(token.to_owned()).or_insert(code);
    }

    /// Number of codes in the table
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Whether the table holds no codes
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Token for a code
    pub fn get(&self, code: u16) -> Option<&str> {
        self.tokens.get(&code).map(|token| token.as_str())
    }

    /// Code for a token, the first one in file order if the token is listed twice
    pub fn code_for(&self, token: &str) -> Option<u16> {
        self.codes.get(token).copied()
    }

    /// All `(code, token)` pairs in file order
    pub fn iter(&self) -> impl Iterator<Item = (u16, &str)> {
        self.tokens.iter().map(|(code, token)| (*code, token.as_str()))
    }

    /// Render a character code, unknown codes become `[HEX:xxxx]`
    pub fn decode(&self, code: u16, sink: &mut dyn Diagnostics) -> Cow<'_, str> {
        match self.tokens.get(&code) {
            Some(token) => Cow::Borrowed(token),
            None => {
                sink.warning(Warning::UnknownCode { code });
                Cow::Owned(format!("[HEX:{code:04X}]"))
            }
        }
    }

    /// Look up the code of a single token
    ///
    /// `[HEX:xxxx]` placeholders are accepted. An unknown bracketed token is an error, an
    /// unknown plain token is written as `0x0000` and reported.
    pub fn encode(&self, token: &str, sink: &mut dyn Diagnostics) -> Result<u16> {
        if let Some(code) = self.code_for(token) {
            return Ok(code);
        }

        if token.starts_with('[') {
            let placeholder = bracketed
                .parse(token)
                .ok()
                .and_then(|inner| hex_placeholder.parse(inner).ok());
            return placeholder.ok_or_else(|| Error::UnknownToken {
                token: token.to_owned(),
            });
        }

        sink.warning(Warning::UnmappedToken {
            token: token.to_owned(),
        });
        Ok(0x0000)
    }

    /// Append the text form of a decoded token to `out`
    pub fn render(&self, token: Token, out: &mut String, sink: &mut dyn Diagnostics) {
        match token {
            Token::Code(code) => out.push_str(&self.decode(code, sink)),
            Token::Page => out.push_str("[PAGE]"),
            Token::Time(value) => out.push_str(&format!("[TIME:{value:04X}]")),
            Token::Item(value) => out.push_str(&format!("[ITEM:{value:04X}]")),
        }
    }

    /// Split text into tokens, preferring the longest table entry at every position
    ///
    /// A `[...]` group is resolved as a whole: first against the table, then as one of the
    /// built-in `[PAGE]`, `[TIME:xxxx]`, `[ITEM:xxxx]` and `[HEX:xxxx]` forms.
    pub fn tokenize(&self, text: &str, sink: &mut dyn Diagnostics) -> Result<Vec<Token>> {
        let mut tokens = Vec::with_capacity(text.len());
        let mut input = text;

        while !input.is_empty() {
            if input.starts_with('[') {
                let mut after = input;
                if let Ok(inner) = bracketed.parse_next(&mut after) {
                    let token = &input[..input.len() - after.len()];
                    tokens.push(self.bracket_token(token, inner)?);
                    input = after;
                    continue;
                }
            }

            let (token, len) = match self.longest_match(input) {
                Some(found) => found,
                None => {
                    let len = input.chars().next().map_or(1, char::len_utf8);
                    (Token::Code(self.encode(&input[..len], sink)?), len)
                }
            };
            tokens.push(token);
            input = &input[len..];
        }

        Ok(tokens)
    }

    fn bracket_token(&self, token: &str, inner: &str) -> Result<Token> {
        if let Some(code) = self.code_for(token) {
            return Ok(Token::Code(code));
        }

        control.parse(inner).map_err(|_| Error::UnknownToken {
            token: token.to_owned(),
        })
    }

    fn longest_match(&self, input: &str) -> Option<(Token, usize)> {
        let ends: Vec<usize> = input
            .char_indices()
            .map(|(index, c)| index + c.len_utf8())
            .take(self.longest)
            .collect();

        ends.into_iter()
            .rev()
            .find_map(|end| self.code_for(&input[..end]).map(|code| (Token::Code(code), end)))
    }
}

impl FromStr for CodeTable {
    type Err = Infallible;

    fn from_str(s: &str) -> core::result::Result<Self, Self::Err> {
        Ok(CodeTable::parse(s))
    }
}

fn hex_u16(input: &mut &str) -> PResult<u16> {
    take_while(1..=4, ('0'..='9', 'a'..='f', 'A'..='F'))
        .try_map(|digits| u16::from_str_radix(digits, 16))
        .parse_next(input)
}

/// `HHHH=token`, or `HHHH==` for the `=` token
fn table_line<'s>(input: &mut &'s str) -> PResult<(u16, &'s str)> {
    (
        hex_u16,
        preceded(
            '=',
            rest.verify(|token: &str| token == "=" || (!token.is_empty() && !token.contains('='))),
        ),
    )
        .parse_next(input)
}

/// The contents of a `[...]` group on a single line
fn bracketed<'s>(input: &mut &'s str) -> PResult<&'s str> {
    delimited(
        '[',
        take_till(0.., |c: char| c == ']' || c == '[' || c == '\n'),
        ']',
    )
    .parse_next(input)
}

fn hex_placeholder(input: &mut &str) -> PResult<u16> {
    preceded("HEX:", hex_u16).parse_next(input)
}

fn control(input: &mut &str) -> PResult<Token> {
    alt((
        "PAGE".value(Token::Page),
        preceded("TIME:", hex_u16).map(Token::Time),
        preceded("ITEM:", hex_u16).map(Token::Item),
        hex_placeholder.map(Token::Code),
    ))
    .parse_next(input)
}
