use std::iter::FusedIterator;

use tally_types::{is_separator, normalize};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TokenizerConfig {
    pub ignore_case: bool,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self { ignore_case: true }
    }
}

/// Lazy sequence of normalized tokens over a byte buffer.
///
/// Each separator-delimited piece yields exactly one item, which is empty when
/// the piece held no ASCII letters. Cloning the iterator restarts from the
/// clone point.
#[derive(Clone, Debug)]
pub struct Tokens<'a> {
    rest: &'a [u8],
    ignore_case: bool,
}

pub fn tokenize(buf: &[u8], config: TokenizerConfig) -> Tokens<'_> {
    Tokens {
        rest: buf,
        ignore_case: config.ignore_case,
    }
}

impl Iterator for Tokens<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let start = self.rest.iter().position(|&b| !is_separator(b))?;
        let rest = &self.rest[start..];
        let end = rest
            .iter()
            .position(|&b| is_separator(b))
            .unwrap_or(rest.len());
        let (piece, tail) = rest.split_at(end);
        self.rest = tail;
        Some(normalize(piece, self.ignore_case))
    }
}

impl FusedIterator for Tokens<'_> {}
