//! Shared vocabulary for the wordtally crates.
//!
//! Dictionary building and corpus tokenization must agree on exactly one
//! normalization rule, otherwise matches are silently missed. That rule lives
//! here ([`normalize`], [`is_separator`]) so both sides import the same code.
//! The crate also defines the byte-range [`Chunk`] handed to workers and the
//! two count maps that flow out of them: [`PartialCount`] (one worker) and
//! [`AggregateResult`] (the whole run).
//!
//! ```rust
//! use tally_types::{AggregateResult, PartialCount, normalize};
//!
//! assert_eq!(normalize(b"Don't!", true), "dont");
//! assert_eq!(normalize(b"HELLO,", false), "HELLO");
//!
//! let mut partial = PartialCount::new();
//! partial.record("cat");
//! partial.record("cat");
//! let mut total = AggregateResult::new();
//! total.absorb(partial);
//! assert_eq!(total.get("cat"), 2);
//! ```

use std::collections::HashMap;
use std::collections::hash_map;
use std::fmt;

/// Bytes that separate tokens: ASCII whitespace plus vertical tab.
pub fn is_separator(byte: u8) -> bool {
    byte.is_ascii_whitespace() || byte == 0x0b
}

/// Reduce a separator-free piece of text to its ASCII letters, lowercasing
/// them when `ignore_case` is set. Returns an empty string when nothing is
/// left (`"123"`, `"--"`).
pub fn normalize(piece: &[u8], ignore_case: bool) -> String {
    let mut word = String::with_capacity(piece.len());
    for &byte in piece {
        if !byte.is_ascii_alphabetic() {
            continue;
        }
        let byte = if ignore_case {
            byte.to_ascii_lowercase()
        } else {
            byte
        };
        word.push(byte as char);
    }
    word
}

/// Half-open byte range `[start, end)` of the corpus assigned to one worker.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Chunk {
    pub index: usize,
    pub start: u64,
    pub end: u64,
}

impl Chunk {
    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl fmt::Display for Chunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} [{}, {})", self.index, self.start, self.end)
    }
}

/// Word counts gathered by a single worker over one chunk.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PartialCount {
    counts: HashMap<String, u64>,
}

impl PartialCount {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one occurrence of an already-normalized word.
    pub fn record(&mut self, word: &str) {
        if let Some(count) = self.counts.get_mut(word) {
            *count += 1;
        } else {
            self.counts.insert(word.to_owned(), 1);
        }
    }

    pub fn get(&self, word: &str) -> u64 {
        self.counts.get(word).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> + '_ {
        self.counts.iter().map(|(w, c)| (w.as_str(), *c))
    }
}

impl IntoIterator for PartialCount {
    type Item = (String, u64);
    type IntoIter = hash_map::IntoIter<String, u64>;

    fn into_iter(self) -> Self::IntoIter {
        self.counts.into_iter()
    }
}

/// Word counts for a whole run, built by merging [`PartialCount`]s.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct AggregateResult {
    counts: HashMap<String, u64>,
}

impl AggregateResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one worker's counts into the total. Order of calls does not
    /// affect the final state.
    pub fn absorb(&mut self, partial: PartialCount) {
        for (word, count) in partial {
            *self.counts.entry(word).or_insert(0) += count;
        }
    }

    pub fn get(&self, word: &str) -> u64 {
        self.counts.get(word).copied().unwrap_or(0)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.counts.contains_key(word)
    }

    /// Number of distinct matched words.
    pub fn distinct(&self) -> usize {
        self.counts.len()
    }

    /// Sum of all occurrences.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> + '_ {
        self.counts.iter().map(|(w, c)| (w.as_str(), *c))
    }

    /// `(word, count)` pairs ordered by word.
    pub fn sorted(&self) -> Vec<(&str, u64)> {
        let mut pairs: Vec<_> = self.iter().collect();
        pairs.sort_unstable_by(|a, b| a.0.cmp(b.0));
        pairs
    }

    pub fn into_map(self) -> HashMap<String, u64> {
        self.counts
    }
}
