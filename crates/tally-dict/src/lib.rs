//! Immutable keyword dictionary for wordtally scans.
//!
//! A [`Dictionary`] is built once from newline-separated words and then only
//! read, so it can be shared across worker threads behind an `Arc` without
//! locking. Every entry goes through [`tally_types::normalize`], the same rule
//! the corpus tokenizer applies, so `Don't` in the word list matches `DONT` in
//! the corpus when case folding is on.
//!
//! Two interchangeable backends answer the same membership question:
//! - [`Backend::Hash`]: a `HashSet<String>`, O(1) expected lookup.
//! - [`Backend::Trie`]: a prefix tree over a fixed ASCII-letter alphabet,
//!   O(word length) lookup. Indexing a byte outside the alphabet is reported
//!   as [`DictError::InvalidCharacter`].
//!
//! # Example
//! ```no_run
//! use tally_dict::{Backend, Dictionary};
//!
//! # fn main() -> Result<(), tally_dict::DictError> {
//! let dict = Dictionary::load("/path/to/words.txt", true, Backend::Trie)?;
//! assert!(dict.contains("hello")?);
//! # Ok(()) }
//! ```
//!
//! For a runnable demo, see `cargo run -p tally-dict --example lookup -- <words> <word>...`.

mod trie;

use std::collections::HashSet;
use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use std::sync::Arc;

use tally_types::{is_separator, normalize};
use thiserror::Error;
use tracing::{info, warn};

pub use trie::TrieDictionary;

/// Lookup structure backing a [`Dictionary`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Backend {
    /// Hash set of normalized words.
    #[default]
    Hash,
    /// Prefix tree keyed by ASCII letters.
    Trie,
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Backend::Hash => "hash",
            Backend::Trie => "trie",
        })
    }
}

#[derive(Debug, Error)]
pub enum DictError {
    #[error("failed to read dictionary {origin}: {source}")]
    SourceUnreadable { origin: String, source: io::Error },
    #[error("character {ch:?} in {word:?} is outside the trie alphabet")]
    InvalidCharacter { ch: char, word: String },
}

#[derive(Debug, Clone)]
enum Store {
    Hash(HashSet<String>),
    Trie(TrieDictionary),
}

/// Normalized, read-only keyword set.
#[derive(Debug, Clone)]
pub struct Dictionary {
    store: Store,
    ignore_case: bool,
    longest: usize,
}

impl Dictionary {
    pub fn empty(ignore_case: bool, backend: Backend) -> Self {
        let store = match backend {
            Backend::Hash => Store::Hash(HashSet::new()),
            Backend::Trie => Store::Trie(TrieDictionary::new(ignore_case)),
        };
        Self {
            store,
            ignore_case,
            longest: 0,
        }
    }

    /// Build from raw lines. Lines are trimmed, blank lines skipped and each
    /// entry normalized before insertion. Lines with inner whitespace are
    /// skipped since no corpus token can contain a separator.
    pub fn build<I, S>(lines: I, ignore_case: bool, backend: Backend) -> Result<Self, DictError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut dict = Self::empty(ignore_case, backend);
        for line in lines {
            dict.insert_raw(line.as_ref().as_bytes())?;
        }
        dict.log_summary();
        Ok(dict)
    }

    /// Build from a newline-separated byte stream. Bytes that are not valid
    /// UTF-8 are dropped by normalization rather than rejected.
    pub fn from_reader<R: BufRead>(
        reader: R,
        ignore_case: bool,
        backend: Backend,
    ) -> Result<Self, DictError> {
        Self::read_lines(reader, "<reader>", ignore_case, backend)
    }

    pub fn load<P: AsRef<Path>>(
        path: P,
        ignore_case: bool,
        backend: Backend,
    ) -> Result<Arc<Self>, DictError> {
        let path_ref = path.as_ref();
        let origin = path_ref.display().to_string();
        let file = File::open(path_ref).map_err(|source| DictError::SourceUnreadable {
            origin: origin.clone(),
            source,
        })?;
        let dict = Self::read_lines(BufReader::new(file), &origin, ignore_case, backend)?;
        Ok(Arc::new(dict))
    }

    /// Exact membership for an already-normalized word. The empty string is
    /// never a member.
    pub fn contains(&self, word: &str) -> Result<bool, DictError> {
        match &self.store {
            Store::Hash(words) => Ok(words.contains(word)),
            Store::Trie(trie) => trie.contains(word),
        }
    }

    pub fn len(&self) -> usize {
        match &self.store {
            Store::Hash(words) => words.len(),
            Store::Trie(trie) => trie.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Length in bytes of the longest normalized entry, 0 when empty.
    pub fn longest_word(&self) -> usize {
        self.longest
    }

    pub fn ignore_case(&self) -> bool {
        self.ignore_case
    }

    pub fn backend(&self) -> Backend {
        match self.store {
            Store::Hash(_) => Backend::Hash,
            Store::Trie(_) => Backend::Trie,
        }
    }

    fn read_lines<R: BufRead>(
        reader: R,
        origin: &str,
        ignore_case: bool,
        backend: Backend,
    ) -> Result<Self, DictError> {
        let mut dict = Self::empty(ignore_case, backend);
        for line in reader.split(b'\n') {
            let raw = line.map_err(|source| DictError::SourceUnreadable {
                origin: origin.to_owned(),
                source,
            })?;
            dict.insert_raw(&raw)?;
        }
        info!("dictionary source: {origin}");
        dict.log_summary();
        Ok(dict)
    }

    fn insert_raw(&mut self, raw: &[u8]) -> Result<(), DictError> {
        let trimmed = raw.trim_ascii();
        if trimmed.is_empty() {
            return Ok(());
        }
        if trimmed.iter().any(|&b| is_separator(b)) {
            warn!(
                "skipped dictionary entry {:?} containing whitespace",
                String::from_utf8_lossy(trimmed)
            );
            return Ok(());
        }
        let word = normalize(trimmed, self.ignore_case);
        if word.is_empty() {
            warn!(
                "skipped dictionary entry {:?} with no letters",
                String::from_utf8_lossy(trimmed)
            );
            return Ok(());
        }
        self.longest = self.longest.max(word.len());
        match &mut self.store {
            Store::Hash(words) => {
                words.insert(word);
            }
            Store::Trie(trie) => {
                trie.insert(&word)?;
            }
        }
        Ok(())
    }

    fn log_summary(&self) {
        info!(
            "loaded {} dictionary words ({} backend, ignore_case={})",
            self.len(),
            self.backend(),
            self.ignore_case
        );
    }
}
