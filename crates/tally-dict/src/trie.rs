use bitvec::prelude::*;

use crate::DictError;

const LOWER: usize = 26;
const MIXED: usize = 52;
// The root occupies node 0 and is never anyone's child, so 0 doubles as "no edge".
const NO_EDGE: u32 = 0;

type BitSet = BitVec<usize, Lsb0>;

/// Prefix tree over a fixed ASCII-letter alphabet.
///
/// In case-folding mode the alphabet is `a..z` (26 slots); in case-sensitive
/// mode it is `a..z` followed by `A..Z` (52 slots). Each node owns `width`
/// consecutive slots in one flat child table, and a bit per node marks the
/// end of a complete word.
#[derive(Debug, Clone)]
pub struct TrieDictionary {
    ignore_case: bool,
    width: usize,
    children: Vec<u32>,
    terminal: BitSet,
    words: usize,
}

impl TrieDictionary {
    pub fn new(ignore_case: bool) -> Self {
        let width = if ignore_case { LOWER } else { MIXED };
        Self {
            ignore_case,
            width,
            children: vec![NO_EDGE; width],
            terminal: bitvec![usize, Lsb0; 0; 1],
            words: 0,
        }
    }

    /// Insert a word. Returns `Ok(false)` if it was already present or empty.
    pub fn insert(&mut self, word: &str) -> Result<bool, DictError> {
        if word.is_empty() {
            return Ok(false);
        }
        let mut node = 0usize;
        for ch in word.chars() {
            let edge = node * self.width + self.slot(ch, word)?;
            let mut next = self.children[edge];
            if next == NO_EDGE {
                next = self.node_count() as u32;
                self.children.extend(std::iter::repeat_n(NO_EDGE, self.width));
                self.terminal.push(false);
                self.children[edge] = next;
            }
            node = next as usize;
        }
        if self.terminal[node] {
            return Ok(false);
        }
        self.terminal.set(node, true);
        self.words += 1;
        Ok(true)
    }

    /// Exact-membership lookup. Prefixes of stored words are not members.
    pub fn contains(&self, word: &str) -> Result<bool, DictError> {
        let mut node = 0usize;
        for ch in word.chars() {
            let next = self.children[node * self.width + self.slot(ch, word)?];
            if next == NO_EDGE {
                return Ok(false);
            }
            node = next as usize;
        }
        Ok(self.terminal[node])
    }

    pub fn len(&self) -> usize {
        self.words
    }

    pub fn is_empty(&self) -> bool {
        self.words == 0
    }

    pub fn node_count(&self) -> usize {
        self.terminal.len()
    }

    fn slot(&self, ch: char, word: &str) -> Result<usize, DictError> {
        match ch {
            'a'..='z' => Ok(ch as usize - 'a' as usize),
            'A'..='Z' if !self.ignore_case => Ok(LOWER + ch as usize - 'A' as usize),
            _ => Err(DictError::InvalidCharacter {
                ch,
                word: word.to_owned(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefixes_are_not_words() {
        let mut trie = TrieDictionary::new(true);
        assert!(trie.insert("cart").unwrap());
        assert!(trie.contains("cart").unwrap());
        assert!(!trie.contains("car").unwrap());
        assert!(!trie.contains("carts").unwrap());
        assert!(!trie.contains("").unwrap());
    }

    #[test]
    fn shares_common_prefixes() {
        let mut trie = TrieDictionary::new(true);
        trie.insert("car").unwrap();
        let before = trie.node_count();
        trie.insert("cat").unwrap();
        assert_eq!(trie.node_count(), before + 1);
        assert_eq!(trie.len(), 2);
    }

    #[test]
    fn duplicate_and_empty_inserts_are_noops() {
        let mut trie = TrieDictionary::new(true);
        assert!(trie.insert("dog").unwrap());
        assert!(!trie.insert("dog").unwrap());
        assert!(!trie.insert("").unwrap());
        assert_eq!(trie.len(), 1);
    }

    #[test]
    fn folding_trie_rejects_uppercase() {
        let mut trie = TrieDictionary::new(true);
        let err = trie.insert("Dog").unwrap_err();
        assert!(matches!(err, DictError::InvalidCharacter { ch: 'D', .. }));
        assert!(trie.contains("dOg").is_err());
    }

    #[test]
    fn case_sensitive_trie_keeps_cases_apart() {
        let mut trie = TrieDictionary::new(false);
        trie.insert("Hello").unwrap();
        assert!(trie.contains("Hello").unwrap());
        assert!(!trie.contains("hello").unwrap());
        assert!(!trie.contains("HELLO").unwrap());
    }

    #[test]
    fn rejects_non_letters() {
        let mut trie = TrieDictionary::new(false);
        for word in ["don't", "a1", "naïve", "two words"] {
            assert!(
                matches!(trie.insert(word), Err(DictError::InvalidCharacter { .. })),
                "{word}"
            );
        }
        assert!(trie.is_empty());
    }
}
