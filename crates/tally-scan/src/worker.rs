use std::io::{self, ErrorKind, Read};

use tally_dict::{DictError, Dictionary};
use tally_types::{Chunk, PartialCount, is_separator, normalize};
use tracing::debug;

use crate::corpus::{ChunkBytes, Corpus};
use crate::error::ScanError;
use crate::tokenizer::{TokenizerConfig, tokenize};

const STREAM_SLAB: u64 = 64 * 1024;

/// Scan one chunk into a count map owned by the caller.
///
/// Mapped chunks are tokenized in place. Streamed chunks are read in slabs of
/// at most 64 KiB, so a chunk that snapped out to end-of-file is never held
/// in memory whole.
pub fn scan_chunk(
    corpus: &Corpus,
    chunk: Chunk,
    dictionary: &Dictionary,
    config: TokenizerConfig,
) -> Result<PartialCount, ScanError> {
    let fail = |source: io::Error| ScanError::WorkerFailure {
        path: corpus.path().to_path_buf(),
        chunk,
        source,
    };
    let partial = match corpus.open_chunk(chunk).map_err(fail)? {
        ChunkBytes::Mapped(bytes) => count_matches(bytes, dictionary, config)?,
        ChunkBytes::Stream(mut reader) => {
            let mut counter = StreamCounter::new(dictionary, config);
            let mut slab = vec![0u8; chunk.len().min(STREAM_SLAB) as usize];
            let mut read = 0u64;
            loop {
                let n = match reader.read(&mut slab) {
                    Ok(0) => break,
                    Ok(n) => n,
                    Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                    Err(err) => return Err(fail(err)),
                };
                read += n as u64;
                counter.feed(&slab[..n])?;
            }
            if read != chunk.len() {
                return Err(fail(io::Error::new(
                    ErrorKind::UnexpectedEof,
                    format!("corpus shrank: read {read} of {} bytes", chunk.len()),
                )));
            }
            counter.finish()?
        }
    };
    debug!(
        "chunk {chunk}: {} distinct matches in {} bytes",
        partial.len(),
        chunk.len()
    );
    Ok(partial)
}

/// Count every non-empty token of `bytes` that the dictionary contains.
pub fn count_matches(
    bytes: &[u8],
    dictionary: &Dictionary,
    config: TokenizerConfig,
) -> Result<PartialCount, DictError> {
    let mut partial = PartialCount::new();
    count_into(&mut partial, bytes, dictionary, config)?;
    Ok(partial)
}

pub(crate) fn count_into(
    partial: &mut PartialCount,
    bytes: &[u8],
    dictionary: &Dictionary,
    config: TokenizerConfig,
) -> Result<(), DictError> {
    for token in tokenize(bytes, config) {
        if !token.is_empty() && dictionary.contains(&token)? {
            partial.record(&token);
        }
    }
    Ok(())
}

pub(crate) fn check_case(dictionary: &Dictionary, config: TokenizerConfig) -> Result<(), ScanError> {
    if dictionary.ignore_case() != config.ignore_case {
        return Err(ScanError::CaseMismatch {
            dictionary: dictionary.ignore_case(),
            scan: config.ignore_case,
        });
    }
    Ok(())
}

/// Counts tokens fed in arbitrary slabs. The token cut by a slab edge is kept
/// as normalized letters in `carry` until its separator shows up. A carry
/// longer than the longest dictionary word can never match, so it is dropped
/// and the rest of that token skipped.
struct StreamCounter<'a> {
    dictionary: &'a Dictionary,
    config: TokenizerConfig,
    partial: PartialCount,
    carry: String,
    overlong: bool,
    limit: usize,
}

impl<'a> StreamCounter<'a> {
    fn new(dictionary: &'a Dictionary, config: TokenizerConfig) -> Self {
        Self {
            dictionary,
            config,
            partial: PartialCount::new(),
            carry: String::new(),
            overlong: false,
            limit: dictionary.longest_word(),
        }
    }

    fn feed(&mut self, slab: &[u8]) -> Result<(), DictError> {
        let Some(first) = slab.iter().position(|&b| is_separator(b)) else {
            self.extend(slab);
            return Ok(());
        };
        self.extend(&slab[..first]);
        self.flush()?;
        let last = slab.iter().rposition(|&b| is_separator(b)).unwrap_or(first);
        count_into(&mut self.partial, &slab[first..=last], self.dictionary, self.config)?;
        self.extend(&slab[last + 1..]);
        Ok(())
    }

    fn extend(&mut self, piece: &[u8]) {
        if self.overlong || piece.is_empty() {
            return;
        }
        let letters = normalize(piece, self.config.ignore_case);
        if self.carry.len() + letters.len() > self.limit {
            self.overlong = true;
            self.carry.clear();
        } else {
            self.carry.push_str(&letters);
        }
    }

    fn flush(&mut self) -> Result<(), DictError> {
        if !self.overlong && !self.carry.is_empty() && self.dictionary.contains(&self.carry)? {
            self.partial.record(&self.carry);
        }
        self.carry.clear();
        self.overlong = false;
        Ok(())
    }

    fn finish(mut self) -> Result<PartialCount, DictError> {
        self.flush()?;
        Ok(self.partial)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::ReadMode;
    use std::io::Write;
    use tally_dict::Backend;
    use tempfile::NamedTempFile;

    fn dict(words: &[&str]) -> Dictionary {
        Dictionary::build(words.iter().copied(), true, Backend::Hash).unwrap()
    }

    #[test]
    fn counts_only_dictionary_words() {
        let partial = count_matches(
            b"cat dog cat bird cat",
            &dict(&["cat", "dog"]),
            TokenizerConfig::default(),
        )
        .unwrap();
        assert_eq!(partial.get("cat"), 3);
        assert_eq!(partial.get("dog"), 1);
        assert_eq!(partial.get("bird"), 0);
        assert_eq!(partial.len(), 2);
    }

    #[test]
    fn empty_tokens_never_match() {
        let partial = count_matches(b"123 -- !!", &dict(&["a"]), TokenizerConfig::default()).unwrap();
        assert!(partial.is_empty());
    }

    #[test]
    fn scans_exact_chunk_range() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"cat dog cat").unwrap();
        file.flush().unwrap();
        let corpus = Corpus::open(file.path(), ReadMode::Stream).unwrap();
        let chunk = Chunk {
            index: 1,
            start: 4,
            end: 11,
        };
        let partial =
            scan_chunk(&corpus, chunk, &dict(&["cat", "dog"]), TokenizerConfig::default())
                .unwrap();
        assert_eq!(partial.get("cat"), 1);
        assert_eq!(partial.get("dog"), 1);
    }

    const TEXT: &[u8] = b"The cat sat.\nDogs  and CATS don't\tmix; cat-dog 123 elephant cat";
    const WORDS: &[&str] = &["cat", "cats", "dog", "dogs", "dont", "elephant", "the"];

    #[test]
    fn slab_size_does_not_change_counts() {
        let dictionary = dict(WORDS);
        let expected = count_matches(TEXT, &dictionary, TokenizerConfig::default()).unwrap();
        for slab in 1..=TEXT.len() {
            let mut counter = StreamCounter::new(&dictionary, TokenizerConfig::default());
            for piece in TEXT.chunks(slab) {
                counter.feed(piece).unwrap();
            }
            assert_eq!(counter.finish().unwrap(), expected, "slab {slab}");
        }
        assert_eq!(expected.get("cat"), 3);
    }

    #[test]
    fn long_letter_run_keeps_carry_bounded() {
        let dictionary = dict(&["cat", "elephant"]);
        let mut counter = StreamCounter::new(&dictionary, TokenizerConfig::default());
        counter.feed(b"cat ").unwrap();
        for _ in 0..1000 {
            counter.feed(b"xxxxxxxxxxxxxxxx").unwrap();
            assert!(counter.carry.len() <= "elephant".len());
        }
        // the tail of an overlong token is not a word of its own
        counter.feed(b"cat elephant").unwrap();
        let partial = counter.finish().unwrap();
        assert_eq!(partial.get("cat"), 1);
        assert_eq!(partial.get("elephant"), 1);
    }

    #[test]
    fn streamed_chunk_spanning_many_slabs_matches_mapped() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&b"cat dog elephant ".repeat(10_000)).unwrap();
        file.flush().unwrap();
        let dictionary = dict(&["cat", "elephant"]);
        let mut results = Vec::new();
        for mode in [ReadMode::Stream, ReadMode::Mmap] {
            let corpus = Corpus::open(file.path(), mode).unwrap();
            let chunk = Chunk {
                index: 0,
                start: 0,
                end: corpus.size(),
            };
            results.push(scan_chunk(&corpus, chunk, &dictionary, TokenizerConfig::default()).unwrap());
        }
        assert_eq!(results[0], results[1]);
        assert_eq!(results[0].get("cat"), 10_000);
        assert_eq!(results[0].get("elephant"), 10_000);
    }

    #[test]
    fn case_flags_must_agree() {
        let dictionary = dict(&["cat"]);
        assert!(check_case(&dictionary, TokenizerConfig::default()).is_ok());
        assert!(matches!(
            check_case(&dictionary, TokenizerConfig { ignore_case: false }),
            Err(ScanError::CaseMismatch {
                dictionary: true,
                scan: false
            })
        ));
    }

    #[test]
    fn truncated_corpus_fails_the_chunk() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"cat dog cat dog").unwrap();
        file.flush().unwrap();
        let corpus = Corpus::open(file.path(), ReadMode::Stream).unwrap();
        file.as_file().set_len(4).unwrap();

        let chunk = Chunk {
            index: 0,
            start: 0,
            end: 15,
        };
        let err = scan_chunk(&corpus, chunk, &dict(&["cat"]), TokenizerConfig::default())
            .unwrap_err();
        match err {
            ScanError::WorkerFailure { chunk: failed, .. } => assert_eq!(failed, chunk),
            other => panic!("unexpected error: {other}"),
        }
    }
}
