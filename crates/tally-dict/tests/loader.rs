use std::io::{Cursor, Write};

use tally_dict::{Backend, DictError, Dictionary};
use tempfile::NamedTempFile;

fn word_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn loads_newline_separated_words() {
    let file = word_file("apple\n\nBanana\r\n  cherry  \n");
    for backend in [Backend::Hash, Backend::Trie] {
        let dict = Dictionary::load(file.path(), true, backend).expect("load dictionary");
        assert_eq!(dict.len(), 3);
        assert_eq!(dict.backend(), backend);
        for word in ["apple", "banana", "cherry"] {
            assert!(dict.contains(word).unwrap(), "{word} via {backend}");
        }
    }
}

#[test]
fn missing_file_is_source_unreadable() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.txt");
    let err = Dictionary::load(&path, true, Backend::Hash).unwrap_err();
    match err {
        DictError::SourceUnreadable { origin, .. } => {
            assert!(origin.ends_with("absent.txt"), "{origin}");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn reader_tolerates_invalid_utf8() {
    let bytes = b"caf\xe9\nok\n".to_vec();
    let dict = Dictionary::from_reader(Cursor::new(bytes), true, Backend::Trie).unwrap();
    assert!(dict.contains("caf").unwrap());
    assert!(dict.contains("ok").unwrap());
}

#[test]
fn empty_source_builds_empty_dictionary() {
    let file = word_file("\n\n   \n");
    let dict = Dictionary::load(file.path(), true, Backend::Trie).unwrap();
    assert!(dict.is_empty());
    assert!(!dict.contains("anything").unwrap());
}

#[test]
fn backends_answer_identically() {
    let words = ["cat", "cart", "car", "dog", "dogs", "Zebra", "it's"];
    let queries = ["cat", "ca", "car", "carts", "dog", "dogs", "zebra", "its", "it", "x"];
    for ignore_case in [true, false] {
        let hash = Dictionary::build(words, ignore_case, Backend::Hash).unwrap();
        let trie = Dictionary::build(words, ignore_case, Backend::Trie).unwrap();
        assert_eq!(hash.len(), trie.len());
        for query in queries {
            assert_eq!(
                hash.contains(query).unwrap(),
                trie.contains(query).unwrap(),
                "{query} ignore_case={ignore_case}"
            );
        }
    }
}
