use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tally_dict::{Backend, Dictionary};
use tally_types::normalize;

fn main() -> Result<()> {
    let mut args = env::args().skip(1);
    let path = args
        .next()
        .map(PathBuf::from)
        .context("usage: cargo run -p tally-dict --example lookup -- <words> <word>...")?;

    let hash = Dictionary::load(&path, true, Backend::Hash)
        .with_context(|| format!("loading {}", path.display()))?;
    let trie = Dictionary::load(&path, true, Backend::Trie)
        .with_context(|| format!("loading {}", path.display()))?;

    println!("Dictionary: {}", path.display());
    println!("Entries    : {}", hash.len());

    for raw in args {
        let word = normalize(raw.as_bytes(), true);
        println!(
            "'{}' -> '{}': hash={} trie={}",
            raw,
            word,
            hash.contains(&word)?,
            trie.contains(&word)?
        );
    }

    Ok(())
}
