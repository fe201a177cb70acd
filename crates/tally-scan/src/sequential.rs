use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tally_dict::Dictionary;
use tally_types::{AggregateResult, PartialCount};
use tracing::info;

use crate::error::ScanError;
use crate::tokenizer::TokenizerConfig;
use crate::worker::{check_case, count_into};

/// Single-threaded scan of a line-oriented stream. Produces the same counts
/// as the parallel engine for the same bytes.
pub fn scan_reader<R: BufRead>(
    reader: R,
    dictionary: &Dictionary,
    config: TokenizerConfig,
) -> Result<AggregateResult, ScanError> {
    check_case(dictionary, config)?;
    scan_lines(reader, "<reader>", dictionary, config)
}

pub fn scan_file(
    path: impl AsRef<Path>,
    dictionary: &Dictionary,
    config: TokenizerConfig,
) -> Result<AggregateResult, ScanError> {
    check_case(dictionary, config)?;
    let path = path.as_ref();
    let origin = path.display().to_string();
    let file = File::open(path).map_err(|source| ScanError::SourceUnreadable {
        origin: origin.clone(),
        source,
    })?;
    scan_lines(BufReader::new(file), &origin, dictionary, config)
}

fn scan_lines<R: BufRead>(
    mut reader: R,
    origin: &str,
    dictionary: &Dictionary,
    config: TokenizerConfig,
) -> Result<AggregateResult, ScanError> {
    let mut partial = PartialCount::new();
    let mut line = Vec::new();
    let mut lines = 0u64;
    loop {
        line.clear();
        let read = reader
            .read_until(b'\n', &mut line)
            .map_err(|source| ScanError::SourceUnreadable {
                origin: origin.to_owned(),
                source,
            })?;
        if read == 0 {
            break;
        }
        lines += 1;
        count_into(&mut partial, &line, dictionary, config)?;
    }

    let mut result = AggregateResult::new();
    result.absorb(partial);
    info!(
        "sequential scan of {origin}: {lines} lines, {} matches, {} distinct words",
        result.total(),
        result.distinct()
    );
    Ok(result)
}
