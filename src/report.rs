use std::collections::BTreeMap;
use std::io::{self, Write};

use clap::ValueEnum;
use serde::Serialize;
use tally_types::AggregateResult;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, ValueEnum)]
pub enum ReportFormat {
    /// `Word: <w> Count: <n>` per line.
    #[default]
    Counts,
    /// `Matched Word: <w>` per line.
    Matches,
    Json,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    total: u64,
    distinct: usize,
    counts: BTreeMap<&'a str, u64>,
}

/// Write `result` sorted by word.
pub fn write_report<W: Write>(
    mut out: W,
    result: &AggregateResult,
    format: ReportFormat,
) -> io::Result<()> {
    match format {
        ReportFormat::Counts => {
            for (word, count) in result.sorted() {
                writeln!(out, "Word: {word} Count: {count}")?;
            }
        }
        ReportFormat::Matches => {
            for (word, _) in result.sorted() {
                writeln!(out, "Matched Word: {word}")?;
            }
        }
        ReportFormat::Json => {
            let report = JsonReport {
                total: result.total(),
                distinct: result.distinct(),
                counts: result.iter().collect(),
            };
            serde_json::to_writer_pretty(&mut out, &report)?;
            writeln!(out)?;
        }
    }
    out.flush()
}
