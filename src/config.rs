use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tally_dict::Backend;
use tally_scan::{DEFAULT_CHUNK_BYTES, DEFAULT_WORKER_COUNT, ReadMode, ScanConfig};

use crate::report::ReportFormat;

#[derive(Debug, Parser)]
#[command(name = "wordtally")]
#[command(about = "Count dictionary words in a large text corpus")]
pub struct Cli {
    /// Newline-separated word list.
    #[arg(long, env = "WORDTALLY_DICTIONARY")]
    pub dictionary: PathBuf,
    /// Text to scan.
    #[arg(long, env = "WORDTALLY_CORPUS")]
    pub corpus: PathBuf,
    /// Report destination; stdout when omitted.
    #[arg(long, env = "WORDTALLY_OUTPUT")]
    pub output: Option<PathBuf>,
    #[arg(long, default_value_t = false)]
    pub case_sensitive: bool,
    #[arg(long, env = "WORDTALLY_CHUNK_BYTES", default_value_t = DEFAULT_CHUNK_BYTES)]
    pub chunk_bytes: u64,
    #[arg(long, env = "WORDTALLY_WORKERS", default_value_t = DEFAULT_WORKER_COUNT)]
    pub workers: usize,
    #[arg(long, value_enum, default_value_t = BackendArg::Hash)]
    pub backend: BackendArg,
    #[arg(long, value_enum, default_value_t = ReadModeArg::Stream)]
    pub read_mode: ReadModeArg,
    #[arg(long, value_enum, default_value_t = ReportFormat::Counts)]
    pub format: ReportFormat,
    /// Scan on one thread, line by line, instead of in parallel chunks.
    #[arg(long, default_value_t = false)]
    pub sequential: bool,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum BackendArg {
    Hash,
    Trie,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum ReadModeArg {
    Stream,
    Mmap,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub dictionary: PathBuf,
    pub corpus: PathBuf,
    pub output: Option<PathBuf>,
    pub backend: Backend,
    pub scan: ScanConfig,
    pub format: ReportFormat,
    pub sequential: bool,
}

impl From<Cli> for Config {
    fn from(cli: Cli) -> Self {
        let backend = match cli.backend {
            BackendArg::Hash => Backend::Hash,
            BackendArg::Trie => Backend::Trie,
        };
        let read_mode = match cli.read_mode {
            ReadModeArg::Stream => ReadMode::Stream,
            ReadModeArg::Mmap => ReadMode::Mmap,
        };
        Config {
            dictionary: cli.dictionary,
            corpus: cli.corpus,
            output: cli.output,
            backend,
            scan: ScanConfig {
                ignore_case: !cli.case_sensitive,
                chunk_bytes: cli.chunk_bytes,
                worker_count: cli.workers,
                read_mode,
            },
            format: cli.format,
            sequential: cli.sequential,
        }
    }
}

pub fn load_config() -> Config {
    Cli::parse().into()
}
