use std::io;
use std::path::PathBuf;

use tally_dict::DictError;
use tally_types::Chunk;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("failed to read corpus {origin}: {source}")]
    SourceUnreadable { origin: String, source: io::Error },
    #[error("failed to scan chunk {chunk} of {path:?}: {source}")]
    WorkerFailure {
        path: PathBuf,
        chunk: Chunk,
        source: io::Error,
    },
    #[error("worker for chunk {chunk} {reason}")]
    WorkerAborted { chunk: Chunk, reason: &'static str },
    #[error("{task} task {reason}")]
    TaskAborted {
        task: &'static str,
        reason: &'static str,
    },
    #[error(transparent)]
    Dictionary(#[from] DictError),
    #[error("invalid scan configuration: {0}")]
    InvalidConfig(&'static str),
    #[error("dictionary ignore_case={dictionary} does not match scan ignore_case={scan}")]
    CaseMismatch { dictionary: bool, scan: bool },
}
