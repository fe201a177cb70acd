use std::collections::HashMap;
use std::num::NonZeroU64;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use tally_dict::Dictionary;
use tally_types::{AggregateResult, Chunk, PartialCount};
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, info, warn};

use crate::aggregate::merge;
use crate::corpus::{Corpus, ReadMode};
use crate::error::ScanError;
use crate::tokenizer::TokenizerConfig;
use crate::worker::{check_case, scan_chunk};

pub const DEFAULT_CHUNK_BYTES: u64 = 1024 * 1024;
pub const DEFAULT_WORKER_COUNT: usize = 8;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ScanConfig {
    /// Fold casing in both the dictionary and the corpus.
    pub ignore_case: bool,
    /// Target chunk size before boundary snapping.
    pub chunk_bytes: u64,
    /// Upper bound on concurrently running chunk scans.
    pub worker_count: usize,
    pub read_mode: ReadMode,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            ignore_case: true,
            chunk_bytes: DEFAULT_CHUNK_BYTES,
            worker_count: DEFAULT_WORKER_COUNT,
            read_mode: ReadMode::default(),
        }
    }
}

impl ScanConfig {
    pub fn tokenizer(&self) -> TokenizerConfig {
        TokenizerConfig {
            ignore_case: self.ignore_case,
        }
    }

    fn target(&self) -> Result<NonZeroU64, ScanError> {
        if self.worker_count == 0 {
            return Err(ScanError::InvalidConfig("worker_count must be at least 1"));
        }
        NonZeroU64::new(self.chunk_bytes)
            .ok_or(ScanError::InvalidConfig("chunk_bytes must be at least 1"))
    }
}

/// Scan `corpus_path` in parallel and return the merged counts.
///
/// Chunks are scanned on the blocking pool with at most
/// `config.worker_count` in flight. The first failure stops dispatch and is
/// returned; no partial result escapes.
pub async fn run(
    corpus_path: impl AsRef<Path>,
    dictionary: Arc<Dictionary>,
    config: ScanConfig,
) -> Result<AggregateResult, ScanError> {
    let target = config.target()?;
    check_case(&dictionary, config.tokenizer())?;

    let start = Instant::now();
    let path = corpus_path.as_ref().to_path_buf();
    let (corpus, chunks) = tokio::task::spawn_blocking(move || {
        let corpus = Corpus::open(&path, config.read_mode)?;
        let chunks = corpus.plan(target)?;
        Ok::<_, ScanError>((Arc::new(corpus), chunks))
    })
    .await
    .map_err(|err| ScanError::TaskAborted {
        task: "planning",
        reason: join_reason(&err),
    })??;

    info!(
        "planned {} chunks over {} bytes of {} ({} mode, {} workers)",
        chunks.len(),
        corpus.size(),
        corpus.path().display(),
        corpus.mode(),
        config.worker_count
    );
    if chunks.is_empty() || dictionary.is_empty() {
        return Ok(AggregateResult::new());
    }

    let chunk_count = chunks.len();
    let tokenizer = config.tokenizer();
    let partials = dispatch(chunks, config.worker_count, move |chunk| {
        scan_chunk(&corpus, chunk, &dictionary, tokenizer)
    })
    .await?;
    let result = merge(partials);
    info!(
        "scanned {} chunks in {} ms: {} matches, {} distinct words",
        chunk_count,
        start.elapsed().as_millis(),
        result.total(),
        result.distinct()
    );
    Ok(result)
}

/// Run `scan` once per chunk with at most `worker_count` calls in flight.
/// Stops handing out chunks at the first failure and returns it.
async fn dispatch<F>(
    chunks: Vec<Chunk>,
    worker_count: usize,
    scan: F,
) -> Result<Vec<PartialCount>, ScanError>
where
    F: Fn(Chunk) -> Result<PartialCount, ScanError> + Send + Sync + 'static,
{
    let scan = Arc::new(scan);
    let mut partials = Vec::with_capacity(chunks.len());
    let mut in_flight = HashMap::new();
    let mut tasks = JoinSet::new();
    let mut pending = chunks.into_iter();

    loop {
        while tasks.len() < worker_count {
            let Some(chunk) = pending.next() else {
                break;
            };
            let scan = Arc::clone(&scan);
            let handle = tasks.spawn_blocking(move || scan(chunk));
            in_flight.insert(handle.id(), chunk);
        }

        let Some(joined) = tasks.join_next_with_id().await else {
            break;
        };
        let outcome = match joined {
            Ok((id, outcome)) => {
                in_flight.remove(&id);
                outcome
            }
            Err(err) => Err(aborted(&mut in_flight, &err)),
        };
        match outcome {
            Ok(partial) => partials.push(partial),
            Err(err) => {
                warn!(
                    "scan failed, cancelling {} running tasks and {} queued chunks: {err}",
                    tasks.len(),
                    pending.len()
                );
                tasks.abort_all();
                return Err(err);
            }
        }
    }

    debug!("joined {} chunk scans", partials.len());
    Ok(partials)
}

fn aborted(in_flight: &mut HashMap<tokio::task::Id, Chunk>, err: &JoinError) -> ScanError {
    let reason = join_reason(err);
    match in_flight.remove(&err.id()) {
        Some(chunk) => ScanError::WorkerAborted { chunk, reason },
        None => ScanError::TaskAborted {
            task: "chunk scan",
            reason,
        },
    }
}

fn join_reason(err: &JoinError) -> &'static str {
    if err.is_panic() {
        "panicked"
    } else {
        "was cancelled"
    }
}
