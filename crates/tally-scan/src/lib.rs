pub mod aggregate;
pub mod corpus;
pub mod error;
pub mod orchestrator;
pub mod planner;
pub mod sequential;
pub mod tokenizer;
pub mod worker;

pub use aggregate::merge;
pub use corpus::{ChunkBytes, Corpus, ReadMode};
pub use error::ScanError;
pub use orchestrator::{DEFAULT_CHUNK_BYTES, DEFAULT_WORKER_COUNT, ScanConfig, run};
pub use planner::{plan, plan_bytes};
pub use sequential::{scan_file, scan_reader};
pub use tokenizer::{TokenizerConfig, Tokens, tokenize};
pub use worker::{count_matches, scan_chunk};
