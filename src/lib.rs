pub mod config;
pub mod report;

use std::fs::File;
use std::io::{self, BufWriter};
use std::time::Instant;

use anyhow::{Context, Result};
use tally_dict::Dictionary;
use tally_types::AggregateResult;
use tracing::info;

pub use config::{Cli, Config, load_config};
pub use report::{ReportFormat, write_report};

/// Build the dictionary and scan the corpus described by `config`.
pub async fn tally(config: &Config) -> Result<AggregateResult> {
    let start = Instant::now();
    let dictionary = Dictionary::load(&config.dictionary, config.scan.ignore_case, config.backend)
        .with_context(|| format!("loading dictionary {}", config.dictionary.display()))?;
    info!("dictionary built in {} ms", start.elapsed().as_millis());

    let result = if config.sequential {
        let path = config.corpus.clone();
        let tokenizer = config.scan.tokenizer();
        tokio::task::spawn_blocking(move || tally_scan::scan_file(&path, &dictionary, tokenizer))
            .await
            .context("sequential scan task failed")?
            .with_context(|| format!("scanning {}", config.corpus.display()))?
    } else {
        tally_scan::run(&config.corpus, dictionary, config.scan)
            .await
            .with_context(|| format!("scanning {}", config.corpus.display()))?
    };
    info!("total elapsed {} ms", start.elapsed().as_millis());
    Ok(result)
}

/// Write the report to the configured destination.
pub fn emit(config: &Config, result: &AggregateResult) -> Result<()> {
    match &config.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("creating report {}", path.display()))?;
            write_report(BufWriter::new(file), result, config.format)
                .with_context(|| format!("writing report {}", path.display()))?;
            info!("wrote {} words to {}", result.distinct(), path.display());
        }
        None => write_report(io::stdout().lock(), result, config.format)?,
    }
    Ok(())
}
