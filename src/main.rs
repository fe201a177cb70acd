use tracing::{Level, info};
use tracing_subscriber::EnvFilter;

use wordtally::{emit, load_config, tally};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = load_config();
    info!("using dictionary at {}", config.dictionary.display());
    info!("scanning corpus at {}", config.corpus.display());
    if config.sequential {
        info!("sequential scan ({} backend)", config.backend);
    } else {
        info!(
            "parallel scan: {} workers, {} byte chunks, {} reads ({} backend)",
            config.scan.worker_count, config.scan.chunk_bytes, config.scan.read_mode, config.backend
        );
    }
    if !config.scan.ignore_case {
        info!("case-sensitive matching");
    }

    let result = tally(&config).await?;
    info!(
        "{} matches across {} distinct words",
        result.total(),
        result.distinct()
    );
    emit(&config, &result)?;
    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let max_level = env_filter
        .max_level_hint()
        .and_then(|hint| hint.into_level())
        .unwrap_or(Level::INFO);
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_level(true)
        .with_writer(std::io::stderr)
        .with_max_level(max_level)
        .init();
}
