#![expect(missing_docs, reason = "util crate")]

use {
    anyhow::{Context, Result},
    kanjibase_engine::{
        LexiconService,
        config::{Config, DataPaths},
        snapshot,
    },
    std::path::PathBuf,
    tracing::{info, level_filters::LevelFilter},
    tracing_subscriber::EnvFilter,
};

#[derive(Debug, clap::Parser)]
struct Args {
    /// Text to look up
    text: String,
    /// Directory containing the source files
    #[arg(long)]
    data_dir: Option<PathBuf>,
    /// Path to a JSON config file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Delete snapshots before loading, so that every source is parsed again
    #[arg(long)]
    rebuild: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .without_time()
        .init();
    let args = <Args as clap::Parser>::parse();

    let data_dir = match args.data_dir {
        Some(data_dir) => data_dir,
        None => kanjibase_engine::data_dir()?,
    };
    info!("Using {data_dir:?} as data directory");
    let config = match args.config {
        Some(path) => Config::from_file(path).context("failed to load config")?,
        None => Config::default(),
    };

    let paths = DataPaths::in_dir(&data_dir);
    if args.rebuild {
        snapshot::invalidate(&paths.lexicon_snapshot)?;
        snapshot::invalidate(&paths.sentences_snapshot)?;
    }

    let service = LexiconService::new(&paths, &config.lexicon);
    for (source, diagnostic) in service.report().unavailable() {
        println!("{source} unavailable: {diagnostic}");
    }

    let bundle = service.lookup(&args.text, &config.lookup);
    if bundle.is_empty() {
        println!("No results for {:?}", args.text);
    }
    for (annotation, value) in bundle.iter() {
        println!("{annotation:?}: {value}");
    }
    Ok(())
}
