use anyhow::{Context, Result};
use clap::Parser;
use log::LevelFilter;
use std::path::PathBuf;
use tamildict::{import, Config, TranslationStore};

#[derive(Parser, Debug)]
#[clap(
    name = "converter",
    author,
    version,
    about = "Imports english,tamil word lists into the dictionary file"
)]
struct Cli {
    #[clap(help = "Glob pattern of word lists to import, e.g. 'lists/*.csv'")]
    pattern: String,

    #[clap(long, short, help = "Dictionary file to extend")]
    store: Option<PathBuf>,

    #[clap(long, short, default_value = "utf-8", help = "Encoding label of the input files")]
    encoding: String,

    #[clap(long, short, help = "Settings file to read instead of the default location")]
    config: Option<PathBuf>,

    #[clap(long, short, default_value = "warn")]
    log_level: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level.parse().unwrap_or(LevelFilter::Warn))
        .init();

    let config = Config::load_or_default(cli.config.as_deref());
    let path = cli.store.unwrap_or_else(|| config.store_path());

    let mut store = TranslationStore::open(&path)
        .with_context(|| format!("Failed to open dictionary {}", path.display()))?;
    println!("Loaded {} dictionary entries from {}", store.len(), path.display());

    let summary = import(&mut store, &cli.pattern, &cli.encoding)?;
    for file in &summary.files {
        println!("Processed {:?}", file);
    }
    println!("Added {} new entries", summary.added);
    println!("Skipped {} existing entries", summary.duplicates);
    if summary.malformed + summary.rejected > 0 {
        println!(
            "Skipped {} malformed and {} rejected lines",
            summary.malformed, summary.rejected
        );
    }

    println!("Conversion complete!");
    Ok(())
}
