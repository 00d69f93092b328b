use anyhow::{Context, Result};
use clap::Parser;
use log::LevelFilter;
use std::io;
use std::path::PathBuf;
use tamildict::{menu, Config, TranslationStore};

#[derive(Parser, Debug)]
#[clap(
    name = "tamildict",
    author,
    version,
    about = "English-to-Tamil word translator backed by a plain text dictionary"
)]
struct Cli {
    #[clap(long, short, help = "Dictionary file (default: translations.txt in the downloads folder)")]
    store: Option<PathBuf>,

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
        .with_context(|| format!("Failed to open dictionary {}", path.display()))?
        .with_placeholder(config.placeholder());

    let stdin = io::stdin();
    menu::run(&mut store, stdin.lock(), io::stdout().lock())?;
    Ok(())
}
