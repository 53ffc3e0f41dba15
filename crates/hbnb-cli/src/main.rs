use clap::Parser;
use hbnb_store::{ObjectStore, StoreConfig};
use tracing::Level;

mod cli;
mod commands;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let config = StoreConfig {
        file_path: cli.file.clone(),
        pretty: cli.pretty,
    };
    let mut store = ObjectStore::from_config(&config);
    store.load()?;

    let mut out = std::io::stdout().lock();
    commands::run_command(&mut store, cli.command, &mut out)
}
