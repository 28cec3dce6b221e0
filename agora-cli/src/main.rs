use std::io;

use agora_cli::{Config, Shell};
use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let config = Config::parse();
    let files = config.data_files();
    let graph = files
        .load()
        .with_context(|| format!("failed to load saved data from {}", files.dir().display()))?;

    let mut shell = Shell::new(graph, files, io::stdin().lock(), io::stdout().lock());
    shell.run()
}
