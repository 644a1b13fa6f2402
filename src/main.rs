//! src/main.rs
//!
//! Entrypoint: installs error reporting and file logging, then delegates to
//! `app::run()`.

mod app;
mod cli;

use std::fs::File;
use std::sync::Mutex;

use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let cli = cli::Cli::parse();

    let log = File::create(&cli.log_file)?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Mutex::new(log))
        .with_ansi(false)
        .init();

    app::run(&cli)
}
