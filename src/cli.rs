//! src/cli.rs
//!
//! Command-line interface of the `live-window` binary.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};

use live_window::{EngineConfig, WindowLength};

#[derive(Parser, Debug)]
#[command(name = "live-window", version, about = "Live sliding-window plots in the terminal")]
pub struct Cli {
    /// Samples shown per subplot; a comma list gives one length per subplot.
    #[arg(long, value_delimiter = ',', default_value = "400")]
    pub window: Vec<usize>,

    /// Poll interval in milliseconds.
    #[arg(long, default_value_t = 20)]
    pub interval_ms: u64,

    /// Log the measured frame rate.
    #[arg(long)]
    pub debug: bool,

    /// Sample on a producer thread instead of the UI thread.
    #[arg(long)]
    pub threaded: bool,

    /// Log file; the terminal is taken by the UI.
    #[arg(long, default_value = "live-window.log")]
    pub log_file: PathBuf,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Synthetic trigonometric signals (default).
    Waves {
        /// Time advanced per tick.
        #[arg(long, default_value_t = 0.05)]
        step: f64,

        /// Uniform noise amplitude.
        #[arg(long, default_value_t = 0.0)]
        noise: f64,

        /// Stop after this many ticks.
        #[arg(long)]
        limit: Option<u64>,
    },
    /// Numeric lines from a serial device.
    Serial {
        port: String,

        #[arg(long, default_value_t = 115_200)]
        baud: u32,

        /// Values expected per line.
        #[arg(long, default_value_t = 1, value_parser = at_least_one)]
        columns: usize,

        /// Read timeout in milliseconds.
        #[arg(long, default_value_t = 10)]
        timeout_ms: u64,
    },
}

fn at_least_one(value: &str) -> Result<usize, String> {
    match value.parse::<usize>() {
        Ok(0) => Err("must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}

impl Cli {
    pub fn engine_config(&self) -> EngineConfig {
        let window = match self.window.as_slice() {
            [n] => WindowLength::Uniform(*n),
            lengths => WindowLength::PerSubplot(lengths.to_vec()),
        };
        EngineConfig::new(window, Duration::from_millis(self.interval_ms)).with_debug(self.debug)
    }

    /// Samples each source keeps per series: the largest window.
    pub fn capacity(&self) -> usize {
        self.window.iter().copied().max().unwrap_or(2)
    }

    pub fn source_command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Waves {
            step: 0.05,
            noise: 0.0,
            limit: None,
        })
    }
}
