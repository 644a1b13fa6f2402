//! src/app.rs
//!
//! Terminal application: builds the source named on the command line, wraps
//! the terminal in a [`TuiSink`] and drives one of the two poll loops until
//! the source runs out or the user quits.
//!
//! # Keyboard Controls
//!
//! - **q** / **Esc**: stop polling and restore the terminal.
//!
//! # Loop models
//!
//! - default: [`PollLoop::run_until`] samples and draws on the UI thread.
//! - `--threaded`: a producer thread samples; the UI thread draws whatever
//!   batch is newest each frame and skips the rest.

use std::io;
use std::time::Duration;

use color_eyre::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::backend::Backend;

use live_window::engine::{EngineConfig, Step, Termination};
use live_window::source::waves::{WAVE_SERIES, WAVE_TITLES};
use live_window::source::{WaveSource, open_serial};
use live_window::{DataSource, PollLoop, ThreadedPollLoop, TuiSink};

use crate::cli::{Cli, Commands};

const KEYS: &[(&str, &str)] = &[("q", "quit"), ("Esc", "quit")];

pub fn run(cli: &Cli) -> Result<()> {
    let config = cli.engine_config();
    tracing::info!(?config, threaded = cli.threaded, "starting");
    match cli.source_command() {
        Commands::Waves { step, noise, limit } => {
            let mut source = WaveSource::new(cli.capacity(), step).with_noise(noise, rand::random());
            if let Some(limit) = limit {
                source = source.with_limit(limit);
            }
            let names = WAVE_SERIES
                .iter()
                .map(|s| s.iter().map(|n| n.to_string()).collect())
                .collect();
            drive(cli, config, source, WAVE_TITLES.map(String::from).to_vec(), names)
        }
        Commands::Serial {
            port,
            baud,
            columns,
            timeout_ms,
        } => {
            let source = open_serial(
                &port,
                baud,
                Duration::from_millis(timeout_ms),
                columns,
                cli.capacity(),
            )?;
            let names = vec![(0..columns).map(|i| format!("col {i}")).collect()];
            drive(cli, config, source, vec![port], names)
        }
    }
}

fn drive<S: DataSource + Send + 'static>(
    cli: &Cli,
    config: EngineConfig,
    source: S,
    titles: Vec<String>,
    names: Vec<Vec<String>>,
) -> Result<()> {
    let terminal = ratatui::init();
    let sink = TuiSink::new(terminal, "Live window")
        .with_subplot_titles(titles)
        .with_series_names(names)
        .with_keys(KEYS);
    let result = if cli.threaded {
        run_threaded(config, source, sink)
    } else {
        run_cooperative(config, source, sink)
    };
    ratatui::restore();
    let termination = result?;
    tracing::info!(?termination, "exiting");
    Ok(())
}

fn run_cooperative<S: DataSource, B: Backend>(
    config: EngineConfig,
    source: S,
    mut sink: TuiSink<B>,
) -> Result<Termination> {
    sink.set_status(format!("polling every {:?}", config.interval));
    let mut poll = PollLoop::new(config, source, sink);
    let mut input_error = None;
    let termination = poll.run_until(|| match quit_requested() {
        Ok(quit) => quit,
        Err(e) => {
            input_error = Some(e);
            true
        }
    })?;
    if let Some(e) = input_error {
        return Err(e.into());
    }
    Ok(termination)
}

fn run_threaded<S: DataSource + Send + 'static, B: Backend>(
    config: EngineConfig,
    source: S,
    sink: TuiSink<B>,
) -> Result<Termination> {
    let frame_time = config.interval;
    let mut poll = ThreadedPollLoop::new(config, source, sink);
    if let Step::Finished(termination) = poll.start()? {
        return Ok(termination);
    }
    loop {
        if quit_requested()? {
            poll.cancel();
            return Ok(Termination::Stopped);
        }
        let status = format!(
            "producer thread  tick {}  skipped {}",
            poll.last_tick().unwrap_or(0),
            poll.dropped()
        );
        poll.sink_mut().set_status(status);
        if let Step::Finished(termination) = poll.poll(frame_time)? {
            return Ok(termination);
        }
    }
}

/// Drain pending key events; `true` once q or Esc was pressed.
fn quit_requested() -> io::Result<bool> {
    while event::poll(Duration::ZERO)? {
        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press
                && matches!(key.code, KeyCode::Char('q') | KeyCode::Esc)
            {
                return Ok(true);
            }
        }
    }
    Ok(false)
}
