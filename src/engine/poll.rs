//! src/engine/poll.rs
//!
//! The poll loop: pull from a source, slice, render, rescale.
//!
//! # States
//! `Idle → Running → {Stopped, Exhausted, Failed}`. The terminal states are
//! final; a finished loop is replaced, never restarted.
//!
//! # Halves
//! Work is split into a [`Sampler`] (source side: sample and slice into an
//! owned [`Batch`]) and a [`Presenter`] (sink side: draw, pace, rescale).
//! [`PollLoop`] runs both on the caller's thread; the threaded loop moves the
//! sampler to a producer thread.

use std::thread;
use std::time::{Duration, Instant};

use super::config::{EngineConfig, WindowLength, rescale_cadence};
use super::error::{EngineError, Result};
use super::rescale::RescalePolicy;
use super::timer::FrameTimer;
use super::window::{SubplotWindow, slice};
use crate::sink::RenderSink;
use crate::source::{DataSource, Fetch};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
    Idle,
    Running,
    Stopped,
    Exhausted,
    Failed,
}

impl LoopState {
    pub fn is_terminal(self) -> bool {
        matches!(self, LoopState::Stopped | LoopState::Exhausted | LoopState::Failed)
    }
}

/// How a loop ended without an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Termination {
    /// Cancelled from outside, e.g. the window was closed.
    Stopped,
    /// The source reported it has no more data.
    Exhausted,
}

impl From<Termination> for LoopState {
    fn from(t: Termination) -> Self {
        match t {
            Termination::Stopped => LoopState::Stopped,
            Termination::Exhausted => LoopState::Exhausted,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    Continue,
    Finished(Termination),
}

/// Shape of one subplot, fixed by the tick-0 sample.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SubplotLayout {
    /// Number of y-series.
    pub series: usize,
    pub window_length: usize,
}

/// Windows of every subplot for one tick.
#[derive(Clone, Debug)]
pub struct Batch {
    pub tick: u64,
    pub subplots: Vec<SubplotWindow>,
}

/// Source half: owns the source and the running tick index.
pub(crate) struct Sampler<S> {
    source: S,
    window_length: WindowLength,
    layout: Vec<SubplotLayout>,
    tick: u64,
    primed: bool,
}

impl<S: DataSource> Sampler<S> {
    pub(crate) fn new(source: S, window_length: WindowLength) -> Self {
        Self {
            source,
            window_length,
            layout: Vec::new(),
            tick: 0,
            primed: false,
        }
    }

    pub(crate) fn layout(&self) -> &[SubplotLayout] {
        &self.layout
    }

    pub(crate) fn tick(&self) -> u64 {
        self.tick
    }

    /// Take the tick-0 sample and fix the subplot layout from it.
    pub(crate) fn prime(&mut self) -> Result<Option<Batch>> {
        self.sample_at(0)
    }

    /// Advance the tick index and sample. `None` means the source is exhausted.
    pub(crate) fn next(&mut self) -> Result<Option<Batch>> {
        self.tick += 1;
        self.sample_at(self.tick)
    }

    fn sample_at(&mut self, tick: u64) -> Result<Option<Batch>> {
        let fetch = self
            .source
            .sample(tick)
            .map_err(|source| EngineError::Source { tick, source })?;
        let subplots = match fetch {
            Fetch::Ready(subplots) => subplots,
            Fetch::Exhausted => return Ok(None),
        };

        let series: Vec<usize> = subplots.iter().map(|s| s.ys.len()).collect();
        if !self.primed {
            let lengths = self.window_length.resolve(subplots.len())?;
            self.layout = series
                .iter()
                .zip(lengths)
                .map(|(&series, window_length)| SubplotLayout {
                    series,
                    window_length,
                })
                .collect();
            self.primed = true;
            tracing::debug!(layout = ?self.layout, "subplot layout discovered");
        } else if self.layout.len() != series.len()
            || self.layout.iter().zip(&series).any(|(l, &n)| l.series != n)
        {
            return Err(EngineError::ShapeChanged {
                tick,
                expected: self.layout.iter().map(|l| l.series).collect(),
                actual: series,
            });
        }

        let windows = subplots
            .iter()
            .zip(&self.layout)
            .map(|(data, layout)| slice(layout.window_length, data.x, &data.ys))
            .collect::<Result<Vec<_>>>()?;
        Ok(Some(Batch {
            tick,
            subplots: windows,
        }))
    }
}

/// Sink half: draws batches, measures the frame rate and rescales.
pub(crate) struct Presenter<R: RenderSink> {
    sink: R,
    layout: Vec<SubplotLayout>,
    policy: RescalePolicy,
    warmup_ticks: u64,
    debug: bool,
    timer: FrameTimer,
    last_tick: Option<u64>,
    closed: bool,
}

impl<R: RenderSink> Presenter<R> {
    pub(crate) fn new(sink: R, config: &EngineConfig) -> Self {
        Self {
            sink,
            layout: Vec::new(),
            policy: config.rescale,
            warmup_ticks: config.warmup_ticks,
            debug: config.debug,
            timer: FrameTimer::new(config.interval, config.rate_window()),
            last_tick: None,
            closed: false,
        }
    }

    pub(crate) fn sink(&self) -> &R {
        &self.sink
    }

    pub(crate) fn sink_mut(&mut self) -> &mut R {
        &mut self.sink
    }

    pub(crate) fn last_tick(&self) -> Option<u64> {
        self.last_tick
    }

    pub(crate) fn prepare(&mut self, layout: &[SubplotLayout]) {
        self.layout = layout.to_vec();
        self.sink.prepare(layout);
    }

    /// A rescale is due when a cadence boundary lies in `(last, tick]`, so
    /// skipped ticks cannot hide it.
    fn rescale_due(&self, tick: u64, window_length: usize) -> bool {
        let cadence = rescale_cadence(window_length);
        let crossed = match self.last_tick {
            Some(last) => tick / cadence > last / cadence,
            None => tick % cadence == 0,
        };
        tick > self.warmup_ticks && crossed
    }

    pub(crate) fn present(&mut self, batch: Batch) -> Result<()> {
        let tick = batch.tick;
        for (index, window) in batch.subplots.into_iter().enumerate() {
            let due = self
                .layout
                .get(index)
                .is_some_and(|l| self.rescale_due(tick, l.window_length));
            let target = if due {
                self.policy.decide(window.y_values(), self.sink.bounds(index))
            } else {
                None
            };

            self.sink.draw(index, window);

            match target {
                Some(bounds) if bounds.is_finite() => {
                    tracing::trace!(tick, subplot = index, ?bounds, "rescaling y axis");
                    self.sink.set_bounds(index, bounds);
                }
                Some(bounds) => {
                    tracing::warn!(tick, subplot = index, ?bounds, "skipping non-finite rescale");
                }
                None => {}
            }
        }
        self.sink.end_frame()?;
        self.last_tick = Some(tick);

        if let Some(report) = self.timer.tick() {
            if self.debug {
                tracing::info!(fps = report.rate, frames = report.frames, "frame rate");
            }
            if report.slowdown {
                tracing::warn!(
                    fps = report.rate,
                    target = self.timer.target_rate(),
                    "animation slowdown"
                );
            }
        }
        Ok(())
    }

    /// Release the sink; later calls are no-ops.
    pub(crate) fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            self.sink.close();
        }
    }
}

/// Single-threaded poll loop.
///
/// Either call [`tick`](PollLoop::tick) from an external frame scheduler, or
/// let [`run_until`](PollLoop::run_until) pace it on the current thread.
pub struct PollLoop<S: DataSource, R: RenderSink> {
    sampler: Sampler<S>,
    presenter: Presenter<R>,
    state: LoopState,
    interval: Duration,
}

impl<S: DataSource, R: RenderSink> PollLoop<S, R> {
    pub fn new(config: EngineConfig, source: S, sink: R) -> Self {
        Self {
            sampler: Sampler::new(source, config.window_length.clone()),
            presenter: Presenter::new(sink, &config),
            state: LoopState::Idle,
            interval: config.interval,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Index of the most recent tick (0 right after `start`).
    pub fn tick_index(&self) -> u64 {
        self.sampler.tick()
    }

    pub fn layout(&self) -> &[SubplotLayout] {
        self.sampler.layout()
    }

    pub fn sink(&self) -> &R {
        self.presenter.sink()
    }

    pub fn sink_mut(&mut self) -> &mut R {
        self.presenter.sink_mut()
    }

    /// Take the tick-0 sample, discover the layout and draw it.
    pub fn start(&mut self) -> Result<Step> {
        if self.state != LoopState::Idle {
            return Err(EngineError::AlreadyStarted);
        }
        self.state = LoopState::Running;
        tracing::info!("poll loop started");
        let sampled = self.sampler.prime();
        if let Ok(Some(_)) = &sampled {
            self.presenter.prepare(self.sampler.layout());
        }
        self.advance(sampled)
    }

    /// Run one poll/render cycle.
    pub fn tick(&mut self) -> Result<Step> {
        if self.state != LoopState::Running {
            return Err(EngineError::NotRunning(self.state));
        }
        let sampled = self.sampler.next();
        self.advance(sampled)
    }

    /// Stop the loop and release the sink. No-op before `start` and once terminal.
    pub fn cancel(&mut self) {
        if self.state == LoopState::Running {
            self.finish(Termination::Stopped);
        }
    }

    /// Start if needed, then tick every `interval` until the loop finishes
    /// or `stop` returns `true`.
    pub fn run_until(&mut self, mut stop: impl FnMut() -> bool) -> Result<Termination> {
        if self.state == LoopState::Idle {
            if let Step::Finished(t) = self.start()? {
                return Ok(t);
            }
        }
        let mut frame_start = Instant::now();
        loop {
            let elapsed = frame_start.elapsed();
            if elapsed < self.interval {
                thread::sleep(self.interval - elapsed);
            }
            if stop() {
                self.cancel();
                return Ok(Termination::Stopped);
            }
            frame_start = Instant::now();
            if let Step::Finished(t) = self.tick()? {
                return Ok(t);
            }
        }
    }

    fn advance(&mut self, sampled: Result<Option<Batch>>) -> Result<Step> {
        let outcome = sampled.and_then(|batch| match batch {
            Some(batch) => self.presenter.present(batch).map(|_| Step::Continue),
            None => Ok(Step::Finished(Termination::Exhausted)),
        });
        match outcome {
            Ok(Step::Finished(t)) => {
                self.finish(t);
                Ok(Step::Finished(t))
            }
            Ok(step) => Ok(step),
            Err(e) => {
                self.state = LoopState::Failed;
                tracing::error!(error = %e, tick = self.sampler.tick(), "poll loop failed");
                self.presenter.close();
                Err(e)
            }
        }
    }

    fn finish(&mut self, termination: Termination) {
        self.state = termination.into();
        tracing::info!(?termination, tick = self.sampler.tick(), "poll loop finished");
        self.presenter.close();
    }
}

impl<S: DataSource, R: RenderSink> Drop for PollLoop<S, R> {
    fn drop(&mut self) {
        self.cancel();
    }
}
