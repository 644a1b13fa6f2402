//! src/engine/threaded.rs
//!
//! Producer/consumer poll loop.
//!
//! The tick-0 sample is taken on the caller's thread, then the source moves
//! to a producer thread that sleeps the interval, samples, slices and puts
//! the owned batch into a latest-wins [`Slot`]. The consumer calls
//! [`poll`](ThreadedPollLoop::poll) from its own loop and is the only side
//! that touches the sink. A slow consumer skips batches; the producer never
//! waits for it.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use super::config::EngineConfig;
use super::error::{EngineError, Result};
use super::handoff::Slot;
use super::poll::{Batch, LoopState, Presenter, Sampler, Step, SubplotLayout, Termination};
use crate::sink::RenderSink;
use crate::source::DataSource;

enum Message {
    Batch(Batch),
    Exhausted,
    Failed(EngineError),
}

pub struct ThreadedPollLoop<S: DataSource + Send + 'static, R: RenderSink> {
    config: EngineConfig,
    source: Option<S>,
    presenter: Presenter<R>,
    layout: Vec<SubplotLayout>,
    slot: Arc<Slot<Message>>,
    producer: Option<JoinHandle<()>>,
    state: LoopState,
}

impl<S: DataSource + Send + 'static, R: RenderSink> ThreadedPollLoop<S, R> {
    pub fn new(config: EngineConfig, source: S, sink: R) -> Self {
        Self {
            presenter: Presenter::new(sink, &config),
            config,
            source: Some(source),
            layout: Vec::new(),
            slot: Arc::new(Slot::new()),
            producer: None,
            state: LoopState::Idle,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Tick of the last batch drawn.
    pub fn last_tick(&self) -> Option<u64> {
        self.presenter.last_tick()
    }

    pub fn layout(&self) -> &[SubplotLayout] {
        &self.layout
    }

    /// Batches the producer replaced before they were drawn.
    pub fn dropped(&self) -> u64 {
        self.slot.dropped()
    }

    pub fn sink(&self) -> &R {
        self.presenter.sink()
    }

    pub fn sink_mut(&mut self) -> &mut R {
        self.presenter.sink_mut()
    }

    /// Sample and draw tick 0 on this thread, then spawn the producer.
    pub fn start(&mut self) -> Result<Step> {
        if self.state != LoopState::Idle {
            return Err(EngineError::AlreadyStarted);
        }
        let Some(source) = self.source.take() else {
            return Err(EngineError::AlreadyStarted);
        };
        self.state = LoopState::Running;
        tracing::info!("threaded poll loop started");

        let mut sampler = Sampler::new(source, self.config.window_length.clone());
        let batch = match sampler.prime() {
            Ok(Some(batch)) => batch,
            Ok(None) => return Ok(self.finish(Termination::Exhausted)),
            Err(e) => return Err(self.fail(e)),
        };
        self.layout = sampler.layout().to_vec();
        self.presenter.prepare(&self.layout);
        if let Err(e) = self.presenter.present(batch) {
            return Err(self.fail(e));
        }

        let slot = self.slot.clone();
        let interval = self.config.interval;
        let spawned = thread::Builder::new()
            .name("live-window-producer".into())
            .spawn(move || produce(sampler, &slot, interval));
        match spawned {
            Ok(handle) => {
                self.producer = Some(handle);
                Ok(Step::Continue)
            }
            Err(e) => Err(self.fail(EngineError::Spawn(e))),
        }
    }

    /// Wait up to `timeout` for the next batch and draw it.
    ///
    /// Returns `Step::Continue` when nothing arrived in time.
    pub fn poll(&mut self, timeout: Duration) -> Result<Step> {
        if self.state != LoopState::Running {
            return Err(EngineError::NotRunning(self.state));
        }
        if let Some(message) = self.slot.take_timeout(timeout) {
            return self.handle(message);
        }
        if self.producer.as_ref().is_some_and(|h| h.is_finished()) {
            // the producer's last message may have landed after the timeout
            if let Some(message) = self.slot.try_take() {
                return self.handle(message);
            }
            return Err(self.fail(EngineError::ProducerPanicked));
        }
        Ok(Step::Continue)
    }

    /// Stop the producer, wait for it to exit and release the sink.
    /// No-op before `start` and once terminal.
    pub fn cancel(&mut self) {
        if self.state == LoopState::Running {
            self.finish(Termination::Stopped);
        }
    }

    fn handle(&mut self, message: Message) -> Result<Step> {
        match message {
            Message::Batch(batch) => match self.presenter.present(batch) {
                Ok(()) => Ok(Step::Continue),
                Err(e) => Err(self.fail(e)),
            },
            Message::Exhausted => Ok(self.finish(Termination::Exhausted)),
            Message::Failed(e) => Err(self.fail(e)),
        }
    }

    /// Close the slot and join the producer.
    fn shutdown(&mut self) -> Result<()> {
        self.slot.close();
        match self.producer.take() {
            Some(handle) => handle.join().map_err(|_| EngineError::ProducerPanicked),
            None => Ok(()),
        }
    }

    fn finish(&mut self, termination: Termination) -> Step {
        if let Err(e) = self.shutdown() {
            tracing::warn!(error = %e, "producer did not exit cleanly");
        }
        self.state = termination.into();
        tracing::info!(
            ?termination,
            last_tick = ?self.presenter.last_tick(),
            dropped = self.slot.dropped(),
            "threaded poll loop finished"
        );
        self.presenter.close();
        Step::Finished(termination)
    }

    fn fail(&mut self, error: EngineError) -> EngineError {
        // a panicked producer was already reported through `error`
        let _ = self.shutdown();
        self.state = LoopState::Failed;
        tracing::error!(error = %error, "threaded poll loop failed");
        self.presenter.close();
        error
    }
}

impl<S: DataSource + Send + 'static, R: RenderSink> Drop for ThreadedPollLoop<S, R> {
    fn drop(&mut self) {
        self.cancel();
    }
}

fn produce<S: DataSource>(mut sampler: Sampler<S>, slot: &Slot<Message>, interval: Duration) {
    loop {
        if slot.sleep_unless_closed(interval) {
            break;
        }
        let message = match sampler.next() {
            Ok(Some(batch)) => Message::Batch(batch),
            Ok(None) => Message::Exhausted,
            Err(e) => Message::Failed(e),
        };
        let last = !matches!(message, Message::Batch(_));
        if !slot.put(message) || last {
            break;
        }
    }
    tracing::debug!(tick = sampler.tick(), "producer exiting");
}
