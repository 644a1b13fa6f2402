//! src/engine/error.rs
//!
//! Error taxonomy for the engine. Exhaustion and cancellation are not errors;
//! they are reported as [`Termination`](super::poll::Termination) values.

use std::error::Error;

use super::poll::LoopState;

/// Boxed error returned by a data source for anything other than exhaustion.
pub type SourceError = Box<dyn Error + Send + Sync + 'static>;

#[derive(thiserror::Error, Debug)]
pub enum EngineError {
    /// y-series of one subplot disagree on their current length.
    #[error("y series of one subplot must share a length, got {lengths:?}")]
    LengthMismatch { lengths: Vec<usize> },

    #[error("window length must be at least 2, got {0}")]
    InvalidWindowLength(usize),

    #[error("a subplot needs at least one y series")]
    EmptySubplot,

    /// Per-subplot window lengths do not line up with the subplots the source produced.
    #[error("{configured} window lengths configured but the source produced {discovered} subplots")]
    SubplotCountMismatch { configured: usize, discovered: usize },

    #[error("source shape changed at tick {tick}: expected {expected:?} series per subplot, got {actual:?}")]
    ShapeChanged {
        tick: u64,
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    #[error("data source failed at tick {tick}: {source}")]
    Source {
        tick: u64,
        #[source]
        source: SourceError,
    },

    #[error("render sink failed: {0}")]
    Render(#[from] std::io::Error),

    #[error("poll loop already started")]
    AlreadyStarted,

    #[error("poll loop is not running (state: {0:?})")]
    NotRunning(LoopState),

    #[error("failed to spawn producer thread: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("producer thread panicked")]
    ProducerPanicked,
}

pub type Result<T, E = EngineError> = std::result::Result<T, E>;
