//! src/engine.rs
//!
//! Top-level `engine` module: windowing, rescaling, pacing and the poll loops.

pub mod config;
pub mod error;
pub mod handoff;
pub mod poll;
pub mod rescale;
pub mod threaded;
pub mod timer;
pub mod window;

/// Re-exports
pub use config::{DEFAULT_WARMUP_TICKS, EngineConfig, WindowLength, rescale_cadence};
pub use error::{EngineError, Result, SourceError};
pub use handoff::Slot;
pub use poll::{Batch, LoopState, PollLoop, Step, SubplotLayout, Termination};
pub use rescale::{AxisBounds, RescalePolicy, decide};
pub use threaded::ThreadedPollLoop;
pub use timer::{FrameReport, FrameTimer, SLOWDOWN_FACTOR};
pub use window::{Sample, Series, SubplotWindow, Window, slice};
