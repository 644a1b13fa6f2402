//! src/lib.rs
//!
//! Live sliding-window plotting engine.
//!
//! A [`DataSource`] is polled on a fixed interval; the last `window_length`
//! samples of every series are cut into fixed-size windows and handed to a
//! [`RenderSink`], which also holds the y-axis bounds the engine rescales
//! with hysteresis. [`PollLoop`] runs everything on the caller's thread,
//! [`ThreadedPollLoop`] moves sampling to a producer thread.

pub mod engine;
pub mod panels;
pub mod sink;
pub mod source;
pub mod ui;

pub use engine::{
    AxisBounds, EngineConfig, EngineError, LoopState, PollLoop, Step, Termination, ThreadedPollLoop,
    WindowLength,
};
pub use sink::{MemorySink, RenderSink, TuiSink};
pub use source::{DataSource, Fetch, SubplotData};
