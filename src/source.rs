//! src/source.rs
//!
//! Data sources feeding the engine, and the contract they implement.
//!
//! A source is polled once per tick with the tick index and answers either
//! with the current series of every subplot or with [`Fetch::Exhausted`].
//! Sources own their buffers; the engine only borrows them for the duration
//! of one tick and copies out the retained windows.

pub mod lines;
pub mod ring;
pub mod waves;

pub use lines::{LineSource, open_serial, parse_columns};
pub use ring::RingSeries;
pub use waves::WaveSource;

use crate::engine::{Series, SourceError};

/// One subplot's series as handed out by a source for a single tick.
pub struct SubplotData<'a> {
    pub x: &'a dyn Series,
    pub ys: Vec<&'a dyn Series>,
}

impl<'a> SubplotData<'a> {
    pub fn new(x: &'a dyn Series, ys: Vec<&'a dyn Series>) -> Self {
        Self { x, ys }
    }
}

/// Result of polling a source.
pub enum Fetch<'a> {
    Ready(Vec<SubplotData<'a>>),
    /// The source has no more data; polling stops without an error.
    Exhausted,
}

pub trait DataSource {
    /// Current data for tick `tick`. Errors are fatal to the poll loop.
    fn sample(&mut self, tick: u64) -> Result<Fetch<'_>, SourceError>;
}

impl<S: DataSource + ?Sized> DataSource for Box<S> {
    fn sample(&mut self, tick: u64) -> Result<Fetch<'_>, SourceError> {
        (**self).sample(tick)
    }
}

impl<S: DataSource + ?Sized> DataSource for &mut S {
    fn sample(&mut self, tick: u64) -> Result<Fetch<'_>, SourceError> {
        (**self).sample(tick)
    }
}
