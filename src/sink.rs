//! src/sink.rs
//!
//! Rendering surfaces driven by the engine.
//!
//! A sink owns the drawing side: the latest windows per subplot and the
//! visible y-axis bounds. The engine only ever touches it from one thread.

pub mod memory;
pub mod tui;

pub use memory::{MemorySink, SubplotRecord};
pub use tui::TuiSink;

use std::io;

use crate::engine::{AxisBounds, SubplotLayout, SubplotWindow};

pub trait RenderSink {
    /// Called once the subplot shape is known, before the first `draw`.
    fn prepare(&mut self, _layout: &[SubplotLayout]) {}

    /// Replace the lines of `subplot` with `window`.
    fn draw(&mut self, subplot: usize, window: SubplotWindow);

    /// Current y-axis bounds of `subplot`.
    fn bounds(&self, subplot: usize) -> AxisBounds;

    fn set_bounds(&mut self, subplot: usize, bounds: AxisBounds);

    /// Called after every subplot was drawn for a tick.
    fn end_frame(&mut self) -> io::Result<()> {
        Ok(())
    }

    /// Release drawing resources. Called exactly once when the loop ends.
    fn close(&mut self);
}

impl<R: RenderSink + ?Sized> RenderSink for Box<R> {
    fn prepare(&mut self, layout: &[SubplotLayout]) {
        (**self).prepare(layout);
    }

    fn draw(&mut self, subplot: usize, window: SubplotWindow) {
        (**self).draw(subplot, window);
    }

    fn bounds(&self, subplot: usize) -> AxisBounds {
        (**self).bounds(subplot)
    }

    fn set_bounds(&mut self, subplot: usize, bounds: AxisBounds) {
        (**self).set_bounds(subplot, bounds);
    }

    fn end_frame(&mut self) -> io::Result<()> {
        (**self).end_frame()
    }

    fn close(&mut self) {
        (**self).close();
    }
}

impl<R: RenderSink + ?Sized> RenderSink for &mut R {
    fn prepare(&mut self, layout: &[SubplotLayout]) {
        (**self).prepare(layout);
    }

    fn draw(&mut self, subplot: usize, window: SubplotWindow) {
        (**self).draw(subplot, window);
    }

    fn bounds(&self, subplot: usize) -> AxisBounds {
        (**self).bounds(subplot)
    }

    fn set_bounds(&mut self, subplot: usize, bounds: AxisBounds) {
        (**self).set_bounds(subplot, bounds);
    }

    fn end_frame(&mut self) -> io::Result<()> {
        (**self).end_frame()
    }

    fn close(&mut self) {
        (**self).close();
    }
}
