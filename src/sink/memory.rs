//! src/sink/memory.rs
//!
//! Headless sink that records what the engine drew.

use crate::engine::{AxisBounds, SubplotLayout, SubplotWindow};

use super::RenderSink;

/// Bounds every subplot starts with.
pub const DEFAULT_BOUNDS: AxisBounds = AxisBounds { min: -1.0, max: 1.0 };

#[derive(Clone, Debug)]
pub struct SubplotRecord {
    pub latest: Option<SubplotWindow>,
    /// Every window drawn, oldest first; only filled by a recording sink.
    pub history: Vec<SubplotWindow>,
    pub bounds: AxisBounds,
    /// Each bounds change, in order.
    pub rescales: Vec<AxisBounds>,
    pub draws: u64,
}

impl SubplotRecord {
    fn new(bounds: AxisBounds) -> Self {
        Self {
            latest: None,
            history: Vec::new(),
            bounds,
            rescales: Vec::new(),
            draws: 0,
        }
    }
}

#[derive(Clone, Debug)]
pub struct MemorySink {
    pub subplots: Vec<SubplotRecord>,
    pub layout: Vec<SubplotLayout>,
    pub frames: u64,
    pub close_count: u32,
    initial_bounds: AxisBounds,
    keep_history: bool,
}

impl Default for MemorySink {
    fn default() -> Self {
        Self::new()
    }
}

impl MemorySink {
    /// Keeps only the latest window per subplot.
    pub fn new() -> Self {
        Self {
            subplots: Vec::new(),
            layout: Vec::new(),
            frames: 0,
            close_count: 0,
            initial_bounds: DEFAULT_BOUNDS,
            keep_history: false,
        }
    }

    /// Keeps every window drawn.
    pub fn recording() -> Self {
        Self {
            keep_history: true,
            ..Self::new()
        }
    }

    pub fn with_initial_bounds(mut self, bounds: AxisBounds) -> Self {
        self.initial_bounds = bounds;
        self
    }

    pub fn is_closed(&self) -> bool {
        self.close_count > 0
    }

    fn record(&mut self, subplot: usize) -> &mut SubplotRecord {
        if subplot >= self.subplots.len() {
            let bounds = self.initial_bounds;
            self.subplots.resize_with(subplot + 1, || SubplotRecord::new(bounds));
        }
        &mut self.subplots[subplot]
    }
}

impl RenderSink for MemorySink {
    fn prepare(&mut self, layout: &[SubplotLayout]) {
        self.layout = layout.to_vec();
        if !layout.is_empty() {
            self.record(layout.len() - 1);
        }
    }

    fn draw(&mut self, subplot: usize, window: SubplotWindow) {
        let keep_history = self.keep_history;
        let record = self.record(subplot);
        record.draws += 1;
        if keep_history {
            record.history.push(window.clone());
        }
        record.latest = Some(window);
    }

    fn bounds(&self, subplot: usize) -> AxisBounds {
        self.subplots
            .get(subplot)
            .map(|r| r.bounds)
            .unwrap_or(self.initial_bounds)
    }

    fn set_bounds(&mut self, subplot: usize, bounds: AxisBounds) {
        let record = self.record(subplot);
        record.bounds = bounds;
        record.rescales.push(bounds);
    }

    fn end_frame(&mut self) -> std::io::Result<()> {
        self.frames += 1;
        Ok(())
    }

    fn close(&mut self) {
        self.close_count += 1;
    }
}
