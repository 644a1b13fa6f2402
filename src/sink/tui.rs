//! src/sink/tui.rs
//!
//! Terminal sink: draws every subplot as a ratatui chart.
//!
//! Layout per frame:
//! - header (app title, status line)
//! - charts stacked vertically, with an info column on the right
//! - key hints
//!
//! The sink does not own the terminal mode; whoever created the terminal
//! restores it.

use std::io;

use ratatui::Terminal;
use ratatui::backend::Backend;
use ratatui::layout::{Constraint, Direction};

use super::RenderSink;
use super::memory::DEFAULT_BOUNDS;
use crate::engine::{AxisBounds, SubplotLayout, SubplotWindow};
use crate::panels::{ChartPanel, ChartView, HeaderPanel, InfoPanel, KeysPanel};
use crate::ui::{even, group, leaf};

pub struct TuiSink<B: Backend> {
    terminal: Terminal<B>,
    title: String,
    status: String,
    keys: Vec<(String, String)>,
    titles: Vec<String>,
    series_names: Vec<Vec<String>>,
    views: Vec<ChartView>,
    initial_bounds: AxisBounds,
    frames: u64,
    closed: bool,
}

impl<B: Backend> TuiSink<B> {
    pub fn new(terminal: Terminal<B>, title: &str) -> Self {
        Self {
            terminal,
            title: title.to_string(),
            status: String::new(),
            keys: vec![("q".to_string(), "quit".to_string())],
            titles: Vec::new(),
            series_names: Vec::new(),
            views: Vec::new(),
            initial_bounds: DEFAULT_BOUNDS,
            frames: 0,
            closed: false,
        }
    }

    pub fn with_subplot_titles<I, T>(mut self, titles: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.titles = titles.into_iter().map(Into::into).collect();
        self
    }

    /// Legend names, one list per subplot.
    pub fn with_series_names(mut self, names: Vec<Vec<String>>) -> Self {
        self.series_names = names;
        self
    }

    /// Key hints shown under the charts, as `(key, action)` pairs.
    pub fn with_keys(mut self, keys: &[(&str, &str)]) -> Self {
        self.keys = keys
            .iter()
            .map(|(k, a)| (k.to_string(), a.to_string()))
            .collect();
        self
    }

    pub fn with_initial_bounds(mut self, bounds: AxisBounds) -> Self {
        self.initial_bounds = bounds;
        self
    }

    /// Text shown under the title on the next frame.
    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    pub fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }

    pub fn views(&self) -> &[ChartView] {
        &self.views
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn make_view(&self, subplot: usize, series: usize) -> ChartView {
        let title = self
            .titles
            .get(subplot)
            .cloned()
            .unwrap_or_else(|| format!("subplot {subplot}"));
        let names = self.series_names.get(subplot);
        let series = (0..series)
            .map(|i| {
                names
                    .and_then(|n| n.get(i))
                    .cloned()
                    .unwrap_or_else(|| format!("y{i}"))
            })
            .collect();
        ChartView::new(title, series, self.initial_bounds)
    }

    fn view_mut(&mut self, subplot: usize) -> &mut ChartView {
        while self.views.len() <= subplot {
            let view = self.make_view(self.views.len(), 0);
            self.views.push(view);
        }
        &mut self.views[subplot]
    }
}

impl<B: Backend> RenderSink for TuiSink<B> {
    fn prepare(&mut self, layout: &[SubplotLayout]) {
        self.views = layout
            .iter()
            .enumerate()
            .map(|(i, l)| self.make_view(i, l.series))
            .collect();
    }

    fn draw(&mut self, subplot: usize, window: SubplotWindow) {
        let view = self.view_mut(subplot);
        // subplots drawn without a prepared layout get generic series names
        while view.series.len() < window.ys.len() {
            view.series.push(format!("y{}", view.series.len()));
        }
        view.window = Some(window);
    }

    fn bounds(&self, subplot: usize) -> AxisBounds {
        self.views
            .get(subplot)
            .map(|v| v.bounds)
            .unwrap_or(self.initial_bounds)
    }

    fn set_bounds(&mut self, subplot: usize, bounds: AxisBounds) {
        let view = self.view_mut(subplot);
        view.bounds = bounds;
        view.rescales += 1;
    }

    fn end_frame(&mut self) -> io::Result<()> {
        if self.closed {
            return Ok(());
        }
        let charts = self.views.iter().map(|v| leaf(ChartPanel::new(v))).collect();
        let root = group(
            Direction::Vertical,
            vec![
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(3),
            ],
            vec![
                leaf(HeaderPanel::new(&self.title, &self.status)),
                group(
                    Direction::Horizontal,
                    vec![Constraint::Percentage(75), Constraint::Percentage(25)],
                    vec![
                        even(Direction::Vertical, charts),
                        leaf(InfoPanel::new(&self.views, self.frames)),
                    ],
                ),
                leaf(KeysPanel::new(&self.keys)),
            ],
        );
        self.terminal.draw(|f| root.draw(f, f.area()))?;
        self.frames += 1;
        Ok(())
    }

    fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            tracing::debug!(frames = self.frames, "terminal sink closed");
        }
    }
}
