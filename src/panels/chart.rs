//! src/panels/chart.rs
//!
//! Chart panel: renders one subplot's windows as line datasets.
//!
//! The y axis shows the bounds the engine last set; the x axis follows the
//! finite extent of the x window so the plot scrolls with the data. Padding
//! slots (NaN) are simply not plotted.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    symbols,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
};

use crate::engine::{AxisBounds, SubplotWindow};

/// Line colors, cycled per series.
pub const PALETTE: [Color; 6] = [
    Color::Cyan,
    Color::Yellow,
    Color::Magenta,
    Color::Green,
    Color::Red,
    Color::Blue,
];

/// Render state of one subplot, owned by the terminal sink.
#[derive(Clone, Debug)]
pub struct ChartView {
    pub title: String,
    pub series: Vec<String>,
    pub window: Option<SubplotWindow>,
    pub bounds: AxisBounds,
    pub rescales: u64,
}

impl ChartView {
    pub fn new(title: impl Into<String>, series: Vec<String>, bounds: AxisBounds) -> Self {
        Self {
            title: title.into(),
            series,
            window: None,
            bounds,
            rescales: 0,
        }
    }

    /// Latest finite sample of series `index`.
    pub fn last(&self, index: usize) -> Option<f64> {
        let window = self.window.as_ref()?;
        window.ys.get(index)?.iter().rev().copied().find(|v| v.is_finite())
    }

    /// Plottable `(x, y)` points of every series.
    pub fn points(&self) -> Vec<Vec<(f64, f64)>> {
        let Some(window) = &self.window else {
            return Vec::new();
        };
        window
            .ys
            .iter()
            .map(|y| {
                window
                    .x
                    .iter()
                    .zip(y.iter())
                    .filter(|(x, y)| x.is_finite() && y.is_finite())
                    .map(|(&x, &y)| (x, y))
                    .collect()
            })
            .collect()
    }

    /// Finite x extent, never empty.
    pub fn x_bounds(&self) -> (f64, f64) {
        let span = self.window.as_ref().and_then(|w| w.x.span());
        match span {
            Some((a, b)) if a != b => (a.min(b), a.max(b)),
            Some((a, _)) => (a - 0.5, a + 0.5),
            None => (0.0, 1.0),
        }
    }
}

pub struct ChartPanel<'a> {
    pub view: &'a ChartView,
}

impl<'a> ChartPanel<'a> {
    pub fn new(view: &'a ChartView) -> Self {
        Self { view }
    }
}

impl crate::ui::Panel for ChartPanel<'_> {
    fn draw(&self, f: &mut Frame<'_>, area: Rect) {
        let view = self.view;
        // datasets borrow these until the chart is rendered
        let points = view.points();
        let datasets: Vec<Dataset> = points
            .iter()
            .enumerate()
            .map(|(i, data)| {
                let name = view.series.get(i).cloned().unwrap_or_else(|| format!("y{i}"));
                Dataset::default()
                    .name(name)
                    .marker(symbols::Marker::Braille)
                    .graph_type(GraphType::Line)
                    .style(Style::default().fg(PALETTE[i % PALETTE.len()]))
                    .data(data.as_slice())
            })
            .collect();

        let AxisBounds { min: ymin, max: ymax } = view.bounds;
        let span = (ymax - ymin).max(1e-9);
        let y_labels: Vec<String> = (0..5)
            .map(|i| format!("{:.3}", ymin + span * (i as f64) / 4.0))
            .collect();
        let (xmin, xmax) = view.x_bounds();

        let chart = Chart::new(datasets)
            .block(Block::default().title(view.title.clone()).borders(Borders::ALL))
            .x_axis(Axis::default().bounds([xmin, xmax]))
            .y_axis(Axis::default().bounds([ymin, ymax]).labels(y_labels));

        f.render_widget(chart, area);
    }
}
