//! src/panels/info.rs
//!
//! Info panel: current bounds, rescale count and latest value per subplot.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use super::chart::{ChartView, PALETTE};

pub struct InfoPanel<'a> {
    pub views: &'a [ChartView],
    pub frames: u64,
}

impl<'a> InfoPanel<'a> {
    pub fn new(views: &'a [ChartView], frames: u64) -> Self {
        Self { views, frames }
    }

    fn lines(&self) -> Vec<Line<'a>> {
        let mut lines = vec![Line::from(format!("frames={}", self.frames))];
        for view in self.views {
            lines.push(Line::from(Span::styled(
                view.title.as_str(),
                Style::default().add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(format!(
                "  bounds=[{:.3},{:.3}]  rescales={}",
                view.bounds.min, view.bounds.max, view.rescales
            )));
            for (i, name) in view.series.iter().enumerate() {
                let last = view
                    .last(i)
                    .map(|v| format!("{v:.3}"))
                    .unwrap_or_else(|| "-".into());
                lines.push(Line::from(vec![
                    Span::styled(
                        format!("  {name}"),
                        Style::default().fg(PALETTE[i % PALETTE.len()]),
                    ),
                    Span::raw(format!(" last={last}")),
                ]));
            }
        }
        lines
    }
}

impl crate::ui::Panel for InfoPanel<'_> {
    fn draw(&self, f: &mut Frame<'_>, area: Rect) {
        let block = Block::default().title("Info").borders(Borders::ALL);
        f.render_widget(Paragraph::new(self.lines()).block(block), area);
    }
}
