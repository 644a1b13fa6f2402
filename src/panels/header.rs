//! src/panels/header.rs
//!
//! Header and key-hint bars framing the charts.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

/// Bold app title followed by the status line.
pub struct HeaderPanel<'a> {
    pub title: &'a str,
    pub status: &'a str,
}

impl<'a> HeaderPanel<'a> {
    pub fn new(title: &'a str, status: &'a str) -> Self {
        Self { title, status }
    }

    fn line(&self) -> Line<'a> {
        let mut spans = vec![Span::styled(
            self.title,
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )];
        if !self.status.is_empty() {
            spans.push(Span::raw("  |  "));
            spans.push(Span::raw(self.status));
        }
        Line::from(spans)
    }
}

impl crate::ui::Panel for HeaderPanel<'_> {
    fn draw(&self, f: &mut Frame<'_>, area: Rect) {
        let p = Paragraph::new(self.line()).block(Block::default().borders(Borders::ALL));
        f.render_widget(p, area);
    }
}

/// `(key, action)` pairs rendered as `key action` with the key highlighted.
pub struct KeysPanel<'a> {
    pub keys: &'a [(String, String)],
}

impl<'a> KeysPanel<'a> {
    pub fn new(keys: &'a [(String, String)]) -> Self {
        Self { keys }
    }

    fn line(&self) -> Line<'a> {
        let key_style = Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD);
        let spans = self
            .keys
            .iter()
            .enumerate()
            .flat_map(|(i, (key, action))| {
                let gap = if i == 0 { "" } else { "   " };
                [
                    Span::raw(gap),
                    Span::styled(key.as_str(), key_style),
                    Span::raw(" "),
                    Span::raw(action.as_str()),
                ]
            })
            .collect::<Vec<_>>();
        Line::from(spans)
    }
}

impl crate::ui::Panel for KeysPanel<'_> {
    fn draw(&self, f: &mut Frame<'_>, area: Rect) {
        let block = Block::default().title("Keys").borders(Borders::ALL);
        f.render_widget(Paragraph::new(self.line()).block(block), area);
    }
}
