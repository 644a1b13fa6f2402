//! src/panels.rs
//!
//! Top-level panels module and re-exports.

pub mod chart;
pub mod header;
pub mod info;

pub use chart::{ChartPanel, ChartView};
pub use header::{HeaderPanel, KeysPanel};
pub use info::InfoPanel;
