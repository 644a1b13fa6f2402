//! src/engine/config.rs
//!
//! Configuration values for windowing, polling cadence and rescaling.

use std::time::Duration;

use super::error::{EngineError, Result};
use super::rescale::RescalePolicy;

/// Ticks that must pass before the first rescale check; early readings are unstable.
pub const DEFAULT_WARMUP_TICKS: u64 = 5;

/// Ticks between rescale checks: half the window for even lengths, the whole
/// window for odd ones (the first tick count divisible by `length / 2`).
pub fn rescale_cadence(window_length: usize) -> u64 {
    let length = window_length.max(2) as u64;
    if length % 2 == 0 { length / 2 } else { length }
}

/// Samples retained per subplot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WindowLength {
    /// One length broadcast to every subplot.
    Uniform(usize),
    /// One length per subplot, in subplot order.
    PerSubplot(Vec<usize>),
}

impl WindowLength {
    /// Resolve to one length per subplot once the subplot count is known.
    pub fn resolve(&self, subplots: usize) -> Result<Vec<usize>> {
        let lengths = match self {
            WindowLength::Uniform(n) => vec![*n; subplots],
            WindowLength::PerSubplot(v) => {
                if v.len() != subplots {
                    return Err(EngineError::SubplotCountMismatch {
                        configured: v.len(),
                        discovered: subplots,
                    });
                }
                v.clone()
            }
        };
        if let Some(&bad) = lengths.iter().find(|&&n| n < 2) {
            return Err(EngineError::InvalidWindowLength(bad));
        }
        Ok(lengths)
    }
}

impl From<usize> for WindowLength {
    fn from(n: usize) -> Self {
        WindowLength::Uniform(n)
    }
}

impl From<Vec<usize>> for WindowLength {
    fn from(v: Vec<usize>) -> Self {
        WindowLength::PerSubplot(v)
    }
}

#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// Number of samples visible per subplot.
    pub window_length: WindowLength,

    /// Target time between polls of the data source.
    pub interval: Duration,

    /// Log the effective frame rate on every timer report.
    pub debug: bool,

    /// Period over which the frame rate is measured. `None` uses `interval`.
    pub rate_window: Option<Duration>,

    /// Rescale checks are skipped until the tick index exceeds this.
    pub warmup_ticks: u64,

    pub rescale: RescalePolicy,
}

impl EngineConfig {
    /// Create a new `EngineConfig` with default rescale settings.
    pub fn new(window_length: impl Into<WindowLength>, interval: Duration) -> Self {
        Self {
            window_length: window_length.into(),
            interval,
            ..Self::default()
        }
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_rate_window(mut self, window: Duration) -> Self {
        self.rate_window = Some(window);
        self
    }

    pub fn with_rescale(mut self, rescale: RescalePolicy) -> Self {
        self.rescale = rescale;
        self
    }

    /// Effective period of the frame-rate report.
    pub fn rate_window(&self) -> Duration {
        self.rate_window.unwrap_or(self.interval)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            window_length: WindowLength::Uniform(400),
            interval: Duration::from_millis(1),
            debug: false,
            rate_window: None,
            warmup_ticks: DEFAULT_WARMUP_TICKS,
            rescale: RescalePolicy::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_length_broadcasts() {
        let lengths = WindowLength::Uniform(50).resolve(3).unwrap();
        assert_eq!(lengths, vec![50, 50, 50]);
    }

    #[test]
    fn per_subplot_length_must_match_subplot_count() {
        let err = WindowLength::PerSubplot(vec![10, 20]).resolve(3).unwrap_err();
        assert!(matches!(
            err,
            EngineError::SubplotCountMismatch {
                configured: 2,
                discovered: 3
            }
        ));
    }

    #[test]
    fn lengths_below_two_are_rejected() {
        assert!(matches!(
            WindowLength::PerSubplot(vec![10, 1]).resolve(2),
            Err(EngineError::InvalidWindowLength(1))
        ));
        assert!(matches!(
            WindowLength::Uniform(0).resolve(1),
            Err(EngineError::InvalidWindowLength(0))
        ));
    }

    #[test]
    fn cadence_is_half_even_windows_and_whole_odd_ones() {
        assert_eq!(rescale_cadence(2), 1);
        assert_eq!(rescale_cadence(400), 200);
        assert_eq!(rescale_cadence(5), 5);
        assert_eq!(rescale_cadence(0), 1);
    }

    #[test]
    fn rate_window_falls_back_to_interval() {
        let cfg = EngineConfig::new(4, Duration::from_millis(20));
        assert_eq!(cfg.rate_window(), Duration::from_millis(20));
        let cfg = cfg.with_rate_window(Duration::from_secs(1));
        assert_eq!(cfg.rate_window(), Duration::from_secs(1));
    }
}
