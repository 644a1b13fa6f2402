//! src/engine/timer.rs
//!
//! Frame-rate measurement with an advisory slowdown flag.

use std::time::{Duration, Instant};

/// Effective rate may trail the target rate by this factor before a report is
/// flagged as a slowdown.
pub const SLOWDOWN_FACTOR: f64 = 1.25;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameReport {
    /// Time since the previous report (or since the timer started).
    pub elapsed: Duration,
    /// Frames counted over `elapsed`.
    pub frames: u64,
    /// Frames per second over `elapsed`.
    pub rate: f64,
    pub slowdown: bool,
}

/// Counts frames and reports the effective rate once per measurement window.
#[derive(Debug)]
pub struct FrameTimer {
    interval: Duration,
    window: Duration,
    frames: u64,
    last_reset: Instant,
}

impl FrameTimer {
    /// `interval` is the target time between frames; `window` how often a
    /// report is produced.
    pub fn new(interval: Duration, window: Duration) -> Self {
        Self::starting_at(interval, window, Instant::now())
    }

    pub fn starting_at(interval: Duration, window: Duration, start: Instant) -> Self {
        Self {
            interval,
            window,
            frames: 0,
            last_reset: start,
        }
    }

    /// Target frames per second.
    pub fn target_rate(&self) -> f64 {
        if self.interval.is_zero() {
            f64::INFINITY
        } else {
            1.0 / self.interval.as_secs_f64()
        }
    }

    pub fn tick(&mut self) -> Option<FrameReport> {
        self.tick_at(Instant::now())
    }

    /// Count one frame at `now`; returns a report once the window has elapsed.
    pub fn tick_at(&mut self, now: Instant) -> Option<FrameReport> {
        self.frames += 1;
        let elapsed = now.saturating_duration_since(self.last_reset);
        if elapsed.is_zero() || elapsed < self.window {
            return None;
        }

        let rate = self.frames as f64 / elapsed.as_secs_f64();
        let target = self.target_rate();
        let report = FrameReport {
            elapsed,
            frames: self.frames,
            rate,
            slowdown: target.is_finite() && rate * SLOWDOWN_FACTOR < target,
        };
        self.frames = 0;
        self.last_reset = now;
        Some(report)
    }
}
