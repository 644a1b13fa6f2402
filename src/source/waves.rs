//! src/source/waves.rs
//!
//! Synthetic trigonometric source used by the demo and by tests.
//!
//! Produces four subplots sharing one time axis:
//! `(t, cos, sin²)`, `(t, sin)`, `(t, sin²)`, `(t, cos²)`.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::ring::RingSeries;
use super::{DataSource, Fetch, SubplotData};
use crate::engine::{Series, SourceError};

/// Subplot titles matching the order [`WaveSource`] produces them in.
pub const WAVE_TITLES: [&str; 4] = ["cos(t), sin²(t)", "sin(t)", "sin²(t)", "cos²(t)"];

/// Series names per subplot, same order as [`WAVE_TITLES`].
pub const WAVE_SERIES: [&[&str]; 4] = [&["cos", "sin²"], &["sin"], &["sin²"], &["cos²"]];

pub struct WaveSource {
    t: RingSeries,
    cos: RingSeries,
    sin: RingSeries,
    sin2: RingSeries,
    cos2: RingSeries,
    /// Time advanced per tick.
    step: f64,
    noise: f64,
    rng: StdRng,
    limit: Option<u64>,
}

impl WaveSource {
    /// `capacity` samples are kept per series; `step` is the time advanced per tick.
    pub fn new(capacity: usize, step: f64) -> Self {
        Self {
            t: RingSeries::new(capacity),
            cos: RingSeries::new(capacity),
            sin: RingSeries::new(capacity),
            sin2: RingSeries::new(capacity),
            cos2: RingSeries::new(capacity),
            step,
            noise: 0.0,
            rng: StdRng::seed_from_u64(0),
            limit: None,
        }
    }

    /// Add uniform noise in `[-amplitude, amplitude]` to every sample.
    pub fn with_noise(mut self, amplitude: f64, seed: u64) -> Self {
        self.noise = amplitude.abs();
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Report exhaustion once `ticks` ticks have been produced.
    pub fn with_limit(mut self, ticks: u64) -> Self {
        self.limit = Some(ticks);
        self
    }

    fn jitter(&mut self) -> f64 {
        if self.noise > 0.0 {
            self.rng.random_range(-self.noise..=self.noise)
        } else {
            0.0
        }
    }

    fn push_sample(&mut self, tick: u64) {
        let t = tick as f64 * self.step;
        let (s, c) = t.sin_cos();
        self.t.push(t);
        let n = self.jitter();
        self.cos.push(c + n);
        let n = self.jitter();
        self.sin.push(s + n);
        let n = self.jitter();
        self.sin2.push(s * s + n);
        let n = self.jitter();
        self.cos2.push(c * c + n);
    }
}

impl DataSource for WaveSource {
    fn sample(&mut self, tick: u64) -> Result<Fetch<'_>, SourceError> {
        if self.limit.is_some_and(|limit| tick >= limit) {
            return Ok(Fetch::Exhausted);
        }
        self.push_sample(tick);
        let t: &dyn Series = &self.t;
        Ok(Fetch::Ready(vec![
            SubplotData::new(t, vec![&self.cos as &dyn Series, &self.sin2 as &dyn Series]),
            SubplotData::new(t, vec![&self.sin as &dyn Series]),
            SubplotData::new(t, vec![&self.sin2 as &dyn Series]),
            SubplotData::new(t, vec![&self.cos2 as &dyn Series]),
        ]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn produces_four_subplots_of_equal_length() {
        let mut source = WaveSource::new(8, 0.1);
        for tick in 0..3 {
            let Fetch::Ready(subplots) = source.sample(tick).unwrap() else {
                panic!("unexpected exhaustion");
            };
            assert_eq!(subplots.len(), WAVE_TITLES.len());
            for (subplot, names) in subplots.iter().zip(WAVE_SERIES) {
                assert_eq!(subplot.ys.len(), names.len());
                assert_eq!(subplot.x.len(), tick as usize + 1);
                assert!(subplot.ys.iter().all(|y| y.len() == subplot.x.len()));
            }
        }
    }

    #[test]
    fn limit_exhausts_source() {
        let mut source = WaveSource::new(8, 0.1).with_limit(2);
        assert!(matches!(source.sample(0), Ok(Fetch::Ready(_))));
        assert!(matches!(source.sample(1), Ok(Fetch::Ready(_))));
        assert!(matches!(source.sample(2), Ok(Fetch::Exhausted)));
    }

    #[test]
    fn noise_stays_within_amplitude() {
        let mut source = WaveSource::new(64, 0.0).with_noise(0.5, 7);
        for tick in 0..64 {
            source.sample(tick).unwrap();
        }
        // t is frozen at 0, so cos is 1 plus noise
        assert!(source.cos.iter().all(|v| (v - 1.0).abs() <= 0.5));
        assert!(source.cos.iter().any(|v| (v - 1.0).abs() > 0.0));
    }
}
