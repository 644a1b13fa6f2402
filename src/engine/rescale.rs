//! src/engine/rescale.rs
//!
//! Axis rescale decision with margin and hysteresis.
//!
//! # Rule
//! - Target bounds are the finite data range padded by 10% on each side.
//! - Flat data is widened by an absolute pad so the axis never has zero height.
//! - The current bounds are only replaced when either end moves outside a
//!   dead band (ratio old/new outside `[0.85, 1.15]`), so noise-level changes
//!   never force a redraw.

/// Visible range of one axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AxisBounds {
    pub min: f64,
    pub max: f64,
}

impl AxisBounds {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    pub fn midpoint(&self) -> f64 {
        (self.min + self.max) / 2.0
    }

    pub fn is_finite(&self) -> bool {
        self.min.is_finite() && self.max.is_finite()
    }
}

impl From<(f64, f64)> for AxisBounds {
    fn from((min, max): (f64, f64)) -> Self {
        Self { min, max }
    }
}

/// Tunable constants of the rescale rule.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RescalePolicy {
    /// Padding added on each side, as a fraction of the data range.
    pub margin_frac: f64,

    /// Absolute padding on each side when the data is flat.
    pub flat_pad: f64,

    /// Inclusive band for old/new ratios that counts as "no change".
    pub band: (f64, f64),
}

impl Default for RescalePolicy {
    fn default() -> Self {
        Self {
            margin_frac: 0.1,
            flat_pad: 0.1,
            band: (0.85, 1.15),
        }
    }
}

impl RescalePolicy {
    /// Bounds the axis should show for `values`, ignoring hysteresis.
    ///
    /// With fewer than two finite values the target collapses onto the lone
    /// value, or onto the midpoint of `current` when there is none, before
    /// the flat padding is applied.
    pub fn target(&self, values: impl IntoIterator<Item = f64>, current: AxisBounds) -> AxisBounds {
        let mut mn = f64::INFINITY;
        let mut mx = f64::NEG_INFINITY;
        let mut count = 0usize;
        for v in values {
            if !v.is_finite() {
                continue;
            }
            count += 1;
            if v < mn {
                mn = v;
            }
            if v > mx {
                mx = v;
            }
        }

        let (mut lo, mut hi) = match count {
            0 => {
                let mid = current.midpoint();
                (mid, mid)
            }
            1 => (mn, mx),
            _ => {
                let margin = (mx - mn) * self.margin_frac;
                (mn - margin, mx + margin)
            }
        };

        if lo == hi {
            let center = lo;
            // grows with magnitude once 0.1 falls below the float resolution
            let pad = self.flat_pad.max(center.abs() * 1e-12);
            lo = center - pad;
            hi = center + pad;
        }
        AxisBounds::new(lo, hi)
    }

    /// New bounds when a rescale is warranted, `None` to keep `current`.
    pub fn decide(
        &self,
        values: impl IntoIterator<Item = f64>,
        current: AxisBounds,
    ) -> Option<AxisBounds> {
        let target = self.target(values, current);
        if self.within_band(current.max, target.max) && self.within_band(current.min, target.min) {
            None
        } else {
            Some(target)
        }
    }

    fn within_band(&self, old: f64, new: f64) -> bool {
        if old == new {
            return true;
        }
        let ratio = old / new;
        ratio >= self.band.0 && ratio <= self.band.1
    }
}

/// [`RescalePolicy::decide`] with the default policy.
pub fn decide(values: impl IntoIterator<Item = f64>, current: AxisBounds) -> Option<AxisBounds> {
    RescalePolicy::default().decide(values, current)
}
