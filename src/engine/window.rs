//! src/engine/window.rs
//!
//! Fixed-length, NaN-padded windows cut from growing series.
//!
//! Renderers keep a constant number of points per line, so a series shorter
//! than the window is left-padded with NaN instead of shrinking the window.
//! Only the retained suffix of a series is ever copied out of it.

use std::collections::VecDeque;
use std::ops::Deref;

use super::error::{EngineError, Result};

/// A single numeric sample that can be plotted.
pub trait Sample: Copy {
    fn to_f64(self) -> f64;
}

macro_rules! impl_sample {
    ($($t:ty),*) => {
        $(impl Sample for $t {
            #[inline]
            fn to_f64(self) -> f64 {
                self as f64
            }
        })*
    };
}

impl_sample!(f64, f32, i8, i16, i32, i64, u8, u16, u32, u64, isize, usize);

/// `None` is a null sample and plots as a gap.
impl Sample for Option<f64> {
    #[inline]
    fn to_f64(self) -> f64 {
        self.unwrap_or(f64::NAN)
    }
}

/// An append-only sequence of samples with a queryable length.
pub trait Series {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append the last `min(n, len)` samples to `out`, oldest first.
    fn extend_tail(&self, n: usize, out: &mut Vec<f64>);
}

impl<T: Sample> Series for [T] {
    fn len(&self) -> usize {
        <[T]>::len(self)
    }

    fn extend_tail(&self, n: usize, out: &mut Vec<f64>) {
        let start = <[T]>::len(self).saturating_sub(n);
        out.extend(self[start..].iter().map(|&v| v.to_f64()));
    }
}

impl<T: Sample, const N: usize> Series for [T; N] {
    fn len(&self) -> usize {
        N
    }

    fn extend_tail(&self, n: usize, out: &mut Vec<f64>) {
        self.as_slice().extend_tail(n, out);
    }
}

impl<T: Sample> Series for Vec<T> {
    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn extend_tail(&self, n: usize, out: &mut Vec<f64>) {
        self.as_slice().extend_tail(n, out);
    }
}

impl<T: Sample> Series for VecDeque<T> {
    fn len(&self) -> usize {
        VecDeque::len(self)
    }

    fn extend_tail(&self, n: usize, out: &mut Vec<f64>) {
        let start = VecDeque::len(self).saturating_sub(n);
        out.extend(self.range(start..).map(|&v| v.to_f64()));
    }
}

impl<S: Series + ?Sized> Series for &S {
    fn len(&self) -> usize {
        (**self).len()
    }

    fn extend_tail(&self, n: usize, out: &mut Vec<f64>) {
        (**self).extend_tail(n, out);
    }
}

/// Owned, fixed-length window of samples. Missing leading samples are NaN.
#[derive(Clone, Debug, Default)]
pub struct Window {
    values: Vec<f64>,
}

impl Window {
    /// Cut the last `length` samples out of `series`, left-padding with NaN.
    pub fn from_series<S: Series + ?Sized>(series: &S, length: usize) -> Self {
        let retained = series.len().min(length);
        let mut values = Vec::with_capacity(length);
        values.resize(length - retained, f64::NAN);
        series.extend_tail(retained, &mut values);
        debug_assert_eq!(values.len(), length, "Series::extend_tail returned a wrong count");
        Self { values }
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.values
    }

    /// Number of leading NaN padding slots.
    pub fn padding(&self) -> usize {
        self.values.iter().take_while(|v| v.is_nan()).count()
    }

    /// First and last non-NaN value, oldest first.
    pub fn span(&self) -> Option<(f64, f64)> {
        let first = self.values.iter().copied().find(|v| v.is_finite())?;
        let last = self.values.iter().rev().copied().find(|v| v.is_finite())?;
        Some((first, last))
    }
}

impl Deref for Window {
    type Target = [f64];

    fn deref(&self) -> &[f64] {
        &self.values
    }
}

impl From<Vec<f64>> for Window {
    fn from(values: Vec<f64>) -> Self {
        Self { values }
    }
}

/// Two windows are equal when they agree slot by slot, with NaN equal to NaN.
impl PartialEq for Window {
    fn eq(&self, other: &Self) -> bool {
        self.values.len() == other.values.len()
            && self
                .values
                .iter()
                .zip(&other.values)
                .all(|(a, b)| a == b || (a.is_nan() && b.is_nan()))
    }
}

/// The x window and y windows of one subplot for one tick.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SubplotWindow {
    pub x: Window,
    pub ys: Vec<Window>,
}

impl SubplotWindow {
    /// All y samples of the subplot, series after series.
    pub fn y_values(&self) -> impl Iterator<Item = f64> + '_ {
        self.ys.iter().flat_map(|w| w.iter().copied())
    }
}

/// Slice one subplot's series into fixed-length windows.
///
/// Every returned window has exactly `window_length` slots. The ys must all
/// have the same current length; x may differ and is padded on its own.
pub fn slice(window_length: usize, x: &dyn Series, ys: &[&dyn Series]) -> Result<SubplotWindow> {
    if window_length < 2 {
        return Err(EngineError::InvalidWindowLength(window_length));
    }
    let Some(first) = ys.first() else {
        return Err(EngineError::EmptySubplot);
    };
    let y_len = first.len();
    if ys.iter().any(|y| y.len() != y_len) {
        return Err(EngineError::LengthMismatch {
            lengths: ys.iter().map(|y| y.len()).collect(),
        });
    }

    let x_retained = x.len().min(window_length);
    let y_retained = y_len.min(window_length);
    if x_retained != y_retained {
        tracing::debug!(
            x_len = x.len(),
            y_len,
            window_length,
            "x and y series retain different sample counts"
        );
    }

    Ok(SubplotWindow {
        x: Window::from_series(x, window_length),
        ys: ys.iter().map(|y| Window::from_series(*y, window_length)).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nan_prefix(w: &Window) -> usize {
        w.padding()
    }

    #[test]
    fn short_series_is_left_padded() {
        let x = vec![0.0, 1.0];
        let y = vec![10.0, 11.0];
        let out = slice(5, &x, &[&y]).unwrap();
        assert_eq!(out.x.len(), 5);
        assert_eq!(nan_prefix(&out.ys[0]), 3);
        assert_eq!(&out.ys[0][3..], &[10.0, 11.0]);
        assert_eq!(&out.x[3..], &[0.0, 1.0]);
    }

    #[test]
    fn long_series_keeps_latest_suffix() {
        let x: Vec<f64> = (0..100).map(|i| i as f64).collect();
        let y: VecDeque<i32> = (0..100).collect();
        let out = slice(3, &x, &[&y]).unwrap();
        assert_eq!(out.x, Window::from(vec![97.0, 98.0, 99.0]));
        assert_eq!(out.ys[0], Window::from(vec![97.0, 98.0, 99.0]));
    }

    #[test]
    fn empty_series_is_all_nan() {
        let x: Vec<f64> = Vec::new();
        let y: Vec<f64> = Vec::new();
        let out = slice(4, &x, &[&y]).unwrap();
        assert!(out.x.iter().all(|v| v.is_nan()));
        assert!(out.ys[0].iter().all(|v| v.is_nan()));
        assert_eq!(out.ys[0].span(), None);
    }

    #[test]
    fn unequal_y_lengths_fail() {
        let x = vec![0.0; 4];
        let a = vec![1.0; 4];
        let b = vec![1.0; 3];
        let err = slice(4, &x, &[&a, &b]).unwrap_err();
        match err {
            EngineError::LengthMismatch { lengths } => assert_eq!(lengths, vec![4, 3]),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn x_shorter_than_y_is_padded_independently() {
        let x = vec![5.0];
        let y = vec![1.0, 2.0, 3.0];
        let out = slice(4, &x, &[&y]).unwrap();
        assert_eq!(nan_prefix(&out.x), 3);
        assert_eq!(nan_prefix(&out.ys[0]), 1);
    }

    #[test]
    fn null_samples_become_nan() {
        let x = [0u32, 1, 2];
        let y = vec![Some(1.0), None, Some(3.0)];
        let out = slice(3, &x, &[&y]).unwrap();
        assert!(out.ys[0][1].is_nan());
        assert_eq!(out.ys[0].span(), Some((1.0, 3.0)));
    }

    #[test]
    fn rejects_bad_window_and_empty_subplot() {
        let x = vec![0.0];
        assert!(matches!(
            slice(1, &x, &[&x]),
            Err(EngineError::InvalidWindowLength(1))
        ));
        assert!(matches!(slice(4, &x, &[]), Err(EngineError::EmptySubplot)));
    }

    #[test]
    fn y_values_flattens_in_series_order() {
        let x = vec![0.0, 1.0];
        let a = vec![1.0, 2.0];
        let b = vec![3.0, 4.0];
        let out = slice(2, &x, &[&a, &b]).unwrap();
        let all: Vec<f64> = out.y_values().collect();
        assert_eq!(all, vec![1.0, 2.0, 3.0, 4.0]);
    }
}
