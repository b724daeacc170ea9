//! Piecewise-linear interpolation over irregularly sampled points.

use crate::error::{Error, Result};

/// Value returned for arguments outside the sampled range, on either side.
pub const FILL_VALUE: f64 = 0.0;

/// A linear interpolant through `(x, y)` samples.
///
/// Samples are stably sorted by `x`, so repeated positions (the entry and
/// exit of a zero-length element) keep their original order.
#[derive(Debug, Clone)]
pub struct Interp1d {
    xs: Vec<f64>,
    ys: Vec<f64>,
}

impl Interp1d {
    pub fn new(xs: &[f64], ys: &[f64]) -> Result<Self> {
        if xs.is_empty() {
            return Err(Error::NoSamples);
        }
        if xs.len() != ys.len() {
            return Err(Error::LengthMismatch {
                name: "y".to_string(),
                expected: xs.len(),
                got: ys.len(),
            });
        }

        let mut pairs: Vec<(f64, f64)> = xs.iter().copied().zip(ys.iter().copied()).collect();
        pairs.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
        let (xs, ys) = pairs.into_iter().unzip();

        Ok(Self { xs, ys })
    }

    /// Evaluates the interpolant at `x`.
    pub fn eval(&self, x: f64) -> f64 {
        let last = self.xs.len() - 1;
        if x.is_nan() || x < self.xs[0] || x > self.xs[last] {
            return FILL_VALUE;
        }
        if last == 0 {
            return self.ys[0];
        }

        // First sample with xs[i] >= x, kept inside 1..=last so that
        // (hi - 1, hi) is always a valid segment.
        let hi = self.xs.partition_point(|&v| v < x).clamp(1, last);
        let lo = hi - 1;

        let (x_lo, x_hi) = (self.xs[lo], self.xs[hi]);
        let (y_lo, y_hi) = (self.ys[lo], self.ys[hi]);
        // Checked before x_hi so a repeated first sample resolves to the earlier one.
        if x == x_lo {
            return y_lo;
        }
        if x == x_hi {
            return y_hi;
        }
        let width = x_hi - x_lo;
        y_lo + (x - x_lo) * (y_hi - y_lo) / width
    }

    pub fn eval_many(&self, xs: &[f64]) -> Vec<f64> {
        xs.iter().map(|&x| self.eval(x)).collect()
    }
}
