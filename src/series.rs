//! Fixed-length, period-indexed value series for the daily horizon.

use std::fmt;
use std::ops::{Add, Index, IndexMut};

use serde::Serialize;

/// Number of periods in the simulated day (one per clock hour).
pub const PERIODS: usize = 24;

/// One value per period of the simulated day.
///
/// Index `h` is the clock hour `h:00` to `h+1:00`. The same 0-based
/// convention is used by the aggregator, the dispatch model, and the
/// report, so no index translation happens anywhere.
///
/// # Examples
///
/// ```
/// use community_dispatch::series::PeriodSeries;
///
/// let a = PeriodSeries::constant(1.0);
/// let b = PeriodSeries::constant(0.5);
/// assert_eq!((a + b).sum(), 36.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PeriodSeries([f64; PERIODS]);

impl PeriodSeries {
    /// A series with every period set to zero.
    pub const fn zero() -> Self {
        Self([0.0; PERIODS])
    }

    /// A series with every period set to `value`.
    pub const fn constant(value: f64) -> Self {
        Self([value; PERIODS])
    }

    /// Wraps an array of per-period values.
    pub const fn new(values: [f64; PERIODS]) -> Self {
        Self(values)
    }

    /// Builds a series by evaluating `f` for each period index.
    pub fn from_fn(f: impl FnMut(usize) -> f64) -> Self {
        Self(std::array::from_fn(f))
    }

    /// Sum over all periods.
    pub fn sum(&self) -> f64 {
        self.0.iter().sum()
    }

    /// Largest single-period value.
    pub fn max(&self) -> f64 {
        self.0.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    /// Sum over the given period indices.
    ///
    /// Indices outside the horizon are ignored; callers validate them first.
    pub fn subset_sum(&self, periods: &[usize]) -> f64 {
        periods
            .iter()
            .filter_map(|&p| self.0.get(p))
            .sum()
    }

    /// Multiplies every period by `factor`.
    pub fn scale(&self, factor: f64) -> Self {
        Self::from_fn(|p| self.0[p] * factor)
    }

    /// Elementwise minimum of two series.
    pub fn min(&self, other: &Self) -> Self {
        Self::from_fn(|p| self.0[p].min(other.0[p]))
    }

    /// Elementwise difference `self - other`.
    pub fn sub(&self, other: &Self) -> Self {
        Self::from_fn(|p| self.0[p] - other.0[p])
    }

    /// Elementwise product, e.g. energy times price.
    pub fn dot(&self, other: &Self) -> f64 {
        self.0.iter().zip(other.0.iter()).map(|(a, b)| a * b).sum()
    }

    /// True when every period is exactly zero.
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|v| *v == 0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = &f64> {
        self.0.iter()
    }

    pub fn as_array(&self) -> &[f64; PERIODS] {
        &self.0
    }
}

impl Default for PeriodSeries {
    fn default() -> Self {
        Self::zero()
    }
}

impl Index<usize> for PeriodSeries {
    type Output = f64;

    fn index(&self, period: usize) -> &f64 {
        &self.0[period]
    }
}

impl IndexMut<usize> for PeriodSeries {
    fn index_mut(&mut self, period: usize) -> &mut f64 {
        &mut self.0[period]
    }
}

impl Add for PeriodSeries {
    type Output = PeriodSeries;

    fn add(self, rhs: PeriodSeries) -> PeriodSeries {
        PeriodSeries::from_fn(|p| self.0[p] + rhs.0[p])
    }
}

impl std::iter::Sum for PeriodSeries {
    fn sum<I: Iterator<Item = PeriodSeries>>(iter: I) -> Self {
        iter.fold(PeriodSeries::zero(), Add::add)
    }
}

/// Error returned when a vector does not cover exactly one day.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("expected 24 periods, got {0}")]
pub struct LengthMismatch(pub usize);

impl TryFrom<Vec<f64>> for PeriodSeries {
    type Error = LengthMismatch;

    fn try_from(values: Vec<f64>) -> Result<Self, Self::Error> {
        let len = values.len();
        let array: [f64; PERIODS] = values.try_into().map_err(|_| LengthMismatch(len))?;
        Ok(Self(array))
    }
}

/// Clock label for a period index, e.g. `"07:00"`.
pub fn timeslot_label(period: usize) -> String {
    format!("{period:02}:00")
}

impl fmt::Display for PeriodSeries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|v| format!("{v:.2}")).collect();
        write!(f, "[{}]", parts.join(", "))
    }
}
