//! Normalized daily demand and generation curves.
//!
//! A [`DailyProfile`] holds the share of a household's daily energy that falls
//! into each period. Profiles come from CSV tables ([`table`]) or from the
//! seeded generators in [`synthetic`].

pub mod synthetic;
pub mod table;

use crate::error::ProfileError;
use crate::series::{PERIODS, PeriodSeries};

/// Allowed deviation of a percentage table's total from 100.
pub const PERCENT_TOLERANCE: f64 = 0.5;

/// A validated per-period fraction-of-daily-total curve.
///
/// Fractions are nonnegative and sum to 1.0, except for the all-zero
/// profile which stands for "no generation".
#[derive(Debug, Clone, PartialEq)]
pub struct DailyProfile {
    fractions: PeriodSeries,
}

impl DailyProfile {
    /// The all-zero curve, used for households without PV.
    pub const fn zero() -> Self {
        Self {
            fractions: PeriodSeries::zero(),
        }
    }

    /// Builds a profile from a `percentage` column (values summing to 100).
    ///
    /// # Errors
    ///
    /// Rejects tables that are not exactly 24 rows long, contain negative or
    /// non-finite values, or do not sum to 100 within [`PERCENT_TOLERANCE`].
    pub fn from_percentages(table: &str, percentages: &[f64]) -> Result<Self, ProfileError> {
        Self::validated(table, percentages, false)
    }

    /// Like [`DailyProfile::from_percentages`], but an all-zero table is
    /// accepted as a PV profile that never produces.
    ///
    /// # Errors
    ///
    /// Same conditions as [`DailyProfile::from_percentages`].
    pub fn generation_from_percentages(
        table: &str,
        percentages: &[f64],
    ) -> Result<Self, ProfileError> {
        Self::validated(table, percentages, true)
    }

    /// Builds a profile from fractions that sum to 1.0.
    ///
    /// # Errors
    ///
    /// Same conditions as [`DailyProfile::from_percentages`].
    pub fn from_fractions(table: &str, fractions: &[f64]) -> Result<Self, ProfileError> {
        let percentages: Vec<f64> = fractions.iter().map(|f| f * 100.0).collect();
        Self::validated(table, &percentages, false)
    }

    fn validated(table: &str, percentages: &[f64], allow_zero: bool) -> Result<Self, ProfileError> {
        if percentages.len() != PERIODS {
            return Err(ProfileError::WrongLength {
                table: table.to_string(),
                rows: percentages.len(),
            });
        }
        if let Some((row, &value)) = percentages
            .iter()
            .enumerate()
            .find(|(_, v)| !v.is_finite() || **v < 0.0)
        {
            return Err(ProfileError::InvalidValue {
                table: table.to_string(),
                row,
                value,
            });
        }

        let sum: f64 = percentages.iter().sum();
        let all_zero = percentages.iter().all(|v| *v == 0.0);
        if !(allow_zero && all_zero) && (sum - 100.0).abs() > PERCENT_TOLERANCE {
            return Err(ProfileError::BadTotal {
                table: table.to_string(),
                sum,
            });
        }

        Ok(Self {
            fractions: PeriodSeries::from_fn(|p| percentages[p] / 100.0),
        })
    }

    /// Per-period fractions of the daily total.
    pub fn fractions(&self) -> &PeriodSeries {
        &self.fractions
    }

    /// Distributes `daily_energy` over the day following this curve.
    pub fn scaled(&self, daily_energy: f64) -> PeriodSeries {
        self.fractions.scale(daily_energy)
    }

    pub fn is_zero(&self) -> bool {
        self.fractions.is_zero()
    }
}
