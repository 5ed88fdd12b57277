//! Grid buy prices for each period of the simulated day.

use std::path::Path;

use crate::error::ProfileError;
use crate::profile::table;
use crate::series::{PERIODS, PeriodSeries};

/// Hourly day-ahead shape used when no price table is configured
/// (currency per kWh, night trough with morning and evening peaks).
const DAY_AHEAD_SHAPE: [f64; PERIODS] = [
    0.092, 0.086, 0.083, 0.081, 0.084, 0.093, 0.112, 0.131, 0.136, 0.124, 0.110, 0.101,
    0.096, 0.094, 0.099, 0.108, 0.122, 0.141, 0.156, 0.152, 0.137, 0.121, 0.108, 0.098,
];

/// Validated nonnegative price per unit energy for each period.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    values: PeriodSeries,
}

impl PriceSeries {
    /// Validates a raw price column.
    ///
    /// # Errors
    ///
    /// Rejects columns that are not exactly 24 long or contain negative or
    /// non-finite prices.
    pub fn new(table: &str, values: &[f64]) -> Result<Self, ProfileError> {
        if values.len() != PERIODS {
            return Err(ProfileError::WrongLength {
                table: table.to_string(),
                rows: values.len(),
            });
        }
        if let Some((row, &value)) = values
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
        Ok(Self {
            values: PeriodSeries::from_fn(|p| values[p]),
        })
    }

    /// Same price in every period.
    pub fn flat(price: f64) -> Self {
        Self {
            values: PeriodSeries::constant(price.max(0.0)),
        }
    }

    /// Free energy; the internal PV tariff.
    pub fn zero() -> Self {
        Self::flat(0.0)
    }

    /// Built-in day-ahead price curve.
    pub fn day_ahead_default() -> Self {
        Self {
            values: PeriodSeries::new(DAY_AHEAD_SHAPE),
        }
    }

    /// Loads prices from the `mean` column of a CSV file.
    ///
    /// # Errors
    ///
    /// Returns a [`ProfileError`] if the file is unreadable or malformed.
    pub fn from_csv_path(path: &Path) -> Result<Self, ProfileError> {
        let values = table::load_price_column(path)?;
        Self::new(&path.display().to_string(), &values)
    }

    pub fn values(&self) -> &PeriodSeries {
        &self.values
    }

    pub fn at(&self, period: usize) -> f64 {
        self.values[period]
    }
}
