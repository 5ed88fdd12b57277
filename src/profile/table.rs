//! CSV readers for hourly profile and price tables.
//!
//! Profile tables carry a `percentage` column, price tables a `mean` column.
//! An `hour` column is optional; when present it must match the row order.
//! Any other columns are ignored.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::ProfileError;
use crate::profile::DailyProfile;

#[derive(Debug, Deserialize)]
struct ProfileRecord {
    #[serde(default)]
    hour: Option<usize>,
    percentage: f64,
}

#[derive(Debug, Deserialize)]
struct PriceRecord {
    #[serde(default)]
    hour: Option<usize>,
    mean: f64,
}

trait HourlyRecord: DeserializeOwned {
    fn hour(&self) -> Option<usize>;
    fn value(&self) -> f64;
}

impl HourlyRecord for ProfileRecord {
    fn hour(&self) -> Option<usize> {
        self.hour
    }
    fn value(&self) -> f64 {
        self.percentage
    }
}

impl HourlyRecord for PriceRecord {
    fn hour(&self) -> Option<usize> {
        self.hour
    }
    fn value(&self) -> f64 {
        self.mean
    }
}

fn read_column<T: HourlyRecord>(table: &str, reader: impl Read) -> Result<Vec<f64>, ProfileError> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut values = Vec::new();
    for (row, record) in rdr.deserialize::<T>().enumerate() {
        let record = record.map_err(|source| ProfileError::Csv {
            table: table.to_string(),
            source,
        })?;
        if let Some(hour) = record.hour() {
            if hour != row {
                return Err(ProfileError::HourOutOfOrder {
                    table: table.to_string(),
                    row,
                    hour,
                });
            }
        }
        values.push(record.value());
    }
    Ok(values)
}

fn open(path: &Path) -> Result<std::fs::File, ProfileError> {
    std::fs::File::open(path).map_err(|e| ProfileError::Csv {
        table: path.display().to_string(),
        source: e.into(),
    })
}

/// Reads the `percentage` column of a profile table.
///
/// # Errors
///
/// Returns a [`ProfileError`] on CSV errors or out-of-order `hour` labels.
pub fn read_percentages(table: &str, reader: impl Read) -> Result<Vec<f64>, ProfileError> {
    read_column::<ProfileRecord>(table, reader)
}

/// Reads the `mean` column of a price table.
///
/// # Errors
///
/// Returns a [`ProfileError`] on CSV errors or out-of-order `hour` labels.
pub fn read_prices(table: &str, reader: impl Read) -> Result<Vec<f64>, ProfileError> {
    read_column::<PriceRecord>(table, reader)
}

/// Loads and validates a demand profile from a CSV file.
///
/// # Errors
///
/// Returns a [`ProfileError`] if the file is unreadable or the table is malformed.
pub fn load_demand_profile(path: &Path) -> Result<DailyProfile, ProfileError> {
    let table = path.display().to_string();
    let values = read_percentages(&table, open(path)?)?;
    DailyProfile::from_percentages(&table, &values)
}

/// Loads and validates a PV generation profile from a CSV file.
///
/// An all-zero table is accepted.
///
/// # Errors
///
/// Returns a [`ProfileError`] if the file is unreadable or the table is malformed.
pub fn load_generation_profile(path: &Path) -> Result<DailyProfile, ProfileError> {
    let table = path.display().to_string();
    let values = read_percentages(&table, open(path)?)?;
    DailyProfile::generation_from_percentages(&table, &values)
}

/// Loads the raw `mean` column of a price file.
///
/// # Errors
///
/// Returns a [`ProfileError`] if the file is unreadable or a row does not parse.
pub fn load_price_column(path: &Path) -> Result<Vec<f64>, ProfileError> {
    read_prices(&path.display().to_string(), open(path)?)
}
