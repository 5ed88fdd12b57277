//! Error types shared across the simulation pipeline.

use crate::config::ConfigError;
use crate::dispatch::DispatchError;

/// A profile or price table that cannot be used as model input.
///
/// Tables are rejected as-is; nothing is normalized or truncated to make
/// them fit.
#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("{table}: expected 24 rows, got {rows}")]
    WrongLength { table: String, rows: usize },

    #[error("{table}: row {row} has negative or non-finite value {value}")]
    InvalidValue {
        table: String,
        row: usize,
        value: f64,
    },

    #[error("{table}: percentages sum to {sum:.3}, expected 100")]
    BadTotal { table: String, sum: f64 },

    #[error("{table}: row {row} is labelled hour {hour}")]
    HourOutOfOrder {
        table: String,
        row: usize,
        hour: usize,
    },

    #[error("{table}: {source}")]
    Csv {
        table: String,
        #[source]
        source: csv::Error,
    },
}

/// Any failure that aborts a simulation run before a report exists.
#[derive(Debug, thiserror::Error)]
pub enum SimulationError {
    #[error("invalid configuration: {}", format_config_errors(.0))]
    Config(Vec<ConfigError>),

    #[error(transparent)]
    Profile(#[from] ProfileError),

    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

fn format_config_errors(errors: &[ConfigError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
