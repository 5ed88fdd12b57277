//! Battery dispatch MILP: model construction and solving.
//!
//! [`DispatchModel::build`] turns the community series, prices, and battery
//! limits into a mixed-integer program; a [`DispatchSolver`] turns that into a
//! [`SolvedSchedule`] or reports why it could not.

mod model;
mod solver;

pub use model::{DispatchModel, DispatchVariables};
pub use solver::{DispatchSolver, MicroLpSolver, SolvedSchedule};

use std::fmt;

use crate::community::CommunitySeries;
use crate::config::ScenarioConfig;
use crate::prices::PriceSeries;
use crate::series::PeriodSeries;

/// Physical limits of the shared community battery, in kWh per period.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatteryLimits {
    pub min_capacity: f64,
    pub max_capacity: f64,
    pub max_charge: f64,
    pub max_discharge: f64,
    pub initial_soc: f64,
}

/// Immutable parameters of one dispatch optimization.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchConfig {
    pub battery: BatteryLimits,
    /// Per-period grid draw ceiling; `None` disables the constraint.
    pub max_grid_consumption: Option<f64>,
    /// Daily cycle ceiling; `None` disables the constraint.
    pub max_cycles: Option<f64>,
}

impl From<&ScenarioConfig> for DispatchConfig {
    fn from(cfg: &ScenarioConfig) -> Self {
        let b = &cfg.battery;
        Self {
            battery: BatteryLimits {
                min_capacity: b.min_capacity_kwh,
                max_capacity: b.max_capacity_kwh,
                max_charge: b.max_charge_kw,
                max_discharge: b.max_discharge_kw,
                initial_soc: b.initial_soc_kwh,
            },
            max_grid_consumption: cfg.constraints.max_grid_consumption_kw,
            max_cycles: cfg.constraints.max_battery_cycles,
        }
    }
}

/// Time series the dispatch model optimizes against.
#[derive(Debug, Clone)]
pub struct DispatchInputs {
    /// Community demand that must be met by grid, battery, or shared PV.
    pub demand: PeriodSeries,
    /// Community PV available for charging or shared consumption.
    pub generation: PeriodSeries,
    pub grid_prices: PriceSeries,
    /// Internal tariff for community PV energy.
    pub pv_prices: PriceSeries,
}

impl DispatchInputs {
    /// Inputs with PV energy priced at zero.
    pub fn new(series: &CommunitySeries, grid_prices: PriceSeries) -> Self {
        Self {
            demand: series.grid_demand,
            generation: series.exportable_generation,
            grid_prices,
            pv_prices: PriceSeries::zero(),
        }
    }
}

/// Solver termination other than a proven optimum.
#[derive(Debug, Clone, PartialEq)]
pub enum SolveStatus {
    Infeasible,
    Unbounded,
    Other(String),
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Infeasible => write!(f, "infeasible"),
            Self::Unbounded => write!(f, "unbounded"),
            Self::Other(reason) => write!(f, "not optimal ({reason})"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DispatchError {
    #[error("no optimal dispatch schedule: solver reported {0}")]
    NotOptimal(SolveStatus),
}

impl DispatchError {
    pub fn status(&self) -> &SolveStatus {
        match self {
            Self::NotOptimal(status) => status,
        }
    }
}
