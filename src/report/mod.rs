//! Schedule table, overview document, and summary metrics of a run.

pub mod export;
mod metrics;

pub use metrics::SummaryMetrics;

use std::fmt;

use serde::Serialize;

use crate::community::CommunityBalance;
use crate::config::ScenarioConfig;
use crate::dispatch::{DispatchInputs, SolvedSchedule};
use crate::series::{PERIODS, timeslot_label};

/// One period of the solved schedule, in report form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleRow {
    pub period: usize,
    pub timeslot: String,
    pub total_demand: f64,
    pub total_generation: f64,
    pub consumption_from_grid: f64,
    pub consumption_from_generation: f64,
    pub grid_charge_power: f64,
    pub generation_charge_power: f64,
    pub discharge_power: f64,
    pub battery_soc: f64,
}

impl ScheduleRow {
    /// Builds one row per period from a solved schedule.
    pub fn from_schedule(schedule: &SolvedSchedule, inputs: &DispatchInputs) -> Vec<Self> {
        let grid_draw = schedule.grid_draw(&inputs.demand);
        let generation_use = schedule.generation_use();
        (0..PERIODS)
            .map(|p| Self {
                period: p,
                timeslot: timeslot_label(p),
                total_demand: inputs.demand[p],
                total_generation: inputs.generation[p],
                consumption_from_grid: grid_draw[p],
                consumption_from_generation: generation_use[p],
                grid_charge_power: schedule.grid_charge[p],
                generation_charge_power: schedule.pv_charge[p],
                discharge_power: schedule.discharge[p],
                battery_soc: schedule.soc[p],
            })
            .collect()
    }
}

impl fmt::Display for ScheduleRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | demand {:>7.2} | grid {:>7.2} | pv use {:>6.2} | charge {:>6.2} (pv {:>6.2}) | discharge {:>6.2} | soc {:>7.2}",
            self.timeslot,
            self.total_demand,
            self.consumption_from_grid,
            self.consumption_from_generation,
            self.grid_charge_power,
            self.generation_charge_power,
            self.discharge_power,
            self.battery_soc,
        )
    }
}

/// Household section of the overview document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HouseholdSummary {
    pub count: usize,
    pub with_pv: usize,
    pub mean_coverage_ratio: f64,
    pub households: Vec<HouseholdEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HouseholdEntry {
    pub id: String,
    pub demand_kwh: f64,
    pub generation_kwh: f64,
    pub self_consumed_kwh: f64,
    pub coverage_ratio: f64,
}

impl HouseholdSummary {
    pub fn from_balance(balance: &CommunityBalance) -> Self {
        let households: Vec<HouseholdEntry> = balance
            .households
            .iter()
            .map(|h| HouseholdEntry {
                id: h.id.to_string(),
                demand_kwh: h.demand.sum(),
                generation_kwh: h.generation.sum(),
                self_consumed_kwh: h.self_consumed.sum(),
                coverage_ratio: h.coverage_ratio,
            })
            .collect();
        Self {
            count: households.len(),
            with_pv: balance
                .households
                .iter()
                .filter(|h| !h.generation.is_zero())
                .count(),
            mean_coverage_ratio: balance.mean_coverage_ratio(),
            households,
        }
    }
}

/// Overview document: configuration echo plus rounded metrics.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationOverview {
    pub config: ScenarioConfig,
    pub results: SummaryMetrics,
    pub households: HouseholdSummary,
}

impl SimulationOverview {
    pub fn new(config: &ScenarioConfig, metrics: &SummaryMetrics, balance: &CommunityBalance) -> Self {
        Self {
            config: config.clone(),
            results: metrics.rounded(),
            households: HouseholdSummary::from_balance(balance),
        }
    }
}
