//! Post-solve summary metrics.

use std::fmt;

use serde::Serialize;
use tracing::warn;

use crate::dispatch::{DispatchInputs, SolvedSchedule};

/// Aggregate indicators derived from one solved dispatch.
///
/// Every field is a pure function of the solved schedule and the inputs the
/// model was built from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryMetrics {
    /// Optimal objective value.
    pub min_cost: f64,
    /// Cost of buying all community demand from the grid.
    pub alternative_cost: f64,
    /// Saving relative to the alternative cost (%).
    #[serde(rename = "saving")]
    pub saving_pct: f64,
    pub battery_cycles: f64,
    /// Community PV available to the battery and shared consumption (kWh).
    pub local_generation: f64,
    /// Community PV actually used (kWh).
    pub local_generation_consumption: f64,
    /// Share of local generation used (%), 0 without generation.
    #[serde(rename = "local_generation_usage")]
    pub local_generation_usage_pct: f64,
    pub grid_consumption: f64,
    pub grid_consumption_in_peak_periods: f64,
    pub demand_in_peak_periods: f64,
    /// Demand in peak periods not drawn from the grid (%).
    #[serde(rename = "peak_reduction")]
    pub peak_reduction_pct: f64,
    /// Largest single-period grid draw (kWh).
    pub max_peak: f64,
}

impl SummaryMetrics {
    /// Computes all metrics.
    ///
    /// # Arguments
    ///
    /// * `schedule` - Optimal schedule returned by the solver
    /// * `inputs` - Series the model was built from
    /// * `peak_periods` - Period indices counted as peak; out-of-range indices are ignored
    /// * `max_capacity` - Battery capacity used for the cycle count
    pub fn compute(
        schedule: &SolvedSchedule,
        inputs: &DispatchInputs,
        peak_periods: &[usize],
        max_capacity: f64,
    ) -> Self {
        let grid_draw = schedule.grid_draw(&inputs.demand);
        let generation_use = schedule.generation_use();

        let alternative_cost = inputs.demand.dot(inputs.grid_prices.values());
        let saving_pct = if alternative_cost > 0.0 {
            (alternative_cost - schedule.objective) / alternative_cost * 100.0
        } else {
            0.0
        };

        let local_generation = inputs.generation.sum();
        let local_generation_consumption = generation_use.sum();
        let local_generation_usage_pct = if local_generation > 0.0 {
            local_generation_consumption / local_generation * 100.0
        } else {
            0.0
        };

        let grid_consumption_in_peak_periods = grid_draw.subset_sum(peak_periods);
        let demand_in_peak_periods = inputs.demand.subset_sum(peak_periods);
        let peak_reduction_pct = if demand_in_peak_periods > 0.0 {
            (demand_in_peak_periods - grid_consumption_in_peak_periods) / demand_in_peak_periods
                * 100.0
        } else {
            warn!(?peak_periods, "no demand in peak periods, peak reduction reported as 0");
            0.0
        };

        Self {
            min_cost: schedule.objective,
            alternative_cost,
            saving_pct,
            battery_cycles: schedule.cycles(max_capacity),
            local_generation,
            local_generation_consumption,
            local_generation_usage_pct,
            grid_consumption: grid_draw.sum(),
            grid_consumption_in_peak_periods,
            demand_in_peak_periods,
            peak_reduction_pct,
            max_peak: grid_draw.max(),
        }
    }

    /// Copy with every value rounded to two decimals.
    pub fn rounded(&self) -> Self {
        let r = |v: f64| (v * 100.0).round() / 100.0;
        Self {
            min_cost: r(self.min_cost),
            alternative_cost: r(self.alternative_cost),
            saving_pct: r(self.saving_pct),
            battery_cycles: r(self.battery_cycles),
            local_generation: r(self.local_generation),
            local_generation_consumption: r(self.local_generation_consumption),
            local_generation_usage_pct: r(self.local_generation_usage_pct),
            grid_consumption: r(self.grid_consumption),
            grid_consumption_in_peak_periods: r(self.grid_consumption_in_peak_periods),
            demand_in_peak_periods: r(self.demand_in_peak_periods),
            peak_reduction_pct: r(self.peak_reduction_pct),
            max_peak: r(self.max_peak),
        }
    }
}

impl fmt::Display for SummaryMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Dispatch Summary ---")?;
        writeln!(f, "Minimized cost:        {:.2}", self.min_cost)?;
        writeln!(f, "Alternative cost:      {:.2}", self.alternative_cost)?;
        writeln!(f, "Saving:                {:.2}%", self.saving_pct)?;
        writeln!(f, "Battery cycles:        {:.2}", self.battery_cycles)?;
        writeln!(
            f,
            "Local generation:      {:.2} kWh ({:.2} kWh used, {:.2}%)",
            self.local_generation, self.local_generation_consumption, self.local_generation_usage_pct
        )?;
        writeln!(f, "Grid consumption:      {:.2} kWh", self.grid_consumption)?;
        writeln!(
            f,
            "Peak periods:          {:.2} kWh grid / {:.2} kWh demand ({:.2}% reduction)",
            self.grid_consumption_in_peak_periods,
            self.demand_in_peak_periods,
            self.peak_reduction_pct
        )?;
        write!(f, "Max grid draw:         {:.2} kWh", self.max_peak)
    }
}
