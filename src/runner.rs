//! One simulation run: load inputs, aggregate, build, solve, extract.

use tracing::info;

use crate::community::{self, CommunityBalance};
use crate::config::ScenarioConfig;
use crate::dispatch::{DispatchConfig, DispatchInputs, DispatchModel, DispatchSolver, SolvedSchedule};
use crate::error::{ProfileError, SimulationError};
use crate::prices::PriceSeries;
use crate::profile::DailyProfile;
use crate::profile::synthetic::{ResidentialLoad, SolarShape};
use crate::profile::table;
use crate::report::{ScheduleRow, SimulationOverview, SummaryMetrics};

/// Seed offset for the PV shape so it does not share noise with demand.
const SOLAR_SEED_OFFSET: u64 = 1;

/// Validated profiles and prices a run is built from.
#[derive(Debug, Clone)]
pub struct ScenarioInputs {
    pub demand_profile: DailyProfile,
    pub generation_profile: DailyProfile,
    pub prices: PriceSeries,
}

/// Everything a finished run produced.
#[derive(Debug, Clone)]
pub struct SimulationReport {
    pub config: ScenarioConfig,
    pub community: CommunityBalance,
    pub inputs: DispatchInputs,
    pub schedule: SolvedSchedule,
    pub metrics: SummaryMetrics,
}

impl SimulationReport {
    pub fn rows(&self) -> Vec<ScheduleRow> {
        ScheduleRow::from_schedule(&self.schedule, &self.inputs)
    }

    pub fn overview(&self) -> SimulationOverview {
        SimulationOverview::new(&self.config, &self.metrics, &self.community)
    }
}

/// Loads profiles and prices from the configured CSV tables, falling back to
/// the synthetic curves and the built-in day-ahead prices.
///
/// # Errors
///
/// Returns a [`ProfileError`] if any table is unreadable or malformed.
pub fn load_inputs(config: &ScenarioConfig) -> Result<ScenarioInputs, ProfileError> {
    let i = &config.inputs;

    let demand_profile = match &i.demand_profile {
        Some(path) => table::load_demand_profile(path)?,
        None => ResidentialLoad::default().profile(i.seed)?,
    };
    let generation_profile = match &i.generation_profile {
        Some(path) => table::load_generation_profile(path)?,
        None => SolarShape::default().profile(i.seed.wrapping_add(SOLAR_SEED_OFFSET))?,
    };
    let prices = match &i.prices {
        Some(path) => PriceSeries::from_csv_path(path)?,
        None => PriceSeries::day_ahead_default(),
    };

    Ok(ScenarioInputs {
        demand_profile,
        generation_profile,
        prices,
    })
}

/// Runs a scenario end to end with inputs resolved from its configuration.
///
/// # Errors
///
/// Fails before model construction on invalid configuration or malformed
/// tables, and after solving when no optimal schedule exists.
pub fn run_simulation(
    config: &ScenarioConfig,
    solver: &impl DispatchSolver,
) -> Result<SimulationReport, SimulationError> {
    check_config(config)?;
    let inputs = load_inputs(config)?;
    run_with_inputs(config, &inputs, solver)
}

/// Runs a scenario against already loaded profiles and prices.
///
/// # Errors
///
/// Returns [`SimulationError::Config`] for invalid configuration and
/// [`SimulationError::Dispatch`] when the solve is not optimal.
pub fn run_with_inputs(
    config: &ScenarioConfig,
    inputs: &ScenarioInputs,
    solver: &impl DispatchSolver,
) -> Result<SimulationReport, SimulationError> {
    check_config(config)?;

    let households =
        community::build_households(config, &inputs.demand_profile, &inputs.generation_profile);
    let balance = community::aggregate(&households);

    let dispatch_inputs = DispatchInputs::new(&balance.series, inputs.prices.clone());
    let dispatch_config = DispatchConfig::from(config);
    let model = DispatchModel::build(&dispatch_inputs, &dispatch_config);
    info!(
        variables = model.variable_count(),
        constraints = model.constraint_count(),
        "dispatch model built"
    );

    let schedule = solver.solve(model)?;
    let metrics = SummaryMetrics::compute(
        &schedule,
        &dispatch_inputs,
        &config.report.peak_periods,
        dispatch_config.battery.max_capacity,
    );
    info!(
        min_cost = metrics.min_cost,
        saving_pct = metrics.saving_pct,
        "simulation finished"
    );

    Ok(SimulationReport {
        config: config.clone(),
        community: balance,
        inputs: dispatch_inputs,
        schedule,
        metrics,
    })
}

fn check_config(config: &ScenarioConfig) -> Result<(), SimulationError> {
    let errors = config.validate();
    if errors.is_empty() {
        Ok(())
    } else {
        Err(SimulationError::Config(errors))
    }
}
