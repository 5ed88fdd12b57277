//! Community construction and household aggregation.

use tracing::{debug, info};

use crate::config::ScenarioConfig;
use crate::household::{Household, HouseholdBalance};
use crate::profile::DailyProfile;
use crate::series::PeriodSeries;

/// Community-level energy series fed into the dispatch model.
#[derive(Debug, Clone, PartialEq)]
pub struct CommunitySeries {
    /// Demand that households cannot cover with their own PV.
    pub grid_demand: PeriodSeries,
    /// PV output left over after household self-consumption.
    pub exportable_generation: PeriodSeries,
}

/// Result of aggregating every household of a community.
#[derive(Debug, Clone)]
pub struct CommunityBalance {
    pub households: Vec<HouseholdBalance>,
    pub series: CommunitySeries,
}

impl CommunityBalance {
    /// Mean self-consumption coverage over all households.
    pub fn mean_coverage_ratio(&self) -> f64 {
        if self.households.is_empty() {
            return 0.0;
        }
        let total: f64 = self.households.iter().map(|h| h.coverage_ratio).sum();
        total / self.households.len() as f64
    }
}

/// Creates the households of a scenario.
///
/// The first `ceil(households * pv_ratio)` households get the PV profile,
/// the rest have no generation.
pub fn build_households(
    config: &ScenarioConfig,
    demand_profile: &DailyProfile,
    generation_profile: &DailyProfile,
) -> Vec<Household> {
    let c = &config.community;
    let with_pv = config.households_with_pv();
    (0..c.households)
        .map(|i| {
            Household::from_profiles(
                demand_profile,
                generation_profile,
                i < with_pv,
                c.demand_per_household_kwh,
                c.generation_per_household_kwh,
            )
        })
        .collect()
}

/// Derives every household's balance and sums grid demand and exportable
/// generation elementwise.
pub fn aggregate(households: &[Household]) -> CommunityBalance {
    let balances: Vec<HouseholdBalance> = households.iter().map(Household::balance).collect();

    let grid_demand: PeriodSeries = balances.iter().map(|b| b.grid_demand).sum();
    let exportable_generation: PeriodSeries =
        balances.iter().map(|b| b.exportable_generation).sum();

    info!(
        households = balances.len(),
        with_pv = households.iter().filter(|h| h.has_pv()).count(),
        grid_demand_kwh = grid_demand.sum(),
        exportable_generation_kwh = exportable_generation.sum(),
        "aggregated community"
    );
    debug!(%grid_demand, %exportable_generation, "community series");

    CommunityBalance {
        households: balances,
        series: CommunitySeries {
            grid_demand,
            exportable_generation,
        },
    }
}
