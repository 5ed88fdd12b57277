//! Household records and their per-period energy balance.

use serde::Serialize;
use uuid::Uuid;

use crate::profile::DailyProfile;
use crate::series::PeriodSeries;

/// One smart home: its demand curve, an optional PV curve, and daily budgets.
///
/// Households without PV carry no generation profile at all; there are no
/// household sub-types.
#[derive(Debug, Clone)]
pub struct Household {
    pub id: Uuid,
    pub demand_profile: DailyProfile,
    pub generation_profile: Option<DailyProfile>,
    /// Daily demand (kWh).
    pub demand_budget_kwh: f64,
    /// Daily generation if the household has PV (kWh).
    pub generation_budget_kwh: f64,
}

impl Household {
    pub fn new(
        demand_profile: DailyProfile,
        generation_profile: Option<DailyProfile>,
        demand_budget_kwh: f64,
        generation_budget_kwh: f64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            demand_profile,
            generation_profile,
            demand_budget_kwh,
            generation_budget_kwh,
        }
    }

    /// Builds a household from shared profiles, attaching the PV profile only
    /// when `include_pv_generation_profile` is set.
    pub fn from_profiles(
        demand_profile: &DailyProfile,
        generation_profile: &DailyProfile,
        include_pv_generation_profile: bool,
        demand_budget_kwh: f64,
        generation_budget_kwh: f64,
    ) -> Self {
        Self::new(
            demand_profile.clone(),
            include_pv_generation_profile.then(|| generation_profile.clone()),
            demand_budget_kwh,
            generation_budget_kwh,
        )
    }

    pub fn has_pv(&self) -> bool {
        self.generation_profile.is_some()
    }

    /// Per-period demand (kWh).
    pub fn demand(&self) -> PeriodSeries {
        self.demand_profile.scaled(self.demand_budget_kwh)
    }

    /// Per-period generation (kWh); all zero without PV.
    pub fn generation(&self) -> PeriodSeries {
        self.generation_profile
            .as_ref()
            .map_or_else(PeriodSeries::zero, |p| p.scaled(self.generation_budget_kwh))
    }

    /// Derives the household's energy balance.
    pub fn balance(&self) -> HouseholdBalance {
        HouseholdBalance::new(self.id, self.demand(), self.generation())
    }
}

/// Derived per-period energy flows of one household.
#[derive(Debug, Clone, Serialize)]
pub struct HouseholdBalance {
    pub id: Uuid,
    pub demand: PeriodSeries,
    pub generation: PeriodSeries,
    /// Generation consumed in the same period by the household itself.
    pub self_consumed: PeriodSeries,
    /// Demand left after self-consumption.
    pub grid_demand: PeriodSeries,
    /// Generation left after self-consumption.
    pub exportable_generation: PeriodSeries,
    /// Share of daily demand covered by own generation, 0 when there is no demand.
    pub coverage_ratio: f64,
}

impl HouseholdBalance {
    pub fn new(id: Uuid, demand: PeriodSeries, generation: PeriodSeries) -> Self {
        let self_consumed = demand.min(&generation);
        let total_demand = demand.sum();
        let coverage_ratio = if total_demand > 0.0 {
            self_consumed.sum() / total_demand
        } else {
            0.0
        };

        Self {
            id,
            grid_demand: demand.sub(&self_consumed),
            exportable_generation: generation.sub(&self_consumed),
            demand,
            generation,
            self_consumed,
            coverage_ratio,
        }
    }
}
