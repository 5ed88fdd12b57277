//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use community_dispatch::config::{BatteryConfig, ScenarioConfig};
use community_dispatch::prices::PriceSeries;
use community_dispatch::profile::DailyProfile;
use community_dispatch::runner::ScenarioInputs;

/// Absolute tolerance for comparing solved quantities.
pub const TOL: f64 = 1e-6;

/// Demand spread evenly over the day (1/24 per period).
pub fn flat_profile() -> DailyProfile {
    DailyProfile::from_fractions("flat", &[1.0 / 24.0; 24]).expect("flat profile is valid")
}

/// Evening-heavy demand: 2% overnight, 8% from 17:00 to 21:00.
pub fn evening_profile() -> DailyProfile {
    let pct: Vec<f64> = (0..24)
        .map(|h| if (17..22).contains(&h) { 8.0 } else { 60.0 / 19.0 })
        .collect();
    DailyProfile::from_percentages("evening", &pct).expect("evening profile is valid")
}

/// PV output spread evenly over 08:00 to 15:00.
pub fn daylight_profile() -> DailyProfile {
    let pct: Vec<f64> = (0..24)
        .map(|h| if (8..16).contains(&h) { 12.5 } else { 0.0 })
        .collect();
    DailyProfile::generation_from_percentages("daylight", &pct).expect("daylight profile is valid")
}

/// Cheap nights, expensive evenings.
pub fn two_tier_prices() -> PriceSeries {
    let values: Vec<f64> = (0..24)
        .map(|h| if (17..22).contains(&h) { 0.30 } else { 0.10 })
        .collect();
    PriceSeries::new("two-tier", &values).expect("prices are valid")
}

/// Battery with the given capacity and symmetric power limit, starting empty.
pub fn battery(max_capacity_kwh: f64, power_kw: f64) -> BatteryConfig {
    BatteryConfig {
        min_capacity_kwh: 0.0,
        max_capacity_kwh,
        max_charge_kw: power_kw,
        max_discharge_kw: power_kw,
        initial_soc_kwh: 0.0,
    }
}

/// Small community used by the solver-backed tests (4 households, half with PV).
pub fn small_community() -> ScenarioConfig {
    let mut cfg = ScenarioConfig::baseline();
    cfg.community.households = 4;
    cfg.community.pv_ratio = 0.5;
    cfg.community.demand_per_household_kwh = 12.0;
    cfg.community.generation_per_household_kwh = 10.0;
    cfg.battery = battery(20.0, 5.0);
    cfg
}

/// Evening demand, daylight PV and two-tier prices.
pub fn small_inputs() -> ScenarioInputs {
    ScenarioInputs {
        demand_profile: evening_profile(),
        generation_profile: daylight_profile(),
        prices: two_tier_prices(),
    }
}
