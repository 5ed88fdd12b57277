//! Properties every optimal dispatch schedule must satisfy.

mod common;

use community_dispatch::dispatch::{DispatchError, MicroLpSolver, SolveStatus};
use community_dispatch::error::SimulationError;
use community_dispatch::prices::PriceSeries;
use community_dispatch::runner::{SimulationReport, run_with_inputs};
use community_dispatch::series::PERIODS;

use common::TOL;

fn solve_small() -> SimulationReport {
    run_with_inputs(&common::small_community(), &common::small_inputs(), &MicroLpSolver)
        .expect("small community is feasible")
}

#[test]
fn soc_is_conserved_between_periods() {
    let r = solve_small();
    let s = &r.schedule;
    for p in 1..PERIODS {
        let expected = s.soc[p - 1] + s.grid_charge[p - 1] + s.pv_charge[p - 1] - s.discharge[p - 1];
        assert!(
            (s.soc[p] - expected).abs() < TOL,
            "soc[{p}] = {}, expected {expected}",
            s.soc[p]
        );
    }
}

#[test]
fn soc_stays_within_capacity_and_starts_at_initial() {
    let r = solve_small();
    let b = &r.config.battery;
    assert!((r.schedule.soc[0] - b.initial_soc_kwh).abs() < TOL);
    for (p, soc) in r.schedule.soc.iter().enumerate() {
        assert!(
            *soc >= b.min_capacity_kwh - TOL && *soc <= b.max_capacity_kwh + TOL,
            "soc[{p}] = {soc} out of bounds"
        );
    }
}

#[test]
fn battery_never_charges_and_discharges_together() {
    let r = solve_small();
    let s = &r.schedule;
    for p in 0..PERIODS {
        assert!(
            !(s.charge_state[p] && s.discharge_state[p]),
            "both modes active at {p}"
        );
        if s.grid_charge[p] + s.pv_charge[p] > TOL {
            assert!(s.charge_state[p], "charging at {p} without charge state");
        }
        if s.discharge[p] > TOL {
            assert!(s.discharge_state[p], "discharging at {p} without discharge state");
        }
    }
}

#[test]
fn flows_respect_demand_generation_and_power_limits() {
    let r = solve_small();
    let s = &r.schedule;
    let b = &r.config.battery;
    for p in 0..PERIODS {
        assert!(s.discharge[p] + s.pv_self_consumption[p] <= r.inputs.demand[p] + TOL);
        assert!(s.pv_charge[p] + s.pv_self_consumption[p] <= r.inputs.generation[p] + TOL);
        assert!(s.grid_charge[p] + s.pv_charge[p] <= b.max_charge_kw + TOL);
        assert!(s.discharge[p] <= b.max_discharge_kw + TOL);
        assert!(s.discharge[p] <= s.soc[p] + TOL);
    }
}

#[test]
fn optimizer_is_never_worse_than_doing_nothing() {
    let r = solve_small();
    assert!(r.metrics.alternative_cost >= r.metrics.min_cost - TOL);
    assert!(r.metrics.saving_pct > 0.0, "evening prices leave room to save");
}

#[test]
fn objective_matches_extracted_grid_cost() {
    let r = solve_small();
    let draw = r.schedule.grid_draw(&r.inputs.demand);
    let cost = draw.dot(r.inputs.grid_prices.values());
    assert!((cost - r.metrics.min_cost).abs() < 1e-4);
}

#[test]
fn zero_prices_give_zero_cost() {
    let mut inputs = common::small_inputs();
    inputs.prices = PriceSeries::zero();
    let r = run_with_inputs(&common::small_community(), &inputs, &MicroLpSolver).expect("feasible");
    assert!(r.metrics.min_cost.abs() < TOL);
    assert_eq!(r.metrics.alternative_cost, 0.0);
    assert_eq!(r.metrics.saving_pct, 0.0);
}

#[test]
fn grid_and_cycle_limits_are_honoured() {
    let mut cfg = common::small_community();
    cfg.constraints.max_grid_consumption_kw = Some(3.0);
    cfg.constraints.max_battery_cycles = Some(1.0);
    let r = run_with_inputs(&cfg, &common::small_inputs(), &MicroLpSolver).expect("feasible");

    let draw = r.schedule.grid_draw(&r.inputs.demand);
    for p in 0..PERIODS {
        assert!(draw[p] <= 3.0 + TOL, "grid draw {} at {p}", draw[p]);
    }
    assert!(r.metrics.max_peak <= 3.0 + TOL);
    assert!(r.metrics.battery_cycles <= 1.0 + TOL);
}

#[test]
fn unreachable_grid_limit_is_reported_as_infeasible() {
    let mut cfg = common::small_community();
    cfg.constraints.max_grid_consumption_kw = Some(0.1);
    let err = run_with_inputs(&cfg, &common::small_inputs(), &MicroLpSolver).unwrap_err();
    match err {
        SimulationError::Dispatch(DispatchError::NotOptimal(status)) => {
            assert_eq!(status, SolveStatus::Infeasible);
        }
        other => panic!("expected infeasible dispatch, got {other}"),
    }
}

#[test]
fn metrics_are_consistent_with_schedule() {
    let r = solve_small();
    let rows = r.rows();
    assert_eq!(rows.len(), PERIODS);

    let grid: f64 = rows.iter().map(|row| row.consumption_from_grid).sum();
    assert!((grid - r.metrics.grid_consumption).abs() < 1e-6);

    let peak: f64 = r
        .config
        .report
        .peak_periods
        .iter()
        .map(|&p| rows[p].consumption_from_grid)
        .sum();
    assert!((peak - r.metrics.grid_consumption_in_peak_periods).abs() < 1e-6);
    assert!(r.metrics.local_generation_usage_pct <= 100.0 + TOL);
}
