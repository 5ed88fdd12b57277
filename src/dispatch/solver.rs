//! Solver seam and the solved schedule.

use good_lp::{ResolutionError, Solution, SolverModel, Variable, microlp};
use tracing::{info, warn};

use super::model::DispatchModel;
use super::{DispatchError, SolveStatus};
use crate::series::{PERIODS, PeriodSeries};

/// Something that can solve a [`DispatchModel`] to optimality.
pub trait DispatchSolver {
    /// Solves the model, consuming it.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::NotOptimal`] with the termination status when
    /// no optimal solution was found.
    fn solve(&self, model: DispatchModel) -> Result<SolvedSchedule, DispatchError>;
}

/// Pure-Rust branch-and-bound solver backed by `microlp`.
#[derive(Debug, Default, Clone, Copy)]
pub struct MicroLpSolver;

impl DispatchSolver for MicroLpSolver {
    fn solve(&self, model: DispatchModel) -> Result<SolvedSchedule, DispatchError> {
        let DispatchModel {
            problem,
            objective,
            constraints,
            variables: v,
            ..
        } = model;

        let mut unsolved = problem.minimise(objective.clone()).using(microlp);
        for c in constraints {
            unsolved = unsolved.with(c);
        }

        let solution = unsolved.solve().map_err(|e| {
            let status = match e {
                ResolutionError::Infeasible => SolveStatus::Infeasible,
                ResolutionError::Unbounded => SolveStatus::Unbounded,
                other => SolveStatus::Other(other.to_string()),
            };
            warn!(%status, "dispatch solve failed");
            DispatchError::NotOptimal(status)
        })?;

        let schedule = SolvedSchedule {
            soc: values(&solution, &v.soc),
            grid_charge: values(&solution, &v.grid_charge),
            pv_charge: values(&solution, &v.pv_charge),
            discharge: values(&solution, &v.discharge),
            pv_self_consumption: values(&solution, &v.pv_self_consumption),
            charge_state: states(&solution, &v.charge_state),
            discharge_state: states(&solution, &v.discharge_state),
            objective: solution.eval(objective),
        };
        info!(objective = schedule.objective, "dispatch solved to optimality");
        Ok(schedule)
    }
}

fn values(solution: &impl Solution, vars: &[Variable]) -> PeriodSeries {
    PeriodSeries::from_fn(|p| solution.value(vars[p]))
}

// Binaries come back as floats; round at one half.
fn states(solution: &impl Solution, vars: &[Variable]) -> [bool; PERIODS] {
    std::array::from_fn(|p| solution.value(vars[p]) > 0.5)
}

/// Concrete per-period values of an optimal dispatch.
#[derive(Debug, Clone, PartialEq)]
pub struct SolvedSchedule {
    pub soc: PeriodSeries,
    pub grid_charge: PeriodSeries,
    pub pv_charge: PeriodSeries,
    pub discharge: PeriodSeries,
    pub pv_self_consumption: PeriodSeries,
    pub charge_state: [bool; PERIODS],
    pub discharge_state: [bool; PERIODS],
    /// Optimal objective value (total cost).
    pub objective: f64,
}

impl SolvedSchedule {
    /// Energy charged per period from grid and PV together.
    pub fn charge(&self) -> PeriodSeries {
        self.grid_charge + self.pv_charge
    }

    /// Grid draw per period given the community demand it was solved against.
    pub fn grid_draw(&self, demand: &PeriodSeries) -> PeriodSeries {
        PeriodSeries::from_fn(|p| {
            demand[p] + self.grid_charge[p] - self.discharge[p] - self.pv_self_consumption[p]
        })
    }

    /// Community PV used per period, for charging or direct consumption.
    pub fn generation_use(&self) -> PeriodSeries {
        self.pv_charge + self.pv_self_consumption
    }

    /// Battery cycles: total throughput divided by capacity.
    pub fn cycles(&self, max_capacity: f64) -> f64 {
        if max_capacity <= 0.0 {
            return 0.0;
        }
        (self.discharge.sum() + self.grid_charge.sum() + self.pv_charge.sum()) / max_capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::{BatteryLimits, DispatchConfig, DispatchInputs};
    use crate::prices::PriceSeries;

    const TOL: f64 = 1e-6;

    fn limits(max_capacity: f64, power: f64) -> DispatchConfig {
        DispatchConfig {
            battery: BatteryLimits {
                min_capacity: 0.0,
                max_capacity,
                max_charge: power,
                max_discharge: power,
                initial_soc: 0.0,
            },
            max_grid_consumption: None,
            max_cycles: None,
        }
    }

    fn two_price_day(cheap: f64, dear: f64) -> PriceSeries {
        let values: Vec<f64> = (0..PERIODS).map(|h| if h < 12 { cheap } else { dear }).collect();
        PriceSeries::new("two-price", &values).expect("valid")
    }

    #[test]
    fn arbitrage_charges_cheap_and_discharges_dear() {
        let inputs = DispatchInputs {
            demand: PeriodSeries::constant(1.0),
            generation: PeriodSeries::zero(),
            grid_prices: two_price_day(0.1, 0.3),
            pv_prices: PriceSeries::zero(),
        };
        let model = DispatchModel::build(&inputs, &limits(20.0, 5.0));
        let schedule = MicroLpSolver.solve(model).expect("feasible");

        // Twelve expensive hours of 1 kWh each can be fully shifted.
        let expected = 12.0 * 0.1 + 12.0 * 0.1;
        assert!(
            (schedule.objective - expected).abs() < TOL,
            "objective {}",
            schedule.objective
        );
        assert!(schedule.discharge.subset_sum(&(12..24).collect::<Vec<_>>()) > 11.0);
    }

    #[test]
    fn states_match_flows() {
        let inputs = DispatchInputs {
            demand: PeriodSeries::constant(1.0),
            generation: PeriodSeries::zero(),
            grid_prices: two_price_day(0.1, 0.3),
            pv_prices: PriceSeries::zero(),
        };
        let schedule = MicroLpSolver
            .solve(DispatchModel::build(&inputs, &limits(20.0, 5.0)))
            .expect("feasible");
        for p in 0..PERIODS {
            assert!(!(schedule.charge_state[p] && schedule.discharge_state[p]));
            if schedule.charge()[p] > TOL {
                assert!(schedule.charge_state[p], "charging without state at {p}");
            }
            if schedule.discharge[p] > TOL {
                assert!(schedule.discharge_state[p], "discharging without state at {p}");
            }
        }
    }

    #[test]
    fn impossible_grid_limit_is_infeasible() {
        let inputs = DispatchInputs {
            demand: PeriodSeries::constant(5.0),
            generation: PeriodSeries::zero(),
            grid_prices: PriceSeries::flat(0.2),
            pv_prices: PriceSeries::zero(),
        };
        let cfg = DispatchConfig {
            max_grid_consumption: Some(1.0),
            ..limits(1.0, 1.0)
        };
        let err = MicroLpSolver
            .solve(DispatchModel::build(&inputs, &cfg))
            .unwrap_err();
        assert_eq!(err.status(), &SolveStatus::Infeasible);
    }

    #[test]
    fn derived_series_use_solved_values() {
        let mut schedule = SolvedSchedule {
            soc: PeriodSeries::zero(),
            grid_charge: PeriodSeries::zero(),
            pv_charge: PeriodSeries::zero(),
            discharge: PeriodSeries::zero(),
            pv_self_consumption: PeriodSeries::zero(),
            charge_state: [false; PERIODS],
            discharge_state: [false; PERIODS],
            objective: 0.0,
        };
        schedule.grid_charge[1] = 2.0;
        schedule.pv_charge[2] = 1.0;
        schedule.discharge[3] = 3.0;
        schedule.pv_self_consumption[3] = 0.5;
        let demand = PeriodSeries::constant(4.0);
        let draw = schedule.grid_draw(&demand);
        assert_eq!(draw[1], 6.0);
        assert_eq!(draw[3], 0.5);
        assert_eq!(schedule.generation_use()[3], 0.5);
        assert_eq!(schedule.cycles(6.0), 1.0);
        assert_eq!(schedule.cycles(0.0), 0.0);
    }
}
