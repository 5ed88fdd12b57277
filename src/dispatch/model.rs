//! Construction of the battery dispatch MILP.
//!
//! Decision variables per period `p` (all energies in kWh):
//! - `soc[p]`: stored energy at the start of the period
//! - `grid_charge[p]`, `pv_charge[p]`: energy charged from grid / community PV
//! - `discharge[p]`: energy discharged to community demand
//! - `pv_self_consumption[p]`: community PV consumed directly
//! - `charge_state[p]`, `discharge_state[p]`: binary operating mode
//!
//! The first period is pinned to the initial state of charge; the horizon
//! does not wrap around.

use std::collections::BTreeMap;

use good_lp::{Constraint, Expression, ProblemVariables, Variable, constraint, variable};
use tracing::debug;

use super::{DispatchConfig, DispatchInputs};
use crate::series::PERIODS;

/// Handles to the per-period decision variables.
#[derive(Debug, Clone)]
pub struct DispatchVariables {
    pub soc: Vec<Variable>,
    pub grid_charge: Vec<Variable>,
    pub pv_charge: Vec<Variable>,
    pub discharge: Vec<Variable>,
    pub pv_self_consumption: Vec<Variable>,
    pub charge_state: Vec<Variable>,
    pub discharge_state: Vec<Variable>,
}

impl DispatchVariables {
    fn add_to(vars: &mut ProblemVariables, config: &DispatchConfig) -> Self {
        let b = &config.battery;
        Self {
            soc: vars.add_vector(variable().min(b.min_capacity).max(b.max_capacity), PERIODS),
            grid_charge: vars.add_vector(variable().min(0.0).max(b.max_charge), PERIODS),
            pv_charge: vars.add_vector(variable().min(0.0).max(b.max_charge), PERIODS),
            discharge: vars.add_vector(variable().min(0.0).max(b.max_discharge), PERIODS),
            pv_self_consumption: vars.add_vector(variable().min(0.0), PERIODS),
            charge_state: vars.add_vector(variable().binary(), PERIODS),
            discharge_state: vars.add_vector(variable().binary(), PERIODS),
        }
    }

    /// Energy charged in period `p` from any source.
    pub fn charge(&self, p: usize) -> Expression {
        self.grid_charge[p] + self.pv_charge[p]
    }

    /// Energy drawn from the grid in period `p`:
    /// `demand + grid_charge - discharge - pv_self_consumption`.
    pub fn grid_draw(&self, demand: f64, p: usize) -> Expression {
        demand + self.grid_charge[p] - self.discharge[p] - self.pv_self_consumption[p]
    }

    /// Community PV used in period `p`, for charging or direct consumption.
    pub fn generation_use(&self, p: usize) -> Expression {
        self.pv_charge[p] + self.pv_self_consumption[p]
    }

    /// Battery cycles over the day: throughput divided by capacity.
    pub fn cycles(&self, max_capacity: f64) -> Expression {
        let throughput: Expression = (0..PERIODS)
            .map(|p| self.discharge[p] + self.grid_charge[p] + self.pv_charge[p])
            .sum();
        throughput * (1.0 / max_capacity)
    }
}

/// A fully built dispatch problem, ready to hand to a solver.
pub struct DispatchModel {
    pub(super) problem: ProblemVariables,
    pub(super) objective: Expression,
    pub(super) constraints: Vec<Constraint>,
    pub(super) variables: DispatchVariables,
    counts: BTreeMap<&'static str, usize>,
}

impl DispatchModel {
    /// Builds variables, constraints, and the cost objective.
    pub fn build(inputs: &DispatchInputs, config: &DispatchConfig) -> Self {
        let mut problem = ProblemVariables::new();
        let v = DispatchVariables::add_to(&mut problem, config);
        let b = &config.battery;

        let mut model = Self {
            problem,
            objective: Expression::from(0.0),
            constraints: Vec::new(),
            variables: v.clone(),
            counts: BTreeMap::new(),
        };

        for p in 0..PERIODS {
            let demand = inputs.demand[p];
            let generation = inputs.generation[p];

            if p == 0 {
                model.push("soc_balance", constraint!(v.soc[0] == b.initial_soc));
            } else {
                model.push(
                    "soc_balance",
                    constraint!(
                        v.soc[p] == v.soc[p - 1] + v.grid_charge[p - 1] + v.pv_charge[p - 1]
                            - v.discharge[p - 1]
                    ),
                );
            }
            model.push(
                "capacity_headroom",
                constraint!(v.charge(p) <= b.max_capacity - v.soc[p]),
            );
            model.push("capacity_floor", constraint!(v.discharge[p] <= v.soc[p]));
            model.push(
                "demand_coverage",
                constraint!(v.discharge[p] + v.pv_self_consumption[p] <= demand),
            );
            model.push(
                "generation_coverage",
                constraint!(v.generation_use(p) <= generation),
            );
            model.push(
                "charge_gate",
                constraint!(v.charge(p) <= v.charge_state[p] * b.max_charge),
            );
            model.push(
                "discharge_gate",
                constraint!(v.discharge[p] <= v.discharge_state[p] * b.max_discharge),
            );
            model.push(
                "mode_exclusive",
                constraint!(v.charge_state[p] + v.discharge_state[p] <= 1.0),
            );
            model.push("charge_cap", constraint!(v.charge(p) <= b.max_charge));

            if let Some(limit) = config.max_grid_consumption {
                model.push("max_grid_draw", constraint!(v.grid_draw(demand, p) <= limit));
            }
        }

        if let Some(max_cycles) = config.max_cycles {
            model.push(
                "max_cycles",
                constraint!(v.cycles(b.max_capacity) <= max_cycles),
            );
        }

        model.objective = (0..PERIODS)
            .map(|p| {
                v.grid_draw(inputs.demand[p], p) * inputs.grid_prices.at(p)
                    + v.generation_use(p) * inputs.pv_prices.at(p)
            })
            .sum();

        debug!(constraints = ?model.counts, "built dispatch model");
        model
    }

    fn push(&mut self, kind: &'static str, c: Constraint) {
        *self.counts.entry(kind).or_default() += 1;
        self.constraints.push(c);
    }

    pub fn variables(&self) -> &DispatchVariables {
        &self.variables
    }

    /// Total number of constraints.
    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    /// Number of constraints of one kind, e.g. `"soc_balance"`.
    pub fn count_of(&self, kind: &str) -> usize {
        self.counts.get(kind).copied().unwrap_or(0)
    }

    /// Number of decision variables (seven per period).
    pub fn variable_count(&self) -> usize {
        7 * PERIODS
    }
}
