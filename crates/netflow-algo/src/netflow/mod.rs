//! Multi-commodity minimum-cost flow.
//!
//! [`Netflow`] owns the three schemas and a solver configuration. Every entry
//! point validates its dataset first; an integrity failure is an error, while
//! an infeasible or otherwise non-optimal LP is reported through
//! [`SolveOutcome`] (or `Ok(None)` from the `Option`-returning entry points).
//!
//! ```
//! use netflow_algo::Netflow;
//! use netflow_core::{ArcRow, CommodityRow, CostRow, InputDat, NodeRow, QuantityRow};
//!
//! let dat = InputDat {
//!     commodities: vec![CommodityRow::new("Pens", 1.0)],
//!     nodes: vec![NodeRow::new("Detroit"), NodeRow::new("Boston")],
//!     arcs: vec![ArcRow::new("Detroit", "Boston", 100.0)],
//!     cost: vec![CostRow::new("Pens", "Detroit", "Boston", 20.0)],
//!     supply: vec![QuantityRow::new("Pens", "Detroit", 40.0)],
//!     demand: vec![QuantityRow::new("Pens", "Boston", 40.0)],
//! };
//!
//! let solution = Netflow::default().solve(&dat).unwrap().expect("feasible");
//! assert_eq!(solution.total_cost(), Some(800.0));
//! ```

mod config;
mod solver;

pub use config::{LpSolverKind, NetflowSolverConfig};
pub use solver::{ModelStats, SolveOutcome};

use netflow_core::{check_integrity, InputDat, ModelingDat, NetflowResult, Schemas, SolutionDat};

use crate::transform::input_to_modeling;

/// Flow model entry points bound to a solver configuration.
#[derive(Debug, Clone, Default)]
pub struct Netflow {
    schemas: Schemas,
    config: NetflowSolverConfig,
}

impl Netflow {
    pub fn new(config: NetflowSolverConfig) -> Self {
        Self {
            schemas: Schemas::new(),
            config,
        }
    }

    pub fn config(&self) -> &NetflowSolverConfig {
        &self.config
    }

    /// Validate `dat` against the input schema and merge supply and demand
    /// into a signed inflow table.
    pub fn create_modeling_dat_from_input_dat(&self, dat: &InputDat) -> NetflowResult<ModelingDat> {
        input_to_modeling(&self.schemas.input, dat)
    }

    /// Solve from the input representation. `Ok(None)` when the LP has no
    /// optimal solution.
    pub fn solve(&self, dat: &InputDat) -> NetflowResult<Option<SolutionDat>> {
        Ok(self.solve_detailed(dat)?.into_solution())
    }

    /// Solve from the modeling representation. `Ok(None)` when the LP has no
    /// optimal solution.
    pub fn solve_from_modeling_dat(&self, dat: &ModelingDat) -> NetflowResult<Option<SolutionDat>> {
        Ok(self.solve_detailed_from_modeling_dat(dat)?.into_solution())
    }

    /// Like [`Netflow::solve`], keeping the termination status.
    pub fn solve_detailed(&self, dat: &InputDat) -> NetflowResult<SolveOutcome> {
        let modeling = self.create_modeling_dat_from_input_dat(dat)?;
        self.solve_detailed_from_modeling_dat(&modeling)
    }

    /// Like [`Netflow::solve_from_modeling_dat`], keeping the termination status.
    pub fn solve_detailed_from_modeling_dat(
        &self,
        dat: &ModelingDat,
    ) -> NetflowResult<SolveOutcome> {
        check_integrity(&self.schemas.modeling, dat)?;
        solver::solve_formulation(dat, &self.config)
    }

    /// Dimensions of the LP built for `dat`, without solving it.
    pub fn model_stats(&self, dat: &ModelingDat) -> NetflowResult<ModelStats> {
        check_integrity(&self.schemas.modeling, dat)?;
        Ok(solver::build_formulation(dat)?.stats)
    }
}

/// [`Netflow::create_modeling_dat_from_input_dat`] with the default configuration.
pub fn create_modeling_dat_from_input_dat(dat: &InputDat) -> NetflowResult<ModelingDat> {
    Netflow::default().create_modeling_dat_from_input_dat(dat)
}

/// [`Netflow::solve`] with the default configuration.
pub fn solve(dat: &InputDat) -> NetflowResult<Option<SolutionDat>> {
    Netflow::default().solve(dat)
}

/// [`Netflow::solve_from_modeling_dat`] with the default configuration.
pub fn solve_from_modeling_dat(dat: &ModelingDat) -> NetflowResult<Option<SolutionDat>> {
    Netflow::default().solve_from_modeling_dat(dat)
}
