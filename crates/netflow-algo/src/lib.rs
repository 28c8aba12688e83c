//! # netflow-algo: Multi-Commodity Minimum-Cost Flow
//!
//! Transforms and solves the multi-commodity network model defined in
//! `netflow-core`.
//!
//! ## Pipeline
//!
//! | Step | Entry point | Result |
//! |------|-------------|--------|
//! | Validate + merge supply/demand | [`create_modeling_dat_from_input_dat`] | [`netflow_core::ModelingDat`] |
//! | Build and solve the LP | [`solve_from_modeling_dat`] | `Option<SolutionDat>` |
//! | Both | [`solve`] | `Option<SolutionDat>` |
//! | Check a solution | [`verify::verify_solution`] | violations |
//!
//! ## Solver Backends
//!
//! The LP is built with `good_lp`. [`LpSolverKind::Microlp`] (pure-Rust
//! simplex) is always available; `solver-clarabel` and `solver-highs` add
//! the other backends.

pub mod netflow;
pub mod transform;
pub mod verify;

pub use netflow::{
    create_modeling_dat_from_input_dat, solve, solve_from_modeling_dat, LpSolverKind, ModelStats,
    Netflow, NetflowSolverConfig, SolveOutcome,
};
pub use verify::{nearly_same, verify_solution, Violation};
