//! LP formulation and solve for the multi-commodity flow model.
//!
//! One non-negative variable per `cost` row. For each arc carrying at least
//! one commodity, the volume-weighted load is bounded by the arc capacity
//! (no row for infinite capacity). For each (commodity, node) pair touched by
//! a flow variable or a nonzero inflow, inbound flow plus inflow equals
//! outbound flow.

use std::collections::{BTreeMap, BTreeSet};
use std::time::Instant;

#[cfg(feature = "solver-clarabel")]
use good_lp::solvers::clarabel::clarabel as clarabel_solver;
#[cfg(feature = "solver-highs")]
use good_lp::solvers::highs::highs as highs_solver;
use good_lp::solvers::microlp::microlp as microlp_solver;
use good_lp::{
    constraint, variable, variables, Constraint, Expression, ProblemVariables, ResolutionError,
    Solution, SolverModel, Variable,
};
use netflow_core::{
    CostRow, FlowRow, ModelingDat, NetflowError, NetflowResult, ParameterRow, SolutionDat,
    TOTAL_COST,
};
use tracing::{debug, info, warn};

use super::config::{LpSolverKind, NetflowSolverConfig};

/// Termination of one solve.
#[derive(Debug, Clone, PartialEq)]
pub enum SolveOutcome {
    /// Optimal flows and total cost
    Optimal(SolutionDat),
    /// No flow satisfies conservation and capacity
    Infeasible,
    /// Objective decreases without bound
    Unbounded,
    /// Backend stopped without a verdict
    SolverFailed(String),
}

impl SolveOutcome {
    /// The solution, if the solve reached optimality.
    pub fn into_solution(self) -> Option<SolutionDat> {
        match self {
            SolveOutcome::Optimal(solution) => Some(solution),
            _ => None,
        }
    }

    pub fn status(&self) -> &'static str {
        match self {
            SolveOutcome::Optimal(_) => "optimal",
            SolveOutcome::Infeasible => "infeasible",
            SolveOutcome::Unbounded => "unbounded",
            SolveOutcome::SolverFailed(_) => "solver failed",
        }
    }
}

/// Dimensions of a built LP.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModelStats {
    pub variables: usize,
    pub capacity_constraints: usize,
    pub conservation_constraints: usize,
}

/// A decision variable and the cost row it came from.
struct FlowVar<'a> {
    row: &'a CostRow,
    var: Variable,
}

/// The LP before it is handed to a backend.
pub(crate) struct Formulation<'a> {
    vars: ProblemVariables,
    objective: Expression,
    constraints: Vec<Constraint>,
    flows: Vec<FlowVar<'a>>,
    /// (commodity, node) pairs with nonzero inflow but no incident variable
    stranded: Vec<(&'a str, &'a str)>,
    pub(crate) stats: ModelStats,
}

/// Build the LP for a dataset that has passed the modeling schema.
pub(crate) fn build_formulation(dat: &ModelingDat) -> NetflowResult<Formulation<'_>> {
    let volumes: BTreeMap<&str, f64> = dat
        .commodities
        .iter()
        .map(|row| (row.name.as_str(), row.volume))
        .collect();

    let mut vars = variables!();
    let mut objective = Expression::from(0.0);
    let mut flows = Vec::with_capacity(dat.cost.len());
    for row in &dat.cost {
        let var = vars.add(variable().min(0.0));
        objective += row.cost * var;
        flows.push(FlowVar { row, var });
    }

    let mut constraints = Vec::new();
    let mut stats = ModelStats {
        variables: flows.len(),
        ..ModelStats::default()
    };

    // Capacity: Σ_k volume_k · flow(k, i, j) ≤ capacity(i, j)
    let mut loads: BTreeMap<(&str, &str), Expression> = BTreeMap::new();
    for flow in &flows {
        let volume = *volumes.get(flow.row.commodity.as_str()).ok_or_else(|| {
            NetflowError::Solver(format!(
                "cost row references commodity '{}' with no volume",
                flow.row.commodity
            ))
        })?;
        *loads
            .entry((flow.row.source.as_str(), flow.row.destination.as_str()))
            .or_insert_with(|| Expression::from(0.0)) += volume * flow.var;
    }
    for arc in &dat.arcs {
        let Some(load) = loads.get(&(arc.source.as_str(), arc.destination.as_str())) else {
            continue;
        };
        if arc.capacity.is_finite() {
            constraints.push(constraint!(load.clone() <= arc.capacity));
            stats.capacity_constraints += 1;
        }
    }

    // Conservation: inbound(k, n) + inflow(k, n) == outbound(k, n)
    let mut inbound: BTreeMap<(&str, &str), Expression> = BTreeMap::new();
    let mut outbound: BTreeMap<(&str, &str), Expression> = BTreeMap::new();
    for flow in &flows {
        let commodity = flow.row.commodity.as_str();
        *inbound
            .entry((commodity, flow.row.destination.as_str()))
            .or_insert_with(|| Expression::from(0.0)) += flow.var;
        *outbound
            .entry((commodity, flow.row.source.as_str()))
            .or_insert_with(|| Expression::from(0.0)) += flow.var;
    }
    let mut inflow: BTreeMap<(&str, &str), f64> = BTreeMap::new();
    for row in &dat.inflow {
        *inflow
            .entry((row.commodity.as_str(), row.node.as_str()))
            .or_insert(0.0) += row.quantity;
    }

    let pairs: BTreeSet<(&str, &str)> = inbound
        .keys()
        .chain(outbound.keys())
        .copied()
        .chain(
            inflow
                .iter()
                .filter(|(_, quantity)| **quantity != 0.0)
                .map(|(pair, _)| *pair),
        )
        .collect();

    let mut stranded = Vec::new();
    for pair in pairs {
        let quantity = inflow.get(&pair).copied().unwrap_or(0.0);
        let (into, out_of) = (inbound.get(&pair), outbound.get(&pair));
        if into.is_none() && out_of.is_none() {
            stranded.push(pair);
            continue;
        }
        let into = into.cloned().unwrap_or_else(|| Expression::from(0.0));
        let out_of = out_of.cloned().unwrap_or_else(|| Expression::from(0.0));
        constraints.push(constraint!(into + quantity == out_of));
        stats.conservation_constraints += 1;
    }

    Ok(Formulation {
        vars,
        objective,
        constraints,
        flows,
        stranded,
        stats,
    })
}

/// Solve a dataset that has passed the modeling schema.
pub(crate) fn solve_formulation(
    dat: &ModelingDat,
    config: &NetflowSolverConfig,
) -> NetflowResult<SolveOutcome> {
    let start = Instant::now();
    let Formulation {
        vars,
        objective,
        constraints,
        flows,
        stranded,
        stats,
    } = build_formulation(dat)?;

    if config.verbose {
        info!(
            solver = config.lp_solver.as_str(),
            variables = stats.variables,
            capacity_constraints = stats.capacity_constraints,
            conservation_constraints = stats.conservation_constraints,
            "built flow LP"
        );
    } else {
        debug!(
            solver = config.lp_solver.as_str(),
            variables = stats.variables,
            capacity_constraints = stats.capacity_constraints,
            conservation_constraints = stats.conservation_constraints,
            "built flow LP"
        );
    }

    if let Some((commodity, node)) = stranded.first() {
        warn!(
            commodity,
            node,
            stranded = stranded.len(),
            "nonzero inflow at a node with no arcs for its commodity"
        );
        return Ok(SolveOutcome::Infeasible);
    }

    if flows.is_empty() {
        return Ok(SolveOutcome::Optimal(report(&flows, &[])));
    }

    let problem = vars.minimise(objective);
    let values = match config.lp_solver {
        LpSolverKind::Microlp => run(problem.using(microlp_solver), constraints, &flows),
        #[cfg(feature = "solver-clarabel")]
        LpSolverKind::Clarabel => run(problem.using(clarabel_solver), constraints, &flows),
        #[cfg(feature = "solver-highs")]
        LpSolverKind::Highs => run(problem.using(highs_solver), constraints, &flows),
    };

    let outcome = match values {
        Ok(values) => SolveOutcome::Optimal(report(&flows, &values)),
        Err(ResolutionError::Infeasible) => SolveOutcome::Infeasible,
        Err(ResolutionError::Unbounded) => SolveOutcome::Unbounded,
        Err(other) => SolveOutcome::SolverFailed(other.to_string()),
    };

    match &outcome {
        SolveOutcome::Optimal(solution) => info!(
            status = outcome.status(),
            total_cost = solution.total_cost().unwrap_or_default(),
            shipments = solution.flow.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "flow LP solved"
        ),
        _ => warn!(
            status = outcome.status(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "flow LP has no optimal solution"
        ),
    }
    Ok(outcome)
}

fn run<M>(
    mut model: M,
    constraints: Vec<Constraint>,
    flows: &[FlowVar<'_>],
) -> Result<Vec<f64>, ResolutionError>
where
    M: SolverModel<Error = ResolutionError>,
{
    for c in constraints {
        model = model.with(c);
    }
    let solution = model.solve()?;
    Ok(flows.iter().map(|flow| solution.value(flow.var)).collect())
}

/// Flow rows for strictly positive values, plus the objective value.
fn report(flows: &[FlowVar<'_>], values: &[f64]) -> SolutionDat {
    let mut solution = SolutionDat::default();
    let mut total_cost = 0.0;
    for (flow, &value) in flows.iter().zip(values) {
        total_cost += flow.row.cost * value;
        if value > 0.0 {
            solution.flow.push(FlowRow {
                commodity: flow.row.commodity.clone(),
                source: flow.row.source.clone(),
                destination: flow.row.destination.clone(),
                quantity: value,
            });
        }
    }
    solution.parameters.push(ParameterRow {
        parameter: TOTAL_COST.to_string(),
        value: total_cost,
    });
    solution
}
