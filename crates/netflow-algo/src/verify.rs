//! Checks of a solution against the dataset it was solved from.
//!
//! All comparisons go through [`nearly_same`] at [`TOLERANCE`], so solver
//! round-off never registers as a violation.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use netflow_core::{ModelingDat, SolutionDat, TOTAL_COST};
use serde::Serialize;

/// Relative tolerance used by the checks.
pub const TOLERANCE: f64 = 1e-5;

/// True if `x` and `y` agree to relative tolerance `eps`.
///
/// Values both smaller than `eps` in magnitude count as equal. Otherwise the
/// difference is measured relative to the smaller magnitude, and a pair where
/// only one side is below `eps` never matches.
pub fn nearly_same(x: f64, y: f64, eps: f64) -> bool {
    if x == y || x.abs().max(y.abs()) < eps {
        return true;
    }
    let smaller = x.abs().min(y.abs());
    smaller > eps && (x - y).abs() / smaller < eps
}

/// One failed check.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Violation {
    /// Which law failed and where, e.g. "conservation Pens @ Boston"
    pub subject: String,
    pub expected: f64,
    pub actual: f64,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: expected {}, got {}",
            self.subject, self.expected, self.actual
        )
    }
}

/// (commodity, node) pairs where inbound flow plus inflow differs from
/// outbound flow.
pub fn conservation_violations(dat: &ModelingDat, solution: &SolutionDat) -> Vec<Violation> {
    let mut inbound: BTreeMap<(&str, &str), f64> = BTreeMap::new();
    let mut outbound: BTreeMap<(&str, &str), f64> = BTreeMap::new();
    for row in &solution.flow {
        *inbound
            .entry((row.commodity.as_str(), row.destination.as_str()))
            .or_default() += row.quantity;
        *outbound
            .entry((row.commodity.as_str(), row.source.as_str()))
            .or_default() += row.quantity;
    }
    let mut inflow: BTreeMap<(&str, &str), f64> = BTreeMap::new();
    for row in &dat.inflow {
        *inflow
            .entry((row.commodity.as_str(), row.node.as_str()))
            .or_default() += row.quantity;
    }

    let pairs: BTreeSet<(&str, &str)> = inbound
        .keys()
        .chain(outbound.keys())
        .chain(inflow.keys())
        .copied()
        .collect();

    pairs
        .into_iter()
        .filter_map(|pair| {
            let expected = inbound.get(&pair).copied().unwrap_or(0.0)
                + inflow.get(&pair).copied().unwrap_or(0.0);
            let actual = outbound.get(&pair).copied().unwrap_or(0.0);
            (!nearly_same(expected, actual, TOLERANCE)).then(|| Violation {
                subject: format!("conservation {} @ {}", pair.0, pair.1),
                expected,
                actual,
            })
        })
        .collect()
}

/// Arcs whose volume-weighted load exceeds capacity. Flows on arcs that are
/// not declared count against a capacity of zero.
pub fn capacity_violations(dat: &ModelingDat, solution: &SolutionDat) -> Vec<Violation> {
    let volumes: BTreeMap<&str, f64> = dat
        .commodities
        .iter()
        .map(|row| (row.name.as_str(), row.volume))
        .collect();
    let mut loads: BTreeMap<(&str, &str), f64> = BTreeMap::new();
    for row in &solution.flow {
        let volume = volumes.get(row.commodity.as_str()).copied().unwrap_or(1.0);
        *loads
            .entry((row.source.as_str(), row.destination.as_str()))
            .or_default() += volume * row.quantity;
    }
    let capacities: BTreeMap<(&str, &str), f64> = dat
        .arcs
        .iter()
        .map(|arc| ((arc.source.as_str(), arc.destination.as_str()), arc.capacity))
        .collect();

    loads
        .into_iter()
        .filter_map(|(arc, load)| {
            let capacity = capacities.get(&arc).copied().unwrap_or(0.0);
            (load > capacity && !nearly_same(load, capacity, TOLERANCE)).then(|| Violation {
                subject: format!("capacity {} -> {}", arc.0, arc.1),
                expected: capacity,
                actual: load,
            })
        })
        .collect()
}

/// Mismatch between the reported "Total Cost" and the cost of the reported
/// flows. A flow with no cost row, or a missing total, is a mismatch.
pub fn objective_mismatch(dat: &ModelingDat, solution: &SolutionDat) -> Option<Violation> {
    let costs: BTreeMap<(&str, &str, &str), f64> = dat
        .cost
        .iter()
        .map(|row| {
            (
                (
                    row.commodity.as_str(),
                    row.source.as_str(),
                    row.destination.as_str(),
                ),
                row.cost,
            )
        })
        .collect();

    let mut expected = 0.0;
    for row in &solution.flow {
        let key = (
            row.commodity.as_str(),
            row.source.as_str(),
            row.destination.as_str(),
        );
        match costs.get(&key) {
            Some(cost) => expected += cost * row.quantity,
            None => {
                return Some(Violation {
                    subject: format!(
                        "unpriced flow {} {} -> {}",
                        row.commodity, row.source, row.destination
                    ),
                    expected: 0.0,
                    actual: row.quantity,
                })
            }
        }
    }

    let Some(actual) = solution.total_cost() else {
        return Some(Violation {
            subject: format!("missing {TOTAL_COST}"),
            expected,
            actual: f64::NAN,
        });
    };
    (!nearly_same(expected, actual, TOLERANCE)).then(|| Violation {
        subject: "objective".to_string(),
        expected,
        actual,
    })
}

/// Every violation found by the checks above.
pub fn verify_solution(dat: &ModelingDat, solution: &SolutionDat) -> Vec<Violation> {
    let mut violations = conservation_violations(dat, solution);
    violations.extend(capacity_violations(dat, solution));
    violations.extend(objective_mismatch(dat, solution));
    violations
}

#[cfg(test)]
mod tests {
    use super::*;
    use netflow_core::{ArcRow, CommodityRow, CostRow, FlowRow, NodeRow, ParameterRow, QuantityRow};

    #[test]
    fn nearly_same_is_relative() {
        assert!(nearly_same(5500.0, 5500.01, 1e-5));
        assert!(!nearly_same(5500.0, 5501.0, 1e-5));
        assert!(nearly_same(0.0, 1e-7, 1e-5));
        assert!(!nearly_same(0.0, 1e-3, 1e-5));
        assert!(!nearly_same(1.0, f64::NAN, 1e-5));
        assert!(nearly_same(f64::INFINITY, f64::INFINITY, 1e-5));
    }

    fn line() -> ModelingDat {
        ModelingDat {
            commodities: vec![CommodityRow::new("Pens", 2.0)],
            nodes: vec![NodeRow::new("A"), NodeRow::new("B")],
            arcs: vec![ArcRow::new("A", "B", 10.0)],
            cost: vec![CostRow::new("Pens", "A", "B", 3.0)],
            inflow: vec![
                QuantityRow::new("Pens", "A", 5.0),
                QuantityRow::new("Pens", "B", -5.0),
            ],
        }
    }

    fn shipped(quantity: f64, total: f64) -> SolutionDat {
        SolutionDat {
            flow: vec![FlowRow {
                commodity: "Pens".into(),
                source: "A".into(),
                destination: "B".into(),
                quantity,
            }],
            parameters: vec![ParameterRow {
                parameter: TOTAL_COST.into(),
                value: total,
            }],
        }
    }

    #[test]
    fn exact_solution_verifies() {
        assert!(verify_solution(&line(), &shipped(5.0, 15.0)).is_empty());
    }

    #[test]
    fn short_shipment_breaks_conservation_at_both_ends() {
        let violations = conservation_violations(&line(), &shipped(4.0, 12.0));
        let subjects: Vec<_> = violations.iter().map(|v| v.subject.as_str()).collect();
        assert_eq!(
            subjects,
            vec!["conservation Pens @ A", "conservation Pens @ B"]
        );
    }

    #[test]
    fn load_is_weighted_by_volume() {
        let mut dat = line();
        dat.arcs[0].capacity = 9.0;
        let violations = capacity_violations(&dat, &shipped(5.0, 15.0));
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].actual, 10.0);
        assert_eq!(
            violations[0].to_string(),
            "capacity A -> B: expected 9, got 10"
        );
    }

    #[test]
    fn wrong_total_is_an_objective_mismatch() {
        let mismatch = objective_mismatch(&line(), &shipped(5.0, 14.0)).unwrap();
        assert_eq!(mismatch.expected, 15.0);
        assert!(objective_mismatch(&line(), &SolutionDat::default()).is_some());
    }
}
