use std::fmt;
use std::str::FromStr;

use netflow_core::NetflowError;
use serde::{Deserialize, Serialize};

/// LP backend used to solve the flow model.
///
/// `microlp` is a pure-Rust simplex and is always compiled in. Interior-point
/// backends return flows with small numerical noise, which shows up as tiny
/// positive shipments in the reported solution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LpSolverKind {
    #[default]
    Microlp,
    #[cfg(feature = "solver-clarabel")]
    Clarabel,
    #[cfg(feature = "solver-highs")]
    Highs,
}

impl LpSolverKind {
    pub fn available() -> &'static [&'static str] {
        AVAILABLE_LP_SOLVERS
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LpSolverKind::Microlp => "microlp",
            #[cfg(feature = "solver-clarabel")]
            LpSolverKind::Clarabel => "clarabel",
            #[cfg(feature = "solver-highs")]
            LpSolverKind::Highs => "highs",
        }
    }
}

const AVAILABLE_LP_SOLVERS: &[&str] = &[
    "microlp",
    #[cfg(feature = "solver-clarabel")]
    "clarabel",
    #[cfg(feature = "solver-highs")]
    "highs",
];

fn unknown_solver_error(label: &str) -> NetflowError {
    NetflowError::Config(format!(
        "unknown lp solver '{}'; supported values: {}",
        label,
        LpSolverKind::available().join(", ")
    ))
}

impl FromStr for LpSolverKind {
    type Err = NetflowError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "microlp" | "simplex" => Ok(LpSolverKind::Microlp),
            "clarabel" => {
                #[cfg(feature = "solver-clarabel")]
                {
                    Ok(LpSolverKind::Clarabel)
                }
                #[cfg(not(feature = "solver-clarabel"))]
                {
                    Err(unknown_solver_error(&normalized))
                }
            }
            "highs" => {
                #[cfg(feature = "solver-highs")]
                {
                    Ok(LpSolverKind::Highs)
                }
                #[cfg(not(feature = "solver-highs"))]
                {
                    Err(unknown_solver_error(&normalized))
                }
            }
            other => Err(unknown_solver_error(other)),
        }
    }
}

impl fmt::Display for LpSolverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration for the flow solver.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetflowSolverConfig {
    /// LP backend
    pub lp_solver: LpSolverKind,
    /// Log the LP dimensions at `info` instead of `debug`
    pub verbose: bool,
}

impl NetflowSolverConfig {
    pub fn with_solver(lp_solver: LpSolverKind) -> Self {
        Self {
            lp_solver,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_solver_names_case_insensitively() {
        let parse = |name: &str| name.parse::<LpSolverKind>().unwrap();
        assert_eq!(parse("MicroLP"), LpSolverKind::Microlp);
        assert_eq!(parse(" simplex "), LpSolverKind::Microlp);
    }

    #[test]
    fn unknown_solver_lists_supported_values() {
        let err = "gurobi".parse::<LpSolverKind>().unwrap_err();
        let message = err.to_string();
        assert!(message.contains("unknown lp solver 'gurobi'"));
        assert!(message.contains("microlp"));
    }

    #[test]
    fn default_config_uses_microlp() {
        let config = NetflowSolverConfig::default();
        assert_eq!(config.lp_solver, LpSolverKind::Microlp);
        assert_eq!(config.lp_solver.to_string(), "microlp");
        assert!(!config.verbose);
    }
}
