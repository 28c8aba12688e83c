//! Unified error types for the netflow workspace
//!
//! [`NetflowError`] covers every failure a caller has to handle: file access,
//! parsing, data-integrity preconditions, solver faults and configuration.
//! A solver that terminates without an optimal plan is *not* an error; see
//! `netflow_algo::SolveOutcome`.
//!
//! # Example
//!
//! ```ignore
//! use netflow_core::{NetflowError, NetflowResult};
//!
//! fn run(path: &str) -> NetflowResult<()> {
//!     let dat = read_input(path)?;
//!     solve(&dat)?;
//!     Ok(())
//! }
//! ```

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// The ordered precondition checks run before a dataset is transformed or solved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum IntegrityCheck {
    /// Dataset does not have the shape its schema declares
    BadDat,
    /// Two rows share a primary key
    DuplicateRecord,
    /// A row references a missing parent row
    ForeignKey,
    /// A numeric field lies outside its declared domain
    DataTypeValue,
    /// A cross-table row predicate failed
    DataRow,
}

impl IntegrityCheck {
    /// All checks, in the order they are run.
    pub const ALL: [IntegrityCheck; 5] = [
        IntegrityCheck::BadDat,
        IntegrityCheck::DuplicateRecord,
        IntegrityCheck::ForeignKey,
        IntegrityCheck::DataTypeValue,
        IntegrityCheck::DataRow,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IntegrityCheck::BadDat => "bad dat check",
            IntegrityCheck::DuplicateRecord => "duplicate record check",
            IntegrityCheck::ForeignKey => "foreign key check",
            IntegrityCheck::DataTypeValue => "data type value check",
            IntegrityCheck::DataRow => "data row check",
        }
    }
}

impl fmt::Display for IntegrityCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row that violates one integrity rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IntegrityFailure {
    /// Table holding the offending row
    pub table: String,
    /// Rule that failed (predicate name, foreign key description, field name, ...)
    pub rule: String,
    /// Primary key of the offending row
    pub key: Vec<String>,
}

impl IntegrityFailure {
    pub fn new(table: impl Into<String>, rule: impl Into<String>, key: Vec<String>) -> Self {
        Self {
            table: table.into(),
            rule: rule.into(),
            key,
        }
    }
}

impl fmt::Display for IntegrityFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} ({})", self.table, self.rule, self.key.join(", "))
    }
}

/// Unified error type for all netflow operations.
#[derive(Error, Debug)]
pub enum NetflowError {
    /// I/O errors (file access); callers add the path as context
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Parsing/deserialization errors
    #[error("Parse error: {0}")]
    Parse(String),

    /// Data-integrity precondition violated
    #[error("{check}: {count} failing row(s)", count = .failures.len())]
    Integrity {
        check: IntegrityCheck,
        failures: Vec<IntegrityFailure>,
    },

    /// Solver faults that are not a termination status (model construction, backend missing)
    #[error("Solver error: {0}")]
    Solver(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic errors (for wrapping external errors)
    #[error("{0}")]
    Other(String),
}

impl NetflowError {
    /// The failed precondition, if this is an integrity error.
    pub fn integrity_check(&self) -> Option<IntegrityCheck> {
        match self {
            NetflowError::Integrity { check, .. } => Some(*check),
            _ => None,
        }
    }
}

/// Convenience type alias for Results using NetflowError.
pub type NetflowResult<T> = Result<T, NetflowError>;

impl From<String> for NetflowError {
    fn from(s: String) -> Self {
        NetflowError::Other(s)
    }
}

impl From<&str> for NetflowError {
    fn from(s: &str) -> Self {
        NetflowError::Other(s.to_string())
    }
}

impl From<serde_json::Error> for NetflowError {
    fn from(err: serde_json::Error) -> Self {
        NetflowError::Parse(err.to_string())
    }
}
