//! Diagnostics collected while validating a dataset.
//!
//! A [`Diagnostics`] report lists every issue found by every integrity check,
//! unlike [`crate::validate::check_integrity`] which stops at the first
//! failing check. The CLI `validate` command prints or serializes it.
//!
//! # Example
//!
//! ```
//! use netflow_core::diagnostics::{Diagnostics, Severity};
//!
//! let mut diag = Diagnostics::new();
//! diag.add_error_with_entity(
//!     "foreign key check",
//!     "cost.Commodity -> commodities.Name",
//!     "cost (Ink, Detroit, Boston)",
//! );
//! diag.add_warning("structure", "table 'supply' is empty");
//!
//! assert_eq!(diag.error_count(), 1);
//! assert_eq!(diag.warning_count(), 1);
//! assert!(!diag.is_clean());
//! ```

use serde::Serialize;

use crate::error::IntegrityFailure;

/// Severity level for diagnostic issues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Unusual but the dataset is still usable (e.g. an empty table)
    Warning,
    /// The dataset fails a precondition
    Error,
}

/// A single diagnostic issue
#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticIssue {
    pub severity: Severity,
    /// Check label or other grouping (e.g. "data row check", "structure")
    pub category: String,
    pub message: String,
    /// Offending row, e.g. "demand (Pens, Boston)"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity: Option<String>,
}

impl DiagnosticIssue {
    pub fn new(
        severity: Severity,
        category: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            category: category.into(),
            message: message.into(),
            entity: None,
        }
    }

    pub fn with_entity(mut self, entity: impl Into<String>) -> Self {
        self.entity = Some(entity.into());
        self
    }
}

impl std::fmt::Display for DiagnosticIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let severity = match self.severity {
            Severity::Warning => "warning",
            Severity::Error => "error",
        };

        write!(f, "[{}:{}] {}", severity, self.category, self.message)?;

        if let Some(entity) = &self.entity {
            write!(f, " ({})", entity)?;
        }

        Ok(())
    }
}

/// Collection of diagnostic issues for one dataset
#[derive(Debug, Clone, Default, Serialize)]
pub struct Diagnostics {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<DiagnosticIssue>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_warning(&mut self, category: &str, message: &str) {
        self.issues
            .push(DiagnosticIssue::new(Severity::Warning, category, message));
    }

    pub fn add_error_with_entity(&mut self, category: &str, message: &str, entity: &str) {
        self.issues
            .push(DiagnosticIssue::new(Severity::Error, category, message).with_entity(entity));
    }

    /// Record an integrity failure under the label of the check that found it.
    pub fn add_failure(&mut self, category: &str, failure: &IntegrityFailure) {
        let entity = format!("{} ({})", failure.table, failure.key.join(", "));
        self.add_error_with_entity(category, &failure.rule, &entity);
    }

    pub fn warning_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Warning)
            .count()
    }

    pub fn error_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Error)
            .count()
    }

    /// True when no errors were recorded. Warnings do not count.
    pub fn is_clean(&self) -> bool {
        self.error_count() == 0
    }

    /// Issues filed under one category.
    pub fn by_category<'a>(
        &'a self,
        category: &'a str,
    ) -> impl Iterator<Item = &'a DiagnosticIssue> {
        self.issues.iter().filter(move |i| i.category == category)
    }

    pub fn summary(&self) -> String {
        format!(
            "{} error(s), {} warning(s)",
            self.error_count(),
            self.warning_count()
        )
    }
}
