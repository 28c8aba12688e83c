//! Integrity checks for datasets.
//!
//! Each `find_*` function returns the rows violating one class of rule, empty
//! on success. [`check_integrity`] runs them in a fixed order and turns the
//! first non-empty result into [`NetflowError::Integrity`]; it is the
//! precondition every transform and solve entry point enforces.

use std::collections::{HashMap, HashSet};

use tracing::warn;

use crate::diagnostics::Diagnostics;
use crate::error::{IntegrityCheck, IntegrityFailure, NetflowError, NetflowResult};
use crate::schema::{FieldKind, Schema};
use crate::tables::{Dataset, Row};

/// Structural sanity: every declared table exists and every row exposes
/// its declared fields, with non-empty key text.
pub fn good_dat(schema: &Schema, dat: &dyn Dataset) -> Vec<IntegrityFailure> {
    let mut failures = Vec::new();
    for table in &schema.tables {
        let Some(rows) = dat.rows(table.name) else {
            failures.push(IntegrityFailure::new(table.name, "missing table", vec![]));
            continue;
        };
        let pk = table.primary_key_names();
        for row in rows {
            for field in table.fields() {
                let ok = match field.kind {
                    FieldKind::Text => row.text(field.name).is_some_and(|v| !v.is_empty()),
                    FieldKind::Number => row.number(field.name).is_some(),
                };
                if !ok {
                    failures.push(IntegrityFailure::new(
                        table.name,
                        format!("missing value for {}", field.name),
                        row.key(&pk),
                    ));
                }
            }
        }
    }
    failures
}

/// Rows sharing a primary key. Each duplicated key is reported once.
pub fn find_duplicates(schema: &Schema, dat: &dyn Dataset) -> Vec<IntegrityFailure> {
    let mut failures = Vec::new();
    for table in &schema.tables {
        let pk = table.primary_key_names();
        let mut counts: HashMap<Vec<String>, usize> = HashMap::new();
        let mut order = Vec::new();
        for row in dat.rows(table.name).unwrap_or_default() {
            let key = row.key(&pk);
            let count = counts.entry(key.clone()).or_insert(0);
            *count += 1;
            if *count == 2 {
                order.push(key);
            }
        }
        failures.extend(
            order
                .into_iter()
                .map(|key| IntegrityFailure::new(table.name, "duplicate primary key", key)),
        );
    }
    failures
}

/// Rows whose foreign key fields match no row of the parent table.
pub fn find_foreign_key_failures(schema: &Schema, dat: &dyn Dataset) -> Vec<IntegrityFailure> {
    let mut failures = Vec::new();
    for table in &schema.tables {
        let pk = table.primary_key_names();
        let rows = dat.rows(table.name).unwrap_or_default();
        for fk in &table.foreign_keys {
            let parents: HashSet<Vec<String>> = dat
                .rows(fk.parent_table)
                .unwrap_or_default()
                .into_iter()
                .map(|row| row.key(&fk.parent_fields))
                .collect();
            let rule = fk.describe(table.name);
            for row in &rows {
                if !parents.contains(&row.key(&fk.child_fields)) {
                    failures.push(IntegrityFailure::new(table.name, rule.clone(), row.key(&pk)));
                }
            }
        }
    }
    failures
}

/// Numeric values outside their field's declared domain.
pub fn find_data_type_failures(schema: &Schema, dat: &dyn Dataset) -> Vec<IntegrityFailure> {
    let mut failures = Vec::new();
    for table in &schema.tables {
        let pk = table.primary_key_names();
        let rows = dat.rows(table.name).unwrap_or_default();
        for field in table.fields() {
            let Some(domain) = field.domain else {
                continue;
            };
            for row in &rows {
                if let Some(value) = row.number(field.name) {
                    if !domain.contains(value) {
                        failures.push(IntegrityFailure::new(
                            table.name,
                            format!("{} {} not in {}", field.name, value, domain),
                            row.key(&pk),
                        ));
                    }
                }
            }
        }
    }
    failures
}

/// Rows failing a cross-table row predicate. The rule is the predicate name.
pub fn find_data_row_failures(schema: &Schema, dat: &dyn Dataset) -> Vec<IntegrityFailure> {
    let mut failures = Vec::new();
    for table in &schema.tables {
        for predicate in &table.row_predicates {
            failures.extend(
                (predicate.check)(dat)
                    .into_iter()
                    .map(|key| IntegrityFailure::new(table.name, predicate.name, key)),
            );
        }
    }
    failures
}

/// Run one check.
pub fn run_check(
    check: IntegrityCheck,
    schema: &Schema,
    dat: &dyn Dataset,
) -> Vec<IntegrityFailure> {
    match check {
        IntegrityCheck::BadDat => good_dat(schema, dat),
        IntegrityCheck::DuplicateRecord => find_duplicates(schema, dat),
        IntegrityCheck::ForeignKey => find_foreign_key_failures(schema, dat),
        IntegrityCheck::DataTypeValue => find_data_type_failures(schema, dat),
        IntegrityCheck::DataRow => find_data_row_failures(schema, dat),
    }
}

/// Run every check in order, failing on the first one that reports rows.
pub fn check_integrity(schema: &Schema, dat: &dyn Dataset) -> NetflowResult<()> {
    for check in IntegrityCheck::ALL {
        let failures = run_check(check, schema, dat);
        if !failures.is_empty() {
            warn!(
                schema = schema.name,
                check = check.as_str(),
                failures = failures.len(),
                "dataset failed integrity check"
            );
            return Err(NetflowError::Integrity { check, failures });
        }
    }
    Ok(())
}

/// Full report: every failure of every check, plus warnings for empty tables.
pub fn diagnose(schema: &Schema, dat: &dyn Dataset) -> Diagnostics {
    let mut diag = Diagnostics::new();
    for table in &schema.tables {
        if dat.rows(table.name).is_some_and(|rows| rows.is_empty()) {
            diag.add_warning("structure", &format!("table '{}' is empty", table.name));
        }
    }
    for check in IntegrityCheck::ALL {
        for failure in run_check(check, schema, dat) {
            diag.add_failure(check.as_str(), &failure);
        }
    }
    diag
}
