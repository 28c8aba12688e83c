//! # netflow-core: Multi-Commodity Network Data Model
//!
//! Record types, schemas and integrity validation for the multi-commodity
//! minimum-cost flow model.
//!
//! ## Datasets
//!
//! | Dataset | Tables |
//! |---------|--------|
//! | [`InputDat`] | `commodities`, `nodes`, `arcs`, `cost`, `supply`, `demand` |
//! | [`ModelingDat`] | `commodities`, `nodes`, `arcs`, `cost`, `inflow` |
//! | [`SolutionDat`] | `flow`, `parameters` |
//!
//! ## Integrity
//!
//! Every dataset is validated against its [`Schema`] before it is transformed
//! or solved. The checks run in a fixed order (bad dat, duplicate record,
//! foreign key, data type value, data row) and the first failing check aborts
//! with [`NetflowError::Integrity`].
//!
//! ```
//! use netflow_core::{check_integrity, input_schema, InputDat, QuantityRow};
//!
//! let schema = input_schema();
//! let mut dat = InputDat::default();
//! assert!(check_integrity(&schema, &dat).is_ok());
//!
//! // supply row referencing an undeclared commodity and node
//! dat.supply.push(QuantityRow::new("Pens", "Detroit", 10.0));
//! let err = check_integrity(&schema, &dat).unwrap_err();
//! assert_eq!(err.to_string(), "foreign key check: 2 failing row(s)");
//! ```

pub mod diagnostics;
pub mod error;
pub mod schema;
pub mod tables;
pub mod validate;

pub use diagnostics::{DiagnosticIssue, Diagnostics, Severity};
pub use error::{IntegrityCheck, IntegrityFailure, NetflowError, NetflowResult};
pub use schema::{
    input_schema, modeling_schema, solution_schema, FieldKind, FieldSchema, ForeignKey,
    NumericDomain, Schema, Schemas, TableSchema, CHECK_DEMAND_AGAINST_SUPPLY,
    CHECK_SUPPLY_AGAINST_DEMAND,
};
pub use tables::{
    ArcRow, CommodityRow, CostRow, Dataset, FlowRow, InputDat, ModelingDat, NodeRow, ParameterRow,
    QuantityRow, Row, SolutionDat, TOTAL_COST,
};
pub use validate::{
    check_integrity, diagnose, find_data_row_failures, find_data_type_failures, find_duplicates,
    find_foreign_key_failures, good_dat,
};
