//! Schema declarations for the input, modeling and solution datasets.
//!
//! Schemas are ordinary immutable values. The four tables the input and
//! modeling schemas have in common are declared once (see
//! [`commodities_table`], [`nodes_table`], [`arcs_table`], [`cost_table`]) and
//! each schema lists them explicitly next to its own tables.

use std::fmt;

use crate::tables::{Dataset, Row};

/// Rule name of the demand-side supply/demand overlap predicate.
pub const CHECK_DEMAND_AGAINST_SUPPLY: &str = "Check Demand Against Supply";
/// Rule name of the supply-side supply/demand overlap predicate.
pub const CHECK_SUPPLY_AGAINST_DEMAND: &str = "Check Supply Against Demand";

/// Interval a numeric field must lie in. NaN is never contained.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericDomain {
    pub min: f64,
    pub max: f64,
    pub inclusive_min: bool,
    pub inclusive_max: bool,
}

impl NumericDomain {
    pub const fn new(min: f64, max: f64, inclusive_min: bool, inclusive_max: bool) -> Self {
        Self {
            min,
            max,
            inclusive_min,
            inclusive_max,
        }
    }

    /// `(0, ∞)`
    pub const fn positive() -> Self {
        Self::new(0.0, f64::INFINITY, false, false)
    }

    /// `[0, ∞)`
    pub const fn non_negative_finite() -> Self {
        Self::new(0.0, f64::INFINITY, true, false)
    }

    /// `[0, ∞]`
    pub const fn non_negative() -> Self {
        Self::new(0.0, f64::INFINITY, true, true)
    }

    /// `(-∞, ∞)`
    pub const fn finite() -> Self {
        Self::new(f64::NEG_INFINITY, f64::INFINITY, false, false)
    }

    pub fn contains(&self, value: f64) -> bool {
        if value.is_nan() {
            return false;
        }
        let above = if self.inclusive_min {
            value >= self.min
        } else {
            value > self.min
        };
        let below = if self.inclusive_max {
            value <= self.max
        } else {
            value < self.max
        };
        above && below
    }
}

impl fmt::Display for NumericDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let open = if self.inclusive_min { '[' } else { '(' };
        let close = if self.inclusive_max { ']' } else { ')' };
        write!(f, "{}{}, {}{}", open, self.min, self.max, close)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Number,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldSchema {
    pub name: &'static str,
    pub kind: FieldKind,
    pub domain: Option<NumericDomain>,
    /// Value used when a persisted row omits the field
    pub default: Option<f64>,
    pub tooltip: &'static str,
}

impl FieldSchema {
    pub fn text(name: &'static str, tooltip: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Text,
            domain: None,
            default: None,
            tooltip,
        }
    }

    pub fn number(name: &'static str, domain: NumericDomain, tooltip: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Number,
            domain: Some(domain),
            default: Some(0.0),
            tooltip,
        }
    }

    pub fn with_default(mut self, default: f64) -> Self {
        self.default = Some(default);
        self
    }
}

/// `child_fields` of every row must match `parent_fields` of some row in `parent_table`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKey {
    pub parent_table: &'static str,
    pub child_fields: Vec<&'static str>,
    pub parent_fields: Vec<&'static str>,
}

impl ForeignKey {
    pub fn new(parent_table: &'static str, mapping: &[(&'static str, &'static str)]) -> Self {
        Self {
            parent_table,
            child_fields: mapping.iter().map(|(child, _)| *child).collect(),
            parent_fields: mapping.iter().map(|(_, parent)| *parent).collect(),
        }
    }

    /// Human-readable rule name, e.g. `arcs.Source -> nodes.Name`.
    pub fn describe(&self, child_table: &str) -> String {
        let child = self
            .child_fields
            .iter()
            .map(|field| format!("{child_table}.{field}"))
            .collect::<Vec<_>>()
            .join(", ");
        let parent = self
            .parent_fields
            .iter()
            .map(|field| format!("{}.{field}", self.parent_table))
            .collect::<Vec<_>>()
            .join(", ");
        format!("{child} -> {parent}")
    }
}

/// Returns the primary keys of the rows in a table that violate the predicate.
pub type PredicateFn = fn(&dyn Dataset) -> Vec<Vec<String>>;

#[derive(Clone)]
pub struct RowPredicate {
    pub name: &'static str,
    pub check: PredicateFn,
}

impl fmt::Debug for RowPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowPredicate")
            .field("name", &self.name)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct TableSchema {
    pub name: &'static str,
    pub primary_key: Vec<FieldSchema>,
    pub data_fields: Vec<FieldSchema>,
    pub foreign_keys: Vec<ForeignKey>,
    pub row_predicates: Vec<RowPredicate>,
    pub tooltip: &'static str,
}

impl TableSchema {
    fn new(
        name: &'static str,
        primary_key: Vec<FieldSchema>,
        data_fields: Vec<FieldSchema>,
        tooltip: &'static str,
    ) -> Self {
        Self {
            name,
            primary_key,
            data_fields,
            foreign_keys: Vec::new(),
            row_predicates: Vec::new(),
            tooltip,
        }
    }

    fn with_foreign_key(mut self, fk: ForeignKey) -> Self {
        self.foreign_keys.push(fk);
        self
    }

    fn with_predicate(mut self, name: &'static str, check: PredicateFn) -> Self {
        self.row_predicates.push(RowPredicate { name, check });
        self
    }

    pub fn primary_key_names(&self) -> Vec<&'static str> {
        self.primary_key.iter().map(|field| field.name).collect()
    }

    /// Primary key followed by data fields.
    pub fn fields(&self) -> impl Iterator<Item = &FieldSchema> {
        self.primary_key.iter().chain(self.data_fields.iter())
    }

    pub fn field(&self, name: &str) -> Option<&FieldSchema> {
        self.fields().find(|field| field.name == name)
    }
}

#[derive(Debug, Clone)]
pub struct Schema {
    pub name: &'static str,
    pub tables: Vec<TableSchema>,
}

impl Schema {
    pub fn table(&self, name: &str) -> Option<&TableSchema> {
        self.tables.iter().find(|table| table.name == name)
    }

    pub fn table_names(&self) -> Vec<&'static str> {
        self.tables.iter().map(|table| table.name).collect()
    }
}

/// The three schemas, built once and passed around by reference.
#[derive(Debug, Clone)]
pub struct Schemas {
    pub input: Schema,
    pub modeling: Schema,
    pub solution: Schema,
}

impl Schemas {
    pub fn new() -> Self {
        Self {
            input: input_schema(),
            modeling: modeling_schema(),
            solution: solution_schema(),
        }
    }
}

impl Default for Schemas {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Shared tables
// ---------------------------------------------------------------------------

pub fn commodities_table() -> TableSchema {
    TableSchema::new(
        "commodities",
        vec![FieldSchema::text("Name", "The name of the commodity.")],
        vec![FieldSchema::number(
            "Volume",
            NumericDomain::positive(),
            "The volume for one unit of this commodity.",
        )],
        "Define the commodities.",
    )
}

pub fn nodes_table() -> TableSchema {
    TableSchema::new(
        "nodes",
        vec![FieldSchema::text("Name", "The name of the node.")],
        vec![],
        "Define the nodes.",
    )
}

pub fn arcs_table() -> TableSchema {
    TableSchema::new(
        "arcs",
        vec![
            FieldSchema::text("Source", "The source node for the arc."),
            FieldSchema::text("Destination", "The destination node for the arc."),
        ],
        vec![FieldSchema::number(
            "Capacity",
            NumericDomain::non_negative(),
            "The total units, summed across all commodities, that can be shipped between the source destination.",
        )
        .with_default(f64::INFINITY)],
        "Populate the arcs table as a pre-requisite to populating the cost table.",
    )
    .with_foreign_key(ForeignKey::new("nodes", &[("Source", "Name")]))
    .with_foreign_key(ForeignKey::new("nodes", &[("Destination", "Name")]))
}

pub fn cost_table() -> TableSchema {
    TableSchema::new(
        "cost",
        vec![
            FieldSchema::text("Commodity", "The commodity that can be shipped."),
            FieldSchema::text(
                "Source",
                "The node to serve as the source for the shipment.",
            ),
            FieldSchema::text(
                "Destination",
                "The node to serve as the destination for the shipment.",
            ),
        ],
        vec![FieldSchema::number(
            "Cost",
            NumericDomain::non_negative_finite(),
            "The per-unit cost of shipping one unit of the commodity between the source and the destination.",
        )],
        "Populate the costs table to allow a commodity to be shipped between two nodes.",
    )
    .with_foreign_key(ForeignKey::new(
        "arcs",
        &[("Source", "Source"), ("Destination", "Destination")],
    ))
    .with_foreign_key(ForeignKey::new("commodities", &[("Commodity", "Name")]))
}

fn commodity_node_fks(table: TableSchema) -> TableSchema {
    table
        .with_foreign_key(ForeignKey::new("commodities", &[("Commodity", "Name")]))
        .with_foreign_key(ForeignKey::new("nodes", &[("Node", "Name")]))
}

// ---------------------------------------------------------------------------
// Row predicates
// ---------------------------------------------------------------------------

fn commodity_node_pairs(dat: &dyn Dataset, table: &str) -> Vec<Vec<String>> {
    dat.rows(table)
        .unwrap_or_default()
        .into_iter()
        .map(|row| row.key(&["Commodity", "Node"]))
        .collect()
}

fn overlap(dat: &dyn Dataset, table: &str, other: &str) -> Vec<Vec<String>> {
    let others: std::collections::HashSet<Vec<String>> =
        commodity_node_pairs(dat, other).into_iter().collect();
    commodity_node_pairs(dat, table)
        .into_iter()
        .filter(|pair| others.contains(pair))
        .collect()
}

fn demand_against_supply(dat: &dyn Dataset) -> Vec<Vec<String>> {
    overlap(dat, "demand", "supply")
}

fn supply_against_demand(dat: &dyn Dataset) -> Vec<Vec<String>> {
    overlap(dat, "supply", "demand")
}

// ---------------------------------------------------------------------------
// Schemas
// ---------------------------------------------------------------------------

pub fn input_schema() -> Schema {
    let supply = TableSchema::new(
        "supply",
        vec![
            FieldSchema::text("Commodity", "The commodity to be supplied."),
            FieldSchema::text("Node", "The node to serve as a supplier."),
        ],
        vec![FieldSchema::number(
            "Quantity",
            NumericDomain::non_negative_finite(),
            "The number of units of this commodity to be supplied by this node.",
        )],
        "Populate the supply table to allow a commodity to be sourced by a node.",
    );
    let demand = TableSchema::new(
        "demand",
        vec![
            FieldSchema::text("Commodity", "The commodity to be consumed."),
            FieldSchema::text("Node", "The node to serve as a consumer."),
        ],
        vec![FieldSchema::number(
            "Quantity",
            NumericDomain::non_negative_finite(),
            "The number of units of this commodity to be consumed at this node.",
        )],
        "Populate the demand table to allow a commodity to be consumed by a node.",
    );

    Schema {
        name: "input",
        tables: vec![
            commodities_table(),
            nodes_table(),
            arcs_table(),
            cost_table(),
            commodity_node_fks(supply)
                .with_predicate(CHECK_SUPPLY_AGAINST_DEMAND, supply_against_demand),
            commodity_node_fks(demand)
                .with_predicate(CHECK_DEMAND_AGAINST_SUPPLY, demand_against_supply),
        ],
    }
}

pub fn modeling_schema() -> Schema {
    let inflow = TableSchema::new(
        "inflow",
        vec![
            FieldSchema::text(
                "Commodity",
                "The commodity entering or leaving the network.",
            ),
            FieldSchema::text("Node", "The node where it enters or leaves."),
        ],
        vec![FieldSchema::number(
            "Quantity",
            NumericDomain::finite(),
            "Net external quantity: positive for supply, negative for demand.",
        )],
        "Signed supply (positive) and demand (negative) per commodity and node.",
    );

    Schema {
        name: "modeling",
        tables: vec![
            commodities_table(),
            nodes_table(),
            arcs_table(),
            cost_table(),
            commodity_node_fks(inflow),
        ],
    }
}

pub fn solution_schema() -> Schema {
    let flow = TableSchema::new(
        "flow",
        vec![
            FieldSchema::text("Commodity", "The commodity being shipped."),
            FieldSchema::text("Source", "The source for the shipment."),
            FieldSchema::text("Destination", "The destination for the shipment."),
        ],
        vec![FieldSchema::number(
            "Quantity",
            NumericDomain::non_negative_finite(),
            "The number of units being shipped.",
        )],
        "This report defines the specific shipments.",
    );
    let parameters = TableSchema::new(
        "parameters",
        vec![FieldSchema::text("Parameter", "The name of the Key Performance Indicator.")],
        vec![FieldSchema::number(
            "Value",
            NumericDomain::finite(),
            "The value of the Key Performance Indicator.",
        )],
        "This report lists the Key Performance Indicators for the solution.",
    );

    Schema {
        name: "solution",
        tables: vec![flow, parameters],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::{InputDat, QuantityRow};

    #[test]
    fn domains_respect_bound_inclusivity() {
        let volume = NumericDomain::positive();
        assert!(!volume.contains(0.0));
        assert!(volume.contains(0.5));
        assert!(!volume.contains(f64::INFINITY));

        let capacity = NumericDomain::non_negative();
        assert!(capacity.contains(0.0));
        assert!(capacity.contains(f64::INFINITY));
        assert!(!capacity.contains(-1.0));
        assert!(!capacity.contains(f64::NAN));

        assert_eq!(NumericDomain::non_negative_finite().to_string(), "[0, inf)");
    }

    #[test]
    fn modeling_schema_shares_network_tables() {
        let input = input_schema();
        let modeling = modeling_schema();
        for name in ["commodities", "nodes", "arcs", "cost"] {
            let a = input.table(name).unwrap();
            let b = modeling.table(name).unwrap();
            assert_eq!(a.primary_key, b.primary_key);
            assert_eq!(a.data_fields, b.data_fields);
            assert_eq!(a.foreign_keys, b.foreign_keys);
        }
        assert!(modeling.table("supply").is_none());
        assert!(modeling.table("demand").is_none());
        assert_eq!(
            modeling.table("inflow").unwrap().field("Quantity").unwrap().domain,
            Some(NumericDomain::finite())
        );
    }

    #[test]
    fn capacity_defaults_to_unbounded() {
        let arcs = arcs_table();
        assert_eq!(arcs.field("Capacity").unwrap().default, Some(f64::INFINITY));
        assert_eq!(
            arcs.foreign_keys[0].describe("arcs"),
            "arcs.Source -> nodes.Name"
        );
    }

    #[test]
    fn overlap_predicates_report_shared_pairs() {
        let dat = InputDat {
            supply: vec![QuantityRow::new("Pens", "Detroit", 60.0)],
            demand: vec![
                QuantityRow::new("Pens", "Detroit", 5.0),
                QuantityRow::new("Pens", "Boston", 40.0),
            ],
            ..InputDat::default()
        };
        let expected = vec![vec!["Pens".to_string(), "Detroit".to_string()]];
        assert_eq!(demand_against_supply(&dat), expected);
        assert_eq!(supply_against_demand(&dat), expected);
    }
}
