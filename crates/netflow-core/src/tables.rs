//! Tabular records and the three dataset kinds.
//!
//! Every table is a plain `Vec` of row structs. Rows serialize with the field
//! names used in persisted datasets (`Name`, `Source`, `Quantity`, ...), so the
//! same types back the JSON and CSV representations.
//!
//! Validation code never matches on concrete row types. It walks tables
//! through the [`Row`] and [`Dataset`] traits, looking fields up by the names
//! the schemas declare.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Key of the single row in the solution `parameters` table.
pub const TOTAL_COST: &str = "Total Cost";

/// Field access by schema name.
pub trait Row {
    /// Value of a text (name) field.
    fn text(&self, field: &str) -> Option<&str>;
    /// Value of a numeric field.
    fn number(&self, field: &str) -> Option<f64>;

    /// Render a field as a key component, whatever its kind.
    fn key_part(&self, field: &str) -> Option<String> {
        self.text(field)
            .map(str::to_string)
            .or_else(|| self.number(field).map(format_number))
    }

    /// Project this row onto the given fields.
    fn key(&self, fields: &[&str]) -> Vec<String> {
        fields
            .iter()
            .map(|field| self.key_part(field).unwrap_or_default())
            .collect()
    }
}

/// A collection of named tables.
pub trait Dataset {
    /// Rows of `table`, or `None` when this dataset has no such table.
    fn rows(&self, table: &str) -> Option<Vec<&dyn Row>>;
}

fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

// ---------------------------------------------------------------------------
// Serde helpers
// ---------------------------------------------------------------------------

struct NameVisitor;

impl<'de> Visitor<'de> for NameVisitor {
    type Value = String;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a string or numeric name")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<String, E> {
        Ok(v)
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<String, E> {
        Ok(format_number(v))
    }
}

/// Names may be stored as strings or as numbers (e.g. integer node ids).
fn de_name<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    deserializer.deserialize_any(NameVisitor)
}

fn unbounded() -> f64 {
    f64::INFINITY
}

/// Missing or null capacity means unbounded.
fn de_capacity<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::INFINITY))
}

fn ser_capacity<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.is_infinite() && value.is_sign_positive() {
        serializer.serialize_none()
    } else {
        serializer.serialize_some(value)
    }
}

// ---------------------------------------------------------------------------
// Rows
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CommodityRow {
    #[serde(deserialize_with = "de_name")]
    pub name: String,
    /// Volume of one unit
    #[serde(default)]
    pub volume: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NodeRow {
    #[serde(deserialize_with = "de_name")]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ArcRow {
    #[serde(deserialize_with = "de_name")]
    pub source: String,
    #[serde(deserialize_with = "de_name")]
    pub destination: String,
    /// Shared across all commodities, in volume units
    #[serde(
        default = "unbounded",
        deserialize_with = "de_capacity",
        serialize_with = "ser_capacity"
    )]
    pub capacity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CostRow {
    #[serde(deserialize_with = "de_name")]
    pub commodity: String,
    #[serde(deserialize_with = "de_name")]
    pub source: String,
    #[serde(deserialize_with = "de_name")]
    pub destination: String,
    #[serde(default)]
    pub cost: f64,
}

/// Supply, demand and inflow all share this shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct QuantityRow {
    #[serde(deserialize_with = "de_name")]
    pub commodity: String,
    #[serde(deserialize_with = "de_name")]
    pub node: String,
    #[serde(default)]
    pub quantity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FlowRow {
    #[serde(deserialize_with = "de_name")]
    pub commodity: String,
    #[serde(deserialize_with = "de_name")]
    pub source: String,
    #[serde(deserialize_with = "de_name")]
    pub destination: String,
    #[serde(default)]
    pub quantity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ParameterRow {
    #[serde(deserialize_with = "de_name")]
    pub parameter: String,
    #[serde(default)]
    pub value: f64,
}

impl CommodityRow {
    pub fn new(name: impl Into<String>, volume: f64) -> Self {
        Self {
            name: name.into(),
            volume,
        }
    }
}

impl NodeRow {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl ArcRow {
    pub fn new(source: impl Into<String>, destination: impl Into<String>, capacity: f64) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            capacity,
        }
    }

    pub fn unbounded(source: impl Into<String>, destination: impl Into<String>) -> Self {
        Self::new(source, destination, f64::INFINITY)
    }
}

impl CostRow {
    pub fn new(
        commodity: impl Into<String>,
        source: impl Into<String>,
        destination: impl Into<String>,
        cost: f64,
    ) -> Self {
        Self {
            commodity: commodity.into(),
            source: source.into(),
            destination: destination.into(),
            cost,
        }
    }
}

impl QuantityRow {
    pub fn new(commodity: impl Into<String>, node: impl Into<String>, quantity: f64) -> Self {
        Self {
            commodity: commodity.into(),
            node: node.into(),
            quantity,
        }
    }
}

impl Row for CommodityRow {
    fn text(&self, field: &str) -> Option<&str> {
        match field {
            "Name" => Some(&self.name),
            _ => None,
        }
    }

    fn number(&self, field: &str) -> Option<f64> {
        match field {
            "Volume" => Some(self.volume),
            _ => None,
        }
    }
}

impl Row for NodeRow {
    fn text(&self, field: &str) -> Option<&str> {
        match field {
            "Name" => Some(&self.name),
            _ => None,
        }
    }

    fn number(&self, _field: &str) -> Option<f64> {
        None
    }
}

impl Row for ArcRow {
    fn text(&self, field: &str) -> Option<&str> {
        match field {
            "Source" => Some(&self.source),
            "Destination" => Some(&self.destination),
            _ => None,
        }
    }

    fn number(&self, field: &str) -> Option<f64> {
        match field {
            "Capacity" => Some(self.capacity),
            _ => None,
        }
    }
}

impl Row for CostRow {
    fn text(&self, field: &str) -> Option<&str> {
        match field {
            "Commodity" => Some(&self.commodity),
            "Source" => Some(&self.source),
            "Destination" => Some(&self.destination),
            _ => None,
        }
    }

    fn number(&self, field: &str) -> Option<f64> {
        match field {
            "Cost" => Some(self.cost),
            _ => None,
        }
    }
}

impl Row for QuantityRow {
    fn text(&self, field: &str) -> Option<&str> {
        match field {
            "Commodity" => Some(&self.commodity),
            "Node" => Some(&self.node),
            _ => None,
        }
    }

    fn number(&self, field: &str) -> Option<f64> {
        match field {
            "Quantity" => Some(self.quantity),
            _ => None,
        }
    }
}

impl Row for FlowRow {
    fn text(&self, field: &str) -> Option<&str> {
        match field {
            "Commodity" => Some(&self.commodity),
            "Source" => Some(&self.source),
            "Destination" => Some(&self.destination),
            _ => None,
        }
    }

    fn number(&self, field: &str) -> Option<f64> {
        match field {
            "Quantity" => Some(self.quantity),
            _ => None,
        }
    }
}

impl Row for ParameterRow {
    fn text(&self, field: &str) -> Option<&str> {
        match field {
            "Parameter" => Some(&self.parameter),
            _ => None,
        }
    }

    fn number(&self, field: &str) -> Option<f64> {
        match field {
            "Value" => Some(self.value),
            _ => None,
        }
    }
}

fn as_rows<R: Row>(rows: &[R]) -> Vec<&dyn Row> {
    rows.iter().map(|row| row as &dyn Row).collect()
}

// ---------------------------------------------------------------------------
// Datasets
// ---------------------------------------------------------------------------

/// Dataset for the input schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputDat {
    #[serde(default)]
    pub commodities: Vec<CommodityRow>,
    #[serde(default)]
    pub nodes: Vec<NodeRow>,
    #[serde(default)]
    pub arcs: Vec<ArcRow>,
    #[serde(default)]
    pub cost: Vec<CostRow>,
    #[serde(default)]
    pub supply: Vec<QuantityRow>,
    #[serde(default)]
    pub demand: Vec<QuantityRow>,
}

/// Dataset for the modeling schema: supply and demand merged into signed inflow.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelingDat {
    #[serde(default)]
    pub commodities: Vec<CommodityRow>,
    #[serde(default)]
    pub nodes: Vec<NodeRow>,
    #[serde(default)]
    pub arcs: Vec<ArcRow>,
    #[serde(default)]
    pub cost: Vec<CostRow>,
    #[serde(default)]
    pub inflow: Vec<QuantityRow>,
}

/// Dataset for the solution schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SolutionDat {
    #[serde(default)]
    pub flow: Vec<FlowRow>,
    #[serde(default)]
    pub parameters: Vec<ParameterRow>,
}

impl InputDat {
    /// Locate a cost row by its key.
    pub fn cost_mut(
        &mut self,
        commodity: &str,
        source: &str,
        destination: &str,
    ) -> Option<&mut CostRow> {
        self.cost.iter_mut().find(|row| {
            row.commodity == commodity && row.source == source && row.destination == destination
        })
    }
}

impl SolutionDat {
    /// Value of the "Total Cost" parameter.
    pub fn total_cost(&self) -> Option<f64> {
        self.parameters
            .iter()
            .find(|row| row.parameter == TOTAL_COST)
            .map(|row| row.value)
    }

    /// Flow quantities keyed by (Commodity, Source, Destination).
    pub fn flow_map(&self) -> BTreeMap<(String, String, String), f64> {
        self.flow
            .iter()
            .map(|row| {
                (
                    (
                        row.commodity.clone(),
                        row.source.clone(),
                        row.destination.clone(),
                    ),
                    row.quantity,
                )
            })
            .collect()
    }
}

impl Dataset for InputDat {
    fn rows(&self, table: &str) -> Option<Vec<&dyn Row>> {
        match table {
            "commodities" => Some(as_rows(&self.commodities)),
            "nodes" => Some(as_rows(&self.nodes)),
            "arcs" => Some(as_rows(&self.arcs)),
            "cost" => Some(as_rows(&self.cost)),
            "supply" => Some(as_rows(&self.supply)),
            "demand" => Some(as_rows(&self.demand)),
            _ => None,
        }
    }
}

impl Dataset for ModelingDat {
    fn rows(&self, table: &str) -> Option<Vec<&dyn Row>> {
        match table {
            "commodities" => Some(as_rows(&self.commodities)),
            "nodes" => Some(as_rows(&self.nodes)),
            "arcs" => Some(as_rows(&self.arcs)),
            "cost" => Some(as_rows(&self.cost)),
            "inflow" => Some(as_rows(&self.inflow)),
            _ => None,
        }
    }
}

impl Dataset for SolutionDat {
    fn rows(&self, table: &str) -> Option<Vec<&dyn Row>> {
        match table {
            "flow" => Some(as_rows(&self.flow)),
            "parameters" => Some(as_rows(&self.parameters)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_names_are_read_as_text() {
        let json = r#"{"Commodity": 2, "Source": 3, "Destination": "2", "Cost": 1.5}"#;
        let row: CostRow = serde_json::from_str(json).unwrap();
        assert_eq!(row, CostRow::new("2", "3", "2", 1.5));
    }

    #[test]
    fn missing_or_null_capacity_is_unbounded() {
        let missing: ArcRow =
            serde_json::from_str(r#"{"Source": "a", "Destination": "b"}"#).unwrap();
        let null: ArcRow =
            serde_json::from_str(r#"{"Source": "a", "Destination": "b", "Capacity": null}"#)
                .unwrap();
        assert!(missing.capacity.is_infinite());
        assert!(null.capacity.is_infinite());

        let json = serde_json::to_string(&ArcRow::unbounded("a", "b")).unwrap();
        assert!(json.contains("\"Capacity\":null"));
    }

    #[test]
    fn omitted_numbers_take_the_zero_default() {
        let commodity: CommodityRow = serde_json::from_str(r#"{"Name": "Pens"}"#).unwrap();
        let supply: QuantityRow =
            serde_json::from_str(r#"{"Commodity": "Pens", "Node": "Detroit"}"#).unwrap();
        assert_eq!(commodity, CommodityRow::new("Pens", 0.0));
        assert_eq!(supply, QuantityRow::new("Pens", "Detroit", 0.0));
    }

    #[test]
    fn row_keys_use_schema_field_names() {
        let row = CostRow::new("Pens", "Detroit", "Boston", 20.0);
        assert_eq!(
            row.key(&["Commodity", "Source", "Destination"]),
            vec!["Pens", "Detroit", "Boston"]
        );
        assert_eq!(row.number("Cost"), Some(20.0));
        assert_eq!(row.key_part("Cost").as_deref(), Some("20"));
        assert_eq!(row.text("Node"), None);
    }

    #[test]
    fn datasets_expose_only_their_own_tables() {
        let input = InputDat::default();
        let modeling = ModelingDat::default();
        assert!(input.rows("supply").is_some());
        assert!(input.rows("inflow").is_none());
        assert!(modeling.rows("inflow").is_some());
        assert!(modeling.rows("demand").is_none());
    }

    #[test]
    fn total_cost_reads_parameter_row() {
        let sln = SolutionDat {
            flow: vec![],
            parameters: vec![ParameterRow {
                parameter: TOTAL_COST.to_string(),
                value: 42.0,
            }],
        };
        assert_eq!(sln.total_cost(), Some(42.0));
        assert_eq!(SolutionDat::default().total_cost(), None);
    }
}
