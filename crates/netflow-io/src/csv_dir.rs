//! CSV directory datasets: `<dir>/<table>.csv`, one file per table with a
//! header row of field names.
//!
//! Cells are read as text and typed by the table schema: name fields keep
//! their exact spelling (`007` stays `007`), numeric fields are parsed. An
//! empty numeric cell takes the field default, so a blank `Capacity` (or
//! `inf`) is unbounded. A missing file reads as an empty table; empty tables
//! are written with just the header.

use std::fmt;
use std::fs;
use std::path::Path;

use netflow_core::{
    input_schema, modeling_schema, solution_schema, FieldKind, InputDat, ModelingDat, NetflowError,
    NetflowResult, Schema, SolutionDat, TableSchema,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Number, Value};
use tracing::debug;

fn parse_error(path: &Path, err: csv::Error) -> NetflowError {
    NetflowError::Parse(format!("{}: {}", path.display(), err))
}

fn line_error(path: &Path, line: usize, detail: impl fmt::Display) -> NetflowError {
    NetflowError::Parse(format!("{}: line {}: {}", path.display(), line, detail))
}

fn schema_table<'a>(schema: &'a Schema, table: &str) -> NetflowResult<&'a TableSchema> {
    schema.table(table).ok_or_else(|| {
        NetflowError::Other(format!("schema '{}' has no table '{}'", schema.name, table))
    })
}

/// Typed value of one numeric cell; `None` leaves the field to its default.
fn number_cell(value: &str, field_default: Option<f64>) -> Result<Option<Value>, String> {
    if value.is_empty() {
        return Ok(None);
    }
    let Ok(number) = value.parse::<f64>() else {
        return Err(format!("'{value}' is not a number"));
    };
    match Number::from_f64(number) {
        Some(number) => Ok(Some(Value::Number(number))),
        None if field_default == Some(number) => Ok(None),
        None => Err(format!("'{value}' is not a finite number")),
    }
}

/// Read one table of `schema`, typing cells by its fields. A missing file is
/// an empty table.
pub fn read_table<T: DeserializeOwned>(
    dir: &Path,
    schema: &Schema,
    table: &str,
) -> NetflowResult<Vec<T>> {
    let table = schema_table(schema, table)?;
    let path = dir.join(format!("{}.csv", table.name));
    if !path.exists() {
        debug!(path = %path.display(), "table file missing; reading as empty");
        return Ok(Vec::new());
    }
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(&path)
        .map_err(|err| parse_error(&path, err))?;
    let columns: Vec<_> = reader
        .headers()
        .map_err(|err| parse_error(&path, err))?
        .iter()
        .map(|name| table.field(name))
        .collect();

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record.map_err(|err| parse_error(&path, err))?;
        let line = index + 2;
        let mut object = Map::new();
        for (field, cell) in columns.iter().zip(record.iter()) {
            // columns the schema does not declare are ignored
            let Some(field) = field else { continue };
            let value = match field.kind {
                FieldKind::Text => Some(Value::String(cell.to_string())),
                FieldKind::Number => number_cell(cell, field.default)
                    .map_err(|msg| line_error(&path, line, format!("{}: {}", field.name, msg)))?,
            };
            if let Some(value) = value {
                object.insert(field.name.to_string(), value);
            }
        }
        let row = serde_json::from_value(Value::Object(object))
            .map_err(|err| line_error(&path, line, err))?;
        rows.push(row);
    }
    Ok(rows)
}

/// Write one table, header first, using the field order of `schema`.
pub fn write_table<T: Serialize>(
    dir: &Path,
    schema: &Schema,
    table: &str,
    rows: &[T],
) -> NetflowResult<()> {
    let header: Vec<&str> = schema_table(schema, table)?
        .fields()
        .map(|field| field.name)
        .collect();

    let path = dir.join(format!("{table}.csv"));
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(&path)
        .map_err(|err| parse_error(&path, err))?;
    writer
        .write_record(&header)
        .map_err(|err| parse_error(&path, err))?;
    for row in rows {
        writer.serialize(row).map_err(|err| parse_error(&path, err))?;
    }
    writer.flush()?;
    Ok(())
}

pub fn read_input(dir: &Path) -> NetflowResult<InputDat> {
    let schema = input_schema();
    Ok(InputDat {
        commodities: read_table(dir, &schema, "commodities")?,
        nodes: read_table(dir, &schema, "nodes")?,
        arcs: read_table(dir, &schema, "arcs")?,
        cost: read_table(dir, &schema, "cost")?,
        supply: read_table(dir, &schema, "supply")?,
        demand: read_table(dir, &schema, "demand")?,
    })
}

pub fn read_modeling(dir: &Path) -> NetflowResult<ModelingDat> {
    let schema = modeling_schema();
    Ok(ModelingDat {
        commodities: read_table(dir, &schema, "commodities")?,
        nodes: read_table(dir, &schema, "nodes")?,
        arcs: read_table(dir, &schema, "arcs")?,
        cost: read_table(dir, &schema, "cost")?,
        inflow: read_table(dir, &schema, "inflow")?,
    })
}

pub fn read_solution(dir: &Path) -> NetflowResult<SolutionDat> {
    let schema = solution_schema();
    Ok(SolutionDat {
        flow: read_table(dir, &schema, "flow")?,
        parameters: read_table(dir, &schema, "parameters")?,
    })
}

pub fn write_input(dir: &Path, dat: &InputDat) -> NetflowResult<()> {
    let schema = input_schema();
    fs::create_dir_all(dir)?;
    write_table(dir, &schema, "commodities", &dat.commodities)?;
    write_table(dir, &schema, "nodes", &dat.nodes)?;
    write_table(dir, &schema, "arcs", &dat.arcs)?;
    write_table(dir, &schema, "cost", &dat.cost)?;
    write_table(dir, &schema, "supply", &dat.supply)?;
    write_table(dir, &schema, "demand", &dat.demand)?;
    Ok(())
}

pub fn write_modeling(dir: &Path, dat: &ModelingDat) -> NetflowResult<()> {
    let schema = modeling_schema();
    fs::create_dir_all(dir)?;
    write_table(dir, &schema, "commodities", &dat.commodities)?;
    write_table(dir, &schema, "nodes", &dat.nodes)?;
    write_table(dir, &schema, "arcs", &dat.arcs)?;
    write_table(dir, &schema, "cost", &dat.cost)?;
    write_table(dir, &schema, "inflow", &dat.inflow)?;
    Ok(())
}

pub fn write_solution(dir: &Path, dat: &SolutionDat) -> NetflowResult<()> {
    let schema = solution_schema();
    fs::create_dir_all(dir)?;
    write_table(dir, &schema, "flow", &dat.flow)?;
    write_table(dir, &schema, "parameters", &dat.parameters)?;
    debug!(dir = %dir.display(), flows = dat.flow.len(), "wrote CSV solution");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use netflow_core::{check_integrity, ArcRow, NodeRow, ParameterRow};

    #[test]
    fn blank_or_inf_capacity_is_unbounded() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("arcs.csv"),
            "Source,Destination,Capacity\nA,B,\nB,C,inf\nC,A,12.5\n",
        )
        .unwrap();
        let arcs: Vec<ArcRow> = read_table(dir.path(), &input_schema(), "arcs").unwrap();
        assert_eq!(
            arcs,
            vec![
                ArcRow::unbounded("A", "B"),
                ArcRow::unbounded("B", "C"),
                ArcRow::new("C", "A", 12.5),
            ]
        );
    }

    #[test]
    fn missing_file_is_empty_table() {
        let dir = tempfile::tempdir().unwrap();
        let nodes: Vec<NodeRow> = read_table(dir.path(), &input_schema(), "nodes").unwrap();
        assert!(nodes.is_empty());
    }

    #[test]
    fn empty_table_keeps_header() {
        let dir = tempfile::tempdir().unwrap();
        let solution = SolutionDat {
            flow: vec![],
            parameters: vec![ParameterRow {
                parameter: "Total Cost".into(),
                value: 0.0,
            }],
        };
        write_solution(dir.path(), &solution).unwrap();
        let flow = fs::read_to_string(dir.path().join("flow.csv")).unwrap();
        assert_eq!(flow.trim(), "Commodity,Source,Destination,Quantity");
        assert_eq!(read_solution(dir.path()).unwrap(), solution);
    }

    #[test]
    fn malformed_number_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let commodities = dir.path().join("commodities.csv");
        fs::write(commodities, "Name,Volume\nPens,lots\n").unwrap();
        let err = read_input(dir.path()).unwrap_err().to_string();
        assert!(err.contains("commodities.csv"));
        assert!(err.contains("line 2: Volume: 'lots' is not a number"));
    }

    #[test]
    fn numeric_looking_names_keep_their_spelling() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("nodes.csv"),
            "Name\n007\n7\n1.50\n12345678901234567890123\n",
        )
        .unwrap();
        let dat = read_input(dir.path()).unwrap();
        let names: Vec<&str> = dat.nodes.iter().map(|node| node.name.as_str()).collect();
        assert_eq!(names, vec!["007", "7", "1.50", "12345678901234567890123"]);
        assert!(check_integrity(&input_schema(), &dat).is_ok());

        let copy = dir.path().join("copy");
        write_input(&copy, &dat).unwrap();
        assert_eq!(read_input(&copy).unwrap(), dat);
    }

    #[test]
    fn blank_numbers_take_field_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("supply.csv"),
            "Commodity,Node,Quantity,Note\nPens,Detroit,,extra\n",
        )
        .unwrap();
        let dat = read_input(dir.path()).unwrap();
        assert_eq!(dat.supply[0].quantity, 0.0);
        assert_eq!(dat.supply[0].node, "Detroit");
    }

    #[test]
    fn infinite_value_outside_capacity_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("cost.csv"),
            "Commodity,Source,Destination,Cost\nP,A,B,inf\n",
        )
        .unwrap();
        let err = read_input(dir.path()).unwrap_err().to_string();
        assert!(err.contains("Cost: 'inf' is not a finite number"));
    }
}
