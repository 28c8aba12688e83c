use std::path::PathBuf;

use netflow_core::{check_integrity, input_schema, InputDat, ModelingDat};
use netflow_io::{json, read_input, read_modeling, write_input, write_modeling, Format};
use tempfile::tempdir;

fn test_data(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .and_then(|p| p.parent())
        .expect("workspace root")
        .join("test_data")
        .join(name)
}

#[test]
fn json_and_csv_copies_of_sample_agree() {
    let from_json = read_input(&test_data("sample_data.json"), Format::Json).unwrap();
    let from_csv = read_input(&test_data("sample_data_csv"), Format::Csv).unwrap();
    assert_eq!(from_json, from_csv);
    assert!(check_integrity(&input_schema(), &from_csv).is_ok());
}

#[test]
fn sloan_numeric_names_read_as_text() {
    let dat: InputDat = json::read(&test_data("sloan_data_set.json")).unwrap();
    assert_eq!(dat.commodities[0].name, "1");
    assert!(dat.nodes.iter().any(|n| n.name == "6"));
}

#[test]
fn csv_directory_preserves_input() {
    let original = read_input(&test_data("sample_data.json"), Format::Json).unwrap();
    let dir = tempdir().unwrap();
    let out = dir.path().join("copy");
    write_input(&out, Format::Csv, &original).unwrap();
    assert!(out.join("demand.csv").exists());
    assert_eq!(read_input(&out, Format::Csv).unwrap(), original);
}

#[test]
fn modeling_json_keeps_negative_inflow_and_unbounded_arcs() {
    let text = r#"{
        "commodities": [{"Name": "Pens", "Volume": 1}],
        "nodes": [{"Name": "A"}, {"Name": "B"}],
        "arcs": [{"Source": "A", "Destination": "B"}],
        "cost": [{"Commodity": "Pens", "Source": "A", "Destination": "B", "Cost": 2}],
        "inflow": [{"Commodity": "Pens", "Node": "A", "Quantity": 3},
                   {"Commodity": "Pens", "Node": "B", "Quantity": -3}]
    }"#;
    let dat: ModelingDat = json::from_str(text).unwrap();
    assert!(dat.arcs[0].capacity.is_infinite());

    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("modeling.json");
    write_modeling(&path, Format::Json, &dat).unwrap();
    assert_eq!(read_modeling(&path, Format::Json).unwrap(), dat);
}
