use netflow_core::{
    check_integrity, input_schema, modeling_schema, solution_schema, FieldKind, InputDat,
    IntegrityCheck, ModelingDat, Schemas, SolutionDat,
};

#[test]
fn table_names_per_schema() {
    assert_eq!(
        input_schema().table_names(),
        vec!["commodities", "nodes", "arcs", "cost", "supply", "demand"]
    );
    assert_eq!(
        modeling_schema().table_names(),
        vec!["commodities", "nodes", "arcs", "cost", "inflow"]
    );
    assert_eq!(solution_schema().table_names(), vec!["flow", "parameters"]);
}

#[test]
fn every_table_and_field_is_documented() {
    let schemas = Schemas::new();
    for schema in [&schemas.input, &schemas.modeling, &schemas.solution] {
        for table in &schema.tables {
            assert!(!table.tooltip.is_empty(), "{}.{}", schema.name, table.name);
            for field in table.fields() {
                assert!(!field.tooltip.is_empty(), "{}.{}", table.name, field.name);
                assert_eq!(field.domain.is_some(), field.kind == FieldKind::Number);
            }
        }
    }
}

#[test]
fn capacity_defaults_to_unbounded() {
    let schema = input_schema();
    let arcs = schema.table("arcs").unwrap();
    let capacity = arcs.field("Capacity").unwrap();
    assert_eq!(capacity.default, Some(f64::INFINITY));
}

#[test]
fn empty_datasets_pass_their_own_schema() {
    let schemas = Schemas::new();
    let input = InputDat::default();
    let modeling = ModelingDat::default();
    let solution = SolutionDat::default();
    assert!(check_integrity(&schemas.input, &input).is_ok());
    assert!(check_integrity(&schemas.modeling, &modeling).is_ok());
    assert!(check_integrity(&schemas.solution, &solution).is_ok());
}

#[test]
fn omitted_volume_takes_declared_default_and_fails_its_domain() {
    let schema = input_schema();
    let commodities = schema.table("commodities").unwrap();
    let volume = commodities.field("Volume").unwrap();
    assert_eq!(volume.default, Some(0.0));

    let dat: InputDat = serde_json::from_str(
        r#"{
            "commodities": [{"Name": "Pens"}],
            "nodes": [{"Name": "Detroit"}, {"Name": "Boston"}],
            "arcs": [{"Source": "Detroit", "Destination": "Boston"}],
            "cost": [{"Commodity": "Pens", "Source": "Detroit", "Destination": "Boston"}]
        }"#,
    )
    .unwrap();
    assert_eq!(dat.commodities[0].volume, 0.0);
    assert_eq!(dat.cost[0].cost, 0.0);

    let err = check_integrity(&schema, &dat).unwrap_err();
    assert_eq!(err.integrity_check(), Some(IntegrityCheck::DataTypeValue));
}
