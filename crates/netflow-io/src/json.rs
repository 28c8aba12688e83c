//! JSON datasets: one object whose keys are table names and whose values are
//! arrays of row objects keyed by field name. Missing tables read as empty.

use std::fs;
use std::path::Path;

use netflow_core::{NetflowError, NetflowResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

/// Read any dataset type from a JSON file.
pub fn read<T: DeserializeOwned>(path: &Path) -> NetflowResult<T> {
    let text = fs::read_to_string(path)?;
    let dat = from_str(&text).map_err(|err| match err {
        NetflowError::Parse(msg) => NetflowError::Parse(format!("{}: {}", path.display(), msg)),
        other => other,
    })?;
    debug!(path = %path.display(), "read JSON dataset");
    Ok(dat)
}

pub fn from_str<T: DeserializeOwned>(text: &str) -> NetflowResult<T> {
    Ok(serde_json::from_str(text)?)
}

/// Write any dataset type as pretty-printed JSON, creating parent
/// directories as needed.
pub fn write<T: Serialize>(path: &Path, dat: &T) -> NetflowResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, to_string(dat)?)?;
    debug!(path = %path.display(), "wrote JSON dataset");
    Ok(())
}

pub fn to_string<T: Serialize>(dat: &T) -> NetflowResult<String> {
    Ok(serde_json::to_string_pretty(dat)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use netflow_core::{ArcRow, InputDat, NodeRow, SolutionDat};

    #[test]
    fn numeric_names_and_null_capacity() {
        let dat: InputDat = from_str(
            r#"{
                "nodes": [{"Name": 1}, {"Name": "Boston"}],
                "arcs": [{"Source": 1, "Destination": "Boston", "Capacity": null},
                         {"Source": "Boston", "Destination": 1}]
            }"#,
        )
        .unwrap();
        assert_eq!(dat.nodes, vec![NodeRow::new("1"), NodeRow::new("Boston")]);
        assert_eq!(
            dat.arcs,
            vec![ArcRow::unbounded("1", "Boston"), ArcRow::unbounded("Boston", "1")]
        );
        assert!(dat.supply.is_empty());
    }

    #[test]
    fn unbounded_capacity_writes_null() {
        let dat = InputDat {
            arcs: vec![ArcRow::unbounded("A", "B")],
            ..InputDat::default()
        };
        let text = to_string(&dat).unwrap();
        assert!(text.contains("\"Capacity\": null"));
        let back: InputDat = from_str(&text).unwrap();
        assert!(back.arcs[0].capacity.is_infinite());
    }

    #[test]
    fn parse_errors_name_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();
        let err = read::<SolutionDat>(&path).unwrap_err();
        assert!(err.to_string().contains("broken.json"));
    }
}
