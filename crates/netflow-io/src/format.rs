//! Format detection for dataset files.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use netflow_core::NetflowError;

/// Supported on-disk dataset formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// One JSON document, each table an array of row objects
    Json,
    /// A directory holding one `<table>.csv` file per table
    Csv,
}

impl Format {
    pub const ALL: &'static [Format] = &[Format::Json, Format::Csv];

    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::Csv => "csv",
        }
    }

    /// Detect from the path: an existing directory or a path without an
    /// extension is a CSV directory, a `.json` file is JSON.
    pub fn detect(path: &Path) -> Option<Format> {
        if path.is_dir() {
            return Some(Format::Csv);
        }
        match path.extension().and_then(|ext| ext.to_str()) {
            None => Some(Format::Csv),
            Some(ext) if ext.eq_ignore_ascii_case("json") => Some(Format::Json),
            Some(_) => None,
        }
    }

    /// [`Format::detect`], failing with a configuration error.
    pub fn detect_or_err(path: &Path) -> Result<Format, NetflowError> {
        Self::detect(path).ok_or_else(|| {
            NetflowError::Config(format!(
                "cannot infer dataset format from '{}'; use a .json file or a directory",
                path.display()
            ))
        })
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Format {
    type Err = NetflowError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "json" => Ok(Format::Json),
            "csv" => Ok(Format::Csv),
            other => {
                let supported: Vec<&str> = Format::ALL.iter().map(Format::as_str).collect();
                Err(NetflowError::Config(format!(
                    "unknown format '{}'; supported values: {}",
                    other,
                    supported.join(", ")
                )))
            }
        }
    }
}
