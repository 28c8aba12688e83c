use std::path::Path;

use anyhow::{bail, Context, Result};
use netflow_core::{diagnose, Diagnostics, Schemas};
use netflow_io::Format;
use serde::Serialize;
use tracing::info;

#[derive(Serialize)]
struct ValidationReport<'a> {
    schema: &'a str,
    clean: bool,
    summary: String,
    #[serde(flatten)]
    diagnostics: &'a Diagnostics,
}

pub fn handle(input: &Path, modeling: bool, json: bool) -> Result<()> {
    let format = Format::detect_or_err(input)?;
    let schemas = Schemas::new();
    info!("Validating {} ({})", input.display(), format);

    let reading = || format!("reading {}", input.display());
    let (schema, diag) = if modeling {
        let dat = netflow_io::read_modeling(input, format).with_context(reading)?;
        (&schemas.modeling, diagnose(&schemas.modeling, &dat))
    } else {
        let dat = netflow_io::read_input(input, format).with_context(reading)?;
        (&schemas.input, diagnose(&schemas.input, &dat))
    };

    if json {
        let report = ValidationReport {
            schema: schema.name,
            clean: diag.is_clean(),
            summary: diag.summary(),
            diagnostics: &diag,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for issue in &diag.issues {
            println!("{issue}");
        }
        if diag.is_clean() {
            println!("{} dataset is valid ({})", schema.name, diag.summary());
        } else {
            println!("{} dataset is invalid ({})", schema.name, diag.summary());
        }
    }

    if !diag.is_clean() {
        bail!("validation failed: {}", diag.summary());
    }
    Ok(())
}
