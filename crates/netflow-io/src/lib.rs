//! # netflow-io: Dataset Readers and Writers
//!
//! | Format | Layout | Module |
//! |--------|--------|--------|
//! | JSON | one document, tables as arrays of row objects | [`json`] |
//! | CSV | a directory of `<table>.csv` files | [`csv_dir`] |
//!
//! Reading does not validate; callers run the integrity checks of
//! `netflow-core` on the result.

pub mod csv_dir;
pub mod format;
pub mod json;

use std::path::Path;

use netflow_core::{InputDat, ModelingDat, NetflowResult, SolutionDat};

pub use format::Format;

pub fn read_input(path: &Path, format: Format) -> NetflowResult<InputDat> {
    match format {
        Format::Json => json::read(path),
        Format::Csv => csv_dir::read_input(path),
    }
}

pub fn read_modeling(path: &Path, format: Format) -> NetflowResult<ModelingDat> {
    match format {
        Format::Json => json::read(path),
        Format::Csv => csv_dir::read_modeling(path),
    }
}

pub fn read_solution(path: &Path, format: Format) -> NetflowResult<SolutionDat> {
    match format {
        Format::Json => json::read(path),
        Format::Csv => csv_dir::read_solution(path),
    }
}

pub fn write_input(path: &Path, format: Format, dat: &InputDat) -> NetflowResult<()> {
    match format {
        Format::Json => json::write(path, dat),
        Format::Csv => csv_dir::write_input(path, dat),
    }
}

pub fn write_modeling(path: &Path, format: Format, dat: &ModelingDat) -> NetflowResult<()> {
    match format {
        Format::Json => json::write(path, dat),
        Format::Csv => csv_dir::write_modeling(path, dat),
    }
}

pub fn write_solution(path: &Path, format: Format, dat: &SolutionDat) -> NetflowResult<()> {
    match format {
        Format::Json => json::write(path, dat),
        Format::Csv => csv_dir::write_solution(path, dat),
    }
}
