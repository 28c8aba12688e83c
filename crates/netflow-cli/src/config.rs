//! Command-line configuration file.
//!
//! ```toml
//! [solver]
//! lp = "microlp"
//!
//! [logging]
//! level = "info"
//!
//! [output]
//! format = "csv"
//! ```
//!
//! Every section is optional. Command-line flags take precedence.

use anyhow::{Context, Result};
use netflow_algo::LpSolverKind;
use netflow_io::Format;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NetflowConfig {
    #[serde(default)]
    pub solver: SolverConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Default LP backend
    #[serde(default = "default_lp_solver")]
    pub lp: String,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            lp: default_lp_solver(),
        }
    }
}

fn default_lp_solver() -> String {
    LpSolverKind::default().as_str().to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OutputConfig {
    /// Solution format when `--format` is not given: "json" or "csv"
    #[serde(default)]
    pub format: Option<String>,
}

impl NetflowConfig {
    pub fn log_level(&self) -> Result<tracing::Level> {
        let level = &self.logging.level;
        level
            .parse()
            .map_err(|_| anyhow::anyhow!("invalid log level '{level}'"))
    }

    pub fn lp_solver(&self) -> Result<LpSolverKind> {
        Ok(self.solver.lp.parse()?)
    }

    pub fn output_format(&self) -> Result<Option<Format>> {
        self.output
            .format
            .as_deref()
            .map(str::parse)
            .transpose()
            .map_err(Into::into)
    }
}

/// Load the configuration, or defaults when no path is given.
pub fn load_config(path: Option<&Path>) -> Result<NetflowConfig> {
    let Some(path) = path else {
        return Ok(NetflowConfig::default());
    };
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("reading config file {}", path.display()))?;
    let config: NetflowConfig = toml::from_str(&contents)
        .with_context(|| format!("parsing config file {}", path.display()))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_sections_use_defaults() {
        let config: NetflowConfig = toml::from_str("[output]\nformat = \"csv\"\n").unwrap();
        assert_eq!(config.solver.lp, "microlp");
        assert_eq!(config.log_level().unwrap(), tracing::Level::INFO);
        assert_eq!(config.output_format().unwrap(), Some(Format::Csv));
        assert_eq!(config.lp_solver().unwrap(), LpSolverKind::Microlp);
    }

    #[test]
    fn bad_values_are_reported() {
        let config: NetflowConfig =
            toml::from_str("[solver]\nlp = \"cplex\"\n[logging]\nlevel = \"loud\"\n").unwrap();
        assert!(config.lp_solver().unwrap_err().to_string().contains("cplex"));
        assert!(config.log_level().is_err());
    }

    #[test]
    fn no_path_means_defaults() {
        let config = load_config(None).unwrap();
        assert!(config.output.format.is_none());
    }
}
