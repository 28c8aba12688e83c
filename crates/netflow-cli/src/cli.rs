use clap::{CommandFactory, Parser, Subcommand, ValueEnum, ValueHint};
use clap_complete::Shell;
use netflow_io::Format;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "netflow",
    author,
    version,
    about = "Multi-commodity minimum-cost network flow solver",
    long_about = None
)]
pub struct Cli {
    /// Set the logging level (overrides the config file)
    #[arg(long, global = true)]
    pub log_level: Option<tracing::Level>,

    /// TOML configuration file
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Solve a dataset and write the optimal flows
    Solve {
        /// Input dataset (.json file or directory of CSV files)
        #[arg(short, long, value_hint = ValueHint::AnyPath)]
        input: PathBuf,
        /// Where to write the solution
        #[arg(short, long, value_hint = ValueHint::AnyPath)]
        output: PathBuf,
        /// Read a modeling dataset (signed inflow) instead of supply/demand
        #[arg(long)]
        modeling: bool,
        /// LP backend (microlp, clarabel, highs)
        #[arg(long)]
        lp_solver: Option<String>,
        /// Output format; defaults to the input's format
        #[arg(long, value_enum)]
        format: Option<DataFormat>,
        /// Check conservation, capacity and cost of the solution before writing it
        #[arg(long)]
        verify: bool,
    },
    /// Run every integrity check and print the report
    Validate {
        /// Dataset to check
        #[arg(short, long, value_hint = ValueHint::AnyPath)]
        input: PathBuf,
        /// Check against the modeling schema
        #[arg(long)]
        modeling: bool,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Describe the tables and fields of a schema
    Schema {
        #[arg(value_enum, default_value = "input")]
        kind: SchemaKind,
    },
    /// Generate shell completion scripts
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum DataFormat {
    Json,
    Csv,
}

impl From<DataFormat> for Format {
    fn from(value: DataFormat) -> Self {
        match value {
            DataFormat::Json => Format::Json,
            DataFormat::Csv => Format::Csv,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchemaKind {
    Input,
    Modeling,
    Solution,
}

pub fn build_cli_command() -> clap::Command {
    Cli::command()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn solve_flags_parse() {
        let cli = Cli::parse_from([
            "netflow",
            "--log-level",
            "debug",
            "solve",
            "-i",
            "in.json",
            "-o",
            "out",
            "--format",
            "csv",
            "--verify",
        ]);
        assert_eq!(cli.log_level, Some(tracing::Level::DEBUG));
        match cli.command {
            Commands::Solve {
                format, verify, modeling, ..
            } => {
                assert_eq!(format, Some(DataFormat::Csv));
                assert!(verify);
                assert!(!modeling);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
