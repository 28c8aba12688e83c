use clap::Parser;
use clap_complete::generate;
use netflow_cli::cli::{build_cli_command, Cli, Commands, SchemaKind};
use netflow_cli::config::{load_config, NetflowConfig};
use netflow_core::Schemas;
use std::io;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::FmtSubscriber;

mod commands;

use commands::solve::SolveArgs;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    let level = match cli.log_level {
        Some(level) => level,
        None => match config.log_level() {
            Ok(level) => level,
            Err(e) => {
                eprintln!("Error: {e:#}");
                return ExitCode::FAILURE;
            }
        },
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(io::stderr)
        .finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("warning: a tracing subscriber was already installed");
    }

    match run(cli.command, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands, config: &NetflowConfig) -> anyhow::Result<()> {
    match command {
        Commands::Solve {
            input,
            output,
            modeling,
            lp_solver,
            format,
            verify,
        } => {
            let lp_solver = match lp_solver {
                Some(name) => name.parse()?,
                None => config.lp_solver()?,
            };
            let format = match format {
                Some(format) => Some(format.into()),
                None => config.output_format()?,
            };
            commands::solve::handle(&SolveArgs {
                input: &input,
                output: &output,
                modeling,
                lp_solver,
                format,
                verify,
            })
        }
        Commands::Validate {
            input,
            modeling,
            json,
        } => commands::validate::handle(&input, modeling, json),
        Commands::Schema { kind } => {
            let schemas = Schemas::new();
            let schema = match kind {
                SchemaKind::Input => &schemas.input,
                SchemaKind::Modeling => &schemas.modeling,
                SchemaKind::Solution => &schemas.solution,
            };
            commands::schema::handle(schema)
        }
        Commands::Completions { shell } => {
            let mut cmd = build_cli_command();
            generate(shell, &mut cmd, "netflow", &mut io::stdout());
            info!("Completions generated for {shell}");
            Ok(())
        }
    }
}
