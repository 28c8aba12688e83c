use std::io::{self, Write};
use std::path::Path;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use netflow_algo::{verify_solution, LpSolverKind, Netflow, NetflowSolverConfig, SolveOutcome};
use netflow_core::{ModelingDat, SolutionDat};
use netflow_io::Format;
use tabwriter::TabWriter;
use tracing::info;

use super::report_integrity;

pub struct SolveArgs<'a> {
    pub input: &'a Path,
    pub output: &'a Path,
    pub modeling: bool,
    pub lp_solver: LpSolverKind,
    /// Explicit output format; falls back to the input format
    pub format: Option<Format>,
    pub verify: bool,
}

pub fn handle(args: &SolveArgs<'_>) -> Result<()> {
    let start = Instant::now();
    let input_format = Format::detect_or_err(args.input)?;
    let output_format = args.format.unwrap_or(input_format);
    let netflow = Netflow::new(NetflowSolverConfig::with_solver(args.lp_solver));

    info!(
        "Solving {} ({} {}) with {}",
        args.input.display(),
        input_format,
        if args.modeling { "modeling" } else { "input" },
        netflow.config().lp_solver
    );

    let modeling = load_modeling(&netflow, args.input, input_format, args.modeling)?;
    let outcome = netflow
        .solve_detailed_from_modeling_dat(&modeling)
        .inspect_err(report_integrity)?;

    let solution = match outcome {
        SolveOutcome::Optimal(solution) => solution,
        other => {
            info!(
                status = other.status(),
                "solve finished without an optimal solution"
            );
            println!("No feasible solution");
            return Ok(());
        }
    };

    if args.verify {
        check(&modeling, &solution)?;
    }

    netflow_io::write_solution(args.output, output_format, &solution)
        .with_context(|| format!("writing {}", args.output.display()))?;
    print_summary(&solution)?;
    info!(
        "Wrote {} solution to {} in {} ms",
        output_format,
        args.output.display(),
        start.elapsed().as_millis()
    );
    Ok(())
}

fn load_modeling(
    netflow: &Netflow,
    path: &Path,
    format: Format,
    modeling: bool,
) -> Result<ModelingDat> {
    let reading = || format!("reading {}", path.display());
    if modeling {
        return netflow_io::read_modeling(path, format).with_context(reading);
    }
    let dat = netflow_io::read_input(path, format).with_context(reading)?;
    Ok(netflow
        .create_modeling_dat_from_input_dat(&dat)
        .inspect_err(report_integrity)?)
}

fn check(modeling: &ModelingDat, solution: &SolutionDat) -> Result<()> {
    let violations = verify_solution(modeling, solution);
    if violations.is_empty() {
        info!("solution verified");
        return Ok(());
    }
    for violation in &violations {
        eprintln!("  {violation}");
    }
    bail!(
        "solution failed verification: {} violation(s)",
        violations.len()
    )
}

fn print_summary(solution: &SolutionDat) -> Result<()> {
    println!(
        "Total Cost: {:.2}",
        solution.total_cost().unwrap_or_default()
    );
    println!("Shipments: {}", solution.flow.len());
    let mut writer = TabWriter::new(io::stdout());
    writeln!(writer, "COMMODITY\tSOURCE\tDESTINATION\tQUANTITY")?;
    for row in &solution.flow {
        writeln!(
            writer,
            "{}\t{}\t{}\t{}",
            row.commodity, row.source, row.destination, row.quantity
        )?;
    }
    writer.flush()?;
    Ok(())
}
