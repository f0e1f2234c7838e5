//! Benchmarking CLI for the graphform solver.

mod test_problems;

use std::time::Instant;

use anyhow::Result;
use clap::{Parser, Subcommand};
use graphform_core::{solve, SolveStatus, SolverSettings};
use test_problems::GeneratedProblem;

#[derive(Parser)]
#[command(name = "graphform-bench")]
#[command(about = "Benchmarking CLI for the graphform solver")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Non-negative least squares
    Nnls {
        #[command(flatten)]
        opts: RunOpts,
    },
    /// Linear program in inequality form
    LpIneq {
        #[command(flatten)]
        opts: RunOpts,
    },
    /// Linear program in equality form
    LpEq {
        #[command(flatten)]
        opts: RunOpts,
    },
    /// Support vector machine on two Gaussian clusters
    Svm {
        #[command(flatten)]
        opts: RunOpts,
    },
    /// Lasso regression
    Lasso {
        #[command(flatten)]
        opts: RunOpts,
        /// Run the full row-count sweep at fixed n, reporting time per size
        #[arg(long)]
        sweep: bool,
        /// Maximum number of sweep sizes to run (default: all)
        #[arg(long)]
        limit: Option<usize>,
    },
}

#[derive(clap::Args)]
struct RunOpts {
    /// Number of rows m
    #[arg(long, default_value = "1000")]
    rows: usize,
    /// Number of columns n (features for svm; the bias column is added)
    #[arg(long, default_value = "100")]
    cols: usize,
    /// RNG seed
    #[arg(long, default_value = "0")]
    seed: u64,
    /// Maximum ADMM iterations
    #[arg(long, default_value = "1000")]
    max_iter: usize,
    /// Suppress per-iteration output
    #[arg(long)]
    quiet: bool,
}

/// Lasso sweep sizes from the reference driver (n fixed at 500).
const LASSO_SWEEP_ROWS: [usize; 30] = [
    600, 743, 921, 1141, 1413, 1751, 2170, 2689, 3331, 4128, 5114, 6337, 7851, 9728, 12053, 14933,
    18502, 22924, 28403, 35191, 43602, 54022, 66933, 82930, 102749, 127306, 157731, 195427,
    242132, 299999,
];

fn run_one(gen: &GeneratedProblem, opts: &RunOpts) -> Result<()> {
    let prob = gen.problem();
    let settings = SolverSettings {
        max_iter: opts.max_iter,
        verbose: !opts.quiet,
        ..Default::default()
    };

    let start = Instant::now();
    let result = solve(&prob, &settings)?;
    let elapsed = start.elapsed().as_secs_f64() * 1e3;

    println!(
        "{}: {}x{}  status = {}  obj = {:.6e}  iters = {}  factor = {} ms  total = {:.1} ms",
        gen.name,
        gen.m,
        gen.n,
        result.status,
        result.obj_val,
        result.info.iters,
        result.info.factor_time_ms,
        elapsed
    );

    if result.status == SolveStatus::NumericalError {
        anyhow::bail!("solver reported a numerical error on {}", gen.name);
    }
    Ok(())
}

fn run_lasso_sweep(opts: &RunOpts, limit: Option<usize>) -> Result<()> {
    let count = limit.unwrap_or(LASSO_SWEEP_ROWS.len());
    println!("lasso sweep: n = 500, {} sizes", count);
    for &m in LASSO_SWEEP_ROWS.iter().take(count) {
        let gen = test_problems::lasso(m, 500, opts.seed);
        let prob = gen.problem();
        let settings = SolverSettings {
            max_iter: opts.max_iter,
            verbose: false,
            ..Default::default()
        };

        let start = Instant::now();
        let result = solve(&prob, &settings)?;
        println!(
            "{}, {:.6e}, {}, {}",
            m,
            start.elapsed().as_secs_f64(),
            result.status,
            result.info.iters
        );
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Nnls { opts } => run_one(&test_problems::nnls(opts.rows, opts.cols, opts.seed), opts),
        Commands::LpIneq { opts } => {
            run_one(&test_problems::lp_ineq(opts.rows, opts.cols, opts.seed), opts)
        }
        Commands::LpEq { opts } => {
            run_one(&test_problems::lp_eq(opts.rows, opts.cols, opts.seed), opts)
        }
        Commands::Svm { opts } => run_one(&test_problems::svm(opts.rows, opts.cols, opts.seed), opts),
        Commands::Lasso { opts, sweep, limit } => {
            if *sweep {
                run_lasso_sweep(opts, *limit)
            } else {
                run_one(&test_problems::lasso(opts.rows, opts.cols, opts.seed), opts)
            }
        }
    }
}
