use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use reserveopt::{PlanOverrides, SolverBackend};

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Select a minimum-cost, compact reserve on a planning grid"
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a file in addition to stderr
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the model from a plan file and solve it.
    Solve(SolveArgs),
    /// Build the model from a plan file and report its size without solving.
    Inspect(InspectArgs),
}

#[derive(Args, Debug)]
pub struct SolveArgs {
    /// Plan file in TOML format.
    #[arg(value_name = "PLAN")]
    pub plan: PathBuf,

    /// Write the selection as a 0/1 grid to this CSV file.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: OverrideArgs,
}

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Plan file in TOML format.
    #[arg(value_name = "PLAN")]
    pub plan: PathBuf,

    #[command(flatten)]
    pub overrides: OverrideArgs,
}

#[derive(Args, Debug, Clone)]
pub struct OverrideArgs {
    /// Override `objective.boundary-penalty`.
    #[arg(short = 'b', long, value_name = "FLOAT")]
    pub boundary_penalty: Option<f64>,

    /// Override `objective.edge-factor`.
    #[arg(long, value_name = "FLOAT")]
    pub edge_factor: Option<f64>,

    /// Override `solver.gap` (relative MIP gap).
    #[arg(long, value_name = "FLOAT")]
    pub gap: Option<f64>,

    /// Override `solver.time-limit` in seconds. Takes precedence over the gap.
    #[arg(short, long, value_name = "SECONDS")]
    pub time_limit: Option<f64>,

    /// Override `solver.backend`.
    #[arg(long, value_enum)]
    pub backend: Option<BackendArg>,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum BackendArg {
    Auto,
    Highs,
    CoinCbc,
}

impl From<BackendArg> for SolverBackend {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Auto => SolverBackend::Auto,
            BackendArg::Highs => SolverBackend::Highs,
            BackendArg::CoinCbc => SolverBackend::CoinCbc,
        }
    }
}

impl From<&OverrideArgs> for PlanOverrides {
    fn from(args: &OverrideArgs) -> Self {
        PlanOverrides {
            boundary_penalty: args.boundary_penalty,
            edge_factor: args.edge_factor,
            gap: args.gap,
            time_limit: args.time_limit,
            backend: args.backend.map(SolverBackend::from),
        }
    }
}
