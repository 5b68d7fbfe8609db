mod cli;

use std::path::Path;

use clap::Parser;
use tracing::{debug, error, info};

use cli::{Cli, Commands, InspectArgs, SolveArgs};
use reserveopt::infrastructure::{setup_logging, write_selection};
use reserveopt::{
    PlanError, PlanFile, PlanOverrides, PlanningProblem, ReservePlanner, SolverFactory,
};

fn main() {
    let cli = Cli::parse();
    if let Err(e) = setup_logging(cli.verbose, cli.quiet, cli.log_file.as_deref()) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
    debug!("CLI arguments: {:?}", &cli);

    let result = match cli.command {
        Commands::Solve(args) => solve(args),
        Commands::Inspect(args) => inspect(args),
    };

    if let Err(e) = result {
        error!("Command failed: {}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn load_problem(path: &Path, overrides: PlanOverrides) -> Result<PlanningProblem, PlanError> {
    let mut plan = PlanFile::load(path)?;
    plan.apply(&overrides);
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    plan.into_problem(base_dir)
}

fn solve(args: SolveArgs) -> Result<(), PlanError> {
    let problem = load_problem(&args.plan, PlanOverrides::from(&args.overrides))?;
    let solver = SolverFactory::create_solver(&problem.solver_config);
    let planner = ReservePlanner::new(solver);

    println!("Solving {} with {}", args.plan.display(), planner.solver_name());
    let outcome = planner.plan(&problem)?;
    let summary = &outcome.summary;

    println!("Status: {}", outcome.solution.status);
    println!(
        "Selected units: {} of {}",
        summary.num_selected,
        problem.grid.num_units()
    );
    println!("Objective value: {:.6}", summary.objective_value);
    match summary.objective_bound {
        Some(bound) => println!("Objective bound: {:.6}", bound),
        None => println!("Objective bound: unknown"),
    }
    if let Some(gap) = summary.gap {
        println!("Gap: {:.4}%", gap * 100.0);
    }
    println!("Total cost: {:.6}", summary.total_cost);
    println!("Boundary length: {:.6}", summary.boundary_length);
    for feature in &summary.features {
        println!(
            "  feature {}: held {:.4} / target {:.4} ({})",
            feature.feature,
            feature.held,
            feature.target,
            if feature.is_met() { "met" } else { "missed" }
        );
    }

    if let Some(output) = &args.output {
        write_selection(output, &problem.grid, &outcome.solution.selection)?;
        info!("Selection written to {}", output.display());
        println!("Selection written to {}", output.display());
    }
    Ok(())
}

fn inspect(args: InspectArgs) -> Result<(), PlanError> {
    let problem = load_problem(&args.plan, PlanOverrides::from(&args.overrides))?;
    let boundary = ReservePlanner::boundaries(&problem);
    let model = ReservePlanner::build_model(&problem, &boundary)?;

    println!(
        "Grid: {} x {} ({} units)",
        problem.grid.nrows,
        problem.grid.ncols,
        model.num_units()
    );
    println!("Features: {}", model.num_features());
    println!("Occupancy non-zeros: {}", model.a.nnz());
    println!("Quadratic terms: {}", model.q.nnz());
    println!("Shared edges: {}", boundary.shared_entries().count());
    for (feature, target) in model.rhs.iter().enumerate() {
        println!("  feature {}: target {:.4}", feature, target);
    }
    Ok(())
}
