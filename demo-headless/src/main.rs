use clap::{Args, Parser, Subcommand};
use fire_extinguish_core::laplace::{self, LaplaceConfig, DEFAULT_MAX_ITER, DEFAULT_TOLERANCE};
use fire_extinguish_core::simulation;
use fire_extinguish_core::solver::THRESHOLD;
use fire_extinguish_core::{SimError, SimulationConfig};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Distributed fire extinguishing simulation
#[derive(Parser, Debug)]
#[command(name = "fire-extinguish")]
#[command(about = "Heat diffusion with fire focal points and extinguishing teams", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the fire extinguishing simulation
    Fire(FireArgs),
    /// Relax a Laplace problem with sine boundaries
    Laplace(LaplaceArgs),
}

#[derive(Args, Debug)]
struct FireArgs {
    /// Read the scenario from a file
    #[arg(short, long, conflicts_with = "values")]
    file: Option<PathBuf>,

    /// Scenario values, in the same order as an input file
    #[arg(allow_negative_numbers = true, required_unless_present = "file")]
    values: Vec<String>,

    /// Number of workers; must divide the row count
    #[arg(short, long, default_value_t = 1)]
    workers: usize,

    /// Print the report as JSON instead of text
    #[arg(long)]
    json: bool,

    /// Print the final grid
    #[arg(long)]
    show: bool,
}

#[derive(Args, Debug)]
struct LaplaceArgs {
    /// Grid rows
    rows: usize,

    /// Grid columns
    columns: usize,

    /// Iteration budget
    #[arg(default_value_t = DEFAULT_MAX_ITER)]
    max_iter: usize,

    /// Number of workers; must divide the row count
    #[arg(short, long, default_value_t = 1)]
    workers: usize,

    /// Stop once the residual is at or below this value
    #[arg(short, long, default_value_t = DEFAULT_TOLERANCE)]
    tolerance: f32,
}

#[derive(Debug)]
enum CliError {
    Io { path: PathBuf, source: std::io::Error },
    Sim(SimError),
    Json(serde_json::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "cannot read {}: {source}", path.display()),
            Self::Sim(err) => write!(f, "{err}"),
            Self::Json(err) => write!(f, "cannot encode report: {err}"),
        }
    }
}

impl From<SimError> for CliError {
    fn from(err: SimError) -> Self {
        Self::Sim(err)
    }
}

fn load_config(args: &FireArgs) -> Result<SimulationConfig, CliError> {
    let config = match &args.file {
        Some(path) => {
            let text = std::fs::read_to_string(path).map_err(|source| CliError::Io {
                path: path.clone(),
                source,
            })?;
            SimulationConfig::parse_str(&text)?
        }
        None => SimulationConfig::parse_tokens(args.values.iter().map(String::as_str))?,
    };
    config.validate()?;
    Ok(config)
}

fn print_arguments(config: &SimulationConfig, workers: usize) {
    println!(
        "Arguments, Rows: {}, Columns: {}, max_iter: {}, threshold: {:.6}",
        config.rows, config.columns, config.max_iter, THRESHOLD
    );
    println!(
        "Arguments, Teams: {}, Focal points: {}, Workers: {}",
        config.teams.len(),
        config.focal_points.len(),
        workers
    );
    for (index, team) in config.teams.iter().enumerate() {
        println!(
            "\tTeam {index}, position ({},{}), type: {}",
            team.x, team.y, team.kind
        );
    }
    for (index, focal) in config.focal_points.iter().enumerate() {
        println!(
            "\tFocal_point {index}, position ({},{}), start time: {}, temperature: {}",
            focal.x, focal.y, focal.start, focal.heat
        );
    }
}

fn run_fire(args: &FireArgs) -> Result<(), CliError> {
    let config = load_config(args)?;
    if !args.json {
        print_arguments(&config, args.workers);
    }

    let start = Instant::now();
    let report = simulation::run(&config, args.workers)?;
    let elapsed = start.elapsed().as_secs_f64();
    debug!(elapsed, "simulation timed");

    if args.json {
        let json = serde_json::to_string_pretty(&report).map_err(CliError::Json)?;
        println!("{json}");
        return Ok(());
    }

    if args.show {
        println!();
        print!("{}", report.render_status());
    }
    println!();
    println!("Time: {elapsed:.6}");
    println!("{}", report.result_line());
    Ok(())
}

fn run_laplace(args: &LaplaceArgs) -> Result<(), CliError> {
    let config = LaplaceConfig {
        rows: args.rows,
        columns: args.columns,
        max_iter: args.max_iter,
        tolerance: args.tolerance,
    };

    let start = Instant::now();
    let report = laplace::run(&config, args.workers)?;
    let elapsed = start.elapsed().as_secs_f64();

    println!("Iterations: {}", report.iterations);
    println!("Residual: {:.6e}", report.residual);
    println!("Time: {elapsed:.6}");
    Ok(())
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match &cli.command {
        Command::Fire(args) => run_fire(args),
        Command::Laplace(args) => run_laplace(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}
