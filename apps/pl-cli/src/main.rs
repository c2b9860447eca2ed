mod error;

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Instant;

use error::{CliError, CliResult};
use pl_project::{Scenario, load_scenario, run_scenario, save_scenario};
use pl_results::{LoopMetrics, RunRecord, RunSummary, compute_loop_metrics, save_csv, save_record};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pl-cli")]
#[command(about = "PidLab CLI - PID closed-loop response simulator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the default scenario to a file
    Init {
        /// Output path (.yaml, .yml or .json)
        path: PathBuf,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Validate a scenario file
    Validate {
        /// Path to the scenario file
        path: PathBuf,
    },
    /// Run a scenario and print its summary
    Run {
        /// Path to the scenario file
        path: PathBuf,
        /// Noise seed (overrides the scenario's seed)
        #[arg(long)]
        seed: Option<u64>,
        /// Write samples as CSV
        #[arg(long)]
        csv: Option<PathBuf>,
        /// Write the full run record as JSON
        #[arg(long)]
        json: Option<PathBuf>,
    },
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init { path, force } => cmd_init(&path, force),
        Commands::Validate { path } => cmd_validate(&path),
        Commands::Run {
            path,
            seed,
            csv,
            json,
        } => cmd_run(&path, seed, csv.as_deref(), json.as_deref()),
    }
}

fn cmd_init(path: &Path, force: bool) -> CliResult<()> {
    if path.exists() {
        if force {
            warn!(path = %path.display(), "overwriting existing scenario");
        } else {
            return Err(CliError::AlreadyExists {
                path: path.display().to_string(),
            });
        }
    }
    save_scenario(path, &Scenario::default())?;
    println!("✓ Wrote default scenario to {}", path.display());
    Ok(())
}

fn cmd_validate(path: &Path) -> CliResult<()> {
    let scenario = load_scenario(path)?;
    info!(path = %path.display(), name = %scenario.name, "loaded scenario");
    let (_, config, spec) = scenario.to_runtime()?;
    println!("✓ Scenario '{}' is valid", scenario.name);
    println!("  Reference: {}", spec.kind());
    println!(
        "  Samples:   {} (dt = {} s over {} s)",
        pl_sim::step_count(&config)?,
        config.dt,
        config.duration
    );
    Ok(())
}

fn cmd_run(
    path: &Path,
    seed: Option<u64>,
    csv: Option<&Path>,
    json: Option<&Path>,
) -> CliResult<()> {
    let scenario = load_scenario(path)?;

    let start = Instant::now();
    let steps = run_scenario(&scenario, seed)?;
    let elapsed = start.elapsed();
    info!(
        scenario = %scenario.name,
        samples = steps.len(),
        elapsed_ms = elapsed.as_secs_f64() * 1e3,
        "simulation finished"
    );

    let seed = seed.or(scenario.seed);
    let record = RunRecord::new(scenario.name.clone(), seed, steps)?;

    print_summary(&scenario.name, seed, &record.summary);
    print_metrics(&compute_loop_metrics(&record.steps));
    println!("Computed in {:.3} ms", elapsed.as_secs_f64() * 1e3);

    if let Some(csv_path) = csv {
        save_csv(csv_path, &record.steps)?;
        println!(
            "✓ Exported {} samples to {}",
            record.steps.len(),
            csv_path.display()
        );
    }
    if let Some(json_path) = json {
        save_record(json_path, &record)?;
        println!("✓ Saved run record to {}", json_path.display());
    }

    Ok(())
}

fn print_summary(name: &str, seed: Option<u64>, summary: &RunSummary) {
    println!("\n=== {} ===", name);
    match seed {
        Some(seed) => println!("Seed:               {}", seed),
        None => println!("Seed:               (entropy)"),
    }
    println!("Max output:         {:.2}", summary.max_output);
    println!("Final output:       {:.2}", summary.final_output);
    println!("Steady-state error: {:.2}", summary.steady_state_error);
    println!("Mean |error|:       {:.2}", summary.mean_abs_error);
    println!("Data points:        {}", summary.data_points);
    println!("Simulated time:     {:.2} s", summary.sim_time_s);
}

fn print_metrics(metrics: &LoopMetrics) {
    fn show(label: &str, value: Option<f64>, unit: &str) {
        match value {
            Some(v) => println!("{label:<20}{v:.3}{unit}"),
            None => println!("{label:<20}-"),
        }
    }

    println!("\n--- Loop metrics ---");
    show("Rise time 10%:", metrics.rise_time_10_s, " s");
    show("Rise time 90%:", metrics.rise_time_90_s, " s");
    show("Settling (2%):", metrics.settling_time_2pct_s, " s");
    show("Overshoot:", metrics.overshoot_pct, " %");
    show("Final offset:", metrics.final_offset, "");
    show("Max control:", metrics.max_control, "");
}
