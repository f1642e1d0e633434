use clap::{Parser, Subcommand, ValueEnum};
use rx_scenario::{Scenario, ScenarioError};
use rx_sim::{SessionProgress, SessionRecord};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error(transparent)]
    Scenario(#[from] ScenarioError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "rx-cli")]
#[command(about = "Reactor plant simulator - scripted fission core and cooling tank sessions", long_about = None)]
struct Cli {
    /// Log at debug level unless RUST_LOG is set
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a scenario file
    Validate {
        /// Path to the scenario YAML or JSON file
        scenario_path: PathBuf,
    },
    /// Print or write a startup scenario to edit
    Template {
        #[arg(long, value_enum, default_value_t = Format::Yaml)]
        format: Format,
        /// Output file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Run a scenario
    Run {
        /// Path to the scenario YAML or JSON file
        scenario_path: PathBuf,
        /// Override the time step in seconds
        #[arg(long)]
        dt: Option<f64>,
        /// Override the end time in seconds
        #[arg(long)]
        t_end: Option<f64>,
        /// Run without reactor to tank heat exchange
        #[arg(long)]
        uncoupled: bool,
        /// Write the recorded series as CSV to this path
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Write the full session record as JSON to this path
        #[arg(long)]
        record: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Yaml,
    Json,
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(io::stderr)
        .init();

    match cli.command {
        Commands::Validate { scenario_path } => cmd_validate(&scenario_path),
        Commands::Template { format, output } => cmd_template(format, output.as_deref()),
        Commands::Run {
            scenario_path,
            dt,
            t_end,
            uncoupled,
            output,
            record,
        } => cmd_run(
            &scenario_path,
            RunOverrides {
                dt,
                t_end,
                uncoupled,
            },
            output.as_deref(),
            record.as_deref(),
        ),
    }
}

struct RunOverrides {
    dt: Option<f64>,
    t_end: Option<f64>,
    uncoupled: bool,
}

fn cmd_validate(scenario_path: &Path) -> CliResult<()> {
    println!("Validating scenario: {}", scenario_path.display());
    let scenario = rx_scenario::load(scenario_path)?;
    println!("✓ Scenario '{}' is valid", scenario.name);
    println!(
        "  {} commands, dt = {:.4} s, t_end = {:.3} s, coupled = {}",
        scenario.commands.len(),
        scenario.session.dt,
        scenario.session.t_end,
        scenario.coupled
    );
    Ok(())
}

fn cmd_template(format: Format, output: Option<&Path>) -> CliResult<()> {
    let scenario = Scenario::startup_template();
    match output {
        Some(path) => {
            match format {
                Format::Yaml => rx_scenario::save_yaml(path, &scenario)?,
                Format::Json => rx_scenario::save_json(path, &scenario)?,
            }
            println!("✓ Wrote template to {}", path.display());
        }
        None => {
            let text = match format {
                Format::Yaml => serde_yaml::to_string(&scenario)?,
                Format::Json => serde_json::to_string_pretty(&scenario)?,
            };
            print!("{text}");
        }
    }
    Ok(())
}

fn cmd_run(
    scenario_path: &Path,
    overrides: RunOverrides,
    output: Option<&Path>,
    record_path: Option<&Path>,
) -> CliResult<()> {
    let mut scenario = rx_scenario::load(scenario_path)?;
    if let Some(dt) = overrides.dt {
        scenario.session.dt = dt;
    }
    if let Some(t_end) = overrides.t_end {
        scenario.session.t_end = t_end;
    }
    if overrides.uncoupled {
        scenario.coupled = false;
    }

    println!("Running scenario: {}", scenario.name);
    println!(
        "  dt = {:.4} s, t_end = {:.3} s, coupled = {}",
        scenario.session.dt, scenario.session.t_end, scenario.coupled
    );

    let started = Instant::now();
    let mut last_emit = Instant::now();
    let mut last_fraction = -1.0f64;
    let mut on_progress = |p: &SessionProgress| {
        let emit_now = (p.fraction_complete - last_fraction).abs() >= 0.005
            || last_emit.elapsed().as_millis() >= 100;
        if emit_now {
            render_progress(p, started.elapsed().as_secs_f64());
            last_fraction = p.fraction_complete;
            last_emit = Instant::now();
        }
    };
    let progress: &mut dyn FnMut(&SessionProgress) = &mut on_progress;
    let record = rx_scenario::run_scenario(&scenario, Some(progress))?;
    clear_progress_line();

    let wall_s = started.elapsed().as_secs_f64();
    info!(steps = record.stats.steps, wall_s, "session complete");
    println!("✓ Simulation completed in {:.3}s", wall_s);
    print_summary(&record);

    if let Some(path) = output {
        std::fs::write(path, record.to_csv())?;
        println!("✓ Exported {} data points to {}", record.t.len(), path.display());
    }
    if let Some(path) = record_path {
        std::fs::write(path, serde_json::to_string_pretty(&record)?)?;
        println!("✓ Wrote session record to {}", path.display());
    }
    Ok(())
}

fn clear_progress_line() {
    print!("\r{}\r", " ".repeat(100));
    let _ = io::stdout().flush();
}

fn render_progress(p: &SessionProgress, elapsed_wall_s: f64) {
    let width = 28usize;
    let filled = ((p.fraction_complete * width as f64).round() as usize).min(width);
    let bar = format!(
        "{}{}",
        "#".repeat(filled),
        "-".repeat(width.saturating_sub(filled))
    );
    print!(
        "\r[{}] {:>6.2}%  t={:.3}/{:.3}s  step={}  elapsed={:.1}s",
        bar,
        p.fraction_complete * 100.0,
        p.sim_time_s,
        p.t_end_s,
        p.step,
        elapsed_wall_s
    );
    let _ = io::stdout().flush();
}

fn print_summary(record: &SessionRecord) {
    let stats = &record.stats;
    println!("\nSession summary:");
    println!("  Steps:            {}", stats.steps);
    println!("  Time points:      {}", record.t.len());
    println!("  Commands applied: {}", stats.commands_applied);
    println!("  Peak neutrons:    {:.4}", stats.peak_neutrons);
    println!("  Peak core heat:   {:.4}", stats.peak_reactor_heat);
    println!("  Peak tank heat:   {:.4}", stats.peak_tank_heat);
    println!("  Time in danger:   {:.3} s", stats.danger_time_s);

    if let Some(last) = record.last() {
        println!("\nFinal state:");
        println!(
            "  Core:  regime={:?} fuel={:.4} neutrons={:.4} heat={:.4} waste={:.4}",
            last.regime, last.fuel, last.neutrons, last.reactor_heat, last.waste
        );
        println!(
            "  Controls: fuel_valve={} blocked={} ignited={} venting={}",
            last.fuel_valve, last.fuel_valve_blocked, last.ignited, last.venting
        );
        println!(
            "  Tank:  water={:.4} valve={:.3} heat={:.4}",
            last.water, last.valve, last.tank_heat
        );
    }
}
