//! vina-dock - front-end for the docking job runner
//!
//! Collects a receptor, a ligand and the docking box, hands them to the
//! runner and renders the tool's report or the failure reason.
//!
//! ## Commands
//!
//! - `dock`: Stage inputs and run one docking job
//! - `check`: Locate the docking tool and print its version
//! - `config`: Print the effective configuration

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{info, Level};

use vina_runner::{
    DockingBox, DockingError, DockingReport, DockingResult, DockingRunner, JobRecord,
    RunnerConfig, Vec3, DEFAULT_CENTER, DEFAULT_SIZE,
};

#[derive(Parser)]
#[command(name = "vina-dock")]
#[command(author = "Stevedores Org")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Molecular docking with AutoDock Vina", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines and results
    #[arg(long, global = true)]
    json: bool,

    /// Path to the docking executable
    #[arg(long, global = true, env = "VINA_PATH")]
    tool: Option<PathBuf>,

    /// TOML configuration file
    #[arg(long, global = true, env = "VINA_DOCK_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one docking job
    Dock(DockArgs),

    /// Locate the docking tool and print its version
    Check,

    /// Print the effective configuration as TOML
    Config,
}

#[derive(Args)]
struct DockArgs {
    /// Receptor structure (PDBQT)
    #[arg(long)]
    receptor: PathBuf,

    /// Ligand structure (PDBQT)
    #[arg(long)]
    ligand: PathBuf,

    /// Box center X (Å)
    #[arg(long, default_value_t = DEFAULT_CENTER, allow_negative_numbers = true)]
    center_x: f64,

    /// Box center Y (Å)
    #[arg(long, default_value_t = DEFAULT_CENTER, allow_negative_numbers = true)]
    center_y: f64,

    /// Box center Z (Å)
    #[arg(long, default_value_t = DEFAULT_CENTER, allow_negative_numbers = true)]
    center_z: f64,

    /// Box size X (Å)
    #[arg(long, default_value_t = DEFAULT_SIZE, allow_negative_numbers = true)]
    size_x: f64,

    /// Box size Y (Å)
    #[arg(long, default_value_t = DEFAULT_SIZE, allow_negative_numbers = true)]
    size_y: f64,

    /// Box size Z (Å)
    #[arg(long, default_value_t = DEFAULT_SIZE, allow_negative_numbers = true)]
    size_z: f64,

    /// Kill the tool after this many seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Working directory for staged inputs, output and log
    #[arg(long)]
    work_dir: Option<PathBuf>,

    /// Output file name for docked poses
    #[arg(long)]
    out: Option<PathBuf>,

    /// Log file name
    #[arg(long)]
    log: Option<PathBuf>,

    /// Print the parsed binding-mode table instead of the raw output
    #[arg(long)]
    summary: bool,
}

impl DockArgs {
    fn docking_box(&self) -> DockingBox {
        DockingBox {
            center: Vec3::new(self.center_x, self.center_y, self.center_z),
            size: Vec3::new(self.size_x, self.size_y, self.size_z),
        }
    }

    fn apply(&self, mut config: RunnerConfig) -> RunnerConfig {
        if let Some(work_dir) = &self.work_dir {
            config.work_dir = work_dir.clone();
        }
        if let Some(out) = &self.out {
            config.output_file = out.clone();
        }
        if let Some(log) = &self.log {
            config.log_file = log.clone();
        }
        if let Some(timeout) = self.timeout {
            config.timeout_secs = Some(timeout);
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    vina_runner::init_tracing(cli.json, level);

    let config = base_config(cli.config.as_deref(), cli.tool.as_deref())?;

    match &cli.command {
        Commands::Dock(args) => cmd_dock(args.apply(config), args, cli.json).await,
        Commands::Check => cmd_check(config).await,
        Commands::Config => cmd_config(&config),
    }
}

/// Config file (or defaults), then the `--tool` / `VINA_PATH` override.
fn base_config(config_path: Option<&Path>, tool: Option<&Path>) -> Result<RunnerConfig> {
    let mut config = match config_path {
        Some(path) => RunnerConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => RunnerConfig::default(),
    };
    if let Some(tool) = tool {
        config.tool_path = tool.to_path_buf();
    }
    Ok(config)
}

#[derive(Serialize)]
struct DockOutput<'a> {
    #[serde(flatten)]
    record: &'a JobRecord,
    report: Option<DockingReport>,
}

/// Stage the uploads, run the job and render its result
async fn cmd_dock(config: RunnerConfig, args: &DockArgs, json: bool) -> Result<ExitCode> {
    let runner = DockingRunner::new(config);

    let uploads = read_upload("receptor", &args.receptor)
        .and_then(|receptor| Ok((receptor, read_upload("ligand", &args.ligand)?)));

    let record = match uploads {
        Ok((receptor, ligand)) => {
            info!(tool = %runner.tool(), "Running docking... please wait");
            runner
                .submit_uploads(&receptor, &ligand, args.docking_box())
                .await
        }
        Err(err) => JobRecord::rejected(err),
    };

    if json {
        let output = DockOutput {
            record: &record,
            report: record.result.report(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(exit_code(&record.result));
    }

    match &record.result {
        DockingResult::Success { raw_output } => {
            println!("Docking completed successfully!");
            println!();
            if args.summary {
                print_summary(&DockingReport::parse(raw_output));
            } else {
                println!("{}", raw_output.trim_end());
            }
        }
        DockingResult::Failure { kind, reason } => {
            eprintln!("Docking failed ({kind}): {reason}");
        }
    }

    Ok(exit_code(&record.result))
}

/// Read an upload; an unreadable file fails the job like any other bad input.
fn read_upload(label: &str, path: &Path) -> vina_runner::Result<Vec<u8>> {
    std::fs::read(path).map_err(|e| {
        DockingError::Validation(format!("cannot read {label} file {}: {e}", path.display()))
    })
}

fn print_summary(report: &DockingReport) {
    if report.is_empty() {
        println!("No binding modes found in tool output.");
        return;
    }
    if let Some(seed) = report.seed {
        println!("Random seed: {}", seed);
    }
    println!("mode | affinity (kcal/mol) | rmsd l.b. | rmsd u.b.");
    println!("-----+---------------------+-----------+----------");
    for mode in &report.modes {
        println!(
            "{:>4} | {:>19.1} | {:>9.3} | {:>9.3}",
            mode.mode, mode.affinity, mode.rmsd_lb, mode.rmsd_ub
        );
    }
    if let Some(best) = report.best() {
        println!();
        println!("Best affinity: {:.1} kcal/mol (mode {})", best.affinity, best.mode);
    }
}

/// Locate the tool and print its version
async fn cmd_check(config: RunnerConfig) -> Result<ExitCode> {
    let runner = DockingRunner::new(config);

    println!("Docking tool: {}", runner.tool());
    match runner.tool().probe_version().await {
        Ok(version) => {
            println!("Status: available");
            println!("Version: {}", version);
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            println!("Status: unavailable");
            eprintln!("{}", err);
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Print the effective configuration
fn cmd_config(config: &RunnerConfig) -> Result<ExitCode> {
    let text = config
        .to_toml_string()
        .context("Failed to render configuration")?;
    print!("{}", text);
    Ok(ExitCode::SUCCESS)
}

fn exit_code(result: &DockingResult) -> ExitCode {
    if result.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
