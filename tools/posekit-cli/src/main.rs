//! PoseKit CLI — Batch pose estimation over image directories.
//!
//! Usage:
//!   posekit process [OPTIONS]     Run the MediaPipe worker over every image
//!   posekit openpose [OPTIONS]    Hand the directory to an OpenPose executable
//!   posekit inspect <FILE>        Show a landmark dump
//!   posekit check                 Check which backends are available
//!   posekit config [--write]      Show or write the configuration

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use posekit_common::config::AppConfig;

mod commands;

#[derive(Parser)]
#[command(
    name = "posekit",
    about = "Batch pose estimation over image directories",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to $XDG_CONFIG_HOME/posekit/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Estimate poses image by image and render skeleton overlays
    Process {
        /// Directory of input images
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output directory (default: <input>/output2)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Worker command speaking the estimator line protocol
        #[arg(long, num_args = 1.., allow_hyphen_values = true)]
        worker: Option<Vec<String>>,

        /// Do not request or blend segmentation masks
        #[arg(long)]
        no_segmentation: bool,
    },

    /// Run an OpenPose executable once over the whole directory
    Openpose {
        /// Directory of input images
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output directory (default: <input>/output)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Explicit OpenPose executable, checked before the built-in locations
        #[arg(long)]
        binary: Option<PathBuf>,
    },

    /// Show the contents of a landmark dump
    Inspect {
        /// Path to a landmarks_*.txt file
        path: PathBuf,
    },

    /// Check backend availability
    Check,

    /// Show the effective configuration
    Config {
        /// Write the effective configuration to the config file
        #[arg(long)]
        write: bool,
    },
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from(path),
        None => AppConfig::load(),
    };

    // Initialize logging
    let mut logging = config.logging.clone();
    if cli.verbose {
        logging.level = "debug".to_string();
    }
    posekit_common::logging::init_logging(&logging);
    tracing::debug!(config = ?cli.config, "Configuration loaded");

    match cli.command {
        Commands::Process {
            input,
            output,
            worker,
            no_segmentation,
        } => {
            if let Some(worker) = worker {
                config.processor.worker = worker;
            }
            if no_segmentation {
                config.processor.estimator.enable_segmentation = false;
            }
            commands::process::run(&config, input, output)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Openpose {
            input,
            output,
            binary,
        } => commands::openpose::run(&config, input, output, binary),
        Commands::Inspect { path } => {
            commands::inspect::run(path)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Check => {
            commands::check::run(&config);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Config { write } => {
            commands::config::run(&config, cli.config, write)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
