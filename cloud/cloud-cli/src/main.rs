//! slabfit - plane extraction for point clouds
//!
//! Loads an XYZ point cloud and extracts its dominant planes with slab-based
//! RANSAC.
//!
//! # Commands
//!
//! - `slabfit detect scan.xyz` - Extract planes and print a summary
//! - `slabfit detect scan.xyz --json` - Same, as JSON
//! - `slabfit info scan.xyz` - Point count, normals and bounds
//!
//! Logging goes to stderr and is controlled by `RUST_LOG`
//! (default `slabfit=info,cloud_planes=info`).

mod config;
mod report;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use cloud_planes::PlaneDetector;
use tracing::info;
use tracing_subscriber::EnvFilter;

use report::DetectionSummary;

const DEFAULT_LOG_FILTER: &str = "slabfit=info,cloud_planes=info";

/// Extract planes from point clouds
#[derive(Parser)]
#[command(name = "slabfit")]
#[command(about = "Slab-based RANSAC plane extraction", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract planes and print one line per plane
    Detect(DetectArgs),

    /// Print point count, normal availability and bounds
    Info {
        /// Input point cloud (.xyz, .txt or .pts)
        #[arg(name = "INPUT")]
        input: PathBuf,
    },
}

/// Options for `slabfit detect`.
#[derive(Args, Debug)]
pub struct DetectArgs {
    /// Input point cloud (.xyz, .txt or .pts)
    #[arg(name = "INPUT")]
    pub input: PathBuf,

    /// Maximum number of planes to extract
    #[arg(long)]
    pub planes: Option<usize>,

    /// Sampled triplets per plane
    #[arg(long)]
    pub iterations: Option<usize>,

    /// Full slab thickness
    #[arg(long)]
    pub thickness: Option<f64>,

    /// A plane must match more than this many points
    #[arg(long)]
    pub min_points: Option<usize>,

    /// Random seed for reproducible runs
    #[arg(long)]
    pub seed: Option<u64>,

    /// TOML file with detection parameters; flags override its values
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Print the summary as JSON
    #[arg(long)]
    pub json: bool,
}

fn main() -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Detect(args) => run_detect(&args),
        Commands::Info { input } => run_info(&input),
    }
}

fn run_detect(args: &DetectArgs) -> Result<()> {
    let params = config::resolve_params(args)?;
    let mut cloud = cloud_io::load_cloud(&args.input)
        .with_context(|| format!("failed to load {}", args.input.display()))?;
    info!(path = %args.input.display(), points = cloud.len(), "Loaded point cloud");

    let mut detector = PlaneDetector::try_new(params.clone())?;
    let planes = detector.detect_planes(&mut cloud);

    let summary = DetectionSummary::new(
        args.input.display().to_string(),
        &cloud,
        params,
        &planes,
        *detector.last_run(),
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print!("{}", summary.render_text());
    }
    Ok(())
}

fn run_info(input: &std::path::Path) -> Result<()> {
    let cloud = cloud_io::load_cloud(input)
        .with_context(|| format!("failed to load {}", input.display()))?;
    print!("{}", report::render_info(&input.display().to_string(), &cloud));
    Ok(())
}
