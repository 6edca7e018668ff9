//! Detection parameters from TOML files and command-line flags.

use std::path::Path;

use anyhow::{Context, Result};
use cloud_planes::DetectParams;
use tracing::info;

use crate::DetectArgs;

/// Load parameters from a TOML file. Missing keys keep their defaults.
pub fn load_params(path: &Path) -> Result<DetectParams> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    let params: DetectParams = toml::from_str(&content)
        .with_context(|| format!("invalid config file {}", path.display()))?;
    info!(path = %path.display(), "Loaded detection parameters");
    Ok(params)
}

/// Resolve the parameters for a run: file (or defaults), then flags.
pub fn resolve_params(args: &DetectArgs) -> Result<DetectParams> {
    let base = match args.config {
        Some(ref path) => load_params(path)?,
        None => DetectParams::default(),
    };
    Ok(apply_overrides(base, args))
}

/// Explicit flags win over file values.
pub fn apply_overrides(mut params: DetectParams, args: &DetectArgs) -> DetectParams {
    if let Some(planes) = args.planes {
        params.max_planes = planes;
    }
    if let Some(iterations) = args.iterations {
        params.iterations = iterations;
    }
    if let Some(thickness) = args.thickness {
        params.slab_thickness = thickness;
    }
    if let Some(min_points) = args.min_points {
        params.min_points = min_points;
    }
    if let Some(seed) = args.seed {
        params.seed = Some(seed);
    }
    params
}
