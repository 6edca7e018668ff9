//! Human-readable and JSON summaries of a detection run.

use std::fmt::Write as _;

use cloud_planes::{DetectParams, DetectedPlane, RunStats};
use cloud_types::{Point3, PointCloud};
use serde::Serialize;

/// One extracted plane, flattened for output.
#[derive(Debug, Clone, Serialize)]
pub struct PlaneSummary {
    /// Extraction order, starting at 0.
    pub index: usize,
    /// Number of matched points.
    pub count: usize,
    /// Unit normal.
    pub normal: [f64; 3],
    /// Plane offset `d` in `n · p = d`.
    pub offset: f64,
    /// Full slab thickness.
    pub thickness: f64,
    /// Footprint corners, counter-clockwise around the normal.
    pub corners: Option<[[f64; 3]; 4]>,
}

impl PlaneSummary {
    fn from_detected(index: usize, plane: &DetectedPlane) -> Self {
        let normal = plane.slab.plane().normal;
        Self {
            index,
            count: plane.count(),
            normal: [normal.x, normal.y, normal.z],
            offset: plane.slab.plane().d(),
            thickness: plane.slab.thickness(),
            corners: plane
                .slab
                .footprint()
                .map(|footprint| footprint.corners.map(|c| coords(&c))),
        }
    }
}

/// Everything `slabfit detect` reports.
#[derive(Debug, Clone, Serialize)]
pub struct DetectionSummary {
    /// Input file as given on the command line.
    pub input: String,
    /// Total number of points loaded.
    pub points: usize,
    /// Parameters the run used.
    pub params: DetectParams,
    /// Planes in extraction order.
    pub planes: Vec<PlaneSummary>,
    /// Points left unattributed.
    pub unmatched: usize,
    /// Detector counters.
    pub stats: RunStats,
}

impl DetectionSummary {
    /// Summarise a finished run. `cloud` must be the cloud the run mutated.
    pub fn new(
        input: String,
        cloud: &PointCloud,
        params: DetectParams,
        planes: &[DetectedPlane],
        stats: RunStats,
    ) -> Self {
        Self {
            input,
            points: cloud.len(),
            params,
            planes: planes
                .iter()
                .enumerate()
                .map(|(index, plane)| PlaneSummary::from_detected(index, plane))
                .collect(),
            unmatched: cloud.active_count(),
            stats,
        }
    }

    /// Multi-line text report.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}: {} points", self.input, self.points);
        for plane in &self.planes {
            let [nx, ny, nz] = plane.normal;
            let _ = writeln!(
                out,
                "plane {}: {} points, normal ({nx:.4}, {ny:.4}, {nz:.4}), offset {:.4}",
                plane.index, plane.count, plane.offset
            );
            if let Some(corners) = plane.corners {
                let corners: Vec<String> = corners
                    .iter()
                    .map(|[x, y, z]| format!("({x:.3}, {y:.3}, {z:.3})"))
                    .collect();
                let _ = writeln!(out, "  corners: {}", corners.join(" "));
            }
        }
        let _ = writeln!(
            out,
            "{} plane(s), {} of {} points unmatched",
            self.planes.len(),
            self.unmatched,
            self.points
        );
        out
    }
}

/// Text report for `slabfit info`.
pub fn render_info(input: &str, cloud: &PointCloud) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{input}: {} points", cloud.len());
    let _ = writeln!(
        out,
        "normals: {}",
        if cloud.has_normals() { "yes" } else { "no" }
    );
    match cloud.bounds() {
        Some(bounds) => {
            let [x0, y0, z0] = coords(&bounds.min);
            let [x1, y1, z1] = coords(&bounds.max);
            let _ = writeln!(
                out,
                "bounds: ({x0:.3}, {y0:.3}, {z0:.3}) .. ({x1:.3}, {y1:.3}, {z1:.3})"
            );
        }
        None => {
            let _ = writeln!(out, "bounds: empty");
        }
    }
    out
}

fn coords(p: &Point3<f64>) -> [f64; 3] {
    [p.x, p.y, p.z]
}
