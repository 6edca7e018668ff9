//! Point cloud file I/O.
//!
//! Loads and saves [`PointCloud`]s in the XYZ text format:
//!
//! ```text
//! x y z
//! x y z nx ny nz
//! ```
//!
//! The loader is all-or-nothing: a malformed record fails the whole load with
//! [`IoError::Parse`], so detection never runs on a partially read cloud.
//!
//! # Example
//!
//! ```no_run
//! use cloud_io::{load_cloud, save_cloud};
//!
//! let cloud = load_cloud("scan.xyz").unwrap();
//! save_cloud(&cloud, "copy.xyz").unwrap();
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod error;
mod xyz;

pub use error::{IoError, IoResult};
pub use xyz::{load_xyz, read_xyz, save_xyz, write_xyz};

use std::path::Path;

use cloud_types::PointCloud;

/// Supported point cloud file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointCloudFormat {
    /// Whitespace-separated ASCII records.
    Xyz,
}

impl PointCloudFormat {
    /// Detects the format from a file extension.
    ///
    /// # Example
    ///
    /// ```
    /// use cloud_io::PointCloudFormat;
    ///
    /// assert_eq!(PointCloudFormat::from_extension("XYZ"), Some(PointCloudFormat::Xyz));
    /// assert_eq!(PointCloudFormat::from_extension("ply"), None);
    /// ```
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "xyz" | "txt" | "pts" => Some(Self::Xyz),
            _ => None,
        }
    }

    /// Detects the format from a file path.
    #[must_use]
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }
}

fn detect_format(path: &Path) -> IoResult<PointCloudFormat> {
    PointCloudFormat::from_path(path).ok_or_else(|| IoError::UnsupportedFormat {
        extension: path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_string(),
    })
}

/// Loads a point cloud, picking the format from the file extension.
///
/// # Errors
///
/// Returns [`IoError::UnsupportedFormat`] for unknown extensions, otherwise
/// whatever the format loader reports.
pub fn load_cloud<P: AsRef<Path>>(path: P) -> IoResult<PointCloud> {
    let path = path.as_ref();
    match detect_format(path)? {
        PointCloudFormat::Xyz => load_xyz(path),
    }
}

/// Saves a point cloud, picking the format from the file extension.
///
/// # Errors
///
/// Returns [`IoError::UnsupportedFormat`] for unknown extensions, otherwise
/// whatever the format writer reports.
pub fn save_cloud<P: AsRef<Path>>(cloud: &PointCloud, path: P) -> IoResult<()> {
    let path = path.as_ref();
    match detect_format(path)? {
        PointCloudFormat::Xyz => save_xyz(cloud, path),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            PointCloudFormat::from_path("/data/scan.pts"),
            Some(PointCloudFormat::Xyz)
        );
        assert_eq!(
            PointCloudFormat::from_path("points.TXT"),
            Some(PointCloudFormat::Xyz)
        );
        assert_eq!(PointCloudFormat::from_path("noextension"), None);
    }

    #[test]
    fn test_unsupported_format() {
        let result = load_cloud("scan.las");
        assert!(matches!(
            result,
            Err(IoError::UnsupportedFormat { ref extension }) if extension == "las"
        ));
    }

    #[test]
    fn test_save_and_load_by_extension() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cloud.txt");
        let mut cloud = PointCloud::new();
        cloud.push_coords(1.0, 2.0, 3.0);

        save_cloud(&cloud, &path).unwrap();
        let loaded = load_cloud(&path).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded.points()[0].position, cloud.points()[0].position);
    }
}
