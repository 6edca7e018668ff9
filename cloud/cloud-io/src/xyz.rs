//! XYZ text format.
//!
//! One point per line, either `x y z` or `x y z nx ny nz`, whitespace
//! separated. Blank lines and lines starting with `#` are skipped. A missing
//! normal becomes the zero vector.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use cloud_types::{CloudPoint, PointCloud};
use nalgebra::{Point3, Vector3};
use tracing::debug;

use crate::error::{IoError, IoResult};

/// Loads a point cloud from an XYZ file.
///
/// All loaded points are active. Any malformed line aborts the load, so the
/// caller never sees a partially read cloud.
///
/// # Errors
///
/// Returns [`IoError::Io`] if the file cannot be read and [`IoError::Parse`]
/// for the first malformed record.
pub fn load_xyz<P: AsRef<Path>>(path: P) -> IoResult<PointCloud> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let cloud = read_xyz(BufReader::new(file))?;
    debug!(path = %path.display(), points = cloud.len(), "Loaded XYZ point cloud");
    Ok(cloud)
}

/// Saves a point cloud to an XYZ file, always writing six columns.
///
/// # Errors
///
/// Returns [`IoError::Io`] if the file cannot be written.
pub fn save_xyz<P: AsRef<Path>>(cloud: &PointCloud, path: P) -> IoResult<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_xyz(cloud, &mut writer)?;
    writer.flush()?;
    debug!(path = %path.display(), points = cloud.len(), "Saved XYZ point cloud");
    Ok(())
}

/// Reads XYZ records from any buffered reader.
///
/// # Errors
///
/// Returns [`IoError::Parse`] for the first malformed record.
///
/// # Example
///
/// ```
/// use cloud_io::read_xyz;
///
/// let text = "0 0 0\n1 0 0 0 0 1\n";
/// let cloud = read_xyz(text.as_bytes()).unwrap();
/// assert_eq!(cloud.len(), 2);
/// assert!(!cloud.points()[0].has_normal());
/// assert!(cloud.points()[1].has_normal());
///
/// assert!(read_xyz("0 0\n".as_bytes()).is_err());
/// ```
pub fn read_xyz<R: BufRead>(reader: R) -> IoResult<PointCloud> {
    let mut points = Vec::new();

    for (line_idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let point = parse_record(line).map_err(|reason| IoError::Parse {
            line: line_idx + 1,
            index: points.len(),
            reason,
        })?;
        points.push(point);
    }

    Ok(PointCloud::from_points(points)?)
}

/// Writes a point cloud as XYZ records.
///
/// Every record carries a normal (zero if unknown). Values use Rust's
/// shortest round-trip formatting, so reading the output back reproduces the
/// same `f64` values.
///
/// # Errors
///
/// Returns [`IoError::Io`] if the writer fails.
pub fn write_xyz<W: Write>(cloud: &PointCloud, mut writer: W) -> IoResult<()> {
    writeln!(writer, "# x y z nx ny nz")?;
    for point in cloud {
        let p = &point.position;
        let n = &point.normal;
        writeln!(writer, "{} {} {} {} {} {}", p.x, p.y, p.z, n.x, n.y, n.z)?;
    }
    Ok(())
}

fn parse_record(line: &str) -> Result<CloudPoint, String> {
    let values = line
        .split_whitespace()
        .map(|token| match token.parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(v),
            Ok(_) => Err(format!("non-finite value '{token}'")),
            Err(_) => Err(format!("invalid number '{token}'")),
        })
        .collect::<Result<Vec<f64>, String>>()?;

    match values.as_slice() {
        &[x, y, z] => Ok(CloudPoint::new(Point3::new(x, y, z))),
        &[x, y, z, nx, ny, nz] => Ok(CloudPoint::with_normal(
            Point3::new(x, y, z),
            Vector3::new(nx, ny, nz),
        )),
        other => Err(format!("expected 3 or 6 values, found {}", other.len())),
    }
}
