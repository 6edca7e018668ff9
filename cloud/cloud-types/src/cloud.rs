//! Point cloud arena.

use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::bounds::Aabb;
use crate::error::{CloudError, CloudResult};
use crate::point::{CloudPoint, PointId};

/// An insertion-ordered collection of points.
///
/// The cloud owns point storage. Other components refer to points through
/// [`PointId`] handles, which are indices into this arena.
///
/// # Example
///
/// ```
/// use cloud_types::{PointCloud, PointId};
///
/// let mut cloud = PointCloud::new();
/// let a = cloud.push_coords(0.0, 0.0, 0.0);
/// let b = cloud.push_coords(1.0, 0.0, 0.0);
///
/// cloud.set_active(a, false);
/// assert_eq!(cloud.active_ids(), vec![b]);
///
/// cloud.set_all_active(true);
/// assert_eq!(cloud.active_count(), 2);
/// ```
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawPointCloud"))]
pub struct PointCloud {
    points: Vec<CloudPoint>,
}

/// Unchecked serialized form, validated through [`PointCloud::from_points`].
#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct RawPointCloud {
    points: Vec<CloudPoint>,
}

#[cfg(feature = "serde")]
impl TryFrom<RawPointCloud> for PointCloud {
    type Error = CloudError;

    fn try_from(raw: RawPointCloud) -> CloudResult<Self> {
        Self::from_points(raw.points)
    }
}

impl PointCloud {
    /// Creates an empty point cloud.
    #[must_use]
    pub const fn new() -> Self {
        Self { points: Vec::new() }
    }

    /// Creates a point cloud with pre-allocated capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            points: Vec::with_capacity(capacity),
        }
    }

    /// Wraps an existing vector of points.
    ///
    /// # Errors
    ///
    /// Returns [`CloudError::TooManyPoints`] if the points cannot all be
    /// addressed by a [`PointId`].
    pub fn from_points(points: Vec<CloudPoint>) -> CloudResult<Self> {
        if u32::try_from(points.len()).is_err() {
            return Err(CloudError::TooManyPoints(points.len()));
        }
        Ok(Self { points })
    }

    /// Creates a cloud of active points with zero normals.
    ///
    /// # Errors
    ///
    /// Returns [`CloudError::TooManyPoints`] if the positions cannot all be
    /// addressed by a [`PointId`].
    pub fn from_positions(positions: &[Point3<f64>]) -> CloudResult<Self> {
        Self::from_points(positions.iter().map(|p| CloudPoint::new(*p)).collect())
    }

    /// Creates a cloud from parallel position and normal slices.
    ///
    /// # Errors
    ///
    /// Returns [`CloudError::LengthMismatch`] if the slices differ in length.
    ///
    /// # Example
    ///
    /// ```
    /// use cloud_types::{CloudError, PointCloud};
    /// use nalgebra::{Point3, Vector3};
    ///
    /// let positions = [Point3::origin(), Point3::new(1.0, 0.0, 0.0)];
    /// let normals = [Vector3::z()];
    /// let err = PointCloud::from_positions_and_normals(&positions, &normals).unwrap_err();
    /// assert!(matches!(err, CloudError::LengthMismatch { positions: 2, normals: 1 }));
    /// ```
    pub fn from_positions_and_normals(
        positions: &[Point3<f64>],
        normals: &[Vector3<f64>],
    ) -> CloudResult<Self> {
        if positions.len() != normals.len() {
            return Err(CloudError::LengthMismatch {
                positions: positions.len(),
                normals: normals.len(),
            });
        }
        let points = positions
            .iter()
            .zip(normals)
            .map(|(p, n)| CloudPoint::with_normal(*p, *n))
            .collect();
        Self::from_points(points)
    }

    /// Returns the number of points in the cloud.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns true if the cloud has no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Appends a point and returns its handle.
    ///
    /// # Errors
    ///
    /// Returns [`CloudError::TooManyPoints`] if the cloud already holds
    /// `u32::MAX` points.
    pub fn try_push(&mut self, point: CloudPoint) -> CloudResult<PointId> {
        let index = u32::try_from(self.points.len())
            .ok()
            .filter(|&index| index < u32::MAX)
            .ok_or(CloudError::TooManyPoints(self.points.len() + 1))?;
        self.points.push(point);
        Ok(PointId::new(index))
    }

    /// Appends a point and returns its handle.
    ///
    /// This is the only panicking way to grow a cloud; use
    /// [`Self::try_push`] where the `u32` limit can be reached.
    ///
    /// # Panics
    ///
    /// Panics if the cloud already holds `u32::MAX` points.
    pub fn push(&mut self, point: CloudPoint) -> PointId {
        match self.try_push(point) {
            Ok(id) => id,
            Err(err) => panic!("{err}"),
        }
    }

    /// Appends an active point at the given coordinates.
    pub fn push_coords(&mut self, x: f64, y: f64, z: f64) -> PointId {
        self.push(CloudPoint::from_coords(x, y, z))
    }

    /// Returns the point behind a handle, if it exists.
    #[must_use]
    pub fn get(&self, id: PointId) -> Option<&CloudPoint> {
        self.points.get(id.index())
    }

    /// Returns the position behind a handle.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not belong to this cloud.
    #[inline]
    #[must_use]
    pub fn position(&self, id: PointId) -> &Point3<f64> {
        &self.points[id.index()].position
    }

    /// Returns true if the point exists and is active.
    #[must_use]
    pub fn is_active(&self, id: PointId) -> bool {
        self.get(id).is_some_and(CloudPoint::is_active)
    }

    /// Sets the active flag of a point. Unknown handles are ignored.
    pub fn set_active(&mut self, id: PointId, active: bool) {
        if let Some(point) = self.points.get_mut(id.index()) {
            point.set_active(active);
        }
    }

    /// Sets the active flag of every point.
    pub fn set_all_active(&mut self, active: bool) {
        for point in &mut self.points {
            point.set_active(active);
        }
    }

    /// Number of active points.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.points.iter().filter(|p| p.is_active()).count()
    }

    /// Handles of all active points, in insertion order.
    #[must_use]
    pub fn active_ids(&self) -> Vec<PointId> {
        self.iter()
            .filter(|(_, p)| p.is_active())
            .map(|(id, _)| id)
            .collect()
    }

    /// Handles of all points, in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = PointId> + '_ {
        self.iter().map(|(id, _)| id)
    }

    /// Iterates over `(handle, point)` pairs in insertion order.
    // Every constructor and `try_push` keep the length within u32 range.
    #[allow(clippy::cast_possible_truncation)]
    pub fn iter(&self) -> impl Iterator<Item = (PointId, &CloudPoint)> + '_ {
        self.points
            .iter()
            .enumerate()
            .map(|(i, p)| (PointId::new(i as u32), p))
    }

    /// Borrow all points as a slice.
    #[must_use]
    pub fn points(&self) -> &[CloudPoint] {
        &self.points
    }

    /// Returns true if any point has a non-zero normal.
    #[must_use]
    pub fn has_normals(&self) -> bool {
        self.points.iter().any(CloudPoint::has_normal)
    }

    /// Axis-aligned bounds of every point, `None` for an empty cloud.
    #[must_use]
    pub fn bounds(&self) -> Option<Aabb> {
        if self.points.is_empty() {
            return None;
        }
        Some(Aabb::from_points(self.points.iter().map(|p| &p.position)))
    }
}

impl<'a> IntoIterator for &'a PointCloud {
    type Item = &'a CloudPoint;
    type IntoIter = std::slice::Iter<'a, CloudPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}
