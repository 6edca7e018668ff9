//! Plane representation for surface fitting.

use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Relative tolerance on `|(p1 - p0) × (p2 - p0)|` below which three points
/// count as collinear.
const COLLINEAR_TOLERANCE: f64 = 1e-12;

/// A plane in 3D space defined by a point and normal.
///
/// The plane equation is: `normal · (p - point) = 0`
/// or equivalently: `normal · p = d` where `d = normal · point`
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Plane {
    /// A point on the plane.
    pub point: Point3<f64>,
    /// The plane normal (unit vector).
    pub normal: Vector3<f64>,
}

impl Plane {
    /// Create a new plane from a point and normal.
    ///
    /// The normal is normalized. Returns `None` if it is (numerically) zero
    /// or not finite.
    #[must_use]
    pub fn new(point: Point3<f64>, normal: Vector3<f64>) -> Option<Self> {
        let norm = normal.norm();
        if !norm.is_finite() || norm < f64::EPSILON {
            return None;
        }
        Some(Self {
            point,
            normal: normal / norm,
        })
    }

    /// Create a plane from three non-collinear points.
    ///
    /// The normal is `(p1 - p0) × (p2 - p0)`, normalized. Returns `None` when
    /// the points are collinear or coincident.
    ///
    /// # Example
    ///
    /// ```
    /// use cloud_types::Plane;
    /// use nalgebra::Point3;
    ///
    /// let plane = Plane::from_points(
    ///     &Point3::new(0.0, 0.0, 1.0),
    ///     &Point3::new(1.0, 0.0, 1.0),
    ///     &Point3::new(0.0, 1.0, 1.0),
    /// )
    /// .unwrap();
    /// assert!((plane.d() - 1.0).abs() < 1e-12);
    ///
    /// let line = Plane::from_points(
    ///     &Point3::new(0.0, 0.0, 0.0),
    ///     &Point3::new(1.0, 1.0, 1.0),
    ///     &Point3::new(2.0, 2.0, 2.0),
    /// );
    /// assert!(line.is_none());
    /// ```
    #[must_use]
    pub fn from_points(p0: &Point3<f64>, p1: &Point3<f64>, p2: &Point3<f64>) -> Option<Self> {
        let v1 = p1 - p0;
        let v2 = p2 - p0;
        let normal = v1.cross(&v2);
        let scale = v1.norm() * v2.norm();
        if normal.norm() <= COLLINEAR_TOLERANCE * scale {
            return None;
        }
        Self::new(*p0, normal)
    }

    /// Signed distance from a point to the plane.
    ///
    /// Positive on the side the normal points to.
    #[inline]
    #[must_use]
    pub fn signed_distance(&self, point: &Point3<f64>) -> f64 {
        self.normal.dot(&(point - self.point))
    }

    /// Absolute (perpendicular) distance from a point to the plane.
    #[inline]
    #[must_use]
    pub fn distance(&self, point: &Point3<f64>) -> f64 {
        self.signed_distance(point).abs()
    }

    /// Project a point onto the plane.
    #[must_use]
    pub fn project(&self, point: &Point3<f64>) -> Point3<f64> {
        point - self.signed_distance(point) * self.normal
    }

    /// Get the plane constant `d` where the plane equation is `n · p = d`.
    #[must_use]
    pub fn d(&self) -> f64 {
        self.normal.dot(&self.point.coords)
    }

    /// Two unit vectors spanning the plane, orthogonal to each other and to
    /// the normal.
    #[must_use]
    pub fn in_plane_basis(&self) -> (Vector3<f64>, Vector3<f64>) {
        let n = self.normal;
        // Seed with the world axis least aligned with the normal.
        let seed = if n.x.abs() <= n.y.abs() && n.x.abs() <= n.z.abs() {
            Vector3::x()
        } else if n.y.abs() <= n.z.abs() {
            Vector3::y()
        } else {
            Vector3::z()
        };
        let u = n.cross(&seed).normalize();
        let v = n.cross(&u);
        (u, v)
    }
}

/// Create a default plane (Z=0) for testing fallback scenarios.
#[cfg(test)]
fn default_plane() -> Plane {
    Plane {
        point: Point3::origin(),
        normal: Vector3::z(),
    }
}
