//! Slabs: planes thickened by a tolerance.

use nalgebra::Point3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::bounds::Aabb;
use crate::error::{GeometryError, GeometryResult};
use crate::plane::Plane;

/// Rectangle on a slab's plane spanning the in-plane extent of the points
/// that matched it.
///
/// Corners are ordered counter-clockwise around the slab normal, starting
/// from the `(min u, min v)` corner of the plane's in-plane basis.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SlabFootprint {
    /// The four corners, lying on the plane.
    pub corners: [Point3<f64>; 4],
}

impl SlabFootprint {
    /// Lengths of the two rectangle sides.
    #[must_use]
    pub fn dimensions(&self) -> (f64, f64) {
        let [a, b, _, d] = self.corners;
        ((b - a).norm(), (d - a).norm())
    }

    /// Area of the rectangle.
    #[must_use]
    pub fn area(&self) -> f64 {
        let (w, h) = self.dimensions();
        w * h
    }
}

/// A plane thickened symmetrically by `thickness`.
///
/// A point lies in the slab iff its perpendicular distance to the plane is at
/// most `thickness / 2`. The optional footprint is a by-product for display;
/// it never takes part in containment.
///
/// # Example
///
/// ```
/// use cloud_types::{GeometryError, Slab};
/// use nalgebra::Point3;
///
/// let slab = Slab::from_three_points(
///     &Point3::new(0.0, 0.0, 0.0),
///     &Point3::new(1.0, 0.0, 0.0),
///     &Point3::new(0.0, 1.0, 0.0),
///     0.2,
/// )
/// .unwrap();
///
/// assert!(slab.contains(&Point3::new(5.0, 5.0, 0.1)));
/// assert!(!slab.contains(&Point3::new(5.0, 5.0, 0.11)));
///
/// let p = Point3::new(1.0, 1.0, 1.0);
/// let err = Slab::from_three_points(&p, &p, &p, 0.2).unwrap_err();
/// assert_eq!(err, GeometryError::DegeneratePlane);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Slab {
    plane: Plane,
    thickness: f64,
    footprint: Option<SlabFootprint>,
}

impl Slab {
    /// Wraps a plane with a thickness.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::InvalidThickness`] if `thickness` is negative
    /// or not finite.
    pub fn new(plane: Plane, thickness: f64) -> GeometryResult<Self> {
        if !thickness.is_finite() || thickness < 0.0 {
            return Err(GeometryError::InvalidThickness(thickness));
        }
        Ok(Self {
            plane,
            thickness,
            footprint: None,
        })
    }

    /// Fits a plane through three points and thickens it.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::DegeneratePlane`] if the points are collinear
    /// within tolerance, or [`GeometryError::InvalidThickness`] for a bad
    /// thickness.
    pub fn from_three_points(
        p1: &Point3<f64>,
        p2: &Point3<f64>,
        p3: &Point3<f64>,
        thickness: f64,
    ) -> GeometryResult<Self> {
        let plane = Plane::from_points(p1, p2, p3).ok_or(GeometryError::DegeneratePlane)?;
        Self::new(plane, thickness)
    }

    /// The supporting plane.
    #[must_use]
    pub const fn plane(&self) -> &Plane {
        &self.plane
    }

    /// Full thickness of the slab.
    #[must_use]
    pub const fn thickness(&self) -> f64 {
        self.thickness
    }

    /// Distance from the plane to either slab face.
    #[inline]
    #[must_use]
    pub fn half_thickness(&self) -> f64 {
        0.5 * self.thickness
    }

    /// Perpendicular distance from a point to the supporting plane.
    #[inline]
    #[must_use]
    pub fn distance(&self, point: &Point3<f64>) -> f64 {
        self.plane.distance(point)
    }

    /// Returns true if the point lies within `thickness / 2` of the plane.
    #[inline]
    #[must_use]
    pub fn contains(&self, point: &Point3<f64>) -> bool {
        self.distance(point) <= self.half_thickness()
    }

    /// Returns true if some point of the box may lie in the slab.
    ///
    /// Conservative: a small relative margin is added so boxes touching the
    /// slab boundary are never rejected because of rounding.
    #[must_use]
    pub fn intersects_aabb(&self, aabb: &Aabb) -> bool {
        let (center_dist, radius, margin) = self.box_terms(aabb);
        center_dist <= self.half_thickness() + radius + margin
    }

    /// Returns true if every point of the box lies in the slab.
    ///
    /// Conservative in the other direction: boxes within rounding distance of
    /// the boundary report `false`.
    #[must_use]
    pub fn contains_aabb(&self, aabb: &Aabb) -> bool {
        let (center_dist, radius, margin) = self.box_terms(aabb);
        center_dist + radius + margin <= self.half_thickness()
    }

    /// Distance of the box centre to the plane, the box's projected half
    /// extent along the normal, and a rounding margin.
    fn box_terms(&self, aabb: &Aabb) -> (f64, f64, f64) {
        let center = aabb.center();
        let h = aabb.half_extent();
        let n = self.plane.normal;
        let radius = n.x.abs() * h.x + n.y.abs() * h.y + n.z.abs() * h.z;
        let center_dist = self.plane.distance(&center);
        let scale = 1.0 + center.coords.amax() + self.plane.point.coords.amax() + radius;
        (center_dist, radius, 1e-9 * scale)
    }

    /// The footprint computed by the last [`Self::update_corners`], if any.
    #[must_use]
    pub const fn footprint(&self) -> Option<&SlabFootprint> {
        self.footprint.as_ref()
    }

    /// Recomputes the footprint from a set of matched points.
    ///
    /// Points are projected onto the plane and the footprint becomes the
    /// bounding rectangle of the projections in the plane's in-plane basis.
    /// Plane and thickness are untouched; an empty set clears the footprint.
    /// Calling this twice with the same set yields the same footprint.
    ///
    /// # Example
    ///
    /// ```
    /// use cloud_types::Slab;
    /// use nalgebra::Point3;
    ///
    /// let mut slab = Slab::from_three_points(
    ///     &Point3::new(0.0, 0.0, 0.0),
    ///     &Point3::new(1.0, 0.0, 0.0),
    ///     &Point3::new(0.0, 1.0, 0.0),
    ///     0.1,
    /// )
    /// .unwrap();
    ///
    /// let matched = [
    ///     Point3::new(0.0, 0.0, 0.01),
    ///     Point3::new(2.0, 0.0, 0.0),
    ///     Point3::new(2.0, 3.0, -0.02),
    /// ];
    /// slab.update_corners(&matched);
    ///
    /// let area = slab.footprint().unwrap().area();
    /// assert!((area - 6.0).abs() < 1e-9);
    /// ```
    pub fn update_corners<'a>(&mut self, points: impl IntoIterator<Item = &'a Point3<f64>>) {
        let (u, v) = self.plane.in_plane_basis();
        let origin = self.plane.point;

        let mut u_range = (f64::INFINITY, f64::NEG_INFINITY);
        let mut v_range = (f64::INFINITY, f64::NEG_INFINITY);
        let mut any = false;
        for p in points {
            let rel = p - origin;
            let (pu, pv) = (rel.dot(&u), rel.dot(&v));
            u_range = (u_range.0.min(pu), u_range.1.max(pu));
            v_range = (v_range.0.min(pv), v_range.1.max(pv));
            any = true;
        }

        if !any {
            self.footprint = None;
            return;
        }

        let at = |a: f64, b: f64| origin + u * a + v * b;
        self.footprint = Some(SlabFootprint {
            corners: [
                at(u_range.0, v_range.0),
                at(u_range.1, v_range.0),
                at(u_range.1, v_range.1),
                at(u_range.0, v_range.1),
            ],
        });
    }
}
