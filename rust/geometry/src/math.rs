// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Vector, plane, ray and bounds helpers shared by the builders and the scene.

use nalgebra::{Matrix4, Point3, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

/// Magnitude below which a vector is treated as zero-length
pub const NORMALIZE_EPSILON: f64 = 1e-12;

/// Normalize `v`, returning `None` for (near) zero-length vectors
#[inline]
pub fn try_normalize(v: &Vector3<f64>) -> Option<Vector3<f64>> {
    v.try_normalize(NORMALIZE_EPSILON)
}

/// Normalize `v`, substituting `fallback` for (near) zero-length vectors
#[inline]
pub fn normalize_or(v: &Vector3<f64>, fallback: Vector3<f64>) -> Vector3<f64> {
    try_normalize(v).unwrap_or(fallback)
}

/// Plane defined by a point and a unit normal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    /// Point on the plane
    pub point: Point3<f64>,
    /// Normal vector (normalized)
    pub normal: Vector3<f64>,
}

impl Plane {
    /// Create a plane through `point`; `None` if `normal` is zero-length
    pub fn new(point: Point3<f64>, normal: Vector3<f64>) -> Option<Self> {
        try_normalize(&normal).map(|normal| Self { point, normal })
    }

    /// Signed distance from point to plane
    /// Positive = in front, Negative = behind
    #[inline]
    pub fn signed_distance(&self, point: &Point3<f64>) -> f64 {
        (point - self.point).dot(&self.normal)
    }

    /// Distance along `ray` to the plane
    ///
    /// Negative when the plane lies behind the ray origin. `None` when the
    /// ray runs parallel to the plane.
    pub fn raycast(&self, ray: &Ray) -> Option<f64> {
        let denom = ray.direction.dot(&self.normal);
        if denom.abs() < NORMALIZE_EPSILON {
            return None;
        }
        Some((self.point - ray.origin).dot(&self.normal) / denom)
    }
}

/// Half-line with an origin and a direction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Point3<f64>,
    pub direction: Vector3<f64>,
}

impl Ray {
    #[inline]
    pub fn new(origin: Point3<f64>, direction: Vector3<f64>) -> Self {
        Self { origin, direction }
    }

    /// Point at distance `t` along the ray
    #[inline]
    pub fn point_at(&self, t: f64) -> Point3<f64> {
        self.origin + self.direction * t
    }
}

/// Axis-aligned bounding box stored as centre and half-extents
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub center: Point3<f64>,
    pub extents: Vector3<f64>,
}

impl Bounds {
    /// Create bounds from a centre and a full size
    pub fn new(center: Point3<f64>, size: Vector3<f64>) -> Self {
        Self {
            center,
            extents: size.abs() * 0.5,
        }
    }

    /// Create bounds spanning two corner points
    pub fn from_min_max(min: Point3<f64>, max: Point3<f64>) -> Self {
        let lo = min.inf(&max);
        let hi = min.sup(&max);
        Self {
            center: nalgebra::center(&lo, &hi),
            extents: (hi - lo) * 0.5,
        }
    }

    #[inline]
    pub fn min(&self) -> Point3<f64> {
        self.center - self.extents
    }

    #[inline]
    pub fn max(&self) -> Point3<f64> {
        self.center + self.extents
    }

    #[inline]
    pub fn size(&self) -> Vector3<f64> {
        self.extents * 2.0
    }

    /// Grow the size by `amount` along every axis (extents by half of it)
    pub fn expanded(&self, amount: f64) -> Self {
        Self {
            center: self.center,
            extents: self.extents.add_scalar(amount * 0.5),
        }
    }

    /// Smallest bounds containing both `self` and `other`
    pub fn encapsulate(&self, other: &Bounds) -> Self {
        Self::from_min_max(self.min().inf(&other.min()), self.max().sup(&other.max()))
    }

    /// Smallest bounds containing `self` and `point`
    pub fn encapsulate_point(&self, point: &Point3<f64>) -> Self {
        Self::from_min_max(self.min().inf(point), self.max().sup(point))
    }

    /// Closed-interval overlap test (touching boxes intersect)
    pub fn intersects(&self, other: &Bounds) -> bool {
        let (a_min, a_max) = (self.min(), self.max());
        let (b_min, b_max) = (other.min(), other.max());
        (0..3).all(|axis| a_min[axis] <= b_max[axis] && b_min[axis] <= a_max[axis])
    }

    pub fn contains(&self, point: &Point3<f64>) -> bool {
        let (lo, hi) = (self.min(), self.max());
        (0..3).all(|axis| lo[axis] <= point[axis] && point[axis] <= hi[axis])
    }

    /// Axis-aligned bounds of the eight transformed corners
    pub fn transformed(&self, matrix: &Matrix4<f64>) -> Self {
        let (lo, hi) = (self.min(), self.max());
        let mut result = Bounds::new(matrix.transform_point(&lo), Vector3::zeros());
        for corner in 1..8 {
            let p = Point3::new(
                if corner & 1 == 0 { lo.x } else { hi.x },
                if corner & 2 == 0 { lo.y } else { hi.y },
                if corner & 4 == 0 { lo.z } else { hi.z },
            );
            result = result.encapsulate_point(&matrix.transform_point(&p));
        }
        result
    }
}

/// Position, orientation and non-uniform scale of a placed piece
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Placement {
    pub translation: Vector3<f64>,
    pub rotation: UnitQuaternion<f64>,
    pub scale: Vector3<f64>,
}

impl Default for Placement {
    fn default() -> Self {
        Self {
            translation: Vector3::zeros(),
            rotation: UnitQuaternion::identity(),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Placement {
    /// Identity placement moved to `(x, y, z)`
    pub fn at(x: f64, y: f64, z: f64) -> Self {
        Self {
            translation: Vector3::new(x, y, z),
            ..Self::default()
        }
    }

    /// Rotate about the vertical axis by `radians`
    pub fn rotated_y(mut self, radians: f64) -> Self {
        self.rotation = UnitQuaternion::from_axis_angle(&Vector3::y_axis(), radians) * self.rotation;
        self
    }

    /// Replace the scale with a uniform `factor`
    pub fn scaled(mut self, factor: f64) -> Self {
        self.scale = Vector3::new(factor, factor, factor);
        self
    }

    /// Matrix mapping local coordinates to world coordinates (T * R * S)
    pub fn local_to_world(&self) -> Matrix4<f64> {
        Matrix4::new_translation(&self.translation)
            * self.rotation.to_homogeneous()
            * Matrix4::new_nonuniform_scaling(&self.scale)
    }

    /// Inverse of [`Placement::local_to_world`]; `None` for zero scale
    pub fn world_to_local(&self) -> Option<Matrix4<f64>> {
        if !self.is_invertible() {
            return None;
        }
        self.local_to_world().try_inverse()
    }

    /// Whether every component is finite and no scale axis collapses
    pub fn is_invertible(&self) -> bool {
        self.translation.iter().all(|c| c.is_finite())
            && self.rotation.coords.iter().all(|c| c.is_finite())
            && self.scale.iter().all(|s| s.is_finite() && s.abs() > NORMALIZE_EPSILON)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn plane_raycast_front_and_behind() {
        let plane = Plane::new(Point3::new(0.0, 0.0, 5.0), Vector3::z()).unwrap();

        let ahead = Ray::new(Point3::origin(), Vector3::z());
        assert_relative_eq!(plane.raycast(&ahead).unwrap(), 5.0);

        // Plane behind the origin yields a negative distance
        let behind = Ray::new(Point3::new(0.0, 0.0, 8.0), Vector3::z());
        assert_relative_eq!(plane.raycast(&behind).unwrap(), -3.0);
        assert_relative_eq!(behind.point_at(-3.0).z, 5.0);
    }

    #[test]
    fn plane_raycast_parallel_is_none() {
        let plane = Plane::new(Point3::origin(), Vector3::y()).unwrap();
        let ray = Ray::new(Point3::new(0.0, 1.0, 0.0), Vector3::x());
        assert!(plane.raycast(&ray).is_none());
    }

    #[test]
    fn plane_rejects_zero_normal() {
        assert!(Plane::new(Point3::origin(), Vector3::zeros()).is_none());
    }

    #[test]
    fn bounds_expand_grows_size() {
        let b = Bounds::new(Point3::origin(), Vector3::new(2.0, 4.0, 6.0));
        let e = b.expanded(0.2);
        assert_relative_eq!(e.size(), Vector3::new(2.2, 4.2, 6.2), epsilon = 1e-12);
        assert_eq!(e.center, b.center);
    }

    #[test]
    fn bounds_intersection_is_inclusive() {
        let a = Bounds::from_min_max(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0));
        let touching = Bounds::from_min_max(Point3::new(1.0, 0.0, 0.0), Point3::new(2.0, 1.0, 1.0));
        let apart = Bounds::from_min_max(Point3::new(1.5, 0.0, 0.0), Point3::new(2.0, 1.0, 1.0));
        assert!(a.intersects(&touching));
        assert!(!a.intersects(&apart));

        let union = a.encapsulate(&apart);
        assert_relative_eq!(union.min(), Point3::new(0.0, 0.0, 0.0));
        assert_relative_eq!(union.max(), Point3::new(2.0, 1.0, 1.0));
    }

    #[test]
    fn bounds_transformed_by_rotation() {
        let b = Bounds::new(Point3::origin(), Vector3::new(4.0, 1.0, 2.0));
        let m = Placement::at(10.0, 0.0, 0.0).rotated_y(FRAC_PI_2).local_to_world();
        let t = b.transformed(&m);
        assert_relative_eq!(t.center, Point3::new(10.0, 0.0, 0.0), epsilon = 1e-9);
        assert_relative_eq!(t.size(), Vector3::new(2.0, 1.0, 4.0), epsilon = 1e-9);
    }

    #[test]
    fn placement_roundtrip() {
        let placement = Placement::at(1.0, 2.0, 3.0).rotated_y(0.7).scaled(2.0);
        let to_world = placement.local_to_world();
        let to_local = placement.world_to_local().unwrap();
        let p = Point3::new(0.3, -1.2, 4.5);
        let back = to_local.transform_point(&to_world.transform_point(&p));
        assert_relative_eq!(back, p, epsilon = 1e-9);
    }

    #[test]
    fn placement_zero_scale_not_invertible() {
        let mut placement = Placement::default();
        placement.scale.y = 0.0;
        assert!(!placement.is_invertible());
        assert!(placement.world_to_local().is_none());
    }
}
