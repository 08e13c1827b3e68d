// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Cutouts - open boundary segments a piece exposes to its neighbours
//!
//! A neighbour whose lip runs along (or ends on) one of these segments stops
//! or turns its rail there instead of overlapping the piece that owns it.

use crate::math::{try_normalize, NORMALIZE_EPSILON};
use nalgebra::{Matrix4, Point3, Vector3};

/// Directed boundary segment in a piece's local frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cutout {
    pub start: Point3<f64>,
    pub end: Point3<f64>,
}

impl Cutout {
    #[inline]
    pub fn new(start: Point3<f64>, end: Point3<f64>) -> Self {
        Self { start, end }
    }

    /// Segment length
    #[inline]
    pub fn length(&self) -> f64 {
        (self.end - self.start).norm()
    }

    /// Unit direction from start to end (zero for degenerate cutouts)
    #[inline]
    pub fn dir(&self) -> Vector3<f64> {
        try_normalize(&(self.end - self.start)).unwrap_or_else(Vector3::zeros)
    }

    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.length() <= NORMALIZE_EPSILON
    }

    /// Re-express the cutout in another frame
    ///
    /// `src_to_world` maps the owner's local frame to world space,
    /// `world_to_dest` maps world space into the receiving piece's frame.
    pub fn transformed(&self, src_to_world: &Matrix4<f64>, world_to_dest: &Matrix4<f64>) -> Self {
        let m = world_to_dest * src_to_world;
        Self {
            start: m.transform_point(&self.start),
            end: m.transform_point(&self.end),
        }
    }

    /// Distance along the cutout of `point`'s projection, if the projection
    /// falls on the segment and `point` lies within `tolerance` of the line
    pub fn project(&self, point: &Point3<f64>, tolerance: f64) -> Option<f64> {
        let dir = self.dir();
        let t = (point - self.start).dot(&dir);
        if t < 0.0 || t > self.length() {
            return None;
        }
        let foot = self.start + dir * t;
        ((point - foot).norm() <= tolerance).then_some(t)
    }
}
