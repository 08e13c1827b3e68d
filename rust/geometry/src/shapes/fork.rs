// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Forking ramp: one entry splitting into two legs at a spread angle.

use super::{require_non_negative, PieceShape};
use crate::builder::MeshBuilder;
use crate::cutout::Cutout;
use crate::error::{Error, Result};
use crate::lip::LipWaypoint;
use crate::math::{normalize_or, Bounds, Plane, Ray};
use crate::settings::LipSettings;
use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForkRampParams {
    pub entry_width: f64,
    /// Width of each leg
    pub central_width: f64,
    pub height: f64,
    /// Length of the straight entry section
    pub leg_length: f64,
    /// Angle between the two legs, in degrees
    pub spread_angle: f64,
}

impl Default for ForkRampParams {
    fn default() -> Self {
        Self {
            entry_width: 1.1,
            central_width: 1.1,
            height: 0.5,
            leg_length: 2.0,
            spread_angle: 90.0,
        }
    }
}

/// Derived layout of the fork
struct ForkLayout {
    half_angle: f64,
    total_width: f64,
    outer_far_x: f64,
    inner_far_x: f64,
    total_length: f64,
    far_z: f64,
}

impl ForkRampParams {
    fn is_degenerate(&self) -> bool {
        !(self.spread_angle > 0.0 && self.spread_angle < 180.0)
    }

    fn layout(&self, lip_radius: f64) -> ForkLayout {
        let half_angle = (self.spread_angle * 0.5).to_radians();
        let (sin, cos) = half_angle.sin_cos();
        let tan = half_angle.tan();
        let outer_hypot = self.leg_length + self.central_width * tan;
        let total_width = self.central_width + 2.0 * sin * outer_hypot;
        let outer_far_x = total_width * 0.5;
        let inner_far_x = outer_far_x - self.central_width * (cos + sin * tan);
        let total_length = self.leg_length + cos * outer_hypot;
        ForkLayout {
            half_angle,
            total_width,
            outer_far_x,
            inner_far_x,
            total_length,
            far_z: lip_radius * 2.0 + total_length,
        }
    }
}

#[inline]
fn flip_x(p: Point3<f64>) -> Point3<f64> {
    Point3::new(-p.x, p.y, p.z)
}

/// Surface corner beside a rail waypoint
///
/// Steps one lip radius to the left of the path at `current`, then slides
/// along the path onto the plane bisecting the corner (or the z plane at an
/// end), so the surface tucks under the rail.
fn edge_point(
    lip_radius: f64,
    prev: Option<Point3<f64>>,
    current: Point3<f64>,
    next: Option<Point3<f64>>,
) -> Point3<f64> {
    let heading = match (prev, next) {
        (_, Some(next)) => next - current,
        (Some(prev), None) => current - prev,
        (None, None) => Vector3::z(),
    };
    let dir = normalize_or(&heading, Vector3::z());
    let normal = match (prev, next) {
        (Some(prev), Some(next)) => next - prev,
        _ => Vector3::z(),
    };
    let left = dir.cross(&Vector3::y());
    let ray = Ray::new(current + left * lip_radius, dir);
    let enter = Plane::new(current, normal)
        .and_then(|plane| plane.raycast(&ray))
        .unwrap_or(0.0);
    ray.point_at(enter)
}

impl PieceShape for ForkRampParams {
    const NAME: &'static str = "fork ramp";

    fn local_bounds(&self, lip: &LipSettings) -> Bounds {
        let layout = self.layout(lip.radius);
        Bounds::new(
            Point3::new(0.0, -self.height * 0.5, layout.total_length * 0.5 + lip.radius),
            Vector3::new(layout.total_width, self.height, layout.total_length),
        )
    }

    fn populate_cutouts(&self, lip: &LipSettings, out: &mut Vec<Cutout>) {
        if self.is_degenerate() {
            return;
        }
        let layout = self.layout(lip.radius);
        let half_entry = self.entry_width * 0.5;
        out.push(Cutout::new(
            Point3::new(half_entry, 0.0, 0.0),
            Point3::new(-half_entry, 0.0, 0.0),
        ));
        out.push(Cutout::new(
            Point3::new(-layout.outer_far_x, 0.0, layout.far_z),
            Point3::new(-layout.inner_far_x, 0.0, layout.far_z),
        ));
        out.push(Cutout::new(
            Point3::new(layout.inner_far_x, 0.0, layout.far_z),
            Point3::new(layout.outer_far_x, 0.0, layout.far_z),
        ));
    }

    fn build(&self, builder: &mut MeshBuilder<'_>) {
        if self.is_degenerate() {
            return;
        }
        let r = builder.settings().radius;
        let layout = self.layout(r);
        let (outer_x, inner_x, far_z) = (layout.outer_far_x, layout.inner_far_x, layout.far_z);

        let near_left = Point3::new(-self.entry_width * 0.5, 0.0, r);
        let middle_left = Point3::new(-self.central_width * 0.5, 0.0, r + self.leg_length);
        let far_left = Point3::new(-outer_x, 0.0, far_z - r);
        let near_left_edge = edge_point(r, None, near_left, Some(middle_left));
        let middle_left_edge = edge_point(r, Some(near_left), middle_left, Some(far_left));
        let far_left_edge = edge_point(r, Some(middle_left), far_left, None);

        let left_inner = Point3::new(-inner_x, 0.0, far_z - r);
        let middle_inner = Point3::new(0.0, 0.0, far_z - r - inner_x / layout.half_angle.tan());
        let left_inner_edge = edge_point(r, None, left_inner, Some(middle_inner));
        let middle_inner_edge =
            edge_point(r, Some(left_inner), middle_inner, Some(flip_x(left_inner)));

        let up = |p: Point3<f64>| LipWaypoint::new(p, Vector3::y());
        builder
            .add_lip(&[
                up(Point3::new(-self.entry_width * 0.5, 0.0, 0.0)),
                up(near_left),
                up(middle_left),
                up(far_left),
                up(Point3::new(-outer_x, 0.0, far_z)),
            ])
            .add_lip(&[
                up(Point3::new(-inner_x, 0.0, far_z)),
                up(left_inner),
                up(middle_inner),
                up(flip_x(left_inner)),
                up(Point3::new(inner_x, 0.0, far_z)),
            ])
            .add_lip(&[
                up(Point3::new(outer_x, 0.0, far_z)),
                up(flip_x(far_left)),
                up(flip_x(middle_left)),
                up(flip_x(near_left)),
                up(Point3::new(self.entry_width * 0.5, 0.0, 0.0)),
            ])
            .add_quads(&[
                // entry
                near_left_edge,
                middle_left_edge,
                flip_x(middle_left_edge),
                flip_x(near_left_edge),
                // left leg
                middle_left_edge,
                far_left_edge,
                left_inner_edge,
                middle_inner_edge,
                // right leg
                middle_inner_edge,
                flip_x(left_inner_edge),
                flip_x(far_left_edge),
                flip_x(middle_left_edge),
            ])
            .add_triangles(&[middle_left_edge, middle_inner_edge, flip_x(middle_left_edge)]);

        if self.height <= 0.0 {
            return;
        }

        let down = Vector3::new(0.0, -self.height, 0.0);
        builder
            .add_quads(&[
                // undersides
                flip_x(near_left_edge) + down,
                flip_x(middle_left_edge) + down,
                middle_left_edge + down,
                near_left_edge + down,
                middle_inner_edge + down,
                left_inner_edge + down,
                far_left_edge + down,
                middle_left_edge + down,
                flip_x(middle_left_edge) + down,
                flip_x(far_left_edge) + down,
                flip_x(left_inner_edge) + down,
                middle_inner_edge + down,
                // outer walls
                near_left_edge,
                near_left_edge + down,
                middle_left_edge + down,
                middle_left_edge,
                middle_left_edge,
                middle_left_edge + down,
                far_left_edge + down,
                far_left_edge,
                flip_x(far_left_edge),
                flip_x(far_left_edge) + down,
                flip_x(middle_left_edge) + down,
                flip_x(middle_left_edge),
                flip_x(middle_left_edge),
                flip_x(middle_left_edge) + down,
                flip_x(near_left_edge) + down,
                flip_x(near_left_edge),
                // inner walls
                left_inner_edge,
                left_inner_edge + down,
                middle_inner_edge + down,
                middle_inner_edge,
                middle_inner_edge,
                middle_inner_edge + down,
                flip_x(left_inner_edge) + down,
                flip_x(left_inner_edge),
            ])
            .add_triangles(&[
                flip_x(middle_left_edge) + down,
                middle_inner_edge + down,
                middle_left_edge + down,
            ]);
    }

    fn validate(&self) -> Result<()> {
        require_non_negative(Self::NAME, "entry_width", self.entry_width)?;
        require_non_negative(Self::NAME, "central_width", self.central_width)?;
        require_non_negative(Self::NAME, "height", self.height)?;
        require_non_negative(Self::NAME, "leg_length", self.leg_length)?;
        if self.is_degenerate() {
            return Err(Error::parameter(
                Self::NAME,
                "spread_angle",
                format!("must lie strictly between 0 and 180 degrees, got {}", self.spread_angle),
            ));
        }
        Ok(())
    }
}
