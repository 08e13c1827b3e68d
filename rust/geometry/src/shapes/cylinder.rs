// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Curved ramp following a circular arc about the x axis
//!
//! The ramp starts at the origin heading along +z and bends up (negative
//! angle) or down (positive angle) around a cylinder of the given radius.

use super::{require_finite, require_non_negative, PieceShape};
use crate::builder::MeshBuilder;
use crate::cutout::Cutout;
use crate::error::{Error, Result};
use crate::lip::LipWaypoint;
use crate::math::Bounds;
use crate::settings::{divisions, LipSettings};
use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CylinderRampParams {
    pub width: f64,
    /// Thickness of the shell below the riding surface
    pub height: f64,
    pub radius: f64,
    /// Arc swept, in degrees; the sign picks the bend direction
    pub angle: f64,
    /// Surface segments per unit of arc length
    pub detail: u32,
    /// Emit rails along both sides
    pub lipped: bool,
    /// Emit the underside and side walls
    pub shelled: bool,
}

impl Default for CylinderRampParams {
    fn default() -> Self {
        Self {
            width: 2.0,
            height: 0.5,
            radius: 0.5,
            angle: 180.0,
            detail: 16,
            lipped: true,
            shelled: true,
        }
    }
}

impl CylinderRampParams {
    fn sign(&self) -> f64 {
        if self.angle < 0.0 {
            -1.0
        } else {
            1.0
        }
    }

    fn is_degenerate(&self) -> bool {
        self.angle == 0.0 || self.radius <= 0.0
    }

    /// Arc segments along the ramp
    pub fn divisions(&self) -> usize {
        divisions(self.radius * self.angle.to_radians(), self.detail)
    }

    fn center(&self, lip: &LipSettings) -> Point3<f64> {
        Point3::new(0.0, -self.radius * self.sign(), lip.radius)
    }
}

impl PieceShape for CylinderRampParams {
    const NAME: &'static str = "cylinder ramp";

    fn local_bounds(&self, lip: &LipSettings) -> Bounds {
        Bounds::new(
            self.center(lip),
            Vector3::new(self.width, 2.0 * self.radius, 2.0 * self.radius),
        )
    }

    fn populate_cutouts(&self, lip: &LipSettings, out: &mut Vec<Cutout>) {
        if self.is_degenerate() {
            return;
        }
        let half_width = self.width * 0.5;
        let rads = self.angle.abs().to_radians();
        let (sin, cos) = rads.sin_cos();
        let y = (self.radius * (cos - 1.0) - lip.radius * sin) * self.sign();
        let z = self.radius * sin + lip.radius * (1.0 + cos);
        out.push(Cutout::new(
            Point3::new(half_width, 0.0, 0.0),
            Point3::new(-half_width, 0.0, 0.0),
        ));
        out.push(Cutout::new(
            Point3::new(-half_width, y, z),
            Point3::new(half_width, y, z),
        ));
    }

    fn build(&self, builder: &mut MeshBuilder<'_>) {
        if self.is_degenerate() {
            return;
        }

        let lip_radius = builder.settings().radius;
        let half_width = self.width * 0.5;
        let rim = if self.lipped { lip_radius } else { 0.0 };
        let (left_x, right_x) = (-half_width - rim, half_width + rim);
        let sign = self.sign();
        let total = self.angle.abs().to_radians();
        let steps = self.divisions();

        let mut top = Vec::with_capacity((steps + 1) * 2);
        let mut bottom = Vec::with_capacity((steps + 1) * 2);
        let mut left = Vec::with_capacity((steps + 1) * 2);
        let mut right = Vec::with_capacity((steps + 1) * 2);
        let mut left_lip = Vec::with_capacity(steps + 3);
        let mut right_lip = Vec::with_capacity(steps + 3);

        left_lip.push(LipWaypoint::new(Point3::new(-half_width, 0.0, 0.0), Vector3::y()));
        right_lip.push(LipWaypoint::new(Point3::new(half_width, 0.0, 0.0), Vector3::y()));

        for step in 0..=steps {
            let (sin, cos) = (step as f64 * total / steps as f64).sin_cos();
            let top_y = self.radius * (cos - 1.0) * sign;
            let top_z = lip_radius + self.radius * sin;
            let normal = Vector3::new(0.0, cos, sin * sign);
            let bottom_y = top_y - normal.y * self.height;
            let bottom_z = top_z - normal.z * self.height;

            top.push((Point3::new(right_x, top_y, top_z), normal));
            top.push((Point3::new(left_x, top_y, top_z), normal));

            bottom.push((Point3::new(left_x, bottom_y, bottom_z), -normal));
            bottom.push((Point3::new(right_x, bottom_y, bottom_z), -normal));

            left.push((Point3::new(left_x, top_y, top_z), -Vector3::x()));
            left.push((Point3::new(left_x, bottom_y, bottom_z), -Vector3::x()));

            right.push((Point3::new(right_x, bottom_y, bottom_z), Vector3::x()));
            right.push((Point3::new(right_x, top_y, top_z), Vector3::x()));

            left_lip.push(LipWaypoint::new(Point3::new(-half_width, top_y, top_z), normal));
            right_lip.push(LipWaypoint::new(Point3::new(half_width, top_y, top_z), normal));

            if step == steps {
                // Carry the rails one lip radius past the arc so they reach the far cutout
                let extended_y = top_y - lip_radius * sin * sign;
                let extended_z = top_z + lip_radius * cos;
                left_lip.push(LipWaypoint::new(Point3::new(-half_width, extended_y, extended_z), normal));
                right_lip.push(LipWaypoint::new(Point3::new(half_width, extended_y, extended_z), normal));
            }
        }
        right_lip.reverse();

        builder.add_quad_strip(&top);
        if self.shelled {
            builder
                .add_quad_strip(&bottom)
                .add_quad_strip(&left)
                .add_quad_strip(&right);
        }
        if self.lipped {
            builder.add_lip(&left_lip).add_lip(&right_lip);
        }
    }

    fn validate(&self) -> Result<()> {
        require_non_negative(Self::NAME, "width", self.width)?;
        require_non_negative(Self::NAME, "height", self.height)?;
        require_non_negative(Self::NAME, "radius", self.radius)?;
        require_finite(Self::NAME, "angle", self.angle)?;
        if self.angle.abs() > 360.0 {
            return Err(Error::parameter(
                Self::NAME,
                "angle",
                format!("must be within [-360, 360] degrees, got {}", self.angle),
            ));
        }
        if self.detail == 0 {
            return Err(Error::parameter(Self::NAME, "detail", "must be at least 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::ShapeDescriptor;
    use approx::assert_relative_eq;

    #[test]
    fn test_zero_angle_is_empty() {
        let descriptor = ShapeDescriptor::new(CylinderRampParams {
            angle: 0.0,
            ..Default::default()
        });
        let (render, collision) = descriptor.generate(&[]);
        assert!(render.is_empty());
        assert!(collision.is_empty());
        assert!(descriptor.cutouts().is_empty());
    }

    #[test]
    fn test_divisions_follow_arc_length() {
        let params = CylinderRampParams::default();
        // 0.5 * pi * 16 = 25.1
        assert_eq!(params.divisions(), 25);
        let tight = CylinderRampParams { detail: 32, ..params };
        assert!(tight.divisions() > params.divisions());
        let tiny = CylinderRampParams { angle: 1.0, detail: 1, ..params };
        assert_eq!(tiny.divisions(), 1);
    }

    #[test]
    fn test_far_cutout_meets_extended_lip() {
        let descriptor = ShapeDescriptor::new(CylinderRampParams {
            angle: 90.0,
            ..Default::default()
        });
        let cutouts = descriptor.cutouts();
        assert_eq!(cutouts.len(), 2);
        // Quarter turn downwards: far edge drops by radius + lip radius
        let far = cutouts[1];
        assert_relative_eq!(far.start.y, -0.6, epsilon = 1e-12);
        assert_relative_eq!(far.start.z, 0.6, epsilon = 1e-12);
        assert_relative_eq!(far.start.x, -1.0);
    }

    #[test]
    fn test_strip_counts() {
        let params = CylinderRampParams {
            lipped: false,
            ..Default::default()
        };
        let rows = params.divisions() + 1;
        let (render, collision) = ShapeDescriptor::new(params).generate(&[]);
        assert_eq!(render.vertex_count(), 4 * 2 * rows);
        assert_eq!(collision.triangle_count(), 4 * 2 * (rows - 1));
    }

    #[test]
    fn test_unshelled_has_only_top() {
        let params = CylinderRampParams {
            lipped: false,
            shelled: false,
            ..Default::default()
        };
        let rows = params.divisions() + 1;
        let (render, _) = ShapeDescriptor::new(params).generate(&[]);
        assert_eq!(render.vertex_count(), 2 * rows);
    }

    #[test]
    fn test_bounds_flip_with_direction() {
        let lip = LipSettings::default();
        let down = CylinderRampParams::default().local_bounds(&lip);
        let up = CylinderRampParams {
            angle: -180.0,
            ..Default::default()
        }
        .local_bounds(&lip);
        assert_relative_eq!(down.center.y, -0.5);
        assert_relative_eq!(up.center.y, 0.5);
    }

    #[test]
    fn test_validate() {
        assert!(CylinderRampParams::default().validate().is_ok());
        let bad = CylinderRampParams {
            angle: f64::NAN,
            ..Default::default()
        };
        assert!(bad.validate().is_err());
        let bad = CylinderRampParams {
            detail: 0,
            ..Default::default()
        };
        assert!(bad.validate().is_err());
    }
}
