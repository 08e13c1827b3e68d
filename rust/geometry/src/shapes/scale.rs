// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Tapered ramp that shrinks (or grows) its far end by a scale factor
//!
//! The rails taper with it: their `up` vectors carry the scale, so the far
//! rail radius matches a neighbour built at that scale.

use super::{require_non_negative, require_positive, PieceShape};
use crate::builder::MeshBuilder;
use crate::cutout::Cutout;
use crate::error::Result;
use crate::lip::LipWaypoint;
use crate::math::Bounds;
use crate::settings::LipSettings;
use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScaleRampParams {
    /// Near-end width, thickness and length
    pub size: Vector3<f64>,
    /// Far-end width and thickness relative to the near end
    pub scale_factor: f64,
}

impl Default for ScaleRampParams {
    fn default() -> Self {
        Self {
            size: Vector3::new(2.0, 1.0, 2.0),
            scale_factor: 0.5,
        }
    }
}

impl ScaleRampParams {
    fn extents(&self) -> Vector3<f64> {
        self.size * 0.5
    }

    /// z of the far cutout, one scaled lip radius past the surface
    fn far_lip_z(&self, lip_radius: f64) -> f64 {
        lip_radius + self.size.z + lip_radius * self.scale_factor
    }
}

impl PieceShape for ScaleRampParams {
    const NAME: &'static str = "scale ramp";

    fn local_bounds(&self, lip: &LipSettings) -> Bounds {
        let e = self.extents();
        let (width, height) = if self.scale_factor > 1.0 {
            (self.size.x * self.scale_factor, self.size.y * self.scale_factor)
        } else {
            (self.size.x, self.size.y)
        };
        Bounds::new(
            Point3::new(0.0, -e.y, e.z + lip.radius),
            Vector3::new(width, height, self.size.z),
        )
    }

    fn populate_cutouts(&self, lip: &LipSettings, out: &mut Vec<Cutout>) {
        let e = self.extents();
        let s = self.scale_factor;
        let far_z = self.far_lip_z(lip.radius);
        out.push(Cutout::new(Point3::new(e.x, 0.0, 0.0), Point3::new(-e.x, 0.0, 0.0)));
        out.push(Cutout::new(
            Point3::new(-e.x * s, 0.0, far_z),
            Point3::new(e.x * s, 0.0, far_z),
        ));
    }

    fn build(&self, builder: &mut MeshBuilder<'_>) {
        let r = builder.settings().radius;
        let e = self.extents();
        let s = self.scale_factor;
        let lip_x = e.x + r;
        let far_x = lip_x * s;
        let far_z = r + self.size.z;
        let far_lip_z = self.far_lip_z(r);
        let near_up = Vector3::y();
        let far_up = Vector3::y() * s;

        builder
            .add_lip(&[
                LipWaypoint::new(Point3::new(-e.x, 0.0, 0.0), near_up),
                LipWaypoint::new(Point3::new(-e.x, 0.0, r), near_up),
                LipWaypoint::new(Point3::new(-e.x * s, 0.0, far_z), far_up),
                LipWaypoint::new(Point3::new(-e.x * s, 0.0, far_lip_z), far_up),
            ])
            .add_lip(&[
                LipWaypoint::new(Point3::new(e.x * s, 0.0, far_lip_z), far_up),
                LipWaypoint::new(Point3::new(e.x * s, 0.0, far_z), far_up),
                LipWaypoint::new(Point3::new(e.x, 0.0, r), near_up),
                LipWaypoint::new(Point3::new(e.x, 0.0, 0.0), near_up),
            ])
            .add_quads(&[
                Point3::new(lip_x, 0.0, r),
                Point3::new(-lip_x, 0.0, r),
                Point3::new(-far_x, 0.0, far_z),
                Point3::new(far_x, 0.0, far_z),
            ]);

        if self.size.y > 0.0 {
            let far_y = self.size.y * s;
            let h = self.size.y;
            builder.add_quads(&[
                // underside
                Point3::new(-lip_x, -h, r),
                Point3::new(lip_x, -h, r),
                Point3::new(far_x, -far_y, far_z),
                Point3::new(-far_x, -far_y, far_z),
                // +x
                Point3::new(lip_x, 0.0, r),
                Point3::new(far_x, 0.0, far_z),
                Point3::new(far_x, -far_y, far_z),
                Point3::new(lip_x, -h, r),
                // -x
                Point3::new(-lip_x, 0.0, r),
                Point3::new(-lip_x, -h, r),
                Point3::new(-far_x, -far_y, far_z),
                Point3::new(-far_x, 0.0, far_z),
            ]);
        }
    }

    fn validate(&self) -> Result<()> {
        require_non_negative(Self::NAME, "size.x", self.size.x)?;
        require_non_negative(Self::NAME, "size.y", self.size.y)?;
        require_non_negative(Self::NAME, "size.z", self.size.z)?;
        require_positive(Self::NAME, "scale_factor", self.scale_factor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::ShapeDescriptor;
    use approx::assert_relative_eq;

    #[test]
    fn test_far_cutout_is_scaled() {
        let descriptor = ShapeDescriptor::new(ScaleRampParams::default());
        let cutouts = descriptor.cutouts();
        assert_eq!(cutouts.len(), 2);
        assert_relative_eq!(cutouts[0].length(), 2.0);
        assert_relative_eq!(cutouts[1].length(), 1.0);
        // 0.1 + 2.0 + 0.05
        assert_relative_eq!(cutouts[1].start.z, 2.15, epsilon = 1e-12);
    }

    #[test]
    fn test_growing_ramp_bounds() {
        let lip = LipSettings::default();
        let params = ScaleRampParams {
            scale_factor: 2.0,
            ..Default::default()
        };
        let bounds = params.local_bounds(&lip);
        assert_relative_eq!(bounds.size(), Vector3::new(4.0, 2.0, 2.0));
        assert_relative_eq!(bounds.center.z, 1.1);
    }

    #[test]
    fn test_far_rail_is_thinner() {
        let descriptor = ShapeDescriptor::new(ScaleRampParams {
            size: Vector3::new(2.0, 0.0, 2.0),
            ..Default::default()
        });
        let (render, _) = descriptor.generate(&[]);
        // Tallest rail vertex near the far end is half as high as at the near end
        let (mut near_top, mut far_top) = (0.0f32, 0.0f32);
        for i in 0..render.vertex_count() {
            let p = render.position(i);
            if p.z < 0.05 {
                near_top = near_top.max(p.y);
            } else if p.z > 2.1 {
                far_top = far_top.max(p.y);
            }
        }
        assert!(near_top > 0.09 && near_top <= 0.1);
        assert_relative_eq!(far_top, near_top * 0.5, epsilon = 1e-5);
    }

    #[test]
    fn test_scale_factor_must_be_positive() {
        let params = ScaleRampParams {
            scale_factor: 0.0,
            ..Default::default()
        };
        assert!(params.validate().is_err());
    }
}
