// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Flat rectangular platform with rails around its top and bottom rims.

use super::{require_non_negative, PieceShape};
use crate::builder::MeshBuilder;
use crate::cutout::Cutout;
use crate::error::Result;
use crate::lip::LipWaypoint;
use crate::math::Bounds;
use crate::settings::LipSettings;
use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

/// Box whose top face sits at `y = 0`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformParams {
    pub size: Vector3<f64>,
}

impl Default for PlatformParams {
    fn default() -> Self {
        Self {
            size: Vector3::new(20.0, 0.25, 20.0),
        }
    }
}

impl PlatformParams {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            size: Vector3::new(x, y, z),
        }
    }

    fn extents(&self) -> Vector3<f64> {
        self.size * 0.5
    }

    /// Rim corners at height `y`, counter-clockwise seen from above
    fn rim(&self, y: f64) -> [Point3<f64>; 4] {
        let e = self.extents();
        [
            Point3::new(-e.x, y, -e.z),
            Point3::new(-e.x, y, e.z),
            Point3::new(e.x, y, e.z),
            Point3::new(e.x, y, -e.z),
        ]
    }
}

impl PieceShape for PlatformParams {
    const NAME: &'static str = "platform";

    fn local_bounds(&self, _lip: &LipSettings) -> Bounds {
        Bounds::new(Point3::new(0.0, -self.extents().y, 0.0), self.size)
    }

    fn populate_cutouts(&self, _lip: &LipSettings, out: &mut Vec<Cutout>) {
        let top = self.rim(0.0);
        out.extend((0..4).map(|i| Cutout::new(top[i], top[(i + 1) % 4])));
        if self.size.y > 0.0 {
            // Bottom rim runs the other way round
            let bottom = self.rim(-self.size.y);
            out.extend((0..4).map(|i| Cutout::new(bottom[(i + 1) % 4], bottom[i])));
        }
    }

    fn build(&self, builder: &mut MeshBuilder<'_>) {
        let r = builder.settings().radius;
        let e = self.extents() + Vector3::new(r, 0.0, r);
        let h = -self.size.y;

        builder.add_quads(&[
            Point3::new(-e.x, 0.0, -e.z),
            Point3::new(-e.x, 0.0, e.z),
            Point3::new(e.x, 0.0, e.z),
            Point3::new(e.x, 0.0, -e.z),
        ]);
        let top = self.rim(0.0).map(|p| LipWaypoint::new(p, Vector3::y()));
        builder.add_lip_loop(&top);

        if self.size.y <= 0.0 {
            return;
        }

        builder.add_quads(&[
            // bottom
            Point3::new(-e.x, h, -e.z),
            Point3::new(e.x, h, -e.z),
            Point3::new(e.x, h, e.z),
            Point3::new(-e.x, h, e.z),
            // -x
            Point3::new(-e.x, h, -e.z),
            Point3::new(-e.x, h, e.z),
            Point3::new(-e.x, 0.0, e.z),
            Point3::new(-e.x, 0.0, -e.z),
            // +z
            Point3::new(-e.x, h, e.z),
            Point3::new(e.x, h, e.z),
            Point3::new(e.x, 0.0, e.z),
            Point3::new(-e.x, 0.0, e.z),
            // +x
            Point3::new(e.x, h, e.z),
            Point3::new(e.x, h, -e.z),
            Point3::new(e.x, 0.0, -e.z),
            Point3::new(e.x, 0.0, e.z),
            // -z
            Point3::new(e.x, h, -e.z),
            Point3::new(-e.x, h, -e.z),
            Point3::new(-e.x, 0.0, -e.z),
            Point3::new(e.x, 0.0, -e.z),
        ]);

        let mut bottom = self.rim(h).map(|p| LipWaypoint::new(p, -Vector3::y()));
        bottom.reverse();
        builder.add_lip_loop(&bottom);
    }

    fn validate(&self) -> Result<()> {
        require_non_negative(Self::NAME, "size.x", self.size.x)?;
        require_non_negative(Self::NAME, "size.y", self.size.y)?;
        require_non_negative(Self::NAME, "size.z", self.size.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::ShapeDescriptor;
    use approx::assert_relative_eq;

    #[test]
    fn test_platform_bounds() {
        let lip = LipSettings::default();
        let bounds = PlatformParams::new(4.0, 0.5, 2.0).local_bounds(&lip);
        assert_relative_eq!(bounds.min(), Point3::new(-2.0, -0.5, -1.0));
        assert_relative_eq!(bounds.max(), Point3::new(2.0, 0.0, 1.0));
    }

    #[test]
    fn test_platform_cutouts_follow_rims() {
        let descriptor = ShapeDescriptor::new(PlatformParams::new(4.0, 0.5, 4.0));
        let cutouts = descriptor.cutouts();
        assert_eq!(cutouts.len(), 8);
        // Top rim chains head to tail
        for i in 0..4 {
            assert_relative_eq!(cutouts[i].end, cutouts[(i + 1) % 4].start);
        }
        assert!(cutouts[..4].iter().all(|c| c.start.y == 0.0));
        assert!(cutouts[4..].iter().all(|c| c.start.y == -0.5));
    }

    #[test]
    fn test_platform_counts() {
        let descriptor = ShapeDescriptor::new(PlatformParams::new(4.0, 0.5, 4.0));
        let d = descriptor.lip.divisions();
        let (render, collision) = descriptor.generate(&[]);
        // Six faces plus two closed rails of four columns each
        assert_eq!(render.vertex_count(), 6 * 4 + 2 * 4 * (d + 1));
        assert_eq!(collision.vertex_count(), 6 * 4 + 2 * 4 * 4);
    }

    #[test]
    fn test_flat_platform_has_single_rim() {
        let descriptor = ShapeDescriptor::new(PlatformParams::new(4.0, 0.0, 4.0));
        let d = descriptor.lip.divisions();
        assert_eq!(descriptor.cutouts().len(), 4);
        let (render, _) = descriptor.generate(&[]);
        assert_eq!(render.vertex_count(), 4 + 4 * (d + 1));
    }

    #[test]
    fn test_negative_size_rejected() {
        assert!(PlatformParams::new(1.0, -0.1, 1.0).validate().is_err());
        assert!(PlatformParams::default().validate().is_ok());
    }
}
