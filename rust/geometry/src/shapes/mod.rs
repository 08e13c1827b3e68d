// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shape variants - the closed set of placeable pieces
//!
//! Every variant knows its local bounds, the cutouts it exposes to
//! neighbours, and how to describe its surfaces to a [`MeshBuilder`].
//! Parameters deserialize with per-field defaults, so a layout file only
//! needs to list what differs from the stock piece.

mod cylinder;
mod fork;
mod platform;
mod scale;

pub use cylinder::CylinderRampParams;
pub use fork::ForkRampParams;
pub use platform::PlatformParams;
pub use scale::ScaleRampParams;

use crate::builder::MeshBuilder;
use crate::cutout::Cutout;
use crate::error::{Error, Result};
use crate::math::Bounds;
use crate::mesh::{CollisionMesh, Mesh};
use crate::settings::LipSettings;
use nalgebra::Matrix4;
use serde::{Deserialize, Serialize};

/// Geometry contract shared by all shape parameter sets
pub trait PieceShape {
    /// Name used in error messages and logs
    const NAME: &'static str;

    /// Bounds of the piece in its own frame, excluding the lip margin
    fn local_bounds(&self, lip: &LipSettings) -> Bounds;

    /// Boundary segments neighbours should stop their lips at
    fn populate_cutouts(&self, lip: &LipSettings, out: &mut Vec<Cutout>);

    /// Emit surfaces and lips into `builder`
    fn build(&self, builder: &mut MeshBuilder<'_>);

    fn validate(&self) -> Result<()>;
}

/// Parameters of one piece, tagged by variant in serialized form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ShapeKind {
    Platform(PlatformParams),
    CylinderRamp(CylinderRampParams),
    ScaleRamp(ScaleRampParams),
    ForkRamp(ForkRampParams),
}

impl ShapeKind {
    pub fn name(&self) -> &'static str {
        match self {
            ShapeKind::Platform(_) => PlatformParams::NAME,
            ShapeKind::CylinderRamp(_) => CylinderRampParams::NAME,
            ShapeKind::ScaleRamp(_) => ScaleRampParams::NAME,
            ShapeKind::ForkRamp(_) => ForkRampParams::NAME,
        }
    }

    fn local_bounds(&self, lip: &LipSettings) -> Bounds {
        match self {
            ShapeKind::Platform(p) => p.local_bounds(lip),
            ShapeKind::CylinderRamp(p) => p.local_bounds(lip),
            ShapeKind::ScaleRamp(p) => p.local_bounds(lip),
            ShapeKind::ForkRamp(p) => p.local_bounds(lip),
        }
    }

    fn populate_cutouts(&self, lip: &LipSettings, out: &mut Vec<Cutout>) {
        match self {
            ShapeKind::Platform(p) => p.populate_cutouts(lip, out),
            ShapeKind::CylinderRamp(p) => p.populate_cutouts(lip, out),
            ShapeKind::ScaleRamp(p) => p.populate_cutouts(lip, out),
            ShapeKind::ForkRamp(p) => p.populate_cutouts(lip, out),
        }
    }

    fn build(&self, builder: &mut MeshBuilder<'_>) {
        match self {
            ShapeKind::Platform(p) => p.build(builder),
            ShapeKind::CylinderRamp(p) => p.build(builder),
            ShapeKind::ScaleRamp(p) => p.build(builder),
            ShapeKind::ForkRamp(p) => p.build(builder),
        }
    }

    fn validate(&self) -> Result<()> {
        match self {
            ShapeKind::Platform(p) => p.validate(),
            ShapeKind::CylinderRamp(p) => p.validate(),
            ShapeKind::ScaleRamp(p) => p.validate(),
            ShapeKind::ForkRamp(p) => p.validate(),
        }
    }
}

impl Default for ShapeKind {
    fn default() -> Self {
        ShapeKind::Platform(PlatformParams::default())
    }
}

impl From<PlatformParams> for ShapeKind {
    fn from(params: PlatformParams) -> Self {
        ShapeKind::Platform(params)
    }
}

impl From<CylinderRampParams> for ShapeKind {
    fn from(params: CylinderRampParams) -> Self {
        ShapeKind::CylinderRamp(params)
    }
}

impl From<ScaleRampParams> for ShapeKind {
    fn from(params: ScaleRampParams) -> Self {
        ShapeKind::ScaleRamp(params)
    }
}

impl From<ForkRampParams> for ShapeKind {
    fn from(params: ForkRampParams) -> Self {
        ShapeKind::ForkRamp(params)
    }
}

/// A piece's shape: variant parameters plus its lip settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShapeDescriptor {
    pub kind: ShapeKind,
    #[serde(default)]
    pub lip: LipSettings,
}

impl ShapeDescriptor {
    pub fn new(kind: impl Into<ShapeKind>) -> Self {
        Self {
            kind: kind.into(),
            lip: LipSettings::default(),
        }
    }

    pub fn with_lip(mut self, lip: LipSettings) -> Self {
        self.lip = lip;
        self
    }

    /// Local bounds without the lip margin
    pub fn local_bounds(&self) -> Bounds {
        self.kind.local_bounds(&self.lip)
    }

    /// Region whose pieces can affect this one's lips, in world space
    ///
    /// The local bounds grow by two lip radii so touching neighbours are
    /// always found.
    pub fn world_bounds(&self, local_to_world: &Matrix4<f64>) -> Bounds {
        self.local_bounds()
            .expanded(2.0 * self.lip.radius)
            .transformed(local_to_world)
    }

    /// Append this piece's cutouts, in its own frame
    pub fn populate_cutouts(&self, out: &mut Vec<Cutout>) {
        self.kind.populate_cutouts(&self.lip, out);
    }

    /// Cutouts as a fresh list
    pub fn cutouts(&self) -> Vec<Cutout> {
        let mut out = Vec::new();
        self.populate_cutouts(&mut out);
        out
    }

    /// Build render and collision meshes against neighbour `cutouts`
    /// (expressed in this piece's frame)
    pub fn generate(&self, cutouts: &[Cutout]) -> (Mesh, CollisionMesh) {
        let mut builder = MeshBuilder::new(self.lip, cutouts);
        self.kind.build(&mut builder);
        builder.finish()
    }

    /// Check lip settings and variant parameters
    pub fn validate(&self) -> Result<()> {
        self.lip.validate()?;
        self.kind.validate()
    }
}

pub(crate) fn require_finite(shape: &'static str, field: &'static str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(Error::parameter(shape, field, format!("must be finite, got {value}")))
    }
}

pub(crate) fn require_non_negative(shape: &'static str, field: &'static str, value: f64) -> Result<()> {
    require_finite(shape, field, value)?;
    if value < 0.0 {
        return Err(Error::parameter(shape, field, format!("must not be negative, got {value}")));
    }
    Ok(())
}

pub(crate) fn require_positive(shape: &'static str, field: &'static str, value: f64) -> Result<()> {
    require_finite(shape, field, value)?;
    if value <= 0.0 {
        return Err(Error::parameter(shape, field, format!("must be positive, got {value}")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_json_defaults() {
        let json = r#"{ "kind": { "type": "cylinder_ramp", "angle": 90.0 } }"#;
        let descriptor: ShapeDescriptor = serde_json::from_str(json).unwrap();
        match &descriptor.kind {
            ShapeKind::CylinderRamp(p) => {
                assert_eq!(p.angle, 90.0);
                assert_eq!(p.width, 2.0);
            }
            other => panic!("unexpected variant {}", other.name()),
        }
        assert_eq!(descriptor.lip, LipSettings::default());
    }

    #[test]
    fn test_descriptor_json_roundtrip() {
        let descriptor = ShapeDescriptor::new(ForkRampParams::default());
        let json = serde_json::to_string(&descriptor).unwrap();
        assert!(json.contains("\"type\":\"fork_ramp\""));
        let back: ShapeDescriptor = serde_json::from_str(&json).unwrap();
        assert_eq!(back, descriptor);
    }

    #[test]
    fn test_world_bounds_include_lip_margin() {
        let descriptor = ShapeDescriptor::new(PlatformParams::default());
        let local = descriptor.local_bounds();
        let world = descriptor.world_bounds(&Matrix4::identity());
        let grown = world.size() - local.size();
        assert!((grown.x - 0.2).abs() < 1e-12);
        assert!((grown.y - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_validate_rejects_bad_lip() {
        let mut descriptor = ShapeDescriptor::default();
        descriptor.lip.radius = -1.0;
        assert!(matches!(descriptor.validate(), Err(Error::InvalidLipSettings(_))));
    }
}
