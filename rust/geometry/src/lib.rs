// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Ramp-Lite Geometry
//!
//! Procedural render and collision meshes for modular ramp and platform
//! pieces. Each piece rims its open boundaries with a half-round rail (the
//! "lip") that stops, turns or splits where neighbouring pieces declare
//! cutouts, so adjoining pieces form one continuous, watertight rail.
//!
//! Math runs in f64 via nalgebra; output buffers are f32.

pub mod builder;
pub mod cutout;
pub mod error;
pub mod lip;
pub mod math;
pub mod mesh;
pub mod neighbor;
pub mod settings;
pub mod shapes;

// Re-export nalgebra types for convenience
pub use nalgebra::{Matrix4, Point2, Point3, UnitQuaternion, Vector3};

pub use builder::MeshBuilder;
pub use cutout::Cutout;
pub use error::{Error, Result};
pub use lip::{resolve_spans, LipPath, LipSpan, LipWaypoint, SpanEnd};
pub use math::{Bounds, Placement, Plane, Ray};
pub use mesh::{CollisionMesh, Mesh};
pub use neighbor::{gather_cutouts, layer_mask, LayerMask, NeighborProvider, ALL_LAYERS};
pub use settings::{divisions, LipSettings};
pub use shapes::{
    CylinderRampParams, ForkRampParams, PieceShape, PlatformParams, ScaleRampParams,
    ShapeDescriptor, ShapeKind,
};
