// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! A placed piece and the meshes generated for it.

use ramp_lite_geometry::{
    layer_mask, Bounds, CollisionMesh, LayerMask, Mesh, Placement, ShapeDescriptor,
};

/// Per-piece rebuild state
///
/// Recorded for callers inspecting a piece; repeat rebuilds within one
/// trigger are prevented by the scheduler's visited set, not by this flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RebuildState {
    #[default]
    Clean,
    /// Meshes are being replaced
    Rebuilding,
}

/// Shape, placement and generated buffers of one piece
///
/// The buffers are owned exclusively by the piece and replaced wholesale on
/// every rebuild.
#[derive(Debug, Clone)]
pub struct Piece {
    pub(crate) shape: ShapeDescriptor,
    pub(crate) placement: Placement,
    pub(crate) layer: u8,
    pub(crate) render: Mesh,
    pub(crate) collision: CollisionMesh,
    pub(crate) last_rebuild_bounds: Option<Bounds>,
    pub(crate) last_rebuild_mask: LayerMask,
    pub(crate) state: RebuildState,
}

impl Piece {
    pub(crate) fn new(shape: ShapeDescriptor, placement: Placement, layer: u8) -> Self {
        Self {
            shape,
            placement,
            layer,
            render: Mesh::new(),
            collision: CollisionMesh::new(),
            last_rebuild_bounds: None,
            last_rebuild_mask: 0,
            state: RebuildState::Clean,
        }
    }

    pub fn shape(&self) -> &ShapeDescriptor {
        &self.shape
    }

    pub fn placement(&self) -> &Placement {
        &self.placement
    }

    pub fn layer(&self) -> u8 {
        self.layer
    }

    /// Layers this piece interacts with
    pub fn layer_mask(&self) -> LayerMask {
        layer_mask(self.layer)
    }

    pub fn render_mesh(&self) -> &Mesh {
        &self.render
    }

    pub fn collision_mesh(&self) -> &CollisionMesh {
        &self.collision
    }

    /// World bounds recorded by the last rebuild this piece triggered
    pub fn last_rebuild_bounds(&self) -> Option<&Bounds> {
        self.last_rebuild_bounds.as_ref()
    }

    pub fn state(&self) -> RebuildState {
        self.state
    }

    /// Current world bounds, including the lip margin
    pub fn world_bounds(&self) -> Bounds {
        self.shape.world_bounds(&self.placement.local_to_world())
    }
}
