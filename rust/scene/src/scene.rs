// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scene - arena of placed pieces.
//!
//! The [`Scene`] owns every piece in a slot map with stable keys and answers
//! neighbour queries for the geometry crate. All mutators validate their
//! input first, store it, and then run the rebuild scheduler
//! ([`Scene::notify_changed`]) so neighbouring lips are kept in step.

use nalgebra::Matrix4;
use ramp_lite_geometry::{Bounds, Cutout, LayerMask, NeighborProvider, Placement, ShapeDescriptor};
use slotmap::SlotMap;

use crate::error::{Error, Result};
use crate::keys::PieceKey;
use crate::piece::Piece;
use crate::rebuild::RebuildReport;

/// Highest layer index plus one
pub const LAYER_COUNT: u8 = 32;

/// Placed pieces keyed by [`PieceKey`]
#[derive(Debug, Default)]
pub struct Scene {
    pub(crate) pieces: SlotMap<PieceKey, Piece>,
}

impl Scene {
    /// Creates an empty scene.
    pub fn new() -> Self {
        Self {
            pieces: SlotMap::with_key(),
        }
    }

    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    pub fn contains(&self, key: PieceKey) -> bool {
        self.pieces.contains_key(key)
    }

    pub fn get(&self, key: PieceKey) -> Option<&Piece> {
        self.pieces.get(key)
    }

    /// Like [`Scene::get`], failing with [`Error::PieceNotFound`]
    pub fn piece(&self, key: PieceKey) -> Result<&Piece> {
        self.pieces.get(key).ok_or(Error::PieceNotFound(key))
    }

    /// Keys in insertion order (for a scene without removals)
    pub fn keys(&self) -> impl Iterator<Item = PieceKey> + '_ {
        self.pieces.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (PieceKey, &Piece)> + '_ {
        self.pieces.iter()
    }

    /// Add a piece and rebuild it together with its neighbours
    pub fn insert(
        &mut self,
        shape: ShapeDescriptor,
        placement: Placement,
        layer: u8,
    ) -> Result<(PieceKey, RebuildReport)> {
        let key = self.insert_unbuilt(shape, placement, layer)?;
        let report = self.notify_changed(key)?;
        Ok((key, report))
    }

    /// Validate and store a piece without generating any meshes
    pub(crate) fn insert_unbuilt(
        &mut self,
        shape: ShapeDescriptor,
        placement: Placement,
        layer: u8,
    ) -> Result<PieceKey> {
        shape.validate()?;
        validate_placement(&placement)?;
        validate_layer(layer)?;
        let key = self.pieces.insert(Piece::new(shape, placement, layer));
        tracing::debug!(?key, kind = self.pieces[key].shape.kind.name(), "inserted piece");
        Ok(key)
    }

    /// Replace a piece's shape
    pub fn set_shape(&mut self, key: PieceKey, shape: ShapeDescriptor) -> Result<RebuildReport> {
        shape.validate()?;
        self.piece_mut(key)?.shape = shape;
        self.notify_changed(key)
    }

    /// Move, rotate or scale a piece
    pub fn set_placement(&mut self, key: PieceKey, placement: Placement) -> Result<RebuildReport> {
        validate_placement(&placement)?;
        self.piece_mut(key)?.placement = placement;
        self.notify_changed(key)
    }

    /// Move a piece to another layer
    pub fn set_layer(&mut self, key: PieceKey, layer: u8) -> Result<RebuildReport> {
        validate_layer(layer)?;
        self.piece_mut(key)?.layer = layer;
        self.notify_changed(key)
    }

    /// Remove a piece and rebuild the neighbours it used to touch
    pub fn remove(&mut self, key: PieceKey) -> Result<(Piece, RebuildReport)> {
        let piece = self.pieces.remove(key).ok_or(Error::PieceNotFound(key))?;
        let (region, mask) = match piece.last_rebuild_bounds {
            Some(bounds) => (bounds, piece.last_rebuild_mask),
            None => (piece.world_bounds(), piece.layer_mask()),
        };
        tracing::debug!(?key, "removed piece");
        let report = self.rebuild_region(&region, mask)?;
        Ok((piece, report))
    }

    pub(crate) fn piece_mut(&mut self, key: PieceKey) -> Result<&mut Piece> {
        self.pieces.get_mut(key).ok_or(Error::PieceNotFound(key))
    }
}

fn validate_placement(placement: &Placement) -> Result<()> {
    if placement.is_invertible() {
        Ok(())
    } else {
        Err(Error::DegeneratePlacement)
    }
}

fn validate_layer(layer: u8) -> Result<()> {
    if layer < LAYER_COUNT {
        Ok(())
    } else {
        Err(Error::InvalidLayer(layer))
    }
}

impl NeighborProvider for Scene {
    type Id = PieceKey;

    fn query(&self, bounds: &Bounds, mask: LayerMask) -> Vec<PieceKey> {
        self.pieces
            .iter()
            .filter(|(_, piece)| piece.layer_mask() & mask != 0 && piece.world_bounds().intersects(bounds))
            .map(|(key, _)| key)
            .collect()
    }

    fn local_to_world(&self, id: PieceKey) -> Option<Matrix4<f64>> {
        self.pieces.get(id).map(|piece| piece.placement.local_to_world())
    }

    fn populate_cutouts(&self, id: PieceKey, out: &mut Vec<Cutout>) {
        if let Some(piece) = self.pieces.get(id) {
            piece.shape.populate_cutouts(out);
        }
    }
}
