// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Rebuild scheduler.
//!
//! When a piece changes, its own meshes are regenerated first, then every
//! neighbour that could see a different set of cutouts: those overlapping
//! the region the piece used to occupy and those overlapping the region it
//! occupies now. Every trigger carries a visited set seeded with the changed
//! piece, so each piece is rebuilt at most once and the trigger is never
//! re-entered by its own neighbours.

use ramp_lite_geometry::{gather_cutouts, Bounds, LayerMask, NeighborProvider};
use rustc_hash::FxHashSet;

use crate::error::{Error, Result};
use crate::keys::PieceKey;
use crate::piece::RebuildState;
use crate::scene::Scene;

/// Pieces whose meshes were regenerated by one trigger, in rebuild order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RebuildReport {
    pub rebuilt: Vec<PieceKey>,
}

impl RebuildReport {
    pub fn contains(&self, key: PieceKey) -> bool {
        self.rebuilt.contains(&key)
    }

    /// How often `key` was rebuilt (never more than once)
    pub fn count(&self, key: PieceKey) -> usize {
        self.rebuilt.iter().filter(|&&k| k == key).count()
    }
}

impl Scene {
    /// Rebuild `key` and the neighbours affected by its change
    ///
    /// Called by every mutator; call it directly after editing a piece
    /// through other means. Records the piece's new world bounds as its
    /// `last_rebuild_bounds`.
    pub fn notify_changed(&mut self, key: PieceKey) -> Result<RebuildReport> {
        let piece = self.piece(key)?;
        let old = piece.last_rebuild_bounds.map(|bounds| (bounds, piece.last_rebuild_mask));

        let mut report = RebuildReport::default();
        let mut visited = FxHashSet::default();
        visited.insert(key);
        self.regenerate(key)?;
        report.rebuilt.push(key);

        let piece = self.piece(key)?;
        let bounds = piece.world_bounds();
        let mask = piece.layer_mask();

        match old {
            Some((old_bounds, old_mask)) if old_bounds.intersects(&bounds) => {
                let union = old_bounds.encapsulate(&bounds);
                self.rebuild_neighbours(&union, old_mask | mask, &mut visited, &mut report)?;
            }
            Some((old_bounds, old_mask)) => {
                self.rebuild_neighbours(&old_bounds, old_mask, &mut visited, &mut report)?;
                self.rebuild_neighbours(&bounds, mask, &mut visited, &mut report)?;
            }
            None => self.rebuild_neighbours(&bounds, mask, &mut visited, &mut report)?,
        }

        let piece = self.piece_mut(key)?;
        piece.last_rebuild_bounds = Some(bounds);
        piece.last_rebuild_mask = mask;

        tracing::debug!(?key, rebuilt = report.rebuilt.len(), "piece change propagated");
        Ok(report)
    }

    /// Regenerate every piece once
    ///
    /// Cutouts depend only on shapes and placements, so a single pass leaves
    /// the scene consistent regardless of order.
    pub fn rebuild_all(&mut self) -> Result<RebuildReport> {
        let keys: Vec<PieceKey> = self.pieces.keys().collect();
        let mut report = RebuildReport::default();
        for key in keys {
            self.regenerate(key)?;
            let piece = self.piece_mut(key)?;
            piece.last_rebuild_bounds = Some(piece.world_bounds());
            piece.last_rebuild_mask = piece.layer_mask();
            report.rebuilt.push(key);
        }
        tracing::debug!(rebuilt = report.rebuilt.len(), "rebuilt all pieces");
        Ok(report)
    }

    /// Regenerate every piece on `mask` overlapping `region`
    pub(crate) fn rebuild_region(&mut self, region: &Bounds, mask: LayerMask) -> Result<RebuildReport> {
        let mut report = RebuildReport::default();
        let mut visited = FxHashSet::default();
        self.rebuild_neighbours(region, mask, &mut visited, &mut report)?;
        Ok(report)
    }

    fn rebuild_neighbours(
        &mut self,
        region: &Bounds,
        mask: LayerMask,
        visited: &mut FxHashSet<PieceKey>,
        report: &mut RebuildReport,
    ) -> Result<()> {
        for key in self.query(region, mask) {
            if visited.insert(key) {
                self.regenerate(key)?;
                report.rebuilt.push(key);
            }
        }
        Ok(())
    }

    /// Regenerate one piece's meshes against its current neighbours
    fn regenerate(&mut self, key: PieceKey) -> Result<()> {
        self.piece_mut(key)?.state = RebuildState::Rebuilding;

        let piece = self.piece(key)?;
        let bounds = piece.world_bounds();
        let mask = piece.layer_mask();
        let cutouts = match piece.placement.world_to_local() {
            Some(world_to_local) => gather_cutouts(&*self, key, &bounds, mask, &world_to_local),
            None => {
                tracing::warn!(?key, "placement not invertible, building without neighbours");
                Vec::new()
            }
        };
        let (render, collision) = piece.shape.generate(&cutouts);
        tracing::trace!(
            ?key,
            cutouts = cutouts.len(),
            vertices = render.vertex_count(),
            "regenerated piece"
        );

        let piece = self.pieces.get_mut(key).ok_or(Error::PieceNotFound(key))?;
        piece.render = render;
        piece.collision = collision;
        piece.state = RebuildState::Clean;
        Ok(())
    }
}
