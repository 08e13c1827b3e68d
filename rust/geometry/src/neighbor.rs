// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Neighbour lookup contract
//!
//! The geometry crate never owns a scene. Whatever holds the placed pieces
//! implements [`NeighborProvider`], and [`gather_cutouts`] turns its answers
//! into cutouts expressed in the frame of the piece being rebuilt.

use crate::cutout::Cutout;
use crate::math::Bounds;
use nalgebra::Matrix4;

/// Bit set of layers a query matches (`1 << layer`)
pub type LayerMask = u32;

/// Mask matching every layer
pub const ALL_LAYERS: LayerMask = u32::MAX;

/// Mask for a single layer; layers past 31 match nothing
#[inline]
pub fn layer_mask(layer: u8) -> LayerMask {
    1u32.checked_shl(layer as u32).unwrap_or(0)
}

/// Spatial index over placed pieces
pub trait NeighborProvider {
    type Id: Copy + Eq;

    /// Pieces on a layer in `mask` whose world bounds intersect `bounds`
    fn query(&self, bounds: &Bounds, mask: LayerMask) -> Vec<Self::Id>;

    /// Local-to-world matrix of a piece, `None` if it no longer exists
    fn local_to_world(&self, id: Self::Id) -> Option<Matrix4<f64>>;

    /// Append the piece's cutouts in its own local frame
    fn populate_cutouts(&self, id: Self::Id, out: &mut Vec<Cutout>);
}

/// Cutouts of every neighbour overlapping `bounds`, mapped into the frame
/// described by `world_to_local`
///
/// `exclude` (the querying piece) is skipped; degenerate cutouts are dropped.
pub fn gather_cutouts<P>(
    provider: &P,
    exclude: P::Id,
    bounds: &Bounds,
    mask: LayerMask,
    world_to_local: &Matrix4<f64>,
) -> Vec<Cutout>
where
    P: NeighborProvider + ?Sized,
{
    let mut cutouts = Vec::new();
    let mut scratch = Vec::new();

    for id in provider.query(bounds, mask) {
        if id == exclude {
            continue;
        }
        let Some(to_world) = provider.local_to_world(id) else {
            continue;
        };
        scratch.clear();
        provider.populate_cutouts(id, &mut scratch);
        cutouts.extend(
            scratch
                .iter()
                .filter(|c| !c.is_degenerate())
                .map(|c| c.transformed(&to_world, world_to_local)),
        );
    }

    cutouts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Placement;
    use crate::shapes::{PlatformParams, ShapeDescriptor};
    use approx::assert_relative_eq;
    use nalgebra::Point3;

    struct Fixed {
        pieces: Vec<(ShapeDescriptor, Placement, u8)>,
    }

    impl NeighborProvider for Fixed {
        type Id = usize;

        fn query(&self, bounds: &Bounds, mask: LayerMask) -> Vec<usize> {
            self.pieces
                .iter()
                .enumerate()
                .filter(|(_, (shape, placement, layer))| {
                    layer_mask(*layer) & mask != 0
                        && shape.world_bounds(&placement.local_to_world()).intersects(bounds)
                })
                .map(|(i, _)| i)
                .collect()
        }

        fn local_to_world(&self, id: usize) -> Option<Matrix4<f64>> {
            self.pieces.get(id).map(|(_, p, _)| p.local_to_world())
        }

        fn populate_cutouts(&self, id: usize, out: &mut Vec<Cutout>) {
            if let Some((shape, _, _)) = self.pieces.get(id) {
                shape.populate_cutouts(out);
            }
        }
    }

    fn platform() -> ShapeDescriptor {
        ShapeDescriptor::new(PlatformParams::new(4.0, 0.0, 4.0))
    }

    #[test]
    fn test_layer_mask() {
        assert_eq!(layer_mask(0), 1);
        assert_eq!(layer_mask(5), 32);
        assert_eq!(layer_mask(40), 0);
    }

    #[test]
    fn test_gather_maps_into_receiver_frame() {
        let provider = Fixed {
            pieces: vec![
                (platform(), Placement::default(), 0),
                (platform(), Placement::at(4.0, 0.0, 0.0), 0),
                (platform(), Placement::at(100.0, 0.0, 0.0), 0),
            ],
        };
        let me = &provider.pieces[0];
        let bounds = me.0.world_bounds(&me.1.local_to_world());
        let to_local = me.1.world_to_local().unwrap();
        let cutouts = gather_cutouts(&provider, 0, &bounds, ALL_LAYERS, &to_local);

        // Only the touching neighbour contributes
        assert_eq!(cutouts.len(), 4);
        assert_relative_eq!(cutouts[0].start, Point3::new(2.0, 0.0, -2.0), epsilon = 1e-12);
        assert_relative_eq!(cutouts[0].end, Point3::new(2.0, 0.0, 2.0), epsilon = 1e-12);
    }

    #[test]
    fn test_gather_respects_layers() {
        let provider = Fixed {
            pieces: vec![
                (platform(), Placement::default(), 0),
                (platform(), Placement::at(4.0, 0.0, 0.0), 3),
            ],
        };
        let me = &provider.pieces[0];
        let bounds = me.0.world_bounds(&me.1.local_to_world());
        let to_local = me.1.world_to_local().unwrap();
        assert!(gather_cutouts(&provider, 0, &bounds, layer_mask(0), &to_local).is_empty());
        assert_eq!(gather_cutouts(&provider, 0, &bounds, layer_mask(3), &to_local).len(), 4);
    }
}
