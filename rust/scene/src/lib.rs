// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Ramp-Lite Scene
//!
//! Placed pieces and the neighbour-aware rebuild scheduler.
//!
//! A [`Scene`] stores pieces in a slot map with stable keys and implements
//! [`ramp_lite_geometry::NeighborProvider`], so each piece's lips are resolved
//! against the cutouts of the pieces around it. Editing a piece through the
//! scene rebuilds it and every neighbour whose lips could have changed.
//!
//! ```
//! use ramp_lite_geometry::{Placement, PlatformParams, ShapeDescriptor};
//! use ramp_lite_scene::Scene;
//!
//! let mut scene = Scene::new();
//! let shape = ShapeDescriptor::new(PlatformParams::new(4.0, 0.25, 4.0));
//! let (a, _) = scene.insert(shape.clone(), Placement::default(), 0).unwrap();
//! let (b, report) = scene.insert(shape, Placement::at(4.0, 0.0, 0.0), 0).unwrap();
//!
//! // Inserting `b` also rebuilt `a`, whose rail now stops at the shared edge
//! assert_eq!(report.rebuilt, vec![b, a]);
//! ```

pub mod error;
pub mod keys;
pub mod layout;
pub mod piece;
pub mod rebuild;
pub mod scene;

pub use error::{Error, Result};
pub use keys::PieceKey;
pub use layout::{PieceLayout, SceneLayout};
pub use piece::{Piece, RebuildState};
pub use rebuild::RebuildReport;
pub use scene::{Scene, LAYER_COUNT};
