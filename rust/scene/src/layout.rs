// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! JSON level layouts.
//!
//! A layout stores what a designer authored (shape parameters, lip settings,
//! placement and layer of every piece) and none of the generated meshes;
//! loading a layout regenerates them.

use ramp_lite_geometry::{Placement, ShapeDescriptor};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::keys::PieceKey;
use crate::scene::Scene;

/// Serializable description of a whole scene.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneLayout {
    pub pieces: Vec<PieceLayout>,
}

/// Serializable description of one piece.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieceLayout {
    pub shape: ShapeDescriptor,
    #[serde(default)]
    pub placement: Placement,
    #[serde(default)]
    pub layer: u8,
}

impl SceneLayout {
    /// Serializes the layout to a pretty-printed JSON string.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Parses a layout from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Serialization(e.to_string()))
    }
}

impl Scene {
    /// Snapshot of every piece's authored parameters
    pub fn layout(&self) -> SceneLayout {
        SceneLayout {
            pieces: self
                .pieces
                .values()
                .map(|piece| PieceLayout {
                    shape: piece.shape.clone(),
                    placement: piece.placement,
                    layer: piece.layer,
                })
                .collect(),
        }
    }

    /// Build a scene from a layout, generating all meshes
    ///
    /// Every piece is validated before any mesh is built. Keys are returned
    /// in layout order.
    pub fn from_layout(layout: &SceneLayout) -> Result<(Self, Vec<PieceKey>)> {
        let mut scene = Scene::new();
        let keys = layout
            .pieces
            .iter()
            .map(|p| scene.insert_unbuilt(p.shape.clone(), p.placement, p.layer))
            .collect::<Result<Vec<_>>>()?;
        scene.rebuild_all()?;
        tracing::debug!(pieces = keys.len(), "loaded scene layout");
        Ok((scene, keys))
    }

    /// Serializes the scene's layout to JSON.
    pub fn to_json(&self) -> Result<String> {
        self.layout().to_json()
    }

    /// Loads a scene from layout JSON.
    pub fn from_json(json: &str) -> Result<(Self, Vec<PieceKey>)> {
        Self::from_layout(&SceneLayout::from_json(json)?)
    }
}
