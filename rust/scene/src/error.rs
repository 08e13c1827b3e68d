// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for scene operations.

use crate::keys::PieceKey;

/// Result type alias for scene operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while editing a scene.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A referenced piece is not in the scene.
    #[error("piece not found: {0:?}")]
    PieceNotFound(PieceKey),

    /// The placement cannot be inverted (zero scale or non-finite values).
    #[error("placement is not invertible")]
    DegeneratePlacement,

    /// Layers index a 32-bit mask.
    #[error("layer {0} is out of range, expected 0..32")]
    InvalidLayer(u8),

    /// Shape parameters or lip settings failed validation.
    #[error(transparent)]
    InvalidShape(#[from] ramp_lite_geometry::Error),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}
