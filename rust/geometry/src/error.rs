// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for geometry operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while validating piece parameters
///
/// Mesh generation itself never fails: degenerate shapes produce empty
/// buffers. These errors are raised only when parameters are checked up
/// front, before they are stored on a piece.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Invalid {shape} parameter `{field}`: {reason}")]
    InvalidParameter {
        shape: &'static str,
        field: &'static str,
        reason: String,
    },

    #[error("Invalid lip settings: {0}")]
    InvalidLipSettings(String),
}

impl Error {
    pub(crate) fn parameter(shape: &'static str, field: &'static str, reason: impl Into<String>) -> Self {
        Error::InvalidParameter {
            shape,
            field,
            reason: reason.into(),
        }
    }
}
