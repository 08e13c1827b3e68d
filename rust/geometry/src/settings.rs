// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-piece lip configuration

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Tessellation count for a curve of arc length `extent` at `detail`
/// segments per unit, never less than one
#[inline]
pub fn divisions(extent: f64, detail: u32) -> usize {
    let estimated = (extent.abs() * detail as f64).round();
    if estimated.is_finite() && estimated >= 1.0 {
        estimated as usize
    } else {
        1
    }
}

/// Rim ("lip") parameters shared by every shape variant
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LipSettings {
    /// Radius of the half-round rail cross-section
    pub radius: f64,
    /// Cross-section segments per unit of half-circumference
    pub detail: u32,
    /// Height of the collision wall raised along the rail
    pub rail_height: f64,
    /// Distance under which points are considered to lie on a cutout
    pub tolerance: f64,
}

impl Default for LipSettings {
    fn default() -> Self {
        Self {
            radius: 0.1,
            detail: 16,
            rail_height: 1.0,
            tolerance: 1e-3,
        }
    }
}

impl LipSettings {
    /// Segments around the half-round cross-section
    #[inline]
    pub fn divisions(&self) -> usize {
        divisions(self.radius * PI, self.detail)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.radius.is_finite() || self.radius <= 0.0 {
            return Err(Error::InvalidLipSettings(format!(
                "radius must be positive, got {}",
                self.radius
            )));
        }
        if self.detail == 0 {
            return Err(Error::InvalidLipSettings("detail must be at least 1".to_string()));
        }
        if !self.rail_height.is_finite() || self.rail_height < 0.0 {
            return Err(Error::InvalidLipSettings(format!(
                "rail height must be non-negative, got {}",
                self.rail_height
            )));
        }
        if !self.tolerance.is_finite() || self.tolerance <= 0.0 {
            return Err(Error::InvalidLipSettings(format!(
                "tolerance must be positive, got {}",
                self.tolerance
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_divisions() {
        // 0.1 * pi * 16 = 5.03
        assert_eq!(LipSettings::default().divisions(), 5);
    }

    #[test]
    fn divisions_never_below_one() {
        assert_eq!(divisions(0.0, 16), 1);
        assert_eq!(divisions(0.01, 1), 1);
        assert_eq!(divisions(f64::NAN, 4), 1);
    }

    #[test]
    fn divisions_grow_with_detail_and_extent() {
        assert!(divisions(1.0, 32) > divisions(1.0, 16));
        assert!(divisions(2.0, 16) > divisions(1.0, 16));
    }

    #[test]
    fn validate_rejects_bad_values() {
        assert!(LipSettings::default().validate().is_ok());
        let bad_radius = LipSettings { radius: 0.0, ..LipSettings::default() };
        assert!(bad_radius.validate().is_err());
        let bad_detail = LipSettings { detail: 0, ..LipSettings::default() };
        assert!(bad_detail.validate().is_err());
    }

    #[test]
    fn partial_json_uses_defaults() {
        let settings: LipSettings = serde_json::from_str(r#"{ "radius": 0.25 }"#).unwrap();
        assert_eq!(settings.radius, 0.25);
        assert_eq!(settings.detail, 16);
        assert_eq!(settings.rail_height, 1.0);
    }
}
