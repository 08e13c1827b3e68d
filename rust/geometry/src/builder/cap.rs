// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Quarter-sphere caps closing free lip ends.

use super::MeshBuilder;
use crate::lip::SpanEnd;
use nalgebra::{Point2, Vector3};
use std::f64::consts::{FRAC_PI_2, PI};

impl MeshBuilder<'_> {
    /// Cap the rail end at `at`, bulging along `forward`
    ///
    /// `dir` is the span direction and fixes the rail frame, so the cap's
    /// first row coincides with the rail cross-section. `forward` is `dir` for
    /// end caps and `-dir` for start caps.
    pub(super) fn add_cap(&mut self, at: &SpanEnd, forward: &Vector3<f64>, dir: &Vector3<f64>) {
        let divisions = self.settings.divisions();
        let scale = at.up.norm();
        let up = at.up / scale;
        let right = up.cross(dir).normalize();
        let radius = self.settings.radius * scale;
        let ring = divisions + 1;

        let base = self.render.vertex_count() as u32;
        for i in 0..=divisions {
            let theta = i as f64 * FRAC_PI_2 / divisions as f64;
            let tilted = up * theta.cos() + forward * theta.sin();
            for j in 0..=divisions {
                let phi = j as f64 * PI / divisions as f64;
                let offset = tilted * phi.sin() - right * phi.cos();
                let uv = Point2::new(j as f64 / divisions as f64, i as f64 / divisions as f64);
                self.render.add_vertex(at.point + offset * radius, offset, uv);
            }
        }

        let flipped = forward.dot(dir) < 0.0;
        for i in 0..divisions {
            for j in 0..divisions {
                let v0 = base + (i * ring + j) as u32;
                let v1 = base + ((i + 1) * ring + j) as u32;
                let v2 = base + ((i + 1) * ring + j + 1) as u32;
                let v3 = base + (i * ring + j + 1) as u32;
                if flipped {
                    self.render.add_triangle(v0, v3, v2);
                    self.render.add_triangle(v2, v1, v0);
                } else {
                    self.render.add_triangle(v0, v1, v2);
                    self.render.add_triangle(v2, v3, v0);
                }
            }
        }
    }
}
