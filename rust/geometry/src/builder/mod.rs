// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Mesh builder - accumulates render and collision geometry for one piece
//!
//! Shapes describe themselves through a small vocabulary: flat quads and
//! triangles, quad strips for curved surfaces, and lip paths for the rounded
//! rails along open boundaries. Flat geometry is mirrored into the collision
//! mesh as-is; lips get a vertical wall instead of their round profile.
//!
//! Winding: for every emitted triangle `(a, b, c)`, `(b - a) x (c - a)` points
//! out of the surface.

mod cap;
mod sweep;


use crate::cutout::Cutout;
use crate::math::{normalize_or, try_normalize};
use crate::mesh::{CollisionMesh, Mesh};
use crate::settings::LipSettings;
use nalgebra::{Point2, Point3, Vector3};

/// Per-piece geometry accumulator
///
/// Borrows the cutout snapshot gathered for this rebuild; every lip added to
/// the builder is resolved against it.
pub struct MeshBuilder<'a> {
    settings: LipSettings,
    cutouts: &'a [Cutout],
    render: Mesh,
    collision: CollisionMesh,
}

impl<'a> MeshBuilder<'a> {
    pub fn new(settings: LipSettings, cutouts: &'a [Cutout]) -> Self {
        Self {
            settings,
            cutouts,
            render: Mesh::new(),
            collision: CollisionMesh::new(),
        }
    }

    #[inline]
    pub fn settings(&self) -> &LipSettings {
        &self.settings
    }

    #[inline]
    pub fn cutouts(&self) -> &[Cutout] {
        self.cutouts
    }

    /// Render geometry emitted so far
    #[inline]
    pub fn render(&self) -> &Mesh {
        &self.render
    }

    /// Collision geometry emitted so far
    #[inline]
    pub fn collision(&self) -> &CollisionMesh {
        &self.collision
    }

    /// Consume the builder, yielding the render and collision meshes
    pub fn finish(self) -> (Mesh, CollisionMesh) {
        (self.render, self.collision)
    }

    /// Flat quads, four vertices each, wound `v0 v1 v2 v3`
    ///
    /// The face normal is `(v1 - v0) x (v3 - v0)`. UVs are planar in world
    /// units. Zero-area quads are skipped; a trailing partial group is ignored.
    pub fn add_quads(&mut self, vertices: &[Point3<f64>]) -> &mut Self {
        for quad in vertices.chunks_exact(4) {
            let Some(normal) = try_normalize(&(quad[1] - quad[0]).cross(&(quad[3] - quad[0]))) else {
                continue;
            };
            let (u_axis, v_axis) = planar_axes(&(quad[1] - quad[0]), &normal);

            let base = self.render.vertex_count() as u32;
            let collision_base = self.collision.vertex_count() as u32;
            for p in quad {
                let offset = p - quad[0];
                let uv = Point2::new(offset.dot(&u_axis), offset.dot(&v_axis));
                self.render.add_vertex(*p, normal, uv);
                self.collision.add_vertex(*p);
            }
            self.render.add_triangle(base, base + 1, base + 2);
            self.render.add_triangle(base + 2, base + 3, base);
            self.collision.add_triangle(collision_base, collision_base + 1, collision_base + 2);
            self.collision.add_triangle(collision_base + 2, collision_base + 3, collision_base);
        }
        self
    }

    /// Flat triangles, three vertices each
    ///
    /// The face normal is `(v1 - v0) x (v2 - v0)`. Degenerate triangles are
    /// skipped.
    pub fn add_triangles(&mut self, vertices: &[Point3<f64>]) -> &mut Self {
        for tri in vertices.chunks_exact(3) {
            let Some(normal) = try_normalize(&(tri[1] - tri[0]).cross(&(tri[2] - tri[0]))) else {
                continue;
            };
            let (u_axis, v_axis) = planar_axes(&(tri[1] - tri[0]), &normal);

            let base = self.render.vertex_count() as u32;
            let collision_base = self.collision.vertex_count() as u32;
            for p in tri {
                let offset = p - tri[0];
                let uv = Point2::new(offset.dot(&u_axis), offset.dot(&v_axis));
                self.render.add_vertex(*p, normal, uv);
                self.collision.add_vertex(*p);
            }
            self.render.add_triangle(base, base + 1, base + 2);
            self.collision.add_triangle(collision_base, collision_base + 1, collision_base + 2);
        }
        self
    }

    /// Strip of quads between consecutive rows
    ///
    /// Entries are taken two at a time; each pair is one row across the strip
    /// (a cross-section of two parallel rails) with per-vertex normals. Rows
    /// `k` and `k + 1` form a quad wound `(k0, k1, k+1_1)`, `(k+1_1, k+1_0, k0)`.
    /// `u` is 0 or 1 across the strip, `v` the distance travelled by the row
    /// midpoints.
    pub fn add_quad_strip(&mut self, strip: &[(Point3<f64>, Vector3<f64>)]) -> &mut Self {
        let rows = strip.len() / 2;
        if rows < 2 {
            return self;
        }

        let base = self.render.vertex_count() as u32;
        let collision_base = self.collision.vertex_count() as u32;
        let mut travelled = 0.0;
        let mut last_mid: Option<Point3<f64>> = None;

        for row in strip.chunks_exact(2) {
            let mid = nalgebra::center(&row[0].0, &row[1].0);
            if let Some(last) = last_mid {
                travelled += (mid - last).norm();
            }
            last_mid = Some(mid);

            for (side, (point, normal)) in row.iter().enumerate() {
                let normal = normalize_or(normal, Vector3::zeros());
                self.render
                    .add_vertex(*point, normal, Point2::new(side as f64, travelled));
                self.collision.add_vertex(*point);
            }
        }

        for row in 0..(rows - 1) as u32 {
            let a = base + row * 2;
            self.render.add_triangle(a, a + 1, a + 3);
            self.render.add_triangle(a + 3, a + 2, a);
            let c = collision_base + row * 2;
            self.collision.add_triangle(c, c + 1, c + 3);
            self.collision.add_triangle(c + 3, c + 2, c);
        }
        self
    }
}

/// Orthonormal in-plane axes with `u` along `edge`
fn planar_axes(edge: &Vector3<f64>, normal: &Vector3<f64>) -> (Vector3<f64>, Vector3<f64>) {
    let u = normalize_or(edge, Vector3::x());
    let v = normal.cross(&u);
    (u, v)
}
