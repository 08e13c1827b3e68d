// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Lip sweep: half-round rails along resolved spans.

use super::MeshBuilder;
use crate::lip::{resolve_spans, LipPath, LipSpan, LipWaypoint, SpanEnd};
use crate::math::{normalize_or, try_normalize, Plane, Ray, NORMALIZE_EPSILON};
use nalgebra::{Point2, Point3, Vector3};
use smallvec::SmallVec;
use std::f64::consts::PI;

/// Distance under which two span joints are the same point
const JOINT_EPSILON: f64 = 1e-9;

/// Ring of cross-section vertices at one end of a span
struct Column {
    points: SmallVec<[Point3<f64>; 16]>,
    normals: SmallVec<[Vector3<f64>; 16]>,
    distance: f64,
}

/// Emittable span with its frame
struct Prepared {
    span: LipSpan,
    dir: Vector3<f64>,
}

impl MeshBuilder<'_> {
    /// Open lip through `waypoints`; free ends are capped
    pub fn add_lip(&mut self, waypoints: &[LipWaypoint]) -> &mut Self {
        self.add_lip_path(&LipPath::open(waypoints.to_vec()))
    }

    /// Closed lip loop through `waypoints`
    pub fn add_lip_loop(&mut self, waypoints: &[LipWaypoint]) -> &mut Self {
        self.add_lip_path(&LipPath::closed(waypoints.to_vec()))
    }

    /// Resolve `path` against the builder's cutouts and sweep the remains
    ///
    /// A zero lip radius still raises the collision walls but renders nothing.
    pub fn add_lip_path(&mut self, path: &LipPath) -> &mut Self {
        let spans = resolve_spans(path, self.cutouts, self.settings.tolerance);
        tracing::trace!(
            waypoints = path.waypoints.len(),
            closed = path.closed,
            spans = spans.len(),
            "sweeping lip"
        );
        self.sweep_spans(&spans, path.closed);
        self
    }

    fn sweep_spans(&mut self, spans: &[LipSpan], closed: bool) {
        let prepared: Vec<Prepared> = spans
            .iter()
            .filter_map(|span| {
                let dir = try_normalize(&(span.end.point - span.start.point))?;
                // Rail frame needs an up that is neither zero nor along the path
                try_normalize(&span.start.up.cross(&dir))?;
                try_normalize(&span.end.up.cross(&dir))?;
                Some(Prepared { span: *span, dir })
            })
            .collect();
        if prepared.is_empty() {
            return;
        }
        if self.settings.radius <= NORMALIZE_EPSILON {
            tracing::trace!(radius = self.settings.radius, "lip radius collapsed, walls only");
            for item in &prepared {
                self.add_rail_wall(&item.span);
            }
            return;
        }

        let divisions = self.settings.divisions();
        let ring = divisions + 1;
        let mut columns: Vec<Column> = Vec::with_capacity(prepared.len() * 2);
        let mut span_columns: Vec<(usize, usize)> = Vec::with_capacity(prepared.len());

        for (i, item) in prepared.iter().enumerate() {
            let start_plane = item
                .span
                .start_miter_normal()
                .and_then(|n| Plane::new(item.span.start.point, n));
            let end_plane = item
                .span
                .end_miter_normal()
                .and_then(|n| Plane::new(item.span.end.point, n));

            let start_column = match span_columns.last() {
                Some(&(_, shared)) if i > 0 && joins(&prepared[i - 1].span, &item.span) => {
                    self.blend_normals(&mut columns[shared], &item.span.start, &item.dir);
                    shared
                }
                _ => {
                    columns.push(self.column(&item.span.start, &item.dir, start_plane.as_ref()));
                    columns.len() - 1
                }
            };

            let closes_loop =
                closed && i + 1 == prepared.len() && i > 0 && joins(&item.span, &prepared[0].span);
            let end_column = if closes_loop {
                let first = span_columns[0].0;
                self.blend_normals(&mut columns[first], &item.span.end, &item.dir);
                first
            } else {
                columns.push(self.column(&item.span.end, &item.dir, end_plane.as_ref()));
                columns.len() - 1
            };

            span_columns.push((start_column, end_column));
        }

        let base = self.render.vertex_count() as u32;
        for column in &columns {
            for (i, (point, normal)) in column.points.iter().zip(&column.normals).enumerate() {
                let uv = Point2::new(i as f64 / divisions as f64, column.distance);
                self.render.add_vertex(*point, *normal, uv);
            }
        }

        for &(start_column, end_column) in &span_columns {
            let s = base + (start_column * ring) as u32;
            let e = base + (end_column * ring) as u32;
            for i in 0..divisions as u32 {
                self.render.add_triangle(s + i, e + i, e + i + 1);
                self.render.add_triangle(e + i + 1, s + i + 1, s + i);
            }
        }

        for item in &prepared {
            self.add_rail_wall(&item.span);
            if item.span.prev.is_none() {
                self.add_cap(&item.span.start, &(-item.dir), &item.dir);
            }
            if item.span.next.is_none() {
                self.add_cap(&item.span.end, &item.dir, &item.dir);
            }
        }
    }

    /// Cross-section at `at`, projected onto `miter` along the span direction
    fn column(&self, at: &SpanEnd, dir: &Vector3<f64>, miter: Option<&Plane>) -> Column {
        let divisions = self.settings.divisions();
        let scale = at.up.norm();

        let mut points = SmallVec::with_capacity(divisions + 1);
        let mut normals = SmallVec::with_capacity(divisions + 1);
        for offset in section_offsets(at, dir, divisions) {
            let raw = at.point + offset * self.settings.radius;
            let point = match miter {
                Some(plane) => {
                    let ray = Ray::new(raw, *dir);
                    ray.point_at(plane.raycast(&ray).unwrap_or(0.0))
                }
                None => raw,
            };
            points.push(point);
            normals.push(offset / scale);
        }

        Column {
            points,
            normals,
            distance: at.distance,
        }
    }

    /// Turn a shared column's normals halfway towards the outgoing span
    ///
    /// The column was built in the incoming span's frame; each normal becomes
    /// the bisector of the incoming and outgoing cross-section directions.
    fn blend_normals(&self, column: &mut Column, at: &SpanEnd, dir: &Vector3<f64>) {
        let scale = at.up.norm();
        let outgoing = section_offsets(at, dir, self.settings.divisions());
        for (normal, offset) in column.normals.iter_mut().zip(outgoing) {
            let out = offset / scale;
            *normal = normalize_or(&(*normal + out), out);
        }
    }

    /// Vertical collision wall standing on the span
    fn add_rail_wall(&mut self, span: &LipSpan) {
        let height = self.settings.rail_height;
        let (a, b) = (span.start, span.end);
        let base = self.collision.vertex_count() as u32;
        self.collision.add_vertex(b.point + b.up * height);
        self.collision.add_vertex(b.point);
        self.collision.add_vertex(a.point + a.up * height);
        self.collision.add_vertex(a.point);
        self.collision.add_triangle(base, base + 1, base + 3);
        self.collision.add_triangle(base + 3, base + 2, base);
    }
}

/// Unscaled half-circle offsets around `at` for a rail heading along `dir`
///
/// Each offset has length `|up|`; the first points along `-right`, the
/// middle along `up`.
fn section_offsets<'s>(
    at: &'s SpanEnd,
    dir: &Vector3<f64>,
    divisions: usize,
) -> impl Iterator<Item = Vector3<f64>> + 's {
    let right = at.up.cross(dir).normalize() * at.up.norm();
    (0..=divisions).map(move |i| {
        let angle = i as f64 * PI / divisions as f64;
        at.up * angle.sin() - right * angle.cos()
    })
}

/// Whether `first` hands over to `second` through an identical column
fn joins(first: &LipSpan, second: &LipSpan) -> bool {
    if (first.end.point - second.start.point).norm() > JOINT_EPSILON
        || (first.end.up - second.start.up).norm() > JOINT_EPSILON
    {
        return false;
    }
    match (first.end_miter_normal(), second.start_miter_normal()) {
        (Some(a), Some(b)) => (a - b).norm() <= JOINT_EPSILON,
        _ => false,
    }
}
