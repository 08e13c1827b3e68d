// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Lip paths and the cutout resolver
//!
//! A lip path is an ordered list of waypoints along a piece's open boundary.
//! Before the rail is tessellated, every segment of the path is classified
//! against the cutouts gathered from neighbouring pieces:
//!
//! - a segment whose endpoint lies on a cutout it crosses gets its miter
//!   anchor redirected along the neighbour's boundary, so the two rails meet
//!   in a clean corner instead of overlapping;
//! - a segment running antiparallel along a cutout (a butt join) is split and
//!   the covered stretch dropped, because the neighbour owns that part of the
//!   boundary.
//!
//! The resolver is pure: it returns [`LipSpan`]s and leaves tessellation to
//! [`crate::MeshBuilder`].

use crate::cutout::Cutout;
use crate::math::{normalize_or, try_normalize};
use nalgebra::{Point3, Vector3};
use smallvec::{smallvec, SmallVec};

/// Segments shorter than this are dropped before resolution
pub const MIN_SEGMENT_LENGTH: f64 = 1e-9;

/// Recursion bound for nested splits
const MAX_SPLIT_DEPTH: usize = 32;

/// Point on a lip path
///
/// `up` is the local rail orientation; its magnitude scales the rail radius
/// so tapering pieces can narrow their rims.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LipWaypoint {
    pub vertex: Point3<f64>,
    pub up: Vector3<f64>,
}

impl LipWaypoint {
    #[inline]
    pub fn new(vertex: Point3<f64>, up: Vector3<f64>) -> Self {
        Self { vertex, up }
    }
}

/// Ordered waypoints, either open (two free ends) or closed (a loop)
#[derive(Debug, Clone, PartialEq)]
pub struct LipPath {
    pub waypoints: Vec<LipWaypoint>,
    pub closed: bool,
}

impl LipPath {
    pub fn open(waypoints: Vec<LipWaypoint>) -> Self {
        Self {
            waypoints,
            closed: false,
        }
    }

    pub fn closed(waypoints: Vec<LipWaypoint>) -> Self {
        Self {
            waypoints,
            closed: true,
        }
    }

    /// Copy of the path without consecutive coincident waypoints
    pub fn cleaned(&self) -> Self {
        let mut waypoints: Vec<LipWaypoint> = Vec::with_capacity(self.waypoints.len());
        for wp in &self.waypoints {
            match waypoints.last() {
                Some(last) if (last.vertex - wp.vertex).norm() <= MIN_SEGMENT_LENGTH => {}
                _ => waypoints.push(*wp),
            }
        }
        if self.closed && waypoints.len() > 1 {
            let (first, last) = (waypoints[0].vertex, waypoints[waypoints.len() - 1].vertex);
            if (first - last).norm() <= MIN_SEGMENT_LENGTH {
                waypoints.pop();
            }
        }
        Self {
            waypoints,
            closed: self.closed,
        }
    }

    /// Too few waypoints to form a single segment (or a loop)
    pub fn is_degenerate(&self) -> bool {
        let required = if self.closed { 3 } else { 2 };
        self.waypoints.len() < required
    }

    pub fn segment_count(&self) -> usize {
        match (self.closed, self.waypoints.len()) {
            (_, 0) | (_, 1) => 0,
            (true, n) => n,
            (false, n) => n - 1,
        }
    }
}

/// One end of a resolved span
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpanEnd {
    pub point: Point3<f64>,
    pub up: Vector3<f64>,
    /// Distance along the path from its first waypoint
    pub distance: f64,
}

impl SpanEnd {
    /// Point at `along` units from `start` towards `end`, with `up` and
    /// distance interpolated linearly
    fn between(start: &SpanEnd, end: &SpanEnd, dir: &Vector3<f64>, along: f64, length: f64) -> Self {
        let t = (along / length).clamp(0.0, 1.0);
        Self {
            point: start.point + dir * along,
            up: start.up.lerp(&end.up, t),
            distance: start.distance + along,
        }
    }
}

/// Stretch of rail left to emit after cutout resolution
///
/// `prev`/`next` are miter anchors: the rail is assumed to arrive from `prev`
/// and leave towards `next`. A missing anchor marks an open end that gets a
/// cap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LipSpan {
    pub start: SpanEnd,
    pub end: SpanEnd,
    pub prev: Option<Point3<f64>>,
    pub next: Option<Point3<f64>>,
}

impl LipSpan {
    #[inline]
    pub fn length(&self) -> f64 {
        (self.end.point - self.start.point).norm()
    }

    /// Unit direction from start to end (zero when degenerate)
    #[inline]
    pub fn dir(&self) -> Vector3<f64> {
        try_normalize(&(self.end.point - self.start.point)).unwrap_or_else(Vector3::zeros)
    }

    /// Normal of the miter plane at the start, if anchored
    pub fn start_miter_normal(&self) -> Option<Vector3<f64>> {
        let dir = self.dir();
        self.prev
            .map(|prev| miter_normal(&(self.start.point - prev), &dir, &dir))
    }

    /// Normal of the miter plane at the end, if anchored
    pub fn end_miter_normal(&self) -> Option<Vector3<f64>> {
        let dir = self.dir();
        self.next
            .map(|next| miter_normal(&dir, &(next - self.end.point), &dir))
    }
}

/// Bisector of two directions; `fallback` for degenerate or opposing inputs
fn miter_normal(incoming: &Vector3<f64>, outgoing: &Vector3<f64>, fallback: &Vector3<f64>) -> Vector3<f64> {
    let incoming = try_normalize(incoming).unwrap_or(*fallback);
    let outgoing = try_normalize(outgoing).unwrap_or(*fallback);
    normalize_or(&(incoming + outgoing), *fallback)
}

/// Resolve every segment of `path` against `cutouts`
///
/// Spans come back in path order. Degenerate paths, zero-length segments and
/// degenerate cutouts contribute nothing.
pub fn resolve_spans(path: &LipPath, cutouts: &[Cutout], tolerance: f64) -> Vec<LipSpan> {
    let path = path.cleaned();
    if path.is_degenerate() {
        return Vec::new();
    }

    let usable: Vec<Cutout> = cutouts.iter().filter(|c| !c.is_degenerate()).copied().collect();
    let resolver = CutoutResolver {
        cutouts: &usable,
        tolerance,
    };

    let wp = &path.waypoints;
    let n = wp.len();
    let mut spans = Vec::with_capacity(path.segment_count());
    let mut distance = 0.0;

    for i in 0..path.segment_count() {
        let (a, b) = (wp[i], wp[(i + 1) % n]);
        let prev = if path.closed {
            Some(wp[(i + n - 1) % n].vertex)
        } else {
            i.checked_sub(1).map(|p| wp[p].vertex)
        };
        let next = if path.closed {
            Some(wp[(i + 2) % n].vertex)
        } else {
            wp.get(i + 2).map(|w| w.vertex)
        };

        let length = (b.vertex - a.vertex).norm();
        let span = LipSpan {
            start: SpanEnd {
                point: a.vertex,
                up: a.up,
                distance,
            },
            end: SpanEnd {
                point: b.vertex,
                up: b.up,
                distance: distance + length,
            },
            prev,
            next,
        };
        spans.extend(resolver.resolve(span, 0));
        distance += length;
    }

    spans
}

/// Classifies candidate spans against a fixed cutout snapshot
struct CutoutResolver<'a> {
    cutouts: &'a [Cutout],
    tolerance: f64,
}

impl CutoutResolver<'_> {
    fn resolve(&self, span: LipSpan, depth: usize) -> SmallVec<[LipSpan; 2]> {
        let length = span.length();
        if length <= MIN_SEGMENT_LENGTH {
            return SmallVec::new();
        }
        let dir = (span.end.point - span.start.point) / length;
        let tol = self.tolerance;
        let LipSpan {
            start,
            end,
            mut prev,
            mut next,
        } = span;

        for (index, cutout) in self.cutouts.iter().enumerate() {
            let cutout_dir = cutout.dir();

            if dir.dot(&cutout_dir) > -1.0 + tol {
                // Endpoint resting on a neighbour's boundary: follow it
                if let Some(t) = cutout.project(&end.point, tol) {
                    next = if t < cutout.length() - tol {
                        Some(end.point + cutout_dir)
                    } else {
                        self.following(index).map(|d| end.point + d)
                    };
                }
                if let Some(t) = cutout.project(&start.point, tol) {
                    prev = if t > tol {
                        Some(start.point - cutout_dir)
                    } else {
                        self.preceding(index).map(|d| start.point - d)
                    };
                }
                continue;
            }

            if depth >= MAX_SPLIT_DEPTH {
                tracing::warn!(depth, "lip split depth limit reached, emitting segment whole");
                continue;
            }

            let current = LipSpan {
                start,
                end,
                prev,
                next,
            };
            if let Some(pieces) = self.split(&current, &dir, length, index, depth) {
                return pieces;
            }
        }

        smallvec![LipSpan {
            start,
            end,
            prev,
            next,
        }]
    }

    /// Drop the stretch of `span` covered by an antiparallel cutout
    ///
    /// Returns `None` when the cutout does not lie along the span.
    fn split(
        &self,
        span: &LipSpan,
        dir: &Vector3<f64>,
        length: f64,
        index: usize,
        depth: usize,
    ) -> Option<SmallVec<[LipSpan; 2]>> {
        let tol = self.tolerance;
        let cutout = &self.cutouts[index];

        // Antiparallel: the cutout's start projects further along than its end
        let far = (cutout.start - span.start.point).dot(dir);
        if far < tol {
            return None;
        }
        let near = (cutout.end - span.start.point).dot(dir);
        if near > length - tol {
            return None;
        }
        let far_point = span.start.point + dir * far;
        let near_point = span.start.point + dir * near;
        if (far_point - cutout.start).norm() > tol || (near_point - cutout.end).norm() > tol {
            return None;
        }

        tracing::trace!(near, far, length, "splitting lip segment around cutout");

        let mut pieces = SmallVec::new();
        if near > tol {
            let cut = SpanEnd::between(&span.start, &span.end, dir, near, length);
            let turn = self
                .following(index)
                .or_else(|| try_normalize(&dir.cross(&cut.up)));
            pieces.extend(self.resolve(
                LipSpan {
                    start: span.start,
                    end: cut,
                    prev: span.prev,
                    next: turn.map(|d| cut.point + d),
                },
                depth + 1,
            ));
        }
        if far < length - tol {
            let cut = SpanEnd::between(&span.start, &span.end, dir, far, length);
            let turn = self
                .preceding(index)
                .or_else(|| try_normalize(&cut.up.cross(dir)));
            pieces.extend(self.resolve(
                LipSpan {
                    start: cut,
                    end: span.end,
                    prev: turn.map(|d| cut.point - d),
                    next: span.next,
                },
                depth + 1,
            ));
        }
        Some(pieces)
    }

    /// Direction of a cutout starting where cutout `index` ends
    fn following(&self, index: usize) -> Option<Vector3<f64>> {
        let end = self.cutouts[index].end;
        self.cutouts
            .iter()
            .enumerate()
            .find(|(other, c)| *other != index && (c.start - end).norm() <= self.tolerance)
            .map(|(_, c)| c.dir())
    }

    /// Direction of a cutout ending where cutout `index` starts
    fn preceding(&self, index: usize) -> Option<Vector3<f64>> {
        let start = self.cutouts[index].start;
        self.cutouts
            .iter()
            .enumerate()
            .find(|(other, c)| *other != index && (c.end - start).norm() <= self.tolerance)
            .map(|(_, c)| c.dir())
    }
}
