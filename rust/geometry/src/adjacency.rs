// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Wall ownership analysis
//!
//! Two rooms whose walls coincide must never both emit a mesh for the
//! shared stretch: two coplanar meshes fight for the same depth-buffer
//! pixels and flicker. For every point along a shared wall exactly one
//! room is the owner, decided by a deterministic, symmetric rule, and
//! the wall is subdivided into ordered segments carrying the adjacent
//! room per overlap for per-segment material planning.

use floorgen_core::{Room, WallDirection};
use smallvec::SmallVec;

/// Position tolerance for coincidence and overlap tests (meters)
pub const EPSILON: f64 = 1e-4;

/// A derived interval along a wall's run where another room's opposing
/// wall coincides. Recomputed per generation pass, never persisted.
#[derive(Debug, Clone)]
pub struct AdjacencyOverlap {
    /// Name of the adjacent room
    pub room: String,
    /// Overlap interval along the wall run, in world run-axis coordinates
    pub start: f64,
    pub end: f64,
    /// Whether the analyzed room owns this interval
    pub owned: bool,
}

/// One stretch of a wall, in run order. `adjacent` carries the
/// coinciding room's name when another wall overlaps this stretch.
#[derive(Debug, Clone, PartialEq)]
pub struct WallSegment {
    pub start: f64,
    pub end: f64,
    pub adjacent: Option<String>,
}

/// Result of analyzing one room wall against the floor's room list
#[derive(Debug, Clone)]
pub struct WallOwnership {
    /// Whether this room emits the wall mesh
    pub render: bool,
    /// Ordered segments from wall start to wall end
    pub segments: SmallVec<[WallSegment; 4]>,
    pub overlaps: Vec<AdjacencyOverlap>,
}

/// Deterministic, symmetric ownership rule for a shared interval.
///
/// The room with the smaller origin along the axis perpendicular to
/// the wall run owns; equal origins within tolerance are broken by
/// room name, the lexically smaller name winning. For any pair of
/// rooms exactly one of the two owns, never both, never neither.
pub fn owns_shared_interval(this: &Room, other: &Room, direction: WallDirection) -> bool {
    let this_origin = this.origin_for(direction);
    let other_origin = other.origin_for(direction);

    if (this_origin - other_origin).abs() <= EPSILON {
        this.name < other.name
    } else {
        this_origin < other_origin
    }
}

/// Find every adjacency overlap for one wall of a room.
///
/// A candidate wall is adjacent when it is the opposing direction,
/// its plane coincides within tolerance, and the run intervals overlap
/// by more than the tolerance.
pub fn find_overlaps(room: &Room, direction: WallDirection, rooms: &[Room]) -> Vec<AdjacencyOverlap> {
    let plane = room.wall_plane(direction);
    let (run_start, run_end) = room.wall_run(direction);
    let facing = direction.opposite();

    let mut overlaps = Vec::new();

    for other in rooms {
        if other.name == room.name {
            continue;
        }

        let other_plane = other.wall_plane(facing);
        if (plane - other_plane).abs() > EPSILON {
            continue;
        }

        let (other_start, other_end) = other.wall_run(facing);
        let start = run_start.max(other_start);
        let end = run_end.min(other_end);
        if end - start <= EPSILON {
            continue;
        }

        overlaps.push(AdjacencyOverlap {
            room: other.name.clone(),
            start,
            end,
            owned: owns_shared_interval(room, other, direction),
        });
    }

    overlaps.sort_by(|a, b| a.start.total_cmp(&b.start));
    overlaps
}

/// Analyze one wall: does this room render it, and how is it segmented.
///
/// The room renders the wall iff the length not owned by other rooms
/// exceeds the tolerance, so it always renders at least the
/// exterior-facing portion it owns.
pub fn analyze_wall(room: &Room, direction: WallDirection, rooms: &[Room]) -> WallOwnership {
    let (run_start, run_end) = room.wall_run(direction);
    let overlaps = find_overlaps(room, direction, rooms);

    // Length covered by intervals owned by other rooms, with
    // overlapping intervals merged so nothing is double-counted
    let mut foreign: Vec<(f64, f64)> = overlaps
        .iter()
        .filter(|o| !o.owned)
        .map(|o| (o.start, o.end))
        .collect();
    foreign.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut covered = 0.0;
    let mut cursor = f64::NEG_INFINITY;
    for (start, end) in foreign {
        let start = start.max(cursor);
        if end > start {
            covered += end - start;
            cursor = end;
        }
    }

    let render = (run_end - run_start) - covered > EPSILON;

    // Ordered segments: one per overlap, interleaved with exterior
    // stretches covering un-overlapped runs
    let mut segments: SmallVec<[WallSegment; 4]> = SmallVec::new();
    let mut cursor = run_start;
    for overlap in &overlaps {
        let start = overlap.start.max(cursor);
        if start - cursor > EPSILON {
            segments.push(WallSegment {
                start: cursor,
                end: start,
                adjacent: None,
            });
        }
        let end = overlap.end.min(run_end);
        if end - start > EPSILON {
            segments.push(WallSegment {
                start,
                end,
                adjacent: Some(overlap.room.clone()),
            });
            cursor = end;
        }
    }
    if run_end - cursor > EPSILON {
        segments.push(WallSegment {
            start: cursor,
            end: run_end,
            adjacent: None,
        });
    }

    WallOwnership {
        render,
        segments,
        overlaps,
    }
}
