// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Door leaf placement
//!
//! Computes a door panel's hinge position and resting rotation from
//! the wall direction, swing side, and which room the door opens
//! into. The leaf pivots at its hinge edge, not its center: the mesh
//! is built with the hinge edge at the local origin, rotated to its
//! closed-state base angle plus a fixed swing offset, then translated
//! to the hinge point.

use crate::csg::box_mesh;
use crate::mesh::Mesh;
use floorgen_core::{SwingSide, WallDirection};
use nalgebra::{Matrix4, Point3, Vector3};
use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

/// Default swing offset added to the closed-state angle
pub const DEFAULT_SWING_ANGLE: f64 = FRAC_PI_4;

/// Door leaf thickness
pub const LEAF_THICKNESS: f64 = 0.04;

/// ±1 encoding which edge of the opening the leaf pivots from.
///
/// Facing the opening from inside the room, "swing right" maps to a
/// wall-direction-dependent sign; "swing left" is its negation.
#[inline]
pub fn hinge_sign(direction: WallDirection, swing: SwingSide) -> f64 {
    let right_sign = match direction {
        WallDirection::Top => 1.0,
        WallDirection::Bottom => -1.0,
        WallDirection::Left => -1.0,
        WallDirection::Right => 1.0,
    };
    match swing {
        SwingSide::Right => right_sign,
        SwingSide::Left => -right_sign,
    }
}

/// Closed-position rotation about Y placing the leaf flush across the
/// opening regardless of which side it hinges from.
#[inline]
pub fn base_rotation(direction: WallDirection, hinge: f64) -> f64 {
    if direction.runs_along_x() {
        if hinge > 0.0 {
            PI
        } else {
            0.0
        }
    } else if hinge > 0.0 {
        FRAC_PI_2
    } else {
        -FRAC_PI_2
    }
}

/// Signed swing direction: hinge sign × wall-orientation factor ×
/// opens-into factor.
#[inline]
pub fn swing_sign(direction: WallDirection, hinge: f64, opens_into_room: bool) -> f64 {
    let orientation = match direction {
        WallDirection::Bottom | WallDirection::Left => -1.0,
        _ => 1.0,
    };
    let opens = if opens_into_room { 1.0 } else { -1.0 };
    hinge * orientation * opens
}

/// Final resting rotation: closed-state base angle plus the default
/// swing offset in the signed swing direction.
#[inline]
pub fn door_angle(direction: WallDirection, swing: SwingSide, opens_into_room: bool) -> f64 {
    let hinge = hinge_sign(direction, swing);
    base_rotation(direction, hinge) + swing_sign(direction, hinge, opens_into_room) * DEFAULT_SWING_ANGLE
}

/// Hinge point: offset from the opening center by half the door width
/// along the wall's run axis, in the hinge sign's direction.
#[inline]
pub fn hinge_point(
    direction: WallDirection,
    swing: SwingSide,
    opening_center: f64,
    wall_plane: f64,
    base_y: f64,
    door_width: f64,
) -> Point3<f64> {
    let hinge = hinge_sign(direction, swing);
    let along = opening_center + hinge * door_width / 2.0;
    if direction.runs_along_x() {
        Point3::new(along, base_y, wall_plane)
    } else {
        Point3::new(wall_plane, base_y, along)
    }
}

/// Build a door leaf mesh: a thin panel pivoted at its hinge edge,
/// positioned and rotated to its resting state.
pub fn door_leaf_mesh(
    direction: WallDirection,
    swing: SwingSide,
    opens_into_room: bool,
    opening_center: f64,
    wall_plane: f64,
    base_y: f64,
    door_width: f64,
    door_height: f64,
) -> Mesh {
    // Hinge edge at the local origin, leaf extending +X
    let mut leaf = box_mesh(
        Point3::new(0.0, 0.0, -LEAF_THICKNESS / 2.0),
        Point3::new(door_width, door_height, LEAF_THICKNESS / 2.0),
    );

    let angle = door_angle(direction, swing, opens_into_room);
    let pivot = hinge_point(
        direction,
        swing,
        opening_center,
        wall_plane,
        base_y,
        door_width,
    );

    let transform = Matrix4::new_translation(&Vector3::new(pivot.x, pivot.y, pivot.z))
        * Matrix4::from_axis_angle(&Vector3::y_axis(), angle);
    leaf.transform(&transform);
    leaf
}
