// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Wall generation
//!
//! Builds one solid per rendered wall, subtracts every opening in a
//! sequential boolean pass, then reassigns material groups from face
//! normals. The six material slots are fixed by axis: +X=0, -X=1,
//! +Y=2, -Y=3, +Z=4, -Z=5; renderers bind per-slot materials so wall
//! faces, cut reveals, tops, and bottoms can be painted independently.

use crate::connection::{
    connections_for_wall, has_door_leaf, opening_center, should_render_door, MatchedConnection,
};
use crate::csg::{box_mesh, BooleanEvaluator};
use crate::door::door_leaf_mesh;
use crate::error::Result;
use crate::mesh::{FaceGroup, Mesh};
use floorgen_core::{
    Connection, ConnectionKind, Floor, GlobalConfig, Room, WallDirection, WallKind,
};
use nalgebra::{Point3, Vector3};

/// Margin added to cut volumes across the wall plane and below
/// floor-level sills so boolean faces are never coplanar with the host
const CUT_MARGIN: f64 = 0.01;

/// Glass pane half-thickness
const PANE_HALF_THICKNESS: f64 = 0.01;

/// Map a face normal to its material slot by dominant axis and sign
#[inline]
pub fn material_slot(normal: &Vector3<f64>) -> u32 {
    let ax = normal.x.abs();
    let ay = normal.y.abs();
    let az = normal.z.abs();
    if ax >= ay && ax >= az {
        if normal.x >= 0.0 {
            0
        } else {
            1
        }
    } else if ay >= az {
        if normal.y >= 0.0 {
            2
        } else {
            3
        }
    } else if normal.z >= 0.0 {
        4
    } else {
        5
    }
}

/// Rebuild material groups from geometric face normals.
///
/// Boolean subtraction discards grouping, so this runs after every
/// cut pass. Consecutive faces sharing a slot merge into one group;
/// an uncut box yields exactly six groups in slot order.
pub fn reassign_material_groups(mesh: &mut Mesh) {
    let mut groups: Vec<FaceGroup> = Vec::with_capacity(6);

    for face in 0..mesh.triangle_count() {
        let (v0, v1, v2) = mesh.triangle_vertices(face);
        let geometric = (v1 - v0).cross(&(v2 - v0));
        let slot = if geometric.norm_squared() > 1e-20 {
            material_slot(&geometric)
        } else {
            // Degenerate triangle: fall back to the stored vertex normal
            let i = mesh.indices[face * 3] as usize;
            let stored = Vector3::new(
                mesh.normals[i * 3] as f64,
                mesh.normals[i * 3 + 1] as f64,
                mesh.normals[i * 3 + 2] as f64,
            );
            material_slot(&stored)
        };

        match groups.last_mut() {
            Some(group) if group.material == slot => group.count += 3,
            _ => groups.push(FaceGroup {
                start: (face * 3) as u32,
                count: 3,
                material: slot,
            }),
        }
    }

    mesh.groups = groups;
}

/// An opening to cut out of a wall solid, in wall-local terms:
/// `center` along the run axis, `sill` above the wall base.
#[derive(Debug, Clone, Copy)]
struct Opening {
    center: f64,
    width: f64,
    sill: f64,
    height: f64,
}

/// Everything one wall contributes to the scene
#[derive(Debug, Default)]
pub struct WallBuild {
    /// Wall solid after cuts, material groups reassigned
    pub mesh: Mesh,
    /// Door leaves hung in this wall's openings
    pub doors: Vec<Mesh>,
    /// Glass panes filling window openings
    pub glass: Vec<Mesh>,
}

/// Uncut wall solid: thickness centered on the wall plane, run
/// extended half a thickness past each corner so perpendicular walls
/// meet without a gap.
pub fn wall_solid(
    room: &Room,
    direction: WallDirection,
    base_y: f64,
    height: f64,
    thickness: f64,
) -> Mesh {
    let plane = room.wall_plane(direction);
    let (run_start, run_end) = room.wall_run(direction);
    let half = thickness / 2.0;

    if direction.runs_along_x() {
        box_mesh(
            Point3::new(run_start - half, base_y, plane - half),
            Point3::new(run_end + half, base_y + height, plane + half),
        )
    } else {
        box_mesh(
            Point3::new(plane - half, base_y, run_start - half),
            Point3::new(plane + half, base_y + height, run_end + half),
        )
    }
}

/// Cut volume for one opening: full wall thickness plus margin on
/// both sides, and past the wall base when the sill sits at the floor.
fn cut_mesh(
    direction: WallDirection,
    plane: f64,
    base_y: f64,
    thickness: f64,
    opening: Opening,
) -> Mesh {
    let half = thickness / 2.0 + CUT_MARGIN;
    let bottom = if opening.sill <= 0.0 {
        base_y - CUT_MARGIN
    } else {
        base_y + opening.sill
    };
    let top = base_y + opening.sill + opening.height;

    if direction.runs_along_x() {
        box_mesh(
            Point3::new(opening.center - opening.width / 2.0, bottom, plane - half),
            Point3::new(opening.center + opening.width / 2.0, top, plane + half),
        )
    } else {
        box_mesh(
            Point3::new(plane - half, bottom, opening.center - opening.width / 2.0),
            Point3::new(plane + half, top, opening.center + opening.width / 2.0),
        )
    }
}

/// Glass pane filling a window opening, centered in the wall plane
fn pane_mesh(direction: WallDirection, plane: f64, base_y: f64, opening: Opening) -> Mesh {
    let bottom = base_y + opening.sill;
    let top = bottom + opening.height;

    if direction.runs_along_x() {
        box_mesh(
            Point3::new(
                opening.center - opening.width / 2.0,
                bottom,
                plane - PANE_HALF_THICKNESS,
            ),
            Point3::new(
                opening.center + opening.width / 2.0,
                top,
                plane + PANE_HALF_THICKNESS,
            ),
        )
    } else {
        box_mesh(
            Point3::new(
                plane - PANE_HALF_THICKNESS,
                bottom,
                opening.center - opening.width / 2.0,
            ),
            Point3::new(
                plane + PANE_HALF_THICKNESS,
                top,
                opening.center + opening.width / 2.0,
            ),
        )
    }
}

/// Opening carried by the wall record itself (exterior doors, windows
/// not tied to a connection). Centered on the run unless an explicit
/// offset is given.
fn wall_feature_opening(
    room: &Room,
    direction: WallDirection,
    wall_height: f64,
    config: &GlobalConfig,
) -> Option<Opening> {
    let wall = room.wall(direction);
    let (run_start, run_end) = room.wall_run(direction);

    let (default_width, default_height, sill) = match wall.kind {
        WallKind::Door => (config.door_width, config.door_height, 0.0),
        WallKind::Window => (config.window_width, config.window_height, config.window_sill),
        WallKind::Solid | WallKind::Open => return None,
    };

    let width = wall.opening_width.unwrap_or(default_width);
    let height = wall
        .opening_height
        .unwrap_or(default_height)
        .min(wall_height - sill);

    let center = match wall.opening_offset {
        Some(offset) => run_start + offset,
        None => (run_start + run_end) / 2.0,
    };
    let half = (width / 2.0).min((run_end - run_start) / 2.0);
    let center = center.clamp(run_start + half, run_end - half);

    Some(Opening {
        center,
        width,
        sill,
        height,
    })
}

/// Opening for a matched connection, positioned from the source room
fn connection_opening(
    matched: &MatchedConnection<'_>,
    room: &Room,
    floor: &Floor,
    wall_height: f64,
    config: &GlobalConfig,
) -> Opening {
    let connection = matched.connection;

    let (default_width, default_height, sill) = match connection.kind {
        ConnectionKind::Door => (config.door_width, config.door_height, 0.0),
        ConnectionKind::DoubleDoor => (config.door_width * 2.0, config.door_height, 0.0),
        ConnectionKind::Opening => (config.door_width, wall_height, 0.0),
        ConnectionKind::Window => (config.window_width, config.window_height, config.window_sill),
    };

    let width = connection.width.unwrap_or(default_width);
    let height = connection
        .height
        .unwrap_or(default_height)
        .min(wall_height - sill);

    // Placement always resolves against the source room so both sides
    // of the connection agree; a missing source degrades to this room
    let source = floor.room(&connection.from_room).unwrap_or(room);
    let center = opening_center(connection, source, width);

    Opening {
        center,
        width,
        sill,
        height,
    }
}

fn opens_into_this_room(connection: &Connection, room: &Room) -> bool {
    connection
        .opens_into
        .as_deref()
        .unwrap_or(&connection.to_room)
        == room.name
}

/// Leaf meshes for one connection opening: a single leaf, or two
/// half-width leaves hinged at the opening edges for double doors.
fn leaves_for_opening(
    connection: &Connection,
    room: &Room,
    direction: WallDirection,
    opening: Opening,
    plane: f64,
    base_y: f64,
) -> Vec<Mesh> {
    let opens_in = opens_into_this_room(connection, room);
    match connection.kind {
        ConnectionKind::DoubleDoor => {
            let hinge = crate::door::hinge_sign(direction, connection.swing);
            let quarter = opening.width / 4.0;
            let mirrored = match connection.swing {
                floorgen_core::SwingSide::Left => floorgen_core::SwingSide::Right,
                floorgen_core::SwingSide::Right => floorgen_core::SwingSide::Left,
            };
            vec![
                door_leaf_mesh(
                    direction,
                    connection.swing,
                    opens_in,
                    opening.center + hinge * quarter,
                    plane,
                    base_y,
                    opening.width / 2.0,
                    opening.height,
                ),
                door_leaf_mesh(
                    direction,
                    mirrored,
                    opens_in,
                    opening.center - hinge * quarter,
                    plane,
                    base_y,
                    opening.width / 2.0,
                    opening.height,
                ),
            ]
        }
        _ => vec![door_leaf_mesh(
            direction,
            connection.swing,
            opens_in,
            opening.center,
            plane,
            base_y,
            opening.width,
            opening.height,
        )],
    }
}

/// Door leaves a room hangs for one matched connection, sized and
/// positioned the same whether or not this room renders the wall.
/// Empty when the connection has no leaf or leaf resolution lands on
/// the other side.
pub fn door_leaves_for_connection(
    matched: &MatchedConnection<'_>,
    room: &Room,
    direction: WallDirection,
    floor: &Floor,
    config: &GlobalConfig,
    base_y: f64,
) -> Vec<Mesh> {
    let connection = matched.connection;
    if !has_door_leaf(connection.kind) || !should_render_door(matched, room, &floor.rooms) {
        return Vec::new();
    }

    let wall_height = room
        .wall(direction)
        .height
        .or(room.height)
        .unwrap_or(floor.height);
    let opening = connection_opening(matched, room, floor, wall_height, config);
    let plane = room.wall_plane(direction);
    leaves_for_opening(connection, room, direction, opening, plane, base_y)
}

/// Build one rendered wall: solid, cuts, material groups, door
/// leaves, and glass panes.
///
/// Returns `None` for `Open` walls, which produce no geometry at all.
/// Callers have already decided via ownership analysis that this room
/// renders the wall.
pub fn build_wall(
    room: &Room,
    direction: WallDirection,
    floor: &Floor,
    config: &GlobalConfig,
    evaluator: &BooleanEvaluator,
    base_y: f64,
) -> Result<Option<WallBuild>> {
    let wall = room.wall(direction);
    if wall.kind == WallKind::Open {
        return Ok(None);
    }

    let wall_height = wall
        .height
        .or(room.height)
        .unwrap_or(floor.height);
    let plane = room.wall_plane(direction);
    let thickness = config.wall_thickness;

    let mut openings: Vec<Opening> = Vec::new();
    let mut doors: Vec<Mesh> = Vec::new();
    let mut glass: Vec<Mesh> = Vec::new();

    if let Some(opening) = wall_feature_opening(room, direction, wall_height, config) {
        openings.push(opening);
        match wall.kind {
            WallKind::Door => {
                // Standalone door: default swing, opening into the room
                doors.push(door_leaf_mesh(
                    direction,
                    Default::default(),
                    true,
                    opening.center,
                    plane,
                    base_y,
                    opening.width,
                    opening.height,
                ));
            }
            WallKind::Window => glass.push(pane_mesh(direction, plane, base_y, opening)),
            _ => {}
        }
    }

    for matched in connections_for_wall(&room.name, direction, &floor.connections) {
        let opening = connection_opening(&matched, room, floor, wall_height, config);
        openings.push(opening);

        let connection = matched.connection;
        if connection.kind == ConnectionKind::Window {
            glass.push(pane_mesh(direction, plane, base_y, opening));
            continue;
        }

        if !has_door_leaf(connection.kind)
            || !should_render_door(&matched, room, &floor.rooms)
        {
            continue;
        }

        doors.extend(leaves_for_opening(
            connection, room, direction, opening, plane, base_y,
        ));
    }

    let solid = wall_solid(room, direction, base_y, wall_height, thickness);
    let cuts: Vec<Mesh> = openings
        .iter()
        .map(|&opening| cut_mesh(direction, plane, base_y, thickness, opening))
        .collect();

    let mut mesh = evaluator.subtract_all(&solid, &cuts)?;
    reassign_material_groups(&mut mesh);

    Ok(Some(WallBuild { mesh, doors, glass }))
}
