// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Connection matching
//!
//! Finds the connections touching a given room+wall and resolves which
//! side renders the cut and the door leaf. Opening positions are
//! always computed from the *source* room (the connection's
//! `from_room`) so both sides agree on placement regardless of room
//! size mismatch.

use floorgen_core::{Connection, ConnectionKind, ConnectionPosition, Room, WallDirection, WallKind};

/// Which endpoint of a connection the analyzed room is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionSide {
    From,
    To,
}

/// A connection annotated with the side it represents for a room+wall
#[derive(Debug, Clone)]
pub struct MatchedConnection<'a> {
    pub connection: &'a Connection,
    pub side: ConnectionSide,
}

impl<'a> MatchedConnection<'a> {
    /// Name of the room on the other side
    pub fn other_room(&self) -> &str {
        match self.side {
            ConnectionSide::From => &self.connection.to_room,
            ConnectionSide::To => &self.connection.from_room,
        }
    }

    /// The other side's wall direction
    pub fn other_wall(&self) -> WallDirection {
        match self.side {
            ConnectionSide::From => self.connection.to_wall,
            ConnectionSide::To => self.connection.from_wall,
        }
    }

    /// This side's wall direction
    pub fn own_wall(&self) -> WallDirection {
        match self.side {
            ConnectionSide::From => self.connection.from_wall,
            ConnectionSide::To => self.connection.to_wall,
        }
    }
}

/// All connections whose `from` or `to` endpoint is this room+wall
pub fn connections_for_wall<'a>(
    room_name: &str,
    direction: WallDirection,
    connections: &'a [Connection],
) -> Vec<MatchedConnection<'a>> {
    let mut matched = Vec::new();
    for connection in connections {
        if connection.from_room == room_name && connection.from_wall == direction {
            matched.push(MatchedConnection {
                connection,
                side: ConnectionSide::From,
            });
        } else if connection.to_room == room_name && connection.to_wall == direction {
            matched.push(MatchedConnection {
                connection,
                side: ConnectionSide::To,
            });
        }
    }
    matched
}

/// Opening center along the source room's wall run, in world run-axis
/// coordinates, clamped so the opening stays inside the source wall.
pub fn opening_center(connection: &Connection, from_room: &Room, opening_width: f64) -> f64 {
    let (start, end) = from_room.wall_run(connection.from_wall);
    let length = end - start;

    let center = match connection.position {
        ConnectionPosition::Percent(p) => start + length * (p / 100.0),
        ConnectionPosition::Absolute(offset) => start + offset,
    };

    let half = (opening_width / 2.0).min(length / 2.0);
    center.clamp(start + half, end - half)
}

/// Decide whether this side renders the door leaf.
///
/// The side whose own wall is solid while the opposite wall is open
/// always renders: the open side has no wall to hang a door on. When
/// both sides agree (both solid or both open), the `from` side renders
/// by convention. When the opposite room cannot be located at all
/// (cross-floor or malformed data): the `from` side renders, honoring
/// original intent; the `to` side does not, assuming the absent
/// `from` room would have.
pub fn should_render_door(matched: &MatchedConnection<'_>, room: &Room, rooms: &[Room]) -> bool {
    let Some(other) = rooms.iter().find(|r| r.name == matched.other_room()) else {
        return matched.side == ConnectionSide::From;
    };

    let own_open = room.wall(matched.own_wall()).kind == WallKind::Open;
    let other_open = other.wall(matched.other_wall()).kind == WallKind::Open;

    match (own_open, other_open) {
        (false, true) => true,
        (true, false) => false,
        _ => matched.side == ConnectionSide::From,
    }
}

/// Whether a connection kind carries a door leaf at all
pub fn has_door_leaf(kind: ConnectionKind) -> bool {
    matches!(kind, ConnectionKind::Door | ConnectionKind::DoubleDoor)
}
