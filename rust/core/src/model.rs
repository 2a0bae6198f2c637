// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Normalized floor/room/wall/connection/stair/lift records
//!
//! These are produced by the (out-of-scope) parser with defaults
//! already applied: every room carries an explicit wall entry per
//! direction. Rooms live in the XZ plane, Y is up. A room's origin
//! is its top-left corner in plan view: `top` is the wall at `z`,
//! `bottom` at `z + depth`, `left` at `x`, `right` at `x + width`.

use serde::{Deserialize, Serialize};

/// One of the four wall directions of a rectangular room
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WallDirection {
    Top,
    Bottom,
    Left,
    Right,
}

impl WallDirection {
    /// All four directions in stable generation order
    pub const ALL: [WallDirection; 4] = [
        WallDirection::Top,
        WallDirection::Bottom,
        WallDirection::Left,
        WallDirection::Right,
    ];

    /// The direction a facing wall of an adjacent room would have
    #[inline]
    pub fn opposite(self) -> WallDirection {
        match self {
            WallDirection::Top => WallDirection::Bottom,
            WallDirection::Bottom => WallDirection::Top,
            WallDirection::Left => WallDirection::Right,
            WallDirection::Right => WallDirection::Left,
        }
    }

    /// Whether this wall's run axis is world X (top/bottom) or Z (left/right)
    #[inline]
    pub fn runs_along_x(self) -> bool {
        matches!(self, WallDirection::Top | WallDirection::Bottom)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            WallDirection::Top => "top",
            WallDirection::Bottom => "bottom",
            WallDirection::Left => "left",
            WallDirection::Right => "right",
        }
    }
}

/// Wall type tag. A wall of kind `Open` never produces geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WallKind {
    #[default]
    Solid,
    Open,
    Door,
    Window,
}

/// One wall entry per direction per room
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Wall {
    #[serde(default)]
    pub kind: WallKind,
    /// Explicit opening center along the wall run, from the run start (meters)
    #[serde(default)]
    pub opening_offset: Option<f64>,
    #[serde(default)]
    pub opening_width: Option<f64>,
    #[serde(default)]
    pub opening_height: Option<f64>,
    /// Height override for this wall only
    #[serde(default)]
    pub height: Option<f64>,
}

impl Wall {
    pub fn solid() -> Self {
        Wall::default()
    }

    pub fn of_kind(kind: WallKind) -> Self {
        Wall {
            kind,
            ..Wall::default()
        }
    }
}

/// A rectangular room on a floor. Immutable once a generation pass begins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    /// Unique per floor
    pub name: String,
    pub x: f64,
    pub z: f64,
    pub width: f64,
    pub depth: f64,
    /// Base elevation relative to the floor's elevation
    #[serde(default)]
    pub elevation: f64,
    #[serde(default)]
    pub top: Wall,
    #[serde(default)]
    pub bottom: Wall,
    #[serde(default)]
    pub left: Wall,
    #[serde(default)]
    pub right: Wall,
    /// Style reference; falls back to the config default
    #[serde(default)]
    pub style: Option<String>,
    /// Explicit room height; falls back to the floor height
    #[serde(default)]
    pub height: Option<f64>,
}

impl Room {
    pub fn new(name: impl Into<String>, x: f64, z: f64, width: f64, depth: f64) -> Self {
        Room {
            name: name.into(),
            x,
            z,
            width,
            depth,
            elevation: 0.0,
            top: Wall::default(),
            bottom: Wall::default(),
            left: Wall::default(),
            right: Wall::default(),
            style: None,
            height: None,
        }
    }

    #[inline]
    pub fn wall(&self, direction: WallDirection) -> &Wall {
        match direction {
            WallDirection::Top => &self.top,
            WallDirection::Bottom => &self.bottom,
            WallDirection::Left => &self.left,
            WallDirection::Right => &self.right,
        }
    }

    #[inline]
    pub fn wall_mut(&mut self, direction: WallDirection) -> &mut Wall {
        match direction {
            WallDirection::Top => &mut self.top,
            WallDirection::Bottom => &mut self.bottom,
            WallDirection::Left => &mut self.left,
            WallDirection::Right => &mut self.right,
        }
    }

    /// World coordinate of the wall plane: Z for top/bottom, X for left/right
    #[inline]
    pub fn wall_plane(&self, direction: WallDirection) -> f64 {
        match direction {
            WallDirection::Top => self.z,
            WallDirection::Bottom => self.z + self.depth,
            WallDirection::Left => self.x,
            WallDirection::Right => self.x + self.width,
        }
    }

    /// Start/end of the wall along its run axis (X for top/bottom, Z for left/right)
    #[inline]
    pub fn wall_run(&self, direction: WallDirection) -> (f64, f64) {
        if direction.runs_along_x() {
            (self.x, self.x + self.width)
        } else {
            (self.z, self.z + self.depth)
        }
    }

    /// Room origin along the axis perpendicular to a wall's run
    /// (the quantity compared by the ownership tie-break)
    #[inline]
    pub fn origin_for(&self, direction: WallDirection) -> f64 {
        if direction.runs_along_x() {
            self.z
        } else {
            self.x
        }
    }
}

/// Door-type tag on a connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConnectionKind {
    #[default]
    Door,
    DoubleDoor,
    Opening,
    Window,
}

/// Opening position along the *source* room's wall
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionPosition {
    /// 0–100 along the source wall's run
    Percent(f64),
    /// Meters from the source wall's run start
    Absolute(f64),
}

impl Default for ConnectionPosition {
    fn default() -> Self {
        ConnectionPosition::Percent(50.0)
    }
}

/// Which edge of the opening the door leaf pivots from,
/// facing the opening from inside the room
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwingSide {
    Left,
    #[default]
    Right,
}

/// An inter-room opening. The only cross-room relationship that needs
/// resolution of which side renders the cut and the door leaf.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Connection {
    pub from_room: String,
    pub from_wall: WallDirection,
    pub to_room: String,
    pub to_wall: WallDirection,
    #[serde(default)]
    pub kind: ConnectionKind,
    #[serde(default)]
    pub position: ConnectionPosition,
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default)]
    pub height: Option<f64>,
    #[serde(default)]
    pub swing: SwingSide,
    /// Which room the door opens into; defaults to the destination room
    #[serde(default)]
    pub opens_into: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnSide {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StringerStyle {
    #[default]
    Closed,
    /// Omits riser faces: treads only
    Open,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HandrailStyle {
    #[default]
    None,
    Left,
    Right,
    Both,
}

/// A segment of a custom stair: either a straight flight or a
/// quarter-turn landing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum StairSegment {
    Flight { steps: u32 },
    Turn { side: TurnSide },
}

/// Stair topology descriptor. Adding a topology means adding a variant
/// here and a handler in the generator; tags not recognized by the
/// parser arrive as `Unknown` and fall back to a straight stair.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "kebab-case")]
pub enum StairShape {
    #[default]
    Straight,
    LShaped {
        runs: [u32; 2],
        turn: TurnSide,
        #[serde(default)]
        landing: Option<f64>,
    },
    UShaped {
        runs: [u32; 2],
        turn: TurnSide,
        #[serde(default)]
        landing: Option<f64>,
    },
    DoubleL {
        runs: [u32; 3],
        turns: [TurnSide; 2],
        #[serde(default)]
        landing: Option<f64>,
    },
    Spiral {
        inner_radius: f64,
        outer_radius: f64,
        /// Total arc in degrees; defaults to one full turn
        #[serde(default)]
        arc: Option<f64>,
    },
    Curved {
        inner_radius: f64,
        outer_radius: f64,
        /// Total arc in degrees; defaults to a quarter turn
        #[serde(default)]
        arc: Option<f64>,
    },
    Winder {
        runs: [u32; 2],
        turn: TurnSide,
    },
    Segments {
        segments: Vec<StairSegment>,
    },
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stair {
    pub name: String,
    pub x: f64,
    pub z: f64,
    /// Yaw of the whole stair in degrees, counter-clockwise in plan view
    #[serde(default)]
    pub rotation: f64,
    /// Total rise the stair must land on exactly
    pub rise: f64,
    #[serde(default)]
    pub shape: StairShape,
    #[serde(default)]
    pub width: Option<f64>,
    /// Target riser height; the actual riser is derived from the rise
    #[serde(default)]
    pub riser_height: Option<f64>,
    #[serde(default)]
    pub tread_depth: Option<f64>,
    #[serde(default)]
    pub stringer: StringerStyle,
    #[serde(default)]
    pub handrail: HandrailStyle,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lift {
    pub name: String,
    pub x: f64,
    pub z: f64,
    pub width: f64,
    pub depth: f64,
    /// Shaft faces that get a door marker
    #[serde(default)]
    pub doors: Vec<WallDirection>,
}

/// One floor of a building. Floors never reference another floor's rooms.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Floor {
    pub name: String,
    #[serde(default)]
    pub elevation: f64,
    /// Default room height on this floor
    pub height: f64,
    #[serde(default)]
    pub rooms: Vec<Room>,
    #[serde(default)]
    pub connections: Vec<Connection>,
    #[serde(default)]
    pub stairs: Vec<Stair>,
    #[serde(default)]
    pub lifts: Vec<Lift>,
    /// Emit a ceiling plate per room
    #[serde(default)]
    pub ceilings: bool,
}

impl Floor {
    pub fn room(&self, name: &str) -> Option<&Room> {
        self.rooms.iter().find(|r| r.name == name)
    }
}

/// Resolved style record from the (out-of-scope) style/theme system
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Style {
    #[serde(default)]
    pub color: Option<[f32; 4]>,
    #[serde(default)]
    pub texture: Option<String>,
    #[serde(default)]
    pub roughness: Option<f32>,
    #[serde(default)]
    pub metalness: Option<f32>,
}

/// Global generation config: wall thickness, default opening sizes,
/// default heights. Shared read-only across floors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalConfig {
    pub wall_thickness: f64,
    pub default_height: f64,
    pub door_width: f64,
    pub door_height: f64,
    pub window_width: f64,
    pub window_height: f64,
    pub window_sill: f64,
    pub default_style: Option<String>,
    /// Target riser height stairs aim for before rounding
    pub target_riser: f64,
    pub tread_depth: f64,
    pub stair_width: f64,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        GlobalConfig {
            wall_thickness: 0.2,
            default_height: 2.6,
            door_width: 0.9,
            door_height: 2.1,
            window_width: 1.2,
            window_height: 1.2,
            window_sill: 0.9,
            default_style: None,
            target_riser: 0.18,
            tread_depth: 0.27,
            stair_width: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wall_plane_and_run() {
        let room = Room::new("kitchen", 2.0, 3.0, 4.0, 5.0);
        assert_eq!(room.wall_plane(WallDirection::Top), 3.0);
        assert_eq!(room.wall_plane(WallDirection::Bottom), 8.0);
        assert_eq!(room.wall_plane(WallDirection::Left), 2.0);
        assert_eq!(room.wall_plane(WallDirection::Right), 6.0);

        assert_eq!(room.wall_run(WallDirection::Top), (2.0, 6.0));
        assert_eq!(room.wall_run(WallDirection::Left), (3.0, 8.0));
    }

    #[test]
    fn test_direction_opposite() {
        for dir in WallDirection::ALL {
            assert_eq!(dir.opposite().opposite(), dir);
        }
        assert_eq!(WallDirection::Left.opposite(), WallDirection::Right);
        assert_eq!(WallDirection::Top.opposite(), WallDirection::Bottom);
    }

    #[test]
    fn test_stair_shape_roundtrip() {
        let shape = StairShape::LShaped {
            runs: [5, 5],
            turn: TurnSide::Right,
            landing: None,
        };
        let json = serde_json::to_string(&shape).unwrap();
        let back: StairShape = serde_json::from_str(&json).unwrap();
        assert_eq!(back, shape);
    }

    #[test]
    fn test_unknown_stair_shape_tag() {
        // Tags the parser does not recognize must still deserialize
        let back: StairShape = serde_json::from_str(r#"{"shape":"helical-fancy"}"#).unwrap();
        assert_eq!(back, StairShape::Unknown);
    }

    #[test]
    fn test_connection_defaults() {
        let conn: Connection = serde_json::from_str(
            r#"{"from_room":"a","from_wall":"right","to_room":"b","to_wall":"left"}"#,
        )
        .unwrap();
        assert_eq!(conn.kind, ConnectionKind::Door);
        assert_eq!(conn.swing, SwingSide::Right);
        assert_eq!(conn.position, ConnectionPosition::Percent(50.0));
    }
}
