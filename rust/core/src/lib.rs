// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! floorgen-core
//!
//! The normalized record set consumed by the geometry engine: floors,
//! rooms, walls, connections, stairs and lifts, plus the global
//! generation config and style records. All dimensions are converted
//! to canonical meters by [`units::normalize_floor`] before any
//! geometry is built.

pub mod model;
pub mod units;

pub use model::{
    Connection, ConnectionKind, ConnectionPosition, Floor, GlobalConfig, HandrailStyle, Lift,
    Room, Stair, StairSegment, StairShape, StringerStyle, Style, SwingSide, TurnSide, Wall,
    WallDirection, WallKind,
};
pub use units::{normalize_floor, LengthUnit};
