// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Unit normalization
//!
//! Converts every room/wall/connection/stair/lift measurement to
//! canonical meters before any geometry is built. Positions along a
//! wall given as percentages are left untouched.

use crate::model::{ConnectionPosition, Floor};
use serde::{Deserialize, Serialize};

/// Source length unit of a record set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthUnit {
    Millimeters,
    Centimeters,
    #[default]
    Meters,
    Feet,
    Inches,
}

impl LengthUnit {
    /// Multiplier converting this unit to meters
    #[inline]
    pub fn to_meters(self) -> f64 {
        match self {
            LengthUnit::Millimeters => 1e-3,
            LengthUnit::Centimeters => 1e-2,
            LengthUnit::Meters => 1.0,
            LengthUnit::Feet => 0.3048,
            LengthUnit::Inches => 0.0254,
        }
    }
}

/// Scale every length on a floor to meters in place.
///
/// Percent positions are dimensionless and stay as-is; absolute
/// connection positions scale with everything else.
pub fn normalize_floor(floor: &mut Floor, unit: LengthUnit) {
    let s = unit.to_meters();
    if s == 1.0 {
        return;
    }

    floor.elevation *= s;
    floor.height *= s;

    for room in &mut floor.rooms {
        room.x *= s;
        room.z *= s;
        room.width *= s;
        room.depth *= s;
        room.elevation *= s;
        if let Some(h) = &mut room.height {
            *h *= s;
        }
        for dir in crate::model::WallDirection::ALL {
            let wall = room.wall_mut(dir);
            if let Some(v) = &mut wall.opening_offset {
                *v *= s;
            }
            if let Some(v) = &mut wall.opening_width {
                *v *= s;
            }
            if let Some(v) = &mut wall.opening_height {
                *v *= s;
            }
            if let Some(v) = &mut wall.height {
                *v *= s;
            }
        }
    }

    for conn in &mut floor.connections {
        if let ConnectionPosition::Absolute(v) = &mut conn.position {
            *v *= s;
        }
        if let Some(v) = &mut conn.width {
            *v *= s;
        }
        if let Some(v) = &mut conn.height {
            *v *= s;
        }
    }

    for stair in &mut floor.stairs {
        stair.x *= s;
        stair.z *= s;
        stair.rise *= s;
        if let Some(v) = &mut stair.width {
            *v *= s;
        }
        if let Some(v) = &mut stair.riser_height {
            *v *= s;
        }
        if let Some(v) = &mut stair.tread_depth {
            *v *= s;
        }
        if let crate::model::StairShape::Spiral {
            inner_radius,
            outer_radius,
            ..
        }
        | crate::model::StairShape::Curved {
            inner_radius,
            outer_radius,
            ..
        } = &mut stair.shape
        {
            *inner_radius *= s;
            *outer_radius *= s;
        }
        if let crate::model::StairShape::LShaped { landing, .. }
        | crate::model::StairShape::UShaped { landing, .. }
        | crate::model::StairShape::DoubleL { landing, .. } = &mut stair.shape
        {
            if let Some(v) = landing {
                *v *= s;
            }
        }
    }

    for lift in &mut floor.lifts {
        lift.x *= s;
        lift.z *= s;
        lift.width *= s;
        lift.depth *= s;
    }
}
