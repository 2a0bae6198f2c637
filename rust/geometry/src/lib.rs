// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! 3D geometry generation for floor plans
//!
//! Turns normalized floor records into tagged triangle meshes: walls
//! with boolean-cut openings and per-face material groups, door
//! leaves, glass panes, floor and ceiling plates, stairs, and lift
//! shafts. One [`Generator`] serves a whole building; independent
//! floors generate in parallel.

pub mod adjacency;
pub mod connection;
pub mod csg;
pub mod door;
pub mod error;
pub mod generator;
pub mod material;
pub mod mesh;
pub mod scene;
pub mod stair;
pub mod triangulation;
pub mod wall;

pub use adjacency::{analyze_wall, AdjacencyOverlap, WallOwnership, WallSegment, EPSILON};
pub use connection::{connections_for_wall, opening_center, ConnectionSide, MatchedConnection};
pub use csg::{box_mesh, BooleanEvaluator};
pub use door::{door_angle, door_leaf_mesh, hinge_point};
pub use error::{Error, Result};
pub use generator::{stack_elevations, Generator};
pub use material::{MaterialFactory, SurfaceKind, SurfaceMaterial, Texture, TextureCache};
pub use mesh::{FaceGroup, Mesh};
pub use scene::{Diagnostic, FloorScene, MeshTag, SceneMesh, Severity};
pub use stair::{build_lift, build_stair, stair_layout, StairBuild, StairLayout};
pub use wall::{
    build_wall, door_leaves_for_connection, material_slot, reassign_material_groups, WallBuild,
};
