// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Floor generation pass
//!
//! Drives ownership analysis, wall building, plates, stairs, and
//! lifts for one floor, and fans independent floors out over rayon.
//! Floors never read each other's rooms; the texture cache is the only
//! shared mutable state.

use crate::adjacency::analyze_wall;
use crate::connection::connections_for_wall;
use crate::csg::{box_mesh, BooleanEvaluator};
use crate::error::Error;
use crate::material::{MaterialFactory, SurfaceKind, SurfaceMaterial, TextureCache};
use crate::scene::{Diagnostic, FloorScene, MeshTag, SceneMesh, Severity};
use crate::stair::{build_lift, build_stair};
use crate::wall::{build_wall, door_leaves_for_connection};
use floorgen_core::{Floor, GlobalConfig, Room, Style, WallDirection, WallKind};
use nalgebra::Point3;
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Floor and ceiling plate thickness
const PLATE_THICKNESS: f64 = 0.1;

/// Number of wall material slots (one per box face axis/sign)
const WALL_SLOTS: usize = 6;

/// Geometry generator for a building's floors.
///
/// Holds the shared read-only config and the material factory; one
/// generator serves any number of floors, sequentially or in parallel.
pub struct Generator {
    config: GlobalConfig,
    factory: MaterialFactory,
    evaluator: BooleanEvaluator,
}

impl Generator {
    pub fn new(config: GlobalConfig, styles: FxHashMap<String, Style>) -> Self {
        Self::with_cache(config, styles, Arc::new(TextureCache::new()))
    }

    /// Build a generator sharing an existing texture cache
    pub fn with_cache(
        config: GlobalConfig,
        styles: FxHashMap<String, Style>,
        cache: Arc<TextureCache>,
    ) -> Self {
        let default_style = config.default_style.clone();
        Generator {
            config,
            factory: MaterialFactory::new(cache, styles, default_style),
            evaluator: BooleanEvaluator::new(),
        }
    }

    pub fn config(&self) -> &GlobalConfig {
        &self.config
    }

    pub fn factory(&self) -> &MaterialFactory {
        &self.factory
    }

    /// Release cached textures. Call once after the last floor.
    pub fn dispose(&self) {
        self.factory.dispose();
    }

    /// Generate every floor, independent floors in parallel
    pub fn generate_all(&self, floors: &[Floor]) -> Vec<FloorScene> {
        floors.par_iter().map(|floor| self.generate_floor(floor)).collect()
    }

    /// Generate one floor. Per-element failures become diagnostics on
    /// the returned scene; the pass itself never fails.
    pub fn generate_floor(&self, floor: &Floor) -> FloorScene {
        info!(floor = %floor.name, rooms = floor.rooms.len(), "generating floor");

        let mut scene = FloorScene {
            name: floor.name.clone(),
            elevation: floor.elevation,
            meshes: Vec::new(),
            diagnostics: Vec::new(),
        };

        // Connections naming rooms absent from this floor degrade to
        // the one-sided fallback; put that on record
        for connection in &floor.connections {
            for name in [&connection.from_room, &connection.to_room] {
                if floor.room(name).is_none() {
                    let e = Error::missing(format!(
                        "connection references room '{}' not on floor '{}'",
                        name, floor.name
                    ));
                    warn!(room = %name, floor = %floor.name, "connection endpoint missing");
                    scene.diagnostics.push(Diagnostic {
                        severity: Severity::Warn,
                        element: name.clone(),
                        message: e.to_string(),
                    });
                }
            }
        }

        for room in &floor.rooms {
            self.generate_room(room, floor, &mut scene);
        }

        for stair in &floor.stairs {
            match build_stair(stair, &self.config, floor.elevation) {
                Ok(build) => {
                    scene.meshes.push(SceneMesh {
                        tag: MeshTag::Stair,
                        room: None,
                        name: stair.name.clone(),
                        mesh: build.mesh,
                        materials: vec![self.factory.resolve(SurfaceKind::StairTread, None)],
                    });
                    if !build.rails.is_empty() {
                        scene.meshes.push(SceneMesh {
                            tag: MeshTag::Handrail,
                            room: None,
                            name: format!("{}/handrail", stair.name),
                            mesh: build.rails,
                            materials: vec![self.factory.resolve(SurfaceKind::Handrail, None)],
                        });
                    }
                }
                Err(e) => {
                    warn!(stair = %stair.name, error = %e, "skipping stair");
                    scene.diagnostics.push(Diagnostic {
                        severity: Severity::Error,
                        element: stair.name.clone(),
                        message: e.to_string(),
                    });
                }
            }
        }

        for lift in &floor.lifts {
            match build_lift(lift, &self.config, floor.elevation, floor.height) {
                Ok(mesh) => scene.meshes.push(SceneMesh {
                    tag: MeshTag::Lift,
                    room: None,
                    name: lift.name.clone(),
                    mesh,
                    materials: vec![self.factory.resolve(SurfaceKind::LiftShaft, None)],
                }),
                Err(e) => {
                    warn!(lift = %lift.name, error = %e, "skipping lift");
                    scene.diagnostics.push(Diagnostic {
                        severity: Severity::Error,
                        element: lift.name.clone(),
                        message: e.to_string(),
                    });
                }
            }
        }

        debug!(
            floor = %floor.name,
            meshes = scene.meshes.len(),
            diagnostics = scene.diagnostics.len(),
            "floor generated"
        );
        scene
    }

    fn generate_room(&self, room: &Room, floor: &Floor, scene: &mut FloorScene) {
        let base_y = floor.elevation + room.elevation;
        let room_height = room.height.unwrap_or(floor.height);
        let style = room.style.as_deref();

        for direction in WallDirection::ALL {
            // Open walls and walls owned by the adjacent room produce
            // no solid here, but leaf resolution can still land on
            // this side (both-open and covered-wall cases)
            let open = room.wall(direction).kind == WallKind::Open;
            if open || !analyze_wall(room, direction, &floor.rooms).render {
                self.orphan_leaves(room, direction, floor, base_y, scene);
                continue;
            }

            match build_wall(room, direction, floor, &self.config, &self.evaluator, base_y) {
                Ok(Some(build)) => {
                    let wall_material = self.factory.resolve(SurfaceKind::Wall, style);
                    scene.meshes.push(SceneMesh {
                        tag: MeshTag::Wall,
                        room: Some(room.name.clone()),
                        name: format!("{}/{}", room.name, direction.as_str()),
                        mesh: build.mesh,
                        materials: vec![wall_material; WALL_SLOTS],
                    });
                    self.push_attachments(room, direction, build.doors, build.glass, scene);
                }
                Ok(None) => {}
                Err(e) => {
                    warn!(room = %room.name, wall = direction.as_str(), error = %e, "skipping wall");
                    scene.diagnostics.push(Diagnostic {
                        severity: Severity::Error,
                        element: format!("{}/{}", room.name, direction.as_str()),
                        message: e.to_string(),
                    });
                }
            }
        }

        // Floor plate under the room footprint
        scene.meshes.push(SceneMesh {
            tag: MeshTag::FloorPlate,
            room: Some(room.name.clone()),
            name: format!("{}/floor", room.name),
            mesh: box_mesh(
                Point3::new(room.x, base_y - PLATE_THICKNESS, room.z),
                Point3::new(room.x + room.width, base_y, room.z + room.depth),
            ),
            materials: vec![self.factory.resolve(SurfaceKind::Floor, style)],
        });

        if floor.ceilings {
            scene.meshes.push(SceneMesh {
                tag: MeshTag::Ceiling,
                room: Some(room.name.clone()),
                name: format!("{}/ceiling", room.name),
                mesh: box_mesh(
                    Point3::new(room.x, base_y + room_height, room.z),
                    Point3::new(
                        room.x + room.width,
                        base_y + room_height + PLATE_THICKNESS,
                        room.z + room.depth,
                    ),
                ),
                materials: vec![self.factory.resolve(SurfaceKind::Ceiling, style)],
            });
        }
    }

    /// Door leaves this room must hang in a wall it does not render
    /// itself. Sizing and placement go through the same path as the
    /// in-wall case, so both sides always agree.
    fn orphan_leaves(
        &self,
        room: &Room,
        direction: WallDirection,
        floor: &Floor,
        base_y: f64,
        scene: &mut FloorScene,
    ) {
        for matched in connections_for_wall(&room.name, direction, &floor.connections) {
            let leaves =
                door_leaves_for_connection(&matched, room, direction, floor, &self.config, base_y);
            if !leaves.is_empty() {
                self.push_attachments(room, direction, leaves, Vec::new(), scene);
            }
        }
    }

    fn push_attachments(
        &self,
        room: &Room,
        direction: WallDirection,
        doors: Vec<crate::mesh::Mesh>,
        glass: Vec<crate::mesh::Mesh>,
        scene: &mut FloorScene,
    ) {
        let door_material = self.factory.resolve(SurfaceKind::Door, room.style.as_deref());
        for (i, mesh) in doors.into_iter().enumerate() {
            scene.meshes.push(SceneMesh {
                tag: MeshTag::Door,
                room: Some(room.name.clone()),
                name: format!("{}/{}/door{}", room.name, direction.as_str(), i),
                mesh,
                materials: vec![door_material.clone()],
            });
        }

        let glass_material: SurfaceMaterial = self.factory.resolve(SurfaceKind::Glass, None);
        for (i, mesh) in glass.into_iter().enumerate() {
            scene.meshes.push(SceneMesh {
                tag: MeshTag::Glass,
                room: Some(room.name.clone()),
                name: format!("{}/{}/glass{}", room.name, direction.as_str(), i),
                mesh,
                materials: vec![glass_material.clone()],
            });
        }
    }
}

/// Stack floors vertically: each floor's elevation becomes the sum of
/// the heights and plate thicknesses below it. Explicit elevations
/// are overwritten.
pub fn stack_elevations(floors: &mut [Floor]) {
    let mut elevation = 0.0;
    for floor in floors {
        floor.elevation = elevation;
        elevation += floor.height + PLATE_THICKNESS;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use floorgen_core::{Connection, ConnectionKind, ConnectionPosition, Room, Wall};

    fn two_room_floor() -> Floor {
        Floor {
            name: "ground".to_string(),
            elevation: 0.0,
            height: 2.6,
            rooms: vec![
                Room::new("hall", 0.0, 0.0, 4.0, 3.0),
                Room::new("study", 4.0, 0.0, 4.0, 3.0),
            ],
            connections: vec![Connection {
                from_room: "hall".to_string(),
                from_wall: WallDirection::Right,
                to_room: "study".to_string(),
                to_wall: WallDirection::Left,
                kind: ConnectionKind::Door,
                position: ConnectionPosition::Percent(50.0),
                width: None,
                height: None,
                swing: Default::default(),
                opens_into: None,
            }],
            stairs: Vec::new(),
            lifts: Vec::new(),
            ceilings: false,
        }
    }

    #[test]
    fn test_shared_wall_generated_once() {
        let generator = Generator::new(GlobalConfig::default(), Default::default());
        let scene = generator.generate_floor(&two_room_floor());

        // 8 walls total minus the shared one: 7 wall meshes
        assert_eq!(scene.tagged(MeshTag::Wall).count(), 7);
        assert!(scene
            .tagged(MeshTag::Wall)
            .any(|m| m.name == "hall/right"));
        assert!(!scene.tagged(MeshTag::Wall).any(|m| m.name == "study/left"));
        assert!(scene.diagnostics.is_empty());
    }

    #[test]
    fn test_every_room_gets_a_floor_plate() {
        let generator = Generator::new(GlobalConfig::default(), Default::default());
        let scene = generator.generate_floor(&two_room_floor());
        assert_eq!(scene.tagged(MeshTag::FloorPlate).count(), 2);
        assert_eq!(scene.tagged(MeshTag::Ceiling).count(), 0);
    }

    #[test]
    fn test_ceilings_opt_in() {
        let mut floor = two_room_floor();
        floor.ceilings = true;
        let generator = Generator::new(GlobalConfig::default(), Default::default());
        let scene = generator.generate_floor(&floor);
        assert_eq!(scene.tagged(MeshTag::Ceiling).count(), 2);
    }

    #[test]
    fn test_door_leaf_appears_exactly_once() {
        let generator = Generator::new(GlobalConfig::default(), Default::default());
        let scene = generator.generate_floor(&two_room_floor());
        assert_eq!(scene.tagged(MeshTag::Door).count(), 1);
    }

    #[test]
    fn test_double_door_leaf_count_independent_of_ownership() {
        // hall owns the shared wall; when study is the from side, its
        // leaves are hung without a wall of its own to build
        let mut floor = two_room_floor();
        floor.connections = vec![Connection {
            from_room: "study".to_string(),
            from_wall: WallDirection::Left,
            to_room: "hall".to_string(),
            to_wall: WallDirection::Right,
            kind: ConnectionKind::DoubleDoor,
            position: ConnectionPosition::Percent(50.0),
            width: None,
            height: None,
            swing: Default::default(),
            opens_into: None,
        }];

        let generator = Generator::new(GlobalConfig::default(), Default::default());
        let scene = generator.generate_floor(&floor);

        let doors: Vec<_> = scene.tagged(MeshTag::Door).collect();
        assert_eq!(doors.len(), 2);
        assert!(doors.iter().all(|d| d.room.as_deref() == Some("study")));

        // Swapping the endpoints so the owner is the from side must
        // give the same leaf count
        let mut mirrored = two_room_floor();
        mirrored.connections[0].kind = ConnectionKind::DoubleDoor;
        let scene = generator.generate_floor(&mirrored);
        assert_eq!(scene.tagged(MeshTag::Door).count(), 2);
    }

    #[test]
    fn test_leaf_hung_when_both_walls_open() {
        let mut floor = two_room_floor();
        floor.rooms[0].right = Wall::of_kind(floorgen_core::WallKind::Open);
        floor.rooms[1].left = Wall::of_kind(floorgen_core::WallKind::Open);

        let generator = Generator::new(GlobalConfig::default(), Default::default());
        let scene = generator.generate_floor(&floor);

        // Neither side produces a wall on the shared plane, but the
        // from side still hangs the leaf
        assert!(!scene
            .tagged(MeshTag::Wall)
            .any(|m| m.name == "hall/right" || m.name == "study/left"));
        let doors: Vec<_> = scene.tagged(MeshTag::Door).collect();
        assert_eq!(doors.len(), 1);
        assert_eq!(doors[0].room.as_deref(), Some("hall"));
    }

    #[test]
    fn test_missing_connection_room_warns() {
        let mut floor = two_room_floor();
        floor.connections.push(Connection {
            from_room: "hall".to_string(),
            from_wall: WallDirection::Top,
            to_room: "upstairs".to_string(),
            to_wall: WallDirection::Bottom,
            kind: ConnectionKind::Door,
            position: ConnectionPosition::Percent(50.0),
            width: None,
            height: None,
            swing: Default::default(),
            opens_into: None,
        });

        let generator = Generator::new(GlobalConfig::default(), Default::default());
        let scene = generator.generate_floor(&floor);

        // Degraded one-sided fallback is on record, generation intact
        assert_eq!(scene.diagnostics.len(), 1);
        assert_eq!(scene.diagnostics[0].severity, Severity::Warn);
        assert_eq!(scene.diagnostics[0].element, "upstairs");
        assert_eq!(scene.tagged(MeshTag::Wall).count(), 7);
    }

    #[test]
    fn test_handrails_tagged_separately_from_stair() {
        let mut floor = two_room_floor();
        floor.stairs.push(floorgen_core::Stair {
            name: "main".to_string(),
            x: 0.0,
            z: 0.0,
            rotation: 0.0,
            rise: 2.6,
            shape: Default::default(),
            width: None,
            riser_height: None,
            tread_depth: None,
            stringer: Default::default(),
            handrail: floorgen_core::HandrailStyle::Both,
        });

        let generator = Generator::new(GlobalConfig::default(), Default::default());
        let scene = generator.generate_floor(&floor);

        assert_eq!(scene.tagged(MeshTag::Stair).count(), 1);
        let rails: Vec<_> = scene.tagged(MeshTag::Handrail).collect();
        assert_eq!(rails.len(), 1);
        assert_eq!(rails[0].name, "main/handrail");
    }

    #[test]
    fn test_bad_stair_isolated_as_diagnostic() {
        let mut floor = two_room_floor();
        floor.stairs.push(floorgen_core::Stair {
            name: "broken".to_string(),
            x: 0.0,
            z: 0.0,
            rotation: 0.0,
            rise: 0.0,
            shape: Default::default(),
            width: None,
            riser_height: None,
            tread_depth: None,
            stringer: Default::default(),
            handrail: Default::default(),
        });

        let generator = Generator::new(GlobalConfig::default(), Default::default());
        let scene = generator.generate_floor(&floor);

        // The rest of the floor still generated
        assert_eq!(scene.tagged(MeshTag::Wall).count(), 7);
        assert_eq!(scene.tagged(MeshTag::Stair).count(), 0);
        assert_eq!(scene.diagnostics.len(), 1);
        assert_eq!(scene.diagnostics[0].element, "broken");
        assert_eq!(scene.diagnostics[0].severity, Severity::Error);
    }

    #[test]
    fn test_stack_elevations() {
        let mut floors = vec![
            Floor {
                name: "ground".to_string(),
                elevation: 0.0,
                height: 2.6,
                rooms: Vec::new(),
                connections: Vec::new(),
                stairs: Vec::new(),
                lifts: Vec::new(),
                ceilings: false,
            },
            Floor {
                name: "first".to_string(),
                elevation: 99.0,
                height: 2.6,
                rooms: Vec::new(),
                connections: Vec::new(),
                stairs: Vec::new(),
                lifts: Vec::new(),
                ceilings: false,
            },
        ];
        stack_elevations(&mut floors);
        assert_eq!(floors[0].elevation, 0.0);
        assert!((floors[1].elevation - 2.7).abs() < 1e-9);
    }

    #[test]
    fn test_generate_all_matches_sequential() {
        let generator = Generator::new(GlobalConfig::default(), Default::default());
        let mut floors = vec![two_room_floor(), two_room_floor()];
        floors[1].name = "first".to_string();
        stack_elevations(&mut floors);

        let scenes = generator.generate_all(&floors);
        assert_eq!(scenes.len(), 2);
        for (scene, floor) in scenes.iter().zip(&floors) {
            assert_eq!(scene.name, floor.name);
            assert_eq!(scene.tagged(MeshTag::Wall).count(), 7);
        }

        // Upper floor geometry actually sits higher
        let (ground_min, _) = scenes[0].bounds().unwrap();
        let (first_min, _) = scenes[1].bounds().unwrap();
        assert!(first_min.y > ground_min.y + 2.0);
    }
}
