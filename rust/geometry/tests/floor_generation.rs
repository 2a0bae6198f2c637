// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! End-to-end floor generation scenarios

use floorgen_core::{
    Connection, ConnectionKind, ConnectionPosition, Floor, GlobalConfig, HandrailStyle, Lift,
    Room, Stair, StairShape, StringerStyle, TurnSide, Wall, WallDirection, WallKind,
};
use floorgen_geometry::{material_slot, stack_elevations, Generator, Mesh, MeshTag};

fn empty_floor(name: &str) -> Floor {
    Floor {
        name: name.to_string(),
        elevation: 0.0,
        height: 2.6,
        rooms: Vec::new(),
        connections: Vec::new(),
        stairs: Vec::new(),
        lifts: Vec::new(),
        ceilings: false,
    }
}

fn door(from: &str, from_wall: WallDirection, to: &str, to_wall: WallDirection) -> Connection {
    Connection {
        from_room: from.to_string(),
        from_wall,
        to_room: to.to_string(),
        to_wall,
        kind: ConnectionKind::Door,
        position: ConnectionPosition::Percent(50.0),
        width: None,
        height: None,
        swing: Default::default(),
        opens_into: None,
    }
}

#[test]
fn solid_side_hangs_the_leaf_when_other_side_is_open() {
    // hall's right wall is solid; study's left wall is open. The door
    // leaf must hang on hall's side, and study's left wall produces no
    // geometry at all.
    let mut floor = empty_floor("ground");
    let mut hall = Room::new("hall", 0.0, 0.0, 4.0, 3.0);
    let mut study = Room::new("study", 4.0, 0.0, 4.0, 3.0);
    hall.right = Wall::of_kind(WallKind::Solid);
    study.left = Wall::of_kind(WallKind::Open);
    floor.rooms = vec![hall, study];
    floor.connections = vec![door("hall", WallDirection::Right, "study", WallDirection::Left)];

    let generator = Generator::new(GlobalConfig::default(), Default::default());
    let scene = generator.generate_floor(&floor);

    let doors: Vec<_> = scene.tagged(MeshTag::Door).collect();
    assert_eq!(doors.len(), 1);
    assert_eq!(doors[0].room.as_deref(), Some("hall"));

    assert!(scene.tagged(MeshTag::Wall).any(|m| m.name == "hall/right"));
    assert!(!scene.tagged(MeshTag::Wall).any(|m| m.name == "study/left"));
}

#[test]
fn shared_wall_rendered_by_exactly_one_room() {
    let mut floor = empty_floor("ground");
    floor.rooms = vec![
        Room::new("hall", 0.0, 0.0, 4.0, 6.0),
        Room::new("study", 4.0, 1.0, 4.0, 3.0),
    ];

    let generator = Generator::new(GlobalConfig::default(), Default::default());
    let scene = generator.generate_floor(&floor);

    // hall owns the full shared plane; study's left wall is fully
    // covered and drops out
    assert!(scene.tagged(MeshTag::Wall).any(|m| m.name == "hall/right"));
    assert!(!scene.tagged(MeshTag::Wall).any(|m| m.name == "study/left"));
    assert_eq!(scene.tagged(MeshTag::Wall).count(), 7);
}

#[test]
fn window_connection_produces_pane_and_cut() {
    let mut floor = empty_floor("ground");
    floor.rooms = vec![
        Room::new("hall", 0.0, 0.0, 4.0, 3.0),
        Room::new("study", 4.0, 0.0, 4.0, 3.0),
    ];
    let mut window = door("hall", WallDirection::Right, "study", WallDirection::Left);
    window.kind = ConnectionKind::Window;
    floor.connections = vec![window];

    let generator = Generator::new(GlobalConfig::default(), Default::default());
    let scene = generator.generate_floor(&floor);

    assert_eq!(scene.tagged(MeshTag::Glass).count(), 1);
    assert!(scene.tagged(MeshTag::Door).next().is_none());

    // The rendered shared wall was cut: more triangles than a plain box
    let wall = scene
        .tagged(MeshTag::Wall)
        .find(|m| m.name == "hall/right")
        .unwrap();
    assert!(wall.mesh.triangle_count() > 12);
}

#[test]
fn wall_material_groups_cover_all_indices() {
    let mut floor = empty_floor("ground");
    floor.rooms = vec![
        Room::new("hall", 0.0, 0.0, 4.0, 3.0),
        Room::new("study", 4.0, 0.0, 4.0, 3.0),
    ];
    floor.connections = vec![door("hall", WallDirection::Right, "study", WallDirection::Left)];

    let generator = Generator::new(GlobalConfig::default(), Default::default());
    let scene = generator.generate_floor(&floor);

    for wall in scene.tagged(MeshTag::Wall) {
        assert!(!wall.mesh.groups.is_empty(), "{} has no groups", wall.name);
        let mut cursor = 0;
        for group in &wall.mesh.groups {
            assert_eq!(group.start, cursor, "{} groups not contiguous", wall.name);
            assert!(group.material < 6);
            cursor += group.count;
        }
        assert_eq!(cursor as usize, wall.mesh.indices.len());
        assert_eq!(wall.materials.len(), 6);
    }
}

/// Every face of every group must carry the slot its geometric
/// normal maps to.
fn assert_groups_match_normals(mesh: &Mesh, name: &str) {
    for group in &mesh.groups {
        let first = (group.start / 3) as usize;
        let count = (group.count / 3) as usize;
        for face in first..first + count {
            let (v0, v1, v2) = mesh.triangle_vertices(face);
            let normal = (v1 - v0).cross(&(v2 - v0));
            if normal.norm_squared() < 1e-20 {
                continue;
            }
            assert_eq!(
                material_slot(&normal),
                group.material,
                "{}: face {} slot disagrees with its normal {:?}",
                name,
                face,
                normal
            );
        }
    }
}

#[test]
fn cut_wall_slots_agree_with_face_normals() {
    // One wall with a single cut, another with two openings
    let mut floor = empty_floor("ground");
    floor.rooms = vec![
        Room::new("hall", 0.0, 0.0, 6.0, 3.0),
        Room::new("study", 6.0, 0.0, 4.0, 3.0),
        Room::new("den", 0.0, 3.0, 6.0, 3.0),
    ];
    let mut left_door = door("hall", WallDirection::Bottom, "den", WallDirection::Top);
    left_door.position = ConnectionPosition::Percent(25.0);
    let mut right_window = door("hall", WallDirection::Bottom, "den", WallDirection::Top);
    right_window.kind = ConnectionKind::Window;
    right_window.position = ConnectionPosition::Percent(75.0);
    floor.connections = vec![
        door("hall", WallDirection::Right, "study", WallDirection::Left),
        left_door,
        right_window,
    ];

    let generator = Generator::new(GlobalConfig::default(), Default::default());
    let scene = generator.generate_floor(&floor);

    let single = scene
        .tagged(MeshTag::Wall)
        .find(|m| m.name == "hall/right")
        .unwrap();
    let double = scene
        .tagged(MeshTag::Wall)
        .find(|m| m.name == "hall/bottom")
        .unwrap();

    // Both walls were actually cut
    assert!(single.mesh.triangle_count() > 12);
    assert!(double.mesh.triangle_count() > single.mesh.triangle_count());

    for wall in scene.tagged(MeshTag::Wall) {
        assert_groups_match_normals(&wall.mesh, &wall.name);
    }
}

#[test]
fn l_stair_lands_exactly_on_the_rise() {
    let mut floor = empty_floor("ground");
    floor.stairs = vec![Stair {
        name: "main".to_string(),
        x: 1.0,
        z: 1.0,
        rotation: 0.0,
        rise: 2.8,
        shape: StairShape::LShaped {
            runs: [5, 5],
            turn: TurnSide::Right,
            landing: None,
        },
        width: None,
        riser_height: None,
        tread_depth: None,
        stringer: StringerStyle::Closed,
        handrail: HandrailStyle::None,
    }];

    let generator = Generator::new(GlobalConfig::default(), Default::default());
    let scene = generator.generate_floor(&floor);

    let stair = scene.tagged(MeshTag::Stair).next().unwrap();
    let (_, max) = stair.mesh.bounds();
    assert!((max.y as f64 - 2.8).abs() < 1e-4);
    assert!(scene.diagnostics.is_empty());
}

#[test]
fn degenerate_elements_never_abort_the_floor() {
    let mut floor = empty_floor("ground");
    floor.rooms = vec![Room::new("hall", 0.0, 0.0, 4.0, 3.0)];
    floor.stairs = vec![Stair {
        name: "broken".to_string(),
        x: 0.0,
        z: 0.0,
        rotation: 0.0,
        rise: -1.0,
        shape: StairShape::Straight,
        width: None,
        riser_height: None,
        tread_depth: None,
        stringer: StringerStyle::Closed,
        handrail: HandrailStyle::None,
    }];
    floor.lifts = vec![Lift {
        name: "flat".to_string(),
        x: 5.0,
        z: 0.0,
        width: 0.0,
        depth: 2.0,
        doors: Vec::new(),
    }];

    let generator = Generator::new(GlobalConfig::default(), Default::default());
    let scene = generator.generate_floor(&floor);

    // Room geometry is intact, both failures are on record
    assert_eq!(scene.tagged(MeshTag::Wall).count(), 4);
    assert_eq!(scene.diagnostics.len(), 2);
    let elements: Vec<_> = scene.diagnostics.iter().map(|d| d.element.as_str()).collect();
    assert!(elements.contains(&"broken"));
    assert!(elements.contains(&"flat"));
}

#[test]
fn stacked_floors_do_not_interleave() {
    let mut ground = empty_floor("ground");
    ground.rooms = vec![Room::new("hall", 0.0, 0.0, 4.0, 3.0)];
    let mut first = empty_floor("first");
    first.rooms = vec![Room::new("landing", 0.0, 0.0, 4.0, 3.0)];

    let mut floors = vec![ground, first];
    stack_elevations(&mut floors);

    let generator = Generator::new(GlobalConfig::default(), Default::default());
    let scenes = generator.generate_all(&floors);

    let (_, ground_max) = scenes[0].bounds().unwrap();
    let (first_min, _) = scenes[1].bounds().unwrap();
    // The upper floor starts above the lower floor's walls
    assert!(first_min.y >= ground_max.y - 0.2);
}

#[test]
fn lift_shaft_with_door_face() {
    let mut floor = empty_floor("ground");
    floor.lifts = vec![Lift {
        name: "lift".to_string(),
        x: 0.0,
        z: 0.0,
        width: 2.0,
        depth: 2.0,
        doors: vec![WallDirection::Bottom],
    }];

    let generator = Generator::new(GlobalConfig::default(), Default::default());
    let scene = generator.generate_floor(&floor);

    let lift = scene.tagged(MeshTag::Lift).next().unwrap();
    assert!(!lift.mesh.is_empty());
    assert!(scene.diagnostics.is_empty());
}

#[test]
fn absolute_position_places_the_cut() {
    let mut floor = empty_floor("ground");
    floor.rooms = vec![
        Room::new("hall", 0.0, 0.0, 6.0, 3.0),
        Room::new("study", 0.0, 3.0, 6.0, 3.0),
    ];
    let mut conn = door("hall", WallDirection::Bottom, "study", WallDirection::Top);
    conn.position = ConnectionPosition::Absolute(1.0);
    floor.connections = vec![conn];

    let generator = Generator::new(GlobalConfig::default(), Default::default());
    let scene = generator.generate_floor(&floor);

    let wall = scene
        .tagged(MeshTag::Wall)
        .find(|m| m.name == "hall/bottom")
        .unwrap();

    // Opening centered at x=1.0: no wall vertex inside it, wall
    // remains solid away from it
    for i in 0..wall.mesh.vertex_count() {
        let v = wall.mesh.vertex(i);
        let inside = v.x > 0.55 + 1e-6
            && v.x < 1.45 - 1e-6
            && v.y > 1e-6
            && v.y < 2.1 - 1e-6
            && (v.z - 3.0).abs() < 0.1 - 1e-6;
        assert!(!inside, "vertex {:?} inside the opening", v);
    }
    assert!(wall.mesh.triangle_count() > 12);
}
