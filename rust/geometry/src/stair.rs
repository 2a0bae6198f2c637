// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Stair and lift generation
//!
//! Stairs are generated from a topology descriptor by walking a
//! cursor through flights, landings, and turns in a local frame, then
//! rotating the whole mesh by the stair's plan yaw and translating to
//! its world position. The riser count is derived from the total rise
//! and the target riser height, and the actual riser is `rise / count`
//! so the stair always lands on the next level exactly. Landings add
//! no rise.

use crate::csg::box_mesh;
use crate::error::{Error, Result};
use crate::mesh::Mesh;
use floorgen_core::{
    GlobalConfig, HandrailStyle, Lift, Stair, StairSegment, StairShape, StringerStyle, TurnSide,
    WallDirection,
};
use nalgebra::{Matrix4, Point3, Vector3};
use std::f64::consts::{FRAC_PI_2, PI, TAU};

/// Handrail height above the tread nose
const RAIL_HEIGHT: f64 = 0.9;
const RAIL_HALF: f64 = 0.02;
/// Open-stringer tread slab thickness
const TREAD_THICKNESS: f64 = 0.06;

/// Derived step dimensions for one stair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StairLayout {
    pub steps: u32,
    /// Exact riser: `rise / steps`
    pub riser: f64,
    pub tread: f64,
    pub width: f64,
}

fn shape_step_count(shape: &StairShape, rise: f64, target_riser: f64) -> u32 {
    let from_rise = || ((rise / target_riser).round() as u32).max(1);
    match shape {
        StairShape::Straight | StairShape::Unknown => from_rise(),
        StairShape::Spiral { .. } | StairShape::Curved { .. } => from_rise(),
        StairShape::LShaped { runs, .. } | StairShape::UShaped { runs, .. } => {
            (runs[0] + runs[1]).max(1)
        }
        StairShape::DoubleL { runs, .. } => (runs[0] + runs[1] + runs[2]).max(1),
        // Winder treads turn the corner and carry rise themselves
        StairShape::Winder { runs, .. } => (runs[0] + 3 + runs[1]).max(1),
        StairShape::Segments { segments } => segments
            .iter()
            .map(|s| match s {
                StairSegment::Flight { steps } => *steps,
                StairSegment::Turn { .. } => 0,
            })
            .sum::<u32>()
            .max(1),
    }
}

/// Resolve step count and dimensions for a stair record
pub fn stair_layout(stair: &Stair, config: &GlobalConfig) -> Result<StairLayout> {
    if stair.rise <= 0.0 {
        return Err(Error::degenerate(format!(
            "stair '{}' has non-positive rise {}",
            stair.name, stair.rise
        )));
    }

    let target = stair.riser_height.unwrap_or(config.target_riser);
    let steps = shape_step_count(&stair.shape, stair.rise, target);

    Ok(StairLayout {
        steps,
        riser: stair.rise / steps as f64,
        tread: stair.tread_depth.unwrap_or(config.tread_depth),
        width: stair.width.unwrap_or(config.stair_width),
    })
}

/// Axis-aligned box yawed about Y and translated, merged into `mesh`
fn place_box(mesh: &mut Mesh, center: Point3<f64>, half: Vector3<f64>, yaw: f64) {
    let mut slab = box_mesh(
        Point3::new(-half.x, -half.y, -half.z),
        Point3::new(half.x, half.y, half.z),
    );
    let transform = Matrix4::new_translation(&Vector3::new(center.x, center.y, center.z))
        * Matrix4::from_axis_angle(&Vector3::y_axis(), yaw);
    slab.transform(&transform);
    mesh.merge(&slab);
}

/// Cursor walking the stair centerline in the local frame.
///
/// Yaw 0 advances along +Z; a right turn subtracts a quarter turn.
struct Cursor {
    position: Point3<f64>,
    yaw: f64,
    elevation: f64,
}

impl Cursor {
    fn new() -> Self {
        Cursor {
            position: Point3::origin(),
            yaw: 0.0,
            elevation: 0.0,
        }
    }

    fn heading(&self) -> Vector3<f64> {
        Vector3::new(self.yaw.sin(), 0.0, self.yaw.cos())
    }

    fn right(&self) -> Vector3<f64> {
        Vector3::y().cross(&self.heading())
    }

    fn turn(&mut self, side: TurnSide) {
        match side {
            TurnSide::Right => self.yaw -= FRAC_PI_2,
            TurnSide::Left => self.yaw += FRAC_PI_2,
        }
    }
}

/// Structure and handrails of one stair, kept apart so they take
/// different materials and tags
#[derive(Debug)]
pub struct StairBuild {
    pub mesh: Mesh,
    pub rails: Mesh,
}

struct StairBuilder<'a> {
    mesh: Mesh,
    rails: Mesh,
    cursor: Cursor,
    layout: StairLayout,
    stringer: StringerStyle,
    handrail: HandrailStyle,
    stair: &'a Stair,
}

impl<'a> StairBuilder<'a> {
    fn new(stair: &'a Stair, layout: StairLayout) -> Self {
        StairBuilder {
            mesh: Mesh::new(),
            rails: Mesh::new(),
            cursor: Cursor::new(),
            layout,
            stringer: stair.stringer,
            handrail: stair.handrail,
            stair,
        }
    }

    fn rails_at(&mut self, center: Point3<f64>, depth_half: f64, elevation: f64) {
        let (left, right) = match self.handrail {
            HandrailStyle::None => return,
            HandrailStyle::Left => (true, false),
            HandrailStyle::Right => (false, true),
            HandrailStyle::Both => (true, true),
        };
        let side = self.cursor.right() * (self.layout.width / 2.0 - RAIL_HALF);
        let y = elevation + RAIL_HEIGHT;
        let half = Vector3::new(RAIL_HALF, RAIL_HALF, depth_half);
        if left {
            let c = center - side;
            place_box(
                &mut self.rails,
                Point3::new(c.x, y, c.z),
                half,
                self.cursor.yaw,
            );
        }
        if right {
            let c = center + side;
            place_box(
                &mut self.rails,
                Point3::new(c.x, y, c.z),
                half,
                self.cursor.yaw,
            );
        }
    }

    /// One straight flight of `steps` treads advancing along the heading
    fn flight(&mut self, steps: u32) {
        let tread = self.layout.tread;
        let riser = self.layout.riser;
        let width = self.layout.width;

        for _ in 0..steps {
            self.cursor.elevation += riser;
            let top = self.cursor.elevation;
            let center_xz = self.cursor.position + self.cursor.heading() * (tread / 2.0);

            match self.stringer {
                StringerStyle::Closed => {
                    // Solid block from the stair base to the tread top
                    place_box(
                        &mut self.mesh,
                        Point3::new(center_xz.x, top / 2.0, center_xz.z),
                        Vector3::new(width / 2.0, top / 2.0, tread / 2.0),
                        self.cursor.yaw,
                    );
                }
                StringerStyle::Open => {
                    place_box(
                        &mut self.mesh,
                        Point3::new(center_xz.x, top - TREAD_THICKNESS / 2.0, center_xz.z),
                        Vector3::new(width / 2.0, TREAD_THICKNESS / 2.0, tread / 2.0),
                        self.cursor.yaw,
                    );
                }
            }

            self.rails_at(
                Point3::new(center_xz.x, 0.0, center_xz.z),
                tread / 2.0,
                top,
            );

            self.cursor.position += self.cursor.heading() * tread;
        }
    }

    /// Square landing platform at the current elevation, then a quarter
    /// turn. The landing adds no rise.
    fn landing_turn(&mut self, side: TurnSide, depth: Option<f64>) {
        let depth = depth.unwrap_or(self.layout.width);
        let width = self.layout.width;
        let top = self.cursor.elevation;

        let center_xz = self.cursor.position + self.cursor.heading() * (depth / 2.0);
        match self.stringer {
            StringerStyle::Closed => place_box(
                &mut self.mesh,
                Point3::new(center_xz.x, top / 2.0, center_xz.z),
                Vector3::new(width / 2.0, top / 2.0, depth / 2.0),
                self.cursor.yaw,
            ),
            StringerStyle::Open => place_box(
                &mut self.mesh,
                Point3::new(center_xz.x, top - TREAD_THICKNESS / 2.0, center_xz.z),
                Vector3::new(width / 2.0, TREAD_THICKNESS / 2.0, depth / 2.0),
                self.cursor.yaw,
            ),
        }

        self.cursor.turn(side);
        self.cursor.position =
            Point3::from(center_xz.coords + self.cursor.heading() * (depth / 2.0));
    }

    /// Three winder treads carrying the quarter turn, each rotating a
    /// third of it and rising one riser.
    fn winder_turn(&mut self, side: TurnSide) {
        let width = self.layout.width;
        let riser = self.layout.riser;
        let step_yaw = match side {
            TurnSide::Right => -FRAC_PI_2 / 3.0,
            TurnSide::Left => FRAC_PI_2 / 3.0,
        };
        // Pivot at the inside corner of the turn
        let inside = match side {
            TurnSide::Right => self.cursor.right() * (width / 2.0),
            TurnSide::Left => -self.cursor.right() * (width / 2.0),
        };
        let pivot = self.cursor.position + inside;

        for _ in 0..3 {
            self.cursor.elevation += riser;
            let top = self.cursor.elevation;
            // Wedge approximated by a tread-deep box swept about the pivot
            let mid_yaw = self.cursor.yaw + step_yaw / 2.0;
            let heading = Vector3::new(mid_yaw.sin(), 0.0, mid_yaw.cos());
            let outward = Vector3::y().cross(&heading)
                * match side {
                    TurnSide::Right => -(width / 2.0),
                    TurnSide::Left => width / 2.0,
                };
            let center = pivot + outward + heading * (self.layout.tread / 2.0);

            let half_y = match self.stringer {
                StringerStyle::Closed => top / 2.0,
                StringerStyle::Open => TREAD_THICKNESS / 2.0,
            };
            let y = match self.stringer {
                StringerStyle::Closed => top / 2.0,
                StringerStyle::Open => top - TREAD_THICKNESS / 2.0,
            };
            place_box(
                &mut self.mesh,
                Point3::new(center.x, y, center.z),
                Vector3::new(width / 2.0, half_y, self.layout.tread / 2.0),
                mid_yaw,
            );

            self.cursor.yaw += step_yaw;
        }
        // Resume from the pivot, offset back to the centerline
        let back = match side {
            TurnSide::Right => self.cursor.right() * (width / 2.0),
            TurnSide::Left => -self.cursor.right() * (width / 2.0),
        };
        self.cursor.position = pivot - back;
    }

    /// Radial treads between two radii sweeping an arc about the local
    /// origin. Positive arc turns left.
    fn arc_flight(&mut self, inner: f64, outer: f64, arc: f64, column: bool) -> Result<()> {
        if outer - inner <= 0.0 {
            return Err(Error::degenerate(format!(
                "stair '{}' has outer radius {} not exceeding inner radius {}",
                self.stair.name, outer, inner
            )));
        }

        let steps = self.layout.steps;
        let riser = self.layout.riser;
        let step_arc = arc / steps as f64;
        let mid_radius = (inner + outer) / 2.0;
        let tread_span = (step_arc.abs() * mid_radius).max(self.layout.tread);

        for i in 0..steps {
            let angle = step_arc * (i as f64 + 0.5);
            let top = riser * (i + 1) as f64;
            let radial = Vector3::new(angle.cos(), 0.0, angle.sin());
            let center = Point3::origin() + radial * mid_radius;

            let (y, half_y) = match self.stringer {
                StringerStyle::Closed => (top / 2.0, top / 2.0),
                StringerStyle::Open => (top - TREAD_THICKNESS / 2.0, TREAD_THICKNESS / 2.0),
            };
            // Box long axis radial, yawed tangent to the arc
            place_box(
                &mut self.mesh,
                Point3::new(center.x, y, center.z),
                Vector3::new((outer - inner) / 2.0, half_y, tread_span / 2.0),
                -angle + FRAC_PI_2,
            );
        }

        if column {
            let rise = self.stair.rise;
            place_box(
                &mut self.mesh,
                Point3::new(0.0, rise / 2.0, 0.0),
                Vector3::new(inner.max(0.05), rise / 2.0, inner.max(0.05)),
                0.0,
            );
        }

        self.cursor.elevation = self.stair.rise;
        Ok(())
    }

    fn build(mut self) -> Result<StairBuild> {
        match &self.stair.shape {
            StairShape::Straight | StairShape::Unknown => self.flight(self.layout.steps),
            StairShape::LShaped {
                runs,
                turn,
                landing,
            } => {
                self.flight(runs[0]);
                self.landing_turn(*turn, *landing);
                self.flight(runs[1]);
            }
            StairShape::UShaped {
                runs,
                turn,
                landing,
            } => {
                // Two quarter turns sharing a half landing each
                self.flight(runs[0]);
                self.landing_turn(*turn, *landing);
                self.landing_turn(*turn, *landing);
                self.flight(runs[1]);
            }
            StairShape::DoubleL {
                runs,
                turns,
                landing,
            } => {
                self.flight(runs[0]);
                self.landing_turn(turns[0], *landing);
                self.flight(runs[1]);
                self.landing_turn(turns[1], *landing);
                self.flight(runs[2]);
            }
            StairShape::Winder { runs, turn } => {
                self.flight(runs[0]);
                self.winder_turn(*turn);
                self.flight(runs[1]);
            }
            StairShape::Spiral {
                inner_radius,
                outer_radius,
                arc,
            } => {
                let arc = arc.map(f64::to_radians).unwrap_or(TAU);
                self.arc_flight(*inner_radius, *outer_radius, arc, true)?;
            }
            StairShape::Curved {
                inner_radius,
                outer_radius,
                arc,
            } => {
                let arc = arc.map(f64::to_radians).unwrap_or(PI / 2.0);
                self.arc_flight(*inner_radius, *outer_radius, arc, false)?;
            }
            StairShape::Segments { segments } => {
                for segment in segments {
                    match segment {
                        StairSegment::Flight { steps } => self.flight(*steps),
                        StairSegment::Turn { side } => self.landing_turn(*side, None),
                    }
                }
            }
        }

        Ok(StairBuild {
            mesh: self.mesh,
            rails: self.rails,
        })
    }
}

/// Generate a stair in world coordinates.
///
/// The stair is built in a local frame, yawed by the stair's plan
/// rotation, and translated to its base position.
pub fn build_stair(stair: &Stair, config: &GlobalConfig, base_y: f64) -> Result<StairBuild> {
    let layout = stair_layout(stair, config)?;
    let mut build = StairBuilder::new(stair, layout).build()?;

    if build.mesh.is_empty() {
        return Err(Error::degenerate(format!(
            "stair '{}' produced no geometry",
            stair.name
        )));
    }

    let transform = Matrix4::new_translation(&Vector3::new(stair.x, base_y, stair.z))
        * Matrix4::from_axis_angle(&Vector3::y_axis(), stair.rotation.to_radians());
    build.mesh.transform(&transform);
    if !build.rails.is_empty() {
        build.rails.transform(&transform);
    }
    Ok(build)
}

/// One side wall of a lift shaft, with a doorway gap when the side is
/// listed in `doors`: two jambs plus a header above the opening.
fn shaft_side(
    mesh: &mut Mesh,
    lift: &Lift,
    direction: WallDirection,
    base_y: f64,
    height: f64,
    thickness: f64,
    config: &GlobalConfig,
    with_door: bool,
) {
    let (run_start, run_end, plane) = match direction {
        WallDirection::Top => (lift.x, lift.x + lift.width, lift.z),
        WallDirection::Bottom => (lift.x, lift.x + lift.width, lift.z + lift.depth),
        WallDirection::Left => (lift.z, lift.z + lift.depth, lift.x),
        WallDirection::Right => (lift.z, lift.z + lift.depth, lift.x + lift.width),
    };
    let half = thickness / 2.0;

    let segment = |mesh: &mut Mesh, s: f64, e: f64, y0: f64, y1: f64| {
        if e - s <= 1e-9 || y1 - y0 <= 1e-9 {
            return;
        }
        let slab = if direction.runs_along_x() {
            box_mesh(
                Point3::new(s, y0, plane - half),
                Point3::new(e, y1, plane + half),
            )
        } else {
            box_mesh(
                Point3::new(plane - half, y0, s),
                Point3::new(plane + half, y1, e),
            )
        };
        mesh.merge(&slab);
    };

    if !with_door {
        segment(mesh, run_start, run_end, base_y, base_y + height);
        return;
    }

    let run = run_end - run_start;
    let door_width = config.door_width.min(run - 2.0 * thickness).max(0.1);
    let door_height = config.door_height.min(height);
    let center = (run_start + run_end) / 2.0;

    segment(
        mesh,
        run_start,
        center - door_width / 2.0,
        base_y,
        base_y + height,
    );
    segment(
        mesh,
        center + door_width / 2.0,
        run_end,
        base_y,
        base_y + height,
    );
    // Header above the doorway
    segment(
        mesh,
        center - door_width / 2.0,
        center + door_width / 2.0,
        base_y + door_height,
        base_y + height,
    );
}

/// Generate a lift shaft: four walls with doorway gaps on the listed
/// faces, plus a cab floor plate inside.
pub fn build_lift(lift: &Lift, config: &GlobalConfig, base_y: f64, height: f64) -> Result<Mesh> {
    if lift.width <= 0.0 || lift.depth <= 0.0 {
        return Err(Error::degenerate(format!(
            "lift '{}' has non-positive footprint {}x{}",
            lift.name, lift.width, lift.depth
        )));
    }

    let thickness = config.wall_thickness / 2.0;
    let mut mesh = Mesh::new();

    for direction in WallDirection::ALL {
        shaft_side(
            &mut mesh,
            lift,
            direction,
            base_y,
            height,
            thickness,
            config,
            lift.doors.contains(&direction),
        );
    }

    // Cab floor plate
    let plate = box_mesh(
        Point3::new(lift.x + thickness, base_y, lift.z + thickness),
        Point3::new(
            lift.x + lift.width - thickness,
            base_y + 0.05,
            lift.z + lift.depth - thickness,
        ),
    );
    mesh.merge(&plate);

    Ok(mesh)
}
