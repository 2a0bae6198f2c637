// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Generated scene output
//!
//! A generation pass turns one floor record into a flat list of
//! tagged meshes plus the diagnostics collected along the way.
//! Per-element failures become diagnostics, never aborts: one
//! malformed stair must not take the rest of the floor down with it.

use crate::material::SurfaceMaterial;
use crate::mesh::Mesh;
use nalgebra::Point3;
use serde::Serialize;

/// What a scene mesh represents, for renderer-side filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MeshTag {
    Wall,
    Door,
    Glass,
    FloorPlate,
    Ceiling,
    Stair,
    Handrail,
    Lift,
}

/// One generated mesh with its materials.
///
/// Wall meshes carry face groups indexing into `materials` by slot;
/// everything else is single-material with one entry.
#[derive(Debug)]
pub struct SceneMesh {
    pub tag: MeshTag,
    /// Owning room, when the mesh belongs to one
    pub room: Option<String>,
    /// Stable element name for picking and diagnostics
    pub name: String,
    pub mesh: Mesh,
    pub materials: Vec<SurfaceMaterial>,
}

/// How serious a diagnostic is: `Warn` for degraded output the pass
/// papered over, `Error` for an element that produced no geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warn,
    Error,
}

/// A non-fatal failure attributed to one element
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub element: String,
    pub message: String,
}

/// Everything generated for one floor
#[derive(Debug, Default)]
pub struct FloorScene {
    pub name: String,
    pub elevation: f64,
    pub meshes: Vec<SceneMesh>,
    pub diagnostics: Vec<Diagnostic>,
}

impl FloorScene {
    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    /// Meshes carrying a given tag
    pub fn tagged(&self, tag: MeshTag) -> impl Iterator<Item = &SceneMesh> {
        self.meshes.iter().filter(move |m| m.tag == tag)
    }

    /// Combined AABB over every mesh, `None` for an empty scene
    pub fn bounds(&self) -> Option<(Point3<f32>, Point3<f32>)> {
        let mut result: Option<(Point3<f32>, Point3<f32>)> = None;
        for scene_mesh in &self.meshes {
            if scene_mesh.mesh.is_empty() {
                continue;
            }
            let (min, max) = scene_mesh.mesh.bounds();
            result = Some(match result {
                None => (min, max),
                Some((acc_min, acc_max)) => (
                    Point3::new(
                        acc_min.x.min(min.x),
                        acc_min.y.min(min.y),
                        acc_min.z.min(min.z),
                    ),
                    Point3::new(
                        acc_max.x.max(max.x),
                        acc_max.y.max(max.y),
                        acc_max.z.max(max.z),
                    ),
                ),
            });
        }
        result
    }
}
