// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Boolean solid geometry
//!
//! Axis-aligned box solids and sequential CSG subtraction via csgrs.
//! Subtraction discards material group metadata; the wall generator
//! reassigns groups from face normals afterwards.

use crate::error::Result;
use crate::mesh::Mesh;
use crate::triangulation::{calculate_polygon_normal, project_to_2d, triangulate_polygon};
use nalgebra::{Point3, Vector3};

/// Build a box mesh from AABB min/max bounds.
/// 12 triangles, 2 per face, face normals on every vertex.
pub fn box_mesh(min: Point3<f64>, max: Point3<f64>) -> Mesh {
    let mut mesh = Mesh::with_capacity(24, 36);

    let v0 = Point3::new(min.x, min.y, min.z);
    let v1 = Point3::new(max.x, min.y, min.z);
    let v2 = Point3::new(max.x, max.y, min.z);
    let v3 = Point3::new(min.x, max.y, min.z);
    let v4 = Point3::new(min.x, min.y, max.z);
    let v5 = Point3::new(max.x, min.y, max.z);
    let v6 = Point3::new(max.x, max.y, max.z);
    let v7 = Point3::new(min.x, max.y, max.z);

    // Counter-clockwise winding viewed from outside
    let faces: [([Point3<f64>; 4], Vector3<f64>); 6] = [
        ([v1, v2, v6, v5], Vector3::x()),    // +X
        ([v4, v7, v3, v0], -Vector3::x()),   // -X
        ([v3, v7, v6, v2], Vector3::y()),    // +Y
        ([v0, v1, v5, v4], -Vector3::y()),   // -Y
        ([v4, v5, v6, v7], Vector3::z()),    // +Z
        ([v0, v3, v2, v1], -Vector3::z()),   // -Z
    ];

    for (corners, normal) in faces {
        let base = mesh.vertex_count() as u32;
        for corner in corners {
            mesh.add_vertex(corner, normal);
        }
        mesh.add_triangle(base, base + 1, base + 2);
        mesh.add_triangle(base, base + 2, base + 3);
    }

    mesh
}

/// Sequential boolean subtraction over triangle meshes.
pub struct BooleanEvaluator {
    /// Epsilon for degenerate-triangle filtering
    pub epsilon: f64,
}

impl BooleanEvaluator {
    pub fn new() -> Self {
        Self { epsilon: 1e-10 }
    }

    /// Subtract every cut volume from the host, in order.
    ///
    /// Zero cuts skip boolean evaluation entirely and return the host
    /// unchanged, vertex for vertex: cheaper, and csgrs output for a
    /// no-op difference is not guaranteed to preserve the input
    /// tessellation.
    pub fn subtract_all(&self, host: &Mesh, cuts: &[Mesh]) -> Result<Mesh> {
        if cuts.is_empty() {
            return Ok(host.clone());
        }

        let mut result = host.clone();
        for cut in cuts {
            result = self.subtract(&result, cut)?;
        }
        Ok(result)
    }

    /// Subtract one cut mesh from the host mesh (host - cut)
    pub fn subtract(&self, host: &Mesh, cut: &Mesh) -> Result<Mesh> {
        use csgrs::traits::CSG;

        if cut.is_empty() {
            return Ok(host.clone());
        }
        if host.is_empty() {
            return Ok(Mesh::new());
        }

        let host_csg = self.to_csgrs(host);
        let cut_csg = self.to_csgrs(cut);

        let result_csg = host_csg.difference(&cut_csg);

        self.from_csgrs(&result_csg)
    }

    /// Convert our mesh format to a csgrs mesh
    fn to_csgrs(&self, mesh: &Mesh) -> csgrs::mesh::Mesh<()> {
        use csgrs::mesh::{polygon::Polygon, vertex::Vertex, Mesh as CsgMesh};

        let mut polygons = Vec::with_capacity(mesh.triangle_count());

        for face in 0..mesh.triangle_count() {
            let (v0, v1, v2) = mesh.triangle_vertices(face);

            // Skip degenerate triangles to avoid NaN propagation
            let edge1 = v1 - v0;
            let edge2 = v2 - v0;
            let face_normal = match edge1.cross(&edge2).try_normalize(self.epsilon) {
                Some(n) => n,
                None => continue,
            };

            let vertices = vec![
                Vertex::new(v0, face_normal),
                Vertex::new(v1, face_normal),
                Vertex::new(v2, face_normal),
            ];
            polygons.push(Polygon::new(vertices, None));
        }

        CsgMesh::from_polygons(&polygons, None)
    }

    /// Convert a csgrs mesh back to our format, re-triangulating
    /// any polygonal faces csgrs produced.
    fn from_csgrs(&self, csg_mesh: &csgrs::mesh::Mesh<()>) -> Result<Mesh> {
        let mut mesh = Mesh::new();

        for polygon in &csg_mesh.polygons {
            let vertices = &polygon.vertices;
            if vertices.len() < 3 {
                continue;
            }

            let points_3d: Vec<Point3<f64>> = vertices
                .iter()
                .map(|v| Point3::new(v.pos[0], v.pos[1], v.pos[2]))
                .collect();

            let raw_normal = Vector3::new(
                vertices[0].normal[0],
                vertices[0].normal[1],
                vertices[0].normal[2],
            );

            // Validate the csgrs normal; recompute from points if bad
            let polygon_normal = match raw_normal.try_normalize(self.epsilon) {
                Some(n) if n.x.is_finite() && n.y.is_finite() && n.z.is_finite() => n,
                _ => match calculate_polygon_normal(&points_3d).try_normalize(self.epsilon) {
                    Some(n) => n,
                    None => continue,
                },
            };

            if points_3d.len() == 3 {
                let base = mesh.vertex_count() as u32;
                for v in vertices {
                    mesh.add_vertex(v.pos, v.normal);
                }
                mesh.add_triangle(base, base + 1, base + 2);
                continue;
            }

            let (points_2d, _, _, _) = project_to_2d(&points_3d, &polygon_normal);
            let indices = match triangulate_polygon(&points_2d) {
                Ok(idx) => idx,
                Err(_) => continue,
            };

            let base = mesh.vertex_count();
            for v in vertices {
                mesh.add_vertex(v.pos, v.normal);
            }
            for tri in indices.chunks(3) {
                if tri.len() == 3 {
                    mesh.add_triangle(
                        (base + tri[0]) as u32,
                        (base + tri[1]) as u32,
                        (base + tri[2]) as u32,
                    );
                }
            }
        }

        Ok(mesh)
    }
}

impl Default for BooleanEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_mesh_counts() {
        let mesh = box_mesh(Point3::origin(), Point3::new(1.0, 1.0, 1.0));
        assert_eq!(mesh.vertex_count(), 24);
        assert_eq!(mesh.triangle_count(), 12);
    }

    #[test]
    fn test_box_mesh_bounds() {
        let mesh = box_mesh(Point3::new(-1.0, 0.0, 2.0), Point3::new(3.0, 2.0, 5.0));
        let (min, max) = mesh.bounds();
        assert_eq!(min.x, -1.0);
        assert_eq!(max.x, 3.0);
        assert_eq!(min.z, 2.0);
        assert_eq!(max.z, 5.0);
    }

    #[test]
    fn test_zero_cuts_identical_output() {
        let evaluator = BooleanEvaluator::new();
        let host = box_mesh(Point3::origin(), Point3::new(4.0, 2.6, 0.2));

        let result = evaluator.subtract_all(&host, &[]).unwrap();

        // Vertex-for-vertex identical: no boolean pass was run
        assert_eq!(result.positions, host.positions);
        assert_eq!(result.normals, host.normals);
        assert_eq!(result.indices, host.indices);
    }

    #[test]
    fn test_subtract_removes_volume() {
        let evaluator = BooleanEvaluator::new();
        let host = box_mesh(Point3::origin(), Point3::new(4.0, 3.0, 1.0));
        let cut = box_mesh(Point3::new(1.0, 0.0, -0.5), Point3::new(2.0, 2.0, 1.5));

        let result = evaluator.subtract(&host, &cut).unwrap();

        assert!(!result.is_empty());
        // A vertex inside the cut region must no longer exist
        for i in 0..result.vertex_count() {
            let v = result.vertex(i);
            let inside = v.x > 1.0 + 1e-6
                && v.x < 2.0 - 1e-6
                && v.y > 1e-6
                && v.y < 2.0 - 1e-6
                && v.z > 1e-6
                && v.z < 1.0 - 1e-6;
            assert!(!inside, "vertex {:?} lies inside the cut volume", v);
        }
    }

    #[test]
    fn test_subtract_empty_cut_is_noop() {
        let evaluator = BooleanEvaluator::new();
        let host = box_mesh(Point3::origin(), Point3::new(1.0, 1.0, 1.0));
        let result = evaluator.subtract(&host, &Mesh::new()).unwrap();
        assert_eq!(result.positions, host.positions);
    }
}
