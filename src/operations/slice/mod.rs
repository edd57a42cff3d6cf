//! Cutting a triangle mesh with a horizontal plane.
//!
//! Meshes trusted to be closed manifolds are walked edge to face to edge,
//! which gives exact loops. When that walk finds a hole, a dangling edge or
//! crossing loops, or the mesh is not trusted in the first place, loops are
//! inferred from the crossing points with the circle construction of
//! [`offset`](crate::operations::offset). Slicing never fails; a defect
//! costs accuracy, not the layer.

mod correct;
mod unproven;

use std::fmt;

use tracing::warn;

use crate::config::CarveParams;
use crate::error::Result;
use crate::geometry::Loop;
use crate::math::polygon_2d::{is_in_filled_region, is_widdershins, left_point, polygon_area};
use crate::math::simplify::simplified_loop;
use crate::math::{xy, Complex, Point3};
use crate::mesh::TriangleMesh;

/// Why the exact edge walk gave up on a slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshDefect {
    /// A crossed edge borders fewer than two faces.
    Hole,
    /// A crossed edge borders more than two faces.
    NonManifold,
    /// A walk ended after fewer than three edges.
    DanglingEdges,
    /// The walked loops cross each other.
    SelfIntersecting,
}

impl MeshDefect {
    /// Short snake-case name, as used in log fields.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hole => "hole",
            Self::NonManifold => "non_manifold",
            Self::DanglingEdges => "dangling_edges",
            Self::SelfIntersecting => "self_intersecting",
        }
    }
}

impl fmt::Display for MeshDefect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which construction produced a slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlicePath {
    /// Exact edge walk.
    Correct,
    /// Loop inference from the crossing points. `fallback` names the defect
    /// that stopped the edge walk, if one was tried and failed.
    Unproven { fallback: Option<MeshDefect> },
}

/// The loops of one slice and how they were found.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerSlice {
    pub loops: Vec<Loop>,
    pub path: SlicePath,
}

/// The mesh edges crossing one plane, with the crossing points.
struct Straddle<'a> {
    mesh: &'a TriangleMesh,
    vertices: &'a [Point3],
    z: f64,
    /// Crossing edges in ascending index order.
    edges: Vec<usize>,
}

impl Straddle<'_> {
    /// Where the edge crosses the plane.
    fn point(&self, edge: usize) -> Complex {
        let [a, b] = self.mesh.edges()[edge].vertex_indexes;
        let begin = &self.vertices[a];
        let end = &self.vertices[b];
        let begin_xy = xy(begin);
        (self.z - begin.z) * (xy(end) - begin_xy) / (end.z - begin.z) + begin_xy
    }
}

/// Slices one mesh at any number of heights.
///
/// The Z range of every edge is computed once up front.
#[derive(Debug)]
pub struct MeshSlicer<'a> {
    mesh: &'a TriangleMesh,
    params: CarveParams,
    edge_z_ranges: Vec<(f64, f64)>,
}

impl<'a> MeshSlicer<'a> {
    /// Creates a slicer for `mesh`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`](crate::error::ConfigError) if the parameters
    /// are invalid.
    pub fn new(mesh: &'a TriangleMesh, params: &CarveParams) -> Result<Self> {
        params.validate()?;
        let vertices = mesh.transformed_vertices();
        let edge_z_ranges = mesh
            .edges()
            .iter()
            .map(|edge| {
                let [a, b] = edge.vertex_indexes;
                let (za, zb) = (vertices[a].z, vertices[b].z);
                (za.min(zb), za.max(zb))
            })
            .collect();
        Ok(Self {
            mesh,
            params: params.clone(),
            edge_z_ranges,
        })
    }

    /// The parameters this slicer was built with.
    #[must_use]
    pub fn params(&self) -> &CarveParams {
        &self.params
    }

    /// Edges with one end strictly below `z` and the other strictly above.
    fn straddle(&self, z: f64) -> Straddle<'a> {
        let edges = self
            .edge_z_ranges
            .iter()
            .enumerate()
            .filter(|&(_, &(low, high))| low < z && z < high)
            .map(|(index, _)| index)
            .collect();
        Straddle {
            mesh: self.mesh,
            vertices: self.mesh.transformed_vertices(),
            z,
            edges,
        }
    }

    /// Cuts the mesh at `z`.
    ///
    /// Tries the exact edge walk first when the mesh is trusted, falling back
    /// to loop inference on a defect or an empty result. The loops are then
    /// simplified at the import radius and oriented by nesting: outlines
    /// widdershins, holes clockwise. Loops with fewer than three points are
    /// dropped.
    #[must_use]
    pub fn slice(&self, z: f64) -> LayerSlice {
        let straddle = self.straddle(z);
        let radius = self.params.import_radius;
        let mut fallback = None;
        if self.params.is_correct_mesh {
            match correct::build(&straddle) {
                Ok(loops) if !loops.is_empty() => {
                    return LayerSlice {
                        loops: oriented_loops(&loops, radius),
                        path: SlicePath::Correct,
                    };
                }
                Ok(_) => {}
                Err(defect) => {
                    warn!(z, %defect, "mesh is not closed at this height, inferring loops");
                    fallback = Some(defect);
                }
            }
        }
        let loops = unproven::build(&straddle, radius, &self.params.tuning);
        LayerSlice {
            loops: oriented_loops(&loops, radius),
            path: SlicePath::Unproven { fallback },
        }
    }
}

/// Simplifies the loops, sorts them largest first and winds each one by
/// whether it lies inside the others' filled region.
fn oriented_loops(loops: &[Vec<Complex>], radius: f64) -> Vec<Loop> {
    let mut simplified: Vec<Vec<Complex>> = loops
        .iter()
        .map(|points| simplified_loop(points, radius))
        .filter(|points| points.len() > 2)
        .collect();
    simplified.sort_by(|a, b| polygon_area(b).abs().total_cmp(&polygon_area(a).abs()));
    let mut oriented: Vec<Vec<Complex>> = simplified.clone();
    for (index, points) in oriented.iter_mut().enumerate() {
        let Some(left) = left_point(points) else {
            continue;
        };
        let others: Vec<&Vec<Complex>> = simplified
            .iter()
            .enumerate()
            .filter(|&(other, _)| other != index)
            .map(|(_, other)| other)
            .collect();
        if is_in_filled_region(&others, left) == is_widdershins(points) {
            points.reverse();
        }
    }
    oriented.into_iter().map(Loop::new).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Point3;
    use approx::assert_relative_eq;

    fn cube() -> TriangleMesh {
        TriangleMesh::cuboid(Point3::origin(), Point3::new(10.0, 10.0, 10.0))
    }

    fn cube_with_vertices_and_triangles() -> (Vec<Point3>, Vec<[usize; 3]>) {
        let mesh = cube();
        let triangles = mesh.faces().iter().map(|face| face.vertex_indexes).collect();
        (mesh.vertices().to_vec(), triangles)
    }

    #[test]
    fn cube_slices_to_one_square() {
        let mesh = cube();
        let slicer = MeshSlicer::new(&mesh, &CarveParams::default()).unwrap();
        let slice = slicer.slice(5.0);
        assert_eq!(slice.path, SlicePath::Correct);
        assert_eq!(slice.loops.len(), 1);
        let square = &slice.loops[0];
        assert_eq!(square.len(), 4);
        assert!(square.is_widdershins());
        assert_relative_eq!(square.area(), 100.0, epsilon = 1e-9);
    }

    #[test]
    fn plane_outside_mesh_gives_nothing() {
        let mesh = cube();
        let slicer = MeshSlicer::new(&mesh, &CarveParams::default()).unwrap();
        let slice = slicer.slice(12.0);
        assert!(slice.loops.is_empty());
        assert_eq!(slice.path, SlicePath::Unproven { fallback: None });
    }

    #[test]
    fn hole_falls_back_to_inference() {
        let (vertices, mut triangles) = cube_with_vertices_and_triangles();
        triangles.pop();
        let mesh = TriangleMesh::from_triangles(vertices, &triangles).unwrap();
        let params = CarveParams::default().with_import_radius(0.5);
        let slice = MeshSlicer::new(&mesh, &params).unwrap().slice(5.0);
        assert_eq!(
            slice.path,
            SlicePath::Unproven {
                fallback: Some(MeshDefect::Hole)
            }
        );
        assert!(slice.loops.iter().all(|points| points.len() >= 3));
    }

    #[test]
    fn dangling_edges_fall_back() {
        // A triangle and its back face: every edge has two faces, but the
        // walk stops after two edges.
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(10.0, 0.0, 0.0),
            Point3::new(5.0, 0.0, 10.0),
        ];
        let mesh = TriangleMesh::from_triangles(vertices, &[[0, 1, 2], [0, 2, 1]]).unwrap();
        let slice = MeshSlicer::new(&mesh, &CarveParams::default())
            .unwrap()
            .slice(5.0);
        assert_eq!(
            slice.path,
            SlicePath::Unproven {
                fallback: Some(MeshDefect::DanglingEdges)
            }
        );
        assert!(slice.loops.is_empty());
    }

    #[test]
    fn overlapping_solids_fall_back() {
        let first = cube();
        let second =
            TriangleMesh::cuboid(Point3::new(5.5, 4.5, 0.0), Point3::new(15.5, 14.5, 10.0));
        let mut vertices = first.vertices().to_vec();
        vertices.extend_from_slice(second.vertices());
        let mut triangles: Vec<[usize; 3]> =
            first.faces().iter().map(|face| face.vertex_indexes).collect();
        triangles.extend(
            second
                .faces()
                .iter()
                .map(|face| face.vertex_indexes.map(|index| index + 8)),
        );
        let mesh = TriangleMesh::from_triangles(vertices, &triangles).unwrap();
        let slice = MeshSlicer::new(&mesh, &CarveParams::default())
            .unwrap()
            .slice(5.0);
        assert_eq!(
            slice.path,
            SlicePath::Unproven {
                fallback: Some(MeshDefect::SelfIntersecting)
            }
        );
        assert!(!slice.loops.is_empty());
        assert!(slice.loops[0].is_widdershins());
        assert!(slice.loops.iter().all(|points| points.len() >= 3));
    }

    #[test]
    fn inference_recovers_a_closed_cube() {
        let mesh = cube();
        let params = CarveParams::default()
            .with_correct_mesh(false)
            .with_import_radius(0.5);
        let slice = MeshSlicer::new(&mesh, &params).unwrap().slice(5.0);
        assert_eq!(slice.path, SlicePath::Unproven { fallback: None });
        assert_eq!(slice.loops.len(), 1);
        assert!(slice.loops[0].is_widdershins());
        assert_relative_eq!(slice.loops[0].area(), 100.0, epsilon = 1e-6);
    }

    #[test]
    fn hollow_box_has_clockwise_hole() {
        // Outer box with an inverted inner box: the inner faces point inward.
        let outer = TriangleMesh::cuboid(Point3::origin(), Point3::new(20.0, 20.0, 10.0));
        let inner =
            TriangleMesh::cuboid(Point3::new(5.0, 5.0, 0.0), Point3::new(15.0, 15.0, 10.0));
        let mut vertices = outer.vertices().to_vec();
        vertices.extend_from_slice(inner.vertices());
        let mut triangles: Vec<[usize; 3]> =
            outer.faces().iter().map(|face| face.vertex_indexes).collect();
        triangles.extend(inner.faces().iter().map(|face| {
            let [a, b, c] = face.vertex_indexes;
            [a + 8, c + 8, b + 8]
        }));
        let mesh = TriangleMesh::from_triangles(vertices, &triangles).unwrap();
        let slice = MeshSlicer::new(&mesh, &CarveParams::default())
            .unwrap()
            .slice(5.0);
        assert_eq!(slice.path, SlicePath::Correct);
        assert_eq!(slice.loops.len(), 2);
        assert_relative_eq!(slice.loops[0].area(), 400.0, epsilon = 1e-9);
        assert_relative_eq!(slice.loops[1].area(), -100.0, epsilon = 1e-9);
    }

    #[test]
    fn shared_edge_falls_back_and_keeps_both_squares() {
        // Two cubes touching along the vertical edge at (10, 10); that edge
        // borders four faces.
        let (mut vertices, mut triangles) = cube_with_vertices_and_triangles();
        let second =
            TriangleMesh::cuboid(Point3::new(10.0, 10.0, 0.0), Point3::new(20.0, 20.0, 10.0));
        let mut remap = Vec::with_capacity(8);
        for (index, vertex) in second.vertices().iter().enumerate() {
            match index {
                0 => remap.push(2),
                4 => remap.push(6),
                _ => {
                    remap.push(vertices.len());
                    vertices.push(*vertex);
                }
            }
        }
        triangles.extend(second.faces().iter().map(|face| {
            let [a, b, c] = face.vertex_indexes;
            [remap[a], remap[b], remap[c]]
        }));
        let mesh = TriangleMesh::from_triangles(vertices, &triangles).unwrap();
        assert!(!mesh.is_manifold());

        let slice = MeshSlicer::new(&mesh, &CarveParams::default())
            .unwrap()
            .slice(5.0);
        assert_eq!(
            slice.path,
            SlicePath::Unproven {
                fallback: Some(MeshDefect::NonManifold)
            }
        );
        assert!(!slice.loops.is_empty());
        assert!(slice.loops.iter().all(|points| points.len() >= 3));
        let area: f64 = slice.loops.iter().map(Loop::area).sum();
        assert_relative_eq!(area, 200.0, epsilon = 0.1);
    }

    #[test]
    fn defect_names_are_snake_case() {
        assert_eq!(MeshDefect::NonManifold.to_string(), "non_manifold");
        assert_eq!(MeshDefect::DanglingEdges.as_str(), "dangling_edges");
    }

    #[test]
    fn invalid_params_are_rejected() {
        let mesh = cube();
        let params = CarveParams::default().with_import_radius(-1.0);
        assert!(MeshSlicer::new(&mesh, &params).is_err());
    }
}
