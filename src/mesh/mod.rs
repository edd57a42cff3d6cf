pub mod edge;
pub mod face;

pub use edge::Edge;
pub use face::Face;

use std::cell::OnceCell;
use std::collections::HashMap;

use crate::error::MeshError;
use crate::math::{Matrix4, Point3};

/// Faces of an axis-aligned box, wound so their normals point outward.
///
/// Vertex order is the bottom face counter-clockwise from the minimum
/// corner, then the top face in the same order.
const CUBOID_TRIANGLES: [[usize; 3]; 12] = [
    [0, 2, 1],
    [0, 3, 2],
    [4, 5, 6],
    [4, 6, 7],
    [0, 1, 5],
    [0, 5, 4],
    [1, 2, 6],
    [1, 6, 5],
    [2, 3, 7],
    [2, 7, 6],
    [3, 0, 4],
    [3, 4, 7],
];

/// An indexed triangle mesh with its edge table.
///
/// Edges are derived from the faces, keyed by sorted vertex-index pairs, and
/// record every face that shares them. Vertices are stored untransformed;
/// [`transformed_vertices`](Self::transformed_vertices) applies the
/// accumulated transform and caches the result until the transform changes.
#[derive(Debug, Clone)]
pub struct TriangleMesh {
    vertices: Vec<Point3>,
    edges: Vec<Edge>,
    faces: Vec<Face>,
    transform: Matrix4,
    transformed: OnceCell<Vec<Point3>>,
}

impl TriangleMesh {
    /// Builds a mesh from vertices and vertex-index triples.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::VertexIndexOutOfRange`] if a triangle refers to a
    /// missing vertex, or [`MeshError::DegenerateFace`] if a triangle repeats
    /// a vertex.
    pub fn from_triangles(
        vertices: Vec<Point3>,
        triangles: &[[usize; 3]],
    ) -> Result<Self, MeshError> {
        for (face, triangle) in triangles.iter().enumerate() {
            check_face(face, triangle, vertices.len())?;
            if triangle[0] == triangle[1] || triangle[0] == triangle[2] {
                return Err(MeshError::DegenerateFace {
                    face,
                    vertex: triangle[0],
                });
            }
            if triangle[1] == triangle[2] {
                return Err(MeshError::DegenerateFace {
                    face,
                    vertex: triangle[1],
                });
            }
        }
        Ok(Self::from_checked_triangles(vertices, triangles))
    }

    /// Builds a mesh from convex polygon faces, fanning each polygon into
    /// triangles from its first vertex.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::PolygonTooSmall`] for a polygon with fewer than
    /// three vertices, or any error from [`from_triangles`](Self::from_triangles).
    pub fn from_polygons(vertices: Vec<Point3>, polygons: &[Vec<usize>]) -> Result<Self, MeshError> {
        let mut triangles = Vec::new();
        for (polygon, indexes) in polygons.iter().enumerate() {
            if indexes.len() < 3 {
                return Err(MeshError::PolygonTooSmall {
                    polygon,
                    count: indexes.len(),
                });
            }
            for pair in indexes[1..].windows(2) {
                triangles.push([indexes[0], pair[0], pair[1]]);
            }
        }
        Self::from_triangles(vertices, &triangles)
    }

    /// Builds a closed box between two opposite corners.
    #[must_use]
    pub fn cuboid(minimum: Point3, maximum: Point3) -> Self {
        let (x0, y0, z0) = (minimum.x, minimum.y, minimum.z);
        let (x1, y1, z1) = (maximum.x, maximum.y, maximum.z);
        let vertices = vec![
            Point3::new(x0, y0, z0),
            Point3::new(x1, y0, z0),
            Point3::new(x1, y1, z0),
            Point3::new(x0, y1, z0),
            Point3::new(x0, y0, z1),
            Point3::new(x1, y0, z1),
            Point3::new(x1, y1, z1),
            Point3::new(x0, y1, z1),
        ];
        Self::from_checked_triangles(vertices, &CUBOID_TRIANGLES)
    }

    fn from_checked_triangles(vertices: Vec<Point3>, triangles: &[[usize; 3]]) -> Self {
        let mut edges: Vec<Edge> = Vec::new();
        let mut edge_table: HashMap<(usize, usize), usize> = HashMap::new();
        let mut faces = Vec::with_capacity(triangles.len());
        for (face_index, triangle) in triangles.iter().enumerate() {
            let mut edge_indexes = [0; 3];
            for k in 0..3 {
                let a = triangle[k];
                let b = triangle[(k + 1) % 3];
                let edge_index = *edge_table.entry(Edge::key(a, b)).or_insert_with(|| {
                    edges.push(Edge::new(a, b));
                    edges.len() - 1
                });
                edges[edge_index].face_indexes.push(face_index);
                edge_indexes[k] = edge_index;
            }
            faces.push(Face {
                vertex_indexes: *triangle,
                edge_indexes,
            });
        }
        Self {
            vertices,
            edges,
            faces,
            transform: Matrix4::identity(),
            transformed: OnceCell::new(),
        }
    }

    /// Untransformed vertices.
    #[must_use]
    pub fn vertices(&self) -> &[Point3] {
        &self.vertices
    }

    /// All edges, in order of first use by a face.
    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// All faces, in input order.
    #[must_use]
    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// The accumulated transform.
    #[must_use]
    pub fn transform(&self) -> &Matrix4 {
        &self.transform
    }

    /// Replaces the accumulated transform.
    pub fn set_transform(&mut self, transform: Matrix4) {
        self.transform = transform;
        self.transformed = OnceCell::new();
    }

    /// Applies `transform` after the current one.
    pub fn append_transform(&mut self, transform: &Matrix4) {
        self.set_transform(transform * self.transform);
    }

    /// Vertices with the accumulated transform applied.
    #[must_use]
    pub fn transformed_vertices(&self) -> &[Point3] {
        self.transformed.get_or_init(|| {
            self.vertices
                .iter()
                .map(|point| transform_point(&self.transform, point))
                .collect()
        })
    }

    /// Component-wise minimum of the transformed vertices.
    #[must_use]
    pub fn corner_minimum(&self) -> Option<Point3> {
        self.transformed_vertices()
            .iter()
            .copied()
            .reduce(|a, b| a.inf(&b))
    }

    /// Component-wise maximum of the transformed vertices.
    #[must_use]
    pub fn corner_maximum(&self) -> Option<Point3> {
        self.transformed_vertices()
            .iter()
            .copied()
            .reduce(|a, b| a.sup(&b))
    }

    /// Returns `true` if every edge is shared by exactly two faces.
    #[must_use]
    pub fn is_manifold(&self) -> bool {
        self.edges.iter().all(Edge::is_manifold)
    }
}

fn check_face(face: usize, triangle: &[usize; 3], vertex_count: usize) -> Result<(), MeshError> {
    match triangle.iter().find(|&&vertex| vertex >= vertex_count) {
        Some(&vertex) => Err(MeshError::VertexIndexOutOfRange {
            face,
            vertex,
            vertex_count,
        }),
        None => Ok(()),
    }
}

/// Transforms a point by a 4x4 matrix (homogeneous coordinates).
fn transform_point(matrix: &Matrix4, point: &Point3) -> Point3 {
    let v = matrix * nalgebra::Vector4::new(point.x, point.y, point.z, 1.0);
    Point3::new(v.x, v.y, v.z)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Vector3;
    use approx::assert_relative_eq;

    fn unit_cube() -> TriangleMesh {
        TriangleMesh::cuboid(Point3::origin(), Point3::new(1.0, 1.0, 1.0))
    }

    #[test]
    fn cuboid_is_closed() {
        let mesh = unit_cube();
        assert_eq!(mesh.vertices().len(), 8);
        assert_eq!(mesh.faces().len(), 12);
        assert_eq!(mesh.edges().len(), 18);
        assert!(mesh.is_manifold());
    }

    #[test]
    fn cuboid_faces_point_outward() {
        let mesh = TriangleMesh::cuboid(Point3::new(-1.0, -2.0, -3.0), Point3::new(1.0, 2.0, 3.0));
        for face in mesh.faces() {
            let [a, b, c] = face.vertex_indexes.map(|i| mesh.vertices()[i]);
            let normal = (b - a).cross(&(c - a));
            let centroid = (a.coords + b.coords + c.coords) / 3.0;
            assert!(normal.dot(&centroid) > 0.0);
        }
    }

    #[test]
    fn face_edges_follow_vertex_order() {
        let mesh = unit_cube();
        for face in mesh.faces() {
            for k in 0..3 {
                let edge = &mesh.edges()[face.edge_indexes[k]];
                let key = Edge::key(face.vertex_indexes[k], face.vertex_indexes[(k + 1) % 3]);
                assert_eq!(edge.vertex_indexes, [key.0, key.1]);
            }
        }
    }

    #[test]
    fn missing_face_leaves_open_edges() {
        let vertices = unit_cube().vertices().to_vec();
        let mesh = TriangleMesh::from_triangles(vertices, &CUBOID_TRIANGLES[..11]).unwrap();
        assert!(!mesh.is_manifold());
        let open = mesh
            .edges()
            .iter()
            .filter(|edge| edge.face_indexes.len() == 1)
            .count();
        assert_eq!(open, 3);
    }

    #[test]
    fn bad_indexes_are_rejected() {
        let vertices = vec![Point3::origin(), Point3::new(1.0, 0.0, 0.0)];
        assert_eq!(
            TriangleMesh::from_triangles(vertices.clone(), &[[0, 1, 2]]).unwrap_err(),
            MeshError::VertexIndexOutOfRange {
                face: 0,
                vertex: 2,
                vertex_count: 2
            }
        );
        assert_eq!(
            TriangleMesh::from_triangles(vertices, &[[0, 1, 1]]).unwrap_err(),
            MeshError::DegenerateFace { face: 0, vertex: 1 }
        );
    }

    #[test]
    fn polygons_are_fanned() {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        let mesh = TriangleMesh::from_polygons(vertices.clone(), &[vec![0, 1, 2, 3]]).unwrap();
        assert_eq!(mesh.faces().len(), 2);
        assert_eq!(mesh.faces()[0].vertex_indexes, [0, 1, 2]);
        assert_eq!(mesh.faces()[1].vertex_indexes, [0, 2, 3]);
        assert_eq!(mesh.edges().len(), 5);

        assert_eq!(
            TriangleMesh::from_polygons(vertices, &[vec![0, 1]]).unwrap_err(),
            MeshError::PolygonTooSmall {
                polygon: 0,
                count: 2
            }
        );
    }

    #[test]
    fn transform_is_applied_and_cache_invalidated() {
        let mut mesh = unit_cube();
        assert_relative_eq!(mesh.corner_maximum().unwrap().z, 1.0);

        mesh.set_transform(Matrix4::new_translation(&Vector3::new(0.0, 0.0, 2.0)));
        assert_relative_eq!(mesh.corner_minimum().unwrap().z, 2.0);

        mesh.append_transform(&Matrix4::new_nonuniform_scaling(&Vector3::new(1.0, 1.0, 3.0)));
        let minimum = mesh.corner_minimum().unwrap();
        let maximum = mesh.corner_maximum().unwrap();
        assert_relative_eq!(minimum.z, 6.0);
        assert_relative_eq!(maximum.z, 9.0);
        assert_relative_eq!(maximum.x, 1.0);
        // Source vertices are untouched.
        assert_relative_eq!(mesh.vertices()[6].z, 1.0);
    }

    #[test]
    fn empty_mesh_has_no_corners() {
        let mesh = TriangleMesh::from_triangles(Vec::new(), &[]).unwrap();
        assert!(mesh.corner_minimum().is_none());
        assert!(mesh.is_manifold());
    }
}
