/// A triangle of the mesh.
///
/// `edge_indexes[k]` is the edge from `vertex_indexes[k]` to
/// `vertex_indexes[(k + 1) % 3]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Face {
    pub vertex_indexes: [usize; 3],
    pub edge_indexes: [usize; 3],
}
