/// An undirected mesh edge, canonicalized so the smaller vertex index is
/// first.
///
/// `face_indexes` lists every face sharing the edge in the order the faces
/// were added. A closed manifold surface gives exactly two; one means a hole
/// and three or more means non-manifold geometry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub vertex_indexes: [usize; 2],
    pub face_indexes: Vec<usize>,
}

impl Edge {
    /// Creates an edge between two vertices with no faces yet.
    #[must_use]
    pub fn new(a: usize, b: usize) -> Self {
        Self {
            vertex_indexes: [a.min(b), a.max(b)],
            face_indexes: Vec::new(),
        }
    }

    /// Canonical lookup key for the edge between `a` and `b`.
    #[must_use]
    pub fn key(a: usize, b: usize) -> (usize, usize) {
        (a.min(b), a.max(b))
    }

    /// Returns `true` if exactly two faces share the edge.
    #[must_use]
    pub fn is_manifold(&self) -> bool {
        self.face_indexes.len() == 2
    }
}
