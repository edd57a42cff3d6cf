use std::collections::BTreeSet;

use crate::math::intersect_2d::is_loop_list_intersecting;
use crate::math::Complex;
use crate::mesh::TriangleMesh;

use super::{MeshDefect, Straddle};

/// The first still-unvisited edge of a face bordering `edge_index`.
pub(super) fn next_edge_around_z(
    mesh: &TriangleMesh,
    edge_index: usize,
    remaining: &BTreeSet<usize>,
) -> Option<usize> {
    mesh.edges()[edge_index]
        .face_indexes
        .iter()
        .flat_map(|&face| mesh.faces()[face].edge_indexes)
        .find(|edge| remaining.contains(edge))
}

/// Walks the straddling edges face to face into closed loops.
///
/// Fails on the first sign that the surface around `z` is not a closed
/// manifold: an edge with a single face or with more than two, a walk that
/// stops after fewer than three edges, or loops that cross each other.
pub(super) fn build(straddle: &Straddle<'_>) -> Result<Vec<Vec<Complex>>, MeshDefect> {
    let mesh = straddle.mesh;
    let mut remaining: BTreeSet<usize> = straddle.edges.iter().copied().collect();
    if remaining
        .iter()
        .any(|&edge| mesh.edges()[edge].face_indexes.len() < 2)
    {
        return Err(MeshDefect::Hole);
    }
    if remaining
        .iter()
        .any(|&edge| mesh.edges()[edge].face_indexes.len() > 2)
    {
        return Err(MeshDefect::NonManifold);
    }
    let mut loops = Vec::new();
    while let Some(first) = remaining.pop_first() {
        let mut path = vec![first];
        let mut current = first;
        while let Some(next) = next_edge_around_z(mesh, current, &remaining) {
            remaining.remove(&next);
            path.push(next);
            current = next;
        }
        if path.len() < 3 {
            return Err(MeshDefect::DanglingEdges);
        }
        loops.push(path.into_iter().map(|edge| straddle.point(edge)).collect());
    }
    if is_loop_list_intersecting(&loops) {
        return Err(MeshDefect::SelfIntersecting);
    }
    Ok(loops)
}
