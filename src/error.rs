use thiserror::Error;

/// Top-level error type for the carve slicer.
///
/// Only configuration and mesh-construction problems surface as errors.
/// Geometric defects found while slicing (holes, dangling edges,
/// self-intersecting outlines) are logged and recovered from instead.
#[derive(Debug, Error)]
pub enum CarveError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Mesh(#[from] MeshError),
}

/// Errors in the slicing parameters, raised before any slicing begins.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{parameter} must be positive and finite, got {value}")]
    NotPositive { parameter: &'static str, value: f64 },

    #[error("{parameter} = {value} is out of range [{min}, {max}]")]
    OutOfRange {
        parameter: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
}

/// Errors related to building or using a triangle mesh.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MeshError {
    #[error("face {face} references vertex {vertex}, but the mesh has {vertex_count} vertices")]
    VertexIndexOutOfRange {
        face: usize,
        vertex: usize,
        vertex_count: usize,
    },

    #[error("face {face} repeats vertex {vertex}")]
    DegenerateFace { face: usize, vertex: usize },

    #[error("polygon {polygon} has {count} vertices, at least 3 are required")]
    PolygonTooSmall { polygon: usize, count: usize },

    #[error("mesh has no vertices")]
    Empty,
}

/// Convenience type alias for results using [`CarveError`].
pub type Result<T> = std::result::Result<T, CarveError>;
