pub mod config;
pub mod error;
pub mod geometry;
pub mod math;
pub mod mesh;
pub mod operations;

pub use config::{CarveParams, InferenceTuning};
pub use error::{CarveError, Result};
pub use geometry::{Loop, RotatedLoopLayer};
pub use mesh::TriangleMesh;
pub use operations::layers::{CarvedLayers, LayerStack};
pub use operations::offset::LoopOffset;
pub use operations::slice::MeshSlicer;
