pub mod layer;
pub mod loop_2d;
pub mod segment;

pub use layer::RotatedLoopLayer;
pub use loop_2d::Loop;
pub use segment::{Endpoint, Segment};
