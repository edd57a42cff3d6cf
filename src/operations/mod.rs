pub mod layers;
pub mod offset;
pub mod slice;
