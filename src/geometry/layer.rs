use crate::math::polygon_2d::corners;
use crate::math::{Complex, UnitComplex};

use super::Loop;

/// The loops of one slicing height.
///
/// `rotation` is set only on layers that bridge a gap in the layer below;
/// it is the direction the bridging infill should run.
#[derive(Debug, Clone, PartialEq)]
pub struct RotatedLoopLayer {
    /// Nominal Z of the layer.
    pub z: f64,
    /// Bridging direction, if this layer spans unsupported space.
    pub rotation: Option<UnitComplex>,
    /// Closed contours; widdershins for outlines, clockwise for holes.
    pub loops: Vec<Loop>,
}

impl RotatedLoopLayer {
    /// Creates a layer with no bridging rotation.
    #[must_use]
    pub fn new(z: f64, loops: Vec<Loop>) -> Self {
        Self {
            z,
            rotation: None,
            loops,
        }
    }

    /// Returns `true` if the layer is bridging.
    #[must_use]
    pub fn is_bridge(&self) -> bool {
        self.rotation.is_some()
    }

    /// Component-wise minimum and maximum over all loop points.
    #[must_use]
    pub fn corners(&self) -> Option<(Complex, Complex)> {
        self.loops
            .iter()
            .filter_map(|points| corners(points.points()))
            .reduce(|(min_a, max_a), (min_b, max_b)| {
                (
                    Complex::new(min_a.re.min(min_b.re), min_a.im.min(min_b.im)),
                    Complex::new(max_a.re.max(max_b.re), max_a.im.max(max_b.im)),
                )
            })
    }
}
