use std::cell::OnceCell;

use crate::math::polygon_2d::{left_point, polygon_area};
use crate::math::Complex;

/// A closed contour in the slicing plane.
///
/// The last point connects back to the first; there is no repeated closing
/// point. Winding carries meaning: counter-clockwise (widdershins) loops
/// bound material, clockwise loops bound holes. The winding is computed on
/// first use and cached.
#[derive(Debug, Clone, Default)]
pub struct Loop {
    points: Vec<Complex>,
    widdershins: OnceCell<bool>,
}

impl Loop {
    /// Creates a loop from its points in order.
    #[must_use]
    pub fn new(points: Vec<Complex>) -> Self {
        Self {
            points,
            widdershins: OnceCell::new(),
        }
    }

    /// The points of the loop.
    #[must_use]
    pub fn points(&self) -> &[Complex] {
        &self.points
    }

    /// Consumes the loop and returns its points.
    #[must_use]
    pub fn into_points(self) -> Vec<Complex> {
        self.points
    }

    /// Number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns `true` if the loop has no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Signed area, positive for widdershins loops.
    #[must_use]
    pub fn area(&self) -> f64 {
        polygon_area(&self.points)
    }

    /// Returns `true` if the loop winds counter-clockwise.
    #[must_use]
    pub fn is_widdershins(&self) -> bool {
        *self
            .widdershins
            .get_or_init(|| polygon_area(&self.points) > 0.0)
    }

    /// Leftmost point, if any.
    #[must_use]
    pub fn left_point(&self) -> Option<Complex> {
        left_point(&self.points)
    }

    /// Reverses the point order in place, flipping the cached winding.
    pub fn reverse(&mut self) {
        self.points.reverse();
        // A cached `false` may be a zero-area loop, so only `true` flips.
        if self.widdershins.take() == Some(true) {
            let _ = self.widdershins.set(false);
        }
    }

    /// Returns the loop with its point order reversed.
    #[must_use]
    pub fn reversed(mut self) -> Self {
        self.reverse();
        self
    }

    /// Reverses the loop if needed so its winding matches `widdershins`.
    pub fn orient(&mut self, widdershins: bool) {
        if self.is_widdershins() != widdershins {
            self.reverse();
        }
    }
}

impl PartialEq for Loop {
    fn eq(&self, other: &Self) -> bool {
        self.points == other.points
    }
}

impl AsRef<[Complex]> for Loop {
    fn as_ref(&self) -> &[Complex] {
        &self.points
    }
}

impl From<Vec<Complex>> for Loop {
    fn from(points: Vec<Complex>) -> Self {
        Self::new(points)
    }
}

impl From<Loop> for Vec<Complex> {
    fn from(points: Loop) -> Self {
        points.points
    }
}
