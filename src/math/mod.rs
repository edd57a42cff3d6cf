pub mod intersect_2d;
pub mod pixel_grid;
pub mod polygon_2d;
pub mod simplify;

pub use pixel_grid::PixelGrid;

/// A point or direction in the slicing plane, stored as `x + y·i`.
///
/// Complex multiplication doubles as rotation, which the overhang and
/// intersection tests lean on heavily.
pub type Complex = nalgebra::Complex<f64>;

/// Unit complex number, used as a planar rotation.
pub type UnitComplex = nalgebra::UnitComplex<f64>;

/// 3D point type.
pub type Point3 = nalgebra::Point3<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// 4x4 transformation matrix.
pub type Matrix4 = nalgebra::Matrix4<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Dot product of two planar vectors.
#[must_use]
pub fn dot(a: Complex, b: Complex) -> f64 {
    a.re * b.re + a.im * b.im
}

/// Z component of the cross product of two planar vectors.
#[must_use]
pub fn cross(a: Complex, b: Complex) -> f64 {
    a.re * b.im - a.im * b.re
}

/// Returns `c` scaled to unit length, or `c` unchanged if it has zero length.
#[must_use]
pub fn normalized(c: Complex) -> Complex {
    let length = c.norm();
    if length > 0.0 {
        c / length
    } else {
        c
    }
}

/// Drops the Z axis of a 3D point.
#[must_use]
pub fn xy(point: &Point3) -> Complex {
    Complex::new(point.x, point.y)
}

/// Angular ordering key used when walking circle intersections.
///
/// Returns `1 + a·b`, negated when `b` lies counter-clockwise of `a`, so that
/// the smallest value is the sharpest counter-clockwise turn.
#[must_use]
pub fn widdershins_dot(a: Complex, b: Complex) -> f64 {
    let dot_plus_one = 1.0 + dot(a, b);
    if cross(a, b) >= 0.0 {
        -dot_plus_one
    } else {
        dot_plus_one
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dot_and_cross() {
        let a = Complex::new(1.0, 0.0);
        let b = Complex::new(0.0, 2.0);
        assert!(dot(a, b).abs() < 1e-12);
        assert!((cross(a, b) - 2.0).abs() < 1e-12);
        assert!((cross(b, a) + 2.0).abs() < 1e-12);
    }

    #[test]
    fn normalized_zero_is_zero() {
        let z = normalized(Complex::new(0.0, 0.0));
        assert!(z.norm() < 1e-12);
        let n = normalized(Complex::new(3.0, 4.0));
        assert!((n.norm() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn widdershins_dot_prefers_left_turns() {
        let heading = Complex::new(1.0, 0.0);
        let left = widdershins_dot(heading, Complex::new(0.0, 1.0));
        let right = widdershins_dot(heading, Complex::new(0.0, -1.0));
        assert!(left < right);
    }
}
