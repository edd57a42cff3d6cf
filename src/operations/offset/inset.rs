use crate::math::simplify::simplified_loop;
use crate::math::{normalized, Complex};

use super::self_intersect::without_intersections;

/// Slope below which two consecutive edges count as one straight run.
const STRAIGHT_RUN_SLOPE: f64 = 0.000_001;

/// Point on the line from `behind` to `ahead` offset by `inset` to the
/// right, measured from the segment midpoint.
#[must_use]
pub fn intersection_at_inset(ahead: Complex, behind: Complex, inset: f64) -> Complex {
    let half_way = 0.5 * (ahead - behind);
    let clockwise_quarter = Complex::new(half_way.im, -half_way.re);
    let length = clockwise_quarter.norm();
    let offset = if length > 0.0 {
        clockwise_quarter * (inset / length)
    } else {
        clockwise_quarter
    };
    half_way + behind + offset
}

/// Moves `center` to where the two edges `behind → center` and
/// `center → ahead`, each shifted right by `radius`, meet.
///
/// Works in a frame where `behind → center` runs along +x. Nearly parallel
/// edges meet at the midpoint of the two shifted points instead.
#[must_use]
pub fn inset_point_from_clockwise_triple(
    ahead: Complex,
    behind: Complex,
    center: Complex,
    radius: f64,
) -> Complex {
    let rotation = normalized(center - behind);
    let reverse = rotation.conj();
    let ahead = ahead * reverse;
    let behind = behind * reverse;
    let center = center * reverse;
    let ahead_intersection = intersection_at_inset(ahead, center, radius);
    let behind_intersection = intersection_at_inset(center, behind, radius);
    let center_minus_ahead = center - ahead;
    if center_minus_ahead.im.abs() < (STRAIGHT_RUN_SLOPE * center_minus_ahead.re).abs() {
        return rotation * 0.5 * (ahead_intersection + behind_intersection);
    }
    let y_minus_ahead = behind_intersection.im - ahead_intersection.im;
    let x = ahead_intersection.re + y_minus_ahead * center_minus_ahead.re / center_minus_ahead.im;
    rotation * Complex::new(x, behind_intersection.im)
}

/// Offsets every vertex of the loop by `radius` to the right of its edges.
///
/// Right of travel is the inside of a clockwise loop and the outside of a
/// widdershins one.
#[must_use]
pub fn inset_from_clockwise_loop(points: &[Complex], radius: f64) -> Vec<Complex> {
    let n = points.len();
    (0..n)
        .map(|i| {
            inset_point_from_clockwise_triple(
                points[(i + 1) % n],
                points[(i + n - 1) % n],
                points[i],
                radius,
            )
        })
        .collect()
}

/// Mitred offset followed by simplification and self-intersection removal.
#[must_use]
pub fn simplified_inset_from_clockwise_loop(points: &[Complex], radius: f64) -> Vec<Complex> {
    let mut inset = simplified_loop(&inset_from_clockwise_loop(points, radius), radius);
    without_intersections(&mut inset);
    inset
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::polygon_2d::polygon_area;

    #[test]
    fn offset_is_to_the_right() {
        let point = intersection_at_inset(Complex::new(2.0, 0.0), Complex::new(0.0, 0.0), 1.0);
        assert!((point - Complex::new(1.0, -1.0)).norm() < 1e-12);
    }

    #[test]
    fn corner_is_mitred() {
        // Counter-clockwise corner at the origin: right offsets meet outside.
        let point = inset_point_from_clockwise_triple(
            Complex::new(0.0, 1.0),
            Complex::new(-1.0, 0.0),
            Complex::new(0.0, 0.0),
            0.5,
        );
        assert!((point - Complex::new(0.5, -0.5)).norm() < 1e-12);
    }

    #[test]
    fn straight_run_keeps_offset() {
        let point = inset_point_from_clockwise_triple(
            Complex::new(2.0, 0.0),
            Complex::new(-2.0, 0.0),
            Complex::new(0.0, 0.0),
            0.25,
        );
        assert!((point - Complex::new(0.0, -0.25)).norm() < 1e-12);
    }

    #[test]
    fn clockwise_square_shrinks() {
        let clockwise = [
            Complex::new(0.0, 0.0),
            Complex::new(0.0, 4.0),
            Complex::new(4.0, 4.0),
            Complex::new(4.0, 0.0),
        ];
        let shrunk = simplified_inset_from_clockwise_loop(&clockwise, 1.0);
        assert_eq!(shrunk.len(), 4);
        assert!((polygon_area(&shrunk) + 4.0).abs() < 1e-9);
        assert!((shrunk[0] - Complex::new(1.0, 1.0)).norm() < 1e-9);
    }

    #[test]
    fn widdershins_square_grows() {
        let widdershins = [
            Complex::new(0.0, 0.0),
            Complex::new(4.0, 0.0),
            Complex::new(4.0, 4.0),
            Complex::new(0.0, 4.0),
        ];
        let grown = simplified_inset_from_clockwise_loop(&widdershins, 1.0);
        assert_eq!(grown.len(), 4);
        assert!((polygon_area(&grown) - 36.0).abs() < 1e-9);
    }
}
