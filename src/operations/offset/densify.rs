use crate::math::Complex;

/// Fraction of the radius used as the half-spacing when densifying loop
/// edges before circle construction.
pub const LOOP_THRESHOLD_RATIO: f64 = 0.9;

/// Appends evenly spaced points strictly between `begin` and `end`, so that
/// consecutive points are at most `2 * threshold_ratio * radius` apart.
///
/// Neither endpoint is appended. Zero-length segments add nothing.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn add_points_from_segment(
    points: &mut Vec<Complex>,
    radius: f64,
    begin: Complex,
    end: Complex,
    threshold_ratio: f64,
) {
    let threshold_diameter = 2.0 * radius * threshold_ratio;
    let segment = end - begin;
    let segment_length = segment.norm();
    if segment_length <= 0.0 || threshold_diameter <= 0.0 {
        return;
    }
    let extra_points = (segment_length / threshold_diameter).floor() as usize;
    let increment = segment_length / (extra_points as f64 + 1.0);
    let step = segment * (increment / segment_length);
    let mut next = begin + step;
    for _ in 0..extra_points {
        points.push(next);
        next += step;
    }
}

/// Returns the loop's points with extra points inserted along every edge.
#[must_use]
pub fn points_from_loop(points: &[Complex], radius: f64, threshold_ratio: f64) -> Vec<Complex> {
    let radius = radius.abs();
    let n = points.len();
    let mut densified = Vec::with_capacity(n);
    for i in 0..n {
        densified.push(points[i]);
        add_points_from_segment(
            &mut densified,
            radius,
            points[i],
            points[(i + 1) % n],
            threshold_ratio,
        );
    }
    densified
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_segment_is_filled() {
        let mut points = Vec::new();
        add_points_from_segment(
            &mut points,
            1.0,
            Complex::new(0.0, 0.0),
            Complex::new(10.0, 0.0),
            LOOP_THRESHOLD_RATIO,
        );
        // floor(10 / 1.8) = 5 points at spacing 10 / 6.
        assert_eq!(points.len(), 5);
        assert!((points[0].re - 10.0 / 6.0).abs() < 1e-12);
        assert!((points[4].re - 50.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn short_and_empty_segments_add_nothing() {
        let mut points = Vec::new();
        let origin = Complex::new(1.0, 1.0);
        add_points_from_segment(&mut points, 1.0, origin, origin, 0.9);
        add_points_from_segment(&mut points, 1.0, origin, origin + Complex::new(1.0, 0.0), 0.9);
        assert!(points.is_empty());
    }

    #[test]
    fn loop_keeps_original_vertices_in_order() {
        let square = [
            Complex::new(0.0, 0.0),
            Complex::new(4.0, 0.0),
            Complex::new(4.0, 4.0),
            Complex::new(0.0, 4.0),
        ];
        let densified = points_from_loop(&square, 1.0, LOOP_THRESHOLD_RATIO);
        // Each side gains floor(4 / 1.8) = 2 points.
        assert_eq!(densified.len(), 12);
        assert_eq!(densified[0], square[0]);
        assert_eq!(densified[3], square[1]);
        assert_eq!(densified[6], square[2]);
        assert_eq!(densified[9], square[3]);
    }
}
