use crate::math::polygon_2d::x_intersection;
use crate::math::Complex;

/// Looks for the first vertex whose outgoing half-edge crosses the incoming
/// half-edge of the vertex before it, and splices the small loop out.
///
/// The vertex before moves to the crossing point and the current vertex is
/// removed. Returns `true` if a crossing was repaired; loops with fewer
/// than three points are never changed.
pub fn remove_intersection(points: &mut Vec<Complex>) -> bool {
    let n = points.len();
    if n < 3 {
        return false;
    }
    for i in 0..n {
        let behind = points[(i + n - 1) % n];
        let behind_end = points[(i + n - 2) % n];
        let behind_midpoint = 0.5 * (behind + behind_end);
        let ahead = points[i];
        let ahead_end = points[(i + 1) % n];
        let ahead_midpoint = 0.5 * (ahead + ahead_end);
        let normalized_segment = behind - behind_midpoint;
        let segment_length = normalized_segment.norm();
        if segment_length <= 0.0 {
            continue;
        }
        let normalized_segment = normalized_segment / segment_length;
        let segment_y_mirror = normalized_segment.conj();
        let behind_rotated = segment_y_mirror * behind;
        let behind_midpoint_rotated = segment_y_mirror * behind_midpoint;
        let ahead_rotated = segment_y_mirror * ahead;
        let ahead_midpoint_rotated = segment_y_mirror * ahead_midpoint;
        let y = behind_rotated.im;
        if (y > ahead_rotated.im) == (y > ahead_midpoint_rotated.im) {
            continue;
        }
        let x = x_intersection(ahead_rotated, ahead_midpoint_rotated, y);
        let low = behind_midpoint_rotated.re.min(behind_rotated.re);
        let high = behind_midpoint_rotated.re.max(behind_rotated.re);
        if x > low && x < high {
            points[(i + n - 1) % n] = normalized_segment * Complex::new(x, y);
            points.remove(i);
            return true;
        }
    }
    false
}

/// Repeats [`remove_intersection`] until nothing changes or only three
/// points remain. Each repair removes one point, so this runs at most
/// `len - 3` times.
pub fn without_intersections(points: &mut Vec<Complex>) {
    while points.len() > 3 {
        if !remove_intersection(points) {
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::polygon_2d::polygon_area;

    #[test]
    fn clean_loop_is_untouched() {
        let mut square = vec![
            Complex::new(0.0, 0.0),
            Complex::new(2.0, 0.0),
            Complex::new(2.0, 2.0),
            Complex::new(0.0, 2.0),
        ];
        let original = square.clone();
        without_intersections(&mut square);
        assert_eq!(square, original);
    }

    #[test]
    fn small_twist_is_spliced_out() {
        // The edge out of (1.5, -0.5) crosses back over the edge into (2, 0).
        let mut twisted = vec![
            Complex::new(0.0, 0.0),
            Complex::new(2.0, 0.0),
            Complex::new(1.5, -0.5),
            Complex::new(1.5, 1.0),
            Complex::new(3.0, 1.0),
            Complex::new(3.0, 3.0),
            Complex::new(0.0, 3.0),
        ];
        without_intersections(&mut twisted);
        assert_eq!(twisted.len(), 6);
        assert!((twisted[1] - Complex::new(1.5, 0.0)).norm() < 1e-12);
        assert!((polygon_area(&twisted) - 7.5).abs() < 1e-12);
    }

    #[test]
    fn too_few_points_have_nothing_to_repair() {
        let mut empty: Vec<Complex> = Vec::new();
        assert!(!remove_intersection(&mut empty));

        let mut single = vec![Complex::new(1.0, 1.0)];
        assert!(!remove_intersection(&mut single));
        assert_eq!(single.len(), 1);

        let mut pair = vec![Complex::new(0.0, 0.0), Complex::new(1.0, 0.0)];
        assert!(!remove_intersection(&mut pair));
        assert_eq!(pair.len(), 2);
    }

    #[test]
    fn triangles_are_left_alone() {
        let mut triangle = vec![
            Complex::new(0.0, 0.0),
            Complex::new(1.0, 1.0),
            Complex::new(1.0, 0.0),
        ];
        without_intersections(&mut triangle);
        assert_eq!(triangle.len(), 3);
    }
}
