use std::cmp::Ordering;
use std::collections::HashSet;

use super::polygon_2d::x_intersection;
use super::{cross, normalized, Complex, TOLERANCE};

/// Returns `true` if the segment `first`–`second` crosses the horizontal
/// line `y` strictly between `segment_first_x` and `segment_second_x`.
#[must_use]
pub fn is_line_intersecting_inside_x_segment(
    segment_first_x: f64,
    segment_second_x: f64,
    first: Complex,
    second: Complex,
    y: f64,
) -> bool {
    let is_above_first = y > first.im;
    let is_above_second = y > second.im;
    if is_above_first == is_above_second {
        return false;
    }
    let x = x_intersection(first, second, y);
    x > segment_first_x.min(segment_second_x) && x < segment_first_x.max(segment_second_x)
}

/// Returns `true` if any edge of the loop, rotated by `segment_y_mirror`,
/// crosses the horizontal segment at `y` between the two X values.
#[must_use]
pub fn is_loop_intersecting_inside_x_segment(
    points: &[Complex],
    segment_first_x: f64,
    segment_second_x: f64,
    segment_y_mirror: Complex,
    y: f64,
) -> bool {
    let n = points.len();
    (0..n).any(|i| {
        let first = segment_y_mirror * points[i];
        let second = segment_y_mirror * points[(i + 1) % n];
        is_line_intersecting_inside_x_segment(segment_first_x, segment_second_x, first, second, y)
    })
}

/// Returns `true` if the segment from `begin` to `end` crosses any loop.
///
/// The segment is rotated onto the X axis (multiplying by the conjugate of
/// its direction) so each test reduces to a horizontal crossing.
#[must_use]
pub fn is_line_intersecting_loops<L: AsRef<[Complex]>>(
    loops: &[L],
    begin: Complex,
    end: Complex,
) -> bool {
    let segment = end - begin;
    if segment.norm() <= 0.0 {
        return false;
    }
    let segment_y_mirror = normalized(segment).conj();
    let begin_rotated = segment_y_mirror * begin;
    let end_rotated = segment_y_mirror * end;
    loops.iter().any(|points| {
        is_loop_intersecting_inside_x_segment(
            points.as_ref(),
            begin_rotated.re,
            end_rotated.re,
            segment_y_mirror,
            begin_rotated.im,
        )
    })
}

/// Returns `true` if any edge of `points` crosses any of `other_loops`.
#[must_use]
pub fn is_loop_intersecting_loops<L: AsRef<[Complex]>>(
    points: &[Complex],
    other_loops: &[L],
) -> bool {
    let n = points.len();
    (0..n).any(|i| is_line_intersecting_loops(other_loops, points[i], points[(i + 1) % n]))
}

/// Returns `true` if `points` crosses `another`.
#[must_use]
pub fn is_loop_intersecting_loop(another: &[Complex], points: &[Complex]) -> bool {
    is_loop_intersecting_loops(points, &[another])
}

/// Returns `true` if any loop in the list crosses a later one.
#[must_use]
pub fn is_loop_list_intersecting<L: AsRef<[Complex]>>(loops: &[L]) -> bool {
    (0..loops.len().saturating_sub(1))
        .any(|i| is_loop_intersecting_loops(loops[i].as_ref(), &loops[i + 1..]))
}

/// Returns `true` if segments `a0`–`a1` and `b0`–`b1` cross at a point
/// interior to both. Parallel segments never cross.
#[must_use]
pub fn is_segment_crossing_segment(a0: Complex, a1: Complex, b0: Complex, b1: Complex) -> bool {
    let a = a1 - a0;
    let b = b1 - b0;
    let denominator = cross(a, b);
    if denominator.abs() < TOLERANCE {
        return false;
    }
    let start = b0 - a0;
    let t = cross(start, b) / denominator;
    let u = cross(start, a) / denominator;
    t > 0.0 && t < 1.0 && u > 0.0 && u < 1.0
}

/// Returns `true` if any two non-adjacent edges of the loop cross.
#[must_use]
pub fn is_loop_self_intersecting(points: &[Complex]) -> bool {
    let n = points.len();
    (0..n).any(|i| {
        (i + 2..n).any(|j| {
            !(i == 0 && j == n - 1)
                && is_segment_crossing_segment(
                    points[i],
                    points[(i + 1) % n],
                    points[j],
                    points[(j + 1) % n],
                )
        })
    })
}

/// An X coordinate where a horizontal sweep line crosses a loop edge.
///
/// `solid` names the loop the crossing belongs to; `None` marks a crossing
/// of the span being tested rather than of a solid loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct XIntersectionIndex {
    pub solid: Option<usize>,
    pub x: f64,
}

impl XIntersectionIndex {
    /// Creates a crossing belonging to the given solid loop.
    #[must_use]
    pub fn solid(index: usize, x: f64) -> Self {
        Self {
            solid: Some(index),
            x,
        }
    }

    /// Creates a crossing of the tested span.
    #[must_use]
    pub fn fill(x: f64) -> Self {
        Self { solid: None, x }
    }
}

/// Appends the crossings of every edge of `points` with the line `y`.
pub fn add_x_intersection_indexes(
    points: &[Complex],
    solid_index: usize,
    crossings: &mut Vec<XIntersectionIndex>,
    y: f64,
) {
    let n = points.len();
    for i in 0..n {
        let first = points[i];
        let second = points[(i + 1) % n];
        if (y > first.im) != (y > second.im) {
            crossings.push(XIntersectionIndex::solid(
                solid_index,
                x_intersection(first, second, y),
            ));
        }
    }
}

/// Reduces the crossings to the X values where "inside the tested span and
/// outside every solid loop" switches on or off.
///
/// Solid loops are toggled individually by index, so a point inside two
/// overlapping solids counts as covered.
#[must_use]
pub fn x_intersections_from_indexes(crossings: &mut [XIntersectionIndex]) -> Vec<f64> {
    crossings.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(Ordering::Equal));
    let mut x_intersections = Vec::new();
    let mut open_solids: HashSet<usize> = HashSet::new();
    let mut fill = false;
    let mut uncovered = false;
    for crossing in crossings.iter() {
        match crossing.solid {
            Some(index) => {
                if !open_solids.remove(&index) {
                    open_solids.insert(index);
                }
            }
            None => fill = !fill,
        }
        let was_uncovered = uncovered;
        uncovered = open_solids.is_empty() && fill;
        if was_uncovered != uncovered {
            x_intersections.push(crossing.x);
        }
    }
    x_intersections
}
