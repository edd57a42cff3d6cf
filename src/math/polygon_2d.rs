use super::Complex;

/// Computes the signed area of a closed loop (shoelace formula).
///
/// Positive for counter-clockwise (widdershins), negative for clockwise.
#[must_use]
pub fn polygon_area(points: &[Complex]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        sum += a.re * b.im - b.re * a.im;
    }
    sum * 0.5
}

/// Returns `true` if the loop winds counter-clockwise.
#[must_use]
pub fn is_widdershins(points: &[Complex]) -> bool {
    polygon_area(points) > 0.0
}

/// X coordinate where the line through `first` and `second` crosses `y`.
///
/// Callers must ensure the line is not horizontal.
#[must_use]
pub fn x_intersection(first: Complex, second: Complex, y: f64) -> f64 {
    let delta = second - first;
    (y - first.im) / delta.im * delta.re + first.re
}

/// Counts loop edges crossed by the horizontal ray running left from `point`.
///
/// An edge counts when exactly one endpoint lies strictly below the ray's Y,
/// so a vertex sitting exactly on the ray is attributed to one edge only.
#[must_use]
pub fn intersections_to_left(point: Complex, points: &[Complex]) -> usize {
    let n = points.len();
    let mut count = 0;
    for i in 0..n {
        let first = points[i];
        let second = points[(i + 1) % n];
        let is_above_first = point.im > first.im;
        let is_above_second = point.im > second.im;
        if is_above_first != is_above_second && x_intersection(first, second, point.im) < point.re
        {
            count += 1;
        }
    }
    count
}

/// Ray-casting parity test.
#[must_use]
pub fn is_point_inside_loop(points: &[Complex], point: Complex) -> bool {
    intersections_to_left(point, points) % 2 == 1
}

/// Returns `true` if `point` lies inside any of the loops.
#[must_use]
pub fn is_point_inside_loops<L: AsRef<[Complex]>>(loops: &[L], point: Complex) -> bool {
    loops
        .iter()
        .any(|points| is_point_inside_loop(points.as_ref(), point))
}

/// Returns `true` if `point` is inside an odd number of the loops.
///
/// With outer boundaries and holes mixed in one list this is the material
/// region: inside an outline but not inside one of its holes.
#[must_use]
pub fn is_in_filled_region<L: AsRef<[Complex]>>(loops: &[L], point: Complex) -> bool {
    loops
        .iter()
        .filter(|points| is_point_inside_loop(points.as_ref(), point))
        .count()
        % 2
        == 1
}

/// Leftmost point (smallest X, first one wins ties).
#[must_use]
pub fn left_point(points: &[Complex]) -> Option<Complex> {
    let mut best: Option<Complex> = None;
    for &point in points {
        match best {
            Some(b) if point.re >= b.re => {}
            _ => best = Some(point),
        }
    }
    best
}

/// Returns `true` if the leftmost point of `path` lies inside `points`.
#[must_use]
pub fn is_path_inside_loop(points: &[Complex], path: &[Complex]) -> bool {
    left_point(path).is_some_and(|left| is_point_inside_loop(points, left))
}

/// Returns `true` if `path` is inside any of the loops.
#[must_use]
pub fn is_path_inside_loops<L: AsRef<[Complex]>>(loops: &[L], path: &[Complex]) -> bool {
    loops
        .iter()
        .any(|points| is_path_inside_loop(points.as_ref(), path))
}

/// Component-wise minimum and maximum of the points.
#[must_use]
pub fn corners(points: &[Complex]) -> Option<(Complex, Complex)> {
    let first = *points.first()?;
    let mut minimum = first;
    let mut maximum = first;
    for point in &points[1..] {
        minimum.re = minimum.re.min(point.re);
        minimum.im = minimum.im.min(point.im);
        maximum.re = maximum.re.max(point.re);
        maximum.im = maximum.im.max(point.im);
    }
    Some((minimum, maximum))
}

/// Larger of the loop's X and Y extents.
#[must_use]
pub fn maximum_span(points: &[Complex]) -> f64 {
    corners(points).map_or(0.0, |(minimum, maximum)| {
        let extent = maximum - minimum;
        extent.re.max(extent.im)
    })
}

/// Perimeter of a closed loop.
#[must_use]
pub fn polygon_length(points: &[Complex]) -> f64 {
    let n = points.len();
    (0..n)
        .map(|i| (points[i] - points[(i + 1) % n]).norm())
        .sum()
}

/// Rotates every point by multiplying with `rotation`.
#[must_use]
pub fn rotated(points: &[Complex], rotation: Complex) -> Vec<Complex> {
    points.iter().map(|&point| rotation * point).collect()
}

/// The loops winding the given way.
#[must_use]
pub fn loops_in_direction(loops: Vec<Vec<Complex>>, widdershins: bool) -> Vec<Vec<Complex>> {
    loops
        .into_iter()
        .filter(|points| is_widdershins(points) == widdershins)
        .collect()
}

/// Index of the loop with the largest absolute area.
#[must_use]
pub fn largest_loop<L: AsRef<[Complex]>>(loops: &[L]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (index, points) in loops.iter().enumerate() {
        let area = polygon_area(points.as_ref()).abs();
        if best.map_or(true, |(_, best_area)| area > best_area) {
            best = Some((index, area));
        }
    }
    best.map(|(index, _)| index)
}
