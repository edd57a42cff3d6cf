use super::{dot, Complex, PixelGrid};

/// Starting divisor of the simplification radius; the radius doubles each
/// pass until it reaches the full value.
const SIMPLIFICATION_MULTIPLICATION: usize = 256;

/// Returns the points that are not within `0.01 * radius` of an earlier kept
/// point, preserving order.
#[must_use]
pub fn away_points(points: &[Complex], radius: f64) -> Vec<Complex> {
    let overlap_distance = 0.01 * radius;
    let mut grid = PixelGrid::new(1.01 * radius);
    let mut away = Vec::with_capacity(points.len());
    for &point in points {
        let is_close = grid
            .around(point)
            .any(|&other: &Complex| (other - point).norm() < overlap_distance);
        if !is_close {
            away.push(point);
            grid.insert(point, point);
        }
    }
    away
}

/// Returns `true` if the point at `index` lies within a channel of
/// `channel_radius` around the line joining its neighbours, or is closer than
/// that to either neighbour.
#[must_use]
pub fn is_within_channel(channel_radius: f64, index: usize, points: &[Complex]) -> bool {
    let n = points.len();
    let point = points[index];
    let behind = points[(index + n - 1) % n] - point;
    let behind_length = behind.norm();
    if behind_length < channel_radius {
        return true;
    }
    let ahead = points[(index + 1) % n] - point;
    let ahead_length = ahead.norm();
    if ahead_length < channel_radius {
        return true;
    }
    // Zero when the neighbours are exactly opposite, two when they fold back.
    let bend = 1.0 + dot(ahead / ahead_length, behind / behind_length);
    behind_length * bend < channel_radius || ahead_length * bend < channel_radius
}

/// One simplification half-pass: points whose index parity equals
/// `remainder` are always kept, the others only if they leave the channel.
fn half_simplified_loop(points: &[Complex], radius: f64, remainder: usize) -> Vec<Complex> {
    if points.len() < 2 {
        return points.to_vec();
    }
    let channel_radius = radius * 0.01;
    let always_kept = if remainder == 1 { points.len() - 1 } else { 0 };
    points
        .iter()
        .enumerate()
        .filter(|&(index, _)| {
            index % 2 == remainder
                || index == always_kept
                || !is_within_channel(channel_radius, index, points)
        })
        .map(|(_, &point)| point)
        .collect()
}

/// Removes nearly collinear points and near-duplicates from a closed loop.
///
/// Channel passes run at radii doubling from `radius / 256` up to `radius`,
/// alternating between odd and even indices, then near-duplicate points are
/// dropped with [`away_points`]. Running it twice at the same radius gives
/// the same loop.
#[must_use]
pub fn simplified_loop(points: &[Complex], radius: f64) -> Vec<Complex> {
    if points.len() < 2 {
        return points.to_vec();
    }
    #[allow(clippy::cast_precision_loss)]
    let mut simplification_radius = radius / SIMPLIFICATION_MULTIPLICATION as f64;
    let maximum_index = points.len() * SIMPLIFICATION_MULTIPLICATION;
    let mut simplified = points.to_vec();
    let mut pass_index = 1;
    while pass_index < maximum_index {
        simplified = half_simplified_loop(&simplified, simplification_radius, 0);
        simplified = half_simplified_loop(&simplified, simplification_radius, 1);
        simplification_radius = (simplification_radius * 2.0).min(radius);
        pass_index *= 2;
    }
    away_points(&simplified, radius)
}

/// Simplifies every loop in the list.
#[must_use]
pub fn simplified_loops<L: AsRef<[Complex]>>(loops: &[L], radius: f64) -> Vec<Vec<Complex>> {
    loops
        .iter()
        .map(|points| simplified_loop(points.as_ref(), radius))
        .collect()
}
