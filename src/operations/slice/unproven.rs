use std::collections::HashSet;

use crate::config::InferenceTuning;
use crate::math::polygon_2d::{is_in_filled_region, is_widdershins, polygon_area};
use crate::math::simplify::simplified_loop;
use crate::math::{dot, Complex};
use crate::operations::offset::{add_points_from_segment, centers_from_points};

use super::Straddle;

/// Spacing ratio for the points filled in between crossings that share a
/// face.
const FACE_THRESHOLD_RATIO: f64 = 0.3;

/// Exact identity of a point, for overlap bookkeeping.
fn point_key(point: Complex) -> (u64, u64) {
    (point.re.to_bits(), point.im.to_bits())
}

/// Returns `true` if the directions from `center` to `begin` and to `end`
/// are nearly opposite.
fn is_inline(begin: Complex, center: Complex, end: Complex) -> bool {
    let center_begin = begin - center;
    let center_end = end - center;
    let begin_length = center_begin.norm();
    let end_length = center_end.norm();
    if begin_length <= 0.0 || end_length <= 0.0 {
        return false;
    }
    dot(center_begin / begin_length, center_end / end_length) < -0.999
}

/// Inserts `point` into the loop edge it lengthens least, if that adds less
/// than `shortest_addition` and the point lines up with a neighbouring edge.
fn add_with_least_length(loops: &mut [Vec<Complex>], point: Complex, shortest_addition: f64) {
    let mut shortest = shortest_addition;
    let mut best: Option<(usize, usize)> = None;
    for (loop_index, points) in loops.iter().enumerate() {
        let n = points.len();
        if n < 3 {
            continue;
        }
        for i in 0..n {
            let ahead = points[i];
            let behind = points[(i + n - 1) % n];
            let addition =
                (point - behind).norm() + (point - ahead).norm() - (ahead - behind).norm();
            if addition < shortest {
                shortest = addition;
                best = Some((loop_index, i));
            }
        }
    }
    let Some((loop_index, i)) = best else {
        return;
    };
    let points = &mut loops[loop_index];
    let n = points.len();
    let is_ahead_inline = is_inline(point, points[i], points[(i + 1) % n]);
    let is_behind_inline = is_inline(point, points[(i + n - 1) % n], points[(i + n - 2) % n]);
    if is_ahead_inline || is_behind_inline {
        points.insert(i, point);
    }
}

/// Infers loops from the crossing points alone, without trusting the face
/// connectivity to close them.
///
/// The crossings, densified along every pair of crossings that share a face,
/// are covered with circles of `radius`; the silhouettes of those circles
/// are candidate loops. Candidates are accepted largest first unless too
/// many of their points are already claimed, oriented by nesting, and the
/// crossings no loop picked up are spliced into the nearest edge.
pub(super) fn build(
    straddle: &Straddle<'_>,
    radius: f64,
    tuning: &InferenceTuning,
) -> Vec<Vec<Complex>> {
    let mesh = straddle.mesh;
    let corners: Vec<Complex> = straddle
        .edges
        .iter()
        .map(|&edge| straddle.point(edge))
        .collect();
    let straddling: HashSet<usize> = straddle.edges.iter().copied().collect();
    let mut face_pairs: Vec<(usize, usize)> = Vec::new();
    let mut seen_pairs: HashSet<(usize, usize)> = HashSet::new();
    for &edge in &straddle.edges {
        for &face in &mesh.edges()[edge].face_indexes {
            for other in mesh.faces()[face].edge_indexes {
                if other != edge && straddling.contains(&other) {
                    let pair = (edge.min(other), edge.max(other));
                    if seen_pairs.insert(pair) {
                        face_pairs.push(pair);
                    }
                }
            }
        }
    }

    let mut points = corners.clone();
    for (a, b) in face_pairs {
        add_points_from_segment(
            &mut points,
            radius,
            straddle.point(a),
            straddle.point(b),
            FACE_THRESHOLD_RATIO,
        );
    }

    let mut centers = centers_from_points(&points, radius);
    centers.sort_by(|a, b| polygon_area(b).abs().total_cmp(&polygon_area(a).abs()));

    let mut claimed: HashSet<(u64, u64)> = HashSet::new();
    let mut accepted: Vec<Vec<Complex>> = Vec::new();
    for mut center in centers {
        if center.len() < 3 {
            continue;
        }
        let overlapping = center
            .iter()
            .filter(|&&point| claimed.contains(&point_key(point)))
            .count();
        #[allow(clippy::cast_precision_loss)]
        let overlap_ratio = overlapping as f64 / center.len() as f64;
        if overlap_ratio >= tuning.overlap_ratio_cutoff {
            continue;
        }
        let widdershins = !is_in_filled_region(&accepted, center[0]);
        if is_widdershins(&center) != widdershins {
            center.reverse();
        }
        claimed.extend(center.iter().copied().map(point_key));
        accepted.push(center);
    }

    let mut loops: Vec<Vec<Complex>> = accepted
        .iter()
        .map(|points| simplified_loop(points, radius))
        .collect();
    let shortest_addition = tuning.corner_splice_ratio * radius;
    for &corner in &corners {
        if !claimed.contains(&point_key(corner)) {
            add_with_least_length(&mut loops, corner, shortest_addition);
        }
    }
    loops
        .iter()
        .map(|points| simplified_loop(points, radius))
        .collect()
}
