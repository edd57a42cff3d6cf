use crate::geometry::segment::segments_from_x_intersection_indexes;
use crate::math::intersect_2d::{add_x_intersection_indexes, XIntersectionIndex};
use crate::math::polygon_2d::{is_point_inside_loop, is_widdershins, left_point, rotated};
use crate::math::{normalized, Complex, UnitComplex};
use crate::operations::offset::{
    centers_from_loop, centers_from_loop_direction, is_large_same_direction,
    simplified_inset_from_clockwise_loop,
};

/// Half-width of an extrusion, as a multiple of the layer thickness.
const EXTRUSION_HALF_WIDTH_RATIO: f64 = 1.5;

/// How far the layer below is grown before measuring the overhang, as a
/// multiple of the layer thickness.
const SUPPORT_OUTSET_RATIO: f64 = 1.875;

/// Minimum length of the summed overhang direction, as a multiple of the
/// layer thickness, for a layer to count as bridging.
const BRIDGE_THRESHOLD_RATIO: f64 = 0.75;

/// Node radius of the circle construction, relative to the offset radius.
const NODE_RADIUS_RATIO: f64 = 1.1;

/// The region an extrusion along `points` actually fills: the loop inset by
/// half an extrusion width.
///
/// Each result winds opposite to its centre loop; results smaller than the
/// half-width or lying on the wrong side of `points` are dropped.
#[must_use]
pub fn bridge_loops(layer_thickness: f64, points: &[Complex]) -> Vec<Vec<Complex>> {
    let half_width = EXTRUSION_HALF_WIDTH_RATIO * layer_thickness;
    let widdershins = is_widdershins(points);
    centers_from_loop(points, NODE_RADIUS_RATIO * half_width)
        .into_iter()
        .filter_map(|center| {
            let mut extrudate = simplified_inset_from_clockwise_loop(&center, half_width);
            if !is_large_same_direction(&extrudate, &center, half_width) {
                return None;
            }
            let left = left_point(&extrudate)?;
            (is_point_inside_loop(points, left) == widdershins).then(|| {
                extrudate.reverse();
                extrudate
            })
        })
        .collect()
}

/// Overhang of the segment from `begin` to `end` past the `supports`, as a
/// direction with doubled angle.
///
/// The segment is rotated onto the X axis and split where it enters and
/// leaves the supports; each unsupported piece contributes its length along
/// the squared direction, so opposite directions add up instead of
/// cancelling.
#[must_use]
pub fn overhang_direction<L: AsRef<[Complex]>>(
    supports: &[L],
    begin: Complex,
    end: Complex,
) -> Complex {
    let direction = normalized(end - begin);
    let mirror = direction.conj();
    let begin_rotated = mirror * begin;
    let end_rotated = mirror * end;
    let y = begin_rotated.im;
    let mut crossings = vec![
        XIntersectionIndex::fill(begin_rotated.re),
        XIntersectionIndex::fill(end_rotated.re),
    ];
    for (index, support) in supports.iter().enumerate() {
        add_x_intersection_indexes(&rotated(support.as_ref(), mirror), index, &mut crossings, y);
    }
    segments_from_x_intersection_indexes(&mut crossings, y)
        .into_iter()
        .fold(Complex::new(0.0, 0.0), |sum, segment| {
            let mut span = (segment.begin - segment.end) * direction;
            let length = span.norm();
            if length == 0.0 {
                return sum;
            }
            if span.re < 0.0 {
                span = -span;
            }
            sum + span * span / length
        })
}

/// Direction to lay bridging infill across `layer` over the extrudates
/// `below`.
///
/// Returns `None` when nothing lies below or the overhang is too small.
/// Otherwise the summed overhang direction is halved back to an angle.
#[must_use]
pub fn bridge_direction<B, L>(below: &[B], layer: &[L], layer_thickness: f64) -> Option<UnitComplex>
where
    B: AsRef<[Complex]>,
    L: AsRef<[Complex]>,
{
    if below.is_empty() {
        return None;
    }
    let outset = SUPPORT_OUTSET_RATIO * layer_thickness;
    let supports: Vec<Vec<Complex>> = below
        .iter()
        .flat_map(|points| {
            centers_from_loop_direction(true, points.as_ref(), NODE_RADIUS_RATIO * outset)
        })
        .filter_map(|center| {
            let grown = simplified_inset_from_clockwise_loop(&center, outset);
            is_large_same_direction(&grown, &center, outset).then_some(grown)
        })
        .collect();
    let mut sum = Complex::new(0.0, 0.0);
    for points in layer {
        let points = points.as_ref();
        let n = points.len();
        for i in 0..n {
            sum += overhang_direction(&supports, points[(i + n - 1) % n], points[i]);
        }
    }
    if sum.norm() < BRIDGE_THRESHOLD_RATIO * layer_thickness {
        return None;
    }
    Some(UnitComplex::new(sum.arg() * 0.5))
}
