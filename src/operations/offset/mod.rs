//! Loop offsetting by circle intersection.
//!
//! A loop is covered by circles of the offset radius centred along its
//! edges. The crossings of those circles that no third circle covers trace
//! the silhouette of the covered band; walking them gives loops of circle
//! centres, and a mitred offset of each centre loop by the radius gives the
//! inset and outset contours. Concave corners come out clean and insets
//! that would invert simply vanish.

mod circle_graph;
mod densify;
mod inset;
mod self_intersect;

pub use circle_graph::{
    CircleGraph, CircleIntersection, CircleIntersectionId, CircleNode, CircleNodeId,
};
pub use densify::{add_points_from_segment, points_from_loop, LOOP_THRESHOLD_RATIO};
pub use inset::{
    inset_from_clockwise_loop, inset_point_from_clockwise_triple, intersection_at_inset,
    simplified_inset_from_clockwise_loop,
};
pub use self_intersect::{remove_intersection, without_intersections};

use crate::config::InferenceTuning;
use crate::geometry::Loop;
use crate::math::polygon_2d::{
    is_in_filled_region, is_point_inside_loop, is_widdershins, left_point, loops_in_direction,
    maximum_span,
};
use crate::math::Complex;

/// Default multiple of the radius an offset loop must span to be kept.
pub const DEFAULT_LARGE_LOOP_RATIO: f64 = 2.5;

/// Circle-centre loops inferred from scattered points.
#[must_use]
pub fn centers_from_points(points: &[Complex], radius: f64) -> Vec<Vec<Complex>> {
    let mut graph = CircleGraph::new(radius);
    graph.add_points(points);
    graph.into_center_loops()
}

/// Circle-centre loops around a densified loop.
#[must_use]
pub fn centers_from_loop(points: &[Complex], radius: f64) -> Vec<Vec<Complex>> {
    centers_from_points(&points_from_loop(points, radius, LOOP_THRESHOLD_RATIO), radius)
}

/// Circle-centre loops around a loop, keeping only those with the given
/// winding.
#[must_use]
pub fn centers_from_loop_direction(
    widdershins: bool,
    points: &[Complex],
    radius: f64,
) -> Vec<Vec<Complex>> {
    loops_in_direction(centers_from_loop(points, radius), widdershins)
}

/// Returns `true` if `inset` winds the same way as `points` and spans more
/// than `required_size`.
#[must_use]
pub fn is_large_same_direction(inset: &[Complex], points: &[Complex], required_size: f64) -> bool {
    is_widdershins(inset) == is_widdershins(points) && maximum_span(inset) > required_size.abs()
}

/// Contours at distance `radius` on both sides of the loops.
///
/// Each result is clockwise or widdershins as its centre loop was; callers
/// pick the side they want. Results spanning no more than
/// `large_loop_ratio * radius` are dropped, and a non-positive radius gives
/// nothing.
#[must_use]
pub fn arounds_from_loops<L: AsRef<[Complex]>>(
    loops: &[L],
    radius: f64,
    large_loop_ratio: f64,
) -> Vec<Vec<Complex>> {
    if radius <= 0.0 || !radius.is_finite() {
        return Vec::new();
    }
    let node_radius = 1.01 * radius;
    let mut graph = CircleGraph::new(node_radius);
    for points in loops {
        graph.add_points(&points_from_loop(
            points.as_ref(),
            node_radius,
            LOOP_THRESHOLD_RATIO,
        ));
    }
    let required_size = large_loop_ratio * radius;
    graph
        .into_center_loops()
        .into_iter()
        .filter_map(|center| {
            let inset = simplified_inset_from_clockwise_loop(&center, radius);
            (inset.len() > 2 && is_large_same_direction(&inset, &center, required_size))
                .then_some(inset)
        })
        .collect()
}

/// Signed loop offset.
///
/// A positive inset moves the contour into the material: outlines shrink
/// and holes grow. A negative inset moves it out. Results keep the winding
/// convention of the input.
#[derive(Debug, Clone, Copy)]
pub struct LoopOffset {
    inset: f64,
    large_loop_ratio: f64,
}

impl LoopOffset {
    /// Creates an offset by `inset`.
    #[must_use]
    pub fn new(inset: f64) -> Self {
        Self {
            inset,
            large_loop_ratio: DEFAULT_LARGE_LOOP_RATIO,
        }
    }

    /// Creates an offset by `inset` using the small-loop filter of `tuning`.
    #[must_use]
    pub fn with_tuning(inset: f64, tuning: &InferenceTuning) -> Self {
        Self::new(inset).with_large_loop_ratio(tuning.large_loop_ratio)
    }

    /// Set the multiple of the radius a result must span to be kept.
    #[must_use]
    pub const fn with_large_loop_ratio(mut self, ratio: f64) -> Self {
        self.large_loop_ratio = ratio;
        self
    }

    /// Offsets a single loop.
    ///
    /// A zero inset returns the loop unchanged. Insets that consume the
    /// whole loop return nothing.
    #[must_use]
    pub fn execute(&self, points: &[Complex]) -> Vec<Loop> {
        if self.inset == 0.0 {
            return vec![Loop::new(points.to_vec())];
        }
        let is_inset = self.inset > 0.0;
        let widdershins = is_widdershins(points);
        arounds_from_loops(&[points], self.inset.abs(), self.large_loop_ratio)
            .into_iter()
            .filter(|around| {
                left_point(around).is_some_and(|left| {
                    is_point_inside_loop(points, left) == (is_inset == widdershins)
                })
            })
            .map(|around| {
                let mut around = Loop::new(around);
                around.orient(widdershins);
                around
            })
            .collect()
    }

    /// Offsets a set of loops together, as outlines and holes of one region.
    ///
    /// Results are kept on the material side for an inset and outside it for
    /// an outset. Each result is then oriented by nesting: widdershins unless
    /// it lies inside an odd number of the other results.
    #[must_use]
    pub fn execute_separate<L: AsRef<[Complex]>>(&self, loops: &[L]) -> Vec<Loop> {
        if self.inset == 0.0 {
            return loops
                .iter()
                .map(|points| Loop::new(points.as_ref().to_vec()))
                .collect();
        }
        let is_inset = self.inset > 0.0;
        let selected: Vec<Vec<Complex>> =
            arounds_from_loops(loops, self.inset.abs(), self.large_loop_ratio)
                .into_iter()
                .filter(|around| {
                    left_point(around)
                        .is_some_and(|left| is_in_filled_region(loops, left) == is_inset)
                })
                .collect();
        selected
            .iter()
            .enumerate()
            .map(|(index, around)| {
                let others: Vec<&[Complex]> = selected
                    .iter()
                    .enumerate()
                    .filter(|&(other, _)| other != index)
                    .map(|(_, points)| points.as_slice())
                    .collect();
                let is_outline = left_point(around)
                    .is_some_and(|left| !is_in_filled_region(&others, left));
                let mut around = Loop::new(around.clone());
                around.orient(is_outline);
                around
            })
            .collect()
    }
}

/// Offsets a single loop by `inset`; see [`LoopOffset::execute`].
#[must_use]
pub fn inset_loops_from_loop(points: &[Complex], inset: f64) -> Vec<Loop> {
    LoopOffset::new(inset).execute(points)
}

/// Offsets outlines and holes together; see [`LoopOffset::execute_separate`].
#[must_use]
pub fn inset_separate_loops<L: AsRef<[Complex]>>(loops: &[L], inset: f64) -> Vec<Loop> {
    LoopOffset::new(inset).execute_separate(loops)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::intersect_2d::is_loop_self_intersecting;
    use crate::math::polygon_2d::polygon_area;
    use approx::assert_relative_eq;

    fn square(size: f64) -> Vec<Complex> {
        vec![
            Complex::new(0.0, 0.0),
            Complex::new(size, 0.0),
            Complex::new(size, size),
            Complex::new(0.0, size),
        ]
    }

    fn star() -> Vec<Complex> {
        (0..10)
            .map(|i| {
                let radius = if i % 2 == 0 { 10.0 } else { 4.0 };
                let angle = std::f64::consts::FRAC_PI_2 + f64::from(i) * std::f64::consts::PI / 5.0;
                Complex::from_polar(radius, angle)
            })
            .collect()
    }

    #[test]
    fn square_inset_shrinks() {
        let insets = inset_loops_from_loop(&square(10.0), 0.5);
        assert_eq!(insets.len(), 1);
        assert_eq!(insets[0].len(), 4);
        assert!(insets[0].is_widdershins());
        assert_relative_eq!(insets[0].area(), 81.0, epsilon = 1e-6);

        let insets = inset_loops_from_loop(&square(10.0), 1.0);
        assert_eq!(insets.len(), 1);
        assert_relative_eq!(insets[0].area(), 64.0, epsilon = 1e-6);
    }

    #[test]
    fn outset_then_inset_round_trips() {
        let outsets = inset_loops_from_loop(&square(10.0), -1.0);
        assert_eq!(outsets.len(), 1);
        assert!(outsets[0].is_widdershins());
        assert_relative_eq!(outsets[0].area(), 144.0, epsilon = 1e-6);

        let back = inset_loops_from_loop(outsets[0].points(), 1.0);
        assert_eq!(back.len(), 1);
        assert_relative_eq!(back[0].area(), 100.0, epsilon = 1e-6);
    }

    #[test]
    fn hole_inset_grows_and_stays_clockwise() {
        let hole: Vec<Complex> = square(10.0).into_iter().rev().collect();
        let insets = inset_loops_from_loop(&hole, 1.0);
        assert_eq!(insets.len(), 1);
        assert!(!insets[0].is_widdershins());
        assert_relative_eq!(insets[0].area(), -144.0, epsilon = 1e-6);
    }

    #[test]
    fn zero_inset_is_identity() {
        let hole: Vec<Complex> = square(3.0).into_iter().rev().collect();
        let same = inset_loops_from_loop(&hole, 0.0);
        assert_eq!(same.len(), 1);
        assert_eq!(same[0].points(), hole.as_slice());
        let back = inset_loops_from_loop(same[0].points(), -0.0);
        assert!(!back[0].is_widdershins());
    }

    #[test]
    fn collapsing_inset_is_empty() {
        assert!(inset_loops_from_loop(&square(2.0), 1.5).is_empty());
        assert!(arounds_from_loops(&[square(2.0)], -1.0, DEFAULT_LARGE_LOOP_RATIO).is_empty());
    }

    #[test]
    fn star_inset_is_simple() {
        let star = star();
        assert_relative_eq!(polygon_area(&star), 117.557, epsilon = 1e-3);
        for (radius, area) in [(0.3, 97.056), (0.5, 84.479), (1.0, 56.853)] {
            let insets = inset_loops_from_loop(&star, radius);
            assert_eq!(insets.len(), 1);
            let inset = &insets[0];
            assert!(inset.is_widdershins());
            assert!(!is_loop_self_intersecting(inset.points()));
            assert!(inset.area() < polygon_area(&star));
            assert_relative_eq!(inset.area(), area, epsilon = 1e-3);
        }
    }

    #[test]
    fn separate_insets_keep_outline_and_hole() {
        let outline = square(20.0);
        let hole: Vec<Complex> = vec![
            Complex::new(5.0, 5.0),
            Complex::new(5.0, 15.0),
            Complex::new(15.0, 15.0),
            Complex::new(15.0, 5.0),
        ];
        let insets = inset_separate_loops(&[outline, hole], 1.0);
        assert_eq!(insets.len(), 2);
        let mut areas: Vec<f64> = insets.iter().map(Loop::area).collect();
        areas.sort_by(f64::total_cmp);
        assert_relative_eq!(areas[0], -144.0, epsilon = 1e-6);
        assert_relative_eq!(areas[1], 324.0, epsilon = 1e-6);
    }

    #[test]
    fn centers_follow_requested_direction() {
        let centers = centers_from_loop_direction(true, &square(10.0), 1.0);
        assert!(!centers.is_empty());
        assert!(centers.iter().all(|center| is_widdershins(center)));
        let clockwise = centers_from_loop_direction(false, &square(10.0), 1.0);
        assert!(clockwise.iter().all(|center| !is_widdershins(center)));
    }

    #[test]
    fn large_same_direction_filter() {
        let big = square(10.0);
        let small = square(1.0);
        assert!(is_large_same_direction(&big, &small, 5.0));
        assert!(!is_large_same_direction(&small, &big, 5.0));
        let reversed: Vec<Complex> = big.iter().rev().copied().collect();
        assert!(!is_large_same_direction(&reversed, &small, 5.0));
    }

    #[test]
    fn tuning_sets_large_loop_ratio() {
        let tuning = InferenceTuning {
            large_loop_ratio: 100.0,
            ..InferenceTuning::default()
        };
        assert!(LoopOffset::with_tuning(0.5, &tuning)
            .execute(&square(10.0))
            .is_empty());
    }
}
