use slotmap::SlotMap;
use tracing::debug;

use crate::math::simplify::away_points;
use crate::math::{normalized, widdershins_dot, Complex, PixelGrid};

slotmap::new_key_type! {
    /// Identifier of a circle in a [`CircleGraph`].
    pub struct CircleNodeId;
}

slotmap::new_key_type! {
    /// Identifier of a boundary crossing in a [`CircleGraph`].
    pub struct CircleIntersectionId;
}

/// A circle of the graph's radius centred on a sample point.
#[derive(Debug, Clone)]
pub struct CircleNode {
    pub circle: Complex,
    /// Crossings for which this node is the `behind` circle.
    pub intersections: Vec<CircleIntersectionId>,
}

/// A point where the boundaries of two circles cross.
///
/// Of the two crossings of a circle pair, this is the one clockwise of the
/// `behind` → `ahead` direction, seen from `behind`.
#[derive(Debug, Clone)]
pub struct CircleIntersection {
    pub ahead: CircleNodeId,
    pub behind: CircleNodeId,
    pub stepped: bool,
}

/// Circles of one radius and the silhouette crossings between them.
///
/// Lives for a single offset or inference call. Nodes and crossings refer to
/// each other through typed IDs, so the node ↔ crossing cycle needs no
/// shared ownership.
#[derive(Debug)]
pub struct CircleGraph {
    radius: f64,
    nodes: SlotMap<CircleNodeId, CircleNode>,
    node_order: Vec<CircleNodeId>,
    intersections: SlotMap<CircleIntersectionId, CircleIntersection>,
    intersection_order: Vec<CircleIntersectionId>,
}

impl CircleGraph {
    /// Creates an empty graph whose circles all have `radius`.
    #[must_use]
    pub fn new(radius: f64) -> Self {
        Self {
            radius: radius.abs(),
            nodes: SlotMap::with_key(),
            node_order: Vec::new(),
            intersections: SlotMap::with_key(),
            intersection_order: Vec::new(),
        }
    }

    /// Adds a circle at each point, skipping points within a thousandth of
    /// the radius of an earlier point in the same batch.
    pub fn add_points(&mut self, points: &[Complex]) {
        for circle in away_points(points, 0.001 * self.radius) {
            let id = self.nodes.insert(CircleNode {
                circle,
                intersections: Vec::new(),
            });
            self.node_order.push(id);
        }
    }

    /// Number of circles.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.node_order.len()
    }

    /// Number of silhouette crossings found so far.
    #[must_use]
    pub fn intersection_count(&self) -> usize {
        self.intersection_order.len()
    }

    /// Crossing position relative to its `behind` circle centre.
    fn relative_to_behind(&self, intersection: &CircleIntersection) -> Complex {
        let ahead = self.nodes[intersection.ahead].circle;
        let half_way = 0.5 * (ahead - self.nodes[intersection.behind].circle);
        let half_way_length = half_way.norm();
        if half_way_length <= 0.0 {
            return half_way;
        }
        let height = (self.radius * self.radius - half_way_length * half_way_length)
            .max(0.0)
            .sqrt();
        let clockwise_quarter = Complex::new(half_way.im, -half_way.re);
        half_way + clockwise_quarter * (height / half_way_length)
    }

    fn absolute(&self, intersection: &CircleIntersection) -> Complex {
        self.relative_to_behind(intersection) + self.nodes[intersection.behind].circle
    }

    /// Returns `true` if the crossing lies strictly inside a third circle.
    fn is_within_circles(
        &self,
        intersection: &CircleIntersection,
        grid: &PixelGrid<CircleNodeId>,
    ) -> bool {
        let point = self.absolute(intersection);
        grid.around(point).any(|&id| {
            id != intersection.ahead
                && id != intersection.behind
                && (self.nodes[id].circle - point).norm() < self.radius
        })
    }

    /// Finds every crossing between overlapping circles that is not covered
    /// by another circle.
    ///
    /// Each node is paired only with the nodes before it, so every pair is
    /// tested once; both of the pair's crossings are tried.
    pub fn connect(&mut self) {
        let node_width = 1.01 * self.radius;
        let mut node_grid = PixelGrid::new(node_width);
        for &id in &self.node_order {
            node_grid.insert(self.nodes[id].circle, id);
        }
        let mut earlier_grid = PixelGrid::new(2.0 * node_width);
        let diameter = 2.0 * self.radius;
        for index in 0..self.node_order.len() {
            let behind = self.node_order[index];
            if index > 0 {
                let previous = self.node_order[index - 1];
                earlier_grid.insert(self.nodes[previous].circle, previous);
            }
            let behind_circle = self.nodes[behind].circle;
            // Circles exactly a diameter apart only touch and are not paired.
            let overlapping: Vec<CircleNodeId> = earlier_grid
                .around(behind_circle)
                .copied()
                .filter(|&ahead| (behind_circle - self.nodes[ahead].circle).norm() < diameter)
                .collect();
            for ahead in overlapping {
                self.try_add(ahead, behind, &node_grid);
                self.try_add(behind, ahead, &node_grid);
            }
        }
    }

    fn try_add(
        &mut self,
        ahead: CircleNodeId,
        behind: CircleNodeId,
        grid: &PixelGrid<CircleNodeId>,
    ) {
        let intersection = CircleIntersection {
            ahead,
            behind,
            stepped: false,
        };
        if self.is_within_circles(&intersection, grid) {
            return;
        }
        let id = self.intersections.insert(intersection);
        self.intersection_order.push(id);
        self.nodes[behind].intersections.push(id);
    }

    /// The next crossing around the `ahead` circle: the unvisited one with
    /// the sharpest counter-clockwise turn from the current crossing.
    fn next_around(&self, id: CircleIntersectionId) -> Option<CircleIntersectionId> {
        let current = &self.intersections[id];
        let ahead = &self.nodes[current.ahead];
        let heading = normalized(self.absolute(current) - ahead.circle);
        let mut best: Option<(CircleIntersectionId, f64)> = None;
        for &candidate_id in &ahead.intersections {
            let candidate = &self.intersections[candidate_id];
            if candidate.stepped {
                continue;
            }
            let turn = widdershins_dot(heading, normalized(self.relative_to_behind(candidate)));
            if best.map_or(true, |(_, smallest)| turn < smallest) {
                best = Some((candidate_id, turn));
            }
        }
        best.map(|(candidate_id, _)| candidate_id)
    }

    /// Walks the crossings into closed paths.
    ///
    /// Every walk is bounded by the crossing count. A walk that runs out of
    /// unvisited crossings before returning to its start is kept as it is.
    fn intersection_loops(&mut self) -> Vec<Vec<CircleIntersectionId>> {
        let mut loops = Vec::new();
        let order = self.intersection_order.clone();
        for &first in &order {
            if self.intersections[first].stepped {
                continue;
            }
            let mut path = vec![first];
            let mut current = first;
            let mut is_closed = false;
            for _ in 0..=order.len() {
                let Some(next) = self.next_around(current) else {
                    break;
                };
                if next == first {
                    is_closed = true;
                    break;
                }
                self.intersections[next].stepped = true;
                path.push(next);
                current = next;
            }
            self.intersections[first].stepped = true;
            if !is_closed {
                debug!(crossings = path.len(), "circle intersection walk did not close");
            }
            loops.push(path);
        }
        loops
    }

    /// Connects the circles and returns, for every closed walk, the centres
    /// of the circles it steps onto.
    ///
    /// Fewer than two circles give no loops.
    #[must_use]
    pub fn into_center_loops(mut self) -> Vec<Vec<Complex>> {
        if self.node_order.len() < 2 {
            return Vec::new();
        }
        self.connect();
        self.intersection_loops()
            .into_iter()
            .map(|path| {
                path.into_iter()
                    .map(|id| self.nodes[self.intersections[id].ahead].circle)
                    .collect()
            })
            .collect()
    }
}
