use crate::math::intersect_2d::{x_intersections_from_indexes, XIntersectionIndex};
use crate::math::Complex;

/// A straight run between two points, as produced by a filled-span sweep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub begin: Complex,
    pub end: Complex,
}

/// One end of a [`Segment`].
///
/// Borrows its segment so the opposite end is always reachable.
#[derive(Debug, Clone, Copy)]
pub struct Endpoint<'a> {
    segment: &'a Segment,
    is_begin: bool,
}

impl Segment {
    /// Creates a segment.
    #[must_use]
    pub fn new(begin: Complex, end: Complex) -> Self {
        Self { begin, end }
    }

    /// Both ends of the segment, begin first.
    #[must_use]
    pub fn endpoints(&self) -> [Endpoint<'_>; 2] {
        [
            Endpoint {
                segment: self,
                is_begin: true,
            },
            Endpoint {
                segment: self,
                is_begin: false,
            },
        ]
    }

    /// Vector from begin to end.
    #[must_use]
    pub fn direction(&self) -> Complex {
        self.end - self.begin
    }

    /// Length of the segment.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.direction().norm()
    }
}

impl<'a> Endpoint<'a> {
    /// Location of this end.
    #[must_use]
    pub fn point(&self) -> Complex {
        if self.is_begin {
            self.segment.begin
        } else {
            self.segment.end
        }
    }

    /// The other end of the same segment.
    #[must_use]
    pub fn opposite(&self) -> Endpoint<'a> {
        Endpoint {
            segment: self.segment,
            is_begin: !self.is_begin,
        }
    }

    /// The segment this end belongs to.
    #[must_use]
    pub fn segment(&self) -> &'a Segment {
        self.segment
    }
}

/// Pairs consecutive X values into horizontal segments at height `y`.
///
/// A trailing unpaired value is ignored. Zero-length pairs are skipped.
#[must_use]
pub fn segments_from_x_intersections(x_intersections: &[f64], y: f64) -> Vec<Segment> {
    x_intersections
        .chunks_exact(2)
        .filter(|pair| pair[0] != pair[1])
        .map(|pair| Segment::new(Complex::new(pair[0], y), Complex::new(pair[1], y)))
        .collect()
}

/// Horizontal segments at `y` that lie inside the filled span and outside
/// every solid loop.
#[must_use]
pub fn segments_from_x_intersection_indexes(
    crossings: &mut [XIntersectionIndex],
    y: f64,
) -> Vec<Segment> {
    segments_from_x_intersections(&x_intersections_from_indexes(crossings), y)
}
