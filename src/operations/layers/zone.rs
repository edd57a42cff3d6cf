use std::collections::HashSet;

use crate::math::Point3;

/// Heights occupied by mesh vertices, quantized to a fine interval.
///
/// Slicing exactly through a vertex makes the crossing set ambiguous, so
/// every slice height is nudged to the nearest free zone first.
#[derive(Debug, Clone)]
pub struct ZoneTable {
    interval: f64,
    occupied: HashSet<i64>,
}

impl ZoneTable {
    /// Builds the table for `vertices` at the given layer thickness.
    ///
    /// The interval shrinks with the vertex count so that dense meshes still
    /// leave free zones between vertices.
    #[must_use]
    pub fn new(vertices: &[Point3], layer_thickness: f64) -> Self {
        #[allow(clippy::cast_precision_loss)]
        let interval = layer_thickness / (vertices.len().max(1) as f64).sqrt() / 1000.0;
        let mut occupied = HashSet::with_capacity(vertices.len() * 2);
        for vertex in vertices {
            let zone = vertex.z / interval;
            occupied.insert(zone_index(zone.floor()));
            occupied.insert(zone_index(zone.ceil()));
        }
        Self { interval, occupied }
    }

    /// The quantization step.
    #[must_use]
    pub fn interval(&self) -> f64 {
        self.interval
    }

    /// Returns `z` if its zone is free, otherwise the nearest free zone,
    /// searching below before above at each distance.
    #[must_use]
    pub fn empty_z(&self, z: f64) -> f64 {
        let index = zone_index((z / self.interval).round());
        if !self.occupied.contains(&index) {
            return z;
        }
        let reach = i64::try_from(self.occupied.len()).unwrap_or(i64::MAX);
        for step in 1..=reach.saturating_add(1) {
            for candidate in [index - step, index + step] {
                if !self.occupied.contains(&candidate) {
                    #[allow(clippy::cast_precision_loss)]
                    return candidate as f64 * self.interval;
                }
            }
        }
        z
    }
}

#[allow(clippy::cast_possible_truncation)]
fn zone_index(zone: f64) -> i64 {
    zone as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cube_vertices() -> Vec<Point3> {
        let mut vertices = Vec::new();
        for z in [0.0, 10.0] {
            for (x, y) in [(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)] {
                vertices.push(Point3::new(x, y, z));
            }
        }
        vertices
    }

    #[test]
    fn interval_scales_with_vertex_count() {
        let table = ZoneTable::new(&cube_vertices(), 1.0);
        let expected = 1.0 / 8.0_f64.sqrt() / 1000.0;
        assert!((table.interval() - expected).abs() < 1e-15);
    }

    #[test]
    fn free_height_is_kept() {
        let table = ZoneTable::new(&cube_vertices(), 1.0);
        assert_eq!(table.empty_z(5.0), 5.0);
        assert_eq!(table.empty_z(0.5), 0.5);
    }

    #[test]
    fn vertex_height_moves_below_first() {
        let table = ZoneTable::new(&cube_vertices(), 1.0);
        let interval = table.interval();

        let top = table.empty_z(10.0);
        assert!(top < 10.0);
        assert!(top > 10.0 - 2.0 * interval);

        let bottom = table.empty_z(0.0);
        assert!((bottom + interval).abs() < 1e-15);
    }
}
