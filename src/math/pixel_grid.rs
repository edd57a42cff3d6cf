use std::collections::HashMap;

use super::Complex;

/// Spatial hash grid mapping integer cell coordinates to the elements
/// stored in that cell.
///
/// Cells are squares of side `width`, centred on multiples of `width`. A
/// lookup scans the 3x3 block of cells around a point, so every element
/// closer than `width` to the point is returned.
#[derive(Debug, Clone)]
pub struct PixelGrid<T> {
    width: f64,
    cells: HashMap<(i64, i64), Vec<T>>,
}

impl<T> PixelGrid<T> {
    /// Creates an empty grid with the given cell width.
    #[must_use]
    pub fn new(width: f64) -> Self {
        Self {
            width,
            cells: HashMap::new(),
        }
    }

    /// Cell width of the grid.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Cell coordinates containing `point`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn cell_of(&self, point: Complex) -> (i64, i64) {
        let scaled = point / self.width;
        (scaled.re.round() as i64, scaled.im.round() as i64)
    }

    /// Stores `element` in the cell containing `point`.
    pub fn insert(&mut self, point: Complex, element: T) {
        let key = self.cell_of(point);
        self.cells.entry(key).or_default().push(element);
    }

    /// Iterates over every element in the 3x3 block of cells around `point`.
    pub fn around(&self, point: Complex) -> impl Iterator<Item = &T> + '_ {
        let (x, y) = self.cell_of(point);
        (x - 1..=x + 1)
            .flat_map(move |cx| (y - 1..=y + 1).map(move |cy| (cx, cy)))
            .filter_map(|key| self.cells.get(&key))
            .flatten()
    }

    /// Returns `true` if no element has been inserted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}
