use std::collections::HashMap;

use crate::geo::Bounds;

/// A ring inside a dataset: `(country index, ring index)`
pub type RingRef = (usize, usize);

/// Spatial index over ring bounding boxes using conservative approximation.
/// Each ring is inserted into every cell its bbox overlaps, so a lookup
/// never misses a ring whose bbox contains the point; false positives are
/// left to the exact point-in-ring test.
pub struct FeatureGrid {
    cells: HashMap<(i32, i32), Vec<RingRef>>,
    cell_size: f64,
}

impl FeatureGrid {
    pub fn new(cell_size: f64) -> Self {
        Self {
            cells: HashMap::new(),
            cell_size,
        }
    }

    #[inline(always)]
    fn to_cell(&self, lon: f64, lat: f64) -> (i32, i32) {
        let x = (lon / self.cell_size).floor() as i32;
        let y = (lat / self.cell_size).floor() as i32;
        (x, y)
    }

    /// Build from ring bounding boxes
    pub fn build(rings: impl Iterator<Item = (RingRef, Bounds)>, cell_size: f64) -> Self {
        let mut grid = Self::new(cell_size);
        for (entry, bounds) in rings {
            let min_cell = grid.to_cell(bounds.min_lon, bounds.min_lat);
            let max_cell = grid.to_cell(bounds.max_lon, bounds.max_lat);
            for y in min_cell.1..=max_cell.1 {
                for x in min_cell.0..=max_cell.0 {
                    grid.cells.entry((x, y)).or_default().push(entry);
                }
            }
        }
        grid
    }

    /// Rings that may contain the point, in dataset order
    pub fn candidates(&self, lon: f64, lat: f64) -> &[RingRef] {
        self.cells
            .get(&self.to_cell(lon, lat))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Number of non-empty cells
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }
}
