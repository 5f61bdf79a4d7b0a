//! Domain-to-cell mapping with precomputed fixed-point reciprocals so the
//! per-event path never divides.

use crate::config::Domain;

const RECIP_SHIFT: u32 = 16;

/// Immutable grid shape derived from a validated configuration.
///
/// The reciprocals are `(cols << 16) / width` and `(rows << 16) / height`,
/// computed once; `cell_of` is then a widened multiply-shift per axis.
#[derive(Clone, Copy, Debug)]
pub struct GridGeometry {
    rows: u8,
    cols: u8,
    domain: Domain,
    recip_x: u32,
    recip_y: u32,
}

impl GridGeometry {
    /// Callers must have validated the domain and grid shape first; a
    /// degenerate domain would make the reciprocal division trap.
    pub(crate) fn new(rows: u8, cols: u8, domain: Domain) -> Self {
        let recip_x = ((cols as u32) << RECIP_SHIFT) / domain.width() as u32;
        let recip_y = ((rows as u32) << RECIP_SHIFT) / domain.height() as u32;
        Self {
            rows,
            cols,
            domain,
            recip_x,
            recip_y,
        }
    }

    pub fn rows(&self) -> u8 {
        self.rows
    }

    pub fn cols(&self) -> u8 {
        self.cols
    }

    pub fn cell_count(&self) -> usize {
        self.rows as usize * self.cols as usize
    }

    /// Map a coordinate pair to its row-major cell index. Out-of-domain
    /// coordinates clamp to the nearest in-domain point.
    pub fn cell_of(&self, x: u16, y: u16) -> u8 {
        let dx = (x.clamp(self.domain.x_min, self.domain.x_max) - self.domain.x_min) as u64;
        let dy = (y.clamp(self.domain.y_min, self.domain.y_max) - self.domain.y_min) as u64;

        // Offset is at most 16 bits and the reciprocal at most 24, so the
        // product stays well inside u64.
        let col = ((dx * self.recip_x as u64) >> RECIP_SHIFT) as u32;
        let row = ((dy * self.recip_y as u64) >> RECIP_SHIFT) as u32;

        // The top domain edge quantizes to cols/rows exactly; fold it back
        // into the last cell.
        let col = col.min(self.cols as u32 - 1) as u16;
        let row = row.min(self.rows as u32 - 1) as u16;

        // Validated grids hold at most 256 cells, so the widened index
        // fits back into u8.
        (row * self.cols as u16 + col) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry_3x3() -> GridGeometry {
        GridGeometry::new(
            3,
            3,
            Domain {
                x_min: 0,
                x_max: 1024,
                y_min: 0,
                y_max: 1024,
            },
        )
    }

    #[test]
    fn cells_stay_in_range_across_the_domain() {
        let geometry = geometry_3x3();
        for y in (0..=1024).step_by(17) {
            for x in (0..=1024).step_by(17) {
                assert!(geometry.cell_of(x, y) < 9);
            }
        }
    }

    #[test]
    fn corners_map_to_corner_cells() {
        let geometry = geometry_3x3();
        assert_eq!(geometry.cell_of(0, 0), 0);
        assert_eq!(geometry.cell_of(1024, 0), 2);
        assert_eq!(geometry.cell_of(0, 1024), 6);
        assert_eq!(geometry.cell_of(1024, 1024), 8);
    }

    #[test]
    fn out_of_domain_equals_nearest_clamped_point() {
        let geometry = GridGeometry::new(
            2,
            2,
            Domain {
                x_min: 100,
                x_max: 900,
                y_min: 100,
                y_max: 900,
            },
        );
        assert_eq!(geometry.cell_of(5, 5), geometry.cell_of(100, 100));
        assert_eq!(geometry.cell_of(65_000, 50), geometry.cell_of(900, 100));
        assert_eq!(geometry.cell_of(500, 65_000), geometry.cell_of(500, 900));
    }

    #[test]
    fn column_is_monotonic_in_x() {
        let geometry = geometry_3x3();
        let mut previous = 0;
        for x in 0..=1024 {
            let col = geometry.cell_of(x, 0) % 3;
            assert!(col >= previous, "col regressed at x={x}");
            previous = col;
        }
    }

    #[test]
    fn row_is_monotonic_in_y() {
        let geometry = geometry_3x3();
        let mut previous = 0;
        for y in 0..=1024 {
            let row = geometry.cell_of(0, y) / 3;
            assert!(row >= previous, "row regressed at y={y}");
            previous = row;
        }
    }

    #[test]
    fn non_dividing_width_still_covers_every_cell() {
        // 0..=999 with 3 columns: reciprocal truncation must not lose the
        // last column or overshoot past it.
        let geometry = GridGeometry::new(
            1,
            3,
            Domain {
                x_min: 0,
                x_max: 999,
                y_min: 0,
                y_max: 1,
            },
        );
        assert_eq!(geometry.cell_of(0, 0), 0);
        assert_eq!(geometry.cell_of(999, 0), 2);
        let mut seen = [false; 3];
        for x in 0..=999 {
            seen[geometry.cell_of(x, 0) as usize] = true;
        }
        assert_eq!(seen, [true; 3]);
    }

    #[test]
    fn largest_allowed_grid_indexes_every_cell() {
        // 16x16 is the densest grid a u8 cell index can address; the far
        // corner must land on index 255, not wrap.
        let geometry = GridGeometry::new(
            16,
            16,
            Domain {
                x_min: 0,
                x_max: 1024,
                y_min: 0,
                y_max: 1024,
            },
        );
        assert_eq!(geometry.cell_of(0, 0), 0);
        assert_eq!(geometry.cell_of(1024, 0), 15);
        assert_eq!(geometry.cell_of(0, 1024), 240);
        assert_eq!(geometry.cell_of(1024, 1024), 255);
    }

    #[test]
    fn identical_inputs_give_identical_cells() {
        let geometry = geometry_3x3();
        for _ in 0..4 {
            assert_eq!(geometry.cell_of(700, 300), geometry.cell_of(700, 300));
        }
    }
}
