//! Discrete grid coordinates and world-space conversion

use bevy::prelude::*;
use derive_more::{Add, AddAssign, Display};
use serde::{Deserialize, Serialize};

/// World units covered by one grid cell along each horizontal axis
pub const DEFAULT_CELL_SIZE: f32 = 2.0;

/// Largest cell index (in either axis) that still maps to an exact world position.
/// Beyond this, `coord * cell_size` stops being representable without rounding in f32.
pub const MAX_CELL_INDEX: i32 = 1 << 20;

/// A single integer cell of the world grid
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Add, AddAssign, Display, Serialize, Deserialize,
)]
#[display("({x}, {z})")]
pub struct GridCoord {
    pub x: i32,
    pub z: i32,
}

impl GridCoord {
    pub const ORIGIN: GridCoord = GridCoord { x: 0, z: 0 };

    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// True iff the two cells differ by exactly one step along a single axis
    pub fn is_adjacent(self, other: GridCoord) -> bool {
        let dx = (self.x - other.x).abs();
        let dz = (self.z - other.z).abs();
        dx + dz == 1
    }

    /// The four orthogonal neighbours (order: -z, +z, -x, +x)
    pub fn neighbors(self) -> [GridCoord; 4] {
        [
            GridCoord::new(self.x, self.z - 1),
            GridCoord::new(self.x, self.z + 1),
            GridCoord::new(self.x - 1, self.z),
            GridCoord::new(self.x + 1, self.z),
        ]
    }

    /// Whether this cell has a well-defined world transform
    pub fn has_world_transform(self) -> bool {
        let limit = MAX_CELL_INDEX.unsigned_abs();
        self.x.unsigned_abs() <= limit && self.z.unsigned_abs() <= limit
    }

    /// Center of this cell in world space, on the ground plane
    pub fn to_world(self, cell_size: f32) -> Vec3 {
        Vec3::new(self.x as f32 * cell_size, 0.0, self.z as f32 * cell_size)
    }

    /// Cell containing a world-space point (cell `i` spans `[(i - 0.5) * size, (i + 0.5) * size)`)
    pub fn from_world(position: Vec3, cell_size: f32) -> Self {
        Self {
            x: (position.x / cell_size + 0.5).floor() as i32,
            z: (position.z / cell_size + 0.5).floor() as i32,
        }
    }
}

/// Axis-aligned world-space rectangle on the ground plane
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Footprint {
    pub center_x: f32,
    pub center_z: f32,
    pub width: f32,
    pub depth: f32,
}

impl Footprint {
    pub fn new(center_x: f32, center_z: f32, width: f32, depth: f32) -> Self {
        Self {
            center_x,
            center_z,
            width: width.abs(),
            depth: depth.abs(),
        }
    }

    /// World-space bounds of a single grid cell
    pub fn of_cell(cell: GridCoord, cell_size: f32) -> Self {
        let center = cell.to_world(cell_size);
        Self::new(center.x, center.z, cell_size, cell_size)
    }

    pub fn min(&self) -> Vec2 {
        Vec2::new(
            self.center_x - self.width / 2.0,
            self.center_z - self.depth / 2.0,
        )
    }

    pub fn max(&self) -> Vec2 {
        Vec2::new(
            self.center_x + self.width / 2.0,
            self.center_z + self.depth / 2.0,
        )
    }

    /// Strict overlap; rectangles that only share an edge do not overlap
    pub fn overlaps(&self, other: &Footprint) -> bool {
        let (a_min, a_max) = (self.min(), self.max());
        let (b_min, b_max) = (other.min(), other.max());
        a_min.x < b_max.x && b_min.x < a_max.x && a_min.y < b_max.y && b_min.y < a_max.y
    }

    /// Every grid cell this rectangle touches, snapped outward to whole cells.
    ///
    /// The lower edge is floored and the upper edge ceiled, so a solid object never
    /// leaves an uncovered cell. An edge lying exactly on a cell boundary does not
    /// claim the neighbouring cell.
    ///
    /// ```
    /// use gridhop::game_logic::grid::{Footprint, GridCoord};
    ///
    /// // A 4x2 table centered between cells 0 and 1 covers both of them
    /// let cells = Footprint::new(1.0, 0.0, 4.0, 2.0).covered_cells(2.0);
    /// assert_eq!(cells, vec![GridCoord::new(0, 0), GridCoord::new(1, 0)]);
    /// ```
    pub fn covered_cells(&self, cell_size: f32) -> Vec<GridCoord> {
        let (min_x, max_x) = snap_outward(self.min().x, self.max().x, cell_size);
        let (min_z, max_z) = snap_outward(self.min().y, self.max().y, cell_size);

        let count = (max_x as i64 - min_x as i64 + 1) * (max_z as i64 - min_z as i64 + 1);
        let mut cells = Vec::with_capacity(count.clamp(0, MAX_FOOTPRINT_RESERVE) as usize);
        for z in min_z..=max_z {
            for x in min_x..=max_x {
                cells.push(GridCoord::new(x, z));
            }
        }
        cells
    }
}

/// Upper bound on the up-front allocation in [`Footprint::covered_cells`]
const MAX_FOOTPRINT_RESERVE: i64 = 1 << 16;

/// Map a continuous `[lo, hi]` interval to the inclusive range of cells it covers.
/// Results are clamped to `±MAX_CELL_INDEX`.
fn snap_outward(lo: f32, hi: f32, cell_size: f32) -> (i32, i32) {
    let limit = MAX_CELL_INDEX as f32;
    let first = (lo / cell_size + 0.5).floor().clamp(-limit, limit) as i32;
    let last = (hi / cell_size + 0.5).ceil().clamp(-limit, limit + 1.0) as i32 - 1;
    (first, last.max(first))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adjacency() {
        let origin = GridCoord::ORIGIN;
        assert!(origin.is_adjacent(GridCoord::new(1, 0)));
        assert!(origin.is_adjacent(GridCoord::new(0, -1)));
        assert!(!origin.is_adjacent(GridCoord::new(1, 1)));
        assert!(!origin.is_adjacent(origin));
        assert!(!origin.is_adjacent(GridCoord::new(2, 0)));
    }

    #[test]
    fn test_neighbors_are_all_adjacent() {
        let cell = GridCoord::new(-3, 7);
        for n in cell.neighbors() {
            assert!(cell.is_adjacent(n));
        }
    }

    #[test]
    fn test_coord_addition() {
        let mut cell = GridCoord::new(2, 3) + GridCoord::new(-1, 1);
        assert_eq!(cell, GridCoord::new(1, 4));
        cell += GridCoord::new(0, -4);
        assert_eq!(cell, GridCoord::new(1, 0));
    }

    #[test]
    fn test_world_round_trip() {
        let cell = GridCoord::new(-4, 9);
        let world = cell.to_world(DEFAULT_CELL_SIZE);
        assert_eq!(world, Vec3::new(-8.0, 0.0, 18.0));
        assert_eq!(GridCoord::from_world(world, DEFAULT_CELL_SIZE), cell);
        // Anywhere inside the cell maps back to it
        let inside = world + Vec3::new(0.9, 0.0, -0.9);
        assert_eq!(GridCoord::from_world(inside, DEFAULT_CELL_SIZE), cell);
    }

    #[test]
    fn test_single_cell_object() {
        let cells = Footprint::new(0.0, 0.0, 2.0, 2.0).covered_cells(DEFAULT_CELL_SIZE);
        assert_eq!(cells, vec![GridCoord::ORIGIN]);
    }

    #[test]
    fn test_small_object_straddling_boundary_claims_both_cells() {
        // 0.5 wide, centered on the boundary between cell 0 and cell 1
        let cells = Footprint::new(1.0, 0.0, 0.5, 0.5).covered_cells(DEFAULT_CELL_SIZE);
        assert_eq!(cells, vec![GridCoord::new(0, 0), GridCoord::new(1, 0)]);
    }

    #[test]
    fn test_wide_wall_has_no_gaps() {
        let cells = Footprint::new(5.0, -2.0, 9.0, 1.0).covered_cells(DEFAULT_CELL_SIZE);
        let xs: Vec<i32> = cells.iter().map(|c| c.x).collect();
        assert_eq!(xs, vec![0, 1, 2, 3, 4, 5]);
        assert!(cells.iter().all(|c| c.z == -1));
    }

    #[test]
    fn test_degenerate_footprint_still_covers_a_cell() {
        let cells = Footprint::new(1.0, 1.0, 0.0, 0.0).covered_cells(DEFAULT_CELL_SIZE);
        assert_eq!(cells.len(), 1);
    }

    #[test]
    fn test_far_away_footprint_is_clamped_to_the_grid_edge() {
        let cells = Footprint::new(1.0e12, 0.0, 2.0, 2.0).covered_cells(2.0);
        assert_eq!(cells, vec![GridCoord::new(MAX_CELL_INDEX, 0)]);
    }

    #[test]
    fn test_footprint_overlap() {
        let a = Footprint::new(0.0, 0.0, 2.0, 2.0);
        let touching = Footprint::new(2.0, 0.0, 2.0, 2.0);
        let overlapping = Footprint::new(1.5, 0.5, 2.0, 2.0);
        assert!(!a.overlaps(&touching));
        assert!(a.overlaps(&overlapping));
    }

    #[test]
    fn test_world_transform_bound() {
        assert!(GridCoord::new(MAX_CELL_INDEX, 0).has_world_transform());
        assert!(!GridCoord::new(0, -MAX_CELL_INDEX - 1).has_world_transform());
        assert!(!GridCoord::new(i32::MIN, 0).has_world_transform());
    }
}
