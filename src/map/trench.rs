//! Trench section queries
//!
//! A trench section is a maximal contiguous run of trench/parapet tiles
//! along one grid axis. Sections gate indirect fire: a trench protects a
//! unit from everything except fire coming down the same section.

use crate::core::types::GridPos;
use crate::map::grid::TerrainGrid;
use crate::map::tile::TileKind;

/// Does this tile count as trench cover?
pub fn is_trench_tile(kind: TileKind) -> bool {
    matches!(kind, TileKind::Trench | TileKind::Parapet)
}

/// Is this cell inside trench cover?
pub fn in_trench_cover(grid: &TerrainGrid, pos: GridPos) -> bool {
    grid.tile_at(pos).is_some_and(is_trench_tile)
}

/// Are both cells part of one straight, unbroken trench run?
///
/// Checks the horizontal and vertical axes only; a diagonal of trench
/// tiles is two sections, not one.
pub fn same_trench_section(grid: &TerrainGrid, a: GridPos, b: GridPos) -> bool {
    if !in_trench_cover(grid, a) || !in_trench_cover(grid, b) {
        return false;
    }

    if a.y == b.y {
        let (lo, hi) = (a.x.min(b.x), a.x.max(b.x));
        if (lo..=hi).all(|x| in_trench_cover(grid, GridPos::new(x, a.y))) {
            return true;
        }
    }

    if a.x == b.x {
        let (lo, hi) = (a.y.min(b.y), a.y.max(b.y));
        if (lo..=hi).all(|y| in_trench_cover(grid, GridPos::new(a.x, y))) {
            return true;
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trench_row(grid: &mut TerrainGrid, y: i32, x0: i32, x1: i32) {
        for x in x0..=x1 {
            grid.set_object_tile(GridPos::new(x, y), Some(TileKind::Trench));
        }
    }

    #[test]
    fn test_same_horizontal_run() {
        let mut grid = TerrainGrid::new(10, 10);
        trench_row(&mut grid, 4, 2, 7);
        assert!(same_trench_section(
            &grid,
            GridPos::new(2, 4),
            GridPos::new(7, 4)
        ));
    }

    #[test]
    fn test_broken_run_is_two_sections() {
        let mut grid = TerrainGrid::new(10, 10);
        trench_row(&mut grid, 4, 2, 4);
        trench_row(&mut grid, 4, 6, 8);
        assert!(!same_trench_section(
            &grid,
            GridPos::new(2, 4),
            GridPos::new(8, 4)
        ));
    }

    #[test]
    fn test_parallel_trenches_not_connected() {
        let mut grid = TerrainGrid::new(10, 10);
        trench_row(&mut grid, 2, 0, 9);
        trench_row(&mut grid, 6, 0, 9);
        assert!(!same_trench_section(
            &grid,
            GridPos::new(3, 2),
            GridPos::new(3, 6)
        ));
    }

    #[test]
    fn test_parapet_joins_section() {
        let mut grid = TerrainGrid::new(10, 10);
        trench_row(&mut grid, 4, 2, 7);
        grid.set_object_tile(GridPos::new(5, 4), Some(TileKind::Parapet));
        assert!(same_trench_section(
            &grid,
            GridPos::new(2, 4),
            GridPos::new(7, 4)
        ));
    }

    #[test]
    fn test_open_ground_never_in_section() {
        let grid = TerrainGrid::new(10, 10);
        assert!(!same_trench_section(
            &grid,
            GridPos::new(1, 1),
            GridPos::new(1, 1)
        ));
    }
}
