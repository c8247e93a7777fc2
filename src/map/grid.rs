//! Two-layer terrain grid with merged lookups
//!
//! The ground layer is the base classification; the object layer holds
//! destructible overlays (craters, wire belts, dug trenches). Lookups
//! always return the merged view: object tile wins when present.

use serde::{Deserialize, Serialize};

use crate::core::types::{GridPos, Vec2};
use crate::map::tile::TileKind;

/// World units per grid cell
pub const TILE_SIZE: f32 = 32.0;

/// Convert a world position to the cell containing it
pub fn world_to_grid(p: Vec2) -> GridPos {
    GridPos::new(
        (p.x / TILE_SIZE).floor() as i32,
        (p.y / TILE_SIZE).floor() as i32,
    )
}

/// Convert a cell to the world position of its center
pub fn grid_to_world(c: GridPos) -> Vec2 {
    Vec2::new(
        c.x as f32 * TILE_SIZE + TILE_SIZE / 2.0,
        c.y as f32 * TILE_SIZE + TILE_SIZE / 2.0,
    )
}

/// Static battlefield terrain, width x height tiles, row-major
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerrainGrid {
    width: usize,
    height: usize,
    ground: Vec<TileKind>,
    objects: Vec<Option<TileKind>>,
}

impl TerrainGrid {
    /// All-ground grid; scenario builders lay objects on top
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            ground: vec![TileKind::Ground; width * height],
            objects: vec![None; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn in_bounds(&self, pos: GridPos) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.width && (pos.y as usize) < self.height
    }

    fn index(&self, pos: GridPos) -> Option<usize> {
        if self.in_bounds(pos) {
            Some(pos.y as usize * self.width + pos.x as usize)
        } else {
            None
        }
    }

    /// Merged tile at a cell: object overlay wins over ground.
    /// Out of bounds is None, which every caller treats as non-traversable.
    pub fn tile_at(&self, pos: GridPos) -> Option<TileKind> {
        let idx = self.index(pos)?;
        Some(self.objects[idx].unwrap_or(self.ground[idx]))
    }

    /// Merged tile under a world position
    pub fn tile_at_world(&self, p: Vec2) -> Option<TileKind> {
        self.tile_at(world_to_grid(p))
    }

    pub fn object_at(&self, pos: GridPos) -> Option<TileKind> {
        self.objects[self.index(pos)?]
    }

    /// Place or clear an object tile. Returns false as a guarded no-op when
    /// the cell is off the map. Callers that hold a pathfinder must re-sync
    /// its cost grid afterwards (`SimulationWorld::set_object_tile` does).
    pub fn set_object_tile(&mut self, pos: GridPos, kind: Option<TileKind>) -> bool {
        match self.index(pos) {
            Some(idx) => {
                self.objects[idx] = kind;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_world_grid_round_trip_is_cell_center() {
        let p = Vec2::new(75.0, 40.0);
        let center = grid_to_world(world_to_grid(p));
        assert_eq!(center, Vec2::new(80.0, 48.0));
        // Idempotent under repeated application
        assert_eq!(grid_to_world(world_to_grid(center)), center);
    }

    #[test]
    fn test_object_layer_overrides_ground() {
        let mut grid = TerrainGrid::new(4, 4);
        let cell = GridPos::new(2, 1);
        assert_eq!(grid.tile_at(cell), Some(TileKind::Ground));

        assert!(grid.set_object_tile(cell, Some(TileKind::Trench)));
        assert_eq!(grid.tile_at(cell), Some(TileKind::Trench));

        assert!(grid.set_object_tile(cell, None));
        assert_eq!(grid.tile_at(cell), Some(TileKind::Ground));
    }

    #[test]
    fn test_out_of_bounds_is_guarded() {
        let mut grid = TerrainGrid::new(4, 4);
        assert_eq!(grid.tile_at(GridPos::new(-1, 0)), None);
        assert_eq!(grid.tile_at(GridPos::new(0, 4)), None);
        assert!(!grid.set_object_tile(GridPos::new(99, 99), Some(TileKind::Crater)));
    }
}
