//! Battlefield terrain - tile classification and the shared grid
//!
//! The engine consumes a finished grid from a map provider; the only
//! mutation it performs itself is crater placement from explosions.

pub mod grid;
pub mod tile;
pub mod trench;

pub use grid::{grid_to_world, world_to_grid, TerrainGrid, TILE_SIZE};
pub use tile::TileKind;
pub use trench::{in_trench_cover, same_trench_section};
