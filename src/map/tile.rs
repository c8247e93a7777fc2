//! Terrain tile types and their effects
//!
//! A tile is pure classification; cost, cover, and speed are derived from
//! the kind so that the grid stays a flat array of small values.

use serde::{Deserialize, Serialize};

/// Terrain classification for a single grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TileKind {
    #[default]
    Ground,
    Trench,
    Parapet,
    BarbedWire,
    Crater,
}

impl TileKind {
    /// Can infantry enter this tile at all?
    pub fn walkable(&self) -> bool {
        // Wire is passable, just brutally slow. Cells outside the grid are
        // the only truly non-traversable terrain.
        true
    }

    /// Pathfinding weight - higher means the planner avoids it
    pub fn movement_cost(&self) -> f32 {
        match self {
            TileKind::Ground => 3.0,
            TileKind::Trench => 1.0,
            TileKind::Parapet => 2.0,
            TileKind::BarbedWire => 18.0,
            TileKind::Crater => 3.0,
        }
    }

    /// Additive cover against incoming fire (negative = worse than open)
    pub fn cover_bonus(&self) -> f32 {
        match self {
            TileKind::Ground => 0.0,
            TileKind::Trench => 2.0,
            TileKind::Parapet => 2.5,
            TileKind::BarbedWire => -0.5,
            TileKind::Crater => 1.0,
        }
    }

    /// Movement speed multiplier while crossing this tile
    pub fn speed_multiplier(&self) -> f32 {
        match self {
            TileKind::Ground => 1.0,
            TileKind::Trench => 0.8,
            TileKind::Parapet => 0.8,
            TileKind::BarbedWire => 0.25,
            TileKind::Crater => 0.75,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trench_is_cheapest_path() {
        assert!(TileKind::Trench.movement_cost() < TileKind::Ground.movement_cost());
        assert!(TileKind::BarbedWire.movement_cost() > TileKind::Ground.movement_cost());
    }

    #[test]
    fn test_wire_slows_and_exposes() {
        assert!(TileKind::BarbedWire.speed_multiplier() < 0.5);
        assert!(TileKind::BarbedWire.cover_bonus() < 0.0);
    }

    #[test]
    fn test_parapet_covers_more_than_trench() {
        assert!(TileKind::Parapet.cover_bonus() > TileKind::Trench.cover_bonus());
    }
}
