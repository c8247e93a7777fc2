//! The simulation world - the single mutable context
//!
//! Everything the engine touches hangs off this struct and is passed
//! explicitly; there is no global state. The world owns the RNG, so a
//! seed fully determines a battle.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::core::config::SimConfig;
use crate::core::types::{GridPos, Team, Tick, UnitId};
use crate::map::grid::{grid_to_world, TerrainGrid};
use crate::map::tile::TileKind;
use crate::path::service::PathService;
use crate::unit::loadout::UnitLoadout;
use crate::unit::roster::Roster;

pub struct SimulationWorld {
    pub config: SimConfig,
    pub grid: TerrainGrid,
    pub roster: Roster,
    pub paths: PathService,
    pub rng: ChaCha8Rng,
    pub tick: Tick,
}

impl SimulationWorld {
    pub fn new(config: SimConfig, grid: TerrainGrid, seed: u64) -> Self {
        let paths = PathService::new(&grid);
        Self {
            config,
            grid,
            roster: Roster::new(),
            paths,
            rng: ChaCha8Rng::seed_from_u64(seed),
            tick: 0,
        }
    }

    /// Spawn a unit at the center of a grid cell
    pub fn spawn_unit(&mut self, loadout: UnitLoadout, cell: GridPos) -> UnitId {
        self.roster.spawn(loadout, grid_to_world(cell))
    }

    /// Place or clear an object tile, keeping the pathfinder's cost grid
    /// in sync. Returns false as a no-op for off-map cells.
    pub fn set_object_tile(&mut self, cell: GridPos, kind: Option<TileKind>) -> bool {
        if self.grid.set_object_tile(cell, kind) {
            self.paths.sync_cell(cell, self.grid.tile_at(cell));
            true
        } else {
            false
        }
    }

    pub fn living_count(&self, team: Team) -> usize {
        self.roster.living_count(team)
    }

    /// Battle is decided when either side has no one left standing
    pub fn is_decided(&self) -> bool {
        self.living_count(Team::Entente) == 0 || self.living_count(Team::Alliance) == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_rolls() {
        use rand::Rng;
        let grid = TerrainGrid::new(10, 10);
        let mut a = SimulationWorld::new(SimConfig::default(), grid.clone(), 99);
        let mut b = SimulationWorld::new(SimConfig::default(), grid, 99);
        let rolls_a: Vec<f32> = (0..8).map(|_| a.rng.gen()).collect();
        let rolls_b: Vec<f32> = (0..8).map(|_| b.rng.gen()).collect();
        assert_eq!(rolls_a, rolls_b);
    }

    #[test]
    fn test_spawn_places_at_cell_center() {
        let mut world =
            SimulationWorld::new(SimConfig::default(), TerrainGrid::new(10, 10), 1);
        let id = world.spawn_unit(UnitLoadout::french_rifleman(), GridPos::new(3, 4));
        let unit = world.roster.get(id).unwrap();
        assert_eq!(unit.pos, grid_to_world(GridPos::new(3, 4)));
    }

    #[test]
    fn test_decided_when_one_side_wiped() {
        let mut world =
            SimulationWorld::new(SimConfig::default(), TerrainGrid::new(10, 10), 1);
        let fr = world.spawn_unit(UnitLoadout::french_rifleman(), GridPos::new(1, 1));
        world.spawn_unit(UnitLoadout::german_rifleman(), GridPos::new(8, 8));
        assert!(!world.is_decided());

        world.roster.get_mut(fr).unwrap().die();
        assert!(world.is_decided());
    }
}
