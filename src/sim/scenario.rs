//! Scenario definitions - terrain layout plus spawn points
//!
//! A scenario is plain data, loadable from JSON, and the only place
//! battlefield layout is decided. `flanders_default` is the built-in
//! fixture: a defended trench line with a wire belt in front of it,
//! attackers massed on the far side of no-man's-land.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::config::SimConfig;
use crate::core::error::Result;
use crate::core::types::{GridPos, Team};
use crate::map::grid::TerrainGrid;
use crate::map::tile::TileKind;
use crate::sim::world::SimulationWorld;
use crate::unit::loadout::UnitLoadout;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ObjectPlacement {
    pub x: i32,
    pub y: i32,
    pub kind: TileKind,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SpawnPoint {
    pub x: i32,
    pub y: i32,
    #[serde(default)]
    pub machine_gun: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    pub width: usize,
    pub height: usize,
    #[serde(default)]
    pub objects: Vec<ObjectPlacement>,
    pub entente_spawns: Vec<SpawnPoint>,
    pub alliance_spawns: Vec<SpawnPoint>,
}

impl Scenario {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Built-in fixture sized from the config: Entente trench line near
    /// the bottom edge, Alliance assault waves at the top.
    pub fn flanders_default(config: &SimConfig) -> Self {
        let width = config.map_width;
        let height = config.map_height;
        let trench_y = height as i32 - 8;

        let mut objects = Vec::new();
        for x in 0..width as i32 {
            objects.push(ObjectPlacement {
                x,
                y: trench_y,
                kind: TileKind::Trench,
            });
            // Parapet on the side facing the assault
            objects.push(ObjectPlacement {
                x,
                y: trench_y - 1,
                kind: TileKind::Parapet,
            });
        }
        // Support trench behind the fire trench, center of the line only
        for x in (width as i32 / 4)..(3 * width as i32 / 4) {
            objects.push(ObjectPlacement {
                x,
                y: trench_y + 3,
                kind: TileKind::Trench,
            });
        }
        // Wire belt across no-man's-land, two staggered rows
        for x in 0..width as i32 {
            objects.push(ObjectPlacement {
                x,
                y: trench_y - 6,
                kind: TileKind::BarbedWire,
            });
            if x % 2 == 0 {
                objects.push(ObjectPlacement {
                    x,
                    y: trench_y - 7,
                    kind: TileKind::BarbedWire,
                });
            }
        }

        let entente_spawns = spread_spawns(config.defender_count, width, trench_y, config);
        let alliance_spawns = spread_spawns(config.attacker_count, width, 2, config);

        Self {
            width,
            height,
            objects,
            entente_spawns,
            alliance_spawns,
        }
    }

    /// Instantiate the scenario: lay terrain, then spawn both sides
    pub fn build_world(&self, config: SimConfig, seed: u64) -> SimulationWorld {
        let mut grid = TerrainGrid::new(self.width, self.height);
        for object in &self.objects {
            grid.set_object_tile(GridPos::new(object.x, object.y), Some(object.kind));
        }

        let mut world = SimulationWorld::new(config, grid, seed);
        for spawn in &self.entente_spawns {
            let loadout = loadout_for(Team::Entente, spawn.machine_gun);
            world.spawn_unit(loadout, GridPos::new(spawn.x, spawn.y));
        }
        for spawn in &self.alliance_spawns {
            let loadout = loadout_for(Team::Alliance, spawn.machine_gun);
            world.spawn_unit(loadout, GridPos::new(spawn.x, spawn.y));
        }
        world
    }
}

fn loadout_for(team: Team, machine_gun: bool) -> UnitLoadout {
    match (team, machine_gun) {
        (Team::Entente, false) => UnitLoadout::french_rifleman(),
        (Team::Entente, true) => UnitLoadout::french_machine_gunner(),
        (Team::Alliance, false) => UnitLoadout::german_rifleman(),
        (Team::Alliance, true) => UnitLoadout::german_machine_gunner(),
    }
}

/// Spread `count` spawns evenly across a row, promoting every Nth spawn
/// to a machine-gun team per the configured ratio.
fn spread_spawns(count: usize, width: usize, y: i32, config: &SimConfig) -> Vec<SpawnPoint> {
    let mut spawns = Vec::with_capacity(count);
    let mg_every = if config.mg_ratio > 0.0 {
        (1.0 / config.mg_ratio).round().max(1.0) as usize
    } else {
        usize::MAX
    };
    for i in 0..count {
        let x = ((i + 1) * width / (count + 1)) as i32;
        spawns.push(SpawnPoint {
            x,
            y,
            machine_gun: (i + 1) % mg_every == 0,
        });
    }
    spawns
}
