//! The fixed-timestep tick
//!
//! Tick order is a contract: path results land first, then the
//! mechanical unit pass, then the AI pass, then the counter. Within one
//! tick every unit sees the same delivered paths and the AI pass sees
//! fully updated weapons and stances.

use crate::ai::decision::update_ai;
use crate::map::grid::grid_to_world;
use crate::sim::events::SimEvent;
use crate::sim::world::SimulationWorld;

/// Advance the world by one fixed step, returning everything that happened
pub fn run_tick(world: &mut SimulationWorld, delta_ms: f32) -> Vec<SimEvent> {
    let mut events = Vec::new();

    deliver_paths(world, &mut events);

    {
        let SimulationWorld { grid, roster, .. } = &mut *world;
        for unit in roster.iter_mut() {
            unit.update(delta_ms, grid);
        }
    }

    for id in world.roster.ids() {
        update_ai(world, id, delta_ms, &mut events);
    }

    world.tick += 1;
    events
}

/// Drain completed path searches into unit waypoint queues. Results for
/// units that died while the search was in flight are discarded.
fn deliver_paths(world: &mut SimulationWorld, events: &mut Vec<SimEvent>) {
    for result in world.paths.drain_results() {
        let Some(unit) = world.roster.get_mut(result.unit) else {
            continue;
        };
        if !unit.alive {
            tracing::trace!(unit = ?result.unit, "stale path for dead unit dropped");
            continue;
        }
        unit.ai.is_calculating_path = false;
        match result.path {
            Some(cells) => {
                unit.path = cells.into_iter().map(grid_to_world).collect();
                unit.ai.is_moving = !unit.path.is_empty();
            }
            None => {
                tracing::debug!(unit = ?result.unit, "unreachable goal");
                events.push(SimEvent::PathFailed { unit: result.unit });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::SimConfig;
    use crate::core::types::GridPos;
    use crate::map::grid::TerrainGrid;
    use crate::path::service::PathRequest;
    use crate::unit::loadout::UnitLoadout;
    use std::time::{Duration, Instant};

    fn test_world(width: usize, height: usize) -> SimulationWorld {
        SimulationWorld::new(SimConfig::default(), TerrainGrid::new(width, height), 3)
    }

    fn tick_until_path_lands(world: &mut SimulationWorld) -> Vec<SimEvent> {
        let deadline = Instant::now() + Duration::from_secs(5);
        let mut events = Vec::new();
        while Instant::now() < deadline {
            events.extend(run_tick(world, 100.0));
            let pending = world
                .roster
                .iter()
                .any(|u| u.ai.is_calculating_path);
            if !pending {
                break;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        events
    }

    #[test]
    fn test_tick_counter_advances() {
        let mut world = test_world(10, 10);
        assert_eq!(world.tick, 0);
        run_tick(&mut world, 100.0);
        run_tick(&mut world, 100.0);
        assert_eq!(world.tick, 2);
    }

    #[test]
    fn test_delivered_path_becomes_waypoints() {
        let mut world = test_world(10, 20);
        let id = world.spawn_unit(UnitLoadout::german_rifleman(), GridPos::new(5, 2));
        {
            let unit = world.roster.get_mut(id).unwrap();
            unit.ai.is_calculating_path = true;
        }
        world.paths.request(PathRequest {
            unit: id,
            start: GridPos::new(5, 2),
            goal: GridPos::new(5, 10),
        });

        tick_until_path_lands(&mut world);

        let unit = world.roster.get(id).unwrap();
        assert!(!unit.ai.is_calculating_path);
        assert!(!unit.path.is_empty());
        assert_eq!(
            *unit.path.back().unwrap(),
            grid_to_world(GridPos::new(5, 10))
        );
    }

    #[test]
    fn test_stale_path_for_dead_unit_discarded() {
        let mut world = test_world(10, 20);
        let id = world.spawn_unit(UnitLoadout::german_rifleman(), GridPos::new(5, 2));
        {
            let unit = world.roster.get_mut(id).unwrap();
            unit.ai.is_calculating_path = true;
        }
        world.paths.request(PathRequest {
            unit: id,
            start: GridPos::new(5, 2),
            goal: GridPos::new(5, 10),
        });
        world.roster.get_mut(id).unwrap().die();

        tick_until_path_lands(&mut world);

        assert!(world.roster.get(id).unwrap().path.is_empty());
    }

    #[test]
    fn test_unreachable_goal_reports_path_failed() {
        let mut world = test_world(10, 10);
        let id = world.spawn_unit(UnitLoadout::german_rifleman(), GridPos::new(5, 5));
        {
            let unit = world.roster.get_mut(id).unwrap();
            unit.ai.is_calculating_path = true;
        }
        world.paths.request(PathRequest {
            unit: id,
            start: GridPos::new(5, 5),
            goal: GridPos::new(50, 50),
        });

        let events = tick_until_path_lands(&mut world);

        assert!(events
            .iter()
            .any(|e| matches!(e, SimEvent::PathFailed { unit } if *unit == id)));
        // Flag released so the unit can retry
        assert!(!world.roster.get(id).unwrap().ai.is_calculating_path);
    }
}
