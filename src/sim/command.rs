//! Player-issued commands
//!
//! Commands validate against the world, mutate intent state, and leave
//! execution to the tick loop. Dead units in a selection are skipped
//! silently; unknown handles are an error.

use crate::core::error::{Result, SimError};
use crate::core::types::{UnitId, Vec2};
use crate::map::grid::world_to_grid;
use crate::map::trench::same_trench_section;
use crate::path::service::PathRequest;
use crate::sim::world::SimulationWorld;

/// Order a selection to move to a world position. Each unit paths there
/// independently; a unit already waiting on a path keeps its request.
pub fn move_units(world: &mut SimulationWorld, ids: &[UnitId], dest: Vec2) -> Result<()> {
    let goal = world_to_grid(dest);
    let mut requests = Vec::new();

    for &id in ids {
        let Some(unit) = world.roster.get_mut(id) else {
            return Err(SimError::UnknownUnit(id));
        };
        if !unit.alive {
            continue;
        }

        // A move order overrides any engagement in progress
        if let Some(slot) = unit.ai.pending_weapon {
            unit.weapons[slot].reset_ready();
        }
        unit.ai.target = None;
        unit.ai.is_attacking = false;
        unit.ai.aim_timer_ms = None;
        unit.ai.pending_weapon = None;

        if unit.ai.is_calculating_path {
            continue;
        }
        unit.ai.is_calculating_path = true;
        requests.push(PathRequest {
            unit: id,
            start: unit.grid_pos(),
            goal,
        });
    }

    for request in requests {
        world.paths.request(request);
    }
    Ok(())
}

/// Order a unit to engage a specific target. Validates that both handles
/// resolve, both units are alive, the target is in weapon range, and a
/// trench-covered target is reachable down its own section.
pub fn fire_at(world: &mut SimulationWorld, shooter_id: UnitId, target_id: UnitId) -> Result<()> {
    let (target_pos, target_covered) = {
        let target = world
            .roster
            .get(target_id)
            .ok_or(SimError::UnknownUnit(target_id))?;
        if !target.alive {
            return Err(SimError::UnitDead(target_id));
        }
        (target.pos, target.in_cover(&world.grid))
    };

    let shooter = world
        .roster
        .get(shooter_id)
        .ok_or(SimError::UnknownUnit(shooter_id))?;
    if !shooter.alive {
        return Err(SimError::UnitDead(shooter_id));
    }

    let dist = shooter.pos.distance(&target_pos);
    if dist > shooter.equipped_weapon().spec.range {
        return Err(SimError::InvalidCommand(format!(
            "target out of range ({dist:.0} > {:.0})",
            shooter.equipped_weapon().spec.range
        )));
    }

    if target_covered {
        let same_section = same_trench_section(
            &world.grid,
            shooter.grid_pos(),
            world_to_grid(target_pos),
        );
        let grenade_reach = shooter
            .grenade_slot()
            .map_or(false, |slot| dist <= shooter.weapons[slot].spec.range);
        if !same_section && !grenade_reach {
            return Err(SimError::InvalidCommand(
                "no line of fire into trench cover".to_string(),
            ));
        }
    }

    let Some(unit) = world.roster.get_mut(shooter_id) else {
        return Err(SimError::UnknownUnit(shooter_id));
    };
    unit.path.clear();
    unit.ai.is_moving = false;
    unit.ai.target = Some(target_id);
    let slot = unit.equipped;
    unit.weapons[slot].state.is_first_shot = true;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::SimConfig;
    use crate::core::types::GridPos;
    use crate::map::grid::{grid_to_world, TerrainGrid};
    use crate::map::tile::TileKind;
    use crate::unit::loadout::UnitLoadout;

    fn test_world(width: usize, height: usize) -> SimulationWorld {
        SimulationWorld::new(SimConfig::default(), TerrainGrid::new(width, height), 5)
    }

    #[test]
    fn test_unknown_unit_is_an_error() {
        let mut world = test_world(10, 10);
        let ghost = UnitId::new();
        let err = move_units(&mut world, &[ghost], Vec2::new(100.0, 100.0));
        assert!(matches!(err, Err(SimError::UnknownUnit(_))));
    }

    #[test]
    fn test_dead_units_in_selection_are_skipped() {
        let mut world = test_world(10, 10);
        let alive = world.spawn_unit(UnitLoadout::french_rifleman(), GridPos::new(1, 1));
        let dead = world.spawn_unit(UnitLoadout::french_rifleman(), GridPos::new(2, 1));
        world.roster.get_mut(dead).unwrap().die();

        move_units(
            &mut world,
            &[alive, dead],
            grid_to_world(GridPos::new(8, 8)),
        )
        .unwrap();

        assert!(world.roster.get(alive).unwrap().ai.is_calculating_path);
        assert!(!world.roster.get(dead).unwrap().ai.is_calculating_path);
    }

    #[test]
    fn test_move_order_cancels_engagement() {
        let mut world = test_world(20, 20);
        let shooter = world.spawn_unit(UnitLoadout::french_rifleman(), GridPos::new(1, 1));
        let enemy = world.spawn_unit(UnitLoadout::german_rifleman(), GridPos::new(5, 1));
        fire_at(&mut world, shooter, enemy).unwrap();

        {
            let unit = world.roster.get_mut(shooter).unwrap();
            unit.ai.aim_timer_ms = Some(500.0);
            unit.ai.pending_weapon = Some(0);
            unit.weapons[0].state.can_fire = false;
        }
        move_units(&mut world, &[shooter], grid_to_world(GridPos::new(10, 10))).unwrap();

        let unit = world.roster.get(shooter).unwrap();
        assert_eq!(unit.ai.target, None);
        assert_eq!(unit.ai.aim_timer_ms, None);
        assert!(unit.weapons[0].state.can_fire);
    }

    #[test]
    fn test_fire_at_out_of_range_rejected() {
        let mut world = test_world(80, 80);
        // Lebel range is 800; 40 tiles = 1280 world units apart
        let shooter = world.spawn_unit(UnitLoadout::french_rifleman(), GridPos::new(1, 1));
        let target = world.spawn_unit(UnitLoadout::german_rifleman(), GridPos::new(41, 1));

        let err = fire_at(&mut world, shooter, target);
        assert!(matches!(err, Err(SimError::InvalidCommand(_))));
    }

    #[test]
    fn test_fire_at_dead_target_rejected() {
        let mut world = test_world(20, 20);
        let shooter = world.spawn_unit(UnitLoadout::french_rifleman(), GridPos::new(1, 1));
        let target = world.spawn_unit(UnitLoadout::german_rifleman(), GridPos::new(5, 1));
        world.roster.get_mut(target).unwrap().die();

        let err = fire_at(&mut world, shooter, target);
        assert!(matches!(err, Err(SimError::UnitDead(_))));
    }

    #[test]
    fn test_fire_into_unreachable_trench_rejected() {
        let mut world = test_world(30, 30);
        for x in 0..30 {
            world.set_object_tile(GridPos::new(x, 15), Some(TileKind::Trench));
        }
        // Shooter in the open, target in the trench, no grenades equipped
        let shooter = world.spawn_unit(UnitLoadout::french_machine_gunner(), GridPos::new(5, 5));
        let target = world.spawn_unit(UnitLoadout::german_rifleman(), GridPos::new(5, 15));

        let err = fire_at(&mut world, shooter, target);
        assert!(matches!(err, Err(SimError::InvalidCommand(_))));
    }

    #[test]
    fn test_fire_down_own_trench_allowed() {
        let mut world = test_world(30, 30);
        for x in 0..30 {
            world.set_object_tile(GridPos::new(x, 15), Some(TileKind::Trench));
        }
        let shooter = world.spawn_unit(UnitLoadout::french_rifleman(), GridPos::new(2, 15));
        let target = world.spawn_unit(UnitLoadout::german_rifleman(), GridPos::new(10, 15));

        fire_at(&mut world, shooter, target).unwrap();
        assert_eq!(world.roster.get(shooter).unwrap().ai.target, Some(target));
    }
}
