//! The per-unit decision pass
//!
//! Runs once per tick per living unit, after the mechanical update:
//! role refresh, target re-evaluation, attack resolution, movement.
//! Each phase resolves the unit through the roster fresh, so a kill
//! earlier in the same pass is always visible.

use rand::Rng;

use crate::ai::role::advance_probability;
use crate::ai::state::{Role, TacticalRole};
use crate::combat::ballistics::{aim_line, trace_shot};
use crate::combat::constants::{
    ATTACK_OBJECTIVE_MARGIN, BASE_AIM_SECONDS, GRENADE_BLAST_LINES, GRENADE_BLAST_RANGE,
    KILL_MORALE_BONUS, MORALE_MAX, ROLE_INTERVAL_MAX_MS, ROLE_INTERVAL_MIN_MS,
};
use crate::combat::explosion::generate_explosion;
use crate::combat::morale::{cover_bonus, near_miss_morale_loss, Stance};
use crate::combat::weapon::WeaponKind;
use crate::core::types::{GridPos, UnitId, Vec2};
use crate::map::grid::{world_to_grid, TerrainGrid};
use crate::map::trench::same_trench_section;
use crate::path::service::PathRequest;
use crate::sim::events::SimEvent;
use crate::sim::world::SimulationWorld;
use crate::unit::unit::Unit;

pub fn update_ai(
    world: &mut SimulationWorld,
    id: UnitId,
    delta_ms: f32,
    events: &mut Vec<SimEvent>,
) {
    if !world.roster.get(id).map_or(false, |u| u.alive) {
        return;
    }
    update_role(world, id, delta_ms);
    update_targeting(world, id);
    update_attack(world, id, delta_ms, events);
    update_movement(world, id);
}

/// Attackers re-roll Fire/Advance when the resample clock expires.
/// Suppressed units and defenders keep their current role.
fn update_role(world: &mut SimulationWorld, id: UnitId, delta_ms: f32) {
    {
        let Some(unit) = world.roster.get_mut(id) else {
            return;
        };
        unit.ai.role.time_since_change_ms += delta_ms;
    }

    let probability = {
        let Some(unit) = world.roster.get(id) else {
            return;
        };
        let due = unit.ai.role.time_since_change_ms >= unit.ai.role.change_interval_ms;
        if !unit.team.is_attacker() || unit.stance == Stance::Suppressed || !due {
            return;
        }
        advance_probability(&world.roster, &world.grid, unit)
    };

    let roll: f32 = world.rng.gen();
    let interval = world.rng.gen_range(ROLE_INTERVAL_MIN_MS..=ROLE_INTERVAL_MAX_MS);
    let Some(unit) = world.roster.get_mut(id) else {
        return;
    };
    let role = if roll < probability {
        Role::Advance
    } else {
        Role::Fire
    };
    if role != unit.ai.role.role {
        tracing::trace!(unit = ?id, ?role, probability, "role change");
    }
    unit.ai.role = TacticalRole {
        role,
        time_since_change_ms: 0.0,
        change_interval_ms: interval,
    };
}

/// Whether `enemy` is worth engaging right now.
///
/// Covered targets are only reachable with grenades; exposed targets are
/// always fair game for defenders, and for attackers holding a Fire role.
fn should_target(grid: &TerrainGrid, unit: &Unit, enemy: &Unit) -> bool {
    if !enemy.alive {
        return false;
    }
    let dist = unit.pos.distance(&enemy.pos);
    if dist > unit.equipped_weapon().spec.range {
        return false;
    }
    if enemy.in_cover(grid) {
        return unit
            .grenade_slot()
            .map_or(false, |slot| dist <= unit.weapons[slot].spec.range);
    }
    if !unit.team.is_attacker() {
        return true;
    }
    unit.ai.role.role == Role::Fire
}

/// Re-evaluate the target against the nearest living enemy. Acquiring a
/// new target cancels movement and resets the engagement's first shot.
/// A pending aim is never interrupted.
fn update_targeting(world: &mut SimulationWorld, id: UnitId) {
    let decision = {
        let Some(unit) = world.roster.get(id) else {
            return;
        };
        if unit.ai.aim_timer_ms.is_some() {
            return;
        }
        world
            .roster
            .nearest_living_enemy(unit)
            .and_then(|enemy_id| world.roster.get(enemy_id))
            .filter(|enemy| should_target(&world.grid, unit, enemy))
            .map(|enemy| enemy.id)
    };

    let Some(unit) = world.roster.get_mut(id) else {
        return;
    };
    match decision {
        Some(enemy_id) => {
            if unit.ai.target != Some(enemy_id) {
                unit.ai.target = Some(enemy_id);
                unit.path.clear();
                unit.ai.is_moving = false;
                let slot = unit.equipped;
                unit.weapons[slot].state.is_first_shot = true;
            }
        }
        None => {
            unit.ai.target = None;
            unit.ai.is_attacking = false;
        }
    }
}

/// Advance a pending aim or start a new engagement against the current
/// target. The first shot of an engagement pays the aim delay; follow-up
/// shots resolve as soon as the weapon is ready.
fn update_attack(
    world: &mut SimulationWorld,
    id: UnitId,
    delta_ms: f32,
    events: &mut Vec<SimEvent>,
) {
    let fire_now = {
        let Some(unit) = world.roster.get_mut(id) else {
            return;
        };
        match unit.ai.aim_timer_ms {
            Some(ref mut remaining) => {
                *remaining -= delta_ms;
                if *remaining <= 0.0 {
                    unit.ai.aim_timer_ms = None;
                    true
                } else {
                    false
                }
            }
            None => false,
        }
    };
    if fire_now {
        resolve_shot(world, id, events);
        return;
    }

    let engagement = {
        let Some(unit) = world.roster.get(id) else {
            return;
        };
        if unit.ai.aim_timer_ms.is_some() {
            return;
        }
        let Some(target_id) = unit.ai.target else {
            return;
        };
        let Some(enemy) = world.roster.get(target_id).filter(|e| e.alive) else {
            return;
        };
        let dist = unit.pos.distance(&enemy.pos);
        let slot = if enemy.in_cover(&world.grid) {
            match unit
                .grenade_slot()
                .filter(|&s| dist <= unit.weapons[s].spec.range)
            {
                Some(s) => s,
                None => return,
            }
        } else {
            unit.equipped
        };
        let weapon = &unit.weapons[slot];
        if !weapon.state.can_fire || !weapon.has_ammo() {
            return;
        }
        let aim_ms = if weapon.state.is_first_shot {
            let penalty = (dist / weapon.spec.range) * unit.skill.aim_seconds();
            (BASE_AIM_SECONDS + penalty) * 1000.0
        } else {
            0.0
        };
        (slot, aim_ms)
    };

    let (slot, aim_ms) = engagement;
    {
        let Some(unit) = world.roster.get_mut(id) else {
            return;
        };
        // The slot is locked until the pending shot resolves or voids
        unit.weapons[slot].state.can_fire = false;
        unit.ai.pending_weapon = Some(slot);
        unit.ai.is_attacking = true;
        unit.path.clear();
        unit.ai.is_moving = false;
        unit.ai.aim_timer_ms = Some(aim_ms);
    }
    if aim_ms <= 0.0 {
        if let Some(unit) = world.roster.get_mut(id) {
            unit.ai.aim_timer_ms = None;
        }
        resolve_shot(world, id, events);
    }
}

/// Resolve the shot a unit finished aiming: validate the target, trace
/// the line, apply morale and lethality, and update weapon bookkeeping.
fn resolve_shot(world: &mut SimulationWorld, id: UnitId, events: &mut Vec<SimEvent>) {
    let (slot, spec, origin, team, skill, moving, target_id) = {
        let Some(shooter) = world.roster.get(id).filter(|u| u.alive) else {
            return;
        };
        let slot = shooter.ai.pending_weapon.unwrap_or(shooter.equipped);
        (
            slot,
            shooter.weapons[slot].spec.clone(),
            shooter.pos,
            shooter.team,
            shooter.skill,
            shooter.is_moving(),
            shooter.ai.target,
        )
    };

    let valid_target = target_id
        .and_then(|tid| world.roster.get(tid))
        .filter(|t| t.alive && origin.distance(&t.pos) <= spec.range)
        .map(|t| (t.id, t.pos));
    let Some((target_id, target_pos)) = valid_target else {
        // Target died or slipped out of range mid-aim: void the shot
        void_shot(world, id, slot);
        return;
    };

    if spec.kind == WeaponKind::Grenade {
        if let Some(shooter) = world.roster.get_mut(id) {
            shooter.weapons[slot].mark_fired();
            shooter.ai.is_attacking = false;
            shooter.ai.pending_weapon = None;
        }
        events.push(SimEvent::ShotFired {
            shooter: id,
            from: origin,
            to: target_pos,
        });
        generate_explosion(
            world,
            target_pos,
            GRENADE_BLAST_RANGE,
            GRENADE_BLAST_LINES,
            spec.lethality,
            false,
            events,
        );
        clear_target_if_dead(world, id, target_id, slot);
        return;
    }

    let line = aim_line(
        origin,
        target_pos,
        spec.range,
        spec.accuracy,
        skill,
        moving,
        &mut world.rng,
    );
    let trace = trace_shot(&world.roster, &world.grid, line, Some(id));

    // A friendly body on the line voids the whole shot
    if let Some(primary) = &trace.hit {
        let friendly = world
            .roster
            .get(primary.unit)
            .map_or(false, |u| u.team == team);
        if friendly {
            void_shot(world, id, slot);
            return;
        }
    }

    events.push(SimEvent::ShotFired {
        shooter: id,
        from: origin,
        to: trace.end,
    });

    for miss in &trace.near_misses {
        let grid = &world.grid;
        if let Some(unit) = world.roster.get_mut(miss.unit) {
            if !unit.alive {
                continue;
            }
            let terrain = grid.tile_at_world(unit.pos);
            let loss = near_miss_morale_loss(miss.distance, terrain, unit.skill);
            unit.morale = (unit.morale - loss).max(0.0);
        }
    }

    let mut killed = false;
    if let Some(primary) = trace.hit {
        let roll: f32 = world.rng.gen();
        let grid = &world.grid;
        if let Some(target) = world.roster.get_mut(primary.unit) {
            if target.alive {
                let cell = world_to_grid(target.pos);
                let same_trench = same_trench_section(grid, world_to_grid(origin), cell);
                let cover = cover_bonus(grid.tile_at(cell), target.stance, same_trench);
                let lethality =
                    crate::combat::ballistics::effective_lethality(spec.kind, spec.lethality, cover, skill);
                if roll < lethality {
                    target.die();
                    killed = true;
                    events.push(SimEvent::UnitDied {
                        unit: primary.unit,
                        at: primary.point,
                    });
                }
            }
        }
    }

    if let Some(shooter) = world.roster.get_mut(id) {
        shooter.weapons[slot].mark_fired();
        shooter.weapons[slot].state.is_first_shot = false;
        shooter.ai.is_attacking = false;
        shooter.ai.pending_weapon = None;
        if killed {
            let bonus = KILL_MORALE_BONUS * skill.accuracy_bonus();
            shooter.morale = (shooter.morale + bonus).min(MORALE_MAX);
        }
    }
    clear_target_if_dead(world, id, target_id, slot);
}

/// Release a locked slot with no ammo or cooldown cost
fn void_shot(world: &mut SimulationWorld, id: UnitId, slot: usize) {
    let Some(shooter) = world.roster.get_mut(id) else {
        return;
    };
    shooter.weapons[slot].reset_ready();
    shooter.ai.is_attacking = false;
    shooter.ai.pending_weapon = None;
    shooter.ai.target = None;
}

/// Dead targets are dropped and the next engagement with the same slot
/// pays aim again
fn clear_target_if_dead(world: &mut SimulationWorld, id: UnitId, target_id: UnitId, slot: usize) {
    let target_dead = world.roster.get(target_id).map_or(true, |t| !t.alive);
    if !target_dead {
        return;
    }
    let Some(shooter) = world.roster.get_mut(id) else {
        return;
    };
    if shooter.ai.target == Some(target_id) {
        shooter.ai.target = None;
        shooter.ai.is_attacking = false;
        shooter.weapons[slot].state.is_first_shot = true;
    }
}

/// Attackers with nothing else to do push toward the objective line near
/// the far map edge. The tactical role gates targeting, not movement: a
/// Fire-role attacker with no target in range keeps advancing.
fn update_movement(world: &mut SimulationWorld, id: UnitId) {
    let request = {
        let Some(unit) = world.roster.get(id) else {
            return;
        };
        if !unit.team.is_attacker()
            || unit.ai.is_attacking
            || unit.ai.aim_timer_ms.is_some()
            || unit.ai.is_calculating_path
            || !unit.path.is_empty()
            || unit.stance == Stance::Suppressed
        {
            return;
        }
        let start = unit.grid_pos();
        let goal = objective_for(&world.grid, unit.pos);
        if start == goal {
            return;
        }
        (start, goal)
    };

    let (start, goal) = request;
    if let Some(unit) = world.roster.get_mut(id) {
        unit.ai.is_calculating_path = true;
    }
    world.paths.request(PathRequest {
        unit: id,
        start,
        goal,
    });
}

/// World-space objective row for a given attacker column
pub fn objective_for(grid: &TerrainGrid, from: Vec2) -> GridPos {
    let cell = world_to_grid(from);
    GridPos::new(cell.x, grid.height() as i32 - ATTACK_OBJECTIVE_MARGIN)
}
