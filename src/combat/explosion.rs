//! Area effects - grenades and artillery
//!
//! An explosion is a fan of traced firing lines radiating from the impact
//! point, each resolved through the same ballistics pipeline as small
//! arms. Blasts inside a trench are contained: each line is clipped where
//! it leaves trench cover. Blasts in the open dig a crater.

use rand::Rng;

use crate::combat::ballistics::{trace_shot, Segment};
use crate::combat::constants::{
    ARTILLERY_BLAST_LINES, ARTILLERY_LETHALITY, EXPLOSION_CLIP_STEP,
};
use crate::combat::morale::{cover_bonus, near_miss_morale_loss};
use crate::core::types::{GridPos, Vec2};
use crate::map::grid::world_to_grid;
use crate::map::tile::TileKind;
use crate::map::trench::{in_trench_cover, same_trench_section};
use crate::sim::events::SimEvent;
use crate::sim::world::SimulationWorld;

/// Resolve an explosion at a world position.
///
/// Traces `line_count` radial lines of `blast_range`, applies cover-adjusted
/// lethality to primary hits and near-miss morale to everyone close, then
/// digs a 3x3 crater when the impact is outside trench cover.
pub fn generate_explosion(
    world: &mut SimulationWorld,
    center: Vec2,
    blast_range: f32,
    line_count: usize,
    lethality: f32,
    make_crater: bool,
    events: &mut Vec<SimEvent>,
) {
    let center_cell = world_to_grid(center);
    let in_trench = in_trench_cover(&world.grid, center_cell);

    events.push(SimEvent::ExplosionAt {
        center,
        blast_range,
    });

    for _ in 0..line_count {
        let angle = world.rng.gen::<f32>() * std::f32::consts::TAU;
        let mut line = Segment {
            a: center,
            b: Vec2::new(
                center.x + angle.cos() * blast_range,
                center.y + angle.sin() * blast_range,
            ),
        };

        if in_trench {
            line.b = clip_to_trench(world, line, blast_range);
        }

        let trace = trace_shot(&world.roster, &world.grid, line, None);

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

        if let Some(primary) = trace.hit {
            let roll = world.rng.gen::<f32>();
            let grid = &world.grid;
            if let Some(target) = world.roster.get_mut(primary.unit) {
                if target.alive {
                    let cell = world_to_grid(target.pos);
                    let same_trench = in_trench && same_trench_section(grid, center_cell, cell);
                    let cover = cover_bonus(grid.tile_at(cell), target.stance, same_trench);
                    if roll < lethality / cover {
                        target.die();
                        events.push(SimEvent::UnitDied {
                            unit: primary.unit,
                            at: primary.point,
                        });
                    }
                }
            }
        }
    }

    if make_crater && !in_trench {
        dig_crater(world, center_cell, events);
    }
}

/// High-explosive artillery round: wide fan, crater on impact
pub fn fire_artillery_strike(
    world: &mut SimulationWorld,
    target: Vec2,
    caliber: f32,
    events: &mut Vec<SimEvent>,
) {
    generate_explosion(
        world,
        target,
        caliber * 2.0,
        ARTILLERY_BLAST_LINES,
        ARTILLERY_LETHALITY,
        true,
        events,
    );
}

/// Walk the blast line outward and stop it at the first cell that is not
/// trench cover - the trench walls soak the fragment spray.
fn clip_to_trench(world: &SimulationWorld, line: Segment, blast_range: f32) -> Vec2 {
    let samples = (blast_range / EXPLOSION_CLIP_STEP).floor().max(1.0) as usize;
    let step = (line.b - line.a) * (1.0 / samples as f32);
    let mut point = line.a;
    for _ in 0..samples {
        point = point + step;
        if !in_trench_cover(&world.grid, world_to_grid(point)) {
            return point;
        }
    }
    line.b
}

/// Crater the 3x3 neighborhood around the impact cell.
/// Off-map cells are silently skipped; each placement re-syncs the
/// pathfinder through the world.
fn dig_crater(world: &mut SimulationWorld, center: GridPos, events: &mut Vec<SimEvent>) {
    for dy in -1..=1 {
        for dx in -1..=1 {
            let cell = GridPos::new(center.x + dx, center.y + dy);
            if world.set_object_tile(cell, Some(TileKind::Crater)) {
                events.push(SimEvent::CraterFormed { cell });
            }
        }
    }
}
