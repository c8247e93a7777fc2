//! Firing-line tracing and hit selection
//!
//! A shot is a segment from the muzzle out to weapon range, deviated by
//! the accuracy cone. Tracing finds the nearest eligible bounding-box
//! intersection and the set of near misses. Tracing never mutates units;
//! it returns a `ShotTrace` and the caller applies the effects.

use rand::Rng;

use crate::combat::constants::{
    BASE_SPREAD_DEG, MOVING_SPREAD_MULTIPLIER, NEAR_MISS_THRESHOLD, UNIT_SIZE,
};
use crate::combat::skill::SkillLevel;
use crate::combat::weapon::WeaponKind;
use crate::core::types::{Team, UnitId, Vec2};
use crate::map::grid::{world_to_grid, TerrainGrid};
use crate::map::trench::{in_trench_cover, same_trench_section};
use crate::unit::roster::Roster;

/// A firing line in world coordinates
#[derive(Debug, Clone, Copy)]
pub struct Segment {
    pub a: Vec2,
    pub b: Vec2,
}

impl Segment {
    pub fn length(&self) -> f32 {
        self.a.distance(&self.b)
    }

    /// Shortest distance from a point to this segment
    pub fn distance_to_point(&self, p: Vec2) -> f32 {
        let d = self.b - self.a;
        let len_sq = d.x * d.x + d.y * d.y;
        if len_sq < 1e-6 {
            return self.a.distance(&p);
        }
        let t = (((p.x - self.a.x) * d.x + (p.y - self.a.y) * d.y) / len_sq).clamp(0.0, 1.0);
        (self.a + d * t).distance(&p)
    }

    /// Entry parameter t in [0,1] where the segment first enters an AABB,
    /// via the slab method. t = 0 when the segment starts inside.
    fn aabb_entry(&self, min: Vec2, max: Vec2) -> Option<f32> {
        let d = self.b - self.a;
        let mut t_min: f32 = 0.0;
        let mut t_max: f32 = 1.0;

        for (origin, delta, lo, hi) in [
            (self.a.x, d.x, min.x, max.x),
            (self.a.y, d.y, min.y, max.y),
        ] {
            if delta.abs() < 1e-6 {
                if origin < lo || origin > hi {
                    return None;
                }
            } else {
                let mut t1 = (lo - origin) / delta;
                let mut t2 = (hi - origin) / delta;
                if t1 > t2 {
                    std::mem::swap(&mut t1, &mut t2);
                }
                t_min = t_min.max(t1);
                t_max = t_max.min(t2);
                if t_min > t_max {
                    return None;
                }
            }
        }
        Some(t_min)
    }
}

/// Nearest eligible intersection along a traced line
#[derive(Debug, Clone, Copy)]
pub struct PrimaryHit {
    pub unit: UnitId,
    pub point: Vec2,
    pub distance: f32,
}

/// A round that passed close enough to rattle someone
#[derive(Debug, Clone, Copy)]
pub struct NearMiss {
    pub unit: UnitId,
    pub distance: f32,
}

/// Result of tracing one firing line. Pure data; the caller applies
/// lethality rolls and morale losses.
#[derive(Debug, Clone)]
pub struct ShotTrace {
    pub hit: Option<PrimaryHit>,
    pub near_misses: Vec<NearMiss>,
    /// Line terminus, clipped to the hit point when something was struck
    pub end: Vec2,
}

/// Build the deviated firing line for a shot.
///
/// Spread = base cone x moving penalty x weapon accuracy x skill factor,
/// centered on the true bearing. Moving shooters double the cone.
pub fn aim_line(
    origin: Vec2,
    target: Vec2,
    range: f32,
    weapon_accuracy: f32,
    skill: SkillLevel,
    shooter_moving: bool,
    rng: &mut impl Rng,
) -> Segment {
    let bearing = origin.angle_to(&target);
    let moving_mult = if shooter_moving {
        MOVING_SPREAD_MULTIPLIER
    } else {
        1.0
    };
    let spread_deg = BASE_SPREAD_DEG * moving_mult * weapon_accuracy * skill.accuracy_bonus();
    let deviation = (rng.gen::<f32>() - 0.5) * spread_deg.to_radians();
    let angle = bearing + deviation;
    Segment {
        a: origin,
        b: Vec2::new(
            origin.x + angle.cos() * range,
            origin.y + angle.sin() * range,
        ),
    }
}

/// Trace a firing line against the roster.
///
/// Units inside a trench section are ineligible as primary hits unless the
/// line originates inside the same contiguous section - trenches stop
/// plunging fire but not fire down their own length. Near misses collect
/// living enemies of the firer (everyone, for unattributed blasts) within
/// the threshold distance of the line.
pub fn trace_shot(
    roster: &Roster,
    grid: &TerrainGrid,
    line: Segment,
    shooter: Option<UnitId>,
) -> ShotTrace {
    let shooter_team: Option<Team> = shooter
        .and_then(|id| roster.get(id))
        .map(|u| u.team);
    let origin_cell = world_to_grid(line.a);
    let half = UNIT_SIZE / 2.0;
    let line_len = line.length();

    let mut hit: Option<PrimaryHit> = None;
    let mut near_misses: Vec<NearMiss> = Vec::new();

    for unit in roster.iter() {
        if !unit.alive || Some(unit.id) == shooter {
            continue;
        }

        let cell = world_to_grid(unit.pos);
        let protected_by_trench =
            in_trench_cover(grid, cell) && !same_trench_section(grid, origin_cell, cell);

        if !protected_by_trench {
            let min = Vec2::new(unit.pos.x - half, unit.pos.y - half);
            let max = Vec2::new(unit.pos.x + half, unit.pos.y + half);
            if let Some(t) = line.aabb_entry(min, max) {
                let point = line.a + (line.b - line.a) * t;
                let distance = t * line_len;
                if hit.is_none() || distance < hit.as_ref().map_or(f32::INFINITY, |h| h.distance) {
                    hit = Some(PrimaryHit {
                        unit: unit.id,
                        point,
                        distance,
                    });
                }
            }
        }

        let is_enemy = shooter_team.map_or(true, |team| unit.team != team);
        if is_enemy {
            let distance = line.distance_to_point(unit.pos);
            if distance <= NEAR_MISS_THRESHOLD {
                near_misses.push(NearMiss {
                    unit: unit.id,
                    distance,
                });
            }
        }
    }

    // The primary hit is hit, not missed
    if let Some(primary) = &hit {
        near_misses.retain(|m| m.unit != primary.unit);
    }

    let end = hit.map_or(line.b, |h| h.point);
    ShotTrace {
        hit,
        near_misses,
        end,
    }
}

/// Kill probability of a resolved hit.
///
/// Melee ignores cover entirely and scales with skill instead.
pub fn effective_lethality(
    kind: WeaponKind,
    lethality: f32,
    cover: f32,
    skill: SkillLevel,
) -> f32 {
    if kind.ignores_cover() {
        (lethality * skill.melee_bonus()).min(1.0)
    } else {
        lethality / cover
    }
}
