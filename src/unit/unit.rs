//! The per-soldier simulation entity
//!
//! A unit owns its weapons, its morale-derived stance, its current path,
//! and its AI scratch state. The per-tick update advances weapon state,
//! re-derives stance, regenerates morale, and walks the path. Death is
//! terminal: the unit stays in the roster for presentation but is
//! excluded from every query.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::ai::state::AiState;
use crate::combat::constants::{MORALE_MAX, MORALE_REGEN_PER_SEC, WAYPOINT_EPSILON};
use crate::combat::morale::{stance_for, Stance};
use crate::combat::skill::SkillLevel;
use crate::combat::weapon::{Weapon, WeaponKind};
use crate::core::types::{GridPos, Team, UnitId, Vec2};
use crate::map::grid::{world_to_grid, TerrainGrid};
use crate::map::tile::TileKind;
use crate::map::trench::in_trench_cover;
use crate::unit::loadout::UnitLoadout;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Unit {
    pub id: UnitId,
    pub name: String,
    pub team: Team,
    pub pos: Vec2,
    /// Facing, radians - presentation only
    pub heading: f32,
    pub morale: f32,
    pub stance: Stance,
    pub alive: bool,
    pub base_speed: f32,
    /// Current speed after the stance multiplier
    pub speed: f32,
    pub skill: SkillLevel,
    pub weapons: Vec<Weapon>,
    pub equipped: usize,
    /// Waypoints in world coordinates, consumed head-first
    pub path: VecDeque<Vec2>,
    pub ai: AiState,
}

impl Unit {
    pub fn from_loadout(loadout: UnitLoadout, pos: Vec2) -> Self {
        let weapons = loadout.weapons.into_iter().map(Weapon::new).collect();
        Self {
            id: UnitId::new(),
            name: loadout.name,
            team: loadout.team,
            pos,
            heading: 0.0,
            morale: MORALE_MAX,
            stance: Stance::Standing,
            alive: true,
            base_speed: loadout.speed,
            speed: loadout.speed,
            skill: loadout.skill,
            weapons,
            equipped: 0,
            path: VecDeque::new(),
            ai: AiState::default(),
        }
    }

    pub fn equipped_weapon(&self) -> &Weapon {
        &self.weapons[self.equipped]
    }

    pub fn equipped_weapon_mut(&mut self) -> &mut Weapon {
        &mut self.weapons[self.equipped]
    }

    /// Index of a usable grenade slot, if the unit still carries any
    pub fn grenade_slot(&self) -> Option<usize> {
        self.weapons
            .iter()
            .position(|w| w.spec.kind == WeaponKind::Grenade && w.has_ammo())
    }

    pub fn grid_pos(&self) -> GridPos {
        world_to_grid(self.pos)
    }

    pub fn current_tile(&self, grid: &TerrainGrid) -> Option<TileKind> {
        grid.tile_at(self.grid_pos())
    }

    /// In trench cover - relevant to targeting eligibility
    pub fn in_cover(&self, grid: &TerrainGrid) -> bool {
        in_trench_cover(grid, self.grid_pos())
    }

    /// Moving units shoot with a doubled spread
    pub fn is_moving(&self) -> bool {
        !self.path.is_empty() && self.stance != Stance::Suppressed
    }

    /// Per-tick state advance. AI decisions happen elsewhere; this is the
    /// mechanical half: weapons, stance, morale regen, movement.
    pub fn update(&mut self, delta_ms: f32, grid: &TerrainGrid) {
        if !self.alive {
            return;
        }

        for weapon in &mut self.weapons {
            weapon.update(delta_ms);
        }

        let stance = stance_for(self.morale, self.current_tile(grid));
        self.apply_stance(stance);

        if self.morale < MORALE_MAX {
            self.morale = (self.morale + MORALE_REGEN_PER_SEC * delta_ms / 1000.0).min(MORALE_MAX);
        }

        if self.stance != Stance::Suppressed {
            self.advance_along_path(delta_ms, grid);
        }

        if self.path.is_empty() {
            self.ai.is_moving = false;
        }
    }

    fn apply_stance(&mut self, stance: Stance) {
        self.stance = stance;
        self.speed = self.base_speed * stance.speed_multiplier();
    }

    fn advance_along_path(&mut self, delta_ms: f32, grid: &TerrainGrid) {
        let Some(&waypoint) = self.path.front() else {
            return;
        };

        self.ai.is_moving = true;
        self.heading = self.pos.angle_to(&waypoint);

        let dist = self.pos.distance(&waypoint);
        if dist < WAYPOINT_EPSILON {
            self.path.pop_front();
            return;
        }

        let terrain_mult = self
            .current_tile(grid)
            .map_or(1.0, |tile| tile.speed_multiplier());
        let step = self.speed * terrain_mult * delta_ms / 1000.0;
        let dir = (waypoint - self.pos).normalize();
        self.pos = self.pos + dir * step.min(dist);
    }

    /// Terminal. Clears orders; the corpse stays addressable for
    /// presentation but every combat query skips it.
    pub fn die(&mut self) {
        self.alive = false;
        self.path.clear();
        self.ai = AiState::default();
    }
}
