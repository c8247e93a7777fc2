//! Advance-probability model for attacker role resampling
//!
//! The probability of switching to Advance is a morale-centered baseline
//! pushed down by visible threats and current cover, and up by nearby
//! support. Defenders never roll; their role stays Fire.

use crate::combat::constants::ALLY_SUPPORT_RADIUS_TILES;
use crate::map::grid::{TerrainGrid, TILE_SIZE};
use crate::map::tile::TileKind;
use crate::unit::roster::Roster;
use crate::unit::unit::Unit;

/// Probability in [0.1, 1.0] that this unit's next role is Advance
pub fn advance_probability(roster: &Roster, grid: &TerrainGrid, unit: &Unit) -> f32 {
    let weapon_range = unit.equipped_weapon().spec.range;
    let enemies_in_range = roster.threats_in_range(unit.team, unit.pos, weapon_range);
    let nearby_allies = roster.supporting_allies(unit, ALLY_SUPPORT_RADIUS_TILES * TILE_SIZE);

    let mut p = 0.4;
    p += (unit.morale - 50.0) / 200.0;
    p -= 0.1 * enemies_in_range as f32;
    p += 0.05 * nearby_allies as f32;
    p += match unit.current_tile(grid) {
        Some(TileKind::Trench) | Some(TileKind::Parapet) => -0.3,
        Some(TileKind::Crater) => -0.1,
        _ => 0.1,
    };

    p.clamp(0.1, 1.0)
}
