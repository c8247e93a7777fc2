//! Morale, stance, and cover
//!
//! Stance is not chosen - it is derived from morale and terrain every
//! tick. Falling morale walks a unit down through crouching, prone, and
//! finally suppressed; trenches make going prone pointless, so the prone
//! band is skipped while standing in one.

use serde::{Deserialize, Serialize};

use crate::combat::constants::{
    CRATER_MORALE_RELIEF, CROUCH_THRESHOLD, NEAR_MISS_FALLOFF, NEAR_MISS_MAX_LOSS,
    NEAR_MISS_THRESHOLD, PRONE_THRESHOLD, SUPPRESSED_THRESHOLD, TRENCH_MORALE_RELIEF,
};
use crate::combat::skill::SkillLevel;
use crate::map::tile::TileKind;

/// Posture derived from morale, ordered by combat capability
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub enum Stance {
    /// Pinned - barely crawling, cannot advance
    Suppressed,
    /// Flat on the ground
    Prone,
    Crouching,
    #[default]
    Standing,
}

impl Stance {
    pub fn speed_multiplier(&self) -> f32 {
        match self {
            Stance::Standing => 1.0,
            Stance::Crouching => 0.5,
            Stance::Prone | Stance::Suppressed => 1.0 / 3.0,
        }
    }

    /// Additive cover term - a smaller silhouette is harder to hit
    pub fn cover_bonus(&self) -> f32 {
        match self {
            Stance::Standing => 0.0,
            Stance::Crouching => 0.5,
            Stance::Prone | Stance::Suppressed => 1.0,
        }
    }
}

/// Derive stance from morale and the terrain underfoot.
///
/// Trench tiles suppress the prone transition: the trench already covers,
/// so the unit stays upright and fighting until actually suppressed.
pub fn stance_for(morale: f32, terrain: Option<TileKind>) -> Stance {
    if morale < SUPPRESSED_THRESHOLD {
        Stance::Suppressed
    } else if morale < PRONE_THRESHOLD && terrain != Some(TileKind::Trench) {
        Stance::Prone
    } else if morale < CROUCH_THRESHOLD {
        Stance::Crouching
    } else {
        Stance::Standing
    }
}

/// Multiplicative divisor applied to incoming lethality.
///
/// Always >= 1. `same_trench` drops the terrain term for trench cover -
/// fire coming down the trench itself is not stopped by the trench.
pub fn cover_bonus(terrain: Option<TileKind>, stance: Stance, same_trench: bool) -> f32 {
    let terrain_term = match terrain {
        Some(tile) => {
            if same_trench && matches!(tile, TileKind::Trench | TileKind::Parapet) {
                0.0
            } else {
                tile.cover_bonus()
            }
        }
        None => 0.0,
    };
    (1.0 + terrain_term + stance.cover_bonus()).max(1.0)
}

/// Morale loss from a round passing nearby.
///
/// Closer misses cost more; terrain and experience both take the edge off.
/// Canonical formula per DESIGN.md (the revisions disagreed).
pub fn near_miss_morale_loss(distance: f32, terrain: Option<TileKind>, skill: SkillLevel) -> f32 {
    let clamped = distance.clamp(0.0, NEAR_MISS_THRESHOLD);
    let mut loss = NEAR_MISS_MAX_LOSS - (clamped / NEAR_MISS_THRESHOLD) * NEAR_MISS_FALLOFF;
    match terrain {
        Some(TileKind::Trench) | Some(TileKind::Parapet) => loss -= TRENCH_MORALE_RELIEF,
        Some(TileKind::Crater) => loss -= CRATER_MORALE_RELIEF,
        _ => {}
    }
    loss -= skill.morale_relief();
    loss.round().max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_stance_bands_open_ground() {
        assert_eq!(stance_for(100.0, Some(TileKind::Ground)), Stance::Standing);
        assert_eq!(stance_for(74.0, Some(TileKind::Ground)), Stance::Crouching);
        assert_eq!(stance_for(49.0, Some(TileKind::Ground)), Stance::Prone);
        assert_eq!(stance_for(10.0, Some(TileKind::Ground)), Stance::Suppressed);
    }

    #[test]
    fn test_trench_skips_prone() {
        assert_eq!(stance_for(49.0, Some(TileKind::Trench)), Stance::Crouching);
        // Suppression still applies in a trench
        assert_eq!(stance_for(10.0, Some(TileKind::Trench)), Stance::Suppressed);
    }

    #[test]
    fn test_trench_beats_open_ground_cover() {
        let in_trench = cover_bonus(Some(TileKind::Trench), Stance::Standing, false);
        let in_open = cover_bonus(Some(TileKind::Ground), Stance::Standing, false);
        assert!(in_trench > in_open);
    }

    #[test]
    fn test_same_trench_drops_terrain_cover() {
        let flanked = cover_bonus(Some(TileKind::Trench), Stance::Crouching, true);
        let covered = cover_bonus(Some(TileKind::Trench), Stance::Crouching, false);
        assert!(flanked < covered);
        assert_eq!(flanked, 1.5);
    }

    #[test]
    fn test_wire_never_drops_below_one() {
        let on_wire = cover_bonus(Some(TileKind::BarbedWire), Stance::Standing, false);
        assert_eq!(on_wire, 1.0);
    }

    #[test]
    fn test_closer_miss_hurts_more() {
        let close = near_miss_morale_loss(5.0, Some(TileKind::Ground), SkillLevel::Trained);
        let far = near_miss_morale_loss(65.0, Some(TileKind::Ground), SkillLevel::Trained);
        assert!(close > far);
    }

    #[test]
    fn test_trench_relief_on_near_miss() {
        let open = near_miss_morale_loss(10.0, Some(TileKind::Ground), SkillLevel::Trained);
        let trench = near_miss_morale_loss(10.0, Some(TileKind::Trench), SkillLevel::Trained);
        assert!(trench < open);
    }

    proptest! {
        /// Stance is monotonic in morale: more morale never ranks lower
        #[test]
        fn prop_stance_monotonic_in_morale(a in 0.0f32..=100.0, b in 0.0f32..=100.0) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let terrain = Some(TileKind::Ground);
            prop_assert!(stance_for(lo, terrain) <= stance_for(hi, terrain));
        }

        /// Cover bonus is always at least 1 for every terrain/stance combo
        #[test]
        fn prop_cover_bonus_at_least_one(
            tile_idx in 0usize..5,
            stance_idx in 0usize..4,
            same_trench in proptest::bool::ANY,
        ) {
            let tiles = [
                TileKind::Ground,
                TileKind::Trench,
                TileKind::Parapet,
                TileKind::BarbedWire,
                TileKind::Crater,
            ];
            let stances = [
                Stance::Suppressed,
                Stance::Prone,
                Stance::Crouching,
                Stance::Standing,
            ];
            let bonus = cover_bonus(Some(tiles[tile_idx]), stances[stance_idx], same_trench);
            prop_assert!(bonus >= 1.0);
        }

        /// Near-miss loss is never negative
        #[test]
        fn prop_near_miss_loss_non_negative(d in 0.0f32..=200.0) {
            prop_assert!(near_miss_morale_loss(d, Some(TileKind::Trench), SkillLevel::Elite) >= 0.0);
        }
    }
}
