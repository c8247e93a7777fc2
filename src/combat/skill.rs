//! Troop quality levels
//!
//! Skill modulates spread, aim time, melee lethality, and how much a near
//! miss rattles the soldier. Values are small multipliers/offsets, applied
//! at the single point each concern is resolved.

use serde::{Deserialize, Serialize};

/// Training standard of an individual soldier
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub enum SkillLevel {
    Militia,
    #[default]
    Trained,
    WellTrained,
    Elite,
}

impl SkillLevel {
    /// Multiplier on the accuracy cone (scales the spread term)
    pub fn accuracy_bonus(&self) -> f32 {
        match self {
            SkillLevel::Militia => 0.7,
            SkillLevel::Trained => 1.0,
            SkillLevel::WellTrained => 1.1,
            SkillLevel::Elite => 1.3,
        }
    }

    /// Seconds of aim penalty at maximum weapon range
    pub fn aim_seconds(&self) -> f32 {
        match self {
            SkillLevel::Militia => 1.8,
            SkillLevel::Trained => 1.5,
            SkillLevel::WellTrained => 1.2,
            SkillLevel::Elite => 0.8,
        }
    }

    /// Multiplier on melee lethality
    pub fn melee_bonus(&self) -> f32 {
        match self {
            SkillLevel::Militia => 0.6,
            SkillLevel::Trained => 0.8,
            SkillLevel::WellTrained => 1.0,
            SkillLevel::Elite => 1.2,
        }
    }

    /// Flat reduction of near-miss morale loss - veterans keep their heads down
    pub fn morale_relief(&self) -> f32 {
        match self {
            SkillLevel::Militia => 0.0,
            SkillLevel::Trained => 1.0,
            SkillLevel::WellTrained => 2.0,
            SkillLevel::Elite => 3.0,
        }
    }
}
