//! Spawn loadouts - named unit templates
//!
//! A loadout is everything the roster needs to stamp out a unit: team,
//! training standard, speed, and the ordered weapon list. Riflemen carry
//! a grenade pack as a second slot; machine-gun teams move slower.

use serde::{Deserialize, Serialize};

use crate::combat::constants::{DEFAULT_UNIT_SPEED, MG_TEAM_SPEED};
use crate::combat::skill::SkillLevel;
use crate::combat::weapon::WeaponSpec;
use crate::core::types::Team;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitLoadout {
    pub name: String,
    pub team: Team,
    pub skill: SkillLevel,
    pub speed: f32,
    pub weapons: Vec<WeaponSpec>,
}

impl UnitLoadout {
    pub fn french_rifleman() -> Self {
        Self {
            name: "Rifleman".to_string(),
            team: Team::Entente,
            skill: SkillLevel::Trained,
            speed: DEFAULT_UNIT_SPEED,
            weapons: vec![WeaponSpec::lebel(), WeaponSpec::grenade_pack()],
        }
    }

    pub fn french_machine_gunner() -> Self {
        Self {
            name: "Machine-gunner".to_string(),
            team: Team::Entente,
            skill: SkillLevel::Trained,
            speed: MG_TEAM_SPEED,
            weapons: vec![WeaponSpec::st_etienne_1907()],
        }
    }

    pub fn german_rifleman() -> Self {
        Self {
            name: "Rifleman".to_string(),
            team: Team::Alliance,
            skill: SkillLevel::Trained,
            speed: DEFAULT_UNIT_SPEED,
            weapons: vec![WeaponSpec::gewehr_98(), WeaponSpec::grenade_pack()],
        }
    }

    pub fn german_machine_gunner() -> Self {
        Self {
            name: "Machine-gunner".to_string(),
            team: Team::Alliance,
            skill: SkillLevel::Trained,
            speed: MG_TEAM_SPEED,
            weapons: vec![WeaponSpec::mg08()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_riflemen_carry_grenades() {
        let loadout = UnitLoadout::french_rifleman();
        assert_eq!(loadout.weapons.len(), 2);
        assert!(loadout.weapons[1].total_ammo.is_some());
    }

    #[test]
    fn test_mg_teams_move_slower() {
        assert!(UnitLoadout::german_machine_gunner().speed < UnitLoadout::german_rifleman().speed);
    }
}
