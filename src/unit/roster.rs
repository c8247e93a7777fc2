//! Unit arena and roster queries
//!
//! Units live in a flat arena; handles are ids resolved through an index
//! map. Handles to dead units stay valid for presentation lookups, but
//! every combat query filters on `alive`, so a stale target handle
//! naturally stops matching instead of dangling.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::combat::morale::Stance;
use crate::core::types::{Team, UnitId, Vec2};
use crate::unit::loadout::UnitLoadout;
use crate::unit::unit::Unit;

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Roster {
    units: Vec<Unit>,
    index: AHashMap<UnitId, usize>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self, loadout: UnitLoadout, pos: Vec2) -> UnitId {
        let unit = Unit::from_loadout(loadout, pos);
        let id = unit.id;
        self.index.insert(id, self.units.len());
        self.units.push(unit);
        id
    }

    pub fn get(&self, id: UnitId) -> Option<&Unit> {
        self.index.get(&id).map(|&i| &self.units[i])
    }

    pub fn get_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        self.index.get(&id).map(|&i| &mut self.units[i])
    }

    /// Every unit, dead or alive, in spawn order
    pub fn iter(&self) -> impl Iterator<Item = &Unit> {
        self.units.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Unit> {
        self.units.iter_mut()
    }

    /// Snapshot of ids in pass order, for loops that mutate the roster
    pub fn ids(&self) -> Vec<UnitId> {
        self.units.iter().map(|u| u.id).collect()
    }

    pub fn living(&self) -> impl Iterator<Item = &Unit> {
        self.units.iter().filter(|u| u.alive)
    }

    pub fn living_count(&self, team: Team) -> usize {
        self.living().filter(|u| u.team == team).count()
    }

    /// Nearest living enemy of a unit, by Euclidean distance
    pub fn nearest_living_enemy(&self, unit: &Unit) -> Option<UnitId> {
        let mut best: Option<(UnitId, f32)> = None;
        for enemy in self.living().filter(|u| u.team != unit.team) {
            let d = unit.pos.distance(&enemy.pos);
            if best.map_or(true, |(_, bd)| d < bd) {
                best = Some((enemy.id, d));
            }
        }
        best.map(|(id, _)| id)
    }

    /// Living, non-suppressed enemies inside a radius of a point
    pub fn threats_in_range(&self, team: Team, from: Vec2, range: f32) -> usize {
        self.living()
            .filter(|u| {
                u.team != team && u.stance != Stance::Suppressed && from.distance(&u.pos) <= range
            })
            .count()
    }

    /// Living, non-suppressed allies near a unit (excluding itself)
    pub fn supporting_allies(&self, unit: &Unit, radius: f32) -> usize {
        self.living()
            .filter(|u| {
                u.id != unit.id
                    && u.team == unit.team
                    && u.stance != Stance::Suppressed
                    && unit.pos.distance(&u.pos) < radius
            })
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_and_lookup() {
        let mut roster = Roster::new();
        let id = roster.spawn(UnitLoadout::french_rifleman(), Vec2::new(10.0, 10.0));
        assert!(roster.get(id).is_some());
        assert_eq!(roster.living_count(Team::Entente), 1);
        assert!(roster.get(UnitId::new()).is_none());
    }

    #[test]
    fn test_dead_units_drop_out_of_queries_but_stay_addressable() {
        let mut roster = Roster::new();
        let id = roster.spawn(UnitLoadout::german_rifleman(), Vec2::new(10.0, 10.0));
        roster.get_mut(id).unwrap().die();

        assert_eq!(roster.living_count(Team::Alliance), 0);
        // Still addressable for presentation
        assert!(roster.get(id).is_some());
        assert!(!roster.get(id).unwrap().alive);
    }

    #[test]
    fn test_nearest_enemy_picks_closest_living() {
        let mut roster = Roster::new();
        let shooter = roster.spawn(UnitLoadout::french_rifleman(), Vec2::new(0.0, 0.0));
        let near = roster.spawn(UnitLoadout::german_rifleman(), Vec2::new(100.0, 0.0));
        let far = roster.spawn(UnitLoadout::german_rifleman(), Vec2::new(300.0, 0.0));

        let me = roster.get(shooter).unwrap().clone();
        assert_eq!(roster.nearest_living_enemy(&me), Some(near));

        roster.get_mut(near).unwrap().die();
        assert_eq!(roster.nearest_living_enemy(&me), Some(far));
    }

    #[test]
    fn test_support_counts_exclude_self_and_suppressed() {
        let mut roster = Roster::new();
        let me = roster.spawn(UnitLoadout::french_rifleman(), Vec2::new(0.0, 0.0));
        let buddy = roster.spawn(UnitLoadout::french_rifleman(), Vec2::new(50.0, 0.0));
        roster.spawn(UnitLoadout::french_rifleman(), Vec2::new(5000.0, 0.0));

        let unit = roster.get(me).unwrap().clone();
        assert_eq!(roster.supporting_allies(&unit, 160.0), 1);

        roster.get_mut(buddy).unwrap().stance = Stance::Suppressed;
        assert_eq!(roster.supporting_allies(&unit, 160.0), 0);
    }
}
