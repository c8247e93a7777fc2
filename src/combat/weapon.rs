//! Weapon model - specs, presets, and the cooldown/reload state machine
//!
//! `WeaponSpec` is the immutable description; `FireState` is the per-slot
//! mutable state. The machine is Ready -> Firing(cooldown) -> Ready, with
//! a side path MagazineEmpty -> Reloading(fixed duration) -> Ready.

use serde::{Deserialize, Serialize};

use crate::combat::constants::{
    RELOAD_MS_DEFAULT, RELOAD_MS_HMG, RELOAD_MS_LMG, RELOAD_MS_PISTOL,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponKind {
    Rifle,
    Sniper,
    Hmg,
    Lmg,
    Pistol,
    Melee,
    Grenade,
}

impl WeaponKind {
    /// Magazine swap / belt feed duration. Heavier feeds take longer.
    pub fn reload_ms(&self) -> f32 {
        match self {
            WeaponKind::Hmg => RELOAD_MS_HMG,
            WeaponKind::Lmg => RELOAD_MS_LMG,
            WeaponKind::Pistol => RELOAD_MS_PISTOL,
            _ => RELOAD_MS_DEFAULT,
        }
    }

    /// Melee attacks ignore terrain and stance cover entirely
    pub fn ignores_cover(&self) -> bool {
        matches!(self, WeaponKind::Melee)
    }

    fn default_accuracy(&self) -> f32 {
        // Crew weapons and pistols throw a tighter effective cone per round
        match self {
            WeaponKind::Hmg | WeaponKind::Lmg | WeaponKind::Pistol => 0.7,
            _ => 1.0,
        }
    }
}

/// Immutable weapon description
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeaponSpec {
    pub name: String,
    pub kind: WeaponKind,
    /// Kill probability of a clean hit, before cover
    pub lethality: f32,
    /// Maximum firing line length, world units
    pub range: f32,
    /// Spread scale factor
    pub accuracy: f32,
    pub shots_per_second: f32,
    /// None = no magazine (melee, single-load)
    pub mag_size: Option<u32>,
    /// None = unlimited; Some = consumable ordnance
    pub total_ammo: Option<u32>,
}

impl WeaponSpec {
    fn new(name: &str, kind: WeaponKind, lethality: f32, range: f32, shots_per_second: f32) -> Self {
        Self {
            name: name.to_string(),
            kind,
            lethality,
            range,
            accuracy: kind.default_accuracy(),
            shots_per_second,
            mag_size: None,
            total_ammo: None,
        }
    }

    fn with_mag(mut self, mag: u32) -> Self {
        self.mag_size = Some(mag);
        self
    }

    fn with_ammo(mut self, ammo: u32) -> Self {
        self.total_ammo = Some(ammo);
        self
    }

    // --- Presets ---

    pub fn lebel() -> Self {
        Self::new("Lebel Mle1886", WeaponKind::Rifle, 0.85, 800.0, 0.18).with_mag(8)
    }

    pub fn gewehr_98() -> Self {
        Self::new("Gewehr 98", WeaponKind::Rifle, 0.85, 800.0, 0.25).with_mag(5)
    }

    pub fn mg08() -> Self {
        Self::new("MG-08", WeaponKind::Hmg, 0.75, 780.0, 8.0).with_mag(250)
    }

    pub fn st_etienne_1907() -> Self {
        Self::new("St-Etienne Mle1907", WeaponKind::Hmg, 0.8, 810.0, 6.0).with_mag(20)
    }

    pub fn trench_club() -> Self {
        Self::new("Trench club", WeaponKind::Melee, 0.6, 32.0, 0.5)
    }

    pub fn grenade_pack() -> Self {
        Self::new("Grenade", WeaponKind::Grenade, 0.8, 120.0, 0.1).with_ammo(3)
    }
}

/// Mutable fire state for one weapon slot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FireState {
    pub can_fire: bool,
    pub rounds_fired: u32,
    /// Remaining cooldown or reload, ms. None while ready or just fired.
    pub cooldown_ms: Option<f32>,
    /// First shot of an engagement pays the aim delay
    pub is_first_shot: bool,
    /// Remaining consumable ammo; None = unlimited
    pub ammo_remaining: Option<u32>,
}

/// One weapon slot in a unit's loadout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Weapon {
    pub spec: WeaponSpec,
    pub state: FireState,
}

impl Weapon {
    pub fn new(spec: WeaponSpec) -> Self {
        let ammo_remaining = spec.total_ammo;
        Self {
            spec,
            state: FireState {
                can_fire: true,
                rounds_fired: 0,
                cooldown_ms: None,
                is_first_shot: true,
                ammo_remaining,
            },
        }
    }

    /// Out of consumable ammo - the slot is permanently disabled
    pub fn is_disabled(&self) -> bool {
        self.state.ammo_remaining == Some(0)
    }

    pub fn has_ammo(&self) -> bool {
        !self.is_disabled()
    }

    /// Per-tick state machine advance
    pub fn update(&mut self, delta_ms: f32) {
        if self.is_disabled() {
            self.state.can_fire = false;
            return;
        }

        // Magazine exhausted: force the reload transition
        if let Some(mag) = self.spec.mag_size {
            if self.state.rounds_fired >= mag {
                self.state.cooldown_ms = Some(self.spec.kind.reload_ms());
                self.state.can_fire = false;
                self.state.rounds_fired = 0;
            }
        }

        if !self.state.can_fire {
            match self.state.cooldown_ms {
                // Just fired: start the rate-of-fire cooldown
                None => self.state.cooldown_ms = Some(1000.0 / self.spec.shots_per_second),
                Some(ref mut remaining) => {
                    *remaining -= delta_ms;
                    if *remaining <= 0.0 {
                        self.state.can_fire = true;
                        self.state.cooldown_ms = None;
                    }
                }
            }
        }
    }

    /// Record a resolved (non-voided) shot
    pub fn mark_fired(&mut self) {
        self.state.can_fire = false;
        self.state.rounds_fired += 1;
        if let Some(ref mut ammo) = self.state.ammo_remaining {
            *ammo = ammo.saturating_sub(1);
        }
    }

    /// Voided shot (friendly fire, target gone): back to ready with no
    /// ammo cost and no cooldown penalty.
    pub fn reset_ready(&mut self) {
        if self.is_disabled() {
            return;
        }
        self.state.can_fire = true;
        self.state.cooldown_ms = None;
    }
}
