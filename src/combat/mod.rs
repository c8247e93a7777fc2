//! Combat resolution - weapons, ballistics, morale, and area effects
//!
//! Resolution functions are pure where possible: they read the roster and
//! grid, return a result struct, and the caller applies the effects.

pub mod ballistics;
pub mod constants;
pub mod explosion;
pub mod morale;
pub mod skill;
pub mod weapon;

pub use ballistics::{aim_line, trace_shot, NearMiss, PrimaryHit, Segment, ShotTrace};
pub use constants::*;
pub use explosion::{fire_artillery_strike, generate_explosion};
pub use morale::{cover_bonus, near_miss_morale_loss, stance_for, Stance};
pub use skill::SkillLevel;
pub use weapon::{FireState, Weapon, WeaponKind, WeaponSpec};
