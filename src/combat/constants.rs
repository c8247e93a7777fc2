//! Combat tuning constants - all tunable values in one place

// Units
pub const UNIT_SIZE: f32 = 24.0; // bounding box edge, world units
pub const WAYPOINT_EPSILON: f32 = 2.0; // close enough to pop a waypoint
pub const DEFAULT_UNIT_SPEED: f32 = 120.0; // world units per second
pub const MG_TEAM_SPEED: f32 = 100.0;

// Morale thresholds - stance degrades as morale falls through these
pub const CROUCH_THRESHOLD: f32 = 75.0;
pub const PRONE_THRESHOLD: f32 = 50.0;
pub const SUPPRESSED_THRESHOLD: f32 = 30.0;

// Morale dynamics
pub const MORALE_MAX: f32 = 100.0;
pub const MORALE_REGEN_PER_SEC: f32 = 1.0;
pub const KILL_MORALE_BONUS: f32 = 5.0;

// Near misses
pub const NEAR_MISS_THRESHOLD: f32 = 70.0; // world units from the traced line
pub const NEAR_MISS_MAX_LOSS: f32 = 12.0;
pub const NEAR_MISS_FALLOFF: f32 = 5.0; // loss shed across the full threshold
pub const TRENCH_MORALE_RELIEF: f32 = 5.0;
pub const CRATER_MORALE_RELIEF: f32 = 2.0;

// Accuracy cone
pub const BASE_SPREAD_DEG: f32 = 60.0;
pub const MOVING_SPREAD_MULTIPLIER: f32 = 2.0;

// Aiming
pub const BASE_AIM_SECONDS: f32 = 0.1;

// Reloads (ms)
pub const RELOAD_MS_HMG: f32 = 14_000.0;
pub const RELOAD_MS_LMG: f32 = 12_000.0;
pub const RELOAD_MS_PISTOL: f32 = 6_000.0;
pub const RELOAD_MS_DEFAULT: f32 = 8_000.0;

// Explosions
pub const GRENADE_BLAST_RANGE: f32 = 120.0;
pub const GRENADE_BLAST_LINES: usize = 12;
pub const ARTILLERY_BLAST_LINES: usize = 25;
pub const ARTILLERY_LETHALITY: f32 = 0.9;
pub const EXPLOSION_CLIP_STEP: f32 = 4.0; // sample points per world unit of range

// AI
pub const ROLE_INTERVAL_MIN_MS: f32 = 2000.0;
pub const ROLE_INTERVAL_MAX_MS: f32 = 4000.0;
pub const ALLY_SUPPORT_RADIUS_TILES: f32 = 5.0;
pub const ATTACK_OBJECTIVE_MARGIN: i32 = 5; // rows short of the far map edge

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thresholds_ordered() {
        assert!(SUPPRESSED_THRESHOLD < PRONE_THRESHOLD);
        assert!(PRONE_THRESHOLD < CROUCH_THRESHOLD);
        assert!(CROUCH_THRESHOLD < MORALE_MAX);
    }

    #[test]
    fn test_reloads_rank_by_weight() {
        assert!(RELOAD_MS_HMG > RELOAD_MS_LMG);
        assert!(RELOAD_MS_LMG > RELOAD_MS_DEFAULT);
        assert!(RELOAD_MS_DEFAULT > RELOAD_MS_PISTOL);
    }
}
