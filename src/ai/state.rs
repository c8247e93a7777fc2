//! Per-unit AI scratch state

use serde::{Deserialize, Serialize};

use crate::core::types::UnitId;

/// What an attacker is currently trying to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Role {
    /// Hold position and shoot
    #[default]
    Fire,
    /// Push toward the objective
    Advance,
}

/// Role plus its resample clock. Attackers re-roll the role when the
/// clock runs out; defenders keep the default Fire role forever.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TacticalRole {
    pub role: Role,
    pub time_since_change_ms: f32,
    pub change_interval_ms: f32,
}

impl Default for TacticalRole {
    fn default() -> Self {
        Self {
            role: Role::Fire,
            time_since_change_ms: 0.0,
            change_interval_ms: 3000.0,
        }
    }
}

/// Decision state carried on every unit. Reset wholesale on death.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AiState {
    /// Weak handle - resolved through the roster every use, never dangling
    pub target: Option<UnitId>,
    pub is_moving: bool,
    pub is_attacking: bool,
    /// A path request is in flight; no second request until it lands
    pub is_calculating_path: bool,
    pub role: TacticalRole,
    /// Remaining aim delay before the pending shot resolves
    pub aim_timer_ms: Option<f32>,
    /// Weapon slot locked in for the pending shot
    pub pending_weapon: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_role_is_fire() {
        let state = AiState::default();
        assert_eq!(state.role.role, Role::Fire);
        assert!(state.target.is_none());
        assert!(state.aim_timer_ms.is_none());
    }
}
