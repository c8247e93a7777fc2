//! Simulation configuration
//!
//! Run-level knobs for the headless runner and scenario builders. Combat
//! tuning constants live in `combat::constants`; these values describe the
//! shape of a run, not the physics of a shot.

use serde::{Deserialize, Serialize};

use crate::core::error::Result;

/// Configuration for a simulation run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Battlefield width in tiles
    pub map_width: usize,

    /// Battlefield height in tiles
    pub map_height: usize,

    /// Simulated milliseconds per tick
    ///
    /// The engine is delta-driven, so this only fixes the resolution of a
    /// headless run. 100ms keeps aim timers and cooldowns meaningful without
    /// burning ticks.
    pub tick_ms: f32,

    /// Ticks before a run is called a draw
    pub max_ticks: u64,

    /// Attacking units spawned by the default scenario
    pub attacker_count: usize,

    /// Defending units spawned by the default scenario
    pub defender_count: usize,

    /// Fraction of spawns that are machine-gun teams rather than riflemen
    pub mg_ratio: f64,

    /// RNG seed; absent means "pick one at startup"
    pub seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            map_width: 40,
            map_height: 80,
            tick_ms: 100.0,
            max_ticks: 6000,
            attacker_count: 20,
            defender_count: 16,
            mg_ratio: 0.05,
            seed: None,
        }
    }
}

impl SimConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &std::path::Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_sane() {
        let config = SimConfig::default();
        assert!(config.map_width > 0 && config.map_height > 0);
        assert!(config.tick_ms > 0.0);
        assert!(config.mg_ratio < 1.0);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: SimConfig = toml::from_str("map_width = 64\nseed = 7").unwrap();
        assert_eq!(config.map_width, 64);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.map_height, SimConfig::default().map_height);
    }
}
