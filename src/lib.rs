//! Mudfront - small-unit trench combat simulation engine
//!
//! Simulates infantry combat on a discretized battlefield: movement,
//! line-of-sight ballistics, suppression and morale, cover, and per-unit
//! tactical decision making. Presentation, input handling, and map
//! generation are external collaborators; the engine consumes a finished
//! terrain grid and a spawn roster, and emits discrete combat events.

pub mod ai;
pub mod combat;
pub mod core;
pub mod map;
pub mod path;
pub mod sim;
pub mod unit;
