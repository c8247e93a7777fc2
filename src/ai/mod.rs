//! Tactical AI - per-unit decision state machine
//!
//! Every tick, each living unit refreshes its tactical role, re-evaluates
//! its target, and issues movement or attack orders, in that fixed order.

pub mod decision;
pub mod role;
pub mod state;

pub use decision::update_ai;
pub use role::advance_probability;
pub use state::{AiState, Role, TacticalRole};
