pub mod config;
pub mod error;
pub mod types;

pub use config::SimConfig;
pub use error::{Result, SimError};
pub use types::{GridPos, Team, Tick, UnitId, Vec2};
