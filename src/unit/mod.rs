//! Units - the central mutable entities of the simulation

pub mod loadout;
pub mod roster;
pub mod unit;

pub use loadout::UnitLoadout;
pub use roster::Roster;
pub use unit::Unit;
