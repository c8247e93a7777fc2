//! Simulation shell - world state, tick loop, commands, scenarios

pub mod command;
pub mod events;
pub mod scenario;
pub mod tick;
pub mod world;

pub use events::SimEvent;
pub use scenario::Scenario;
pub use tick::run_tick;
pub use world::SimulationWorld;
