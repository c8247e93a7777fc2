//! Cost-weighted pathfinding
//!
//! A* over the merged terrain costs, served by a worker thread so the
//! simulation tick never blocks on a search.

pub mod astar;
pub mod service;

pub use astar::{find_path, CostGrid};
pub use service::{PathRequest, PathResult, PathService};
