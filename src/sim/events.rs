//! Simulation events, emitted per tick
//!
//! Events are the presentation seam: the engine mutates state and
//! reports what happened; renderers and logs consume the stream.

use serde::Serialize;

use crate::core::types::{GridPos, UnitId, Vec2};

#[derive(Debug, Clone, Serialize)]
pub enum SimEvent {
    ShotFired {
        shooter: UnitId,
        from: Vec2,
        to: Vec2,
    },
    UnitDied {
        unit: UnitId,
        at: Vec2,
    },
    ExplosionAt {
        center: Vec2,
        blast_range: f32,
    },
    CraterFormed {
        cell: GridPos,
    },
    /// A path request came back unreachable; the unit retries later
    PathFailed {
        unit: UnitId,
    },
}
