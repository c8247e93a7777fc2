//! Asynchronous path computation service
//!
//! A single worker thread owns a private cost grid and serves search
//! requests over channels. The simulation posts requests during its AI
//! pass and drains results once per tick at the tick boundary, so path
//! delivery never mutates unit state mid-tick.
//!
//! Terrain mutations are forwarded as sync messages; because the channel
//! is ordered, a search issued after a crater always sees the crater.

use std::sync::mpsc::{channel, Receiver, Sender, TryRecvError};
use std::thread::JoinHandle;

use crate::core::types::{GridPos, UnitId};
use crate::map::grid::TerrainGrid;
use crate::map::tile::TileKind;
use crate::path::astar::{find_path, CostGrid};

/// A pending search for one unit
#[derive(Debug, Clone)]
pub struct PathRequest {
    pub unit: UnitId,
    pub start: GridPos,
    pub goal: GridPos,
}

/// Completed search. `path` is None when the goal is unreachable;
/// the requesting unit retries later with a fresh objective.
#[derive(Debug, Clone)]
pub struct PathResult {
    pub unit: UnitId,
    pub path: Option<Vec<GridPos>>,
}

enum WorkerMsg {
    Request(PathRequest),
    SyncCell { pos: GridPos, tile: Option<TileKind> },
}

/// Handle to the path worker thread
pub struct PathService {
    tx: Option<Sender<WorkerMsg>>,
    rx: Receiver<PathResult>,
    worker: Option<JoinHandle<()>>,
}

impl PathService {
    pub fn new(grid: &TerrainGrid) -> Self {
        let costs = CostGrid::from_grid(grid);
        let (tx, worker_rx) = channel::<WorkerMsg>();
        let (result_tx, rx) = channel::<PathResult>();

        let worker = std::thread::Builder::new()
            .name("path-worker".into())
            .spawn(move || worker_loop(costs, worker_rx, result_tx))
            .expect("failed to spawn path worker");

        Self {
            tx: Some(tx),
            rx,
            worker: Some(worker),
        }
    }

    /// Queue a search. The caller is responsible for not issuing a second
    /// request for the same unit while one is in flight.
    pub fn request(&self, request: PathRequest) {
        if let Some(tx) = &self.tx {
            // A closed worker means results stop arriving; requesters keep
            // their current behavior and retry on their own schedule.
            if tx.send(WorkerMsg::Request(request)).is_err() {
                tracing::warn!("path worker unavailable, request dropped");
            }
        }
    }

    /// Forward a single-cell terrain mutation to the worker's cost grid
    pub fn sync_cell(&self, pos: GridPos, tile: Option<TileKind>) {
        if let Some(tx) = &self.tx {
            let _ = tx.send(WorkerMsg::SyncCell { pos, tile });
        }
    }

    /// Collect every result completed since the last call. Non-blocking;
    /// called once per tick at the tick boundary.
    pub fn drain_results(&self) -> Vec<PathResult> {
        let mut out = Vec::new();
        loop {
            match self.rx.try_recv() {
                Ok(result) => out.push(result),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        out
    }
}

impl Drop for PathService {
    fn drop(&mut self) {
        // Closing the request channel ends the worker loop
        self.tx.take();
        if let Some(handle) = self.worker.take() {
            let _ = handle.join();
        }
    }
}

fn worker_loop(mut costs: CostGrid, rx: Receiver<WorkerMsg>, tx: Sender<PathResult>) {
    while let Ok(msg) = rx.recv() {
        match msg {
            WorkerMsg::Request(req) => {
                let path = find_path(&costs, req.start, req.goal);
                if tx
                    .send(PathResult {
                        unit: req.unit,
                        path,
                    })
                    .is_err()
                {
                    // Simulation side gone; stop serving
                    break;
                }
            }
            WorkerMsg::SyncCell { pos, tile } => costs.sync_cell(pos, tile),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    fn wait_for_results(service: &PathService, n: usize) -> Vec<PathResult> {
        let deadline = Instant::now() + Duration::from_secs(5);
        let mut results = Vec::new();
        while results.len() < n && Instant::now() < deadline {
            results.extend(service.drain_results());
            std::thread::sleep(Duration::from_millis(5));
        }
        results
    }

    #[test]
    fn test_request_round_trip() {
        let grid = TerrainGrid::new(10, 10);
        let service = PathService::new(&grid);
        let unit = UnitId::new();

        service.request(PathRequest {
            unit,
            start: GridPos::new(0, 0),
            goal: GridPos::new(9, 9),
        });

        let results = wait_for_results(&service, 1);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].unit, unit);
        let path = results[0].path.as_ref().unwrap();
        assert_eq!(path.last(), Some(&GridPos::new(9, 9)));
    }

    #[test]
    fn test_unreachable_goal_delivers_none() {
        let grid = TerrainGrid::new(10, 10);
        let service = PathService::new(&grid);

        service.request(PathRequest {
            unit: UnitId::new(),
            start: GridPos::new(0, 0),
            goal: GridPos::new(50, 50),
        });

        let results = wait_for_results(&service, 1);
        assert_eq!(results.len(), 1);
        assert!(results[0].path.is_none());
    }

    #[test]
    fn test_sync_is_ordered_before_later_requests() {
        let grid = TerrainGrid::new(10, 10);
        let service = PathService::new(&grid);

        // Wall off the right half, then ask for a path across it
        for y in 0..10 {
            service.sync_cell(GridPos::new(5, y), None);
        }
        service.request(PathRequest {
            unit: UnitId::new(),
            start: GridPos::new(0, 0),
            goal: GridPos::new(9, 0),
        });

        let results = wait_for_results(&service, 1);
        assert!(results[0].path.is_none());
    }
}
