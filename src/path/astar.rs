//! A* pathfinding over terrain movement costs
//!
//! Diagonal moves are allowed but may not cut corners: both orthogonal
//! neighbors of a diagonal step must be traversable.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::core::types::GridPos;
use crate::map::grid::TerrainGrid;

const SQRT_2: f32 = std::f32::consts::SQRT_2;

/// Flat snapshot of per-cell traversal costs, derived from the merged grid.
/// The path worker owns one and re-syncs it when terrain mutates.
#[derive(Debug, Clone)]
pub struct CostGrid {
    width: usize,
    height: usize,
    cost: Vec<f32>,
    walkable: Vec<bool>,
}

impl CostGrid {
    pub fn from_grid(grid: &TerrainGrid) -> Self {
        let (width, height) = (grid.width(), grid.height());
        let mut cost = vec![f32::INFINITY; width * height];
        let mut walkable = vec![false; width * height];
        for y in 0..height {
            for x in 0..width {
                let pos = GridPos::new(x as i32, y as i32);
                if let Some(tile) = grid.tile_at(pos) {
                    cost[y * width + x] = tile.movement_cost();
                    walkable[y * width + x] = tile.walkable();
                }
            }
        }
        Self {
            width,
            height,
            cost,
            walkable,
        }
    }

    fn index(&self, pos: GridPos) -> Option<usize> {
        if pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.width && (pos.y as usize) < self.height
        {
            Some(pos.y as usize * self.width + pos.x as usize)
        } else {
            None
        }
    }

    pub fn is_walkable(&self, pos: GridPos) -> bool {
        self.index(pos).is_some_and(|i| self.walkable[i])
    }

    pub fn cost(&self, pos: GridPos) -> Option<f32> {
        let idx = self.index(pos)?;
        if self.walkable[idx] {
            Some(self.cost[idx])
        } else {
            None
        }
    }

    /// Re-derive one cell after a terrain mutation (crater placement)
    pub fn sync_cell(&mut self, pos: GridPos, grid_tile: Option<crate::map::tile::TileKind>) {
        if let Some(idx) = self.index(pos) {
            match grid_tile {
                Some(tile) => {
                    self.cost[idx] = tile.movement_cost();
                    self.walkable[idx] = tile.walkable();
                }
                None => {
                    self.cost[idx] = f32::INFINITY;
                    self.walkable[idx] = false;
                }
            }
        }
    }
}

/// Node in the A* open set
#[derive(Debug, Clone)]
struct PathNode {
    pos: GridPos,
    f_cost: f32, // g_cost + heuristic
}

impl PartialEq for PathNode {
    fn eq(&self, other: &Self) -> bool {
        self.pos == other.pos
    }
}

impl Eq for PathNode {}

impl Ord for PathNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse order for min-heap
        other
            .f_cost
            .partial_cmp(&self.f_cost)
            .unwrap_or(Ordering::Equal)
    }
}

impl PartialOrd for PathNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Octile distance - admissible with unit minimum step cost
fn heuristic(a: GridPos, b: GridPos) -> f32 {
    let dx = (a.x - b.x).abs() as f32;
    let dy = (a.y - b.y).abs() as f32;
    dx.max(dy) + (SQRT_2 - 1.0) * dx.min(dy)
}

/// Find a path between two cells using A*
///
/// Returns None when no route exists; the caller treats that as
/// "objective unreachable, retry later", never as a fatal error.
pub fn find_path(costs: &CostGrid, start: GridPos, goal: GridPos) -> Option<Vec<GridPos>> {
    if !costs.is_walkable(start) || !costs.is_walkable(goal) {
        return None;
    }
    if start == goal {
        return Some(vec![start]);
    }

    let mut open_set = BinaryHeap::new();
    let mut came_from: ahash::AHashMap<GridPos, GridPos> = ahash::AHashMap::new();
    let mut g_scores: ahash::AHashMap<GridPos, f32> = ahash::AHashMap::new();

    g_scores.insert(start, 0.0);
    open_set.push(PathNode {
        pos: start,
        f_cost: heuristic(start, goal),
    });

    while let Some(current) = open_set.pop() {
        if current.pos == goal {
            return Some(reconstruct_path(&came_from, current.pos));
        }

        let current_g = *g_scores.get(&current.pos).unwrap_or(&f32::INFINITY);

        for dy in -1..=1i32 {
            for dx in -1..=1i32 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let neighbor = GridPos::new(current.pos.x + dx, current.pos.y + dy);
                let Some(step_cost) = costs.cost(neighbor) else {
                    continue;
                };

                let diagonal = dx != 0 && dy != 0;
                if diagonal {
                    // No corner cutting: both orthogonal neighbors must be open
                    let side_a = GridPos::new(current.pos.x + dx, current.pos.y);
                    let side_b = GridPos::new(current.pos.x, current.pos.y + dy);
                    if !costs.is_walkable(side_a) || !costs.is_walkable(side_b) {
                        continue;
                    }
                }

                let move_cost = if diagonal { step_cost * SQRT_2 } else { step_cost };
                let tentative_g = current_g + move_cost;
                let neighbor_g = *g_scores.get(&neighbor).unwrap_or(&f32::INFINITY);

                if tentative_g < neighbor_g {
                    came_from.insert(neighbor, current.pos);
                    g_scores.insert(neighbor, tentative_g);
                    open_set.push(PathNode {
                        pos: neighbor,
                        f_cost: tentative_g + heuristic(neighbor, goal),
                    });
                }
            }
        }
    }

    None
}

fn reconstruct_path(came_from: &ahash::AHashMap<GridPos, GridPos>, end: GridPos) -> Vec<GridPos> {
    let mut path = vec![end];
    let mut current = end;
    while let Some(&prev) = came_from.get(&current) {
        path.push(prev);
        current = prev;
    }
    path.reverse();
    path
}
