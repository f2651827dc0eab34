//! Weighted navigation graph over the tile grid, and A* search on it.
//!
//! Nodes exist only for walkable tiles; an impassable tile simply has no
//! node rather than an infinite-cost one. Edge weights average the two
//! endpoint costs: `0.5·(a+b)` along an axis, `0.707·(a+b)` diagonally.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use crate::geometry::{GridPos, Vec2};
use crate::grid::TileGrid;

const DIAGONAL_FACTOR: f32 = 0.707;
const AXIS_FACTOR: f32 = 0.5;

#[derive(Debug, Clone, Default)]
pub struct NavGraph {
    edges: HashMap<GridPos, Vec<(GridPos, f32)>>,
}

impl NavGraph {
    /// Derive the full graph from the current grid. O(tiles) — call after
    /// building placement or batch terrain changes, never per tick.
    pub fn build(grid: &TileGrid) -> Self {
        let mut edges = HashMap::new();
        for y in 0..grid.height() {
            for x in 0..grid.width() {
                let pos = GridPos::new(x, y);
                let tile = grid.tile_at(pos);
                if !tile.walkable {
                    continue;
                }
                let mut adj = Vec::with_capacity(8);
                for n in grid.neighbors(pos) {
                    let other = grid.tile_at(n);
                    if !other.walkable {
                        continue;
                    }
                    let factor = if n.x != pos.x && n.y != pos.y {
                        DIAGONAL_FACTOR
                    } else {
                        AXIS_FACTOR
                    };
                    adj.push((n, factor * (tile.cost + other.cost)));
                }
                edges.insert(pos, adj);
            }
        }
        Self { edges }
    }

    pub fn contains(&self, pos: GridPos) -> bool {
        self.edges.contains_key(&pos)
    }

    pub fn edges_from(&self, pos: GridPos) -> &[(GridPos, f32)] {
        self.edges.get(&pos).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn node_count(&self) -> usize {
        self.edges.len()
    }
}

/// Open-set entry ordered so the binary heap pops the lowest f-score.
#[derive(PartialEq)]
struct Open {
    f: f32,
    node: GridPos,
}

impl Eq for Open {}

impl Ord for Open {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f
            .partial_cmp(&self.f)
            .unwrap_or(Ordering::Equal)
            .then_with(|| self.node.cmp(&other.node))
    }
}

impl PartialOrd for Open {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A* over the graph. Returns the grid path with the start node dropped
/// (the caller is already there). Empty result means either start == goal
/// (nothing to do) or the goal is unreachable — callers treat both as
/// "proceed without a path", never as an error.
pub fn astar(graph: &NavGraph, start: GridPos, goal: GridPos) -> Vec<GridPos> {
    if start == goal || !graph.contains(start) || !graph.contains(goal) {
        return Vec::new();
    }

    let mut open = BinaryHeap::new();
    let mut came_from: HashMap<GridPos, GridPos> = HashMap::new();
    let mut g_score: HashMap<GridPos, f32> = HashMap::new();

    g_score.insert(start, 0.0);
    open.push(Open {
        f: start.manhattan(&goal) as f32,
        node: start,
    });

    while let Some(Open { node, .. }) = open.pop() {
        if node == goal {
            let mut path = vec![node];
            let mut cur = node;
            while let Some(prev) = came_from.get(&cur) {
                cur = *prev;
                if cur != start {
                    path.push(cur);
                }
            }
            path.reverse();
            return path;
        }

        let node_g = g_score.get(&node).copied().unwrap_or(f32::INFINITY);
        for (next, weight) in graph.edges_from(node) {
            let tentative = node_g + weight;
            if tentative < g_score.get(next).copied().unwrap_or(f32::INFINITY) {
                came_from.insert(*next, node);
                g_score.insert(*next, tentative);
                open.push(Open {
                    f: tentative + next.manhattan(&goal) as f32,
                    node: *next,
                });
            }
        }
    }

    Vec::new()
}

/// A* between two world positions, as tile-center waypoints.
pub fn find_path(graph: &NavGraph, start: Vec2, goal: Vec2) -> Vec<Vec2> {
    astar(graph, GridPos::of_world(start), GridPos::of_world(goal))
        .into_iter()
        .map(|p| p.center())
        .collect()
}
