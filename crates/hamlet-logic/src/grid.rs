//! The tile grid — row-major storage with bounds-safe access and the
//! diamond (Von Neumann) scans agents use for view-range searches.

use serde::{Deserialize, Serialize};

use crate::geometry::{GridPos, Vec2};
use crate::tile::{Tile, TileKind};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TileGrid {
    width: i32,
    height: i32,
    tiles: Vec<Tile>,
    /// Returned for every out-of-bounds lookup.
    oob: Tile,
}

impl TileGrid {
    /// Uniform grid of one tile kind.
    pub fn filled(width: i32, height: i32, kind: TileKind) -> Self {
        assert!(width > 0 && height > 0, "grid dimensions must be positive");
        Self {
            width,
            height,
            tiles: vec![Tile::of(kind); (width * height) as usize],
            oob: Tile::out_of_bounds(),
        }
    }

    /// Grid produced by a generator function, e.g. a terrain source.
    pub fn from_fn(width: i32, height: i32, mut f: impl FnMut(GridPos) -> Tile) -> Self {
        let mut grid = Self::filled(width, height, TileKind::Grass);
        for y in 0..height {
            for x in 0..width {
                let pos = GridPos::new(x, y);
                grid.set(pos, f(pos));
            }
        }
        grid
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn in_bounds(&self, pos: GridPos) -> bool {
        pos.x >= 0 && pos.x < self.width && pos.y >= 0 && pos.y < self.height
    }

    /// Tile at a grid coordinate. Out-of-bounds yields an impassable
    /// placeholder rather than panicking.
    pub fn tile_at(&self, pos: GridPos) -> &Tile {
        if self.in_bounds(pos) {
            &self.tiles[(pos.y * self.width + pos.x) as usize]
        } else {
            &self.oob
        }
    }

    /// Tile under a world position.
    pub fn tile_at_world(&self, pos: Vec2) -> &Tile {
        self.tile_at(GridPos::of_world(pos))
    }

    /// Replace a tile's descriptor. Out-of-bounds writes are ignored.
    pub fn set(&mut self, pos: GridPos, tile: Tile) {
        if self.in_bounds(pos) {
            self.tiles[(pos.y * self.width + pos.x) as usize] = tile;
        }
    }

    /// Up to 8 in-bounds neighbors of a coordinate.
    pub fn neighbors(&self, pos: GridPos) -> Vec<GridPos> {
        let mut out = Vec::with_capacity(8);
        for dy in -1..=1 {
            for dx in -1..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let n = GridPos::new(pos.x + dx, pos.y + dy);
                if self.in_bounds(n) {
                    out.push(n);
                }
            }
        }
        out
    }

    /// Von Neumann diamond around `center` out to `radius`, nearest ring
    /// first, center excluded. Only in-bounds coordinates are yielded.
    pub fn diamond(&self, center: GridPos, radius: i32) -> Vec<GridPos> {
        let mut out = Vec::new();
        for r in 1..=radius {
            for dx in -r..=r {
                let rem = r - dx.abs();
                let candidates = if rem == 0 { [0, 0] } else { [-rem, rem] };
                let take = if rem == 0 { 1 } else { 2 };
                for dy in candidates.into_iter().take(take) {
                    let pos = GridPos::new(center.x + dx, center.y + dy);
                    if self.in_bounds(pos) {
                        out.push(pos);
                    }
                }
            }
        }
        out
    }

    /// Nearest tile within `radius` (diamond metric) matching a predicate.
    pub fn find_near(
        &self,
        center: GridPos,
        radius: i32,
        pred: impl Fn(&Tile) -> bool,
    ) -> Option<GridPos> {
        if pred(self.tile_at(center)) {
            return Some(center);
        }
        self.diamond(center, radius)
            .into_iter()
            .find(|pos| pred(self.tile_at(*pos)))
    }

    /// Nearest tile of one specific kind within view range.
    pub fn find_kind_near(&self, center: GridPos, radius: i32, kind: TileKind) -> Option<GridPos> {
        self.find_near(center, radius, |t| t.kind == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_bounds_lookup() {
        let grid = TileGrid::filled(4, 4, TileKind::Grass);
        assert!(grid.tile_at(GridPos::new(2, 2)).walkable);
        assert!(!grid.tile_at(GridPos::new(-1, 0)).walkable);
        assert!(!grid.tile_at(GridPos::new(4, 0)).walkable);
        assert!(!grid.tile_at(GridPos::new(0, 100)).buildable);
    }

    #[test]
    fn test_set_and_get() {
        let mut grid = TileGrid::filled(4, 4, TileKind::Grass);
        grid.set(GridPos::new(1, 2), Tile::of(TileKind::Soil));
        assert_eq!(grid.tile_at(GridPos::new(1, 2)).kind, TileKind::Soil);
        // out-of-bounds write is a no-op
        grid.set(GridPos::new(-1, -1), Tile::of(TileKind::Soil));
        assert_eq!(grid.tile_at(GridPos::new(0, 0)).kind, TileKind::Grass);
    }

    #[test]
    fn test_neighbors_clip_at_edges() {
        let grid = TileGrid::filled(4, 4, TileKind::Grass);
        assert_eq!(grid.neighbors(GridPos::new(0, 0)).len(), 3);
        assert_eq!(grid.neighbors(GridPos::new(1, 0)).len(), 5);
        assert_eq!(grid.neighbors(GridPos::new(2, 2)).len(), 8);
    }

    #[test]
    fn test_diamond_is_nearest_first() {
        let grid = TileGrid::filled(9, 9, TileKind::Grass);
        let center = GridPos::new(4, 4);
        let cells = grid.diamond(center, 2);
        // ring 1 has 4 cells, ring 2 has 8
        assert_eq!(cells.len(), 12);
        assert!(cells[..4].iter().all(|c| c.manhattan(&center) == 1));
        assert!(cells[4..].iter().all(|c| c.manhattan(&center) == 2));
    }

    #[test]
    fn test_find_kind_near_prefers_closest() {
        let mut grid = TileGrid::filled(9, 9, TileKind::Grass);
        let center = GridPos::new(4, 4);
        grid.set(GridPos::new(4, 6), Tile::of(TileKind::Tree));
        grid.set(GridPos::new(4, 5), Tile::of(TileKind::Tree));
        let found = grid.find_kind_near(center, 3, TileKind::Tree);
        assert_eq!(found, Some(GridPos::new(4, 5)));
        assert_eq!(grid.find_kind_near(center, 3, TileKind::Snow), None);
    }
}
