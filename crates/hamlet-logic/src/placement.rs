//! Construction decisions — what to build next and where to put it.
//!
//! The decision ladder compares each stock against its capacity at a
//! utilization threshold; footprint search walks square rings of 8×8-tile
//! blocks outward from the village block. Village founding scores blocks
//! the same way before the first tick.

use crate::building::BuildingKind;
use crate::geometry::GridPos;
use crate::grid::TileGrid;
use crate::tile::TileKind;

/// Tiles per search block; lot scans stay inside one block.
pub const BLOCK_SIZE: i32 = 8;

/// Current stocks and ceilings, flattened for the decision ladder.
#[derive(Debug, Clone, Default)]
pub struct UtilizationInput {
    pub population: u32,
    pub population_cap: u32,
    pub wood: u32,
    pub wood_cap: u32,
    pub stone: u32,
    pub stone_cap: u32,
    pub fish: u32,
    pub fish_cap: u32,
    pub crop: u32,
    pub crop_cap: u32,
}

fn ratio(value: u32, cap: u32) -> f32 {
    if cap == 0 {
        0.0
    } else {
        value as f32 / cap as f32
    }
}

/// Pick the next building to queue, in fixed priority order: housing
/// before fish, stone, crop, and wood storage. `None` when nothing is
/// near its ceiling.
pub fn next_building(input: &UtilizationInput, threshold: f32) -> Option<BuildingKind> {
    if ratio(input.population, input.population_cap) >= threshold {
        Some(BuildingKind::Manor)
    } else if ratio(input.fish, input.fish_cap) >= threshold {
        Some(BuildingKind::FishMarket)
    } else if ratio(input.stone, input.stone_cap) >= threshold {
        Some(BuildingKind::Stonework)
    } else if ratio(input.crop, input.crop_cap) >= threshold {
        Some(BuildingKind::Barn)
    } else if ratio(input.wood, input.wood_cap) >= threshold {
        Some(BuildingKind::LumberYard)
    } else {
        None
    }
}

/// A footprint already promised to a queued request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReservedLot {
    pub origin: GridPos,
    pub size: (i32, i32),
}

fn footprints_overlap(a_origin: GridPos, a_size: (i32, i32), b: &ReservedLot) -> bool {
    a_origin.x < b.origin.x + b.size.0
        && b.origin.x < a_origin.x + a_size.0
        && a_origin.y < b.origin.y + b.size.1
        && b.origin.y < a_origin.y + a_size.1
}

/// Scan one 8×8 block for a size-aligned, fully buildable lot that does
/// not touch any reserved footprint.
fn scan_block(
    grid: &TileGrid,
    block_origin: GridPos,
    size: (i32, i32),
    reserved: &[ReservedLot],
) -> Option<GridPos> {
    for y in 0..BLOCK_SIZE {
        for x in 0..BLOCK_SIZE {
            if x % size.0 != 0 || y % size.1 != 0 {
                continue;
            }
            let origin = GridPos::new(block_origin.x + x, block_origin.y + y);
            let mut buildable = true;
            'lot: for dy in 0..size.1 {
                for dx in 0..size.0 {
                    let pos = GridPos::new(origin.x + dx, origin.y + dy);
                    if !grid.in_bounds(pos) || !grid.tile_at(pos).buildable {
                        buildable = false;
                        break 'lot;
                    }
                }
            }
            if buildable && !reserved.iter().any(|r| footprints_overlap(origin, size, r)) {
                return Some(origin);
            }
        }
    }
    None
}

/// Block origins forming the square ring at `radius` blocks around the
/// village block. Radius 0 is the village block itself.
fn ring_blocks(grid: &TileGrid, village_block: GridPos, radius: i32) -> Vec<GridPos> {
    let mut out = Vec::new();
    let mut push = |pos: GridPos| {
        let fits = pos.x >= 0
            && pos.y >= 0
            && pos.x + BLOCK_SIZE <= grid.width()
            && pos.y + BLOCK_SIZE <= grid.height();
        if fits && !out.contains(&pos) {
            out.push(pos);
        }
    };
    if radius == 0 {
        push(village_block);
        return out;
    }
    for dx in -radius..=radius {
        let x = village_block.x + dx * BLOCK_SIZE;
        push(GridPos::new(x, village_block.y - radius * BLOCK_SIZE));
        push(GridPos::new(x, village_block.y + radius * BLOCK_SIZE));
    }
    for dy in (-radius + 1)..radius {
        let y = village_block.y + dy * BLOCK_SIZE;
        push(GridPos::new(village_block.x - radius * BLOCK_SIZE, y));
        push(GridPos::new(village_block.x + radius * BLOCK_SIZE, y));
    }
    out
}

/// Find a legal footprint for `kind`, expanding ring by ring from the
/// village block. `None` means the whole map is exhausted; the caller
/// retries on a later evaluation.
pub fn find_lot(
    grid: &TileGrid,
    village_block: GridPos,
    kind: BuildingKind,
    reserved: &[ReservedLot],
) -> Option<GridPos> {
    let size = kind.spec().size;
    let max_radius = grid.width().max(grid.height()) / BLOCK_SIZE + 1;
    for radius in 0..=max_radius {
        for block in ring_blocks(grid, village_block, radius) {
            if let Some(origin) = scan_block(grid, block, size, reserved) {
                return Some(origin);
            }
        }
    }
    None
}

/// Per-block counts used for village founding.
#[derive(Debug, Clone, Copy, Default)]
struct BlockScore {
    arable: u32,
    water: u32,
    lots: u32,
}

fn score_block(grid: &TileGrid, origin: GridPos) -> BlockScore {
    let mut score = BlockScore::default();
    for y in 0..BLOCK_SIZE {
        for x in 0..BLOCK_SIZE {
            let pos = GridPos::new(origin.x + x, origin.y + y);
            let tile = grid.tile_at(pos);
            match tile.kind {
                TileKind::Grass | TileKind::Tree | TileKind::Sapling => score.arable += 1,
                TileKind::Water => score.water += 1,
                _ => {}
            }
            if x % 2 == 0 && y % 2 == 0 {
                let lot_ok = (0..2).all(|dy| {
                    (0..2).all(|dx| {
                        grid.tile_at(GridPos::new(pos.x + dx, pos.y + dy)).buildable
                    })
                });
                if lot_ok {
                    score.lots += 1;
                }
            }
        }
    }
    score
}

/// Score every 8×8 block and pick a founding site: a block with more than
/// 5 buildable 2×2 lots whose eight neighbors together hold ample arable
/// land (> 160 tiles) and nearby water (> 16 tiles). Returns the median
/// qualifying block's origin, or `None` when the map offers none.
pub fn find_village_site(grid: &TileGrid) -> Option<GridPos> {
    let blocks_x = grid.width() / BLOCK_SIZE;
    let blocks_y = grid.height() / BLOCK_SIZE;
    if blocks_x == 0 || blocks_y == 0 {
        return None;
    }

    let mut scores = vec![vec![BlockScore::default(); blocks_x as usize]; blocks_y as usize];
    let mut suitable = Vec::new();
    for by in 0..blocks_y {
        for bx in 0..blocks_x {
            let origin = GridPos::new(bx * BLOCK_SIZE, by * BLOCK_SIZE);
            let score = score_block(grid, origin);
            if score.lots > 5 {
                suitable.push(GridPos::new(bx, by));
            }
            scores[by as usize][bx as usize] = score;
        }
    }

    let mut best = Vec::new();
    for block in &suitable {
        // interior blocks only: the neighborhood sum needs all 8 neighbors
        if block.x == 0 || block.y == 0 || block.x == blocks_x - 1 || block.y == blocks_y - 1 {
            continue;
        }
        let mut arable = 0;
        let mut water = 0;
        for dy in -1..=1 {
            for dx in -1..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let s = scores[(block.y + dy) as usize][(block.x + dx) as usize];
                arable += s.arable;
                water += s.water;
            }
        }
        if arable > 160 && water > 16 {
            best.push(*block);
        }
    }

    let pick = if !best.is_empty() {
        best[best.len() / 2]
    } else if !suitable.is_empty() {
        suitable[suitable.len() / 2]
    } else {
        return None;
    };
    Some(GridPos::new(pick.x * BLOCK_SIZE, pick.y * BLOCK_SIZE))
}
