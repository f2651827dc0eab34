//! The shared village world: tile grid, navigation graph, resource
//! stocks, buildings, task queues, and the day clock. Passed explicitly
//! into every state hook as part of the [`crate::fsm::StateCtx`].

use std::collections::{HashMap, VecDeque};

use serde::Serialize;

use hamlet_logic::building::{BuildingKind, Resource};
use hamlet_logic::config::SimConfig;
use hamlet_logic::geometry::{GridPos, Vec2, TILE_SIZE};
use hamlet_logic::grid::TileGrid;
use hamlet_logic::nav::NavGraph;
use hamlet_logic::placement::{ReservedLot, UtilizationInput};
use hamlet_logic::tile::{Tile, TileKind};

use crate::agent::RoleKind;

pub type BuildingId = u32;

/// Simulation day clock. `time` wraps at the configured day length.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct Clock {
    pub time: f32,
    pub day: u32,
}

impl Clock {
    pub fn is_daytime(&self, config: &SimConfig) -> bool {
        self.time < config.daytime
    }
}

/// The four stocks with their capacity ceilings. Deposits saturate at
/// the cap — a counter never exceeds its ceiling.
#[derive(Debug, Clone, Serialize)]
pub struct Stockpile {
    wood: u32,
    wood_cap: u32,
    stone: u32,
    stone_cap: u32,
    fish: u32,
    fish_cap: u32,
    crop: u32,
    crop_cap: u32,
}

impl Stockpile {
    pub fn from_config(config: &SimConfig) -> Self {
        Self {
            wood: config.starting_wood.min(config.wood_capacity),
            wood_cap: config.wood_capacity,
            stone: config.starting_stone.min(config.stone_capacity),
            stone_cap: config.stone_capacity,
            fish: config.starting_fish.min(config.fish_capacity),
            fish_cap: config.fish_capacity,
            crop: config.starting_crop.min(config.crop_capacity),
            crop_cap: config.crop_capacity,
        }
    }

    pub fn get(&self, res: Resource) -> u32 {
        match res {
            Resource::Wood => self.wood,
            Resource::Stone => self.stone,
            Resource::Fish => self.fish,
            Resource::Crop => self.crop,
        }
    }

    pub fn cap(&self, res: Resource) -> u32 {
        match res {
            Resource::Wood => self.wood_cap,
            Resource::Stone => self.stone_cap,
            Resource::Fish => self.fish_cap,
            Resource::Crop => self.crop_cap,
        }
    }

    fn slot(&mut self, res: Resource) -> (&mut u32, u32) {
        match res {
            Resource::Wood => (&mut self.wood, self.wood_cap),
            Resource::Stone => (&mut self.stone, self.stone_cap),
            Resource::Fish => (&mut self.fish, self.fish_cap),
            Resource::Crop => (&mut self.crop, self.crop_cap),
        }
    }

    /// Deposit up to the capacity ceiling; returns what was actually
    /// stored (overflow is discarded).
    pub fn deposit(&mut self, res: Resource, amount: u32) -> u32 {
        let (value, cap) = self.slot(res);
        let stored = amount.min(cap.saturating_sub(*value));
        *value += stored;
        stored
    }

    /// Remove `amount` if fully available; false leaves the stock alone.
    pub fn try_debit(&mut self, res: Resource, amount: u32) -> bool {
        let (value, _) = self.slot(res);
        if *value >= amount {
            *value -= amount;
            true
        } else {
            false
        }
    }

    pub fn raise_cap(&mut self, res: Resource, by: u32) {
        match res {
            Resource::Wood => self.wood_cap += by,
            Resource::Stone => self.stone_cap += by,
            Resource::Fish => self.fish_cap += by,
            Resource::Crop => self.crop_cap += by,
        }
    }
}

/// A building standing in the world, possibly still under construction.
#[derive(Debug, Clone)]
pub struct Building {
    pub kind: BuildingKind,
    /// Footprint origin in tile coordinates.
    pub origin: GridPos,
    /// Construction effort left; zero or below means ready to finalize.
    pub remaining: f32,
    pub finished: bool,
}

impl Building {
    /// Delivery/rest anchor: one tile diagonal in from the footprint
    /// origin (the center of a 2×2, the doorstep of a 1×1).
    pub fn anchor(&self) -> Vec2 {
        self.origin.corner() + Vec2::new(TILE_SIZE as f32, TILE_SIZE as f32)
    }
}

/// One queued construction request, placed but not yet (or currently
/// being) built.
#[derive(Debug, Clone)]
pub struct PendingBuild {
    pub id: u64,
    pub kind: BuildingKind,
    pub lot: GridPos,
    /// Builder owning the claim; later claimants become assistants.
    pub claimed_by: Option<hecs::Entity>,
    /// Set once the owner has started construction on site.
    pub building: Option<BuildingId>,
}

#[derive(Debug)]
pub struct Village {
    pub grid: TileGrid,
    pub graph: NavGraph,
    pub stocks: Stockpile,
    pub clock: Clock,
    pub population_cap: u32,
    /// Upper-left tile of the 8×8 block the village was founded on.
    pub village_block: GridPos,

    drop_offs: HashMap<Resource, Vec<Vec2>>,
    rest_places: Vec<Vec2>,

    /// Tiles in the farming rotation (soil, shoots, or mature crop).
    pub fields: Vec<GridPos>,
    pub sow_queue: VecDeque<GridPos>,
    pub water_queue: VecDeque<GridPos>,
    pub harvest_queue: VecDeque<GridPos>,

    pub known_fishing_spots: Vec<Vec2>,

    buildings: HashMap<BuildingId, Building>,
    next_building_id: BuildingId,
    pending: VecDeque<PendingBuild>,
    next_pending_id: u64,

    role_counts: HashMap<RoleKind, u32>,
}

impl Village {
    pub fn new(grid: TileGrid, config: &SimConfig) -> Self {
        let graph = NavGraph::build(&grid);
        let village_block = hamlet_logic::placement::find_village_site(&grid)
            .unwrap_or_else(|| {
                // barren map: fall back to the block nearest the center
                GridPos::new((grid.width() / 16) * 8, (grid.height() / 16) * 8)
            });
        Self {
            grid,
            graph,
            stocks: Stockpile::from_config(config),
            clock: Clock::default(),
            population_cap: config.population_capacity,
            village_block,
            drop_offs: HashMap::new(),
            rest_places: Vec::new(),
            fields: Vec::new(),
            sow_queue: VecDeque::new(),
            water_queue: VecDeque::new(),
            harvest_queue: VecDeque::new(),
            known_fishing_spots: Vec::new(),
            buildings: HashMap::new(),
            next_building_id: 0,
            pending: VecDeque::new(),
            next_pending_id: 0,
            role_counts: HashMap::new(),
        }
    }

    /// World position of the village block's middle — the fallback
    /// anchor when no building exists yet.
    pub fn center_world(&self) -> Vec2 {
        GridPos::new(self.village_block.x + 4, self.village_block.y + 4).center()
    }

    // ── nearest-building lookups ────────────────────────────────────────

    fn nearest(points: &[Vec2], from: Vec2) -> Option<Vec2> {
        points
            .iter()
            .copied()
            .min_by(|a, b| {
                a.distance_squared(&from)
                    .partial_cmp(&b.distance_squared(&from))
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
    }

    pub fn nearest_drop_off(&self, res: Resource, from: Vec2) -> Option<Vec2> {
        Self::nearest(self.drop_offs.get(&res).map(Vec::as_slice).unwrap_or(&[]), from)
    }

    pub fn nearest_rest_place(&self, from: Vec2) -> Option<Vec2> {
        Self::nearest(&self.rest_places, from)
    }

    /// Nearest food-dispensing building: a fish market while fish are
    /// stocked, otherwise a barn while crop is stocked.
    pub fn food_court(&self, from: Vec2) -> Option<Vec2> {
        if self.stocks.get(Resource::Fish) > 0 {
            if let Some(market) = self.nearest_drop_off(Resource::Fish, from) {
                return Some(market);
            }
        }
        if self.stocks.get(Resource::Crop) > 0 {
            return self.nearest_drop_off(Resource::Crop, from);
        }
        None
    }

    /// Food court, falling back to a rest place and then the village
    /// center so callers always have a well-defined anchor.
    pub fn gathering_anchor(&self, from: Vec2) -> Vec2 {
        self.food_court(from)
            .or_else(|| self.nearest_rest_place(from))
            .unwrap_or_else(|| self.center_world())
    }

    // ── buildings ───────────────────────────────────────────────────────

    /// Replace the footprint with paving and reroute the graph.
    pub fn pave_footprint(&mut self, origin: GridPos, size: (i32, i32)) {
        for dy in 0..size.1 {
            for dx in 0..size.0 {
                self.grid
                    .set(GridPos::new(origin.x + dx, origin.y + dy), Tile::of(TileKind::Paved));
            }
        }
        self.graph = NavGraph::build(&self.grid);
    }

    /// Register a building. The footprint must already be paved. A
    /// finished building applies its completion effects immediately.
    pub fn add_building(&mut self, kind: BuildingKind, origin: GridPos, finished: bool) -> BuildingId {
        let spec = kind.spec();
        let id = self.next_building_id;
        self.next_building_id += 1;
        self.buildings.insert(
            id,
            Building {
                kind,
                origin,
                remaining: if finished { 0.0 } else { spec.build_effort },
                finished,
            },
        );
        if finished {
            self.apply_completion_effects(id);
        }
        id
    }

    pub fn building(&self, id: BuildingId) -> Option<&Building> {
        self.buildings.get(&id)
    }

    pub fn building_mut(&mut self, id: BuildingId) -> Option<&mut Building> {
        self.buildings.get_mut(&id)
    }

    pub fn building_count(&self) -> usize {
        self.buildings.len()
    }

    pub fn buildings(&self) -> impl Iterator<Item = (&BuildingId, &Building)> {
        self.buildings.iter()
    }

    /// Mark a building finished and apply its effects to the village.
    pub fn finalize_building(&mut self, id: BuildingId) {
        if let Some(b) = self.buildings.get_mut(&id) {
            if b.finished {
                return;
            }
            b.finished = true;
            b.remaining = 0.0;
        } else {
            return;
        }
        self.apply_completion_effects(id);
    }

    fn apply_completion_effects(&mut self, id: BuildingId) {
        let Some(b) = self.buildings.get(&id) else { return };
        let kind = b.kind;
        let anchor = b.anchor();
        let spec = kind.spec();
        if let Some(res) = spec.accepts {
            self.drop_offs.entry(res).or_default().push(anchor);
        }
        if let Some((res, bonus)) = spec.capacity_bonus {
            self.stocks.raise_cap(res, bonus);
        }
        if spec.supports > 0 {
            self.population_cap += spec.supports;
            self.rest_places.push(anchor);
        }
        tracing::info!(?kind, x = anchor.x, y = anchor.y, "building completed");
    }

    // ── construction queue ──────────────────────────────────────────────

    pub fn push_pending(&mut self, kind: BuildingKind, lot: GridPos) -> u64 {
        let id = self.next_pending_id;
        self.next_pending_id += 1;
        self.pending.push_back(PendingBuild {
            id,
            kind,
            lot,
            claimed_by: None,
            building: None,
        });
        tracing::info!(?kind, ?lot, "construction queued");
        id
    }

    pub fn pending_builds(&self) -> &VecDeque<PendingBuild> {
        &self.pending
    }

    pub fn pending_front_mut(&mut self) -> Option<&mut PendingBuild> {
        self.pending.front_mut()
    }

    pub fn pending_by_id(&self, id: u64) -> Option<&PendingBuild> {
        self.pending.iter().find(|p| p.id == id)
    }

    pub fn pending_by_id_mut(&mut self, id: u64) -> Option<&mut PendingBuild> {
        self.pending.iter_mut().find(|p| p.id == id)
    }

    pub fn remove_pending(&mut self, id: u64) {
        self.pending.retain(|p| p.id != id);
    }

    /// Release every claim held by a despawned builder so the request
    /// can be re-claimed instead of waiting on a dead owner forever.
    pub fn release_claims(&mut self, entity: hecs::Entity) {
        for p in self.pending.iter_mut() {
            if p.claimed_by == Some(entity) {
                p.claimed_by = None;
                tracing::debug!(id = p.id, kind = ?p.kind, "construction claim released");
            }
        }
    }

    /// Footprints promised to queued requests, for overlap rejection.
    pub fn reserved_lots(&self) -> Vec<ReservedLot> {
        self.pending
            .iter()
            .map(|p| ReservedLot {
                origin: p.lot,
                size: p.kind.spec().size,
            })
            .collect()
    }

    /// Begin construction for a claimed request: the building entity
    /// appears in the world, unfinished.
    pub fn start_construction(&mut self, pending_id: u64) -> Option<BuildingId> {
        let (kind, lot) = {
            let p = self.pending_by_id(pending_id)?;
            if let Some(existing) = p.building {
                return Some(existing);
            }
            (p.kind, p.lot)
        };
        let building_id = self.add_building(kind, lot, false);
        if let Some(p) = self.pending_by_id_mut(pending_id) {
            p.building = Some(building_id);
        }
        Some(building_id)
    }

    /// Apply one builder-tick of effort; returns the remaining effort.
    pub fn contribute_effort(&mut self, pending_id: u64, effort: f32) -> Option<f32> {
        let building_id = self.pending_by_id(pending_id)?.building?;
        let b = self.buildings.get_mut(&building_id)?;
        b.remaining -= effort;
        Some(b.remaining)
    }

    /// Finalize a completed request: effects apply and the queue entry
    /// disappears.
    pub fn complete_pending(&mut self, pending_id: u64) {
        if let Some(building_id) = self.pending_by_id(pending_id).and_then(|p| p.building) {
            self.finalize_building(building_id);
        }
        self.remove_pending(pending_id);
    }

    // ── population bookkeeping ──────────────────────────────────────────

    pub fn note_spawn(&mut self, kind: RoleKind) {
        *self.role_counts.entry(kind).or_insert(0) += 1;
    }

    pub fn note_death(&mut self, kind: RoleKind) {
        if let Some(count) = self.role_counts.get_mut(&kind) {
            *count = count.saturating_sub(1);
        }
    }

    pub fn role_count(&self, kind: RoleKind) -> u32 {
        self.role_counts.get(&kind).copied().unwrap_or(0)
    }

    pub fn living_count(&self) -> u32 {
        self.role_counts.values().sum()
    }

    // ── farming registry ────────────────────────────────────────────────

    pub fn register_field(&mut self, pos: GridPos) {
        if !self.fields.contains(&pos) {
            self.fields.push(pos);
        }
    }

    /// Drop a tile from the rotation when it is no longer any field kind.
    pub fn prune_field(&mut self, pos: GridPos) {
        self.fields.retain(|f| *f != pos);
    }

    // ── fishing knowledge ───────────────────────────────────────────────

    pub fn add_fishing_spot(&mut self, spot: Vec2) {
        let known = self
            .known_fishing_spots
            .iter()
            .any(|s| s.distance_squared(&spot) < 1.0);
        if !known {
            self.known_fishing_spots.push(spot);
        }
    }

    // ── economy snapshot ────────────────────────────────────────────────

    pub fn utilization(&self) -> UtilizationInput {
        UtilizationInput {
            population: self.living_count(),
            population_cap: self.population_cap,
            wood: self.stocks.get(Resource::Wood),
            wood_cap: self.stocks.cap(Resource::Wood),
            stone: self.stocks.get(Resource::Stone),
            stone_cap: self.stocks.cap(Resource::Stone),
            fish: self.stocks.get(Resource::Fish),
            fish_cap: self.stocks.cap(Resource::Fish),
            crop: self.stocks.get(Resource::Crop),
            crop_cap: self.stocks.cap(Resource::Crop),
        }
    }
}
