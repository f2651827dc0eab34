//! Farmer — runs the till → sow → water → harvest rotation, pulling
//! work from the village's ordered task queues and delivering crop to
//! the barn.

use rand::Rng;

use hamlet_logic::building::Resource;
use hamlet_logic::geometry::TILE_SIZE;
use hamlet_logic::tile::{Tile, TileKind};

use crate::agent::{FarmerData, RoleData};
use crate::fsm::{State, StateCtx};
use crate::states::common::{self, ARRIVAL_RADIUS};
use crate::states::names;

/// Hoe/seed/water/scythe strokes per completed task.
const TASK_HITS: u32 = 2;
/// Coarse arrival tolerance for tilling and harvesting.
const FIELD_RADIUS: f32 = TILE_SIZE as f32 * 0.5;
/// Tight arrival tolerance for sowing and watering.
const PLANT_RADIUS: f32 = TILE_SIZE as f32 * 0.1;

fn data(role: &mut RoleData) -> &mut FarmerData {
    match role {
        RoleData::Farmer(data) => data,
        other => unreachable!("farmer state driving {:?}", other.kind()),
    }
}

fn is_field(kind: TileKind) -> bool {
    matches!(kind, TileKind::Soil | TileKind::Shoots | TileKind::MatureCrop)
}

/// Room left in the rotation for this village's farmers?
fn rotation_has_room(ctx: &StateCtx) -> bool {
    let farmers = ctx.village.role_count(crate::agent::RoleKind::Farmer);
    (farmers * ctx.config.tiles_per_farmer) as usize > ctx.village.fields.len()
}

/// Abandon a claimed task: if the tile left the rotation entirely, drop
/// it from the field registry too so the rotation self-heals.
fn abandon(ctx: &mut StateCtx) {
    let farmer = data(ctx.role);
    if let Some(target) = farmer.target.take() {
        if !is_field(ctx.village.grid.tile_at(target).kind) {
            ctx.village.prune_field(target);
        }
    }
    ctx.agent.reset_work();
}

pub struct Searching;

impl State for Searching {
    fn entry_actions(&mut self, ctx: &mut StateCtx) {
        common::random_destination(ctx);
    }

    fn check_conditions(&mut self, ctx: &mut StateCtx) -> Option<&'static str> {
        if ctx.agent.hungry() {
            return Some(names::FEEDING);
        }
        if common::workday_over(ctx) {
            return Some(names::IDLE);
        }

        // ripe fields always come first
        if let Some(target) = ctx.village.harvest_queue.pop_front() {
            data(ctx.role).target = Some(target);
            return Some(names::HARVESTING);
        }

        if rotation_has_room(ctx) {
            if ctx.agent.distance_to_destination() < ARRIVAL_RADIUS {
                let spot = ctx.village.grid.find_near(
                    ctx.agent.tile(),
                    ctx.agent.view_range,
                    |t| t.tillable,
                );
                match spot {
                    Some(tile) => {
                        data(ctx.role).target = Some(tile);
                        return Some(names::TILLING);
                    }
                    None => common::random_destination(ctx),
                }
            }
            return None;
        }

        if let Some(target) = ctx.village.sow_queue.pop_front() {
            data(ctx.role).target = Some(target);
            return Some(names::SOWING);
        }
        if let Some(target) = ctx.village.water_queue.pop_front() {
            data(ctx.role).target = Some(target);
            return Some(names::WATERING);
        }

        // rotation is full and every queue is drained
        Some(names::IDLE)
    }
}

pub struct Tilling;

impl State for Tilling {
    fn entry_actions(&mut self, ctx: &mut StateCtx) {
        ctx.agent.reset_work();
        if let Some(target) = data(ctx.role).target {
            ctx.agent.set_destination(target.center());
        }
    }

    fn do_actions(&mut self, ctx: &mut StateCtx) {
        let Some(target) = data(ctx.role).target else { return };
        if ctx.agent.distance_to_destination() < FIELD_RADIUS
            && ctx.village.grid.tile_at(target).tillable
        {
            ctx.agent.tick_work(ctx.config.work_beat_ticks);
        }
    }

    fn check_conditions(&mut self, ctx: &mut StateCtx) -> Option<&'static str> {
        if !rotation_has_room(ctx) {
            abandon(ctx);
            return Some(names::SEARCHING);
        }
        let Some(target) = data(ctx.role).target else {
            return Some(names::SEARCHING);
        };
        if !ctx.village.grid.tile_at(target).tillable {
            abandon(ctx);
            return Some(names::SEARCHING);
        }
        if ctx.agent.hits >= TASK_HITS {
            ctx.village.grid.set(target, Tile::of(TileKind::Soil));
            ctx.village.register_field(target);
            ctx.village.sow_queue.push_back(target);
            ctx.agent.reset_work();
            // till the next patch in view without going back to wander
            let next = ctx.village.grid.find_near(
                ctx.agent.tile(),
                ctx.agent.view_range,
                |t| t.tillable,
            );
            match next {
                Some(tile) => {
                    data(ctx.role).target = Some(tile);
                    ctx.agent.set_destination(tile.center());
                    return None;
                }
                None => {
                    data(ctx.role).target = None;
                    return Some(names::SEARCHING);
                }
            }
        }
        if ctx.agent.hungry() {
            return Some(names::FEEDING);
        }
        if common::workday_over(ctx) {
            return Some(names::IDLE);
        }
        None
    }
}

pub struct Sowing;

impl State for Sowing {
    fn entry_actions(&mut self, ctx: &mut StateCtx) {
        ctx.agent.reset_work();
        if let Some(target) = data(ctx.role).target {
            ctx.agent.set_destination(target.center());
        }
    }

    fn do_actions(&mut self, ctx: &mut StateCtx) {
        let Some(target) = data(ctx.role).target else { return };
        if ctx.agent.distance_to_destination() < PLANT_RADIUS
            && ctx.village.grid.tile_at(target).crop_plantable
        {
            ctx.agent.tick_work(ctx.config.work_beat_ticks);
        }
    }

    fn check_conditions(&mut self, ctx: &mut StateCtx) -> Option<&'static str> {
        let Some(target) = data(ctx.role).target else {
            return Some(names::SEARCHING);
        };
        if !ctx.village.grid.tile_at(target).crop_plantable {
            abandon(ctx);
            return Some(names::SEARCHING);
        }
        if ctx.agent.hits >= TASK_HITS {
            let required = rand::thread_rng().gen_range(1..=2);
            ctx.village.grid.set(target, Tile::shoots(required));
            ctx.village.water_queue.push_back(target);
            data(ctx.role).target = None;
            ctx.agent.reset_work();
            return Some(names::SEARCHING);
        }
        if ctx.agent.hungry() {
            return Some(names::FEEDING);
        }
        if common::workday_over(ctx) {
            return Some(names::IDLE);
        }
        None
    }
}

pub struct Watering;

impl State for Watering {
    fn entry_actions(&mut self, ctx: &mut StateCtx) {
        ctx.agent.reset_work();
        if let Some(target) = data(ctx.role).target {
            ctx.agent.set_destination(target.center());
        }
    }

    fn do_actions(&mut self, ctx: &mut StateCtx) {
        let Some(target) = data(ctx.role).target else { return };
        if ctx.agent.distance_to_destination() < PLANT_RADIUS
            && ctx.village.grid.tile_at(target).crop_waterable
        {
            ctx.agent.tick_work(ctx.config.work_beat_ticks);
        }
    }

    fn check_conditions(&mut self, ctx: &mut StateCtx) -> Option<&'static str> {
        let Some(target) = data(ctx.role).target else {
            return Some(names::SEARCHING);
        };
        if !ctx.village.grid.tile_at(target).crop_waterable {
            abandon(ctx);
            return Some(names::SEARCHING);
        }
        if ctx.agent.hits >= TASK_HITS {
            let tile = *ctx.village.grid.tile_at(target);
            if tile.watered >= tile.watering_required {
                ctx.village.grid.set(target, Tile::of(TileKind::MatureCrop));
                ctx.village.harvest_queue.push_back(target);
            } else {
                let mut watered = tile;
                watered.watered += 1;
                ctx.village.grid.set(target, watered);
                ctx.village.water_queue.push_back(target);
            }
            data(ctx.role).target = None;
            ctx.agent.reset_work();
            return Some(names::SEARCHING);
        }
        if ctx.agent.hungry() {
            return Some(names::FEEDING);
        }
        if common::workday_over(ctx) {
            return Some(names::IDLE);
        }
        None
    }
}

pub struct Harvesting;

impl State for Harvesting {
    fn entry_actions(&mut self, ctx: &mut StateCtx) {
        ctx.agent.reset_work();
        if let Some(target) = data(ctx.role).target {
            ctx.agent.set_destination(target.center());
        }
    }

    fn do_actions(&mut self, ctx: &mut StateCtx) {
        let Some(target) = data(ctx.role).target else { return };
        if ctx.agent.distance_to_destination() < FIELD_RADIUS
            && ctx.village.grid.tile_at(target).crop_harvestable
        {
            ctx.agent.tick_work(ctx.config.work_beat_ticks);
        }
    }

    fn check_conditions(&mut self, ctx: &mut StateCtx) -> Option<&'static str> {
        let Some(target) = data(ctx.role).target else {
            return Some(names::SEARCHING);
        };
        if !ctx.village.grid.tile_at(target).crop_harvestable {
            abandon(ctx);
            return Some(names::SEARCHING);
        }
        if ctx.agent.hits >= TASK_HITS {
            ctx.village.grid.set(target, Tile::of(TileKind::Soil));
            ctx.village.sow_queue.push_back(target);
            data(ctx.role).target = None;
            data(ctx.role).crop += rand::thread_rng().gen_range(40..=60);
            ctx.agent.reset_work();
            return Some(names::DELIVERING);
        }
        if ctx.agent.hungry() {
            return Some(names::FEEDING);
        }
        if common::workday_over(ctx) {
            return Some(names::IDLE);
        }
        None
    }
}

pub struct Delivering;

impl State for Delivering {
    fn entry_actions(&mut self, ctx: &mut StateCtx) {
        let dest = ctx
            .village
            .nearest_drop_off(Resource::Crop, ctx.agent.position)
            .unwrap_or_else(|| ctx.village.gathering_anchor(ctx.agent.position));
        ctx.agent.set_destination(dest);
    }

    fn check_conditions(&mut self, ctx: &mut StateCtx) -> Option<&'static str> {
        if ctx.agent.distance_to_destination() < ARRIVAL_RADIUS {
            let carried = data(ctx.role).crop;
            ctx.village.stocks.deposit(Resource::Crop, carried);
            data(ctx.role).crop = 0;
            return Some(names::FEEDING);
        }
        None
    }
}
