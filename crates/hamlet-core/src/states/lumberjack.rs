//! Lumberjack — wander until a tree is in view, fell it, carry the wood
//! to the lumber yard.

use hamlet_logic::building::Resource;
use hamlet_logic::tile::{Tile, TileKind};

use crate::fsm::{State, StateCtx};
use crate::states::common::{self, ARRIVAL_RADIUS};
use crate::states::names;

/// Axe swings to fell one tree.
const CHOP_HITS: u32 = 4;
/// Wood credited per felled tree.
const WOOD_PER_TREE: u32 = 5;

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
        if ctx.agent.distance_to_destination() < ARRIVAL_RADIUS {
            let spot = ctx.village.grid.find_kind_near(
                ctx.agent.tile(),
                ctx.agent.view_range,
                TileKind::Tree,
            );
            match spot {
                Some(tree) => {
                    ctx.agent.set_destination(tree.center());
                    return Some(names::CHOPPING);
                }
                None => common::random_destination(ctx),
            }
        }
        None
    }
}

pub struct Chopping;

impl State for Chopping {
    fn entry_actions(&mut self, ctx: &mut StateCtx) {
        ctx.agent.reset_work();
    }

    fn do_actions(&mut self, ctx: &mut StateCtx) {
        let target = ctx.agent.dest_tile();
        if ctx.agent.distance_to_destination() < ARRIVAL_RADIUS
            && ctx.village.grid.tile_at(target).kind == TileKind::Tree
        {
            ctx.agent.tick_work(ctx.config.work_beat_ticks);
        }
    }

    fn check_conditions(&mut self, ctx: &mut StateCtx) -> Option<&'static str> {
        let target = ctx.agent.dest_tile();
        // someone else felled it, or we drifted off-target
        if ctx.village.grid.tile_at(target).kind != TileKind::Tree {
            ctx.agent.reset_work();
            return Some(names::SEARCHING);
        }
        if ctx.agent.hits >= CHOP_HITS {
            ctx.village.grid.set(target, Tile::of(TileKind::Grass));
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
            .nearest_drop_off(Resource::Wood, ctx.agent.position)
            .unwrap_or_else(|| ctx.village.gathering_anchor(ctx.agent.position));
        ctx.agent.set_destination(dest);
    }

    fn check_conditions(&mut self, ctx: &mut StateCtx) -> Option<&'static str> {
        if ctx.agent.distance_to_destination() < ARRIVAL_RADIUS {
            ctx.village.stocks.deposit(Resource::Wood, WOOD_PER_TREE);
            return Some(names::FEEDING);
        }
        None
    }
}
