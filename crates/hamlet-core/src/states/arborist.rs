//! Arborist — a single working state that wanders and replants
//! saplings on open grass, keeping the lumberjacks supplied.

use hamlet_logic::tile::{Tile, TileKind};

use crate::fsm::{State, StateCtx};
use crate::states::common::{self, ARRIVAL_RADIUS};
use crate::states::names;

/// Trowel strokes per planted sapling.
const PLANT_HITS: u32 = 4;

pub struct Planting;

impl State for Planting {
    fn entry_actions(&mut self, ctx: &mut StateCtx) {
        common::random_destination(ctx);
        ctx.agent.reset_work();
    }

    fn do_actions(&mut self, ctx: &mut StateCtx) {
        if ctx.agent.distance_to_destination() >= ARRIVAL_RADIUS {
            return;
        }
        let spot = ctx.agent.dest_tile();
        if ctx.village.grid.tile_at(spot).plantable {
            if ctx.agent.tick_work(ctx.config.work_beat_ticks) >= PLANT_HITS {
                ctx.village.grid.set(spot, Tile::of(TileKind::Sapling));
                ctx.agent.reset_work();
                common::random_destination(ctx);
            }
        } else {
            common::random_destination(ctx);
        }
    }

    fn check_conditions(&mut self, ctx: &mut StateCtx) -> Option<&'static str> {
        if ctx.agent.hungry() {
            return Some(names::FEEDING);
        }
        if common::workday_over(ctx) {
            return Some(names::IDLE);
        }
        None
    }
}
