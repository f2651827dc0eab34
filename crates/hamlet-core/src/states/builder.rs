//! Builder — waits by the village for queued construction, claims the
//! front request (paying its material cost and paving the lot), and
//! raises the building on site. Builders arriving at an already-claimed
//! request assist, adding their effort to the same structure.

use hamlet_logic::building::Resource;
use hamlet_logic::geometry::{Vec2, TILE_SIZE};

use crate::agent::{BuilderData, RoleData};
use crate::fsm::{State, StateCtx};
use crate::states::names;
use crate::states::common;

/// Construction effort contributed per builder tick.
const BUILD_RATE: f32 = 1.0;
/// How close to the site anchor counts as standing on site.
const ON_SITE_RADIUS: f32 = 2.0;

fn data(role: &mut RoleData) -> &mut BuilderData {
    match role {
        RoleData::Builder(data) => data,
        other => unreachable!("builder state driving {:?}", other.kind()),
    }
}

/// Doorstep of a lot that has no building entity yet.
fn site_anchor(lot: hamlet_logic::geometry::GridPos) -> Vec2 {
    lot.corner() + Vec2::new(TILE_SIZE as f32, TILE_SIZE as f32)
}

pub struct Waiting;

impl State for Waiting {
    fn entry_actions(&mut self, ctx: &mut StateCtx) {
        let dest = ctx.village.gathering_anchor(ctx.agent.position);
        ctx.agent.set_destination(dest);
    }

    fn check_conditions(&mut self, ctx: &mut StateCtx) -> Option<&'static str> {
        if ctx.agent.hungry() {
            return Some(names::FEEDING);
        }
        if common::workday_over(ctx) {
            return Some(names::IDLE);
        }
        if !ctx.village.pending_builds().is_empty() {
            return Some(names::FINDING);
        }
        None
    }
}

pub struct Finding;

impl State for Finding {
    fn entry_actions(&mut self, ctx: &mut StateCtx) {
        let me = ctx.id;

        // resume a claim interrupted by feeding or nightfall
        if let Some(pid) = data(ctx.role).pending {
            if let Some(p) = ctx.village.pending_by_id(pid) {
                ctx.agent.set_destination(site_anchor(p.lot));
                return;
            }
            *data(ctx.role) = BuilderData::default();
        }

        let Some(front) = ctx.village.pending_builds().front() else {
            return;
        };
        let (pid, kind, lot, claimed_by, started) =
            (front.id, front.kind, front.lot, front.claimed_by, front.building);

        match claimed_by {
            Some(_) => {
                // someone owns it: lend a hand
                *data(ctx.role) = BuilderData { pending: Some(pid), owner: false };
                ctx.agent.set_destination(site_anchor(lot));
            }
            None => {
                // an orphaned claim (the owner starved mid-build) leaves a
                // started site behind; materials were paid on first claim
                if started.is_none() {
                    let spec = kind.spec();
                    let affordable = ctx.village.stocks.get(Resource::Wood) >= spec.cost_wood
                        && ctx.village.stocks.get(Resource::Stone) >= spec.cost_stone;
                    if !affordable {
                        return;
                    }
                    ctx.village.stocks.try_debit(Resource::Wood, spec.cost_wood);
                    ctx.village.stocks.try_debit(Resource::Stone, spec.cost_stone);
                    ctx.village.pave_footprint(lot, spec.size);
                }
                if let Some(p) = ctx.village.pending_by_id_mut(pid) {
                    p.claimed_by = Some(me);
                }
                *data(ctx.role) = BuilderData { pending: Some(pid), owner: true };
                ctx.agent.set_destination(site_anchor(lot));
            }
        }
    }

    fn check_conditions(&mut self, ctx: &mut StateCtx) -> Option<&'static str> {
        if data(ctx.role).pending.is_none() {
            // nothing claimable right now
            return Some(names::WAITING);
        }
        if ctx.agent.distance_to_destination() < ON_SITE_RADIUS {
            return Some(names::BUILDING);
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

pub struct Building;

impl State for Building {
    fn entry_actions(&mut self, ctx: &mut StateCtx) {
        let builder = data(ctx.role);
        if builder.owner {
            if let Some(pid) = builder.pending {
                ctx.village.start_construction(pid);
            }
        }
    }

    fn do_actions(&mut self, ctx: &mut StateCtx) {
        if let Some(pid) = data(ctx.role).pending {
            ctx.village.contribute_effort(pid, BUILD_RATE);
        }
    }

    fn check_conditions(&mut self, ctx: &mut StateCtx) -> Option<&'static str> {
        let Some(pid) = data(ctx.role).pending else {
            return Some(names::WAITING);
        };
        let Some(p) = ctx.village.pending_by_id(pid) else {
            // the owner finalized it while we were assisting
            *data(ctx.role) = BuilderData::default();
            return Some(names::WAITING);
        };
        let remaining = p
            .building
            .and_then(|bid| ctx.village.building(bid))
            .map(|b| b.remaining);
        if data(ctx.role).owner && matches!(remaining, Some(r) if r <= 0.0) {
            ctx.village.complete_pending(pid);
            *data(ctx.role) = BuilderData::default();
            return Some(names::WAITING);
        }
        if ctx.agent.hungry() {
            return Some(names::FEEDING);
        }
        if common::workday_over(ctx) {
            return Some(names::IDLE);
        }
        None
    }

    fn exit_actions(&mut self, ctx: &mut StateCtx) {
        // assistants re-queue from scratch; owners keep their claim
        if !data(ctx.role).owner {
            *data(ctx.role) = BuilderData::default();
        }
        let dest = ctx.village.gathering_anchor(ctx.agent.position);
        ctx.agent.set_destination(dest);
    }
}
