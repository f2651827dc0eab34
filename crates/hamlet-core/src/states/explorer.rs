//! Explorer — range far from the village for exposed stone, quarry a
//! full load, then haul it back to the stonework one unit at a time.

use hamlet_logic::building::Resource;
use hamlet_logic::geometry::TILE_SIZE;

use crate::agent::RoleData;
use crate::fsm::{State, StateCtx};
use crate::states::common;
use crate::states::names;

/// Load an explorer quarries before heading home.
const FULL_LOAD: f32 = 50.0;
/// Stone quarried per tick while standing on a deposit.
const QUARRY_RATE: f32 = 0.5;

fn carried(role: &mut RoleData) -> &mut f32 {
    match role {
        RoleData::Explorer { stone } => stone,
        other => unreachable!("explorer state driving {:?}", other.kind()),
    }
}

pub struct SearchStone;

impl State for SearchStone {
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
        if ctx.village.grid.tile_at(ctx.agent.tile()).is_stone() {
            return Some(names::COLLECT_STONE);
        }
        if ctx.agent.distance_to_destination() < TILE_SIZE as f32 * 0.5 {
            common::random_destination(ctx);
        }
        None
    }
}

pub struct CollectStone;

impl State for CollectStone {
    fn do_actions(&mut self, ctx: &mut StateCtx) {
        *carried(ctx.role) += QUARRY_RATE;
    }

    fn check_conditions(&mut self, ctx: &mut StateCtx) -> Option<&'static str> {
        if *carried(ctx.role) >= FULL_LOAD {
            return Some(names::RETURN_HOME);
        }
        None
    }

    fn exit_actions(&mut self, ctx: &mut StateCtx) {
        let dest = ctx
            .village
            .nearest_drop_off(Resource::Stone, ctx.agent.position)
            .unwrap_or_else(|| ctx.village.gathering_anchor(ctx.agent.position));
        ctx.agent.set_destination(dest);
    }
}

pub struct ReturnHome;

impl State for ReturnHome {
    fn check_conditions(&mut self, ctx: &mut StateCtx) -> Option<&'static str> {
        if ctx.agent.tile() == ctx.agent.dest_tile() {
            return Some(names::UNLOAD_STONE);
        }
        if ctx.agent.hungry() {
            return Some(names::FEEDING);
        }
        None
    }
}

pub struct UnloadStone;

impl State for UnloadStone {
    fn do_actions(&mut self, ctx: &mut StateCtx) {
        let load = carried(ctx.role);
        if *load >= 1.0 {
            *load -= 1.0;
            ctx.village.stocks.deposit(Resource::Stone, 1);
        }
    }

    fn check_conditions(&mut self, ctx: &mut StateCtx) -> Option<&'static str> {
        if ctx.agent.hungry() {
            return Some(names::FEEDING);
        }
        if *carried(ctx.role) < 1.0 {
            return Some(names::SEARCH_STONE);
        }
        None
    }

    fn exit_actions(&mut self, ctx: &mut StateCtx) {
        common::random_destination(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{Agent, RoleKind};
    use crate::world::Village;
    use hamlet_logic::config::SimConfig;
    use hamlet_logic::geometry::GridPos;
    use hamlet_logic::grid::TileGrid;
    use hamlet_logic::tile::{Tile, TileKind};

    fn fixture() -> (Agent, RoleData, Village, SimConfig) {
        let config = SimConfig::default();
        let village = Village::new(TileGrid::filled(24, 24, TileKind::Grass), &config);
        let mut agent = Agent::new(RoleKind::Explorer, GridPos::new(10, 10).center());
        agent.food = 100.0;
        (agent, RoleData::new(RoleKind::Explorer), village, config)
    }

    fn ctx<'a>(
        agent: &'a mut Agent,
        role: &'a mut RoleData,
        village: &'a mut Village,
        config: &'a SimConfig,
    ) -> StateCtx<'a> {
        StateCtx {
            id: hecs::Entity::DANGLING,
            agent,
            role,
            village,
            config,
        }
    }

    #[test]
    fn test_search_stone_triggers_on_deposit_underfoot() {
        let (mut agent, mut role, mut village, config) = fixture();
        village.grid.set(GridPos::new(10, 10), Tile::of(TileKind::SmoothStone));

        let mut state = SearchStone;
        let mut ctx = ctx(&mut agent, &mut role, &mut village, &config);
        assert_eq!(state.check_conditions(&mut ctx), Some(names::COLLECT_STONE));
    }

    #[test]
    fn test_collect_stone_fills_load() {
        let (mut agent, mut role, mut village, config) = fixture();
        let mut state = CollectStone;
        let mut ctx = ctx(&mut agent, &mut role, &mut village, &config);

        let mut result = None;
        for _ in 0..120 {
            state.do_actions(&mut ctx);
            result = state.check_conditions(&mut ctx);
            if result.is_some() {
                break;
            }
        }
        assert_eq!(result, Some(names::RETURN_HOME));
        assert!(*carried(ctx.role) >= FULL_LOAD);

        // exit routes home even without a stonework built yet
        state.exit_actions(&mut ctx);
        let anchor = ctx.village.gathering_anchor(ctx.agent.position);
        assert_eq!(ctx.agent.destination, anchor);
    }

    #[test]
    fn test_unload_drains_one_per_tick() {
        let (mut agent, mut role, mut village, config) = fixture();
        *carried(&mut role) = 3.0;
        // make room below the stone cap
        assert!(village.stocks.try_debit(Resource::Stone, 100));

        let mut state = UnloadStone;
        let stone_before = village.stocks.get(Resource::Stone);
        let mut ctx = ctx(&mut agent, &mut role, &mut village, &config);

        let mut result = None;
        for _ in 0..5 {
            state.do_actions(&mut ctx);
            result = state.check_conditions(&mut ctx);
            if result.is_some() {
                break;
            }
        }
        assert_eq!(result, Some(names::SEARCH_STONE));
        assert_eq!(ctx.village.stocks.get(Resource::Stone), stone_before + 3);
        assert!(*carried(ctx.role) < 1.0);
    }

    #[test]
    fn test_return_home_waits_for_exact_tile() {
        let (mut agent, mut role, mut village, config) = fixture();
        agent.set_destination(GridPos::new(12, 12).center());

        let mut state = ReturnHome;
        {
            let mut ctx = ctx(&mut agent, &mut role, &mut village, &config);
            assert_eq!(state.check_conditions(&mut ctx), None);
        }

        agent.position = GridPos::new(12, 12).center();
        let mut ctx = ctx(&mut agent, &mut role, &mut village, &config);
        assert_eq!(state.check_conditions(&mut ctx), Some(names::UNLOAD_STONE));
    }
}
