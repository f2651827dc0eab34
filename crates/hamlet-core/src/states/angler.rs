//! Angler — wander the shoreline for fishable water, remember good
//! spots, and carry the catch to the fish market. Anglers keep fishing
//! past the end of the workday until the catch is landed.

use rand::Rng;

use hamlet_logic::building::Resource;
use hamlet_logic::geometry::TILE_SIZE;

use crate::agent::RoleData;
use crate::fsm::{State, StateCtx};
use crate::states::common::{self, ARRIVAL_RADIUS};
use crate::states::names;

/// Casts per landed catch.
const CAST_HITS: u32 = 4;
/// Arrival tolerance when closing in on a shore tile.
const SHORE_RADIUS: f32 = TILE_SIZE as f32 * 0.25;
/// How far to look for walkable ground around a fishable tile.
const SHORE_SEARCH_RADIUS: i32 = 2;

fn carried(role: &mut RoleData) -> &mut u32 {
    match role {
        RoleData::Angler { fish } => fish,
        other => unreachable!("angler state driving {:?}", other.kind()),
    }
}

pub struct Searching;

impl State for Searching {
    fn entry_actions(&mut self, ctx: &mut StateCtx) {
        let mut rng = rand::thread_rng();
        let spots = &ctx.village.known_fishing_spots;
        if !spots.is_empty() && rng.gen::<f32>() < ctx.config.angler_return_probability {
            let spot = spots[rng.gen_range(0..spots.len())];
            ctx.agent.set_destination(spot);
        } else {
            common::random_destination(ctx);
        }
    }

    fn check_conditions(&mut self, ctx: &mut StateCtx) -> Option<&'static str> {
        if ctx.agent.hungry() {
            return Some(names::FEEDING);
        }
        if ctx.agent.distance_to_destination() < SHORE_RADIUS {
            let water = ctx.village.grid.find_near(
                ctx.agent.tile(),
                ctx.agent.view_range,
                |t| t.fishable,
            );
            if let Some(water) = water {
                // fish from the nearest walkable tile beside the water
                let shore = ctx
                    .village
                    .grid
                    .find_near(water, SHORE_SEARCH_RADIUS, |t| t.walkable);
                if let Some(shore) = shore {
                    ctx.agent.set_destination(shore.center());
                    ctx.village.add_fishing_spot(shore.center());
                    return Some(names::FISHING);
                }
            }
            common::random_destination(ctx);
        }
        None
    }
}

pub struct Fishing;

impl State for Fishing {
    fn entry_actions(&mut self, ctx: &mut StateCtx) {
        ctx.agent.reset_work();
    }

    fn do_actions(&mut self, ctx: &mut StateCtx) {
        if ctx.agent.distance_to_destination() < SHORE_RADIUS {
            ctx.agent.tick_work(ctx.config.work_beat_ticks);
            if ctx.agent.hits >= CAST_HITS {
                *carried(ctx.role) = rand::thread_rng().gen_range(5..=10);
                ctx.agent.reset_work();
            }
        }
    }

    fn check_conditions(&mut self, ctx: &mut StateCtx) -> Option<&'static str> {
        if *carried(ctx.role) >= 1 {
            return Some(names::DELIVERING);
        }
        if ctx.agent.hungry() {
            return Some(names::FEEDING);
        }
        None
    }
}

pub struct Delivering;

impl State for Delivering {
    fn entry_actions(&mut self, ctx: &mut StateCtx) {
        let dest = ctx
            .village
            .nearest_drop_off(Resource::Fish, ctx.agent.position)
            .unwrap_or_else(|| ctx.village.gathering_anchor(ctx.agent.position));
        ctx.agent.set_destination(dest);
    }

    fn check_conditions(&mut self, ctx: &mut StateCtx) -> Option<&'static str> {
        if ctx.agent.distance_to_destination() < ARRIVAL_RADIUS {
            let catch = *carried(ctx.role);
            ctx.village.stocks.deposit(Resource::Fish, catch);
            *carried(ctx.role) = 0;
            return Some(names::FEEDING);
        }
        None
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
        let mut agent = Agent::new(RoleKind::Angler, GridPos::new(10, 10).center());
        agent.food = 100.0;
        (agent, RoleData::new(RoleKind::Angler), village, config)
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
    fn test_searching_finds_shore_beside_water() {
        let (mut agent, mut role, mut village, config) = fixture();
        let pond = GridPos::new(12, 10);
        village.grid.set(pond, Tile::of(TileKind::Water));

        let mut state = Searching;
        let mut ctx = ctx(&mut agent, &mut role, &mut village, &config);
        let next = state.check_conditions(&mut ctx);
        assert_eq!(next, Some(names::FISHING));
        // destination is walkable ground, not the water itself
        assert!(ctx.village.grid.tile_at_world(ctx.agent.destination).walkable);
        assert_eq!(ctx.village.known_fishing_spots.len(), 1);
    }

    #[test]
    fn test_searching_remembers_spots() {
        let (mut agent, mut role, mut village, config) = fixture();
        let spot = GridPos::new(3, 3).center();
        village.add_fishing_spot(spot);

        // return probability 0.75: within 100 draws at least one heads home
        let mut state = Searching;
        let mut routed = false;
        for _ in 0..100 {
            let mut ctx = ctx(&mut agent, &mut role, &mut village, &config);
            state.entry_actions(&mut ctx);
            if agent.destination == spot {
                routed = true;
                break;
            }
        }
        assert!(routed);
    }

    #[test]
    fn test_fishing_lands_catch_after_four_casts() {
        let (mut agent, mut role, mut village, config) = fixture();
        agent.set_destination(agent.position);

        let mut state = Fishing;
        let mut ctx = ctx(&mut agent, &mut role, &mut village, &config);
        state.entry_actions(&mut ctx);

        let mut result = None;
        for _ in 0..config.work_beat_ticks * CAST_HITS {
            state.do_actions(&mut ctx);
            result = state.check_conditions(&mut ctx);
            if result.is_some() {
                break;
            }
        }
        assert_eq!(result, Some(names::DELIVERING));
        let catch = *carried(ctx.role);
        assert!((5..=10).contains(&catch));
    }

    #[test]
    fn test_fishing_ignores_workday_end() {
        let (mut agent, mut role, mut village, config) = fixture();
        village.clock.time = 35.0;
        agent.set_destination(agent.position + hamlet_logic::geometry::Vec2::new(200.0, 0.0));

        let mut state = Fishing;
        let mut ctx = ctx(&mut agent, &mut role, &mut village, &config);
        state.entry_actions(&mut ctx);
        // past the workday, no catch yet: keep at it
        assert_eq!(state.check_conditions(&mut ctx), None);
    }

    #[test]
    fn test_delivering_credits_fish() {
        let (mut agent, mut role, mut village, config) = fixture();
        *carried(&mut role) = 7;

        let mut state = Delivering;
        let fish_before = village.stocks.get(Resource::Fish);
        let mut ctx = ctx(&mut agent, &mut role, &mut village, &config);
        state.entry_actions(&mut ctx);
        ctx.agent.position = ctx.agent.destination;
        assert_eq!(state.check_conditions(&mut ctx), Some(names::FEEDING));
        assert_eq!(ctx.village.stocks.get(Resource::Fish), fish_before + 7);
        assert_eq!(*carried(ctx.role), 0);
    }
}
