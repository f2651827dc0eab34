//! Behavior shared by every role: the Feeding/Idle pair and the
//! heading-biased wander used by all searching states.

use rand::Rng;

use hamlet_logic::building::Resource;
use hamlet_logic::geometry::Vec2;

use crate::fsm::{State, StateCtx};
use crate::states::names;

/// Distance below which an agent counts as "at" a building.
pub const ARRIVAL_RADIUS: f32 = 15.0;

/// Past the end of the working window?
pub fn workday_over(ctx: &StateCtx) -> bool {
    ctx.village.clock.time >= ctx.config.workday_end
}

/// Pick a random reachable destination biased by the agent's heading.
///
/// The candidate is clamped to a maximum wander distance from the
/// nearest gathering anchor, and validated walkable through a bounded
/// retry loop; exhausting the retries falls back to the anchor itself.
pub fn random_destination(ctx: &mut StateCtx) {
    let mut rng = rand::thread_rng();
    let anchor = ctx.village.gathering_anchor(ctx.agent.position);
    // three quarters of half a day's travel at base speed
    let max_wander = ctx.agent.base_speed * 0.375 * ctx.config.day_length;

    ctx.agent.heading += rng.gen_range(-25.0..30.0);
    for _ in 0..ctx.config.wander_retry_cap {
        let distance = rng.gen_range(50.0..100.0);
        let mut candidate =
            ctx.agent.position + Vec2::from_heading(ctx.agent.heading) * distance;
        if candidate.distance(&anchor) > max_wander {
            candidate = anchor;
            ctx.agent.heading += 180.0;
        }
        if ctx.village.grid.tile_at_world(candidate).walkable {
            ctx.agent.set_destination(candidate);
            return;
        }
        ctx.agent.heading += 30.0;
    }
    ctx.agent.set_destination(anchor);
}

/// Walk to the nearest food court and refill if below the feeding
/// threshold, debiting fish first, then crop. Returns to the primary
/// state, or Idle past the end of the workday.
pub struct Feeding;

impl State for Feeding {
    fn entry_actions(&mut self, ctx: &mut StateCtx) {
        let dest = ctx.village.gathering_anchor(ctx.agent.position);
        ctx.agent.set_destination(dest);
    }

    fn check_conditions(&mut self, ctx: &mut StateCtx) -> Option<&'static str> {
        if ctx.agent.distance_to_destination() >= ARRIVAL_RADIUS {
            return None;
        }
        if ctx.agent.food < ctx.config.feeding_threshold {
            ctx.agent.food = 100.0;
            if !ctx.village.stocks.try_debit(Resource::Fish, 1) {
                let _ = ctx.village.stocks.try_debit(Resource::Crop, 1);
            }
        }
        Some(if workday_over(ctx) {
            names::IDLE
        } else {
            ctx.agent.primary_state
        })
    }
}

/// Rest at the nearest rest place until the next working window, then
/// feed if hungry or go back to work.
pub struct Idle;

impl State for Idle {
    fn entry_actions(&mut self, ctx: &mut StateCtx) {
        ctx.agent.rested = false;
        if let Some(rest) = ctx.village.nearest_rest_place(ctx.agent.position) {
            ctx.agent.set_destination(rest);
        }
    }

    fn do_actions(&mut self, ctx: &mut StateCtx) {
        if !ctx.agent.rested && ctx.agent.distance_to_destination() < 1.0 {
            ctx.agent.rested = true;
            ctx.agent.stand_still();
        }
    }

    fn check_conditions(&mut self, ctx: &mut StateCtx) -> Option<&'static str> {
        if ctx.agent.rested && ctx.config.is_working_hours(ctx.village.clock.time) {
            return Some(if ctx.agent.hungry() {
                names::FEEDING
            } else {
                ctx.agent.primary_state
            });
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{Agent, RoleData, RoleKind};
    use crate::world::Village;
    use hamlet_logic::building::BuildingKind;
    use hamlet_logic::config::SimConfig;
    use hamlet_logic::geometry::GridPos;
    use hamlet_logic::grid::TileGrid;
    use hamlet_logic::tile::TileKind;

    fn village_with_barn() -> (Village, SimConfig) {
        let config = SimConfig::default();
        let mut village = Village::new(TileGrid::filled(24, 24, TileKind::Grass), &config);
        village.pave_footprint(GridPos::new(8, 8), (2, 2));
        village.add_building(BuildingKind::Barn, GridPos::new(8, 8), true);
        (village, config)
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
    fn test_feeding_targets_food_court_and_refills() {
        let (mut village, config) = village_with_barn();
        let mut agent = Agent::new(RoleKind::Lumberjack, Vec2::new(100.0, 288.0));
        let mut role = RoleData::new(RoleKind::Lumberjack);
        agent.food = 35.0;

        let mut state = Feeding;
        let barn_anchor = Vec2::new(288.0, 288.0);
        {
            let mut ctx = ctx(&mut agent, &mut role, &mut village, &config);
            state.entry_actions(&mut ctx);
            // ~200 units away: no refill yet
            assert_eq!(state.check_conditions(&mut ctx), None);
        }
        assert_eq!(agent.destination, barn_anchor);

        agent.position = barn_anchor + Vec2::new(10.0, 0.0);
        let fish_before = village.stocks.get(Resource::Fish);
        let mut ctx = ctx(&mut agent, &mut role, &mut village, &config);
        let next = state.check_conditions(&mut ctx);
        assert_eq!(next, Some(names::SEARCHING));
        assert_eq!(ctx.agent.food, 100.0);
        // fish preferred over crop
        assert_eq!(ctx.village.stocks.get(Resource::Fish), fish_before - 1);
    }

    #[test]
    fn test_feeding_after_hours_goes_idle() {
        let (mut village, config) = village_with_barn();
        village.clock.time = 35.0;
        let mut agent = Agent::new(RoleKind::Lumberjack, Vec2::new(288.0, 288.0));
        agent.food = 90.0; // not hungry: no refill, just routing
        let mut role = RoleData::new(RoleKind::Lumberjack);

        let mut state = Feeding;
        let mut ctx = ctx(&mut agent, &mut role, &mut village, &config);
        state.entry_actions(&mut ctx);
        assert_eq!(state.check_conditions(&mut ctx), Some(names::IDLE));
        assert_eq!(ctx.agent.food, 90.0);
    }

    #[test]
    fn test_idle_rests_then_resumes() {
        let (mut village, config) = village_with_barn();
        // a rest place
        village.pave_footprint(GridPos::new(16, 16), (2, 2));
        village.add_building(BuildingKind::House, GridPos::new(16, 16), true);
        village.clock.time = 40.0;

        let mut agent = Agent::new(RoleKind::Lumberjack, Vec2::new(100.0, 100.0));
        let mut role = RoleData::new(RoleKind::Lumberjack);

        let mut state = Idle;
        {
            let mut ctx = ctx(&mut agent, &mut role, &mut village, &config);
            state.entry_actions(&mut ctx);
            state.do_actions(&mut ctx);
            assert_eq!(state.check_conditions(&mut ctx), None);
        }
        assert!(!agent.rested);

        // arrive at the rest place overnight
        agent.position = agent.destination;
        {
            let mut ctx = ctx(&mut agent, &mut role, &mut village, &config);
            state.do_actions(&mut ctx);
            assert!(ctx.agent.rested);
            // still night: stay
            assert_eq!(state.check_conditions(&mut ctx), None);
        }

        village.clock.time = 5.0;
        let mut ctx = ctx(&mut agent, &mut role, &mut village, &config);
        assert_eq!(state.check_conditions(&mut ctx), Some(names::SEARCHING));
    }

    #[test]
    fn test_idle_hunger_check_is_strict() {
        let (mut village, config) = village_with_barn();
        village.clock.time = 5.0;
        let mut agent = Agent::new(RoleKind::Lumberjack, Vec2::new(288.0, 288.0));
        agent.rested = true;
        let mut role = RoleData::new(RoleKind::Lumberjack);

        let mut state = Idle;
        // exactly at the limit: back to work, not the food court
        agent.food = agent.hunger_limit;
        {
            let mut ctx = ctx(&mut agent, &mut role, &mut village, &config);
            assert_eq!(state.check_conditions(&mut ctx), Some(names::SEARCHING));
        }

        agent.food = agent.hunger_limit - 1.0;
        let mut ctx = ctx(&mut agent, &mut role, &mut village, &config);
        assert_eq!(state.check_conditions(&mut ctx), Some(names::FEEDING));
    }

    #[test]
    fn test_random_destination_lands_on_walkable() {
        let (mut village, config) = village_with_barn();
        let mut agent = Agent::new(RoleKind::Lumberjack, Vec2::new(300.0, 300.0));
        let mut role = RoleData::new(RoleKind::Lumberjack);

        for _ in 0..50 {
            let mut ctx = ctx(&mut agent, &mut role, &mut village, &config);
            random_destination(&mut ctx);
            assert!(village.grid.tile_at_world(agent.destination).walkable);
        }
    }

    #[test]
    fn test_random_destination_falls_back_to_anchor() {
        let config = SimConfig::default();
        // water everywhere: every candidate fails, the anchor remains
        let mut grid = TileGrid::filled(24, 24, TileKind::Water);
        // one island tile so the agent has somewhere to stand
        grid.set(GridPos::new(4, 4), hamlet_logic::tile::Tile::of(TileKind::Grass));
        let mut village = Village::new(grid, &config);
        let mut agent = Agent::new(RoleKind::Lumberjack, GridPos::new(4, 4).center());
        let mut role = RoleData::new(RoleKind::Lumberjack);

        let mut ctx = ctx(&mut agent, &mut role, &mut village, &config);
        let anchor = ctx.village.gathering_anchor(ctx.agent.position);
        random_destination(&mut ctx);
        assert_eq!(agent.destination, anchor);
    }
}
