//! The per-tick construction decision: when a builder is free and a
//! stock is pressing against its ceiling, queue the next building on
//! the closest legal lot.

use hamlet_logic::config::SimConfig;
use hamlet_logic::placement;

use crate::agent::{RoleData, RoleKind};
use crate::fsm::StateMachine;
use crate::states::names;
use crate::world::Village;

/// Evaluate the decision ladder and queue at most one request.
pub fn construction_system(world: &mut hecs::World, village: &mut Village, config: &SimConfig) {
    let mut builders = 0usize;
    let mut one_waiting = false;
    for (_, (role, machine)) in world.query_mut::<(&RoleData, &StateMachine)>() {
        if role.kind() == RoleKind::Builder {
            builders += 1;
            if machine.active_state() == Some(names::WAITING) {
                one_waiting = true;
            }
        }
    }
    // queue only what the crew can absorb
    if !one_waiting || village.pending_builds().len() >= builders {
        return;
    }

    let Some(kind) = placement::next_building(&village.utilization(), config.utilization_threshold)
    else {
        return;
    };
    // one request per building kind at a time
    if village.pending_builds().iter().any(|p| p.kind == kind) {
        return;
    }

    let reserved = village.reserved_lots();
    match placement::find_lot(&village.grid, village.village_block, kind, &reserved) {
        Some(lot) => {
            village.push_pending(kind, lot);
        }
        None => tracing::warn!(?kind, "no lot available"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::Agent;
    use crate::states;
    use hamlet_logic::building::{BuildingKind, Resource};
    use hamlet_logic::geometry::GridPos;
    use hamlet_logic::grid::TileGrid;
    use hamlet_logic::tile::TileKind;

    fn waiting_builder(
        world: &mut hecs::World,
        village: &mut Village,
        config: &SimConfig,
    ) -> hecs::Entity {
        let mut agent = Agent::new(RoleKind::Builder, GridPos::new(10, 10).center());
        let mut role = RoleData::new(RoleKind::Builder);
        let mut machine = states::brain_for(RoleKind::Builder);
        {
            let mut ctx = crate::fsm::StateCtx {
                id: hecs::Entity::DANGLING,
                agent: &mut agent,
                role: &mut role,
                village,
                config,
            };
            machine.set_state(names::WAITING, &mut ctx);
        }
        village.note_spawn(RoleKind::Builder);
        world.spawn((agent, role, machine))
    }

    fn fixture() -> (hecs::World, Village, SimConfig) {
        let config = SimConfig::default();
        let village = Village::new(TileGrid::filled(24, 24, TileKind::Grass), &config);
        (hecs::World::new(), village, config)
    }

    #[test]
    fn test_no_builder_no_queue() {
        let (mut world, mut village, config) = fixture();
        // stone starts at 700, clamped to the 500 cap: fully utilized
        construction_system(&mut world, &mut village, &config);
        assert!(village.pending_builds().is_empty());
    }

    #[test]
    fn test_waiting_builder_triggers_stonework() {
        let (mut world, mut village, config) = fixture();
        waiting_builder(&mut world, &mut village, &config);

        construction_system(&mut world, &mut village, &config);
        let pending = village.pending_builds();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].kind, BuildingKind::Stonework);

        // same kind already queued, crew saturated: nothing more
        construction_system(&mut world, &mut village, &config);
        assert_eq!(village.pending_builds().len(), 1);
    }

    #[test]
    fn test_crowded_village_queues_housing_first() {
        let (mut world, mut village, config) = fixture();
        waiting_builder(&mut world, &mut village, &config);
        for _ in 0..7 {
            village.note_spawn(RoleKind::Farmer);
        }

        construction_system(&mut world, &mut village, &config);
        assert_eq!(village.pending_builds()[0].kind, BuildingKind::Manor);
    }

    #[test]
    fn test_quiet_economy_queues_nothing() {
        let (mut world, mut village, config) = fixture();
        waiting_builder(&mut world, &mut village, &config);
        // drain the full stocks below the threshold
        assert!(village.stocks.try_debit(Resource::Stone, 200));
        assert!(village.stocks.try_debit(Resource::Crop, 200));

        construction_system(&mut world, &mut village, &config);
        assert!(village.pending_builds().is_empty());
    }
}
