//! Village founding: raise the town center on the chosen block and
//! spawn the starting population at its doorstep.

use hamlet_logic::building::BuildingKind;
use hamlet_logic::placement;

use crate::agent::RoleKind;
use crate::engine::SimulationEngine;

/// Found the village on its scored home block. The town center stands
/// finished from day zero; everyone starts at its doorstep.
pub fn found_village(engine: &mut SimulationEngine) {
    let block = engine.village.village_block;
    let lot = placement::find_lot(&engine.village.grid, block, BuildingKind::TownCenter, &[])
        .unwrap_or(block);
    engine
        .village
        .pave_footprint(lot, BuildingKind::TownCenter.spec().size);
    engine.village.add_building(BuildingKind::TownCenter, lot, true);

    let home = engine
        .village
        .nearest_rest_place(engine.village.center_world())
        .unwrap_or_else(|| engine.village.center_world());
    let counts = engine.config.starting_population;
    let roster = [
        (RoleKind::Lumberjack, counts.lumberjacks),
        (RoleKind::Angler, counts.anglers),
        (RoleKind::Arborist, counts.arborists),
        (RoleKind::Farmer, counts.farmers),
        (RoleKind::Explorer, counts.explorers),
        (RoleKind::Builder, counts.builders),
    ];
    for (kind, count) in roster {
        for _ in 0..count {
            engine.spawn_villager(kind, home);
        }
    }
    tracing::info!(
        population = engine.population(),
        block = ?block,
        "village founded"
    );
}
