//! Daily upkeep: food consumption at the day boundary and the
//! population growth check.

use rand::Rng;

use hamlet_logic::building::Resource;
use hamlet_logic::config::SimConfig;

use crate::agent::{Agent, RoleData, RoleKind};
use crate::world::Village;

/// Debit the daily ration from every agent. Returns the entities whose
/// food reserve ran out, for the engine to despawn.
pub fn consumption_system(world: &mut hecs::World, amount: f32) -> Vec<(hecs::Entity, RoleKind)> {
    let mut starved = Vec::new();
    for (entity, (agent, role)) in world.query_mut::<(&mut Agent, &RoleData)>() {
        agent.food -= amount;
        if agent.food <= 0.0 {
            starved.push((entity, role.kind()));
        }
    }
    starved
}

/// Roll for a new villager when the village is fed and has room. On
/// success the birth cost is debited and the new role returned; the
/// engine spawns the body.
pub fn growth_system(village: &mut Village, config: &SimConfig) -> Option<RoleKind> {
    let living = village.living_count();
    if living == 0 || living >= village.population_cap {
        return None;
    }
    let crop = village.stocks.get(Resource::Crop);
    let fish = village.stocks.get(Resource::Fish);
    let per_head = (crop + fish) as f32 / living as f32;
    if per_head < config.spawn_food_per_head
        || crop < config.spawn_cost_crop
        || fish < config.spawn_cost_fish
    {
        return None;
    }
    if !village.stocks.try_debit(Resource::Crop, config.spawn_cost_crop)
        || !village.stocks.try_debit(Resource::Fish, config.spawn_cost_fish)
    {
        return None;
    }
    let kind = match rand::thread_rng().gen::<f32>() {
        d if d < 0.35 => RoleKind::Angler,
        d if d < 0.53 => RoleKind::Farmer,
        d if d < 0.67 => RoleKind::Explorer,
        d if d < 0.78 => RoleKind::Arborist,
        d if d < 0.90 => RoleKind::Lumberjack,
        _ => RoleKind::Builder,
    };
    tracing::info!(role = kind.name(), "villager born");
    Some(kind)
}
