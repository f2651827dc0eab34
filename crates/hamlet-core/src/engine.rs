//! The simulation engine: owns the ECS world and the village, and runs
//! the fixed per-tick pipeline — clock and daily upkeep, agent thinking,
//! movement, the construction decision, and population growth.

use serde::Serialize;

use hamlet_logic::building::Resource;
use hamlet_logic::config::{ConfigError, SimConfig};
use hamlet_logic::geometry::Vec2;
use hamlet_logic::grid::TileGrid;

use crate::agent::{Agent, RoleData, RoleKind, ALL_ROLES};
use crate::fsm::{StateCtx, StateMachine};
use crate::states;
use crate::systems;
use crate::world::Village;

pub struct SimulationEngine {
    world: hecs::World,
    pub village: Village,
    pub config: SimConfig,
    tick_count: u64,
}

impl SimulationEngine {
    pub fn new(grid: TileGrid, config: SimConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let village = Village::new(grid, &config);
        Ok(Self {
            world: hecs::World::new(),
            village,
            config,
            tick_count: 0,
        })
    }

    pub fn world(&self) -> &hecs::World {
        &self.world
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Spawn a villager and start its behavior machine in the role's
    /// primary state.
    pub fn spawn_villager(&mut self, kind: RoleKind, position: Vec2) -> hecs::Entity {
        let entity = self.world.spawn((
            Agent::new(kind, position),
            RoleData::new(kind),
            states::brain_for(kind),
        ));
        self.village.note_spawn(kind);
        if let Ok((agent, role, machine)) = self
            .world
            .query_one_mut::<(&mut Agent, &mut RoleData, &mut StateMachine)>(entity)
        {
            let primary = agent.primary_state;
            let mut ctx = StateCtx {
                id: entity,
                agent,
                role,
                village: &mut self.village,
                config: &self.config,
            };
            machine.set_state(primary, &mut ctx);
        }
        tracing::debug!(role = kind.name(), "villager spawned");
        entity
    }

    /// Advance the simulation by `delta` seconds of simulated time.
    pub fn tick(&mut self, delta: f32) {
        self.tick_count += 1;

        // clock first, so the whole tick sees one consistent time of day
        self.village.clock.time += delta;
        if self.village.clock.time >= self.config.day_length {
            self.village.clock.time -= self.config.day_length;
            self.village.clock.day += 1;
            let starved =
                systems::consumption_system(&mut self.world, self.config.daily_food_consumption);
            for (entity, kind) in starved {
                self.village.note_death(kind);
                self.village.release_claims(entity);
                let _ = self.world.despawn(entity);
                tracing::info!(role = kind.name(), day = self.village.clock.day, "villager starved");
            }
        }

        let entities: Vec<hecs::Entity> = self
            .world
            .query_mut::<&Agent>()
            .into_iter()
            .map(|(entity, _)| entity)
            .collect();
        for entity in entities {
            let Ok((agent, role, machine)) = self
                .world
                .query_one_mut::<(&mut Agent, &mut RoleData, &mut StateMachine)>(entity)
            else {
                continue;
            };
            let mut ctx = StateCtx {
                id: entity,
                agent,
                role,
                village: &mut self.village,
                config: &self.config,
            };
            machine.think(&mut ctx);
        }

        systems::movement_system(&mut self.world, &self.village, delta);
        systems::construction_system(&mut self.world, &mut self.village, &self.config);
        if let Some(kind) = systems::growth_system(&mut self.village, &self.config) {
            let home = self
                .village
                .nearest_rest_place(self.village.center_world())
                .unwrap_or_else(|| self.village.center_world());
            self.spawn_villager(kind, home);
        }
    }

    pub fn population(&self) -> u32 {
        self.village.living_count()
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            day: self.village.clock.day,
            time: self.village.clock.time,
            population: self.village.living_count(),
            population_cap: self.village.population_cap,
            roles: ALL_ROLES
                .iter()
                .map(|kind| (kind.name(), self.village.role_count(*kind)))
                .collect(),
            wood: self.village.stocks.get(Resource::Wood),
            stone: self.village.stocks.get(Resource::Stone),
            fish: self.village.stocks.get(Resource::Fish),
            crop: self.village.stocks.get(Resource::Crop),
            buildings: self.village.building_count(),
            pending_builds: self.village.pending_builds().len(),
        }
    }
}

/// Flat, serializable view of the simulation for logs and harnesses.
#[derive(Debug, Serialize)]
pub struct WorldSnapshot {
    pub day: u32,
    pub time: f32,
    pub population: u32,
    pub population_cap: u32,
    pub roles: Vec<(&'static str, u32)>,
    pub wood: u32,
    pub stone: u32,
    pub fish: u32,
    pub crop: u32,
    pub buildings: usize,
    pub pending_builds: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use hamlet_logic::geometry::GridPos;
    use hamlet_logic::tile::TileKind;

    fn grass_engine() -> SimulationEngine {
        SimulationEngine::new(
            TileGrid::filled(24, 24, TileKind::Grass),
            SimConfig::default(),
        )
        .expect("default config is valid")
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let mut config = SimConfig::default();
        config.day_length = -1.0;
        let result = SimulationEngine::new(TileGrid::filled(8, 8, TileKind::Grass), config);
        assert!(matches!(result, Err(ConfigError::NonPositiveDay(_))));
    }

    #[test]
    fn test_spawn_activates_primary_state() {
        let mut engine = grass_engine();
        let entity = engine.spawn_villager(RoleKind::Builder, GridPos::new(10, 10).center());
        assert_eq!(engine.population(), 1);

        let mut query = engine.world.query_one::<&StateMachine>(entity).unwrap();
        let machine = query.get().unwrap();
        assert_eq!(machine.active_state(), Some(crate::states::names::WAITING));
    }

    #[test]
    fn test_day_boundary_consumes_food() {
        let mut engine = grass_engine();
        let entity = engine.spawn_villager(RoleKind::Lumberjack, GridPos::new(10, 10).center());

        engine.village.clock.time = engine.config.day_length - 0.005;
        engine.tick(0.01);
        assert_eq!(engine.village.clock.day, 1);

        let mut query = engine.world.query_one::<&Agent>(entity).unwrap();
        let agent = query.get().unwrap();
        // spawned with 70, one ration gone at the boundary
        assert_eq!(agent.food, 50.0);
    }

    #[test]
    fn test_starved_agent_despawns() {
        let mut engine = grass_engine();
        let entity = engine.spawn_villager(RoleKind::Lumberjack, GridPos::new(10, 10).center());
        {
            let mut query = engine.world.query_one::<&mut Agent>(entity).unwrap();
            query.get().unwrap().food = 5.0;
        }

        engine.village.clock.time = engine.config.day_length;
        engine.tick(0.01);
        assert!(!engine.world.contains(entity));
        assert_eq!(engine.population(), 0);
    }

    #[test]
    fn test_starved_builder_releases_its_claim() {
        use hamlet_logic::building::BuildingKind;

        let mut engine = grass_engine();
        let entity = engine.spawn_villager(RoleKind::Builder, GridPos::new(10, 10).center());
        let pid = engine.village.push_pending(BuildingKind::House, GridPos::new(8, 8));
        engine.village.pending_by_id_mut(pid).unwrap().claimed_by = Some(entity);
        {
            let mut query = engine.world.query_one::<&mut Agent>(entity).unwrap();
            query.get().unwrap().food = 5.0;
        }

        engine.village.clock.time = engine.config.day_length;
        engine.tick(0.01);
        assert!(!engine.world.contains(entity));
        // the request survives, unclaimed, for the next builder
        assert!(engine.village.pending_by_id(pid).unwrap().claimed_by.is_none());
    }

    #[test]
    fn test_snapshot_reflects_world() {
        let mut engine = grass_engine();
        engine.spawn_villager(RoleKind::Farmer, GridPos::new(10, 10).center());
        engine.spawn_villager(RoleKind::Farmer, GridPos::new(10, 10).center());

        let snapshot = engine.snapshot();
        assert_eq!(snapshot.population, 2);
        assert_eq!(snapshot.crop, 500);
        assert!(snapshot.roles.contains(&("farmer", 2)));
        let encoded = serde_json::to_string(&snapshot).unwrap();
        assert!(encoded.contains("\"population\":2"));
    }
}
