//! Hamlet Core - Village Economy Simulation Engine
//!
//! A tick-based simulation of a small self-sustaining village: six
//! villager roles gather, farm, fish, and build, while a shared economy
//! decides what the settlement raises next.
//!
//! # Architecture
//!
//! The engine keeps agents in a `hecs` ECS world; each entity carries a
//! generic body, a role data block, and a named-state behavior machine:
//! - **Agent**: position, navigation, reserves, work progress
//! - **RoleData**: role-specific working memory (carried crop, claims)
//! - **StateMachine**: the role's behavior states
//!
//! The shared [`world::Village`] (grid, navigation graph, stocks,
//! buildings, task queues) is passed into every state hook explicitly.
//!
//! # Example
//!
//! ```rust,no_run
//! use hamlet_core::prelude::*;
//! use hamlet_logic::config::SimConfig;
//! use hamlet_logic::grid::TileGrid;
//! use hamlet_logic::tile::TileKind;
//!
//! let grid = TileGrid::filled(64, 64, TileKind::Grass);
//! let mut engine = SimulationEngine::new(grid, SimConfig::default()).unwrap();
//! found_village(&mut engine);
//!
//! // Run simulation
//! loop {
//!     engine.tick(1.0 / 60.0); // 60 FPS
//! }
//! ```

pub mod agent;
pub mod engine;
pub mod fsm;
pub mod setup;
pub mod states;
pub mod systems;
pub mod world;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::agent::{Agent, RoleData, RoleKind};
    pub use crate::engine::{SimulationEngine, WorldSnapshot};
    pub use crate::setup::found_village;
    pub use crate::world::Village;
}
