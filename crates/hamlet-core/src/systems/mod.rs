//! Per-tick world systems run by the engine after agent thinking:
//! movement, daily upkeep, and the construction decision.

pub mod construction;
pub mod movement;
pub mod upkeep;

pub use construction::construction_system;
pub use movement::movement_system;
pub use upkeep::{consumption_system, growth_system};
