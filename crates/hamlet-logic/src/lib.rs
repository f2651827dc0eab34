//! Pure simulation logic for Hamlet.
//!
//! Everything here is independent of the ECS engine, randomness, and any
//! presentation layer: functions take plain data and return results, so
//! each piece is unit-testable on its own.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`building`] | Building catalog — footprints, costs, completion effects |
//! | [`config`] | Simulation tunables with validated defaults |
//! | [`geometry`] | World vectors, tile coordinates, conversions |
//! | [`grid`] | Tile grid with bounds-safe access and view-range scans |
//! | [`nav`] | Weighted navigation graph and A* pathfinding |
//! | [`placement`] | Construction decision ladder, lot search, village founding |
//! | [`tile`] | Tile descriptors — kinds, costs, capability flags |

pub mod building;
pub mod config;
pub mod geometry;
pub mod grid;
pub mod nav;
pub mod placement;
pub mod tile;
