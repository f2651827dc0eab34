//! Building catalog — footprints, resource costs, construction effort, and
//! the effects a finished building applies to the village.

use serde::{Deserialize, Serialize};

/// The four stockpiled resources.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Resource {
    Wood,
    Stone,
    Fish,
    Crop,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum BuildingKind {
    LumberYard,
    Barn,
    Stonework,
    FishMarket,
    Dock,
    House,
    Manor,
    TownCenter,
}

/// Static parameters of one building kind.
#[derive(Debug, Clone, Copy)]
pub struct BuildingSpec {
    /// Footprint in tiles (width, height).
    pub size: (i32, i32),
    pub cost_wood: u32,
    pub cost_stone: u32,
    /// Construction effort; one builder contributes 1.0 per tick.
    pub build_effort: f32,
    /// Population capacity added when finished.
    pub supports: u32,
    /// Resource this building accepts deliveries of, if any.
    pub accepts: Option<Resource>,
    /// Stock capacity raised when finished.
    pub capacity_bonus: Option<(Resource, u32)>,
}

impl BuildingKind {
    pub fn spec(&self) -> BuildingSpec {
        match self {
            BuildingKind::LumberYard => BuildingSpec {
                size: (2, 2),
                cost_wood: 150,
                cost_stone: 50,
                build_effort: 4800.0,
                supports: 0,
                accepts: Some(Resource::Wood),
                capacity_bonus: Some((Resource::Wood, 50)),
            },
            BuildingKind::Barn => BuildingSpec {
                size: (2, 2),
                cost_wood: 50,
                cost_stone: 100,
                build_effort: 3600.0,
                supports: 0,
                accepts: Some(Resource::Crop),
                capacity_bonus: Some((Resource::Crop, 500)),
            },
            BuildingKind::Stonework => BuildingSpec {
                size: (2, 2),
                cost_wood: 50,
                cost_stone: 150,
                build_effort: 3600.0,
                supports: 0,
                accepts: Some(Resource::Stone),
                capacity_bonus: Some((Resource::Stone, 500)),
            },
            BuildingKind::FishMarket => BuildingSpec {
                size: (2, 2),
                cost_wood: 150,
                cost_stone: 50,
                build_effort: 7200.0,
                supports: 0,
                accepts: Some(Resource::Fish),
                capacity_bonus: Some((Resource::Fish, 500)),
            },
            BuildingKind::Dock => BuildingSpec {
                size: (2, 2),
                cost_wood: 150,
                cost_stone: 100,
                build_effort: 6000.0,
                supports: 0,
                accepts: Some(Resource::Fish),
                capacity_bonus: Some((Resource::Fish, 25)),
            },
            BuildingKind::House => BuildingSpec {
                size: (1, 1),
                cost_wood: 45,
                cost_stone: 5,
                build_effort: 600.0,
                supports: 5,
                accepts: None,
                capacity_bonus: None,
            },
            BuildingKind::Manor => BuildingSpec {
                size: (2, 2),
                cost_wood: 50,
                cost_stone: 100,
                build_effort: 2400.0,
                supports: 10,
                accepts: None,
                capacity_bonus: None,
            },
            BuildingKind::TownCenter => BuildingSpec {
                size: (2, 2),
                cost_wood: 200,
                cost_stone: 200,
                build_effort: 9000.0,
                supports: 5,
                accepts: None,
                capacity_bonus: None,
            },
        }
    }

    /// Finished buildings that agents rest and feed beside.
    pub fn is_rest_place(&self) -> bool {
        self.spec().supports > 0
    }
}
