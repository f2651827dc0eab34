//! Agent components — one generic body shared by every role, plus a
//! tagged role data block. Role behavior itself lives in [`crate::states`].

use hamlet_logic::geometry::{GridPos, Vec2};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum RoleKind {
    Lumberjack,
    Farmer,
    Angler,
    Explorer,
    Arborist,
    Builder,
}

pub const ALL_ROLES: [RoleKind; 6] = [
    RoleKind::Lumberjack,
    RoleKind::Farmer,
    RoleKind::Angler,
    RoleKind::Explorer,
    RoleKind::Arborist,
    RoleKind::Builder,
];

/// Per-role tuning: movement speed (world units/second), how far the role
/// scans for work tiles, when it goes hungry, and its home state.
#[derive(Debug, Clone, Copy)]
pub struct RoleStats {
    pub speed: f32,
    pub view_range: i32,
    pub hunger_limit: f32,
    pub primary_state: &'static str,
}

impl RoleKind {
    pub fn stats(&self) -> RoleStats {
        use crate::states::names;
        match self {
            RoleKind::Lumberjack => RoleStats {
                speed: 100.0,
                view_range: 6,
                hunger_limit: 40.0,
                primary_state: names::SEARCHING,
            },
            RoleKind::Farmer => RoleStats {
                speed: 80.0,
                view_range: 2,
                hunger_limit: 40.0,
                primary_state: names::SEARCHING,
            },
            RoleKind::Angler => RoleStats {
                speed: 80.0,
                view_range: 3,
                hunger_limit: 40.0,
                primary_state: names::SEARCHING,
            },
            RoleKind::Explorer => RoleStats {
                speed: 80.0,
                view_range: 8,
                hunger_limit: 50.0,
                primary_state: names::SEARCH_STONE,
            },
            RoleKind::Arborist => RoleStats {
                speed: 80.0,
                view_range: 4,
                hunger_limit: 40.0,
                primary_state: names::PLANTING,
            },
            RoleKind::Builder => RoleStats {
                speed: 80.0,
                view_range: 4,
                hunger_limit: 60.0,
                primary_state: names::WAITING,
            },
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            RoleKind::Lumberjack => "lumberjack",
            RoleKind::Farmer => "farmer",
            RoleKind::Angler => "angler",
            RoleKind::Explorer => "explorer",
            RoleKind::Arborist => "arborist",
            RoleKind::Builder => "builder",
        }
    }
}

/// Farmer working memory: the field tile currently claimed from one of
/// the village task queues, and the crop carried to the barn.
#[derive(Debug, Clone, Copy, Default)]
pub struct FarmerData {
    pub target: Option<GridPos>,
    pub crop: u32,
}

/// Builder working memory: the pending-construction entry being worked,
/// and whether this builder owns the claim or assists another.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuilderData {
    pub pending: Option<u64>,
    pub owner: bool,
}

/// Role-specific data block carried alongside the generic [`Agent`].
#[derive(Debug, Clone)]
pub enum RoleData {
    Lumberjack,
    Farmer(FarmerData),
    Angler { fish: u32 },
    Explorer { stone: f32 },
    Arborist,
    Builder(BuilderData),
}

impl RoleData {
    pub fn new(kind: RoleKind) -> Self {
        match kind {
            RoleKind::Lumberjack => RoleData::Lumberjack,
            RoleKind::Farmer => RoleData::Farmer(FarmerData::default()),
            RoleKind::Angler => RoleData::Angler { fish: 0 },
            RoleKind::Explorer => RoleData::Explorer { stone: 0.0 },
            RoleKind::Arborist => RoleData::Arborist,
            RoleKind::Builder => RoleData::Builder(BuilderData::default()),
        }
    }

    pub fn kind(&self) -> RoleKind {
        match self {
            RoleData::Lumberjack => RoleKind::Lumberjack,
            RoleData::Farmer(_) => RoleKind::Farmer,
            RoleData::Angler { .. } => RoleKind::Angler,
            RoleData::Explorer { .. } => RoleKind::Explorer,
            RoleData::Arborist => RoleKind::Arborist,
            RoleData::Builder(_) => RoleKind::Builder,
        }
    }
}

/// The generic mobile villager body: continuous position, navigation
/// state, reserves, and work progress. Behavior reads and writes this
/// through the FSM context.
#[derive(Debug, Clone)]
pub struct Agent {
    pub position: Vec2,
    pub destination: Vec2,
    /// Cached waypoints toward the destination tile.
    pub path: Vec<Vec2>,
    pub path_cursor: usize,
    /// Destination tile the cached path was computed for.
    pub path_goal: Option<GridPos>,
    /// Destination tile the pathfinder last failed on; cleared when the
    /// destination changes so the search is not re-run every tick.
    pub path_failed_for: Option<GridPos>,
    pub base_speed: f32,
    pub speed: f32,
    /// Wander heading in degrees.
    pub heading: f32,
    pub view_range: i32,
    pub food: f32,
    pub water: f32,
    pub energy: f32,
    pub hunger_limit: f32,
    pub primary_state: &'static str,
    /// Completed work beats on the current job.
    pub hits: u32,
    /// Ticks accumulated toward the next work beat.
    pub beat: u32,
    pub rested: bool,
}

impl Agent {
    pub fn new(kind: RoleKind, position: Vec2) -> Self {
        let stats = kind.stats();
        Self {
            position,
            destination: position,
            path: Vec::new(),
            path_cursor: 0,
            path_goal: None,
            path_failed_for: None,
            base_speed: stats.speed,
            speed: stats.speed,
            heading: 0.0,
            view_range: stats.view_range,
            food: 70.0,
            water: 70.0,
            energy: 70.0,
            hunger_limit: stats.hunger_limit,
            primary_state: stats.primary_state,
            hits: 0,
            beat: 0,
            rested: false,
        }
    }

    pub fn tile(&self) -> GridPos {
        GridPos::of_world(self.position)
    }

    pub fn dest_tile(&self) -> GridPos {
        GridPos::of_world(self.destination)
    }

    pub fn distance_to_destination(&self) -> f32 {
        self.position.distance(&self.destination)
    }

    /// Set a new destination, invalidating navigation bookkeeping.
    pub fn set_destination(&mut self, dest: Vec2) {
        self.destination = dest;
        self.path.clear();
        self.path_cursor = 0;
        self.path_goal = None;
        self.path_failed_for = None;
    }

    /// Snap in place: the current position becomes the destination.
    pub fn stand_still(&mut self) {
        self.set_destination(self.position);
    }

    pub fn hungry(&self) -> bool {
        self.food < self.hunger_limit
    }

    /// Advance work progress by one tick; every `beat_ticks` ticks counts
    /// one completed beat. Returns the beat total so far.
    pub fn tick_work(&mut self, beat_ticks: u32) -> u32 {
        self.beat += 1;
        if self.beat >= beat_ticks.max(1) {
            self.beat = 0;
            self.hits += 1;
        }
        self.hits
    }

    pub fn reset_work(&mut self) {
        self.beat = 0;
        self.hits = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_stats() {
        assert_eq!(RoleKind::Lumberjack.stats().speed, 100.0);
        assert_eq!(RoleKind::Explorer.stats().view_range, 8);
        assert_eq!(RoleKind::Builder.stats().hunger_limit, 60.0);
        for kind in ALL_ROLES {
            assert_eq!(RoleData::new(kind).kind(), kind);
        }
    }

    #[test]
    fn test_work_beats() {
        let mut agent = Agent::new(RoleKind::Lumberjack, Vec2::ZERO);
        for _ in 0..29 {
            assert_eq!(agent.tick_work(30), 0);
        }
        assert_eq!(agent.tick_work(30), 1);
        assert_eq!(agent.tick_work(30), 1);
        agent.reset_work();
        assert_eq!(agent.hits, 0);
        assert_eq!(agent.beat, 0);
    }

    #[test]
    fn test_set_destination_clears_navigation() {
        let mut agent = Agent::new(RoleKind::Farmer, Vec2::new(16.0, 16.0));
        agent.path = vec![Vec2::new(48.0, 16.0)];
        agent.path_failed_for = Some(GridPos::new(5, 5));
        agent.set_destination(Vec2::new(100.0, 100.0));
        assert!(agent.path.is_empty());
        assert_eq!(agent.path_failed_for, None);
        assert_eq!(agent.dest_tile(), GridPos::new(3, 3));
    }
}
