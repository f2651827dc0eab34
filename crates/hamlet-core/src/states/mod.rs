//! Role behavior state machines. Each role assembles its own states plus
//! the shared Feeding/Idle pair into one [`StateMachine`].

pub mod angler;
pub mod arborist;
pub mod builder;
pub mod common;
pub mod farmer;
pub mod lumberjack;
pub mod explorer;

use crate::agent::RoleKind;
use crate::fsm::StateMachine;

/// State name constants, shared between machines and transitions.
pub mod names {
    pub const FEEDING: &str = "Feeding";
    pub const IDLE: &str = "Idle";

    pub const SEARCHING: &str = "Searching";
    pub const CHOPPING: &str = "Chopping";
    pub const DELIVERING: &str = "Delivering";

    pub const TILLING: &str = "Tilling";
    pub const SOWING: &str = "Sowing";
    pub const WATERING: &str = "Watering";
    pub const HARVESTING: &str = "Harvesting";

    pub const FISHING: &str = "Fishing";

    pub const SEARCH_STONE: &str = "SearchStone";
    pub const COLLECT_STONE: &str = "CollectStone";
    pub const RETURN_HOME: &str = "Return";
    pub const UNLOAD_STONE: &str = "UnloadStone";

    pub const PLANTING: &str = "Planting";

    pub const WAITING: &str = "Waiting";
    pub const FINDING: &str = "Finding";
    pub const BUILDING: &str = "Building";
}

/// Build the full machine for a role. The machine starts inactive; the
/// engine activates the role's primary state on spawn.
pub fn brain_for(kind: RoleKind) -> StateMachine {
    let mut machine = StateMachine::new();
    machine.add_state(names::FEEDING, Box::new(common::Feeding));
    machine.add_state(names::IDLE, Box::new(common::Idle));
    match kind {
        RoleKind::Lumberjack => {
            machine.add_state(names::SEARCHING, Box::new(lumberjack::Searching));
            machine.add_state(names::CHOPPING, Box::new(lumberjack::Chopping));
            machine.add_state(names::DELIVERING, Box::new(lumberjack::Delivering));
        }
        RoleKind::Farmer => {
            machine.add_state(names::SEARCHING, Box::new(farmer::Searching));
            machine.add_state(names::TILLING, Box::new(farmer::Tilling));
            machine.add_state(names::SOWING, Box::new(farmer::Sowing));
            machine.add_state(names::WATERING, Box::new(farmer::Watering));
            machine.add_state(names::HARVESTING, Box::new(farmer::Harvesting));
            machine.add_state(names::DELIVERING, Box::new(farmer::Delivering));
        }
        RoleKind::Angler => {
            machine.add_state(names::SEARCHING, Box::new(angler::Searching));
            machine.add_state(names::FISHING, Box::new(angler::Fishing));
            machine.add_state(names::DELIVERING, Box::new(angler::Delivering));
        }
        RoleKind::Explorer => {
            machine.add_state(names::SEARCH_STONE, Box::new(explorer::SearchStone));
            machine.add_state(names::COLLECT_STONE, Box::new(explorer::CollectStone));
            machine.add_state(names::RETURN_HOME, Box::new(explorer::ReturnHome));
            machine.add_state(names::UNLOAD_STONE, Box::new(explorer::UnloadStone));
        }
        RoleKind::Arborist => {
            machine.add_state(names::PLANTING, Box::new(arborist::Planting));
        }
        RoleKind::Builder => {
            machine.add_state(names::WAITING, Box::new(builder::Waiting));
            machine.add_state(names::FINDING, Box::new(builder::Finding));
            machine.add_state(names::BUILDING, Box::new(builder::Building));
        }
    }
    machine
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::ALL_ROLES;

    #[test]
    fn test_every_role_registers_its_primary_state() {
        for kind in ALL_ROLES {
            let machine = brain_for(kind);
            assert!(
                machine.has_state(kind.stats().primary_state),
                "{:?}",
                kind
            );
            assert!(machine.has_state(names::FEEDING));
            assert!(machine.has_state(names::IDLE));
            assert_eq!(machine.active_state(), None);
        }
    }
}
