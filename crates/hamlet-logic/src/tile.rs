//! Tile descriptors — kind, traversal cost, and capability flags.
//!
//! A tile mutates by replacing its whole descriptor (till grass → soil,
//! chop a tree → grass), never by flipping a single flag, so the flags can
//! never drift out of step with the kind.

use serde::{Deserialize, Serialize};

/// Every terrain and crop-growth stage a map cell can hold.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TileKind {
    Grass,
    /// Grass carrying a mature tree (choppable).
    Tree,
    /// Grass carrying a freshly planted sapling.
    Sapling,
    Water,
    DeepWater,
    Sand,
    Dirt,
    Snow,
    SmoothStone,
    Cobblestone,
    /// Tilled soil, ready for sowing.
    Soil,
    /// Sown field waiting on watering.
    Shoots,
    /// Fully grown field, ready for harvest.
    MatureCrop,
    /// Cobble paving laid under a building footprint.
    Paved,
}

/// Full descriptor for one map cell.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Tile {
    pub kind: TileKind,
    /// Traversal cost feeding navigation edge weights. Always finite and
    /// positive; impassable tiles are excluded from the graph instead of
    /// being given an infinite cost.
    pub cost: f32,
    pub walkable: bool,
    pub buildable: bool,
    pub buildable_on_water: bool,
    pub fishable: bool,
    pub plantable: bool,
    pub tillable: bool,
    pub crop_plantable: bool,
    pub crop_waterable: bool,
    pub crop_harvestable: bool,
    /// Watering progress on `Shoots`; unused on every other kind.
    pub watered: u8,
    /// Waterings required before `Shoots` matures.
    pub watering_required: u8,
}

impl Tile {
    /// Descriptor for a kind, with flags and cost derived from it.
    pub fn of(kind: TileKind) -> Self {
        let mut tile = Self {
            kind,
            cost: 1.0,
            walkable: true,
            buildable: false,
            buildable_on_water: false,
            fishable: false,
            plantable: false,
            tillable: false,
            crop_plantable: false,
            crop_waterable: false,
            crop_harvestable: false,
            watered: 0,
            watering_required: 0,
        };
        match kind {
            TileKind::Grass => {
                tile.buildable = true;
                tile.plantable = true;
                tile.tillable = true;
            }
            TileKind::Tree | TileKind::Sapling | TileKind::Paved => {}
            TileKind::Water => {
                tile.walkable = false;
                tile.cost = 100.0;
                tile.fishable = true;
                tile.buildable_on_water = true;
            }
            TileKind::DeepWater => {
                tile.walkable = false;
                tile.cost = 100.0;
            }
            TileKind::Sand => {
                tile.buildable = true;
            }
            TileKind::Dirt => {
                tile.buildable = true;
                tile.tillable = true;
            }
            TileKind::Snow => {
                tile.cost = 10.0;
            }
            TileKind::SmoothStone => {
                tile.buildable = true;
                tile.cost = 3.0;
            }
            TileKind::Cobblestone => {
                tile.buildable = true;
                tile.cost = 5.0;
            }
            TileKind::Soil => {
                tile.crop_plantable = true;
            }
            TileKind::Shoots => {
                tile.crop_waterable = true;
            }
            TileKind::MatureCrop => {
                tile.crop_harvestable = true;
            }
        }
        tile
    }

    /// Freshly sown field needing `required` waterings to mature.
    pub fn shoots(required: u8) -> Self {
        let mut tile = Self::of(TileKind::Shoots);
        tile.watering_required = required;
        tile
    }

    /// Descriptor returned for out-of-bounds lookups: never walkable,
    /// never buildable, never workable.
    pub fn out_of_bounds() -> Self {
        Self::of(TileKind::DeepWater)
    }

    /// Standing on these halves an agent's base speed.
    pub fn slows_movement(&self) -> bool {
        matches!(self.kind, TileKind::SmoothStone | TileKind::Snow)
    }

    /// Surface stone an explorer can quarry.
    pub fn is_stone(&self) -> bool {
        matches!(self.kind, TileKind::SmoothStone | TileKind::Cobblestone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_KINDS: [TileKind; 14] = [
        TileKind::Grass,
        TileKind::Tree,
        TileKind::Sapling,
        TileKind::Water,
        TileKind::DeepWater,
        TileKind::Sand,
        TileKind::Dirt,
        TileKind::Snow,
        TileKind::SmoothStone,
        TileKind::Cobblestone,
        TileKind::Soil,
        TileKind::Shoots,
        TileKind::MatureCrop,
        TileKind::Paved,
    ];

    #[test]
    fn test_flags_consistent_with_kind() {
        for kind in ALL_KINDS {
            let tile = Tile::of(kind);
            // No amphibious tiles: water capabilities and land work
            // capabilities never mix.
            if tile.fishable || tile.buildable_on_water {
                assert!(!tile.walkable, "{:?}", kind);
                assert!(!tile.tillable, "{:?}", kind);
                assert!(!tile.plantable, "{:?}", kind);
            }
            // Anything a builder may claim must also carry foot traffic.
            if tile.buildable {
                assert!(tile.walkable, "{:?}", kind);
            }
            assert!(tile.cost > 0.0 && tile.cost.is_finite(), "{:?}", kind);
        }
    }

    #[test]
    fn test_crop_stages_are_exclusive() {
        for kind in ALL_KINDS {
            let tile = Tile::of(kind);
            let stages = [tile.crop_plantable, tile.crop_waterable, tile.crop_harvestable];
            assert!(stages.iter().filter(|s| **s).count() <= 1, "{:?}", kind);
        }
    }

    #[test]
    fn test_out_of_bounds_is_inert() {
        let tile = Tile::out_of_bounds();
        assert!(!tile.walkable);
        assert!(!tile.buildable);
        assert!(!tile.tillable);
        assert!(!tile.fishable);
    }

    #[test]
    fn test_shoots_watering_requirement() {
        let tile = Tile::shoots(2);
        assert_eq!(tile.kind, TileKind::Shoots);
        assert_eq!(tile.watering_required, 2);
        assert_eq!(tile.watered, 0);
        assert!(tile.crop_waterable);
    }

    #[test]
    fn test_speed_modifiers() {
        assert!(Tile::of(TileKind::SmoothStone).slows_movement());
        assert!(Tile::of(TileKind::Snow).slows_movement());
        assert!(!Tile::of(TileKind::Grass).slows_movement());
    }
}
