//! Agent movement: graph-routed travel between tiles, straight-line
//! closing inside the destination tile, and terrain speed penalties.

use hamlet_logic::geometry::{GridPos, Vec2};
use hamlet_logic::nav;

use crate::agent::Agent;
use crate::world::Village;

/// Slow terrain halves movement speed.
const SLOW_FACTOR: f32 = 0.5;

/// Advance every agent toward its destination by one tick.
pub fn movement_system(world: &mut hecs::World, village: &Village, delta: f32) {
    for (_, agent) in world.query_mut::<&mut Agent>() {
        advance(agent, village, delta);
    }
}

fn step_toward(pos: Vec2, target: Vec2, step: f32) -> Vec2 {
    let offset = target - pos;
    if offset.length() <= step {
        target
    } else {
        pos + offset.normalize() * step
    }
}

fn advance(agent: &mut Agent, village: &Village, delta: f32) {
    agent.speed = if village.grid.tile_at(agent.tile()).slows_movement() {
        agent.base_speed * SLOW_FACTOR
    } else {
        agent.base_speed
    };
    let step = agent.speed * delta;
    if step <= 0.0 {
        return;
    }

    let dest_tile = agent.dest_tile();
    if agent.tile() == dest_tile {
        // same tile: close the sub-tile gap directly
        agent.position = step_toward(agent.position, agent.destination, step);
        return;
    }

    // the cached route is only valid for the tile it was computed for
    if agent.path_goal != Some(dest_tile) {
        agent.path.clear();
        agent.path_cursor = 0;
        agent.path_goal = None;
    }

    if agent.path.is_empty() {
        if agent.path_failed_for == Some(dest_tile) {
            return;
        }
        let path = nav::find_path(&village.graph, agent.position, agent.destination);
        if path.is_empty() {
            agent.path_failed_for = Some(dest_tile);
            tracing::debug!(from = ?agent.tile(), to = ?dest_tile, "no route");
            return;
        }
        agent.path = path;
        agent.path_cursor = 0;
        agent.path_goal = Some(dest_tile);
    }

    let waypoint = agent.path[agent.path_cursor];
    agent.position = step_toward(agent.position, waypoint, step);
    if agent.tile() == GridPos::of_world(waypoint) {
        agent.path_cursor += 1;
        if agent.path_cursor >= agent.path.len() {
            agent.path.clear();
            agent.path_cursor = 0;
            agent.path_goal = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::RoleKind;
    use hamlet_logic::config::SimConfig;
    use hamlet_logic::grid::TileGrid;
    use hamlet_logic::tile::{Tile, TileKind};

    fn grass_village() -> Village {
        Village::new(TileGrid::filled(24, 24, TileKind::Grass), &SimConfig::default())
    }

    #[test]
    fn test_agent_reaches_destination() {
        let village = grass_village();
        let mut agent = Agent::new(RoleKind::Lumberjack, GridPos::new(2, 2).center());
        let goal = GridPos::new(10, 2).center();
        agent.set_destination(goal);

        // 8 tiles at 100 units/sec: comfortably under 5 simulated seconds
        for _ in 0..500 {
            advance(&mut agent, &village, 0.01);
            if agent.position == goal {
                break;
            }
        }
        assert_eq!(agent.position, goal);
        assert!(agent.path.is_empty());
    }

    #[test]
    fn test_route_respects_walls() {
        let mut grid = TileGrid::filled(24, 24, TileKind::Grass);
        // vertical water wall with one gap at y = 20
        for y in 0..24 {
            if y != 20 {
                grid.set(GridPos::new(12, y), Tile::of(TileKind::Water));
            }
        }
        let village = Village::new(grid, &SimConfig::default());
        let mut agent = Agent::new(RoleKind::Lumberjack, GridPos::new(2, 2).center());
        agent.set_destination(GridPos::new(20, 2).center());

        for _ in 0..5000 {
            advance(&mut agent, &village, 0.01);
            assert!(village.grid.tile_at(agent.tile()).walkable);
            if agent.position == agent.destination {
                break;
            }
        }
        assert_eq!(agent.position, agent.destination);
    }

    #[test]
    fn test_unreachable_destination_fails_once() {
        let mut grid = TileGrid::filled(24, 24, TileKind::Grass);
        // island destination surrounded by water
        for y in 9..14 {
            for x in 9..14 {
                grid.set(GridPos::new(x, y), Tile::of(TileKind::Water));
            }
        }
        grid.set(GridPos::new(11, 11), Tile::of(TileKind::Grass));
        let village = Village::new(grid, &SimConfig::default());

        let mut agent = Agent::new(RoleKind::Lumberjack, GridPos::new(2, 2).center());
        agent.set_destination(GridPos::new(11, 11).center());
        let start = agent.position;

        advance(&mut agent, &village, 0.01);
        assert_eq!(agent.position, start);
        assert_eq!(agent.path_failed_for, Some(GridPos::new(11, 11)));

        // the remembered failure suppresses the re-search
        advance(&mut agent, &village, 0.01);
        assert_eq!(agent.position, start);

        // a fresh destination clears it
        agent.set_destination(GridPos::new(4, 2).center());
        assert_eq!(agent.path_failed_for, None);
    }

    #[test]
    fn test_slow_terrain_halves_speed() {
        let mut grid = TileGrid::filled(24, 24, TileKind::Grass);
        grid.set(GridPos::new(2, 2), Tile::of(TileKind::Snow));
        let village = Village::new(grid, &SimConfig::default());

        let mut agent = Agent::new(RoleKind::Lumberjack, GridPos::new(2, 2).center());
        agent.set_destination(GridPos::new(10, 2).center());
        advance(&mut agent, &village, 0.01);
        assert_eq!(agent.speed, agent.base_speed * 0.5);
    }

    #[test]
    fn test_sub_tile_snap() {
        let village = grass_village();
        let mut agent = Agent::new(RoleKind::Lumberjack, GridPos::new(5, 5).center());
        let nudge = agent.position + Vec2::new(3.0, 0.0);
        agent.set_destination(nudge);

        advance(&mut agent, &village, 0.1);
        assert_eq!(agent.position, nudge);
    }
}
