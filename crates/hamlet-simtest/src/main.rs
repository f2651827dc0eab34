//! Hamlet Headless Simulation Harness
//!
//! Validates pure village logic and full multi-day engine runs without a
//! renderer. Runs entirely in-process — no windowing, no networking.
//!
//! Usage:
//!   cargo run -p hamlet-simtest
//!   cargo run -p hamlet-simtest -- --verbose

use hamlet_core::agent::{Agent, RoleKind, ALL_ROLES};
use hamlet_core::fsm::StateMachine;
use hamlet_core::prelude::*;
use hamlet_logic::building::{BuildingKind, Resource};
use hamlet_logic::config::SimConfig;
use hamlet_logic::geometry::GridPos;
use hamlet_logic::grid::TileGrid;
use hamlet_logic::nav::{self, NavGraph};
use hamlet_logic::placement::{self, UtilizationInput};
use hamlet_logic::tile::{Tile, TileKind};

// ── Scenario config (tuning the balance checks run against) ────────────
const SCENARIO_JSON: &str = include_str!("../../../data/scenario.json");

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn check(name: &str, passed: bool, detail: String) -> TestResult {
    TestResult {
        name: name.into(),
        passed,
        detail,
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let verbose = std::env::args().any(|a| a == "--verbose");
    println!("=== Hamlet Simulation Harness ===\n");

    let mut results = Vec::new();

    // 1. Scenario config parse + validation
    results.extend(validate_scenario_config(verbose));

    // 2. Island terrain and grid scans
    results.extend(validate_terrain(verbose));

    // 3. Pathfinding on island terrain
    results.extend(validate_pathfinding(verbose));

    // 4. Construction decision ladder and lot search
    results.extend(validate_placement(verbose));

    // 5. Multi-day engine run
    results.extend(validate_engine_run(verbose));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

fn scenario() -> SimConfig {
    serde_json::from_str(SCENARIO_JSON).expect("scenario config must parse")
}

/// Deterministic island: water rim, a lake near the north-west, a stone
/// outcrop in the south-east, trees scattered over the grassland.
fn island(width: i32, height: i32) -> TileGrid {
    TileGrid::from_fn(width, height, |pos| {
        let GridPos { x, y } = pos;
        let rim = x < 2 || y < 2 || x >= width - 2 || y >= height - 2;
        if rim {
            return Tile::of(TileKind::DeepWater);
        }
        let lake = (x - 14) * (x - 14) + (y - 14) * (y - 14) <= 25;
        if lake {
            return Tile::of(TileKind::Water);
        }
        if x >= width - 12 && y >= height - 12 && (x + y) % 3 == 0 {
            return Tile::of(TileKind::SmoothStone);
        }
        if (x * 7 + y * 13) % 19 == 0 {
            return Tile::of(TileKind::Tree);
        }
        Tile::of(TileKind::Grass)
    })
}

// ── 1. Scenario config ──────────────────────────────────────────────────

fn validate_scenario_config(_verbose: bool) -> Vec<TestResult> {
    println!("--- Scenario Config ---");
    let mut results = Vec::new();

    let config: SimConfig = match serde_json::from_str(SCENARIO_JSON) {
        Ok(c) => c,
        Err(e) => {
            results.push(check(
                "scenario_parse",
                false,
                format!("JSON parse error: {}", e),
            ));
            return results;
        }
    };
    results.push(check("scenario_parse", true, "parsed".into()));

    results.push(check(
        "scenario_valid",
        config.validate().is_ok(),
        format!("{:?}", config.validate()),
    ));
    results.push(check(
        "scenario_work_window",
        config.workday_end <= config.daytime,
        format!(
            "workday ends {} within {} daylight seconds",
            config.workday_end, config.daytime
        ),
    ));
    results.push(check(
        "scenario_starting_stocks_fit",
        config.starting_crop <= config.crop_capacity
            && config.starting_fish <= config.fish_capacity,
        "food stocks start within capacity".into(),
    ));
    results
}

// ── 2. Terrain and grid scans ───────────────────────────────────────────

fn validate_terrain(_verbose: bool) -> Vec<TestResult> {
    println!("--- Island Terrain ---");
    let mut results = Vec::new();
    let grid = island(64, 64);

    let mut grass = 0;
    let mut water = 0;
    let mut trees = 0;
    let mut stone = 0;
    for y in 0..grid.height() {
        for x in 0..grid.width() {
            match grid.tile_at(GridPos::new(x, y)).kind {
                TileKind::Grass => grass += 1,
                TileKind::Water | TileKind::DeepWater => water += 1,
                TileKind::Tree => trees += 1,
                TileKind::SmoothStone => stone += 1,
                _ => {}
            }
        }
    }
    results.push(check(
        "terrain_mix",
        grass > 2000 && water > 100 && trees > 100 && stone > 20,
        format!(
            "{} grass, {} water, {} trees, {} stone",
            grass, water, trees, stone
        ),
    ));

    // rim lookups never panic and read as impassable
    let oob = grid.tile_at(GridPos::new(-5, 200));
    results.push(check(
        "grid_oob_impassable",
        !oob.walkable && !oob.buildable,
        "out-of-bounds tiles are deep water".into(),
    ));

    // a view scan from the middle of the grass finds the nearest tree
    let center = GridPos::new(32, 32);
    let tree = grid.find_kind_near(center, 8, TileKind::Tree);
    results.push(check(
        "grid_view_scan",
        tree.map(|t| t.manhattan(&center) <= 8).unwrap_or(false),
        format!("nearest tree {:?}", tree),
    ));

    results
}

// ── 3. Pathfinding ──────────────────────────────────────────────────────

fn validate_pathfinding(verbose: bool) -> Vec<TestResult> {
    println!("--- Pathfinding ---");
    let mut results = Vec::new();
    let grid = island(64, 64);
    let graph = NavGraph::build(&grid);

    results.push(check(
        "nav_walkable_only",
        !graph.contains(GridPos::new(0, 0)) && graph.contains(GridPos::new(32, 32)),
        format!("{} nodes", graph.node_count()),
    ));

    // cross-island route skirting the lake
    let start = GridPos::new(5, 5);
    let goal = GridPos::new(58, 58);
    let path = nav::astar(&graph, start, goal);
    let on_water = path.iter().any(|p| !grid.tile_at(*p).walkable);
    results.push(check(
        "nav_route_across_island",
        !path.is_empty() && !on_water && path.last() == Some(&goal),
        format!("{} waypoints", path.len()),
    ));
    if verbose {
        println!("  route {:?} -> {:?}: {} steps", start, goal, path.len());
    }

    // consecutive waypoints stay adjacent
    let contiguous = path.windows(2).all(|w| {
        (w[0].x - w[1].x).abs() <= 1 && (w[0].y - w[1].y).abs() <= 1
    });
    results.push(check("nav_route_contiguous", contiguous, "8-connected".into()));

    // the lake interior is unreachable
    let lake = nav::astar(&graph, start, GridPos::new(14, 14));
    results.push(check(
        "nav_unreachable_is_empty",
        lake.is_empty(),
        "no route into open water".into(),
    ));

    results
}

// ── 4. Placement decisions ──────────────────────────────────────────────

fn validate_placement(_verbose: bool) -> Vec<TestResult> {
    println!("--- Placement ---");
    let mut results = Vec::new();
    let grid = island(64, 64);

    let site = placement::find_village_site(&grid);
    results.push(check(
        "placement_founding_site",
        site.is_some(),
        format!("site {:?}", site),
    ));

    if let Some(block) = site {
        let lot = placement::find_lot(&grid, block, BuildingKind::TownCenter, &[]);
        results.push(check(
            "placement_town_center_lot",
            lot.is_some(),
            format!("lot {:?}", lot),
        ));
    }

    // ladder priorities at the scenario threshold
    let config = scenario();
    let full_stone = UtilizationInput {
        population: 2,
        population_cap: 8,
        stone: 500,
        stone_cap: 500,
        wood_cap: 500,
        fish_cap: 500,
        crop_cap: 500,
        ..Default::default()
    };
    results.push(check(
        "placement_ladder_stone",
        placement::next_building(&full_stone, config.utilization_threshold)
            == Some(BuildingKind::Stonework),
        "full stone stock asks for a stonework".into(),
    ));

    let quiet = UtilizationInput {
        population: 2,
        population_cap: 8,
        wood_cap: 500,
        stone_cap: 500,
        fish_cap: 500,
        crop_cap: 500,
        ..Default::default()
    };
    results.push(check(
        "placement_ladder_quiet",
        placement::next_building(&quiet, config.utilization_threshold).is_none(),
        "low stocks ask for nothing".into(),
    ));

    results
}

// ── 5. Multi-day engine run ─────────────────────────────────────────────

fn validate_engine_run(verbose: bool) -> Vec<TestResult> {
    println!("--- Engine Run ---");
    let mut results = Vec::new();
    let config = scenario();
    let delta = 1.0 / 60.0;
    let days = 3u32;
    let ticks = (days as f32 * config.day_length / delta) as u64;

    let mut engine = match SimulationEngine::new(island(64, 64), config.clone()) {
        Ok(e) => e,
        Err(e) => {
            results.push(check("engine_new", false, format!("{}", e)));
            return results;
        }
    };
    found_village(&mut engine);

    results.push(check(
        "engine_founded",
        engine.village.building_count() == 1
            && engine.population() == config.starting_population.total(),
        format!(
            "{} buildings, {} villagers",
            engine.village.building_count(),
            engine.population()
        ),
    ));

    let mut caps_held = true;
    let mut pop_held = true;
    for tick in 0..ticks {
        engine.tick(delta);
        if tick % 100 == 0 {
            let stocks = &engine.village.stocks;
            for res in [Resource::Wood, Resource::Stone, Resource::Fish, Resource::Crop] {
                if stocks.get(res) > stocks.cap(res) {
                    caps_held = false;
                }
            }
            if engine.population() > engine.village.population_cap {
                pop_held = false;
            }
        }
    }

    results.push(check(
        "engine_days_elapsed",
        engine.village.clock.day >= days,
        format!("day {}", engine.village.clock.day),
    ));
    results.push(check("engine_caps_held", caps_held, "stocks never exceeded caps".into()));
    results.push(check(
        "engine_population_within_cap",
        pop_held,
        format!(
            "{} of {}",
            engine.population(),
            engine.village.population_cap
        ),
    ));
    results.push(check(
        "engine_queue_bounded",
        engine.village.pending_builds().len()
            <= engine.village.role_count(RoleKind::Builder) as usize,
        format!("{} pending", engine.village.pending_builds().len()),
    ));

    // every survivor stands on walkable ground in a registered state
    let mut grounded = true;
    let mut machines_sane = true;
    for (_, (agent, machine)) in engine.world().query::<(&Agent, &StateMachine)>().iter() {
        if !engine.village.grid.tile_at(agent.tile()).walkable {
            grounded = false;
        }
        match machine.active_state() {
            Some(name) if machine.has_state(name) => {}
            _ => machines_sane = false,
        }
    }
    results.push(check("engine_agents_grounded", grounded, "all on walkable tiles".into()));
    results.push(check(
        "engine_machines_sane",
        machines_sane,
        "every agent in a registered state".into(),
    ));

    // the farming rotation only tracks actual field tiles
    let fields_consistent = engine.village.fields.iter().all(|pos| {
        matches!(
            engine.village.grid.tile_at(*pos).kind,
            TileKind::Soil | TileKind::Shoots | TileKind::MatureCrop
        )
    });
    results.push(check(
        "engine_field_registry_consistent",
        fields_consistent,
        format!("{} fields in rotation", engine.village.fields.len()),
    ));

    // the population ledger matches the ECS world
    let bodies = engine.world().query::<&Agent>().iter().count() as u32;
    results.push(check(
        "engine_ledger_matches_world",
        bodies == engine.population(),
        format!("{} bodies, ledger {}", bodies, engine.population()),
    ));

    let snapshot = engine.snapshot();
    let encoded = serde_json::to_string(&snapshot);
    results.push(check(
        "engine_snapshot_serializes",
        encoded.is_ok(),
        encoded.map(|s| format!("{} bytes", s.len())).unwrap_or_else(|e| e.to_string()),
    ));
    if verbose {
        println!("  final snapshot: {:?}", snapshot);
        for kind in ALL_ROLES {
            println!("    {}: {}", kind.name(), engine.village.role_count(kind));
        }
    }

    results
}
