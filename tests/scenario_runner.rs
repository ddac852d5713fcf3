use std::fs;
use std::path::PathBuf;

use procciv::buildings::catalog::{FARM, LUMBER_MILL};
use procciv::graph::UpgradeStatus;
use procciv::resources::ResourceKind;
use procciv::scenario::ScenarioLoader;
use tempfile::tempdir;

fn scenario_loader() -> ScenarioLoader {
    ScenarioLoader::new(env!("CARGO_MANIFEST_DIR"))
}

fn scenario_path() -> PathBuf {
    PathBuf::from("scenarios/river_valley.yaml")
}

#[test]
fn scenario_loader_reads_fixture() {
    let scenario = scenario_loader().load(scenario_path()).expect("scenario parses");
    assert_eq!(scenario.name, "river_valley");
    assert_eq!(scenario.seed, 12345);
    assert_eq!(scenario.ticks(None), 120);
    assert_eq!(scenario.actions.len(), 11);
    assert_eq!(scenario.starting_resources.wood, 40.0);
}

#[test]
fn fixture_plays_out() {
    let scenario = scenario_loader().load(scenario_path()).unwrap();
    let mut game = scenario.build_game().unwrap();
    let mut ticks = Vec::new();
    let summary = game.run_with_hook(scenario.ticks(None), scenario.tick_seconds, &scenario.actions, |snapshot| {
        ticks.push(snapshot.tick)
    });

    assert_eq!(ticks.len(), 120);
    assert_eq!(ticks.first().copied(), Some(1));
    assert_eq!(ticks.last().copied(), Some(120));
    assert_eq!(summary.applied, 23);
    assert_eq!(summary.rejected, 1);

    let snapshot = game.snapshot();
    assert_eq!(snapshot.buildings[FARM].count, 2);
    assert_eq!(snapshot.buildings[LUMBER_MILL].count, 1);
    assert_eq!(snapshot.buildings[FARM].placements[1].tile_x, 2);
    assert_eq!(snapshot.upgrades[9].status, UpgradeStatus::Purchased);
    assert_eq!(snapshot.upgrades[11].status, UpgradeStatus::Available);
    assert_eq!(snapshot.population.max_population, 15);
    assert!(snapshot.population.total > 5);
    assert!((snapshot.game_time - 120.0).abs() < 1e-9);
    assert!(snapshot.resource(ResourceKind::Food).unwrap().per_second > 0.0);
    assert_eq!(snapshot.resource(ResourceKind::Food).unwrap().click_power, 0.2);
}

#[test]
fn runs_are_deterministic() {
    let scenario = scenario_loader().load(scenario_path()).unwrap();
    let run = || {
        let mut game = scenario.build_game().unwrap();
        game.run(60, scenario.tick_seconds, &scenario.actions);
        game.snapshot()
    };
    assert_eq!(run(), run());
}

#[test]
fn seed_override_changes_the_map() {
    let scenario = scenario_loader().load(scenario_path()).unwrap();
    let mut a = procciv::Game::new(scenario.settings(None)).unwrap();
    let mut b = procciv::Game::new(scenario.settings(Some(54321))).unwrap();
    assert_eq!(b.seed(), 54321);
    let differs = (0..64).any(|x| a.tile(x, 0) != b.tile(x, 0));
    assert!(differs);
}

#[test]
fn loads_scenario_from_temp_dir() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("quarry_rush.yaml");
    fs::write(
        &path,
        r#"
name: quarry_rush
seed: 77
ticks: 30
starting_resources: { food: 50, wood: 50 }
actions:
  - tick: 0
    command: { type: purchase_upgrade, node: 2 }
  - tick: 1
    command: { type: place_building, building: 2, x: -5, y: -5 }
"#,
    )
    .unwrap();

    let scenario = ScenarioLoader::new(dir.path()).load("quarry_rush.yaml").unwrap();
    let mut game = scenario.build_game().unwrap();
    let summary = game.run(scenario.ticks(None), scenario.tick_seconds, &scenario.actions);
    assert_eq!(summary.ticks, 30);
    assert_eq!(summary.applied, 2);
    assert_eq!(game.economy().instance(2).unwrap().count, 1);
}

#[test]
fn missing_scenario_reports_path() {
    let dir = tempdir().expect("tempdir");
    let err = ScenarioLoader::new(dir.path()).load("nope.yaml").unwrap_err();
    assert!(err.to_string().contains("nope.yaml"));
}
