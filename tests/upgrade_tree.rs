use procciv::game::{Game, GameSettings};
use procciv::graph::{default_layout, NodeSpec, UpgradeGraph, UpgradeStatus};
use procciv::resources::ResourceBundle;
use procciv::upgrades::default_upgrades;
use procciv::CatalogError;

fn rich_game() -> Game {
    let settings = GameSettings::default()
        .with_seed(1)
        .with_starting_resources(ResourceBundle::splat(1.0e9));
    Game::new(settings).expect("default catalogs are valid")
}

#[test]
fn default_tree_is_acyclic() {
    let graph = UpgradeGraph::build(&default_layout(), default_upgrades().len()).unwrap();
    let order = graph.topological_order().unwrap();
    assert_eq!(order.len(), graph.len());
    for index in 0..graph.len() {
        assert!(!graph.reachable_from(index).contains(&index));
    }
    let position = |node: usize| order.iter().position(|&n| n == node).unwrap();
    for (index, node) in graph.nodes().iter().enumerate() {
        for &prerequisite in &node.prerequisites {
            assert!(position(prerequisite) < position(index));
        }
    }
}

#[test]
fn purchased_nodes_stay_unavailable() {
    let mut game = rich_game();
    assert!(game.is_upgrade_available(3));
    assert!(game.purchase_upgrade(3));
    for _ in 0..5 {
        assert!(!game.is_upgrade_available(3));
        assert_eq!(game.upgrade_status(3), Some(UpgradeStatus::Purchased));
        game.tick(1.0);
    }
    assert!(!game.purchase_upgrade(3));
}

#[test]
fn node_opens_on_last_prerequisite() {
    let mut game = rich_game();
    // Mechanization (node 17) needs Farming Techniques, Sawmill Tech and Explosives.
    let mechanization = 17;
    assert_eq!(game.graph().node(mechanization).unwrap().prerequisites, vec![4, 5, 6]);
    for root in [0, 1, 2] {
        assert!(game.purchase_upgrade(root));
    }
    assert!(game.purchase_upgrade(4));
    assert!(!game.is_upgrade_available(mechanization));
    assert!(game.purchase_upgrade(5));
    assert!(!game.is_upgrade_available(mechanization));
    assert!(!game.purchase_upgrade(mechanization));
    assert!(game.purchase_upgrade(6));
    assert!(game.is_upgrade_available(mechanization));
    assert!(game.purchase_upgrade(mechanization));
}

#[test]
fn whole_tree_can_be_bought_in_topological_order() {
    let mut game = rich_game();
    let order = game.graph().topological_order().unwrap();
    for node in order {
        assert!(game.purchase_upgrade(node), "node {node} should be purchasable");
    }
    assert!(game.available_upgrades().is_empty());
    let economy = game.economy();
    assert!(economy.upgrades().iter().all(|u| u.is_purchased()));
    assert!((0..economy.buildings().len()).all(|b| economy.is_unlocked(b)));
    assert_eq!(economy.population().max_population(), 25);
    assert!((economy.cost_reduction() - 0.2).abs() < 1e-12);
}

#[test]
fn custom_tree_with_cycle_is_rejected() {
    let mut layout = default_layout();
    layout[0].prerequisites.push(22);
    let settings = GameSettings {
        layout,
        ..GameSettings::default()
    };
    assert!(matches!(Game::new(settings).err(), Some(CatalogError::Cycle { .. })));

    let specs = vec![NodeSpec {
        upgrade: 0,
        x: 0.0,
        y: 0.0,
        prerequisites: vec![1],
    }];
    assert_eq!(
        UpgradeGraph::build(&specs, 24).err(),
        Some(CatalogError::UnknownPrerequisite {
            node: 0,
            prerequisite: 1
        })
    );
}
