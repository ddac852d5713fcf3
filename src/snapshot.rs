//! Serializable read model of a [`Game`], handed to UI layers and hooks.

use serde::{Deserialize, Serialize};

use crate::buildings::Placement;
use crate::game::Game;
use crate::graph::UpgradeStatus;
use crate::resources::{ResourceBundle, ResourceKind};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceSnapshot {
    pub kind: ResourceKind,
    pub amount: f64,
    pub per_second: f64,
    pub click_power: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingSnapshot {
    pub index: usize,
    pub name: String,
    pub count: u32,
    pub unlocked: bool,
    pub affordable: bool,
    pub next_cost: ResourceBundle,
    /// Output after upgrade multipliers.
    pub production: ResourceBundle,
    pub placements: Vec<Placement>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopulationSnapshot {
    pub total: u32,
    pub idle: u32,
    pub workers: u32,
    pub max_population: u32,
    pub growth_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpgradeSnapshot {
    pub node: usize,
    pub upgrade: usize,
    pub name: String,
    pub tier: u8,
    pub status: UpgradeStatus,
    pub cost: ResourceBundle,
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub tick: u64,
    pub game_time: f64,
    pub seed: u64,
    pub resources: Vec<ResourceSnapshot>,
    pub buildings: Vec<BuildingSnapshot>,
    pub population: PopulationSnapshot,
    pub upgrades: Vec<UpgradeSnapshot>,
    pub cost_reduction: f64,
    pub loaded_chunks: usize,
    pub selected_building: Option<usize>,
}

impl GameSnapshot {
    pub fn capture(game: &Game) -> Self {
        let economy = game.economy();
        let ledger = economy.ledger();

        let resources = ResourceKind::ALL
            .iter()
            .map(|&kind| ResourceSnapshot {
                kind,
                amount: ledger.amount(kind),
                per_second: ledger.per_second(kind),
                click_power: ledger.click_power(kind),
            })
            .collect();

        let buildings = economy
            .buildings()
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                let instance = economy.instance(index);
                BuildingSnapshot {
                    index,
                    name: entry.name.clone(),
                    count: instance.map_or(0, |instance| instance.count),
                    unlocked: economy.is_unlocked(index),
                    affordable: economy.can_afford(index),
                    next_cost: economy.next_cost(index).unwrap_or(entry.cost),
                    production: economy.effective_production(index).unwrap_or_default(),
                    placements: instance
                        .map(|instance| instance.placements.clone())
                        .unwrap_or_default(),
                }
            })
            .collect();

        let population = economy.population();
        let population = PopulationSnapshot {
            total: population.total(),
            idle: population.idle(),
            workers: population.workers(),
            max_population: population.max_population(),
            growth_rate: population.growth_rate(),
        };

        let graph = game.graph();
        let upgrades = graph
            .nodes()
            .iter()
            .enumerate()
            .filter_map(|(node, graph_node)| {
                let entry = economy.upgrades().get(graph_node.upgrade)?;
                Some(UpgradeSnapshot {
                    node,
                    upgrade: graph_node.upgrade,
                    name: entry.name.clone(),
                    tier: entry.tier,
                    status: graph.status(node, economy.upgrades()),
                    cost: entry.cost,
                    x: graph_node.x,
                    y: graph_node.y,
                })
            })
            .collect();

        Self {
            tick: game.current_tick(),
            game_time: economy.game_time(),
            seed: game.seed(),
            resources,
            buildings,
            population,
            upgrades,
            cost_reduction: economy.cost_reduction(),
            loaded_chunks: game.world().loaded_chunks(),
            selected_building: economy.placement().selected,
        }
    }

    pub fn resource(&self, kind: ResourceKind) -> Option<&ResourceSnapshot> {
        self.resources.iter().find(|resource| resource.kind == kind)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
