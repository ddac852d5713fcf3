//! Prerequisite graph over the upgrade catalog.
//!
//! Nodes wrap an upgrade index plus layout position. Edges run from a
//! prerequisite to the node it gates and are stored in both directions.
//! Acyclicity is checked once when the graph is built; queries never
//! re-check it.

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;
use crate::upgrades::{catalog as up, UpgradeCatalogEntry};

/// Authoring form of a node, as written in the built-in layout or in YAML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSpec {
    pub upgrade: usize,
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub prerequisites: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpgradeNode {
    pub upgrade: usize,
    pub x: f32,
    pub y: f32,
    pub prerequisites: Vec<usize>,
    pub unlocks: Vec<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpgradeStatus {
    Purchased,
    Available,
    Locked,
}

#[derive(Debug, Clone, Default)]
pub struct UpgradeGraph {
    nodes: Vec<UpgradeNode>,
}

impl UpgradeGraph {
    /// Builds the graph, mirroring every prerequisite edge into the
    /// prerequisite's unlock list. Rejects dangling indices and cycles.
    pub fn build(specs: &[NodeSpec], upgrade_count: usize) -> Result<Self, CatalogError> {
        let mut nodes: Vec<UpgradeNode> = specs
            .iter()
            .map(|spec| UpgradeNode {
                upgrade: spec.upgrade,
                x: spec.x,
                y: spec.y,
                prerequisites: spec.prerequisites.clone(),
                unlocks: Vec::new(),
            })
            .collect();

        for (index, spec) in specs.iter().enumerate() {
            if spec.upgrade >= upgrade_count {
                return Err(CatalogError::UnknownUpgrade {
                    node: index,
                    upgrade: spec.upgrade,
                });
            }
            for &prerequisite in &spec.prerequisites {
                if prerequisite >= nodes.len() {
                    return Err(CatalogError::UnknownPrerequisite {
                        node: index,
                        prerequisite,
                    });
                }
                nodes[prerequisite].unlocks.push(index);
            }
        }

        let graph = Self { nodes };
        graph.topological_order()?;
        Ok(graph)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, index: usize) -> Option<&UpgradeNode> {
        self.nodes.get(index)
    }

    pub fn nodes(&self) -> &[UpgradeNode] {
        &self.nodes
    }

    /// First node wrapping `upgrade`, if any.
    pub fn node_for_upgrade(&self, upgrade: usize) -> Option<usize> {
        self.nodes.iter().position(|node| node.upgrade == upgrade)
    }

    pub fn is_purchased(&self, index: usize, upgrades: &[UpgradeCatalogEntry]) -> bool {
        self.nodes
            .get(index)
            .and_then(|node| upgrades.get(node.upgrade))
            .is_some_and(UpgradeCatalogEntry::is_purchased)
    }

    /// Not yet purchased and every prerequisite's upgrade is purchased.
    pub fn is_available(&self, index: usize, upgrades: &[UpgradeCatalogEntry]) -> bool {
        let Some(node) = self.nodes.get(index) else {
            return false;
        };
        let Some(upgrade) = upgrades.get(node.upgrade) else {
            return false;
        };
        if upgrade.is_purchased() {
            return false;
        }
        node.prerequisites
            .iter()
            .all(|&prerequisite| self.is_purchased(prerequisite, upgrades))
    }

    pub fn is_locked(&self, index: usize, upgrades: &[UpgradeCatalogEntry]) -> bool {
        !self.is_purchased(index, upgrades) && !self.is_available(index, upgrades)
    }

    pub fn status(&self, index: usize, upgrades: &[UpgradeCatalogEntry]) -> UpgradeStatus {
        if self.is_purchased(index, upgrades) {
            UpgradeStatus::Purchased
        } else if self.is_available(index, upgrades) {
            UpgradeStatus::Available
        } else {
            UpgradeStatus::Locked
        }
    }

    /// Indices of nodes that can be bought right now, ignoring cost.
    pub fn available(&self, upgrades: &[UpgradeCatalogEntry]) -> Vec<usize> {
        (0..self.nodes.len())
            .filter(|&index| self.is_available(index, upgrades))
            .collect()
    }

    /// Every node reachable from `start` along unlock edges, excluding
    /// `start` itself unless a cycle leads back to it.
    pub fn reachable_from(&self, start: usize) -> Vec<usize> {
        let mut seen = vec![false; self.nodes.len()];
        let mut stack: Vec<usize> = match self.nodes.get(start) {
            Some(node) => node.unlocks.clone(),
            None => return Vec::new(),
        };
        let mut reached = Vec::new();
        while let Some(index) = stack.pop() {
            if seen[index] {
                continue;
            }
            seen[index] = true;
            reached.push(index);
            stack.extend(self.nodes[index].unlocks.iter().copied());
        }
        reached.sort_unstable();
        reached
    }

    /// Kahn's algorithm over unlock edges. Fails on the first node left
    /// with unresolved prerequisites.
    pub fn topological_order(&self) -> Result<Vec<usize>, CatalogError> {
        let mut in_degree: Vec<usize> = self
            .nodes
            .iter()
            .map(|node| node.prerequisites.len())
            .collect();
        let mut ready: Vec<usize> = in_degree
            .iter()
            .enumerate()
            .filter(|(_, degree)| **degree == 0)
            .map(|(index, _)| index)
            .collect();
        let mut order = Vec::with_capacity(self.nodes.len());

        while let Some(index) = ready.pop() {
            order.push(index);
            for &next in &self.nodes[index].unlocks {
                in_degree[next] -= 1;
                if in_degree[next] == 0 {
                    ready.push(next);
                }
            }
        }

        match in_degree.iter().position(|degree| *degree > 0) {
            Some(node) => Err(CatalogError::Cycle { node }),
            None => Ok(order),
        }
    }
}

struct NodeDefinition {
    upgrade: usize,
    x: f32,
    y: f32,
    prerequisites: &'static [usize],
}

const fn node(upgrade: usize, x: f32, y: f32, prerequisites: &'static [usize]) -> NodeDefinition {
    NodeDefinition {
        upgrade,
        x,
        y,
        prerequisites,
    }
}

// Node indices in comments refer to positions in this table.
const UPGRADE_TREE: &[NodeDefinition] = &[
    // tier 1
    node(up::AGRICULTURE, 100.0, 100.0, &[]), // 0
    node(up::FORESTRY, 250.0, 100.0, &[]),    // 1
    node(up::MINING, 400.0, 100.0, &[]),      // 2
    node(up::BETTER_TOOLS, 550.0, 100.0, &[]), // 3
    // tier 2
    node(up::FARMING_TECHNIQUES, 100.0, 220.0, &[0]), // 4
    node(up::SAWMILL_TECH, 250.0, 220.0, &[1]),       // 5
    node(up::EXPLOSIVES, 400.0, 220.0, &[2]),         // 6
    node(up::FORAGING_EXPERT, 550.0, 220.0, &[3]),    // 7
    node(up::MASTER_LUMBERJACK, 700.0, 220.0, &[3]),  // 8
    node(up::HEALTHCARE, 850.0, 100.0, &[]),          // 9
    node(up::IMMIGRATION, 850.0, 220.0, &[9]),        // 10
    node(up::CONSTRUCTION, 175.0, 340.0, &[0, 1]),    // 11
    node(up::DEEP_MINING, 325.0, 340.0, &[2, 1]),     // 12
    // tier 3
    node(up::IRRIGATION, 100.0, 460.0, &[4]),           // 13
    node(up::STEEL_AXES, 250.0, 460.0, &[5]),           // 14
    node(up::INDUSTRIAL_MINING, 400.0, 460.0, &[6]),    // 15
    node(up::GOLD_RUSH, 475.0, 580.0, &[12]),           // 16
    node(up::MECHANIZATION, 250.0, 580.0, &[4, 5, 6]),  // 17
    node(up::REFINED_TOOLS, 625.0, 340.0, &[7, 8]),     // 18
    // tier 4
    node(up::EDUCATION, 850.0, 340.0, &[10]),          // 19
    node(up::AUTOMATION, 700.0, 460.0, &[17]),         // 20
    node(up::MASS_PRODUCTION, 550.0, 700.0, &[17, 20]), // 21
    node(up::HYPER_EFFICIENCY, 700.0, 700.0, &[21]),   // 22
    node(up::MASTER_CRAFTSMAN, 625.0, 580.0, &[18]),   // 23
];

pub fn default_layout() -> Vec<NodeSpec> {
    UPGRADE_TREE
        .iter()
        .map(|def| NodeSpec {
            upgrade: def.upgrade,
            x: def.x,
            y: def.y,
            prerequisites: def.prerequisites.to_vec(),
        })
        .collect()
}
