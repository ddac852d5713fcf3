//! Building catalog, owned instances and their map placements.

use serde::{Deserialize, Serialize};

use crate::resources::{ResourceBundle, ResourceKind};
use crate::terrain::Tile;

/// Each unit already owned multiplies the next unit's cost by this factor.
pub const COST_GROWTH: f64 = 1.15;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingCatalogEntry {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub cost: ResourceBundle,
    pub production: ResourceBundle,
    /// Upgrade index whose unlock effect enables this building; `None` means
    /// available from the start.
    #[serde(default)]
    pub unlocked_by: Option<usize>,
    /// Units owned at start. They carry no placement records.
    #[serde(default)]
    pub base_count: u32,
}

impl BuildingCatalogEntry {
    /// Cost of the next unit when `owned` units exist and a fraction
    /// `cost_reduction` of every line item is waived.
    pub fn cost_for(&self, owned: u32, cost_reduction: f64) -> ResourceBundle {
        let exponent = i32::try_from(owned).unwrap_or(i32::MAX);
        self.cost
            .scaled(COST_GROWTH.powi(exponent))
            .scaled(1.0 - cost_reduction)
    }

    /// Best bonus among the resources this building produces. A building
    /// that produces nothing gets a neutral 1.0.
    pub fn tile_bonus(&self, tile: &Tile) -> f64 {
        self.production
            .produced_kinds()
            .map(|kind| tile.bonus(kind))
            .fold(None, |best: Option<f64>, bonus| {
                Some(best.map_or(bonus, |b| b.max(bonus)))
            })
            .unwrap_or(1.0)
    }

    pub fn produces(&self, kind: ResourceKind) -> bool {
        self.production.get(kind) > 0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub tile_x: i32,
    pub tile_y: i32,
    pub bonus: f64,
    pub placed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingInstance {
    /// Index into the building catalog.
    pub kind: usize,
    pub count: u32,
    pub placements: Vec<Placement>,
}

impl BuildingInstance {
    pub fn new(kind: usize, count: u32) -> Self {
        Self {
            kind,
            count,
            placements: Vec::new(),
        }
    }

    /// Raw per-second output before any upgrade multipliers. Instances that
    /// own units but have no placement records produce `base * count`.
    pub fn production(&self, entry: &BuildingCatalogEntry) -> ResourceBundle {
        if self.placements.is_empty() {
            return entry.production.scaled(self.count as f64);
        }
        let mut total = ResourceBundle::ZERO;
        for placement in &self.placements {
            total.add_assign(&entry.production.scaled(placement.bonus));
        }
        total
    }
}

/// How well a tile suits a building, graded from its bonus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacementQuality {
    Poor,
    Marginal,
    Fair,
    Good,
    Excellent,
}

impl PlacementQuality {
    pub fn grade(bonus: f64) -> Self {
        if bonus >= 2.0 {
            PlacementQuality::Excellent
        } else if bonus >= 1.5 {
            PlacementQuality::Good
        } else if bonus >= 1.2 {
            PlacementQuality::Fair
        } else if bonus >= 1.0 {
            PlacementQuality::Marginal
        } else {
            PlacementQuality::Poor
        }
    }
}

pub mod catalog {
    //! Index constants for the built-in building catalog.
    pub const FARM: usize = 0;
    pub const LUMBER_MILL: usize = 1;
    pub const QUARRY: usize = 2;
    pub const MINE: usize = 3;
    pub const HOUSE: usize = 4;
}

struct BuildingDefinition {
    name: &'static str,
    description: &'static str,
    cost: ResourceBundle,
    production: ResourceBundle,
    unlocked_by: usize,
}

const BUILDINGS: &[BuildingDefinition] = &[
    BuildingDefinition {
        name: "Farm",
        description: "Produces food",
        cost: ResourceBundle::new(0.0, 10.0, 0.0, 0.0),
        production: ResourceBundle::new(2.0, 0.0, 0.0, 0.0),
        unlocked_by: crate::upgrades::catalog::AGRICULTURE,
    },
    BuildingDefinition {
        name: "Lumber Mill",
        description: "Produces wood",
        cost: ResourceBundle::new(15.0, 0.0, 5.0, 0.0),
        production: ResourceBundle::new(0.0, 1.5, 0.0, 0.0),
        unlocked_by: crate::upgrades::catalog::FORESTRY,
    },
    BuildingDefinition {
        name: "Quarry",
        description: "Produces stone",
        cost: ResourceBundle::new(10.0, 20.0, 0.0, 0.0),
        production: ResourceBundle::new(0.0, 0.0, 1.0, 0.0),
        unlocked_by: crate::upgrades::catalog::MINING,
    },
    BuildingDefinition {
        name: "Mine",
        description: "Produces gold",
        cost: ResourceBundle::new(25.0, 50.0, 30.0, 0.0),
        production: ResourceBundle::new(0.0, 0.0, 0.0, 0.5),
        unlocked_by: crate::upgrades::catalog::DEEP_MINING,
    },
    BuildingDefinition {
        name: "House",
        description: "Shelter with a kitchen garden",
        cost: ResourceBundle::new(0.0, 30.0, 15.0, 0.0),
        production: ResourceBundle::new(0.5, 0.0, 0.0, 0.0),
        unlocked_by: crate::upgrades::catalog::CONSTRUCTION,
    },
];

pub fn default_buildings() -> Vec<BuildingCatalogEntry> {
    BUILDINGS
        .iter()
        .map(|def| BuildingCatalogEntry {
            name: def.name.to_string(),
            description: def.description.to_string(),
            cost: def.cost,
            production: def.production,
            unlocked_by: Some(def.unlocked_by),
            base_count: 0,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::TerrainCategory;

    fn tile(category: TerrainCategory) -> Tile {
        Tile {
            category,
            bonuses: category.bonuses(),
            ..Tile::default()
        }
    }

    #[test]
    fn cost_scales_per_owned_unit() {
        let farm = &default_buildings()[catalog::FARM];
        assert_eq!(farm.cost_for(0, 0.0).wood, 10.0);
        assert!((farm.cost_for(1, 0.0).wood - 11.5).abs() < 1e-9);
        assert!((farm.cost_for(3, 0.0).wood - 10.0 * 1.15f64.powi(3)).abs() < 1e-9);
        assert!((farm.cost_for(1, 0.2).wood - 11.5 * 0.8).abs() < 1e-9);
        assert_eq!(farm.cost_for(5, 0.0).food, 0.0);
    }

    #[test]
    fn bonus_takes_best_produced_resource() {
        let mill = &default_buildings()[catalog::LUMBER_MILL];
        assert_eq!(mill.tile_bonus(&tile(TerrainCategory::Forest)), 2.0);
        assert_eq!(mill.tile_bonus(&tile(TerrainCategory::Water)), 0.0);

        let mixed = BuildingCatalogEntry {
            name: "Trading Post".into(),
            description: String::new(),
            cost: ResourceBundle::ZERO,
            production: ResourceBundle::new(1.0, 0.0, 0.0, 1.0),
            unlocked_by: None,
            base_count: 0,
        };
        let hills = tile(TerrainCategory::Hills);
        assert_eq!(mixed.tile_bonus(&hills), 1.2);
        let plains = tile(TerrainCategory::Plains);
        assert_eq!(mixed.tile_bonus(&plains), 1.5);
    }

    #[test]
    fn legacy_instances_use_count() {
        let farm = &default_buildings()[catalog::FARM];
        let legacy = BuildingInstance::new(catalog::FARM, 3);
        assert_eq!(legacy.production(farm).food, 6.0);

        let mut placed = BuildingInstance::new(catalog::FARM, 2);
        for bonus in [1.5, 0.5] {
            placed.placements.push(Placement {
                tile_x: 0,
                tile_y: 0,
                bonus,
                placed: true,
            });
        }
        assert_eq!(placed.production(farm).food, 4.0);
    }

    #[test]
    fn quality_grades() {
        assert_eq!(PlacementQuality::grade(2.5), PlacementQuality::Excellent);
        assert_eq!(PlacementQuality::grade(1.5), PlacementQuality::Good);
        assert_eq!(PlacementQuality::grade(1.2), PlacementQuality::Fair);
        assert_eq!(PlacementQuality::grade(1.0), PlacementQuality::Marginal);
        assert_eq!(PlacementQuality::grade(0.3), PlacementQuality::Poor);
    }
}
