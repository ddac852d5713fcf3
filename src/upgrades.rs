//! Upgrade catalog and the effects purchased upgrades apply.
//!
//! Multiplicative effects are never stored as running totals. They are
//! re-derived from the purchased flags by [`Multipliers::fold`], the single
//! place where every multiplier in the game is computed.

use serde::{Deserialize, Serialize};

use crate::resources::{ResourceBundle, ResourceKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectTarget {
    All,
    Resource(ResourceKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UpgradeEffect {
    ProductionMultiplier { target: EffectTarget, factor: f64 },
    ClickMultiplier { target: EffectTarget, factor: f64 },
    PopulationCap { delta: u32 },
    PopulationGrowth { delta: f64 },
    CostReduction { delta: f64 },
    UnlockBuilding { building: usize },
}

impl UpgradeEffect {
    pub fn is_multiplicative(&self) -> bool {
        matches!(
            self,
            UpgradeEffect::ProductionMultiplier { .. } | UpgradeEffect::ClickMultiplier { .. }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpgradeCatalogEntry {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub cost: ResourceBundle,
    pub tier: u8,
    pub effect: UpgradeEffect,
    #[serde(skip)]
    purchased: bool,
}

impl UpgradeCatalogEntry {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        cost: ResourceBundle,
        tier: u8,
        effect: UpgradeEffect,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            cost,
            tier,
            effect,
            purchased: false,
        }
    }

    pub fn is_purchased(&self) -> bool {
        self.purchased
    }

    /// Flips the flag; there is no way back to unpurchased.
    pub(crate) fn mark_purchased(&mut self) {
        self.purchased = true;
    }
}

/// Global and per-resource multipliers derived from purchased upgrades.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Multipliers {
    pub production: f64,
    pub click_power: f64,
    pub production_by_resource: ResourceBundle,
    pub click_by_resource: ResourceBundle,
}

impl Default for Multipliers {
    fn default() -> Self {
        Self {
            production: 1.0,
            click_power: 1.0,
            production_by_resource: ResourceBundle::splat(1.0),
            click_by_resource: ResourceBundle::splat(1.0),
        }
    }
}

impl Multipliers {
    pub fn fold<'a>(upgrades: impl IntoIterator<Item = &'a UpgradeCatalogEntry>) -> Self {
        upgrades
            .into_iter()
            .filter(|upgrade| upgrade.is_purchased())
            .fold(Self::default(), |mut acc, upgrade| {
                match upgrade.effect {
                    UpgradeEffect::ProductionMultiplier { target, factor } => match target {
                        EffectTarget::All => acc.production *= factor,
                        EffectTarget::Resource(kind) => {
                            *acc.production_by_resource.get_mut(kind) *= factor
                        }
                    },
                    UpgradeEffect::ClickMultiplier { target, factor } => match target {
                        EffectTarget::All => acc.click_power *= factor,
                        EffectTarget::Resource(kind) => *acc.click_by_resource.get_mut(kind) *= factor,
                    },
                    UpgradeEffect::PopulationCap { .. }
                    | UpgradeEffect::PopulationGrowth { .. }
                    | UpgradeEffect::CostReduction { .. }
                    | UpgradeEffect::UnlockBuilding { .. } => {}
                }
                acc
            })
    }

    pub fn production_for(&self, kind: ResourceKind) -> f64 {
        self.production * self.production_by_resource.get(kind)
    }

    pub fn click_for(&self, kind: ResourceKind) -> f64 {
        self.click_power * self.click_by_resource.get(kind)
    }
}

pub mod catalog {
    //! Index constants for the built-in upgrade catalog.
    pub const AGRICULTURE: usize = 0;
    pub const FORESTRY: usize = 1;
    pub const MINING: usize = 2;
    pub const CONSTRUCTION: usize = 3;
    pub const BETTER_TOOLS: usize = 4;
    pub const FARMING_TECHNIQUES: usize = 5;
    pub const SAWMILL_TECH: usize = 6;
    pub const EXPLOSIVES: usize = 7;
    pub const DEEP_MINING: usize = 8;
    pub const HEALTHCARE: usize = 9;
    pub const IMMIGRATION: usize = 10;
    pub const IRRIGATION: usize = 11;
    pub const STEEL_AXES: usize = 12;
    pub const INDUSTRIAL_MINING: usize = 13;
    pub const GOLD_RUSH: usize = 14;
    pub const MECHANIZATION: usize = 15;
    pub const REFINED_TOOLS: usize = 16;
    pub const EDUCATION: usize = 17;
    pub const AUTOMATION: usize = 18;
    pub const MASS_PRODUCTION: usize = 19;
    pub const HYPER_EFFICIENCY: usize = 20;
    pub const FORAGING_EXPERT: usize = 21;
    pub const MASTER_LUMBERJACK: usize = 22;
    pub const MASTER_CRAFTSMAN: usize = 23;
}

struct UpgradeDefinition {
    name: &'static str,
    description: &'static str,
    cost: ResourceBundle,
    tier: u8,
    effect: UpgradeEffect,
}

const fn produce(target: EffectTarget, factor: f64) -> UpgradeEffect {
    UpgradeEffect::ProductionMultiplier { target, factor }
}

const fn click(target: EffectTarget, factor: f64) -> UpgradeEffect {
    UpgradeEffect::ClickMultiplier { target, factor }
}

const FOOD: EffectTarget = EffectTarget::Resource(ResourceKind::Food);
const WOOD: EffectTarget = EffectTarget::Resource(ResourceKind::Wood);
const STONE: EffectTarget = EffectTarget::Resource(ResourceKind::Stone);
const GOLD: EffectTarget = EffectTarget::Resource(ResourceKind::Gold);
const ALL: EffectTarget = EffectTarget::All;

const UPGRADES: &[UpgradeDefinition] = &[
    UpgradeDefinition {
        name: "Agriculture",
        description: "Unlocks farms",
        cost: ResourceBundle::new(5.0, 0.0, 0.0, 0.0),
        tier: 1,
        effect: UpgradeEffect::UnlockBuilding { building: crate::buildings::catalog::FARM },
    },
    UpgradeDefinition {
        name: "Forestry",
        description: "Unlocks lumber mills",
        cost: ResourceBundle::new(5.0, 2.0, 0.0, 0.0),
        tier: 1,
        effect: UpgradeEffect::UnlockBuilding { building: crate::buildings::catalog::LUMBER_MILL },
    },
    UpgradeDefinition {
        name: "Mining",
        description: "Unlocks quarries",
        cost: ResourceBundle::new(5.0, 5.0, 0.0, 0.0),
        tier: 1,
        effect: UpgradeEffect::UnlockBuilding { building: crate::buildings::catalog::QUARRY },
    },
    UpgradeDefinition {
        name: "Construction",
        description: "Unlocks houses",
        cost: ResourceBundle::new(0.0, 40.0, 20.0, 0.0),
        tier: 2,
        effect: UpgradeEffect::UnlockBuilding { building: crate::buildings::catalog::HOUSE },
    },
    UpgradeDefinition {
        name: "Better Tools",
        description: "Doubles click power",
        cost: ResourceBundle::new(3.0, 2.0, 0.0, 0.0),
        tier: 1,
        effect: click(ALL, 2.0),
    },
    UpgradeDefinition {
        name: "Farming Techniques",
        description: "+50% food production",
        cost: ResourceBundle::new(50.0, 20.0, 0.0, 0.0),
        tier: 2,
        effect: produce(FOOD, 1.5),
    },
    UpgradeDefinition {
        name: "Sawmill Tech",
        description: "+50% wood production",
        cost: ResourceBundle::new(30.0, 50.0, 0.0, 0.0),
        tier: 2,
        effect: produce(WOOD, 1.5),
    },
    UpgradeDefinition {
        name: "Explosives",
        description: "+50% stone production",
        cost: ResourceBundle::new(0.0, 40.0, 40.0, 0.0),
        tier: 2,
        effect: produce(STONE, 1.5),
    },
    UpgradeDefinition {
        name: "Deep Mining",
        description: "Unlocks mines",
        cost: ResourceBundle::new(0.0, 60.0, 50.0, 0.0),
        tier: 2,
        effect: UpgradeEffect::UnlockBuilding { building: crate::buildings::catalog::MINE },
    },
    UpgradeDefinition {
        name: "Healthcare",
        description: "+5 maximum population",
        cost: ResourceBundle::new(25.0, 0.0, 0.0, 0.0),
        tier: 1,
        effect: UpgradeEffect::PopulationCap { delta: 5 },
    },
    UpgradeDefinition {
        name: "Immigration",
        description: "Newcomers arrive over time",
        cost: ResourceBundle::new(60.0, 0.0, 0.0, 5.0),
        tier: 2,
        effect: UpgradeEffect::PopulationGrowth { delta: 0.05 },
    },
    UpgradeDefinition {
        name: "Irrigation",
        description: "Doubles food production",
        cost: ResourceBundle::new(200.0, 100.0, 0.0, 0.0),
        tier: 3,
        effect: produce(FOOD, 2.0),
    },
    UpgradeDefinition {
        name: "Steel Axes",
        description: "Doubles wood production",
        cost: ResourceBundle::new(0.0, 200.0, 80.0, 10.0),
        tier: 3,
        effect: produce(WOOD, 2.0),
    },
    UpgradeDefinition {
        name: "Industrial Mining",
        description: "Doubles stone production",
        cost: ResourceBundle::new(0.0, 150.0, 200.0, 15.0),
        tier: 3,
        effect: produce(STONE, 2.0),
    },
    UpgradeDefinition {
        name: "Gold Rush",
        description: "Doubles gold production",
        cost: ResourceBundle::new(0.0, 0.0, 200.0, 50.0),
        tier: 3,
        effect: produce(GOLD, 2.0),
    },
    UpgradeDefinition {
        name: "Mechanization",
        description: "+25% to all production",
        cost: ResourceBundle::new(0.0, 300.0, 300.0, 50.0),
        tier: 3,
        effect: produce(ALL, 1.25),
    },
    UpgradeDefinition {
        name: "Refined Tools",
        description: "Triples click power",
        cost: ResourceBundle::new(0.0, 100.0, 60.0, 0.0),
        tier: 3,
        effect: click(ALL, 3.0),
    },
    UpgradeDefinition {
        name: "Education",
        description: "+10 maximum population",
        cost: ResourceBundle::new(300.0, 0.0, 0.0, 40.0),
        tier: 3,
        effect: UpgradeEffect::PopulationCap { delta: 10 },
    },
    UpgradeDefinition {
        name: "Automation",
        description: "Buildings cost 20% less",
        cost: ResourceBundle::new(0.0, 0.0, 500.0, 150.0),
        tier: 4,
        effect: UpgradeEffect::CostReduction { delta: 0.2 },
    },
    UpgradeDefinition {
        name: "Mass Production",
        description: "+50% to all production",
        cost: ResourceBundle::new(0.0, 800.0, 800.0, 300.0),
        tier: 4,
        effect: produce(ALL, 1.5),
    },
    UpgradeDefinition {
        name: "Hyper-Efficiency",
        description: "Doubles all production",
        cost: ResourceBundle::new(2000.0, 2000.0, 2000.0, 1000.0),
        tier: 4,
        effect: produce(ALL, 2.0),
    },
    UpgradeDefinition {
        name: "Foraging Expert",
        description: "5x food per click",
        cost: ResourceBundle::new(20.0, 10.0, 0.0, 0.0),
        tier: 2,
        effect: click(FOOD, 5.0),
    },
    UpgradeDefinition {
        name: "Master Lumberjack",
        description: "5x wood per click",
        cost: ResourceBundle::new(10.0, 20.0, 0.0, 0.0),
        tier: 2,
        effect: click(WOOD, 5.0),
    },
    UpgradeDefinition {
        name: "Master Craftsman",
        description: "10x click power",
        cost: ResourceBundle::new(0.0, 400.0, 300.0, 100.0),
        tier: 4,
        effect: click(ALL, 10.0),
    },
];

pub fn default_upgrades() -> Vec<UpgradeCatalogEntry> {
    UPGRADES
        .iter()
        .map(|def| UpgradeCatalogEntry::new(def.name, def.description, def.cost, def.tier, def.effect))
        .collect()
}
