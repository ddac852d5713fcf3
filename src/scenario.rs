use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::buildings::{default_buildings, BuildingCatalogEntry};
use crate::error::CatalogError;
use crate::game::{Game, GameSettings, ScheduledCommand};
use crate::graph::{default_layout, NodeSpec};
use crate::population::Population;
use crate::resources::ResourceBundle;
use crate::upgrades::{default_upgrades, UpgradeCatalogEntry};

fn default_tick_seconds() -> f64 {
    1.0
}

fn default_ticks() -> u64 {
    600
}

fn default_starting_resources() -> ResourceBundle {
    ResourceBundle::new(10.0, 10.0, 5.0, 0.0)
}

fn default_total() -> u32 {
    5
}

fn default_max_population() -> u32 {
    10
}

#[derive(Debug, Clone, Deserialize)]
pub struct PopulationInit {
    #[serde(default = "default_total")]
    pub total: u32,
    #[serde(default = "default_max_population")]
    pub max: u32,
    #[serde(default)]
    pub growth_rate: f64,
}

impl Default for PopulationInit {
    fn default() -> Self {
        Self {
            total: default_total(),
            max: default_max_population(),
            growth_rate: 0.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub description: Option<String>,
    pub seed: u64,
    #[serde(default = "default_tick_seconds")]
    pub tick_seconds: f64,
    #[serde(default)]
    pub ticks: Option<u64>,
    #[serde(default = "default_starting_resources")]
    pub starting_resources: ResourceBundle,
    #[serde(default)]
    pub population: PopulationInit,
    #[serde(default)]
    pub buildings: Option<Vec<BuildingCatalogEntry>>,
    #[serde(default)]
    pub upgrades: Option<Vec<UpgradeCatalogEntry>>,
    #[serde(default)]
    pub upgrade_tree: Option<Vec<NodeSpec>>,
    #[serde(default)]
    pub actions: Vec<ScheduledCommand>,
}

pub struct ScenarioLoader {
    base_dir: PathBuf,
}

impl ScenarioLoader {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    pub fn load(&self, file: impl AsRef<Path>) -> Result<Scenario> {
        let path = self.base_dir.join(file);
        let data = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read scenario file {}", path.display()))?;
        let scenario: Scenario = serde_yaml::from_str(&data)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(scenario)
    }
}

impl Scenario {
    pub fn settings(&self, seed_override: Option<u64>) -> GameSettings {
        GameSettings {
            seed: seed_override.unwrap_or(self.seed),
            buildings: self.buildings.clone().unwrap_or_else(default_buildings),
            upgrades: self.upgrades.clone().unwrap_or_else(default_upgrades),
            layout: self.upgrade_tree.clone().unwrap_or_else(default_layout),
            population: Population::new(
                self.population.total,
                self.population.max,
                self.population.growth_rate,
            ),
            starting_resources: self.starting_resources,
        }
    }

    pub fn build_game(&self) -> Result<Game, CatalogError> {
        self.build_game_with_seed(None)
    }

    /// Rejects a non-positive or non-finite `tick_seconds` along with any
    /// catalog problem.
    pub fn build_game_with_seed(&self, seed_override: Option<u64>) -> Result<Game, CatalogError> {
        if !self.tick_seconds.is_finite() || self.tick_seconds <= 0.0 {
            return Err(CatalogError::InvalidTickLength {
                name: self.name.clone(),
            });
        }
        Game::new(self.settings(seed_override))
    }

    pub fn ticks(&self, override_ticks: Option<u64>) -> u64 {
        override_ticks.or(self.ticks).unwrap_or_else(default_ticks)
    }
}
