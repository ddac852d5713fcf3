//! Terrain categories, per-category resource bonuses and tile generation.

use serde::{Deserialize, Serialize};

use crate::noise::NoiseField;
use crate::resources::{ResourceBundle, ResourceKind};

/// World coordinates are multiplied by this before any noise lookup.
pub const BASE_SCALE: f64 = 0.05;

pub const MOISTURE_SEED_OFFSET: u64 = 1000;
pub const TEMPERATURE_SEED_OFFSET: u64 = 2000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerrainCategory {
    Water,
    Plains,
    Forest,
    Hills,
    Mountains,
    Desert,
}

impl TerrainCategory {
    pub const ALL: [TerrainCategory; 6] = [
        TerrainCategory::Water,
        TerrainCategory::Plains,
        TerrainCategory::Forest,
        TerrainCategory::Hills,
        TerrainCategory::Mountains,
        TerrainCategory::Desert,
    ];

    /// Fixed (food, wood, stone, gold) multipliers for buildings on this terrain.
    pub const fn bonuses(self) -> ResourceBundle {
        match self {
            TerrainCategory::Water => ResourceBundle::new(0.5, 0.0, 0.0, 0.0),
            TerrainCategory::Plains => ResourceBundle::new(1.5, 0.8, 0.5, 0.3),
            TerrainCategory::Forest => ResourceBundle::new(1.0, 2.0, 0.3, 0.2),
            TerrainCategory::Hills => ResourceBundle::new(0.8, 1.0, 1.8, 1.2),
            TerrainCategory::Mountains => ResourceBundle::new(0.3, 0.5, 2.5, 2.0),
            TerrainCategory::Desert => ResourceBundle::new(0.4, 0.2, 1.2, 0.8),
        }
    }

    /// First matching rule wins; the order matters.
    pub fn classify(elevation: f64, moisture: f64, temperature: f64) -> Self {
        if elevation < 0.35 {
            TerrainCategory::Water
        } else if elevation > 0.75 {
            TerrainCategory::Mountains
        } else if elevation > 0.60 {
            TerrainCategory::Hills
        } else if moisture < 0.3 && temperature > 0.6 {
            TerrainCategory::Desert
        } else if moisture > 0.55 {
            TerrainCategory::Forest
        } else {
            TerrainCategory::Plains
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    pub category: TerrainCategory,
    pub elevation: f64,
    pub moisture: f64,
    pub temperature: f64,
    pub bonuses: ResourceBundle,
}

impl Tile {
    pub fn from_fields(elevation: f64, moisture: f64, temperature: f64) -> Self {
        let category = TerrainCategory::classify(elevation, moisture, temperature);
        Self {
            category,
            elevation,
            moisture,
            temperature,
            bonuses: category.bonuses(),
        }
    }

    pub fn bonus(&self, kind: ResourceKind) -> f64 {
        self.bonuses.get(kind)
    }
}

impl Default for Tile {
    /// Mid-range Plains tile, returned whenever a real tile is unavailable.
    fn default() -> Self {
        Self {
            category: TerrainCategory::Plains,
            elevation: 0.5,
            moisture: 0.5,
            temperature: 0.5,
            bonuses: TerrainCategory::Plains.bonuses(),
        }
    }
}

/// Octave count, persistence and frequency multiplier for one scalar field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldProfile {
    pub octaves: u32,
    pub persistence: f64,
    pub frequency: f64,
}

pub const ELEVATION_PROFILE: FieldProfile = FieldProfile {
    octaves: 4,
    persistence: 0.5,
    frequency: 1.0,
};

pub const MOISTURE_PROFILE: FieldProfile = FieldProfile {
    octaves: 3,
    persistence: 0.6,
    frequency: 1.5,
};

pub const TEMPERATURE_PROFILE: FieldProfile = FieldProfile {
    octaves: 2,
    persistence: 0.7,
    frequency: 0.8,
};

#[derive(Debug, Clone)]
struct ScalarField {
    noise: NoiseField,
    profile: FieldProfile,
}

impl ScalarField {
    fn new(seed: u64, profile: FieldProfile) -> Self {
        Self {
            noise: NoiseField::new(seed),
            profile,
        }
    }

    fn at(&self, world_x: i32, world_y: i32) -> f64 {
        let scale = BASE_SCALE * self.profile.frequency;
        self.noise.octave_sample(
            world_x as f64 * scale,
            world_y as f64 * scale,
            self.profile.octaves,
            self.profile.persistence,
        )
    }
}

/// Derives tiles from (x, y, seed) using three independently seeded fields.
#[derive(Debug, Clone)]
pub struct TerrainGenerator {
    seed: u64,
    elevation: ScalarField,
    moisture: ScalarField,
    temperature: ScalarField,
}

impl TerrainGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            elevation: ScalarField::new(seed, ELEVATION_PROFILE),
            moisture: ScalarField::new(seed.wrapping_add(MOISTURE_SEED_OFFSET), MOISTURE_PROFILE),
            temperature: ScalarField::new(
                seed.wrapping_add(TEMPERATURE_SEED_OFFSET),
                TEMPERATURE_PROFILE,
            ),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn generate(&self, world_x: i32, world_y: i32) -> Tile {
        Tile::from_fields(
            self.elevation.at(world_x, world_y),
            self.moisture.at(world_x, world_y),
            self.temperature.at(world_x, world_y),
        )
    }
}
