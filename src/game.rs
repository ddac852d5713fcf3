//! The owned game: world, economy and upgrade graph behind one command
//! surface.
//!
//! Everything the UI layer needs goes through [`Game`]. There is no
//! global state; hosts hold a `Game` and drive it with [`Command`]s and
//! [`Game::tick`].

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::buildings::{default_buildings, BuildingCatalogEntry, PlacementQuality};
use crate::chunk::{ChunkCoord, ChunkStore, TileWindow};
use crate::economy::{EconomyState, MAX_COST_REDUCTION};
use crate::error::CatalogError;
use crate::graph::{default_layout, NodeSpec, UpgradeGraph, UpgradeStatus};
use crate::population::Population;
use crate::resources::{ResourceBundle, ResourceKind};
use crate::snapshot::GameSnapshot;
use crate::terrain::Tile;
use crate::upgrades::{default_upgrades, UpgradeCatalogEntry, UpgradeEffect};

/// Player-facing actions. Every command either succeeds completely or
/// leaves the game untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    Gather { resource: ResourceKind },
    PurchaseBuilding { building: usize },
    PlaceBuilding { building: usize, x: i32, y: i32 },
    /// Places the building chosen by a prior `PurchaseBuilding`.
    PlaceSelected { x: i32, y: i32 },
    PlaceAtBestSite { building: usize, window: TileWindow },
    CancelPlacement,
    PurchaseUpgrade { node: usize },
}

fn default_repeat() -> u32 {
    1
}

/// A command applied `repeat` times once the game has completed `tick` ticks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledCommand {
    pub tick: u64,
    pub command: Command,
    #[serde(default = "default_repeat")]
    pub repeat: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub ticks: u64,
    pub applied: usize,
    pub rejected: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Site {
    pub x: i32,
    pub y: i32,
    pub bonus: f64,
    pub quality: PlacementQuality,
}

/// Construction inputs. `Default` gives the built-in catalogs, seed 0 and
/// empty stockpiles.
#[derive(Debug, Clone)]
pub struct GameSettings {
    pub seed: u64,
    pub buildings: Vec<BuildingCatalogEntry>,
    pub upgrades: Vec<UpgradeCatalogEntry>,
    pub layout: Vec<NodeSpec>,
    pub population: Population,
    pub starting_resources: ResourceBundle,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            seed: 0,
            buildings: default_buildings(),
            upgrades: default_upgrades(),
            layout: default_layout(),
            population: Population::default(),
            starting_resources: ResourceBundle::ZERO,
        }
    }
}

impl GameSettings {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_starting_resources(mut self, resources: ResourceBundle) -> Self {
        self.starting_resources = resources;
        self
    }
}

pub struct Game {
    world: ChunkStore,
    economy: EconomyState,
    graph: UpgradeGraph,
    tick: u64,
}

impl Game {
    /// Validates the catalogs and graph, then builds a fresh game.
    pub fn new(settings: GameSettings) -> Result<Self, CatalogError> {
        validate_catalogs(&settings.buildings, &settings.upgrades)?;
        if settings.layout.is_empty() {
            return Err(CatalogError::EmptyCatalog("upgrade tree"));
        }
        if !settings.starting_resources.is_finite_non_negative() {
            return Err(CatalogError::InvalidAmount {
                name: "starting resources".into(),
                field: "amount",
            });
        }
        let graph = UpgradeGraph::build(&settings.layout, settings.upgrades.len())?;

        let mut economy = EconomyState::new(settings.buildings, settings.upgrades, settings.population);
        for (kind, amount) in settings.starting_resources.iter() {
            economy.ledger_mut().set_amount(kind, amount);
        }

        info!(
            seed = settings.seed,
            buildings = economy.buildings().len(),
            upgrades = economy.upgrades().len(),
            nodes = graph.len(),
            "game created"
        );
        Ok(Self {
            world: ChunkStore::new(settings.seed),
            economy,
            graph,
            tick: 0,
        })
    }

    pub fn with_seed(seed: u64) -> Result<Self, CatalogError> {
        Self::new(GameSettings::default().with_seed(seed))
    }

    pub fn current_tick(&self) -> u64 {
        self.tick
    }

    pub fn seed(&self) -> u64 {
        self.world.seed()
    }

    pub fn economy(&self) -> &EconomyState {
        &self.economy
    }

    pub fn economy_mut(&mut self) -> &mut EconomyState {
        &mut self.economy
    }

    pub fn graph(&self) -> &UpgradeGraph {
        &self.graph
    }

    pub fn world(&self) -> &ChunkStore {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut ChunkStore {
        &mut self.world
    }

    pub fn tile(&mut self, x: i32, y: i32) -> Tile {
        self.world.tile(x, y)
    }

    pub fn tile_bonus_for_building(&mut self, building: usize, x: i32, y: i32) -> f64 {
        let tile = self.world.tile(x, y);
        self.economy.tile_bonus_for_building(building, &tile)
    }

    pub fn placement_quality(&mut self, building: usize, x: i32, y: i32) -> Option<PlacementQuality> {
        self.economy.buildings().get(building)?;
        Some(PlacementQuality::grade(self.tile_bonus_for_building(building, x, y)))
    }

    /// Highest-bonus tile for `building` inside the clamped window. Ties go
    /// to the first tile in row-major order.
    pub fn best_site_in_window(&mut self, building: usize, window: TileWindow) -> Option<Site> {
        let entry = self.economy.buildings().get(building)?.clone();
        let mut best: Option<Site> = None;
        for (x, y, tile) in self.world.tiles_in_window(window) {
            let bonus = entry.tile_bonus(&tile);
            if best.map_or(true, |site| bonus > site.bonus) {
                best = Some(Site {
                    x,
                    y,
                    bonus,
                    quality: PlacementQuality::grade(bonus),
                });
            }
        }
        best
    }

    pub fn upgrade_status(&self, node: usize) -> Option<UpgradeStatus> {
        self.graph.node(node)?;
        Some(self.graph.status(node, self.economy.upgrades()))
    }

    pub fn is_upgrade_available(&self, node: usize) -> bool {
        self.graph.is_available(node, self.economy.upgrades())
    }

    pub fn available_upgrades(&self) -> Vec<usize> {
        self.graph.available(self.economy.upgrades())
    }

    pub fn gather(&mut self, resource: ResourceKind) -> bool {
        self.economy.gather(resource);
        true
    }

    pub fn purchase_building(&mut self, building: usize) -> bool {
        self.economy.purchase_building(building)
    }

    pub fn cancel_placement(&mut self) -> bool {
        self.economy.cancel_placement();
        true
    }

    /// Reads the tile bonus from the world at placement time.
    pub fn place_building(&mut self, building: usize, x: i32, y: i32) -> bool {
        let bonus = self.tile_bonus_for_building(building, x, y);
        self.economy.place_building(building, x, y, bonus)
    }

    pub fn place_selected(&mut self, x: i32, y: i32) -> bool {
        match self.economy.placement().selected {
            Some(building) => self.place_building(building, x, y),
            None => {
                debug!(x, y, "no building selected for placement");
                false
            }
        }
    }

    pub fn place_at_best_site(&mut self, building: usize, window: TileWindow) -> bool {
        if !self.economy.can_afford(building) {
            return false;
        }
        match self.best_site_in_window(building, window) {
            Some(site) => self.economy.place_building(building, site.x, site.y, site.bonus),
            None => false,
        }
    }

    /// Buys the upgrade behind a graph node once all its prerequisites are
    /// purchased.
    pub fn purchase_upgrade(&mut self, node: usize) -> bool {
        if !self.graph.is_available(node, self.economy.upgrades()) {
            debug!(node, "upgrade node not available");
            return false;
        }
        match self.graph.node(node) {
            Some(upgrade_node) => self.economy.purchase_upgrade(upgrade_node.upgrade),
            None => false,
        }
    }

    pub fn apply(&mut self, command: &Command) -> bool {
        match *command {
            Command::Gather { resource } => self.gather(resource),
            Command::PurchaseBuilding { building } => self.purchase_building(building),
            Command::PlaceBuilding { building, x, y } => self.place_building(building, x, y),
            Command::PlaceSelected { x, y } => self.place_selected(x, y),
            Command::PlaceAtBestSite { building, window } => self.place_at_best_site(building, window),
            Command::CancelPlacement => self.cancel_placement(),
            Command::PurchaseUpgrade { node } => self.purchase_upgrade(node),
        }
    }

    /// Advances the economy by `dt_seconds`. Invalid steps do not count as
    /// a tick.
    pub fn tick(&mut self, dt_seconds: f64) {
        if !dt_seconds.is_finite() || dt_seconds < 0.0 {
            debug!(dt_seconds, "ignoring invalid time step");
            return;
        }
        self.economy.tick(dt_seconds);
        self.tick += 1;
    }

    pub fn unload_distant(&mut self, center: ChunkCoord, max_distance: u32) -> usize {
        self.world.unload_distant(center, max_distance)
    }

    /// New terrain for a new seed. Existing placements keep the bonus they
    /// earned.
    pub fn regenerate(&mut self, seed: u64) {
        self.world.regenerate(seed);
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot::capture(self)
    }

    pub fn run(&mut self, ticks: u64, dt_seconds: f64, schedule: &[ScheduledCommand]) -> RunSummary {
        self.run_with_hook(ticks, dt_seconds, schedule, |_| {})
    }

    /// Runs `ticks` steps. Before each step, commands scheduled for the
    /// current tick count are applied; after it, `hook` sees a snapshot.
    /// A negative or non-finite step runs nothing.
    pub fn run_with_hook<F>(
        &mut self,
        ticks: u64,
        dt_seconds: f64,
        schedule: &[ScheduledCommand],
        mut hook: F,
    ) -> RunSummary
    where
        F: FnMut(&GameSnapshot),
    {
        let mut summary = RunSummary::default();
        if !dt_seconds.is_finite() || dt_seconds < 0.0 {
            warn!(dt_seconds, "refusing to run with an invalid time step");
            return summary;
        }
        for _ in 0..ticks {
            let due = self.tick;
            for scheduled in schedule.iter().filter(|scheduled| scheduled.tick == due) {
                for _ in 0..scheduled.repeat {
                    if self.apply(&scheduled.command) {
                        summary.applied += 1;
                    } else {
                        summary.rejected += 1;
                        warn!(tick = due, command = ?scheduled.command, "scheduled command rejected");
                    }
                }
            }
            self.tick(dt_seconds);
            summary.ticks += 1;
            hook(&self.snapshot());
        }
        summary
    }
}

fn check_bundle(name: &str, field: &'static str, bundle: &ResourceBundle) -> Result<(), CatalogError> {
    if bundle.is_finite_non_negative() {
        Ok(())
    } else {
        Err(CatalogError::InvalidAmount {
            name: name.to_string(),
            field,
        })
    }
}

fn validate_catalogs(
    buildings: &[BuildingCatalogEntry],
    upgrades: &[UpgradeCatalogEntry],
) -> Result<(), CatalogError> {
    if buildings.is_empty() {
        return Err(CatalogError::EmptyCatalog("building"));
    }
    if upgrades.is_empty() {
        return Err(CatalogError::EmptyCatalog("upgrade"));
    }

    for (index, building) in buildings.iter().enumerate() {
        check_bundle(&building.name, "cost", &building.cost)?;
        check_bundle(&building.name, "production", &building.production)?;
        if let Some(upgrade) = building.unlocked_by {
            let Some(source) = upgrades.get(upgrade) else {
                return Err(CatalogError::UnknownUnlockSource {
                    building: building.name.clone(),
                    upgrade,
                });
            };
            if source.effect != (UpgradeEffect::UnlockBuilding { building: index }) {
                return Err(CatalogError::UnlockMismatch {
                    building: building.name.clone(),
                    upgrade: source.name.clone(),
                });
            }
        }
    }

    for (index, upgrade) in upgrades.iter().enumerate() {
        check_bundle(&upgrade.name, "cost", &upgrade.cost)?;
        match upgrade.effect {
            UpgradeEffect::ProductionMultiplier { factor, .. }
            | UpgradeEffect::ClickMultiplier { factor, .. } => {
                if !factor.is_finite() || factor < 0.0 {
                    return Err(CatalogError::InvalidAmount {
                        name: upgrade.name.clone(),
                        field: "factor",
                    });
                }
            }
            UpgradeEffect::PopulationGrowth { delta } => {
                if !delta.is_finite() || delta < 0.0 {
                    return Err(CatalogError::InvalidAmount {
                        name: upgrade.name.clone(),
                        field: "growth",
                    });
                }
            }
            UpgradeEffect::CostReduction { delta } => {
                if !(0.0..=MAX_COST_REDUCTION).contains(&delta) {
                    return Err(CatalogError::CostReductionOutOfRange {
                        upgrade: upgrade.name.clone(),
                        delta,
                    });
                }
            }
            UpgradeEffect::UnlockBuilding { building } => {
                let Some(target) = buildings.get(building) else {
                    return Err(CatalogError::UnknownBuilding {
                        upgrade: upgrade.name.clone(),
                        building,
                    });
                };
                if target.unlocked_by != Some(index) {
                    return Err(CatalogError::UnlockMismatch {
                        building: target.name.clone(),
                        upgrade: upgrade.name.clone(),
                    });
                }
            }
            UpgradeEffect::PopulationCap { .. } => {}
        }
    }
    Ok(())
}
