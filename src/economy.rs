//! Economy state: stockpiles, buildings, population and upgrade effects.
//!
//! Every command returns `false` and leaves the state untouched when it
//! cannot be carried out. Costs are checked in full before anything is
//! deducted, so a rejected purchase never removes partial resources.

use tracing::{debug, info};

use crate::buildings::{default_buildings, BuildingCatalogEntry, BuildingInstance, Placement};
use crate::population::Population;
use crate::resources::{ResourceBundle, ResourceKind, ResourceLedger};
use crate::terrain::Tile;
use crate::upgrades::{default_upgrades, Multipliers, UpgradeCatalogEntry, UpgradeEffect};

/// Upper bound on the fraction of building costs that upgrades can waive.
pub const MAX_COST_REDUCTION: f64 = 0.9;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlacementMode {
    pub selected: Option<usize>,
}

impl PlacementMode {
    pub fn is_active(&self) -> bool {
        self.selected.is_some()
    }
}

#[derive(Debug, Clone)]
pub struct EconomyState {
    ledger: ResourceLedger,
    buildings: Box<[BuildingCatalogEntry]>,
    instances: Vec<BuildingInstance>,
    unlocked: Vec<bool>,
    upgrades: Vec<UpgradeCatalogEntry>,
    population: Population,
    multipliers: Multipliers,
    cost_reduction: f64,
    placement: PlacementMode,
    game_time: f64,
}

impl Default for EconomyState {
    fn default() -> Self {
        Self::new(default_buildings(), default_upgrades(), Population::default())
    }
}

impl EconomyState {
    /// Fresh state: empty stockpiles, one instance per catalog entry holding
    /// its `base_count` units, and rates derived from those units.
    pub fn new(
        buildings: Vec<BuildingCatalogEntry>,
        upgrades: Vec<UpgradeCatalogEntry>,
        population: Population,
    ) -> Self {
        let instances = buildings
            .iter()
            .enumerate()
            .map(|(kind, entry)| BuildingInstance::new(kind, entry.base_count))
            .collect();
        let unlocked = buildings
            .iter()
            .map(|entry| entry.unlocked_by.is_none())
            .collect();
        let mut state = Self {
            ledger: ResourceLedger::new(),
            buildings: buildings.into_boxed_slice(),
            instances,
            unlocked,
            upgrades,
            population,
            multipliers: Multipliers::default(),
            cost_reduction: 0.0,
            placement: PlacementMode::default(),
            game_time: 0.0,
        };
        state.recalculate_multipliers();
        state
    }

    pub fn ledger(&self) -> &ResourceLedger {
        &self.ledger
    }

    pub fn ledger_mut(&mut self) -> &mut ResourceLedger {
        &mut self.ledger
    }

    pub fn buildings(&self) -> &[BuildingCatalogEntry] {
        &self.buildings
    }

    pub fn instances(&self) -> &[BuildingInstance] {
        &self.instances
    }

    pub fn instance(&self, index: usize) -> Option<&BuildingInstance> {
        self.instances.get(index)
    }

    pub fn upgrades(&self) -> &[UpgradeCatalogEntry] {
        &self.upgrades
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    pub fn population_mut(&mut self) -> &mut Population {
        &mut self.population
    }

    pub fn multipliers(&self) -> &Multipliers {
        &self.multipliers
    }

    pub fn cost_reduction(&self) -> f64 {
        self.cost_reduction
    }

    pub fn placement(&self) -> PlacementMode {
        self.placement
    }

    pub fn game_time(&self) -> f64 {
        self.game_time
    }

    pub fn is_unlocked(&self, building: usize) -> bool {
        self.unlocked.get(building).copied().unwrap_or(false)
    }

    /// Cost of the next unit, including count scaling and cost reduction.
    pub fn next_cost(&self, building: usize) -> Option<ResourceBundle> {
        let entry = self.buildings.get(building)?;
        let instance = self.instances.get(building)?;
        Some(entry.cost_for(instance.count, self.cost_reduction))
    }

    pub fn can_afford(&self, building: usize) -> bool {
        if !self.is_unlocked(building) {
            return false;
        }
        self.next_cost(building)
            .is_some_and(|cost| self.ledger.covers(&cost))
    }

    /// Enters placement mode for an affordable building. Nothing is paid
    /// until the unit is actually placed.
    pub fn purchase_building(&mut self, building: usize) -> bool {
        if !self.can_afford(building) {
            debug!(building, "building purchase rejected");
            return false;
        }
        self.placement.selected = Some(building);
        true
    }

    pub fn cancel_placement(&mut self) {
        self.placement = PlacementMode::default();
    }

    /// Bonus a unit of `building` would earn on `tile`: the best multiplier
    /// among the resources it produces. Unknown buildings get 1.0.
    pub fn tile_bonus_for_building(&self, building: usize, tile: &Tile) -> f64 {
        self.buildings
            .get(building)
            .map_or(1.0, |entry| entry.tile_bonus(tile))
    }

    /// Pays for and records one unit on `(tile_x, tile_y)`. The bonus is
    /// frozen into the placement record.
    pub fn place_building(&mut self, building: usize, tile_x: i32, tile_y: i32, tile_bonus: f64) -> bool {
        if !self.can_afford(building) {
            debug!(building, tile_x, tile_y, "placement rejected");
            return false;
        }
        let Some(cost) = self.next_cost(building) else {
            return false;
        };
        let bonus = if tile_bonus.is_finite() {
            tile_bonus.max(0.0)
        } else {
            0.0
        };

        self.ledger.withdraw(&cost);
        let instance = &mut self.instances[building];
        instance.count += 1;
        instance.placements.push(Placement {
            tile_x,
            tile_y,
            bonus,
            placed: true,
        });
        let count = instance.count;
        self.placement = PlacementMode::default();
        self.recalculate_production();

        info!(
            building = self.buildings[building].name.as_str(),
            tile_x,
            tile_y,
            bonus,
            count,
            "building placed"
        );
        true
    }

    pub fn gather(&mut self, kind: ResourceKind) {
        let power = self.ledger.click_power(kind);
        self.ledger.deposit(kind, power);
    }

    pub fn can_afford_upgrade(&self, upgrade: usize) -> bool {
        self.upgrades
            .get(upgrade)
            .is_some_and(|entry| !entry.is_purchased() && self.ledger.covers(&entry.cost))
    }

    /// Buys an upgrade if affordable and not yet owned. Prerequisites are
    /// the graph's concern, not checked here.
    pub fn purchase_upgrade(&mut self, upgrade: usize) -> bool {
        if !self.can_afford_upgrade(upgrade) {
            debug!(upgrade, "upgrade purchase rejected");
            return false;
        }
        let entry = &mut self.upgrades[upgrade];
        self.ledger.withdraw(&entry.cost);
        entry.mark_purchased();
        let effect = entry.effect;
        info!(upgrade = entry.name.as_str(), ?effect, "upgrade purchased");

        self.apply_one_shot(effect);
        self.recalculate_multipliers();
        true
    }

    /// Effects that change state once at purchase time. Multiplicative
    /// effects are left to [`Multipliers::fold`].
    fn apply_one_shot(&mut self, effect: UpgradeEffect) {
        match effect {
            UpgradeEffect::UnlockBuilding { building } => {
                if let Some(flag) = self.unlocked.get_mut(building) {
                    *flag = true;
                }
            }
            UpgradeEffect::PopulationCap { delta } => self.population.raise_cap(delta),
            UpgradeEffect::PopulationGrowth { delta } => self.population.add_growth(delta),
            UpgradeEffect::CostReduction { delta } => {
                self.cost_reduction = (self.cost_reduction + delta).clamp(0.0, MAX_COST_REDUCTION);
            }
            UpgradeEffect::ProductionMultiplier { .. } | UpgradeEffect::ClickMultiplier { .. } => {}
        }
    }

    /// Advances the clock, population, then every stockpile by its rate.
    /// Negative or non-finite steps are ignored.
    pub fn tick(&mut self, dt_seconds: f64) {
        if !dt_seconds.is_finite() || dt_seconds < 0.0 {
            return;
        }
        self.game_time += dt_seconds;
        self.population.advance(dt_seconds);
        self.ledger.advance(dt_seconds);
    }

    /// Raw output of one building instance before multipliers.
    pub fn instance_production(&self, building: usize) -> Option<ResourceBundle> {
        let entry = self.buildings.get(building)?;
        let instance = self.instances.get(building)?;
        Some(instance.production(entry))
    }

    /// Output of one building instance after current multipliers.
    pub fn effective_production(&self, building: usize) -> Option<ResourceBundle> {
        let mut raw = self.instance_production(building)?;
        for kind in ResourceKind::ALL {
            *raw.get_mut(kind) *= self.multipliers.production_for(kind);
        }
        Some(raw)
    }

    pub fn recalculate_production(&mut self) {
        let mut rates = ResourceBundle::ZERO;
        for instance in &self.instances {
            if let Some(entry) = self.buildings.get(instance.kind) {
                rates.add_assign(&instance.production(entry));
            }
        }
        for kind in ResourceKind::ALL {
            let rate = rates.get(kind) * self.multipliers.production_for(kind);
            self.ledger.set_per_second(kind, rate);
        }
    }

    /// Re-folds purchased upgrades, refreshes click power and then rates.
    pub fn recalculate_multipliers(&mut self) {
        self.multipliers = Multipliers::fold(&self.upgrades);
        for kind in ResourceKind::ALL {
            let power = kind.base_click_power() * self.multipliers.click_for(kind);
            self.ledger.set_click_power(kind, power);
        }
        self.recalculate_production();
    }
}
