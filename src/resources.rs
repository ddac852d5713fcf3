//! Resource kinds, per-kind bundles and the stockpile ledger.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Food,
    Wood,
    Stone,
    Gold,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 4] = [
        ResourceKind::Food,
        ResourceKind::Wood,
        ResourceKind::Stone,
        ResourceKind::Gold,
    ];

    /// Amount granted by one manual gather before any click multipliers.
    pub fn base_click_power(self) -> f64 {
        match self {
            ResourceKind::Food => 0.1,
            ResourceKind::Wood => 0.05,
            ResourceKind::Stone => 0.03,
            ResourceKind::Gold => 0.01,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ResourceKind::Food => "Food",
            ResourceKind::Wood => "Wood",
            ResourceKind::Stone => "Stone",
            ResourceKind::Gold => "Gold",
        }
    }

    fn slot(self) -> usize {
        self as usize
    }
}

/// One value per resource kind. Used for costs, production tables, terrain
/// bonuses and per-resource multipliers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceBundle {
    pub food: f64,
    pub wood: f64,
    pub stone: f64,
    pub gold: f64,
}

impl ResourceBundle {
    pub const ZERO: ResourceBundle = ResourceBundle::splat(0.0);

    pub const fn new(food: f64, wood: f64, stone: f64, gold: f64) -> Self {
        Self {
            food,
            wood,
            stone,
            gold,
        }
    }

    pub const fn splat(value: f64) -> Self {
        Self::new(value, value, value, value)
    }

    pub fn single(kind: ResourceKind, value: f64) -> Self {
        let mut bundle = Self::ZERO;
        *bundle.get_mut(kind) = value;
        bundle
    }

    pub fn get(&self, kind: ResourceKind) -> f64 {
        match kind {
            ResourceKind::Food => self.food,
            ResourceKind::Wood => self.wood,
            ResourceKind::Stone => self.stone,
            ResourceKind::Gold => self.gold,
        }
    }

    pub fn get_mut(&mut self, kind: ResourceKind) -> &mut f64 {
        match kind {
            ResourceKind::Food => &mut self.food,
            ResourceKind::Wood => &mut self.wood,
            ResourceKind::Stone => &mut self.stone,
            ResourceKind::Gold => &mut self.gold,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (ResourceKind, f64)> + '_ {
        ResourceKind::ALL.into_iter().map(move |kind| (kind, self.get(kind)))
    }

    /// Non-zero entries, e.g. the line items of a cost.
    pub fn line_items(&self) -> impl Iterator<Item = (ResourceKind, f64)> + '_ {
        self.iter().filter(|(_, value)| *value != 0.0)
    }

    /// Kinds with a strictly positive entry.
    pub fn produced_kinds(&self) -> impl Iterator<Item = ResourceKind> + '_ {
        self.iter()
            .filter(|(_, value)| *value > 0.0)
            .map(|(kind, _)| kind)
    }

    pub fn scaled(&self, factor: f64) -> Self {
        Self::new(
            self.food * factor,
            self.wood * factor,
            self.stone * factor,
            self.gold * factor,
        )
    }

    pub fn add_assign(&mut self, other: &ResourceBundle) {
        for kind in ResourceKind::ALL {
            *self.get_mut(kind) += other.get(kind);
        }
    }

    pub fn is_finite_non_negative(&self) -> bool {
        self.iter().all(|(_, value)| value.is_finite() && value >= 0.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceEntry {
    pub amount: f64,
    pub per_second: f64,
    pub click_power: f64,
}

/// Stockpiles, passive rates and click power for every resource kind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceLedger {
    entries: [ResourceEntry; 4],
}

impl ResourceLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entry(&self, kind: ResourceKind) -> &ResourceEntry {
        &self.entries[kind.slot()]
    }

    pub fn amount(&self, kind: ResourceKind) -> f64 {
        self.entry(kind).amount
    }

    pub fn per_second(&self, kind: ResourceKind) -> f64 {
        self.entry(kind).per_second
    }

    pub fn click_power(&self, kind: ResourceKind) -> f64 {
        self.entry(kind).click_power
    }

    pub fn amounts(&self) -> ResourceBundle {
        let mut bundle = ResourceBundle::ZERO;
        for kind in ResourceKind::ALL {
            *bundle.get_mut(kind) = self.amount(kind);
        }
        bundle
    }

    pub fn set_amount(&mut self, kind: ResourceKind, amount: f64) {
        self.entries[kind.slot()].amount = amount.max(0.0);
    }

    pub fn set_per_second(&mut self, kind: ResourceKind, rate: f64) {
        self.entries[kind.slot()].per_second = rate;
    }

    pub fn set_click_power(&mut self, kind: ResourceKind, power: f64) {
        self.entries[kind.slot()].click_power = power.max(0.0);
    }

    pub fn deposit(&mut self, kind: ResourceKind, amount: f64) {
        let entry = &mut self.entries[kind.slot()];
        entry.amount = (entry.amount + amount).max(0.0);
    }

    pub fn covers(&self, cost: &ResourceBundle) -> bool {
        cost.line_items()
            .all(|(kind, value)| self.amount(kind) >= value)
    }

    /// Deducts every line item. Callers check [`covers`](Self::covers) first;
    /// amounts are still clamped at zero.
    pub fn withdraw(&mut self, cost: &ResourceBundle) {
        for (kind, value) in cost.line_items() {
            let entry = &mut self.entries[kind.slot()];
            entry.amount = (entry.amount - value).max(0.0);
        }
    }

    pub fn advance(&mut self, dt_seconds: f64) {
        for entry in &mut self.entries {
            entry.amount = (entry.amount + entry.per_second * dt_seconds).max(0.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn covers_ignores_zero_line_items() {
        let mut ledger = ResourceLedger::new();
        ledger.deposit(ResourceKind::Wood, 10.0);
        assert!(ledger.covers(&ResourceBundle::single(ResourceKind::Wood, 10.0)));
        assert!(!ledger.covers(&ResourceBundle::new(0.5, 10.0, 0.0, 0.0)));
    }

    #[test]
    fn advance_clamps_negative_rates() {
        let mut ledger = ResourceLedger::new();
        ledger.deposit(ResourceKind::Stone, 1.0);
        ledger.set_per_second(ResourceKind::Stone, -5.0);
        ledger.advance(2.0);
        assert_eq!(ledger.amount(ResourceKind::Stone), 0.0);
    }

    #[test]
    fn produced_kinds_skip_zero_entries() {
        let bundle = ResourceBundle::new(2.0, 0.0, 0.0, 0.5);
        let kinds: Vec<_> = bundle.produced_kinds().collect();
        assert_eq!(kinds, vec![ResourceKind::Food, ResourceKind::Gold]);
    }
}
