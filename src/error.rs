//! Validation errors for externally supplied catalogs and graph layouts.
//!
//! The simulation itself never fails; these only surface when building a
//! [`Game`](crate::game::Game) from scenario data.

/// Problems found while validating catalogs and the upgrade graph.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CatalogError {
    #[error("{0} catalog is empty")]
    EmptyCatalog(&'static str),

    #[error("graph node {node} wraps unknown upgrade {upgrade}")]
    UnknownUpgrade { node: usize, upgrade: usize },

    #[error("graph node {node} lists unknown prerequisite node {prerequisite}")]
    UnknownPrerequisite { node: usize, prerequisite: usize },

    #[error("prerequisite cycle through graph node {node}")]
    Cycle { node: usize },

    #[error("building '{building}' is unlocked by unknown upgrade {upgrade}")]
    UnknownUnlockSource { building: String, upgrade: usize },

    #[error("upgrade '{upgrade}' unlocks unknown building {building}")]
    UnknownBuilding { upgrade: String, building: usize },

    #[error("building '{building}' and upgrade '{upgrade}' disagree on what unlocks it")]
    UnlockMismatch { building: String, upgrade: String },

    #[error("'{name}' has a negative or non-finite {field}")]
    InvalidAmount { name: String, field: &'static str },

    #[error("'{name}' has a non-positive or non-finite tick length")]
    InvalidTickLength { name: String },

    #[error("upgrade '{upgrade}' has cost reduction {delta} outside [0, 0.9]")]
    CostReductionOutOfRange { upgrade: String, delta: f64 },
}
