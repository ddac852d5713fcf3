pub mod buildings;
pub mod chunk;
pub mod economy;
pub mod error;
pub mod game;
pub mod graph;
pub mod noise;
pub mod population;
pub mod resources;
pub mod scenario;
pub mod snapshot;
pub mod terrain;
pub mod upgrades;

pub use error::CatalogError;
pub use game::{Command, Game, GameSettings, RunSummary, ScheduledCommand};
pub use resources::ResourceKind;
pub use scenario::{Scenario, ScenarioLoader};
pub use snapshot::GameSnapshot;
