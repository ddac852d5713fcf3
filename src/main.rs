use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use procciv::{resources::ResourceKind, scenario::ScenarioLoader};

#[derive(Debug, Parser)]
#[command(author, version, about = "Headless procciv scenario runner")]
struct Cli {
    /// Path to the scenario YAML file
    #[arg(long, default_value = "scenarios/river_valley.yaml")]
    scenario: PathBuf,

    /// Override tick count (uses scenario default when omitted)
    #[arg(long)]
    ticks: Option<u64>,

    /// Override the world seed
    #[arg(long)]
    seed: Option<u64>,

    /// Print the final snapshot as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let loader = ScenarioLoader::new(".");
    let scenario = loader.load(&cli.scenario)?;
    let mut game = scenario
        .build_game_with_seed(cli.seed)
        .with_context(|| format!("Invalid scenario '{}'", scenario.name))?;
    let ticks = scenario.ticks(cli.ticks);

    let summary = game.run(ticks, scenario.tick_seconds, &scenario.actions);
    let snapshot = game.snapshot();
    let ledger = game.economy().ledger();
    info!(
        scenario = scenario.name.as_str(),
        ticks = summary.ticks,
        applied = summary.applied,
        rejected = summary.rejected,
        food = ledger.amount(ResourceKind::Food),
        wood = ledger.amount(ResourceKind::Wood),
        stone = ledger.amount(ResourceKind::Stone),
        gold = ledger.amount(ResourceKind::Gold),
        population = snapshot.population.total,
        "scenario completed"
    );

    if cli.json {
        println!("{}", snapshot.to_json_pretty()?);
    }
    Ok(())
}
