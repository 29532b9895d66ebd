//! Mappazzone - unified CLI

#![warn(missing_docs)]

use anyhow::{Context, Result};
use clap::Parser;
use mappazzone::{
    AppConfig, Cli, Command, GreedyAI, HumanPlayer, Orchestrator, Player, RunOutcome, SharedInput,
    SimpleAI, Strategy, load_cities, load_index,
};
use mappazzone_engine::GameSession;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, instrument};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    initialize_tracing(cli.log_file.as_deref(), cli.quiet)?;

    match cli.command {
        Command::Play {
            config,
            players,
            seed,
            cities,
        } => run_play(&config, players, seed, cities),
        Command::Simulate {
            config,
            seed,
            bots,
            strategy,
            cities,
            transcript,
        } => run_simulate(&config, seed, bots, strategy, cities, transcript),
        Command::CheckCities { file } => run_check_cities(&file),
    }
}

fn initialize_tracing(log_file: Option<&Path>, quiet: bool) -> Result<()> {
    if quiet {
        return Ok(());
    }
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,mappazzone_engine=debug".into());
    let registry = tracing_subscriber::registry().with(filter);
    match log_file {
        Some(path) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("Failed to create log file {}", path.display()))?;
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(Arc::new(file))
                        .with_ansi(false),
                )
                .init();
        }
        None => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
    info!("Tracing initialized");
    Ok(())
}

fn rng_for(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

fn new_session(config: &AppConfig) -> Result<GameSession> {
    let index = load_index(config.cities().as_deref())?;
    let mut rng = rng_for(*config.seed());
    let session = GameSession::new(
        &index,
        config.players().iter().map(String::as_str),
        config.session().clone(),
        &mut rng,
    )
    .context("Failed to start session")?;
    Ok(session)
}

/// Interactive session on stdin/stdout.
#[instrument]
fn run_play(
    config_path: &Path,
    players: Option<Vec<String>>,
    seed: Option<u64>,
    cities: Option<PathBuf>,
) -> Result<()> {
    let config = AppConfig::from_file_or_default(config_path)?.with_overrides(players, seed, cities);
    let session = new_session(&config)?;

    let input = SharedInput::new(std::io::stdin().lock());
    let seats: Vec<Box<dyn Player>> = config
        .players()
        .iter()
        .map(|name| {
            Box::new(HumanPlayer::new(name.clone(), input.clone(), std::io::stdout()))
                as Box<dyn Player>
        })
        .collect();

    let mut orchestrator = Orchestrator::new(session, seats, std::io::stdout())?;
    if orchestrator.run()? == RunOutcome::Abandoned {
        println!("Game abandoned");
    }
    Ok(())
}

/// Computer players only.
#[instrument]
fn run_simulate(
    config_path: &Path,
    seed: Option<u64>,
    bots: usize,
    strategy: Strategy,
    cities: Option<PathBuf>,
    transcript: Option<PathBuf>,
) -> Result<()> {
    let names: Vec<String> = (1..=bots).map(|i| format!("bot{}", i)).collect();
    let config = AppConfig::from_file_or_default(config_path)?
        .with_overrides(None, seed, cities)
        .with_players(names.clone());
    let session = new_session(&config)?;

    let seats: Vec<Box<dyn Player>> = names
        .into_iter()
        .map(|name| match strategy {
            Strategy::Greedy => Box::new(GreedyAI::new(name)) as Box<dyn Player>,
            Strategy::First => Box::new(SimpleAI::new(name)) as Box<dyn Player>,
        })
        .collect();

    let mut orchestrator = Orchestrator::new(session, seats, std::io::stdout())?;
    orchestrator.run()?;

    if let Some(path) = transcript {
        let file = std::fs::File::create(&path)
            .with_context(|| format!("Failed to create transcript {}", path.display()))?;
        serde_json::to_writer_pretty(file, orchestrator.session().history())
            .context("Failed to write transcript")?;
        info!(path = %path.display(), "Transcript written");
    }
    Ok(())
}

/// Loads a reference table and reports what it holds.
#[instrument]
fn run_check_cities(file: &Path) -> Result<()> {
    let index = load_cities(file)?;
    println!("{}: {} cities", file.display(), index.len());
    Ok(())
}
