//! Command-line interface for mappazzone.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Mappazzone - place cities on a grid so that it stays a map
#[derive(Parser, Debug)]
#[command(name = "mappazzone")]
#[command(about = "Geolocalization board game on the command line", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Write logs to this file instead of stderr
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Disable logging
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// How computer players choose a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Strategy {
    /// First cell where the drawn city is accepted
    #[default]
    Greedy,
    /// First free cell, whatever the outcome
    First,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play an interactive session on this terminal
    Play {
        /// Path to the game configuration file
        #[arg(short, long, default_value = "mappazzone.toml")]
        config: PathBuf,

        /// Comma-separated player names (overrides the config file)
        #[arg(short, long, value_delimiter = ',')]
        players: Option<Vec<String>>,

        /// Deck shuffling seed (overrides the config file)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Reference table of cities (overrides the config file)
        #[arg(long)]
        cities: Option<PathBuf>,
    },

    /// Let computer players play a full session
    Simulate {
        /// Path to the game configuration file
        #[arg(short, long, default_value = "mappazzone.toml")]
        config: PathBuf,

        /// Deck shuffling seed (overrides the config file)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Number of computer players
        #[arg(short, long, default_value = "2")]
        bots: usize,

        /// Placement strategy of the computer players
        #[arg(long, value_enum, default_value_t = Strategy::Greedy)]
        strategy: Strategy,

        /// Reference table of cities (overrides the config file)
        #[arg(long)]
        cities: Option<PathBuf>,

        /// Write the turn history as JSON to this file
        #[arg(long)]
        transcript: Option<PathBuf>,
    },

    /// Validate a reference table of cities
    CheckCities {
        /// TOML file with a [[cities]] array
        file: PathBuf,
    },
}
