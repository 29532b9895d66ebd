//! Command-line front end for the Mappazzone engine.
//!
//! Loads configuration and reference data from disk, then drives a
//! [`mappazzone_engine::GameSession`] with human or computer players.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod cli;
pub mod config;
pub mod orchestrator;
pub mod players;

pub use cli::{Cli, Command, Strategy};
pub use config::{AppConfig, load_cities, load_index};
pub use orchestrator::{Orchestrator, RunOutcome};
pub use players::{GreedyAI, HumanPlayer, Move, Player, SharedInput, SimpleAI, parse_move};
