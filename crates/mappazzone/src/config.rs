//! Game configuration file.

use anyhow::{Context, Result};
use derive_getters::Getters;
use mappazzone_engine::{GeoIndex, SessionConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// Contents of a `mappazzone.toml` file.
///
/// ```toml
/// players = ["ada", "bob"]
/// seed = 42
/// cities = "cities.toml"
///
/// [session]
/// rows = 5
/// columns = 5
/// ```
#[derive(Debug, Clone, PartialEq, Getters, Serialize, Deserialize)]
pub struct AppConfig {
    /// Player names in turn order.
    #[serde(default = "default_players")]
    players: Vec<String>,

    /// Deck shuffling seed. Random when absent.
    #[serde(default)]
    seed: Option<u64>,

    /// Reference table of cities. The built-in capitals when absent.
    #[serde(default)]
    cities: Option<PathBuf>,

    /// Session settings.
    #[serde(default)]
    session: SessionConfig,
}

fn default_players() -> Vec<String> {
    vec!["player1".to_string(), "player2".to_string()]
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            players: default_players(),
            seed: None,
            cities: None,
            session: SessionConfig::default(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from a TOML file.
    ///
    /// A relative `cities` path is resolved against the directory of the file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let mut config = Self::from_toml_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;

        if let (Some(cities), Some(dir)) = (config.cities.as_ref(), path.parent()) {
            if cities.is_relative() {
                config.cities = Some(dir.join(cities));
            }
        }
        info!(players = config.players.len(), "Config loaded successfully");
        Ok(config)
    }

    /// Parses and validates a configuration document.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("Failed to parse config")?;
        config.session.validate()?;
        Ok(config)
    }

    /// Loads the file when it exists, otherwise falls back to the defaults.
    pub fn from_file_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::from_file(path)
        } else {
            info!(path = %path.display(), "No config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Applies command-line overrides.
    pub fn with_overrides(
        mut self,
        players: Option<Vec<String>>,
        seed: Option<u64>,
        cities: Option<PathBuf>,
    ) -> Self {
        if let Some(players) = players {
            self.players = players;
        }
        if seed.is_some() {
            self.seed = seed;
        }
        if cities.is_some() {
            self.cities = cities;
        }
        self
    }

    /// Replaces the player list.
    pub fn with_players(mut self, players: Vec<String>) -> Self {
        self.players = players;
        self
    }
}

/// Loads a reference table of cities from a TOML file.
#[instrument(skip(path), fields(path = %path.as_ref().display()))]
pub fn load_cities(path: impl AsRef<Path>) -> Result<GeoIndex> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read reference table {}", path.display()))?;
    let index = GeoIndex::from_toml_str(&content)
        .with_context(|| format!("Invalid reference table {}", path.display()))?;
    info!(cities = index.len(), "Reference table loaded");
    Ok(index)
}

/// The configured reference table, or the built-in capitals.
pub fn load_index(cities: Option<&Path>) -> Result<GeoIndex> {
    match cities {
        Some(path) => load_cities(path),
        None => GeoIndex::builtin().context("Built-in reference table is invalid"),
    }
}
