//! Session configuration.

use crate::error::ConfigError;
use crate::geo::CityFilter;
use crate::rules::RuleSet;
use crate::score::{ScoreRules, ScoringMode};
use derive_getters::Getters;
use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Everything fixed at session start.
#[derive(Debug, Clone, PartialEq, Getters, Setters, Serialize, Deserialize)]
#[setters(prefix = "with_")]
#[serde(default)]
pub struct SessionConfig {
    /// Grid rows.
    rows: usize,

    /// Grid columns.
    columns: usize,

    /// Ordering rules.
    rules: RuleSet,

    /// Scoring rules.
    scoring: ScoreRules,

    /// Cities in the deck. `None` uses every city of the filtered index.
    #[setters(strip_option)]
    deck_size: Option<usize>,

    /// Complete rounds after which the session ends.
    #[setters(strip_option)]
    max_rounds: Option<usize>,

    /// Cities on the board after which the session ends.
    #[setters(strip_option)]
    max_placed: Option<usize>,

    /// The deck counts as empty once this many cities or fewer remain.
    deck_reserve: usize,

    /// Whether a drawn city may be dropped instead of placed.
    allow_discard: bool,

    /// Commit the first city of the deck at the grid center before the first turn.
    seed_center: bool,

    /// Which cities may be dealt.
    filter: CityFilter,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            rows: 5,
            columns: 5,
            rules: RuleSet::default(),
            scoring: ScoreRules::default(),
            deck_size: None,
            max_rounds: None,
            max_placed: None,
            deck_reserve: 0,
            allow_discard: false,
            seed_center: false,
            filter: CityFilter::default(),
        }
    }
}

impl SessionConfig {
    /// Parses a configuration from TOML; missing keys take their defaults.
    #[instrument(skip(content))]
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse session config: {}", e)))?;
        config.validate()?;
        debug!(rows = config.rows, columns = config.columns, "Session config parsed");
        Ok(config)
    }

    /// Rejects settings no session can be played with.
    #[instrument(skip(self))]
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rows == 0 || self.columns == 0 {
            return Err(ConfigError::new(format!(
                "Grid dimensions must be positive, got {}x{}",
                self.rows, self.columns
            )));
        }
        if self.rows.checked_mul(self.columns).is_none() {
            return Err(ConfigError::new(format!(
                "Grid of {}x{} cells is too large",
                self.rows, self.columns
            )));
        }
        self.rules.validate()?;
        if self.max_rounds == Some(0) {
            return Err(ConfigError::new("max_rounds must be at least 1"));
        }
        if self.max_placed == Some(0) {
            return Err(ConfigError::new("max_placed must be at least 1"));
        }
        match self.scoring.mode {
            ScoringMode::Decreasing { base, floor } if floor > base => Err(ConfigError::new(
                format!("Scoring floor {} exceeds base {}", floor, base),
            )),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{Scope, TieRule};

    #[test]
    fn test_defaults() {
        let config = SessionConfig::from_toml_str("").unwrap();
        assert_eq!(config, SessionConfig::default());
        assert_eq!(*config.rows(), 5);
        assert!(config.deck_size().is_none());
    }

    #[test]
    fn test_full_document() {
        let config = SessionConfig::from_toml_str(
            r#"
            rows = 3
            columns = 4
            deck_size = 20
            max_rounds = 6
            allow_discard = true
            seed_center = true

            [rules]
            ties = "strict"
            tolerance = 2.5
            scope = "lines"
            alignment = true

            [scoring]
            penalty = 1
            [scoring.mode]
            kind = "fixed"
            award = 3

            [filter]
            capitals_only = true
            continents = ["EU", "AF"]
            "#,
        )
        .unwrap();
        assert_eq!(*config.columns(), 4);
        assert_eq!(*config.deck_size(), Some(20));
        assert_eq!(*config.max_rounds(), Some(6));
        assert!(*config.allow_discard());
        assert!(*config.seed_center());
        assert_eq!(config.rules().ties, TieRule::Strict);
        assert_eq!(config.rules().scope, Scope::Lines);
        assert_eq!(config.scoring().mode, ScoringMode::Fixed { award: 3 });
        assert_eq!(config.filter().continents.as_ref().map(|c| c.len()), Some(2));
    }

    #[test]
    fn test_setters() {
        let config = SessionConfig::default()
            .with_rows(3)
            .with_columns(3)
            .with_max_rounds(2)
            .with_allow_discard(true);
        assert_eq!(*config.rows(), 3);
        assert_eq!(*config.max_rounds(), Some(2));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_settings() {
        assert!(SessionConfig::from_toml_str("rows = 0").is_err());
        assert!(SessionConfig::from_toml_str("max_rounds = 0").is_err());
        assert!(SessionConfig::from_toml_str("max_placed = 0").is_err());
        assert!(SessionConfig::from_toml_str("[rules]\ntolerance = -2.0").is_err());
        assert!(
            SessionConfig::from_toml_str(
                "[scoring.mode]\nkind = \"decreasing\"\nbase = 1\nfloor = 5"
            )
            .is_err()
        );
        assert!(SessionConfig::from_toml_str("rows = \"three\"").is_err());
    }

    #[test]
    fn test_oversized_grid_rejected() {
        let config = SessionConfig::default()
            .with_rows(usize::MAX)
            .with_columns(2);
        let err = config.validate().unwrap_err();
        assert!(err.message.contains("too large"));
    }

    #[test]
    fn test_end_conditions_parsed() {
        let config = SessionConfig::from_toml_str("max_placed = 7\ndeck_reserve = 10").unwrap();
        assert_eq!(*config.max_placed(), Some(7));
        assert_eq!(*config.deck_reserve(), 10);
    }
}
