//! Error types for the placement engine.
//!
//! Only [`DataError`] is fatal: it aborts loading of reference data and therefore
//! session creation. Everything in [`GameError`] is an outcome the caller branches on.
//! A rejected placement is not an error at all, see [`crate::Validation`].

use crate::grid::Cell;
use crate::session::{PlayerId, TurnState};
use derive_more::{Display, Error};
use tracing::instrument;

/// Malformed reference data, with the location that detected it.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("Data error: {} at {}:{}", message, file, line)]
pub struct DataError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl DataError {
    /// Creates a new data error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

impl From<toml::de::Error> for DataError {
    #[track_caller]
    fn from(err: toml::de::Error) -> Self {
        Self::new(format!("Failed to parse reference table: {}", err))
    }
}

/// Unreadable or malformed session configuration.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

/// Recoverable failures raised by the index, the grid and the session.
#[derive(Debug, Clone, PartialEq, Display)]
pub enum GameError {
    /// No city with this name exists in the index.
    #[display("City {:?} not found", _0)]
    NotFound(String),

    /// More cities were requested than the index holds.
    #[display("Not enough cities available: {} > {}", requested, available)]
    NotEnoughCities {
        /// Cities requested.
        requested: usize,
        /// Cities available.
        available: usize,
    },

    /// The deck has no city left to draw.
    #[display("The deck is empty")]
    EmptyDeck,

    /// The cell already holds a placement.
    #[display("Cell {} is already occupied", _0)]
    CellOccupied(Cell),

    /// The cell lies outside the grid.
    #[display("Cell {} is outside a {}x{} grid", cell, rows, columns)]
    OutOfBounds {
        /// The offending cell.
        cell: Cell,
        /// Grid rows.
        rows: usize,
        /// Grid columns.
        columns: usize,
    },

    /// A grid needs at least one row and one column.
    #[display("Invalid grid dimensions {}x{}", rows, columns)]
    InvalidDimensions {
        /// Requested rows.
        rows: usize,
        /// Requested columns.
        columns: usize,
    },

    /// A session was created without players.
    #[display("Cannot play a game without players")]
    NoPlayers,

    /// The same player was registered twice.
    #[display("Player {} is registered twice", _0)]
    DuplicatePlayer(PlayerId),

    /// The player is not part of this session.
    #[display("Unknown player {}", _0)]
    UnknownPlayer(PlayerId),

    /// The operation is not available in the current turn state.
    #[display("Expected state {}, but the session is {}", expected, actual)]
    WrongPhase {
        /// State the operation requires.
        expected: &'static str,
        /// State the session is in.
        actual: TurnState,
    },

    /// Discarding a drawn city is disabled by the configuration.
    #[display("Discarding a drawn city is not allowed")]
    DiscardNotAllowed,

    /// Final scores were requested before the session finished.
    #[display("The session is not finished yet")]
    NotFinished,

    /// A whole-state invariant failed after a turn.
    #[display("Invariant violation: {}", _0)]
    InvariantViolation(String),

    /// Reference data could not be loaded.
    #[display("{}", _0)]
    Data(DataError),

    /// The session configuration is inconsistent.
    #[display("{}", _0)]
    Config(ConfigError),
}

impl From<DataError> for GameError {
    fn from(err: DataError) -> Self {
        GameError::Data(err)
    }
}

impl From<ConfigError> for GameError {
    fn from(err: ConfigError) -> Self {
        GameError::Config(err)
    }
}

impl std::error::Error for GameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GameError::Data(err) => Some(err),
            GameError::Config(err) => Some(err),
            _ => None,
        }
    }
}

/// Result alias for engine operations.
pub type GameResult<T> = Result<T, GameError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_error_tracks_location() {
        let err = DataError::new("duplicate city");
        assert!(err.file.ends_with("error.rs"));
        assert!(err.to_string().contains("duplicate city"));
    }

    #[test]
    fn test_game_error_wraps_data_error() {
        let err: GameError = DataError::new("bad latitude").into();
        assert!(matches!(err, GameError::Data(_)));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_cell_occupied_message() {
        let err = GameError::CellOccupied(Cell::new(1, 2));
        assert_eq!(err.to_string(), "Cell (1, 2) is already occupied");
    }
}
