//! Placement validation and scoring engine for Mappazzone, a geolocalization board game.
//!
//! Players draw cities and place them on a shared grid whose columns read as
//! longitude bands and whose rows read as latitude bands. A placement is accepted
//! only if the grid stays geographically ordered.
//!
//! # Architecture
//!
//! - [`GeoIndex`]: read-only reference table of cities
//! - [`Grid`]: the board
//! - [`RuleSet`] and [`PlacementValidator`]: when a placement keeps the grid ordered
//! - [`ScoreKeeper`]: score deltas and the [`ScoreBoard`]
//! - [`GameSession`]: the turn state machine tying them together
//!
//! The engine performs no I/O. Reference data and configuration are parsed from
//! strings; reading files is left to the caller.
//!
//! # Example
//!
//! ```
//! use mappazzone_engine::{Cell, City, Deck, GameSession, SessionConfig};
//!
//! let config = SessionConfig::default().with_rows(3).with_columns(3);
//! let deck = Deck::from_cities(vec![City::new("Rome", 41.9, 12.5)]);
//! let mut session = GameSession::with_deck(["ada"], config, deck)?;
//! session.draw()?;
//! let report = session.attempt_place(Cell::new(1, 1))?;
//! assert!(report.outcome().is_valid());
//! # Ok::<(), mappazzone_engine::GameError>(())
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod config;
pub mod contracts;
pub mod deck;
pub mod error;
pub mod geo;
pub mod grid;
pub mod invariants;
pub mod rules;
pub mod score;
pub mod session;
pub mod validator;

pub use config::SessionConfig;
pub use contracts::{Contract, DiscardContract, PlacementContract};
pub use deck::Deck;
pub use error::{ConfigError, DataError, GameError, GameResult};
pub use geo::{City, CityFilter, Continent, GeoIndex};
pub use grid::{Cell, Grid, Placement};
pub use invariants::{Invariant, InvariantSet, InvariantViolation, SessionInvariants};
pub use rules::{AxisOrientation, ColumnOrder, Direction, RowOrder, RuleSet, Scope, TieRule};
pub use score::{Occupancy, ScoreBoard, ScoreEntry, ScoreKeeper, ScoreRules, ScoringMode};
pub use session::{
    FinishReason, GameSession, PlacementReport, PlayerId, Resolution, TurnAction, TurnRecord,
    TurnState,
};
pub use validator::{PlacementValidator, Validation, Violation, ViolationKind};
