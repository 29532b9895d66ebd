//! What happened in each turn.

use crate::geo::City;
use crate::grid::Cell;
use crate::score::ScoreBoard;
use crate::session::{PlayerId, TurnState};
use crate::validator::{Validation, Violation};
use serde::{Deserialize, Serialize};

/// How a drawn city left the player's hand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TurnAction {
    /// Committed at the cell.
    Placed(Cell),
    /// Refused at the cell.
    Rejected {
        /// Attempted cell.
        cell: Cell,
        /// Every conflict found.
        violations: Vec<Violation>,
    },
    /// Dropped without an attempt.
    Discarded,
}

impl TurnAction {
    /// The resolution this action corresponds to.
    pub fn resolution(&self) -> Resolution {
        match self {
            TurnAction::Placed(_) => Resolution::Committed,
            TurnAction::Rejected { .. } => Resolution::Rejected,
            TurnAction::Discarded => Resolution::Discarded,
        }
    }
}

/// One consumed turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_getters::Getters)]
pub struct TurnRecord {
    /// Zero-based turn number.
    turn: usize,
    /// One-based round number.
    round: usize,
    /// Who played.
    player: PlayerId,
    /// The city drawn.
    city: City,
    /// What was done with it.
    action: TurnAction,
    /// Score change.
    delta: i64,
}

impl TurnRecord {
    pub(crate) fn new(
        turn: usize,
        round: usize,
        player: PlayerId,
        city: City,
        action: TurnAction,
        delta: i64,
    ) -> Self {
        Self {
            turn,
            round,
            player,
            city,
            action,
            delta,
        }
    }
}

/// How a turn ended.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display,
)]
#[strum(serialize_all = "lowercase")]
pub enum Resolution {
    /// The city was committed to the grid.
    Committed,
    /// The city broke the grid order and was thrown away.
    Rejected,
    /// The player dropped the city.
    Discarded,
}

/// Everything a caller needs to know after a placement attempt.
#[derive(Debug, Clone, PartialEq, derive_getters::Getters)]
pub struct PlacementReport {
    /// Validation result.
    outcome: Validation,
    /// How the turn ended.
    resolution: Resolution,
    /// Score change of the player.
    delta: i64,
    /// Tallies after the turn.
    scoreboard: ScoreBoard,
    /// State the session moved to.
    next: TurnState,
}

impl PlacementReport {
    pub(crate) fn new(
        outcome: Validation,
        delta: i64,
        scoreboard: ScoreBoard,
        next: TurnState,
    ) -> Self {
        let resolution = if outcome.is_valid() {
            Resolution::Committed
        } else {
            Resolution::Rejected
        };
        Self {
            outcome,
            resolution,
            delta,
            scoreboard,
            next,
        }
    }

    /// Why the placement was rejected, `None` when committed.
    pub fn reason(&self) -> Option<String> {
        self.outcome.reason()
    }
}
