//! Pre- and postconditions of a turn.
//!
//! Preconditions decide whether an action may be attempted at all: a failing
//! precondition is returned as an error and the turn is not consumed. Postconditions
//! compare the session before and after a consumed turn.

use crate::error::{GameError, GameResult};
use crate::grid::Cell;
use crate::invariants::{InvariantSet, SessionInvariants, describe};
use crate::session::{GameSession, TurnState};
use tracing::instrument;

// ─────────────────────────────────────────────────────────────
//  Contract Trait
// ─────────────────────────────────────────────────────────────

/// Preconditions and postconditions of a state transition.
pub trait Contract<S, A> {
    /// Checks preconditions before applying the action.
    fn pre(state: &S, action: &A) -> GameResult<()>;

    /// Checks postconditions after applying the action.
    fn post(before: &S, after: &S) -> GameResult<()>;
}

// ─────────────────────────────────────────────────────────────
//  Preconditions
// ─────────────────────────────────────────────────────────────

/// Precondition: the current player holds a drawn city.
pub struct HoldsDrawnCity;

impl HoldsDrawnCity {
    /// Fails with [`GameError::WrongPhase`] outside `AwaitingPlacement`.
    pub fn check(session: &GameSession) -> GameResult<()> {
        match session.state() {
            TurnState::AwaitingPlacement if session.drawn().is_some() => Ok(()),
            actual => Err(GameError::WrongPhase {
                expected: "awaiting placement",
                actual,
            }),
        }
    }
}

/// Precondition: the cell lies inside the grid.
pub struct CellInBounds;

impl CellInBounds {
    /// Fails with [`GameError::OutOfBounds`] outside the grid.
    #[instrument(skip(session))]
    pub fn check(cell: &Cell, session: &GameSession) -> GameResult<()> {
        session.grid().check_bounds(*cell)
    }
}

/// Precondition: the cell holds no city.
pub struct CellIsEmpty;

impl CellIsEmpty {
    /// Fails with [`GameError::CellOccupied`] when a city is already there.
    #[instrument(skip(session))]
    pub fn check(cell: &Cell, session: &GameSession) -> GameResult<()> {
        if session.grid().get(*cell).is_some() {
            Err(GameError::CellOccupied(*cell))
        } else {
            Ok(())
        }
    }
}

/// Composite precondition of a placement attempt.
pub struct LegalPlacement;

impl LegalPlacement {
    /// Validates all preconditions for placing the drawn city at `cell`.
    #[instrument(skip(session))]
    pub fn check(cell: &Cell, session: &GameSession) -> GameResult<()> {
        HoldsDrawnCity::check(session)?;
        CellInBounds::check(cell, session)?;
        CellIsEmpty::check(cell, session)?;
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────
//  Turn Contracts
// ─────────────────────────────────────────────────────────────

/// Shared postcondition of every consumed turn: exactly one record was added,
/// at most one city was committed, and every session invariant still holds.
fn turn_consumed(before: &GameSession, after: &GameSession) -> GameResult<()> {
    if after.history().len() != before.history().len() + 1 {
        return Err(GameError::InvariantViolation(format!(
            "Postcondition failed: history grew from {} to {}",
            before.history().len(),
            after.history().len()
        )));
    }
    let (was, now) = (before.grid().placed(), after.grid().placed());
    if now < was || now > was + 1 {
        return Err(GameError::InvariantViolation(format!(
            "Postcondition failed: grid went from {} to {} cities",
            was, now
        )));
    }
    SessionInvariants::check_all(after).map_err(|violations| {
        GameError::InvariantViolation(format!("Postcondition failed: {}", describe(&violations)))
    })
}

/// Contract of [`GameSession::attempt_place`].
pub struct PlacementContract;

impl Contract<GameSession, Cell> for PlacementContract {
    fn pre(session: &GameSession, cell: &Cell) -> GameResult<()> {
        LegalPlacement::check(cell, session)
    }

    fn post(before: &GameSession, after: &GameSession) -> GameResult<()> {
        turn_consumed(before, after)
    }
}

/// Contract of [`GameSession::discard`].
pub struct DiscardContract;

impl Contract<GameSession, ()> for DiscardContract {
    fn pre(session: &GameSession, _action: &()) -> GameResult<()> {
        if !*session.config().allow_discard() {
            return Err(GameError::DiscardNotAllowed);
        }
        HoldsDrawnCity::check(session)
    }

    fn post(before: &GameSession, after: &GameSession) -> GameResult<()> {
        turn_consumed(before, after)?;
        if after.grid().placed() != before.grid().placed() {
            return Err(GameError::InvariantViolation(
                "Postcondition failed: a discard changed the grid".to_string(),
            ));
        }
        Ok(())
    }
}
