//! History consistency invariant: the history accounts for every placed city.

use super::Invariant;
use crate::session::{GameSession, TurnAction};

/// Invariant: every `Placed` record matches the city stored at its cell, and the
/// grid holds nothing else apart from a seeded center city.
pub struct HistoryConsistentInvariant;

impl Invariant<GameSession> for HistoryConsistentInvariant {
    fn holds(session: &GameSession) -> bool {
        let mut placed = 0;
        for record in session.history() {
            if let TurnAction::Placed(cell) = record.action() {
                placed += 1;
                let matches = session
                    .grid()
                    .get(*cell)
                    .is_some_and(|p| p.city() == record.city() && p.owner() == record.player());
                if !matches {
                    return false;
                }
            }
        }
        let seeded = usize::from(session.seeded().is_some());
        placed + seeded == session.grid().placed()
    }

    fn name() -> &'static str {
        "history consistency"
    }

    fn description() -> &'static str {
        "History records match the placed cities"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::City;
    use crate::grid::Cell;
    use crate::session::PlayerId;
    use crate::session::test_support::scenario_session;

    #[test]
    fn test_holds_after_placement() {
        let mut session = scenario_session();
        session.draw().unwrap();
        session.attempt_place(Cell::new(1, 1)).unwrap();
        assert!(HistoryConsistentInvariant::holds(&session));
    }

    #[test]
    fn test_rejections_do_not_count() {
        let mut session = scenario_session();
        for cell in [Cell::new(1, 1), Cell::new(0, 0), Cell::new(0, 2)] {
            session.draw().unwrap();
            session.attempt_place(cell).unwrap();
        }
        assert_eq!(session.grid().placed(), 2);
        assert!(HistoryConsistentInvariant::holds(&session));
    }

    #[test]
    fn test_unrecorded_placement_detected() {
        let mut session = scenario_session();
        session
            .grid_mut()
            .place(Cell::new(2, 2), City::new("Ghost", 0.0, 0.0), PlayerId::from("ada"))
            .unwrap();
        assert!(!HistoryConsistentInvariant::holds(&session));
    }
}
