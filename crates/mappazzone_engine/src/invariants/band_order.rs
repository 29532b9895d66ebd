//! Band order invariant: every pair of related placements is geographically ordered.

use super::Invariant;
use crate::grid::Grid;
use crate::rules::RuleSet;
use crate::session::GameSession;
use crate::validator::PlacementValidator;

/// Invariant: the grid satisfies the ordering rules of the session.
///
/// Checked by a full rescan, independently of the incremental validator: every
/// placement is validated against every other placement its scope relates.
pub struct BandOrderInvariant;

impl Invariant<GameSession> for BandOrderInvariant {
    fn holds(session: &GameSession) -> bool {
        grid_is_consistent(session.grid(), session.rules())
    }

    fn name() -> &'static str {
        "band order"
    }

    fn description() -> &'static str {
        "Placed cities are ordered by longitude across columns and latitude across rows"
    }
}

/// Whether every placement of `grid` is consistent with all the others under `rules`.
pub fn grid_is_consistent(grid: &Grid, rules: &RuleSet) -> bool {
    let validator = PlacementValidator::new(*rules);
    grid.placements()
        .all(|p| validator.validate_exhaustive(grid, p.cell(), p.city()).is_valid())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::City;
    use crate::grid::Cell;
    use crate::session::PlayerId;
    use crate::session::test_support::scenario_session;

    #[test]
    fn test_empty_session_holds() {
        assert!(BandOrderInvariant::holds(&scenario_session()));
    }

    #[test]
    fn test_unvalidated_placement_detected() {
        let mut grid = Grid::new(2, 2).unwrap();
        let owner = PlayerId::from("p");
        grid.place(Cell::new(0, 0), City::new("East", 0.0, 50.0), owner.clone())
            .unwrap();
        assert!(grid_is_consistent(&grid, &RuleSet::default()));
        grid.place(Cell::new(0, 1), City::new("West", 0.0, -50.0), owner)
            .unwrap();
        assert!(!grid_is_consistent(&grid, &RuleSet::default()));
    }

    #[test]
    fn test_corrupted_session_detected() {
        let mut session = scenario_session();
        session
            .grid_mut()
            .place(Cell::new(0, 0), City::new("South", -40.0, 0.0), PlayerId::from("ada"))
            .unwrap();
        session
            .grid_mut()
            .place(Cell::new(2, 0), City::new("North", 40.0, 0.0), PlayerId::from("ada"))
            .unwrap();
        assert!(!BandOrderInvariant::holds(&session));
    }
}
