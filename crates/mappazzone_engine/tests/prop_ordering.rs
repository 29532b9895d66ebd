//! Property-based tests for the grid ordering.
//!
//! Random cities are thrown at random cells; whatever the validator accepts must
//! leave the grid consistent, and the incremental check must agree with a full
//! comparison against every placement.

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use mappazzone_engine::invariants::grid_is_consistent;
use mappazzone_engine::{
    Cell, City, Grid, PlacementValidator, PlayerId, RuleSet, Scope, TieRule, Validation,
};
use proptest::prelude::*;

fn rules_strategy() -> impl Strategy<Value = RuleSet> {
    (
        prop_oneof![Just(TieRule::NonStrict), Just(TieRule::Strict)],
        prop_oneof![Just(Scope::Lines), Just(Scope::Bands)],
        prop_oneof![Just(0.0), 0.5f64..10.0],
        any::<bool>(),
    )
        .prop_map(|(ties, scope, tolerance, alignment)| RuleSet {
            ties,
            scope,
            tolerance,
            alignment,
            ..RuleSet::default()
        })
}

/// Coordinates on a coarse lattice so that ties actually happen.
fn move_strategy(rows: usize, columns: usize) -> impl Strategy<Value = (usize, usize, f64, f64)> {
    (
        0..rows,
        0..columns,
        (-18i32..=18).prop_map(|v| f64::from(v) * 5.0),
        (-36i32..=36).prop_map(|v| f64::from(v) * 5.0),
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Every accepted placement keeps the whole grid consistent.
    #[test]
    fn prop_accepted_placements_keep_grid_consistent(
        rules in rules_strategy(),
        moves in prop::collection::vec(move_strategy(4, 5), 1..60)
    ) {
        let validator = PlacementValidator::new(rules);
        let mut grid = Grid::new(4, 5).unwrap();
        let owner = PlayerId::from("p");
        for (i, (row, column, lat, lon)) in moves.into_iter().enumerate() {
            let cell = Cell::new(row, column);
            if !grid.is_free(cell) {
                continue;
            }
            let city = City::new(format!("City{}", i), lat, lon);
            if validator.validate(&grid, cell, &city).is_valid() {
                grid.place(cell, city, owner.clone()).unwrap();
                prop_assert!(grid_is_consistent(&grid, &rules));
            }
        }
    }

    /// The nearest-neighbor check finds a violation exactly when a full rescan does.
    #[test]
    fn prop_incremental_agrees_with_rescan(
        rules in rules_strategy(),
        moves in prop::collection::vec(move_strategy(4, 4), 1..40),
        probes in prop::collection::vec(move_strategy(4, 4), 1..10)
    ) {
        let validator = PlacementValidator::new(rules);
        let mut grid = Grid::new(4, 4).unwrap();
        let owner = PlayerId::from("p");
        for (i, (row, column, lat, lon)) in moves.into_iter().enumerate() {
            let cell = Cell::new(row, column);
            let city = City::new(format!("City{}", i), lat, lon);
            if grid.is_free(cell) && validator.validate(&grid, cell, &city).is_valid() {
                grid.place(cell, city, owner.clone()).unwrap();
            }
        }
        for (row, column, lat, lon) in probes {
            let cell = Cell::new(row, column);
            if !grid.is_free(cell) {
                continue;
            }
            let city = City::new("Probe", lat, lon);
            let incremental = validator.validate(&grid, cell, &city);
            let rescan = validator.validate_exhaustive(&grid, cell, &city);
            prop_assert_eq!(incremental.is_valid(), rescan.is_valid());
            prop_assert_eq!(incremental.violated_kinds(), rescan.violated_kinds());
        }
    }

    /// Validation is a pure function of grid, cell and city.
    #[test]
    fn prop_validation_deterministic(
        rules in rules_strategy(),
        moves in prop::collection::vec(move_strategy(3, 3), 1..12),
        probe in move_strategy(3, 3)
    ) {
        let validator = PlacementValidator::new(rules);
        let mut grid = Grid::new(3, 3).unwrap();
        for (i, (row, column, lat, lon)) in moves.into_iter().enumerate() {
            let cell = Cell::new(row, column);
            let city = City::new(format!("City{}", i), lat, lon);
            if grid.is_free(cell) && validator.validate(&grid, cell, &city).is_valid() {
                grid.place(cell, city, PlayerId::from("p")).unwrap();
            }
        }
        let (row, column, lat, lon) = probe;
        let city = City::new("Probe", lat, lon);
        let first: Validation = validator.validate(&grid, Cell::new(row, column), &city);
        let second = validator.validate(&grid, Cell::new(row, column), &city);
        prop_assert_eq!(first, second);
    }
}
