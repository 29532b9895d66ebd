//! Placement validation: is a city at a cell consistent with the cities already placed?
//!
//! The check is incremental. The grid invariant holds before every placement because
//! every earlier placement went through this same check, so with a transitive order
//! the candidate only has to be compared with the nearest occupied neighbor (or band)
//! on each side: anything farther away is already ordered relative to that neighbor.
//! A positive tolerance makes the order non-transitive, and then every relevant
//! placement is compared.

use crate::geo::City;
use crate::grid::{Cell, Grid, Placement};
use crate::rules::{Direction, RuleSet, Scope};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, instrument};

/// The kind of ordering a placement breaks.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
)]
pub enum ViolationKind {
    /// Longitudes out of order along a row.
    #[strum(to_string = "row order violated")]
    RowOrder,
    /// Latitudes out of order along a column.
    #[strum(to_string = "column order violated")]
    ColumnOrder,
    /// Latitudes disagree within a row.
    #[strum(to_string = "row alignment violated")]
    RowAlignment,
    /// Longitudes disagree within a column.
    #[strum(to_string = "column alignment violated")]
    ColumnAlignment,
}

impl ViolationKind {
    /// The coordinate the kind is about.
    pub fn direction(self) -> Direction {
        match self {
            ViolationKind::RowOrder | ViolationKind::ColumnAlignment => Direction::Longitude,
            ViolationKind::ColumnOrder | ViolationKind::RowAlignment => Direction::Latitude,
        }
    }
}

/// One already placed city the candidate conflicts with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    kind: ViolationKind,
    conflicting: Placement,
}

impl Violation {
    /// Creates a violation against `conflicting`.
    pub fn new(kind: ViolationKind, conflicting: Placement) -> Self {
        Self { kind, conflicting }
    }

    /// What was broken.
    pub fn kind(&self) -> ViolationKind {
        self.kind
    }

    /// The coordinate that is out of order.
    pub fn direction(&self) -> Direction {
        self.kind.direction()
    }

    /// Human readable reason, e.g. "row order violated".
    pub fn reason(&self) -> String {
        self.kind.to_string()
    }

    /// The placed city the candidate conflicts with.
    pub fn conflicting(&self) -> &Placement {
        &self.conflicting
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: conflicts with {} at {}",
            self.kind,
            self.conflicting.city().name(),
            self.conflicting.cell()
        )
    }
}

/// Outcome of validating a candidate placement. `Invalid` is a normal game outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Validation {
    /// The placement keeps the grid consistent.
    Valid,
    /// The placement would break the grid order; never empty.
    Invalid(Vec<Violation>),
}

impl Validation {
    fn from_violations(violations: Vec<Violation>) -> Self {
        if violations.is_empty() {
            Validation::Valid
        } else {
            Validation::Invalid(violations)
        }
    }

    /// Whether the placement is accepted.
    pub fn is_valid(&self) -> bool {
        matches!(self, Validation::Valid)
    }

    /// Every conflict found, empty when valid.
    pub fn violations(&self) -> &[Violation] {
        match self {
            Validation::Valid => &[],
            Validation::Invalid(violations) => violations,
        }
    }

    /// Distinct kinds of violation, in declaration order.
    pub fn violated_kinds(&self) -> BTreeSet<ViolationKind> {
        self.violations().iter().map(Violation::kind).collect()
    }

    /// Distinct coordinates the violations are about. An alignment failure shares
    /// its direction with the order failures along the same coordinate.
    pub fn violated_directions(&self) -> BTreeSet<Direction> {
        self.violations().iter().map(Violation::direction).collect()
    }

    /// Combined reason text, `None` when valid.
    pub fn reason(&self) -> Option<String> {
        match self {
            Validation::Valid => None,
            Validation::Invalid(violations) => Some(
                violations
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("; "),
            ),
        }
    }
}

/// How far from the candidate the comparison reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Reach {
    /// Nearest occupied neighbor or band on each side.
    Nearest,
    /// Everything on each side.
    All,
}

/// Placements on both sides of a candidate along one axis, grouped nearest first.
///
/// In `Lines` scope every group holds a single placement, in `Bands` scope a group
/// is a whole row or column.
struct Sides<'g> {
    low: Vec<Vec<&'g Placement>>,
    high: Vec<Vec<&'g Placement>>,
}

/// Decides whether a city may go to a cell.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlacementValidator {
    rules: RuleSet,
}

impl PlacementValidator {
    /// Creates a validator for `rules`.
    pub fn new(rules: RuleSet) -> Self {
        Self { rules }
    }

    /// The rules in force.
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Validates `city` at `cell` against the current grid.
    ///
    /// The cell itself is ignored even if occupied: occupancy is the caller's concern.
    #[instrument(skip_all, fields(city = %city.name(), %cell))]
    pub fn validate(&self, grid: &Grid, cell: Cell, city: &City) -> Validation {
        let reach = if self.rules.is_transitive() {
            Reach::Nearest
        } else {
            Reach::All
        };
        let validation = self.check(grid, cell, city, reach);
        debug!(
            valid = validation.is_valid(),
            violations = validation.violations().len(),
            "Validated placement"
        );
        validation
    }

    /// Validates by comparing with every relevant placement, ignoring transitivity.
    ///
    /// Slower than [`PlacementValidator::validate`], and reports every conflicting
    /// city rather than the nearest ones.
    pub fn validate_exhaustive(&self, grid: &Grid, cell: Cell, city: &City) -> Validation {
        self.check(grid, cell, city, Reach::All)
    }

    fn check(&self, grid: &Grid, cell: Cell, city: &City, reach: Reach) -> Validation {
        let mut violations = Vec::new();
        for (direction, kind) in [
            (Direction::Longitude, ViolationKind::RowOrder),
            (Direction::Latitude, ViolationKind::ColumnOrder),
        ] {
            let candidate = direction.coordinate(city);
            let sides = self.sides(grid, cell, direction);
            for placed in Self::reached(sides.low, reach) {
                if !self
                    .rules
                    .in_order(direction, direction.coordinate(placed.city()), candidate)
                {
                    violations.push(Violation::new(kind, placed.clone()));
                }
            }
            for placed in Self::reached(sides.high, reach) {
                if !self
                    .rules
                    .in_order(direction, candidate, direction.coordinate(placed.city()))
                {
                    violations.push(Violation::new(kind, placed.clone()));
                }
            }
        }
        if self.rules.alignment {
            for placed in grid.neighbors_in_row(cell) {
                if !self.rules.aligned(placed.city().latitude(), city.latitude()) {
                    violations.push(Violation::new(ViolationKind::RowAlignment, placed.clone()));
                }
            }
            for placed in grid.neighbors_in_column(cell) {
                if !self.rules.aligned(placed.city().longitude(), city.longitude()) {
                    violations.push(Violation::new(
                        ViolationKind::ColumnAlignment,
                        placed.clone(),
                    ));
                }
            }
        }
        Validation::from_violations(violations)
    }

    fn reached<'g>(groups: Vec<Vec<&'g Placement>>, reach: Reach) -> Vec<&'g Placement> {
        match reach {
            Reach::Nearest => groups.into_iter().find(|g| !g.is_empty()).unwrap_or_default(),
            Reach::All => groups.into_iter().flatten().collect(),
        }
    }

    fn sides<'g>(&self, grid: &'g Grid, cell: Cell, direction: Direction) -> Sides<'g> {
        match (self.rules.scope, direction) {
            (Scope::Lines, Direction::Longitude) => {
                let (low, high): (Vec<_>, Vec<_>) = grid
                    .neighbors_in_row(cell)
                    .into_iter()
                    .partition(|p| p.cell().column < cell.column);
                Sides {
                    low: low.into_iter().rev().map(|p| vec![p]).collect(),
                    high: high.into_iter().map(|p| vec![p]).collect(),
                }
            }
            (Scope::Lines, Direction::Latitude) => {
                let (low, high): (Vec<_>, Vec<_>) = grid
                    .neighbors_in_column(cell)
                    .into_iter()
                    .partition(|p| p.cell().row < cell.row);
                Sides {
                    low: low.into_iter().rev().map(|p| vec![p]).collect(),
                    high: high.into_iter().map(|p| vec![p]).collect(),
                }
            }
            (Scope::Bands, Direction::Longitude) => Sides {
                low: (0..cell.column)
                    .rev()
                    .map(|c| grid.column(c).collect())
                    .collect(),
                high: (cell.column + 1..grid.columns())
                    .map(|c| grid.column(c).collect())
                    .collect(),
            },
            (Scope::Bands, Direction::Latitude) => Sides {
                low: (0..cell.row).rev().map(|r| grid.row(r).collect()).collect(),
                high: (cell.row + 1..grid.rows())
                    .map(|r| grid.row(r).collect())
                    .collect(),
            },
        }
    }
}
