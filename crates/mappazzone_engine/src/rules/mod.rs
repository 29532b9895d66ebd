//! Ordering rules a placement is judged by.
//!
//! The rules are plain data: which way the axes run, how ties are treated,
//! how much slack is tolerated and which placements a candidate is compared with.
//! The validator and the invariant checks both read them from here so that
//! incremental and full checks always agree on what "in order" means.

pub mod orientation;

pub use orientation::{AxisOrientation, ColumnOrder, Direction, RowOrder};

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Treatment of equal coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieRule {
    /// Equal coordinates satisfy the order.
    #[default]
    NonStrict,
    /// Equal coordinates break the order (when no tolerance applies).
    Strict,
}

/// Which already placed cities a candidate is compared with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    /// Only cities sharing the candidate's row (on longitude) or column (on latitude).
    Lines,
    /// Rows and columns are geographic bands: every city in a column to the
    /// west is compared on longitude, every city in a row to the north on latitude.
    #[default]
    Bands,
}

/// Complete set of ordering rules for one session.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleSet {
    /// Axis orientation.
    pub orientation: AxisOrientation,
    /// Tie handling.
    pub ties: TieRule,
    /// Degrees by which an order may be broken and still accepted.
    pub tolerance: f64,
    /// Comparison scope.
    pub scope: Scope,
    /// Require cities sharing a row (column) to agree on latitude (longitude)
    /// within the tolerance.
    pub alignment: bool,
}

impl RuleSet {
    /// Checks that the tolerance is a finite, non-negative number of degrees.
    #[instrument]
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(ConfigError::new(format!(
                "Tolerance must be a non-negative number of degrees, got {}",
                self.tolerance
            )));
        }
        Ok(())
    }

    /// Whether a city at `earlier` (lower index along the axis) may precede one at `later`.
    pub fn in_order(&self, direction: Direction, earlier: f64, later: f64) -> bool {
        let overshoot = self.orientation.inversion(direction, earlier, later);
        match self.ties {
            TieRule::NonStrict => overshoot <= self.tolerance,
            TieRule::Strict => overshoot < self.tolerance,
        }
    }

    /// Whether two cities in the same band agree on the band's coordinate.
    pub fn aligned(&self, a: f64, b: f64) -> bool {
        (a - b).abs() <= self.tolerance
    }

    /// Whether the order is transitive, so only the nearest neighbors need checking.
    ///
    /// With a positive tolerance, `a ≤ b + t` and `b ≤ c + t` only give `a ≤ c + 2t`.
    pub fn is_transitive(&self) -> bool {
        self.tolerance == 0.0
    }
}
