//! How grid index directions map onto geographic directions.

use serde::{Deserialize, Serialize};

/// A geographic coordinate axis.
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
#[strum(serialize_all = "lowercase")]
pub enum Direction {
    /// East-west position, read along a row (across columns).
    Longitude,
    /// North-south position, read along a column (across rows).
    Latitude,
}

impl Direction {
    /// The coordinate of `city` along this axis.
    pub fn coordinate(self, city: &crate::City) -> f64 {
        match self {
            Direction::Longitude => city.longitude(),
            Direction::Latitude => city.latitude(),
        }
    }
}

/// Geographic direction of increasing column index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnOrder {
    /// Column 0 is the westernmost band.
    #[default]
    WestToEast,
    /// Column 0 is the easternmost band.
    EastToWest,
}

/// Geographic direction of increasing row index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowOrder {
    /// Row 0 is the northernmost band.
    #[default]
    NorthToSouth,
    /// Row 0 is the southernmost band.
    SouthToNorth,
}

/// Orientation of both grid axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AxisOrientation {
    /// Direction of increasing column index.
    #[serde(default)]
    pub columns: ColumnOrder,
    /// Direction of increasing row index.
    #[serde(default)]
    pub rows: RowOrder,
}

impl AxisOrientation {
    /// How far `earlier` overshoots `later` against the expected order.
    ///
    /// `earlier` belongs to the lower index along the axis. A non-positive result
    /// means the pair is in order.
    pub fn inversion(self, direction: Direction, earlier: f64, later: f64) -> f64 {
        let ascending = match direction {
            Direction::Longitude => self.columns == ColumnOrder::WestToEast,
            Direction::Latitude => self.rows == RowOrder::SouthToNorth,
        };
        if ascending { earlier - later } else { later - earlier }
    }
}
