//! The shared board: a fixed rows × columns grid of placed cities.
//!
//! The grid only stores and retrieves. Whether a placement is legal is decided by
//! [`crate::PlacementValidator`] before [`Grid::place`] is called.

use crate::error::{GameError, GameResult};
use crate::geo::City;
use crate::session::PlayerId;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// A cell of the grid. Row 0 is the top edge, column 0 the left edge.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, derive_new::new,
)]
pub struct Cell {
    /// Row index.
    pub row: usize,
    /// Column index.
    pub column: usize,
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

/// A city committed to a cell. Never mutated once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    city: City,
    cell: Cell,
    owner: PlayerId,
    sequence: usize,
}

impl Placement {
    /// The placed city.
    pub fn city(&self) -> &City {
        &self.city
    }

    /// Where the city sits.
    pub fn cell(&self) -> Cell {
        self.cell
    }

    /// The player who placed it.
    pub fn owner(&self) -> &PlayerId {
        &self.owner
    }

    /// Zero-based commit order within the grid.
    pub fn sequence(&self) -> usize {
        self.sequence
    }
}

/// Fixed-size grid holding at most one placement per cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    rows: usize,
    columns: usize,
    /// Cells in row-major order.
    cells: Vec<Option<Placement>>,
    placed: usize,
}

impl Grid {
    /// Creates an empty grid.
    #[instrument]
    pub fn new(rows: usize, columns: usize) -> GameResult<Self> {
        let capacity = match rows.checked_mul(columns) {
            Some(capacity) if capacity > 0 => capacity,
            _ => return Err(GameError::InvalidDimensions { rows, columns }),
        };
        Ok(Self {
            rows,
            columns,
            cells: vec![None; capacity],
            placed: 0,
        })
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Total number of cells.
    pub fn capacity(&self) -> usize {
        self.cells.len()
    }

    /// Number of occupied cells.
    pub fn placed(&self) -> usize {
        self.placed
    }

    /// Number of empty cells.
    pub fn free(&self) -> usize {
        self.capacity() - self.placed
    }

    /// Whether every cell is occupied.
    pub fn is_full(&self) -> bool {
        self.placed == self.capacity()
    }

    /// The middle cell, rounding towards the top-left on even sides.
    pub fn center(&self) -> Cell {
        Cell::new(self.rows / 2, self.columns / 2)
    }

    /// Whether `cell` lies inside the grid.
    pub fn contains(&self, cell: Cell) -> bool {
        cell.row < self.rows && cell.column < self.columns
    }

    /// Fails with [`GameError::OutOfBounds`] when `cell` lies outside the grid.
    pub fn check_bounds(&self, cell: Cell) -> GameResult<()> {
        if self.contains(cell) {
            Ok(())
        } else {
            Err(GameError::OutOfBounds {
                cell,
                rows: self.rows,
                columns: self.columns,
            })
        }
    }

    fn index(&self, cell: Cell) -> usize {
        cell.row * self.columns + cell.column
    }

    /// The placement at `cell`, if any. Out-of-bounds cells are empty.
    pub fn get(&self, cell: Cell) -> Option<&Placement> {
        if !self.contains(cell) {
            return None;
        }
        self.cells[self.index(cell)].as_ref()
    }

    /// Whether `cell` is inside the grid and empty.
    pub fn is_free(&self, cell: Cell) -> bool {
        self.contains(cell) && self.get(cell).is_none()
    }

    /// Stores `city` at `cell` without any ordering check.
    #[instrument(skip(self, city), fields(city = %city.name()))]
    pub fn place(&mut self, cell: Cell, city: City, owner: PlayerId) -> GameResult<&Placement> {
        self.check_bounds(cell)?;
        let idx = self.index(cell);
        if self.cells[idx].is_some() {
            return Err(GameError::CellOccupied(cell));
        }
        let placement = Placement {
            city,
            cell,
            owner,
            sequence: self.placed,
        };
        self.placed += 1;
        debug!(sequence = placement.sequence, "Placement stored");
        let stored: &Placement = self.cells[idx].insert(placement);
        Ok(stored)
    }

    /// Placements in `row`, ordered by column.
    pub fn row(&self, row: usize) -> impl DoubleEndedIterator<Item = &Placement> + '_ {
        let start = row.min(self.rows) * self.columns;
        let end = if row < self.rows { start + self.columns } else { start };
        self.cells[start..end].iter().flatten()
    }

    /// Placements in `column`, ordered by row.
    pub fn column(&self, column: usize) -> impl DoubleEndedIterator<Item = &Placement> + '_ {
        let rows = if column < self.columns { self.rows } else { 0 };
        (0..rows).filter_map(move |row| self.cells[row * self.columns + column].as_ref())
    }

    /// Placements sharing `cell.row`, ordered by column, excluding `cell` itself.
    pub fn neighbors_in_row(&self, cell: Cell) -> Vec<&Placement> {
        self.row(cell.row).filter(|p| p.cell != cell).collect()
    }

    /// Placements sharing `cell.column`, ordered by row, excluding `cell` itself.
    pub fn neighbors_in_column(&self, cell: Cell) -> Vec<&Placement> {
        self.column(cell.column).filter(|p| p.cell != cell).collect()
    }

    /// All placements in row-major order.
    pub fn placements(&self) -> impl Iterator<Item = &Placement> {
        self.cells.iter().flatten()
    }

    /// All placements in the order they were committed.
    pub fn in_commit_order(&self) -> Vec<&Placement> {
        let mut placements: Vec<&Placement> = self.placements().collect();
        placements.sort_by_key(|p| p.sequence);
        placements
    }

    /// Every empty cell in row-major order.
    pub fn free_cells(&self) -> Vec<Cell> {
        (0..self.rows)
            .flat_map(|row| (0..self.columns).map(move |column| Cell::new(row, column)))
            .filter(|&cell| self.get(cell).is_none())
            .collect()
    }

    /// Removes every placement.
    #[instrument(skip(self))]
    pub fn clear(&mut self) {
        self.cells.iter_mut().for_each(|cell| *cell = None);
        self.placed = 0;
    }
}

impl std::fmt::Display for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        const WIDTH: usize = 12;
        for row in 0..self.rows {
            let line: Vec<String> = (0..self.columns)
                .map(|column| match self.get(Cell::new(row, column)) {
                    Some(p) => {
                        let name: String = p.city.name().chars().take(WIDTH).collect();
                        format!("{name:<WIDTH$}")
                    }
                    None => format!("{:<WIDTH$}", "."),
                })
                .collect();
            writeln!(f, "{}", line.join(" | ").trim_end())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owner() -> PlayerId {
        PlayerId::from("p1")
    }

    #[test]
    fn test_zero_dimensions_rejected() {
        assert_eq!(
            Grid::new(0, 3),
            Err(GameError::InvalidDimensions { rows: 0, columns: 3 })
        );
        assert_eq!(
            Grid::new(usize::MAX, 2),
            Err(GameError::InvalidDimensions {
                rows: usize::MAX,
                columns: 2
            })
        );
    }

    #[test]
    fn test_place_and_get() {
        let mut grid = Grid::new(3, 3).unwrap();
        let placed = grid
            .place(Cell::new(1, 2), City::new("Rome", 41.9, 12.5), owner())
            .unwrap();
        assert_eq!(placed.sequence(), 0);
        assert_eq!(grid.get(Cell::new(1, 2)).unwrap().city().name(), "Rome");
        assert_eq!(grid.placed(), 1);
        assert_eq!(grid.free(), 8);
    }

    #[test]
    fn test_occupied_cell_rejected_every_time() {
        let mut grid = Grid::new(2, 2).unwrap();
        let cell = Cell::new(0, 0);
        grid.place(cell, City::new("A", 0.0, 0.0), owner()).unwrap();
        for name in ["B", "C", "D"] {
            assert_eq!(
                grid.place(cell, City::new(name, 1.0, 1.0), owner()),
                Err(GameError::CellOccupied(cell))
            );
        }
        assert_eq!(grid.placed(), 1);
    }

    #[test]
    fn test_out_of_bounds_rejected() {
        let mut grid = Grid::new(2, 2).unwrap();
        let result = grid.place(Cell::new(2, 0), City::new("A", 0.0, 0.0), owner());
        assert!(matches!(result, Err(GameError::OutOfBounds { .. })));
        assert!(grid.get(Cell::new(5, 5)).is_none());
    }

    #[test]
    fn test_neighbors_ordered_and_exclude_self() {
        let mut grid = Grid::new(3, 3).unwrap();
        grid.place(Cell::new(1, 2), City::new("E", 0.0, 20.0), owner()).unwrap();
        grid.place(Cell::new(1, 0), City::new("W", 0.0, -20.0), owner()).unwrap();
        grid.place(Cell::new(1, 1), City::new("C", 0.0, 0.0), owner()).unwrap();
        grid.place(Cell::new(0, 1), City::new("N", 20.0, 0.0), owner()).unwrap();

        let row: Vec<_> = grid
            .neighbors_in_row(Cell::new(1, 1))
            .iter()
            .map(|p| p.city().name().to_string())
            .collect();
        assert_eq!(row, vec!["W", "E"]);

        let column: Vec<_> = grid
            .neighbors_in_column(Cell::new(2, 1))
            .iter()
            .map(|p| p.city().name().to_string())
            .collect();
        assert_eq!(column, vec!["N", "C"]);
    }

    #[test]
    fn test_is_full_and_clear() {
        let mut grid = Grid::new(1, 2).unwrap();
        grid.place(Cell::new(0, 0), City::new("A", 0.0, 0.0), owner()).unwrap();
        assert!(!grid.is_full());
        grid.place(Cell::new(0, 1), City::new("B", 0.0, 1.0), owner()).unwrap();
        assert!(grid.is_full());
        assert!(grid.free_cells().is_empty());
        grid.clear();
        assert_eq!(grid.placed(), 0);
        assert_eq!(grid.free_cells().len(), 2);
    }

    #[test]
    fn test_commit_order() {
        let mut grid = Grid::new(2, 2).unwrap();
        grid.place(Cell::new(1, 1), City::new("First", 0.0, 0.0), owner()).unwrap();
        grid.place(Cell::new(0, 0), City::new("Second", 1.0, 1.0), owner()).unwrap();
        let order: Vec<_> = grid
            .in_commit_order()
            .iter()
            .map(|p| p.city().name().to_string())
            .collect();
        assert_eq!(order, vec!["First", "Second"]);
    }

    #[test]
    fn test_display_marks_empty_cells() {
        let mut grid = Grid::new(2, 2).unwrap();
        grid.place(Cell::new(0, 1), City::new("Oslo", 59.9, 10.7), owner()).unwrap();
        let text = grid.to_string();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with('.'));
        assert!(lines[0].ends_with("Oslo"));
    }

    #[test]
    fn test_center() {
        assert_eq!(Grid::new(3, 5).unwrap().center(), Cell::new(1, 2));
    }
}
