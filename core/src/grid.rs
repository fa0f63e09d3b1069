//! Dense terrain grid shared by generation, pathfinding, and agents.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{CellCoord, NEIGHBOR_OFFSETS};

/// Terrain held by a single cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellState {
    /// Traversable floor. Every cell starts out empty.
    #[default]
    Empty,
    /// Impassable rock.
    Wall,
}

/// Errors raised by grid accessors.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum GridError {
    /// The queried cell lies outside the grid.
    #[error("cell {cell} lies outside the {rows}x{columns} grid")]
    OutOfBounds {
        /// Offending coordinate.
        cell: CellCoord,
        /// Number of rows in the grid.
        rows: u32,
        /// Number of columns in the grid.
        columns: u32,
    },
}

/// Fixed-size terrain grid stored in row-major order.
///
/// Dimensions never change after construction. Generation is the only phase
/// that needs `&mut GridMap`; once the world takes ownership the grid is only
/// handed out by shared reference.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GridMap {
    rows: u32,
    columns: u32,
    cells: Vec<CellState>,
}

impl GridMap {
    /// Creates a grid of the provided dimensions with every cell empty.
    #[must_use]
    pub fn new(rows: u32, columns: u32) -> Self {
        let capacity_u64 = u64::from(rows) * u64::from(columns);
        let capacity = usize::try_from(capacity_u64).unwrap_or(0);
        Self {
            rows,
            columns,
            cells: vec![CellState::Empty; capacity],
        }
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Reports whether both coordinates fall within the grid dimensions.
    #[must_use]
    pub fn in_bounds(&self, cell: CellCoord) -> bool {
        self.index(cell).is_some()
    }

    /// Terrain stored in the provided cell.
    pub fn get(&self, cell: CellCoord) -> Result<CellState, GridError> {
        self.index(cell)
            .and_then(|index| self.cells.get(index).copied())
            .ok_or(self.out_of_bounds(cell))
    }

    /// Overwrites the terrain of a single cell.
    pub fn set(&mut self, cell: CellCoord, state: CellState) -> Result<(), GridError> {
        let error = self.out_of_bounds(cell);
        let slot = self
            .index(cell)
            .and_then(|index| self.cells.get_mut(index))
            .ok_or(error)?;
        *slot = state;
        Ok(())
    }

    /// Reports whether the cell is inside the grid and not a wall.
    #[must_use]
    pub fn is_walkable(&self, cell: CellCoord) -> bool {
        matches!(self.get(cell), Ok(CellState::Empty))
    }

    /// Reports whether the cell is inside the grid and holds a wall.
    #[must_use]
    pub fn is_wall(&self, cell: CellCoord) -> bool {
        matches!(self.get(cell), Ok(CellState::Wall))
    }

    /// In-bounds cells surrounding `cell`, in [`NEIGHBOR_OFFSETS`] order.
    #[must_use]
    pub fn neighbors8(&self, cell: CellCoord) -> Neighbors {
        let mut neighbors = Neighbors::default();
        for (row, column) in NEIGHBOR_OFFSETS {
            let candidate = cell.offset(row, column);
            if self.in_bounds(candidate) {
                neighbors.push(candidate);
            }
        }
        neighbors
    }

    /// Dense cell states stored in row-major order.
    #[must_use]
    pub fn cells(&self) -> &[CellState] {
        &self.cells
    }

    /// Number of cells holding the provided state.
    #[must_use]
    pub fn count(&self, state: CellState) -> usize {
        self.cells.iter().filter(|cell| **cell == state).count()
    }

    /// Iterator over every coordinate of the grid in row-major order.
    pub fn coords(&self) -> impl Iterator<Item = CellCoord> {
        let rows = i32::try_from(self.rows).unwrap_or(i32::MAX);
        let columns = i32::try_from(self.columns).unwrap_or(i32::MAX);
        (0..rows).flat_map(move |row| (0..columns).map(move |column| CellCoord::new(row, column)))
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        let row = u32::try_from(cell.row()).ok()?;
        let column = u32::try_from(cell.column()).ok()?;
        if row >= self.rows || column >= self.columns {
            return None;
        }

        let row = usize::try_from(row).ok()?;
        let column = usize::try_from(column).ok()?;
        let width = usize::try_from(self.columns).ok()?;
        let index = row.checked_mul(width)?.checked_add(column)?;
        // Dimensions too large to allocate leave `cells` shorter than `rows * columns`.
        (index < self.cells.len()).then_some(index)
    }

    fn out_of_bounds(&self, cell: CellCoord) -> GridError {
        GridError::OutOfBounds {
            cell,
            rows: self.rows,
            columns: self.columns,
        }
    }
}

/// Fixed-capacity iterator over the neighbours of a cell.
#[derive(Clone, Debug, Default)]
pub struct Neighbors {
    buffer: [Option<CellCoord>; 8],
    len: usize,
    cursor: usize,
}

impl Neighbors {
    fn push(&mut self, cell: CellCoord) {
        if self.len < self.buffer.len() {
            self.buffer[self.len] = Some(cell);
            self.len += 1;
        }
    }
}

impl Iterator for Neighbors {
    type Item = CellCoord;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor >= self.len {
            return None;
        }

        let value = self.buffer[self.cursor];
        self.cursor += 1;
        value
    }
}
