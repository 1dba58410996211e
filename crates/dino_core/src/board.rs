//! Square grid backing a battle.
//!
//! The board only knows which entity id sits in which cell. Keeping it in
//! step with the entity registry is the job of [`Battle`](crate::battle::Battle).
//!
//! # Coordinates
//!
//! Cells are addressed with zero-based `(row, col)` indices. Callers speak in
//! one-based [`Position`]s; [`Board::cell_at`] is the only place where one is
//! turned into the other.

use serde::{Deserialize, Serialize};

use crate::entity::{EntityId, Position};
use crate::error::{BattleError, Result};

/// Largest accepted side length.
pub const MAX_BOARD_SIZE: usize = 1000;

/// Zero-based cell index on a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Cell {
    /// Row index, 0 at the northern edge.
    pub row: usize,
    /// Column index, 0 at the western edge.
    pub col: usize,
}

impl Cell {
    /// Create a cell index.
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// One-based position of this cell.
    #[must_use]
    pub fn position(self) -> Position {
        Position::new(self.row as i64 + 1, self.col as i64 + 1)
    }
}

/// Square grid of optional entity ids, stored row-major.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    size: usize,
    state: Vec<Option<EntityId>>,
}

impl Board {
    /// Create an empty `size` x `size` board.
    ///
    /// # Errors
    ///
    /// Returns [`BattleError::InvalidSize`] unless `1 <= size <= MAX_BOARD_SIZE`.
    pub fn new(size: i64) -> Result<Self> {
        let side = usize::try_from(size)
            .ok()
            .filter(|side| (1..=MAX_BOARD_SIZE).contains(side))
            .ok_or(BattleError::InvalidSize(size))?;
        Ok(Self {
            size: side,
            state: vec![None; side * side],
        })
    }

    /// Side length.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Whether zero-based `(row, col)` lies on the board.
    #[must_use]
    pub fn is_in_range(&self, row: i64, col: i64) -> bool {
        let size = self.size as i64;
        (0..size).contains(&row) && (0..size).contains(&col)
    }

    /// Zero-based cell for `(row, col)`, if it lies on the board.
    #[must_use]
    pub fn cell(&self, row: i64, col: i64) -> Option<Cell> {
        if self.is_in_range(row, col) {
            Some(Cell::new(row as usize, col as usize))
        } else {
            None
        }
    }

    /// Resolve a one-based position to a cell.
    ///
    /// # Errors
    ///
    /// Returns [`BattleError::OutOfRange`] if the position is off the board.
    pub fn cell_at(&self, position: Position) -> Result<Cell> {
        position
            .row
            .checked_sub(1)
            .zip(position.col.checked_sub(1))
            .and_then(|(row, col)| self.cell(row, col))
            .ok_or(BattleError::OutOfRange {
                position,
                board_size: self.size,
            })
    }

    /// Whether `cell` holds an entity.
    #[must_use]
    pub fn is_occupied(&self, cell: Cell) -> bool {
        self.occupant(cell).is_some()
    }

    /// Entity id held by `cell`.
    #[must_use]
    pub fn occupant(&self, cell: Cell) -> Option<EntityId> {
        self.index(cell).and_then(|i| self.state[i])
    }

    /// Put `id` into `cell`. Range and occupancy must already be checked.
    pub fn place(&mut self, cell: Cell, id: EntityId) {
        if let Some(i) = self.index(cell) {
            self.state[i] = Some(id);
        }
    }

    /// Empty `cell`, returning what it held.
    pub fn clear(&mut self, cell: Cell) -> Option<EntityId> {
        self.index(cell).and_then(|i| self.state[i].take())
    }

    /// All occupied cells with their occupants, row by row.
    pub fn occupied_cells(&self) -> impl Iterator<Item = (Cell, EntityId)> + '_ {
        let size = self.size;
        self.state
            .iter()
            .enumerate()
            .filter_map(move |(i, slot)| slot.map(|id| (Cell::new(i / size, i % size), id)))
    }

    /// The up to eight cells at Chebyshev distance 1 from `cell`.
    #[must_use]
    pub fn neighbors(&self, cell: Cell) -> Vec<Cell> {
        let (row, col) = (cell.row as i64, cell.col as i64);
        let mut cells = Vec::with_capacity(8);
        for d_row in -1..=1 {
            for d_col in -1..=1 {
                if d_row == 0 && d_col == 0 {
                    continue;
                }
                if let Some(neighbor) = self.cell(row + d_row, col + d_col) {
                    cells.push(neighbor);
                }
            }
        }
        cells
    }

    /// Rows of the grid, northern row first.
    pub fn rows(&self) -> impl Iterator<Item = &[Option<EntityId>]> {
        self.state.chunks(self.size)
    }

    /// Whether the stored grid has `size * size` cells.
    #[must_use]
    pub(crate) fn is_well_formed(&self) -> bool {
        self.size > 0
            && self.size <= MAX_BOARD_SIZE
            && self.size.checked_mul(self.size) == Some(self.state.len())
    }

    fn index(&self, cell: Cell) -> Option<usize> {
        (cell.row < self.size && cell.col < self.size).then(|| cell.row * self.size + cell.col)
    }
}
