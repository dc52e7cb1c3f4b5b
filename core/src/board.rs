use ndarray::{Array2, ArrayView1};
use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

use crate::*;

/// One of the two lockstep grids: the player-visible layout or the hidden
/// ground truth. Column 0 holds the row labels and is never playable.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    cells: Array2<Cell>,
}

impl Board {
    /// Builds the visible and hidden boards for a fresh game: both size×size,
    /// row labels in column 0, every playable cell unrevealed.
    pub fn labeled_pair(size: Coord) -> (Board, Board) {
        let board = Self::labeled(size);
        (board.clone(), board)
    }

    fn labeled(size: Coord) -> Board {
        let mut cells: Array2<Cell> = Array2::default((size as usize, size as usize));
        for row in 0..size {
            cells[[row as usize, 0]] = Cell::Label((b'A' + row) as char);
        }
        Board { cells }
    }

    pub fn size(&self) -> Coord {
        self.cells.dim().0.try_into().unwrap()
    }

    /// Cells outside the label column.
    pub fn playable_cells(&self) -> CellCount {
        let size = self.size();
        mult(size, size - 1)
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let size = self.size();
        if coords.0 < size && (FIRST_PLAYABLE_COL..size).contains(&coords.1) {
            Ok(coords)
        } else {
            Err(GameError::OutOfBounds)
        }
    }

    pub fn cell_at(&self, coords: Coord2) -> Cell {
        self[coords]
    }

    /// Number of cells currently showing a revealed state.
    pub fn revealed_cells(&self) -> CellCount {
        self.count_cells(Cell::is_revealed)
    }

    pub fn flagged_cells(&self) -> CellCount {
        self.count_cells(|cell| cell == Cell::Flagged)
    }

    pub fn mine_cells(&self) -> CellCount {
        self.count_cells(|cell| cell == Cell::Mine)
    }

    fn count_cells(&self, predicate: impl Fn(Cell) -> bool) -> CellCount {
        self.cells
            .iter()
            .filter(|&&cell| predicate(cell))
            .count()
            .try_into()
            .unwrap()
    }

    /// Mines in the 8-neighborhood, clipped to the board edges and to the
    /// playable column range.
    pub fn adjacent_mines(&self, coords: Coord2) -> u8 {
        self.cells
            .iter_neighbors(coords)
            .filter(|&pos| self[pos] == Cell::Mine)
            .count()
            .try_into()
            .unwrap()
    }

    pub(crate) fn iter_neighbors(&self, coords: Coord2) -> NeighborIter {
        self.cells.iter_neighbors(coords)
    }

    /// Iterates full rows (label cell included) for rendering.
    pub fn rows(&self) -> impl Iterator<Item = ArrayView1<'_, Cell>> {
        self.cells.outer_iter()
    }

    /// Iterates the playable coordinates in row-major order.
    pub fn playable_coords(&self) -> impl Iterator<Item = Coord2> + use<> {
        let size = self.size();
        (0..size).flat_map(move |row| (FIRST_PLAYABLE_COL..size).map(move |col| (row, col)))
    }
}

impl Index<Coord2> for Board {
    type Output = Cell;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.cells[coords.to_nd_index()]
    }
}

impl IndexMut<Coord2> for Board {
    fn index_mut(&mut self, coords: Coord2) -> &mut Self::Output {
        &mut self.cells[coords.to_nd_index()]
    }
}
