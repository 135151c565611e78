use std::fmt;

use serde::{Deserialize, Serialize};

/// Largest value a `u32` tile can hold. Two of these never merge.
pub const MAX_TILE: u32 = 1 << 31;

/// A single board square. `None` is an empty square, otherwise the tile value (2, 4, 8, ...).
pub type Cell = Option<u32>;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    #[error("board has no rows")]
    Empty,
    #[error("row {row} has {len} cells, expected {size}")]
    Ragged { row: usize, len: usize, size: usize },
    #[error("tile {value} at ({row}, {col}) is not a power of two of at least 2")]
    InvalidTile { row: usize, col: usize, value: u32 },
}

/// Square grid of cells stored in row-major order.
///
/// Every transformation in this crate returns a new board. The only in-place mutation is
/// [`Board::set`], which tile spawning uses on a freshly produced board.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<Cell>>", into = "Vec<Vec<Cell>>")]
pub struct Board {
    size: usize,
    cells: Vec<Cell>,
}

impl Board {
    pub fn empty(size: usize) -> Self {
        assert!(size > 0, "board size must be positive");

        Self {
            size,
            cells: vec![None; size * size],
        }
    }

    /// Builds a board cell by cell from `f(row, col)`.
    pub fn from_fn(size: usize, mut f: impl FnMut(usize, usize) -> Cell) -> Self {
        assert!(size > 0, "board size must be positive");

        let cells = (0..size * size).map(|i| f(i / size, i % size)).collect();

        Self { size, cells }
    }

    /// Builds a board from tile values, with `0` meaning empty.
    pub fn from_rows<const N: usize>(rows: [[u32; N]; N]) -> Self {
        Self::from_fn(N, |row, col| Some(rows[row][col]).filter(|&value| value != 0))
    }

    pub const fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, row: usize, col: usize) -> Cell {
        self.cells[self.index(row, col)]
    }

    pub fn set(&mut self, row: usize, col: usize, cell: Cell) {
        let index = self.index(row, col);
        self.cells[index] = cell;
    }

    /// Copy of this board with `value` placed at `(row, col)`.
    pub fn with_tile(&self, row: usize, col: usize, value: u32) -> Self {
        let mut board = self.clone();
        board.set(row, col, Some(value));
        board
    }

    pub fn row(&self, row: usize) -> &[Cell] {
        &self.cells[row * self.size..(row + 1) * self.size]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> + '_ {
        self.cells.chunks_exact(self.size)
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Replaces every row with `f(row)`. Each returned row must keep the board width.
    pub fn map_rows(&self, mut f: impl FnMut(&[Cell]) -> Vec<Cell>) -> Self {
        let cells: Vec<Cell> = self
            .rows()
            .flat_map(|row| {
                let new_row = f(row);
                assert_eq!(new_row.len(), self.size, "row length changed");
                new_row
            })
            .collect();

        Self {
            size: self.size,
            cells,
        }
    }

    pub fn max_tile(&self) -> u32 {
        self.cells.iter().flatten().copied().max().unwrap_or(0)
    }

    pub fn to_rows(&self) -> Vec<Vec<Cell>> {
        self.rows().map(<[Cell]>::to_vec).collect()
    }

    fn index(&self, row: usize, col: usize) -> usize {
        assert!(
            row < self.size && col < self.size,
            "({row}, {col}) is outside a {0}x{0} board",
            self.size
        );

        row * self.size + col
    }
}

impl TryFrom<Vec<Vec<Cell>>> for Board {
    type Error = BoardError;

    fn try_from(rows: Vec<Vec<Cell>>) -> Result<Self, Self::Error> {
        let size = rows.len();

        if size == 0 {
            return Err(BoardError::Empty);
        }

        let mut cells = Vec::with_capacity(size * size);

        for (row, values) in rows.into_iter().enumerate() {
            if values.len() != size {
                return Err(BoardError::Ragged {
                    row,
                    len: values.len(),
                    size,
                });
            }

            for (col, cell) in values.into_iter().enumerate() {
                if let Some(value) = cell.filter(|&value| value < 2 || !value.is_power_of_two()) {
                    return Err(BoardError::InvalidTile { row, col, value });
                }

                cells.push(cell);
            }
        }

        Ok(Self { size, cells })
    }
}

impl From<Board> for Vec<Vec<Cell>> {
    fn from(board: Board) -> Self {
        board.to_rows()
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Board {{ size: {} }}", self.size)?;

        for row in self.rows() {
            for cell in row {
                match cell {
                    Some(value) => write!(f, "{value:6}")?,
                    None => write!(f, "     .")?,
                }
            }
            writeln!(f)?;
        }

        Ok(())
    }
}
