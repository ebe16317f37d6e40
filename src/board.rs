//! Board data model.
//!
//! A [`Board`] is an N×N grid (N ∈ {4, 6, 9}) of symbols `1..=N`, with `0`
//! marking a blank cell, plus a "given" mask computed once at construction
//! from the non-zero cells of the puzzle. Given cells are read-only for the
//! lifetime of the board.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{SudokuError, SudokuResult};
use crate::fitness;

/// Board sizes the engine understands.
pub const SUPPORTED_SIZES: [usize; 3] = [4, 6, 9];

/// Shape of one subgrid block, in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockShape {
    /// Block height.
    pub rows: usize,
    /// Block width.
    pub cols: usize,
}

impl BlockShape {
    /// Block shape for a supported board size.
    ///
    /// ```
    /// use sudoku_ga::BlockShape;
    ///
    /// assert_eq!(BlockShape::for_size(6), Some(BlockShape { rows: 2, cols: 3 }));
    /// assert_eq!(BlockShape::for_size(5), None);
    /// ```
    pub fn for_size(size: usize) -> Option<Self> {
        match size {
            4 => Some(Self { rows: 2, cols: 2 }),
            6 => Some(Self { rows: 2, cols: 3 }),
            9 => Some(Self { rows: 3, cols: 3 }),
            _ => None,
        }
    }

    /// Number of blocks side by side in one band of rows.
    pub fn blocks_across(&self, size: usize) -> usize {
        size / self.cols
    }

    /// Number of bands stacked vertically.
    pub fn blocks_down(&self, size: usize) -> usize {
        size / self.rows
    }

    /// Total number of blocks on a board of `size`.
    pub fn block_count(&self, size: usize) -> usize {
        self.blocks_across(size) * self.blocks_down(size)
    }

    /// Top-left cell of block `index`, numbering blocks row-major.
    pub fn block_origin(&self, index: usize, size: usize) -> (usize, usize) {
        let across = self.blocks_across(size);
        ((index / across) * self.rows, (index % across) * self.cols)
    }
}

/// A Sudoku board with an immutable given mask.
///
/// Cloning is a deep copy and keeps the mask of the original puzzle.
/// Serialization writes both the values and the mask; a missing `given`
/// field on input derives the mask from the non-zero cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BoardRepr", into = "BoardRepr")]
pub struct Board {
    size: usize,
    shape: BlockShape,
    cells: Vec<u8>,
    given: Vec<bool>,
}

impl Board {
    /// Builds a board from rows of symbols, `0` for blanks.
    ///
    /// Every non-zero cell becomes a given.
    ///
    /// # Errors
    ///
    /// [`SudokuError::InvalidShape`] if the grid is empty, not square, or its
    /// size is not in [`SUPPORTED_SIZES`]; [`SudokuError::InvalidValue`] if a
    /// cell exceeds the board size.
    pub fn from_rows<R: AsRef<[u8]>>(rows: &[R]) -> SudokuResult<Self> {
        let size = rows.len();
        if size == 0 {
            return Err(SudokuError::InvalidShape("grid is empty".into()));
        }
        let mut cells = Vec::with_capacity(size * size);
        for (r, row) in rows.iter().enumerate() {
            let row: &[u8] = row.as_ref();
            if row.len() != size {
                return Err(SudokuError::InvalidShape(format!(
                    "row {} has {} cells, expected {}",
                    r,
                    row.len(),
                    size
                )));
            }
            cells.extend_from_slice(row);
        }
        let shape = BlockShape::for_size(size)
            .ok_or_else(|| SudokuError::InvalidShape(format!("unsupported size {size}")))?;

        if let Some(&bad) = cells.iter().find(|&&v| v as usize > size) {
            return Err(SudokuError::InvalidValue {
                value: bad as u32,
                size,
            });
        }
        let given = cells.iter().map(|&v| v != 0).collect();

        Ok(Self {
            size,
            shape,
            cells,
            given,
        })
    }

    /// An all-blank board.
    pub fn empty(size: usize) -> SudokuResult<Self> {
        Self::from_rows(&vec![vec![0u8; size]; size])
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn block_shape(&self) -> BlockShape {
        self.shape
    }

    /// Whether the cell came from the original puzzle.
    ///
    /// # Panics
    /// Panics if the coordinates are outside the board.
    pub fn is_given(&self, row: usize, col: usize) -> bool {
        self.given[self.index(row, col)]
    }

    /// Value at a cell, `0` for blank.
    ///
    /// # Panics
    /// Panics if the coordinates are outside the board.
    pub fn get(&self, row: usize, col: usize) -> u8 {
        self.cells[self.index(row, col)]
    }

    /// Writes a value (`0` to erase) into a non-given cell.
    pub fn set(&mut self, row: usize, col: usize, value: u8) -> SudokuResult<()> {
        if row >= self.size || col >= self.size {
            return Err(SudokuError::OutOfBounds {
                row,
                col,
                size: self.size,
            });
        }
        if value as usize > self.size {
            return Err(SudokuError::InvalidValue {
                value: value as u32,
                size: self.size,
            });
        }
        let idx = self.index(row, col);
        if self.given[idx] {
            return Err(SudokuError::GivenCellImmutable { row, col });
        }
        self.cells[idx] = value;
        Ok(())
    }

    /// Row-major cell values.
    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    /// Row-major given mask, parallel to [`cells`](Self::cells).
    pub fn given_mask(&self) -> &[bool] {
        &self.given
    }

    pub fn row(&self, row: usize) -> &[u8] {
        &self.cells[row * self.size..(row + 1) * self.size]
    }

    pub fn rows(&self) -> Vec<Vec<u8>> {
        self.cells.chunks(self.size).map(<[u8]>::to_vec).collect()
    }

    pub fn given_count(&self) -> usize {
        self.given.iter().filter(|&&g| g).count()
    }

    /// True when no cell is blank.
    pub fn is_complete(&self) -> bool {
        self.cells.iter().all(|&v| v != 0)
    }

    /// Conflict count, see [`fitness::penalty`].
    pub fn penalty(&self) -> u32 {
        fitness::penalty(&self.cells, self.size, self.shape)
    }

    /// Complete and free of conflicts.
    pub fn is_solved(&self) -> bool {
        self.is_complete() && self.penalty() == 0
    }

    /// Same size and given mask, different cell values.
    ///
    /// Used to turn an evolved candidate back into a board that still
    /// remembers which cells were the original clues.
    pub(crate) fn with_cells(&self, cells: Vec<u8>) -> Self {
        debug_assert_eq!(cells.len(), self.cells.len());
        Self {
            size: self.size,
            shape: self.shape,
            cells,
            given: self.given.clone(),
        }
    }

    fn index(&self, row: usize, col: usize) -> usize {
        assert!(
            row < self.size && col < self.size,
            "cell ({row}, {col}) outside {0}x{0} board",
            self.size
        );
        row * self.size + col
    }
}

impl TryFrom<Vec<Vec<u8>>> for Board {
    type Error = SudokuError;

    fn try_from(rows: Vec<Vec<u8>>) -> SudokuResult<Self> {
        Self::from_rows(&rows)
    }
}

impl From<Board> for Vec<Vec<u8>> {
    fn from(board: Board) -> Self {
        board.rows()
    }
}

/// Wire form of a [`Board`].
#[derive(Serialize, Deserialize)]
struct BoardRepr {
    rows: Vec<Vec<u8>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    given: Option<Vec<Vec<bool>>>,
}

impl TryFrom<BoardRepr> for Board {
    type Error = SudokuError;

    fn try_from(repr: BoardRepr) -> SudokuResult<Self> {
        let mut board = Self::from_rows(&repr.rows)?;
        let Some(mask) = repr.given else {
            return Ok(board);
        };

        let size = board.size;
        if mask.len() != size || mask.iter().any(|row| row.len() != size) {
            return Err(SudokuError::InvalidShape(format!(
                "given mask must be {size}x{size}"
            )));
        }
        let given: Vec<bool> = mask.into_iter().flatten().collect();
        if let Some(i) = (0..given.len()).find(|&i| given[i] && board.cells[i] == 0) {
            return Err(SudokuError::InvalidShape(format!(
                "cell ({}, {}) is marked given but blank",
                i / size,
                i % size
            )));
        }
        board.given = given;
        Ok(board)
    }
}

impl From<Board> for BoardRepr {
    fn from(board: Board) -> Self {
        let given = board.given.chunks(board.size).map(<[bool]>::to_vec).collect();
        Self {
            rows: board.rows(),
            given: Some(given),
        }
    }
}

impl fmt::Display for Board {
    /// Renders blanks as `.` with `|` and `-` separators between blocks.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let BlockShape { rows: bh, cols: bw } = self.shape;
        let rule = "-".repeat(self.size * 2 + (self.size / bw - 1) * 2 - 1);
        for r in 0..self.size {
            if r > 0 && r % bh == 0 {
                writeln!(f, "{rule}")?;
            }
            let mut line = String::new();
            for c in 0..self.size {
                if c > 0 {
                    line.push(' ');
                    if c % bw == 0 {
                        line.push_str("| ");
                    }
                }
                match self.get(r, c) {
                    0 => line.push('.'),
                    v => line.push_str(&v.to_string()),
                }
            }
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}
