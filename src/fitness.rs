//! Conflict counting for boards and candidates.
//!
//! The penalty of a grid is the number of surplus symbols across all rows,
//! columns and blocks: a group where symbol `v` appears `c` times
//! contributes `c - 1`. Blank cells (`0`) are ignored, so a partially
//! filled board only scores the conflicts it already has.
//!
//! The penalty is not a distance to the solution. A row with two `3`s and
//! no `7` costs exactly one point.

use crate::board::{BlockShape, Board};

/// Surplus count of one group of cells, ignoring blanks.
///
/// # Panics
/// Panics if a value is greater than 9.
pub fn group_penalty<I: IntoIterator<Item = u8>>(values: I) -> u32 {
    let mut counts = [0u32; 10];
    let mut surplus = 0;
    for v in values {
        if v == 0 {
            continue;
        }
        let slot = &mut counts[v as usize];
        if *slot > 0 {
            surplus += 1;
        }
        *slot += 1;
    }
    surplus
}

/// Total penalty of a row-major grid of `size × size` cells.
///
/// Zero for a complete grid means every row, column and block is a
/// permutation of `1..=size`.
pub fn penalty(cells: &[u8], size: usize, shape: BlockShape) -> u32 {
    debug_assert_eq!(cells.len(), size * size);
    let mut total = 0;

    for row in cells.chunks(size) {
        total += group_penalty(row.iter().copied());
    }

    for col in 0..size {
        total += group_penalty((0..size).map(|r| cells[r * size + col]));
    }

    for block in 0..shape.block_count(size) {
        let (r0, c0) = shape.block_origin(block, size);
        total += group_penalty(
            (r0..r0 + shape.rows)
                .flat_map(|r| (c0..c0 + shape.cols).map(move |c| cells[r * size + c])),
        );
    }

    total
}

/// Checks an interactive move against the rules.
///
/// Out-of-range coordinates, given cells and symbols above the board size
/// are rejected. Erasing (`value == 0`) an open cell is always allowed;
/// otherwise the symbol must not already appear elsewhere in the cell's
/// row, column or block.
pub fn is_move_valid(board: &Board, row: usize, col: usize, value: u8) -> bool {
    let size = board.size();
    if row >= size || col >= size || board.is_given(row, col) {
        return false;
    }
    if value == 0 {
        return true;
    }
    if value as usize > size {
        return false;
    }

    if (0..size).any(|c| c != col && board.get(row, c) == value) {
        return false;
    }
    if (0..size).any(|r| r != row && board.get(r, col) == value) {
        return false;
    }

    let shape = board.block_shape();
    let r0 = (row / shape.rows) * shape.rows;
    let c0 = (col / shape.cols) * shape.cols;
    for r in r0..r0 + shape.rows {
        for c in c0..c0 + shape.cols {
            if (r, c) != (row, col) && board.get(r, c) == value {
                return false;
            }
        }
    }
    true
}
