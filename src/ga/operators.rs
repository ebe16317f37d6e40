//! Sudoku-specific genetic operators.
//!
//! All operators respect the given mask of the original board: a given
//! cell is never written.
//!
//! # Crossover
//!
//! - [`block_crossover`]: swap the open cells of one random block between
//!   two parents, then repair every row of both children.
//!
//! # Mutation
//!
//! - [`row_swap_mutation`]: swap two open cells of one random row.
//!
//! # Repair
//!
//! - [`repair_row`] / [`repair_rows`]: overwrite surplus symbols in open
//!   cells with the symbols the row is missing.

use rand::seq::SliceRandom;
use rand::Rng;

use super::types::Candidate;
use crate::board::Board;

// ============================================================================
// Repair
// ============================================================================

/// Restores symbol uniqueness within one row, as far as the givens allow.
///
/// The symbols absent from the row are shuffled; then, scanning left to
/// right, each open cell whose value still occurs more than once takes the
/// next absent symbol until none are left.
///
/// A row without duplicates is left untouched. A row whose givens already
/// repeat a symbol cannot be fully repaired and keeps that duplicate.
///
/// # Panics
/// Panics if any value exceeds 9, the largest supported board symbol.
pub fn repair_row<R: Rng>(row: &mut [u8], given: &[bool], rng: &mut R) {
    debug_assert_eq!(row.len(), given.len());
    let size = row.len();

    let mut counts = [0u32; 10];
    for &v in row.iter() {
        counts[v as usize] += 1;
    }
    let mut missing: Vec<u8> = (1..=size as u8)
        .filter(|&v| counts[v as usize] == 0)
        .collect();
    missing.shuffle(rng);

    for (cell, &fixed) in row.iter_mut().zip(given) {
        if fixed || counts[*cell as usize] <= 1 {
            continue;
        }
        let Some(replacement) = missing.pop() else {
            break;
        };
        counts[*cell as usize] -= 1;
        *cell = replacement;
        counts[replacement as usize] += 1;
    }
}

/// Repairs every row of a candidate.
pub fn repair_rows<R: Rng>(candidate: &mut Candidate, board: &Board, rng: &mut R) {
    let size = board.size();
    let cells = candidate.cells_mut();
    for (row, given) in cells
        .chunks_mut(size)
        .zip(board.given_mask().chunks(size))
    {
        repair_row(row, given, rng);
    }
}

// ============================================================================
// Crossover
// ============================================================================

/// Block-swap crossover.
///
/// Picks one block uniformly, exchanges its open cells between copies of
/// the two parents and repairs the rows of both children. Parents are not
/// modified.
pub fn block_crossover<R: Rng>(
    parent1: &Candidate,
    parent2: &Candidate,
    board: &Board,
    rng: &mut R,
) -> (Candidate, Candidate) {
    let size = board.size();
    let block = rng.random_range(0..board.block_shape().block_count(size));

    let (mut child1, mut child2) = swap_block(parent1, parent2, board, block);
    repair_rows(&mut child1, board, rng);
    repair_rows(&mut child2, board, rng);
    (child1, child2)
}

/// Copies both parents and swaps the open cells of `block` between them.
fn swap_block(
    parent1: &Candidate,
    parent2: &Candidate,
    board: &Board,
    block: usize,
) -> (Candidate, Candidate) {
    let size = board.size();
    let shape = board.block_shape();
    let (r0, c0) = shape.block_origin(block, size);
    let given = board.given_mask();

    let mut child1 = parent1.clone();
    let mut child2 = parent2.clone();
    let a = child1.cells_mut();
    let b = child2.cells_mut();
    for r in r0..r0 + shape.rows {
        for c in c0..c0 + shape.cols {
            let i = r * size + c;
            if !given[i] {
                std::mem::swap(&mut a[i], &mut b[i]);
            }
        }
    }
    (child1, child2)
}

// ============================================================================
// Mutation
// ============================================================================

/// Swaps two distinct open cells of a random row, then repairs that row.
///
/// Rows with fewer than two open cells are left alone. The caller decides
/// whether to mutate at all; this always mutates when it can.
pub fn row_swap_mutation<R: Rng>(candidate: &mut Candidate, board: &Board, rng: &mut R) {
    let size = board.size();
    let row = rng.random_range(0..size);
    let given = &board.given_mask()[row * size..(row + 1) * size];

    let open: Vec<usize> = (0..size).filter(|&c| !given[c]).collect();
    if open.len() < 2 {
        return;
    }
    let picks = rand::seq::index::sample(rng, open.len(), 2);
    let (a, b) = (open[picks.index(0)], open[picks.index(1)]);

    let cells = &mut candidate.cells_mut()[row * size..(row + 1) * size];
    cells.swap(a, b);
    repair_row(cells, given, rng);
}

// ============================================================================
// Tests
// ============================================================================
