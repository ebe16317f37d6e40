//! Initial population.
//!
//! Each candidate is filled row by row: the symbols missing from a row's
//! givens are shuffled into its open cells. Rows therefore start free of
//! duplicates; columns and blocks are left to the search.

use rand::seq::SliceRandom;
use rand::Rng;

use super::types::Candidate;
use crate::board::Board;

/// Builds one random candidate consistent with the board's givens.
///
/// Only given cells are kept; any other value on the board is treated as
/// blank.
pub fn random_candidate<R: Rng>(board: &Board, rng: &mut R) -> Candidate {
    let size = board.size();
    let mut cells = Vec::with_capacity(size * size);

    for r in 0..size {
        let given = &board.given_mask()[r * size..(r + 1) * size];
        let row = board.row(r);

        let mut present = [false; 10];
        for (&v, &g) in row.iter().zip(given) {
            if g {
                present[v as usize] = true;
            }
        }
        let mut missing: Vec<u8> = (1..=size as u8)
            .filter(|&v| !present[v as usize])
            .collect();
        missing.shuffle(rng);

        let mut fill = missing.into_iter();
        for (&v, &g) in row.iter().zip(given) {
            // Duplicate givens leave more missing symbols than open cells,
            // so `fill` never runs dry.
            cells.push(if g { v } else { fill.next().unwrap_or(0) });
        }
    }

    Candidate::new(cells)
}

/// Builds `n` independently randomized candidates.
pub fn initial_population<R: Rng>(board: &Board, n: usize, rng: &mut R) -> Vec<Candidate> {
    (0..n).map(|_| random_candidate(board, rng)).collect()
}
