//! Puzzle generation.
//!
//! A puzzle starts from a canonical solved grid, is shuffled with
//! symmetry-preserving permutations, and then has cells blanked until the
//! clue count for the requested difficulty remains. Uniqueness of the
//! solution is not checked.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use tracing::debug;

use crate::board::{BlockShape, Board};
use crate::error::{SudokuError, SudokuResult};

/// Puzzle difficulty, measured by the number of clues left on the board.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    /// Inclusive clue range on a 9×9 board.
    pub fn clue_range_9x9(self) -> (usize, usize) {
        match self {
            Difficulty::Easy => (36, 40),
            Difficulty::Medium => (28, 32),
            Difficulty::Hard => (22, 26),
        }
    }
}

/// Inclusive clue range for a board of `size`.
///
/// The 9×9 range is scaled by the ratio of cell counts and rounded; the
/// minimum is at least one clue.
///
/// ```
/// use sudoku_ga::generator::{clue_range, Difficulty};
///
/// assert_eq!(clue_range(9, Difficulty::Hard), (22, 26));
/// assert_eq!(clue_range(4, Difficulty::Easy), (7, 8));
/// ```
pub fn clue_range(size: usize, difficulty: Difficulty) -> (usize, usize) {
    let (min9, max9) = difficulty.clue_range_9x9();
    let cells = (size * size) as f64;
    let scale = |clues: usize| (clues as f64 / 81.0 * cells).round() as usize;
    let min = scale(min9).max(1);
    let max = scale(max9).max(min);
    (min, max)
}

/// Canonical solved grid of `size`.
///
/// Row `r` is `1..=size` rotated left by `(r % block_rows) * block_cols +
/// r / block_rows`, which keeps every row, column and block a permutation.
///
/// # Errors
/// [`SudokuError::InvalidShape`] for an unsupported size.
pub fn base_solution(size: usize) -> SudokuResult<Board> {
    let BlockShape { rows: bh, cols: bw } = BlockShape::for_size(size)
        .ok_or_else(|| SudokuError::InvalidShape(format!("unsupported size {size}")))?;

    let rows: Vec<Vec<u8>> = (0..size)
        .map(|r| {
            let shift = (r % bh) * bw + r / bh;
            (0..size).map(|c| ((c + shift) % size + 1) as u8).collect()
        })
        .collect();
    Board::from_rows(&rows)
}

/// Shuffles a board without breaking its validity.
///
/// Rows are permuted within each band, columns within each stack, and the
/// symbols relabeled with a random permutation. Blanks stay blank. Every
/// non-zero cell of the result is a given.
pub fn shuffle_solution<R: Rng>(board: &Board, rng: &mut R) -> SudokuResult<Board> {
    let size = board.size();
    let BlockShape { rows: bh, cols: bw } = board.block_shape();
    let mut rows = board.rows();

    for band in (0..size).step_by(bh) {
        rows[band..band + bh].shuffle(rng);
    }

    for stack in (0..size).step_by(bw) {
        let mut order: Vec<usize> = (stack..stack + bw).collect();
        order.shuffle(rng);
        for row in rows.iter_mut() {
            let picked: Vec<u8> = order.iter().map(|&c| row[c]).collect();
            row[stack..stack + bw].copy_from_slice(&picked);
        }
    }

    let mut labels: Vec<u8> = (1..=size as u8).collect();
    labels.shuffle(rng);
    for v in rows.iter_mut().flatten() {
        if *v != 0 {
            *v = labels[*v as usize - 1];
        }
    }

    Board::from_rows(&rows)
}

/// A random complete valid board.
pub fn solved_board<R: Rng>(size: usize, rng: &mut R) -> SudokuResult<Board> {
    shuffle_solution(&base_solution(size)?, rng)
}

/// A generated puzzle and the grid it was cut from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Puzzle {
    /// Board with the remaining clues as givens.
    pub puzzle: Board,
    /// The complete grid.
    pub solution: Board,
}

/// Generates a puzzle of `size` at `difficulty`.
///
/// The clue count is drawn uniformly from [`clue_range`] and the other cells
/// are blanked at random positions.
///
/// # Errors
/// [`SudokuError::InvalidShape`] for an unsupported size.
pub fn generate_puzzle<R: Rng>(
    size: usize,
    difficulty: Difficulty,
    rng: &mut R,
) -> SudokuResult<Puzzle> {
    let solution = solved_board(size, rng)?;
    let (min, max) = clue_range(size, difficulty);
    let clues = rng.random_range(min..=max);

    let mut positions: Vec<usize> = (0..size * size).collect();
    positions.shuffle(rng);

    let mut rows = solution.rows();
    for &pos in &positions[..size * size - clues] {
        rows[pos / size][pos % size] = 0;
    }
    let puzzle = Board::from_rows(&rows)?;

    debug!(size, %difficulty, clues, "generated puzzle");
    Ok(Puzzle { puzzle, solution })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;
    use proptest::prelude::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn test_clue_ranges_9x9() {
        assert_eq!(clue_range(9, Difficulty::Easy), (36, 40));
        assert_eq!(clue_range(9, Difficulty::Medium), (28, 32));
        assert_eq!(clue_range(9, Difficulty::Hard), (22, 26));
    }

    #[test]
    fn test_clue_ranges_scaled() {
        assert_eq!(clue_range(4, Difficulty::Easy), (7, 8));
        assert_eq!(clue_range(4, Difficulty::Medium), (6, 6));
        assert_eq!(clue_range(4, Difficulty::Hard), (4, 5));
        assert_eq!(clue_range(6, Difficulty::Easy), (16, 18));
        assert_eq!(clue_range(6, Difficulty::Medium), (12, 14));
        assert_eq!(clue_range(6, Difficulty::Hard), (10, 12));
    }

    #[test]
    fn test_base_solution_is_solved() {
        for size in [4, 6, 9] {
            let board = base_solution(size).unwrap();
            assert!(board.is_solved(), "base solution for {size} has conflicts");
            assert_eq!(board.given_count(), size * size);
        }
    }

    #[test]
    fn test_base_solution_9x9_rows() {
        let board = base_solution(9).unwrap();
        assert_eq!(board.row(0), &[1, 2, 3, 4, 5, 6, 7, 8, 9]);
        assert_eq!(board.row(1), &[4, 5, 6, 7, 8, 9, 1, 2, 3]);
        assert_eq!(board.row(3), &[2, 3, 4, 5, 6, 7, 8, 9, 1]);
    }

    #[test]
    fn test_unsupported_size() {
        assert!(matches!(base_solution(5), Err(SudokuError::InvalidShape(_))));
        let mut rng = create_rng(1);
        assert!(generate_puzzle(8, Difficulty::Easy, &mut rng).is_err());
    }

    #[test]
    fn test_shuffle_keeps_blanks_blank() {
        let board = Board::from_rows(&[
            vec![1, 0, 0, 0],
            vec![0, 0, 0, 0],
            vec![0, 0, 0, 0],
            vec![0, 0, 0, 0],
        ])
        .unwrap();
        let mut rng = create_rng(4);
        let shuffled = shuffle_solution(&board, &mut rng).unwrap();
        assert_eq!(shuffled.given_count(), 1);
    }

    #[test]
    fn test_shuffle_varies_with_seed() {
        let base = base_solution(9).unwrap();
        let a = shuffle_solution(&base, &mut create_rng(1)).unwrap();
        let b = shuffle_solution(&base, &mut create_rng(2)).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_generation_is_deterministic() {
        let a = generate_puzzle(9, Difficulty::Medium, &mut create_rng(10)).unwrap();
        let b = generate_puzzle(9, Difficulty::Medium, &mut create_rng(10)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_difficulty_names() {
        assert_eq!(Difficulty::Hard.to_string(), "hard");
        assert_eq!(Difficulty::from_str("EASY").unwrap(), Difficulty::Easy);
        assert!(Difficulty::from_str("extreme").is_err());
        assert_eq!(Difficulty::iter().count(), 3);
        assert_eq!(Difficulty::default(), Difficulty::Medium);
    }

    proptest! {
        #[test]
        fn prop_puzzle_is_cut_from_solution(
            seed in any::<u64>(),
            size in prop::sample::select(vec![4usize, 6, 9]),
            difficulty in prop::sample::select(vec![Difficulty::Easy, Difficulty::Medium, Difficulty::Hard]),
        ) {
            let mut rng = create_rng(seed);
            let Puzzle { puzzle, solution } = generate_puzzle(size, difficulty, &mut rng).unwrap();

            prop_assert!(solution.is_solved());
            let (min, max) = clue_range(size, difficulty);
            let clues = puzzle.given_count();
            prop_assert!(clues >= min && clues <= max);

            for (i, (&v, &g)) in puzzle.cells().iter().zip(puzzle.given_mask()).enumerate() {
                prop_assert_eq!(g, v != 0);
                if g {
                    prop_assert_eq!(v, solution.cells()[i]);
                }
            }
        }
    }
}
