//! Genetic-algorithm Sudoku solver for 4×4, 6×6 and 9×9 boards.
//!
//! Provides:
//!
//! - **Board model**: an N×N grid with an immutable mask of given cells,
//!   fixed at construction from the puzzle's non-zero cells.
//! - **Fitness**: a conflict penalty summed over rows, columns and blocks;
//!   `0` means no symbol repeats in any group.
//! - **Genetic Algorithm (GA)**: row-permutation candidates evolved with
//!   block-swap crossover, row-swap mutation and row repair, elitism, and a
//!   mutation rate that rises when the best penalty stagnates.
//! - **Generator**: shuffled canonical solutions with clues removed to a
//!   difficulty level.
//! - **I/O and metrics**: text and CSV boards, per-run metrics and a
//!   plain-text run report.
//! - **Session**: a stateful controller tying puzzles, moves and solver
//!   runs together.
//!
//! # Example
//!
//! ```
//! use sudoku_ga::ga::{GaConfig, GaRunner};
//! use sudoku_ga::generator::{generate_puzzle, Difficulty};
//! use sudoku_ga::random::create_rng;
//!
//! let mut rng = create_rng(7);
//! let puzzle = generate_puzzle(4, Difficulty::Easy, &mut rng)?.puzzle;
//!
//! let config = GaConfig::default()
//!     .with_population_size(60)
//!     .with_max_generations(300)
//!     .with_seed(7);
//! let result = GaRunner::run(&puzzle, &config)?;
//! assert_eq!(result.fitness_history.len(), result.generations);
//! # Ok::<(), sudoku_ga::SudokuError>(())
//! ```

pub mod board;
pub mod error;
pub mod fitness;
pub mod ga;
pub mod generator;
pub mod io;
pub mod metrics;
pub mod random;
pub mod session;

pub use board::{BlockShape, Board, SUPPORTED_SIZES};
pub use error::{SudokuError, SudokuResult};
