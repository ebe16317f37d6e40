//! Genetic Algorithm search for Sudoku.
//!
//! Candidates are complete grids whose rows start as permutations of the
//! missing symbols; the search then works on column and block conflicts.
//!
//! # Key Types
//!
//! - [`GaConfig`]: Algorithm parameters (population size, rates, budget)
//! - [`GaRunner`]: Executes the evolutionary loop
//! - [`GaResult`]: Best board found, generations used, termination cause
//!   and per-generation penalty history
//!
//! # Submodules
//!
//! - [`population`]: Row-wise random initialization
//! - [`operators`]: Block-swap crossover, row-swap mutation and row repair
//! - [`selection`]: Ranking, elitism and the mating pool
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - Mantere & Koljonen (2007), "Solving, Rating and Generating Sudoku
//!   Puzzles with GA"

mod config;
pub mod operators;
pub mod population;
mod runner;
pub mod selection;
mod types;

pub use config::GaConfig;
pub use runner::{GaResult, GaRunner, GenerationStats};
pub use types::{Candidate, Penalty, TerminationCause, UNEVALUATED};
