//! GA evolutionary loop execution.
//!
//! [`GaRunner`] orchestrates the complete evolutionary process:
//! initialization → evaluation → selection → crossover → mutation → repeat,
//! raising the mutation rate when the best penalty stops improving.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::Rng;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::{debug, info, trace};

use super::config::GaConfig;
use super::operators::{block_crossover, row_swap_mutation};
use super::population::initial_population;
use super::selection::{build_mating_pool, elites, pick_parent};
use super::types::{Candidate, Penalty, TerminationCause};
use crate::board::Board;
use crate::error::SudokuResult;
use crate::random::rng_from_seed;

/// Result of a GA run.
#[derive(Debug, Clone)]
pub struct GaResult {
    /// Best board seen during the run, carrying the original given mask.
    ///
    /// A copy of the input board if no generation was evaluated.
    pub best: Board,

    /// Penalty of [`best`](Self::best).
    pub best_penalty: Penalty,

    /// Zero-based generation in which `best` was first found.
    pub best_generation: usize,

    /// Number of generations evaluated, including the final one.
    pub generations: usize,

    /// Why the run stopped.
    pub cause: TerminationCause,

    /// Best penalty of each evaluated generation.
    pub fitness_history: Vec<Penalty>,
}

impl GaResult {
    pub fn is_solved(&self) -> bool {
        self.cause == TerminationCause::Solved
    }
}

/// Snapshot passed to the observer after each evaluated generation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationStats {
    /// Zero-based generation index.
    pub generation: usize,
    /// Best penalty in this generation.
    pub best_penalty: Penalty,
    /// Best penalty seen so far in the run.
    pub best_ever_penalty: Penalty,
    /// Consecutive generations without improvement.
    pub stagnation: usize,
    /// Mutation rate applied to this generation's offspring.
    pub mutation_rate: f64,
}

/// Executes the GA evolutionary loop.
///
/// # Usage
///
/// ```
/// use sudoku_ga::ga::{GaConfig, GaRunner};
/// use sudoku_ga::Board;
///
/// let board = Board::from_rows(&[
///     [1u8, 2, 3, 4],
///     [0, 0, 0, 0],
///     [0, 0, 0, 0],
///     [0, 0, 0, 0],
/// ])?;
/// let config = GaConfig::default()
///     .with_population_size(50)
///     .with_max_generations(200)
///     .with_seed(42);
/// let result = GaRunner::run(&board, &config)?;
/// assert_eq!(result.fitness_history.len(), result.generations);
/// # Ok::<(), sudoku_ga::SudokuError>(())
/// ```
pub struct GaRunner;

impl GaRunner {
    /// Runs the GA on `board`.
    ///
    /// # Errors
    /// [`SudokuError::InvalidConfiguration`](crate::SudokuError::InvalidConfiguration)
    /// if `config` fails [`GaConfig::validate`]. Nothing is evaluated in
    /// that case.
    pub fn run(board: &Board, config: &GaConfig) -> SudokuResult<GaResult> {
        Self::run_with_cancel(board, config, None)
    }

    /// Runs the GA with an optional cancellation token.
    ///
    /// The flag is checked at the start of every generation; once set, the
    /// run stops with [`TerminationCause::Cancelled`] and returns the best
    /// board found so far.
    pub fn run_with_cancel(
        board: &Board,
        config: &GaConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> SudokuResult<GaResult> {
        Self::run_observed(board, config, cancel, |_| {})
    }

    /// Runs the GA, calling `observer` after each evaluated generation.
    pub fn run_observed<F>(
        board: &Board,
        config: &GaConfig,
        cancel: Option<Arc<AtomicBool>>,
        mut observer: F,
    ) -> SudokuResult<GaResult>
    where
        F: FnMut(&GenerationStats),
    {
        config.validate()?;

        let mut rng = rng_from_seed(config.seed);
        let started = Instant::now();
        let time_limit = config.time_limit_ms.map(Duration::from_millis);

        // 1. Initialize population
        let mut population = initial_population(board, config.population_size, &mut rng);

        let mut best: Option<(Candidate, usize)> = None;
        let mut fitness_history = Vec::with_capacity(config.max_generations.min(4096));
        let mut previous_best: Option<Penalty> = None;
        let mut stagnation = 0usize;
        let mut cause = TerminationCause::MaxGenerations;

        // 2. Evolutionary loop
        for gen in 0..config.max_generations {
            let flagged = cancel
                .as_ref()
                .is_some_and(|flag| flag.load(Ordering::Relaxed));
            let timed_out = time_limit.is_some_and(|limit| started.elapsed() >= limit);
            if flagged || timed_out {
                cause = TerminationCause::Cancelled;
                break;
            }

            evaluate_population(board, &mut population, config.parallel);

            let gen_best = find_best(&population);
            let penalty = gen_best.penalty();
            fitness_history.push(penalty);

            let improved_ever = best
                .as_ref()
                .map_or(true, |(b, _)| penalty < b.penalty());
            if improved_ever {
                debug!(generation = gen, penalty, "new best candidate");
                best = Some((gen_best.clone(), gen));
            }

            if previous_best.is_some_and(|prev| penalty >= prev) {
                stagnation += 1;
            } else {
                stagnation = 0;
            }
            previous_best = Some(penalty);

            let mutation_rate = config.effective_mutation_rate(stagnation);
            if stagnation == config.stagnation_threshold + 1
                || stagnation == config.stagnation_threshold.saturating_mul(2) + 1
            {
                debug!(generation = gen, stagnation, mutation_rate, "mutation rate raised");
            }
            trace!(generation = gen, penalty, stagnation, mutation_rate, "generation evaluated");

            observer(&GenerationStats {
                generation: gen,
                best_penalty: penalty,
                best_ever_penalty: best.as_ref().map_or(penalty, |(b, _)| b.penalty()),
                stagnation,
                mutation_rate,
            });

            if penalty == 0 {
                cause = TerminationCause::Solved;
                break;
            }

            population = next_generation(board, config, &population, mutation_rate, &mut rng);
        }

        if cause == TerminationCause::MaxGenerations && stagnation > config.stagnation_threshold {
            cause = TerminationCause::Stagnation;
        }

        let (best, best_penalty, best_generation) = match best {
            Some((candidate, gen)) => {
                let penalty = candidate.penalty();
                (board.with_cells(candidate.into_cells()), penalty, gen)
            }
            None => (board.clone(), board.penalty(), 0),
        };

        info!(
            %cause,
            generations = fitness_history.len(),
            best_penalty,
            best_generation,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "search finished"
        );

        Ok(GaResult {
            best,
            best_penalty,
            best_generation,
            generations: fitness_history.len(),
            cause,
            fitness_history,
        })
    }
}

/// Builds the next generation: elites first, then offspring drawn from the
/// mating pool until the population is full.
fn next_generation<R: Rng>(
    board: &Board,
    config: &GaConfig,
    population: &[Candidate],
    mutation_rate: f64,
    rng: &mut R,
) -> Vec<Candidate> {
    let pool = build_mating_pool(population, config.pool_size(), config.elite_ratio, rng);

    let mut next = elites(population, config.elite_count());
    next.reserve(config.population_size.saturating_sub(next.len()));

    while next.len() < config.population_size {
        let p1 = pick_parent(&pool, rng);
        let p2 = pick_parent(&pool, rng);

        let children = if rng.random_range(0.0..1.0) < config.crossover_rate {
            let (c1, c2) = block_crossover(p1, p2, board, rng);
            [c1, c2]
        } else {
            [p1.clone(), p2.clone()]
        };

        for mut child in children {
            if next.len() >= config.population_size {
                break;
            }
            if rng.random_range(0.0..1.0) < mutation_rate {
                row_swap_mutation(&mut child, board, rng);
            }
            next.push(child);
        }
    }

    next
}

/// Scores every candidate that has no cached penalty.
#[cfg(feature = "parallel")]
fn evaluate_population(board: &Board, population: &mut [Candidate], parallel: bool) {
    if parallel {
        population
            .par_iter_mut()
            .filter(|c| !c.is_evaluated())
            .for_each(|c| evaluate(board, c));
    } else {
        evaluate_sequential(board, population);
    }
}

/// Scores every candidate that has no cached penalty.
#[cfg(not(feature = "parallel"))]
fn evaluate_population(board: &Board, population: &mut [Candidate], _parallel: bool) {
    evaluate_sequential(board, population);
}

fn evaluate_sequential(board: &Board, population: &mut [Candidate]) {
    for c in population.iter_mut().filter(|c| !c.is_evaluated()) {
        evaluate(board, c);
    }
}

fn evaluate(board: &Board, candidate: &mut Candidate) {
    let penalty = crate::fitness::penalty(candidate.cells(), board.size(), board.block_shape());
    candidate.set_penalty(penalty);
}

/// Lowest penalty; the first one in population order wins ties.
fn find_best(population: &[Candidate]) -> &Candidate {
    population
        .iter()
        .min_by_key(|c| c.penalty())
        .expect("population must not be empty")
}

// ============================================================================
// Tests
// ============================================================================
