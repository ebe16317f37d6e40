//! Stateful controller for interactive play and solver runs.
//!
//! A [`Session`] holds the puzzle as first loaded or generated, the board
//! the player is editing, the solution when the puzzle came from the
//! generator, the GA parameters and the history of solver runs.

use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::{Instant, SystemTime};

use rand::rngs::StdRng;
use tracing::info;

use crate::board::Board;
use crate::error::{SudokuError, SudokuResult};
use crate::fitness::is_move_valid;
use crate::ga::{GaConfig, GaRunner};
use crate::generator::{generate_puzzle, Difficulty};
use crate::io;
use crate::metrics::{MetricsHistory, RunMetrics};
use crate::random::rng_from_seed;

pub struct Session {
    current: Option<Board>,
    initial: Option<Board>,
    solution: Option<Board>,
    difficulty: Option<Difficulty>,
    config: GaConfig,
    history: MetricsHistory,
    rng: StdRng,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(GaConfig::default())
    }
}

impl Session {
    /// Creates an empty session. Puzzle generation is seeded from
    /// `config.seed` when set.
    pub fn new(config: GaConfig) -> Self {
        let rng = rng_from_seed(config.seed);
        Self {
            current: None,
            initial: None,
            solution: None,
            difficulty: None,
            config,
            history: MetricsHistory::new(),
            rng,
        }
    }

    pub fn config(&self) -> &GaConfig {
        &self.config
    }

    /// Replaces the GA parameters used by later runs.
    ///
    /// # Errors
    /// [`SudokuError::InvalidConfiguration`] and the old parameters are kept.
    pub fn set_config(&mut self, config: GaConfig) -> SudokuResult<()> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    pub fn current(&self) -> Option<&Board> {
        self.current.as_ref()
    }

    pub fn initial(&self) -> Option<&Board> {
        self.initial.as_ref()
    }

    /// Known solution, only for generated puzzles.
    pub fn solution(&self) -> Option<&Board> {
        self.solution.as_ref()
    }

    pub fn difficulty(&self) -> Option<Difficulty> {
        self.difficulty
    }

    /// Generates a new puzzle and makes it the current board.
    pub fn generate(&mut self, size: usize, difficulty: Difficulty) -> SudokuResult<&Board> {
        let puzzle = generate_puzzle(size, difficulty, &mut self.rng)?;
        self.solution = Some(puzzle.solution);
        self.difficulty = Some(difficulty);
        Ok(self.install(puzzle.puzzle))
    }

    /// Loads a board file and makes it the current board.
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> SudokuResult<&Board> {
        let board = io::load_board(path)?;
        Ok(self.load_board(board))
    }

    /// Parses a board from text and makes it the current board.
    pub fn load_text(&mut self, text: &str) -> SudokuResult<&Board> {
        let board = io::parse_board(text)?;
        Ok(self.load_board(board))
    }

    /// Makes `board` the current board. Any previous solution and
    /// difficulty are forgotten.
    pub fn load_board(&mut self, board: Board) -> &Board {
        self.solution = None;
        self.difficulty = None;
        self.install(board)
    }

    /// Saves the current board.
    pub fn save(&self, path: impl AsRef<Path>) -> SudokuResult<()> {
        io::save_board(self.current_board()?, path)
    }

    /// Restores the current board to the puzzle as loaded.
    pub fn reset(&mut self) -> SudokuResult<()> {
        let initial = self.initial.as_ref().ok_or(SudokuError::NoBoard)?;
        self.current = Some(initial.clone());
        Ok(())
    }

    /// Applies a player's move to the current board.
    ///
    /// Returns `Ok(false)` and leaves the board untouched when the move
    /// breaks a rule or targets a given cell. `0` erases.
    pub fn apply_move(&mut self, row: usize, col: usize, value: u8) -> SudokuResult<bool> {
        let board = self.current.as_mut().ok_or(SudokuError::NoBoard)?;
        if !is_move_valid(board, row, col, value) {
            return Ok(false);
        }
        board.set(row, col, value)?;
        Ok(true)
    }

    /// True when the current board is complete and conflict-free.
    pub fn is_solved(&self) -> bool {
        self.current.as_ref().is_some_and(Board::is_solved)
    }

    /// Runs the GA on the initial puzzle.
    ///
    /// The best board found becomes the current board and the run's metrics
    /// are appended to the history.
    pub fn solve(&mut self) -> SudokuResult<&RunMetrics> {
        self.solve_with_cancel(None)
    }

    /// [`solve`](Self::solve) with a cancellation flag.
    pub fn solve_with_cancel(
        &mut self,
        cancel: Option<Arc<AtomicBool>>,
    ) -> SudokuResult<&RunMetrics> {
        let initial = self.initial.as_ref().ok_or(SudokuError::NoBoard)?;

        let started = SystemTime::now();
        let clock = Instant::now();
        let result = GaRunner::run_with_cancel(initial, &self.config, cancel)?;
        let metrics = RunMetrics::from_result(
            initial,
            self.difficulty,
            &self.config,
            &result,
            started,
            clock.elapsed(),
        );

        self.current = Some(result.best);
        let recorded = self.history.record(metrics);
        info!(
            run_id = recorded.run_id,
            cause = %recorded.cause,
            best_penalty = recorded.best_penalty,
            "solver run recorded"
        );
        Ok(recorded)
    }

    /// Writes the current board and the latest run's metrics as a report.
    ///
    /// # Errors
    /// [`SudokuError::NoBoard`] without a board or a recorded run.
    pub fn export_last_run(&self, path: impl AsRef<Path>) -> SudokuResult<()> {
        let board = self.current_board()?;
        let metrics = self.history.last().ok_or(SudokuError::NoBoard)?;
        io::export_report(board, metrics, path)
    }

    pub fn history(&self) -> &[RunMetrics] {
        self.history.runs()
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    fn current_board(&self) -> SudokuResult<&Board> {
        self.current.as_ref().ok_or(SudokuError::NoBoard)
    }

    fn install(&mut self, board: Board) -> &Board {
        self.initial = Some(board.clone());
        self.current.insert(board)
    }
}
