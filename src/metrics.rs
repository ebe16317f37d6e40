//! Per-run solver metrics and the in-memory run history.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::ga::{GaConfig, GaResult, Penalty, TerminationCause};
use crate::generator::Difficulty;

/// Summary of one solver run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunMetrics {
    /// Assigned by [`MetricsHistory::record`]; `0` until recorded.
    pub run_id: u64,
    /// Wall-clock start, milliseconds since the Unix epoch.
    pub started_at_ms: u64,
    pub duration: Duration,
    pub board_size: usize,
    /// Set when the board came from the generator.
    pub difficulty: Option<Difficulty>,
    /// Parameters the run used.
    pub config: GaConfig,
    /// Penalty of the board handed to the solver.
    pub initial_penalty: Penalty,
    /// Penalty of the board the run returned.
    pub final_penalty: Penalty,
    pub best_penalty: Penalty,
    pub best_generation: usize,
    pub generations: usize,
    pub cause: TerminationCause,
    pub fitness_history: Vec<Penalty>,
}

impl RunMetrics {
    /// Collects the metrics of a finished run on `initial`.
    pub fn from_result(
        initial: &Board,
        difficulty: Option<Difficulty>,
        config: &GaConfig,
        result: &GaResult,
        started: SystemTime,
        duration: Duration,
    ) -> Self {
        let started_at_ms = started
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);

        Self {
            run_id: 0,
            started_at_ms,
            duration,
            board_size: initial.size(),
            difficulty,
            config: config.clone(),
            initial_penalty: initial.penalty(),
            final_penalty: result.best.penalty(),
            best_penalty: result.best_penalty,
            best_generation: result.best_generation,
            generations: result.generations,
            cause: result.cause,
            fitness_history: result.fitness_history.clone(),
        }
    }

    pub fn is_solved(&self) -> bool {
        self.cause == TerminationCause::Solved
    }
}

/// Runs recorded in one session, oldest first.
#[derive(Debug, Clone)]
pub struct MetricsHistory {
    runs: Vec<RunMetrics>,
    next_id: u64,
}

impl Default for MetricsHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsHistory {
    pub fn new() -> Self {
        Self {
            runs: Vec::new(),
            next_id: 1,
        }
    }

    /// Appends a run, assigning the next id.
    pub fn record(&mut self, mut metrics: RunMetrics) -> &RunMetrics {
        metrics.run_id = self.next_id;
        self.next_id += 1;
        self.runs.push(metrics);
        &self.runs[self.runs.len() - 1]
    }

    pub fn runs(&self) -> &[RunMetrics] {
        &self.runs
    }

    pub fn last(&self) -> Option<&RunMetrics> {
        self.runs.last()
    }

    pub fn len(&self) -> usize {
        self.runs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// Drops every run and restarts ids at 1.
    pub fn clear(&mut self) {
        self.runs.clear();
        self.next_id = 1;
    }
}
