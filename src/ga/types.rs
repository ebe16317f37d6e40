//! Core value types of the search: candidates, penalties and outcomes.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Conflict count of a grid. Lower is better; zero is a valid solution.
pub type Penalty = u32;

/// Penalty carried by a candidate that has not been scored yet.
///
/// Sorts after every real penalty, so an unscored candidate never wins a
/// comparison by accident.
pub const UNEVALUATED: Penalty = Penalty::MAX;

/// One fully populated trial solution.
///
/// Candidates own their cells; operators either work on a private clone or
/// on a candidate they hold by `&mut`. Any write through
/// [`cells_mut`](Self::cells_mut) drops the cached penalty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    cells: Vec<u8>,
    penalty: Penalty,
}

impl Candidate {
    /// Wraps row-major cells as an unscored candidate.
    pub fn new(cells: Vec<u8>) -> Self {
        Self {
            cells,
            penalty: UNEVALUATED,
        }
    }

    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    /// Mutable access to the cells; invalidates the cached penalty.
    pub fn cells_mut(&mut self) -> &mut [u8] {
        self.penalty = UNEVALUATED;
        &mut self.cells
    }

    pub fn penalty(&self) -> Penalty {
        self.penalty
    }

    pub fn set_penalty(&mut self, penalty: Penalty) {
        self.penalty = penalty;
    }

    pub fn is_evaluated(&self) -> bool {
        self.penalty != UNEVALUATED
    }

    /// Cells of one row on a board of `size`.
    pub fn row(&self, row: usize, size: usize) -> &[u8] {
        &self.cells[row * size..(row + 1) * size]
    }

    pub fn into_cells(self) -> Vec<u8> {
        self.cells
    }
}

/// Why a search run stopped.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TerminationCause {
    /// A zero-penalty candidate was found.
    Solved,
    /// The generation budget ran out.
    MaxGenerations,
    /// The generation budget ran out while the best penalty had been flat
    /// for longer than the stagnation threshold.
    Stagnation,
    /// Stopped by the cancellation flag or the time limit.
    Cancelled,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_new_candidate_is_unevaluated() {
        let c = Candidate::new(vec![1, 2, 2, 1]);
        assert!(!c.is_evaluated());
        assert_eq!(c.penalty(), UNEVALUATED);
    }

    #[test]
    fn test_cells_mut_invalidates_penalty() {
        let mut c = Candidate::new(vec![1, 2, 3, 4, 3, 4, 1, 2, 2, 1, 4, 3, 4, 3, 2, 1]);
        c.set_penalty(0);
        assert!(c.is_evaluated());
        c.cells_mut().swap(0, 1);
        assert!(!c.is_evaluated());
        assert_eq!(c.row(0, 4), &[2, 1, 3, 4]);
    }

    #[test]
    fn test_termination_cause_names() {
        assert_eq!(TerminationCause::MaxGenerations.to_string(), "max_generations");
        assert_eq!(
            TerminationCause::from_str("stagnation").unwrap(),
            TerminationCause::Stagnation
        );
        assert_eq!(
            serde_json::to_string(&TerminationCause::Solved).unwrap(),
            "\"solved\""
        );
    }
}
